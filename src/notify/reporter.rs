//! Turns request errors into notices, probing for maintenance mode first.

use std::fmt;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use super::{Notice, NoticeLevel, Notifier};
use crate::api::dto::MaintenanceStatus;
use crate::error::ClientError;

const DEFAULT_MAINTENANCE_MESSAGE: &str =
    "The platform is undergoing maintenance. Please try again later.";

/// Reports whether the platform is in maintenance mode.
pub trait MaintenanceProbe: Send + Sync + fmt::Debug {
    /// Returns the maintenance message when maintenance is active, `None`
    /// otherwise or when the probe itself fails.
    fn check(&self) -> BoxFuture<'_, Option<String>>;
}

/// Probes a fixed JSON endpoint (`{ "maintenance": bool, "message": … }`).
#[derive(Debug, Clone)]
pub struct HttpMaintenanceProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpMaintenanceProbe {
    /// Creates a probe for `url`.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn fetch(&self) -> Option<String> {
        let response = match self.client.get(&self.url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!(status = %r.status(), "maintenance probe returned non-success");
                return None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "maintenance probe failed");
                return None;
            }
        };
        let status: MaintenanceStatus = response.json().await.ok()?;
        status.maintenance.then(|| {
            status
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MAINTENANCE_MESSAGE.to_string())
        })
    }
}

impl MaintenanceProbe for HttpMaintenanceProbe {
    fn check(&self) -> BoxFuture<'_, Option<String>> {
        self.fetch().boxed()
    }
}

/// Maps [`ClientError`]s to notices.
///
/// Validation errors are never routed here; forms render them inline.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    notifier: Arc<dyn Notifier>,
    probe: Option<Arc<dyn MaintenanceProbe>>,
    maintenance_status: u16,
}

impl ErrorReporter {
    /// Creates a reporter without a maintenance probe.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            probe: None,
            maintenance_status: 503,
        }
    }

    /// Enables maintenance probing for errors carrying `status`.
    #[must_use]
    pub fn with_maintenance_probe(mut self, status: u16, probe: Arc<dyn MaintenanceProbe>) -> Self {
        self.maintenance_status = status;
        self.probe = Some(probe);
        self
    }

    /// The notifier notices go to.
    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Shows `error` to the user.
    ///
    /// An error with the maintenance status first consults the probe; if
    /// maintenance is active, one warning with the maintenance message
    /// replaces the error's own messages.
    pub async fn report(&self, error: &ClientError) {
        if let Some(probe) = &self.probe
            && error.status() == Some(self.maintenance_status)
            && let Some(message) = probe.check().await
        {
            tracing::warn!("backend is in maintenance mode");
            self.notifier.notify(Notice::new(NoticeLevel::Warning, message));
            return;
        }

        tracing::warn!(error = %error, "request failed");
        for message in error.user_messages() {
            self.notifier.notify(Notice::error(message));
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Notifier that records every notice.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        notices: Mutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        /// Returns the recorder and the same notifier as a trait object.
        pub(crate) fn shared() -> (Arc<Self>, Arc<dyn Notifier>) {
            let recorder = Arc::new(Self::default());
            let notifier = Arc::clone(&recorder) as Arc<dyn Notifier>;
            (recorder, notifier)
        }

        pub(crate) fn messages(&self) -> Vec<(NoticeLevel, String)> {
            self.notices
                .lock()
                .map(|n| n.iter().map(|n| (n.level, n.message.clone())).collect())
                .unwrap_or_default()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            if let Ok(mut n) = self.notices.lock() {
                n.push(notice);
            }
        }
    }

    /// Probe with a fixed answer.
    #[derive(Debug)]
    pub(crate) struct FixedProbe(pub(crate) Option<String>);

    impl MaintenanceProbe for FixedProbe {
        fn check(&self) -> BoxFuture<'_, Option<String>> {
            let answer = self.0.clone();
            async move { answer }.boxed()
        }
    }
}
