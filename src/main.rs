//! fitlist command-line entry point.
//!
//! Fetches one page of a resource list and prints it with its pagination
//! controls:
//!
//! ```text
//! fitlist [RESOURCE] [SEARCH]
//! fitlist comments <POST_ID>
//! ```

use std::sync::Arc;

use anyhow::{Context, anyhow};
use tracing_subscriber::EnvFilter;

use fitlist::api::dto::GroupDto;
use fitlist::api::{HttpResourceApi, ListApi, Resource, build_http_client};
use fitlist::config::ClientConfig;
use fitlist::domain::{EventBus, ItemId, PageControl};
use fitlist::notify::{ErrorReporter, HttpMaintenanceProbe, NotificationCenter, Notifier};
use fitlist::service::{
    AlwaysConfirm, CommentFeed, ControllerOptions, FeedOutcome, ListController, ListView,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClientConfig::from_env().context("loading configuration")?;
    let client = build_http_client(&config)?;
    tracing::info!(base_url = %config.api_base_url, "starting fitlist");

    let events = EventBus::new(config.event_bus_capacity);
    let center = Arc::new(NotificationCenter::new(events.clone()));
    let mut reporter = ErrorReporter::new(Arc::clone(&center) as Arc<dyn Notifier>);
    if let Some(url) = &config.maintenance_probe_url {
        reporter = reporter.with_maintenance_probe(
            config.maintenance_status,
            Arc::new(HttpMaintenanceProbe::new(client.clone(), url.as_str())),
        );
    }

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "foods".to_string());

    if name == "comments" {
        let post_id: ItemId = args
            .next()
            .ok_or_else(|| anyhow!("usage: fitlist comments <POST_ID>"))?
            .parse()
            .context("post id must be a UUID")?;
        let api = HttpResourceApi::<serde_json::Value>::new(
            client,
            &config.api_base_url,
            Resource::post_comments(post_id),
        );
        let feed = CommentFeed::new(
            Arc::new(api) as Arc<dyn ListApi<serde_json::Value>>,
            config.page_sizes.default_size(),
            config.comment_retry(),
            reporter,
        );
        if let FeedOutcome::Loaded { added } = feed.load_more().await {
            tracing::info!(added, "comments loaded");
        }
        println!("{}", serde_json::to_string_pretty(&feed.items().await)?);
        if feed.has_more().await {
            println!("(more comments available)");
        }
    } else {
        let resource = Resource::by_name(&name).ok_or_else(|| {
            let known: Vec<&str> = Resource::catalog().iter().map(|r| r.name).collect();
            anyhow!("unknown resource `{name}`; expected one of {}", known.join(", "))
        })?;
        let controller = ListController::<serde_json::Value>::http(
            resource,
            client,
            &config,
            reporter,
            Arc::new(AlwaysConfirm),
            events,
            ControllerOptions::from_config(&config),
        );
        if controller.resource().name == Resource::groups().name {
            controller.track_membership(GroupDto::membership_in_json);
        }

        let search = args.collect::<Vec<_>>().join(" ");
        if controller.set_search(&search).await.is_none() {
            let _ = controller.refresh().await;
        }

        let snapshot = controller.snapshot().await;
        match snapshot.view() {
            ListView::Populated => {
                println!("{}", serde_json::to_string_pretty(snapshot.result.items())?);
                println!(
                    "page {} of {} ({} total)",
                    snapshot.query.page(),
                    snapshot.result.total_pages(),
                    snapshot.result.total_count()
                );
                if let Some(window) = snapshot.window {
                    println!("{}", render_controls(&window.controls()));
                }
            }
            ListView::Empty => println!("No {}s found.", controller.resource().noun),
            ListView::Failed(message) => println!("Failed to load: {message}"),
            ListView::Loading => {}
        }
    }

    for notice in center.active() {
        eprintln!("[{:?}] {}", notice.level, notice.message);
    }
    Ok(())
}

fn render_controls(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|c| match c {
            PageControl::First => "«".to_string(),
            PageControl::Ellipsis => "…".to_string(),
            PageControl::Page(n) => n.to_string(),
            PageControl::Last(n) => format!("» {n}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
