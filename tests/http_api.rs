//! HTTP round trips against a mock backend.
//!
//! Serves the list, mutation and maintenance endpoints with `axum` on a
//! random local port and drives the `reqwest` client through them.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

use fitlist::api::dto::{FoodDto, ListRequest};
use fitlist::api::{HttpResourceApi, ListApi, MutationApi, Resource};
use fitlist::config::ClientConfig;
use fitlist::domain::{EventBus, ItemAction, ItemId};
use fitlist::error::ClientError;
use fitlist::forms::TicketForm;
use fitlist::notify::{
    ErrorReporter, HttpMaintenanceProbe, NoticeLevel, NotificationCenter, Notifier,
};
use fitlist::service::{AlwaysConfirm, ControllerOptions, ListController, ListView};

#[derive(Debug, Default)]
struct Backend {
    log: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
}

impl Backend {
    fn record(&self, line: String) {
        self.log.lock().unwrap().push(line);
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

type Shared = Arc<Backend>;

fn food_names() -> Vec<String> {
    let mut names = vec![
        "Chicken breast".to_string(),
        "Chicken thigh".to_string(),
        "Chickpeas".to_string(),
    ];
    names.extend((4..=23).map(|n| format!("Oats {n}")));
    names
}

fn param(params: &HashMap<String, String>, key: &str, default: usize) -> usize {
    params.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

async fn list_foods(
    State(backend): State<Shared>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.record(format!("GET /api/foods?{}", raw.unwrap_or_default()));

    let search = params
        .get("SearchTerm")
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    let matching: Vec<(usize, String)> = food_names()
        .into_iter()
        .enumerate()
        .filter(|(_, name)| name.to_lowercase().contains(&search))
        .collect();
    let page = param(&params, "PageNumber", 1);
    let size = param(&params, "PageSize", 10);
    let foods: Vec<Value> = matching
        .iter()
        .skip((page - 1) * size)
        .take(size)
        .map(|(i, name)| {
            json!({
                "id": Uuid::from_u128(*i as u128 + 1),
                "name": name,
                "calories": 120.5,
                "protein": 20.0,
                "unusedField": true,
            })
        })
        .collect();

    Json(json!({
        "statusCode": 200,
        "data": {
            "foods": foods,
            "totalCount": matching.len(),
            "totalPages": matching.len().div_ceil(size),
        }
    }))
}

async fn search_payouts(State(backend): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    backend.record("POST /api/payouts/search".to_string());
    backend.bodies.lock().unwrap().push(body);
    Json(json!({
        "statusCode": 200,
        "data": {
            "payouts": [{ "id": Uuid::from_u128(7), "amount": 250.0, "status": "Paid" }],
            "totalCount": 1,
            "totalPages": 1,
        }
    }))
}

async fn list_groups_invalid() -> impl IntoResponse {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "message": "Validation failed",
            "errors": {
                "PageSize": ["Page size must be at most 50"],
                "SortBy": ["Unknown sort field"],
            }
        })),
    )
}

async fn join_group(State(backend): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    backend.record(format!("POST /api/groups/{id}/join"));
    Json(json!({ "statusCode": 200, "message": "Joined" }))
}

async fn leave_group(State(backend): State<Shared>, Path(id): Path<String>) -> impl IntoResponse {
    backend.record(format!("POST /api/groups/{id}/leave"));
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "You are not a member of this group" })),
    )
}

async fn list_tickets_broken() -> Json<Value> {
    Json(json!({ "statusCode": 500, "message": "Database unavailable" }))
}

async fn create_ticket(
    State(backend): State<Shared>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    backend.record("POST /api/tickets".to_string());
    backend.bodies.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(json!({ "statusCode": 201 })))
}

async fn delete_ticket(State(backend): State<Shared>, Path(id): Path<String>) -> StatusCode {
    backend.record(format!("DELETE /api/tickets/{id}"));
    StatusCode::NO_CONTENT
}

async fn list_requests_down() -> impl IntoResponse {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "message": "Service Unavailable" })),
    )
}

async fn update_request(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.record(format!("PATCH /api/trainer/service-requests/{id}"));
    backend.bodies.lock().unwrap().push(body);
    Json(json!({ "statusCode": 200 }))
}

async fn maintenance() -> Json<Value> {
    Json(json!({ "isMaintenance": true, "message": "Back at 5pm" }))
}

async fn spawn_backend() -> (String, Shared) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/foods", get(list_foods))
        .route("/api/payouts/search", post(search_payouts))
        .route("/api/groups", get(list_groups_invalid))
        .route("/api/groups/{id}/join", post(join_group))
        .route("/api/groups/{id}/leave", post(leave_group))
        .route("/api/tickets", get(list_tickets_broken).post(create_ticket))
        .route("/api/tickets/{id}", delete(delete_ticket))
        .route("/api/trainer/service-requests", get(list_requests_down))
        .route("/api/trainer/service-requests/{id}", patch(update_request))
        .route("/api/maintenance", get(maintenance))
        .with_state(Arc::clone(&backend));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}"), backend)
}

fn api<T>(base: &str, resource: Resource) -> HttpResourceApi<T> {
    HttpResourceApi::new(reqwest::Client::new(), base, resource)
}

#[tokio::test]
async fn get_list_sends_pascal_case_query() {
    let (base, backend) = spawn_backend().await;
    let foods = api::<FoodDto>(&base, Resource::foods());

    let page = foods.list(&ListRequest::page(2, 10)).await.unwrap();
    assert_eq!(page.items().len(), 10);
    assert_eq!(page.total_count(), 23);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.items()[0].name, "Oats 11");

    let log = backend.log();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("PageNumber=2"));
    assert!(log[0].contains("PageSize=10"));
    assert!(!log[0].contains("SearchTerm"));
}

#[tokio::test]
async fn search_term_filters_server_side() {
    let (base, _backend) = spawn_backend().await;
    let foods = api::<FoodDto>(&base, Resource::foods());

    let request = ListRequest {
        search_term: Some("chick".to_string()),
        ..ListRequest::page(1, 10)
    };
    let page = foods.list(&request).await.unwrap();
    assert_eq!(page.total_count(), 3);
    assert_eq!(page.total_pages(), 1);
}

#[tokio::test]
async fn post_list_sends_json_body() {
    let (base, backend) = spawn_backend().await;
    let payouts = api::<Value>(&base, Resource::payouts());

    let request = ListRequest {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        status: Some("Paid".to_string()),
        ..ListRequest::page(1, 20)
    };
    let page = payouts.list(&request).await.unwrap();
    assert_eq!(page.items().len(), 1);

    let body = &backend.bodies()[0];
    assert_eq!(body["PageNumber"], 1);
    assert_eq!(body["PageSize"], 20);
    assert_eq!(body["StartDate"], "2024-01-01");
    assert_eq!(body["Status"], "Paid");
    assert!(body.get("EndDate").is_none());
}

#[tokio::test]
async fn failing_envelope_status_is_an_error() {
    let (base, _backend) = spawn_backend().await;
    let tickets = api::<Value>(&base, Resource::tickets());

    let err = tickets.list(&ListRequest::page(1, 10)).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_messages(), vec!["Database unavailable".to_string()]);
}

#[tokio::test]
async fn field_errors_become_messages() {
    let (base, _backend) = spawn_backend().await;
    let groups = api::<Value>(&base, Resource::groups());

    let err = groups.list(&ListRequest::page(1, 500)).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.user_messages(),
        vec![
            "Page size must be at most 50".to_string(),
            "Unknown sort field".to_string(),
        ]
    );
}

#[tokio::test]
async fn mutations_map_to_routes() {
    let (base, backend) = spawn_backend().await;
    let id = ItemId::from_uuid(Uuid::from_u128(42));

    let groups = api::<Value>(&base, Resource::groups());
    groups.mutate(id, &ItemAction::Join).await.unwrap();
    let err = groups.mutate(id, &ItemAction::Leave).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_messages(),
        vec!["You are not a member of this group".to_string()]
    );

    let tickets = api::<Value>(&base, Resource::tickets());
    tickets.mutate(id, &ItemAction::Delete).await.unwrap();

    let requests = api::<Value>(&base, Resource::service_requests());
    requests.mutate(id, &ItemAction::Approve).await.unwrap();

    assert_eq!(
        backend.log(),
        vec![
            format!("POST /api/groups/{id}/join"),
            format!("POST /api/groups/{id}/leave"),
            format!("DELETE /api/tickets/{id}"),
            format!("PATCH /api/trainer/service-requests/{id}"),
        ]
    );
    assert_eq!(backend.bodies(), vec![json!({ "status": "Approved" })]);
}

#[tokio::test]
async fn transport_failure_has_generic_message() {
    let foods = api::<Value>("http://127.0.0.1:9", Resource::foods());
    let err = foods.list(&ListRequest::page(1, 10)).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(
        err.user_messages(),
        vec!["Unable to reach the server. Please try again.".to_string()]
    );
}

#[tokio::test]
async fn validated_ticket_is_posted() {
    let (base, backend) = spawn_backend().await;
    let form = TicketForm {
        title: "  Sync broken ".to_string(),
        description: "Workouts from my watch stopped syncing.".to_string(),
        category: "technical".to_string(),
        priority: "Medium".to_string(),
    };
    let ticket = form.validate_input().unwrap();
    api::<Value>(&base, Resource::tickets())
        .create(&ticket)
        .await
        .unwrap();

    assert_eq!(
        backend.bodies(),
        vec![json!({
            "title": "Sync broken",
            "description": "Workouts from my watch stopped syncing.",
            "category": "Technical",
            "priority": "Medium",
        })]
    );
}

#[tokio::test]
async fn invalid_ticket_never_reaches_backend() {
    let (_base, backend) = spawn_backend().await;
    let form = TicketForm {
        title: "Hi".to_string(),
        ..TicketForm::default()
    };
    let err = form.validate_input().unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(backend.log().is_empty());
}

fn controller_for(
    base: &str,
    resource: Resource,
    reporter: ErrorReporter,
    events: EventBus,
) -> Arc<ListController<Value>> {
    let config = ClientConfig {
        api_base_url: base.to_string(),
        ..ClientConfig::default()
    };
    ListController::http(
        resource,
        reqwest::Client::new(),
        &config,
        reporter,
        Arc::new(AlwaysConfirm),
        events,
        ControllerOptions::from_config(&config),
    )
}

#[tokio::test]
async fn controller_pages_through_foods() {
    let (base, backend) = spawn_backend().await;
    let events = EventBus::new(64);
    let center = Arc::new(NotificationCenter::new(events.clone()));
    let reporter = ErrorReporter::new(Arc::clone(&center) as Arc<dyn Notifier>);
    let controller = controller_for(&base, Resource::foods(), reporter, events);

    assert!(controller.refresh().await.is_applied());
    assert!(controller.set_page(3).await.is_some());
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.view(), ListView::Populated);
    assert_eq!(snapshot.result.items().len(), 3);
    assert_eq!(snapshot.window.map(|w| w.current_page), Some(3));

    assert!(controller.set_search("chick").await.is_some());
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.query.page(), 1);
    assert_eq!(snapshot.result.total_count(), 3);
    assert!(snapshot.window.is_none());

    let log = backend.log();
    assert_eq!(log.len(), 3);
    assert!(log[2].contains("SearchTerm=chick"));
    assert!(log[2].contains("PageNumber=1"));
    assert!(center.active().is_empty());
}

#[tokio::test]
async fn maintenance_probe_replaces_error_notice() {
    let (base, _backend) = spawn_backend().await;
    let events = EventBus::new(64);
    let center = Arc::new(NotificationCenter::new(events.clone()));
    let probe =
        HttpMaintenanceProbe::new(reqwest::Client::new(), format!("{base}/api/maintenance"));
    let reporter = ErrorReporter::new(Arc::clone(&center) as Arc<dyn Notifier>)
        .with_maintenance_probe(503, Arc::new(probe));
    let controller = controller_for(&base, Resource::service_requests(), reporter, events);

    let _ = controller.refresh().await;
    assert!(matches!(controller.view().await, ListView::Failed(_)));

    let notices = center.active();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(notices[0].message, "Back at 5pm");
}
