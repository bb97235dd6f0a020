use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashboard_cell::services::fetcher::{CONSULTATIONS_PATH, DOCTORS_PATH};
use dashboard_cell::{dashboard_routes, features_routes, DashboardState};
use shared_utils::test_utils::{signed_in_storage, MockBackendResponses, TestConfig, TestUser};
use video_conferencing_cell::test_support::{recording_adapter, StubScriptSource, WidgetStats};

struct TestApp {
    _server: MockServer,
    router: Router,
    stats: Arc<WidgetStats>,
}

async fn test_app() -> TestApp {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CONSULTATIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::consultation("sched-1", "scheduled", "2099-01-01T00:00:00Z"),
            MockBackendResponses::consultation("done-1", "completed", "2020-01-01T00:00:00Z"),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DOCTORS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::doctors(2)))
        .mount(&server)
        .await;

    let (calls, stats, _) = recording_adapter(Arc::new(StubScriptSource::instant()));
    let state = Arc::new(DashboardState::new(
        TestConfig::with_api_base_url(&server.uri()).to_arc(),
        signed_in_storage("test-token", &TestUser::named("Asha")),
        calls,
    ));

    let router = Router::new()
        .nest("/dashboard", dashboard_routes(state.clone()))
        .nest("/features", features_routes(state));

    TestApp {
        _server: server,
        router,
        stats,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    // Extractor rejections come back as plain text.
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_dashboard_starts_on_overview() {
    let app = test_app().await;

    let (status, body) = send(&app.router, Method::GET, "/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active_tab"], "overview");
    assert_eq!(body["panel"]["tab"], "overview");
    assert_eq!(body["call"]["phase"], "idle");
    assert_eq!(body["call"]["in_call"], false);
}

#[tokio::test]
async fn test_refresh_then_consultations_tab() {
    let app = test_app().await;

    let (status, report) = send(&app.router, Method::POST, "/dashboard/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["consultations"]["status"], "updated");
    assert_eq!(report["consultations"]["count"], 2);
    assert_eq!(report["doctors"]["count"], 2);

    let (status, body) = send(&app.router, Method::PUT, "/dashboard/tabs/consultations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["panel"]["tab"], "consultations");
    assert_eq!(
        body["panel"]["content"]["consultations"][0]["join_room"],
        "NiramyaConsultation_sched-1"
    );
}

#[tokio::test]
async fn test_unknown_tab_is_rejected() {
    let app = test_app().await;

    let (status, _) = send(&app.router, Method::PUT, "/dashboard/tabs/billing", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_and_end_call_through_widget_event() {
    let app = test_app().await;
    send(&app.router, Method::POST, "/dashboard/refresh", None).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/dashboard/consultations/sched-1/join",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["outcome"], "started");
    assert_eq!(body["call"]["in_call"], true);
    assert_eq!(body["call"]["embed"]["room_name"], "NiramyaConsultation_sched-1");

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/dashboard/call/events",
        Some(json!({ "event": "readyToClose" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["listeners_fired"], 1);
    assert_eq!(body["call"]["phase"], "idle");
    assert_eq!(app.stats.live(), 0);
}

#[tokio::test]
async fn test_join_errors_map_to_status_codes() {
    let app = test_app().await;
    send(&app.router, Method::POST, "/dashboard/refresh", None).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/dashboard/consultations/done-1/join",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("done-1"));

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/dashboard/consultations/nope/join",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_and_hang_up() {
    let app = test_app().await;

    let (status, body) = send(&app.router, Method::POST, "/dashboard/consultations/book", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["room_name"]
        .as_str()
        .unwrap()
        .starts_with("NiramyaConsultation_"));

    let (_, call) = send(&app.router, Method::GET, "/dashboard/call", None).await;
    assert_eq!(call["phase"], "active");

    let (status, call) = send(&app.router, Method::DELETE, "/dashboard/call", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(call["phase"], "idle");
    assert_eq!(call["embed"], Value::Null);

    // Hanging up twice is harmless.
    let (status, _) = send(&app.router, Method::DELETE, "/dashboard/call", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_features_page() {
    let app = test_app().await;

    let (status, body) = send(&app.router, Method::GET, "/features", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"].as_array().unwrap().len(), 6);
    assert_eq!(body["call_to_action"]["url"], "http://localhost:5173/");
}
