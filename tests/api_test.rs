use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

use wellknown::api::models::{CheckTypeResponse, SaveResponse, SettingsResponse};
use wellknown::api::router;
use wellknown::api::state::AppState;
use wellknown::config::Config;
use wellknown::field::ErrorCode;
use wellknown::providers::{ProviderRegistry, StaticProvider};
use wellknown::settings::FjallConfigStore;

/// Config parsed from TOML, bypassing file and environment sources
fn create_test_config(extra: &str) -> Config {
    let config_toml = format!(
        r#"
[site]
charset = "UTF-8"

{extra}
        "#
    );

    toml::from_str(&config_toml).expect("Failed to parse test config")
}

/// Builds a test app backed by a Fjall store in a temp directory
fn build_test_app_with(config: Config, providers: ProviderRegistry) -> (Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = FjallConfigStore::open(temp_dir.path().join("settings"))
        .expect("Failed to open test settings store");

    let state = AppState::new(config, Arc::new(store), providers);
    (router(state), temp_dir)
}

fn build_test_app() -> (Router, TempDir) {
    build_test_app_with(create_test_config(""), ProviderRegistry::new())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

fn save_json(form: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri("/admin/settings")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&form).unwrap()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    ServiceExt::<Request<Body>>::oneshot(app.clone(), request)
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_not_configured() {
    let (app, _temp_dir) = build_test_app();

    let response = send(&app, get("/.well-known/host-meta")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&response), "text/plain; charset=UTF-8");
    assert_eq!(body_text(response).await, "Not configured");
}

#[tokio::test]
async fn test_save_then_serve() {
    let (app, _temp_dir) = build_test_app();

    let response = send(
        &app,
        save_json(json!({
            "suffix_1": "host-meta",
            "type_1": "Application/xrd+xml",
            "contents_1": "<XRD/>",
            "suffix_2": "security.txt",
            "type_2": "",
            "contents_2": "Contact: mailto:security@example.com",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    let saved: SaveResponse = serde_json::from_str(&body).unwrap();
    assert!(saved.errors.is_empty());
    assert_eq!(saved.revision.entries, 2);
    assert_eq!(saved.entries[0].content_type, "application/xrd+xml");

    let response = send(&app, get("/.well-known/host-meta")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/xrd+xml");
    assert_eq!(body_text(response).await, "<XRD/>");

    // prefix match, not path-segment aware
    let response = send(&app, get("/.well-known/host-meta.json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<XRD/>");

    let response = send(&app, get("/.well-known/security.txt")).await;
    assert_eq!(content_type(&response), "text/plain; charset=UTF-8");
    assert_eq!(
        body_text(response).await,
        "Contact: mailto:security@example.com"
    );

    let response = send(&app, get("/.well-known/nodeinfo")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&response), "text/plain; charset=UTF-8");
    assert_eq!(body_text(response).await, "Not Found");
}

#[tokio::test]
async fn test_first_entry_wins() {
    let (app, _temp_dir) = build_test_app();

    send(
        &app,
        save_json(json!({
            "suffix_1": "host",
            "contents_1": "short",
            "suffix_2": "host-meta",
            "contents_2": "specific",
        })),
    )
    .await;

    let response = send(&app, get("/.well-known/host-meta")).await;
    assert_eq!(body_text(response).await, "short");
}

#[tokio::test]
async fn test_decoded_suffix_is_matched() {
    let (app, _temp_dir) = build_test_app();

    send(
        &app,
        save_json(json!({ "suffix_1": "my doc", "contents_1": "spaced" })),
    )
    .await;

    let response = send(&app, get("/.well-known/my%20doc")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "spaced");
}

#[tokio::test]
async fn test_form_save_reports_field_errors_and_keeps_other_fields() {
    let (app, _temp_dir) = build_test_app();

    let request = Request::builder()
        .uri("/admin/settings")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "suffix_1=a%2Fb&contents_1=hello&suffix_2=ok&type_2=image%2Fpng&contents_2=fine",
        ))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let saved: SaveResponse = serde_json::from_str(&body_text(response).await).unwrap();
    let codes: Vec<(&str, ErrorCode)> = saved
        .errors
        .iter()
        .map(|e| (e.field.as_str(), e.code))
        .collect();
    assert_eq!(
        codes,
        vec![
            ("suffix_1", ErrorCode::InvalidSuffix),
            ("type_2", ErrorCode::InvalidMimeType),
        ]
    );

    // row 1 had no previous suffix, so it is dropped and row 2 moves up
    assert_eq!(saved.entries.len(), 1);
    assert_eq!(saved.entries[0].index, 1);
    assert_eq!(saved.entries[0].suffix, "ok");
    assert_eq!(saved.entries[0].content_type, "");
    assert_eq!(saved.entries[0].contents, "fine");

    let response = send(&app, get("/.well-known/a/b")).await;
    assert_eq!(body_text(response).await, "Not Found");
}

#[tokio::test]
async fn test_deleting_a_row_renumbers() {
    let (app, _temp_dir) = build_test_app();

    send(
        &app,
        save_json(json!({
            "suffix_1": "one", "contents_1": "1",
            "suffix_2": "two", "contents_2": "2",
            "suffix_3": "three", "contents_3": "3",
        })),
    )
    .await;

    send(
        &app,
        save_json(json!({
            "suffix_1": "one", "contents_1": "1",
            "suffix_2": "", "contents_2": "2",
            "suffix_3": "three", "contents_3": "3",
        })),
    )
    .await;

    let response = send(&app, get("/admin/settings")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let settings: SettingsResponse = serde_json::from_str(&body_text(response).await).unwrap();

    assert_eq!(settings.entries.len(), 2);
    assert_eq!(settings.entries[1].index, 2);
    assert_eq!(settings.entries[1].suffix, "three");
    assert_eq!(settings.entries[1].contents, "3");
    assert_eq!(settings.form.get("suffix_3"), None);
    assert_eq!(settings.default_content_type, "text/plain; charset=UTF-8");
}

#[tokio::test]
async fn test_save_rejects_unsupported_content_type() {
    let (app, _temp_dir) = build_test_app();

    let request = Request::builder()
        .uri("/admin/settings")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("suffix_1=a"))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn test_save_body_limit() {
    let config = create_test_config("[server]\nmax_body_bytes = 64\n");
    let (app, _temp_dir) = build_test_app_with(config, ProviderRegistry::new());

    let response = send(
        &app,
        save_json(json!({ "suffix_1": "a", "contents_1": "x".repeat(256) })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_admin_token_required_when_configured() {
    let mut config = create_test_config("");
    config.admin.token = Some("s3cret".to_string());
    let (app, _temp_dir) = build_test_app_with(config, ProviderRegistry::new());

    let response = send(&app, get("/admin/settings")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/admin/settings")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/admin/settings")
        .header(header::AUTHORIZATION, "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.status(), StatusCode::OK);

    // the public route stays open
    let response = send(&app, get("/.well-known/anything")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_disabled() {
    let config = create_test_config("[admin]\nenabled = false\n");
    let (app, _temp_dir) = build_test_app_with(config, ProviderRegistry::new());

    let response = send(&app, get("/admin/settings")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_content_type() {
    let (app, _temp_dir) = build_test_app();

    let request = Request::builder()
        .uri("/admin/content-type")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "value": "text/" }).to_string()))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let checked: CheckTypeResponse = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(!checked.valid);
    assert_eq!(checked.normalized, "");
    let codes: Vec<ErrorCode> = checked.errors.iter().map(|e| e.code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::MissingMimeSubtype, ErrorCode::InvalidMimeSubtype]
    );
}

#[tokio::test]
async fn test_provider_answers_after_entries() {
    let mut providers = ProviderRegistry::new();
    providers.register(
        "nodeinfo",
        Arc::new(StaticProvider::new(Some("application/json"), "{\"links\":[]}")),
    );
    let (app, _temp_dir) = build_test_app_with(create_test_config(""), providers);

    let response = send(&app, get("/.well-known/nodeinfo")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json");
    assert_eq!(body_text(response).await, "{\"links\":[]}");

    send(
        &app,
        save_json(json!({ "suffix_1": "node", "contents_1": "configured" })),
    )
    .await;

    let response = send(&app, get("/.well-known/nodeinfo")).await;
    assert_eq!(body_text(response).await, "configured");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _temp_dir) = build_test_app();

    send(&app, get("/.well-known/missing")).await;

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let health: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(health.get("status").and_then(|v| v.as_str()), Some("healthy"));
    assert!(health.get("version").is_some());

    let components = health.get("components").unwrap().as_object().unwrap();
    assert!(components.contains_key("api"));
    assert!(components.contains_key("store"));

    assert_eq!(health["metrics"]["not_configured"], 1);
}
