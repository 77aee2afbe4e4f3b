//! End-to-end tests against an in-process stub of the diagram service.
//!
//! The stub speaks the production dialect: diagram bodies wrapped in the
//! response envelope, bare auth bodies, bearer-token checks on every
//! diagram route, and server-assigned ids.
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use diaglab::{
    Config, Diagram, DiagramApi, DiagramCreateRequest, DiagramPatch, DiagramStore, DiagramType,
    ExportFormat, ExportOptions, GenerateRequest, NotificationCenter, NotificationKind,
    SessionStore,
};

const STUB_TOKEN: &str = "stub-token-1";
const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nstub-bytes";

#[derive(Clone, Default)]
struct StubState {
    diagrams: Arc<Mutex<Vec<Diagram>>>,
    next_id: Arc<Mutex<u32>>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", STUB_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": "Authentication required" })),
    )
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Diagram not found" })),
    )
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"].as_str() != Some("open sesame") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "token": STUB_TOKEN,
            "expires_in": 3600,
            "user": { "user_id": "u-1", "name": "Ada", "email": email },
        })),
    )
}

async fn signup(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();
    if email.contains("taken") {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already registered" })),
        );
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created",
            "user": { "user_id": "u-2", "name": body["name"], "email": email },
        })),
    )
}

async fn list_diagrams(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let diagrams = state.diagrams.lock().unwrap().clone();
    let total = diagrams.len();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": diagrams,
            "pagination": {
                "total": total,
                "page": query.page.unwrap_or(1),
                "limit": query.limit.unwrap_or(10),
            },
        })),
    )
}

async fn create_diagram(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let id = {
        let mut next = state.next_id.lock().unwrap();
        *next += 1;
        format!("d-{}", *next)
    };

    let now = Utc::now();
    let diagram = Diagram {
        id,
        title: body["title"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().map(str::to_string),
        diagram_type: serde_json::from_value(body["type"].clone()).unwrap_or(DiagramType::Aws),
        code: body["code"].as_str().unwrap_or_default().to_string(),
        image_url: "https://img.stub/saved.png".to_string(),
        created_at: now,
        updated_at: now,
        user_id: "u-1".to_string(),
    };

    state.diagrams.lock().unwrap().insert(0, diagram.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": diagram })),
    )
}

async fn get_diagram(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let diagrams = state.diagrams.lock().unwrap();
    match diagrams.iter().find(|d| d.id == id) {
        Some(diagram) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": diagram })),
        ),
        None => not_found(),
    }
}

async fn update_diagram(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut diagrams = state.diagrams.lock().unwrap();
    let Some(diagram) = diagrams.iter_mut().find(|d| d.id == id) else {
        return not_found();
    };

    if let Some(title) = body["title"].as_str() {
        diagram.title = title.to_string();
    }
    if let Some(description) = body["description"].as_str() {
        diagram.description = Some(description.to_string());
    }
    if let Some(code) = body["code"].as_str() {
        diagram.code = code.to_string();
    }
    if let Ok(diagram_type) = serde_json::from_value(body["type"].clone()) {
        diagram.diagram_type = diagram_type;
    }
    diagram.updated_at = Utc::now();

    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": diagram.clone() })),
    )
}

async fn delete_diagram(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut diagrams = state.diagrams.lock().unwrap();
    let before = diagrams.len();
    diagrams.retain(|d| d.id != id);
    if diagrams.len() == before {
        return not_found();
    }

    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Diagram deleted" })),
    )
}

async fn generate(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let code = body["code"].as_str().unwrap_or_default();
    if code.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Source code is required" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": { "imageUrl": "https://img.stub/generated.png", "diagram": null },
        })),
    )
}

async fn validate(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let code = body["code"].as_str().unwrap_or_default();
    let report = if code.contains("oops") {
        json!({ "valid": false, "errors": ["line 1: unknown statement 'oops'"] })
    } else {
        json!({ "valid": true })
    };

    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": report })),
    )
}

async fn export_diagram(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }

    let exists = state.diagrams.lock().unwrap().iter().any(|d| d.id == id);
    if !exists {
        return not_found().into_response();
    }

    (StatusCode::OK, FAKE_PNG.to_vec()).into_response()
}

async fn load_from_github(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let url = body["url"].as_str().unwrap_or_default();
    if !url.contains("github.com") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Only GitHub URLs are supported" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": { "code": "graph TD;\n  A-->B;", "filename": "flow.mmd" },
        })),
    )
}

async fn spawn_stub() -> SocketAddr {
    let state = StubState::default();

    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/diagrams", get(list_diagrams).post(create_diagram))
        .route("/diagrams/generate", post(generate))
        .route("/diagrams/validate", post(validate))
        .route("/diagrams/load-from-github", post(load_from_github))
        .route(
            "/diagrams/{id}",
            get(get_diagram).put(update_diagram).delete(delete_diagram),
        )
        .route("/diagrams/{id}/export", post(export_diagram))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn stub_config(addr: SocketAddr, state_dir: &std::path::Path) -> Config {
    Config {
        auth_url: format!("http://{}", addr),
        api_url: format!("http://{}", addr),
        state_dir: state_dir.to_path_buf(),
        page_size: 10,
        editor_command: None,
    }
}

fn stub_store(addr: SocketAddr, token: &str) -> (DiagramStore, NotificationCenter) {
    let notifier = NotificationCenter::new();
    let backend = Arc::new(DiagramApi::new(format!("http://{}", addr), token));
    (DiagramStore::new(backend, notifier.clone()), notifier)
}

#[tokio::test]
async fn login_round_trips_through_the_session_store() {
    let addr = spawn_stub().await;
    let dir = tempfile::tempdir().unwrap();
    let config = stub_config(addr, dir.path());

    let mut sessions = SessionStore::new(&config);
    let auth = sessions
        .login("ada@example.com", "open sesame")
        .await
        .unwrap();
    assert_eq!(auth.token, STUB_TOKEN);
    assert_eq!(auth.user.email, "ada@example.com");
    assert!(sessions.is_authenticated());

    // a fresh store picks the session up from disk
    let mut restored = SessionStore::new(&config);
    assert!(restored.restore());
    assert_eq!(restored.token(), Some(STUB_TOKEN));
    assert_eq!(restored.user().unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn rejected_credentials_surface_the_service_message() {
    let addr = spawn_stub().await;
    let dir = tempfile::tempdir().unwrap();
    let config = stub_config(addr, dir.path());

    let mut sessions = SessionStore::new(&config);
    let err = sessions
        .login("ada@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid credentials"));
    assert!(!sessions.is_authenticated());
}

#[tokio::test]
async fn duplicate_registration_is_rejected_with_the_service_message() {
    let addr = spawn_stub().await;
    let dir = tempfile::tempdir().unwrap();
    let config = stub_config(addr, dir.path());

    let sessions = SessionStore::new(&config);
    let response = sessions
        .register("Grace", "grace@example.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(response.message, "Account created");

    let err = sessions
        .register("Grace", "taken@example.com", "hunter2")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Email already registered"));
}

#[tokio::test]
async fn collection_lifecycle_against_the_stub_service() {
    let addr = spawn_stub().await;
    let (mut store, notifier) = stub_store(addr, STUB_TOKEN);

    let first = store
        .create(DiagramCreateRequest {
            title: "Checkout flow".to_string(),
            description: Some("payment path".to_string()),
            diagram_type: DiagramType::Mermaid,
            code: "graph TD;".to_string(),
        })
        .await
        .unwrap();
    let second = store
        .create(DiagramCreateRequest {
            title: "VPC layout".to_string(),
            description: None,
            diagram_type: DiagramType::Aws,
            code: "with Diagram(\"vpc\"): pass".to_string(),
        })
        .await
        .unwrap();

    // newest first, matching what a reload would produce
    let ids: Vec<_> = store.diagrams().iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids, [second.id.clone(), first.id.clone()]);

    let page = store.load(1, 10).await.unwrap().unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(store.diagrams().len(), 2);

    let updated = store
        .update(
            &first.id,
            DiagramPatch {
                title: Some("Checkout flow v2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Checkout flow v2");
    assert!(store
        .diagrams()
        .iter()
        .any(|d| d.title == "Checkout flow v2"));
    assert!(!store.is_stale());

    let fetched = store.fetch(&first.id).await.unwrap();
    assert_eq!(store.current().unwrap().id, fetched.id);

    store.remove(&first.id).await.unwrap();
    assert!(store.diagrams().iter().all(|d| d.id != first.id));
    assert!(store.current().is_none());

    // every confirmed mutation produced a success notification
    let successes = notifier
        .active()
        .iter()
        .filter(|n| n.kind == NotificationKind::Success)
        .count();
    assert_eq!(successes, 4);
}

#[tokio::test]
async fn missing_records_surface_as_api_errors_with_notifications() {
    let addr = spawn_stub().await;
    let (mut store, notifier) = stub_store(addr, STUB_TOKEN);

    let err = store.fetch("missing").await.unwrap_err();
    assert!(err.to_string().contains("Diagram not found"));

    let active = notifier.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, NotificationKind::Error);
    assert!(active[0].message.contains("Diagram not found"));
}

#[tokio::test]
async fn requests_without_a_valid_token_are_rejected() {
    let addr = spawn_stub().await;
    let (mut store, notifier) = stub_store(addr, "expired");

    let err = store.load(1, 10).await.unwrap_err();
    assert!(err.to_string().contains("Authentication required"));
    assert!(store.diagrams().is_empty());
    assert_eq!(notifier.active().len(), 1);
}

#[tokio::test]
async fn generation_yields_a_preview_url() {
    let addr = spawn_stub().await;
    let (mut store, _notifier) = stub_store(addr, STUB_TOKEN);

    let preview = store
        .generate(GenerateRequest {
            code: "graph TD;\n  A-->B;".to_string(),
            diagram_type: DiagramType::Mermaid,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(preview.image_url, "https://img.stub/generated.png");
    assert!(!store.is_generating());
}

#[tokio::test]
async fn validation_reports_come_back_structured() {
    let addr = spawn_stub().await;
    let (store, _notifier) = stub_store(addr, STUB_TOKEN);

    let report = store
        .validate(GenerateRequest {
            code: "oops".to_string(),
            diagram_type: DiagramType::Sql,
        })
        .await
        .unwrap();
    assert!(!report.valid);
    assert!(report
        .errors
        .unwrap()
        .iter()
        .any(|problem| problem.contains("line 1")));

    let clean = store
        .validate(GenerateRequest {
            code: "CREATE TABLE t (id int);".to_string(),
            diagram_type: DiagramType::Sql,
        })
        .await
        .unwrap();
    assert!(clean.valid);
    assert!(clean.errors.is_none());
}

#[tokio::test]
async fn export_downloads_the_rendered_bytes() {
    let addr = spawn_stub().await;
    let (mut store, _notifier) = stub_store(addr, STUB_TOKEN);

    let created = store
        .create(DiagramCreateRequest {
            title: "Exportable".to_string(),
            description: None,
            diagram_type: DiagramType::Er,
            code: "[Person]".to_string(),
        })
        .await
        .unwrap();

    let bytes = store
        .export(&created.id, &ExportOptions::new(ExportFormat::Png))
        .await
        .unwrap();
    assert_eq!(bytes, FAKE_PNG);
}

#[tokio::test]
async fn import_fetches_source_from_a_repository_url() {
    let addr = spawn_stub().await;
    let (store, _notifier) = stub_store(addr, STUB_TOKEN);

    let source = store
        .fetch_source("https://github.com/acme/diagrams/blob/main/flow.mmd")
        .await
        .unwrap();
    assert_eq!(source.filename, "flow.mmd");
    assert!(source.code.starts_with("graph TD"));

    let err = store
        .fetch_source("https://example.com/private.mmd")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Only GitHub URLs are supported"));
}
