// insiders-client/tests/upload_flow.rs
// Integration tests against an in-process mock backend

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use insiders_client::{
    ClientConfig, ClientError, CustomerDraft, CustomerId, CustomerUpdate, InsidersClient,
    ResponseShape, RowSource, SessionContext,
};
use serde_json::{Value, json};
use shared::FixedFields;
use tempfile::TempDir;

/// Serve `app` under `/api` on an ephemeral port
async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().nest("/api", app))
            .await
            .unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> InsidersClient {
    InsidersClient::new(ClientConfig::new(format!("http://{addr}/api")).with_timeout(5)).unwrap()
}

/// Upload endpoint that always answers `status` / `body`
fn upload_router(status: StatusCode, body: &'static str) -> Router {
    Router::new().route(
        "/customers/upload-csv",
        post(move || async move { (status, body) }),
    )
}

// ========== Upload ==========

#[tokio::test]
async fn test_bare_array_used_directly() {
    let addr = spawn(upload_router(StatusCode::OK, r#"[{"id":1,"email":"a@b.com"}]"#)).await;
    let outcome = client(addr)
        .upload_bytes("customers.csv", b"name\nSomeone Else\n".to_vec())
        .await
        .unwrap();

    assert_eq!(outcome.source, RowSource::Backend(ResponseShape::BareArray));
    assert_eq!(outcome.records.len(), 1);
    let record = outcome.records[0].as_fixed().unwrap();
    assert_eq!(record.id, CustomerId::Int(1));
    assert_eq!(record.email, "a@b.com");
    assert_eq!(record.name, "");
}

#[tokio::test]
async fn test_empty_object_falls_back_to_file_text() {
    let addr = spawn(upload_router(StatusCode::OK, "{}")).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("customers.csv");
    std::fs::write(&path, "ID,Name,Phone,Points\n1,Jane Doe,555-1234,150\n").unwrap();

    let outcome = client(addr).upload_customers(&path).await.unwrap();

    assert_eq!(outcome.source, RowSource::ClientFallback);
    let jane = outcome.records[0].as_fixed().unwrap();
    assert_eq!(jane.name, "Jane Doe");
    assert_eq!(jane.phone, "555-1234");
    assert_eq!(jane.earned_points, 150);
    assert_eq!(jane.total_visits, 0);
    assert_eq!(jane.total_spend, 0.0);
    assert!(!jane.is_employee);
}

#[tokio::test]
async fn test_header_only_file_is_no_data() {
    let addr = spawn(upload_router(StatusCode::OK, r#"{"message":"Uploaded"}"#)).await;
    let err = client(addr)
        .upload_bytes("customers.csv", b"id,name,phone\n".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoDataFound));
    assert_eq!(err.to_string(), "No data found in uploaded file");
}

#[tokio::test]
async fn test_error_message_from_json_body() {
    let addr = spawn(upload_router(
        StatusCode::BAD_REQUEST,
        r#"{"message":"Invalid file format"}"#,
    ))
    .await;
    let err = client(addr)
        .upload_bytes("customers.csv", b"a\n1\n".to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Invalid file format");
}

#[tokio::test]
async fn test_error_without_body_uses_status() {
    let addr = spawn(upload_router(StatusCode::BAD_GATEWAY, "")).await;
    let err = client(addr)
        .upload_bytes("customers.csv", b"a\n1\n".to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Upload failed (502)");
}

// ========== CRUD ==========

type Store = Arc<Mutex<Vec<Value>>>;

async fn list(State(store): State<Store>) -> Json<Value> {
    let customers = store.lock().unwrap().clone();
    Json(json!({ "data": customers }))
}

async fn create(State(store): State<Store>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut customers = store.lock().unwrap();
    let next = customers
        .iter()
        .filter_map(|c| c["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1;
    body["id"] = json!(next);
    customers.push(body.clone());
    Json(json!({ "data": body }))
}

async fn fetch(State(store): State<Store>, Path(id): Path<i64>) -> Response {
    let customers = store.lock().unwrap();
    match customers.iter().find(|c| c["id"] == id) {
        Some(c) => Json(json!({ "data": c })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "message": "Customer not found" } })),
        )
            .into_response(),
    }
}

async fn update(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    let mut customers = store.lock().unwrap();
    let Some(customer) = customers.iter_mut().find(|c| c["id"] == id) else {
        return (StatusCode::NOT_FOUND, "Customer not found").into_response();
    };
    if let (Some(target), Some(fields)) = (customer.as_object_mut(), patch.as_object()) {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
    "Customer updated".into_response()
}

async fn remove(State(store): State<Store>, Path(id): Path<i64>) -> Json<Value> {
    store.lock().unwrap().retain(|c| c["id"] != id);
    Json(json!({ "message": "Customer deleted", "success": true }))
}

async fn remove_all(State(store): State<Store>) -> StatusCode {
    store.lock().unwrap().clear();
    StatusCode::NO_CONTENT
}

fn crud_router() -> Router {
    Router::new()
        .route("/customers", get(list).post(create).delete(remove_all))
        .route("/customers/{id}", get(fetch).put(update).delete(remove))
        .with_state(Store::default())
}

#[tokio::test]
async fn test_crud_round_trip() {
    let addr = spawn(crud_router()).await;
    let client = client(addr);
    assert!(client.list_customers().await.unwrap().is_empty());

    let mut fields = FixedFields::new(CustomerId::Int(0));
    fields.name = "Ann".into();
    fields.email = "ann@x.com".into();
    fields.earned_points = 40;
    let added = client
        .add_customer(&CustomerDraft::new(fields.into()).with_password("pw"))
        .await
        .unwrap();
    assert_eq!(added.id(), &CustomerId::Int(1));

    let update = CustomerUpdate {
        earned_points: Some(1200),
        ..Default::default()
    };
    let ack = client.update_customer(added.id(), &update).await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Customer updated"));
    assert_eq!(ack.success, Some(true));

    let fetched = client.get_customer(added.id()).await.unwrap();
    let fetched = fetched.as_fixed().unwrap();
    assert_eq!(fetched.name, "Ann");
    assert_eq!(fetched.earned_points, 1200);
    assert_eq!(fetched.tier().as_str(), "Gold");

    let ack = client.delete_customer(added.id()).await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Customer deleted"));
    let err = client.get_customer(added.id()).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref m) if m == "Customer not found"));

    client.add_customer(&CustomerDraft::new(FixedFields::new(CustomerId::Int(0)).into())).await.unwrap();
    let ack = client.delete_all_customers().await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("All customers deleted"));
    assert!(client.list_customers().await.unwrap().is_empty());
}

// ========== Session ==========

const ADMIN_COOKIE: &str = "sid=admin-1";

async fn signin(Form(login): Form<HashMap<String, String>>) -> Response {
    if login.get("password").map(String::as_str) != Some("letmein") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    }
    (
        [(header::SET_COOKIE, format!("{ADMIN_COOKIE}; Path=/"))],
        Json(json!({ "success": true, "message": "Signed in" })),
    )
        .into_response()
}

async fn guarded_list(headers: HeaderMap) -> Response {
    let authed = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(ADMIN_COOKIE));
    if !authed {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Not authenticated" })),
        )
            .into_response();
    }
    Json(json!([{ "id": 1, "name": "Ann" }])).into_response()
}

fn auth_router() -> Router {
    Router::new()
        .route("/auth/signin", post(signin))
        .route("/customers", get(guarded_list))
        .route("/customers/{id}", put(|| async { "ok" }))
}

#[tokio::test]
async fn test_session_lifecycle() {
    let addr = spawn(auth_router()).await;
    let dir = TempDir::new().unwrap();

    let mut session = SessionContext::load(dir.path()).unwrap();
    let err = client(addr)
        .admin_login("boss@bk.com", "wrong", &mut session)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Invalid email or password"));
    assert!(session.require_admin().is_err());

    client(addr)
        .admin_login("boss@bk.com", "letmein", &mut session)
        .await
        .unwrap();
    assert!(session.cookies().unwrap().contains(ADMIN_COOKIE));

    // A later run picks the session back up from disk
    let restored = SessionContext::load(dir.path()).unwrap();
    assert_eq!(restored.require_admin().unwrap(), "boss@bk.com");

    let fresh = client(addr);
    assert!(matches!(
        fresh.list_customers().await.unwrap_err(),
        ClientError::Unauthorized(_)
    ));
    fresh.attach_session(&restored);
    assert_eq!(fresh.list_customers().await.unwrap().len(), 1);

    let mut restored = restored;
    fresh.logout(&mut restored).unwrap();
    assert!(!restored.path().exists());
    assert!(SessionContext::load(dir.path()).unwrap().require_admin().is_err());
}
