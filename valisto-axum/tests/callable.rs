use axum::body::Body;
use axum::http::{HeaderValue, Request};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use valisto_axum::axum as valisto_axum_app;
use valisto_sync::{Document, DocumentStore, MemoryStore, SyncEngine};

fn doc(value: Value) -> Document {
    value.as_object().cloned().expect("object literal")
}

async fn seed_user(store: &MemoryStore, tenant: &str, user_id: &str, plan: Option<&str>) {
    let mut user_doc = doc(json!({"tenantId": tenant}));
    if let Some(plan) = plan {
        user_doc.insert("plan".to_string(), Value::from(plan));
    }
    store
        .set_document(&format!("tenants/{tenant}/usuarios"), user_id, user_doc)
        .await
        .unwrap();
}

async fn seed_product(store: &MemoryStore, tenant: &str, product_id: &str, stock: i64) {
    store
        .set_document(
            &format!("tenants/{tenant}/productos"),
            product_id,
            doc(json!({"stock": stock})),
        )
        .await
        .unwrap();
}

fn sync_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/syncIndividualInventory")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn sync_success_returns_structured_payload() {
    let store = MemoryStore::new();
    seed_user(&store, "t1", "u1", Some("individual")).await;
    seed_product(&store, "t1", "p1", 5).await;
    seed_product(&store, "t1", "p2", 0).await;

    let app = valisto_axum_app(SyncEngine::new(store));
    let res = app
        .router
        .oneshot(sync_request("{\"tenantId\":\"t1\"}"))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert!(res.headers().get("x-request-id").is_some());
    let body = json_body(res).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["productosSincronizados"], json!(2));
    assert_eq!(body["inventario"], json!({"p1": 5, "p2": 0}));
}

#[tokio::test]
async fn empty_deposit_succeeds_with_zero_synced() {
    let store = MemoryStore::new();
    seed_user(&store, "t1", "u1", Some("individual")).await;

    let app = valisto_axum_app(SyncEngine::new(store));
    let res = app
        .router
        .oneshot(sync_request("{\"tenantId\":\"t1\"}"))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["productosSincronizados"], json!(0));
    assert!(body.get("inventario").is_none());
}

#[tokio::test]
async fn missing_tenant_id_returns_bad_request_shape() {
    let app = valisto_axum_app(SyncEngine::new(MemoryStore::new()));
    let res = app.router.oneshot(sync_request("{}")).await.unwrap();

    assert_eq!(res.status().as_u16(), 400);
    let body = json_body(res).await;
    assert_eq!(body["name"], "BadRequest");
    assert_eq!(body["code"], 400);
    assert_eq!(body["className"], "bad-request");
}

#[tokio::test]
async fn business_plan_returns_forbidden() {
    let store = MemoryStore::new();
    seed_user(&store, "t2", "u1", Some("business")).await;

    let app = valisto_axum_app(SyncEngine::new(store));
    let res = app
        .router
        .oneshot(sync_request("{\"tenantId\":\"t2\"}"))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 403);
    let body = json_body(res).await;
    assert_eq!(body["name"], "Forbidden");
    assert_eq!(body["className"], "forbidden");
    assert!(body["message"].as_str().unwrap().contains("individual"));
}

#[tokio::test]
async fn unknown_tenant_returns_not_found() {
    let app = valisto_axum_app(SyncEngine::new(MemoryStore::new()));
    let res = app
        .router
        .oneshot(sync_request("{\"tenantId\":\"ghost\"}"))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 404);
    let body = json_body(res).await;
    assert_eq!(body["name"], "NotFound");
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn malformed_json_returns_bad_request_shape() {
    let app = valisto_axum_app(SyncEngine::new(MemoryStore::new()));
    let res = app
        .router
        .oneshot(sync_request("{\"tenantId\":\"t1\""))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 400);
    let body = json_body(res).await;
    assert_eq!(body["name"], "BadRequest");
    assert!(body.get("errors").is_some());
}

#[tokio::test]
async fn request_id_is_preserved_when_provided() {
    let store = MemoryStore::new();
    seed_user(&store, "t1", "u1", Some("individual")).await;

    let provided = HeaderValue::from_static("req-test-123");
    let app = valisto_axum_app(SyncEngine::new(store));
    let res = app
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/syncIndividualInventory")
                .header("content-type", "application/json")
                .header("x-request-id", provided.clone())
                .body(Body::from("{\"tenantId\":\"t1\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.headers().get("x-request-id").unwrap(), &provided);
}
