use axum::{
    http::{header, Request, StatusCode},
    routing::{get, post},
    Router,
};
use http_body_util::BodyExt;
use mongodb::{bson::oid::ObjectId, Client};
use pharmashop::models::CurrentUser;
use pharmashop::{config, controllers::orders_controller, services, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let mut settings = config::load();
    settings.stripe_secret_key = String::new();
    settings.order_webhook_url = String::new();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    AppState {
        db: db.clone(),
        settings,
        carts: services::cart_service::CartStore::new(),
        orders: services::order_service::MongoOrderStore::new(db),
        gateway: services::gateway::StripeGateway::new(String::new()),
        notifier: services::notifier::OrderNotifier::new(String::new()),
    }
}

fn orders_router(state: AppState) -> Router {
    Router::new()
        .route("/orders", get(orders_controller::get_order_history))
        .route(
            "/orders/:order_id/drift",
            get(orders_controller::get_order_drift),
        )
        .route(
            "/seller/:store/orders",
            get(orders_controller::get_seller_orders),
        )
        .route(
            "/seller/:store/orders/:order_id/status",
            post(orders_controller::post_update_status),
        )
        .with_state(state)
}

fn current_user() -> CurrentUser {
    CurrentUser {
        id: ObjectId::new(),
        email: "seller@example.com".to_string(),
        username: "seller".to_string(),
    }
}

async fn response_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn order_history_unauthorized_returns_401() {
    let app = orders_router(test_state().await);

    let req = Request::builder()
        .method("GET")
        .uri("/orders")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn seller_orders_unauthorized_returns_401() {
    let app = orders_router(test_state().await);

    let req = Request::builder()
        .method("GET")
        .uri("/seller/Acme/orders")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn drift_unauthorized_returns_401() {
    let app = orders_router(test_state().await);

    let req = Request::builder()
        .method("GET")
        .uri("/orders/ORD-1/drift")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn status_update_with_unknown_status_is_rejected() {
    let app = orders_router(test_state().await);

    let mut req = Request::builder()
        .method("POST")
        .uri("/seller/Acme/orders/ORD-1/status")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            json!({ "status": "teleported" }).to_string(),
        ))
        .unwrap();
    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["errors"]["status"].is_string());
}

#[tokio::test]
async fn status_update_unauthorized_returns_401() {
    let app = orders_router(test_state().await);

    let req = Request::builder()
        .method("POST")
        .uri("/seller/Acme/orders/ORD-1/status")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            json!({ "status": "shipped" }).to_string(),
        ))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
