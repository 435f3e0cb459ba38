use axum::{
    http::{header, Request, StatusCode},
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use mongodb::{bson::oid::ObjectId, Client};
use pharmashop::models::{CartLine, CurrentUser};
use pharmashop::{config, controllers::checkout_controller, services, AppState};
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

fn checkout_router(state: AppState) -> Router {
    Router::new()
        .route("/checkout/quote", post(checkout_controller::post_quote))
        .route("/checkout", post(checkout_controller::post_checkout))
        .with_state(state)
}

fn current_user() -> CurrentUser {
    CurrentUser {
        id: ObjectId::new(),
        email: "buyer@example.com".to_string(),
        username: "buyer".to_string(),
    }
}

fn seed_cart(state: &AppState, user: &CurrentUser) {
    state
        .carts
        .add_line(
            user.id,
            CartLine {
                product_id: "p1".to_string(),
                name: "paracetamol".to_string(),
                unit_price: 22.49,
                quantity: 2,
                seller_store: "Acme".to_string(),
            },
        )
        .expect("seed cart");
}

fn shipping_body() -> Value {
    json!({
        "full_name": "Test Buyer",
        "email": "buyer@example.com",
        "address": "1 Main St",
        "city": "Sofia",
        "state": "SF",
        "zip_code": "1000",
        "country": "BG"
    })
}

async fn response_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn quote_unauthorized_returns_401() {
    let app = checkout_router(test_state().await);

    let res = app
        .oneshot(json_request("/checkout/quote", json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn quote_on_empty_cart_is_rejected() {
    let app = checkout_router(test_state().await);

    let mut req = json_request("/checkout/quote", json!({}));
    req.extensions_mut().insert(current_user());

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["errors"]["_form"].is_string());
}

#[tokio::test]
async fn quote_applies_valid_promo() {
    let state = test_state().await;
    let user = current_user();
    seed_cart(&state, &user);

    let mut req = json_request("/checkout/quote", json!({ "promo_code": "PARA20%" }));
    req.extensions_mut().insert(user);

    let res = checkout_router(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_json(res).await;
    assert!((body["subtotal"].as_f64().unwrap() - 44.98).abs() < 1e-9);
    assert!((body["total"].as_f64().unwrap() - 35.984).abs() < 1e-9);
    assert_eq!(body["promo"]["status"], "applied");
}

#[tokio::test]
async fn quote_with_unknown_promo_keeps_full_price() {
    let state = test_state().await;
    let user = current_user();
    seed_cart(&state, &user);

    let mut req = json_request("/checkout/quote", json!({ "promo_code": "NOPE" }));
    req.extensions_mut().insert(user);

    let res = checkout_router(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_json(res).await;
    assert!((body["total"].as_f64().unwrap() - 44.98).abs() < 1e-9);
    assert_eq!(body["promo"]["status"], "invalid");
}

#[tokio::test]
async fn checkout_with_bad_shipping_details_is_rejected() {
    let state = test_state().await;
    let user = current_user();
    seed_cart(&state, &user);

    let mut body = shipping_body();
    body["email"] = json!("not-an-email");
    body["payment_method"] = json!("cod");

    let mut req = json_request("/checkout", body);
    req.extensions_mut().insert(user);

    let res = checkout_router(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["errors"]["email"].is_string());
}

#[tokio::test]
async fn checkout_on_empty_cart_is_rejected() {
    let state = test_state().await;
    let user = current_user();

    let mut body = shipping_body();
    body["payment_method"] = json!("cod");

    let mut req = json_request("/checkout", body);
    req.extensions_mut().insert(user);

    let res = checkout_router(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["errors"]["_form"].is_string());
}

#[tokio::test]
async fn card_checkout_without_gateway_key_fails_and_keeps_the_cart() {
    let state = test_state().await;
    let user = current_user();
    seed_cart(&state, &user);

    let mut body = shipping_body();
    body["payment_method"] = json!("card");
    body["card"] = json!({ "payment_method_id": "pm_test" });

    let mut req = json_request("/checkout", body);
    req.extensions_mut().insert(user.clone());

    let res = checkout_router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);

    let body = response_json(res).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("STRIPE_SECRET_KEY"));

    // Nothing was charged, so the buyer keeps what they had.
    assert!(!state.carts.snapshot(user.id).is_empty());
}

#[tokio::test]
async fn card_checkout_without_card_details_is_rejected() {
    let state = test_state().await;
    let user = current_user();
    seed_cart(&state, &user);

    let mut body = shipping_body();
    body["payment_method"] = json!("card");

    let mut req = json_request("/checkout", body);
    req.extensions_mut().insert(user);

    let res = checkout_router(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["errors"]["card"].is_string());
}

#[tokio::test]
async fn checkout_with_unknown_payment_method_is_rejected() {
    let state = test_state().await;
    let user = current_user();
    seed_cart(&state, &user);

    let mut body = shipping_body();
    body["payment_method"] = json!("barter");

    let mut req = json_request("/checkout", body);
    req.extensions_mut().insert(user);

    let res = checkout_router(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(res).await;
    assert!(body["errors"]["payment_method"].is_string());
}
