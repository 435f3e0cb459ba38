use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::{CurrentUser, OrderStatus},
    services::order_service::{self, OrderStore, StoreError},
    AppState,
};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

fn store_error(e: &StoreError) -> Response {
    match e {
        StoreError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Order {id} not found.") })),
        )
            .into_response(),
        StoreError::Db(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("db error: {msg}") })),
        )
            .into_response(),
    }
}

// GET /orders — buyer order history. Statuses are resolved against shard
// state, matching the storefront's history widget.
pub async fn get_order_history(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let orders = match state.orders.orders_for_user(u.id).await {
        Ok(o) => o,
        Err(e) => return store_error(&e),
    };

    let mut out = Vec::with_capacity(orders.len());
    for order in orders {
        let status = match state.orders.shards_for_order(&order.order_id).await {
            Ok(shards) => order_service::resolved_status(&order, &shards),
            // On a read failure the global status stands.
            Err(_) => order.status,
        };

        out.push(json!({
            "order_id": order.order_id,
            "items": order.items,
            "payment_method": order.payment_method,
            "payment_status": order.payment_status,
            "subtotal": order.subtotal,
            "discount": order.discount,
            "total": order.total,
            "status": status,
            "created_at": order.created_at,
        }));
    }

    (StatusCode::OK, Json(json!({ "orders": out }))).into_response()
}

// GET /seller/:store/orders
pub async fn get_seller_orders(
    State(state): State<AppState>,
    Path(store): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(_u)) = user else {
        return unauthorized();
    };

    match state.orders.shards_for_seller(&store).await {
        Ok(shards) => (StatusCode::OK, Json(json!({ "orders": shards }))).into_response(),
        Err(e) => store_error(&e),
    }
}

#[derive(Deserialize)]
pub struct UpdateStatusForm {
    pub status: String,
}

// POST /seller/:store/orders/:order_id/status
pub async fn post_update_status(
    State(state): State<AppState>,
    Path((store, order_id)): Path<(String, String)>,
    user: Option<Extension<CurrentUser>>,
    Json(form): Json<UpdateStatusForm>,
) -> Response {
    let Some(Extension(_u)) = user else {
        return unauthorized();
    };

    let Some(status) = OrderStatus::parse(&form.status) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": { "status": "Unknown status." } })),
        )
            .into_response();
    };

    match state.orders.update_status(&order_id, &store, status).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "order_id": order_id,
                "seller_store": store,
                "status": status,
            })),
        )
            .into_response(),
        Err(e) => store_error(&e),
    }
}

// GET /orders/:order_id/drift — reconciliation view over the dual-write
// design: reports shards whose status disagrees with the global order.
pub async fn get_order_drift(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(_u)) = user else {
        return unauthorized();
    };

    match order_service::status_drift(&state.orders, &order_id).await {
        Ok(drift) => (
            StatusCode::OK,
            Json(json!({
                "order_id": order_id,
                "consistent": drift.is_empty(),
                "drift": drift,
            })),
        )
            .into_response(),
        Err(e) => store_error(&e),
    }
}
