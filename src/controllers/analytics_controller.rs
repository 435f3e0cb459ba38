use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    models::CurrentUser,
    services::{analytics_service, order_service::OrderStore},
    AppState,
};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

// GET /seller/:store/analytics
pub async fn get_seller_analytics(
    State(state): State<AppState>,
    Path(store): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(_u)) = user else {
        return unauthorized();
    };

    let shards = match state.orders.shards_for_seller(&store).await {
        Ok(s) => s,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let analytics = analytics_service::aggregate(&shards);
    (StatusCode::OK, Json(json!(analytics))).into_response()
}
