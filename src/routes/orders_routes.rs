use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::orders_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
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
}
