use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{controllers::cart_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/cart", get(cart_controller::get_cart).delete(cart_controller::delete_cart))
        .route("/cart/items", post(cart_controller::post_add_item))
        .route(
            "/cart/items/:product_id/decrement",
            post(cart_controller::post_decrement_item),
        )
        .route(
            "/cart/items/:product_id",
            delete(cart_controller::delete_item),
        )
}
