use axum::{routing::post, Router};

use crate::{controllers::checkout_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/checkout/quote", post(checkout_controller::post_quote))
        .route("/checkout", post(checkout_controller::post_checkout))
}
