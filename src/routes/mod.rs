use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{controllers::health_controller, AppState};

pub mod cart_routes;
pub mod checkout_routes;
pub mod orders_routes;
pub mod analytics_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new()
        .route("/health", get(health_controller::health))
        .route("/health/db", get(health_controller::health_db));

    let router = cart_routes::add_routes(router);
    let router = checkout_routes::add_routes(router);
    let router = orders_routes::add_routes(router);
    let router = analytics_routes::add_routes(router);

    router
        .fallback(health_controller::not_found)
        .layer(from_fn_with_state(state.clone(), crate::auth::require_auth))
        .layer(from_fn_with_state(
            state.clone(),
            crate::auth::inject_current_user,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
