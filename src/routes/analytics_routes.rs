use axum::{routing::get, Router};

use crate::{controllers::analytics_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/seller/:store/analytics",
        get(analytics_controller::get_seller_analytics),
    )
}
