use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::{Cart, CartLine, CurrentUser},
    services::FieldErrors,
    AppState,
};

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

fn invalid(errs: &FieldErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "errors": errs })),
    )
        .into_response()
}

fn cart_json(cart: &Cart) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "lines": cart.lines,
            "subtotal": cart.subtotal(),
        })),
    )
        .into_response()
}

// GET /cart
pub async fn get_cart(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    cart_json(&state.carts.get(u.id))
}

#[derive(Deserialize)]
pub struct AddItemForm {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub seller_store: String,
}

// POST /cart/items
pub async fn post_add_item(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Json(form): Json<AddItemForm>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    let line = CartLine {
        product_id: form.product_id,
        name: form.name,
        unit_price: form.price,
        quantity: form.quantity,
        seller_store: form.seller_store,
    };

    match state.carts.add_line(u.id, line) {
        Ok(cart) => cart_json(&cart),
        Err(errs) => invalid(&errs),
    }
}

// POST /cart/items/:product_id/decrement
pub async fn post_decrement_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match state.carts.decrement_line(u.id, &product_id) {
        Ok(cart) => cart_json(&cart),
        Err(errs) => invalid(&errs),
    }
}

// DELETE /cart/items/:product_id
pub async fn delete_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    match state.carts.remove_line(u.id, &product_id) {
        Ok(cart) => cart_json(&cart),
        Err(errs) => invalid(&errs),
    }
}

// DELETE /cart
pub async fn delete_cart(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return unauthorized();
    };

    state.carts.clear(u.id);
    cart_json(&state.carts.get(u.id))
}
