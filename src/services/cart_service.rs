use std::sync::Arc;

use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;

use crate::models::{Cart, CartLine, PLATFORM_STORE};

use super::FieldErrors;

/// Keyed-by-user session carts. Created on first add-to-cart, cleared on
/// successful checkout or an explicit clear; nothing here survives a restart.
#[derive(Clone, Default)]
pub struct CartStore {
    carts: Arc<DashMap<ObjectId, Cart>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: ObjectId) -> Cart {
        self.carts
            .get(&user_id)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Snapshot for checkout. Same as `get`; the name marks the point after
    /// which the live cart is no longer consulted.
    pub fn snapshot(&self, user_id: ObjectId) -> Cart {
        self.get(user_id)
    }

    /// Adds a line. If the product is already in the cart, quantities merge
    /// and the unit price captured at first add wins.
    pub fn add_line(&self, user_id: ObjectId, mut line: CartLine) -> Result<Cart, FieldErrors> {
        let mut errs: FieldErrors = FieldErrors::new();

        if line.product_id.trim().is_empty() {
            errs.insert("product_id".into(), "Missing product id.".into());
        }
        if line.quantity < 1 {
            errs.insert("quantity".into(), "Enter a valid quantity.".into());
        }
        if !line.unit_price.is_finite() || line.unit_price < 0.0 {
            errs.insert("price".into(), "Enter a valid price.".into());
        }
        if !errs.is_empty() {
            return Err(errs);
        }

        if line.seller_store.trim().is_empty() {
            line.seller_store = PLATFORM_STORE.to_string();
        }

        let mut cart = self.carts.entry(user_id).or_default();
        match cart.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.quantity += line.quantity,
            None => cart.lines.push(line),
        }

        Ok(cart.clone())
    }

    /// Removes one unit. Dropping the last unit removes the line entirely;
    /// decrementing a product that is not in the cart is a reported error.
    pub fn decrement_line(
        &self,
        user_id: ObjectId,
        product_id: &str,
    ) -> Result<Cart, FieldErrors> {
        let mut errs: FieldErrors = FieldErrors::new();

        let Some(mut cart) = self.carts.get_mut(&user_id) else {
            errs.insert("product_id".into(), "Not in your cart.".into());
            return Err(errs);
        };

        let Some(idx) = cart.lines.iter().position(|l| l.product_id == product_id) else {
            errs.insert("product_id".into(), "Not in your cart.".into());
            return Err(errs);
        };

        cart.lines[idx].quantity -= 1;
        if cart.lines[idx].quantity == 0 {
            cart.lines.remove(idx);
        }

        Ok(cart.clone())
    }

    /// Removes the whole line regardless of quantity.
    pub fn remove_line(&self, user_id: ObjectId, product_id: &str) -> Result<Cart, FieldErrors> {
        let mut errs: FieldErrors = FieldErrors::new();

        let Some(mut cart) = self.carts.get_mut(&user_id) else {
            errs.insert("product_id".into(), "Not in your cart.".into());
            return Err(errs);
        };

        let before = cart.lines.len();
        cart.lines.retain(|l| l.product_id != product_id);
        if cart.lines.len() == before {
            errs.insert("product_id".into(), "Not in your cart.".into());
            return Err(errs);
        }

        Ok(cart.clone())
    }

    pub fn clear(&self, user_id: ObjectId) {
        self.carts.remove(&user_id);
    }
}
