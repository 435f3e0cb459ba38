use serde::{Deserialize, Serialize};

/// Seller of record used when a product carries no store of its own.
pub const PLATFORM_STORE: &str = "Pharmashop ©";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    // captured when the line is added, never re-fetched
    pub unit_price: f64,
    pub quantity: i64,
    pub seller_store: String,
}

impl CartLine {
    pub fn line_subtotal(&self) -> f64 {
        self.unit_price * (self.quantity as f64)
    }
}

/// The in-progress selection for one user. Session state only; it is never
/// persisted and carries no guarantee across sessions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_subtotal).sum()
    }
}

/// Immutable priced snapshot taken at checkout start. The live cart is not
/// consulted again during that checkout attempt, so a concurrent edit from
/// another tab cannot move the total mid-payment.
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<CartLine>,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}
