use crate::models::{Cart, PricedCart};

/// Static promotional-code registry: code -> discount fraction.
const PROMO_CODES: &[(&str, f64)] = &[("PARA20%", 0.20)];

#[derive(Debug, Clone, PartialEq)]
pub enum PromoOutcome {
    NotProvided,
    Applied { code: String, fraction: f64 },
    /// Unrecognized code. The discount stays zero but the rejection is
    /// surfaced to the caller instead of being swallowed.
    Invalid { code: String },
}

fn lookup(code: &str) -> Option<f64> {
    let code = code.trim().to_uppercase();
    PROMO_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, fraction)| *fraction)
}

/// Prices a cart snapshot. Pure function of (cart, code): subtotal over the
/// lines, at most one discount, total floored at zero.
pub fn price_cart(cart: &Cart, promo_code: Option<&str>) -> (PricedCart, PromoOutcome) {
    let subtotal = cart.subtotal();

    let (discount, outcome) = match promo_code.map(str::trim).filter(|c| !c.is_empty()) {
        None => (0.0, PromoOutcome::NotProvided),
        Some(code) => match lookup(code) {
            Some(fraction) => (
                subtotal * fraction,
                PromoOutcome::Applied {
                    code: code.to_uppercase(),
                    fraction,
                },
            ),
            None => (
                0.0,
                PromoOutcome::Invalid {
                    code: code.to_string(),
                },
            ),
        },
    };

    let total = (subtotal - discount).max(0.0);

    (
        PricedCart {
            lines: cart.lines.clone(),
            subtotal,
            discount,
            total,
        },
        outcome,
    )
}

/// Integer minor-unit (cent) equivalent, rounded half-up. Gateways reject
/// fractional units, so every charge goes through this.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
