use std::collections::BTreeMap;

use mongodb::bson::oid::ObjectId;

use crate::models::{
    CustomerDetails, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, PricedCart,
    SellerOrder,
};

/// Server-generated order identifier: time-ordered random, collision
/// resistant. Client-supplied identifiers are never trusted.
pub fn new_order_id() -> String {
    format!("ORD-{}", ObjectId::new().to_hex().to_uppercase())
}

/// Partitions a priced cart into the global order plus one shard per seller
/// of record. Pure and reproducible: same snapshot in, same shard set out.
///
/// Callers reject empty carts before this point; a zero-line cart must never
/// become an order.
pub fn split(
    priced: &PricedCart,
    order_id: &str,
    user_id: ObjectId,
    customer: &CustomerDetails,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    created_at: i64,
) -> (Order, Vec<SellerOrder>) {
    let items: Vec<OrderItem> = priced
        .lines
        .iter()
        .map(|l| OrderItem {
            product_id: l.product_id.clone(),
            name: l.name.clone(),
            price: l.unit_price,
            quantity: l.quantity,
            seller_store: l.seller_store.clone(),
            subtotal: l.line_subtotal(),
        })
        .collect();

    let order = Order {
        order_id: order_id.to_string(),
        user_id,
        customer_details: customer.clone(),
        items: items.clone(),
        payment_method,
        payment_status,
        subtotal: priced.subtotal,
        discount: priced.discount,
        total: priced.total,
        status: OrderStatus::Processing,
        created_at,
    };

    // BTreeMap keeps shard emission deterministic.
    let mut by_seller: BTreeMap<String, Vec<OrderItem>> = BTreeMap::new();
    for item in items {
        by_seller
            .entry(item.seller_store.clone())
            .or_default()
            .push(item);
    }

    let shards = by_seller
        .into_iter()
        .map(|(seller_store, items)| {
            let subtotal = items.iter().map(|i| i.subtotal).sum();
            SellerOrder {
                order_id: order_id.to_string(),
                seller_store,
                customer_name: customer.full_name.clone(),
                customer_email: customer.email.clone(),
                items,
                subtotal,
                status: Some(OrderStatus::Processing),
                payment_method: Some(payment_method),
                payment_status: Some(payment_status),
                shipping_address: customer.into(),
                created_at,
            }
        })
        .collect();

    (order, shards)
}
