use std::collections::BTreeMap;

use chrono::DateTime;
use serde::Serialize;

use crate::models::SellerOrder;

/// Bucket key for shards missing a status or payment method.
const UNCLASSIFIED: &str = "unclassified";

/// Revenue/status/payment summary for one seller's shard set. `BTreeMap`
/// keys keep the output stable, so re-running the reduction over the same
/// shards yields identical results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerAnalytics {
    pub total_orders: u64,
    pub total_revenue: f64,
    pub orders_by_status: BTreeMap<String, u64>,
    pub payment_methods: BTreeMap<String, u64>,
    /// Revenue keyed by calendar day, `YYYY-MM-DD`.
    pub daily_sales: BTreeMap<String, f64>,
    /// Revenue keyed by calendar month, `YYYY-MM`.
    pub monthly_sales: BTreeMap<String, f64>,
}

/// Pure batch reduction over a seller's shards. Shards missing optional
/// fields count as zero revenue / unclassified rather than failing the run;
/// no state is carried across calls.
pub fn aggregate(shards: &[SellerOrder]) -> SellerAnalytics {
    let mut out = SellerAnalytics {
        total_orders: 0,
        total_revenue: 0.0,
        orders_by_status: BTreeMap::new(),
        payment_methods: BTreeMap::new(),
        daily_sales: BTreeMap::new(),
        monthly_sales: BTreeMap::new(),
    };

    for shard in shards {
        out.total_orders += 1;
        out.total_revenue += shard.subtotal;

        let status_key = shard
            .status
            .map(|s| s.as_str())
            .unwrap_or(UNCLASSIFIED)
            .to_string();
        *out.orders_by_status.entry(status_key).or_insert(0) += 1;

        let method_key = shard
            .payment_method
            .map(|m| m.as_str())
            .unwrap_or(UNCLASSIFIED)
            .to_string();
        *out.payment_methods.entry(method_key).or_insert(0) += 1;

        if let Some(ts) = DateTime::from_timestamp(shard.created_at, 0) {
            let day = ts.format("%Y-%m-%d").to_string();
            let month = ts.format("%Y-%m").to_string();
            *out.daily_sales.entry(day).or_insert(0.0) += shard.subtotal;
            *out.monthly_sales.entry(month).or_insert(0.0) += shard.subtotal;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, PaymentMethod, ShippingAddress};

    fn shard(
        order_id: &str,
        subtotal: f64,
        status: Option<OrderStatus>,
        method: Option<PaymentMethod>,
        created_at: i64,
    ) -> SellerOrder {
        SellerOrder {
            order_id: order_id.to_string(),
            seller_store: "Acme".to_string(),
            customer_name: "Jane Doe".to_string(),
            customer_email: "jane@example.com".to_string(),
            items: vec![],
            subtotal,
            status,
            payment_method: method,
            payment_status: None,
            shipping_address: ShippingAddress {
                address: "1 Main St".to_string(),
                city: "Sofia".to_string(),
                state: "SF".to_string(),
                zip_code: "1000".to_string(),
                country: "BG".to_string(),
            },
            created_at,
        }
    }

    // 2024-01-15 and 2024-02-01, both UTC midday.
    const JAN: i64 = 1_705_315_200;
    const FEB: i64 = 1_706_785_200;

    #[test]
    fn totals_statuses_and_methods_are_counted() {
        let shards = vec![
            shard("o1", 39.98, Some(OrderStatus::Processing), Some(PaymentMethod::Card), JAN),
            shard("o2", 5.00, Some(OrderStatus::Shipped), Some(PaymentMethod::Cod), JAN),
            shard("o3", 10.00, Some(OrderStatus::Processing), Some(PaymentMethod::Card), FEB),
        ];

        let a = aggregate(&shards);
        assert_eq!(a.total_orders, 3);
        assert!((a.total_revenue - 54.98).abs() < 1e-9);
        assert_eq!(a.orders_by_status["processing"], 2);
        assert_eq!(a.orders_by_status["shipped"], 1);
        assert_eq!(a.payment_methods["card"], 2);
        assert_eq!(a.payment_methods["cod"], 1);
    }

    #[test]
    fn revenue_groups_by_day_and_month() {
        let shards = vec![
            shard("o1", 10.0, None, None, JAN),
            shard("o2", 5.0, None, None, JAN),
            shard("o3", 2.0, None, None, FEB),
        ];

        let a = aggregate(&shards);
        assert!((a.daily_sales["2024-01-15"] - 15.0).abs() < 1e-9);
        assert!((a.daily_sales["2024-02-01"] - 2.0).abs() < 1e-9);
        assert!((a.monthly_sales["2024-01"] - 15.0).abs() < 1e-9);
        assert!((a.monthly_sales["2024-02"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn missing_optional_fields_do_not_fail_the_reduction() {
        let shards = vec![shard("o1", 0.0, None, None, JAN)];

        let a = aggregate(&shards);
        assert_eq!(a.total_orders, 1);
        assert_eq!(a.total_revenue, 0.0);
        assert_eq!(a.orders_by_status[UNCLASSIFIED], 1);
        assert_eq!(a.payment_methods[UNCLASSIFIED], 1);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let shards = vec![
            shard("o1", 39.98, Some(OrderStatus::Processing), Some(PaymentMethod::Card), JAN),
            shard("o2", 5.00, None, None, FEB),
        ];

        let first = aggregate(&shards);
        let second = aggregate(&shards);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_shard_set_produces_empty_summary() {
        let a = aggregate(&[]);
        assert_eq!(a.total_orders, 0);
        assert_eq!(a.total_revenue, 0.0);
        assert!(a.daily_sales.is_empty());
    }
}
