use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Shipping/contact details copied into the order at checkout time. A
/// snapshot, not a live reference to profile data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// The address subset each seller shard carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl From<&CustomerDetails> for ShippingAddress {
    fn from(c: &CustomerDetails) -> Self {
        ShippingAddress {
            address: c.address.clone(),
            city: c.city.clone(),
            state: c.state.clone(),
            zip_code: c.zip_code.clone(),
            country: c.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// No transition table: any status may follow any other. Sellers drive
    /// these from their dashboard and the store imposes no guard.
    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cod,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cod => "cod",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub seller_store: String,
    pub subtotal: f64,
}

/// The global order record, keyed by the server-generated order id.
/// Created once at successful checkout and thereafter only status-mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub order_id: String,
    pub user_id: ObjectId,
    pub customer_details: CustomerDetails,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// Per-seller shard of an order, keyed by (seller_store, order_id). Holds
/// only that seller's item subset and its own subtotal and status.
///
/// The analytics inputs (`subtotal`, `status`, `payment_method`) default when
/// absent so that partial documents written by older clients still aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerOrder {
    pub order_id: String,
    pub seller_store: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    pub shipping_address: ShippingAddress,
    pub created_at: i64,
}
