pub mod user;
pub mod cart;
pub mod order;

pub use user::{CurrentUser, User};
pub use cart::{Cart, CartLine, PricedCart, PLATFORM_STORE};
pub use order::{
    CustomerDetails, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, SellerOrder,
    ShippingAddress,
};
