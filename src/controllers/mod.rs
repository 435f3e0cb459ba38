pub mod health_controller;
pub mod cart_controller;
pub mod checkout_controller;
pub mod orders_controller;
pub mod analytics_controller;
