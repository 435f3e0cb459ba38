use std::collections::HashMap;

pub mod gateway;
pub mod notifier;
pub mod db_init;

pub mod cart_service;
pub mod pricing_service;
pub mod order_splitter;
pub mod checkout_service;
pub mod order_service;
pub mod analytics_service;

/// Field name -> message validation map; "_form" keys non-field errors.
pub type FieldErrors = HashMap<String, String>;
