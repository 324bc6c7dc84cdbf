pub mod auth;
pub mod cart_handlers;
pub mod checkout_handlers;
pub mod confirmation_handlers;
pub mod nav_handlers;
pub mod product_handlers;
pub mod profile_handlers;
pub mod vendor_handlers;
