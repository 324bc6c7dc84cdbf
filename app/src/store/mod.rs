//! Thin data-access layer over the remote store: one module per concern,
//! wrapping row-level reads and writes.

pub mod catalog;
pub mod checkout;
pub mod profiles;
pub mod vendors;

pub use checkout::{CheckoutStore, OrderLine, PgCheckoutStore};
