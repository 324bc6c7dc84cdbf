//! Farmstand: a farm-produce marketplace service.
//!
//! Catalog browsing, session carts, the order-placement flow (a trellis
//! workflow with per-stage compensation), profile and vendor screens, and a
//! typed navigation surface — backed by PostgreSQL via sqlx and exposed over
//! actix-web.

pub mod cart;
pub mod config;
pub mod errors;
pub mod flows;
pub mod models;
pub mod state;
pub mod store;
pub mod web;
