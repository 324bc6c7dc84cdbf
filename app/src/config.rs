use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// How long a session's cart outlives a completed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartRetention {
    /// Checkout removes the session's cart entry outright; the next add
    /// starts a fresh cart.
    Volatile,
    /// An empty cart object is retained for the session after checkout.
    Sticky,
}

impl CartRetention {
    fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "volatile" => Ok(CartRetention::Volatile),
            "sticky" => Ok(CartRetention::Sticky),
            other => Err(AppError::Config(format!(
                "Invalid CART_RETENTION value '{}': expected 'volatile' or 'sticky'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,

    /// Country written on shipping addresses when the form leaves it blank.
    pub default_country: String,
    /// Fixed currency code stamped on every order.
    pub currency_code: String,
    /// Upper bound on the catalog listing query.
    pub catalog_page_limit: i64,

    pub cart_retention: CartRetention,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        let get_env = |var_name: &str| {
            env::var(var_name).map_err(|e| {
                AppError::Config(format!("Missing environment variable '{}': {}", var_name, e))
            })
        };

        let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = get_env("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
        let database_url = get_env("DATABASE_URL")?;

        let default_country = get_env("DEFAULT_COUNTRY").unwrap_or_else(|_| "US".to_string());
        let currency_code = get_env("CURRENCY_CODE").unwrap_or_else(|_| "USD".to_string());
        let catalog_page_limit = get_env("CATALOG_PAGE_LIMIT")
            .unwrap_or_else(|_| "200".to_string())
            .parse::<i64>()
            .map_err(|e| AppError::Config(format!("Invalid CATALOG_PAGE_LIMIT: {}", e)))?;

        let cart_retention =
            CartRetention::parse(&get_env("CART_RETENTION").unwrap_or_else(|_| "volatile".to_string()))?;

        tracing::info!("Application configuration loaded successfully.");

        Ok(Self {
            server_host,
            server_port,
            database_url,
            default_country,
            currency_code,
            catalog_page_limit,
            cart_retention,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_retention_parses_known_values() {
        assert_eq!(CartRetention::parse("volatile").unwrap(), CartRetention::Volatile);
        assert_eq!(CartRetention::parse("Sticky").unwrap(), CartRetention::Sticky);
    }

    #[test]
    fn cart_retention_rejects_unknown_values() {
        assert!(CartRetention::parse("durable").is_err());
    }
}
