//! The write-side port of the order-placement flow and its PostgreSQL
//! adapter.
//!
//! The flow performs three writes against this port — address, order, order
//! items, in that order — plus the two compensating writes. Keeping the port
//! as a trait lets the flow be exercised against a recording double.

use crate::errors::{AppError, Result};
use crate::models::{Address, AddressInput, Order, OrderItem, OrderStatus};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

/// One order line as handed to the store. The total is computed at write
/// time from quantity and unit price, not carried in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

#[async_trait]
pub trait CheckoutStore: Send + Sync {
    /// Inserts a shipping address scoped to the profile; returns the
    /// persisted row with its store-assigned id.
    async fn insert_address(
        &self,
        profile_id: Uuid,
        input: &AddressInput,
        default_country: &str,
    ) -> Result<Address>;

    /// Inserts a new `pending` order referencing the shipping address.
    async fn insert_order(
        &self,
        profile_id: Uuid,
        currency: &str,
        shipping_address_id: Uuid,
    ) -> Result<Order>;

    /// Inserts all line items for the order in a single batch statement,
    /// computing each line's total at write time.
    async fn insert_order_items(
        &self,
        order_id: Uuid,
        lines: &[OrderLine],
    ) -> Result<Vec<OrderItem>>;

    /// Compensation: removes the orphaned address left by a failed order
    /// insert.
    async fn delete_address(&self, address_id: Uuid) -> Result<()>;

    /// Compensation: marks an order whose line items could not be written.
    async fn mark_order_failed(&self, order_id: Uuid) -> Result<()>;
}

#[derive(Clone)]
pub struct PgCheckoutStore {
    pool: PgPool,
}

impl PgCheckoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Any insert rejection — constraint violation or transport failure — is
    // the same StoreWrite condition to callers; the distinction only goes to
    // the log.
    fn write_error(operation: &str, err: sqlx::Error) -> AppError {
        error!(%operation, error = %err, "Store write rejected");
        AppError::StoreWrite(format!("{}: {}", operation, err))
    }
}

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
    async fn insert_address(
        &self,
        profile_id: Uuid,
        input: &AddressInput,
        default_country: &str,
    ) -> Result<Address> {
        let country = input.country.as_deref().unwrap_or(default_country);
        let address: Address = sqlx::query_as(
            r#"
            INSERT INTO addresses
              (profile_id, label, full_name, phone, street, apartment, city, state, zip, country, is_default)
            VALUES ($1, 'Shipping', $2, $3, $4, $5, $6, $7, $8, $9, FALSE)
            RETURNING id, profile_id, label, full_name, phone, street, apartment, city, state, zip, country, is_default
            "#,
        )
        .bind(profile_id)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.street)
        .bind(&input.apartment)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.zip)
        .bind(country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::write_error("insert_address", e))?;

        info!(%profile_id, address_id = %address.id, "Shipping address persisted.");
        Ok(address)
    }

    async fn insert_order(
        &self,
        profile_id: Uuid,
        currency: &str,
        shipping_address_id: Uuid,
    ) -> Result<Order> {
        let order: Order = sqlx::query_as(
            r#"
            INSERT INTO orders (profile_id, status, currency, shipping_address_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, profile_id, status, currency, shipping_address_id, created_at
            "#,
        )
        .bind(profile_id)
        .bind(OrderStatus::Pending)
        .bind(currency)
        .bind(shipping_address_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::write_error("insert_order", e))?;

        info!(%profile_id, order_id = %order.id, "Order record persisted.");
        Ok(order)
    }

    async fn insert_order_items(
        &self,
        order_id: Uuid,
        lines: &[OrderLine],
    ) -> Result<Vec<OrderItem>> {
        let product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
        let quantities: Vec<i32> = lines.iter().map(|l| l.quantity).collect();
        let unit_prices: Vec<i64> = lines.iter().map(|l| l.unit_price_cents).collect();

        // One batch insert; the line total is computed here, at write time.
        let items: Vec<OrderItem> = sqlx::query_as(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents, total_price_cents)
            SELECT $1, line.product_id, line.quantity, line.unit_price_cents,
                   line.quantity::BIGINT * line.unit_price_cents
            FROM UNNEST($2::UUID[], $3::INT[], $4::BIGINT[])
                 AS line(product_id, quantity, unit_price_cents)
            RETURNING id, order_id, product_id, quantity, unit_price_cents, total_price_cents
            "#,
        )
        .bind(order_id)
        .bind(&product_ids)
        .bind(&quantities)
        .bind(&unit_prices)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::write_error("insert_order_items", e))?;

        info!(%order_id, line_count = items.len(), "Order items persisted.");
        Ok(items)
    }

    async fn delete_address(&self, address_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(address_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::write_error("delete_address", e))?;
        info!(%address_id, "Orphaned shipping address removed.");
        Ok(())
    }

    async fn mark_order_failed(&self, order_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(order_id)
            .bind(OrderStatus::Failed)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::write_error("mark_order_failed", e))?;
        info!(%order_id, "Order marked failed after items insert was rejected.");
        Ok(())
    }
}
