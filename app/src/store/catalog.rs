//! Read-only product catalog: a single bounded query over active products
//! plus an image lookup, projected into display-ready values.

use crate::errors::{AppError, Result};
use crate::models::{DisplayProduct, ProductImageRow, ProductRow};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::error;
use uuid::Uuid;

/// Fetches at most `limit` active products with their vendor/category
/// relations and images, projected per the catalog defaulting rules.
/// No pagination; filtering only on the active flag.
pub async fn list_products(pool: &PgPool, limit: i64) -> Result<Vec<DisplayProduct>> {
    let rows: Vec<ProductRow> = sqlx::query_as(
        r#"
        SELECT p.id, p.name, p.price_cents, p.stock, p.created_at,
               v.farm_name, v.location AS vendor_location, c.name AS category_name
        FROM products p
        LEFT JOIN vendors v ON v.id = p.vendor_id
        LEFT JOIN categories c ON c.id = p.category_id
        WHERE p.is_active = TRUE
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch products from the store");
        AppError::Sqlx(e)
    })?;

    let product_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let image_rows: Vec<ProductImageRow> = sqlx::query_as(
        "SELECT product_id, url, position FROM product_images WHERE product_id = ANY($1)",
    )
    .bind(&product_ids)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch product images from the store");
        AppError::Sqlx(e)
    })?;

    let mut images_by_product: HashMap<Uuid, Vec<ProductImageRow>> = HashMap::new();
    for image in image_rows {
        images_by_product.entry(image.product_id).or_default().push(image);
    }

    let now = Utc::now();
    Ok(rows
        .into_iter()
        .map(|row| {
            let images = images_by_product.remove(&row.id).unwrap_or_default();
            project_product(row, &images, now)
        })
        .collect())
}

/// Maps one raw store row into its display representation, supplying the
/// defaults for every absent relation or field.
pub fn project_product(
    row: ProductRow,
    images: &[ProductImageRow],
    now: DateTime<Utc>,
) -> DisplayProduct {
    DisplayProduct {
        id: row.id,
        image: select_display_image(images),
        name: row.name,
        price_cents: row.price_cents.unwrap_or(0),
        farm: row.farm_name.unwrap_or_else(|| "Farm".to_string()),
        location: row.vendor_location.unwrap_or_else(|| "Unknown".to_string()),
        harvested_at: humanize_harvested_at(row.created_at, now),
        quantity: row.stock.unwrap_or(0),
        category: row.category_name.unwrap_or_default(),
    }
}

/// First image by ascending position; absent positions sort as 0, so when no
/// image carries position data the original order wins. No images at all
/// yields an empty string.
fn select_display_image(images: &[ProductImageRow]) -> String {
    let mut sorted: Vec<&ProductImageRow> = images.iter().collect();
    sorted.sort_by_key(|image| image.position.unwrap_or(0));
    sorted
        .first()
        .map(|image| image.url.clone())
        .unwrap_or_default()
}

/// Recency label derived from the creation timestamp. A missing timestamp
/// (or one in the future) reads as "Today".
pub fn humanize_harvested_at(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created_at else {
        return "Today".to_string();
    };
    let diff_days = (now - created).num_days();
    if diff_days <= 0 {
        "Today".to_string()
    } else if diff_days == 1 {
        "Yesterday".to_string()
    } else {
        format!("{} days ago", diff_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn image(product_id: Uuid, url: &str, position: Option<i32>) -> ProductImageRow {
        ProductImageRow {
            product_id,
            url: url.to_string(),
            position,
        }
    }

    fn bare_row(id: Uuid) -> ProductRow {
        ProductRow {
            id,
            name: "Carrots".to_string(),
            price_cents: None,
            stock: None,
            created_at: None,
            farm_name: None,
            vendor_location: None,
            category_name: None,
        }
    }

    #[test]
    fn picks_lowest_positioned_image() {
        let id = Uuid::new_v4();
        let images = vec![image(id, "second.jpg", Some(2)), image(id, "first.jpg", Some(1))];
        let product = project_product(bare_row(id), &images, Utc::now());
        assert_eq!(product.image, "first.jpg");
    }

    #[test]
    fn keeps_original_order_when_positions_are_absent() {
        let id = Uuid::new_v4();
        let images = vec![image(id, "a.jpg", None), image(id, "b.jpg", None)];
        let product = project_product(bare_row(id), &images, Utc::now());
        assert_eq!(product.image, "a.jpg");
    }

    #[test]
    fn defaults_apply_for_absent_fields() {
        let id = Uuid::new_v4();
        let product = project_product(bare_row(id), &[], Utc::now());
        assert_eq!(product.image, "");
        assert_eq!(product.price_cents, 0);
        assert_eq!(product.farm, "Farm");
        assert_eq!(product.location, "Unknown");
        assert_eq!(product.harvested_at, "Today");
        assert_eq!(product.quantity, 0);
        assert_eq!(product.category, "");
    }

    #[test]
    fn recency_label_buckets() {
        let now = Utc::now();
        assert_eq!(humanize_harvested_at(None, now), "Today");
        assert_eq!(humanize_harvested_at(Some(now - Duration::hours(3)), now), "Today");
        assert_eq!(
            humanize_harvested_at(Some(now - Duration::days(1)), now),
            "Yesterday"
        );
        assert_eq!(
            humanize_harvested_at(Some(now - Duration::days(5)), now),
            "5 days ago"
        );
        // A clock skew into the future still reads as today.
        assert_eq!(humanize_harvested_at(Some(now + Duration::days(2)), now), "Today");
    }
}
