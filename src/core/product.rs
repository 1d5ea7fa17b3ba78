//! Tracked product storage - create, list, fetch and delete rows.
//!
//! These functions are the record store the catalog talks to. They return the
//! raw store error on failure; translating it for the admin is the catalog's
//! job.

use crate::{
    core::resolver::ProductDescriptor,
    entities::{TrackedProduct, tracked_product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Retrieves every tracked product, newest first.
///
/// Rows created within the same timestamp are ordered by descending id so the
/// listing is stable.
///
/// # Errors
/// Returns an error if the database query fails.
#[instrument(skip(db))]
pub async fn list_tracked_products(
    db: &DatabaseConnection,
) -> Result<Vec<tracked_product::Model>> {
    let products = TrackedProduct::find()
        .order_by_desc(tracked_product::Column::CreatedAt)
        .order_by_desc(tracked_product::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} tracked products.", products.len());
    Ok(products)
}

/// Retrieves a tracked product by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_tracked_product_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<tracked_product::Model>> {
    TrackedProduct::find_by_id(id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a tracked product built from a resolved descriptor.
///
/// `url` is stored exactly as submitted. A blank affiliate link should be
/// passed as `None`.
///
/// # Errors
/// Returns `Error::Database` if the insert fails, including when `url` or the
/// `(store_type, product_id)` pair is already tracked.
#[instrument(skip(db, descriptor), fields(store = %descriptor.store_type, product_id = %descriptor.product_id))]
pub async fn create_tracked_product(
    db: &DatabaseConnection,
    descriptor: &ProductDescriptor,
    url: &str,
    affiliate_link: Option<&str>,
) -> Result<tracked_product::Model> {
    let product = tracked_product::ActiveModel {
        name: Set(descriptor.name.clone()),
        url: Set(url.to_string()),
        product_id: Set(descriptor.product_id.clone()),
        store_type: Set(descriptor.store_type.as_str().to_string()),
        part_number: Set(descriptor.part_number.clone()),
        affiliate_link: Set(affiliate_link.map(str::to_string)),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let model = product.insert(db).await?;
    info!("Added tracked product '{}' (ID: {})", model.name, model.id);
    Ok(model)
}

/// Permanently deletes a tracked product.
///
/// # Errors
/// Returns `Error::ProductNotFound` if no row has this id, or
/// `Error::Database` if the delete fails.
#[instrument(skip(db))]
pub async fn delete_tracked_product(db: &DatabaseConnection, id: i64) -> Result<()> {
    let result = TrackedProduct::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound { id });
    }
    info!("Deleted tracked product {}", id);
    Ok(())
}

/// Counts tracked products.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn count_tracked_products(db: &DatabaseConnection) -> Result<u64> {
    TrackedProduct::find().count(db).await.map_err(Into::into)
}
