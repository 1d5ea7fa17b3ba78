//! Shared test utilities.
//!
//! Helpers for setting up an in-memory database and inserting tracked products
//! with sensible defaults.

use crate::{
    core::{
        product,
        resolver::{ProductDescriptor, StoreType, format_display_name},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output to the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Descriptor for `store` with the given id and a generic name.
pub fn test_descriptor(store: StoreType, product_id: &str) -> ProductDescriptor {
    ProductDescriptor {
        name: format_display_name(store, Some("test-product")),
        product_id: product_id.to_string(),
        store_type: store,
        part_number: (store == StoreType::Apple).then(|| product_id.to_string()),
    }
}

/// Inserts a Croma product with numeric id `product_id`.
///
/// # Defaults
/// * url: `https://www.croma.com/test-product/p/<product_id>`
/// * `affiliate_link`: None
pub async fn create_test_product(
    db: &DatabaseConnection,
    product_id: &str,
) -> Result<entities::tracked_product::Model> {
    product::create_tracked_product(
        db,
        &test_descriptor(StoreType::Croma, product_id),
        &format!("https://www.croma.com/test-product/p/{product_id}"),
        None,
    )
    .await
}
