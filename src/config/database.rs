//! Database configuration module.
//!
//! Handles the `SQLite` connection and schema creation through `SeaORM`. The
//! table is generated from the entity definition with
//! `Schema::create_table_from_entity`; the composite `(store_type, product_id)`
//! uniqueness rule is not expressible on the entity and is added as an index.

use crate::entities::{TrackedProduct, TrackedProductColumn};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Used when neither the config file nor `DATABASE_URL` name a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://stock_tracker.sqlite?mode=rwc";

/// Name of the unique index over `(store_type, product_id)`.
pub const STORE_PRODUCT_INDEX: &str = "idx_tracked_products_store_product";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling
/// back to `configured`, then to [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the tracked products table and its indexes if they do not exist yet.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let table = schema
        .create_table_from_entity(TrackedProduct)
        .if_not_exists()
        .to_owned();
    let store_product_index = Index::create()
        .name(STORE_PRODUCT_INDEX)
        .table(TrackedProduct)
        .col(TrackedProductColumn::StoreType)
        .col(TrackedProductColumn::ProductId)
        .unique()
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&table)).await?;
    db.execute(builder.build(&store_product_index)).await?;
    info!("Database tables ensured.");

    Ok(())
}
