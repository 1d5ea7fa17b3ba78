//! Tracked product entity - One store listing the admin wants watched.
//!
//! Rows are created from a resolved URL and removed by id; they are never
//! updated in place. `url` is unique, and a separate unique index on
//! `(store_type, product_id)` is created alongside the table.

use crate::core::resolver::{ResolveError, StoreType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tracked product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tracked_products")]
pub struct Model {
    /// Unique identifier for the tracked product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display label derived from the URL, e.g. "(Croma) sony wh 1000xm5..."
    pub name: String,
    /// URL exactly as it was submitted
    #[sea_orm(unique)]
    pub url: String,
    /// Store specific identifier (PID, ASIN, numeric id or part number)
    pub product_id: String,
    /// Lowercase store tag ("flipkart", "amazon", "apple", "croma")
    pub store_type: String,
    /// Manual part number, Apple only
    pub part_number: Option<String>,
    /// Optional affiliate link to send instead of the raw URL
    pub affiliate_link: Option<String>,
    /// When the product was added
    pub created_at: DateTime,
}

impl Model {
    /// Parses the stored tag back into a [`StoreType`].
    ///
    /// # Errors
    /// Returns [`ResolveError::UnknownStoreType`] if the row holds a tag this
    /// build does not know.
    pub fn store(&self) -> Result<StoreType, ResolveError> {
        self.store_type.parse()
    }
}

/// Tracked products have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
