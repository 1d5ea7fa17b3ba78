//! Product catalog - the add and delete actions behind the admin page.
//!
//! Resolution errors reach the admin word for word. Store failures on insert
//! are logged and replaced by one generic message. Delete failures are never
//! reported to the page; they come back as [`DeleteOutcome::Ignored`] so
//! callers and tests can see them.

use crate::{
    cache::{LISTING_PATH, PageCache},
    core::{product, resolver::Resolver},
    entities::tracked_product,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

/// Returned when the form has no URL.
pub const URL_REQUIRED: &str = "URL is required.";

/// Returned for any store failure while adding.
pub const ADD_FAILED: &str = "Failed to add product. Is it a duplicate?";

/// Fields submitted by the add product form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductForm {
    /// Product page URL
    pub url: Option<String>,
    /// Manual part number, required for Apple
    pub part_number: Option<String>,
    /// Optional affiliate link
    pub affiliate_link: Option<String>,
}

/// Success or failure message for the admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action went through
    Success(String),
    /// The action was rejected
    Error(String),
}

impl ActionOutcome {
    /// Message to show, whichever variant this is.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row was removed and the listing invalidated
    Deleted,
    /// No id was given, so nothing was attempted
    Skipped,
    /// The store refused; deliberately not surfaced to the admin
    Ignored {
        /// Logged cause
        reason: String,
    },
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolves the submitted URL and tracks the product.
///
/// The URL is stored as submitted (surrounding whitespace trimmed). Blank
/// optional fields are treated as absent.
#[instrument(skip(db, cache, resolver, form))]
pub async fn add_product(
    db: &DatabaseConnection,
    cache: &PageCache,
    resolver: &Resolver,
    form: &AddProductForm,
) -> ActionOutcome {
    let Some(url) = non_blank(form.url.as_deref()) else {
        return ActionOutcome::Error(URL_REQUIRED.to_string());
    };

    let descriptor = match resolver.resolve(url, non_blank(form.part_number.as_deref())) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            info!("Rejected URL '{}': {}", url, e);
            return ActionOutcome::Error(e.to_string());
        }
    };

    let affiliate_link = non_blank(form.affiliate_link.as_deref());
    match product::create_tracked_product(db, &descriptor, url, affiliate_link).await {
        Ok(model) => {
            cache.invalidate(LISTING_PATH).await;
            ActionOutcome::Success(format!("Added {}", model.name))
        }
        Err(e) => {
            error!("Failed to insert tracked product for '{}': {}", url, e);
            ActionOutcome::Error(ADD_FAILED.to_string())
        }
    }
}

/// Deletes a tracked product, best effort.
#[instrument(skip(db, cache))]
pub async fn delete_product(
    db: &DatabaseConnection,
    cache: &PageCache,
    id: Option<i64>,
) -> DeleteOutcome {
    let Some(id) = id else {
        return DeleteOutcome::Skipped;
    };

    match product::delete_tracked_product(db, id).await {
        Ok(()) => {
            cache.invalidate(LISTING_PATH).await;
            DeleteOutcome::Deleted
        }
        Err(e) => {
            warn!("Ignoring failed delete of tracked product {}: {}", id, e);
            DeleteOutcome::Ignored {
                reason: e.to_string(),
            }
        }
    }
}

/// All tracked products, newest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<tracked_product::Model>> {
    product::list_tracked_products(db).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::product::count_tracked_products;
    use crate::test_utils::*;
    use sea_orm::ConnectionTrait;
    use std::sync::Arc;

    fn form(url: &str) -> AddProductForm {
        AddProductForm {
            url: Some(url.to_string()),
            ..AddProductForm::default()
        }
    }

    async fn primed_cache() -> PageCache {
        let cache = PageCache::new();
        let epoch = cache.epoch().await;
        cache.store(LISTING_PATH, Arc::from("old"), epoch).await;
        cache
    }

    #[tokio::test]
    async fn test_add_requires_url() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = primed_cache().await;

        for url in [None, Some(String::new()), Some("   ".to_string())] {
            let outcome = add_product(
                &db,
                &cache,
                &Resolver::default(),
                &AddProductForm {
                    url,
                    ..AddProductForm::default()
                },
            )
            .await;
            assert_eq!(outcome, ActionOutcome::Error(URL_REQUIRED.to_string()));
        }
        assert_eq!(count_tracked_products(&db).await?, 0);
        assert!(cache.get(LISTING_PATH).await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_propagates_resolution_error() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = primed_cache().await;

        let outcome = add_product(
            &db,
            &cache,
            &Resolver::default(),
            &form("https://www.apple.com/in/shop/buy-iphone/iphone-15"),
        )
        .await;
        assert_eq!(
            outcome,
            ActionOutcome::Error("Apple products require a Part Number.".to_string())
        );
        assert_eq!(count_tracked_products(&db).await?, 0);
        assert!(cache.get(LISTING_PATH).await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_success_stores_and_invalidates() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = primed_cache().await;
        let url = "https://www.apple.com/in/shop/buy-iphone/iphone-15";

        let outcome = add_product(
            &db,
            &cache,
            &Resolver::default(),
            &AddProductForm {
                url: Some(format!("  {url} ")),
                part_number: Some("MU7X3".to_string()),
                affiliate_link: Some(String::new()),
            },
        )
        .await;
        assert_eq!(
            outcome,
            ActionOutcome::Success("Added (Apple) buy iphone...".to_string())
        );
        assert!(cache.get(LISTING_PATH).await.is_none());

        let products = list_products(&db).await?;
        assert_eq!(products.len(), 1);
        let stored = &products[0];
        assert_eq!(stored.url, url);
        assert_eq!(stored.product_id, "MU7X3");
        assert_eq!(stored.part_number.as_deref(), Some("MU7X3"));
        assert_eq!(stored.store_type, "apple");
        assert!(stored.affiliate_link.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_keeps_affiliate_link() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = PageCache::new();

        add_product(
            &db,
            &cache,
            &Resolver::default(),
            &AddProductForm {
                url: Some("https://www.croma.com/sony-wh-1000xm5/p/123456".to_string()),
                part_number: None,
                affiliate_link: Some("https://croma.cc/aff-link".to_string()),
            },
        )
        .await;

        let products = list_products(&db).await?;
        assert_eq!(
            products[0].affiliate_link.as_deref(),
            Some("https://croma.cc/aff-link")
        );
        assert!(products[0].part_number.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_duplicate_is_generic_error() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = PageCache::new();
        let resolver = Resolver::default();
        let url = "https://www.amazon.in/Some-Product/dp/B0CX59H5W7";

        let first = add_product(&db, &cache, &resolver, &form(url)).await;
        assert!(matches!(first, ActionOutcome::Success(_)));

        let epoch = cache.epoch().await;
        cache.store(LISTING_PATH, Arc::from("current"), epoch).await;

        let duplicate_url = add_product(&db, &cache, &resolver, &form(url)).await;
        assert_eq!(duplicate_url, ActionOutcome::Error(ADD_FAILED.to_string()));

        // Different URL, same ASIN.
        let duplicate_asin = add_product(
            &db,
            &cache,
            &resolver,
            &form("https://www.amazon.in/Other-Name/dp/B0CX59H5W7?ref=x"),
        )
        .await;
        assert_eq!(duplicate_asin, ActionOutcome::Error(ADD_FAILED.to_string()));

        assert_eq!(count_tracked_products(&db).await?, 1);
        assert_eq!(cache.get(LISTING_PATH).await.as_deref(), Some("current"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_store_failure_hides_cause() -> Result<()> {
        let db = setup_test_db().await?;
        db.execute_unprepared("DROP TABLE tracked_products").await?;

        let outcome = add_product(
            &db,
            &PageCache::new(),
            &Resolver::default(),
            &form("https://www.croma.com/some-product/p/123456"),
        )
        .await;
        assert_eq!(outcome, ActionOutcome::Error(ADD_FAILED.to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_without_id_is_skipped() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = primed_cache().await;

        assert_eq!(delete_product(&db, &cache, None).await, DeleteOutcome::Skipped);
        assert!(cache.get(LISTING_PATH).await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_ignored() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "1").await?;
        let cache = primed_cache().await;

        let outcome = delete_product(&db, &cache, Some(9999)).await;
        assert!(matches!(outcome, DeleteOutcome::Ignored { .. }));
        assert_eq!(count_tracked_products(&db).await?, 1);
        assert!(cache.get(LISTING_PATH).await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_existing_invalidates_listing() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "1").await?;
        let cache = primed_cache().await;

        let outcome = delete_product(&db, &cache, Some(product.id)).await;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(list_products(&db).await?.is_empty());
        assert!(cache.get(LISTING_PATH).await.is_none());
        Ok(())
    }

    #[test]
    fn test_form_field_names_match_the_page() {
        let form: AddProductForm = serde_json::from_str(
            r#"{"url":"https://x","partNumber":"MU7X3","affiliateLink":"https://a"}"#,
        )
        .unwrap();
        assert_eq!(form.part_number.as_deref(), Some("MU7X3"));
        assert_eq!(form.affiliate_link.as_deref(), Some("https://a"));
    }
}
