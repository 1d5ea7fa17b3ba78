//! Route handlers for the admin page and its small JSON surface.

use crate::{
    cache::LISTING_PATH,
    core::{
        catalog::{self, ActionOutcome, AddProductForm, DeleteOutcome},
        product,
    },
    entities::tracked_product,
    web::{
        AppState,
        error::WebResult,
        views::{self, FlashKind},
    },
};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Flash shown after any delete request; failures are not reported.
pub const PRODUCT_DELETED: &str = "Product deleted.";

/// Flash shown when the confirmation page is opened for an unknown id.
pub const PRODUCT_NOT_FOUND: &str = "Product not found.";

/// One-shot status message carried through the redirect after a form post.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    /// Success message
    pub success: Option<String>,
    /// Error message
    pub error: Option<String>,
}

impl FlashQuery {
    fn banner(&self) -> Option<(FlashKind, &str)> {
        self.error
            .as_deref()
            .map(|m| (FlashKind::Error, m))
            .or_else(|| self.success.as_deref().map(|m| (FlashKind::Success, m)))
    }
}

/// `/?success=..` or `/?error=..` for an outcome.
#[must_use]
pub fn flash_location(outcome: &ActionOutcome) -> String {
    let key = match outcome {
        ActionOutcome::Success(_) => "success",
        ActionOutcome::Error(_) => "error",
    };
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, outcome.message())
        .finish();
    format!("{LISTING_PATH}?{query}")
}

async fn listing_fragment(state: &AppState) -> WebResult<Arc<str>> {
    if let Some(html) = state.cache.get(LISTING_PATH).await {
        return Ok(html);
    }
    let epoch = state.cache.epoch().await;
    let products = catalog::list_products(&state.db).await?;
    let html: Arc<str> = Arc::from(views::render_listing(&products));
    state
        .cache
        .store(LISTING_PATH, Arc::clone(&html), epoch)
        .await;
    debug!("Rendered listing with {} products", products.len());
    Ok(html)
}

/// GET /
pub async fn index(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> WebResult<Html<String>> {
    let listing = listing_fragment(&state).await?;
    Ok(Html(views::render_page(&listing, flash.banner())))
}

/// POST /products
pub async fn add_product(
    State(state): State<AppState>,
    Form(form): Form<AddProductForm>,
) -> Redirect {
    let outcome = catalog::add_product(&state.db, &state.cache, &state.resolver, &form).await;
    Redirect::to(&flash_location(&outcome))
}

/// GET /products/{id}/delete
///
/// Confirmation step; the actual delete is the POST to the same path.
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Response> {
    let found = match id.parse::<i64>() {
        Ok(id) => product::get_tracked_product_by_id(&state.db, id).await?,
        Err(_) => None,
    };
    Ok(found.map_or_else(
        || {
            Redirect::to(&flash_location(&ActionOutcome::Error(
                PRODUCT_NOT_FOUND.to_string(),
            )))
            .into_response()
        },
        |product| Html(views::render_confirm_delete(&product)).into_response(),
    ))
}

/// POST /products/{id}/delete
///
/// An id that is not a number is treated as absent.
pub async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let outcome = catalog::delete_product(&state.db, &state.cache, id.parse().ok()).await;
    if let DeleteOutcome::Ignored { reason } = &outcome {
        warn!("Delete of '{}' ignored: {}", id, reason);
    }
    Redirect::to(&flash_location(&ActionOutcome::Success(
        PRODUCT_DELETED.to_string(),
    )))
}

/// GET /api/products
pub async fn list_products_json(
    State(state): State<AppState>,
) -> WebResult<Json<Vec<tracked_product::Model>>> {
    Ok(Json(catalog::list_products(&state.db).await?))
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
