//! Unified error types for the stock tracker.
//!
//! Resolution failures keep their own type ([`ResolveError`]) because their
//! messages are shown to the admin verbatim; everything else funnels into
//! [`Error`].

use crate::core::resolver::ResolveError;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description of the problem
        message: String,
    },

    /// Any failure reported by the record store.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (binding the listener, reading files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The submitted URL could not be turned into a product descriptor.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// No tracked product has the given id.
    #[error("Tracked product {id} not found")]
    ProductNotFound {
        /// Id that was looked up
        id: i64,
    },

    /// The HTTP server failed at startup or while serving.
    #[error("Server error: {message}")]
    Server {
        /// Human readable description of the problem
        message: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
