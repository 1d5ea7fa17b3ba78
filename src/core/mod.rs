//! Core business logic - framework-agnostic resolution, storage and catalog operations.

/// Add/delete actions used by the admin page
pub mod catalog;
/// Tracked product storage
pub mod product;
/// Product URL to descriptor resolution
pub mod resolver;
