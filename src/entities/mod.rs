//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod tracked_product;

pub use tracked_product::{
    Column as TrackedProductColumn, Entity as TrackedProduct, Model as TrackedProductModel,
};
