//! The `services` module is the high-level API over the catalog store.
//! It encapsulates all query construction and data access patterns so the
//! HTTP layer can work with domain models without knowing the underlying
//! schema.
//!
//! One sub-module per domain entity; their public functions are re-exported
//! here for convenient access under the `crate::db::services::` path.

pub mod category_service;
pub mod product_service;
pub mod tag_service;

pub use category_service::*;
pub use product_service::*;
pub use tag_service::*;
