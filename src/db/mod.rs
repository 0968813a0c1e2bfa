pub mod category_tree;
pub mod entities;
pub mod error;
pub mod services;

pub use error::StoreError;
