//! SeaORM entities for the catalog tables.
//!
//! One module per table: categories form a hierarchy through `parent_id`,
//! products belong to exactly one category, and the `product_tags` junction
//! links products to tags many-to-many.

pub mod category;
pub mod product;
pub mod product_tag;
pub mod tag;

// Prelude module for easy importing of all entities and their related types
pub mod prelude {
    pub use super::category::Entity as Category;
    pub use super::category::Model as CategoryModel;
    pub use super::category::ActiveModel as CategoryActiveModel;
    pub use super::category::Column as CategoryColumn;

    pub use super::product::Entity as Product;
    pub use super::product::Model as ProductModel;
    pub use super::product::ActiveModel as ProductActiveModel;
    pub use super::product::Column as ProductColumn;

    pub use super::product_tag::Entity as ProductTag;
    pub use super::product_tag::Model as ProductTagModel;
    pub use super::product_tag::ActiveModel as ProductTagActiveModel;
    pub use super::product_tag::Column as ProductTagColumn;

    pub use super::tag::Entity as Tag;
    pub use super::tag::Model as TagModel;
    pub use super::tag::ActiveModel as TagActiveModel;
    pub use super::tag::Column as TagColumn;
}
