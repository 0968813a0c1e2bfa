pub mod category_routes;
pub mod product_routes;
pub mod tag_routes;
