use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

// Maps a field that was present in the JSON to Some(value); combined with
// `#[serde(default)]` this tells an absent field (None) apart from an
// explicit null (Some(None)).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// Model for creating a new category
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub parent_id: Option<i32>,
}

// Model for updating an existing category; absent fields stay unchanged.
// `parentId: null` detaches the category to a root, an absent `parentId`
// leaves the parent alone.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i32>>,
}

// Model for creating a new tag
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub name: String,
}

// Model for updating an existing tag
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}

// Model for creating a new product
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category_id: i32,
    pub tag_ids: Option<Vec<i32>>,
}

// Model for updating an existing product; a provided tag set fully replaces
// the previous links, an absent one leaves them alone
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub tag_ids: Option<Vec<i32>>,
}
