mod auth;
mod category;
mod product;

pub use self::auth::{CreateUserRequest, LoginRequest, RegisterRequest};
pub use self::category::{CreateCategoryRequest, FindAllCategories, UpdateCategoryRequest};
pub use self::product::{
    CategoryProductsQuery, CreateProductRequest, FindAllProducts, FindWholesaleProducts,
    PriceQuery, StockQuery, UpdateProductRequest,
};

use serde::{Deserialize, Deserializer};

pub(crate) const DEFAULT_LIMIT: i64 = 100;

pub(crate) fn default_skip() -> i64 {
    0
}

pub(crate) fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

pub(crate) fn default_true() -> bool {
    true
}

/// Keeps an explicit JSON `null` apart from an absent field:
/// absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
