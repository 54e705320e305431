use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Offset window of a list response. `total` counts every matching row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
    pub total: i64,
}

impl Pagination {
    pub fn new(skip: i64, limit: i64, total: i64) -> Self {
        Self { skip, limit, total }
    }
}
