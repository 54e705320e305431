mod api;
mod category;
mod pagination;
mod product;
mod user;

pub use self::api::{ApiResponse, ApiResponsePagination};
pub use self::category::{CategoryResponse, CategoryWithProductsResponse};
pub use self::pagination::Pagination;
pub use self::product::{PriceResponse, ProductResponse, ProductWithCategoryResponse};
pub use self::user::UserResponse;
