use crate::{
    domain::{
        requests::{FindAllProducts, FindWholesaleProducts},
        responses::{
            ApiResponse, ApiResponsePagination, PriceResponse, ProductResponse,
            ProductWithCategoryResponse,
        },
    },
    errors::{RepositoryError, ServiceError},
    model::Product as ProductModel,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;
pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError>;
    /// Active products with both wholesale fields set.
    async fn find_wholesale(
        &self,
        req: &FindWholesaleProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError>;
    /// `active = None` returns every product of the category.
    async fn find_by_category(
        &self,
        category_id: i32,
        active: Option<bool>,
    ) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn count_active_by_category(&self, category_id: i32) -> Result<i64, RepositoryError>;
}

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductWithCategoryResponse>>, ServiceError>;
    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<ApiResponse<ProductWithCategoryResponse>, ServiceError>;
    async fn find_wholesale(
        &self,
        req: &FindWholesaleProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductWithCategoryResponse>>, ServiceError>;
    async fn find_by_category(
        &self,
        category_id: i32,
        active: bool,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
    async fn calculate_price(
        &self,
        id: i32,
        quantity: i32,
    ) -> Result<ApiResponse<PriceResponse>, ServiceError>;
}
