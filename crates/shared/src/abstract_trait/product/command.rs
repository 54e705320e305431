use crate::{
    domain::{
        requests::{CreateProductRequest, UpdateProductRequest},
        responses::{ApiResponse, ProductResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{ActivationState, Product as ProductModel},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;
pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError>;
    /// Writes every column of `product` and refreshes `updated_at`.
    async fn update_product(&self, product: &ProductModel)
    -> Result<ProductModel, RepositoryError>;
    async fn set_state(
        &self,
        id: i32,
        state: ActivationState,
    ) -> Result<ProductModel, RepositoryError>;
    async fn update_stock(&self, id: i32, stock: i32) -> Result<ProductModel, RepositoryError>;
}

#[async_trait]
pub trait ProductCommandServiceTrait {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn soft_delete_product(
        &self,
        id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn activate_product(&self, id: i32)
    -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn update_stock(
        &self,
        id: i32,
        new_stock: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError>;
}
