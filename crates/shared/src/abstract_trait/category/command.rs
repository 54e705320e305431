use crate::{
    domain::{
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
        responses::{ApiResponse, CategoryResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{ActivationState, Category as CategoryModel},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCategoryCommandRepository = Arc<dyn CategoryCommandRepositoryTrait + Send + Sync>;
pub type DynCategoryCommandService = Arc<dyn CategoryCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait CategoryCommandRepositoryTrait {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<CategoryModel, RepositoryError>;

    /// Writes every column of `category`. Returns `None` when the row is missing, or when
    /// the write would deactivate a category that still owns active products.
    async fn update_category(
        &self,
        category: &CategoryModel,
    ) -> Result<Option<CategoryModel>, RepositoryError>;

    /// Same guard as `update_category` for `ActivationState::Inactive`.
    async fn set_state(
        &self,
        id: i32,
        state: ActivationState,
    ) -> Result<Option<CategoryModel>, RepositoryError>;
}

#[async_trait]
pub trait CategoryCommandServiceTrait {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError>;
    async fn update_category(
        &self,
        id: i32,
        req: &UpdateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError>;
    async fn soft_delete_category(
        &self,
        id: i32,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError>;
    async fn activate_category(&self, id: i32)
    -> Result<ApiResponse<CategoryResponse>, ServiceError>;
}
