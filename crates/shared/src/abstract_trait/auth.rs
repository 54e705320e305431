use crate::{
    domain::{
        requests::{LoginRequest, RegisterRequest},
        responses::{ApiResponse, UserResponse},
    },
    errors::ServiceError,
    model::User as UserModel,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynRegisterService = Arc<dyn RegisterServiceTrait + Send + Sync>;
pub type DynLoginService = Arc<dyn LoginServiceTrait + Send + Sync>;
pub type DynIdentityService = Arc<dyn IdentityServiceTrait + Send + Sync>;

#[async_trait]
pub trait RegisterServiceTrait {
    async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError>;
}

#[async_trait]
pub trait LoginServiceTrait {
    /// Unknown user, wrong password and inactive account all fail with
    /// `ServiceError::InvalidCredentials`.
    async fn authenticate(&self, username: &str, password: &str)
    -> Result<UserModel, ServiceError>;
    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<UserResponse>, ServiceError>;
}

#[async_trait]
pub trait IdentityServiceTrait {
    async fn get_me(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ServiceError>;
    async fn list_users(&self) -> Result<ApiResponse<Vec<UserResponse>>, ServiceError>;
}
