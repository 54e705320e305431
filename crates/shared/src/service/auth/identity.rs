use crate::{
    abstract_trait::{DynUserQueryRepository, IdentityServiceTrait},
    domain::responses::{ApiResponse, UserResponse},
    errors::ServiceError,
    utils::{Method, OperationTracer},
};
use async_trait::async_trait;
use tracing::{Instrument, error};

pub struct IdentityService {
    query: DynUserQueryRepository,
    tracer: OperationTracer,
}

impl IdentityService {
    pub fn new(query: DynUserQueryRepository, tracer: OperationTracer) -> Self {
        Self { query, tracer }
    }
}

#[async_trait]
impl IdentityServiceTrait for IdentityService {
    async fn get_me(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ServiceError> {
        let method = Method::Get;
        let ctx = self.tracer.start("get_me", &[("user.id", user_id.to_string())]);

        let user = match self
            .query
            .find_by_id(user_id)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.tracer.error(&ctx, method, "User not found");
                return Err(ServiceError::NotFound("Usuario no encontrado".to_string()));
            }
            Err(err) => {
                error!("❌ Failed to fetch user {user_id}: {err:?}");
                self.tracer.error(&ctx, method, "Failed to fetch user");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer.success(&ctx, method, "Profile retrieved");
        Ok(ApiResponse::success(
            "Usuario obtenido exitosamente",
            UserResponse::from(user),
        ))
    }

    async fn list_users(&self) -> Result<ApiResponse<Vec<UserResponse>>, ServiceError> {
        let method = Method::Get;
        let ctx = self.tracer.start("list_users", &[]);

        let users = match self.query.find_all().instrument(ctx.span.clone()).await {
            Ok(users) => users,
            Err(err) => {
                error!("❌ Failed to fetch users: {err:?}");
                self.tracer.error(&ctx, method, "Failed to fetch users");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer.success(&ctx, method, "Users retrieved");
        Ok(ApiResponse::success(
            "Usuarios obtenidos exitosamente",
            users.into_iter().map(UserResponse::from).collect(),
        ))
    }
}
