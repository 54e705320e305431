use crate::{
    abstract_trait::{
        DynHashing, DynUserCommandRepository, DynUserQueryRepository, RegisterServiceTrait,
    },
    domain::{
        requests::{CreateUserRequest, RegisterRequest},
        responses::{ApiResponse, UserResponse},
    },
    errors::{RepositoryError, ServiceError},
    utils::{Method, OperationTracer},
};
use async_trait::async_trait;
use tracing::{Instrument, error, info, warn};

const USERNAME_TAKEN: &str = "El nombre de usuario ya está registrado";

pub struct RegisterService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    hash: DynHashing,
    tracer: OperationTracer,
}

pub struct RegisterServiceDeps {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub hash: DynHashing,
    pub tracer: OperationTracer,
}

impl RegisterService {
    pub fn new(deps: RegisterServiceDeps) -> Self {
        let RegisterServiceDeps {
            query,
            command,
            hash,
            tracer,
        } = deps;

        Self {
            query,
            command,
            hash,
            tracer,
        }
    }
}

#[async_trait]
impl RegisterServiceTrait for RegisterService {
    async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("📝 Registering user: {}", req.username);

        let method = Method::Post;
        let ctx = self
            .tracer
            .start("register", &[("user.username", req.username.clone())]);

        match self
            .query
            .find_by_username(&req.username)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(None) => {}
            Ok(Some(_)) => {
                warn!("⚠️ Username already registered: {}", req.username);
                self.tracer.error(&ctx, method, "Username already registered");
                return Err(ServiceError::Conflict(USERNAME_TAKEN.to_string()));
            }
            Err(err) => {
                error!("❌ Failed to look up user {}: {err:?}", req.username);
                self.tracer.error(&ctx, method, "Failed to look up user");
                return Err(ServiceError::Repo(err));
            }
        }

        let hashed_password = match self
            .hash
            .hash_password(&req.password)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(hashed) => hashed,
            Err(err) => {
                error!("❌ Failed to hash password: {err:?}");
                self.tracer.error(&ctx, method, "Failed to hash password");
                return Err(err);
            }
        };

        let create = CreateUserRequest {
            username: req.username.clone(),
            hashed_password,
            is_active: req.is_active,
        };

        let user = match self
            .command
            .create_user(&create)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(user) => user,
            // Lost a race with a concurrent registration of the same name.
            Err(RepositoryError::AlreadyExists(_)) => {
                self.tracer.error(&ctx, method, "Username already registered");
                return Err(ServiceError::Conflict(USERNAME_TAKEN.to_string()));
            }
            Err(err) => {
                error!("❌ Failed to create user: {err:?}");
                self.tracer.error(&ctx, method, "Failed to create user");
                return Err(ServiceError::Repo(err));
            }
        };

        info!("✅ Registered user ID {} ({})", user.id, user.username);
        self.tracer
            .success(&ctx, method, "User registered successfully");

        Ok(ApiResponse::success(
            "Usuario registrado exitosamente",
            UserResponse::from(user),
        ))
    }
}
