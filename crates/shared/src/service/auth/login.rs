use crate::{
    abstract_trait::{DynHashing, DynUserQueryRepository, LoginServiceTrait},
    domain::{
        requests::LoginRequest,
        responses::{ApiResponse, UserResponse},
    },
    errors::ServiceError,
    model::User,
    utils::{Method, OperationTracer},
};
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{Instrument, error, info, warn};

const DUMMY_PASSWORD: &str = "heladeria-dummy-password";

pub struct LoginService {
    query: DynUserQueryRepository,
    hash: DynHashing,
    tracer: OperationTracer,
    // Verified against when the username is unknown.
    dummy_hash: OnceCell<String>,
}

pub struct LoginServiceDeps {
    pub query: DynUserQueryRepository,
    pub hash: DynHashing,
    pub tracer: OperationTracer,
}

impl LoginService {
    pub fn new(deps: LoginServiceDeps) -> Self {
        let LoginServiceDeps { query, hash, tracer } = deps;

        Self {
            query,
            hash,
            tracer,
            dummy_hash: OnceCell::new(),
        }
    }

    async fn verify_dummy(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hash.hash_password(DUMMY_PASSWORD))
            .await;

        match dummy {
            Ok(dummy) => {
                let _ = self.hash.compare_password(dummy, password).await;
            }
            Err(err) => warn!("⚠️ Could not prepare dummy hash: {err}"),
        }
    }
}

#[async_trait]
impl LoginServiceTrait for LoginService {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let method = Method::Post;
        let ctx = self
            .tracer
            .start("authenticate", &[("user.username", username.to_string())]);

        let user = match self
            .query
            .find_by_username(username)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.verify_dummy(password)
                    .instrument(ctx.span.clone())
                    .await;
                warn!("🔒 Unknown user: {username}");
                self.tracer.error(&ctx, method, "Unknown user");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(err) => {
                error!("❌ Failed to query user {username}: {err:?}");
                self.tracer.error(&ctx, method, "Database error");
                return Err(ServiceError::Repo(err));
            }
        };

        if let Err(err) = self
            .hash
            .compare_password(&user.hashed_password, password)
            .instrument(ctx.span.clone())
            .await
        {
            warn!("🔒 Password check failed for {username}: {err}");
            self.tracer.error(&ctx, method, "Invalid password");
            return Err(match err {
                ServiceError::Bcrypt(_) => ServiceError::InvalidCredentials,
                other => other,
            });
        }

        if !user.is_active {
            warn!("🔒 Inactive user tried to authenticate: {username}");
            self.tracer.error(&ctx, method, "Inactive user");
            return Err(ServiceError::InvalidCredentials);
        }

        self.tracer.success(&ctx, method, "User authenticated");
        Ok(user)
    }

    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("🔐 Login attempt for {}", req.username);

        let user = self.authenticate(&req.username, &req.password).await?;

        info!("✅ Login successful for {}", user.username);
        Ok(ApiResponse::success("Login exitoso", UserResponse::from(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::HashingTrait, config::Hashing, repository::InMemoryStore,
    };
    use prometheus_client::registry::Registry;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tokio::sync::Mutex;

    struct CountingHashing {
        inner: Hashing,
        compares: AtomicUsize,
    }

    #[async_trait]
    impl HashingTrait for CountingHashing {
        async fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
            self.inner.hash_password(password).await
        }

        async fn compare_password(
            &self,
            hashed_password: &str,
            password: &str,
        ) -> Result<(), ServiceError> {
            self.compares.fetch_add(1, Ordering::SeqCst);
            self.inner.compare_password(hashed_password, password).await
        }
    }

    #[tokio::test]
    async fn unknown_username_still_runs_a_password_check() {
        let hashing = Arc::new(CountingHashing {
            inner: Hashing::new(4),
            compares: AtomicUsize::new(0),
        });
        let registry = Arc::new(Mutex::new(Registry::default()));
        let service = LoginService::new(LoginServiceDeps {
            query: InMemoryStore::new().user_repository().query,
            hash: hashing.clone(),
            tracer: OperationTracer::new("login_service", registry).await,
        });

        for _ in 0..2 {
            let err = service.authenticate("nadie", "fresa123").await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidCredentials));
        }

        assert_eq!(hashing.compares.load(Ordering::SeqCst), 2);
    }
}
