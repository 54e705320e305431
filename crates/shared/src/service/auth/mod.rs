mod identity;
mod login;
mod register;

use self::identity::IdentityService;
use self::login::{LoginService, LoginServiceDeps};
use self::register::{RegisterService, RegisterServiceDeps};
use crate::{
    abstract_trait::{DynHashing, DynIdentityService, DynLoginService, DynRegisterService},
    repository::UserRepository,
    utils::OperationTracer,
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AuthService {
    pub identity: DynIdentityService,
    pub login: DynLoginService,
    pub register: DynRegisterService,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("identity", &"Arc<dyn IdentityServiceTrait>")
            .field("login", &"Arc<dyn LoginServiceTrait>")
            .field("register", &"Arc<dyn RegisterServiceTrait>")
            .finish()
    }
}

#[derive(Clone)]
pub struct AuthServiceDeps {
    pub users: UserRepository,
    pub hash: DynHashing,
    pub registry: Arc<Mutex<Registry>>,
}

impl AuthService {
    pub async fn new(deps: AuthServiceDeps) -> Result<Self> {
        let AuthServiceDeps {
            users,
            hash,
            registry,
        } = deps;

        let identity = Arc::new(IdentityService::new(
            users.query.clone(),
            OperationTracer::new("identity_service", registry.clone()).await,
        )) as DynIdentityService;

        let login = Arc::new(LoginService::new(LoginServiceDeps {
            query: users.query.clone(),
            hash: hash.clone(),
            tracer: OperationTracer::new("login_service", registry.clone()).await,
        })) as DynLoginService;

        let register = Arc::new(RegisterService::new(RegisterServiceDeps {
            query: users.query,
            command: users.command,
            hash,
            tracer: OperationTracer::new("register_service", registry).await,
        })) as DynRegisterService;

        Ok(Self {
            identity,
            login,
            register,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        abstract_trait::{AccessPolicyTrait, Capability},
        domain::requests::{LoginRequest, RegisterRequest},
        errors::ServiceError,
        service::{ActiveUserPolicy, test_support::Fixture},
    };

    fn register(username: &str, is_active: bool) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "fresa123".to_string(),
            is_active,
        }
    }

    #[tokio::test]
    async fn registered_user_can_authenticate() {
        let fx = Fixture::new().await;
        let auth = &fx.auth_service;

        let created = auth.register.register(&register("ana", true)).await.unwrap();
        assert_eq!(created.data.username, "ana");

        let user = auth.login.authenticate("ana", "fresa123").await.unwrap();
        assert_eq!(user.id, created.data.id);
        assert_ne!(user.hashed_password, "fresa123");

        let login = LoginRequest {
            username: "ana".to_string(),
            password: "fresa123".to_string(),
        };
        assert_eq!(auth.login.login(&login).await.unwrap().message, "Login exitoso");
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let fx = Fixture::new().await;
        let auth = &fx.auth_service;

        auth.register.register(&register("ana", true)).await.unwrap();
        let err = auth.register.register(&register("ana", true)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(auth.identity.list_users().await.unwrap().data.len(), 1);
    }

    #[tokio::test]
    async fn every_failure_is_the_same_invalid_credentials() {
        let fx = Fixture::new().await;
        let auth = &fx.auth_service;
        auth.register.register(&register("ana", true)).await.unwrap();
        auth.register.register(&register("beto", false)).await.unwrap();

        for (username, password) in [("ana", "wrong"), ("nadie", "fresa123"), ("beto", "fresa123")] {
            let err = auth.login.authenticate(username, password).await.unwrap_err();
            assert!(
                matches!(err, ServiceError::InvalidCredentials),
                "{username}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn identity_lists_and_fetches_users() {
        let fx = Fixture::new().await;
        let auth = &fx.auth_service;
        let ana = auth.register.register(&register("ana", true)).await.unwrap();
        auth.register.register(&register("beto", true)).await.unwrap();

        let me = auth.identity.get_me(ana.data.id).await.unwrap();
        assert_eq!(me.data.username, "ana");
        assert_eq!(auth.identity.list_users().await.unwrap().data.len(), 2);

        let err = auth.identity.get_me(99).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn active_user_policy_grants_everything_to_active_users() {
        let fx = Fixture::new().await;
        fx.auth_service
            .register
            .register(&register("ana", true))
            .await
            .unwrap();
        let mut user = fx
            .auth_service
            .login
            .authenticate("ana", "fresa123")
            .await
            .unwrap();

        let policy = ActiveUserPolicy;
        for capability in [
            Capability::ManageCatalog,
            Capability::ViewProfile,
            Capability::ViewUsers,
        ] {
            assert!(policy.authorize(&user, capability).is_ok());
        }

        user.is_active = false;
        let err = policy.authorize(&user, Capability::ManageCatalog).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
