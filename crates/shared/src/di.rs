use crate::{
    abstract_trait::{DynAccessPolicy, DynHashing},
    config::ConnectionPool,
    repository::{CategoryRepository, ProductRepository, UserRepository},
    service::{ActiveUserPolicy, AuthService, AuthServiceDeps, CategoryService, ProductService},
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: AuthService,
    pub category_service: CategoryService,
    pub product_service: ProductService,
    pub access_policy: DynAccessPolicy,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"<AuthService>")
            .field("category_service", &"<CategoryService>")
            .field("product_service", &"<ProductService>")
            .field("access_policy", &"<dyn AccessPolicy>")
            .finish()
    }
}

/// Repository handles the services are wired against.
#[derive(Clone)]
pub struct Repositories {
    pub categories: CategoryRepository,
    pub products: ProductRepository,
    pub users: UserRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    #[cfg(any(test, feature = "testing"))]
    pub fn in_memory() -> Self {
        let store = crate::repository::InMemoryStore::new();
        Self {
            categories: store.category_repository(),
            products: store.product_repository(),
            users: store.user_repository(),
        }
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub repositories: Repositories,
    pub hash: DynHashing,
    pub registry: Arc<Mutex<Registry>>,
}

impl DependenciesInject {
    pub async fn new(deps: DependenciesInjectDeps) -> Result<Self> {
        let DependenciesInjectDeps {
            repositories,
            hash,
            registry,
        } = deps;

        let Repositories {
            categories,
            products,
            users,
        } = repositories;

        let category_service =
            CategoryService::new(categories.clone(), products.clone(), registry.clone()).await?;

        let product_service = ProductService::new(products, categories, registry.clone()).await?;

        let auth_service = AuthService::new(AuthServiceDeps {
            users,
            hash,
            registry,
        })
        .await?;

        let access_policy = Arc::new(ActiveUserPolicy) as DynAccessPolicy;

        Ok(Self {
            auth_service,
            category_service,
            product_service,
            access_policy,
        })
    }
}
