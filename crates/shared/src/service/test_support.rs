use crate::{
    abstract_trait::DynHashing,
    config::Hashing,
    domain::requests::{CreateCategoryRequest, CreateProductRequest},
    repository::InMemoryStore,
    service::{AuthService, AuthServiceDeps, CategoryService, ProductService},
};
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn d(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub fn new_product(category_id: i32) -> CreateProductRequest {
    CreateProductRequest {
        name: "Paleta de mango".to_string(),
        flavor: "Mango".to_string(),
        description: None,
        price: d("18.00"),
        wholesale_price: None,
        wholesale_min_quantity: Some(10),
        stock: 40,
        image_url: None,
        category_id,
        active: true,
    }
}

pub struct Fixture {
    pub category_service: CategoryService,
    pub product_service: ProductService,
    pub auth_service: AuthService,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = InMemoryStore::new();
        let registry = Arc::new(Mutex::new(Registry::default()));

        let category_service = CategoryService::new(
            store.category_repository(),
            store.product_repository(),
            registry.clone(),
        )
        .await
        .unwrap();
        let product_service = ProductService::new(
            store.product_repository(),
            store.category_repository(),
            registry.clone(),
        )
        .await
        .unwrap();
        let auth_service = AuthService::new(AuthServiceDeps {
            users: store.user_repository(),
            hash: Arc::new(Hashing::new(4)) as DynHashing,
            registry,
        })
        .await
        .unwrap();

        Self {
            category_service,
            product_service,
            auth_service,
        }
    }

    /// Creates an active category and returns its id.
    pub async fn category(&self, name: &str) -> i32 {
        let req = CreateCategoryRequest {
            name: name.to_string(),
            description: None,
            active: true,
        };
        self.category_service
            .command
            .create_category(&req)
            .await
            .unwrap()
            .data
            .id
    }
}
