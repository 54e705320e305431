use crate::{
    abstract_trait::{
        CategoryCommandRepositoryTrait, CategoryQueryRepositoryTrait,
        DynCategoryCommandRepository, DynCategoryQueryRepository, DynProductCommandRepository,
        DynProductQueryRepository, DynUserCommandRepository, DynUserQueryRepository,
        ProductCommandRepositoryTrait, ProductQueryRepositoryTrait, UserCommandRepositoryTrait,
        UserQueryRepositoryTrait,
    },
    domain::requests::{
        CreateCategoryRequest, CreateProductRequest, CreateUserRequest, FindAllCategories,
        FindAllProducts, FindWholesaleProducts,
    },
    errors::RepositoryError,
    model::{ActivationState, Category, Product, User},
    repository::{CategoryRepository, ProductRepository, UserRepository},
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    products: BTreeMap<i32, Product>,
    users: BTreeMap<i32, User>,
    next_category_id: i32,
    next_product_id: i32,
    next_user_id: i32,
}

impl Tables {
    fn category_has_active_products(&self, category_id: i32) -> bool {
        self.products
            .values()
            .any(|p| p.category_id == category_id && p.active)
    }

    fn check_product(&self, product: &Product) -> Result<(), RepositoryError> {
        if !self.categories.contains_key(&product.category_id) {
            return Err(RepositoryError::ForeignKey(
                "products_category_id_fkey".to_string(),
            ));
        }
        if product.price <= Decimal::ZERO {
            return Err(RepositoryError::Check("products_price_check".to_string()));
        }
        if product.wholesale_price.is_some_and(|p| p <= Decimal::ZERO) {
            return Err(RepositoryError::Check(
                "products_wholesale_price_check".to_string(),
            ));
        }
        if product.wholesale_min_quantity.is_some_and(|q| q <= 0) {
            return Err(RepositoryError::Check(
                "products_wholesale_min_quantity_check".to_string(),
            ));
        }
        if product.stock < 0 {
            return Err(RepositoryError::Check("products_stock_check".to_string()));
        }
        Ok(())
    }
}

/// Postgres stand-in for tests: same ordering, unique keys, foreign keys and
/// deactivation guard as the SQL repositories.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn category_repository(self: &Arc<Self>) -> CategoryRepository {
        CategoryRepository {
            query: self.clone() as DynCategoryQueryRepository,
            command: self.clone() as DynCategoryCommandRepository,
        }
    }

    pub fn product_repository(self: &Arc<Self>) -> ProductRepository {
        ProductRepository {
            query: self.clone() as DynProductQueryRepository,
            command: self.clone() as DynProductCommandRepository,
        }
    }

    pub fn user_repository(self: &Arc<Self>) -> UserRepository {
        UserRepository {
            query: self.clone() as DynUserQueryRepository,
            command: self.clone() as DynUserCommandRepository,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::Custom("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::Custom("lock poisoned".to_string()))
    }
}

fn page<T: Clone>(rows: Vec<&T>, skip: i64, limit: i64) -> (Vec<T>, i64) {
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect();
    (items, total)
}

#[async_trait]
impl CategoryQueryRepositoryTrait for InMemoryStore {
    async fn find_all(
        &self,
        req: &FindAllCategories,
    ) -> Result<(Vec<Category>, i64), RepositoryError> {
        let tables = self.read()?;
        let rows = tables
            .categories
            .values()
            .filter(|c| req.active.is_none_or(|active| c.active == active))
            .collect();
        Ok(page(rows, req.skip, req.limit))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepositoryError> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        Ok(self
            .read()?
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Category>, RepositoryError> {
        let tables = self.read()?;
        Ok(tables
            .categories
            .values()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CategoryCommandRepositoryTrait for InMemoryStore {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<Category, RepositoryError> {
        let mut tables = self.write()?;
        if tables.categories.values().any(|c| c.name == req.name) {
            return Err(RepositoryError::AlreadyExists(
                "categories_name_key".to_string(),
            ));
        }

        tables.next_category_id += 1;
        let category = Category {
            id: tables.next_category_id,
            name: req.name.clone(),
            description: req.description.clone(),
            active: req.active,
            created_at: Utc::now().naive_utc(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        category: &Category,
    ) -> Result<Option<Category>, RepositoryError> {
        let mut tables = self.write()?;
        if !tables.categories.contains_key(&category.id) {
            return Ok(None);
        }
        if !category.active && tables.category_has_active_products(category.id) {
            return Ok(None);
        }
        if tables
            .categories
            .values()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(RepositoryError::AlreadyExists(
                "categories_name_key".to_string(),
            ));
        }

        tables.categories.insert(category.id, category.clone());
        Ok(Some(category.clone()))
    }

    async fn set_state(
        &self,
        id: i32,
        state: ActivationState,
    ) -> Result<Option<Category>, RepositoryError> {
        let mut tables = self.write()?;
        if !state.is_active() && tables.category_has_active_products(id) {
            return Ok(None);
        }
        Ok(tables.categories.get_mut(&id).map(|c| {
            c.active = state.as_flag();
            c.clone()
        }))
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryStore {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let tables = self.read()?;
        let rows = tables.products.values().filter(|p| req.matches(p)).collect();
        Ok(page(rows, req.skip, req.limit))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn find_wholesale(
        &self,
        req: &FindWholesaleProducts,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let tables = self.read()?;
        let rows = tables
            .products
            .values()
            .filter(|p| p.active && p.has_wholesale())
            .collect();
        Ok(page(rows, req.skip, req.limit))
    }

    async fn find_by_category(
        &self,
        category_id: i32,
        active: Option<bool>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.read()?;
        Ok(tables
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .filter(|p| active.is_none_or(|active| p.active == active))
            .cloned()
            .collect())
    }

    async fn count_active_by_category(&self, category_id: i32) -> Result<i64, RepositoryError> {
        let tables = self.read()?;
        Ok(tables
            .products
            .values()
            .filter(|p| p.category_id == category_id && p.active)
            .count() as i64)
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryStore {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.write()?;
        let now = Utc::now().naive_utc();
        let mut product = Product {
            id: 0,
            name: req.name.clone(),
            flavor: req.flavor.clone(),
            description: req.description.clone(),
            price: req.price,
            wholesale_price: req.wholesale_price,
            wholesale_min_quantity: req.wholesale_min_quantity,
            stock: req.stock,
            image_url: req.image_url.clone(),
            category_id: req.category_id,
            active: req.active,
            created_at: now,
            updated_at: now,
        };
        tables.check_product(&product)?;

        tables.next_product_id += 1;
        product.id = tables.next_product_id;
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: &Product) -> Result<Product, RepositoryError> {
        let mut tables = self.write()?;
        if !tables.products.contains_key(&product.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_product(product)?;

        let mut updated = product.clone();
        updated.updated_at = Utc::now().naive_utc();
        tables.products.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn set_state(&self, id: i32, state: ActivationState) -> Result<Product, RepositoryError> {
        let mut tables = self.write()?;
        let product = tables
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        product.active = state.as_flag();
        product.updated_at = Utc::now().naive_utc();
        Ok(product.clone())
    }

    async fn update_stock(&self, id: i32, stock: i32) -> Result<Product, RepositoryError> {
        if stock < 0 {
            return Err(RepositoryError::Check("products_stock_check".to_string()));
        }
        let mut tables = self.write()?;
        let product = tables
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        product.stock = stock;
        product.updated_at = Utc::now().naive_utc();
        Ok(product.clone())
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for InMemoryStore {
    async fn create_user(&self, req: &CreateUserRequest) -> Result<User, RepositoryError> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.username == req.username) {
            return Err(RepositoryError::AlreadyExists(
                "users_username_key".to_string(),
            ));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: req.username.clone(),
            hashed_password: req.hashed_password.clone(),
            is_active: req.is_active,
            created_at: Utc::now().naive_utc(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}
