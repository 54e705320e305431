use crate::{
    abstract_trait::ProductCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::CreateProductRequest,
    errors::RepositoryError,
    model::{ActivationState, Product as ProductModel},
};
use async_trait::async_trait;
use tracing::{error, info};

const RETURNING: &str = "RETURNING id, name, flavor, description, price, wholesale_price, \
     wholesale_min_quantity, stock, image_url, category_id, active, created_at, updated_at";

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "INSERT INTO products (name, flavor, description, price, wholesale_price, \
                 wholesale_min_quantity, stock, image_url, category_id, active, \
                 created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, current_timestamp, current_timestamp) \
             {RETURNING}"
        );

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(&req.name)
            .bind(&req.flavor)
            .bind(&req.description)
            .bind(req.price)
            .bind(req.wholesale_price)
            .bind(req.wholesale_min_quantity)
            .bind(req.stock)
            .bind(&req.image_url)
            .bind(req.category_id)
            .bind(req.active)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to create product {}: {:?}", req.name, err);
                RepositoryError::from(err)
            })?;

        info!("✅ Created product ID {} ({})", product.id, product.name);
        Ok(product)
    }

    async fn update_product(&self, product: &ProductModel) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "UPDATE products \
             SET name = $2, flavor = $3, description = $4, price = $5, \
                 wholesale_price = $6, wholesale_min_quantity = $7, stock = $8, \
                 image_url = $9, category_id = $10, active = $11, \
                 updated_at = current_timestamp \
             WHERE id = $1 \
             {RETURNING}"
        );

        let updated = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.flavor)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.wholesale_price)
            .bind(product.wholesale_min_quantity)
            .bind(product.stock)
            .bind(&product.image_url)
            .bind(product.category_id)
            .bind(product.active)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to update product ID {}: {:?}", product.id, err);
                RepositoryError::from(err)
            })?;

        info!("🔄 Updated product ID {}", updated.id);
        Ok(updated)
    }

    async fn set_state(
        &self,
        id: i32,
        state: ActivationState,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "UPDATE products SET active = $2, updated_at = current_timestamp \
             WHERE id = $1 {RETURNING}"
        );

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .bind(state.as_flag())
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to set product ID {id} to {state:?}: {:?}", err);
                RepositoryError::from(err)
            })?;

        info!("🔁 Product ID {id} is now {state:?}");
        Ok(product)
    }

    async fn update_stock(&self, id: i32, stock: i32) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "UPDATE products SET stock = $2, updated_at = current_timestamp \
             WHERE id = $1 {RETURNING}"
        );

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .bind(stock)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to update stock of product ID {id}: {:?}", err);
                RepositoryError::from(err)
            })?;

        info!("📦 Product ID {id} stock set to {stock}");
        Ok(product)
    }
}
