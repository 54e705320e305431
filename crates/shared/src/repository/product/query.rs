use crate::{
    abstract_trait::ProductQueryRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{FindAllProducts, FindWholesaleProducts},
    errors::RepositoryError,
    model::Product as ProductModel,
};
use async_trait::async_trait;
use tracing::{error, info};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.flavor, p.description, p.price, \
     p.wholesale_price, p.wholesale_min_quantity, p.stock, p.image_url, \
     p.category_id, p.active, p.created_at, p.updated_at";

// $3 = true keeps rows with a complete wholesale tier, $3 = false rows without a wholesale price.
const PRODUCT_FILTER: &str = "($1::BOOLEAN IS NULL OR p.active = $1) \
     AND ($2::INTEGER IS NULL OR p.category_id = $2) \
     AND ($3::BOOLEAN IS NULL \
          OR ($3 AND p.wholesale_price IS NOT NULL AND p.wholesale_min_quantity IS NOT NULL) \
          OR (NOT $3 AND p.wholesale_price IS NULL))";

const WHOLESALE_FILTER: &str = "p.active \
     AND p.wholesale_price IS NOT NULL \
     AND p.wholesale_min_quantity IS NOT NULL";

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching products (skip={}, limit={}, active={:?}, category={:?}, wholesale={:?})",
            req.skip, req.limit, req.active, req.category_id, req.has_wholesale
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let count_sql = format!("SELECT COUNT(*) FROM products p WHERE {PRODUCT_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(req.active)
            .bind(req.category_id)
            .bind(req.has_wholesale)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to count products: {:?}", e);
                RepositoryError::from(e)
            })?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE {PRODUCT_FILTER} \
             ORDER BY p.id LIMIT $4 OFFSET $5"
        );
        let products = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(req.active)
            .bind(req.category_id)
            .bind(req.has_wholesale)
            .bind(req.limit)
            .bind(req.skip)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((products, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1");
        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch product {id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok(product)
    }

    async fn find_wholesale(
        &self,
        req: &FindWholesaleProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let count_sql = format!("SELECT COUNT(*) FROM products p WHERE {WHOLESALE_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to count wholesale products: {:?}", e);
                RepositoryError::from(e)
            })?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE {WHOLESALE_FILTER} \
             ORDER BY p.id LIMIT $1 OFFSET $2"
        );
        let products = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(req.limit)
            .bind(req.skip)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch wholesale products: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((products, total))
    }

    async fn find_by_category(
        &self,
        category_id: i32,
        active: Option<bool>,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             WHERE p.category_id = $1 AND ($2::BOOLEAN IS NULL OR p.active = $2) \
             ORDER BY p.id"
        );
        let products = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(category_id)
            .bind(active)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products of category {category_id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok(products)
    }

    async fn count_active_by_category(&self, category_id: i32) -> Result<i64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category_id = $1 AND active",
        )
        .bind(category_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(count)
    }
}
