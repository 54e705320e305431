use crate::{
    abstract_trait::CategoryQueryRepositoryTrait, config::ConnectionPool,
    domain::requests::FindAllCategories, errors::RepositoryError,
    model::Category as CategoryModel,
};
use async_trait::async_trait;
use tracing::{error, info};

#[derive(Clone)]
pub struct CategoryQueryRepository {
    db: ConnectionPool,
}

impl CategoryQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryQueryRepositoryTrait for CategoryQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllCategories,
    ) -> Result<(Vec<CategoryModel>, i64), RepositoryError> {
        info!("🔍 Fetching categories (skip={}, limit={}, active={:?})", req.skip, req.limit, req.active);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM categories c
            WHERE ($1::BOOLEAN IS NULL OR c.active = $1)
            "#,
        )
        .bind(req.active)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to count categories: {:?}", e);
            RepositoryError::from(e)
        })?;

        let categories = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT c.id, c.name, c.description, c.active, c.created_at
            FROM categories c
            WHERE ($1::BOOLEAN IS NULL OR c.active = $1)
            ORDER BY c.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(req.active)
        .bind(req.limit)
        .bind(req.skip)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch categories: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok((categories, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CategoryModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let category = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT id, name, description, active, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch category {id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(category)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CategoryModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let category = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT id, name, description, active, created_at
            FROM categories
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch category by name {name}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(category)
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<CategoryModel>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let categories = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT id, name, description, active, created_at
            FROM categories
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch categories {ids:?}: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(categories)
    }
}
