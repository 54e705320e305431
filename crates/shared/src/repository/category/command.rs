use crate::{
    abstract_trait::CategoryCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::CreateCategoryRequest,
    errors::RepositoryError,
    model::{ActivationState, Category as CategoryModel},
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct CategoryCommandRepository {
    db: ConnectionPool,
}

impl CategoryCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryCommandRepositoryTrait for CategoryCommandRepository {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<CategoryModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, CategoryModel>(
            r#"
            INSERT INTO categories (name, description, active, created_at)
            VALUES ($1, $2, $3, current_timestamp)
            RETURNING id, name, description, active, created_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.active)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create category {}: {:?}", req.name, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created category ID {} ({})", result.id, result.name);
        Ok(result)
    }

    async fn update_category(
        &self,
        category: &CategoryModel,
    ) -> Result<Option<CategoryModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, CategoryModel>(
            r#"
            UPDATE categories
            SET name = $2,
                description = $3,
                active = $4
            WHERE id = $1
              AND ($4 OR NOT EXISTS (
                  SELECT 1 FROM products p WHERE p.category_id = $1 AND p.active
              ))
            RETURNING id, name, description, active, created_at
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.active)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update category ID {}: {:?}", category.id, err);
            RepositoryError::from(err)
        })?;

        if let Some(updated) = &result {
            info!("🔄 Updated category ID {}", updated.id);
        }
        Ok(result)
    }

    async fn set_state(
        &self,
        id: i32,
        state: ActivationState,
    ) -> Result<Option<CategoryModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, CategoryModel>(
            r#"
            UPDATE categories
            SET active = $2
            WHERE id = $1
              AND ($2 OR NOT EXISTS (
                  SELECT 1 FROM products p WHERE p.category_id = $1 AND p.active
              ))
            RETURNING id, name, description, active, created_at
            "#,
        )
        .bind(id)
        .bind(state.as_flag())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to set category ID {id} to {state:?}: {:?}", err);
            RepositoryError::from(err)
        })?;

        if result.is_some() {
            info!("🔁 Category ID {id} is now {state:?}");
        }
        Ok(result)
    }
}
