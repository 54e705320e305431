use crate::{
    abstract_trait::{
        CategoryCommandServiceTrait, DynCategoryCommandRepository, DynCategoryQueryRepository,
        DynProductQueryRepository,
    },
    domain::{
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
        responses::{ApiResponse, CategoryResponse},
    },
    errors::ServiceError,
    model::{ActivationState, Category},
    utils::{Method, OperationTracer, TracingContext},
};
use async_trait::async_trait;
use tracing::{Instrument, error, info, warn};

const HAS_ACTIVE_PRODUCTS: &str =
    "No se puede desactivar la categoría porque tiene productos activos";

pub struct CategoryCommandService {
    query: DynCategoryQueryRepository,
    command: DynCategoryCommandRepository,
    products: DynProductQueryRepository,
    tracer: OperationTracer,
}

impl CategoryCommandService {
    pub fn new(
        query: DynCategoryQueryRepository,
        command: DynCategoryCommandRepository,
        products: DynProductQueryRepository,
        tracer: OperationTracer,
    ) -> Self {
        Self {
            query,
            command,
            products,
            tracer,
        }
    }

    async fn existing(
        &self,
        ctx: &TracingContext,
        method: Method,
        id: i32,
    ) -> Result<Category, ServiceError> {
        match self.query.find_by_id(id).instrument(ctx.span.clone()).await {
            Ok(Some(category)) => Ok(category),
            Ok(None) => {
                self.tracer.error(ctx, method, "Category not found");
                Err(ServiceError::NotFound("Categoría no encontrada".to_string()))
            }
            Err(err) => {
                error!("❌ Failed to fetch category {id}: {err:?}");
                self.tracer.error(ctx, method, "Failed to fetch category");
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn ensure_name_free(
        &self,
        ctx: &TracingContext,
        method: Method,
        name: &str,
        owner: Option<i32>,
    ) -> Result<(), ServiceError> {
        match self.query.find_by_name(name).instrument(ctx.span.clone()).await {
            Ok(Some(other)) if Some(other.id) != owner => {
                warn!("⚠️ Category name already taken: {name}");
                self.tracer.error(ctx, method, "Category name already exists");
                Err(ServiceError::Conflict(
                    "Ya existe una categoría con ese nombre".to_string(),
                ))
            }
            Ok(_) => Ok(()),
            Err(err) => {
                self.tracer.error(ctx, method, "Failed to check category name");
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn ensure_no_active_products(
        &self,
        ctx: &TracingContext,
        method: Method,
        id: i32,
    ) -> Result<(), ServiceError> {
        match self
            .products
            .count_active_by_category(id)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(0) => Ok(()),
            Ok(count) => {
                warn!("⚠️ Category {id} still owns {count} active products");
                self.tracer
                    .error(ctx, method, "Category has active products");
                Err(ServiceError::Conflict(HAS_ACTIVE_PRODUCTS.to_string()))
            }
            Err(err) => {
                self.tracer.error(ctx, method, "Failed to count active products");
                Err(ServiceError::Repo(err))
            }
        }
    }
}

#[async_trait]
impl CategoryCommandServiceTrait for CategoryCommandService {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        info!("🏗️ Creating category: {}", req.name);

        let method = Method::Post;
        let ctx = self
            .tracer
            .start("create_category", &[("category.name", req.name.clone())]);

        self.ensure_name_free(&ctx, method, &req.name, None).await?;

        let category = match self
            .command
            .create_category(req)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(category) => category,
            Err(err) => {
                error!("❌ Failed to create category: {err:?}");
                self.tracer.error(&ctx, method, "Failed to create category");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer
            .success(&ctx, method, "Category created successfully");

        Ok(ApiResponse::success(
            "Categoría creada exitosamente",
            CategoryResponse::from(category),
        ))
    }

    async fn update_category(
        &self,
        id: i32,
        req: &UpdateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        info!("🔄 Updating category ID {id}");

        let method = Method::Put;
        let ctx = self
            .tracer
            .start("update_category", &[("category.id", id.to_string())]);

        let mut category = self.existing(&ctx, method, id).await?;

        if let Some(name) = &req.name {
            if *name != category.name {
                self.ensure_name_free(&ctx, method, name, Some(id)).await?;
            }
        }

        let deactivating = category.state().is_active() && req.active == Some(false);
        if deactivating {
            self.ensure_no_active_products(&ctx, method, id).await?;
        }

        req.apply_to(&mut category);

        let updated = match self
            .command
            .update_category(&category)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                // A product was activated between the check and the write.
                self.tracer
                    .error(&ctx, method, "Category has active products");
                return Err(ServiceError::Conflict(HAS_ACTIVE_PRODUCTS.to_string()));
            }
            Err(err) => {
                error!("❌ Failed to update category {id}: {err:?}");
                self.tracer.error(&ctx, method, "Failed to update category");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer
            .success(&ctx, method, "Category updated successfully");

        Ok(ApiResponse::success(
            "Categoría actualizada exitosamente",
            CategoryResponse::from(updated),
        ))
    }

    async fn soft_delete_category(
        &self,
        id: i32,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        info!("🗑️ Soft deleting category ID {id}");

        let method = Method::Delete;
        let ctx = self
            .tracer
            .start("soft_delete_category", &[("category.id", id.to_string())]);

        self.existing(&ctx, method, id).await?;
        self.ensure_no_active_products(&ctx, method, id).await?;

        let category = match self
            .command
            .set_state(id, ActivationState::Inactive)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(Some(category)) => category,
            Ok(None) => {
                self.tracer
                    .error(&ctx, method, "Category has active products");
                return Err(ServiceError::Conflict(HAS_ACTIVE_PRODUCTS.to_string()));
            }
            Err(err) => {
                error!("❌ Failed to deactivate category {id}: {err:?}");
                self.tracer
                    .error(&ctx, method, "Failed to deactivate category");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer
            .success(&ctx, method, "Category deactivated successfully");

        Ok(ApiResponse::success(
            "Categoría eliminada exitosamente",
            CategoryResponse::from(category),
        ))
    }

    async fn activate_category(
        &self,
        id: i32,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        info!("♻️ Activating category ID {id}");

        let method = Method::Patch;
        let ctx = self
            .tracer
            .start("activate_category", &[("category.id", id.to_string())]);

        let category = match self
            .command
            .set_state(id, ActivationState::Active)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(Some(category)) => category,
            Ok(None) => {
                self.tracer.error(&ctx, method, "Category not found");
                return Err(ServiceError::NotFound("Categoría no encontrada".to_string()));
            }
            Err(err) => {
                error!("❌ Failed to activate category {id}: {err:?}");
                self.tracer.error(&ctx, method, "Failed to activate category");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer
            .success(&ctx, method, "Category activated successfully");

        Ok(ApiResponse::success(
            "Categoría activada exitosamente",
            CategoryResponse::from(category),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::requests::{CreateCategoryRequest, UpdateCategoryRequest},
        errors::ServiceError,
        service::test_support::{Fixture, new_product},
    };

    fn category(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            description: Some("Artesanales".to_string()),
            active: true,
        }
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let fx = Fixture::new().await;
        let categories = &fx.category_service.command;

        categories.create_category(&category("Paletas")).await.unwrap();
        let err = categories
            .create_category(&category("Paletas"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn rename_onto_other_category_is_conflict() {
        let fx = Fixture::new().await;
        let categories = &fx.category_service.command;
        categories.create_category(&category("Paletas")).await.unwrap();
        let conos = categories.create_category(&category("Conos")).await.unwrap();

        let rename = UpdateCategoryRequest {
            name: Some("Paletas".to_string()),
            ..Default::default()
        };
        let err = categories
            .update_category(conos.data.id, &rename)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let same_name = UpdateCategoryRequest {
            name: Some("Conos".to_string()),
            description: Some(None),
            ..Default::default()
        };
        let updated = categories
            .update_category(conos.data.id, &same_name)
            .await
            .unwrap();
        assert_eq!(updated.data.description, None);
    }

    #[tokio::test]
    async fn soft_delete_is_blocked_by_active_products() {
        let fx = Fixture::new().await;
        let categories = &fx.category_service.command;
        let cat = categories.create_category(&category("Paletas")).await.unwrap();
        let product = fx
            .product_service
            .command
            .create_product(&new_product(cat.data.id))
            .await
            .unwrap();

        let err = categories
            .soft_delete_category(cat.data.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let deactivate = UpdateCategoryRequest {
            active: Some(false),
            ..Default::default()
        };
        let err = categories
            .update_category(cat.data.id, &deactivate)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        fx.product_service
            .command
            .soft_delete_product(product.data.id)
            .await
            .unwrap();
        let deleted = categories.soft_delete_category(cat.data.id).await.unwrap();
        assert!(!deleted.data.active);

        // Soft delete is idempotent.
        let again = categories.soft_delete_category(cat.data.id).await.unwrap();
        assert!(!again.data.active);
    }

    #[tokio::test]
    async fn activation_restores_inactive_category() {
        let fx = Fixture::new().await;
        let categories = &fx.category_service.command;
        let cat = categories.create_category(&category("Sundaes")).await.unwrap();
        categories.soft_delete_category(cat.data.id).await.unwrap();

        let active = categories.activate_category(cat.data.id).await.unwrap();
        assert!(active.data.active);

        let err = categories.activate_category(999).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_category_is_not_found() {
        let fx = Fixture::new().await;

        let err = fx.category_service.query.find_by_id(42).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = fx
            .category_service
            .command
            .soft_delete_category(42)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn detail_embeds_every_product() {
        let fx = Fixture::new().await;
        let cat = fx
            .category_service
            .command
            .create_category(&category("Paletas"))
            .await
            .unwrap();
        let products = &fx.product_service.command;
        products.create_product(&new_product(cat.data.id)).await.unwrap();
        let second = products.create_product(&new_product(cat.data.id)).await.unwrap();
        products.soft_delete_product(second.data.id).await.unwrap();

        let detail = fx
            .category_service
            .query
            .find_by_id(cat.data.id)
            .await
            .unwrap();
        assert_eq!(detail.data.products.len(), 2);
    }
}
