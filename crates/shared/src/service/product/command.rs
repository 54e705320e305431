use crate::{
    abstract_trait::{
        DynCategoryQueryRepository, DynProductCommandRepository, DynProductQueryRepository,
        ProductCommandServiceTrait,
    },
    domain::{
        requests::{CreateProductRequest, UpdateProductRequest},
        responses::{ApiResponse, ProductResponse},
    },
    errors::ServiceError,
    model::{ActivationState, Product},
    utils::{Method, OperationTracer, TracingContext},
};
use async_trait::async_trait;
use tracing::{Instrument, error, info, warn};

pub struct ProductCommandService {
    query: DynProductQueryRepository,
    command: DynProductCommandRepository,
    categories: DynCategoryQueryRepository,
    tracer: OperationTracer,
}

impl ProductCommandService {
    pub fn new(
        query: DynProductQueryRepository,
        command: DynProductCommandRepository,
        categories: DynCategoryQueryRepository,
        tracer: OperationTracer,
    ) -> Self {
        Self {
            query,
            command,
            categories,
            tracer,
        }
    }

    async fn existing(
        &self,
        ctx: &TracingContext,
        method: Method,
        id: i32,
    ) -> Result<Product, ServiceError> {
        match self.query.find_by_id(id).instrument(ctx.span.clone()).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => {
                self.tracer.error(ctx, method, "Product not found");
                Err(ServiceError::NotFound("Producto no encontrado".to_string()))
            }
            Err(err) => {
                error!("❌ Failed to fetch product {id}: {err:?}");
                self.tracer.error(ctx, method, "Failed to fetch product");
                Err(ServiceError::Repo(err))
            }
        }
    }

    /// Products may only point at an existing, active category.
    async fn ensure_category_usable(
        &self,
        ctx: &TracingContext,
        method: Method,
        category_id: i32,
    ) -> Result<(), ServiceError> {
        match self
            .categories
            .find_by_id(category_id)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(Some(category)) if category.state().is_active() => Ok(()),
            Ok(Some(_)) => {
                warn!("⚠️ Category {category_id} is inactive");
                self.tracer.error(ctx, method, "Category is inactive");
                Err(ServiceError::BadRequest(
                    "La categoría especificada está inactiva".to_string(),
                ))
            }
            Ok(None) => {
                warn!("⚠️ Category {category_id} does not exist");
                self.tracer.error(ctx, method, "Category does not exist");
                Err(ServiceError::BadRequest(
                    "La categoría especificada no existe".to_string(),
                ))
            }
            Err(err) => {
                self.tracer.error(ctx, method, "Failed to fetch category");
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn change_state(
        &self,
        operation: &str,
        id: i32,
        state: ActivationState,
    ) -> Result<Product, ServiceError> {
        let method = match state {
            ActivationState::Active => Method::Patch,
            ActivationState::Inactive => Method::Delete,
        };
        let ctx = self.tracer.start(operation, &[("product.id", id.to_string())]);

        let current = self.existing(&ctx, method, id).await?;
        if current.state() == state {
            info!("ℹ️ Product {id} is already {state:?}");
        }

        match self
            .command
            .set_state(id, state)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(product) => {
                self.tracer
                    .success(&ctx, method, "Product state changed successfully");
                Ok(product)
            }
            Err(err) => {
                error!("❌ Failed to set product {id} to {state:?}: {err:?}");
                self.tracer
                    .error(&ctx, method, "Failed to change product state");
                Err(ServiceError::Repo(err))
            }
        }
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🏗️ Creating product: {} ({})", req.name, req.flavor);

        let method = Method::Post;
        let ctx = self.tracer.start(
            "create_product",
            &[
                ("product.name", req.name.clone()),
                ("category.id", req.category_id.to_string()),
            ],
        );

        self.ensure_category_usable(&ctx, method, req.category_id)
            .await?;

        let req = req.clone().normalized();

        let product = match self
            .command
            .create_product(&req)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(product) => product,
            Err(err) => {
                error!("❌ Failed to create product: {err:?}");
                self.tracer.error(&ctx, method, "Failed to create product");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer
            .success(&ctx, method, "Product created successfully");

        Ok(ApiResponse::success(
            "Producto creado exitosamente",
            ProductResponse::from(product),
        ))
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🔄 Updating product ID {id}");

        let method = Method::Put;
        let ctx = self
            .tracer
            .start("update_product", &[("product.id", id.to_string())]);

        let mut product = self.existing(&ctx, method, id).await?;

        if let Some(category_id) = req.category_id {
            self.ensure_category_usable(&ctx, method, category_id)
                .await?;
        }

        req.apply_to(&mut product);

        let updated = match self
            .command
            .update_product(&product)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(updated) => updated,
            Err(err) => {
                error!("❌ Failed to update product {id}: {err:?}");
                self.tracer.error(&ctx, method, "Failed to update product");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer
            .success(&ctx, method, "Product updated successfully");

        Ok(ApiResponse::success(
            "Producto actualizado exitosamente",
            ProductResponse::from(updated),
        ))
    }

    async fn soft_delete_product(
        &self,
        id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🗑️ Soft deleting product ID {id}");

        let product = self
            .change_state("soft_delete_product", id, ActivationState::Inactive)
            .await?;

        Ok(ApiResponse::success(
            "Producto eliminado exitosamente",
            ProductResponse::from(product),
        ))
    }

    async fn activate_product(
        &self,
        id: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("♻️ Activating product ID {id}");

        let product = self
            .change_state("activate_product", id, ActivationState::Active)
            .await?;

        Ok(ApiResponse::success(
            "Producto activado exitosamente",
            ProductResponse::from(product),
        ))
    }

    async fn update_stock(
        &self,
        id: i32,
        new_stock: i32,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("📦 Setting stock of product ID {id} to {new_stock}");

        let method = Method::Patch;
        let ctx = self.tracer.start(
            "update_stock",
            &[
                ("product.id", id.to_string()),
                ("product.stock", new_stock.to_string()),
            ],
        );

        if new_stock < 0 {
            self.tracer.error(&ctx, method, "Stock cannot be negative");
            return Err(ServiceError::BadRequest(
                "El stock no puede ser negativo".to_string(),
            ));
        }

        self.existing(&ctx, method, id).await?;

        let product = match self
            .command
            .update_stock(id, new_stock)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(product) => product,
            Err(err) => {
                error!("❌ Failed to update stock of product {id}: {err:?}");
                self.tracer.error(&ctx, method, "Failed to update stock");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer.success(&ctx, method, "Stock updated successfully");

        Ok(ApiResponse::success(
            "Stock actualizado exitosamente",
            ProductResponse::from(product),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::requests::UpdateProductRequest,
        errors::ServiceError,
        service::test_support::{Fixture, d, new_product},
    };

    #[tokio::test]
    async fn create_requires_existing_active_category() {
        let fx = Fixture::new().await;
        let command = &fx.product_service.command;

        let err = command.create_product(&new_product(99)).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let cat = fx.category("Paletas").await;
        fx.category_service
            .command
            .soft_delete_category(cat)
            .await
            .unwrap();
        let err = command.create_product(&new_product(cat)).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn create_rounds_money_to_cents() {
        let fx = Fixture::new().await;
        let cat = fx.category("Paletas").await;
        let mut req = new_product(cat);
        req.price = d("12.345");
        req.wholesale_price = Some(d("10"));

        let created = fx.product_service.command.create_product(&req).await.unwrap();
        assert_eq!(created.data.price.to_string(), "12.35");
        assert_eq!(created.data.wholesale_price.map(|p| p.to_string()).as_deref(), Some("10.00"));
    }

    #[tokio::test]
    async fn partial_update_touches_only_supplied_fields() {
        let fx = Fixture::new().await;
        let cat = fx.category("Paletas").await;
        let mut req = new_product(cat);
        req.wholesale_price = Some(d("8.00"));
        let created = fx.product_service.command.create_product(&req).await.unwrap();

        let update = UpdateProductRequest {
            price: Some(d("11.00")),
            wholesale_price: Some(None),
            ..Default::default()
        };
        let updated = fx
            .product_service
            .command
            .update_product(created.data.id, &update)
            .await
            .unwrap()
            .data;

        assert_eq!(updated.price, d("11.00"));
        assert_eq!(updated.wholesale_price, None);
        assert_eq!(updated.name, created.data.name);
        assert_eq!(updated.stock, created.data.stock);
        assert!(updated.updated_at >= created.data.updated_at);
    }

    #[tokio::test]
    async fn update_validates_new_category() {
        let fx = Fixture::new().await;
        let cat = fx.category("Paletas").await;
        let created = fx
            .product_service
            .command
            .create_product(&new_product(cat))
            .await
            .unwrap();

        let move_away = UpdateProductRequest {
            category_id: Some(321),
            ..Default::default()
        };
        let err = fx
            .product_service
            .command
            .update_product(created.data.id, &move_away)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let err = fx
            .product_service
            .command
            .update_product(555, &UpdateProductRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn stock_overwrites_and_rejects_negative() {
        let fx = Fixture::new().await;
        let cat = fx.category("Paletas").await;
        let created = fx
            .product_service
            .command
            .create_product(&new_product(cat))
            .await
            .unwrap();
        let command = &fx.product_service.command;

        let updated = command.update_stock(created.data.id, 0).await.unwrap();
        assert_eq!(updated.data.stock, 0);

        let err = command.update_stock(created.data.id, -1).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let err = command.update_stock(808, 5).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn soft_delete_and_activate_flip_the_flag() {
        let fx = Fixture::new().await;
        let cat = fx.category("Paletas").await;
        let created = fx
            .product_service
            .command
            .create_product(&new_product(cat))
            .await
            .unwrap();
        let command = &fx.product_service.command;

        assert!(!command.soft_delete_product(created.data.id).await.unwrap().data.active);
        assert!(!command.soft_delete_product(created.data.id).await.unwrap().data.active);
        assert!(command.activate_product(created.data.id).await.unwrap().data.active);

        let err = command.activate_product(9).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
