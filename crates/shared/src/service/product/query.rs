use crate::{
    abstract_trait::{
        DynCategoryQueryRepository, DynProductQueryRepository, ProductQueryServiceTrait,
    },
    domain::{
        requests::{FindAllProducts, FindWholesaleProducts},
        responses::{
            ApiResponse, ApiResponsePagination, CategoryResponse, Pagination, PriceResponse,
            ProductResponse, ProductWithCategoryResponse,
        },
    },
    errors::ServiceError,
    model::{Category, Product},
    utils::{Method, OperationTracer, TracingContext},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{Instrument, error, info};

pub struct ProductQueryService {
    query: DynProductQueryRepository,
    categories: DynCategoryQueryRepository,
    tracer: OperationTracer,
}

impl ProductQueryService {
    pub fn new(
        query: DynProductQueryRepository,
        categories: DynCategoryQueryRepository,
        tracer: OperationTracer,
    ) -> Self {
        Self {
            query,
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

    /// Pairs every product with its category, loaded in one query.
    async fn with_categories(
        &self,
        ctx: &TracingContext,
        method: Method,
        products: Vec<Product>,
    ) -> Result<Vec<ProductWithCategoryResponse>, ServiceError> {
        let mut ids: Vec<i32> = products.iter().map(|p| p.category_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let categories: HashMap<i32, Category> = match self
            .categories
            .find_by_ids(&ids)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(found) => found.into_iter().map(|c| (c.id, c)).collect(),
            Err(err) => {
                error!("❌ Failed to load categories {ids:?}: {err:?}");
                self.tracer.error(ctx, method, "Failed to load categories");
                return Err(ServiceError::Repo(err));
            }
        };

        products
            .into_iter()
            .map(|product| {
                let category = categories.get(&product.category_id).cloned().ok_or_else(|| {
                    self.tracer.error(ctx, method, "Dangling category reference");
                    ServiceError::Internal(format!(
                        "product {} references missing category {}",
                        product.id, product.category_id
                    ))
                })?;

                Ok(ProductWithCategoryResponse {
                    product: ProductResponse::from(product),
                    category: CategoryResponse::from(category),
                })
            })
            .collect()
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductWithCategoryResponse>>, ServiceError> {
        let method = Method::Get;
        let ctx = self.tracer.start(
            "find_all_products",
            &[
                ("skip", req.skip.to_string()),
                ("limit", req.limit.to_string()),
                ("active", format!("{:?}", req.active)),
                ("category.id", format!("{:?}", req.category_id)),
                ("wholesale", format!("{:?}", req.has_wholesale)),
            ],
        );

        let (products, total) = match self
            .query
            .find_all(req)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(result) => result,
            Err(err) => {
                error!("❌ Failed to fetch products: {err:?}");
                self.tracer.error(&ctx, method, "Failed to fetch products");
                return Err(ServiceError::Repo(err));
            }
        };

        let data = self.with_categories(&ctx, method, products).await?;

        info!("✅ Found {} products (total {total})", data.len());
        self.tracer
            .success(&ctx, method, "Products retrieved successfully");

        Ok(ApiResponsePagination::success(
            "Productos obtenidos exitosamente",
            data,
            Pagination::new(req.skip, req.limit, total),
        ))
    }

    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<ApiResponse<ProductWithCategoryResponse>, ServiceError> {
        let method = Method::Get;
        let ctx = self
            .tracer
            .start("find_product_by_id", &[("product.id", id.to_string())]);

        let product = self.existing(&ctx, method, id).await?;
        let mut data = self.with_categories(&ctx, method, vec![product]).await?;

        let Some(item) = data.pop() else {
            self.tracer.error(&ctx, method, "Product vanished");
            return Err(ServiceError::NotFound("Producto no encontrado".to_string()));
        };

        self.tracer
            .success(&ctx, method, "Product retrieved successfully");

        Ok(ApiResponse::success("Producto obtenido exitosamente", item))
    }

    async fn find_wholesale(
        &self,
        req: &FindWholesaleProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductWithCategoryResponse>>, ServiceError> {
        let method = Method::Get;
        let ctx = self.tracer.start(
            "find_wholesale_products",
            &[("skip", req.skip.to_string()), ("limit", req.limit.to_string())],
        );

        let (products, total) = match self
            .query
            .find_wholesale(req)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(result) => result,
            Err(err) => {
                error!("❌ Failed to fetch wholesale products: {err:?}");
                self.tracer
                    .error(&ctx, method, "Failed to fetch wholesale products");
                return Err(ServiceError::Repo(err));
            }
        };

        let data = self.with_categories(&ctx, method, products).await?;

        self.tracer
            .success(&ctx, method, "Wholesale products retrieved successfully");

        Ok(ApiResponsePagination::success(
            "Productos con precio mayorista obtenidos exitosamente",
            data,
            Pagination::new(req.skip, req.limit, total),
        ))
    }

    async fn find_by_category(
        &self,
        category_id: i32,
        active: bool,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let method = Method::Get;
        let ctx = self.tracer.start(
            "find_products_by_category",
            &[
                ("category.id", category_id.to_string()),
                ("active", active.to_string()),
            ],
        );

        match self
            .categories
            .find_by_id(category_id)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.tracer.error(&ctx, method, "Category not found");
                return Err(ServiceError::NotFound("Categoría no encontrada".to_string()));
            }
            Err(err) => {
                self.tracer.error(&ctx, method, "Failed to fetch category");
                return Err(ServiceError::Repo(err));
            }
        }

        let products = match self
            .query
            .find_by_category(category_id, Some(active))
            .instrument(ctx.span.clone())
            .await
        {
            Ok(products) => products,
            Err(err) => {
                error!("❌ Failed to fetch products of category {category_id}: {err:?}");
                self.tracer
                    .error(&ctx, method, "Failed to fetch category products");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer
            .success(&ctx, method, "Category products retrieved successfully");

        Ok(ApiResponse::success(
            "Productos de la categoría obtenidos exitosamente",
            products.into_iter().map(ProductResponse::from).collect(),
        ))
    }

    async fn calculate_price(
        &self,
        id: i32,
        quantity: i32,
    ) -> Result<ApiResponse<PriceResponse>, ServiceError> {
        let method = Method::Get;
        let ctx = self.tracer.start(
            "calculate_price",
            &[
                ("product.id", id.to_string()),
                ("quantity", quantity.to_string()),
            ],
        );

        if quantity <= 0 {
            self.tracer.error(&ctx, method, "Quantity must be positive");
            return Err(ServiceError::BadRequest(
                "La cantidad debe ser mayor a 0".to_string(),
            ));
        }

        let product = self.existing(&ctx, method, id).await?;
        let quote = product.quote(quantity);

        info!(
            "💰 Product {id} x{quantity}: unit {} total {} (wholesale: {})",
            quote.unit_price, quote.total_price, quote.wholesale
        );
        self.tracer.success(&ctx, method, "Price calculated successfully");

        Ok(ApiResponse::success(
            "Precio calculado exitosamente",
            PriceResponse::from(quote),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::requests::{FindAllProducts, FindWholesaleProducts},
        errors::ServiceError,
        service::test_support::{Fixture, d, new_product},
    };

    #[tokio::test]
    async fn price_switches_to_wholesale_at_threshold() {
        let fx = Fixture::new().await;
        let cat = fx.category("Paletas").await;
        let mut req = new_product(cat);
        req.price = d("25.50");
        req.wholesale_price = Some(d("20.00"));
        req.wholesale_min_quantity = Some(10);
        let product = fx.product_service.command.create_product(&req).await.unwrap();
        let query = &fx.product_service.query;

        let retail = query.calculate_price(product.data.id, 9).await.unwrap().data;
        assert_eq!(retail.precio_unitario, d("25.50"));
        assert_eq!(retail.precio_total, d("229.50"));
        assert!(!retail.es_precio_mayorista);

        let wholesale = query.calculate_price(product.data.id, 10).await.unwrap().data;
        assert_eq!(wholesale.precio_unitario, d("20.00"));
        assert_eq!(wholesale.precio_total, d("200.00"));
        assert!(wholesale.es_precio_mayorista);
    }

    #[tokio::test]
    async fn price_rejects_non_positive_quantity_and_unknown_product() {
        let fx = Fixture::new().await;
        let query = &fx.product_service.query;

        let err = query.calculate_price(1, 0).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let err = query.calculate_price(77, 3).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn listing_embeds_category_and_filters() {
        let fx = Fixture::new().await;
        let paletas = fx.category("Paletas").await;
        let conos = fx.category("Conos").await;
        let command = &fx.product_service.command;

        let mut wholesale = new_product(paletas);
        wholesale.wholesale_price = Some(d("15.00"));
        command.create_product(&wholesale).await.unwrap();
        let mut retail = new_product(conos);
        retail.wholesale_min_quantity = None;
        command.create_product(&retail).await.unwrap();

        let all = fx
            .product_service
            .query
            .find_all(&FindAllProducts::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);
        assert_eq!(all.data[0].category.name, "Paletas");
        assert_eq!(all.data[1].category.name, "Conos");

        let only_wholesale = FindAllProducts {
            has_wholesale: Some(true),
            ..Default::default()
        };
        let listed = fx
            .product_service
            .query
            .find_all(&only_wholesale)
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 1);
        assert_eq!(listed.data[0].product.category_id, paletas);

        let by_category = FindAllProducts {
            category_id: Some(conos),
            ..Default::default()
        };
        let listed = fx.product_service.query.find_all(&by_category).await.unwrap();
        assert_eq!(listed.data.len(), 1);
        assert_eq!(listed.data[0].category.name, "Conos");
    }

    #[tokio::test]
    async fn wholesale_listing_skips_inactive_and_partial_tiers() {
        let fx = Fixture::new().await;
        let cat = fx.category("Paletas").await;
        let command = &fx.product_service.command;

        let mut eligible = new_product(cat);
        eligible.wholesale_price = Some(d("15.00"));
        let eligible = command.create_product(&eligible).await.unwrap();

        let mut inactive = new_product(cat);
        inactive.wholesale_price = Some(d("15.00"));
        inactive.active = false;
        command.create_product(&inactive).await.unwrap();

        let mut partial = new_product(cat);
        partial.wholesale_min_quantity = None;
        partial.wholesale_price = Some(d("15.00"));
        command.create_product(&partial).await.unwrap();

        let listed = fx
            .product_service
            .query
            .find_wholesale(&FindWholesaleProducts::default())
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 1);
        assert_eq!(listed.data[0].product.id, eligible.data.id);
    }

    #[tokio::test]
    async fn by_category_requires_existing_category() {
        let fx = Fixture::new().await;
        let cat = fx.category("Paletas").await;
        let command = &fx.product_service.command;
        command.create_product(&new_product(cat)).await.unwrap();
        let hidden = command.create_product(&new_product(cat)).await.unwrap();
        command.soft_delete_product(hidden.data.id).await.unwrap();

        let query = &fx.product_service.query;
        assert_eq!(query.find_by_category(cat, true).await.unwrap().data.len(), 1);
        assert_eq!(query.find_by_category(cat, false).await.unwrap().data.len(), 1);

        let err = query.find_by_category(404, true).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
