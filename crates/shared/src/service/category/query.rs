use crate::{
    abstract_trait::{
        CategoryQueryServiceTrait, DynCategoryQueryRepository, DynProductQueryRepository,
    },
    domain::{
        requests::FindAllCategories,
        responses::{
            ApiResponse, ApiResponsePagination, CategoryResponse, CategoryWithProductsResponse,
            Pagination, ProductResponse,
        },
    },
    errors::ServiceError,
    utils::{Method, OperationTracer},
};
use async_trait::async_trait;
use tracing::{Instrument, error, info};

pub struct CategoryQueryService {
    query: DynCategoryQueryRepository,
    products: DynProductQueryRepository,
    tracer: OperationTracer,
}

impl CategoryQueryService {
    pub fn new(
        query: DynCategoryQueryRepository,
        products: DynProductQueryRepository,
        tracer: OperationTracer,
    ) -> Self {
        Self {
            query,
            products,
            tracer,
        }
    }
}

#[async_trait]
impl CategoryQueryServiceTrait for CategoryQueryService {
    async fn find_all(
        &self,
        req: &FindAllCategories,
    ) -> Result<ApiResponsePagination<Vec<CategoryResponse>>, ServiceError> {
        let method = Method::Get;
        let ctx = self.tracer.start(
            "find_all_categories",
            &[
                ("skip", req.skip.to_string()),
                ("limit", req.limit.to_string()),
                ("active", format!("{:?}", req.active)),
            ],
        );

        let (categories, total) = match self
            .query
            .find_all(req)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(result) => result,
            Err(err) => {
                error!("❌ Failed to fetch categories: {err:?}");
                self.tracer.error(&ctx, method, "Failed to fetch categories");
                return Err(ServiceError::Repo(err));
            }
        };

        let data: Vec<CategoryResponse> =
            categories.into_iter().map(CategoryResponse::from).collect();

        info!("✅ Found {} categories (total {total})", data.len());
        self.tracer
            .success(&ctx, method, "Categories retrieved successfully");

        Ok(ApiResponsePagination::success(
            "Categorías obtenidas exitosamente",
            data,
            Pagination::new(req.skip, req.limit, total),
        ))
    }

    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<ApiResponse<CategoryWithProductsResponse>, ServiceError> {
        let method = Method::Get;
        let ctx = self
            .tracer
            .start("find_category_by_id", &[("category.id", id.to_string())]);

        let category = match self.query.find_by_id(id).instrument(ctx.span.clone()).await {
            Ok(Some(category)) => category,
            Ok(None) => {
                self.tracer.error(&ctx, method, "Category not found");
                return Err(ServiceError::NotFound("Categoría no encontrada".to_string()));
            }
            Err(err) => {
                error!("❌ Failed to fetch category {id}: {err:?}");
                self.tracer.error(&ctx, method, "Failed to fetch category");
                return Err(ServiceError::Repo(err));
            }
        };

        let products = match self
            .products
            .find_by_category(id, None)
            .instrument(ctx.span.clone())
            .await
        {
            Ok(products) => products,
            Err(err) => {
                error!("❌ Failed to fetch products of category {id}: {err:?}");
                self.tracer
                    .error(&ctx, method, "Failed to fetch category products");
                return Err(ServiceError::Repo(err));
            }
        };

        self.tracer
            .success(&ctx, method, "Category retrieved successfully");

        Ok(ApiResponse::success(
            "Categoría obtenida exitosamente",
            CategoryWithProductsResponse {
                category: CategoryResponse::from(category),
                products: products.into_iter().map(ProductResponse::from).collect(),
            },
        ))
    }
}
