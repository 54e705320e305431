use crate::middleware::{
    basic_auth::{basic_auth_middleware, guard},
    validate::{SimpleValidatedJson, ValidatedQuery},
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use shared::{
    abstract_trait::Capability,
    domain::{
        requests::{
            CategoryProductsQuery, CreateProductRequest, FindAllProducts, FindWholesaleProducts,
            PriceQuery, StockQuery, UpdateProductRequest,
        },
        responses::{
            ApiResponse, ApiResponsePagination, PriceResponse, ProductResponse,
            ProductWithCategoryResponse,
        },
    },
    errors::{ErrorResponse, HttpError},
    service::ProductService,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/v1/productos",
    tag = "Productos",
    params(FindAllProducts),
    responses(
        (status = 200, description = "List of products", body = ApiResponsePagination<Vec<ProductWithCategoryResponse>>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn get_products(
    Extension(service): Extension<ProductService>,
    ValidatedQuery(params): ValidatedQuery<FindAllProducts>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/productos/{id}",
    tag = "Productos",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product with its category", body = ApiResponse<ProductWithCategoryResponse>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    Extension(service): Extension<ProductService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/productos/mayorista/disponibles",
    tag = "Productos",
    params(FindWholesaleProducts),
    responses(
        (status = 200, description = "Active products with a wholesale tier", body = ApiResponsePagination<Vec<ProductWithCategoryResponse>>)
    )
)]
pub async fn get_wholesale_products(
    Extension(service): Extension<ProductService>,
    ValidatedQuery(params): ValidatedQuery<FindWholesaleProducts>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_wholesale(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/productos/categoria/{id}",
    tag = "Productos",
    params(("id" = i32, Path, description = "Category ID"), CategoryProductsQuery),
    responses(
        (status = 200, description = "Products of the category", body = ApiResponse<Vec<ProductResponse>>),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_products_by_category(
    Extension(service): Extension<ProductService>,
    Path(id): Path<i32>,
    ValidatedQuery(params): ValidatedQuery<CategoryProductsQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_by_category(id, params.active).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/productos/{id}/precio",
    tag = "Productos",
    params(("id" = i32, Path, description = "Product ID"), PriceQuery),
    responses(
        (status = 200, description = "Price for the requested quantity", body = ApiResponse<PriceResponse>),
        (status = 400, description = "Invalid quantity", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product_price(
    Extension(service): Extension<ProductService>,
    Path(id): Path<i32>,
    ValidatedQuery(params): ValidatedQuery<PriceQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.calculate_price(id, params.cantidad).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/productos",
    tag = "Productos",
    security(("basic_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation error or unusable category", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn create_product(
    Extension(service): Extension<ProductService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.create_product(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/v1/productos/{id}",
    tag = "Productos",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation error or unusable category", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn update_product(
    Extension(service): Extension<ProductService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.update_product(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/productos/{id}",
    tag = "Productos",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deactivated", body = ApiResponse<ProductResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    Extension(service): Extension<ProductService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.soft_delete_product(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/productos/{id}/activar",
    tag = "Productos",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product activated", body = ApiResponse<ProductResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn activate_product(
    Extension(service): Extension<ProductService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.activate_product(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/productos/{id}/stock",
    tag = "Productos",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Product ID"), StockQuery),
    responses(
        (status = 200, description = "Stock replaced", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Negative stock", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn update_product_stock(
    Extension(service): Extension<ProductService>,
    Path(id): Path<i32>,
    ValidatedQuery(params): ValidatedQuery<StockQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.update_stock(id, params.nuevo_stock).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn product_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let service = app_state.di_container.product_service.clone();

    let public_routes = OpenApiRouter::new()
        .route("/api/v1/productos", get(get_products))
        .route("/api/v1/productos/{id}", get(get_product))
        .route(
            "/api/v1/productos/mayorista/disponibles",
            get(get_wholesale_products),
        )
        .route(
            "/api/v1/productos/categoria/{id}",
            get(get_products_by_category),
        )
        .route("/api/v1/productos/{id}/precio", get(get_product_price))
        .layer(Extension(service.clone()));

    let private_routes = OpenApiRouter::new()
        .route("/api/v1/productos", post(create_product))
        .route("/api/v1/productos/{id}", put(update_product))
        .route("/api/v1/productos/{id}", delete(delete_product))
        .route("/api/v1/productos/{id}/activar", patch(activate_product))
        .route("/api/v1/productos/{id}/stock", patch(update_product_stock))
        .route_layer(middleware::from_fn_with_state(
            guard(&app_state, Capability::ManageCatalog),
            basic_auth_middleware,
        ))
        .layer(Extension(service));

    public_routes.merge(private_routes)
}
