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
        requests::{CreateCategoryRequest, FindAllCategories, UpdateCategoryRequest},
        responses::{
            ApiResponse, ApiResponsePagination, CategoryResponse, CategoryWithProductsResponse,
        },
    },
    errors::{ErrorResponse, HttpError},
    service::CategoryService,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/v1/categorias",
    tag = "Categorias",
    params(FindAllCategories),
    responses(
        (status = 200, description = "List of categories", body = ApiResponsePagination<Vec<CategoryResponse>>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn get_categories(
    Extension(service): Extension<CategoryService>,
    ValidatedQuery(params): ValidatedQuery<FindAllCategories>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/categorias/{id}",
    tag = "Categorias",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category with its products", body = ApiResponse<CategoryWithProductsResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    Extension(service): Extension<CategoryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.query.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/categorias",
    tag = "Categorias",
    security(("basic_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Name already in use", body = ErrorResponse)
    )
)]
pub async fn create_category(
    Extension(service): Extension<CategoryService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.create_category(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/v1/categorias/{id}",
    tag = "Categorias",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name in use or active products", body = ErrorResponse)
    )
)]
pub async fn update_category(
    Extension(service): Extension<CategoryService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.update_category(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categorias/{id}",
    tag = "Categorias",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deactivated", body = ApiResponse<CategoryResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category has active products", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    Extension(service): Extension<CategoryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.soft_delete_category(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/categorias/{id}/activar",
    tag = "Categorias",
    security(("basic_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category activated", body = ApiResponse<CategoryResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn activate_category(
    Extension(service): Extension<CategoryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.command.activate_category(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn category_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let service = app_state.di_container.category_service.clone();

    let public_routes = OpenApiRouter::new()
        .route("/api/v1/categorias", get(get_categories))
        .route("/api/v1/categorias/{id}", get(get_category))
        .layer(Extension(service.clone()));

    let private_routes = OpenApiRouter::new()
        .route("/api/v1/categorias", post(create_category))
        .route("/api/v1/categorias/{id}", put(update_category))
        .route("/api/v1/categorias/{id}", delete(delete_category))
        .route("/api/v1/categorias/{id}/activar", patch(activate_category))
        .route_layer(middleware::from_fn_with_state(
            guard(&app_state, Capability::ManageCatalog),
            basic_auth_middleware,
        ))
        .layer(Extension(service));

    public_routes.merge(private_routes)
}
