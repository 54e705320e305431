use crate::middleware::{
    basic_auth::{basic_auth_middleware, guard},
    validate::SimpleValidatedJson,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    abstract_trait::Capability,
    domain::{
        requests::{LoginRequest, RegisterRequest},
        responses::{ApiResponse, UserResponse},
    },
    errors::{ErrorResponse, HttpError},
    model::User,
    service::AuthService,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username already registered", body = ErrorResponse)
    )
)]
pub async fn register_user_handler(
    Extension(service): Extension<AuthService>,
    SimpleValidatedJson(body): SimpleValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.register.register(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = ApiResponse<UserResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login_user_handler(
    Extension(service): Extension<AuthService>,
    SimpleValidatedJson(body): SimpleValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.login.login(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn get_me_handler(
    Extension(service): Extension<AuthService>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.identity.get_me(user.id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/users",
    tag = "Auth",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Registered users", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_users_handler(
    Extension(service): Extension<AuthService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.identity.list_users().await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn auth_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let service = app_state.di_container.auth_service.clone();

    let public_routes = OpenApiRouter::new()
        .route("/api/v1/auth/register", post(register_user_handler))
        .route("/api/v1/auth/login", post(login_user_handler))
        .layer(Extension(service.clone()));

    let profile_routes = OpenApiRouter::new()
        .route("/api/v1/auth/me", get(get_me_handler))
        .route_layer(middleware::from_fn_with_state(
            guard(&app_state, Capability::ViewProfile),
            basic_auth_middleware,
        ))
        .layer(Extension(service.clone()));

    let user_routes = OpenApiRouter::new()
        .route("/api/v1/auth/users", get(list_users_handler))
        .route_layer(middleware::from_fn_with_state(
            guard(&app_state, Capability::ViewUsers),
            basic_auth_middleware,
        ))
        .layer(Extension(service));

    public_routes.merge(profile_routes).merge(user_routes)
}
