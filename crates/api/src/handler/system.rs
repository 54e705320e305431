use axum::{Json, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;
use shared::state::AppState;
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
    pub redoc: String,
    pub health: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: InfoEndpoints,
    pub features: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InfoEndpoints {
    pub auth: String,
    pub categorias: String,
    pub productos: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: format!("{} funcionando correctamente", state.config.app_name),
        version: state.config.app_version.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses((status = 200, description = "Welcome message", body = RootResponse))
)]
pub async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(RootResponse {
        message: format!("Bienvenido a {}", state.config.app_name),
        version: state.config.app_version.clone(),
        docs: "/api-docs/openapi.json".to_string(),
        redoc: "/api-docs/openapi.json".to_string(),
        health: "/health".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/info",
    tag = "System",
    responses((status = 200, description = "API overview", body = InfoResponse))
)]
pub async fn info_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(InfoResponse {
        name: state.config.app_name.clone(),
        version: state.config.app_version.clone(),
        description: "API REST para gestión de heladería con sistema de precios mayoristas"
            .to_string(),
        endpoints: InfoEndpoints {
            auth: "/api/v1/auth".to_string(),
            categorias: "/api/v1/categorias".to_string(),
            productos: "/api/v1/productos".to_string(),
        },
        features: [
            "Gestión de categorías",
            "Gestión de productos",
            "Precios mayoristas",
            "Control de stock",
            "Autenticación básica",
            "Eliminación lógica",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    })
}

pub fn system_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/info", get(info_handler))
        .with_state(app_state)
}
