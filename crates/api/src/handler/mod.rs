mod auth;
mod category;
mod product;
mod system;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use shared::{errors::HttpError, state::AppState, utils::shutdown_signal};
use std::{any::Any, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_axum::router::OpenApiRouter;

pub use self::auth::auth_routes;
pub use self::category::category_routes;
pub use self::product::product_routes;
pub use self::system::system_routes;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Heladeria API",
        description = "API REST para gestión de heladería con sistema de precios mayoristas"
    ),
    paths(
        system::root_handler,
        system::health_handler,
        system::info_handler,

        auth::register_user_handler,
        auth::login_user_handler,
        auth::get_me_handler,
        auth::list_users_handler,

        category::get_categories,
        category::get_category,
        category::create_category,
        category::update_category,
        category::delete_category,
        category::activate_category,

        product::get_products,
        product::get_product,
        product::get_wholesale_products,
        product::get_products_by_category,
        product::get_product_price,
        product::create_product,
        product::update_product,
        product::delete_product,
        product::activate_product,
        product::update_product_stock,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Health and service information"),
        (name = "Auth", description = "Registration and credential checks"),
        (name = "Categorias", description = "Category catalog"),
        (name = "Productos", description = "Products, stock and wholesale pricing"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(Default::default)
            .add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
    }
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return HttpError::Internal(format!("Failed to encode metrics: {e}")).into_response();
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
        .into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    HttpError::Internal(format!("Handler panicked: {detail}")).into_response()
}

pub struct AppRouter;

impl AppRouter {
    /// Full application router: API routes, OpenAPI document, metrics and layers.
    pub fn build(shared_state: Arc<AppState>) -> Router {
        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/metrics", get(metrics_handler))
            .with_state(shared_state.clone())
            .merge(system_routes(shared_state.clone()))
            .merge(auth_routes(shared_state.clone()))
            .merge(category_routes(shared_state.clone()))
            .merge(product_routes(shared_state));

        let (app_router, api) = api_router.split_for_parts();
        let api = Arc::new(api);

        app_router
            .route(
                "/api-docs/openapi.json",
                get(move || {
                    let api = api.clone();
                    async move { Json(api.as_ref().clone()) }
                }),
            )
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    pub async fn serve(host: &str, port: u16, app_state: AppState) -> Result<()> {
        let app = Self::build(Arc::new(app_state));

        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&addr).await?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📚 OpenAPI document: http://{addr}/api-docs/openapi.json");
        info!("📊 Metrics: http://{addr}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
