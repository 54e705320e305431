use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use shared::{abstract_trait::Capability, errors::HttpError, state::AppState};
use std::sync::Arc;
use tracing::warn;

/// Middleware state: the app plus the capability the guarded routes demand.
pub type Guard = (Arc<AppState>, Capability);

pub fn guard(state: &Arc<AppState>, capability: Capability) -> Guard {
    (state.clone(), capability)
}

/// Verifies HTTP Basic credentials, checks the access policy and stores the
/// authenticated `User` in the request extensions.
pub async fn basic_auth_middleware(
    State((state, capability)): State<Guard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    let Some(Authorization(credentials)) = req.headers().typed_get::<Authorization<Basic>>()
    else {
        warn!("🔒 Missing or malformed Basic credentials for {}", req.uri());
        return Err(HttpError::Unauthorized(
            "Se requieren credenciales de autenticación".to_string(),
        ));
    };

    let di = &state.di_container;

    let user = di
        .auth_service
        .login
        .authenticate(credentials.username(), credentials.password())
        .await?;

    di.access_policy.authorize(&user, capability)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await.into_response())
}
