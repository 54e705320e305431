use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::error;

static EXPOSE_INTERNAL: AtomicBool = AtomicBool::new(false);

/// Include the detail of 500 responses in the body. Enabled when `DEBUG=true`.
pub fn expose_internal_errors(enabled: bool) {
    EXPOSE_INTERNAL.store(enabled, Ordering::Relaxed);
}

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => HttpError::NotFound(msg),
            ServiceError::Conflict(msg) => HttpError::Conflict(msg),
            ServiceError::BadRequest(msg) => HttpError::BadRequest(msg),
            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),

            ServiceError::InvalidCredentials => {
                HttpError::Unauthorized("Credenciales inválidas".to_string())
            }

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Recurso no encontrado".into()),
                RepositoryError::AlreadyExists(msg) => {
                    HttpError::Conflict(format!("Ya existe un registro con ese valor ({msg})"))
                }
                RepositoryError::ForeignKey(msg) => {
                    HttpError::BadRequest(format!("Referencia inválida ({msg})"))
                }
                RepositoryError::Check(msg) => {
                    HttpError::BadRequest(format!("Valor fuera de rango ({msg})"))
                }
                other => HttpError::Internal(other.to_string()),
            },

            ServiceError::Bcrypt(err) => HttpError::Internal(format!("Bcrypt error: {err}")),

            ServiceError::Internal(msg) => HttpError::Internal(msg),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::Internal(msg) => {
                error!("💥 Internal error: {msg}");
                let msg = if EXPOSE_INTERNAL.load(Ordering::Relaxed) {
                    msg
                } else {
                    "Error interno del servidor".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::error(msg));

        let mut response = (status, body).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }

        response
    }
}
