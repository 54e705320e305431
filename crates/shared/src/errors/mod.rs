mod error;
mod http;
mod repository;
mod service;

pub use self::error::ErrorResponse;
pub use self::http::{HttpError, expose_internal_errors};
pub use self::repository::RepositoryError;
pub use self::service::ServiceError;
