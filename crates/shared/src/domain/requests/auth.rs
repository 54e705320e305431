use crate::domain::requests::default_true;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "El usuario es obligatorio"))]
    #[schema(example = "admin")]
    pub username: String,

    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    #[schema(example = "secreto123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "El usuario debe tener entre 3 y 50 caracteres"
    ))]
    #[schema(example = "admin")]
    pub username: String,

    #[validate(length(
        min = 6,
        max = 100,
        message = "La contraseña debe tener entre 6 y 100 caracteres"
    ))]
    #[schema(example = "secreto123")]
    pub password: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Row handed to the user repository; `hashed_password` is never plaintext.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub hashed_password: String,
    pub is_active: bool,
}
