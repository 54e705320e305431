use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

type Rejection = (StatusCode, Json<Value>);

// Key `validator` files struct-level `schema` errors under.
const SCHEMA_FIELD: &str = "__all__";

/// JSON body deserialized and run through `validator`. Every failure is a 400
/// carrying the error envelope.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let status = match rejection.status() {
                    StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
                    other => other,
                };
                reject(status, rejection.body_text(), None)
            })?;

        value.validate().map_err(invalid)?;

        Ok(Self(value))
    }
}

/// Query string counterpart of [`SimpleValidatedJson`].
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| reject(StatusCode::BAD_REQUEST, rejection.body_text(), None))?;

        value.validate().map_err(invalid)?;

        Ok(Self(value))
    }
}

fn reject(status: StatusCode, message: String, details: Option<Value>) -> Rejection {
    let mut payload = json!({
        "status": "error",
        "message": message,
    });
    if let Some(details) = details {
        payload["details"] = details;
    }
    (status, Json(payload))
}

fn invalid(errors: ValidationErrors) -> Rejection {
    reject(
        StatusCode::BAD_REQUEST,
        format_validation_errors(&errors),
        Some(format_validation_errors_detailed(&errors)),
    )
}

fn describe(field: &str, error: &validator::ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| match error.code.as_ref() {
            "length" => "Longitud inválida".to_string(),
            "range" => "Valor fuera de rango".to_string(),
            "url" => "URL inválida".to_string(),
            _ => format!("Valor inválido para {field}"),
        })
}

fn field_messages(errors: &ValidationErrors) -> Vec<(String, Vec<String>)> {
    errors
        .errors()
        .iter()
        .filter_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => Some((
                field.to_string(),
                list.iter().map(|e| describe(field, e)).collect(),
            )),
            _ => None,
        })
        .collect()
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    let messages: Vec<String> = field_messages(errors)
        .into_iter()
        .flat_map(|(field, messages)| {
            messages
                .into_iter()
                .map(move |message| match field.as_str() {
                    SCHEMA_FIELD => message,
                    _ => format!("{field}: {message}"),
                })
        })
        .collect();

    if messages.is_empty() {
        "Error de validación".to_string()
    } else {
        messages.join("; ")
    }
}

fn format_validation_errors_detailed(errors: &ValidationErrors) -> Value {
    let map: serde_json::Map<String, Value> = field_messages(errors)
        .into_iter()
        .map(|(field, messages)| (field, json!(messages)))
        .collect();

    Value::Object(map)
}
