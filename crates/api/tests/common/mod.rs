#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use axum_extra::headers::{Authorization, HeaderMapExt};
use heladeria_api::handler::AppRouter;
use serde_json::{Value, json};
use shared::{config::Config, state::AppState};
use std::sync::Arc;
use tower::ServiceExt;

pub const USER: &str = "admin";
pub const PASSWORD: &str = "secreto123";

pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://unused@localhost/heladeria".to_string()),
            "BCRYPT_COST" => Some("4".to_string()),
            _ => None,
        })
        .unwrap();

        let state = AppState::in_memory(config).await.unwrap();
        Self {
            router: AppRouter::build(Arc::new(state)),
        }
    }

    /// App with a registered active user matching `USER`/`PASSWORD`.
    pub async fn with_user() -> Self {
        let app = Self::new().await;
        let res = app
            .post(
                "/api/v1/auth/register",
                json!({ "username": USER, "password": PASSWORD }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        app
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        credentials: Option<(&str, &str)>,
    ) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let mut request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        if let Some((user, password)) = credentials {
            request
                .headers_mut()
                .typed_insert(Authorization::basic(user, password));
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(method, uri, body, Some((USER, PASSWORD))).await
    }

    pub async fn create_category(&self, name: &str) -> i64 {
        let res = self
            .authed(
                Method::POST,
                "/api/v1/categorias",
                Some(json!({ "nombre": name, "descripcion": "Artesanal" })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["data"]["id"].as_i64().unwrap()
    }

    pub async fn create_product(&self, body: Value) -> Value {
        let res = self
            .authed(Method::POST, "/api/v1/productos", Some(body))
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["data"].clone()
    }
}
