mod common;

use axum::http::{Method, StatusCode, header::WWW_AUTHENTICATE};
use common::{PASSWORD, TestApp, USER};
use serde_json::json;

#[tokio::test]
async fn register_returns_created_user_without_password() {
    let app = TestApp::new().await;

    let res = app
        .post(
            "/api/v1/auth/register",
            json!({ "username": "ana", "password": "fresa123" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["status"], "success");
    assert_eq!(res.body["data"]["username"], "ana");
    assert_eq!(res.body["data"]["is_active"], true);
    assert!(res.body["data"].get("hashed_password").is_none());
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let app = TestApp::with_user().await;

    let res = app
        .post(
            "/api/v1/auth/register",
            json!({ "username": USER, "password": "otraclave" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["status"], "error");

    let users = app.authed(Method::GET, "/api/v1/auth/users", None).await;
    assert_eq!(users.body["data"].as_array().unwrap().len(), 1);

    // The original password still authenticates.
    let login = app
        .post(
            "/api/v1/auth/login",
            json!({ "username": USER, "password": PASSWORD }),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn register_validates_lengths() {
    let app = TestApp::new().await;

    let res = app
        .post(
            "/api/v1/auth/register",
            json!({ "username": "ab", "password": "123" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["details"]["username"].is_array());
    assert!(res.body["details"]["password"].is_array());
}

#[tokio::test]
async fn login_checks_credentials() {
    let app = TestApp::with_user().await;

    let ok = app
        .post(
            "/api/v1/auth/login",
            json!({ "username": USER, "password": PASSWORD }),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["status"], "success");
    assert_eq!(ok.body["message"], "Login exitoso");
    assert_eq!(ok.body["data"]["username"], USER);
    assert_eq!(ok.body["data"]["is_active"], true);
    assert!(ok.body["data"]["id"].is_i64());
    assert!(ok.body["data"].get("hashed_password").is_none());

    let bad = app
        .post(
            "/api/v1/auth/login",
            json!({ "username": USER, "password": "incorrecta" }),
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_basic_credentials() {
    let app = TestApp::with_user().await;

    let anonymous = app.get("/api/v1/auth/me").await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.headers.get(WWW_AUTHENTICATE).unwrap(), "Basic");

    let wrong = app
        .send(Method::GET, "/api/v1/auth/me", None, Some((USER, "nope")))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let me = app.authed(Method::GET, "/api/v1/auth/me", None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], USER);
}

#[tokio::test]
async fn inactive_account_is_rejected_like_a_wrong_password() {
    let app = TestApp::new().await;
    app.post(
        "/api/v1/auth/register",
        json!({ "username": "dormido", "password": "fresa123", "is_active": false }),
    )
    .await;

    let res = app
        .send(
            Method::GET,
            "/api/v1/auth/users",
            None,
            Some(("dormido", "fresa123")),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Credenciales inválidas");
}

#[tokio::test]
async fn users_lists_every_account() {
    let app = TestApp::with_user().await;
    app.post(
        "/api/v1/auth/register",
        json!({ "username": "beto", "password": "fresa123" }),
    )
    .await;

    let res = app.authed(Method::GET, "/api/v1/auth/users", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
}
