mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{Value, json};

async fn catalog() -> (TestApp, i64, Value) {
    let app = TestApp::with_user().await;
    let category = app.create_category("Helados de crema").await;
    let product = app
        .create_product(json!({
            "nombre": "Helado de fresa",
            "sabor": "Fresa",
            "precio": "18",
            "precio_mayorista": "15.00",
            "cantidad_minima_mayorista": 10,
            "stock": 40,
            "categoria_id": category,
        }))
        .await;
    (app, category, product)
}

#[tokio::test]
async fn create_normalizes_money_and_embeds_category() {
    let (app, category, product) = catalog().await;
    assert_eq!(product["precio"], "18.00");
    assert_eq!(product["activo"], true);

    let id = product["id"].as_i64().unwrap();
    let res = app.get(&format!("/api/v1/productos/{id}")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["nombre"], "Helado de fresa");
    assert_eq!(res.body["data"]["categoria"]["id"], category);
}

#[tokio::test]
async fn create_rejects_bad_references_and_values() {
    let (app, _, _) = catalog().await;

    let missing = app
        .authed(
            Method::POST,
            "/api/v1/productos",
            Some(json!({
                "nombre": "Huérfano",
                "sabor": "Vainilla",
                "precio": "10.00",
                "categoria_id": 999,
            })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let free = app
        .authed(
            Method::POST,
            "/api/v1/productos",
            Some(json!({
                "nombre": "Gratis",
                "sabor": "Vainilla",
                "precio": "0",
                "categoria_id": 1,
            })),
        )
        .await;
    assert_eq!(free.status, StatusCode::BAD_REQUEST);
    assert_eq!(free.body["message"], "El precio debe ser mayor a 0");
}

#[tokio::test]
async fn prices_rounding_to_zero_are_rejected() {
    let (app, category, product) = catalog().await;

    let create = app
        .authed(
            Method::POST,
            "/api/v1/productos",
            Some(json!({
                "nombre": "Casi gratis",
                "sabor": "Vainilla",
                "precio": "0.004",
                "categoria_id": category,
            })),
        )
        .await;
    assert_eq!(create.status, StatusCode::BAD_REQUEST);
    assert_eq!(create.body["message"], "El precio debe ser mayor a 0");

    let id = product["id"].as_i64().unwrap();
    let update = app
        .authed(
            Method::PUT,
            &format!("/api/v1/productos/{id}"),
            Some(json!({ "precio": "0.004" })),
        )
        .await;
    assert_eq!(update.status, StatusCode::BAD_REQUEST);

    let unchanged = app.get(&format!("/api/v1/productos/{id}")).await;
    assert_eq!(unchanged.body["data"]["precio"], "18.00");

    let listed = app.get("/api/v1/productos").await;
    assert_eq!(listed.body["pagination"]["total"], 1);
}

#[tokio::test]
async fn price_switches_to_wholesale_at_threshold() {
    let (app, _, product) = catalog().await;
    let id = product["id"].as_i64().unwrap();

    let retail = app
        .get(&format!("/api/v1/productos/{id}/precio?cantidad=9"))
        .await;
    assert_eq!(retail.status, StatusCode::OK);
    assert_eq!(retail.body["data"]["precio_unitario"], "18.00");
    assert_eq!(retail.body["data"]["precio_total"], "162.00");
    assert_eq!(retail.body["data"]["es_precio_mayorista"], false);

    let wholesale = app
        .get(&format!("/api/v1/productos/{id}/precio?cantidad=10"))
        .await;
    assert_eq!(wholesale.body["data"]["precio_unitario"], "15.00");
    assert_eq!(wholesale.body["data"]["precio_total"], "150.00");
    assert_eq!(wholesale.body["data"]["es_precio_mayorista"], true);

    let zero = app
        .get(&format!("/api/v1/productos/{id}/precio?cantidad=0"))
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listings_filter_by_state_and_wholesale() {
    let (app, category, _) = catalog().await;
    let plain = app
        .create_product(json!({
            "nombre": "Paleta de mango",
            "sabor": "Mango",
            "precio": "12.50",
            "categoria_id": category,
        }))
        .await;
    let plain_id = plain["id"].as_i64().unwrap();
    app.authed(
        Method::DELETE,
        &format!("/api/v1/productos/{plain_id}"),
        None,
    )
    .await;

    let all = app.get("/api/v1/productos").await;
    assert_eq!(all.body["pagination"]["total"], 2);

    let active = app.get("/api/v1/productos?activo=true").await;
    assert_eq!(active.body["pagination"]["total"], 1);

    let no_wholesale = app
        .get("/api/v1/productos?con_precio_mayorista=false")
        .await;
    assert_eq!(no_wholesale.body["data"][0]["id"], plain_id);

    let wholesale = app.get("/api/v1/productos/mayorista/disponibles").await;
    assert_eq!(wholesale.status, StatusCode::OK);
    assert_eq!(wholesale.body["data"].as_array().unwrap().len(), 1);

    let by_category = app
        .get(&format!("/api/v1/productos/categoria/{category}?activo=false"))
        .await;
    assert_eq!(by_category.status, StatusCode::OK);
    assert_eq!(by_category.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(by_category.body["data"][0]["id"], plain_id);

    let unknown = app.get("/api/v1/productos/categoria/999").await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_can_clear_wholesale_pricing() {
    let (app, _, product) = catalog().await;
    let id = product["id"].as_i64().unwrap();

    let res = app
        .authed(
            Method::PUT,
            &format!("/api/v1/productos/{id}"),
            Some(json!({ "precio_mayorista": null, "stock": 5 })),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["precio_mayorista"], Value::Null);
    assert_eq!(res.body["data"]["stock"], 5);
    assert_eq!(res.body["data"]["sabor"], "Fresa");
}

#[tokio::test]
async fn stock_endpoint_sets_absolute_value() {
    let (app, _, product) = catalog().await;
    let id = product["id"].as_i64().unwrap();

    let res = app
        .authed(
            Method::PATCH,
            &format!("/api/v1/productos/{id}/stock?nuevo_stock=7"),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["stock"], 7);

    let negative = app
        .authed(
            Method::PATCH,
            &format!("/api/v1/productos/{id}/stock?nuevo_stock=-1"),
            None,
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let missing = app
        .authed(
            Method::PATCH,
            "/api/v1/productos/999/stock?nuevo_stock=1",
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_and_activate_toggle_the_flag() {
    let (app, _, product) = catalog().await;
    let id = product["id"].as_i64().unwrap();

    let deleted = app
        .authed(Method::DELETE, &format!("/api/v1/productos/{id}"), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"]["activo"], false);

    let still_readable = app.get(&format!("/api/v1/productos/{id}")).await;
    assert_eq!(still_readable.status, StatusCode::OK);

    let activated = app
        .authed(
            Method::PATCH,
            &format!("/api/v1/productos/{id}/activar"),
            None,
        )
        .await;
    assert_eq!(activated.body["data"]["activo"], true);
}
