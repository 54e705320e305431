use crate::{
    domain::responses::CategoryResponse,
    model::{PriceQuote, Product},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductResponse {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "sabor")]
    pub flavor: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    #[schema(value_type = String, example = "25.50")]
    pub price: Decimal,
    #[serde(rename = "precio_mayorista")]
    #[schema(value_type = Option<String>, example = "20.00")]
    pub wholesale_price: Option<Decimal>,
    #[serde(rename = "cantidad_minima_mayorista")]
    pub wholesale_min_quantity: Option<i32>,
    pub stock: i32,
    #[serde(rename = "imagen_url")]
    pub image_url: Option<String>,
    #[serde(rename = "categoria_id")]
    pub category_id: i32,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "fecha_creacion")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "fecha_actualizacion")]
    pub updated_at: NaiveDateTime,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        ProductResponse {
            id: value.id,
            name: value.name,
            flavor: value.flavor,
            description: value.description,
            price: value.price,
            wholesale_price: value.wholesale_price,
            wholesale_min_quantity: value.wholesale_min_quantity,
            stock: value.stock,
            image_url: value.image_url,
            category_id: value.category_id,
            active: value.active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductWithCategoryResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    #[serde(rename = "categoria")]
    pub category: CategoryResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct PriceResponse {
    pub producto_id: i32,
    pub cantidad: i32,
    #[schema(value_type = String, example = "20.00")]
    pub precio_unitario: Decimal,
    #[schema(value_type = String, example = "200.00")]
    pub precio_total: Decimal,
    pub es_precio_mayorista: bool,
}

impl From<PriceQuote> for PriceResponse {
    fn from(quote: PriceQuote) -> Self {
        PriceResponse {
            producto_id: quote.product_id,
            cantidad: quote.quantity,
            precio_unitario: quote.unit_price,
            precio_total: quote.total_price,
            es_precio_mayorista: quote.wholesale,
        }
    }
}
