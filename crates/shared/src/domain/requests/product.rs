use crate::{
    domain::requests::{default_limit, default_skip, default_true, deserialize_some},
    model::{Product, normalize_money},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

const MAX_IMAGE_URL_CHARS: usize = 500;

fn default_wholesale_min_quantity() -> Option<i32> {
    Some(10)
}

fn max_price() -> Decimal {
    // NUMERIC(10,2)
    Decimal::new(99_999_999_99, 2)
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Checked after rounding to cents, since that is the value that gets stored.
fn check_price(value: Decimal, message: &'static str) -> Result<(), ValidationError> {
    let value = normalize_money(value);
    if value <= Decimal::ZERO || value > max_price() {
        return Err(invalid("price", message));
    }
    Ok(())
}

fn check_image_url(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_IMAGE_URL_CHARS {
        return Err(invalid(
            "imagen_url",
            "imagen_url no puede superar los 500 caracteres",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllProducts {
    #[serde(default = "default_skip")]
    #[validate(range(min = 0, message = "skip no puede ser negativo"))]
    pub skip: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000, message = "limit debe estar entre 1 y 1000"))]
    pub limit: i64,

    #[serde(default, rename = "activo")]
    pub active: Option<bool>,

    #[serde(default, rename = "categoria_id")]
    pub category_id: Option<i32>,

    /// `true`: price and threshold both set. `false`: no wholesale price.
    #[serde(default, rename = "con_precio_mayorista")]
    pub has_wholesale: Option<bool>,
}

impl Default for FindAllProducts {
    fn default() -> Self {
        Self {
            skip: default_skip(),
            limit: default_limit(),
            active: None,
            category_id: None,
            has_wholesale: None,
        }
    }
}

impl FindAllProducts {
    pub fn matches(&self, product: &Product) -> bool {
        self.active.is_none_or(|active| product.active == active)
            && self
                .category_id
                .is_none_or(|category_id| product.category_id == category_id)
            && self.has_wholesale.is_none_or(|wanted| {
                if wanted {
                    product.has_wholesale()
                } else {
                    product.wholesale_price.is_none()
                }
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindWholesaleProducts {
    #[serde(default = "default_skip")]
    #[validate(range(min = 0, message = "skip no puede ser negativo"))]
    pub skip: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000, message = "limit debe estar entre 1 y 1000"))]
    pub limit: i64,
}

impl Default for FindWholesaleProducts {
    fn default() -> Self {
        Self {
            skip: default_skip(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryProductsQuery {
    #[serde(default = "default_true", rename = "activo")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockQuery {
    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    pub nuevo_stock: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceQuery {
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a 0"))]
    pub cantidad: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_product"))]
pub struct CreateProductRequest {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100, message = "El nombre debe tener entre 1 y 100 caracteres"))]
    #[schema(example = "Helado de fresa")]
    pub name: String,

    #[serde(rename = "sabor")]
    #[validate(length(min = 1, max = 50, message = "El sabor debe tener entre 1 y 50 caracteres"))]
    #[schema(example = "Fresa")]
    pub flavor: String,

    #[serde(default, rename = "descripcion")]
    pub description: Option<String>,

    #[serde(rename = "precio")]
    #[schema(value_type = String, example = "25.50")]
    pub price: Decimal,

    #[serde(default, rename = "precio_mayorista")]
    #[schema(value_type = Option<String>, example = "20.00")]
    pub wholesale_price: Option<Decimal>,

    #[serde(
        default = "default_wholesale_min_quantity",
        rename = "cantidad_minima_mayorista"
    )]
    #[validate(range(min = 1, message = "La cantidad mínima mayorista debe ser mayor a 0"))]
    #[schema(example = 10)]
    pub wholesale_min_quantity: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    pub stock: i32,

    #[serde(default, rename = "imagen_url")]
    pub image_url: Option<String>,

    #[serde(rename = "categoria_id")]
    pub category_id: i32,

    #[serde(default = "default_true", rename = "activo")]
    pub active: bool,
}

impl CreateProductRequest {
    /// Rounds the money fields to cents.
    pub fn normalized(mut self) -> Self {
        self.price = normalize_money(self.price);
        self.wholesale_price = self.wholesale_price.map(normalize_money);
        self
    }
}

fn validate_create_product(req: &CreateProductRequest) -> Result<(), ValidationError> {
    check_price(req.price, "El precio debe ser mayor a 0")?;
    if let Some(wholesale) = req.wholesale_price {
        check_price(wholesale, "El precio mayorista debe ser mayor a 0")?;
    }
    if let Some(url) = &req.image_url {
        check_image_url(url)?;
    }
    Ok(())
}

/// Partial update. Nullable columns accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_product"))]
pub struct UpdateProductRequest {
    #[serde(default, rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "El nombre debe tener entre 1 y 100 caracteres"))]
    pub name: Option<String>,

    #[serde(default, rename = "sabor", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "El sabor debe tener entre 1 y 50 caracteres"))]
    pub flavor: Option<String>,

    #[serde(
        default,
        rename = "descripcion",
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, rename = "precio", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,

    #[serde(
        default,
        rename = "precio_mayorista",
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub wholesale_price: Option<Option<Decimal>>,

    #[serde(
        default,
        rename = "cantidad_minima_mayorista",
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>)]
    pub wholesale_min_quantity: Option<Option<i32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    pub stock: Option<i32>,

    #[serde(
        default,
        rename = "imagen_url",
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,

    #[serde(default, rename = "categoria_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i32>,

    #[serde(default, rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

fn validate_update_product(req: &UpdateProductRequest) -> Result<(), ValidationError> {
    if let Some(price) = req.price {
        check_price(price, "El precio debe ser mayor a 0")?;
    }
    if let Some(Some(wholesale)) = req.wholesale_price {
        check_price(wholesale, "El precio mayorista debe ser mayor a 0")?;
    }
    if let Some(Some(min_quantity)) = req.wholesale_min_quantity {
        if min_quantity < 1 {
            return Err(invalid(
                "cantidad_minima_mayorista",
                "La cantidad mínima mayorista debe ser mayor a 0",
            ));
        }
    }
    if let Some(Some(url)) = &req.image_url {
        check_image_url(url)?;
    }
    Ok(())
}

impl UpdateProductRequest {
    /// Overwrites only the supplied fields of `product`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(flavor) = &self.flavor {
            product.flavor = flavor.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = normalize_money(price);
        }
        if let Some(wholesale_price) = self.wholesale_price {
            product.wholesale_price = wholesale_price.map(normalize_money);
        }
        if let Some(min_quantity) = self.wholesale_min_quantity {
            product.wholesale_min_quantity = min_quantity;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(image_url) = &self.image_url {
            product.image_url = image_url.clone();
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(active) = self.active {
            product.active = active;
        }
    }
}
