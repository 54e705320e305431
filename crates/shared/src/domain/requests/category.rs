use crate::{
    domain::requests::{default_limit, default_skip, default_true, deserialize_some},
    model::Category,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllCategories {
    #[serde(default = "default_skip")]
    #[validate(range(min = 0, message = "skip no puede ser negativo"))]
    pub skip: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000, message = "limit debe estar entre 1 y 1000"))]
    pub limit: i64,

    /// Only categories with this active flag.
    #[serde(default, rename = "activo")]
    pub active: Option<bool>,
}

impl Default for FindAllCategories {
    fn default() -> Self {
        Self {
            skip: default_skip(),
            limit: default_limit(),
            active: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 50, message = "El nombre debe tener entre 1 y 50 caracteres"))]
    #[schema(example = "Helados de crema")]
    pub name: String,

    #[serde(default, rename = "descripcion")]
    #[schema(example = "Helados artesanales a base de leche")]
    pub description: Option<String>,

    #[serde(default = "default_true", rename = "activo")]
    pub active: bool,
}

/// Partial update: absent fields are left untouched, `"descripcion": null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[serde(default, rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "El nombre debe tener entre 1 y 50 caracteres"))]
    pub name: Option<String>,

    #[serde(
        default,
        rename = "descripcion",
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl UpdateCategoryRequest {
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(description) = &self.description {
            category.description = description.clone();
        }
        if let Some(active) = self.active {
            category.active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn category() -> Category {
        Category {
            id: 1,
            name: "Paletas".into(),
            description: Some("De agua".into()),
            active: true,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn absent_fields_are_left_untouched() {
        let req: UpdateCategoryRequest = serde_json::from_value(json!({ "nombre": "Conos" })).unwrap();
        let mut cat = category();
        req.apply_to(&mut cat);

        assert_eq!(cat.name, "Conos");
        assert_eq!(cat.description.as_deref(), Some("De agua"));
        assert!(cat.active);
    }

    #[test]
    fn explicit_null_clears_description() {
        let req: UpdateCategoryRequest =
            serde_json::from_value(json!({ "descripcion": null })).unwrap();
        assert_eq!(req.description, Some(None));

        let mut cat = category();
        req.apply_to(&mut cat);
        assert_eq!(cat.description, None);
        assert_eq!(cat.name, "Paletas");
    }

    #[test]
    fn create_defaults_to_active() {
        let req: CreateCategoryRequest =
            serde_json::from_value(json!({ "nombre": "Sundaes" })).unwrap();
        assert!(req.active);
        assert!(req.description.is_none());
    }

    #[test]
    fn name_length_is_bounded() {
        let req = CreateCategoryRequest {
            name: "x".repeat(51),
            description: None,
            active: true,
        };
        assert!(req.validate().is_err());

        let empty = UpdateCategoryRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn pagination_limit_is_bounded() {
        let query = FindAllCategories {
            limit: 0,
            ..Default::default()
        };
        assert!(query.validate().is_err());
        assert!(FindAllCategories::default().validate().is_ok());
    }
}
