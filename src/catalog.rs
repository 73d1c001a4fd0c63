//! Field catalog: the definitions a user can drag onto the canvas.
//!
//! The real catalog is supplied by an external service (data-source schemas,
//! SAP-backed master data). The core only needs the [`FieldCatalog`] seam and
//! a static implementation for tests, the CLI and offline use.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::BuilderError;
use crate::model::{ConfigMap, StyleMap};

/// A field that can be placed on a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub field_type: String,
    pub label: String,
    pub data_binding_key: String,
    #[serde(default = "default_width")]
    pub default_width: f64,
    #[serde(default)]
    pub default_style: StyleMap,
    #[serde(default)]
    pub default_config: ConfigMap,
}

fn default_width() -> f64 {
    1.0
}

impl FieldDefinition {
    pub fn new(
        field_type: impl Into<String>,
        label: impl Into<String>,
        data_binding_key: impl Into<String>,
    ) -> Self {
        Self {
            field_type: field_type.into(),
            label: label.into(),
            data_binding_key: data_binding_key.into(),
            default_width: default_width(),
            default_style: StyleMap::new(),
            default_config: ConfigMap::new(),
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.default_width = width;
        self
    }

    pub fn with_style(mut self, key: &str, value: serde_json::Value) -> Self {
        self.default_style.insert(key.to_string(), value);
        self
    }

    pub fn with_config(mut self, key: &str, value: serde_json::Value) -> Self {
        self.default_config.insert(key.to_string(), value);
        self
    }
}

/// Source of placeable field definitions.
pub trait FieldCatalog {
    fn list_available_fields(&self) -> Vec<FieldDefinition>;

    /// Look a definition up by its data-binding key.
    fn find(&self, data_binding_key: &str) -> Option<FieldDefinition> {
        self.list_available_fields()
            .into_iter()
            .find(|d| d.data_binding_key == data_binding_key)
    }
}

/// A catalog backed by a fixed list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    fields: Vec<FieldDefinition>,
}

impl StaticCatalog {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self { fields }
    }

    pub fn from_json(json: &str) -> Result<Self, BuilderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The fields of a typical course-completion certificate.
    pub fn certificate() -> Self {
        Self::new(vec![
            FieldDefinition::new("image", "Institution logo", "institution.logo")
                .with_width(0.25)
                .with_style("align", json!("left")),
            FieldDefinition::new("text", "Institution name", "institution.name")
                .with_width(0.75)
                .with_style("fontSize", json!(18))
                .with_style("fontWeight", json!(700)),
            FieldDefinition::new("text", "Student name", "student.fullName")
                .with_style("fontSize", json!(28))
                .with_style("align", json!("center")),
            FieldDefinition::new("text", "Student ID", "student.id").with_width(0.5),
            FieldDefinition::new("text", "Course", "course.name").with_width(0.5),
            FieldDefinition::new("text", "Period", "period.name").with_width(0.5),
            FieldDefinition::new("date", "Issue date", "certificate.issuedAt")
                .with_width(0.5)
                .with_config("format", json!("dd/MM/yyyy")),
            FieldDefinition::new("number", "Final grade", "student.grade")
                .with_width(0.25)
                .with_config("decimals", json!(1)),
            FieldDefinition::new("signature", "Director signature", "signatures.director")
                .with_width(0.5)
                .with_style("align", json!("center")),
            FieldDefinition::new("signature", "Coordinator signature", "signatures.coordinator")
                .with_width(0.5)
                .with_style("align", json!("center")),
            FieldDefinition::new("qr", "Verification code", "certificate.verifyUrl")
                .with_width(0.25),
            FieldDefinition::new("text", "Page number", "page.number")
                .with_width(0.25)
                .with_style("fontSize", json!(8)),
        ])
    }
}

impl FieldCatalog for StaticCatalog {
    fn list_available_fields(&self) -> Vec<FieldDefinition> {
        self.fields.clone()
    }
}
