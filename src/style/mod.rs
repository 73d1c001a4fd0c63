//! # Style Resolution
//!
//! A field's effective style is a shallow, key-wise merge of up to three
//! layers, later layers winning:
//!
//! ```text
//!   base (field's current style, or the catalog default)
//!     ↓ quick-palette preset
//!     ↓ advanced per-field overrides
//!   effective style
//! ```
//!
//! Nothing here mutates a field. Every helper returns an [`Operation`] that
//! must go through the editor, so each restyle or reconfiguration is one
//! undoable step.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::FieldDefinition;
use crate::command::Operation;
use crate::model::{Appearance, ConfigMap, FieldSettings, PlacedField, StyleMap};

/// One-click styles from the quick palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickPreset {
    Title,
    Subtitle,
    Body,
    Caption,
    Emphasis,
    Centered,
    Signature,
}

impl QuickPreset {
    pub const ALL: [QuickPreset; 7] = [
        QuickPreset::Title,
        QuickPreset::Subtitle,
        QuickPreset::Body,
        QuickPreset::Caption,
        QuickPreset::Emphasis,
        QuickPreset::Centered,
        QuickPreset::Signature,
    ];

    /// The keys this preset sets.
    pub fn style(self) -> StyleMap {
        let pairs = match self {
            QuickPreset::Title => vec![
                ("fontSize", json!(24)),
                ("fontWeight", json!(700)),
                ("align", json!("center")),
            ],
            QuickPreset::Subtitle => vec![
                ("fontSize", json!(16)),
                ("fontWeight", json!(600)),
                ("color", json!("#374151")),
            ],
            QuickPreset::Body => vec![
                ("fontSize", json!(11)),
                ("fontWeight", json!(400)),
            ],
            QuickPreset::Caption => vec![
                ("fontSize", json!(8)),
                ("color", json!("#6b7280")),
            ],
            QuickPreset::Emphasis => vec![
                ("fontWeight", json!(700)),
                ("fontStyle", json!("italic")),
            ],
            QuickPreset::Centered => vec![("align", json!("center"))],
            QuickPreset::Signature => vec![
                ("align", json!("center")),
                ("borderTop", json!("1px solid #111827")),
                ("paddingTop", json!(4)),
            ],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

/// Width shortcuts offered next to the free width input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthPreset {
    Full,
    Half,
    Third,
    Quarter,
}

impl WidthPreset {
    pub fn fraction(self) -> f64 {
        match self {
            WidthPreset::Full => 1.0,
            WidthPreset::Half => 0.5,
            WidthPreset::Third => 1.0 / 3.0,
            WidthPreset::Quarter => 0.25,
        }
    }
}

impl From<WidthPreset> for f64 {
    fn from(preset: WidthPreset) -> Self {
        preset.fraction()
    }
}

/// Merge `preset` and then `overrides` onto `base`, key by key.
pub fn resolve_style(
    base: &StyleMap,
    preset: Option<QuickPreset>,
    overrides: Option<&StyleMap>,
) -> StyleMap {
    let mut style = base.clone();
    if let Some(preset) = preset {
        style.extend(preset.style());
    }
    if let Some(overrides) = overrides {
        style.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    style
}

/// Apply a preset and/or overrides on top of the field's current style.
pub fn restyle(
    field: &PlacedField,
    preset: Option<QuickPreset>,
    overrides: Option<&StyleMap>,
) -> Operation {
    Operation::Style {
        field: field.id.clone(),
        appearance: Appearance {
            width: field.width,
            style: resolve_style(&field.style, preset, overrides),
        },
    }
}

/// Rebuild the style from the catalog default, dropping earlier edits.
pub fn reset_style(field: &PlacedField, definition: &FieldDefinition) -> Operation {
    Operation::Style {
        field: field.id.clone(),
        appearance: Appearance {
            width: field.width,
            style: definition.default_style.clone(),
        },
    }
}

/// Change only the layout width.
pub fn resize(field: &PlacedField, width: impl Into<f64>) -> Operation {
    Operation::Style {
        field: field.id.clone(),
        appearance: Appearance {
            width: width.into(),
            style: field.style.clone(),
        },
    }
}

/// Change non-visual settings. `None` keeps the current label or binding;
/// `overrides` is merged onto the current config.
pub fn configure(
    field: &PlacedField,
    label: Option<&str>,
    data_binding_key: Option<&str>,
    overrides: &ConfigMap,
) -> Operation {
    let mut config = field.config.clone();
    config.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    Operation::Config {
        field: field.id.clone(),
        settings: FieldSettings {
            label: label.map_or_else(|| field.label.clone(), str::to_string),
            data_binding_key: data_binding_key
                .map_or_else(|| field.data_binding_key.clone(), str::to_string),
            config,
        },
    }
}
