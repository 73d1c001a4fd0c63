//! # Template Model
//!
//! The in-memory representation of a certificate or report template. A
//! template has exactly four regions, each an ordered list of placed fields.
//! The serialized form of [`Template`] *is* the template document exchanged
//! with the outside world:
//!
//! ```text
//! { id, name, dataSourceId,
//!   sections: { header: [Field], body: [Field], signature_area: [Field], footer: [Field] } }
//! ```
//!
//! Rows are not part of the model. They are derived from each section's flat
//! field order and widths by the layout engine and never persisted.
//!
//! Section contents can only be changed from inside the crate; outside code
//! goes through [`crate::editor::TemplateEditor`], which records every
//! mutation as an undoable command.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::FieldDefinition;
use crate::error::{BuilderError, TargetError};

/// Free-form visual style of a field (font, alignment, color, ...).
pub type StyleMap = BTreeMap<String, serde_json::Value>;

/// Free-form non-visual settings of a field (formatting, data-binding options).
pub type ConfigMap = BTreeMap<String, serde_json::Value>;

/// Identifier of a placed field. Unique across the whole template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The four fixed regions of a template.
///
/// `header`, `signature_area` and `footer` repeat on every page of the
/// rendered output; `body` is the single paginated content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Body,
    SignatureArea,
    Footer,
}

impl SectionKind {
    /// All regions in document order.
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Header,
        SectionKind::Body,
        SectionKind::SignatureArea,
        SectionKind::Footer,
    ];

    /// The name used in the template document.
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Body => "body",
            SectionKind::SignatureArea => "signature_area",
            SectionKind::Footer => "footer",
        }
    }

    /// Human-readable name for activity messages.
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Header => "Header",
            SectionKind::Body => "Body",
            SectionKind::SignatureArea => "Signature area",
            SectionKind::Footer => "Footer",
        }
    }

    /// Whether this region is repeated on every page of the output.
    pub fn repeats_on_every_page(self) -> bool {
        !matches!(self, SectionKind::Body)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A catalog field placed inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedField {
    pub id: FieldId,
    pub field_type: String,
    pub label: String,
    pub data_binding_key: String,

    /// Fraction of the row this field occupies. Anything in `(0, 1]` is legal;
    /// the 1/2, 1/3 and 1/4 presets are a UI convenience.
    pub width: f64,

    #[serde(default)]
    pub style: StyleMap,

    #[serde(default)]
    pub config: ConfigMap,

    /// Ordinal within the section's flat sequence. Kept dense (`0..n`).
    #[serde(default)]
    pub position: usize,
}

impl PlacedField {
    /// Instantiate a catalog definition with a fresh identifier.
    pub fn from_definition(definition: &FieldDefinition) -> Self {
        Self {
            id: FieldId::generate(),
            field_type: definition.field_type.clone(),
            label: definition.label.clone(),
            data_binding_key: definition.data_binding_key.clone(),
            width: definition.default_width,
            style: definition.default_style.clone(),
            config: definition.default_config.clone(),
            position: 0,
        }
    }

    /// Name shown in activity messages.
    pub fn display_name(&self) -> &str {
        if !self.label.is_empty() {
            &self.label
        } else if !self.data_binding_key.is_empty() {
            &self.data_binding_key
        } else {
            self.id.as_str()
        }
    }

    pub fn appearance(&self) -> Appearance {
        Appearance {
            width: self.width,
            style: self.style.clone(),
        }
    }

    pub fn settings(&self) -> FieldSettings {
        FieldSettings {
            label: self.label.clone(),
            data_binding_key: self.data_binding_key.clone(),
            config: self.config.clone(),
        }
    }

    pub(crate) fn set_appearance(&mut self, appearance: &Appearance) {
        self.width = appearance.width;
        self.style = appearance.style.clone();
    }

    pub(crate) fn set_settings(&mut self, settings: &FieldSettings) {
        self.label = settings.label.clone();
        self.data_binding_key = settings.data_binding_key.clone();
        self.config = settings.config.clone();
    }
}

/// The visual half of a field: its layout width and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub width: f64,
    #[serde(default)]
    pub style: StyleMap,
}

/// The non-visual half of a field: what it shows and where the value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSettings {
    pub label: String,
    pub data_binding_key: String,
    #[serde(default)]
    pub config: ConfigMap,
}

impl FieldSettings {
    /// Same fallback as [`PlacedField::display_name`]: label, then binding key, then id.
    pub fn display_name<'a>(&'a self, id: &'a FieldId) -> &'a str {
        if !self.label.is_empty() {
            &self.label
        } else if !self.data_binding_key.is_empty() {
            &self.data_binding_key
        } else {
            id.as_str()
        }
    }
}

/// An ordered run of placed fields. Serialized as a plain array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section {
    fields: Vec<PlacedField>,
}

impl Section {
    pub fn fields(&self) -> &[PlacedField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlacedField> {
        self.fields.get(index)
    }

    pub fn index_of(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == id)
    }

    pub(crate) fn insert(&mut self, index: usize, field: PlacedField) {
        self.fields.insert(index, field);
        self.renumber();
    }

    pub(crate) fn remove(&mut self, index: usize) -> PlacedField {
        let field = self.fields.remove(index);
        self.renumber();
        field
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut PlacedField> {
        self.fields.get_mut(index)
    }

    fn renumber(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.position = i;
        }
    }

    /// Order by the stored `position` (stable for ties) and make positions dense.
    fn normalize(&mut self) {
        self.fields.sort_by_key(|f| f.position);
        self.renumber();
    }
}

/// The four regions, keyed by name in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sections {
    #[serde(default)]
    header: Section,
    #[serde(default)]
    body: Section,
    #[serde(default)]
    signature_area: Section,
    #[serde(default)]
    footer: Section,
}

impl Sections {
    pub fn get(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::Header => &self.header,
            SectionKind::Body => &self.body,
            SectionKind::SignatureArea => &self.signature_area,
            SectionKind::Footer => &self.footer,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Header => &mut self.header,
            SectionKind::Body => &mut self.body,
            SectionKind::SignatureArea => &mut self.signature_area,
            SectionKind::Footer => &mut self.footer,
        }
    }

    /// Iterate regions in document order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionKind, &Section)> {
        SectionKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// A template: the root aggregate edited by one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,

    /// Reference to the external data source that feeds the bindings.
    #[serde(default)]
    pub data_source_id: Option<String>,

    #[serde(default)]
    sections: Sections,
}

impl Template {
    /// An empty template.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_source_id: None,
            sections: Sections::default(),
        }
    }

    pub fn with_data_source(mut self, data_source_id: impl Into<String>) -> Self {
        self.data_source_id = Some(data_source_id.into());
        self
    }

    /// The same template with every section emptied.
    pub fn emptied(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            data_source_id: self.data_source_id.clone(),
            sections: Sections::default(),
        }
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> &Section {
        self.sections.get(kind)
    }

    pub(crate) fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        self.sections.get_mut(kind)
    }

    /// Find the region and flat index of a field.
    pub fn locate(&self, id: &FieldId) -> Option<(SectionKind, usize)> {
        self.sections
            .iter()
            .find_map(|(kind, section)| section.index_of(id).map(|i| (kind, i)))
    }

    pub fn field(&self, id: &FieldId) -> Option<&PlacedField> {
        let (kind, index) = self.locate(id)?;
        self.section(kind).get(index)
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.locate(id).is_some()
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|(_, s)| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Every placed field, region by region, in flat order.
    pub fn fields(&self) -> impl Iterator<Item = (SectionKind, &PlacedField)> {
        self.sections
            .iter()
            .flat_map(|(kind, section)| section.fields().iter().map(move |f| (kind, f)))
    }

    /// Sort every section by `position`, make positions dense, and reject a
    /// field identifier that appears more than once.
    pub fn normalize(mut self) -> Result<Self, BuilderError> {
        let mut seen: HashMap<FieldId, SectionKind> = HashMap::new();
        for (kind, field) in self.fields() {
            if let Some(&first) = seen.get(&field.id) {
                return Err(TargetError::DuplicateField {
                    field: field.id.clone(),
                    section: first,
                }
                .into());
            }
            seen.insert(field.id.clone(), kind);
        }
        for kind in SectionKind::ALL {
            self.section_mut(kind).normalize();
        }
        Ok(self)
    }

    /// Parse and normalize a template document.
    pub fn from_json(json: &str) -> Result<Self, BuilderError> {
        let template: Template = serde_json::from_str(json)?;
        template.normalize()
    }

    pub fn to_json(&self) -> Result<String, BuilderError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, BuilderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
