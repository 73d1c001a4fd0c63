//! # Folio
//!
//! The core of a certificate and report template builder.
//!
//! A template has four fixed regions (header, body, signature area, footer).
//! Users drop data-bound fields from a catalog into those regions, size them
//! as fractions of the page width, style and configure them, and move them
//! around. Rows are never stored: they are derived from each region's field
//! order and widths by greedy packing. Every change is a command, so every
//! change can be undone.
//!
//! ## Architecture
//!
//! ```text
//! Gesture (drop, palette, keyboard, script)
//!       ↓
//!   [placement] / [style]  - Build an Operation
//!       ↓
//!   [command]   - Validate, capture inverse → Action
//!       ↓
//!   [editor]    - Apply, push on [history], log to [activity]
//!       ↓
//!   [model]     - Template document (JSON in/out)
//!       ↓
//!   [layout]    - Pack each region into rows
//! ```

pub mod activity;
pub mod catalog;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod keymap;
pub mod layout;
pub mod model;
pub mod placement;
pub mod script;
pub mod store;
pub mod style;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use catalog::{FieldCatalog, FieldDefinition, StaticCatalog};
pub use command::Operation;
pub use config::BuilderConfig;
pub use editor::TemplateEditor;
pub use error::{BuilderError, TargetError};
pub use model::{FieldId, PlacedField, SectionKind, Template};

use layout::TemplateLayout;

/// Parse a template document and pack its rows.
///
/// The quickest way to see how a stored template will be laid out, without
/// opening an editing session.
pub fn layout_json(json: &str) -> Result<TemplateLayout, BuilderError> {
    let template = Template::from_json(json)?;
    Ok(TemplateLayout::of(&template))
}
