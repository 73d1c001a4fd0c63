//! Scripted editing sessions.
//!
//! A script is a JSON array of steps replayed against an editor, the
//! headless equivalent of a user clicking through the builder:
//!
//! ```json
//! [
//!   { "place": { "binding": "student.fullName", "section": "body", "id": "name" } },
//!   { "resize": { "field": "name", "width": 0.5 } },
//!   { "restyle": { "field": "name", "preset": "title" } },
//!   { "apply": { "type": "move", "field": "name", "to": "header", "index": 0 } },
//!   "undo",
//!   "redo",
//!   "save"
//! ]
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::FieldCatalog;
use crate::command::Operation;
use crate::editor::TemplateEditor;
use crate::error::{BuilderError, TargetError};
use crate::model::{FieldId, PlacedField, SectionKind, StyleMap};
use crate::style::{self, QuickPreset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Any operation, spelled out.
    Apply(Operation),
    /// Place a catalog field. `id` pins the new identifier so later steps can
    /// refer to it.
    Place {
        binding: String,
        section: SectionKind,
        #[serde(default)]
        index: Option<usize>,
        #[serde(default)]
        id: Option<FieldId>,
    },
    Resize {
        field: FieldId,
        width: f64,
    },
    Restyle {
        field: FieldId,
        #[serde(default)]
        preset: Option<QuickPreset>,
        #[serde(default)]
        overrides: Option<StyleMap>,
    },
    Undo,
    Redo,
    Save,
}

impl Step {
    pub fn parse_all(json: &str) -> Result<Vec<Step>, BuilderError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What a script run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub executed: usize,
    pub undone: usize,
    pub redone: usize,
    pub saved: usize,
    /// Undo or redo steps with nothing to act on.
    pub skipped: usize,
}

impl TemplateEditor {
    /// Replay `steps` in order, stopping at the first rejected step. Steps
    /// before it stay applied.
    pub fn run(
        &mut self,
        steps: &[Step],
        catalog: &dyn FieldCatalog,
    ) -> Result<RunSummary, BuilderError> {
        let mut summary = RunSummary::default();
        for (i, step) in steps.iter().enumerate() {
            if let Err(e) = self.run_step(step, catalog, &mut summary) {
                warn!(target: "folio::script", step = i, error = %e, "script stopped");
                return Err(e);
            }
        }
        Ok(summary)
    }

    fn run_step(
        &mut self,
        step: &Step,
        catalog: &dyn FieldCatalog,
        summary: &mut RunSummary,
    ) -> Result<(), BuilderError> {
        let operation = match step {
            Step::Apply(operation) => operation.clone(),
            Step::Place {
                binding,
                section,
                index,
                id,
            } => {
                let definition = catalog
                    .find(binding)
                    .ok_or_else(|| TargetError::MissingField(FieldId::new(binding.as_str())))?;
                let mut field = PlacedField::from_definition(&definition);
                if let Some(id) = id {
                    field.id = id.clone();
                }
                Operation::Add {
                    section: *section,
                    index: *index,
                    field,
                }
            }
            Step::Resize { field, width } => style::resize(self.existing(field)?, *width),
            Step::Restyle {
                field,
                preset,
                overrides,
            } => style::restyle(self.existing(field)?, *preset, overrides.as_ref()),
            Step::Undo => {
                match self.undo() {
                    Some(result) => {
                        result?;
                        summary.undone += 1;
                    }
                    None => summary.skipped += 1,
                }
                return Ok(());
            }
            Step::Redo => {
                match self.redo() {
                    Some(result) => {
                        result?;
                        summary.redone += 1;
                    }
                    None => summary.skipped += 1,
                }
                return Ok(());
            }
            Step::Save => {
                self.mark_saved();
                summary.saved += 1;
                return Ok(());
            }
        };
        self.execute(operation)?;
        summary.executed += 1;
        Ok(())
    }

    fn existing(&self, id: &FieldId) -> Result<&PlacedField, BuilderError> {
        self.template()
            .field(id)
            .ok_or_else(|| TargetError::MissingField(id.clone()).into())
    }
}
