//! Invertible commands over the template model.
//!
//! Editing happens in two steps:
//!
//! 1. A gesture produces an [`Operation`]: what the user asked for, in terms
//!    of field identifiers ("delete X", "move X to the footer at 0").
//! 2. [`Operation::prepare`] checks the request against the current template
//!    and captures everything needed to reverse it, yielding an [`Action`]:
//!    the removed field and its slot, the appearance before and after a
//!    restyle, the identifier minted for a duplicate.
//!
//! Actions are what the history stores. Undo and redo replay the recorded
//! action and never re-resolve the operation, so redoing a duplicate restores
//! the very same identifier.
//!
//! # Invariants
//!
//! - `apply` followed by `revert` restores the prior template exactly
//! - `revert` followed by `apply` restores the applied template exactly
//! - `apply` and `revert` check their target before the first mutation, so a
//!   failed call leaves the template untouched

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActionType;
use crate::error::{BuilderError, TargetError};
use crate::layout::is_valid_width;
use crate::model::{Appearance, FieldId, FieldSettings, PlacedField, SectionKind, Template};

/// A position within a section's flat field sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub section: SectionKind,
    pub index: usize,
}

impl Slot {
    pub fn new(section: SectionKind, index: usize) -> Self {
        Self { section, index }
    }
}

/// A requested change, not yet checked against the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Operation {
    /// Place a new field. Without an index the field is appended.
    Add {
        section: SectionKind,
        #[serde(default)]
        index: Option<usize>,
        field: PlacedField,
    },
    Delete {
        field: FieldId,
    },
    /// Relocate a field. `index` is read after the field has left its
    /// current slot.
    Move {
        field: FieldId,
        to: SectionKind,
        index: usize,
    },
    /// Replace a field's width and style.
    Style {
        field: FieldId,
        appearance: Appearance,
    },
    /// Copy a field, with a fresh identifier, right after the original.
    Duplicate {
        field: FieldId,
    },
    /// Replace a field's label, binding and non-visual settings.
    Config {
        field: FieldId,
        settings: FieldSettings,
    },
}

impl Operation {
    /// Validate against `template` and capture the state needed to invert it.
    pub fn prepare(self, template: &Template) -> Result<Action, BuilderError> {
        match self {
            Operation::Add {
                section,
                index,
                mut field,
            } => {
                if !is_valid_width(field.width) {
                    return Err(BuilderError::InvalidWidth(field.width));
                }
                if let Some((existing, _)) = template.locate(&field.id) {
                    return Err(TargetError::DuplicateField {
                        field: field.id,
                        section: existing,
                    }
                    .into());
                }
                let len = template.section(section).len();
                let index = index.unwrap_or(len);
                if index > len {
                    return Err(TargetError::PositionOutOfBounds {
                        section,
                        index,
                        len,
                    }
                    .into());
                }
                field.position = index;
                Ok(Action::Add {
                    slot: Slot::new(section, index),
                    field,
                })
            }
            Operation::Delete { field } => {
                let (section, index) = locate(template, &field)?;
                let removed = template.section(section).fields()[index].clone();
                Ok(Action::Delete {
                    slot: Slot::new(section, index),
                    field: removed,
                })
            }
            Operation::Move { field, to, index } => {
                let (from_section, from_index) = locate(template, &field)?;
                let len = destination_len(template, from_section, to);
                if index > len {
                    return Err(TargetError::PositionOutOfBounds {
                        section: to,
                        index,
                        len,
                    }
                    .into());
                }
                let name = template.section(from_section).fields()[from_index]
                    .display_name()
                    .to_string();
                Ok(Action::Move {
                    field,
                    name,
                    from: Slot::new(from_section, from_index),
                    to: Slot::new(to, index),
                })
            }
            Operation::Style { field, appearance } => {
                let (section, index) = locate(template, &field)?;
                let current = &template.section(section).fields()[index];
                // Imported widths outside (0, 1] survive style-only edits.
                let resized = appearance.width.to_bits() != current.width.to_bits();
                if resized && !is_valid_width(appearance.width) {
                    return Err(BuilderError::InvalidWidth(appearance.width));
                }
                Ok(Action::Style {
                    section,
                    name: current.display_name().to_string(),
                    before: current.appearance(),
                    after: appearance,
                    field,
                })
            }
            Operation::Duplicate { field } => {
                let (section, index) = locate(template, &field)?;
                let mut copy = template.section(section).fields()[index].clone();
                copy.id = FieldId::generate();
                copy.position = index + 1;
                Ok(Action::Duplicate {
                    source: field,
                    slot: Slot::new(section, index + 1),
                    field: copy,
                })
            }
            Operation::Config { field, settings } => {
                let (section, index) = locate(template, &field)?;
                let before = template.section(section).fields()[index].settings();
                Ok(Action::Config {
                    field,
                    before,
                    after: settings,
                })
            }
        }
    }

    /// The field this operation targets, when it already exists.
    pub fn target(&self) -> Option<&FieldId> {
        match self {
            Operation::Add { .. } => None,
            Operation::Delete { field }
            | Operation::Move { field, .. }
            | Operation::Style { field, .. }
            | Operation::Duplicate { field }
            | Operation::Config { field, .. } => Some(field),
        }
    }
}

/// A validated change carrying its own inverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Action {
    Add {
        slot: Slot,
        field: PlacedField,
    },
    Delete {
        slot: Slot,
        field: PlacedField,
    },
    /// Delete-then-add as one step, so one undo restores the original slot.
    Move {
        field: FieldId,
        name: String,
        from: Slot,
        to: Slot,
    },
    Style {
        field: FieldId,
        section: SectionKind,
        name: String,
        before: Appearance,
        after: Appearance,
    },
    Duplicate {
        source: FieldId,
        slot: Slot,
        field: PlacedField,
    },
    Config {
        field: FieldId,
        before: FieldSettings,
        after: FieldSettings,
    },
    /// A persistence point. Changes nothing.
    Save {
        template: String,
    },
}

impl Action {
    /// Apply the forward mutation.
    pub fn apply(&self, template: &mut Template) -> Result<(), BuilderError> {
        match self {
            Action::Add { slot, field } | Action::Duplicate { slot, field, .. } => {
                insert_at(template, *slot, field)
            }
            Action::Delete { slot, field } => take_at(template, *slot, &field.id).map(|_| ()),
            Action::Move { field, from, to, .. } => relocate(template, field, *from, *to),
            Action::Style { field, after, .. } => {
                field_mut(template, field)?.set_appearance(after);
                Ok(())
            }
            Action::Config { field, after, .. } => {
                field_mut(template, field)?.set_settings(after);
                Ok(())
            }
            Action::Save { .. } => Ok(()),
        }
    }

    /// Apply the inverse mutation.
    pub fn revert(&self, template: &mut Template) -> Result<(), BuilderError> {
        match self {
            Action::Add { slot, field } | Action::Duplicate { slot, field, .. } => {
                take_at(template, *slot, &field.id).map(|_| ())
            }
            Action::Delete { slot, field } => insert_at(template, *slot, field),
            Action::Move { field, from, to, .. } => relocate(template, field, *to, *from),
            Action::Style { field, before, .. } => {
                field_mut(template, field)?.set_appearance(before);
                Ok(())
            }
            Action::Config { field, before, .. } => {
                field_mut(template, field)?.set_settings(before);
                Ok(())
            }
            Action::Save { .. } => Ok(()),
        }
    }

    /// Sections whose row packing may change when this action is applied or
    /// reverted.
    pub fn affected_sections(&self) -> Vec<SectionKind> {
        match self {
            Action::Add { slot, .. } | Action::Delete { slot, .. } | Action::Duplicate { slot, .. } => {
                vec![slot.section]
            }
            Action::Move { from, to, .. } if from.section == to.section => vec![from.section],
            Action::Move { from, to, .. } => vec![from.section, to.section],
            Action::Style { section, .. } => vec![*section],
            Action::Config { .. } | Action::Save { .. } => Vec::new(),
        }
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Action::Add { .. } => ActionType::Add,
            Action::Delete { .. } => ActionType::Delete,
            Action::Move { .. } => ActionType::Move,
            Action::Style { .. } => ActionType::Style,
            Action::Duplicate { .. } => ActionType::Duplicate,
            Action::Config { .. } => ActionType::Config,
            Action::Save { .. } => ActionType::Save,
        }
    }

    /// Human-readable summary for the activity feed.
    pub fn describe(&self) -> String {
        match self {
            Action::Add { slot, field } => {
                format!("Added \"{}\" to {}", field.display_name(), slot.section.title())
            }
            Action::Delete { slot, field } => {
                format!("Deleted \"{}\" from {}", field.display_name(), slot.section.title())
            }
            Action::Move { name, from, to, .. } if from.section == to.section => {
                format!("Moved \"{}\" within {}", name, from.section.title())
            }
            Action::Move { name, from, to, .. } => format!(
                "Moved \"{}\" from {} to {}",
                name,
                from.section.title(),
                to.section.title()
            ),
            Action::Style {
                name,
                before,
                after,
                ..
            } => {
                let resized = before.width != after.width;
                let restyled = before.style != after.style;
                match (resized, restyled) {
                    (true, false) => {
                        format!("Resized \"{}\" to {}", name, format_width(after.width))
                    }
                    (true, true) => format!(
                        "Styled \"{}\" at {} width",
                        name,
                        format_width(after.width)
                    ),
                    _ => format!("Styled \"{name}\""),
                }
            }
            Action::Duplicate { slot, field, .. } => format!(
                "Duplicated \"{}\" in {}",
                field.display_name(),
                slot.section.title()
            ),
            Action::Config { before, after, .. }
                if !after.label.is_empty() && before.label != after.label =>
            {
                format!("Renamed \"{}\" to \"{}\"", before.label, after.label)
            }
            Action::Config { field, after, .. } => {
                format!("Configured \"{}\"", after.display_name(field))
            }
            Action::Save { template } => format!("Saved template \"{template}\""),
        }
    }
}

fn format_width(width: f64) -> String {
    format!("{:.0}%", width * 100.0)
}

/// An executed action with its identity, time and message. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    id: u64,
    action: Action,
    timestamp: DateTime<Utc>,
    message: String,
}

impl Command {
    pub fn new(id: u64, action: Action) -> Self {
        let message = action.describe();
        Self {
            id,
            action,
            timestamp: Utc::now(),
            message,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn action_type(&self) -> ActionType {
        self.action.action_type()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// ─── Mutation helpers ───────────────────────────────────────────────

fn locate(template: &Template, id: &FieldId) -> Result<(SectionKind, usize), BuilderError> {
    template
        .locate(id)
        .ok_or_else(|| TargetError::MissingField(id.clone()).into())
}

/// Length of `to` once the moving field has left `from`.
fn destination_len(template: &Template, from: SectionKind, to: SectionKind) -> usize {
    let len = template.section(to).len();
    if from == to {
        len.saturating_sub(1)
    } else {
        len
    }
}

fn insert_at(template: &mut Template, slot: Slot, field: &PlacedField) -> Result<(), BuilderError> {
    if let Some((section, _)) = template.locate(&field.id) {
        return Err(TargetError::DuplicateField {
            field: field.id.clone(),
            section,
        }
        .into());
    }
    let section = template.section_mut(slot.section);
    if slot.index > section.len() {
        return Err(TargetError::PositionOutOfBounds {
            section: slot.section,
            index: slot.index,
            len: section.len(),
        }
        .into());
    }
    section.insert(slot.index, field.clone());
    Ok(())
}

fn take_at(template: &mut Template, slot: Slot, id: &FieldId) -> Result<PlacedField, BuilderError> {
    let section = template.section_mut(slot.section);
    match section.get(slot.index) {
        Some(found) if &found.id == id => Ok(section.remove(slot.index)),
        _ => Err(TargetError::MissingField(id.clone()).into()),
    }
}

fn relocate(template: &mut Template, id: &FieldId, from: Slot, to: Slot) -> Result<(), BuilderError> {
    let holds_field = template
        .section(from.section)
        .get(from.index)
        .is_some_and(|f| &f.id == id);
    if !holds_field {
        return Err(TargetError::MissingField(id.clone()).into());
    }
    let len = destination_len(template, from.section, to.section);
    if to.index > len {
        return Err(TargetError::PositionOutOfBounds {
            section: to.section,
            index: to.index,
            len,
        }
        .into());
    }
    let field = template.section_mut(from.section).remove(from.index);
    template.section_mut(to.section).insert(to.index, field);
    Ok(())
}

fn field_mut<'a>(template: &'a mut Template, id: &FieldId) -> Result<&'a mut PlacedField, BuilderError> {
    let (section, index) = locate(template, id)?;
    template
        .section_mut(section)
        .get_mut(index)
        .ok_or_else(|| TargetError::MissingField(id.clone()).into())
}
