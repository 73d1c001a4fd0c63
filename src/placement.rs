//! Drop/placement: turn a drag gesture into an `add` operation.
//!
//! With a pointer, the drop coordinates are resolved against the section's
//! currently packed rows by a [`DropStrategy`]. On constrained viewports
//! precise targeting is unreliable, so the user picks one of the four regions
//! through a [`SectionPrompt`] and the field is appended to it. A cancelled
//! prompt produces nothing.

use serde::{Deserialize, Serialize};

use crate::catalog::FieldDefinition;
use crate::command::Operation;
use crate::layout::Row;
use crate::model::{PlacedField, SectionKind};

/// Viewports narrower than this use the section prompt.
pub const COMPACT_BREAKPOINT: f64 = 768.0;

/// How placements are targeted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewport {
    /// Precise drag and drop.
    #[default]
    Pointer,
    /// Small touch surfaces: choose a region, append to it.
    Constrained,
}

impl Viewport {
    pub fn for_width(width_px: f64) -> Self {
        if width_px < COMPACT_BREAKPOINT {
            Viewport::Constrained
        } else {
            Viewport::Pointer
        }
    }
}

/// A drop position in pixels, relative to the section's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropPoint {
    pub x: f64,
    pub y: f64,
}

impl DropPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Maps a drop point onto a flat insertion index.
pub trait DropStrategy {
    /// `rows` is the section's current packing; the result is in `0..=len`
    /// where `len` is the number of fields in the section.
    fn resolve(&self, rows: &[Row], point: DropPoint) -> usize;
}

/// Rows of uniform height spanning the section's width.
///
/// The row is picked by `y / row_height`; within the row the point is
/// compared with each cell's midpoint. Above the first row inserts at 0,
/// below the last row appends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGridStrategy {
    pub width: f64,
    pub row_height: f64,
}

impl RowGridStrategy {
    pub fn new(width: f64, row_height: f64) -> Self {
        Self { width, row_height }
    }
}

impl DropStrategy for RowGridStrategy {
    fn resolve(&self, rows: &[Row], point: DropPoint) -> usize {
        let len: usize = rows.iter().map(Row::len).sum();
        if rows.is_empty() || point.y < 0.0 {
            return 0;
        }
        if self.row_height <= 0.0 || self.width <= 0.0 {
            return len;
        }
        let row_index = (point.y / self.row_height).floor() as usize;
        let Some(row) = rows.get(row_index) else {
            return len;
        };

        let fraction = (point.x / self.width).clamp(0.0, 1.0);
        let mut offset = 0.0;
        for cell in &row.cells {
            if fraction < offset + cell.width / 2.0 {
                return cell.index;
            }
            offset += cell.width;
        }
        row.cells.last().map_or(len, |c| c.index + 1)
    }
}

/// Asks the user which region a field should go to.
pub trait SectionPrompt {
    /// `None` means the prompt was cancelled.
    fn choose_section(&mut self, definition: &FieldDefinition) -> Option<SectionKind>;
}

impl<F> SectionPrompt for F
where
    F: FnMut(&FieldDefinition) -> Option<SectionKind>,
{
    fn choose_section(&mut self, definition: &FieldDefinition) -> Option<SectionKind> {
        self(definition)
    }
}

/// Produces `add` operations from gestures.
#[derive(Debug, Clone)]
pub struct PlacementController<S = RowGridStrategy> {
    viewport: Viewport,
    strategy: S,
}

impl<S: DropStrategy> PlacementController<S> {
    pub fn new(viewport: Viewport, strategy: S) -> Self {
        Self { viewport, strategy }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Place a definition at an explicit slot (`None` appends).
    pub fn place_field(
        &self,
        definition: &FieldDefinition,
        section: SectionKind,
        index: Option<usize>,
    ) -> Operation {
        Operation::Add {
            section,
            index,
            field: PlacedField::from_definition(definition),
        }
    }

    /// Handle a drop on `section` at `point`. `rows` is that section's
    /// current packing. On a constrained viewport the point is ignored and
    /// the prompt decides.
    pub fn drop_at(
        &self,
        definition: &FieldDefinition,
        section: SectionKind,
        point: DropPoint,
        rows: &[Row],
        prompt: &mut dyn SectionPrompt,
    ) -> Option<Operation> {
        match self.viewport {
            Viewport::Pointer => {
                let index = self.strategy.resolve(rows, point);
                Some(self.place_field(definition, section, Some(index)))
            }
            Viewport::Constrained => self.choose_section(definition, prompt),
        }
    }

    /// Ask for a region and append there.
    pub fn choose_section(
        &self,
        definition: &FieldDefinition,
        prompt: &mut dyn SectionPrompt,
    ) -> Option<Operation> {
        let section = prompt.choose_section(definition)?;
        Some(self.place_field(definition, section, None))
    }
}
