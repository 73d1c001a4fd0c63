//! # Row Layout
//!
//! Maps a section's flat, ordered field list onto rows whose widths sum to at
//! most one. Rows are never stored in the template: they are a pure function
//! of field order and widths, recomputed after every mutation that touches a
//! section. The same packing decides where a dropped field lands (see
//! [`crate::placement`]).
//!
//! ```text
//! body: [A 0.5] [B 0.5] [C 0.5] [D 1.0]
//!
//! row 0 │ A ─────── │ B ─────── │
//! row 1 │ C ─────── │
//! row 2 │ D ─────────────────── │
//! ```

pub mod rows;

pub use rows::{effective_width, is_valid_width, partition_rows, RowSpan, FULL_WIDTH, WIDTH_EPSILON};

use serde::Serialize;

use crate::model::{FieldId, PlacedField, SectionKind, Template};

/// One placed field inside a packed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub field_id: FieldId,
    /// Flat index of the field within its section.
    pub index: usize,
    /// Width used for packing (after clamping).
    pub width: f64,
    /// The stored width was out of range and packing substituted a full row.
    #[serde(skip_serializing_if = "is_false")]
    pub clamped: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A derived row of fields. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn used_width(&self) -> f64 {
        self.cells.iter().map(|c| c.width).sum()
    }

    pub fn remaining_width(&self) -> f64 {
        (FULL_WIDTH - self.used_width()).max(0.0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of the first field in this row.
    pub fn first_index(&self) -> Option<usize> {
        self.cells.first().map(|c| c.index)
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.cells.iter().any(|c| &c.field_id == id)
    }
}

/// Pack a section's ordered fields into rows.
///
/// O(n) in the number of fields. Every field lands in exactly one row.
pub fn pack(fields: &[PlacedField]) -> Vec<Row> {
    let widths: Vec<f64> = fields.iter().map(|f| f.width).collect();
    partition_rows(&widths)
        .into_iter()
        .map(|span| Row {
            cells: (span.start..span.end)
                .map(|i| {
                    let (width, clamped) = effective_width(fields[i].width);
                    Cell {
                        field_id: fields[i].id.clone(),
                        index: i,
                        width,
                        clamped,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Index of the row holding a flat field index.
pub fn row_of(rows: &[Row], index: usize) -> Option<usize> {
    rows.iter()
        .position(|row| row.cells.iter().any(|c| c.index == index))
}

/// Packed rows for all four regions of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplateLayout {
    header: Vec<Row>,
    body: Vec<Row>,
    signature_area: Vec<Row>,
    footer: Vec<Row>,
}

impl TemplateLayout {
    /// Pack every region of a template.
    pub fn of(template: &Template) -> Self {
        let mut layout = Self::default();
        for kind in SectionKind::ALL {
            layout.repack(template, kind);
        }
        layout
    }

    pub fn rows(&self, kind: SectionKind) -> &[Row] {
        match kind {
            SectionKind::Header => &self.header,
            SectionKind::Body => &self.body,
            SectionKind::SignatureArea => &self.signature_area,
            SectionKind::Footer => &self.footer,
        }
    }

    /// Recompute one region after its field list changed.
    pub fn repack(&mut self, template: &Template, kind: SectionKind) {
        let rows = pack(template.section(kind).fields());
        match kind {
            SectionKind::Header => self.header = rows,
            SectionKind::Body => self.body = rows,
            SectionKind::SignatureArea => self.signature_area = rows,
            SectionKind::Footer => self.footer = rows,
        }
    }

    /// Fields whose stored width could not be honoured.
    pub fn clamped_fields(&self) -> Vec<(SectionKind, FieldId)> {
        SectionKind::ALL
            .into_iter()
            .flat_map(|kind| {
                self.rows(kind)
                    .iter()
                    .flat_map(|row| row.cells.iter())
                    .filter(|cell| cell.clamped)
                    .map(move |cell| (kind, cell.field_id.clone()))
            })
            .collect()
    }
}
