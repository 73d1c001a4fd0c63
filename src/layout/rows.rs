//! # Row Partitioning
//!
//! The index-level greedy packer. The row builder in the parent module turns
//! these spans into [`super::Row`]s.

/// Row budget. Widths are fractions of it.
pub const FULL_WIDTH: f64 = 1.0;

/// Slack allowed when summing fractional widths (three thirds must fit).
pub const WIDTH_EPSILON: f64 = 1e-6;

/// A run of consecutive fields sharing one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    /// Index of the first field in this row.
    pub start: usize,
    /// One past the last field (exclusive end).
    pub end: usize,
}

impl RowSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

/// The width a field occupies during packing, and whether it had to be clamped.
///
/// Widths above the row budget, and non-finite or non-positive widths from
/// malformed imports, are treated as a full-width field.
pub fn effective_width(width: f64) -> (f64, bool) {
    if !width.is_finite() || width <= 0.0 || width > FULL_WIDTH + WIDTH_EPSILON {
        (FULL_WIDTH, true)
    } else {
        (width.min(FULL_WIDTH), false)
    }
}

/// Whether a width is acceptable for a new placement or a resize.
pub fn is_valid_width(width: f64) -> bool {
    width.is_finite() && width > 0.0 && width <= FULL_WIDTH + WIDTH_EPSILON
}

/// Partition widths into rows whose sums stay within the budget.
///
/// Greedy: a field joins the current row while the running sum stays within
/// `FULL_WIDTH + WIDTH_EPSILON`, otherwise it opens a new row. A clamped field
/// always gets a row of its own. Every index lands in exactly one span and no
/// span is empty.
pub fn partition_rows(widths: &[f64]) -> Vec<RowSpan> {
    let mut rows = Vec::new();
    let mut row_start = 0;
    let mut row_width = 0.0;

    for (i, &raw) in widths.iter().enumerate() {
        let (w, clamped) = effective_width(raw);
        if clamped {
            if i > row_start {
                rows.push(RowSpan {
                    start: row_start,
                    end: i,
                });
            }
            rows.push(RowSpan { start: i, end: i + 1 });
            row_start = i + 1;
            row_width = 0.0;
            continue;
        }
        if i > row_start && row_width + w > FULL_WIDTH + WIDTH_EPSILON {
            rows.push(RowSpan {
                start: row_start,
                end: i,
            });
            row_start = i;
            row_width = w;
        } else {
            row_width += w;
        }
    }

    if row_start < widths.len() {
        rows.push(RowSpan {
            start: row_start,
            end: widths.len(),
        });
    }

    rows
}
