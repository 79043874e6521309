//! Core domain types for the job-description dataset.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Required schema
// ---------------------------------------------------------------------------

/// Position name column header, as published in the source sheet.
pub const COL_POSITION: &str = "Должность";
/// Department name column header.
pub const COL_DEPARTMENT: &str = "Отдел";
/// Last-update date column header (day-first format, e.g. `01.03.2024`).
pub const COL_UPDATED_AT: &str = "Дата обновления";
/// Validity period column header (days, integer or decimal).
pub const COL_VALIDITY_DAYS: &str = "Срок актуальности (дней)";
/// PDF path column header.
pub const COL_PDF_PATH: &str = "Путь к PDF";

/// The five columns a source table must contain, compared case-sensitively
/// after trimming surrounding whitespace. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_POSITION,
    COL_DEPARTMENT,
    COL_UPDATED_AT,
    COL_VALIDITY_DAYS,
    COL_PDF_PATH,
];

// ---------------------------------------------------------------------------
// JobDoc
// ---------------------------------------------------------------------------

/// One validated job-description record, derived from a single raw row
/// plus the evaluation instant (only `overdue` depends on the latter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDoc {
    /// Position name — passthrough, never empty-checked.
    pub position: String,
    /// Department name — passthrough, never empty-checked.
    pub department: String,
    /// Last-update date; `None` when the raw value does not parse.
    pub updated_at: Option<NaiveDate>,
    /// Validity period in days; `None` when the raw value does not parse.
    pub validity_days: Option<f64>,
    /// `updated_at` (midnight) plus `validity_days`; `None` if either
    /// input is `None`. Fractional days are honored.
    pub valid_until: Option<NaiveDateTime>,
    /// True iff `valid_until` is `Some` and strictly earlier than the
    /// evaluation instant. A `None` `valid_until` is never overdue.
    pub overdue: bool,
    /// True iff the trimmed PDF path is non-empty and not a textual
    /// "missing" placeholder.
    pub has_pdf: bool,
}

// ---------------------------------------------------------------------------
// Summary & Dataset
// ---------------------------------------------------------------------------

/// Aggregate counts over a built dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total number of records.
    pub total: usize,
    /// Records where `overdue` is true.
    pub expired: usize,
    /// Records where `has_pdf` is false.
    pub missing_pdf: usize,
}

/// The validated dataset handed to the presentation layer.
///
/// Records keep the insertion order of the source; the dataset is never
/// mutated after construction — filtering produces a new sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Validated records in source order.
    pub docs: Vec<JobDoc>,
    /// Aggregate counts.
    pub summary: Summary,
    /// Editing URL of the source sheet, shown as a hyperlink by the UI.
    pub source_url: String,
    /// When the dataset was evaluated (drives `overdue`).
    pub evaluated_at: NaiveDateTime,
}
