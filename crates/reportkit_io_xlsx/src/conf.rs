//! Layout constants, keyword vocabularies and default preset factories.

use crate::spec::{EnumCellRole, SpecCellFormat, SpecWriterOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// First table row on a fresh sheet (1-indexed; rows above are reserved
/// for document-level titling).
pub const N_ROW_TABLE_ORIGIN: usize = 6;
/// First table column on a fresh sheet (1-indexed; column A is reserved).
pub const N_COL_TABLE_ORIGIN: usize = 2;
/// Blank rows left between stacked tables on one sheet.
pub const N_NROWS_TABLE_GAP: usize = 3;
/// Column width floor; currency-formatted cells render narrower than
/// their raw digit count suggests.
pub const N_WIDTH_COLUMN_MIN: usize = 12;
/// Day offset between the Unix epoch and the Excel 1900 serial epoch.
pub const N_DAYS_UNIX_TO_EXCEL_EPOCH: i32 = 25_569;

/// Column-name keywords classifying a float column as currency.
pub const TUP_COLS_CURRENCY: [&str; 6] = ["revenue", "spend", "cost", "value", "money", "$"];
/// Column-name keywords classifying a float column as a rate/percentage.
pub const TUP_COLS_RATE: [&str; 6] = ["rate", "ratio", "yield", "%", "tr", "vr"];

/// Thousands-separated integer pattern.
pub const C_FMT_INTEGER: &str = "#,##0";
/// Generic two-decimal numeric pattern.
pub const C_FMT_DECIMAL: &str = "#,##0.00";
/// Two-decimal percentage pattern.
pub const C_FMT_PERCENT: &str = "#0.00%";
/// ISO-like date display pattern.
pub const C_FMT_DATE: &str = "yyyy-mm-dd";

/// Build the visual overlay for one cell role.
///
/// Overlays carry presentation attributes only (`num_format` stays
/// `None`), so merging one over a value format never alters the number
/// pattern and reapplying the same overlay is idempotent.
pub fn derive_role_overlay(role: EnumCellRole) -> SpecCellFormat {
    match role {
        EnumCellRole::Head => SpecCellFormat {
            bold: Some(true),
            font_size: Some(13),
            bottom: Some(1),
            ..Default::default()
        },
        EnumCellRole::Body => SpecCellFormat {
            font_size: Some(11),
            ..Default::default()
        },
        EnumCellRole::Foot => SpecCellFormat {
            bold: Some(true),
            font_size: Some(13),
            top: Some(1),
            ..Default::default()
        },
    }
}

/// Build default writer options.
pub fn derive_default_writer_options() -> SpecWriterOptions {
    SpecWriterOptions::default()
}
