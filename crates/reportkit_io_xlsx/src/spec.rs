//! Shared layout/formatting models and top-level error types.

use std::fmt;

use rust_xlsxwriter::XlsxError;

use crate::conf::C_FMT_DATE;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification handed to the workbook codec.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Border style for all sides.
    pub border: Option<i64>,
    /// Top border override.
    pub top: Option<i64>,
    /// Bottom border override.
    pub bottom: Option<i64>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            border: other.border.or(self.border),
            top: other.top.or(self.top),
            bottom: other.bottom.or(self.bottom),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueDomain

/// Typed cell value, classified once and dispatched by `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Calendar date as days since 1970-01-01.
    Date(i32),
}

/// Visual role of a cell within a table block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCellRole {
    /// Header row cell.
    Head,
    /// Data row cell.
    Body,
    /// Summary row cell.
    Foot,
}

/// Client locale driving currency symbol placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumLocale {
    /// United States dollar.
    #[default]
    Us,
    /// Euro zone.
    Eu,
    /// British pound.
    Gbp,
    /// Japanese yen.
    Jpn,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriterOptions

/// Writer-wide options fixed at session open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWriterOptions {
    /// Currency locale for float columns classified as currency.
    pub locale: EnumLocale,
    /// Default date display pattern.
    pub date_format_default: String,
    /// Emit per-table status lines at info level instead of debug.
    pub if_verbose: bool,
}

impl Default for SpecWriterOptions {
    fn default() -> Self {
        Self {
            locale: EnumLocale::Us,
            date_format_default: C_FMT_DATE.to_string(),
            if_verbose: false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TableSpecification

/// Rendered-length bounds for one column, used for cosmetic sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecColumnWidth {
    /// Floored minimum rendered length.
    pub min: usize,
    /// Maximum rendered length.
    pub max: usize,
}

/// Immutable placement record for one written table block.
///
/// Counts are physical: header row + data rows + appended summary row.
/// Positions are 1-indexed; stop bounds are exclusive
/// (`row_stop = row_start + n_rows`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTableMetadata {
    /// Sequential table name within the sheet (`"table 1"`, ...).
    pub table_name: String,
    /// Sheet the table was written to (sanitized name).
    pub sheet_name: String,
    /// Header column names, left to right.
    pub headers: Vec<String>,
    /// First table row (the header row).
    pub row_start: usize,
    /// First table column.
    pub col_start: usize,
    /// One past the summary row.
    pub row_stop: usize,
    /// One past the right-most column.
    pub col_stop: usize,
    /// Physical row count including header and summary rows.
    pub n_rows: usize,
    /// Column count.
    pub n_cols: usize,
}

impl SpecTableMetadata {
    /// First data row (one below the header).
    pub fn data_row_first(&self) -> usize {
        self.row_start + 1
    }

    /// Last data row (one above the summary row).
    pub fn data_row_last(&self) -> usize {
        self.row_stop - 2
    }

    /// Data row count (header and summary rows excluded).
    pub fn n_rows_data(&self) -> usize {
        self.n_rows - 2
    }
}

/// Visual feature applied to a previously written table.
///
/// Closed variant set validated at the call boundary; each variant names
/// the target column by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumTableFeature {
    /// Three-color gradient scale over the column's data rows.
    ThreeColorScale {
        /// Target column header name.
        column: String,
    },
    /// Data bar over the column's data rows.
    DataBar {
        /// Target column header name.
        column: String,
        /// Bar fill color (HTML-style string); required.
        color: Option<String>,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// "Table write failed" errors.
#[derive(Debug)]
pub enum WriteTableError {
    /// Source grid has no header row or no columns.
    EmptySource,
    /// A record's length differs from the header row's length.
    ShapeMismatch {
        /// Offending record index (0 = header).
        row_idx: usize,
        /// Offending record length.
        len_row: usize,
        /// Header row length.
        len_header: usize,
    },
    /// Reading the source container failed.
    SourceRead {
        /// Underlying error text.
        message: String,
    },
    /// A sheet is registered without a cursor (registry bookkeeping bug).
    CursorMissing {
        /// Sheet name missing its cursor.
        sheet: String,
    },
    /// Table placement would exceed the worksheet's row/column limits.
    SheetLimitExceeded {
        /// Target sheet name.
        sheet: String,
        /// Exclusive stop row of the rejected table.
        row_stop: usize,
        /// Exclusive stop column of the rejected table.
        col_stop: usize,
    },
    /// Writer session was already closed.
    Closed,
    /// Workbook codec failure; already-written cells are not rolled back.
    Codec(XlsxError),
}

impl fmt::Display for WriteTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => write!(f, "Source grid has no header row or no columns."),
            Self::ShapeMismatch {
                row_idx,
                len_row,
                len_header,
            } => write!(
                f,
                "Record {row_idx} has {len_row} fields, header has {len_header}."
            ),
            Self::SourceRead { message } => {
                write!(f, "Failed to read source container: {message}")
            }
            Self::CursorMissing { sheet } => {
                write!(f, "Sheet {sheet:?} is registered without a cursor.")
            }
            Self::SheetLimitExceeded {
                sheet,
                row_stop,
                col_stop,
            } => write!(
                f,
                "Table stopping at ({row_stop}, {col_stop}) exceeds sheet limits on {sheet:?}."
            ),
            Self::Closed => write!(f, "Cannot write after close()."),
            Self::Codec(err) => write!(f, "xlsx write error: {err}"),
        }
    }
}

impl std::error::Error for WriteTableError {}

/// "Feature application failed" errors.
#[derive(Debug)]
pub enum ApplyFeatureError {
    /// No table has been written to the named sheet.
    SheetNotFound(String),
    /// The named table is not cached for the sheet.
    TableNotFound {
        /// Sheet that was searched.
        sheet: String,
        /// Requested table name.
        table: String,
    },
    /// The requested column is not among the table's cached headers.
    ColumnNotFound {
        /// Table whose headers were searched.
        table: String,
        /// Requested column name.
        column: String,
    },
    /// A data bar was requested without its required fill color.
    MissingBarColor,
    /// Writer session was already closed.
    Closed,
    /// Workbook codec failure.
    Codec(XlsxError),
}

impl fmt::Display for ApplyFeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SheetNotFound(sheet) => write!(f, "No tables cached for sheet {sheet:?}."),
            Self::TableNotFound { sheet, table } => {
                write!(f, "Table {table:?} not found on sheet {sheet:?}.")
            }
            Self::ColumnNotFound { table, column } => {
                write!(f, "Column {column:?} not found in table {table:?} headers.")
            }
            Self::MissingBarColor => write!(f, "Data bar feature requires a fill color."),
            Self::Closed => write!(f, "Cannot apply features after close()."),
            Self::Codec(err) => write!(f, "xlsx write error: {err}"),
        }
    }
}

impl std::error::Error for ApplyFeatureError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::derive_role_overlay;

    #[test]
    fn test_merge_right_side_wins_without_clearing() {
        let base = SpecCellFormat {
            font_size: Some(11),
            num_format: Some("#,##0.00".to_string()),
            ..Default::default()
        };
        let merged = base.merge(&SpecCellFormat {
            font_size: Some(13),
            bold: Some(true),
            ..Default::default()
        });

        assert_eq!(merged.font_size, Some(13));
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.num_format, Some("#,##0.00".to_string()));
    }

    #[test]
    fn test_role_overlay_is_idempotent_and_keeps_num_format() {
        let base = SpecCellFormat {
            num_format: Some("$#,##0.00".to_string()),
            ..Default::default()
        };

        let once = base.with_(derive_role_overlay(EnumCellRole::Head));
        let twice = once.with_(derive_role_overlay(EnumCellRole::Head));

        assert_eq!(once, twice);
        assert_eq!(once.num_format, Some("$#,##0.00".to_string()));
        assert_eq!(once.bold, Some(true));
        assert_eq!(once.bottom, Some(1));
    }

    #[test]
    fn test_table_metadata_row_accessors() {
        let metadata = SpecTableMetadata {
            table_name: "table 1".to_string(),
            sheet_name: "ads".to_string(),
            headers: vec!["a".to_string(), "b".to_string()],
            row_start: 6,
            col_start: 2,
            row_stop: 11,
            col_stop: 4,
            n_rows: 5,
            n_cols: 2,
        };

        assert_eq!(metadata.data_row_first(), 7);
        assert_eq!(metadata.data_row_last(), 9);
        assert_eq!(metadata.n_rows_data(), 3);
    }
}
