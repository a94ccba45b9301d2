//! `reportkit_io_xlsx` v1:
//! Table layout and formatting engine over an XLSX workbook codec.
//!
//! - `conf`      : constants, keyword vocabularies and default presets
//! - `spec`      : specs/models/options and error types
//! - `util`      : pure helper functions
//! - `cursor`    : per-sheet position tracker
//! - `formatter` : value-to-format resolution policies
//! - `writer`    : stateful layout engine and feature applicator

pub mod conf;
pub mod cursor;
pub mod formatter;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_COL_TABLE_ORIGIN, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_NROWS_TABLE_GAP, N_ROW_TABLE_ORIGIN, N_WIDTH_COLUMN_MIN, TUP_COLS_CURRENCY, TUP_COLS_RATE,
    TUP_EXCEL_ILLEGAL, derive_default_writer_options, derive_role_overlay,
};
pub use cursor::SheetCursor;
pub use formatter::{FormatResolver, match_column_vocabulary};
pub use spec::{
    ApplyFeatureError, EnumCellRole, EnumCellValue, EnumLocale, EnumTableFeature, SpecCellFormat,
    SpecColumnWidth, SpecTableMetadata, SpecWriterOptions, WriteTableError,
};
pub use util::{
    calculate_column_totals, create_range_identifier, derive_column_letters,
    derive_value_display_length, estimate_column_widths, sanitize_sheet_name,
};
pub use writer::{ReportWriter, derive_cell_value_from_any_value};
