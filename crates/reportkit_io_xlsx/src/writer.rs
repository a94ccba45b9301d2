//! Stateful table layout engine over the workbook codec.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use polars::prelude::AnyValue;
use reportkit_frame::ReportFrame;
use rust_xlsxwriter::{
    ConditionalFormat3ColorScale, ConditionalFormatDataBar, Format, FormatBorder, Workbook,
    Worksheet, XlsxError,
};

use crate::conf::{
    N_COL_TABLE_ORIGIN, N_DAYS_UNIX_TO_EXCEL_EPOCH, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_ROW_TABLE_ORIGIN, derive_role_overlay,
};
use crate::cursor::SheetCursor;
use crate::formatter::FormatResolver;
use crate::spec::{
    ApplyFeatureError, EnumCellRole, EnumCellValue, EnumTableFeature, SpecCellFormat,
    SpecTableMetadata, SpecWriterOptions, WriteTableError,
};
use crate::util::{
    calculate_column_totals, cast_col_num, cast_row_num, create_range_identifier,
    derive_column_letters, derive_header_text, estimate_column_widths, sanitize_sheet_name,
};

/// Head/body/foot codec formats resolved once per column.
struct SpecColumnFormatTrio {
    fmt_head: Format,
    fmt_body: Format,
    fmt_foot: Format,
}

/// Validated styling request derived from an [`EnumTableFeature`].
enum EnumResolvedStyle<'a> {
    ThreeColorScale,
    DataBar(&'a str),
}

/// Stateful writer session laying out tables across workbook sheets.
///
/// One writer drives one document end to end: `write_*` calls stack
/// tables per sheet, `apply` styles previously written tables, and one
/// final [`Self::close`] flushes the workbook to disk. The workbook is
/// buffered in memory until close; a failed cell write propagates with no
/// rollback of cells already written.
pub struct ReportWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    formatter: FormatResolver,
    options: SpecWriterOptions,
    dict_cursors: BTreeMap<String, SheetCursor>,
    dict_tables: BTreeMap<String, Vec<SpecTableMetadata>>,
    if_closed: bool,
}

impl ReportWriter {
    /// Create a writer bound to an output path and session options.
    pub fn new(path_file_out: PathBuf, options: SpecWriterOptions) -> Self {
        let formatter = FormatResolver::new(options.locale, options.date_format_default.clone());
        Self {
            path_file_out,
            workbook: Workbook::new(),
            formatter,
            options,
            dict_cursors: BTreeMap::new(),
            dict_tables: BTreeMap::new(),
            if_closed: false,
        }
    }

    /// Return the output file path as a string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Cached placement records for one sheet, in write order.
    pub fn tables(&self, sheet_name: &str) -> &[SpecTableMetadata] {
        let c_sheet = sanitize_sheet_name(sheet_name, "_");
        self.dict_tables.get(&c_sheet).map_or(&[], Vec::as_slice)
    }

    /// Write one table from a report frame.
    ///
    /// When the frame carries a stored totals row, those values feed the
    /// summary row directly instead of being re-summed from the grid.
    pub fn write_frame(
        &mut self,
        sheet_name: &str,
        frame: &ReportFrame,
    ) -> Result<SpecTableMetadata, WriteTableError> {
        let df = frame.df();
        if df.width() == 0 {
            return Err(WriteTableError::EmptySource);
        }

        let l_headers: Vec<String> = df
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();

        let mut grid = Vec::with_capacity(df.height() + 1);
        grid.push(
            l_headers
                .iter()
                .map(|name| EnumCellValue::Text(name.clone()))
                .collect::<Vec<_>>(),
        );
        let l_columns = df.get_columns();
        for n_idx_row in 0..df.height() {
            let mut record = Vec::with_capacity(l_headers.len());
            for column in l_columns {
                let value = column
                    .get(n_idx_row)
                    .map_err(|err| WriteTableError::SourceRead {
                        message: err.to_string(),
                    })?;
                record.push(derive_cell_value_from_any_value(value));
            }
            grid.push(record);
        }

        let dict_totals_override = frame.totals_row().map(|dict_totals| {
            let mut dict_by_idx = BTreeMap::new();
            for (n_idx_col, name) in l_headers.iter().enumerate() {
                if let Some(Some(n_total)) = dict_totals.get(name) {
                    dict_by_idx.insert(n_idx_col, *n_total);
                }
            }
            dict_by_idx
        });

        self.write_table(sheet_name, l_headers, grid, dict_totals_override)
    }

    /// Write one table from an in-memory record grid.
    ///
    /// Row 0 is the header; every record must match its length.
    pub fn write_rows(
        &mut self,
        sheet_name: &str,
        rows: Vec<Vec<EnumCellValue>>,
    ) -> Result<SpecTableMetadata, WriteTableError> {
        let Some(header_row) = rows.first() else {
            return Err(WriteTableError::EmptySource);
        };
        let n_len_header = header_row.len();
        if n_len_header == 0 {
            return Err(WriteTableError::EmptySource);
        }
        for (n_idx_row, record) in rows.iter().enumerate() {
            if record.len() != n_len_header {
                return Err(WriteTableError::ShapeMismatch {
                    row_idx: n_idx_row,
                    len_row: record.len(),
                    len_header: n_len_header,
                });
            }
        }

        let l_headers: Vec<String> = header_row.iter().map(derive_header_text).collect();
        self.write_table(sheet_name, l_headers, rows, None)
    }

    /// Apply a visual feature to a previously written table.
    ///
    /// The feature is validated before any codec call: an invalid column
    /// or a data bar without its color issues no styling call at all.
    pub fn apply(
        &mut self,
        sheet_name: &str,
        table_name: &str,
        feature: &EnumTableFeature,
    ) -> Result<(), ApplyFeatureError> {
        if self.if_closed {
            return Err(ApplyFeatureError::Closed);
        }

        let c_sheet = sanitize_sheet_name(sheet_name, "_");
        let Some(l_tables) = self.dict_tables.get(&c_sheet) else {
            return Err(ApplyFeatureError::SheetNotFound(c_sheet));
        };
        let Some(metadata) = l_tables
            .iter()
            .find(|entry| entry.table_name == table_name)
        else {
            return Err(ApplyFeatureError::TableNotFound {
                sheet: c_sheet,
                table: table_name.to_string(),
            });
        };

        let (c_column, style) = match feature {
            EnumTableFeature::ThreeColorScale { column } => {
                (column.as_str(), EnumResolvedStyle::ThreeColorScale)
            }
            EnumTableFeature::DataBar {
                column,
                color: Some(c_color),
            } => (column.as_str(), EnumResolvedStyle::DataBar(c_color.as_str())),
            EnumTableFeature::DataBar { color: None, .. } => {
                return Err(ApplyFeatureError::MissingBarColor);
            }
        };

        let Some(n_offset) = metadata
            .headers
            .iter()
            .position(|header| header == c_column)
        else {
            return Err(ApplyFeatureError::ColumnNotFound {
                table: metadata.table_name.clone(),
                column: c_column.to_string(),
            });
        };

        let n_col = metadata.col_start + n_offset;
        let n_row_first = metadata.data_row_first();
        let n_row_last = metadata.data_row_last();
        let c_range = create_range_identifier(n_col, n_row_first, n_row_last);

        let worksheet = self
            .workbook
            .worksheet_from_name(&c_sheet)
            .map_err(ApplyFeatureError::Codec)?;
        match style {
            EnumResolvedStyle::ThreeColorScale => {
                let cond_format = ConditionalFormat3ColorScale::new();
                worksheet
                    .add_conditional_format(
                        cast_row_num(n_row_first),
                        cast_col_num(n_col),
                        cast_row_num(n_row_last),
                        cast_col_num(n_col),
                        &cond_format,
                    )
                    .map_err(ApplyFeatureError::Codec)?;
            }
            EnumResolvedStyle::DataBar(c_color) => {
                let cond_format = ConditionalFormatDataBar::new().set_fill_color(c_color);
                worksheet
                    .add_conditional_format(
                        cast_row_num(n_row_first),
                        cast_col_num(n_col),
                        cast_row_num(n_row_last),
                        cast_col_num(n_col),
                        &cond_format,
                    )
                    .map_err(ApplyFeatureError::Codec)?;
            }
        }

        log::debug!("conditional format applied to {c_range} on sheet {c_sheet:?}");
        Ok(())
    }

    /// Flush the workbook to disk. Idempotent; codec errors propagate
    /// unchanged.
    pub fn close(&mut self) -> Result<(), XlsxError> {
        if self.if_closed {
            return Ok(());
        }
        log::info!("closing workbook {}", self.path_file_out.display());
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        Ok(())
    }

    fn write_table(
        &mut self,
        sheet_name: &str,
        headers: Vec<String>,
        grid: Vec<Vec<EnumCellValue>>,
        totals_override: Option<BTreeMap<usize, f64>>,
    ) -> Result<SpecTableMetadata, WriteTableError> {
        if self.if_closed {
            return Err(WriteTableError::Closed);
        }

        let c_sheet = sanitize_sheet_name(sheet_name, "_");
        match self.dict_cursors.get_mut(&c_sheet) {
            Some(cursor) => cursor.next_table(),
            None => {
                if self.dict_tables.contains_key(&c_sheet) {
                    return Err(WriteTableError::CursorMissing { sheet: c_sheet });
                }
                let worksheet = self.workbook.add_worksheet();
                worksheet
                    .set_name(&c_sheet)
                    .map_err(WriteTableError::Codec)?;
                self.dict_cursors.insert(
                    c_sheet.clone(),
                    SheetCursor::new(N_ROW_TABLE_ORIGIN, N_COL_TABLE_ORIGIN),
                );
                self.dict_tables.insert(c_sheet.clone(), Vec::new());
            }
        }

        let (n_row_start, n_col_start) = match self.dict_cursors.get(&c_sheet) {
            Some(cursor) => cursor.coordinates(),
            None => return Err(WriteTableError::CursorMissing { sheet: c_sheet }),
        };

        let n_cols = headers.len();
        let n_rows = grid.len() + 1; // header + data rows + appended summary row
        let n_row_stop = n_row_start + n_rows;
        let n_col_stop = n_col_start + n_cols;
        if n_row_stop - 1 > N_NROWS_EXCEL_MAX || n_col_stop - 1 > N_NCOLS_EXCEL_MAX {
            return Err(WriteTableError::SheetLimitExceeded {
                sheet: c_sheet,
                row_stop: n_row_stop,
                col_stop: n_col_stop,
            });
        }

        let dict_totals = totals_override.unwrap_or_else(|| calculate_column_totals(&grid));
        let l_widths = estimate_column_widths(&grid);

        let l_format_trios: Vec<SpecColumnFormatTrio> = (0..n_cols)
            .map(|n_idx_col| {
                let value_repr = grid
                    .get(1)
                    .map(|record| &record[n_idx_col])
                    .unwrap_or(&EnumCellValue::None);
                let fmt_base = self.formatter.resolve(
                    value_repr,
                    Some(&headers[n_idx_col]),
                    Some(l_widths[n_idx_col].max),
                );

                let fmt_head = self
                    .formatter
                    .resolve(&EnumCellValue::Text(headers[n_idx_col].clone()), None, None)
                    .with_(derive_role_overlay(EnumCellRole::Head));
                let fmt_body = fmt_base.with_(derive_role_overlay(EnumCellRole::Body));
                let fmt_foot = if dict_totals.contains_key(&n_idx_col) {
                    fmt_base.with_(derive_role_overlay(EnumCellRole::Foot))
                } else {
                    self.formatter
                        .resolve(&EnumCellValue::None, None, None)
                        .with_(derive_role_overlay(EnumCellRole::Foot))
                };

                SpecColumnFormatTrio {
                    fmt_head: derive_rust_xlsx_format(&fmt_head),
                    fmt_body: derive_rust_xlsx_format(&fmt_body),
                    fmt_foot: derive_rust_xlsx_format(&fmt_foot),
                }
            })
            .collect();

        let worksheet = self
            .workbook
            .worksheet_from_name(&c_sheet)
            .map_err(WriteTableError::Codec)?;
        let Some(cursor) = self.dict_cursors.get_mut(&c_sheet) else {
            return Err(WriteTableError::CursorMissing { sheet: c_sheet });
        };

        // Header row.
        for (n_idx_col, header) in headers.iter().enumerate() {
            worksheet
                .write_string_with_format(
                    cast_row_num(cursor.row()),
                    cast_col_num(cursor.col()),
                    header,
                    &l_format_trios[n_idx_col].fmt_head,
                )
                .map_err(WriteTableError::Codec)?;
            cursor.advance_column();
        }
        cursor.advance_row();
        cursor.set_column(n_col_start);

        // Data rows.
        for record in grid.iter().skip(1) {
            for (n_idx_col, value) in record.iter().enumerate() {
                write_cell_with_format(
                    worksheet,
                    cursor.row(),
                    cursor.col(),
                    value,
                    &l_format_trios[n_idx_col].fmt_body,
                )?;
                cursor.advance_column();
            }
            cursor.advance_row();
            cursor.set_column(n_col_start);
        }

        // Summary row and column widths.
        for (n_idx_col, trio) in l_format_trios.iter().enumerate() {
            let value = match dict_totals.get(&n_idx_col) {
                Some(n_total) => EnumCellValue::Float(*n_total),
                None => EnumCellValue::Text("-".to_string()),
            };
            write_cell_with_format(worksheet, cursor.row(), cursor.col(), &value, &trio.fmt_foot)?;

            let width = l_widths[n_idx_col];
            worksheet
                .set_column_width(
                    cast_col_num(cursor.col()),
                    (width.min + width.max) as f64 / 2.0,
                )
                .map_err(WriteTableError::Codec)?;
            cursor.advance_column();
        }
        cursor.advance_row();
        cursor.set_column(n_col_start);

        let l_tables = self.dict_tables.entry(c_sheet.clone()).or_default();
        let metadata = SpecTableMetadata {
            table_name: format!("table {}", l_tables.len() + 1),
            sheet_name: c_sheet.clone(),
            headers,
            row_start: n_row_start,
            col_start: n_col_start,
            row_stop: n_row_stop,
            col_stop: n_col_stop,
            n_rows,
            n_cols,
        };
        l_tables.push(metadata.clone());

        let c_status = format!(
            "{} written to sheet {:?} at {}{}",
            metadata.table_name,
            c_sheet,
            derive_column_letters(n_col_start),
            n_row_start
        );
        if self.options.if_verbose {
            log::info!("{c_status}");
        } else {
            log::debug!("{c_status}");
        }

        Ok(metadata)
    }
}

impl fmt::Display for ReportWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l_sheets: Vec<&str> = self.dict_tables.keys().map(String::as_str).collect();
        let n_tables: usize = self.dict_tables.values().map(Vec::len).sum();
        write!(
            f,
            "[REPORT] file={} sheets={:?} tables={}",
            self.path_file_out.display(),
            l_sheets,
            n_tables
        )
    }
}

/// Write one typed cell through the codec's primitives.
///
/// Dates are converted to Excel day serials; the date display pattern
/// lives in the cell format.
fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_1based: usize,
    col_1based: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), WriteTableError> {
    let n_row = cast_row_num(row_1based);
    let n_col = cast_col_num(col_1based);
    match value {
        EnumCellValue::None => worksheet.write_blank(n_row, n_col, format),
        EnumCellValue::Text(val) => worksheet.write_string_with_format(n_row, n_col, val, format),
        EnumCellValue::Integer(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val as f64, format)
        }
        EnumCellValue::Float(val) => worksheet.write_number_with_format(n_row, n_col, *val, format),
        EnumCellValue::Date(val) => worksheet.write_number_with_format(
            n_row,
            n_col,
            (*val + N_DAYS_UNIX_TO_EXCEL_EPOCH) as f64,
            format,
        ),
    }
    .map_err(WriteTableError::Codec)?;
    Ok(())
}

/// Classify one dataframe cell into the typed value domain.
pub fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::Text(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::Text(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::Text(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::UInt8(val) => EnumCellValue::Integer(val as i64),
        AnyValue::UInt16(val) => EnumCellValue::Integer(val as i64),
        AnyValue::UInt32(val) => EnumCellValue::Integer(val as i64),
        AnyValue::UInt64(val) => EnumCellValue::Integer(val as i64),
        AnyValue::Int8(val) => EnumCellValue::Integer(val as i64),
        AnyValue::Int16(val) => EnumCellValue::Integer(val as i64),
        AnyValue::Int32(val) => EnumCellValue::Integer(val as i64),
        AnyValue::Int64(val) => EnumCellValue::Integer(val),
        AnyValue::Float32(val) => EnumCellValue::Float(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Float(val),
        AnyValue::Date(val) => EnumCellValue::Date(val),
        _ => EnumCellValue::Text(value.to_string()),
    }
}

/// Convert a format specification into a registered codec format.
fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val));
    }
    if let Some(val) = spec.bottom {
        format = format.set_border_bottom(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        0 => FormatBorder::None,
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::{N_NROWS_TABLE_GAP, derive_default_writer_options};
    use reportkit_frame::SpecFieldExpression;

    fn temp_writer(tag: &str) -> ReportWriter {
        let path = std::env::temp_dir().join(format!(
            "reportkit_{tag}_{}.xlsx",
            std::process::id()
        ));
        ReportWriter::new(path, derive_default_writer_options())
    }

    fn sample_rows() -> Vec<Vec<EnumCellValue>> {
        vec![
            vec![
                EnumCellValue::Text("campaign".to_string()),
                EnumCellValue::Text("clicks".to_string()),
                EnumCellValue::Text("spend".to_string()),
            ],
            vec![
                EnumCellValue::Text("brand".to_string()),
                EnumCellValue::Integer(10),
                EnumCellValue::Float(1.25),
            ],
            vec![
                EnumCellValue::Text("search".to_string()),
                EnumCellValue::Integer(20),
                EnumCellValue::Float(2.5),
            ],
            vec![
                EnumCellValue::Text("social".to_string()),
                EnumCellValue::Integer(30),
                EnumCellValue::Float(3.75),
            ],
        ]
    }

    #[test]
    fn test_write_rows_records_physical_bounds() {
        let mut writer = temp_writer("bounds");
        let metadata = writer.write_rows("perf", sample_rows()).unwrap();

        assert_eq!(metadata.table_name, "table 1");
        assert_eq!(metadata.sheet_name, "perf");
        assert_eq!(metadata.row_start, N_ROW_TABLE_ORIGIN);
        assert_eq!(metadata.col_start, N_COL_TABLE_ORIGIN);
        // header + 3 data rows + summary row
        assert_eq!(metadata.n_rows, 5);
        assert_eq!(metadata.n_cols, 3);
        assert_eq!(metadata.row_stop, N_ROW_TABLE_ORIGIN + 5);
        assert_eq!(metadata.col_stop, N_COL_TABLE_ORIGIN + 3);
        assert_eq!(
            metadata.headers,
            vec!["campaign".to_string(), "clicks".to_string(), "spend".to_string()]
        );
        assert_eq!(writer.tables("perf"), std::slice::from_ref(&metadata));
    }

    #[test]
    fn test_stacked_tables_never_overlap() {
        let mut writer = temp_writer("stack");
        let first = writer.write_rows("perf", sample_rows()).unwrap();
        let second = writer.write_rows("perf", sample_rows()).unwrap();

        assert_eq!(second.table_name, "table 2");
        assert_eq!(second.row_start, first.row_stop + N_NROWS_TABLE_GAP);
        assert!(second.row_start >= first.row_start + first.n_rows + N_NROWS_TABLE_GAP);
        assert_eq!(writer.tables("perf").len(), 2);
    }

    #[test]
    fn test_shape_mismatch_aborts_before_any_write() {
        let mut writer = temp_writer("shape");
        let mut rows = sample_rows();
        rows[2].pop();

        let result = writer.write_rows("perf", rows);
        assert!(matches!(
            result,
            Err(WriteTableError::ShapeMismatch {
                row_idx: 2,
                len_row: 2,
                len_header: 3,
            })
        ));
        assert!(writer.tables("perf").is_empty());

        // The registry is untouched: the next write starts at the origin.
        let metadata = writer.write_rows("perf", sample_rows()).unwrap();
        assert_eq!(metadata.row_start, N_ROW_TABLE_ORIGIN);
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let mut writer = temp_writer("empty");
        assert!(matches!(
            writer.write_rows("perf", vec![]),
            Err(WriteTableError::EmptySource)
        ));
        assert!(matches!(
            writer.write_rows("perf", vec![vec![]]),
            Err(WriteTableError::EmptySource)
        ));
    }

    #[test]
    fn test_write_frame_with_calculated_totals() {
        let mut writer = temp_writer("frame");
        let mut frame = ReportFrame::new(
            polars::df!(
                "campaign" => &["brand", "search"],
                "clicks" => &[10i64, 20],
                "impressions" => &[1_000i64, 4_000],
            )
            .unwrap(),
        );
        frame
            .calculate("ctr", SpecFieldExpression::parse("clicks / impressions").unwrap())
            .unwrap();
        frame.totals().unwrap();

        let metadata = writer.write_frame("perf", &frame).unwrap();
        assert_eq!(metadata.n_cols, 4);
        // header + 2 data rows + summary row
        assert_eq!(metadata.n_rows, 4);
        assert_eq!(metadata.headers[3], "ctr");
    }

    #[test]
    fn test_apply_requires_data_bar_color() {
        let mut writer = temp_writer("barcolor");
        writer.write_rows("perf", sample_rows()).unwrap();

        let result = writer.apply(
            "perf",
            "table 1",
            &EnumTableFeature::DataBar {
                column: "clicks".to_string(),
                color: None,
            },
        );
        assert!(matches!(result, Err(ApplyFeatureError::MissingBarColor)));

        writer
            .apply(
                "perf",
                "table 1",
                &EnumTableFeature::DataBar {
                    column: "clicks".to_string(),
                    color: Some("#638EC6".to_string()),
                },
            )
            .unwrap();
    }

    #[test]
    fn test_apply_three_color_scale_resolves_cached_table() {
        let mut writer = temp_writer("scale");
        writer.write_rows("perf", sample_rows()).unwrap();

        writer
            .apply(
                "perf",
                "table 1",
                &EnumTableFeature::ThreeColorScale {
                    column: "spend".to_string(),
                },
            )
            .unwrap();
    }

    #[test]
    fn test_apply_lookup_failures() {
        let mut writer = temp_writer("lookup");
        writer.write_rows("perf", sample_rows()).unwrap();

        assert!(matches!(
            writer.apply(
                "nope",
                "table 1",
                &EnumTableFeature::ThreeColorScale {
                    column: "spend".to_string(),
                },
            ),
            Err(ApplyFeatureError::SheetNotFound(_))
        ));
        assert!(matches!(
            writer.apply(
                "perf",
                "table 9",
                &EnumTableFeature::ThreeColorScale {
                    column: "spend".to_string(),
                },
            ),
            Err(ApplyFeatureError::TableNotFound { .. })
        ));
        assert!(matches!(
            writer.apply(
                "perf",
                "table 1",
                &EnumTableFeature::ThreeColorScale {
                    column: "conversions".to_string(),
                },
            ),
            Err(ApplyFeatureError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_close_is_idempotent_and_blocks_writes() {
        let mut writer = temp_writer("close");
        writer.write_rows("perf", sample_rows()).unwrap();

        writer.close().unwrap();
        writer.close().unwrap();

        assert!(matches!(
            writer.write_rows("perf", sample_rows()),
            Err(WriteTableError::Closed)
        ));
        assert!(matches!(
            writer.apply(
                "perf",
                "table 1",
                &EnumTableFeature::ThreeColorScale {
                    column: "spend".to_string(),
                },
            ),
            Err(ApplyFeatureError::Closed)
        ));

        std::fs::remove_file(writer.file_out()).ok();
    }

    #[test]
    fn test_display_summarizes_session() {
        let mut writer = temp_writer("display");
        writer.write_rows("perf", sample_rows()).unwrap();
        writer.write_rows("billing", sample_rows()).unwrap();

        let rendered = writer.to_string();
        assert!(rendered.contains("sheets=[\"billing\", \"perf\"]"));
        assert!(rendered.contains("tables=2"));
    }
}
