//! Value-to-format resolution policies.

use crate::conf::{C_FMT_DECIMAL, C_FMT_INTEGER, C_FMT_PERCENT, TUP_COLS_CURRENCY, TUP_COLS_RATE};
use crate::spec::{EnumCellValue, EnumLocale, SpecCellFormat};

/// Resolves one cell value (plus optional column context) to its base
/// number/text format.
///
/// Role overlays (HEAD/BODY/FOOT) are applied by the caller on top of the
/// resolved base format.
#[derive(Debug, Clone)]
pub struct FormatResolver {
    locale: EnumLocale,
    fmt_date: String,
}

impl FormatResolver {
    /// Create a resolver for one locale and date display pattern.
    pub fn new(locale: EnumLocale, fmt_date: impl Into<String>) -> Self {
        Self {
            locale,
            fmt_date: fmt_date.into(),
        }
    }

    /// Currency pattern for the resolver's locale.
    pub fn localize_currency(&self) -> &'static str {
        match self.locale {
            EnumLocale::Us => "$#,##0.00",
            EnumLocale::Eu => "\u{20AC}#,##0.00",
            EnumLocale::Gbp => "\u{00A3}#,##0.00",
            EnumLocale::Jpn => "\u{00A5}#,##0.00",
        }
    }

    /// Resolve the base format for one cell value.
    ///
    /// Floats are classified by column name when one is available:
    /// currency keywords take the locale currency pattern, rate keywords
    /// the percentage pattern, anything else the generic two-decimal
    /// pattern. Without a column name a length heuristic over the
    /// rendered fractional digits decides (documented degraded mode for
    /// headerless grids); `len_frac_max` is the column's maximum rendered
    /// fraction length feeding that heuristic.
    pub fn resolve(
        &self,
        value: &EnumCellValue,
        column_name: Option<&str>,
        len_frac_max: Option<usize>,
    ) -> SpecCellFormat {
        match value {
            EnumCellValue::None | EnumCellValue::Text(_) => SpecCellFormat {
                font_size: Some(12),
                ..Default::default()
            },
            EnumCellValue::Integer(_) => SpecCellFormat {
                num_format: Some(C_FMT_INTEGER.to_string()),
                ..Default::default()
            },
            EnumCellValue::Date(_) => SpecCellFormat {
                num_format: Some(self.fmt_date.clone()),
                ..Default::default()
            },
            EnumCellValue::Float(val) => SpecCellFormat {
                num_format: Some(self.resolve_float_pattern(*val, column_name, len_frac_max)),
                ..Default::default()
            },
        }
    }

    fn resolve_float_pattern(
        &self,
        value: f64,
        column_name: Option<&str>,
        len_frac_max: Option<usize>,
    ) -> String {
        if let Some(name) = column_name {
            if match_column_vocabulary(name, &TUP_COLS_CURRENCY) {
                return self.localize_currency().to_string();
            }
            if match_column_vocabulary(name, &TUP_COLS_RATE) {
                return C_FMT_PERCENT.to_string();
            }
            return C_FMT_DECIMAL.to_string();
        }

        // Headerless fallback: classify by the rendered fraction digits.
        let c_rendered = value.to_string();
        let c_frac = match c_rendered.split_once('.') {
            Some((_, frac)) => frac,
            None => "0",
        };
        let if_frac_zero = c_frac.chars().all(|chr| chr == '0');

        if c_frac.len() < 3 && !if_frac_zero {
            return self.localize_currency().to_string();
        }
        if if_frac_zero && len_frac_max.unwrap_or(0) < 3 {
            // Whole-value currency columns drop the decimal places.
            return self.localize_currency().replace("#,##0.00", "#,##0");
        }
        C_FMT_DECIMAL.to_string()
    }
}

/// Case-insensitive substring match of a column name against a keyword
/// vocabulary.
pub fn match_column_vocabulary(column_name: &str, vocabulary: &[&str]) -> bool {
    let c_lowered = column_name.to_lowercase();
    vocabulary.iter().any(|keyword| c_lowered.contains(keyword))
}
