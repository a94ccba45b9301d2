//! Stateless value-extraction helpers shared by the frame engine.

use polars::prelude::{AnyValue, DataType};

////////////////////////////////////////////////////////////////////////////////
// #region ValueExtraction

/// Extract a scalar `f64` from a dataframe cell value.
///
/// Strings are parsed opportunistically; nulls, dates and unparseable text
/// yield `None`.
pub fn derive_f64_from_any_value(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::UInt8(val) => Some(val as f64),
        AnyValue::UInt16(val) => Some(val as f64),
        AnyValue::UInt32(val) => Some(val as f64),
        AnyValue::UInt64(val) => Some(val as f64),
        AnyValue::Int8(val) => Some(val as f64),
        AnyValue::Int16(val) => Some(val as f64),
        AnyValue::Int32(val) => Some(val as f64),
        AnyValue::Int64(val) => Some(val as f64),
        AnyValue::Float32(val) => Some(val as f64),
        AnyValue::Float64(val) => Some(val),
        AnyValue::String(val) => val.parse::<f64>().ok(),
        AnyValue::StringOwned(val) => val.parse::<f64>().ok(),
        _ => None,
    }
}

/// Whether a column dtype participates in summation.
///
/// Text and date columns are excluded from totals by contract.
pub fn if_dtype_summable(dtype: &DataType) -> bool {
    dtype.is_numeric() && !matches!(dtype, DataType::Date)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_f64_from_any_value_covers_numeric_and_text() {
        assert_eq!(derive_f64_from_any_value(AnyValue::Int64(4)), Some(4.0));
        assert_eq!(derive_f64_from_any_value(AnyValue::Float64(4.5)), Some(4.5));
        assert_eq!(
            derive_f64_from_any_value(AnyValue::String("2.25")),
            Some(2.25)
        );
        assert_eq!(derive_f64_from_any_value(AnyValue::String("n/a")), None);
        assert_eq!(derive_f64_from_any_value(AnyValue::Null), None);
        assert_eq!(derive_f64_from_any_value(AnyValue::Date(19_000)), None);
    }

    #[test]
    fn test_if_dtype_summable_excludes_text_and_dates() {
        assert!(if_dtype_summable(&DataType::Int64));
        assert!(if_dtype_summable(&DataType::Float64));
        assert!(!if_dtype_summable(&DataType::String));
        assert!(!if_dtype_summable(&DataType::Date));
    }
}
