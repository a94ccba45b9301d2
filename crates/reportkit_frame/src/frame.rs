//! Calculated columns and totals over a columnar dataframe.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use crate::spec::{FrameError, SpecFieldExpression};
use crate::util::{derive_f64_from_any_value, if_dtype_summable};

/// Dataframe wrapper that tracks calculated fields and a totals row.
///
/// Calculated fields keep their parsed expression so a later totals pass
/// can recompute the derived value from already-summed base columns rather
/// than summing the per-row ratios.
///
/// The totals row lives out of band: dataframe columns are typed, so a
/// mixed numeric/sentinel footer cannot be appended as a data row. Writers
/// consume [`Self::totals_row`] when rendering the footer, which also
/// guarantees an existing totals row is never summed a second time.
#[derive(Debug, Clone)]
pub struct ReportFrame {
    df: DataFrame,
    l_columns_base: Vec<String>,
    dict_calculated: BTreeMap<String, SpecFieldExpression>,
    dict_totals: Option<BTreeMap<String, Option<f64>>>,
}

impl ReportFrame {
    /// Wrap a dataframe; its current columns become the base column set.
    pub fn new(df: DataFrame) -> Self {
        let l_columns_base = df
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        Self {
            df,
            l_columns_base,
            dict_calculated: BTreeMap::new(),
            dict_totals: None,
        }
    }

    /// Borrow the underlying dataframe.
    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    /// Column names present at construction time.
    pub fn base_columns(&self) -> &[String] {
        &self.l_columns_base
    }

    /// Calculated fields keyed by column name.
    pub fn calculated(&self) -> &BTreeMap<String, SpecFieldExpression> {
        &self.dict_calculated
    }

    /// Stored totals row, if [`Self::totals`] has run.
    pub fn totals_row(&self) -> Option<&BTreeMap<String, Option<f64>>> {
        self.dict_totals.as_ref()
    }

    /// Add a calculated column evaluated row by row.
    ///
    /// The expression folds left-to-right over its term list with no
    /// operator precedence. Rows where any operand is missing or
    /// non-numeric yield a null cell. The expression is retained for
    /// totals recomputation, and any stored totals row is invalidated.
    pub fn calculate(
        &mut self,
        name: &str,
        expression: SpecFieldExpression,
    ) -> Result<(), FrameError> {
        let l_operand_columns = self.select_columns(&expression)?;

        let n_height = self.df.height();
        let mut l_values: Vec<Option<f64>> = Vec::with_capacity(n_height);
        for n_idx_row in 0..n_height {
            l_values.push(derive_row_value(&l_operand_columns, &expression, n_idx_row)?);
        }

        let series = Series::new(name.into(), l_values);
        self.df
            .with_column(series)
            .map_err(|err| FrameError::ColumnRead {
                column: name.to_string(),
                message: err.to_string(),
            })?;

        self.dict_calculated.insert(name.to_string(), expression);
        self.dict_totals = None;
        Ok(())
    }

    /// Compute and store the per-column totals row.
    ///
    /// Base numeric columns are summed over their non-null cells; a column
    /// with no numeric cells (text, date, all-null) stores `None`.
    /// Calculated columns are recomputed by folding their expression over
    /// the base column sums instead of summing per-row results.
    pub fn totals(&mut self) -> Result<&BTreeMap<String, Option<f64>>, FrameError> {
        let mut dict_sums: BTreeMap<String, Option<f64>> = BTreeMap::new();
        for column in self.df.get_columns() {
            let name = column.name().to_string();
            dict_sums.insert(name, derive_column_sum(column)?);
        }

        for (name, expression) in &self.dict_calculated {
            let recomputed = derive_recomputed_total(&dict_sums, expression);
            dict_sums.insert(name.clone(), recomputed);
        }

        Ok(self.dict_totals.insert(dict_sums))
    }

    fn select_columns<'a>(
        &'a self,
        expression: &SpecFieldExpression,
    ) -> Result<Vec<&'a Column>, FrameError> {
        expression
            .referenced_columns()
            .into_iter()
            .map(|name| {
                self.df
                    .column(name)
                    .map_err(|_| FrameError::ColumnNotFound(name.to_string()))
            })
            .collect()
    }
}

impl From<DataFrame> for ReportFrame {
    fn from(df: DataFrame) -> Self {
        Self::new(df)
    }
}

/// Fold one row of operand columns through the expression.
fn derive_row_value(
    operand_columns: &[&Column],
    expression: &SpecFieldExpression,
    n_idx_row: usize,
) -> Result<Option<f64>, FrameError> {
    let mut l_operands = Vec::with_capacity(operand_columns.len());
    for column in operand_columns {
        let value = column.get(n_idx_row).map_err(|err| FrameError::ColumnRead {
            column: column.name().to_string(),
            message: err.to_string(),
        })?;
        l_operands.push(derive_f64_from_any_value(value));
    }

    let Some(mut n_result) = l_operands[0] else {
        return Ok(None);
    };
    for (term, operand) in expression.terms.iter().zip(&l_operands[1..]) {
        let Some(n_operand) = operand else {
            return Ok(None);
        };
        n_result = term.operator.apply(n_result, *n_operand);
    }

    Ok(Some(n_result))
}

/// Sum one column's numeric cells; `None` when nothing is summable.
fn derive_column_sum(column: &Column) -> Result<Option<f64>, FrameError> {
    if !if_dtype_summable(column.dtype()) {
        return Ok(None);
    }

    let mut sum: Option<f64> = None;
    for n_idx_row in 0..column.len() {
        let value = column.get(n_idx_row).map_err(|err| FrameError::ColumnRead {
            column: column.name().to_string(),
            message: err.to_string(),
        })?;
        if let Some(n_value) = derive_f64_from_any_value(value) {
            sum = Some(sum.unwrap_or(0.0) + n_value);
        }
    }

    Ok(sum)
}

/// Recompute a calculated column's total from base column sums.
fn derive_recomputed_total(
    dict_sums: &BTreeMap<String, Option<f64>>,
    expression: &SpecFieldExpression,
) -> Option<f64> {
    let mut n_result = dict_sums.get(&expression.base).copied().flatten()?;
    for term in &expression.terms {
        let n_operand = dict_sums.get(&term.column).copied().flatten()?;
        n_result = term.operator.apply(n_result, n_operand);
    }
    Some(n_result)
}
