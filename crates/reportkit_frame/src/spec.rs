//! Field expression models and top-level error types.

use std::fmt;

////////////////////////////////////////////////////////////////////////////////
// #region FieldExpression

/// Arithmetic operator usable inside a field expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFieldOperator {
    /// Left-hand plus right-hand.
    Add,
    /// Left-hand minus right-hand.
    Subtract,
    /// Left-hand times right-hand.
    Multiply,
    /// Left-hand divided by right-hand (IEEE semantics, no zero guard).
    Divide,
}

impl EnumFieldOperator {
    /// Apply the operator to two scalars.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }

    /// Resolve a single-character operator token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            _ => None,
        }
    }
}

/// One `(operator, column)` step of a field expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFieldTerm {
    /// Operator applied against the running value.
    pub operator: EnumFieldOperator,
    /// Right-hand column name.
    pub column: String,
}

/// Calculated-field expression over existing column names.
///
/// Evaluation is a strict left-to-right fold over `terms`: no operator
/// precedence exists, and the caller is responsible for ordering terms so
/// the fold matches the intended arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFieldExpression {
    /// Left-most column name the fold starts from.
    pub base: String,
    /// Ordered `(operator, column)` steps applied after `base`.
    pub terms: Vec<SpecFieldTerm>,
}

impl SpecFieldExpression {
    /// Parse a space-separated phrase such as `"clicks / impressions"`.
    ///
    /// Tokens alternate column names and single-character operators; the
    /// token sequence is kept verbatim, left-to-right.
    pub fn parse(phrase: &str) -> Result<Self, FrameError> {
        let l_tokens: Vec<&str> = phrase.split_whitespace().collect();
        if l_tokens.is_empty() || l_tokens.len() % 2 == 0 {
            return Err(FrameError::InvalidExpression {
                phrase: phrase.to_string(),
                reason: "expected alternating column and operator tokens".to_string(),
            });
        }

        let mut terms = Vec::with_capacity(l_tokens.len() / 2);
        for pair in l_tokens[1..].chunks(2) {
            let Some(operator) = EnumFieldOperator::from_token(pair[0]) else {
                return Err(FrameError::InvalidExpression {
                    phrase: phrase.to_string(),
                    reason: format!("unknown operator token {:?}", pair[0]),
                });
            };
            terms.push(SpecFieldTerm {
                operator,
                column: pair[1].to_string(),
            });
        }

        Ok(Self {
            base: l_tokens[0].to_string(),
            terms,
        })
    }

    /// All column names the expression reads, base first.
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut l_columns = vec![self.base.as_str()];
        l_columns.extend(self.terms.iter().map(|term| term.column.as_str()));
        l_columns
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// "Frame operation failed" errors.
#[derive(Debug)]
pub enum FrameError {
    /// A referenced column name does not exist in the frame.
    ColumnNotFound(String),
    /// A phrase could not be parsed into a field expression.
    InvalidExpression {
        /// Offending input phrase.
        phrase: String,
        /// Parser diagnosis.
        reason: String,
    },
    /// Reading or mutating a column failed in the dataframe layer.
    ColumnRead {
        /// Column being accessed.
        column: String,
        /// Underlying error text.
        message: String,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound(name) => write!(f, "Column not found: {name:?}"),
            Self::InvalidExpression { phrase, reason } => {
                write!(f, "Invalid field expression {phrase:?}: {reason}")
            }
            Self::ColumnRead { column, message } => {
                write!(f, "Failed to access column {column:?}: {message}")
            }
        }
    }
}

impl std::error::Error for FrameError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_token_order_without_precedence() {
        let expression = SpecFieldExpression::parse("spend / clicks * ratio").unwrap();
        assert_eq!(expression.base, "spend");
        assert_eq!(
            expression.terms,
            vec![
                SpecFieldTerm {
                    operator: EnumFieldOperator::Divide,
                    column: "clicks".to_string(),
                },
                SpecFieldTerm {
                    operator: EnumFieldOperator::Multiply,
                    column: "ratio".to_string(),
                },
            ]
        );
        assert_eq!(
            expression.referenced_columns(),
            vec!["spend", "clicks", "ratio"]
        );
    }

    #[test]
    fn test_parse_rejects_dangling_and_unknown_tokens() {
        assert!(matches!(
            SpecFieldExpression::parse(""),
            Err(FrameError::InvalidExpression { .. })
        ));
        assert!(matches!(
            SpecFieldExpression::parse("clicks /"),
            Err(FrameError::InvalidExpression { .. })
        ));
        assert!(matches!(
            SpecFieldExpression::parse("clicks % impressions"),
            Err(FrameError::InvalidExpression { .. })
        ));
    }
}
