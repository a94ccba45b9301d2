//! `reportkit_frame` v1:
//! Report-oriented extensions over a columnar dataframe.
//!
//! - `spec`  : field expression models and error types
//! - `frame` : calculated columns and totals engine
//! - `util`  : shared value-extraction helpers

pub mod frame;
pub mod spec;
pub mod util;

pub use frame::ReportFrame;
pub use spec::{EnumFieldOperator, FrameError, SpecFieldExpression, SpecFieldTerm};
pub use util::derive_f64_from_any_value;
