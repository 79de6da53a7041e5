//! Enumerated combinators over not-yet-sampled values.
//!
//! Each function records a deferred computation and returns it wrapped in a
//! one-outcome [`Choice`](crate::Choice), so the result merges and nests like any
//! other distribution. Arguments may be plain values or distributions.

pub mod arithmetic;
pub mod comparison;
pub mod logical;
pub mod text;

pub use arithmetic::{BinaryOperation, UnaryOperation, abs, add, div, mul, negate, rem, sub};
pub use comparison::{
    Comparison, ComparisonOperation, equals, greater_equal, greater_than, less_equal, less_than,
    not_equals,
};
pub use logical::{LogicalOps, and, not, or};
pub use text::{article, contains, index, join, join_with, title_case};

use crate::error::{ChoiceError, Result};
use crate::value::{Scalar, Value};

/// A resolved numeric argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn from_value(combinator: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Scalar(Scalar::Int(i)) => Ok(Number::Int(*i)),
            Value::Scalar(Scalar::Float(f)) => Ok(Number::Float(*f)),
            other => Err(ChoiceError::combinator(
                combinator,
                format!("expected a number, got {} {other}", other.type_name()),
            )),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(i) => Value::from(i),
            Number::Float(f) => Value::from(f),
        }
    }
}

pub(crate) fn expect_bool(combinator: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        ChoiceError::combinator(
            combinator,
            format!("expected a Bool, got {} {value}", value.type_name()),
        )
    })
}
