use super::Number;
use crate::choice::Choice;
use crate::deferred::{Arguments, Combinator, delayed};
use crate::error::{ChoiceError, Result};
use crate::value::{Scalar, Value};
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Comparison operation types; each resolves to a `Bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperation {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

static COMPARISONS: LazyLock<[Combinator; 6]> =
    LazyLock::new(|| ComparisonOperation::ALL.map(ComparisonOperation::build));

impl ComparisonOperation {
    pub const ALL: [ComparisonOperation; 6] = [
        ComparisonOperation::Eq,
        ComparisonOperation::Ne,
        ComparisonOperation::Lt,
        ComparisonOperation::Le,
        ComparisonOperation::Gt,
        ComparisonOperation::Ge,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ComparisonOperation::Eq => "eq",
            ComparisonOperation::Ne => "ne",
            ComparisonOperation::Lt => "lt",
            ComparisonOperation::Le => "le",
            ComparisonOperation::Gt => "gt",
            ComparisonOperation::Ge => "ge",
        }
    }

    #[must_use]
    pub fn combinator(self) -> Combinator {
        COMPARISONS[self as usize].clone()
    }

    fn build(self) -> Combinator {
        delayed(self.name(), move |args: Arguments| {
            let [left, right] = args.exactly::<2>(self.name())?;
            self.apply(&left, &right).map(Value::from)
        })
    }

    /// Compares two resolved values.
    ///
    /// Numbers compare by value across `Int` and `Float`; text compares
    /// lexicographically. Equality is defined for every pair of values, ordering only
    /// for numbers and text.
    ///
    /// # Errors
    /// Returns [`ChoiceError::Combinator`] when ordering values that have no order.
    pub fn apply(self, left: &Value, right: &Value) -> Result<bool> {
        match self {
            ComparisonOperation::Eq => Ok(loosely_equal(left, right)),
            ComparisonOperation::Ne => Ok(!loosely_equal(left, right)),
            ComparisonOperation::Lt => Ok(self.order(left, right)? == Ordering::Less),
            ComparisonOperation::Le => Ok(self.order(left, right)? != Ordering::Greater),
            ComparisonOperation::Gt => Ok(self.order(left, right)? == Ordering::Greater),
            ComparisonOperation::Ge => Ok(self.order(left, right)? != Ordering::Less),
        }
    }

    fn order(self, left: &Value, right: &Value) -> Result<Ordering> {
        let ordering = match (left, right) {
            (Value::Scalar(Scalar::Text(a)), Value::Scalar(Scalar::Text(b))) => Some(a.cmp(b)),
            _ => match (
                Number::from_value(self.name(), left),
                Number::from_value(self.name(), right),
            ) {
                (Ok(Number::Int(a)), Ok(Number::Int(b))) => Some(a.cmp(&b)),
                (Ok(a), Ok(b)) => a.as_f64().partial_cmp(&b.as_f64()),
                _ => None,
            },
        };
        ordering.ok_or_else(|| {
            ChoiceError::combinator(
                self.name(),
                format!(
                    "cannot order {} {left} and {} {right}",
                    left.type_name(),
                    right.type_name()
                ),
            )
        })
    }
}

#[allow(clippy::float_cmp)]
fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left.as_float(), right.as_float()) {
        (Some(a), Some(b)) if left.as_int().is_none() || right.as_int().is_none() => a == b,
        _ => left == right,
    }
}

fn compare(op: ComparisonOperation, left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    op.combinator().call([left.into(), right.into()])
}

/// Deferred `left == right`.
pub fn equals(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    compare(ComparisonOperation::Eq, left, right)
}

/// Deferred `left != right`.
pub fn not_equals(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    compare(ComparisonOperation::Ne, left, right)
}

/// Deferred `left < right`.
pub fn less_than(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    compare(ComparisonOperation::Lt, left, right)
}

/// Deferred `left <= right`.
pub fn less_equal(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    compare(ComparisonOperation::Le, left, right)
}

/// Deferred `left > right`.
pub fn greater_than(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    compare(ComparisonOperation::Gt, left, right)
}

/// Deferred `left >= right`.
pub fn greater_equal(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    compare(ComparisonOperation::Ge, left, right)
}

/// Trait for comparisons that return evidence still to be sampled
///
/// A comparison does not look at any sample; it records a deferred `Bool` that is
/// resolved together with the rest of the expression.
pub trait Comparison {
    /// Returns deferred evidence that this value is greater than threshold
    #[must_use]
    fn gt(&self, threshold: impl Into<Value>) -> Choice;

    /// Returns deferred evidence that this value is less than threshold
    #[must_use]
    fn lt(&self, threshold: impl Into<Value>) -> Choice;

    /// Returns deferred evidence that this value is greater than or equal to threshold
    #[must_use]
    fn ge(&self, threshold: impl Into<Value>) -> Choice;

    /// Returns deferred evidence that this value is less than or equal to threshold
    #[must_use]
    fn le(&self, threshold: impl Into<Value>) -> Choice;

    /// Returns deferred evidence that this value equals threshold
    #[must_use]
    fn equals(&self, threshold: impl Into<Value>) -> Choice;

    /// Returns deferred evidence that this value does not equal threshold
    #[must_use]
    fn not_equals(&self, threshold: impl Into<Value>) -> Choice;
}

impl Comparison for Choice {
    /// Greater than comparison
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::{Choice, Value, operations::Comparison};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let roll = Choice::flat([4, 5, 6])?;
    /// let high = roll.gt(3);
    /// assert_eq!(high.evaluate(&mut StdRng::seed_from_u64(5))?, Value::from(true));
    /// # Ok::<(), choice_rs::ChoiceError>(())
    /// ```
    fn gt(&self, threshold: impl Into<Value>) -> Choice {
        greater_than(self.clone(), threshold)
    }

    fn lt(&self, threshold: impl Into<Value>) -> Choice {
        less_than(self.clone(), threshold)
    }

    fn ge(&self, threshold: impl Into<Value>) -> Choice {
        greater_equal(self.clone(), threshold)
    }

    fn le(&self, threshold: impl Into<Value>) -> Choice {
        less_equal(self.clone(), threshold)
    }

    fn equals(&self, threshold: impl Into<Value>) -> Choice {
        equals(self.clone(), threshold)
    }

    fn not_equals(&self, threshold: impl Into<Value>) -> Choice {
        not_equals(self.clone(), threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn eval(choice: &Choice) -> Result<Value> {
        choice.evaluate(&mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_numeric_comparisons() {
        assert_eq!(eval(&less_than(1, 2)).unwrap(), Value::from(true));
        assert_eq!(eval(&less_equal(2, 2)).unwrap(), Value::from(true));
        assert_eq!(eval(&greater_than(1, 2.5)).unwrap(), Value::from(false));
        assert_eq!(eval(&greater_equal(3.0, 3)).unwrap(), Value::from(true));
    }

    #[test]
    fn test_equality_across_number_kinds() {
        assert_eq!(eval(&equals(1, 1.0)).unwrap(), Value::from(true));
        assert_eq!(eval(&not_equals(1, 2)).unwrap(), Value::from(true));
    }

    #[test]
    fn test_equality_of_structures() {
        let pair = Value::seq(["a", "b"]);
        assert_eq!(eval(&equals(pair.clone(), pair)).unwrap(), Value::from(true));
        assert_eq!(eval(&equals("a", 1)).unwrap(), Value::from(false));
    }

    #[test]
    fn test_text_ordering() {
        assert_eq!(eval(&less_than("apple", "banana")).unwrap(), Value::from(true));
    }

    #[test]
    fn test_unordered_values_fail() {
        let err = eval(&less_than(true, 1)).unwrap_err();
        assert_eq!(
            err,
            ChoiceError::combinator("lt", "cannot order Bool true and Int 1")
        );
    }

    #[test]
    fn test_trait_methods_wrap_the_choice() {
        let certain = Choice::solo(10);
        assert_eq!(eval(&certain.gt(5)).unwrap(), Value::from(true));
        assert_eq!(eval(&certain.lt(5)).unwrap(), Value::from(false));
        assert_eq!(eval(&certain.equals(10)).unwrap(), Value::from(true));
        assert_eq!(eval(&certain.not_equals(10)).unwrap(), Value::from(false));
        assert_eq!(eval(&certain.ge(10)).unwrap(), Value::from(true));
        assert_eq!(eval(&certain.le(9)).unwrap(), Value::from(false));
        // `==` is still structural equality of the distributions
        assert!(certain == Choice::solo(10));
    }
}
