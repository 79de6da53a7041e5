//! Error types for the choice-rs library.
//!
//! Every error is raised eagerly where a distribution is built or merged, with the
//! single exception of [`ChoiceError::Combinator`], which is reported when a deferred
//! computation rejects the values it was handed during evaluation.

use thiserror::Error;

/// Which operand of a merge an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// The main error type for the choice-rs library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChoiceError {
    /// A remainder placeholder was built with other than exactly one outcome.
    #[error("Malformed remainder: remainders hold exactly one outcome, got {count}")]
    MalformedRemainder {
        /// Number of outcomes supplied
        count: usize,
    },

    /// A remainder was merged where no total exists to resolve its weight against.
    #[error("Unanchored remainder: cannot join remainders without any declared total")]
    UnanchoredRemainder,

    /// A remainder was used as the left operand of a merge.
    #[error("Misplaced remainder: remainders may only occur at the end of a disjunction")]
    MisplacedRemainder,

    /// One operand already accounts for its whole declared total.
    #[error("Saturated operand: the {side} operand already sums to its total of {total}")]
    Saturated {
        /// The saturated operand
        side: Side,
        /// Its declared total
        total: f64,
    },

    /// The operands declare different totals.
    #[error("Total mismatch: cannot join distributions normalized to {left} and {right}")]
    TotalMismatch {
        /// Total of the left operand
        left: f64,
        /// Total of the right operand
        right: f64,
    },

    /// The merged weights would exceed the resolved total.
    #[error("Overflow: joining would exceed the allowed total by {excess}")]
    Overflow {
        /// Amount by which the total is exceeded
        excess: f64,
    },

    /// A distribution was built directly with weights summing past its total.
    #[error("Outcomes sum to {summed} instead of at most {total}")]
    SumExceedsTotal {
        /// Sum of the explicit weights
        summed: f64,
        /// Declared total
        total: f64,
    },

    /// `of`/`flat` was called without any element.
    #[error("Empty sequence: at least one outcome is required")]
    EmptySequence,

    /// A weight, percentage or total is out of range.
    #[error("Invalid parameter '{parameter}': value {value} {constraint}")]
    InvalidParameter {
        /// The name of the parameter
        parameter: &'static str,
        /// The invalid value
        value: f64,
        /// A description of the constraint that was violated
        constraint: &'static str,
    },

    /// A deferred computation rejected its resolved arguments.
    #[error("Combinator '{name}' failed: {reason}")]
    Combinator {
        /// Display name of the combinator
        name: String,
        /// Why the arguments were rejected
        reason: String,
    },
}

/// A specialized `Result` type for choice operations.
pub type Result<T> = std::result::Result<T, ChoiceError>;

impl ChoiceError {
    /// Create an error for an out-of-range parameter.
    ///
    /// # Example
    /// ```
    /// use choice_rs::error::ChoiceError;
    ///
    /// let error = ChoiceError::invalid_parameter("weight", -1.0, "must be positive");
    /// assert!(error.to_string().contains("weight"));
    /// ```
    #[must_use]
    pub fn invalid_parameter(
        parameter: &'static str,
        value: f64,
        constraint: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            constraint,
        }
    }

    /// Create an error for a combinator that could not handle its arguments.
    ///
    /// # Example
    /// ```
    /// use choice_rs::error::ChoiceError;
    ///
    /// let error = ChoiceError::combinator("add", "cannot add Bool and Int");
    /// assert!(error.to_string().contains("add"));
    /// ```
    pub fn combinator(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Combinator {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an error for a saturated merge operand.
    #[must_use]
    pub fn saturated(side: Side, total: f64) -> Self {
        Self::Saturated { side, total }
    }
}
