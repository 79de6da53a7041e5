use crate::error::{ChoiceError, Result, Side};
use crate::traits::IntoChoice;
use crate::value::Value;
use std::fmt;
use tracing::debug;

/// One alternative of a distribution together with its relative weight.
///
/// A `None` weight is a remainder placeholder: its weight is only known once the
/// distribution is merged against a declared total.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    value: Value,
    weight: Option<f64>,
}

impl Outcome {
    pub fn new(value: impl Into<Value>, weight: f64) -> Self {
        Self {
            value: value.into(),
            weight: Some(weight),
        }
    }

    /// An outcome whose weight is left for a later merge to fill in.
    pub fn placeholder(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            weight: None,
        }
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }
}

/// A declared set of weighted alternatives, optionally normalized to a fixed total.
///
/// Choices are built with the constructors below and combined with [`Choice::either`]
/// (or [`Choice::or`]); nothing is sampled until [`Choice::evaluate`] is called with a
/// random source. Every constructor validates eagerly, so a `Choice` that exists is
/// always well formed.
///
/// # Example
/// ```rust
/// use choice_rs::Choice;
///
/// // "c" soaks up whatever is left of the total of 10
/// let choice = Choice::weighted(1.0, "a")?
///     .or(Choice::weighted(2.0, "b"))?
///     .or(Choice::otherwise("c", Some(10.0)))?;
/// assert_eq!(choice.outcomes()[2].weight(), Some(7.0));
/// # Ok::<(), choice_rs::ChoiceError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    outcomes: Vec<Outcome>,
    total: Option<f64>,
    is_remainder: bool,
    summed: f64,
}

fn positive(parameter: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(ChoiceError::invalid_parameter(
            parameter,
            value,
            "must be finite",
        ));
    }
    if value <= 0.0 {
        return Err(ChoiceError::invalid_parameter(
            parameter,
            value,
            "must be positive",
        ));
    }
    Ok(value)
}

// Weights that add up to a total only up to rounding still count as filling it
const RELATIVE_TOLERANCE: f64 = 1e-9;

fn slack(total: f64) -> f64 {
    total.abs() * RELATIVE_TOLERANCE
}

fn finite_sum(summed: f64) -> Result<f64> {
    if summed.is_finite() {
        Ok(summed)
    } else {
        Err(ChoiceError::invalid_parameter(
            "summed weight",
            summed,
            "must be finite",
        ))
    }
}

impl Choice {
    /// Builds a distribution directly from its parts.
    ///
    /// # Errors
    /// - [`ChoiceError::EmptySequence`] when `outcomes` is empty
    /// - [`ChoiceError::MalformedRemainder`] when a remainder holds other than one outcome
    /// - [`ChoiceError::InvalidParameter`] for a non-positive weight or total, or
    ///   weights whose sum is not finite
    /// - [`ChoiceError::SumExceedsTotal`] when the weights add up past `total`
    pub fn from_parts(
        outcomes: Vec<Outcome>,
        total: Option<f64>,
        is_remainder: bool,
    ) -> Result<Self> {
        if is_remainder && outcomes.len() != 1 {
            return Err(ChoiceError::MalformedRemainder {
                count: outcomes.len(),
            });
        }
        if outcomes.is_empty() {
            return Err(ChoiceError::EmptySequence);
        }
        let mut summed = 0.0;
        for weight in outcomes.iter().filter_map(Outcome::weight) {
            summed += positive("weight", weight)?;
        }
        let summed = finite_sum(summed)?;
        if let Some(total) = total {
            positive("total", total)?;
            if summed - total > slack(total) {
                return Err(ChoiceError::SumExceedsTotal { summed, total });
            }
        }
        Ok(Self {
            outcomes,
            total,
            is_remainder,
            summed,
        })
    }

    /// A distribution with a single certain outcome.
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::Choice;
    ///
    /// let certain = Choice::solo("a");
    /// assert_eq!(certain.to_string(), "of(weighted(1, \"a\"))");
    /// ```
    pub fn solo(value: impl Into<Value>) -> Self {
        Self {
            outcomes: vec![Outcome::new(value, 1.0)],
            total: None,
            is_remainder: false,
            summed: 1.0,
        }
    }

    /// A single outcome with an explicit relative weight.
    ///
    /// # Errors
    /// Returns [`ChoiceError::InvalidParameter`] unless `weight` is finite and positive.
    pub fn weighted(weight: f64, value: impl Into<Value>) -> Result<Self> {
        let weight = positive("weight", weight)?;
        Self::from_parts(vec![Outcome::new(value, weight)], None, false)
    }

    /// A single outcome taking `percent` out of a total of 100.
    ///
    /// # Errors
    /// Returns [`ChoiceError::InvalidParameter`] unless `0 < percent <= 100`.
    pub fn percentage(percent: f64, value: impl Into<Value>) -> Result<Self> {
        let percent = positive("percent", percent)?;
        if percent > 100.0 {
            return Err(ChoiceError::invalid_parameter(
                "percent",
                percent,
                "must be in (0, 100]",
            ));
        }
        Self::from_parts(vec![Outcome::new(value, percent)], Some(100.0), false)
    }

    /// A remainder placeholder: `value` receives whatever weight is left once this
    /// is merged as the last term of a chain with a known total.
    ///
    /// # Errors
    /// Returns [`ChoiceError::InvalidParameter`] for a non-positive `total`.
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::Choice;
    ///
    /// let rest = Choice::otherwise("b", Some(100.0))?;
    /// assert_eq!(rest.to_string(), "otherwise(\"b\", total=100)");
    /// let open = Choice::otherwise("b", None)?;
    /// assert_eq!(open.to_string(), "otherwise(\"b\")");
    /// # Ok::<(), choice_rs::ChoiceError>(())
    /// ```
    pub fn otherwise(value: impl Into<Value>, total: Option<f64>) -> Result<Self> {
        Self::from_parts(vec![Outcome::placeholder(value)], total, true)
    }

    /// Left-folds any sequence of operands through [`Choice::either`].
    ///
    /// # Errors
    /// Returns [`ChoiceError::EmptySequence`] for an empty sequence, or the first
    /// merge error encountered.
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::Choice;
    ///
    /// let animal = Choice::flat(["raven", "owl", "zebra"])?;
    /// assert_eq!(animal.outcomes().len(), 3);
    /// # Ok::<(), choice_rs::ChoiceError>(())
    /// ```
    pub fn flat<I>(items: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: IntoChoice,
    {
        let mut items = items.into_iter();
        let first = items.next().ok_or(ChoiceError::EmptySequence)?.into_choice()?;
        items.try_fold(first, |acc, item| Self::either(acc, item))
    }

    /// Fixed-arity form of [`Choice::flat`]; see also the [`of!`](crate::of) macro for
    /// operands of mixed types.
    ///
    /// # Errors
    /// Same as [`Choice::flat`].
    pub fn of<T: IntoChoice, const N: usize>(items: [T; N]) -> Result<Self> {
        Self::flat(items)
    }

    /// Merges two operands into "a, or b", validating and resolving totals and
    /// remainders.
    ///
    /// # Errors
    /// - [`ChoiceError::UnanchoredRemainder`] when a remainder meets no total
    /// - [`ChoiceError::MisplacedRemainder`] when the left operand is a remainder
    /// - [`ChoiceError::Saturated`] when an operand already fills its total
    /// - [`ChoiceError::TotalMismatch`] when the totals differ
    /// - [`ChoiceError::Overflow`] when the weights would exceed the total
    pub fn either(a: impl IntoChoice, b: impl IntoChoice) -> Result<Self> {
        let a = a.into_choice()?;
        let b = b.into_choice()?;
        merge(a, b).inspect_err(|err| debug!(%err, "rejected merge"))
    }

    /// Method form of [`Choice::either`] for writing merge chains.
    ///
    /// # Errors
    /// Same as [`Choice::either`].
    pub fn or(self, other: impl IntoChoice) -> Result<Self> {
        Self::either(self, other)
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn total(&self) -> Option<f64> {
        self.total
    }

    #[must_use]
    pub fn is_remainder(&self) -> bool {
        self.is_remainder
    }

    /// Sum of every weight that is not a placeholder.
    #[must_use]
    pub fn summed(&self) -> f64 {
        self.summed
    }

    /// The mass a draw is taken from: the declared total, or the summed weights.
    #[must_use]
    pub fn effective_total(&self) -> f64 {
        self.total.unwrap_or(self.summed)
    }

    /// True when a declared total is fully accounted for, so no term may follow.
    ///
    /// Rounding error in the weights is tolerated: `0.1 + 0.2` fills a total of `0.3`.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.total
            .is_some_and(|total| (total - self.summed).abs() <= slack(total))
    }

    /// Probability of each outcome being selected, in declaration order.
    ///
    /// Mass that a declared total leaves unassigned falls to the last outcome.
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::Choice;
    ///
    /// let choice = Choice::percentage(20.0, "a")?.or(Choice::otherwise("b", None))?;
    /// let probabilities: Vec<f64> = choice.probabilities().into_iter().map(|(_, p)| p).collect();
    /// assert_eq!(probabilities, vec![0.2, 0.8]);
    /// # Ok::<(), choice_rs::ChoiceError>(())
    /// ```
    #[must_use]
    pub fn probabilities(&self) -> Vec<(&Value, f64)> {
        let total = self.effective_total();
        if total <= 0.0 {
            return vec![(&self.outcomes[0].value, 1.0)];
        }
        let last = self.outcomes.len() - 1;
        let mut boundary = 0.0;
        self.outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| {
                let weight = outcome.weight.unwrap_or(0.0);
                let mass = if i == last { (total - boundary).max(0.0) } else { weight };
                boundary += weight;
                (&outcome.value, mass / total)
            })
            .collect()
    }
}

#[allow(clippy::float_cmp)]
fn merge(a: Choice, b: Choice) -> Result<Choice> {
    let (a_total, b_total) = (a.total, b.total);
    let Some(total) = a_total.or(b_total) else {
        if a.is_remainder || b.is_remainder {
            return Err(ChoiceError::UnanchoredRemainder);
        }
        let summed = finite_sum(a.summed + b.summed)?;
        let mut outcomes = a.outcomes;
        outcomes.extend(b.outcomes);
        return Ok(Choice {
            outcomes,
            total: None,
            is_remainder: false,
            summed,
        });
    };

    if a.is_remainder {
        return Err(ChoiceError::MisplacedRemainder);
    }
    if a.is_saturated() {
        return Err(ChoiceError::saturated(Side::Left, total));
    }
    if let Some(right) = b_total.filter(|_| b.is_saturated()) {
        return Err(ChoiceError::saturated(Side::Right, right));
    }
    if let (Some(left), Some(right)) = (a_total, b_total) {
        if left != right {
            return Err(ChoiceError::TotalMismatch { left, right });
        }
    }

    let remaining = total - (a.summed + b.summed);
    if remaining < -slack(total) {
        return Err(ChoiceError::Overflow { excess: -remaining });
    }
    let remaining = remaining.max(0.0);

    let mut outcomes = a.outcomes;
    let summed = if b.is_remainder {
        let Outcome { value, .. } = b
            .outcomes
            .into_iter()
            .next()
            .ok_or(ChoiceError::MalformedRemainder { count: 0 })?;
        outcomes.push(Outcome::new(value, remaining));
        a.summed + remaining
    } else {
        outcomes.extend(b.outcomes);
        a.summed + b.summed
    };
    Ok(Choice {
        outcomes,
        total: Some(total),
        is_remainder: false,
        summed,
    })
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_remainder {
            let value = &self.outcomes[0].value;
            return match self.total {
                None => write!(f, "otherwise({value})"),
                Some(total) => write!(f, "otherwise({value}, total={total})"),
            };
        }
        let scale = self.total.unwrap_or(1.0);
        f.write_str("of(")?;
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let weight = outcome.weight.unwrap_or(0.0) / scale;
            write!(f, "weighted({weight}, {})", outcome.value)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_solo_has_unit_weight() {
        let choice = Choice::solo("a");
        assert_eq!(choice.outcomes().len(), 1);
        assert_eq!(choice.summed(), 1.0);
        assert_eq!(choice.total(), None);
        assert!(!choice.is_remainder());
    }

    #[test]
    fn test_weighted_rejects_non_positive() {
        assert!(matches!(
            Choice::weighted(0.0, "a"),
            Err(ChoiceError::InvalidParameter {
                parameter: "weight",
                ..
            })
        ));
        assert!(Choice::weighted(-1.0, "a").is_err());
        assert!(Choice::weighted(f64::NAN, "a").is_err());
        assert!(Choice::weighted(f64::INFINITY, "a").is_err());
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(Choice::percentage(100.0, "a").is_ok());
        assert!(matches!(
            Choice::percentage(101.0, "a"),
            Err(ChoiceError::InvalidParameter {
                parameter: "percent",
                ..
            })
        ));
        assert!(Choice::percentage(0.0, "a").is_err());
    }

    #[test]
    fn test_remainder_with_many_outcomes_is_malformed() {
        let outcomes = vec![Outcome::placeholder("a"), Outcome::placeholder("b")];
        assert_eq!(
            Choice::from_parts(outcomes, Some(10.0), true),
            Err(ChoiceError::MalformedRemainder { count: 2 })
        );
    }

    #[test]
    fn test_from_parts_sum_exceeds_total() {
        let outcomes = vec![Outcome::new("a", 6.0), Outcome::new("b", 5.0)];
        assert_eq!(
            Choice::from_parts(outcomes, Some(10.0), false),
            Err(ChoiceError::SumExceedsTotal {
                summed: 11.0,
                total: 10.0
            })
        );
    }

    #[test]
    fn test_from_parts_rejects_empty() {
        assert_eq!(
            Choice::from_parts(Vec::new(), None, false),
            Err(ChoiceError::EmptySequence)
        );
    }

    #[test]
    fn test_untotaled_merge_concatenates() {
        let choice = Choice::weighted(1.0, "a")
            .and_then(|c| c.or(Choice::weighted(2.0, "b")))
            .and_then(|c| c.or(Choice::weighted(3.0, "c")))
            .unwrap();
        let weights: Vec<_> = choice.outcomes().iter().map(Outcome::weight).collect();
        assert_eq!(weights, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(choice.total(), None);
    }

    #[test]
    fn test_remainder_takes_what_is_left() {
        let choice = Choice::either(Choice::weighted(20.0, "a"), Choice::otherwise("b", Some(100.0))).unwrap();
        assert_eq!(choice.total(), Some(100.0));
        assert_eq!(choice.outcomes()[1].weight(), Some(80.0));
        assert!(choice.is_saturated());
    }

    #[test]
    fn test_percentage_anchors_untotaled_remainder() {
        let choice = Choice::either(Choice::percentage(20.0, "a"), Choice::otherwise("b", None)).unwrap();
        assert_eq!(choice.total(), Some(100.0));
        assert_eq!(choice.outcomes()[1].weight(), Some(80.0));
    }

    #[test]
    fn test_merge_two_remainders_is_unanchored() {
        let err = Choice::either(Choice::otherwise("a", None), Choice::otherwise("b", None)).unwrap_err();
        assert_eq!(err, ChoiceError::UnanchoredRemainder);
    }

    #[test]
    fn test_remainder_followed_by_terms_is_misplaced() {
        let err = Choice::either(Choice::otherwise("a", Some(100.0)), Choice::percentage(10.0, "b")).unwrap_err();
        assert_eq!(err, ChoiceError::MisplacedRemainder);
    }

    #[test]
    fn test_saturated_operand_rejected() {
        let full = Choice::percentage(100.0, "a").unwrap();
        assert_eq!(
            Choice::either(full.clone(), Choice::otherwise("b", None)),
            Err(ChoiceError::saturated(Side::Left, 100.0))
        );
        assert_eq!(
            Choice::either(Choice::weighted(1.0, "b"), full),
            Err(ChoiceError::saturated(Side::Right, 100.0))
        );
    }

    #[test]
    fn test_conflicting_totals_rejected() {
        let err = Choice::either(Choice::percentage(10.0, "a"), Choice::otherwise("b", Some(50.0))).unwrap_err();
        assert_eq!(
            err,
            ChoiceError::TotalMismatch {
                left: 100.0,
                right: 50.0
            }
        );
    }

    #[test]
    fn test_overflow_rejected() {
        let err = Choice::either(Choice::percentage(60.0, "a"), Choice::percentage(50.0, "b")).unwrap_err();
        assert_eq!(err, ChoiceError::Overflow { excess: 10.0 });
    }

    #[test]
    fn test_unbounded_sum_rejected() {
        let huge = || Choice::weighted(f64::MAX, "a");
        assert!(matches!(
            Choice::either(huge(), huge()),
            Err(ChoiceError::InvalidParameter {
                parameter: "summed weight",
                ..
            })
        ));

        let outcomes = vec![Outcome::new("a", f64::MAX), Outcome::new("b", f64::MAX)];
        assert!(matches!(
            Choice::from_parts(outcomes, None, false),
            Err(ChoiceError::InvalidParameter {
                parameter: "summed weight",
                ..
            })
        ));
    }

    #[test]
    fn test_rounding_does_not_overflow() {
        let choice = Choice::weighted(0.1, "a")
            .and_then(|c| c.or(Choice::weighted(0.2, "b")))
            .and_then(|c| c.or(Choice::otherwise("c", Some(0.3))))
            .unwrap();
        assert_eq!(choice.outcomes().len(), 3);
        assert_eq!(choice.outcomes()[2].weight(), Some(0.0));
        assert!(choice.is_saturated());
        assert!(matches!(
            choice.or("d"),
            Err(ChoiceError::Saturated {
                side: Side::Left,
                ..
            })
        ));

        let outcomes = vec![Outcome::new("a", 0.1), Outcome::new("b", 0.2)];
        assert!(Choice::from_parts(outcomes, Some(0.3), false).is_ok());
    }

    #[test]
    fn test_merge_does_not_touch_operands() {
        let a = Choice::weighted(1.0, "a").unwrap();
        let b = Choice::weighted(2.0, "b").unwrap();
        let merged = Choice::either(a.clone(), b.clone()).unwrap();
        assert_eq!(a.outcomes().len(), 1);
        assert_eq!(b.outcomes().len(), 1);
        assert_eq!(merged.outcomes().len(), 2);
    }

    #[test]
    fn test_plain_values_are_lifted() {
        let choice = Choice::either("a", 2).unwrap();
        assert_eq!(choice.to_string(), "of(weighted(1, \"a\"), weighted(1, 2))");
    }

    #[test]
    fn test_flat_empty_fails() {
        let empty: Vec<Choice> = Vec::new();
        assert_eq!(Choice::flat(empty), Err(ChoiceError::EmptySequence));
    }

    #[test]
    fn test_flat_single_remainder_passes_through() {
        let choice = Choice::flat([Choice::otherwise("a", None)]).unwrap();
        assert!(choice.is_remainder());
    }

    #[test]
    fn test_flat_propagates_first_error() {
        let items = [
            Choice::weighted(1.0, "a"),
            Choice::weighted(-1.0, "b"),
            Choice::otherwise("c", None),
        ];
        assert!(matches!(
            Choice::flat(items),
            Err(ChoiceError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_display_untotaled() {
        let choice = Choice::of([Choice::weighted(1.0, "a"), Choice::weighted(2.5, "b")]).unwrap();
        assert_eq!(
            choice.to_string(),
            "of(weighted(1, \"a\"), weighted(2.5, \"b\"))"
        );
    }

    #[test]
    fn test_display_totaled_as_fractions() {
        let choice = Choice::either(Choice::percentage(20.0, "a"), Choice::otherwise("b", None)).unwrap();
        assert_eq!(
            choice.to_string(),
            "of(weighted(0.2, \"a\"), weighted(0.8, \"b\"))"
        );
    }

    #[test]
    fn test_probabilities_with_unassigned_mass() {
        let lonely = Choice::percentage(25.0, "a").unwrap();
        assert_eq!(lonely.probabilities(), vec![(&Value::from("a"), 1.0)]);

        let pair = Choice::either(Choice::percentage(25.0, "a"), Choice::percentage(25.0, "b")).unwrap();
        let probabilities: Vec<f64> = pair.probabilities().into_iter().map(|(_, p)| p).collect();
        assert_eq!(probabilities, vec![0.25, 0.75]);
    }
}
