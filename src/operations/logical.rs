use super::expect_bool;
use crate::choice::Choice;
use crate::deferred::{Arguments, Combinator, delayed};
use crate::value::Value;
use std::sync::LazyLock;

static AND: LazyLock<Combinator> = LazyLock::new(|| {
    delayed("and", |args: Arguments| {
        let [left, right] = args.exactly::<2>("and")?;
        Ok(Value::from(expect_bool("and", &left)? && expect_bool("and", &right)?))
    })
});

static OR: LazyLock<Combinator> = LazyLock::new(|| {
    delayed("or", |args: Arguments| {
        let [left, right] = args.exactly::<2>("or")?;
        Ok(Value::from(expect_bool("or", &left)? || expect_bool("or", &right)?))
    })
});

static NOT: LazyLock<Combinator> = LazyLock::new(|| {
    delayed("not", |args: Arguments| {
        let [operand] = args.exactly::<1>("not")?;
        Ok(Value::from(!expect_bool("not", &operand)?))
    })
});

/// Deferred logical AND. Both operands are always sampled, so the stream of random
/// draws does not depend on the value of the left operand.
pub fn and(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    AND.call([left.into(), right.into()])
}

/// Deferred logical OR; both operands are always sampled.
pub fn or(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    OR.call([left.into(), right.into()])
}

/// Deferred logical NOT.
pub fn not(operand: impl Into<Value>) -> Choice {
    NOT.call([operand.into()])
}

/// Trait for logical operations on deferred boolean evidence
pub trait LogicalOps {
    /// Logical AND operation
    #[must_use]
    fn both(&self, other: impl Into<Value>) -> Choice;

    /// Logical OR operation; named apart from the merge [`Choice::or`]
    #[must_use]
    fn either_true(&self, other: impl Into<Value>) -> Choice;

    /// Logical NOT operation
    #[must_use]
    fn not(&self) -> Choice;
}

impl LogicalOps for Choice {
    /// Logical AND: both conditions must be true
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::{Choice, Value, operations::{Comparison, LogicalOps}};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let temperature = Choice::flat([19, 21, 23])?;
    /// let warm = temperature.gt(18);
    /// let mild = temperature.lt(25);
    /// let comfortable = warm.both(mild);
    /// assert_eq!(comfortable.evaluate(&mut StdRng::seed_from_u64(2))?, Value::from(true));
    /// # Ok::<(), choice_rs::ChoiceError>(())
    /// ```
    fn both(&self, other: impl Into<Value>) -> Choice {
        and(self.clone(), other)
    }

    fn either_true(&self, other: impl Into<Value>) -> Choice {
        or(self.clone(), other)
    }

    fn not(&self) -> Choice {
        not(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChoiceError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn eval(choice: &Choice) -> crate::error::Result<Value> {
        choice.evaluate(&mut StdRng::seed_from_u64(4))
    }

    #[test]
    fn test_truth_tables() {
        for a in [true, false] {
            for b in [true, false] {
                assert_eq!(eval(&and(a, b)).unwrap(), Value::from(a && b));
                assert_eq!(eval(&or(a, b)).unwrap(), Value::from(a || b));
            }
            assert_eq!(eval(&not(a)).unwrap(), Value::from(!a));
        }
    }

    #[test]
    fn test_non_bool_operand_fails() {
        let err = eval(&and(true, 1)).unwrap_err();
        assert_eq!(err, ChoiceError::combinator("and", "expected a Bool, got Int 1"));
    }

    #[test]
    fn test_trait_methods() {
        let yes = Choice::solo(true);
        assert_eq!(eval(&yes.not()).unwrap(), Value::from(false));
        assert_eq!(eval(&yes.either_true(false)).unwrap(), Value::from(true));
        assert_eq!(eval(&yes.both(false)).unwrap(), Value::from(false));
    }

    #[test]
    fn test_trait_methods_leave_merge_alone() {
        let yes = Choice::solo(true);
        // method syntax `or` still merges distributions
        let merged = yes.clone().or(Choice::solo(false)).unwrap();
        assert_eq!(merged.outcomes().len(), 2);
        let evidence = yes.either_true(false);
        assert_eq!(evidence.outcomes().len(), 1);
        assert_eq!(eval(&evidence).unwrap(), Value::from(true));
    }
}
