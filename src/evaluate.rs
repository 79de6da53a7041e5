//! Recursive resolution of expression trees into concrete values.
//!
//! Evaluation walks the tree top-down. Each distribution reached consumes exactly one
//! draw from the random source before its selected outcome is resolved in turn, so
//! branches that are not selected are never sampled. Draws are consumed in a fixed
//! order (sequence order, key order, positional arguments before named ones), which
//! makes a run fully reproducible from the seed of the source.

use crate::choice::Choice;
use crate::deferred::{Arguments, Deferred};
use crate::error::Result;
use crate::value::Value;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::trace;

/// Resolves `value` to a tree without any distribution or deferred computation left.
///
/// # Errors
/// Only fails when a combinator rejects the values its arguments resolved to.
///
/// # Example
/// ```rust
/// use choice_rs::{Choice, Value, evaluate};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let nested = Value::map([("q", Choice::solo(5))]);
/// let mut rng = StdRng::seed_from_u64(7);
/// assert_eq!(evaluate(&nested, &mut rng)?, Value::map([("q", 5)]));
/// # Ok::<(), choice_rs::ChoiceError>(())
/// ```
pub fn evaluate<R>(value: &Value, rng: &mut R) -> Result<Value>
where
    R: Rng + ?Sized,
{
    match value {
        Value::Choice(choice) => sample_choice(choice, rng),
        Value::Deferred(deferred) => apply_deferred(deferred, rng),
        Value::Seq(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                resolved.push(evaluate(item, rng)?);
            }
            Ok(Value::Seq(resolved))
        }
        Value::Map(entries) => {
            let mut resolved = BTreeMap::new();
            for (key, item) in entries {
                resolved.insert(key.clone(), evaluate(item, rng)?);
            }
            Ok(Value::Map(resolved))
        }
        Value::Scalar(_) => Ok(value.clone()),
    }
}

/// Picks the index of the outcome selected by a single uniform draw.
///
/// Outcomes own contiguous half-open slices of `[0, effective_total)` in declaration
/// order; any mass a declared total leaves unassigned belongs to the last outcome.
pub(crate) fn pick_index<R>(choice: &Choice, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let total = choice.effective_total();
    // a standalone untotaled remainder has nothing to draw against
    if total <= 0.0 {
        return 0;
    }
    let pick = rng.random_range(0.0..total);
    let mut boundary = 0.0;
    let mut selected = 0;
    for (index, outcome) in choice.outcomes().iter().enumerate() {
        if boundary > pick {
            break;
        }
        selected = index;
        boundary += outcome.weight().unwrap_or(0.0);
    }
    trace!(pick, total, selected, "sampled choice");
    selected
}

fn sample_choice<R>(choice: &Choice, rng: &mut R) -> Result<Value>
where
    R: Rng + ?Sized,
{
    let index = pick_index(choice, rng);
    evaluate(choice.outcomes()[index].value(), rng)
}

fn apply_deferred<R>(deferred: &Deferred, rng: &mut R) -> Result<Value>
where
    R: Rng + ?Sized,
{
    let mut positional = Vec::with_capacity(deferred.args().len());
    for arg in deferred.args() {
        positional.push(evaluate(arg, rng)?);
    }
    let mut named = Vec::with_capacity(deferred.kwargs().len());
    for (key, arg) in deferred.kwargs() {
        named.push((key.clone(), evaluate(arg, rng)?));
    }

    let combinator = deferred.combinator();
    trace!(combinator = combinator.name(), "applying deferred computation");
    let result = combinator.apply(Arguments::new(positional, named))?;
    evaluate(&result, rng)
}

impl Choice {
    /// Samples this distribution and resolves whatever it selects.
    ///
    /// # Errors
    /// Same as [`evaluate`].
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::{Choice, Value};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let coin = Choice::flat(["heads", "tails"])?;
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let side = coin.evaluate(&mut rng)?;
    /// assert!(side == Value::from("heads") || side == Value::from("tails"));
    /// # Ok::<(), choice_rs::ChoiceError>(())
    /// ```
    pub fn evaluate<R>(&self, rng: &mut R) -> Result<Value>
    where
        R: Rng + ?Sized,
    {
        sample_choice(self, rng)
    }

    /// Draws `count` independent samples.
    ///
    /// # Errors
    /// Stops at the first failing evaluation.
    pub fn take_samples<R>(&self, count: usize, rng: &mut R) -> Result<Vec<Value>>
    where
        R: Rng + ?Sized,
    {
        (0..count).map(|_| self.evaluate(rng)).collect()
    }
}

impl Value {
    /// Method form of [`evaluate`].
    ///
    /// # Errors
    /// Same as [`evaluate`].
    pub fn evaluate<R>(&self, rng: &mut R) -> Result<Value>
    where
        R: Rng + ?Sized,
    {
        evaluate(self, rng)
    }
}
