#![allow(clippy::cast_precision_loss)]

use crate::choice::Choice;
use crate::error::Result;
use crate::value::Value;
use rand::Rng;

/// Empirical analysis of a distribution by repeated sampling.
///
/// Values are compared structurally, so counts are kept as ordered lists in order
/// of first appearance rather than in a hash map.
impl Choice {
    /// Counts how often each outcome appears in `sample_count` samples.
    ///
    /// # Errors
    /// Stops at the first failing evaluation.
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::{Choice, Value};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let coin = Choice::percentage(70.0, "heads")?.or(Choice::otherwise("tails", None))?;
    /// let histogram = coin.histogram(&mut StdRng::seed_from_u64(1), 1000)?;
    /// // roughly 700 heads and 300 tails
    /// assert_eq!(histogram.iter().map(|(_, n)| n).sum::<usize>(), 1000);
    /// # Ok::<(), choice_rs::ChoiceError>(())
    /// ```
    pub fn histogram<R>(&self, rng: &mut R, sample_count: usize) -> Result<Vec<(Value, usize)>>
    where
        R: Rng + ?Sized,
    {
        let mut histogram: Vec<(Value, usize)> = Vec::new();
        for _ in 0..sample_count {
            let sample = self.evaluate(rng)?;
            match histogram.iter_mut().find(|(seen, _)| *seen == sample) {
                Some((_, count)) => *count += 1,
                None => histogram.push((sample, 1)),
            }
        }
        Ok(histogram)
    }

    /// Observed proportion of each outcome.
    ///
    /// # Errors
    /// Stops at the first failing evaluation.
    pub fn frequencies<R>(&self, rng: &mut R, sample_count: usize) -> Result<Vec<(Value, f64)>>
    where
        R: Rng + ?Sized,
    {
        let total = sample_count as f64;
        Ok(self
            .histogram(rng, sample_count)?
            .into_iter()
            .map(|(value, count)| (value, count as f64 / total))
            .collect())
    }

    /// Estimates the most frequent outcome.
    ///
    /// # Errors
    /// Stops at the first failing evaluation.
    pub fn mode<R>(&self, rng: &mut R, sample_count: usize) -> Result<Option<Value>>
    where
        R: Rng + ?Sized,
    {
        Ok(self
            .histogram(rng, sample_count)?
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(value, _)| value))
    }

    /// Calculates the empirical entropy of the distribution in bits.
    ///
    /// # Errors
    /// Stops at the first failing evaluation.
    pub fn entropy<R>(&self, rng: &mut R, sample_count: usize) -> Result<f64>
    where
        R: Rng + ?Sized,
    {
        Ok(self
            .frequencies(rng, sample_count)?
            .into_iter()
            .map(|(_, p)| if p > 0.0 { -p * p.log2() } else { 0.0 })
            .sum())
    }
}

/// Total absolute difference between observed and expected proportions, summed over
/// the observed outcomes. Expected outcomes that were never observed do not count.
///
/// # Example
/// ```rust
/// use choice_rs::{Value, statistics::deviation};
///
/// let found = [(Value::from("a"), 0.45), (Value::from("b"), 0.55)];
/// let expected = [(Value::from("a"), 0.5), (Value::from("b"), 0.5)];
/// assert!((deviation(&found, &expected) - 0.1).abs() < 1e-12);
/// ```
#[must_use]
pub fn deviation(found: &[(Value, f64)], expected: &[(Value, f64)]) -> f64 {
    found
        .iter()
        .map(|(value, observed)| {
            let wanted = expected
                .iter()
                .find(|(candidate, _)| candidate == value)
                .map_or(0.0, |(_, p)| *p);
            (wanted - observed).abs()
        })
        .sum()
}

/// Tolerance band of three standard errors for `sample_count` trials.
#[must_use]
pub fn precision(sample_count: usize) -> f64 {
    3.0 / (sample_count as f64).sqrt()
}
