use crate::error::Result;
use crate::evaluate::evaluate;
use crate::value::Value;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Owns the single random source of a sampling run.
///
/// The core never creates randomness on its own; `Sampler` is the boundary type
/// that does, so a run can be replayed by constructing it with the same seed.
///
/// # Example
/// ```rust
/// use choice_rs::{Choice, Sampler};
///
/// let dice = Choice::flat([1, 2, 3, 4, 5, 6])?;
/// let first = Sampler::seeded(3).take_samples(&dice.clone().into(), 10)?;
/// let again = Sampler::seeded(3).take_samples(&dice.into(), 10)?;
/// assert_eq!(first, again);
/// # Ok::<(), choice_rs::ChoiceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
    seed: Option<u64>,
}

impl Sampler {
    /// A reproducible sampler.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// A sampler seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            seed: None,
        }
    }

    /// The seed this sampler was built from, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Resolves one sample of `value`.
    ///
    /// # Errors
    /// Same as [`evaluate`].
    pub fn evaluate(&mut self, value: &Value) -> Result<Value> {
        evaluate(value, &mut self.rng)
    }

    /// Resolves `count` independent samples of `value`.
    ///
    /// # Errors
    /// Stops at the first failing evaluation.
    pub fn take_samples(&mut self, value: &Value, count: usize) -> Result<Vec<Value>> {
        (0..count).map(|_| self.evaluate(value)).collect()
    }

    /// Borrows the underlying source, e.g. to pass it to [`evaluate`] directly.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Choice;

    #[test]
    fn test_same_seed_replays() {
        let choice: Value = Choice::flat(["a", "b", "c"]).unwrap().into();
        let first = Sampler::seeded(5).take_samples(&choice, 100).unwrap();
        let second = Sampler::seeded(5).take_samples(&choice, 100).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_seed_is_reported() {
        assert_eq!(Sampler::seeded(12).seed(), Some(12));
        assert_eq!(Sampler::from_os_rng().seed(), None);
    }

    #[test]
    fn test_rng_continues_the_same_stream() {
        let choice: Value = Choice::flat([1, 2, 3, 4]).unwrap().into();
        let mut via_sampler = Sampler::seeded(8);
        let mut via_rng = Sampler::seeded(8);

        let a = via_sampler.evaluate(&choice).unwrap();
        let b = evaluate(&choice, via_rng.rng()).unwrap();
        assert_eq!(a, b);
    }
}
