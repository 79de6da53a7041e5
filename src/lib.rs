//! # choice-rs
//!
//! A small algebra for probabilistic choice: declare weighted distributions over
//! arbitrary values, compose them into nested structures and deferred computations,
//! and sample the whole thing later with a random source you supply.
//!
//! ## Core Concept: Declare Now, Sample Later
//!
//! Building a distribution never draws a random number. Weights, percentages and
//! catch-all remainders are merged eagerly (and checked eagerly), while the actual
//! pick happens in [`evaluate`]:
//!
//! ```rust
//! use choice_rs::{Choice, Value, Sampler};
//!
//! // 20% "rare", the remaining 80% "common"
//! let loot = Choice::percentage(20.0, "rare")?.or(Choice::otherwise("common", None))?;
//! assert_eq!(loot.to_string(), "of(weighted(0.2, \"rare\"), weighted(0.8, \"common\"))");
//!
//! // Sampling is explicit and reproducible
//! let mut sampler = Sampler::seeded(7);
//! let drop = sampler.evaluate(&loot.into())?;
//! assert!(drop == Value::from("rare") || drop == Value::from("common"));
//! # Ok::<(), choice_rs::ChoiceError>(())
//! ```
//!
//! ## Features
//!
//! - **Weighted, percentage and remainder terms**: merged with [`Choice::either`]
//! - **Nesting**: distributions may appear inside sequences, mappings and each other
//! - **Deferred computations**: [`delayed`] lifts a function over sampled arguments
//! - **Explicit randomness**: every draw comes from the `rand::Rng` you pass in
//! - **Operations**: arithmetic, comparison, logic and text combinators in [`operations`]
//! - **Statistical analysis**: histograms, frequencies and entropy in [`statistics`]

pub mod choice;
pub mod deferred;
pub mod error;
pub mod evaluate;
pub mod graph;
pub mod operations;
pub mod sampler;
pub mod statistics;
pub mod traits;
pub mod value;

pub use choice::{Choice, Outcome};
pub use deferred::{Arguments, Combinator, Deferred, delayed};
pub use error::{ChoiceError, Result, Side};
pub use evaluate::evaluate;
pub use sampler::Sampler;
pub use traits::IntoChoice;
pub use value::{Scalar, Value};

pub use operations::{Comparison, LogicalOps};

/// Uniform choice over a fixed list of operands of mixed types.
///
/// Each operand is converted with [`IntoChoice`], so plain values, `Choice`s and
/// fallible constructors can be listed side by side.
///
/// ```rust
/// use choice_rs::{Choice, of};
///
/// let choice = of!["a", 2, Choice::weighted(1.0, true)]?;
/// assert_eq!(choice.outcomes().len(), 3);
/// # Ok::<(), choice_rs::ChoiceError>(())
/// ```
#[macro_export]
macro_rules! of {
    ($($item:expr),+ $(,)?) => {
        $crate::Choice::flat([$($crate::IntoChoice::into_choice($item)),+])
    };
}
