use crate::choice::Choice;
use crate::deferred::Deferred;
use crate::error::Result;
use crate::value::Value;

/// Anything that can stand as an operand of a merge.
///
/// Plain values are lifted with [`Choice::solo`], so `either("a", "b")` is a fair coin.
/// Fallible constructors are accepted as-is, which lets merge chains be written
/// without unwrapping every intermediate term; the first error wins.
pub trait IntoChoice {
    /// Converts into a distribution.
    ///
    /// # Errors
    /// Only fails when `self` already carries a construction error.
    fn into_choice(self) -> Result<Choice>;
}

impl IntoChoice for Choice {
    fn into_choice(self) -> Result<Choice> {
        Ok(self)
    }
}

impl IntoChoice for Result<Choice> {
    fn into_choice(self) -> Result<Choice> {
        self
    }
}

impl IntoChoice for Value {
    fn into_choice(self) -> Result<Choice> {
        match self {
            Value::Choice(choice) => Ok(std::sync::Arc::unwrap_or_clone(choice)),
            other => Ok(Choice::solo(other)),
        }
    }
}

// Leaf data is always wrapped as a single certain outcome
macro_rules! impl_into_choice_via_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoChoice for $ty {
                fn into_choice(self) -> Result<Choice> {
                    Value::from(self).into_choice()
                }
            }
        )*
    };
}

impl_into_choice_via_value!(bool, i32, i64, f64, &str, String, Deferred);
