use crate::choice::Choice;
use crate::error::{ChoiceError, Result};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Resolved arguments handed to a combinator function.
///
/// By the time a combinator runs, every argument has been evaluated, so nothing in
/// here is a distribution or a deferred computation any more.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
}

impl Arguments {
    #[must_use]
    pub fn new(positional: Vec<Value>, named: Vec<(String, Value)>) -> Self {
        Self { positional, named }
    }

    /// Number of positional arguments
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Looks up a named argument.
    #[must_use]
    pub fn named(&self, key: &str) -> Option<&Value> {
        self.named.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Splits off exactly `N` positional arguments.
    ///
    /// # Errors
    /// Returns [`ChoiceError::Combinator`] naming `combinator` when the count differs.
    pub fn exactly<const N: usize>(self, combinator: &str) -> Result<[Value; N]> {
        let found = self.positional.len();
        self.positional.try_into().map_err(|_| {
            ChoiceError::combinator(
                combinator,
                format!("expected {N} positional arguments, got {found}"),
            )
        })
    }
}

/// A named function that can be applied to not-yet-sampled arguments.
///
/// The display name stands in for the function's identity when a deferred
/// computation is rendered.
#[derive(Clone)]
pub struct Combinator {
    name: Arc<str>,
    func: Arc<dyn Fn(Arguments) -> Result<Value> + Send + Sync>,
}

impl Combinator {
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records a call over positional arguments without evaluating anything.
    ///
    /// The result is a one-outcome distribution, so it merges like any other choice.
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::{Choice, Value, delayed};
    ///
    /// let twice = delayed("twice", |args| {
    ///     let [x] = args.exactly::<1>("twice")?;
    ///     Ok(Value::seq([x.clone(), x]))
    /// });
    /// let expr = twice.call([Choice::solo("hey")]);
    /// assert_eq!(expr.to_string(), "of(weighted(1, twice(of(weighted(1, \"hey\")))))");
    /// ```
    pub fn call<I, V>(&self, args: I) -> Choice
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.call_with(args, Vec::<(String, Value)>::new())
    }

    /// Records a call over positional and named arguments.
    pub fn call_with<I, V, K, N, W>(&self, args: I, kwargs: K) -> Choice
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
        K: IntoIterator<Item = (N, W)>,
        N: Into<String>,
        W: Into<Value>,
    {
        let deferred = Deferred {
            combinator: self.clone(),
            args: args.into_iter().map(Into::into).collect(),
            kwargs: kwargs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        Choice::solo(deferred)
    }

    /// Invokes the wrapped function on already-resolved arguments.
    ///
    /// # Errors
    /// Propagates whatever the function reports.
    pub fn apply(&self, args: Arguments) -> Result<Value> {
        (self.func)(args)
    }
}

impl PartialEq for Combinator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Combinator").field(&self.name).finish()
    }
}

/// Wraps a function so it can be applied to distributions.
///
/// # Example
/// ```rust
/// use choice_rs::{Choice, Value, delayed};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let shout = delayed("shout", |args| {
///     let [word] = args.exactly::<1>("shout")?;
///     Ok(Value::from(word.as_str().unwrap_or_default().to_uppercase()))
/// });
/// let expr = shout.call([Choice::solo("hi")]);
/// let mut rng = StdRng::seed_from_u64(1);
/// assert_eq!(expr.evaluate(&mut rng).unwrap(), Value::from("HI"));
/// ```
pub fn delayed<F>(name: impl Into<Arc<str>>, func: F) -> Combinator
where
    F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
{
    Combinator::new(name, func)
}

/// A recorded function call whose arguments have not been sampled yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred {
    combinator: Combinator,
    args: Vec<Value>,
    kwargs: Vec<(String, Value)>,
}

impl Deferred {
    #[must_use]
    pub fn combinator(&self) -> &Combinator {
        &self.combinator
    }

    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    #[must_use]
    pub fn kwargs(&self) -> &[(String, Value)] {
        &self.kwargs
    }
}

impl fmt::Display for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.combinator.name())?;
        let positional = self.args.iter().map(ToString::to_string);
        let named = self.kwargs.iter().map(|(k, v)| format!("{k}={v}"));
        for (i, rendered) in positional.chain(named).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&rendered)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first() -> Combinator {
        delayed("first", |args: Arguments| {
            args.positional
                .into_iter()
                .next()
                .ok_or_else(|| ChoiceError::combinator("first", "no arguments"))
        })
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_call_wraps_in_single_outcome() {
        let expr = first().call([1, 2]);
        assert_eq!(expr.outcomes().len(), 1);
        assert!(matches!(expr.outcomes()[0].value(), Value::Deferred(_)));
        assert_eq!(expr.summed(), 1.0);
    }

    #[test]
    fn test_deferred_display_with_kwargs() {
        let expr = first().call_with([Value::from(1)], [("sep", " ")]);
        let Value::Deferred(deferred) = expr.outcomes()[0].value() else {
            panic!("expected a deferred outcome");
        };
        assert_eq!(deferred.to_string(), "first(1, sep=\" \")");
    }

    #[test]
    fn test_apply_invokes_function() {
        let args = Arguments::new(vec![Value::from("x"), Value::from("y")], Vec::new());
        assert_eq!(first().apply(args).unwrap(), Value::from("x"));
    }

    #[test]
    fn test_exactly_reports_arity() {
        let args = Arguments::new(vec![Value::from(1)], Vec::new());
        let err = args.exactly::<2>("pair").unwrap_err();
        assert_eq!(
            err,
            ChoiceError::combinator("pair", "expected 2 positional arguments, got 1")
        );
    }

    #[test]
    fn test_named_lookup() {
        let args = Arguments::new(Vec::new(), vec![("k".to_owned(), Value::from(3))]);
        assert_eq!(args.named("k"), Some(&Value::from(3)));
        assert_eq!(args.named("missing"), None);
        assert!(!args.is_empty());
    }

    #[test]
    fn test_combinator_identity() {
        let a = first();
        let b = a.clone();
        let c = first();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(format!("{a:?}"), "Combinator(\"first\")");
    }
}
