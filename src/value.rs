use crate::choice::Choice;
use crate::deferred::Deferred;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Leaf data carried through the algebra untouched by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// The payload type flowing through distributions and deferred computations.
///
/// Outcomes of a [`Choice`] and arguments of a [`Deferred`] are themselves values, so
/// arbitrarily nested expression trees can be declared before anything is sampled.
/// Distributions and deferred computations are shared through `Arc`, which keeps
/// cloning cheap and lets the same sub-expression appear in several places.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A distribution still to be sampled
    Choice(Arc<Choice>),
    /// A function call still to be applied
    Deferred(Arc<Deferred>),
    /// An ordered sequence whose elements are resolved independently
    Seq(Vec<Value>),
    /// A string-keyed mapping whose values are resolved independently
    Map(BTreeMap<String, Value>),
    /// Concrete leaf data
    Scalar(Scalar),
}

impl Value {
    /// The null scalar.
    #[must_use]
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Builds a sequence from anything convertible into values.
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::Value;
    ///
    /// let seq = Value::seq([1, 2, 3]);
    /// assert_eq!(seq.to_string(), "[1, 2, 3]");
    /// ```
    pub fn seq<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Builds a mapping from key/value pairs.
    ///
    /// # Example
    /// ```rust
    /// use choice_rs::Value;
    ///
    /// let map = Value::map([("their", "her"), ("they", "she")]);
    /// assert_eq!(map.get("they"), Some(&Value::from("she")));
    /// ```
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short name of the runtime variant, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Choice(_) => "Choice",
            Value::Deferred(_) => "Deferred",
            Value::Seq(_) => "Seq",
            Value::Map(_) => "Map",
            Value::Scalar(Scalar::Null) => "Null",
            Value::Scalar(Scalar::Bool(_)) => "Bool",
            Value::Scalar(Scalar::Int(_)) => "Int",
            Value::Scalar(Scalar::Float(_)) => "Float",
            Value::Scalar(Scalar::Text(_)) => "Text",
        }
    }

    /// True when no distribution or deferred computation is left anywhere inside.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        match self {
            Value::Choice(_) | Value::Deferred(_) => false,
            Value::Seq(items) => items.iter().all(Value::is_concrete),
            Value::Map(entries) => entries.values().all(Value::is_concrete),
            Value::Scalar(_) => true,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value; integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar::Int(i)) => Some(*i as f64),
            Value::Scalar(Scalar::Float(f)) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a key when the value is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::null()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Text(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Text(s))
    }
}

impl From<Choice> for Value {
    fn from(choice: Choice) -> Self {
        Value::Choice(Arc::new(choice))
    }
}

impl From<Arc<Choice>> for Value {
    fn from(choice: Arc<Choice>) -> Self {
        Value::Choice(choice)
    }
}

impl From<Deferred> for Value {
    fn from(deferred: Deferred) -> Self {
        Value::Deferred(Arc::new(deferred))
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::seq(items)
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(entries: BTreeMap<String, V>) -> Self {
        Value::map(entries)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Choice(choice) => write!(f, "{choice}"),
            Value::Deferred(deferred) => write!(f, "{deferred}"),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Scalar(scalar) => write!(f, "{scalar}"),
        }
    }
}
