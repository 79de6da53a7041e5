use crate::choice::Choice;
use crate::deferred::{Arguments, Combinator, delayed};
use crate::error::{ChoiceError, Result};
use crate::value::{Scalar, Value};
use std::sync::LazyLock;

fn fragment(combinator: &str, value: &Value) -> Result<String> {
    match value {
        Value::Scalar(Scalar::Text(s)) => Ok(s.clone()),
        Value::Scalar(Scalar::Null) => Ok(String::new()),
        Value::Scalar(scalar) => Ok(scalar.to_string()),
        other => Err(ChoiceError::combinator(
            combinator,
            format!("cannot render {} {other} as text", other.type_name()),
        )),
    }
}

fn text(combinator: &str, value: &Value) -> Result<String> {
    value.as_str().map(str::to_owned).ok_or_else(|| {
        ChoiceError::combinator(
            combinator,
            format!("expected Text, got {} {value}", value.type_name()),
        )
    })
}

static JOIN: LazyLock<Combinator> = LazyLock::new(|| {
    delayed("join", |args: Arguments| {
        let separator = match args.named("sep") {
            Some(sep) => fragment("join", sep)?,
            None => String::new(),
        };
        let parts = args
            .positional
            .iter()
            .map(|part| fragment("join", part))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::from(parts.join(&separator)))
    })
});

static ARTICLE: LazyLock<Combinator> = LazyLock::new(|| {
    delayed("article", |args: Arguments| {
        let [noun] = args.exactly::<1>("article")?;
        let noun = text("article", &noun)?;
        let article = if noun.starts_with(['a', 'e', 'i', 'o', 'u']) {
            "an"
        } else {
            "a"
        };
        Ok(Value::from(format!("{article} {noun}")))
    })
});

static TITLE_CASE: LazyLock<Combinator> = LazyLock::new(|| {
    delayed("title_case", |args: Arguments| {
        let [phrase] = args.exactly::<1>("title_case")?;
        let phrase = text("title_case", &phrase)?;
        let mut titled = String::with_capacity(phrase.len());
        let mut in_word = false;
        for c in phrase.chars() {
            if c.is_alphabetic() {
                if in_word {
                    titled.extend(c.to_lowercase());
                } else {
                    titled.extend(c.to_uppercase());
                }
                in_word = true;
            } else {
                titled.push(c);
                in_word = false;
            }
        }
        Ok(Value::from(titled))
    })
});

static INDEX: LazyLock<Combinator> = LazyLock::new(|| {
    delayed("index", |args: Arguments| {
        let [container, key] = args.exactly::<2>("index")?;
        let found = match (&container, &key) {
            (Value::Seq(items), Value::Scalar(Scalar::Int(i))) => {
                let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
                let position = if *i < 0 { len + i } else { *i };
                usize::try_from(position)
                    .ok()
                    .and_then(|p| items.get(p))
            }
            (Value::Map(entries), Value::Scalar(Scalar::Text(k))) => entries.get(k),
            _ => None,
        };
        found.cloned().ok_or_else(|| {
            ChoiceError::combinator("index", format!("no entry {key} in {container}"))
        })
    })
});

static CONTAINS: LazyLock<Combinator> = LazyLock::new(|| {
    delayed("contains", |args: Arguments| {
        let [container, item] = args.exactly::<2>("contains")?;
        let found = match (&container, &item) {
            (Value::Seq(items), _) => items.contains(&item),
            (Value::Map(entries), Value::Scalar(Scalar::Text(k))) => entries.contains_key(k),
            (Value::Scalar(Scalar::Text(haystack)), Value::Scalar(Scalar::Text(needle))) => {
                haystack.contains(needle.as_str())
            }
            _ => {
                return Err(ChoiceError::combinator(
                    "contains",
                    format!(
                        "cannot look for {} in {}",
                        item.type_name(),
                        container.type_name()
                    ),
                ));
            }
        };
        Ok(Value::from(found))
    })
});

/// Deferred concatenation of every part as text.
///
/// Non-text scalars are rendered with their display form and `null` renders as
/// nothing.
///
/// # Example
/// ```rust
/// use choice_rs::{Choice, Value, operations::join};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let greeting = join([Value::from("hello "), Value::from(Choice::flat(["world"])?)]);
/// assert_eq!(greeting.evaluate(&mut StdRng::seed_from_u64(0))?, Value::from("hello world"));
/// # Ok::<(), choice_rs::ChoiceError>(())
/// ```
pub fn join<I, V>(parts: I) -> Choice
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    JOIN.call(parts)
}

/// Like [`join`], placing `separator` between consecutive parts.
pub fn join_with<I, V>(parts: I, separator: impl Into<Value>) -> Choice
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    JOIN.call_with(parts, [("sep", separator.into())])
}

/// Deferred indefinite article: `"an owl"`, `"a zebra"`.
pub fn article(noun: impl Into<Value>) -> Choice {
    ARTICLE.call([noun.into()])
}

/// Deferred title casing: the first letter of every word upper-cased, the rest
/// lower-cased.
pub fn title_case(phrase: impl Into<Value>) -> Choice {
    TITLE_CASE.call([phrase.into()])
}

/// Deferred lookup: a (possibly negative) position in a sequence or a key in a
/// mapping.
pub fn index(container: impl Into<Value>, key: impl Into<Value>) -> Choice {
    INDEX.call([container.into(), key.into()])
}

/// Deferred membership test: element of a sequence, key of a mapping, or
/// substring of a text.
pub fn contains(container: impl Into<Value>, item: impl Into<Value>) -> Choice {
    CONTAINS.call([container.into(), item.into()])
}
