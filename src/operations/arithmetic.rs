use super::Number;
use crate::choice::Choice;
use crate::deferred::{Arguments, Combinator, delayed};
use crate::error::{ChoiceError, Result};
use crate::value::{Scalar, Value};
use std::sync::LazyLock;

/// Binary operation types for deferred arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperation {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

static BINARY: LazyLock<[Combinator; 5]> =
    LazyLock::new(|| BinaryOperation::ALL.map(BinaryOperation::build));

impl BinaryOperation {
    pub const ALL: [BinaryOperation; 5] = [
        BinaryOperation::Add,
        BinaryOperation::Sub,
        BinaryOperation::Mul,
        BinaryOperation::Div,
        BinaryOperation::Rem,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BinaryOperation::Add => "add",
            BinaryOperation::Sub => "sub",
            BinaryOperation::Mul => "mul",
            BinaryOperation::Div => "div",
            BinaryOperation::Rem => "rem",
        }
    }

    /// The shared combinator recording this operation.
    #[must_use]
    pub fn combinator(self) -> Combinator {
        BINARY[self as usize].clone()
    }

    fn build(self) -> Combinator {
        delayed(self.name(), move |args: Arguments| {
            let [left, right] = args.exactly::<2>(self.name())?;
            self.apply(&left, &right)
        })
    }

    /// Applies the operation to two resolved values.
    ///
    /// Integers stay integers except under `Div`, which always divides as floats;
    /// mixing an integer with a float promotes to float. `Add` also concatenates
    /// text and sequences.
    ///
    /// # Errors
    /// Returns [`ChoiceError::Combinator`] for unsupported operand types, integer
    /// overflow, or an integer remainder by zero.
    pub fn apply(self, left: &Value, right: &Value) -> Result<Value> {
        if self == BinaryOperation::Add {
            match (left, right) {
                (Value::Scalar(Scalar::Text(a)), Value::Scalar(Scalar::Text(b))) => {
                    return Ok(Value::from(format!("{a}{b}")));
                }
                (Value::Seq(a), Value::Seq(b)) => {
                    return Ok(Value::Seq(a.iter().chain(b).cloned().collect()));
                }
                _ => {}
            }
        }

        let a = Number::from_value(self.name(), left)?;
        let b = Number::from_value(self.name(), right)?;
        let result = match (a, b) {
            (Number::Int(a), Number::Int(b)) => self.apply_int(a, b)?,
            (a, b) => Number::Float(self.apply_float(a.as_f64(), b.as_f64())),
        };
        Ok(result.into())
    }

    fn apply_int(self, a: i64, b: i64) -> Result<Number> {
        let checked = match self {
            BinaryOperation::Add => a.checked_add(b),
            BinaryOperation::Sub => a.checked_sub(b),
            BinaryOperation::Mul => a.checked_mul(b),
            BinaryOperation::Rem => a.checked_rem(b),
            BinaryOperation::Div => {
                let quotient = self.apply_float(Number::Int(a).as_f64(), Number::Int(b).as_f64());
                return Ok(Number::Float(quotient));
            }
        };
        checked.map(Number::Int).ok_or_else(|| {
            ChoiceError::combinator(
                self.name(),
                format!("integer overflow or division by zero on {a} and {b}"),
            )
        })
    }

    fn apply_float(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOperation::Add => a + b,
            BinaryOperation::Sub => a - b,
            BinaryOperation::Mul => a * b,
            BinaryOperation::Div => a / b,
            BinaryOperation::Rem => a % b,
        }
    }
}

/// Unary operation types for deferred arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperation {
    Neg,
    Abs,
}

static UNARY: LazyLock<[Combinator; 2]> =
    LazyLock::new(|| [UnaryOperation::Neg.build(), UnaryOperation::Abs.build()]);

impl UnaryOperation {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            UnaryOperation::Neg => "neg",
            UnaryOperation::Abs => "abs",
        }
    }

    #[must_use]
    pub fn combinator(self) -> Combinator {
        UNARY[self as usize].clone()
    }

    fn build(self) -> Combinator {
        delayed(self.name(), move |args: Arguments| {
            let [operand] = args.exactly::<1>(self.name())?;
            self.apply(&operand)
        })
    }

    /// Applies the operation to a resolved value.
    ///
    /// # Errors
    /// Returns [`ChoiceError::Combinator`] for a non-numeric operand or on overflow.
    pub fn apply(self, operand: &Value) -> Result<Value> {
        let overflow = || ChoiceError::combinator(self.name(), "integer overflow");
        let result = match (self, Number::from_value(self.name(), operand)?) {
            (UnaryOperation::Neg, Number::Int(i)) => {
                Number::Int(i.checked_neg().ok_or_else(overflow)?)
            }
            (UnaryOperation::Abs, Number::Int(i)) => {
                Number::Int(i.checked_abs().ok_or_else(overflow)?)
            }
            (UnaryOperation::Neg, Number::Float(f)) => Number::Float(-f),
            (UnaryOperation::Abs, Number::Float(f)) => Number::Float(f.abs()),
        };
        Ok(result.into())
    }
}

fn binary(op: BinaryOperation, left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    op.combinator().call([left.into(), right.into()])
}

/// Deferred `left + right`; also concatenates text and sequences.
///
/// # Example
/// ```rust
/// use choice_rs::{Choice, Value, operations::add};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let total = add(Choice::solo(1), 5);
/// assert_eq!(total.to_string(), "of(weighted(1, add(of(weighted(1, 1)), 5)))");
/// assert_eq!(total.evaluate(&mut StdRng::seed_from_u64(0))?, Value::from(6));
/// # Ok::<(), choice_rs::ChoiceError>(())
/// ```
pub fn add(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    binary(BinaryOperation::Add, left, right)
}

/// Deferred `left - right`.
pub fn sub(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    binary(BinaryOperation::Sub, left, right)
}

/// Deferred `left * right`.
pub fn mul(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    binary(BinaryOperation::Mul, left, right)
}

/// Deferred true division; the result is always a float.
pub fn div(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    binary(BinaryOperation::Div, left, right)
}

/// Deferred `left % right`.
pub fn rem(left: impl Into<Value>, right: impl Into<Value>) -> Choice {
    binary(BinaryOperation::Rem, left, right)
}

/// Deferred `-operand`.
pub fn negate(operand: impl Into<Value>) -> Choice {
    UnaryOperation::Neg.combinator().call([operand.into()])
}

/// Deferred `|operand|`.
pub fn abs(operand: impl Into<Value>) -> Choice {
    UnaryOperation::Abs.combinator().call([operand.into()])
}
