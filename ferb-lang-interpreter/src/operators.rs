use ferb_lang_core::ast::{ComparisonKind, InfixOperationKind, PrefixOperationKind};
use ferb_lang_core::lexer::Keyword;

use crate::object::{EvaluationError, Value};
use crate::thunk::Thunk;

fn prefix_name(kind: PrefixOperationKind) -> &'static str {
    match kind {
        PrefixOperationKind::Plus => "+",
        PrefixOperationKind::Minus => "-",
        PrefixOperationKind::Not => Keyword::Not.spelling(),
        PrefixOperationKind::Increment => "++",
        PrefixOperationKind::Decrement => "--",
    }
}

fn mismatch(operation: &'static str, expected: &'static str, found: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation,
        expected,
        found: found.type_name(),
    }
}

pub fn prefix(kind: PrefixOperationKind, value: Value) -> Result<Value, EvaluationError> {
    let operation = prefix_name(kind);
    match (kind, value) {
        (PrefixOperationKind::Not, Value::Boolean(value)) => Ok(Value::Boolean(!value)),
        (PrefixOperationKind::Not, other) => Err(mismatch(operation, "boolean", &other)),
        (PrefixOperationKind::Plus, value @ (Value::Integer(_) | Value::Float(_))) => Ok(value),
        (PrefixOperationKind::Minus, Value::Integer(value)) => value
            .checked_neg()
            .map(Value::Integer)
            .ok_or(EvaluationError::IntegerOverflow),
        (PrefixOperationKind::Minus, Value::Float(value)) => Ok(Value::Float(-value)),
        (PrefixOperationKind::Increment, value) => step(operation, value, 1),
        (PrefixOperationKind::Decrement, value) => step(operation, value, -1),
        (_, other) => Err(mismatch(operation, "number", &other)),
    }
}

fn step(operation: &'static str, value: Value, delta: i64) -> Result<Value, EvaluationError> {
    match value {
        Value::Integer(value) => value
            .checked_add(delta)
            .map(Value::Integer)
            .ok_or(EvaluationError::IntegerOverflow),
        Value::Float(value) => Ok(Value::Float(value + delta as f64)),
        other => Err(mismatch(operation, "number", &other)),
    }
}

fn as_float(operation: &'static str, value: &Value) -> Result<f64, EvaluationError> {
    match value {
        Value::Integer(value) => Ok(*value as f64),
        Value::Float(value) => Ok(*value),
        other => Err(mismatch(operation, "number", other)),
    }
}

fn arithmetic(
    operation: &'static str,
    left: &Value,
    right: &Value,
    integer: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Result<Value, EvaluationError> {
    match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => integer(*left, *right)
            .map(Value::Integer)
            .ok_or(EvaluationError::IntegerOverflow),
        _ => Ok(Value::Float(float(
            as_float(operation, left)?,
            as_float(operation, right)?,
        ))),
    }
}

fn divide(left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    let left = as_float("/", left)?;
    let right = as_float("/", right)?;
    if right == 0.0 {
        return Err(EvaluationError::DivisionByZero);
    }
    Ok(Value::Float(left / right))
}

/// Integer remainder taking the sign of the divisor.
fn modulo(left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    let (left, right) = match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => (*left, *right),
        (Value::Integer(_), other) | (other, _) => return Err(mismatch("%", "integer", other)),
    };
    if right == 0 {
        return Err(EvaluationError::ModuloByZero);
    }
    let remainder = left
        .checked_rem(right)
        .ok_or(EvaluationError::IntegerOverflow)?;
    if remainder != 0 && (remainder < 0) != (right < 0) {
        Ok(Value::Integer(remainder + right))
    } else {
        Ok(Value::Integer(remainder))
    }
}

fn logical(kind: InfixOperationKind, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    let operation = kind.to_str();
    match (left, right) {
        (Value::Boolean(left), Value::Boolean(right)) => Ok(Value::Boolean(
            if kind == InfixOperationKind::And {
                *left && *right
            } else {
                *left || *right
            },
        )),
        (Value::Boolean(_), other) | (other, _) => Err(mismatch(operation, "boolean", other)),
    }
}

pub fn infix(kind: InfixOperationKind, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    match kind {
        InfixOperationKind::Plus => arithmetic("+", left, right, i64::checked_add, |a, b| a + b),
        InfixOperationKind::Minus => arithmetic("-", left, right, i64::checked_sub, |a, b| a - b),
        InfixOperationKind::Multiply => {
            arithmetic("*", left, right, i64::checked_mul, |a, b| a * b)
        }
        InfixOperationKind::Divide => divide(left, right),
        InfixOperationKind::Modulo => modulo(left, right),
        InfixOperationKind::And | InfixOperationKind::Or => logical(kind, left, right),
    }
}

/// Structural equality. Integers and floats compare by numeric value; values
/// of different kinds are never equal. List elements are forced left to right,
/// only as far as the first difference.
pub fn equal(left: &Value, right: &Value) -> Result<bool, EvaluationError> {
    let mut pending = vec![(Thunk::forced(left.clone()), Thunk::forced(right.clone()))];

    while let Some((left, right)) = pending.pop() {
        let (left, right) = (left.force()?, right.force()?);
        let same = match (&left, &right) {
            (Value::Integer(left), Value::Integer(right)) => left == right,
            (Value::Float(left), Value::Float(right)) => left == right,
            (Value::Integer(integer), Value::Float(float))
            | (Value::Float(float), Value::Integer(integer)) => *integer as f64 == *float,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::List(left), Value::List(right)) => {
                if left.len() == right.len() {
                    pending.extend(left.iter().cloned().zip(right.iter().cloned()).rev());
                    true
                } else {
                    false
                }
            }
            (Value::Record(left), Value::Record(right)) => {
                let same_shape = left.type_name == right.type_name
                    && left.fields.len() == right.fields.len()
                    && left
                        .fields
                        .iter()
                        .zip(&right.fields)
                        .all(|((left, _), (right, _))| left == right);
                if same_shape {
                    pending.extend(
                        left.fields
                            .iter()
                            .zip(&right.fields)
                            .map(|((_, left), (_, right))| {
                                (Thunk::forced(left.clone()), Thunk::forced(right.clone()))
                            })
                            .rev(),
                    );
                }
                same_shape
            }
            _ => false,
        };
        if !same {
            return Ok(false);
        }
    }

    Ok(true)
}

pub fn compare(kind: ComparisonKind, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    let operation = kind.to_str();
    let result = match kind {
        ComparisonKind::Equal => equal(left, right)?,
        ComparisonKind::NotEqual => !equal(left, right)?,
        ComparisonKind::LessThan | ComparisonKind::GreaterThan => {
            let ordering = match (left, right) {
                (Value::Integer(left), Value::Integer(right)) => left.partial_cmp(right),
                (Value::Float(left), Value::Float(right)) => left.partial_cmp(right),
                _ if left.type_name() != right.type_name() => {
                    return Err(mismatch(operation, left.type_name(), right))
                }
                _ => return Err(mismatch(operation, "number", left)),
            };
            let expected = if kind == ComparisonKind::LessThan {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            };
            ordering == Some(expected)
        }
    };
    Ok(Value::Boolean(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        use InfixOperationKind::*;
        use Value::*;

        let tests = vec![
            (Plus, Integer(2), Integer(3), Ok(Integer(5))),
            (Plus, Integer(2), Float(0.5), Ok(Float(2.5))),
            (Minus, Float(1.0), Integer(3), Ok(Float(-2.0))),
            (Multiply, Integer(4), Integer(-2), Ok(Integer(-8))),
            (Divide, Integer(7), Integer(2), Ok(Float(3.5))),
            (Divide, Integer(6), Integer(3), Ok(Float(2.0))),
            (Divide, Integer(1), Integer(0), Err(EvaluationError::DivisionByZero)),
            (Divide, Float(1.0), Float(0.0), Err(EvaluationError::DivisionByZero)),
            (Modulo, Integer(7), Integer(3), Ok(Integer(1))),
            (Modulo, Integer(-7), Integer(3), Ok(Integer(2))),
            (Modulo, Integer(7), Integer(-3), Ok(Integer(-2))),
            (Modulo, Integer(7), Integer(0), Err(EvaluationError::ModuloByZero)),
            (
                Modulo,
                Float(7.0),
                Integer(2),
                Err(EvaluationError::TypeMismatch {
                    operation: "%",
                    expected: "integer",
                    found: "float",
                }),
            ),
            (
                Plus,
                Integer(i64::MAX),
                Integer(1),
                Err(EvaluationError::IntegerOverflow),
            ),
            (
                Plus,
                Integer(1),
                Boolean(true),
                Err(EvaluationError::TypeMismatch {
                    operation: "+",
                    expected: "number",
                    found: "boolean",
                }),
            ),
            (
                Minus,
                String("a".into()),
                Integer(1),
                Err(EvaluationError::TypeMismatch {
                    operation: "-",
                    expected: "number",
                    found: "string",
                }),
            ),
        ];

        for (kind, left, right, expected) in tests {
            assert_eq!(infix(kind, &left, &right), expected, "{} {:?} {}", left, kind, right);
        }
    }

    #[test]
    fn test_prefix() {
        use PrefixOperationKind::*;
        use Value::*;

        let tests = vec![
            (Minus, Integer(5), Ok(Integer(-5))),
            (Minus, Float(1.5), Ok(Float(-1.5))),
            (Plus, Float(1.5), Ok(Float(1.5))),
            (Not, Boolean(false), Ok(Boolean(true))),
            (Increment, Integer(1), Ok(Integer(2))),
            (Decrement, Float(1.5), Ok(Float(0.5))),
            (
                Not,
                Integer(0),
                Err(EvaluationError::TypeMismatch {
                    operation: "otnerb",
                    expected: "boolean",
                    found: "integer",
                }),
            ),
            (
                Minus,
                Boolean(true),
                Err(EvaluationError::TypeMismatch {
                    operation: "-",
                    expected: "number",
                    found: "boolean",
                }),
            ),
            (Minus, Integer(i64::MIN), Err(EvaluationError::IntegerOverflow)),
        ];

        for (kind, value, expected) in tests {
            assert_eq!(prefix(kind, value), expected);
        }
    }

    #[test]
    fn test_comparisons() {
        use ComparisonKind::*;
        use Value::*;

        let tests = vec![
            (LessThan, Integer(1), Integer(2), Ok(Boolean(true))),
            (GreaterThan, Float(1.0), Float(2.0), Ok(Boolean(false))),
            (Equal, Integer(1), Float(1.0), Ok(Boolean(true))),
            (Equal, Integer(1), Boolean(true), Ok(Boolean(false))),
            (NotEqual, String("a".into()), String("b".into()), Ok(Boolean(true))),
            (
                LessThan,
                Integer(1),
                Float(2.0),
                Err(EvaluationError::TypeMismatch {
                    operation: "<",
                    expected: "integer",
                    found: "float",
                }),
            ),
            (
                GreaterThan,
                Boolean(true),
                Boolean(false),
                Err(EvaluationError::TypeMismatch {
                    operation: ">",
                    expected: "number",
                    found: "boolean",
                }),
            ),
            (
                LessThan,
                String("a".into()),
                String("b".into()),
                Err(EvaluationError::TypeMismatch {
                    operation: "<",
                    expected: "number",
                    found: "string",
                }),
            ),
        ];

        for (kind, left, right, expected) in tests {
            assert_eq!(compare(kind, &left, &right), expected);
        }
    }
}
