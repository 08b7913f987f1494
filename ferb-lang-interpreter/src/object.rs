use std::fmt::Display;
use std::rc::Rc;

use ferb_lang_core::lexer::boolean_spelling;
use thiserror::Error;

use crate::thunk::{self, Thunk};

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Boolean(bool),
    List(Rc<Vec<Thunk>>),
    Record(Rc<Record>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Record {
    pub type_name: Rc<str>,
    pub fields: Vec<(Rc<str>, Value)>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| &**name == field)
            .map(|(_, value)| value)
    }
}

impl Drop for Record {
    fn drop(&mut self) {
        let values = std::mem::take(&mut self.fields)
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        thunk::dismantle(Vec::new(), values);
    }
}

impl Value {
    pub fn list(elements: Vec<Thunk>) -> Value {
        Value::List(Rc::new(elements))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Zero, `""`, `[]` and false are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::String(value) => !value.is_empty(),
            Value::Boolean(value) => *value,
            Value::List(elements) => !elements.is_empty(),
            Value::Record(_) => true,
        }
    }
}

/// Pieces still to be written while rendering a value.
enum Fragment {
    Text(&'static str),
    Field(Rc<str>),
    Unforced,
    Value { value: Value, nested: bool },
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pending = vec![Fragment::Value {
            value: self.clone(),
            nested: false,
        }];

        while let Some(fragment) = pending.pop() {
            let (value, nested) = match fragment {
                Fragment::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Fragment::Field(name) => {
                    write!(f, "{}: ", name)?;
                    continue;
                }
                Fragment::Unforced => {
                    f.write_str("<unforced>")?;
                    continue;
                }
                Fragment::Value { value, nested } => (value, nested),
            };

            match value {
                Value::Integer(value) => write!(f, "{}", value)?,
                Value::Float(value) => write!(f, "{:?}", value)?,
                Value::String(value) if nested => write!(f, "\"{}\"", value)?,
                Value::String(value) => f.write_str(&value)?,
                Value::Boolean(value) => f.write_str(boolean_spelling(value))?,
                Value::List(elements) => {
                    f.write_str("[")?;
                    pending.push(Fragment::Text("]"));
                    for (i, element) in elements.iter().enumerate().rev() {
                        pending.push(match element.peek() {
                            Some(value) => Fragment::Value {
                                value,
                                nested: true,
                            },
                            None => Fragment::Unforced,
                        });
                        if i > 0 {
                            pending.push(Fragment::Text(", "));
                        }
                    }
                }
                Value::Record(record) => {
                    write!(f, "{} {{", record.type_name)?;
                    pending.push(Fragment::Text(if record.fields.is_empty() {
                        "}"
                    } else {
                        " }"
                    }));
                    for (i, (name, value)) in record.fields.iter().enumerate().rev() {
                        pending.push(Fragment::Value {
                            value: value.clone(),
                            nested: true,
                        });
                        pending.push(Fragment::Field(name.clone()));
                        pending.push(Fragment::Text(if i > 0 { ", " } else { " " }));
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Undefined variable `{0}`")]
    UndefinedVariable(Rc<str>),
    #[error("Type mismatch for `{operation}`: expected {expected}, found {found}")]
    TypeMismatch {
        operation: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulo by zero")]
    ModuloByZero,
    #[error("Index {index} out of bounds for a list of length {length} (indices start at 1)")]
    IndexOutOfBounds { index: i64, length: usize },
    #[error("Unknown attribute `{field}` on {type_name}")]
    UnknownAttribute { type_name: Rc<str>, field: Rc<str> },
    #[error("Unknown record type `{0}`")]
    UnknownRecordType(Rc<str>),
    #[error("{type_name} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        type_name: Rc<str>,
        expected: usize,
        actual: usize,
    },
    #[error("Record type `{0}` is already defined")]
    DuplicateRecordDefinition(Rc<str>),
    #[error("No pattern matched value {0}")]
    NoPatternMatched(String),
    #[error("Integer overflow")]
    IntegerOverflow,
    #[error("`{0}` is not a variable")]
    NotAVariable(String),
    #[error("Value depends on itself")]
    ReentrantForce,
}
