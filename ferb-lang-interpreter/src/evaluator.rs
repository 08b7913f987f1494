use std::rc::Rc;

use ferb_lang_core::ast::{self, Expression, Literal, Number, Pattern, PrefixOperationKind};

use crate::environment::{Environment, RecordRegistry};
use crate::object::{EvaluationError, Record, Value};
use crate::operators;
use crate::output::Output;
use crate::thunk::{Step, Thunk};

/// Mutable state of one program run.
pub struct Context {
    pub environment: Environment,
    pub records: RecordRegistry,
    pub output: Box<dyn Output>,
}

impl Context {
    pub fn new(output: impl Output + 'static) -> Self {
        Context {
            environment: Environment::new(),
            records: RecordRegistry::new(),
            output: Box::new(output),
        }
    }
}

/// Runs every statement in order and returns the result of the last one.
pub fn eval_program(
    program: &ast::Program,
    context: &mut Context,
) -> Result<Option<Thunk>, EvaluationError> {
    let mut result = None;
    for statement in &program.statements {
        result = eval_statement(statement, context)?;
    }
    Ok(result)
}

fn eval_statement(
    statement: &ast::Statement,
    context: &mut Context,
) -> Result<Option<Thunk>, EvaluationError> {
    match statement {
        ast::Statement::Assignment(statement) => {
            let value = eval_expression(&statement.value, &mut context.environment, &context.records)?;
            context
                .environment
                .set(statement.identifier.name.clone(), value);
            Ok(None)
        }
        ast::Statement::Print(expression) => {
            let value = eval_expression(expression, &mut context.environment, &context.records)?
                .force_deep()?;
            context.output.print(&value);
            Ok(Some(Thunk::forced(value)))
        }
        ast::Statement::If(statement) => eval_if_statement(statement, context),
        ast::Statement::For(statement) => eval_for_statement(statement, context),
        ast::Statement::Match(statement) => eval_match_statement(statement, context),
        ast::Statement::RecordDefinition(definition) => {
            let fields = definition
                .fields
                .iter()
                .map(|field| field.name.clone())
                .collect();
            context.records.define(definition.name.name.clone(), fields)?;
            Ok(None)
        }
        ast::Statement::Expression(expression) => Ok(Some(eval_expression(
            expression,
            &mut context.environment,
            &context.records,
        )?)),
    }
}

fn eval_block(block: &ast::Block, context: &mut Context) -> Result<Option<Thunk>, EvaluationError> {
    let mut result = None;
    for statement in &block.statements {
        result = eval_statement(statement, context)?;
    }
    Ok(result)
}

fn eval_if_statement(
    statement: &ast::IfStatement,
    context: &mut Context,
) -> Result<Option<Thunk>, EvaluationError> {
    let condition =
        eval_expression(&statement.condition, &mut context.environment, &context.records)?
            .force()?;
    if condition.is_truthy() {
        eval_block(&statement.consequence, context)
    } else if let Some(alternative) = &statement.alternative {
        eval_block(alternative, context)
    } else {
        Ok(None)
    }
}

fn eval_for_statement(
    statement: &ast::ForStatement,
    context: &mut Context,
) -> Result<Option<Thunk>, EvaluationError> {
    let iterable =
        eval_expression(&statement.iterable, &mut context.environment, &context.records)?
            .force()?;
    let Value::List(elements) = iterable else {
        return Err(EvaluationError::TypeMismatch {
            operation: "orferb",
            expected: "list",
            found: iterable.type_name(),
        });
    };

    let mut result = None;
    for element in elements.iter() {
        context
            .environment
            .set(statement.variable.name.clone(), Thunk::alias(element.clone()));
        result = eval_block(&statement.body, context)?;
    }
    Ok(result)
}

fn eval_match_statement(
    statement: &ast::MatchStatement,
    context: &mut Context,
) -> Result<Option<Thunk>, EvaluationError> {
    let value =
        eval_expression(&statement.scrutinee, &mut context.environment, &context.records)?
            .force()?;

    for case in &statement.cases {
        if let MatchResult::Match(bindings) = case.pattern.matches(&value) {
            let snapshot = context.environment.clone();
            for (name, value) in bindings {
                context.environment.set(name, Thunk::forced(value));
            }
            let result = eval_block(&case.body, context);
            context.environment = snapshot;
            return result;
        }
    }

    match &statement.alternative {
        Some(alternative) => eval_block(alternative, context),
        None => Err(EvaluationError::NoPatternMatched(
            Thunk::forced(value).force_deep()?.to_string(),
        )),
    }
}

/// Builds the thunk computing `expression`.
///
/// Names are resolved against `environment` right away, so the result keeps
/// seeing the bindings as they are now. Nothing is computed until the thunk
/// is forced, except `++`/`--` which update `environment` immediately, also
/// inside an operand of `ndaerb`/`or` that ends up never being forced.
pub fn eval_expression(
    expression: &Expression,
    environment: &mut Environment,
    records: &RecordRegistry,
) -> Result<Thunk, EvaluationError> {
    match expression {
        Expression::NumberLiteral(Number::Integer(value)) => {
            Ok(Thunk::forced(Value::Integer(*value)))
        }
        Expression::NumberLiteral(Number::Float(value)) => Ok(Thunk::forced(Value::Float(*value))),
        Expression::StringLiteral(value) => Ok(Thunk::forced(Value::String(value.clone()))),
        Expression::BooleanLiteral(value) => Ok(Thunk::forced(Value::Boolean(*value))),
        Expression::Identifier(identifier) => Ok(match environment.get(&identifier.name) {
            Some(thunk) => thunk,
            None => {
                let name = identifier.name.clone();
                Thunk::lazy(move || Err(EvaluationError::UndefinedVariable(name)))
            }
        }),
        Expression::ArrayLiteral(elements) => {
            let elements = elements
                .iter()
                .map(|element| eval_expression(element, environment, records))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Thunk::forced(Value::list(elements)))
        }
        Expression::Index { collection, index } => {
            let collection = eval_expression(collection, environment, records)?;
            let index = eval_expression(index, environment, records)?;
            Ok(Thunk::zip(collection, index, eval_index))
        }
        Expression::New {
            type_name,
            arguments,
        } => {
            let arguments = arguments
                .iter()
                .map(|argument| eval_expression(argument, environment, records))
                .collect::<Result<Vec<_>, _>>()?;
            let type_name = type_name.name.clone();
            let Some(fields) = records.fields(&type_name) else {
                return Ok(Thunk::lazy(move || {
                    Err(EvaluationError::UnknownRecordType(type_name))
                }));
            };
            Ok(Thunk::suspend(arguments, move |values| {
                eval_new(type_name, &fields, values)
            }))
        }
        Expression::AttributeAccess { object, field } => {
            let object = eval_expression(object, environment, records)?;
            let field = field.name.clone();
            Ok(Thunk::then(object, move |value| eval_attribute(value, field)))
        }
        Expression::PrefixOperation(
            kind @ (PrefixOperationKind::Increment | PrefixOperationKind::Decrement),
            operand,
        ) => eval_increment(*kind, operand, environment),
        Expression::PrefixOperation(kind, operand) => {
            let kind = *kind;
            let operand = eval_expression(operand, environment, records)?;
            Ok(Thunk::then(operand, move |value| {
                Ok(Step::Done(operators::prefix(kind, value)?))
            }))
        }
        Expression::InfixOperation(
            kind @ (ast::InfixOperationKind::And | ast::InfixOperationKind::Or),
            left,
            right,
        ) => {
            let left = eval_expression(left, environment, records)?;
            let right = eval_expression(right, environment, records)?;
            Ok(eval_short_circuit(*kind, left, right))
        }
        Expression::InfixOperation(kind, left, right) => {
            let kind = *kind;
            let left = eval_expression(left, environment, records)?;
            let right = eval_expression(right, environment, records)?;
            Ok(Thunk::zip(left, right, move |left, right| {
                Ok(Step::Done(operators::infix(kind, &left, &right)?))
            }))
        }
        Expression::Comparison(kind, left, right) => {
            let kind = *kind;
            let left = eval_expression(left, environment, records)?;
            let right = eval_expression(right, environment, records)?;
            Ok(Thunk::zip(left, right, move |left, right| {
                Ok(Step::Done(operators::compare(kind, &left, &right)?))
            }))
        }
    }
}

fn eval_index(collection: Value, index: Value) -> Result<Step, EvaluationError> {
    let Value::List(elements) = collection else {
        return Err(EvaluationError::TypeMismatch {
            operation: "index",
            expected: "list",
            found: collection.type_name(),
        });
    };
    let Value::Integer(index) = index else {
        return Err(EvaluationError::TypeMismatch {
            operation: "index",
            expected: "integer",
            found: index.type_name(),
        });
    };

    // indices start at 1
    usize::try_from(index)
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|position| elements.get(position))
        .map(|element| Step::Defer(element.clone()))
        .ok_or(EvaluationError::IndexOutOfBounds {
            index,
            length: elements.len(),
        })
}

fn eval_new(
    type_name: Rc<str>,
    fields: &[Rc<str>],
    values: Vec<Value>,
) -> Result<Step, EvaluationError> {
    if values.len() != fields.len() {
        return Err(EvaluationError::ArityMismatch {
            type_name,
            expected: fields.len(),
            actual: values.len(),
        });
    }

    Ok(Step::Done(Value::Record(Rc::new(Record {
        type_name,
        fields: fields.iter().cloned().zip(values).collect(),
    }))))
}

fn eval_attribute(value: Value, field: Rc<str>) -> Result<Step, EvaluationError> {
    let Value::Record(record) = value else {
        return Err(EvaluationError::TypeMismatch {
            operation: "attribute access",
            expected: "record",
            found: value.type_name(),
        });
    };

    match record.get(&field) {
        Some(value) => Ok(Step::Done(value.clone())),
        None => Err(EvaluationError::UnknownAttribute {
            type_name: record.type_name.clone(),
            field,
        }),
    }
}

fn eval_increment(
    kind: PrefixOperationKind,
    operand: &Expression,
    environment: &mut Environment,
) -> Result<Thunk, EvaluationError> {
    let Expression::Identifier(identifier) = operand else {
        return Err(EvaluationError::NotAVariable(operand.to_string()));
    };
    let current = environment
        .get(&identifier.name)
        .ok_or_else(|| EvaluationError::UndefinedVariable(identifier.name.clone()))?
        .force()?;

    let updated = operators::prefix(kind, current)?;
    environment.replace_forced(&identifier.name, updated.clone())?;
    Ok(Thunk::forced(updated))
}

/// `right` is only forced once the left operand has not decided the result.
fn eval_short_circuit(kind: ast::InfixOperationKind, left: Thunk, right: Thunk) -> Thunk {
    Thunk::branch(left, right, move |left, right| {
        match (kind, &left) {
            (ast::InfixOperationKind::And, Value::Boolean(false))
            | (ast::InfixOperationKind::Or, Value::Boolean(true)) => {
                return Ok(Step::Done(left));
            }
            (_, Value::Boolean(_)) => {}
            (_, other) => {
                return Err(EvaluationError::TypeMismatch {
                    operation: kind.to_str(),
                    expected: "boolean",
                    found: other.type_name(),
                })
            }
        }

        Ok(Step::Defer(Thunk::then(right, move |right| {
            Ok(Step::Done(operators::infix(kind, &left, &right)?))
        })))
    })
}

enum MatchResult {
    Match(Vec<(Rc<str>, Value)>),
    NoMatch,
}

trait PatternMatches {
    fn matches(&self, value: &Value) -> MatchResult;
}

impl PatternMatches for Pattern {
    fn matches(&self, value: &Value) -> MatchResult {
        let matched = match (self, value) {
            (Pattern::Wildcard, _) => true,
            (Pattern::Variable(identifier), _) => {
                return MatchResult::Match(vec![(identifier.name.clone(), value.clone())])
            }
            (Pattern::Literal(Literal::Number(Number::Integer(pattern))), Value::Integer(value)) => {
                pattern == value
            }
            (Pattern::Literal(Literal::Number(Number::Float(pattern))), Value::Float(value)) => {
                pattern == value
            }
            (Pattern::Literal(Literal::String(pattern)), Value::String(value)) => pattern == value,
            (Pattern::Literal(Literal::Boolean(pattern)), Value::Boolean(value)) => {
                pattern == value
            }
            _ => false,
        };

        if matched {
            MatchResult::Match(vec![])
        } else {
            MatchResult::NoMatch
        }
    }
}
