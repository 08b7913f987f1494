use ferb_lang_core::ast::{Program, Statement};
use ferb_lang_interpreter::evaluator::{self, Context};
use ferb_lang_interpreter::object::{EvaluationError, Value};
use ferb_lang_interpreter::output::Stdout;

/// Keeps bindings and record types alive between entries.
pub struct Evaluator {
    context: Context,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            context: Context::new(Stdout),
        }
    }

    /// Runs `program`, returning the value of a trailing expression.
    pub fn evaluate(&mut self, program: Program) -> Result<Option<Value>, EvaluationError> {
        let result = evaluator::eval_program(&program, &mut self.context)?;

        match program.statements.last() {
            Some(Statement::Expression(_)) => result.map(|thunk| thunk.force_deep()).transpose(),
            _ => Ok(None),
        }
    }
}
