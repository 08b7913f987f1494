use ferb_lang_core::parser::{self, ParseError};
use thiserror::Error;

use crate::evaluator::{eval_program, Context};
use crate::object::EvaluationError;
use crate::output::{Output, Transcript};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Parses and runs `source`, sending every `rintperb` to `output`.
///
/// Lines printed before a failure stay printed.
pub fn execute(source: &str, output: impl Output + 'static) -> Result<(), Error> {
    let program = parser::parse(source)?;
    let mut context = Context::new(output);
    eval_program(&program, &mut context)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub output: Vec<String>,
    pub result: Result<(), Error>,
}

/// Runs `source` with its output captured in memory.
pub fn run(source: &str) -> Execution {
    let transcript = Transcript::new();
    let result = execute(source, transcript.clone());

    Execution {
        output: transcript.lines(),
        result,
    }
}
