use ferb_lang_interpreter::object::{EvaluationError, Value};

use crate::diagnostics;

pub struct Printer {}

impl Printer {
    pub fn print(&mut self, result: Result<Option<Value>, EvaluationError>) {
        match result {
            Ok(Some(value)) => println!("{}", value),
            Ok(None) => {}
            Err(err) => eprintln!("{:?}", diagnostics::runtime_report(&err)),
        }
    }
}
