use ferb_lang_core::parser;
use ferb_lang_interpreter::output::Stdout;
use ferb_lang_interpreter::{self as interpreter, Error};

use crate::diagnostics;

pub fn execute(name: &str, source: &str, dump_ast: bool) -> miette::Result<()> {
    if dump_ast {
        let program = parser::parse(source)
            .map_err(|error| diagnostics::syntax_report(name, source, &error))?;
        print!("{}", program);
        return Ok(());
    }

    interpreter::execute(source, Stdout).map_err(|error| match error {
        Error::Parse(error) => diagnostics::syntax_report(name, source, &error),
        Error::Evaluation(error) => diagnostics::runtime_report(&error),
    })
}
