use ferb_lang_core::ast::Program;
use ferb_lang_core::parser::{self, ParseError};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::diagnostics;

const PROMPT: &str = ">> ";
const CONTINUATION_PROMPT: &str = ".. ";

pub enum ReadOutput {
    Exit,
    Clear,
    Value(Program),
}

pub struct Reader {
    rl: Editor<(), DefaultHistory>,
}

impl Reader {
    pub fn new(rl: Editor<(), DefaultHistory>) -> Self {
        Self { rl }
    }

    /// Reads lines until they form a complete program.
    pub fn read(&mut self) -> ReadOutput {
        let mut source = String::new();

        loop {
            let prompt = if source.is_empty() {
                PROMPT
            } else {
                CONTINUATION_PROMPT
            };

            match self.rl.readline(prompt) {
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    return ReadOutput::Clear;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    return ReadOutput::Exit;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    return ReadOutput::Exit;
                }
                Ok(line) => {
                    if let Err(err) = self.rl.add_history_entry(&line) {
                        println!("Error: {:?}", err);
                    }
                    source.push_str(&line);
                    source.push('\n');
                }
            }

            match parser::parse(&source) {
                Ok(program) => return ReadOutput::Value(program),
                Err(ParseError::PrematureEndOfInput { .. }) => continue,
                Err(error) => {
                    eprintln!("{:?}", diagnostics::syntax_report("<repl>", &source, &error));
                    return ReadOutput::Clear;
                }
            }
        }
    }
}
