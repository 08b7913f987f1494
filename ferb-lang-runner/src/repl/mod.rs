mod evaluator;
mod printer;
mod reader;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use evaluator::Evaluator;
use printer::Printer;
use reader::{ReadOutput, Reader};

struct Repl {
    reader: Reader,
    evaluator: Evaluator,
    printer: Printer,
}

impl Repl {
    fn run(mut self) {
        loop {
            match self.reader.read() {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Value(program) => {
                    let result = self.evaluator.evaluate(program);
                    self.printer.print(result)
                }
            }
        }
    }
}

pub fn start() -> Result<(), ReadlineError> {
    let rl = DefaultEditor::new()?;

    Repl {
        reader: Reader::new(rl),
        evaluator: Evaluator::new(),
        printer: Printer {},
    }
    .run();
    Ok(())
}
