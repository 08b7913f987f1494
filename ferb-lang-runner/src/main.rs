mod diagnostics;
mod repl;
mod runner;

use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Source file to run. Starts a REPL when neither a file nor `--eval` is given.
    path: Option<PathBuf>,
    /// Run this source text instead of a file
    #[arg(short, long, conflicts_with = "path")]
    eval: Option<String>,
    /// Print the parsed program instead of running it
    #[arg(long)]
    dump_ast: bool,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let (name, source) = match (cli.path, cli.eval) {
        (Some(path), _) => {
            let source = std::fs::read_to_string(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
            (path.display().to_string(), source)
        }
        (None, Some(source)) => ("<eval>".to_string(), source),
        (None, None) => return repl::start().into_diagnostic(),
    };

    runner::execute(&name, &source, cli.dump_ast)
}
