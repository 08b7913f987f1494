use ferb_lang_core::parser::ParseError;
use ferb_lang_interpreter::object::EvaluationError;
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(ferb::syntax))]
pub struct SyntaxDiagnostic {
    #[source_code]
    src: NamedSource,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
    label: String,
}

impl SyntaxDiagnostic {
    pub fn from_error(name: &str, source: &str, error: &ParseError) -> Self {
        // errors without a position point at the end of the input
        let (start, end) = error.span().unwrap_or((source.len(), source.len()));
        let (label, help) = match error {
            ParseError::PrematureEndOfInput { expected } => (
                format!("expected {}", expected),
                Some("the input ended in the middle of a statement".to_string()),
            ),
            ParseError::UnexpectedToken { expected, .. } => (format!("expected {}", expected), None),
            ParseError::NoPrefixFunction(_) => ("expected an expression".to_string(), None),
            ParseError::InvalidPattern(_) => (
                "not a pattern".to_string(),
                Some("patterns are literals, names or `_`".to_string()),
            ),
            ParseError::ParseIntError(_) | ParseError::ParseFloatError(_) => {
                ("here".to_string(), None)
            }
            ParseError::Lex { error, .. } => (error.to_string(), None),
        };

        Self {
            src: NamedSource::new(name, source.to_string()),
            span: (start, end - start).into(),
            help,
            message: error.to_string(),
            label,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("Runtime error: {message}")]
#[diagnostic(code(ferb::runtime))]
pub struct RuntimeDiagnostic {
    message: String,
}

pub fn syntax_report(name: &str, source: &str, error: &ParseError) -> Report {
    Report::new(SyntaxDiagnostic::from_error(name, source, error))
}

pub fn runtime_report(error: &EvaluationError) -> Report {
    Report::new(RuntimeDiagnostic {
        message: error.to_string(),
    })
}
