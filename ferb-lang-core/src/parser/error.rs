use std::fmt::Display;

use thiserror::Error;

use crate::lexer::{LexError, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected end of input, expected {expected}")]
    PrematureEndOfInput { expected: Expected },
    #[error("Expected {expected}, got {}", .got.kind)]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("Invalid integer literal: {0}")]
    ParseIntError(#[from] std::num::ParseIntError),
    #[error("Invalid float literal: {0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),
    #[error("Expected an expression, got {}", .0.kind)]
    NoPrefixFunction(Token),
    #[error("{} cannot be used as a pattern", .0.kind)]
    InvalidPattern(Token),
    #[error("{error}")]
    Lex {
        error: LexError,
        start: usize,
        end: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
    Pattern,
    StatementEnd,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Identifier => write!(f, "an identifier"),
            Expected::Expression => write!(f, "an expression"),
            Expected::Pattern => write!(f, "a pattern"),
            Expected::StatementEnd => write!(f, "end of statement"),
        }
    }
}

impl ParseError {
    pub fn premature_end_expected_expression() -> Self {
        ParseError::PrematureEndOfInput {
            expected: Expected::Expression,
        }
    }

    pub fn unexpected_token(expected: TokenKind, got: Option<Token>) -> ParseError {
        Self::unexpected_other(Expected::Token(expected), got)
    }

    pub fn unexpected_other(expected: Expected, got: Option<Token>) -> ParseError {
        match got {
            Some(Token {
                kind: TokenKind::Illegal(error),
                start,
                end,
            }) => ParseError::Lex { error, start, end },
            Some(got) => ParseError::UnexpectedToken { expected, got },
            None => ParseError::PrematureEndOfInput { expected },
        }
    }

    /// Byte range of the offending source text, when the error has one.
    pub fn span(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::UnexpectedToken { got, .. } => Some((got.start, got.end)),
            ParseError::NoPrefixFunction(token) | ParseError::InvalidPattern(token) => {
                Some((token.start, token.end))
            }
            ParseError::Lex { start, end, .. } => Some((*start, *end)),
            ParseError::PrematureEndOfInput { .. }
            | ParseError::ParseIntError(_)
            | ParseError::ParseFloatError(_) => None,
        }
    }
}
