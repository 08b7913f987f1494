pub mod error;
pub mod expressions;
pub mod pattern_matching;
pub mod statements;

use crate::ast::Program;
use crate::lexer::{Keyword, Token, TokenKind, Tokenizer};
pub use error::{Expected, ParseError};
use statements::parse_statement;

pub struct Parser<'a> {
    pub iter: std::iter::Peekable<Tokenizer<'a>>,
}

/// Parses a whole source text, stopping at the first error.
pub fn parse(input: &str) -> Result<Program, ParseError> {
    Parser::new(Tokenizer::new(input)).parse_program()
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: Tokenizer<'a>) -> Self {
        let iter = tokenizer.peekable();
        Self { iter }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<std::rc::Rc<str>, ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(ParseError::unexpected_other(Expected::Identifier, token)),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token { kind, .. }) if kind == token_kind => Ok(()),
            _ => Err(ParseError::unexpected_token(token_kind, token)),
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        self.expect_token(TokenKind::Keyword(keyword))
    }

    pub(crate) fn peek_kind(&mut self) -> Option<&TokenKind> {
        self.iter.peek().map(|token| &token.kind)
    }

    pub(crate) fn peek_keyword(&mut self, keyword: Keyword) -> bool {
        self.peek_kind() == Some(&TokenKind::Keyword(keyword))
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self
            .iter
            .next_if(|token| token.kind == TokenKind::Newline)
            .is_some()
        {}
    }

    /// A statement must be followed by a line break, the end of input or a
    /// keyword closing the enclosing block.
    pub(crate) fn expect_statement_end(&mut self) -> Result<(), ParseError> {
        match self.iter.peek() {
            None
            | Some(Token {
                kind:
                    TokenKind::Newline
                    | TokenKind::Keyword(Keyword::End | Keyword::Else | Keyword::Elif | Keyword::Case),
                ..
            }) => Ok(()),
            Some(token) => Err(ParseError::unexpected_other(
                Expected::StatementEnd,
                Some(token.clone()),
            )),
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if self.iter.peek().is_none() {
                break;
            }
            statements.push(parse_statement(self)?);
            self.expect_statement_end()?;
        }

        Ok(Program { statements })
    }
}
