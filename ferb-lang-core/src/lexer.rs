use std::fmt::Display;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Keyword {
    Print,
    If,
    Then,
    Elif,
    Else,
    End,
    For,
    In,
    Match,
    Case,
    Thing,
    Arg,
    New,
    And,
    Or,
    Not,
    Let,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf::phf_map! {
    "rintperb" => Keyword::Print,
    "if" => Keyword::If,
    "henterb" => Keyword::Then,
    "utifberb" => Keyword::Elif,
    "lseerb" => Keyword::Else,
    "ndeerb" => Keyword::End,
    "orferb" => Keyword::For,
    "in" => Keyword::In,
    "atchmerb" => Keyword::Match,
    "asecerb" => Keyword::Case,
    "hingterb" => Keyword::Thing,
    "rgaerb" => Keyword::Arg,
    "ewnerb" => Keyword::New,
    "ndaerb" => Keyword::And,
    "or" => Keyword::Or,
    "otnerb" => Keyword::Not,
    "let" => Keyword::Let,
};

static BOOLEANS: phf::Map<&'static str, bool> = phf::phf_map! {
    "rueterb" => true,
    "alseferb" => false,
};

impl Keyword {
    pub fn spelling(self) -> &'static str {
        KEYWORDS
            .entries()
            .find(|(_, keyword)| **keyword == self)
            .map(|(spelling, _)| *spelling)
            .unwrap_or("<keyword>")
    }
}

pub fn boolean_spelling(value: bool) -> &'static str {
    BOOLEANS
        .entries()
        .find(|(_, boolean)| **boolean == value)
        .map(|(spelling, _)| *spelling)
        .unwrap_or("<boolean>")
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("Unknown character {0:?}")]
    UnknownCharacter(char),
    #[error("Malformed number literal `{0}`")]
    MalformedNumber(Rc<str>),
    #[error("Unterminated string literal")]
    UnterminatedString,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Illegal(LexError),
    Ident(Rc<str>),
    Int(Rc<str>),
    Float(Rc<str>),
    String(Rc<str>),
    Boolean(bool),
    Keyword(Keyword),

    // Operators
    Assign,
    Plus,
    Increment,
    Minus,
    Decrement,
    Asterisk,
    Slash,
    Percent,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,

    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Newline,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self { input, iter }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.next_idx(),
        }
    }

    /// Consumes `second` if it follows, choosing between a two-character
    /// and a one-character operator.
    fn either(&mut self, second: char, long: TokenKind, short: TokenKind, start: usize) -> Token {
        if self.iter.next_if(|(_, ch)| *ch == second).is_some() {
            self.token(long, start)
        } else {
            self.token(short, start)
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_letter(*ch) || ch.is_ascii_digit())
            .is_some()
        {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        let kind = if let Some(keyword) = KEYWORDS.get(ident) {
            TokenKind::Keyword(*keyword)
        } else if let Some(value) = BOOLEANS.get(ident) {
            TokenKind::Boolean(*value)
        } else {
            TokenKind::Ident(ident.into())
        };
        Token { kind, start, end }
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| ch.is_ascii_digit() || *ch == '.')
            .is_some()
        {}

        let end = self.next_idx();
        let literal = &self.input[start..end];
        let kind = match literal.matches('.').count() {
            0 => TokenKind::Int(literal.into()),
            1 => TokenKind::Float(literal.into()),
            _ => TokenKind::Illegal(LexError::MalformedNumber(literal.into())),
        };
        Token { kind, start, end }
    }

    fn read_string(&mut self, start: usize, quote: char) -> Token {
        loop {
            match self.iter.next() {
                Some((_, ch)) if ch == quote => break,
                None => return self.token(TokenKind::Illegal(LexError::UnterminatedString), start),
                _ => {}
            }
        }

        let end = self.next_idx();
        // strip the quotes
        let string = &self.input[start + 1..end - 1];
        Token {
            kind: TokenKind::String(string.into()),
            start,
            end,
        }
    }

    fn skip_comment(&mut self) {
        while self.iter.next_if(|(_, ch)| *ch != '\n').is_some() {}
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            while self
                .iter
                .next_if(|(_, ch)| ch.is_whitespace() && *ch != '\n')
                .is_some()
            {}

            let (idx, ch) = self.iter.next()?;
            let tok = match ch {
                '\n' => self.token(TokenKind::Newline, idx),
                '^' => {
                    if self.iter.next_if(|(_, ch)| *ch == '^').is_some() {
                        self.skip_comment();
                        continue;
                    }
                    self.token(TokenKind::Illegal(LexError::UnknownCharacter('^')), idx)
                }
                '=' => self.either('=', TokenKind::Equal, TokenKind::Assign, idx),
                '!' => {
                    if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                        self.token(TokenKind::NotEqual, idx)
                    } else {
                        self.token(TokenKind::Illegal(LexError::UnknownCharacter('!')), idx)
                    }
                }
                '+' => self.either('+', TokenKind::Increment, TokenKind::Plus, idx),
                '-' => self.either('-', TokenKind::Decrement, TokenKind::Minus, idx),
                '*' => self.token(TokenKind::Asterisk, idx),
                '/' => self.token(TokenKind::Slash, idx),
                '%' => self.token(TokenKind::Percent, idx),
                '<' => self.token(TokenKind::LessThan, idx),
                '>' => self.token(TokenKind::GreaterThan, idx),
                ',' => self.token(TokenKind::Comma, idx),
                '(' => self.token(TokenKind::LParen, idx),
                ')' => self.token(TokenKind::RParen, idx),
                '[' => self.token(TokenKind::LBracket, idx),
                ']' => self.token(TokenKind::RBracket, idx),
                '.' => {
                    if matches!(self.iter.peek(), Some((_, next)) if next.is_ascii_digit()) {
                        self.read_number(idx)
                    } else {
                        self.token(TokenKind::Dot, idx)
                    }
                }
                '"' | '\'' => self.read_string(idx, ch),
                c if Tokenizer::is_letter(c) => self.read_identifier(idx),
                c if c.is_ascii_digit() => self.read_number(idx),
                _ => self.token(TokenKind::Illegal(LexError::UnknownCharacter(ch)), idx),
            };
            return Some(tok);
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenKind::*;
        match self {
            Illegal(error) => write!(f, "{}", error),
            Ident(name) => write!(f, "identifier `{}`", name),
            Int(val) | Float(val) => write!(f, "number `{}`", val),
            String(val) => write!(f, "string \"{}\"", val),
            Boolean(val) => write!(f, "`{}`", boolean_spelling(*val)),
            Keyword(keyword) => write!(f, "`{}`", keyword.spelling()),
            Assign => write!(f, "`=`"),
            Plus => write!(f, "`+`"),
            Increment => write!(f, "`++`"),
            Minus => write!(f, "`-`"),
            Decrement => write!(f, "`--`"),
            Asterisk => write!(f, "`*`"),
            Slash => write!(f, "`/`"),
            Percent => write!(f, "`%`"),
            Equal => write!(f, "`==`"),
            NotEqual => write!(f, "`!=`"),
            GreaterThan => write!(f, "`>`"),
            LessThan => write!(f, "`<`"),
            Comma => write!(f, "`,`"),
            Dot => write!(f, "`.`"),
            LParen => write!(f, "`(`"),
            RParen => write!(f, "`)`"),
            LBracket => write!(f, "`[`"),
            RBracket => write!(f, "`]`"),
            Newline => write!(f, "line break"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|token| token.kind).collect()
    }

    #[test]
    fn test_operators() {
        let input = "=+(),[]";
        let output = Tokenizer::new(input).collect::<Vec<_>>();

        assert_eq!(
            output,
            vec![
                Token {
                    kind: TokenKind::Assign,
                    start: 0,
                    end: 1
                },
                Token {
                    kind: TokenKind::Plus,
                    start: 1,
                    end: 2
                },
                Token {
                    kind: TokenKind::LParen,
                    start: 2,
                    end: 3
                },
                Token {
                    kind: TokenKind::RParen,
                    start: 3,
                    end: 4
                },
                Token {
                    kind: TokenKind::Comma,
                    start: 4,
                    end: 5
                },
                Token {
                    kind: TokenKind::LBracket,
                    start: 5,
                    end: 6
                },
                Token {
                    kind: TokenKind::RBracket,
                    start: 6,
                    end: 7
                },
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        assert_eq!(
            kinds("== != ++ -- + - * / % < >"),
            vec![
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::Increment,
                TokenKind::Decrement,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Asterisk,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::LessThan,
                TokenKind::GreaterThan,
            ]
        );
    }

    #[test]
    fn test_doubled_signs_are_step_operators() {
        let tests = vec![
            (
                "5--3",
                vec![
                    TokenKind::Int("5".into()),
                    TokenKind::Decrement,
                    TokenKind::Int("3".into()),
                ],
            ),
            (
                "a++b",
                vec![
                    TokenKind::Ident("a".into()),
                    TokenKind::Increment,
                    TokenKind::Ident("b".into()),
                ],
            ),
            (
                "5 - -3",
                vec![
                    TokenKind::Int("5".into()),
                    TokenKind::Minus,
                    TokenKind::Minus,
                    TokenKind::Int("3".into()),
                ],
            ),
            (
                "---",
                vec![TokenKind::Decrement, TokenKind::Minus],
            ),
        ];

        for (input, expected) in tests {
            assert_eq!(kinds(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_program() {
        let input = "hingterb Position
  rgaerb x
ndeerb
pos = ewnerb Position [100, 2.5]
rintperb pos.x";

        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Keyword(Keyword::Thing),
                TokenKind::Ident("Position".into()),
                TokenKind::Newline,
                TokenKind::Keyword(Keyword::Arg),
                TokenKind::Ident("x".into()),
                TokenKind::Newline,
                TokenKind::Keyword(Keyword::End),
                TokenKind::Newline,
                TokenKind::Ident("pos".into()),
                TokenKind::Assign,
                TokenKind::Keyword(Keyword::New),
                TokenKind::Ident("Position".into()),
                TokenKind::LBracket,
                TokenKind::Int("100".into()),
                TokenKind::Comma,
                TokenKind::Float("2.5".into()),
                TokenKind::RBracket,
                TokenKind::Newline,
                TokenKind::Keyword(Keyword::Print),
                TokenKind::Ident("pos".into()),
                TokenKind::Dot,
                TokenKind::Ident("x".into()),
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds("rueterb alseferb \"hi there\" 'single' _private123 .5 7."),
            vec![
                TokenKind::Boolean(true),
                TokenKind::Boolean(false),
                TokenKind::String("hi there".into()),
                TokenKind::String("single".into()),
                TokenKind::Ident("_private123".into()),
                TokenKind::Float(".5".into()),
                TokenKind::Float("7.".into()),
            ]
        );
    }

    #[test]
    fn test_comments() {
        let input = "^^ full line\narr = [1] ^^ trailing\n^^ last";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Newline,
                TokenKind::Ident("arr".into()),
                TokenKind::Assign,
                TokenKind::LBracket,
                TokenKind::Int("1".into()),
                TokenKind::RBracket,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_illegal_tokens() {
        assert_eq!(
            kinds("1.2.3 @ \"open"),
            vec![
                TokenKind::Illegal(LexError::MalformedNumber("1.2.3".into())),
                TokenKind::Illegal(LexError::UnknownCharacter('@')),
                TokenKind::Illegal(LexError::UnterminatedString),
            ]
        );
        assert_eq!(
            kinds("! ^"),
            vec![
                TokenKind::Illegal(LexError::UnknownCharacter('!')),
                TokenKind::Illegal(LexError::UnknownCharacter('^')),
            ]
        );
    }

    #[test]
    fn test_keyword_spelling() {
        assert_eq!(Keyword::End.spelling(), "ndeerb");
        assert_eq!(Keyword::Or.spelling(), "or");
        assert_eq!(boolean_spelling(true), "rueterb");
    }
}
