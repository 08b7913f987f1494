use super::error;
use super::error::ParseError;
use crate::ast::{Identifier, Literal, Number, Pattern};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

pub fn parse_pattern(parser: &mut Parser) -> Result<Pattern, ParseError> {
    let Some(token) = parser.iter.next() else {
        return Err(ParseError::PrematureEndOfInput {
            expected: error::Expected::Pattern,
        });
    };
    match token.kind {
        TokenKind::Ident(name) if &*name == "_" => Ok(Pattern::Wildcard),
        TokenKind::Ident(name) => Ok(Pattern::Variable(Identifier { name })),
        TokenKind::Int(val) => Ok(Pattern::Literal(Literal::Number(Number::Integer(
            val.parse()?,
        )))),
        TokenKind::Float(val) => Ok(Pattern::Literal(Literal::Number(Number::Float(
            val.parse()?,
        )))),
        TokenKind::Minus => parse_negative_number(parser),
        TokenKind::String(val) => Ok(Pattern::Literal(Literal::String(val))),
        TokenKind::Boolean(val) => Ok(Pattern::Literal(Literal::Boolean(val))),
        TokenKind::Illegal(error) => Err(ParseError::Lex {
            error,
            start: token.start,
            end: token.end,
        }),
        _ => Err(ParseError::InvalidPattern(token)),
    }
}

fn parse_negative_number(parser: &mut Parser) -> Result<Pattern, ParseError> {
    let token = parser.iter.next();
    let number = match token {
        Some(Token {
            kind: TokenKind::Int(val),
            ..
        }) => Number::Integer(format!("-{}", val).parse()?),
        Some(Token {
            kind: TokenKind::Float(val),
            ..
        }) => Number::Float(-val.parse::<f64>()?),
        Some(token) => return Err(ParseError::InvalidPattern(token)),
        None => {
            return Err(ParseError::PrematureEndOfInput {
                expected: error::Expected::Pattern,
            })
        }
    };
    Ok(Pattern::Literal(Literal::Number(number)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Tokenizer;

    fn pattern(input: &str) -> Result<Pattern, ParseError> {
        let mut parser = Parser::new(Tokenizer::new(input));
        parse_pattern(&mut parser)
    }

    #[test]
    fn test_patterns() {
        let tests = vec![
            ("_", Pattern::Wildcard),
            (
                "name",
                Pattern::Variable(Identifier {
                    name: "name".into(),
                }),
            ),
            ("42", Pattern::Literal(Literal::Number(Number::Integer(42)))),
            ("-7", Pattern::Literal(Literal::Number(Number::Integer(-7)))),
            ("2.5", Pattern::Literal(Literal::Number(Number::Float(2.5)))),
            ("-0.5", Pattern::Literal(Literal::Number(Number::Float(-0.5)))),
            ("'hi'", Pattern::Literal(Literal::String("hi".into()))),
            ("alseferb", Pattern::Literal(Literal::Boolean(false))),
        ];

        for (input, expected) in tests {
            assert_eq!(pattern(input), Ok(expected), "input: {}", input);
        }
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(pattern("["), Err(ParseError::InvalidPattern(_))));
        assert!(matches!(pattern("-x"), Err(ParseError::InvalidPattern(_))));
        assert!(matches!(
            pattern(""),
            Err(ParseError::PrematureEndOfInput {
                expected: error::Expected::Pattern
            })
        ));
    }
}
