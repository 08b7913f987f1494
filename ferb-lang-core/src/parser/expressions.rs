use super::error::ParseError;
use crate::ast::{
    ComparisonKind, Expression, Identifier, InfixOperationKind, Number, PrefixOperationKind,
};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::Parser;

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Or,
    And,
    Not,
    /// Right operand of a comparison, so `a < b < c` nests to the right.
    ComparisonChain,
    Comparison,
    Sum,
    Product,
    Prefix,
    Postfix,
    Access,
}

pub fn precedence_of(token: &TokenKind) -> Precedence {
    match token {
        TokenKind::Keyword(Keyword::Or) => Precedence::Or,
        TokenKind::Keyword(Keyword::And) => Precedence::And,
        TokenKind::Equal => Precedence::Comparison,
        TokenKind::NotEqual => Precedence::Comparison,
        TokenKind::LessThan => Precedence::Comparison,
        TokenKind::GreaterThan => Precedence::Comparison,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::Percent => Precedence::Product,
        TokenKind::Increment => Precedence::Postfix,
        TokenKind::Decrement => Precedence::Postfix,
        TokenKind::LBracket => Precedence::Access,
        TokenKind::Dot => Precedence::Access,
        _ => Precedence::Lowest,
    }
}

pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let Some(token) = parser.iter.next() else {
        return Err(ParseError::premature_end_expected_expression());
    };
    let mut left_expression = prefix_parsing(token, parser, precedence)?;

    loop {
        let Some(next_token) = parser.iter.peek() else {
            break;
        };

        let next_precedence = precedence_of(&next_token.kind);
        if precedence >= next_precedence {
            break;
        }

        let Some(next_token) = parser.iter.next() else {
            break;
        };
        let Some(infix_parse_function) = infix_parsing_function(next_token.kind) else {
            break;
        };
        left_expression = infix_parse_function(left_expression, parser)?;
    }

    Ok(left_expression)
}

fn prefix_operation(
    kind: PrefixOperationKind,
    operand_precedence: Precedence,
) -> impl FnOnce(&mut Parser) -> Result<Expression, ParseError> {
    move |parser| {
        Ok(Expression::PrefixOperation(
            kind,
            Box::new(parse_expression(parser, operand_precedence)?),
        ))
    }
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Parses `element (separator element)* terminator`, with the opening token
/// already consumed. Line breaks are allowed around elements and separators;
/// a separator directly before the terminator is rejected.
pub(crate) fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    separator: TokenKind,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    parser.skip_newlines();
    if parser
        .iter
        .next_if(|token| token.kind == terminator)
        .is_some()
    {
        return Ok(elements);
    }

    loop {
        elements.push(parse_element(parser)?);
        parser.skip_newlines();

        match parser.iter.next() {
            Some(next) if next.kind == separator => parser.skip_newlines(),
            Some(next) if next.kind == terminator => return Ok(elements),
            next => return Err(ParseError::unexpected_token(separator, next)),
        }
    }
}

fn parse_array_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expressions = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::Comma,
        TokenKind::RBracket,
    )?;
    Ok(Expression::ArrayLiteral(expressions))
}

fn parse_new_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let name = parser.parse_ident()?;

    let arguments = if parser
        .iter
        .next_if(|token| token.kind == TokenKind::LBracket)
        .is_some()
    {
        parse_sequence(
            parser,
            |parser| parse_expression(parser, Precedence::Lowest),
            TokenKind::Comma,
            TokenKind::RBracket,
        )?
    } else {
        Vec::new()
    };

    Ok(Expression::New {
        type_name: Identifier { name },
        arguments,
    })
}

pub fn prefix_parsing(
    token: Token,
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::Ident(name) => Ok(Expression::Identifier(Identifier { name })),
        TokenKind::Int(val) => Ok(Expression::NumberLiteral(Number::Integer(val.parse()?))),
        TokenKind::Float(val) => Ok(Expression::NumberLiteral(Number::Float(val.parse()?))),
        TokenKind::String(val) => Ok(Expression::StringLiteral(val)),
        TokenKind::Boolean(val) => Ok(Expression::BooleanLiteral(val)),
        TokenKind::Plus => prefix_operation(PrefixOperationKind::Plus, Precedence::Prefix)(parser),
        TokenKind::Minus => {
            prefix_operation(PrefixOperationKind::Minus, Precedence::Prefix)(parser)
        }
        TokenKind::Increment => {
            prefix_operation(PrefixOperationKind::Increment, Precedence::Prefix)(parser)
        }
        TokenKind::Decrement => {
            prefix_operation(PrefixOperationKind::Decrement, Precedence::Prefix)(parser)
        }
        // `otnerb` binds looser than comparisons, so it cannot start an
        // operand of one
        TokenKind::Keyword(Keyword::Not) if precedence <= Precedence::Not => {
            prefix_operation(PrefixOperationKind::Not, Precedence::Not)(parser)
        }
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::LBracket => parse_array_literal(parser),
        TokenKind::Keyword(Keyword::New) => parse_new_expression(parser),
        TokenKind::Illegal(error) => Err(ParseError::Lex {
            error,
            start: token.start,
            end: token.end,
        }),
        _ => Err(ParseError::NoPrefixFunction(token)),
    }
}

type InfixFunction = Box<dyn FnOnce(Expression, &mut Parser) -> Result<Expression, ParseError>>;

fn infix_operation(token: TokenKind, kind: InfixOperationKind) -> InfixFunction {
    Box::new(
        move |left: Expression, parser: &mut Parser| -> Result<Expression, ParseError> {
            let new_precedence = precedence_of(&token);

            Ok(Expression::InfixOperation(
                kind,
                Box::new(left),
                Box::new(parse_expression(parser, new_precedence)?),
            ))
        },
    )
}

fn comparison(kind: ComparisonKind) -> InfixFunction {
    Box::new(
        move |left: Expression, parser: &mut Parser| -> Result<Expression, ParseError> {
            Ok(Expression::Comparison(
                kind,
                Box::new(left),
                Box::new(parse_expression(parser, Precedence::ComparisonChain)?),
            ))
        },
    )
}

fn postfix_operation(kind: PrefixOperationKind) -> InfixFunction {
    Box::new(
        move |left: Expression, _: &mut Parser| -> Result<Expression, ParseError> {
            Ok(Expression::PrefixOperation(kind, Box::new(left)))
        },
    )
}

fn parse_index_expression(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    let index = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RBracket)?;

    Ok(Expression::Index {
        collection: Box::new(left),
        index: Box::new(index),
    })
}

fn parse_attribute_access(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    let name = parser.parse_ident()?;

    Ok(Expression::AttributeAccess {
        object: Box::new(left),
        field: Identifier { name },
    })
}

pub fn infix_parsing_function(token: TokenKind) -> Option<InfixFunction> {
    use InfixOperationKind as InfixKind;

    match token {
        TokenKind::Keyword(Keyword::Or) => Some(infix_operation(token, InfixKind::Or)),
        TokenKind::Keyword(Keyword::And) => Some(infix_operation(token, InfixKind::And)),
        TokenKind::Plus => Some(infix_operation(TokenKind::Plus, InfixKind::Plus)),
        TokenKind::Minus => Some(infix_operation(TokenKind::Minus, InfixKind::Minus)),
        TokenKind::Asterisk => Some(infix_operation(TokenKind::Asterisk, InfixKind::Multiply)),
        TokenKind::Slash => Some(infix_operation(TokenKind::Slash, InfixKind::Divide)),
        TokenKind::Percent => Some(infix_operation(TokenKind::Percent, InfixKind::Modulo)),
        TokenKind::LessThan => Some(comparison(ComparisonKind::LessThan)),
        TokenKind::GreaterThan => Some(comparison(ComparisonKind::GreaterThan)),
        TokenKind::Equal => Some(comparison(ComparisonKind::Equal)),
        TokenKind::NotEqual => Some(comparison(ComparisonKind::NotEqual)),
        TokenKind::Increment => Some(postfix_operation(PrefixOperationKind::Increment)),
        TokenKind::Decrement => Some(postfix_operation(PrefixOperationKind::Decrement)),
        TokenKind::LBracket => Some(Box::new(parse_index_expression)),
        TokenKind::Dot => Some(Box::new(parse_attribute_access)),
        _ => None,
    }
}
