use crate::ast::{
    Assignment, Block, ForStatement, Identifier, IfStatement, MatchCase, MatchStatement,
    RecordDefinition, Statement,
};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::expressions::{parse_expression, Precedence};
use crate::parser::pattern_matching::parse_pattern;
use crate::parser::{Expected, ParseError, Parser};

const IF_TERMINATORS: &[Keyword] = &[Keyword::Elif, Keyword::Else, Keyword::End];
const CASE_TERMINATORS: &[Keyword] = &[Keyword::Case, Keyword::Else, Keyword::End];
const END: &[Keyword] = &[Keyword::End];

pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let assignment = is_assignment(parser);
    match parser.peek_kind() {
        Some(TokenKind::Keyword(Keyword::Thing)) => Ok(Statement::RecordDefinition(
            parse_record_definition(parser)?,
        )),
        Some(TokenKind::Keyword(Keyword::Print)) => Ok(Statement::Print(parse_print(parser)?)),
        Some(TokenKind::Keyword(Keyword::If)) => Ok(Statement::If(parse_if_statement(parser)?)),
        Some(TokenKind::Keyword(Keyword::Match)) => {
            Ok(Statement::Match(parse_match_statement(parser)?))
        }
        Some(TokenKind::Keyword(Keyword::For)) => Ok(Statement::For(parse_for_statement(parser)?)),
        Some(TokenKind::Ident(_)) if assignment => {
            Ok(Statement::Assignment(parse_assignment(parser)?))
        }
        _ => Ok(Statement::Expression(parse_expression(
            parser,
            Precedence::Lowest,
        )?)),
    }
}

/// Looks past the identifier at the front of the stream for an `=`.
fn is_assignment(parser: &Parser) -> bool {
    let mut lookahead = parser.iter.clone();
    lookahead.next();
    matches!(
        lookahead.peek(),
        Some(Token {
            kind: TokenKind::Assign,
            ..
        })
    )
}

fn parse_assignment(parser: &mut Parser) -> Result<Assignment, ParseError> {
    let name = parser.parse_ident()?;
    parser.expect_token(TokenKind::Assign)?;
    let value = parse_expression(parser, Precedence::Lowest)?;

    Ok(Assignment {
        identifier: Identifier { name },
        value,
    })
}

fn parse_print(parser: &mut Parser) -> Result<crate::ast::Expression, ParseError> {
    parser.expect_keyword(Keyword::Print)?;
    parse_expression(parser, Precedence::Lowest)
}

/// Statements up to (not including) one of `terminators`.
fn parse_block(parser: &mut Parser, terminators: &[Keyword]) -> Result<Block, ParseError> {
    let mut statements = Vec::new();

    loop {
        parser.skip_newlines();
        match parser.peek_kind() {
            None => {
                return Err(ParseError::PrematureEndOfInput {
                    expected: Expected::Token(TokenKind::Keyword(Keyword::End)),
                })
            }
            Some(TokenKind::Keyword(keyword)) if terminators.contains(keyword) => break,
            Some(_) => {
                statements.push(parse_statement(parser)?);
                parser.expect_statement_end()?;
            }
        }
    }

    Ok(Block { statements })
}

fn parse_if_statement(parser: &mut Parser) -> Result<IfStatement, ParseError> {
    parser.expect_keyword(Keyword::If)?;
    let statement = parse_if_branch(parser)?;
    parser.expect_keyword(Keyword::End)?;

    Ok(statement)
}

/// Condition, body and any `utifberb`/`lseerb` continuation. The closing
/// `ndeerb` is left for the outermost `if`.
fn parse_if_branch(parser: &mut Parser) -> Result<IfStatement, ParseError> {
    let condition = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_keyword(Keyword::Then)?;
    parser.expect_token(TokenKind::Newline)?;

    let consequence = parse_block(parser, IF_TERMINATORS)?;

    let alternative = match parser.peek_kind() {
        Some(TokenKind::Keyword(Keyword::Elif)) => {
            parser.iter.next();
            let nested = parse_if_branch(parser)?;
            Some(Block {
                statements: vec![Statement::If(nested)],
            })
        }
        Some(TokenKind::Keyword(Keyword::Else)) => {
            parser.iter.next();
            parser.expect_token(TokenKind::Newline)?;
            Some(parse_block(parser, END)?)
        }
        _ => None,
    };

    Ok(IfStatement {
        condition,
        consequence,
        alternative,
    })
}

fn parse_for_statement(parser: &mut Parser) -> Result<ForStatement, ParseError> {
    parser.expect_keyword(Keyword::For)?;
    let name = parser.parse_ident()?;
    parser.expect_keyword(Keyword::In)?;
    let iterable = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::Newline)?;

    let body = parse_block(parser, END)?;
    parser.expect_keyword(Keyword::End)?;

    Ok(ForStatement {
        variable: Identifier { name },
        iterable,
        body,
    })
}

fn parse_match_statement(parser: &mut Parser) -> Result<MatchStatement, ParseError> {
    parser.expect_keyword(Keyword::Match)?;
    let scrutinee = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::Newline)?;

    let mut cases = Vec::new();
    loop {
        parser.skip_newlines();
        if cases.is_empty() || parser.peek_keyword(Keyword::Case) {
            parser.expect_keyword(Keyword::Case)?;
            cases.push(parse_match_case(parser)?);
        } else {
            break;
        }
    }

    let alternative = if parser.peek_keyword(Keyword::Else) {
        parser.iter.next();
        Some(parse_case_body(parser)?)
    } else {
        None
    };

    parser.skip_newlines();
    parser.expect_keyword(Keyword::End)?;

    Ok(MatchStatement {
        scrutinee,
        cases,
        alternative,
    })
}

fn parse_match_case(parser: &mut Parser) -> Result<MatchCase, ParseError> {
    let pattern = parse_pattern(parser)?;
    parser.expect_keyword(Keyword::Then)?;
    let body = parse_case_body(parser)?;

    Ok(MatchCase { pattern, body })
}

/// A block when the header ends the line, otherwise a single statement.
fn parse_case_body(parser: &mut Parser) -> Result<Block, ParseError> {
    if parser.peek_kind() == Some(&TokenKind::Newline) {
        return parse_block(parser, CASE_TERMINATORS);
    }

    let statement = parse_statement(parser)?;
    parser.expect_statement_end()?;

    Ok(Block {
        statements: vec![statement],
    })
}

fn parse_record_definition(parser: &mut Parser) -> Result<RecordDefinition, ParseError> {
    parser.expect_keyword(Keyword::Thing)?;
    let name = parser.parse_ident()?;
    parser.expect_token(TokenKind::Newline)?;

    let mut fields = Vec::new();
    loop {
        parser.skip_newlines();
        match parser.iter.next() {
            Some(Token {
                kind: TokenKind::Keyword(Keyword::Arg),
                ..
            }) => {
                let name = parser.parse_ident()?;
                fields.push(Identifier { name });
                parser.expect_statement_end()?;
            }
            Some(Token {
                kind: TokenKind::Keyword(Keyword::End),
                ..
            }) => break,
            token => {
                return Err(ParseError::unexpected_token(
                    TokenKind::Keyword(Keyword::End),
                    token,
                ))
            }
        }
    }

    Ok(RecordDefinition {
        name: Identifier { name },
        fields,
    })
}
