use std::fmt::Display;
use std::rc::Rc;

use crate::lexer::{boolean_spelling, Keyword};

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Assignment(Assignment),
    Print(Expression),
    If(IfStatement),
    For(ForStatement),
    Match(MatchStatement),
    RecordDefinition(RecordDefinition),
    Expression(Expression),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Assignment {
    pub identifier: Identifier,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct IfStatement {
    pub condition: Expression,
    pub consequence: Block,
    /// `utifberb` chains are stored as an alternative holding a single nested `if`.
    pub alternative: Option<Block>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ForStatement {
    pub variable: Identifier,
    pub iterable: Expression,
    pub body: Block,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MatchStatement {
    pub scrutinee: Expression,
    pub cases: Vec<MatchCase>,
    pub alternative: Option<Block>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Block,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RecordDefinition {
    pub name: Identifier,
    pub fields: Vec<Identifier>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Identifier(Identifier),
    NumberLiteral(Number),
    StringLiteral(Rc<str>),
    BooleanLiteral(bool),
    ArrayLiteral(Vec<Expression>),
    Index {
        collection: Box<Expression>,
        index: Box<Expression>,
    },
    New {
        type_name: Identifier,
        arguments: Vec<Expression>,
    },
    AttributeAccess {
        object: Box<Expression>,
        field: Identifier,
    },
    PrefixOperation(PrefixOperationKind, Box<Expression>),
    InfixOperation(InfixOperationKind, Box<Expression>, Box<Expression>),
    Comparison(ComparisonKind, Box<Expression>, Box<Expression>),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Pattern {
    Literal(Literal),
    Variable(Identifier),
    Wildcard,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(Number),
    String(Rc<str>),
    Boolean(bool),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InfixOperationKind {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ComparisonKind {
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PrefixOperationKind {
    Plus,
    Minus,
    Not,
    Increment,
    Decrement,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Identifier {
    pub name: Rc<str>,
}

#[derive(Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.identifier.name, self.value)
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            for line in statement.to_string().lines() {
                writeln!(f, "  {}", line)?;
            }
        }
        Ok(())
    }
}

impl Display for IfStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "if {} {}\n{}",
            self.condition,
            Keyword::Then.spelling(),
            self.consequence
        )?;
        if let Some(alternative) = &self.alternative {
            write!(f, "{}\n{}", Keyword::Else.spelling(), alternative)?;
        }
        write!(f, "{}", Keyword::End.spelling())
    }
}

impl Display for ForStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}\n{}{}",
            Keyword::For.spelling(),
            self.variable.name,
            Keyword::In.spelling(),
            self.iterable,
            self.body,
            Keyword::End.spelling()
        )
    }
}

impl Display for MatchStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", Keyword::Match.spelling(), self.scrutinee)?;
        for case in &self.cases {
            write!(f, "{}", case)?;
        }
        if let Some(alternative) = &self.alternative {
            write!(f, "{}\n{}", Keyword::Else.spelling(), alternative)?;
        }
        write!(f, "{}", Keyword::End.spelling())
    }
}

impl Display for MatchCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}\n{}",
            Keyword::Case.spelling(),
            self.pattern,
            Keyword::Then.spelling(),
            self.body
        )
    }
}

impl Display for RecordDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", Keyword::Thing.spelling(), self.name.name)?;
        for field in &self.fields {
            writeln!(f, "  {} {}", Keyword::Arg.spelling(), field.name)?;
        }
        write!(f, "{}", Keyword::End.spelling())
    }
}

fn write_list(f: &mut std::fmt::Formatter<'_>, expressions: &[Expression]) -> std::fmt::Result {
    write!(f, "[")?;
    for (i, expr) in expressions.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", expr)?;
    }
    write!(f, "]")
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Identifier(ident) => write!(f, "{}", ident.name),
            NumberLiteral(val) => write!(f, "{}", val),
            StringLiteral(val) => write!(f, "\"{}\"", val),
            BooleanLiteral(val) => write!(f, "{}", boolean_spelling(*val)),
            ArrayLiteral(arr) => write_list(f, arr),
            Index { collection, index } => write!(f, "{}[{}]", collection, index),
            New {
                type_name,
                arguments,
            } => {
                write!(f, "{} {} ", Keyword::New.spelling(), type_name.name)?;
                write_list(f, arguments)
            }
            AttributeAccess { object, field } => write!(f, "{}.{}", object, field.name),
            PrefixOperation(kind, expr) => write!(f, "({}{})", kind.to_str(), expr),
            InfixOperation(kind, left, right) => {
                write!(f, "({} {} {})", left, kind.to_str(), right)
            }
            Comparison(kind, left, right) => {
                write!(f, "({} {} {})", left, kind.to_str(), right)
            }
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            Assignment(statement) => write!(f, "{}", statement),
            Print(expression) => write!(f, "{} {}", Keyword::Print.spelling(), expression),
            If(statement) => write!(f, "{}", statement),
            For(statement) => write!(f, "{}", statement),
            Match(statement) => write!(f, "{}", statement),
            RecordDefinition(statement) => write!(f, "{}", statement),
            Expression(expression) => write!(f, "{}", expression),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Literal(literal) => write!(f, "{}", literal),
            Pattern::Variable(ident) => write!(f, "{}", ident.name),
            Pattern::Wildcard => write!(f, "_"),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(val) => write!(f, "{}", val),
            Literal::String(val) => write!(f, "\"{}\"", val),
            Literal::Boolean(val) => write!(f, "{}", boolean_spelling(*val)),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(val) => write!(f, "{}", val),
            Number::Float(val) => write!(f, "{:?}", val),
        }
    }
}

impl PrefixOperationKind {
    fn to_str(self) -> &'static str {
        use PrefixOperationKind::*;
        match self {
            Plus => "+",
            Minus => "-",
            Not => "otnerb ",
            Increment => "++",
            Decrement => "--",
        }
    }
}

impl InfixOperationKind {
    pub fn to_str(self) -> &'static str {
        use InfixOperationKind::*;
        match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            And => "ndaerb",
            Or => "or",
        }
    }
}

impl ComparisonKind {
    pub fn to_str(self) -> &'static str {
        use ComparisonKind::*;
        match self {
            LessThan => "<",
            GreaterThan => ">",
            Equal => "==",
            NotEqual => "!=",
        }
    }
}
