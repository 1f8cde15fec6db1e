//! Recursive-descent parser for formula bodies.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | CELL | '(' expr ')'
//! ```

use tracing::trace;

use super::ast::{BinaryOp, Expr, Resolver, UnaryOp};
use super::error::FormulaParseError;
use super::lexer::{Token, tokenize};
use super::position::Position;
use super::value::FormulaError;

/// A parsed formula.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    root: Expr,
}

impl Formula {
    /// Evaluate against a resolver for referenced cells.
    ///
    /// Out-of-range references fail with [`FormulaError::Ref`] without reaching
    /// the resolver.
    pub fn evaluate(&self, resolve: &Resolver<'_>) -> Result<f64, FormulaError> {
        self.root.evaluate(resolve)
    }

    /// Referenced positions in source order. May contain duplicates and
    /// invalid positions.
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        self.root.collect_cells(&mut cells);
        cells
    }

    /// Canonical text of the expression, without the leading `=`.
    pub fn expression(&self) -> String {
        self.root.to_string()
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }
}

/// Parse a formula body (the text after `=`).
pub fn parse_formula(body: &str) -> Result<Formula, FormulaParseError> {
    let tokens = tokenize(body)?;
    if tokens.is_empty() {
        return Err(FormulaParseError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let root = parser.parse_expr()?;
    if let Some(token) = parser.peek() {
        return Err(FormulaParseError::UnexpectedToken(token.describe()));
    }
    trace!(body, "parsed formula");
    Ok(Formula { root })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse_expr(&mut self) -> Result<Expr, FormulaParseError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_term(&mut self) -> Result<Expr, FormulaParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, FormulaParseError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        Ok(Expr::Unary(op, Box::new(self.parse_unary()?)))
    }

    fn parse_primary(&mut self) -> Result<Expr, FormulaParseError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Cell(pos, name)) => Ok(Expr::Cell(pos, name)),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(FormulaParseError::UnexpectedToken(other.describe())),
                    None => Err(FormulaParseError::UnexpectedEnd),
                }
            }
            Some(other) => Err(FormulaParseError::UnexpectedToken(other.describe())),
            None => Err(FormulaParseError::UnexpectedEnd),
        }
    }
}
