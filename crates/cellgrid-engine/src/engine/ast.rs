//! Expression tree for arithmetic formulas.
//!
//! The tree evaluates against a resolver that turns a referenced position into
//! a number, and prints itself back with the fewest parentheses that keep the
//! same tree.

use std::fmt;

use super::format::format_number;
use super::position::Position;
use super::value::FormulaError;

/// Resolves a referenced cell to an operand.
pub type Resolver<'a> = dyn Fn(Position) -> Result<f64, FormulaError> + 'a;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }

    /// `a - (b - c)` and `a / (b / c)` need their parentheses; `a + (b + c)` does not.
    fn needs_grouped_rhs(self) -> bool {
        matches!(self, BinaryOp::Sub | BinaryOp::Div)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    /// A cell reference; the name is kept so out-of-range references print as written.
    Cell(Position, String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Cell(..) => ATOM_PRECEDENCE,
            Expr::Unary(..) => UNARY_PRECEDENCE,
            Expr::Binary(op, ..) => op.precedence(),
        }
    }

    /// Evaluate the tree. The first error met short-circuits the rest.
    pub fn evaluate(&self, resolve: &Resolver<'_>) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Cell(pos, _) => {
                if !pos.is_valid() {
                    return Err(FormulaError::Ref);
                }
                resolve(*pos)
            }
            Expr::Unary(UnaryOp::Plus, inner) => inner.evaluate(resolve),
            Expr::Unary(UnaryOp::Minus, inner) => Ok(-inner.evaluate(resolve)?),
            Expr::Binary(op, lhs, rhs) => {
                let lhs = lhs.evaluate(resolve)?;
                let rhs = rhs.evaluate(resolve)?;
                let result = match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => lhs * rhs,
                    BinaryOp::Div => lhs / rhs,
                };
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(FormulaError::Div0)
                }
            }
        }
    }

    /// Every cell reference in source order, duplicates and invalid positions included.
    pub fn collect_cells(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::Cell(pos, _) => out.push(*pos),
            Expr::Unary(_, inner) => inner.collect_cells(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_cells(out);
                rhs.collect_cells(out);
            }
        }
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, child: &Expr, grouped: bool) -> fmt::Result {
    if grouped {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_number(*n)),
            Expr::Cell(pos, name) => {
                if pos.is_valid() {
                    write!(f, "{}", pos)
                } else {
                    f.write_str(name)
                }
            }
            Expr::Unary(op, inner) => {
                f.write_str(match op {
                    UnaryOp::Plus => "+",
                    UnaryOp::Minus => "-",
                })?;
                write_child(f, inner, inner.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary(op, lhs, rhs) => {
                let prec = op.precedence();
                write_child(f, lhs, lhs.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                let rhs_prec = rhs.precedence();
                let grouped = rhs_prec < prec || (rhs_prec == prec && op.needs_grouped_rhs());
                write_child(f, rhs, grouped)
            }
        }
    }
}
