//! A restricted arithmetic language over the free variables `x` and `y`.
//!
//! Function text typed by the user is parsed with a fixed grammar (`+ - * /`,
//! `**`, parentheses, numbers) and every identifier is resolved against a
//! closed whitelist of variables, constants and functions when the
//! expression is compiled. Nothing outside that grammar is ever executed.
//!
//! Operator precedence follows Python so formulas written for numpy keep
//! their meaning: `-x**2` is `-(x**2)`, `2**-1` is `0.5` and `**` is right
//! associative.

use crate::surface::Grid;
use ndarray::Array2;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;
use std::fmt;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "expression.pest"]
struct FormulaParser;

#[derive(Error, Debug)]
pub enum ExpressionError {
    #[error("function text is empty")]
    Empty,
    #[error("syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("name '{0}' is not defined")]
    UnknownName(String),
    #[error("function '{0}' is not defined")]
    UnknownFunction(String),
    #[error("'{0}' is not callable")]
    NotCallable(String),
    #[error("{name}() takes {expected} argument(s) but {found} were given")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("formula is too complex, nesting is limited to {0} levels")]
    TooComplex(usize),
}

/// Deepest operator tree a formula may compile to, and the most operators
/// allowed within one pair of parentheses. Evaluation recurses once per level.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Log2,
    Sqrt,
    Abs,
    Floor,
    Ceil,
}

impl UnaryFn {
    fn lookup(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => UnaryFn::Sin,
            "cos" => UnaryFn::Cos,
            "tan" => UnaryFn::Tan,
            "arcsin" | "asin" => UnaryFn::Asin,
            "arccos" | "acos" => UnaryFn::Acos,
            "arctan" | "atan" => UnaryFn::Atan,
            "sinh" => UnaryFn::Sinh,
            "cosh" => UnaryFn::Cosh,
            "tanh" => UnaryFn::Tanh,
            "exp" => UnaryFn::Exp,
            "log" | "ln" => UnaryFn::Ln,
            "log10" => UnaryFn::Log10,
            "log2" => UnaryFn::Log2,
            "sqrt" => UnaryFn::Sqrt,
            "abs" => UnaryFn::Abs,
            "floor" => UnaryFn::Floor,
            "ceil" => UnaryFn::Ceil,
            _ => return None,
        };
        Some(func)
    }

    fn apply(self, v: f64) -> f64 {
        match self {
            UnaryFn::Sin => v.sin(),
            UnaryFn::Cos => v.cos(),
            UnaryFn::Tan => v.tan(),
            UnaryFn::Asin => v.asin(),
            UnaryFn::Acos => v.acos(),
            UnaryFn::Atan => v.atan(),
            UnaryFn::Sinh => v.sinh(),
            UnaryFn::Cosh => v.cosh(),
            UnaryFn::Tanh => v.tanh(),
            UnaryFn::Exp => v.exp(),
            UnaryFn::Ln => v.ln(),
            UnaryFn::Log10 => v.log10(),
            UnaryFn::Log2 => v.log2(),
            UnaryFn::Sqrt => v.sqrt(),
            UnaryFn::Abs => v.abs(),
            UnaryFn::Floor => v.floor(),
            UnaryFn::Ceil => v.ceil(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryFn {
    Atan2,
    Hypot,
    Minimum,
    Maximum,
}

impl BinaryFn {
    fn lookup(name: &str) -> Option<Self> {
        let func = match name {
            "arctan2" | "atan2" => BinaryFn::Atan2,
            "hypot" => BinaryFn::Hypot,
            "minimum" | "min" => BinaryFn::Minimum,
            "maximum" | "max" => BinaryFn::Maximum,
            _ => return None,
        };
        Some(func)
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        // NaN propagates through minimum/maximum the way numpy does it.
        match self {
            BinaryFn::Atan2 => a.atan2(b),
            BinaryFn::Hypot => a.hypot(b),
            BinaryFn::Minimum if a.is_nan() || b.is_nan() => f64::NAN,
            BinaryFn::Minimum => a.min(b),
            BinaryFn::Maximum if a.is_nan() || b.is_nan() => f64::NAN,
            BinaryFn::Maximum => a.max(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    X,
    Y,
    Neg(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call1(UnaryFn, Box<Node>),
    Call2(BinaryFn, Box<Node>, Box<Node>),
}

impl Node {
    fn eval(&self, x: f64, y: f64) -> f64 {
        match self {
            Node::Number(v) => *v,
            Node::X => x,
            Node::Y => y,
            Node::Neg(inner) => -inner.eval(x, y),
            Node::Binary(op, lhs, rhs) => op.apply(lhs.eval(x, y), rhs.eval(x, y)),
            Node::Call1(func, arg) => func.apply(arg.eval(x, y)),
            Node::Call2(func, a, b) => func.apply(a.eval(x, y), b.eval(x, y)),
        }
    }
}

/// A compiled formula `f(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    /// Parses and resolves `text`.
    ///
    /// Fails on any syntax error and on any identifier that is not one of the
    /// whitelisted variables, constants or functions, or that is used with
    /// the wrong number of arguments.
    pub fn parse(text: &str) -> Result<Self, ExpressionError> {
        if text.trim().is_empty() {
            return Err(ExpressionError::Empty);
        }
        let mut pairs = FormulaParser::parse(Rule::formula, text).map_err(Box::new)?;
        let Some(expr) = pairs.next() else {
            return Err(ExpressionError::Empty);
        };
        let root = compile(expr.into_inner(), &pratt(), 0)?.node;
        Ok(Self {
            source: text.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.root.eval(x, y)
    }

    /// Evaluates over the meshgrid of `grid`; rows follow `y`, columns `x`.
    pub fn eval_grid(&self, grid: &Grid) -> Array2<f64> {
        let xs = grid.xs();
        let ys = grid.ys();
        Array2::from_shape_fn((ys.len(), xs.len()), |(j, i)| self.eval(xs[i], ys[j]))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn pratt() -> PrattParser<Rule> {
    PrattParser::new()
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left) | Op::infix(Rule::div, Assoc::Left))
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
        .op(Op::infix(Rule::pow, Assoc::Right))
}

/// A compiled subtree and its height.
struct Compiled {
    node: Node,
    depth: usize,
}

fn nest(depth: usize, node: Node) -> Result<Compiled, ExpressionError> {
    if depth > MAX_DEPTH {
        return Err(ExpressionError::TooComplex(MAX_DEPTH));
    }
    Ok(Compiled { node, depth })
}

fn compile(
    pairs: Pairs<'_, Rule>,
    pratt: &PrattParser<Rule>,
    nesting: usize,
) -> Result<Compiled, ExpressionError> {
    // The Pratt parser recurses per prefix and per `**`, so the operator
    // count is checked before it runs.
    let operators = pairs
        .clone()
        .filter(|pair| {
            matches!(
                pair.as_rule(),
                Rule::neg | Rule::pos | Rule::add | Rule::sub | Rule::mul | Rule::div | Rule::pow
            )
        })
        .count();
    if nesting > MAX_DEPTH || operators > MAX_DEPTH {
        return Err(ExpressionError::TooComplex(MAX_DEPTH));
    }

    pratt
        .map_primary(|primary| compile_primary(primary, pratt, nesting))
        .map_prefix(|op, rhs| {
            let rhs = rhs?;
            match op.as_rule() {
                Rule::neg => nest(rhs.depth + 1, Node::Neg(Box::new(rhs.node))),
                _ => Ok(rhs),
            }
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::add => BinaryOp::Add,
                Rule::sub => BinaryOp::Sub,
                Rule::mul => BinaryOp::Mul,
                Rule::div => BinaryOp::Div,
                Rule::pow => BinaryOp::Pow,
                rule => unreachable!("{rule:?} is not an infix operator"),
            };
            let (lhs, rhs) = (lhs?, rhs?);
            nest(
                lhs.depth.max(rhs.depth) + 1,
                Node::Binary(op, Box::new(lhs.node), Box::new(rhs.node)),
            )
        })
        .parse(pairs)
}

fn compile_primary(
    pair: Pair<'_, Rule>,
    pratt: &PrattParser<Rule>,
    nesting: usize,
) -> Result<Compiled, ExpressionError> {
    match pair.as_rule() {
        Rule::number => pair
            .as_str()
            .parse::<f64>()
            .map(|v| Compiled {
                node: Node::Number(v),
                depth: 1,
            })
            .map_err(|_| ExpressionError::InvalidNumber(pair.as_str().to_string())),
        Rule::ident => resolve_name(pair.as_str()).map(|node| Compiled { node, depth: 1 }),
        Rule::call => {
            let mut inner = pair.into_inner();
            let (Some(name), Some(arguments)) = (inner.next(), inner.next()) else {
                unreachable!("call always has a name and an argument list");
            };
            let args = arguments
                .into_inner()
                .map(|arg| compile(arg.into_inner(), pratt, nesting + 1))
                .collect::<Result<Vec<_>, _>>()?;
            let depth = args.iter().map(|arg| arg.depth).max().unwrap_or(0) + 1;
            let node = resolve_call(name.as_str(), args.into_iter().map(|arg| arg.node).collect())?;
            nest(depth, node)
        }
        Rule::expr => compile(pair.into_inner(), pratt, nesting + 1),
        rule => unreachable!("{rule:?} is not a primary"),
    }
}

fn resolve_name(name: &str) -> Result<Node, ExpressionError> {
    match name {
        "x" => Ok(Node::X),
        "y" => Ok(Node::Y),
        "pi" => Ok(Node::Number(std::f64::consts::PI)),
        "e" => Ok(Node::Number(std::f64::consts::E)),
        _ if UnaryFn::lookup(name).is_some() || BinaryFn::lookup(name).is_some() => {
            Err(ExpressionError::NotCallable(name.to_string()))
        }
        _ => Err(ExpressionError::UnknownName(name.to_string())),
    }
}

fn resolve_call(name: &str, args: Vec<Node>) -> Result<Node, ExpressionError> {
    let found = args.len();
    let arity = |expected: usize| ExpressionError::Arity {
        name: name.to_string(),
        expected,
        found,
    };
    if let Some(func) = UnaryFn::lookup(name) {
        let [arg]: [Node; 1] = args.try_into().map_err(|_| arity(1))?;
        return Ok(Node::Call1(func, Box::new(arg)));
    }
    if let Some(func) = BinaryFn::lookup(name) {
        let [a, b]: [Node; 2] = args.try_into().map_err(|_| arity(2))?;
        return Ok(Node::Call2(func, Box::new(a), Box::new(b)));
    }
    if matches!(name, "x" | "y" | "pi" | "e") {
        return Err(ExpressionError::NotCallable(name.to_string()));
    }
    Err(ExpressionError::UnknownFunction(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unary_minus_binds_looser_than_power() {
        let expr = Expression::parse("-x**2").unwrap();
        assert_eq!(expr.eval(3.0, 0.0), -9.0);
    }

    #[test]
    fn power_accepts_signed_exponent() {
        let expr = Expression::parse("2**-1*3").unwrap();
        assert_eq!(expr.eval(0.0, 0.0), 1.5);
    }

    #[test]
    fn whitespace_between_tokens_is_ignored() {
        let spaced = Expression::parse("  sin ( x )  *  2 ").unwrap();
        let tight = Expression::parse("sin(x)*2").unwrap();
        assert_eq!(spaced.root, tight.root);
    }
}
