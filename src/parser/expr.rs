// ============================================================================
// Unit Expression Tree
// Recursive-descent parser and evaluator for compound unit strings
// ============================================================================
//
// Grammar (`^` binds tighter than `*` and `/`, which chain left to right):
//
//   expr     := term (('*' | '/' | <juxtaposition>) term)*
//   term     := factor ('^' exponent)?
//   factor   := IDENT | '1' | '(' expr ')'
//   exponent := sign? NUMBER | '(' sign? NUMBER ('/' sign? NUMBER)? ')'
//   sign     := '+' | '-'
// ============================================================================

use super::token::{tokenize, Token};
use crate::domain::errors::{UnitError, UnitResult};
use crate::domain::unit::Unit;
use crate::numeric::Rational;
use std::fmt;
use std::sync::Arc;

/// Binary operator joining two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOp {
    Multiply,
    Divide,
}

/// Parsed unit expression.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitExpr {
    /// A single unit token, resolved later against a catalog
    Atom(String),
    /// The literal `1`
    One,
    Product {
        lhs: Box<UnitExpr>,
        op: ProductOp,
        rhs: Box<UnitExpr>,
    },
    Power {
        base: Box<UnitExpr>,
        exponent: Rational,
    },
}

/// Resolves atomic unit tokens; implemented by the catalog.
pub trait AtomResolver {
    fn resolve_atom(&self, token: &str) -> UnitResult<Arc<Unit>>;
}

impl UnitExpr {
    /// Parse a unit string.
    pub fn parse(input: &str) -> UnitResult<UnitExpr> {
        let tokens = tokenize(input)?;
        Self::parse_tokens(input, &tokens)
    }

    /// Parse an already tokenized unit string. `input` is only used in
    /// error messages.
    pub fn parse_tokens(input: &str, tokens: &[Token]) -> UnitResult<UnitExpr> {
        let mut parser = Parser {
            input,
            tokens,
            pos: 0,
        };
        let expr = parser.expr()?;
        match parser.peek() {
            None => Ok(expr),
            Some(Token::RParen) => Err(parser.error("unbalanced ')'")),
            Some(token) => Err(parser.error(format!("unexpected '{}'", token))),
        }
    }

    /// Atom tokens in left-to-right order.
    pub fn atoms(&self) -> Vec<&str> {
        fn walk<'a>(expr: &'a UnitExpr, out: &mut Vec<&'a str>) {
            match expr {
                UnitExpr::Atom(name) => out.push(name),
                UnitExpr::One => {},
                UnitExpr::Product { lhs, rhs, .. } => {
                    walk(lhs, out);
                    walk(rhs, out);
                },
                UnitExpr::Power { base, .. } => walk(base, out),
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    /// Build the unit this expression denotes.
    ///
    /// A bare atom keeps its offset; combining an offset unit with anything
    /// (or raising it to a power other than one) fails with `UnitParse`, as
    /// do exponents or scale factors that overflow.
    pub fn evaluate(&self, resolver: &dyn AtomResolver) -> UnitResult<Unit> {
        match self {
            UnitExpr::Atom(token) => Ok(resolver.resolve_atom(token)?.as_ref().clone()),
            UnitExpr::One => Ok(Unit::dimensionless()),
            UnitExpr::Product { lhs, op, rhs } => {
                let lhs = lhs.evaluate(resolver)?;
                let rhs = rhs.evaluate(resolver)?;
                let combined = match op {
                    ProductOp::Multiply => lhs.multiply(&rhs),
                    ProductOp::Divide => lhs.divide(&rhs),
                };
                combined.map_err(|err| self.out_of_range(err))
            },
            UnitExpr::Power { base, exponent } => base
                .evaluate(resolver)?
                .powf(*exponent)
                .map_err(|err| self.out_of_range(err)),
        }
    }

    fn out_of_range(&self, err: UnitError) -> UnitError {
        match err {
            UnitError::InvalidValue { reason } => UnitError::parse(&self.to_string(), reason),
            other => other,
        }
    }
}

impl fmt::Display for UnitExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitExpr::Atom(name) => f.write_str(name),
            UnitExpr::One => f.write_str("1"),
            UnitExpr::Product { lhs, op, rhs } => {
                let symbol = match op {
                    ProductOp::Multiply => "*",
                    ProductOp::Divide => "/",
                };
                write!(f, "({} {} {})", lhs, symbol, rhs)
            },
            UnitExpr::Power { base, exponent } => {
                if exponent.is_integer() {
                    write!(f, "{}^{}", base, exponent)
                } else {
                    write!(f, "{}^({})", base, exponent)
                }
            },
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    input: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, reason: impl Into<String>) -> UnitError {
        UnitError::parse(self.input, reason)
    }

    fn expr(&mut self) -> UnitResult<UnitExpr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    ProductOp::Multiply
                },
                Some(Token::Slash) => {
                    self.pos += 1;
                    ProductOp::Divide
                },
                Some(Token::Ident(_)) | Some(Token::Number(_)) | Some(Token::LParen) => {
                    ProductOp::Multiply
                },
                _ => return Ok(lhs),
            };
            let rhs = self.term()?;
            lhs = UnitExpr::Product {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> UnitResult<UnitExpr> {
        let base = self.factor()?;
        if !matches!(self.peek(), Some(Token::Caret)) {
            return Ok(base);
        }
        self.pos += 1;
        let exponent = self.exponent()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            return Err(self.error("chained exponents need parentheses"));
        }
        Ok(UnitExpr::Power {
            base: Box::new(base),
            exponent,
        })
    }

    fn factor(&mut self) -> UnitResult<UnitExpr> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(UnitExpr::Atom(name.clone())),
            Some(Token::Number(literal)) if literal == "1" => Ok(UnitExpr::One),
            Some(Token::Number(literal)) => Err(self.error(format!(
                "numeric literal '{}' is not a unit (only '1' is allowed)",
                literal
            ))),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(self.error("unbalanced '('")),
                }
            },
            Some(Token::RParen) => Err(self.error("unbalanced ')'")),
            Some(token) => Err(self.error(format!("expected a unit, found '{}'", token))),
            None => Err(self.error("expected a unit at end of input")),
        }
    }

    fn exponent(&mut self) -> UnitResult<Rational> {
        if matches!(self.peek(), Some(Token::LParen)) {
            self.pos += 1;
            let numer = self.signed_number()?;
            let value = if matches!(self.peek(), Some(Token::Slash)) {
                self.pos += 1;
                let denom = self.signed_number()?;
                numer
                    .checked_div(denom)
                    .map_err(|e| self.error(format!("bad exponent: {}", e)))?
            } else {
                numer
            };
            return match self.next() {
                Some(Token::RParen) => Ok(value),
                _ => Err(self.error("unbalanced '(' in exponent")),
            };
        }
        self.signed_number()
    }

    fn signed_number(&mut self) -> UnitResult<Rational> {
        let negative = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                true
            },
            Some(Token::Plus) => {
                self.pos += 1;
                false
            },
            _ => false,
        };
        let literal = match self.next() {
            Some(Token::Number(literal)) => literal,
            Some(token) => return Err(self.error(format!("bad exponent '{}'", token))),
            None => return Err(self.error("missing exponent")),
        };
        let value: Rational = literal
            .parse()
            .map_err(|_| self.error(format!("bad exponent '{}'", literal)))?;
        if negative {
            value
                .checked_neg()
                .map_err(|e| self.error(format!("bad exponent: {}", e)))
        } else {
            Ok(value)
        }
    }
}
