//! Parser for the textual rendering of expressions.
//!
//! Grammar (whitespace between tokens is ignored):
//!
//! ```text
//! expr := var
//!       | "not" "(" expr ")"
//!       | "(" expr ")" op "(" expr ")"
//! var  := "v_" [1-9][0-9]*
//! op   := "or" | "and" | "nand" | "xor" | "->" | "<-"
//! ```
//!
//! ```
//! use sr_fol::expr::Expr;
//!
//! let e: Expr = "(v_1) -> (not (v_2))".parse().unwrap();
//! assert_eq!(e, Expr::implies(Expr::var(1), Expr::not(Expr::var(2))));
//! assert_eq!(e.to_string(), "(v_1) -> (not (v_2))");
//! ```

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::expr::{Expr, Kind};

/// Binary operators, in the order they are tried.
const BINARY: [Kind; 6] = [
    Kind::Nand,
    Kind::And,
    Kind::Xor,
    Kind::Or,
    Kind::Implies,
    Kind::Converse,
];

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(Error::Parse {
            position: self.pos,
            message: message.into(),
        })
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            self.error(format!("expected `{}`", token))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.skip_whitespace();
        if self.eat("v_") {
            return self.parse_subscript();
        }
        if self.eat(Kind::Not.token()) {
            self.expect("(")?;
            let arg = self.parse_expr()?;
            self.expect(")")?;
            return Ok(Expr::not(arg));
        }
        if self.eat("(") {
            let lhs = self.parse_expr()?;
            self.expect(")")?;
            let kind = self.parse_operator()?;
            self.expect("(")?;
            let rhs = self.parse_expr()?;
            self.expect(")")?;
            return Ok(Expr::binary(kind, lhs, rhs));
        }
        self.error("expected a variable, `not` or `(`")
    }

    fn parse_subscript(&mut self) -> Result<Expr> {
        let digits = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return self.error("expected a variable subscript");
        }
        let text = &self.rest()[..digits];
        let subscript: u32 = match text.parse() {
            Ok(subscript) => subscript,
            Err(_) => return self.error(format!("subscript `{}` is out of range", text)),
        };
        if subscript == 0 {
            return self.error("variable subscripts start at 1");
        }
        self.pos += digits;
        Ok(Expr::var(subscript))
    }

    fn parse_operator(&mut self) -> Result<Kind> {
        for kind in BINARY {
            if self.eat(kind.token()) {
                return Ok(kind);
            }
        }
        self.error("expected a binary operator")
    }
}

impl FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = Parser::new(s);
        let expr = parser.parse_expr()?;
        parser.skip_whitespace();
        if !parser.rest().is_empty() {
            return parser.error("unexpected trailing input");
        }
        Ok(expr)
    }
}
