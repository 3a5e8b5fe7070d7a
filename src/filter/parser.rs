//! Recursive-descent parser for filter expressions
//!
//! ```text
//! expr       := and_expr ( "or" and_expr )*
//! and_expr   := primary ( "and" primary )*
//! primary    := "(" expr ")" | comparison
//! comparison := operand cmp_op operand
//! ```

use super::ast::{Expr, Literal, Operand};
use super::errors::{FilterError, FilterResult};
use super::lexer::{tokenize, Spanned, Token};

/// Maximum parenthesis nesting
pub const MAX_DEPTH: usize = 64;

/// Keywords from richer query languages that the grammar does not accept
const FOREIGN_KEYWORDS: &[&str] = &["not", "in", "is", "like", "between"];

/// Parses an expression string into an [`Expr`]
pub fn parse(input: &str) -> FilterResult<Expr> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;

    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some(extra) => Err(unexpected(extra)),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn parse_or(&mut self) -> FilterResult<Expr> {
        let mut terms = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            terms.push(self.parse_and()?);
        }
        Ok(collapse(terms, Expr::Or))
    }

    fn parse_and(&mut self) -> FilterResult<Expr> {
        let mut terms = vec![self.parse_primary()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            terms.push(self.parse_primary()?);
        }
        Ok(collapse(terms, Expr::And))
    }

    fn parse_primary(&mut self) -> FilterResult<Expr> {
        if self.peek() != Some(&Token::LParen) {
            return self.parse_comparison();
        }

        self.pos += 1;
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FilterError::TooDeep(MAX_DEPTH));
        }

        let inner = self.parse_or()?;
        match self.advance() {
            Some(Spanned {
                token: Token::RParen,
                ..
            }) => {
                self.depth -= 1;
                Ok(inner)
            }
            Some(other) => Err(unexpected(&other)),
            None => Err(FilterError::UnexpectedEnd { expected: "')'" }),
        }
    }

    fn parse_comparison(&mut self) -> FilterResult<Expr> {
        let left = self.parse_operand()?;

        let op = match self.advance() {
            Some(Spanned {
                token: Token::Cmp(op),
                ..
            }) => op,
            Some(Spanned {
                token: Token::Ident(word),
                position,
            }) if is_foreign_keyword(&word) => {
                return Err(FilterError::UnsupportedOperator {
                    operator: word,
                    position,
                })
            }
            Some(other) => return Err(unexpected(&other)),
            None => {
                return Err(FilterError::UnexpectedEnd {
                    expected: "a comparison operator",
                })
            }
        };

        let right = self.parse_operand()?;
        Ok(Expr::Compare { left, op, right })
    }

    fn parse_operand(&mut self) -> FilterResult<Operand> {
        match self.advance() {
            Some(Spanned { token, position }) => match token {
                Token::Ident(name) if is_foreign_keyword(&name) => {
                    Err(FilterError::UnsupportedOperator {
                        operator: name,
                        position,
                    })
                }
                Token::Ident(name) => Ok(Operand::Column(name)),
                Token::Str(s) => Ok(Operand::Literal(Literal::Text(s))),
                Token::Number(n) => Ok(Operand::Literal(Literal::Number(n))),
                Token::Bool(b) => Ok(Operand::Literal(Literal::Bool(b))),
                other => Err(unexpected(&Spanned {
                    token: other,
                    position,
                })),
            },
            None => Err(FilterError::UnexpectedEnd {
                expected: "a column name or literal",
            }),
        }
    }
}

/// A chain of one term is the term itself
fn collapse(mut terms: Vec<Expr>, chain: fn(Vec<Expr>) -> Expr) -> Expr {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        chain(terms)
    }
}

fn is_foreign_keyword(word: &str) -> bool {
    FOREIGN_KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k))
}

fn unexpected(spanned: &Spanned) -> FilterError {
    FilterError::UnexpectedToken {
        found: spanned.token.to_string(),
        position: spanned.position,
    }
}
