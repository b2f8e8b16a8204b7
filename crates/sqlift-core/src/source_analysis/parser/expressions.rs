// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing via Pratt precedence climbing.
//!
//! Binary operator precedence is driven by a binding-power table. Left and
//! right powers differ by one for left associativity.
//!
//! | Level     | Operators            |
//! |-----------|----------------------|
//! | (40, 41)  | `=` `IN`             |
//! | (50, 51)  | `<` `>` `<=` `>=` `!=` |
//! | (60, 61)  | `+` `-`              |
//! | (120, 121)| `*` `/`              |
//!
//! Tokens without an entry end the expression, which doubles as error
//! recovery: the enclosing production decides what the unknown token means.

use ecow::EcoString;

use crate::ast::{CaseExpr, Expr, Identifier, WhenThen};
use crate::source_analysis::{Keyword, Token, TokenKind};

use super::{ParseResult, Parser};

/// Binding power for a binary operator.
#[derive(Debug, Clone, Copy)]
pub(super) struct BindingPower {
    /// How tightly the operator binds to its left operand.
    pub(super) left: u8,
    /// How tightly the operator binds to its right operand.
    pub(super) right: u8,
}

/// Gets the binding power for a binary operator, or `None` for tokens that
/// cannot continue an expression.
pub(super) fn binding_power(kind: TokenKind) -> Option<BindingPower> {
    match kind {
        TokenKind::Equal | TokenKind::Keyword(Keyword::In) => {
            Some(BindingPower { left: 40, right: 41 })
        }
        TokenKind::Less
        | TokenKind::Greater
        | TokenKind::LessEqual
        | TokenKind::GreaterEqual
        | TokenKind::NotEqual => Some(BindingPower { left: 50, right: 51 }),
        TokenKind::Plus | TokenKind::Minus => Some(BindingPower { left: 60, right: 61 }),
        TokenKind::Star | TokenKind::Slash => Some(BindingPower {
            left: 120,
            right: 121,
        }),
        _ => None,
    }
}

impl Parser<'_> {
    /// Parses an expression with the given minimum binding power.
    pub(crate) fn expr(&mut self, min_binding_power: u8) -> ParseResult<Expr> {
        self.with_context("expression", |p| {
            let mut lhs = p.nud()?;

            while !p.at_eof() {
                let Some(power) = binding_power(p.current_kind()) else {
                    return Ok(lhs);
                };
                if power.left < min_binding_power {
                    break;
                }

                let op = p.advance();
                let rhs = p.expr(power.right)?;
                lhs = Expr::BinaryOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                };
            }

            Ok(lhs)
        })
    }

    /// Null denotation: the expression form begun by the current token.
    fn nud(&mut self) -> ParseResult<Expr> {
        self.with_context("expression leaf", |p| match p.current_kind() {
            TokenKind::Identifier => p.identifier_nud(),
            kind if kind.is_numeric() => {
                let token = p.advance();
                p.number_expr(token)
            }
            TokenKind::StringLiteral => {
                let token = p.advance();
                let value = EcoString::from(token.unquoted());
                Ok(Expr::String { token, value })
            }
            TokenKind::Keyword(Keyword::True) => {
                let token = p.advance();
                Ok(Expr::Boolean { token, value: true })
            }
            TokenKind::Keyword(Keyword::False) => {
                let token = p.advance();
                Ok(Expr::Boolean {
                    token,
                    value: false,
                })
            }
            TokenKind::Keyword(Keyword::Null) => Ok(Expr::Null(p.advance())),
            TokenKind::Keyword(Keyword::Case) => p.case_expr(),
            TokenKind::LeftParen => {
                p.advance();
                let first = p.expr(0)?;

                // A comma turns the parenthesized expression into a tuple.
                if p.current_kind() == TokenKind::Comma {
                    p.advance();
                    let mut items = vec![first];
                    p.expr_list(&mut items)?;
                    p.expect(TokenKind::RightParen)?;
                    return Ok(Expr::List(items));
                }

                p.expect(TokenKind::RightParen)?;
                Ok(first)
            }
            _ => {
                let span = p.current.span();
                let report = p.error_here("expected expression leaf");
                p.report_error(report)?;
                Ok(Expr::Error(span))
            }
        })
    }

    /// An identifier at expression head: a bare name, a function call, or a
    /// qualified column name.
    ///
    /// `a.b` is table `a`, column `b`; `a.b.c` is schema `a`, table `b`,
    /// column `c`.
    fn identifier_nud(&mut self) -> ParseResult<Expr> {
        let ident = Identifier::from_token(self.advance());

        match self.current_kind() {
            TokenKind::LeftParen => {
                let l_paren = self.advance();
                let mut args = Vec::new();
                self.expr_list(&mut args)?;
                let r_paren = self.expect(TokenKind::RightParen)?;
                Ok(Expr::FunctionCall {
                    name: ident,
                    l_paren,
                    args,
                    r_paren,
                })
            }
            TokenKind::Period => {
                self.advance();
                let second = self.identifier()?;

                if self.current_kind() == TokenKind::Period {
                    self.advance();
                    let third = self.identifier()?;
                    return Ok(Expr::ColumnName {
                        schema: Some(ident),
                        table: Some(second),
                        column: third,
                    });
                }

                Ok(Expr::ColumnName {
                    schema: None,
                    table: Some(ident),
                    column: second,
                })
            }
            _ => Ok(Expr::Identifier(ident)),
        }
    }

    fn case_expr(&mut self) -> ParseResult<Expr> {
        self.with_context("case expression", |p| {
            let case_token = p.expect(TokenKind::Keyword(Keyword::Case))?;

            let operand = if p.current_kind() == TokenKind::Keyword(Keyword::When) {
                None
            } else {
                Some(Box::new(p.expr(0)?))
            };

            let mut arms = Vec::new();
            while !p.at_eof() {
                let when_token = p.expect(TokenKind::Keyword(Keyword::When))?;
                let when = p.expr(0)?;
                let then_token = p.expect(TokenKind::Keyword(Keyword::Then))?;
                let then = p.expr(0)?;
                arms.push(WhenThen {
                    when_token,
                    when,
                    then_token,
                    then,
                });

                if matches!(
                    p.current_kind(),
                    TokenKind::Keyword(Keyword::Else | Keyword::End)
                ) {
                    break;
                }
            }

            let mut else_token = None;
            let mut else_expr = None;
            if p.current_kind() == TokenKind::Keyword(Keyword::Else) {
                else_token = Some(p.advance());
                else_expr = Some(Box::new(p.expr(0)?));
            }

            let end_token = p.expect(TokenKind::Keyword(Keyword::End))?;

            Ok(Expr::Case(CaseExpr {
                case_token,
                operand,
                arms,
                else_token,
                else_expr,
                end_token,
            }))
        })
    }

    /// Comma-separated expressions appended to `items`, stopping at `)`
    /// (not consumed).
    fn expr_list(&mut self, items: &mut Vec<Expr>) -> ParseResult<()> {
        self.with_context("list of expressions", |p| {
            while !p.at_eof() {
                match p.current_kind() {
                    TokenKind::Comma => {
                        p.advance();
                    }
                    TokenKind::RightParen => break,
                    _ => items.push(p.expr(0)?),
                }
            }
            Ok(())
        })
    }

    /// Converts a numeric token into a literal expression.
    ///
    /// Radix literals (`0x…`, `0b…`, `00…`) become unsigned 64-bit
    /// integers; decimals with a `.`, exponent, or `f` suffix become
    /// floats; other decimals become integers. Underscore separators are
    /// stripped before parsing.
    pub(crate) fn number_expr(&mut self, token: Token) -> ParseResult<Expr> {
        let text = token.text();

        let parsed = match token.kind() {
            TokenKind::HexNumeric => parse_radix(text, "0x", 16).map(|value| Expr::Integer {
                token: token.clone(),
                value,
            }),
            TokenKind::BinaryNumeric => parse_radix(text, "0b", 2).map(|value| Expr::Integer {
                token: token.clone(),
                value,
            }),
            // Octal keeps its `00` prefix: leading zeros don't change the
            // value in radix 8.
            TokenKind::OctalNumeric => {
                let digits: String = text.chars().filter(|&c| c != '_').collect();
                u64::from_str_radix(&digits, 8).ok().map(|value| Expr::Integer {
                    token: token.clone(),
                    value,
                })
            }
            TokenKind::DecimalNumeric => {
                if text.contains(['.', 'e', 'f']) {
                    text.trim_end_matches('f')
                        .parse::<f64>()
                        .ok()
                        .map(|value| Expr::Float {
                            token: token.clone(),
                            value,
                        })
                } else {
                    text.parse::<u64>().ok().map(|value| Expr::Integer {
                        token: token.clone(),
                        value,
                    })
                }
            }
            _ => None,
        };

        match parsed {
            Some(expr) => Ok(expr),
            None => {
                let span = token.span();
                let report = crate::diagnostics::Report::error("parse error")
                    .with_label(span, "unable to parse numeric literal");
                self.report_error_at(span, report)?;
                Ok(Expr::Error(span))
            }
        }
    }
}

/// Strips a two-character radix prefix and underscore separators, then
/// parses with the given radix.
fn parse_radix(text: &str, prefix: &str, radix: u32) -> Option<u64> {
    let digits = text
        .strip_prefix(prefix)
        .or_else(|| text.strip_prefix(&prefix.to_uppercase()))?;
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    u64::from_str_radix(&digits, radix).ok()
}
