/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Recursive-descent parser for filter expressions.
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparisons
//! (`== != < <= > >= in not in`), `+ -`, `* / %`, unary `+ -`,
//! then postfix calls, attributes and subscripts.

use crate::ast::{BoolOp, CmpOp, Expr, Literal};
use crate::error::{FilterError, Result};
use crate::lexer::{Token, TokenKind, tokenize};

/// Parse `source` into its top-level expressions.
///
/// Statements separated by `;` or newlines are returned individually so
/// the caller can report how many there were.
pub fn parse(source: &str) -> Result<Vec<Expr>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].offset
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", what)))
        }
    }

    fn error(&self, message: String) -> FilterError {
        let message = match self.peek() {
            TokenKind::Eof => format!("{}, found end of expression", message),
            other => format!("{}, found {}", message, describe(other)),
        };
        FilterError::Syntax {
            message,
            offset: self.offset(),
        }
    }

    fn program(&mut self) -> Result<Vec<Expr>> {
        let mut body = Vec::new();
        loop {
            while self.eat(&TokenKind::Separator) {}
            if *self.peek() == TokenKind::Eof {
                break;
            }
            body.push(self.expression()?);
            match self.peek() {
                TokenKind::Separator | TokenKind::Eof => {}
                _ => return Err(self.error("expected end of expression".to_string())),
            }
        }
        if body.is_empty() {
            return Err(FilterError::Syntax {
                message: "empty filter expression".to_string(),
                offset: 0,
            });
        }
        Ok(body)
    }

    fn expression(&mut self) -> Result<Expr> {
        self.bool_op(BoolOp::Or)
    }

    fn bool_op(&mut self, op: BoolOp) -> Result<Expr> {
        let (token, next) = match op {
            BoolOp::Or => (TokenKind::Or, BoolOp::And),
            BoolOp::And => (TokenKind::And, BoolOp::And),
        };
        let operand = |p: &mut Self| match op {
            BoolOp::Or => p.bool_op(next),
            BoolOp::And => p.not_expr(),
        };
        let first = operand(self)?;
        let mut operands = vec![first];
        while self.eat(&token) {
            operands.push(operand(self)?);
        }
        if operands.len() == 1 {
            Ok(operands.remove(0))
        } else {
            Ok(Expr::BoolOp { op, operands })
        }
    }

    fn not_expr(&mut self) -> Result<Expr> {
        if self.eat(&TokenKind::Not) {
            Ok(Expr::Not(Box::new(self.not_expr()?)))
        } else {
            self.comparison()
        }
    }

    fn comparison(&mut self) -> Result<Expr> {
        let left = self.additive()?;
        let mut comparisons = Vec::new();
        loop {
            let op = match self.peek() {
                TokenKind::Eq => CmpOp::Eq,
                TokenKind::NotEq => CmpOp::NotEq,
                TokenKind::Lt => CmpOp::Lt,
                TokenKind::LtE => CmpOp::LtE,
                TokenKind::Gt => CmpOp::Gt,
                TokenKind::GtE => CmpOp::GtE,
                TokenKind::In => CmpOp::In,
                TokenKind::Not => {
                    // `not` here must start `not in`.
                    self.advance();
                    if *self.peek() != TokenKind::In {
                        return Err(self.error("expected 'in' after 'not'".to_string()));
                    }
                    CmpOp::NotIn
                }
                _ => break,
            };
            self.advance();
            comparisons.push((op, self.additive()?));
        }
        if comparisons.is_empty() {
            Ok(left)
        } else {
            Ok(Expr::Compare {
                left: Box::new(left),
                comparisons,
            })
        }
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut left = self.multiplicative()?;
        loop {
            let symbol = match self.peek() {
                TokenKind::Plus => "+",
                TokenKind::Minus => "-",
                _ => return Ok(left),
            };
            self.advance();
            self.multiplicative()?;
            left = Expr::Unsupported(format!("binary operator '{}'", symbol));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.unary()?;
        loop {
            match self.peek() {
                TokenKind::Percent => {
                    self.advance();
                    let pattern = self.unary()?;
                    left = Expr::Match {
                        subject: Box::new(left),
                        pattern: Box::new(pattern),
                    };
                }
                TokenKind::Star | TokenKind::Slash => {
                    let symbol = if *self.peek() == TokenKind::Star { "*" } else { "/" };
                    self.advance();
                    self.unary()?;
                    left = Expr::Unsupported(format!("binary operator '{}'", symbol));
                }
                _ => return Ok(left),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        match self.peek() {
            TokenKind::Minus | TokenKind::Plus => {
                let symbol = if *self.peek() == TokenKind::Minus { "-" } else { "+" };
                self.advance();
                self.unary()?;
                Ok(Expr::Unsupported(format!("unary operator '{}'", symbol)))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr> {
        let mut expr = self.atom()?;
        loop {
            match self.peek() {
                TokenKind::LParen => {
                    self.advance();
                    self.sequence(TokenKind::RParen, "')'")?;
                    expr = Expr::Unsupported("function call".to_string());
                }
                TokenKind::Dot => {
                    self.advance();
                    if !matches!(self.peek(), TokenKind::Ident(_)) {
                        return Err(self.error("expected attribute name".to_string()));
                    }
                    self.advance();
                    expr = Expr::Unsupported("attribute access".to_string());
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expr::Unsupported("subscript".to_string());
                }
                _ => return Ok(expr),
            }
        }
    }

    fn atom(&mut self) -> Result<Expr> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Identifier(name))
            }
            TokenKind::Str(first) => {
                self.advance();
                // Adjacent literals concatenate: "a" "b" is "ab".
                let mut value = first;
                while let TokenKind::Str(next) = self.peek().clone() {
                    self.advance();
                    value.push_str(&next);
                }
                Ok(Expr::Literal(Literal::Str(value)))
            }
            TokenKind::Num(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Num(n)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::LParen => {
                self.advance();
                if self.eat(&TokenKind::RParen) {
                    return Ok(Expr::Unsupported("tuple".to_string()));
                }
                let inner = self.expression()?;
                if *self.peek() == TokenKind::Comma {
                    self.advance();
                    self.sequence(TokenKind::RParen, "')'")?;
                    return Ok(Expr::Unsupported("tuple".to_string()));
                }
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBrace => {
                self.advance();
                if self.eat(&TokenKind::RBrace) {
                    return Ok(Expr::Unsupported("dictionary".to_string()));
                }
                let first = self.expression()?;
                if self.eat(&TokenKind::Colon) {
                    self.expression()?;
                    while self.eat(&TokenKind::Comma) {
                        if *self.peek() == TokenKind::RBrace {
                            break;
                        }
                        self.expression()?;
                        self.expect(TokenKind::Colon, "':'")?;
                        self.expression()?;
                    }
                    self.expect(TokenKind::RBrace, "'}'")?;
                    return Ok(Expr::Unsupported("dictionary".to_string()));
                }
                let mut elements = vec![first];
                while self.eat(&TokenKind::Comma) {
                    if *self.peek() == TokenKind::RBrace {
                        break;
                    }
                    elements.push(self.expression()?);
                }
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(Expr::Set(elements))
            }
            TokenKind::LBracket => {
                self.advance();
                self.sequence(TokenKind::RBracket, "']'")?;
                Ok(Expr::Unsupported("list".to_string()))
            }
            _ => Err(self.error("expected an expression".to_string())),
        }
    }

    /// Parse a comma-separated sequence up to and including `close`.
    fn sequence(&mut self, close: TokenKind, what: &str) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        while *self.peek() != close {
            items.push(self.expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close, what)?;
        Ok(items)
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => format!("'{}'", name),
        TokenKind::Str(s) => format!("string \"{}\"", s),
        TokenKind::Num(n) => format!("number {}", n),
        TokenKind::Separator => "end of statement".to_string(),
        TokenKind::Eof => "end of expression".to_string(),
        other => format!("{:?}", other).to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(source: &str) -> Expr {
        let mut body = parse(source).unwrap();
        assert_eq!(body.len(), 1, "{:?}", body);
        body.remove(0)
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(
            single("cited or type == 'book' and not author % 'Knuth'"),
            Expr::BoolOp {
                op: BoolOp::Or,
                operands: vec![
                    Expr::ident("cited"),
                    Expr::BoolOp {
                        op: BoolOp::And,
                        operands: vec![
                            Expr::Compare {
                                left: Box::new(Expr::ident("type")),
                                comparisons: vec![(CmpOp::Eq, Expr::string("book"))],
                            },
                            Expr::Not(Box::new(Expr::Match {
                                subject: Box::new(Expr::ident("author")),
                                pattern: Box::new(Expr::string("Knuth")),
                            })),
                        ],
                    },
                ],
            }
        );
    }

    #[test]
    fn test_parse_not_in_and_set() {
        assert_eq!(
            single("type not in {'book', 'misc',}"),
            Expr::Compare {
                left: Box::new(Expr::ident("type")),
                comparisons: vec![(
                    CmpOp::NotIn,
                    Expr::Set(vec![Expr::string("book"), Expr::string("misc")])
                )],
            }
        );
    }

    #[test]
    fn test_chained_comparison_parses_as_chain() {
        match single("'1990' < year < '2000'") {
            Expr::Compare { comparisons, .. } => assert_eq!(comparisons.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_constructs_are_named() {
        assert_eq!(
            single("len(author)"),
            Expr::Unsupported("function call".to_string())
        );
        assert_eq!(
            single("year + 1 == 2000"),
            Expr::Compare {
                left: Box::new(Expr::Unsupported("binary operator '+'".to_string())),
                comparisons: vec![(CmpOp::Eq, Expr::Literal(Literal::Num(2000.0)))],
            }
        );
        assert_eq!(single("{}"), Expr::Unsupported("dictionary".to_string()));
    }

    #[test]
    fn test_multiple_statements() {
        assert_eq!(parse("cited; True").unwrap().len(), 2);
        assert_eq!(parse("cited\n\nTrue\n").unwrap().len(), 2);
    }

    #[test]
    fn test_syntax_errors() {
        for source in ["", "type ==", "(cited", "cited cited", "not", "a not b"] {
            let err = parse(source).unwrap_err();
            assert!(err.is_syntax_error(), "{}: {:?}", source, err);
        }
    }
}
