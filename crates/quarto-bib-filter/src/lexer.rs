//! Tokenizer for filter expressions.

use crate::error::{FilterError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Num(f64),
    And,
    Or,
    Not,
    In,
    True,
    False,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Percent,
    Plus,
    Minus,
    Star,
    Slash,
    Dot,
    Comma,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    /// `;` or a newline outside brackets.
    Separator,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token in the filter source.
    pub offset: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    let mut depth = 0usize;

    while let Some(&(offset, c)) = chars.peek() {
        let kind = match c {
            '\n' if depth == 0 => {
                chars.next();
                TokenKind::Separator
            }
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '"' | '\'' => {
                chars.next();
                TokenKind::Str(string_literal(&mut chars, c, offset)?)
            }
            c if c.is_ascii_digit() => {
                let mut text = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' || d == '_' {
                        if d != '_' {
                            text.push(d);
                        }
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = text.parse::<f64>().map_err(|_| FilterError::Syntax {
                    message: format!("invalid number '{}'", text),
                    offset,
                })?;
                TokenKind::Num(value)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        ident.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match ident.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    "in" => TokenKind::In,
                    "True" => TokenKind::True,
                    "False" => TokenKind::False,
                    _ => TokenKind::Ident(ident),
                }
            }
            _ => {
                chars.next();
                let next = chars.peek().map(|&(_, d)| d);
                match (c, next) {
                    ('=', Some('=')) => {
                        chars.next();
                        TokenKind::Eq
                    }
                    ('!', Some('=')) => {
                        chars.next();
                        TokenKind::NotEq
                    }
                    ('<', Some('=')) => {
                        chars.next();
                        TokenKind::LtE
                    }
                    ('>', Some('=')) => {
                        chars.next();
                        TokenKind::GtE
                    }
                    ('<', _) => TokenKind::Lt,
                    ('>', _) => TokenKind::Gt,
                    ('%', _) => TokenKind::Percent,
                    ('+', _) => TokenKind::Plus,
                    ('-', _) => TokenKind::Minus,
                    ('*', _) => TokenKind::Star,
                    ('/', _) => TokenKind::Slash,
                    ('.', _) => TokenKind::Dot,
                    (',', _) => TokenKind::Comma,
                    (':', _) => TokenKind::Colon,
                    (';', _) => TokenKind::Separator,
                    ('(', _) => {
                        depth += 1;
                        TokenKind::LParen
                    }
                    (')', _) => {
                        depth = depth.saturating_sub(1);
                        TokenKind::RParen
                    }
                    ('{', _) => {
                        depth += 1;
                        TokenKind::LBrace
                    }
                    ('}', _) => {
                        depth = depth.saturating_sub(1);
                        TokenKind::RBrace
                    }
                    ('[', _) => {
                        depth += 1;
                        TokenKind::LBracket
                    }
                    (']', _) => {
                        depth = depth.saturating_sub(1);
                        TokenKind::RBracket
                    }
                    ('=', _) => {
                        return Err(FilterError::Syntax {
                            message: "assignment is not allowed, use '==' to compare".to_string(),
                            offset,
                        });
                    }
                    _ => {
                        return Err(FilterError::Syntax {
                            message: format!("unexpected character '{}'", c),
                            offset,
                        });
                    }
                }
            }
        };
        tokens.push(Token { kind, offset });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: source.len(),
    });
    Ok(tokens)
}

fn string_literal(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String> {
    let mut value = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            c if c == quote => return Ok(value),
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, q)) if q == '"' || q == '\'' => value.push(q),
                // Unknown escapes are kept verbatim so regex escapes like `\d` survive.
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            '\n' => break,
            c => value.push(c),
        }
    }
    Err(FilterError::Syntax {
        message: "unterminated string literal".to_string(),
        offset: start,
    })
}
