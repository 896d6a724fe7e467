/*
 * eval.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation of filter expressions against one entry.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use quarto_bibtex::BibEntry;
use regex::Regex;

use crate::ast::{BoolOp, CmpOp, Expr, Literal};
use crate::error::{FilterError, Result};

/// Everything an identifier in a filter can refer to.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// The candidate entry, with any key prefix already applied.
    pub entry: &'a BibEntry,
    /// The document that declares the listing being resolved.
    pub docname: &'a str,
    /// Documents containing a citation of the entry's key.
    pub cited_docnames: &'a BTreeSet<String>,
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Set(Vec<Value>),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Num(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Set(items) => !items.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Set(_) => "set",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Bool(true) => Some(1.0),
            Value::Bool(false) => Some(0.0),
            _ => None,
        }
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Set(a), Value::Set(b)) => {
            a.iter().all(|x| b.iter().any(|y| values_equal(x, y)))
                && b.iter().all(|y| a.iter().any(|x| values_equal(x, y)))
        }
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn order(op: CmpOp, left: &Value, right: &Value) -> Result<Ordering> {
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };
    ordering.ok_or(FilterError::TypeMismatch {
        op: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    })
}

fn contains(op: CmpOp, item: &Value, container: &Value) -> Result<bool> {
    match (item, container) {
        (Value::Str(needle), Value::Str(haystack)) => Ok(haystack.contains(needle.as_str())),
        (_, Value::Set(items)) => Ok(items.iter().any(|x| values_equal(item, x))),
        _ => Err(FilterError::TypeMismatch {
            op: op.symbol(),
            left: item.type_name(),
            right: container.type_name(),
        }),
    }
}

pub(crate) fn compare(op: CmpOp, left: &Value, right: &Value) -> Result<bool> {
    Ok(match op {
        CmpOp::Eq => values_equal(left, right),
        CmpOp::NotEq => !values_equal(left, right),
        CmpOp::Lt => order(op, left, right)? == Ordering::Less,
        CmpOp::LtE => order(op, left, right)? != Ordering::Greater,
        CmpOp::Gt => order(op, left, right)? == Ordering::Greater,
        CmpOp::GtE => order(op, left, right)? != Ordering::Less,
        CmpOp::In => contains(op, left, right)?,
        CmpOp::NotIn => !contains(op, left, right)?,
    })
}

/// Resolve an identifier against the context.
pub fn lookup(name: &str, ctx: &FilterContext<'_>) -> Value {
    match name {
        "type" => Value::Str(ctx.entry.entry_type.to_lowercase()),
        "key" => Value::Str(ctx.entry.key.to_lowercase()),
        "cited" => Value::Bool(!ctx.cited_docnames.is_empty()),
        "docname" => Value::Str(ctx.docname.to_string()),
        "docnames" => Value::Set(
            ctx.cited_docnames
                .iter()
                .map(|d| Value::Str(d.clone()))
                .collect(),
        ),
        "author" | "editor" => Value::Str(
            ctx.entry
                .persons(name)
                .map(|persons| {
                    persons
                        .iter()
                        .map(|p| p.to_bibtex_string())
                        .collect::<Vec<_>>()
                        .join(" and ")
                })
                .unwrap_or_default(),
        ),
        field => Value::Str(ctx.entry.field(field).unwrap_or_default().to_string()),
    }
}

pub(crate) struct Evaluator<'f, 'c> {
    pub(crate) regexes: &'f HashMap<String, Regex>,
    pub(crate) ctx: &'f FilterContext<'c>,
}

impl Evaluator<'_, '_> {
    pub(crate) fn eval(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(Literal::Str(s)) => Ok(Value::Str(s.clone())),
            Expr::Literal(Literal::Num(n)) => Ok(Value::Num(*n)),
            Expr::Literal(Literal::Bool(b)) => Ok(Value::Bool(*b)),
            Expr::Set(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Set),
            Expr::Identifier(name) => Ok(lookup(name, self.ctx)),
            Expr::Not(inner) => Ok(Value::Bool(!self.eval(inner)?.is_truthy())),
            Expr::BoolOp { op, operands } => {
                // Short-circuits and yields the deciding operand.
                let mut last = Value::Bool(*op == BoolOp::And);
                for operand in operands {
                    last = self.eval(operand)?;
                    let truthy = last.is_truthy();
                    match op {
                        BoolOp::And if !truthy => return Ok(last),
                        BoolOp::Or if truthy => return Ok(last),
                        _ => {}
                    }
                }
                Ok(last)
            }
            Expr::Compare { left, comparisons } => {
                let [(op, right)] = comparisons.as_slice() else {
                    return Err(FilterError::ChainedComparison);
                };
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                compare(*op, &left, &right).map(Value::Bool)
            }
            Expr::Match { subject, pattern } => {
                let subject = self.eval(subject)?;
                let pattern = self.eval(pattern)?;
                let (Value::Str(subject), Value::Str(pattern)) = (&subject, &pattern) else {
                    let found = if matches!(subject, Value::Str(_)) {
                        pattern.type_name()
                    } else {
                        subject.type_name()
                    };
                    return Err(FilterError::NonStringRegexOperand { found });
                };
                let matched = match self.regexes.get(pattern) {
                    Some(regex) => regex.is_match(subject),
                    None => compile_regex(pattern)?.is_match(subject),
                };
                Ok(Value::Bool(matched))
            }
            Expr::Unsupported(construct) => Err(FilterError::Unsupported {
                construct: construct.clone(),
            }),
        }
    }
}

pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
