//! Filter expressions for bibliography listings.
//!
//! A listing may select its entries with a small boolean language:
//!
//! ```text
//! type == "book" and cited
//! author % "Knuth" or key in {"lamport94", "knuth84"}
//! not cited and docname == "appendix"
//! ```
//!
//! [`Filter::compile`] parses the source once; [`Filter::evaluate`] runs it
//! against each candidate entry. Both fail with a [`FilterError`] that the
//! caller turns into a warning before falling back to cited-only inclusion.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;

use std::collections::HashMap;
use std::str::FromStr;

use regex::Regex;

pub use ast::{BoolOp, CmpOp, Expr, Literal};
pub use error::{FilterError, Result};
pub use eval::{FilterContext, Value, lookup};

/// A compiled filter.
#[derive(Debug, Clone)]
pub struct Filter {
    source: String,
    body: Vec<Expr>,
    /// Literal patterns compiled up front; invalid ones are left out and
    /// reported when evaluated.
    regexes: HashMap<String, Regex>,
}

impl Filter {
    /// Parse `source`. Only syntax errors are reported here.
    pub fn compile(source: &str) -> Result<Filter> {
        let body = parser::parse(source)?;
        let mut regexes = HashMap::new();
        for expr in &body {
            collect_patterns(expr, &mut regexes);
        }
        Ok(Filter {
            source: source.to_string(),
            body,
            regexes,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn body(&self) -> &[Expr] {
        &self.body
    }

    /// Decide whether the entry in `ctx` passes the filter.
    pub fn evaluate(&self, ctx: &FilterContext<'_>) -> Result<bool> {
        let [expr] = self.body.as_slice() else {
            return Err(FilterError::MultipleExpressions {
                count: self.body.len(),
            });
        };
        let evaluator = eval::Evaluator {
            regexes: &self.regexes,
            ctx,
        };
        Ok(evaluator.eval(expr)?.is_truthy())
    }
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Filter::compile(s)
    }
}

fn collect_patterns(expr: &Expr, regexes: &mut HashMap<String, Regex>) {
    match expr {
        Expr::Match { subject, pattern } => {
            collect_patterns(subject, regexes);
            if let Expr::Literal(Literal::Str(p)) = pattern.as_ref() {
                if let Ok(regex) = eval::compile_regex(p) {
                    regexes.insert(p.clone(), regex);
                }
            } else {
                collect_patterns(pattern, regexes);
            }
        }
        Expr::Set(items) => items.iter().for_each(|e| collect_patterns(e, regexes)),
        Expr::Not(inner) => collect_patterns(inner, regexes),
        Expr::BoolOp { operands, .. } => operands.iter().for_each(|e| collect_patterns(e, regexes)),
        Expr::Compare { left, comparisons } => {
            collect_patterns(left, regexes);
            for (_, right) in comparisons {
                collect_patterns(right, regexes);
            }
        }
        Expr::Literal(_) | Expr::Identifier(_) | Expr::Unsupported(_) => {}
    }
}
