//! Typed expression tree for filters.
//!
//! Every node the parser can produce is a variant here. Constructs outside
//! the filter language still parse (so that error messages can name them)
//! but end up as [`Expr::Unsupported`] and fail when evaluated.

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    In,
    NotIn,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// `{a, b, c}`
    Set(Vec<Expr>),
    Identifier(String),
    Not(Box<Expr>),
    /// `a and b and c` is a single node with three operands.
    BoolOp { op: BoolOp, operands: Vec<Expr> },
    /// A comparison chain. Only chains of length one evaluate.
    Compare {
        left: Box<Expr>,
        comparisons: Vec<(CmpOp, Expr)>,
    },
    /// `subject % pattern`: regular expression search.
    Match {
        subject: Box<Expr>,
        pattern: Box<Expr>,
    },
    Unsupported(String),
}

impl Expr {
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str(value.into()))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }
}
