//! Expression and constraint algebra.
//!
//! Expressions form the quasi-affine fragment used in domain constraints and
//! tensor subscripts plus the arithmetic used in statement bodies. They are
//! modeled as tagged variants with exhaustive case analysis; shared subterms
//! are permitted through plain cloning of immutable nodes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::tensor::Tensor;

/// Binary arithmetic and quasi-affine operators.
///
/// `Div` and `FloorDiv` both render as `floor(lhs / rhs)` in polyhedral
/// text; `Mod`, `Max`, `Min` map to the corresponding isl builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Max,
    Min,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Neg,
    Not,
}

/// Comparison operators used in constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// Logical connectives combining constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicOp {
    And,
    Or,
}

/// A tensor access: the tensor plus one index expression per dimension.
///
/// Read accesses are harvested from [`Expr::Load`] nodes (and from index
/// expressions themselves); the write access is a store target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Access {
    pub tensor: Tensor,
    pub index: SmallVec<[Expr; 4]>,
}

impl Access {
    pub fn new(tensor: Tensor, index: impl IntoIterator<Item = Expr>) -> Self {
        Access {
            tensor,
            index: index.into_iter().collect(),
        }
    }
}

/// The expression algebra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer constant.
    Int(i64),
    /// Float constant. Allowed in statement bodies only; rejected if it
    /// reaches polyhedral constraint text.
    Float(f64),
    /// Variable reference: an iterator or a symbolic parameter.
    Var(String),
    /// Binary operation.
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Unary operation.
    Unary { op: UnOp, operand: Box<Expr> },
    /// Named function application.
    Call { name: String, args: Vec<Expr> },
    /// Tensor load.
    Load(Box<Access>),
}

impl Expr {
    pub fn int(value: i64) -> Expr {
        Expr::Int(value)
    }

    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Add, lhs, rhs)
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Sub, lhs, rhs)
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Mul, lhs, rhs)
    }

    pub fn neg(operand: Expr) -> Expr {
        Expr::Unary {
            op: UnOp::Neg,
            operand: Box::new(operand),
        }
    }

    pub fn load(access: Access) -> Expr {
        Expr::Load(Box::new(access))
    }

    /// All load nodes in this expression, outermost first. Loads nested in
    /// index expressions of other loads are included: computing an index is
    /// itself a read.
    pub fn loads(&self) -> Vec<&Access> {
        let mut out = Vec::new();
        self.collect_loads(&mut out);
        out
    }

    fn collect_loads<'a>(&'a self, out: &mut Vec<&'a Access>) {
        match self {
            Expr::Int(_) | Expr::Float(_) | Expr::Var(_) => {}
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_loads(out);
                rhs.collect_loads(out);
            }
            Expr::Unary { operand, .. } => operand.collect_loads(out),
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_loads(out);
                }
            }
            Expr::Load(access) => {
                out.push(access);
                for idx in &access.index {
                    idx.collect_loads(out);
                }
            }
        }
    }

    /// Names of all variables referenced by this expression, in first-seen
    /// order. Load subscripts are included.
    pub fn referenced_names(&self, out: &mut Vec<String>) {
        match self {
            Expr::Int(_) | Expr::Float(_) => {}
            Expr::Var(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            Expr::Binary { lhs, rhs, .. } => {
                lhs.referenced_names(out);
                rhs.referenced_names(out);
            }
            Expr::Unary { operand, .. } => operand.referenced_names(out),
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.referenced_names(out);
                }
            }
            Expr::Load(access) => {
                for idx in &access.index {
                    idx.referenced_names(out);
                }
            }
        }
    }
}

/// An affine presburger predicate: comparisons combined with and/or.
///
/// A sequence of constraints is interpreted as a conjunction; `Logical`
/// nodes express disjunction where needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    Compare {
        op: CmpOp,
        lhs: Expr,
        rhs: Expr,
    },
    Logical {
        op: LogicOp,
        lhs: Box<Constraint>,
        rhs: Box<Constraint>,
    },
}

impl Constraint {
    pub fn compare(op: CmpOp, lhs: Expr, rhs: Expr) -> Constraint {
        Constraint::Compare { op, lhs, rhs }
    }

    pub fn le(lhs: Expr, rhs: Expr) -> Constraint {
        Constraint::compare(CmpOp::Le, lhs, rhs)
    }

    pub fn lt(lhs: Expr, rhs: Expr) -> Constraint {
        Constraint::compare(CmpOp::Lt, lhs, rhs)
    }

    pub fn ge(lhs: Expr, rhs: Expr) -> Constraint {
        Constraint::compare(CmpOp::Ge, lhs, rhs)
    }

    pub fn eq(lhs: Expr, rhs: Expr) -> Constraint {
        Constraint::compare(CmpOp::Eq, lhs, rhs)
    }

    pub fn and(lhs: Constraint, rhs: Constraint) -> Constraint {
        Constraint::Logical {
            op: LogicOp::And,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: Constraint, rhs: Constraint) -> Constraint {
        Constraint::Logical {
            op: LogicOp::Or,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Names of all variables referenced by this constraint.
    pub fn referenced_names(&self, out: &mut Vec<String>) {
        match self {
            Constraint::Compare { lhs, rhs, .. } => {
                lhs.referenced_names(out);
                rhs.referenced_names(out);
            }
            Constraint::Logical { lhs, rhs, .. } => {
                lhs.referenced_names(out);
                rhs.referenced_names(out);
            }
        }
    }
}
