//! The core's own loop AST, mirroring the polyhedral library's output.
//!
//! The lowerer converts isl's AST into these types; the C emitter consumes
//! them. Modeled as tagged variants with exhaustive case analysis, and
//! serde-serializable for debugging dumps.

use serde::{Deserialize, Serialize};

/// Binary operators of the loop AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AstOp {
    Le,
    Lt,
    Ge,
    Gt,
    Eq,
    Add,
    Sub,
    Mul,
    Div,
    FdivQ,
    PdivQ,
    PdivR,
    ZdivR,
    Min,
    Max,
    And,
    Or,
}

/// Unary operators of the loop AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AstUnOp {
    Minus,
}

/// Expressions of the loop AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstExpr {
    /// Identifier (loop iterator or statement name).
    Id(String),
    /// Integer value.
    Val(i64),
    /// Unary operation.
    Unary {
        op: AstUnOp,
        operand: Box<AstExpr>,
    },
    /// Binary operation.
    Bin(AstBinOp),
    /// Opaque user-statement application; the first argument is the
    /// statement-name identifier.
    Call(AstCall),
}

impl AstExpr {
    pub fn bin(op: AstOp, lhs: AstExpr, rhs: AstExpr) -> AstExpr {
        AstExpr::Bin(AstBinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn id(name: impl Into<String>) -> AstExpr {
        AstExpr::Id(name.into())
    }

    pub fn val(value: i64) -> AstExpr {
        AstExpr::Val(value)
    }
}

/// A binary operation node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstBinOp {
    pub op: AstOp,
    pub lhs: Box<AstExpr>,
    pub rhs: Box<AstExpr>,
}

/// A user-statement call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstCall {
    pub args: Vec<AstExpr>,
}

/// A for loop. The increment is a positive constant; general initializer
/// and condition expressions cover tiled and skewed schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForLoop {
    pub iterator: String,
    pub init: AstExpr,
    pub cond: AstBinOp,
    pub inc: i64,
    pub body: Box<AstStmt>,
}

/// A conditional region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub cond: AstBinOp,
    pub then: Box<AstStmt>,
}

/// Statements of the loop AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstStmt {
    For(ForLoop),
    If(Guard),
    User(AstCall),
    Block(Vec<AstStmt>),
}

impl AstStmt {
    /// Descends through guards and single-statement blocks to the outermost
    /// loop, if the tree forms a single loop nest.
    pub fn single_loop_root(&self) -> Option<&ForLoop> {
        match self {
            AstStmt::For(for_loop) => Some(for_loop),
            AstStmt::If(guard) => guard.then.single_loop_root(),
            AstStmt::Block(stmts) => match stmts.as_slice() {
                [only] => only.single_loop_root(),
                _ => None,
            },
            AstStmt::User(_) => None,
        }
    }
}
