//! Statements and computes.

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::expr::{Access, Constraint, Expr};

/// Reduction combinators for [`ReduceStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReduceOp {
    Sum,
    Prod,
    Max,
    Min,
}

/// A plain write of an expression to a tensor access, optionally guarded by
/// a per-statement predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub access: Access,
    pub value: Expr,
    pub guard: Option<Constraint>,
}

impl Store {
    pub fn new(access: Access, value: Expr) -> Self {
        Store {
            access,
            value,
            guard: None,
        }
    }

    pub fn guarded(access: Access, value: Expr, guard: Constraint) -> Self {
        Store {
            access,
            value,
            guard: Some(guard),
        }
    }
}

/// A reduction update `target := target (+) value`.
///
/// When `init` is present the target is assigned the init value on the
/// lexicographically first point of the reduce iterators; the update itself
/// runs on every point. Without `init` the caller is assumed to have
/// pre-initialized the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReduceStore {
    pub op: ReduceOp,
    pub access: Access,
    pub value: Expr,
    pub init: Option<Expr>,
}

impl ReduceStore {
    pub fn new(op: ReduceOp, access: Access, value: Expr, init: Option<Expr>) -> Self {
        ReduceStore {
            op,
            access,
            value,
            init,
        }
    }
}

/// A statement in a compute body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Store(Store),
    Reduce(ReduceStore),
    /// Ordered statement sequence.
    Block(Vec<Stmt>),
}

impl Stmt {
    /// The write accesses of this statement subtree, in order.
    pub fn writes(&self) -> Vec<&Access> {
        let mut out = Vec::new();
        self.collect_writes(&mut out);
        out
    }

    fn collect_writes<'a>(&'a self, out: &mut Vec<&'a Access>) {
        match self {
            Stmt::Store(store) => out.push(&store.access),
            Stmt::Reduce(reduce) => out.push(&reduce.access),
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    stmt.collect_writes(out);
                }
            }
        }
    }
}

/// A named statement: an iteration domain plus a body executed at each
/// domain point. The name tags the compute's iteration space in all
/// polyhedral sets and maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compute {
    pub name: String,
    pub domain: Domain,
    pub body: Stmt,
}

impl Compute {
    pub fn new(name: impl Into<String>, domain: Domain, body: Stmt) -> Self {
        Compute {
            name: name.into(),
            domain,
            body,
        }
    }
}
