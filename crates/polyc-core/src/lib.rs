//! Core IR data model for the polyc polyhedral loop compiler.
//!
//! The IR describes tensor programs as a list of named [`Compute`]
//! statements, each iterating an affine [`Domain`] and executing a store or
//! reduction over tensor accesses. All IR values are immutable after
//! construction; transformations elsewhere in the workspace return fresh
//! values.
//!
//! # Modules
//!
//! - [`tensor`] -- Tensors and element types
//! - [`expr`] -- Expression and constraint algebra, tensor accesses
//! - [`domain`] -- Iteration axes and affine domains
//! - [`stmt`] -- Statements (stores, reductions, blocks) and computes
//! - [`function`] -- Loop-order schedules and `PrimFunc`
//! - [`error`] -- Structural IR errors

pub mod domain;
pub mod error;
pub mod expr;
pub mod function;
pub mod stmt;
pub mod tensor;

// Re-export commonly used types
pub use domain::{Axis, AxisKind, Domain};
pub use error::CoreError;
pub use expr::{Access, BinOp, CmpOp, Constraint, Expr, LogicOp, UnOp};
pub use function::{PrimFunc, Schedule};
pub use stmt::{Compute, ReduceOp, ReduceStore, Stmt, Store};
pub use tensor::{ElemType, Tensor};
