//! Safe wrapper over the isl integer polyhedral library.
//!
//! This crate is the workspace's boundary to its polyhedral arithmetic
//! engine. It exposes exactly the operations the compiler pipeline needs:
//! parsing union sets/maps from textual literals, parameter alignment, the
//! relational algebra (union, intersect, apply, reverse, subset/equality/
//! emptiness), strict lexicographic ordering, dependence deltas, schedule
//! trees and the schedule solver, band tiling, and loop-AST generation with
//! node/expression introspection.
//!
//! Every object borrows the [`Context`] it was created from, so polyhedral
//! state cannot escape a compile invocation, and a context is never shared
//! across threads. Failed operations surface as [`IslError`]; parse
//! failures carry the offending literal.
//!
//! # Modules
//!
//! - [`ctx`] -- Context construction and error capture
//! - [`set`] -- Spaces, sets, union sets
//! - [`map`] -- Maps and union maps
//! - [`schedule`] -- Schedule trees, band nodes, schedule solver
//! - [`ast`] -- Loop-AST generation and introspection
//! - [`error`] -- Structured wrapper errors

pub mod ast;
pub mod ctx;
pub mod error;
mod ffi;
pub mod map;
pub mod schedule;
pub mod set;

pub use ast::{AstBuild, AstExpr, AstExprKind, AstNode, AstNodeKind, AstOpKind};
pub use ctx::Context;
pub use error::{IslError, IslErrorKind};
pub use map::{Map, UnionMap};
pub use schedule::{Schedule, ScheduleConstraints, ScheduleNode, ScheduleNodeKind};
pub use set::{Set, Space, UnionSet};
