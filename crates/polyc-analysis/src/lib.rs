//! Polyhedral analysis passes over the polyc IR.
//!
//! Lowers the IR into integer-polyhedral objects and derives the relations
//! the scheduler and code generator consume:
//!
//! - [`affine`] -- Rendering of expressions/constraints into isl text
//! - [`builder`] -- Iteration domains and identity schedules
//! - [`access`] -- Read/write access relation extraction
//! - [`dependence`] -- RAW/WAR/WAW dependence relations
//! - [`graph`] -- Statement-level dependence graph summaries
//! - [`error`] -- Analysis errors
//!
//! All passes are pure over the (immutable) IR and scoped to one isl
//! [`polyc_isl::Context`].

pub mod access;
pub mod affine;
pub mod builder;
pub mod dependence;
pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod graph;

pub use access::{build_accesses, build_read_access, build_write_access, Accesses};
pub use affine::{compute_header, constraint_to_affine, expr_to_affine};
pub use builder::{
    build_domain, build_domain_and_schedule, build_schedule, collect_params, param_space,
    projected_loop_order,
};
pub use dependence::{
    all_dependences, dependences_for, happens_before, raw_dependence, war_dependence,
    waw_dependence, DepKind, Dependences,
};
pub use error::{AffineError, AnalysisError};
pub use graph::{dependence_edges, statement_graph, DepEdge};
