//! Code generation for polyc: scheduling, tiling, lowering, and C emission.
//!
//! This crate turns an analyzed tensor program into C source. The flow is
//! IR -> (domain, schedule, accesses) -> (scheduler, possibly tiler) ->
//! loop AST -> C.
//!
//! # Modules
//!
//! - [`ast`] -- The core's own loop AST (for loops, guards, blocks, user
//!   statements)
//! - [`lower`] -- Conversion from the isl AST into [`ast`]
//! - [`tiler`] -- Band tiling with the dependence-sign legality check
//! - [`codegen`] -- The C emitter (stores, reductions, linearization)
//! - [`compiler`] -- The `compile`/`compile_fused` entry points
//! - [`error`] -- Error types for all compilation failure modes

pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod error;
mod fusion;
pub mod lower;
mod scheduler;
pub mod tiler;

pub use compiler::{compile, compile_fused};
pub use error::CodegenError;

use polyc_core::Schedule;
use serde::{Deserialize, Serialize};

/// One tiling request: the named loop axis and a strictly positive tile
/// size. The axis resolves to a band member through the function's loop
/// order; size 1 is a legal no-op tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub axis: String,
    pub size: i64,
}

impl Tile {
    pub fn new(axis: impl Into<String>, size: i64) -> Self {
        Tile {
            axis: axis.into(),
            size,
        }
    }
}

/// Options controlling a compilation.
///
/// An explicit `schedule` replaces the function's own loop order and wins
/// over `optimize`. For function lists neither `schedule` nor `tiles` is
/// accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Loop-order override for the compiled function.
    pub schedule: Option<Schedule>,

    /// Compute the schedule with the polyhedral solver (validity +
    /// coincidence + proximity from the dependence relations).
    pub optimize: bool,

    /// Tiles to apply to the topmost schedule band.
    pub tiles: Vec<Tile>,
}
