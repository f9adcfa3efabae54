//! Codegen error types covering all compilation failure modes.

use thiserror::Error;

use polyc_analysis::AnalysisError;
use polyc_core::CoreError;
use polyc_isl::IslError;

/// Errors produced by scheduling, tiling, lowering, and C emission.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Structural IR error detected before any polyhedral work.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Failure in the analysis passes (domains, accesses, dependences).
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Underlying polyhedral library failure.
    #[error(transparent)]
    Isl(#[from] IslError),

    /// An AST node or expression the lowerer does not handle.
    #[error("unsupported loop AST construct: {detail}")]
    UnsupportedAst { detail: String },

    /// A generated user call references a statement name with no compute.
    #[error("unknown statement id '{name}' in generated AST")]
    UnknownStatement { name: String },

    /// A tile names an axis outside the loop order.
    #[error("unknown tile axis '{axis}'; available axes: {available:?}")]
    UnknownTileAxis {
        axis: String,
        available: Vec<String>,
    },

    /// Tile sizes must be strictly positive.
    #[error("tile size must be positive, got {size} for axis '{axis}'")]
    InvalidTileSize { axis: String, size: i64 },

    /// The dependence-distance sign test failed for the named axes.
    #[error("tiling violates dependences on axes {axes:?}: {}", violations.join("; "))]
    IllegalTiling {
        axes: Vec<String>,
        violations: Vec<String>,
    },

    /// No legal single-nest fusion exists for the function list.
    #[error("cannot fuse function list into a single loop nest; dependences: [{}]", edges.join(", "))]
    FusionFailure { edges: Vec<String> },

    /// A reduction carries an initializer but offers no axis to anchor the
    /// first-iteration guard on.
    #[error("reduction in compute '{compute}' has an initializer but no reduction axes")]
    DegenerateReduction { compute: String },

    /// Two functions in a fused unit declare the same tensor parameter
    /// with different shapes or element types.
    #[error("tensor parameter conflict for '{name}' across fused functions")]
    TensorConflict { name: String },

    /// `compile_fused` received an empty list.
    #[error("compile_fused() received an empty function list")]
    EmptyFunctionList,

    /// Option combination rejected by the entry point.
    #[error("invalid compile options: {reason}")]
    InvalidOptions { reason: String },
}
