//! Top-level compilation pipelines.
//!
//! [`compile`] drives a single function through planning, AST generation,
//! lowering, and C emission; [`compile_fused`] does the same for a list of
//! functions composed into one loop nest. Each invocation creates a fresh
//! isl [`Context`] that is dropped at function exit, so no polyhedral state
//! escapes the compilation boundary.

use std::borrow::Cow;

use polyc_core::PrimFunc;
use polyc_isl::Context;
use tracing::debug;

use crate::codegen::ast_to_c;
use crate::error::CodegenError;
use crate::lower::convert_ast;
use crate::{fusion, scheduler, CompileOptions};

/// Compiles a single function to C source.
///
/// Pipeline:
/// 1. Validate the IR (structural errors are rejected before any
///    polyhedral work)
/// 2. Apply the explicit schedule override, which wins over `optimize`
/// 3. Create a fresh isl context
/// 4. Plan the schedule (identity, tiled, or solver-computed)
/// 5. Generate the loop AST and lower it into the core AST
/// 6. Emit C
pub fn compile(func: &PrimFunc, options: &CompileOptions) -> Result<String, CodegenError> {
    // 1. Structural validation
    func.validate()?;

    // 2. Explicit schedule override
    let func: Cow<'_, PrimFunc> = match &options.schedule {
        Some(schedule) => {
            let mut overridden = func.clone();
            overridden.schedule = schedule.clone();
            overridden.validate()?;
            Cow::Owned(overridden)
        }
        None => Cow::Borrowed(func),
    };
    let mut options = options.clone();
    if options.schedule.is_some() {
        options.optimize = false;
    }

    // 3. Fresh context, dropped at return
    let ctx = Context::new();

    // 4. Schedule planning
    let planned = scheduler::plan(&ctx, &func, &options)?;

    // 5. Loop AST generation and lowering
    let isl_ast = scheduler::generate_ast(&ctx, &planned)?;
    let ast = convert_ast(&isl_ast)?;

    // 6. C emission
    let source = ast_to_c(&ast, &func)?;
    debug!(function = %func.name, bytes = source.len(), "compiled function");
    Ok(source)
}

/// Compiles a non-empty list of functions as one fused unit.
///
/// An explicit schedule and tiling are rejected for lists; the fused
/// schedule construction (and its solver fallback) decides the loop
/// structure instead.
pub fn compile_fused(
    funcs: &[PrimFunc],
    options: &CompileOptions,
) -> Result<String, CodegenError> {
    if funcs.is_empty() {
        return Err(CodegenError::EmptyFunctionList);
    }
    if options.schedule.is_some() {
        return Err(CodegenError::InvalidOptions {
            reason: "an explicit schedule cannot be applied to a function list".to_string(),
        });
    }
    if !options.tiles.is_empty() {
        return Err(CodegenError::InvalidOptions {
            reason: "tiling is not supported for a function list".to_string(),
        });
    }
    for func in funcs {
        func.validate()?;
    }

    let ctx = Context::new();
    let (ast, fused_func) = fusion::build_fused_ast(&ctx, funcs)?;
    let source = ast_to_c(&ast, &fused_func)?;
    debug!(function = %fused_func.name, bytes = source.len(), "compiled fused unit");
    Ok(source)
}
