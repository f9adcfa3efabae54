//! Multi-function composition: fuse a list of functions into one loop nest.
//!
//! Statement names are tagged with a function-local prefix to stay globally
//! unique, tensor parameters are merged by name, and a candidate fused
//! schedule (shared outer loops first) is tested against the unified
//! dependences. If the candidate is illegal the isl solver takes over; if
//! the result is still not a single outer loop nest, fusion fails with the
//! statement-level dependence edges attached.

use indexmap::IndexMap;
use polyc_analysis::{
    build_accesses, build_domain, collect_params, compute_header, dependence_edges,
    dependences_for, happens_before, param_space, projected_loop_order, AnalysisError,
    Dependences,
};
use polyc_core::{Compute, PrimFunc, Schedule, Tensor};
use polyc_isl::{self as isl, Context, ScheduleConstraints, Space, UnionMap, UnionSet};
use tracing::debug;

use crate::ast::AstStmt;
use crate::error::CodegenError;
use crate::lower::convert_ast;

/// Maps arbitrary names into C-identifier-safe fragments: non-identifier
/// characters become `_`, a leading digit is prefixed.
pub(crate) fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        return "anon".to_string();
    }
    if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("f_{cleaned}")
    } else {
        cleaned
    }
}

/// Prefixes every statement name with `f{index}_{function}__` so names stay
/// unique across the fused unit.
fn tag_primfunc(func: &PrimFunc, func_index: usize) -> PrimFunc {
    let prefix = format!("f{}_{}", func_index, sanitize_name(&func.name));
    let computes: Vec<Compute> = func
        .computes
        .iter()
        .map(|compute| Compute {
            name: format!("{prefix}__{}", sanitize_name(&compute.name)),
            domain: compute.domain.clone(),
            body: compute.body.clone(),
        })
        .collect();
    PrimFunc {
        name: func.name.clone(),
        params: func.params.clone(),
        computes,
        schedule: func.schedule.clone(),
    }
}

/// Merges tensor parameters by name, first-seen order. Conflicting shapes
/// or element types are a fatal error.
fn merge_params(funcs: &[PrimFunc]) -> Result<Vec<Tensor>, CodegenError> {
    let mut seen: IndexMap<&str, &Tensor> = IndexMap::new();
    for func in funcs {
        for tensor in &func.params {
            match seen.get(tensor.name.as_str()) {
                None => {
                    seen.insert(tensor.name.as_str(), tensor);
                }
                Some(existing) => {
                    if existing.shape != tensor.shape || existing.dtype != tensor.dtype {
                        return Err(CodegenError::TensorConflict {
                            name: tensor.name.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(seen.into_values().cloned().collect())
}

/// Domain-parameter names across all functions, first-seen order.
fn collect_param_names(funcs: &[PrimFunc]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for func in funcs {
        for param in collect_params(func) {
            if !names.contains(&param) {
                names.push(param);
            }
        }
    }
    names
}

fn union_domain<'ctx>(
    ctx: &'ctx Context,
    funcs: &[PrimFunc],
    space: &Space<'ctx>,
) -> Result<UnionSet<'ctx>, CodegenError> {
    let mut domain = UnionSet::empty(ctx)?;
    for func in funcs {
        domain = domain.union(&build_domain(ctx, func)?.align_params(space)?)?;
    }
    Ok(domain)
}

fn union_accesses<'ctx>(
    ctx: &'ctx Context,
    funcs: &[PrimFunc],
    space: &Space<'ctx>,
) -> Result<(UnionMap<'ctx>, UnionMap<'ctx>), CodegenError> {
    let mut writes = UnionMap::empty(ctx)?;
    let mut reads = UnionMap::empty(ctx)?;
    for func in funcs {
        let accesses = build_accesses(ctx, func)?;
        writes = writes.union(&accesses.writes.align_params(space)?)?;
        reads = reads.union(&accesses.reads.align_params(space)?)?;
    }
    Ok((writes, reads))
}

/// Per-statement schedule dimensions, padded with literal zeros to the
/// maximum loop depth so every time vector has equal length.
fn padded_loop_dims(func: &PrimFunc, compute: &Compute, max_depth: usize) -> Vec<String> {
    let mut dims: Vec<String> = projected_loop_order(func, compute)
        .into_iter()
        .map(str::to_string)
        .collect();
    while dims.len() < max_depth {
        dims.push("0".to_string());
    }
    dims
}

fn schedule_from_dims<'ctx>(
    ctx: &'ctx Context,
    space: &Space<'ctx>,
    entries: &[(String, String, String, Vec<String>)],
) -> Result<UnionMap<'ctx>, CodegenError> {
    let mut schedule = UnionMap::empty(ctx)?;
    for (params, tuple, constraints, dims) in entries {
        let literal = format!(
            "{params} -> {{ {tuple} -> [{}] : {constraints} }}",
            dims.join(", ")
        );
        schedule = schedule.union(&UnionMap::parse(ctx, &literal)?)?;
    }
    Ok(schedule.align_params(space)?)
}

fn header_of(compute: &Compute) -> Result<(String, String, String), CodegenError> {
    compute_header(compute).map_err(|err| {
        CodegenError::Analysis(AnalysisError::Unsupported {
            context: format!("domain of compute '{}'", compute.name),
            source: err,
        })
    })
}

/// The sequential base schedule: `[function, loops..., statement]`. Used to
/// compute the reference dependences.
fn base_schedule<'ctx>(
    ctx: &'ctx Context,
    funcs: &[PrimFunc],
    space: &Space<'ctx>,
    max_depth: usize,
) -> Result<UnionMap<'ctx>, CodegenError> {
    let mut entries = Vec::new();
    for (func_index, func) in funcs.iter().enumerate() {
        for (stmt_index, compute) in func.computes.iter().enumerate() {
            let (params, tuple, constraints) = header_of(compute)?;
            let mut dims = vec![func_index.to_string()];
            dims.extend(padded_loop_dims(func, compute, max_depth));
            dims.push(stmt_index.to_string());
            entries.push((params, tuple, constraints, dims));
        }
    }
    schedule_from_dims(ctx, space, &entries)
}

/// The fusion candidate: `[loops..., function, statement]`, putting shared
/// outer loops first so equal outer time dimensions fuse.
fn fused_schedule<'ctx>(
    ctx: &'ctx Context,
    funcs: &[PrimFunc],
    space: &Space<'ctx>,
    max_depth: usize,
) -> Result<UnionMap<'ctx>, CodegenError> {
    let mut entries = Vec::new();
    let mut stmt_counter = 0usize;
    for (func_index, func) in funcs.iter().enumerate() {
        for compute in &func.computes {
            let (params, tuple, constraints) = header_of(compute)?;
            let mut dims = padded_loop_dims(func, compute, max_depth);
            dims.push(func_index.to_string());
            dims.push(stmt_counter.to_string());
            entries.push((params, tuple, constraints, dims));
            stmt_counter += 1;
        }
    }
    schedule_from_dims(ctx, space, &entries)
}

/// All dependences are respected iff they fall inside the schedule's own
/// strict happens-before order.
fn schedule_respects_deps<'ctx>(
    schedule: &UnionMap<'ctx>,
    deps: &UnionMap<'ctx>,
) -> bool {
    match happens_before(schedule) {
        Ok(before) => deps.is_subset(&before).unwrap_or(false),
        Err(_) => false,
    }
}

/// Builds the fused loop AST and the merged function the emitter renders
/// it against.
pub(crate) fn build_fused_ast<'ctx>(
    ctx: &'ctx Context,
    funcs: &[PrimFunc],
) -> Result<(AstStmt, PrimFunc), CodegenError> {
    if funcs.is_empty() {
        return Err(CodegenError::EmptyFunctionList);
    }

    let tagged: Vec<PrimFunc> = funcs
        .iter()
        .enumerate()
        .map(|(index, func)| tag_primfunc(func, index))
        .collect();

    let space = param_space(ctx, &collect_param_names(&tagged))?;
    let domain = union_domain(ctx, &tagged, &space)?;
    let max_depth = tagged
        .iter()
        .map(|func| func.schedule.loop_order.len())
        .max()
        .unwrap_or(0);

    let base = base_schedule(ctx, &tagged, &space, max_depth)?;
    let (writes, reads) = union_accesses(ctx, &tagged, &space)?;
    let deps = dependences_for(&base, &writes, &reads, "fused")?;
    let all_deps = deps.union_all()?;

    let candidate = fused_schedule(ctx, &tagged, &space, max_depth)?;
    let isl_ast = if schedule_respects_deps(&candidate, &all_deps) {
        debug!("fused schedule respects dependences");
        let constrained = candidate.intersect_domain(&domain)?;
        isl::AstBuild::alloc(ctx)?.ast_from_schedule_map(&constrained)?
    } else {
        debug!("fused schedule rejected, falling back to the isl solver");
        let tree = ScheduleConstraints::on_domain(&domain)?
            .set_validity(&all_deps)?
            .set_coincidence(&all_deps)?
            .set_proximity(&all_deps)?
            .compute_schedule()?;
        isl::AstBuild::from_context(&isl::Set::universe(ctx)?)?.ast_from_schedule(&tree)?
    };

    let ast = convert_ast(&isl_ast)?;
    ensure_single_loop_nest(&ast, &deps)?;

    let fused_name = format!(
        "fused_{}",
        funcs
            .iter()
            .map(|func| sanitize_name(&func.name))
            .collect::<Vec<_>>()
            .join("_")
    );
    let fused_func = PrimFunc {
        name: fused_name,
        params: merge_params(funcs)?,
        computes: tagged.into_iter().flat_map(|func| func.computes).collect(),
        schedule: Schedule::default(),
    };

    Ok((ast, fused_func))
}

fn ensure_single_loop_nest(
    ast: &AstStmt,
    deps: &Dependences<'_>,
) -> Result<(), CodegenError> {
    if ast.single_loop_root().is_some() {
        return Ok(());
    }
    let edges = dependence_edges(deps)?
        .into_iter()
        .map(|edge| edge.to_string())
        .collect();
    Err(CodegenError::FusionFailure { edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyc_core::{
        Access, Axis, Compute, Constraint, Domain, Expr, Stmt, Store, Tensor,
    };

    fn elementwise(
        name: &str,
        stmt: &str,
        input: &str,
        output: &str,
        extent: i64,
    ) -> PrimFunc {
        let input = Tensor::new(input, [Expr::int(extent)]);
        let output = Tensor::new(output, [Expr::int(extent)]);
        PrimFunc::new(
            name,
            [input.clone(), output.clone()],
            [Compute::new(
                stmt,
                Domain::new(
                    Vec::new(),
                    vec![Axis::new("i")],
                    vec![
                        Constraint::le(Expr::int(0), Expr::var("i")),
                        Constraint::lt(Expr::var("i"), Expr::int(extent)),
                    ],
                ),
                Stmt::Store(Store::new(
                    Access::new(output, [Expr::var("i")]),
                    Expr::add(
                        Expr::load(Access::new(input, [Expr::var("i")])),
                        Expr::int(1),
                    ),
                )),
            )],
            Schedule::new(["i"]),
        )
    }

    #[test]
    fn sanitize_maps_non_identifier_characters() {
        assert_eq!(sanitize_name("my-func"), "my_func");
        assert_eq!(sanitize_name("9lives"), "f_9lives");
        assert_eq!(sanitize_name(""), "anon");
        assert_eq!(sanitize_name("plain_name"), "plain_name");
    }

    #[test]
    fn tagging_prefixes_statement_names() {
        let func = elementwise("step", "S", "A", "B", 10);
        let tagged = tag_primfunc(&func, 2);
        assert_eq!(tagged.computes[0].name, "f2_step__S");
    }

    #[test]
    fn merge_params_dedups_by_name() {
        let f1 = elementwise("a", "S", "A", "B", 10);
        let f2 = elementwise("b", "S", "B", "C", 10);
        let merged = merge_params(&[f1, f2]).unwrap();
        let names: Vec<&str> = merged.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn merge_params_rejects_conflicting_shapes() {
        let f1 = elementwise("a", "S", "A", "B", 10);
        let f2 = elementwise("b", "S", "A", "C", 16);
        assert!(merge_params(&[f1, f2]).is_err());
    }

    #[test]
    fn fuses_chained_elementwise_functions() {
        let ctx = Context::new();
        let f1 = elementwise("step1", "S", "A", "B", 10);
        let f2 = elementwise("step2", "S", "B", "C", 10);
        let (ast, fused) = build_fused_ast(&ctx, &[f1, f2]).unwrap();

        assert!(ast.single_loop_root().is_some());
        assert_eq!(fused.name, "fused_step1_step2");
        assert_eq!(fused.computes.len(), 2);
        assert_eq!(fused.computes[0].name, "f0_step1__S");
        assert_eq!(fused.computes[1].name, "f1_step2__S");
    }

    #[test]
    fn empty_list_is_rejected() {
        let ctx = Context::new();
        assert!(matches!(
            build_fused_ast(&ctx, &[]).unwrap_err(),
            CodegenError::EmptyFunctionList
        ));
    }
}
