//! Iteration-domain and identity-schedule construction.

use indexmap::IndexSet;
use polyc_core::{Compute, PrimFunc};
use polyc_isl::{Context, Set, Space, UnionMap, UnionSet};
use tracing::debug;

use crate::affine::compute_header;
use crate::error::AnalysisError;

/// Collects the symbolic parameter names of all computes, in first-seen
/// order. Used as the canonical parameter order for alignment so that
/// repeated compilations produce byte-identical polyhedral text.
pub fn collect_params(func: &PrimFunc) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for compute in &func.computes {
        for param in &compute.domain.params {
            seen.insert(param.as_str());
        }
    }
    seen.into_iter().map(str::to_string).collect()
}

/// Builds the alignment space carrying the given parameters.
pub fn param_space<'ctx>(
    ctx: &'ctx Context,
    params: &[String],
) -> Result<Space<'ctx>, AnalysisError> {
    let literal = if params.is_empty() {
        "{ : }".to_string()
    } else {
        format!("[{}] -> {{ : }}", params.join(", "))
    };
    Ok(Set::parse(ctx, &literal)?.space()?)
}

fn header(compute: &Compute) -> Result<(String, String, String), AnalysisError> {
    compute_header(compute).map_err(|err| {
        AnalysisError::unsupported(format!("domain of compute '{}'", compute.name), err)
    })
}

/// Builds the iteration domain: the union over all computes of the named
/// set `params -> { Name[iterators] : constraints }`.
pub fn build_domain<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
) -> Result<UnionSet<'ctx>, AnalysisError> {
    let space = param_space(ctx, &collect_params(func))?;
    let mut domain = UnionSet::empty(ctx)?;
    for compute in &func.computes {
        let (params, tuple, constraints) = header(compute)?;
        let literal = format!("{params} -> {{ {tuple} : {constraints} }}");
        domain = domain.union(&UnionSet::parse(ctx, &literal)?)?;
    }
    let domain = domain.align_params(&space)?;
    debug!(function = %func.name, domain = %domain.to_str(), "built iteration domain");
    Ok(domain)
}

/// The global loop order projected onto a compute's iterator set,
/// preserving order.
pub fn projected_loop_order<'a>(func: &'a PrimFunc, compute: &Compute) -> Vec<&'a str> {
    let iterators: IndexSet<&str> = compute
        .domain
        .iterators
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    func.schedule.project(&iterators)
}

/// Builds the identity schedule: each compute maps its iteration tuple to
/// the projection of the global loop order onto its iterators. With two or
/// more computes a trailing statement-tag dimension (the compute's index)
/// enforces a total order while leaving outer dimensions shareable for
/// fusion.
pub fn build_schedule<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
) -> Result<UnionMap<'ctx>, AnalysisError> {
    let space = param_space(ctx, &collect_params(func))?;
    let tag_statements = func.computes.len() >= 2;
    let mut schedule = UnionMap::empty(ctx)?;
    for (stmt_index, compute) in func.computes.iter().enumerate() {
        let (params, tuple, constraints) = header(compute)?;
        let mut dims: Vec<String> = projected_loop_order(func, compute)
            .into_iter()
            .map(str::to_string)
            .collect();
        if tag_statements {
            dims.push(stmt_index.to_string());
        }
        let literal = format!(
            "{params} -> {{ {tuple} -> [{}] : {constraints} }}",
            dims.join(", ")
        );
        schedule = schedule.union(&UnionMap::parse(ctx, &literal)?)?;
    }
    let schedule = schedule.align_params(&space)?;
    debug!(function = %func.name, schedule = %schedule.to_str(), "built identity schedule");
    Ok(schedule)
}

/// Convenience: both the domain and the identity schedule.
pub fn build_domain_and_schedule<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
) -> Result<(UnionSet<'ctx>, UnionMap<'ctx>), AnalysisError> {
    Ok((build_domain(ctx, func)?, build_schedule(ctx, func)?))
}
