//! Schedule planning: identity, tiled, or automatically computed.

use polyc_analysis::{all_dependences, build_domain, build_domain_and_schedule};
use polyc_core::PrimFunc;
use polyc_isl::{self as isl, Context, ScheduleConstraints, UnionMap, UnionSet};
use tracing::debug;

use crate::error::CodegenError;
use crate::tiler;
use crate::CompileOptions;

/// The schedule a single-function compilation will generate code from.
pub(crate) enum Planned<'ctx> {
    /// The identity schedule as a (domain, map) pair.
    Identity {
        domain: UnionSet<'ctx>,
        schedule: UnionMap<'ctx>,
    },
    /// A schedule tree (tiled and/or solver-computed).
    Tree(isl::Schedule<'ctx>),
}

/// Chooses and constructs the schedule for one function according to the
/// compile options. Tiling legality is checked against the schedule that
/// will actually run.
pub(crate) fn plan<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
    options: &CompileOptions,
) -> Result<Planned<'ctx>, CodegenError> {
    if options.optimize {
        let domain = build_domain(ctx, func)?;
        let deps = all_dependences(ctx, func)?.union_all()?;
        debug!(function = %func.name, "computing schedule with the isl solver");
        let tree = ScheduleConstraints::on_domain(&domain)?
            .set_validity(&deps)?
            .set_coincidence(&deps)?
            .set_proximity(&deps)?
            .compute_schedule()?;
        if options.tiles.is_empty() {
            return Ok(Planned::Tree(tree));
        }
        return Ok(Planned::Tree(tiler::tile_computed_tree(
            &tree,
            &deps,
            func,
            &options.tiles,
        )?));
    }

    if !options.tiles.is_empty() {
        return Ok(Planned::Tree(tiler::apply_tiling(ctx, func, &options.tiles)?));
    }

    let (domain, schedule) = build_domain_and_schedule(ctx, func)?;
    Ok(Planned::Identity { domain, schedule })
}

/// Generates the isl loop AST for a planned schedule.
pub(crate) fn generate_ast<'ctx>(
    ctx: &'ctx Context,
    planned: &Planned<'ctx>,
) -> Result<isl::AstNode<'ctx>, CodegenError> {
    match planned {
        Planned::Identity { domain, schedule } => {
            let constrained = schedule.intersect_domain(domain)?;
            let build = isl::AstBuild::alloc(ctx)?;
            Ok(build.ast_from_schedule_map(&constrained)?)
        }
        Planned::Tree(tree) => {
            let build = isl::AstBuild::from_context(&isl::Set::universe(ctx)?)?;
            Ok(build.ast_from_schedule(tree)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::convert_ast;
    use polyc_core::{
        Access, Axis, Compute, Constraint, Domain, Expr, Schedule, Stmt, Store, Tensor,
    };
    use polyc_analysis::happens_before;

    /// `A[i, j] = A[i - 1, j + 1]` -- requires skewing before both axes can
    /// be tiled.
    fn stencil_func(n: i64) -> PrimFunc {
        let a = Tensor::new("A", [Expr::int(n), Expr::int(n)]);
        PrimFunc::new(
            "stencil",
            [a.clone()],
            [Compute::new(
                "S",
                Domain::new(
                    Vec::new(),
                    vec![Axis::new("i"), Axis::new("j")],
                    vec![
                        Constraint::le(Expr::int(1), Expr::var("i")),
                        Constraint::lt(Expr::var("i"), Expr::int(n)),
                        Constraint::le(Expr::int(0), Expr::var("j")),
                        Constraint::lt(Expr::var("j"), Expr::int(n - 1)),
                    ],
                ),
                Stmt::Store(Store::new(
                    Access::new(a.clone(), [Expr::var("i"), Expr::var("j")]),
                    Expr::load(Access::new(
                        a,
                        [
                            Expr::sub(Expr::var("i"), Expr::int(1)),
                            Expr::add(Expr::var("j"), Expr::int(1)),
                        ],
                    )),
                )),
            )],
            Schedule::new(["i", "j"]),
        )
    }

    #[test]
    fn solver_schedule_respects_dependences() {
        let ctx = Context::new();
        let func = stencil_func(6);
        let planned = plan(
            &ctx,
            &func,
            &CompileOptions {
                optimize: true,
                ..CompileOptions::default()
            },
        )
        .unwrap();
        let Planned::Tree(tree) = &planned else {
            panic!("expected a schedule tree");
        };
        let map = tree.as_union_map().unwrap();
        let deps = all_dependences(&ctx, &func).unwrap().union_all().unwrap();
        let before = happens_before(&map).unwrap();
        assert!(deps.is_subset(&before).unwrap());
    }

    #[test]
    fn optimize_then_tile_legalizes_the_illegal_axis() {
        let ctx = Context::new();
        let func = stencil_func(6);
        // Under the identity schedule tiling j is illegal; after the solver
        // skews the band, both members tile.
        let planned = plan(
            &ctx,
            &func,
            &CompileOptions {
                optimize: true,
                tiles: vec![crate::Tile::new("i", 2), crate::Tile::new("j", 2)],
                ..CompileOptions::default()
            },
        );
        assert!(planned.is_ok());
    }

    #[test]
    fn identity_plan_lowers_to_an_ast() {
        let ctx = Context::new();
        let func = stencil_func(4);
        let planned = plan(&ctx, &func, &CompileOptions::default()).unwrap();
        let ast = generate_ast(&ctx, &planned).unwrap();
        assert!(convert_ast(&ast).unwrap().single_loop_root().is_some());
    }
}
