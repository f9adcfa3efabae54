//! Strip-mine tiling over schedule bands, with a dependence-sign legality
//! check.

use polyc_analysis::{all_dependences, build_domain, build_schedule};
use polyc_core::PrimFunc;
use polyc_isl::{self as isl, Context, ScheduleNodeKind, UnionMap};
use tracing::debug;

use crate::error::CodegenError;
use crate::Tile;

/// A tile resolved against the loop order: axis name, band member index,
/// size.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedTile {
    pub axis: String,
    pub member: usize,
    pub size: i64,
}

/// Resolves tile axis names to band member indices via the global loop
/// order, validating sizes.
pub(crate) fn resolve_tiles(
    func: &PrimFunc,
    tiles: &[Tile],
) -> Result<Vec<ResolvedTile>, CodegenError> {
    tiles
        .iter()
        .map(|tile| {
            if tile.size <= 0 {
                return Err(CodegenError::InvalidTileSize {
                    axis: tile.axis.clone(),
                    size: tile.size,
                });
            }
            let member = func
                .schedule
                .loop_order
                .iter()
                .position(|name| *name == tile.axis)
                .ok_or_else(|| CodegenError::UnknownTileAxis {
                    axis: tile.axis.clone(),
                    available: func.schedule.loop_order.clone(),
                })?;
            Ok(ResolvedTile {
                axis: tile.axis.clone(),
                member,
                size: tile.size,
            })
        })
        .collect()
}

/// Checks the dependence-distance signs of the tiled axes: a tile is legal
/// only when no dependence moves backwards along its axis in schedule time.
/// Returns the list of violation descriptions (empty means legal).
pub fn tiling_violations<'ctx>(
    schedule: &UnionMap<'ctx>,
    deps: &UnionMap<'ctx>,
    tiles: &[(String, usize)],
) -> Result<Vec<String>, CodegenError> {
    if deps.is_empty()? {
        return Ok(Vec::new());
    }
    let scheduled = deps.apply_domain(schedule)?.apply_range(schedule)?;
    let deltas = scheduled.deltas()?;
    if deltas.is_empty()? {
        return Ok(Vec::new());
    }

    let sets = deltas.sets()?;
    let mut violations = Vec::new();
    for (axis, member) in tiles {
        let mut negative = false;
        for set in &sets {
            if *member >= set.dims()? {
                continue;
            }
            let restricted = set.restrict_dim_negative(*member)?;
            if !restricted.is_empty()? {
                negative = true;
                break;
            }
        }
        if negative {
            violations.push(format!("axis '{axis}' has negative dependence distance"));
        }
    }
    Ok(violations)
}

fn legality_or_error<'ctx>(
    schedule: &UnionMap<'ctx>,
    deps: &UnionMap<'ctx>,
    resolved: &[ResolvedTile],
) -> Result<(), CodegenError> {
    let axes: Vec<(String, usize)> = resolved
        .iter()
        .map(|tile| (tile.axis.clone(), tile.member))
        .collect();
    let violations = tiling_violations(schedule, deps, &axes)?;
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CodegenError::IllegalTiling {
            axes: resolved
                .iter()
                .filter(|tile| {
                    violations
                        .iter()
                        .any(|v| v.contains(&format!("'{}'", tile.axis)))
                })
                .map(|tile| tile.axis.clone())
                .collect(),
            violations,
        })
    }
}

/// Walks to the topmost band of a schedule tree and tiles it with the
/// resolved sizes, padding non-tiled members with 1 (a no-op tile).
pub(crate) fn tile_tree<'ctx>(
    tree: &isl::Schedule<'ctx>,
    resolved: &[ResolvedTile],
) -> Result<isl::Schedule<'ctx>, CodegenError> {
    let mut node = tree.root()?;
    while node.kind() != ScheduleNodeKind::Band {
        if node.n_children()? == 0 {
            return Err(CodegenError::UnsupportedAst {
                detail: "schedule tree has no band to tile".to_string(),
            });
        }
        node = node.first_child()?;
    }

    let members = node.band_members()?;
    let mut sizes = vec![1i64; members];
    for tile in resolved {
        if tile.member >= members {
            return Err(CodegenError::UnknownTileAxis {
                axis: tile.axis.clone(),
                available: Vec::new(),
            });
        }
        sizes[tile.member] = tile.size;
    }
    debug!(?sizes, "tiling topmost band");
    Ok(node.band_tile(&sizes)?.schedule()?)
}

/// Builds the identity schedule tree for `func` and applies the tiles,
/// after the legality check. Returns the tiled schedule tree.
pub fn apply_tiling<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
    tiles: &[Tile],
) -> Result<isl::Schedule<'ctx>, CodegenError> {
    let resolved = resolve_tiles(func, tiles)?;

    let domain = build_domain(ctx, func)?;
    let schedule_map = build_schedule(ctx, func)?;
    let constrained = schedule_map.intersect_domain(&domain)?;

    let deps = all_dependences(ctx, func)?;
    legality_or_error(&constrained, &deps.union_all()?, &resolved)?;

    let tree = isl::Schedule::from_domain(&domain)?;
    let node = tree.root()?.child(0)?.insert_partial_schedule(&schedule_map)?;
    if node.kind() != ScheduleNodeKind::Band {
        return Err(CodegenError::UnsupportedAst {
            detail: "identity schedule produced no band".to_string(),
        });
    }
    tile_tree(&node.schedule()?, &resolved)
}

/// Legality check for tiles applied to an already-computed schedule tree
/// (the automatic scheduler path).
pub(crate) fn tile_computed_tree<'ctx>(
    tree: &isl::Schedule<'ctx>,
    deps: &UnionMap<'ctx>,
    func: &PrimFunc,
    tiles: &[Tile],
) -> Result<isl::Schedule<'ctx>, CodegenError> {
    let resolved = resolve_tiles(func, tiles)?;
    let schedule_map = tree.as_union_map()?;
    legality_or_error(&schedule_map, deps, &resolved)?;
    tile_tree(tree, &resolved)
}
