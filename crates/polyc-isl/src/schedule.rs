//! Schedule trees, band nodes, and the schedule solver.

use crate::ctx::Context;
use crate::error::IslError;
use crate::ffi;
use crate::map::UnionMap;
use crate::set::{Space, UnionSet};

/// A schedule tree.
#[derive(Debug)]
pub struct Schedule<'ctx> {
    pub(crate) raw: *mut ffi::isl_schedule,
    pub(crate) ctx: &'ctx Context,
}

impl<'ctx> Schedule<'ctx> {
    fn from_raw(raw: *mut ffi::isl_schedule, ctx: &'ctx Context) -> Self {
        Schedule { raw, ctx }
    }

    /// A schedule tree consisting of just a domain node.
    pub fn from_domain(domain: &UnionSet<'ctx>) -> Result<Self, IslError> {
        let ctx = domain.ctx;
        let raw = unsafe { ffi::isl_schedule_from_domain(domain.copy_raw()) };
        Ok(Schedule::from_raw(ctx.check(raw, "schedule_from_domain")?, ctx))
    }

    pub fn root(&self) -> Result<ScheduleNode<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_schedule_get_root(self.raw) };
        Ok(ScheduleNode {
            raw: self.ctx.check(raw, "schedule_get_root")?,
            ctx: self.ctx,
        })
    }

    /// Flattens the tree into a union map from domain points to time
    /// vectors.
    pub fn as_union_map(&self) -> Result<UnionMap<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_schedule_get_map(self.raw) };
        Ok(UnionMap::from_raw(
            self.ctx.check(raw, "schedule_get_map")?,
            self.ctx,
        ))
    }

    pub fn to_str(&self) -> String {
        unsafe { crate::ctx::take_isl_string(ffi::isl_schedule_to_str(self.raw)) }
    }
}

impl Drop for Schedule<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_schedule_free(self.raw) };
    }
}

/// Node kinds of a schedule tree relevant to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleNodeKind {
    Band,
    Other,
}

/// A position within a schedule tree. Traversal methods consume the node,
/// following isl's move semantics.
#[derive(Debug)]
pub struct ScheduleNode<'ctx> {
    raw: *mut ffi::isl_schedule_node,
    ctx: &'ctx Context,
}

impl<'ctx> ScheduleNode<'ctx> {
    fn into_raw(self) -> *mut ffi::isl_schedule_node {
        let raw = self.raw;
        std::mem::forget(self);
        raw
    }

    pub fn kind(&self) -> ScheduleNodeKind {
        let raw = unsafe { ffi::isl_schedule_node_get_type(self.raw) };
        if raw == ffi::ISL_SCHEDULE_NODE_BAND {
            ScheduleNodeKind::Band
        } else {
            ScheduleNodeKind::Other
        }
    }

    pub fn n_children(&self) -> Result<usize, IslError> {
        let n = unsafe { ffi::isl_schedule_node_n_children(self.raw) };
        self.ctx.check_size(n, "schedule_node_n_children")
    }

    pub fn child(self, pos: usize) -> Result<ScheduleNode<'ctx>, IslError> {
        let ctx = self.ctx;
        let raw = unsafe { ffi::isl_schedule_node_child(self.into_raw(), pos as i32) };
        Ok(ScheduleNode {
            raw: ctx.check(raw, "schedule_node_child")?,
            ctx,
        })
    }

    pub fn first_child(self) -> Result<ScheduleNode<'ctx>, IslError> {
        let ctx = self.ctx;
        let raw = unsafe { ffi::isl_schedule_node_first_child(self.into_raw()) };
        Ok(ScheduleNode {
            raw: ctx.check(raw, "schedule_node_first_child")?,
            ctx,
        })
    }

    /// Inserts a partial schedule (band) at this position.
    pub fn insert_partial_schedule(
        self,
        schedule: &UnionMap<'ctx>,
    ) -> Result<ScheduleNode<'ctx>, IslError> {
        let ctx = self.ctx;
        let mupa = unsafe { ffi::isl_multi_union_pw_aff_from_union_map(schedule.copy_raw()) };
        let mupa = match ctx.check(mupa, "multi_union_pw_aff_from_union_map") {
            Ok(mupa) => mupa,
            Err(err) => {
                drop(self);
                return Err(err);
            }
        };
        let raw = unsafe { ffi::isl_schedule_node_insert_partial_schedule(self.into_raw(), mupa) };
        Ok(ScheduleNode {
            raw: ctx.check(raw, "schedule_node_insert_partial_schedule")?,
            ctx,
        })
    }

    /// Number of members of this band node.
    pub fn band_members(&self) -> Result<usize, IslError> {
        let space = unsafe { ffi::isl_schedule_node_band_get_space(self.raw) };
        let space = Space::from_raw(self.ctx.check(space, "schedule_node_band_get_space")?, self.ctx);
        space.set_dims()
    }

    /// Tiles this band with the given per-member sizes. `sizes.len()` must
    /// equal [`ScheduleNode::band_members`]; a size of 1 leaves the member
    /// untiled.
    pub fn band_tile(self, sizes: &[i64]) -> Result<ScheduleNode<'ctx>, IslError> {
        let ctx = self.ctx;
        let space = unsafe { ffi::isl_schedule_node_band_get_space(self.raw) };
        let space = match ctx.check(space, "schedule_node_band_get_space") {
            Ok(space) => space,
            Err(err) => {
                drop(self);
                return Err(err);
            }
        };
        let mut mv = unsafe { ffi::isl_multi_val_zero(space) };
        for (pos, &size) in sizes.iter().enumerate() {
            let val = unsafe { ffi::isl_val_int_from_si(ctx.raw, size) };
            mv = unsafe { ffi::isl_multi_val_set_val(mv, pos as i32, val) };
        }
        let mv = match ctx.check(mv, "multi_val_set_val") {
            Ok(mv) => mv,
            Err(err) => {
                drop(self);
                return Err(err);
            }
        };
        let raw = unsafe { ffi::isl_schedule_node_band_tile(self.into_raw(), mv) };
        Ok(ScheduleNode {
            raw: ctx.check(raw, "schedule_node_band_tile")?,
            ctx,
        })
    }

    /// The schedule tree this node belongs to.
    pub fn schedule(&self) -> Result<Schedule<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_schedule_node_get_schedule(self.raw) };
        Ok(Schedule::from_raw(
            self.ctx.check(raw, "schedule_node_get_schedule")?,
            self.ctx,
        ))
    }
}

impl Drop for ScheduleNode<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_schedule_node_free(self.raw) };
    }
}

/// Builder for the isl schedule solver.
#[derive(Debug)]
pub struct ScheduleConstraints<'ctx> {
    raw: *mut ffi::isl_schedule_constraints,
    ctx: &'ctx Context,
}

impl<'ctx> ScheduleConstraints<'ctx> {
    fn into_raw(self) -> *mut ffi::isl_schedule_constraints {
        let raw = self.raw;
        std::mem::forget(self);
        raw
    }

    pub fn on_domain(domain: &UnionSet<'ctx>) -> Result<Self, IslError> {
        let ctx = domain.ctx;
        let raw = unsafe { ffi::isl_schedule_constraints_on_domain(domain.copy_raw()) };
        Ok(ScheduleConstraints {
            raw: ctx.check(raw, "schedule_constraints_on_domain")?,
            ctx,
        })
    }

    pub fn set_validity(self, deps: &UnionMap<'ctx>) -> Result<Self, IslError> {
        let ctx = self.ctx;
        let raw = unsafe {
            ffi::isl_schedule_constraints_set_validity(self.into_raw(), deps.copy_raw())
        };
        Ok(ScheduleConstraints {
            raw: ctx.check(raw, "schedule_constraints_set_validity")?,
            ctx,
        })
    }

    pub fn set_coincidence(self, deps: &UnionMap<'ctx>) -> Result<Self, IslError> {
        let ctx = self.ctx;
        let raw = unsafe {
            ffi::isl_schedule_constraints_set_coincidence(self.into_raw(), deps.copy_raw())
        };
        Ok(ScheduleConstraints {
            raw: ctx.check(raw, "schedule_constraints_set_coincidence")?,
            ctx,
        })
    }

    pub fn set_proximity(self, deps: &UnionMap<'ctx>) -> Result<Self, IslError> {
        let ctx = self.ctx;
        let raw = unsafe {
            ffi::isl_schedule_constraints_set_proximity(self.into_raw(), deps.copy_raw())
        };
        Ok(ScheduleConstraints {
            raw: ctx.check(raw, "schedule_constraints_set_proximity")?,
            ctx,
        })
    }

    /// Runs the solver, producing a dependence-respecting schedule tree.
    pub fn compute_schedule(self) -> Result<Schedule<'ctx>, IslError> {
        let ctx = self.ctx;
        let raw = unsafe { ffi::isl_schedule_constraints_compute_schedule(self.into_raw()) };
        Ok(Schedule {
            raw: ctx.check(raw, "schedule_constraints_compute_schedule")?,
            ctx,
        })
    }
}

impl Drop for ScheduleConstraints<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_schedule_constraints_free(self.raw) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_tree_from_map_roundtrips() {
        let ctx = Context::new();
        let domain = UnionSet::parse(&ctx, "{ S[i, j] : 0 <= i < 8 and 0 <= j < 8 }").unwrap();
        let map = UnionMap::parse(&ctx, "{ S[i, j] -> [i, j] : 0 <= i < 8 and 0 <= j < 8 }")
            .unwrap();
        let tree = Schedule::from_domain(&domain).unwrap();
        let node = tree.root().unwrap().child(0).unwrap();
        let node = node.insert_partial_schedule(&map).unwrap();
        assert_eq!(node.kind(), ScheduleNodeKind::Band);
        assert_eq!(node.band_members().unwrap(), 2);

        let flattened = node.schedule().unwrap().as_union_map().unwrap();
        let expected = map.intersect_domain(&domain).unwrap();
        assert!(flattened.is_equal(&expected).unwrap());
    }

    #[test]
    fn band_tile_introduces_tile_dims() {
        let ctx = Context::new();
        let domain = UnionSet::parse(&ctx, "{ S[i, j] : 0 <= i < 8 and 0 <= j < 8 }").unwrap();
        let map = UnionMap::parse(&ctx, "{ S[i, j] -> [i, j] : 0 <= i < 8 and 0 <= j < 8 }")
            .unwrap();
        let node = Schedule::from_domain(&domain)
            .unwrap()
            .root()
            .unwrap()
            .child(0)
            .unwrap()
            .insert_partial_schedule(&map)
            .unwrap();
        let tiled = node.band_tile(&[1, 4]).unwrap();
        let tiled_map = tiled.schedule().unwrap().as_union_map().unwrap();
        let expected = UnionMap::parse(
            &ctx,
            "{ S[i, j] -> [i, j - j mod 4, 0, j mod 4] : 0 <= i < 8 and 0 <= j < 8 }",
        )
        .unwrap();
        assert!(tiled_map.is_equal(&expected).unwrap());
    }

    #[test]
    fn solver_respects_validity() {
        let ctx = Context::new();
        let domain = UnionSet::parse(&ctx, "{ S[i] : 0 <= i < 16 }").unwrap();
        let deps = UnionMap::parse(&ctx, "{ S[i] -> S[i + 1] : 0 <= i < 15 }").unwrap();
        let schedule = ScheduleConstraints::on_domain(&domain)
            .unwrap()
            .set_validity(&deps)
            .unwrap()
            .compute_schedule()
            .unwrap();
        let map = schedule.as_union_map().unwrap();
        let before = map.lex_lt_union_map(&map).unwrap();
        assert!(deps.is_subset(&before).unwrap());
    }
}
