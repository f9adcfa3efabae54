//! Integer sets and unions of named sets.

use crate::ctx::{to_cstring, Context};
use crate::error::IslError;
use crate::ffi;

/// A dimension space. Used for parameter alignment and band sizing.
#[derive(Debug)]
pub struct Space<'ctx> {
    pub(crate) raw: *mut ffi::isl_space,
    pub(crate) ctx: &'ctx Context,
}

impl<'ctx> Space<'ctx> {
    pub(crate) fn from_raw(raw: *mut ffi::isl_space, ctx: &'ctx Context) -> Self {
        Space { raw, ctx }
    }

    pub(crate) fn copy_raw(&self) -> *mut ffi::isl_space {
        unsafe { ffi::isl_space_copy(self.raw) }
    }

    /// Number of set dimensions.
    pub fn set_dims(&self) -> Result<usize, IslError> {
        let n = unsafe { ffi::isl_space_dim(self.raw, ffi::ISL_DIM_SET) };
        self.ctx.check_size(n, "space_dim")
    }
}

impl Drop for Space<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_space_free(self.raw) };
    }
}

/// A basic (single-space) integer set.
#[derive(Debug)]
pub struct Set<'ctx> {
    pub(crate) raw: *mut ffi::isl_set,
    pub(crate) ctx: &'ctx Context,
}

impl<'ctx> Set<'ctx> {
    pub(crate) fn from_raw(raw: *mut ffi::isl_set, ctx: &'ctx Context) -> Self {
        Set { raw, ctx }
    }

    /// Parses a set from isl textual syntax.
    pub fn parse(ctx: &'ctx Context, text: &str) -> Result<Self, IslError> {
        let op = "set_read_from_str";
        let c = to_cstring(text, op)?;
        let raw = unsafe { ffi::isl_set_read_from_str(ctx.raw, c.as_ptr()) };
        Ok(Set::from_raw(ctx.check_parse(raw, op, text)?, ctx))
    }

    /// The universe set `{ : }`, used as a parameter-free AST context.
    pub fn universe(ctx: &'ctx Context) -> Result<Self, IslError> {
        Set::parse(ctx, "{ : }")
    }

    pub(crate) fn copy_raw(&self) -> *mut ffi::isl_set {
        unsafe { ffi::isl_set_copy(self.raw) }
    }

    pub fn space(&self) -> Result<Space<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_set_get_space(self.raw) };
        Ok(Space::from_raw(self.ctx.check(raw, "set_get_space")?, self.ctx))
    }

    /// Number of set dimensions.
    pub fn dims(&self) -> Result<usize, IslError> {
        let n = unsafe { ffi::isl_set_dim(self.raw, ffi::ISL_DIM_SET) };
        self.ctx.check_size(n, "set_dim")
    }

    pub fn is_empty(&self) -> Result<bool, IslError> {
        let b = unsafe { ffi::isl_set_is_empty(self.raw) };
        self.ctx.check_bool(b, "set_is_empty")
    }

    /// Restricts the set to points whose `pos`-th coordinate is strictly
    /// negative. Used by the tiling legality test on dependence deltas.
    pub fn restrict_dim_negative(&self, pos: usize) -> Result<Set<'ctx>, IslError> {
        let op = "set_add_constraint";
        let space = self.space()?;
        let ls = unsafe { ffi::isl_local_space_from_space(space.copy_raw()) };
        let ls = self.ctx.check(ls, "local_space_from_space")?;
        // -d[pos] - 1 >= 0, i.e. d[pos] <= -1
        let constraint = unsafe {
            let c = ffi::isl_constraint_alloc_inequality(ls);
            let c = ffi::isl_constraint_set_coefficient_si(c, ffi::ISL_DIM_SET, pos as i32, -1);
            ffi::isl_constraint_set_constant_si(c, -1)
        };
        let constraint = self.ctx.check(constraint, "constraint_alloc_inequality")?;
        let raw = unsafe { ffi::isl_set_add_constraint(self.copy_raw(), constraint) };
        Ok(Set::from_raw(self.ctx.check(raw, op)?, self.ctx))
    }

    pub fn to_str(&self) -> String {
        unsafe { crate::ctx::take_isl_string(ffi::isl_set_to_str(self.raw)) }
    }
}

impl Drop for Set<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_set_free(self.raw) };
    }
}

/// A union of named integer sets, e.g. an iteration domain with one set per
/// statement.
#[derive(Debug)]
pub struct UnionSet<'ctx> {
    pub(crate) raw: *mut ffi::isl_union_set,
    pub(crate) ctx: &'ctx Context,
}

impl<'ctx> UnionSet<'ctx> {
    pub(crate) fn from_raw(raw: *mut ffi::isl_union_set, ctx: &'ctx Context) -> Self {
        UnionSet { raw, ctx }
    }

    /// Parses a union set from isl textual syntax.
    pub fn parse(ctx: &'ctx Context, text: &str) -> Result<Self, IslError> {
        let op = "union_set_read_from_str";
        let c = to_cstring(text, op)?;
        let raw = unsafe { ffi::isl_union_set_read_from_str(ctx.raw, c.as_ptr()) };
        Ok(UnionSet::from_raw(ctx.check_parse(raw, op, text)?, ctx))
    }

    /// The empty union set `{ }`.
    pub fn empty(ctx: &'ctx Context) -> Result<Self, IslError> {
        UnionSet::parse(ctx, "{ }")
    }

    pub(crate) fn copy_raw(&self) -> *mut ffi::isl_union_set {
        unsafe { ffi::isl_union_set_copy(self.raw) }
    }

    pub fn union(&self, other: &UnionSet<'ctx>) -> Result<UnionSet<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_union_set_union(self.copy_raw(), other.copy_raw()) };
        Ok(UnionSet::from_raw(self.ctx.check(raw, "union_set_union")?, self.ctx))
    }

    pub fn is_empty(&self) -> Result<bool, IslError> {
        let b = unsafe { ffi::isl_union_set_is_empty(self.raw) };
        self.ctx.check_bool(b, "union_set_is_empty")
    }

    pub fn is_equal(&self, other: &UnionSet<'ctx>) -> Result<bool, IslError> {
        let b = unsafe { ffi::isl_union_set_is_equal(self.raw, other.raw) };
        self.ctx.check_bool(b, "union_set_is_equal")
    }

    /// Aligns the parameter dimensions to the given model space.
    pub fn align_params(&self, model: &Space<'ctx>) -> Result<UnionSet<'ctx>, IslError> {
        let raw =
            unsafe { ffi::isl_union_set_align_params(self.copy_raw(), model.copy_raw()) };
        Ok(UnionSet::from_raw(
            self.ctx.check(raw, "union_set_align_params")?,
            self.ctx,
        ))
    }

    /// The member sets, one per space.
    pub fn sets(&self) -> Result<Vec<Set<'ctx>>, IslError> {
        let list = unsafe { ffi::isl_union_set_get_set_list(self.raw) };
        let list = self.ctx.check(list, "union_set_get_set_list")?;
        let n = unsafe { ffi::isl_set_list_n_set(list) };
        let n = match self.ctx.check_size(n, "set_list_n_set") {
            Ok(n) => n,
            Err(err) => {
                unsafe { ffi::isl_set_list_free(list) };
                return Err(err);
            }
        };
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let set = unsafe { ffi::isl_set_list_get_set(list, i as i32) };
            match self.ctx.check(set, "set_list_get_set") {
                Ok(set) => out.push(Set::from_raw(set, self.ctx)),
                Err(err) => {
                    unsafe { ffi::isl_set_list_free(list) };
                    return Err(err);
                }
            }
        }
        unsafe { ffi::isl_set_list_free(list) };
        Ok(out)
    }

    pub fn to_str(&self) -> String {
        unsafe { crate::ctx::take_isl_string(ffi::isl_union_set_to_str(self.raw)) }
    }
}

impl Drop for UnionSet<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_union_set_free(self.raw) };
    }
}
