//! Binary relations and unions of named maps.

use crate::ctx::{borrow_isl_string, to_cstring, Context};
use crate::error::IslError;
use crate::ffi;
use crate::set::{Space, UnionSet};

/// A single-space relation. Exposed only for tuple-name introspection of
/// union map members.
#[derive(Debug)]
pub struct Map<'ctx> {
    raw: *mut ffi::isl_map,
    #[allow(dead_code)]
    ctx: &'ctx Context,
}

impl Map<'_> {
    /// Name of the input (domain) tuple, if any.
    pub fn domain_name(&self) -> Option<String> {
        unsafe { borrow_isl_string(ffi::isl_map_get_tuple_name(self.raw, ffi::ISL_DIM_IN)) }
    }

    /// Name of the output (range) tuple, if any.
    pub fn range_name(&self) -> Option<String> {
        unsafe { borrow_isl_string(ffi::isl_map_get_tuple_name(self.raw, ffi::ISL_DIM_OUT)) }
    }
}

impl Drop for Map<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_map_free(self.raw) };
    }
}

/// A union of named relations (access relations, schedules, dependences).
#[derive(Debug)]
pub struct UnionMap<'ctx> {
    pub(crate) raw: *mut ffi::isl_union_map,
    pub(crate) ctx: &'ctx Context,
}

impl<'ctx> UnionMap<'ctx> {
    pub(crate) fn from_raw(raw: *mut ffi::isl_union_map, ctx: &'ctx Context) -> Self {
        UnionMap { raw, ctx }
    }

    /// Parses a union map from isl textual syntax.
    pub fn parse(ctx: &'ctx Context, text: &str) -> Result<Self, IslError> {
        let op = "union_map_read_from_str";
        let c = to_cstring(text, op)?;
        let raw = unsafe { ffi::isl_union_map_read_from_str(ctx.raw, c.as_ptr()) };
        Ok(UnionMap::from_raw(ctx.check_parse(raw, op, text)?, ctx))
    }

    /// The empty union map `{ }`.
    pub fn empty(ctx: &'ctx Context) -> Result<Self, IslError> {
        UnionMap::parse(ctx, "{ }")
    }

    pub(crate) fn copy_raw(&self) -> *mut ffi::isl_union_map {
        unsafe { ffi::isl_union_map_copy(self.raw) }
    }

    fn wrap(
        &self,
        raw: *mut ffi::isl_union_map,
        operation: &'static str,
    ) -> Result<UnionMap<'ctx>, IslError> {
        Ok(UnionMap::from_raw(self.ctx.check(raw, operation)?, self.ctx))
    }

    pub fn union(&self, other: &UnionMap<'ctx>) -> Result<UnionMap<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_union_map_union(self.copy_raw(), other.copy_raw()) };
        self.wrap(raw, "union_map_union")
    }

    pub fn intersect(&self, other: &UnionMap<'ctx>) -> Result<UnionMap<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_union_map_intersect(self.copy_raw(), other.copy_raw()) };
        self.wrap(raw, "union_map_intersect")
    }

    pub fn intersect_domain(&self, domain: &UnionSet<'ctx>) -> Result<UnionMap<'ctx>, IslError> {
        let raw =
            unsafe { ffi::isl_union_map_intersect_domain(self.copy_raw(), domain.copy_raw()) };
        self.wrap(raw, "union_map_intersect_domain")
    }

    /// Composes `other` into the domain side: `{ other(x) -> self(x) }`.
    pub fn apply_domain(&self, other: &UnionMap<'ctx>) -> Result<UnionMap<'ctx>, IslError> {
        let raw =
            unsafe { ffi::isl_union_map_apply_domain(self.copy_raw(), other.copy_raw()) };
        self.wrap(raw, "union_map_apply_domain")
    }

    /// Composes `other` into the range side: `{ x -> other(self(x)) }`.
    pub fn apply_range(&self, other: &UnionMap<'ctx>) -> Result<UnionMap<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_union_map_apply_range(self.copy_raw(), other.copy_raw()) };
        self.wrap(raw, "union_map_apply_range")
    }

    pub fn reverse(&self) -> Result<UnionMap<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_union_map_reverse(self.copy_raw()) };
        self.wrap(raw, "union_map_reverse")
    }

    pub fn is_subset(&self, other: &UnionMap<'ctx>) -> Result<bool, IslError> {
        let b = unsafe { ffi::isl_union_map_is_subset(self.raw, other.raw) };
        self.ctx.check_bool(b, "union_map_is_subset")
    }

    pub fn is_equal(&self, other: &UnionMap<'ctx>) -> Result<bool, IslError> {
        let b = unsafe { ffi::isl_union_map_is_equal(self.raw, other.raw) };
        self.ctx.check_bool(b, "union_map_is_equal")
    }

    pub fn is_empty(&self) -> Result<bool, IslError> {
        let b = unsafe { ffi::isl_union_map_is_empty(self.raw) };
        self.ctx.check_bool(b, "union_map_is_empty")
    }

    /// The strict lexicographic happens-before relation between the domains
    /// of two schedules: `{ a -> b : self(a) <<lex other(b) }`.
    pub fn lex_lt_union_map(&self, other: &UnionMap<'ctx>) -> Result<UnionMap<'ctx>, IslError> {
        let raw =
            unsafe { ffi::isl_union_map_lex_lt_union_map(self.copy_raw(), other.copy_raw()) };
        self.wrap(raw, "union_map_lex_lt_union_map")
    }

    /// The difference set `{ range - domain }` over same-space pairs.
    pub fn deltas(&self) -> Result<UnionSet<'ctx>, IslError> {
        let raw = unsafe { ffi::isl_union_map_deltas(self.copy_raw()) };
        Ok(UnionSet::from_raw(
            self.ctx.check(raw, "union_map_deltas")?,
            self.ctx,
        ))
    }

    /// Aligns the parameter dimensions to the given model space.
    pub fn align_params(&self, model: &Space<'ctx>) -> Result<UnionMap<'ctx>, IslError> {
        let raw =
            unsafe { ffi::isl_union_map_align_params(self.copy_raw(), model.copy_raw()) };
        self.wrap(raw, "union_map_align_params")
    }

    /// The member maps, one per pair of spaces.
    pub fn maps(&self) -> Result<Vec<Map<'ctx>>, IslError> {
        let list = unsafe { ffi::isl_union_map_get_map_list(self.raw) };
        let list = self.ctx.check(list, "union_map_get_map_list")?;
        let n = unsafe { ffi::isl_map_list_n_map(list) };
        let n = match self.ctx.check_size(n, "map_list_n_map") {
            Ok(n) => n,
            Err(err) => {
                unsafe { ffi::isl_map_list_free(list) };
                return Err(err);
            }
        };
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let map = unsafe { ffi::isl_map_list_get_map(list, i as i32) };
            match self.ctx.check(map, "map_list_get_map") {
                Ok(raw) => out.push(Map { raw, ctx: self.ctx }),
                Err(err) => {
                    unsafe { ffi::isl_map_list_free(list) };
                    return Err(err);
                }
            }
        }
        unsafe { ffi::isl_map_list_free(list) };
        Ok(out)
    }

    pub fn to_str(&self) -> String {
        unsafe { crate::ctx::take_isl_string(ffi::isl_union_map_to_str(self.raw)) }
    }
}

impl Drop for UnionMap<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_union_map_free(self.raw) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_lt_produces_strict_order() {
        let ctx = Context::new();
        let schedule = UnionMap::parse(&ctx, "{ S[i] -> [i] : 0 <= i < 4 }").unwrap();
        let before = schedule.lex_lt_union_map(&schedule).unwrap();
        let expected =
            UnionMap::parse(&ctx, "{ S[i] -> S[i'] : 0 <= i < 4 and i < i' < 4 }").unwrap();
        assert!(before.is_equal(&expected).unwrap());
    }

    #[test]
    fn composition_builds_dependence_shape() {
        let ctx = Context::new();
        let write = UnionMap::parse(&ctx, "{ S[i] -> C[i] : 1 <= i < 8 }").unwrap();
        let read = UnionMap::parse(&ctx, "{ S[i] -> C[i - 1] : 1 <= i < 8 }").unwrap();
        let pairs = write.apply_range(&read.reverse().unwrap()).unwrap();
        let expected =
            UnionMap::parse(&ctx, "{ S[i] -> S[i + 1] : 1 <= i < 7 }").unwrap();
        assert!(pairs.is_equal(&expected).unwrap());
    }

    #[test]
    fn deltas_of_shift() {
        let ctx = Context::new();
        let dep = UnionMap::parse(&ctx, "{ [i, j] -> [i + 1, j - 1] : 0 <= i < 4 and 0 <= j < 4 }")
            .unwrap();
        let deltas = dep.deltas().unwrap();
        let expected = UnionSet::parse(&ctx, "{ [1, -1] }").unwrap();
        assert!(deltas.is_equal(&expected).unwrap());
    }

    #[test]
    fn tuple_names_are_exposed() {
        let ctx = Context::new();
        let umap =
            UnionMap::parse(&ctx, "{ S1[i] -> S2[i] : 0 <= i < 4; S2[i] -> S3[i] : 0 <= i < 4 }")
                .unwrap();
        let mut names: Vec<(String, String)> = umap
            .maps()
            .unwrap()
            .iter()
            .map(|m| (m.domain_name().unwrap(), m.range_name().unwrap()))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                ("S1".to_string(), "S2".to_string()),
                ("S2".to_string(), "S3".to_string())
            ]
        );
    }
}
