//! Raw declarations of the isl C API used by this crate.
//!
//! Only the stable, documented entry points required by the compiler
//! pipeline are declared. Ownership follows isl's `__isl_take`/`__isl_keep`
//! annotations: `take` arguments consume the handle, `keep` arguments
//! borrow it, and returned pointers are owned by the caller unless noted.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_long, c_void};

macro_rules! opaque {
    ($($name:ident),* $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )*
    };
}

opaque!(
    isl_ctx,
    isl_space,
    isl_local_space,
    isl_constraint,
    isl_set,
    isl_set_list,
    isl_union_set,
    isl_map,
    isl_map_list,
    isl_union_map,
    isl_val,
    isl_multi_val,
    isl_multi_union_pw_aff,
    isl_schedule,
    isl_schedule_node,
    isl_schedule_constraints,
    isl_ast_build,
    isl_ast_node,
    isl_ast_node_list,
    isl_ast_expr,
    isl_id,
);

// enum isl_error
pub const ISL_ERROR_NONE: c_int = 0;
pub const ISL_ERROR_ABORT: c_int = 1;
pub const ISL_ERROR_ALLOC: c_int = 2;
pub const ISL_ERROR_UNKNOWN: c_int = 3;
pub const ISL_ERROR_INTERNAL: c_int = 4;
pub const ISL_ERROR_INVALID: c_int = 5;
pub const ISL_ERROR_QUOTA: c_int = 6;
pub const ISL_ERROR_UNSUPPORTED: c_int = 7;

// isl option values for on_error
pub const ISL_ON_ERROR_CONTINUE: c_int = 1;

// enum isl_dim_type
pub const ISL_DIM_PARAM: c_int = 1;
pub const ISL_DIM_IN: c_int = 2;
pub const ISL_DIM_OUT: c_int = 3;
pub const ISL_DIM_SET: c_int = 3;

// enum isl_schedule_node_type
pub const ISL_SCHEDULE_NODE_BAND: c_int = 0;

// enum isl_ast_node_type
pub const ISL_AST_NODE_FOR: c_int = 1;
pub const ISL_AST_NODE_IF: c_int = 2;
pub const ISL_AST_NODE_BLOCK: c_int = 3;
pub const ISL_AST_NODE_MARK: c_int = 4;
pub const ISL_AST_NODE_USER: c_int = 5;

// enum isl_ast_expr_type
pub const ISL_AST_EXPR_OP: c_int = 0;
pub const ISL_AST_EXPR_ID: c_int = 1;
pub const ISL_AST_EXPR_INT: c_int = 2;

// enum isl_ast_expr_op_type
pub const ISL_AST_OP_AND: c_int = 0;
pub const ISL_AST_OP_AND_THEN: c_int = 1;
pub const ISL_AST_OP_OR: c_int = 2;
pub const ISL_AST_OP_OR_ELSE: c_int = 3;
pub const ISL_AST_OP_MAX: c_int = 4;
pub const ISL_AST_OP_MIN: c_int = 5;
pub const ISL_AST_OP_MINUS: c_int = 6;
pub const ISL_AST_OP_ADD: c_int = 7;
pub const ISL_AST_OP_SUB: c_int = 8;
pub const ISL_AST_OP_MUL: c_int = 9;
pub const ISL_AST_OP_DIV: c_int = 10;
pub const ISL_AST_OP_FDIV_Q: c_int = 11;
pub const ISL_AST_OP_PDIV_Q: c_int = 12;
pub const ISL_AST_OP_PDIV_R: c_int = 13;
pub const ISL_AST_OP_ZDIV_R: c_int = 14;
pub const ISL_AST_OP_COND: c_int = 15;
pub const ISL_AST_OP_SELECT: c_int = 16;
pub const ISL_AST_OP_EQ: c_int = 17;
pub const ISL_AST_OP_LE: c_int = 18;
pub const ISL_AST_OP_LT: c_int = 19;
pub const ISL_AST_OP_GE: c_int = 20;
pub const ISL_AST_OP_GT: c_int = 21;
pub const ISL_AST_OP_CALL: c_int = 22;
pub const ISL_AST_OP_ACCESS: c_int = 23;
pub const ISL_AST_OP_MEMBER: c_int = 24;
pub const ISL_AST_OP_ADDRESS_OF: c_int = 25;

extern "C" {
    // context
    pub fn isl_ctx_alloc() -> *mut isl_ctx;
    pub fn isl_ctx_free(ctx: *mut isl_ctx);
    pub fn isl_options_set_on_error(ctx: *mut isl_ctx, val: c_int) -> c_int;
    pub fn isl_ctx_last_error(ctx: *mut isl_ctx) -> c_int;
    pub fn isl_ctx_reset_error(ctx: *mut isl_ctx);

    // space
    pub fn isl_space_free(space: *mut isl_space) -> *mut isl_space;
    pub fn isl_space_copy(space: *mut isl_space) -> *mut isl_space;
    pub fn isl_space_dim(space: *mut isl_space, dim_type: c_int) -> c_int;

    // set
    pub fn isl_set_read_from_str(ctx: *mut isl_ctx, s: *const c_char) -> *mut isl_set;
    pub fn isl_set_copy(set: *mut isl_set) -> *mut isl_set;
    pub fn isl_set_free(set: *mut isl_set) -> *mut isl_set;
    pub fn isl_set_get_space(set: *mut isl_set) -> *mut isl_space;
    pub fn isl_set_dim(set: *mut isl_set, dim_type: c_int) -> c_int;
    pub fn isl_set_is_empty(set: *mut isl_set) -> c_int;
    pub fn isl_set_add_constraint(
        set: *mut isl_set,
        constraint: *mut isl_constraint,
    ) -> *mut isl_set;
    pub fn isl_set_to_str(set: *mut isl_set) -> *mut c_char;

    // constraints on sets
    pub fn isl_local_space_from_space(space: *mut isl_space) -> *mut isl_local_space;
    pub fn isl_constraint_alloc_inequality(ls: *mut isl_local_space) -> *mut isl_constraint;
    pub fn isl_constraint_set_coefficient_si(
        constraint: *mut isl_constraint,
        dim_type: c_int,
        pos: c_int,
        v: c_int,
    ) -> *mut isl_constraint;
    pub fn isl_constraint_set_constant_si(
        constraint: *mut isl_constraint,
        v: c_int,
    ) -> *mut isl_constraint;

    // set list
    pub fn isl_set_list_n_set(list: *mut isl_set_list) -> c_int;
    pub fn isl_set_list_get_set(list: *mut isl_set_list, index: c_int) -> *mut isl_set;
    pub fn isl_set_list_free(list: *mut isl_set_list) -> *mut isl_set_list;

    // union set
    pub fn isl_union_set_read_from_str(
        ctx: *mut isl_ctx,
        s: *const c_char,
    ) -> *mut isl_union_set;
    pub fn isl_union_set_copy(uset: *mut isl_union_set) -> *mut isl_union_set;
    pub fn isl_union_set_free(uset: *mut isl_union_set) -> *mut isl_union_set;
    pub fn isl_union_set_union(
        uset1: *mut isl_union_set,
        uset2: *mut isl_union_set,
    ) -> *mut isl_union_set;
    pub fn isl_union_set_is_empty(uset: *mut isl_union_set) -> c_int;
    pub fn isl_union_set_is_equal(
        uset1: *mut isl_union_set,
        uset2: *mut isl_union_set,
    ) -> c_int;
    pub fn isl_union_set_align_params(
        uset: *mut isl_union_set,
        model: *mut isl_space,
    ) -> *mut isl_union_set;
    pub fn isl_union_set_get_set_list(uset: *mut isl_union_set) -> *mut isl_set_list;
    pub fn isl_union_set_to_str(uset: *mut isl_union_set) -> *mut c_char;

    // map
    pub fn isl_map_free(map: *mut isl_map) -> *mut isl_map;
    pub fn isl_map_get_tuple_name(map: *mut isl_map, dim_type: c_int) -> *const c_char;

    // map list
    pub fn isl_map_list_n_map(list: *mut isl_map_list) -> c_int;
    pub fn isl_map_list_get_map(list: *mut isl_map_list, index: c_int) -> *mut isl_map;
    pub fn isl_map_list_free(list: *mut isl_map_list) -> *mut isl_map_list;

    // union map
    pub fn isl_union_map_read_from_str(
        ctx: *mut isl_ctx,
        s: *const c_char,
    ) -> *mut isl_union_map;
    pub fn isl_union_map_copy(umap: *mut isl_union_map) -> *mut isl_union_map;
    pub fn isl_union_map_free(umap: *mut isl_union_map) -> *mut isl_union_map;
    pub fn isl_union_map_union(
        umap1: *mut isl_union_map,
        umap2: *mut isl_union_map,
    ) -> *mut isl_union_map;
    pub fn isl_union_map_intersect(
        umap1: *mut isl_union_map,
        umap2: *mut isl_union_map,
    ) -> *mut isl_union_map;
    pub fn isl_union_map_intersect_domain(
        umap: *mut isl_union_map,
        uset: *mut isl_union_set,
    ) -> *mut isl_union_map;
    pub fn isl_union_map_apply_domain(
        umap1: *mut isl_union_map,
        umap2: *mut isl_union_map,
    ) -> *mut isl_union_map;
    pub fn isl_union_map_apply_range(
        umap1: *mut isl_union_map,
        umap2: *mut isl_union_map,
    ) -> *mut isl_union_map;
    pub fn isl_union_map_reverse(umap: *mut isl_union_map) -> *mut isl_union_map;
    pub fn isl_union_map_is_subset(
        umap1: *mut isl_union_map,
        umap2: *mut isl_union_map,
    ) -> c_int;
    pub fn isl_union_map_is_equal(
        umap1: *mut isl_union_map,
        umap2: *mut isl_union_map,
    ) -> c_int;
    pub fn isl_union_map_is_empty(umap: *mut isl_union_map) -> c_int;
    pub fn isl_union_map_lex_lt_union_map(
        umap1: *mut isl_union_map,
        umap2: *mut isl_union_map,
    ) -> *mut isl_union_map;
    pub fn isl_union_map_deltas(umap: *mut isl_union_map) -> *mut isl_union_set;
    pub fn isl_union_map_align_params(
        umap: *mut isl_union_map,
        model: *mut isl_space,
    ) -> *mut isl_union_map;
    pub fn isl_union_map_get_map_list(umap: *mut isl_union_map) -> *mut isl_map_list;
    pub fn isl_union_map_to_str(umap: *mut isl_union_map) -> *mut c_char;

    // val / multi val
    pub fn isl_val_int_from_si(ctx: *mut isl_ctx, v: c_long) -> *mut isl_val;
    pub fn isl_val_free(v: *mut isl_val) -> *mut isl_val;
    pub fn isl_val_get_num_si(v: *mut isl_val) -> c_long;
    pub fn isl_multi_val_zero(space: *mut isl_space) -> *mut isl_multi_val;
    pub fn isl_multi_val_set_val(
        mv: *mut isl_multi_val,
        pos: c_int,
        val: *mut isl_val,
    ) -> *mut isl_multi_val;
    pub fn isl_multi_val_free(mv: *mut isl_multi_val) -> *mut isl_multi_val;

    // multi union pw aff
    pub fn isl_multi_union_pw_aff_from_union_map(
        umap: *mut isl_union_map,
    ) -> *mut isl_multi_union_pw_aff;
    pub fn isl_multi_union_pw_aff_free(
        mupa: *mut isl_multi_union_pw_aff,
    ) -> *mut isl_multi_union_pw_aff;

    // schedule
    pub fn isl_schedule_from_domain(uset: *mut isl_union_set) -> *mut isl_schedule;
    pub fn isl_schedule_copy(schedule: *mut isl_schedule) -> *mut isl_schedule;
    pub fn isl_schedule_free(schedule: *mut isl_schedule) -> *mut isl_schedule;
    pub fn isl_schedule_get_root(schedule: *mut isl_schedule) -> *mut isl_schedule_node;
    pub fn isl_schedule_get_map(schedule: *mut isl_schedule) -> *mut isl_union_map;
    pub fn isl_schedule_to_str(schedule: *mut isl_schedule) -> *mut c_char;

    // schedule node
    pub fn isl_schedule_node_copy(node: *mut isl_schedule_node) -> *mut isl_schedule_node;
    pub fn isl_schedule_node_free(node: *mut isl_schedule_node) -> *mut isl_schedule_node;
    pub fn isl_schedule_node_child(
        node: *mut isl_schedule_node,
        pos: c_int,
    ) -> *mut isl_schedule_node;
    pub fn isl_schedule_node_first_child(
        node: *mut isl_schedule_node,
    ) -> *mut isl_schedule_node;
    pub fn isl_schedule_node_n_children(node: *mut isl_schedule_node) -> c_int;
    pub fn isl_schedule_node_get_type(node: *mut isl_schedule_node) -> c_int;
    pub fn isl_schedule_node_insert_partial_schedule(
        node: *mut isl_schedule_node,
        mupa: *mut isl_multi_union_pw_aff,
    ) -> *mut isl_schedule_node;
    pub fn isl_schedule_node_band_get_space(node: *mut isl_schedule_node) -> *mut isl_space;
    pub fn isl_schedule_node_band_tile(
        node: *mut isl_schedule_node,
        sizes: *mut isl_multi_val,
    ) -> *mut isl_schedule_node;
    pub fn isl_schedule_node_get_schedule(node: *mut isl_schedule_node) -> *mut isl_schedule;

    // schedule constraints
    pub fn isl_schedule_constraints_on_domain(
        domain: *mut isl_union_set,
    ) -> *mut isl_schedule_constraints;
    pub fn isl_schedule_constraints_set_validity(
        sc: *mut isl_schedule_constraints,
        validity: *mut isl_union_map,
    ) -> *mut isl_schedule_constraints;
    pub fn isl_schedule_constraints_set_coincidence(
        sc: *mut isl_schedule_constraints,
        coincidence: *mut isl_union_map,
    ) -> *mut isl_schedule_constraints;
    pub fn isl_schedule_constraints_set_proximity(
        sc: *mut isl_schedule_constraints,
        proximity: *mut isl_union_map,
    ) -> *mut isl_schedule_constraints;
    pub fn isl_schedule_constraints_compute_schedule(
        sc: *mut isl_schedule_constraints,
    ) -> *mut isl_schedule;
    pub fn isl_schedule_constraints_free(
        sc: *mut isl_schedule_constraints,
    ) -> *mut isl_schedule_constraints;

    // ast build
    pub fn isl_ast_build_alloc(ctx: *mut isl_ctx) -> *mut isl_ast_build;
    pub fn isl_ast_build_from_context(set: *mut isl_set) -> *mut isl_ast_build;
    pub fn isl_ast_build_free(build: *mut isl_ast_build);
    pub fn isl_ast_build_node_from_schedule_map(
        build: *mut isl_ast_build,
        schedule: *mut isl_union_map,
    ) -> *mut isl_ast_node;
    pub fn isl_ast_build_node_from_schedule(
        build: *mut isl_ast_build,
        schedule: *mut isl_schedule,
    ) -> *mut isl_ast_node;

    // ast node
    pub fn isl_ast_node_free(node: *mut isl_ast_node) -> *mut isl_ast_node;
    pub fn isl_ast_node_get_type(node: *mut isl_ast_node) -> c_int;
    pub fn isl_ast_node_for_get_iterator(node: *mut isl_ast_node) -> *mut isl_ast_expr;
    pub fn isl_ast_node_for_get_init(node: *mut isl_ast_node) -> *mut isl_ast_expr;
    pub fn isl_ast_node_for_get_cond(node: *mut isl_ast_node) -> *mut isl_ast_expr;
    pub fn isl_ast_node_for_get_inc(node: *mut isl_ast_node) -> *mut isl_ast_expr;
    pub fn isl_ast_node_for_get_body(node: *mut isl_ast_node) -> *mut isl_ast_node;
    pub fn isl_ast_node_block_get_children(
        node: *mut isl_ast_node,
    ) -> *mut isl_ast_node_list;
    pub fn isl_ast_node_user_get_expr(node: *mut isl_ast_node) -> *mut isl_ast_expr;
    pub fn isl_ast_node_if_get_cond(node: *mut isl_ast_node) -> *mut isl_ast_expr;
    pub fn isl_ast_node_if_get_then(node: *mut isl_ast_node) -> *mut isl_ast_node;

    // ast node list
    pub fn isl_ast_node_list_n_ast_node(list: *mut isl_ast_node_list) -> c_int;
    pub fn isl_ast_node_list_get_ast_node(
        list: *mut isl_ast_node_list,
        index: c_int,
    ) -> *mut isl_ast_node;
    pub fn isl_ast_node_list_free(list: *mut isl_ast_node_list) -> *mut isl_ast_node_list;

    // ast expr
    pub fn isl_ast_expr_free(expr: *mut isl_ast_expr) -> *mut isl_ast_expr;
    pub fn isl_ast_expr_get_type(expr: *mut isl_ast_expr) -> c_int;
    pub fn isl_ast_expr_get_id(expr: *mut isl_ast_expr) -> *mut isl_id;
    pub fn isl_ast_expr_get_val(expr: *mut isl_ast_expr) -> *mut isl_val;
    pub fn isl_ast_expr_get_op_type(expr: *mut isl_ast_expr) -> c_int;
    pub fn isl_ast_expr_get_op_n_arg(expr: *mut isl_ast_expr) -> c_int;
    pub fn isl_ast_expr_get_op_arg(
        expr: *mut isl_ast_expr,
        pos: c_int,
    ) -> *mut isl_ast_expr;

    // id
    pub fn isl_id_get_name(id: *mut isl_id) -> *const c_char;
    pub fn isl_id_free(id: *mut isl_id) -> *mut isl_id;
}

extern "C" {
    // libc free, for strings returned by isl_*_to_str
    pub fn free(ptr: *mut c_void);
}
