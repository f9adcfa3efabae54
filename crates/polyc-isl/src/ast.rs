//! Loop AST generation and introspection.

use crate::ctx::Context;
use crate::error::IslError;
use crate::ffi;
use crate::map::UnionMap;
use crate::schedule::Schedule;
use crate::set::Set;

/// Kinds of AST nodes produced by isl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstNodeKind {
    For,
    If,
    Block,
    Mark,
    User,
    Unknown,
}

/// Kinds of AST expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstExprKind {
    Op,
    Id,
    Int,
    Unknown,
}

/// Operators of AST `op` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstOpKind {
    And,
    AndThen,
    Or,
    OrElse,
    Max,
    Min,
    Minus,
    Add,
    Sub,
    Mul,
    Div,
    FdivQ,
    PdivQ,
    PdivR,
    ZdivR,
    Cond,
    Select,
    Eq,
    Le,
    Lt,
    Ge,
    Gt,
    Call,
    Access,
    Member,
    AddressOf,
    Unknown,
}

impl AstOpKind {
    fn from_raw(raw: std::ffi::c_int) -> Self {
        match raw {
            ffi::ISL_AST_OP_AND => AstOpKind::And,
            ffi::ISL_AST_OP_AND_THEN => AstOpKind::AndThen,
            ffi::ISL_AST_OP_OR => AstOpKind::Or,
            ffi::ISL_AST_OP_OR_ELSE => AstOpKind::OrElse,
            ffi::ISL_AST_OP_MAX => AstOpKind::Max,
            ffi::ISL_AST_OP_MIN => AstOpKind::Min,
            ffi::ISL_AST_OP_MINUS => AstOpKind::Minus,
            ffi::ISL_AST_OP_ADD => AstOpKind::Add,
            ffi::ISL_AST_OP_SUB => AstOpKind::Sub,
            ffi::ISL_AST_OP_MUL => AstOpKind::Mul,
            ffi::ISL_AST_OP_DIV => AstOpKind::Div,
            ffi::ISL_AST_OP_FDIV_Q => AstOpKind::FdivQ,
            ffi::ISL_AST_OP_PDIV_Q => AstOpKind::PdivQ,
            ffi::ISL_AST_OP_PDIV_R => AstOpKind::PdivR,
            ffi::ISL_AST_OP_ZDIV_R => AstOpKind::ZdivR,
            ffi::ISL_AST_OP_COND => AstOpKind::Cond,
            ffi::ISL_AST_OP_SELECT => AstOpKind::Select,
            ffi::ISL_AST_OP_EQ => AstOpKind::Eq,
            ffi::ISL_AST_OP_LE => AstOpKind::Le,
            ffi::ISL_AST_OP_LT => AstOpKind::Lt,
            ffi::ISL_AST_OP_GE => AstOpKind::Ge,
            ffi::ISL_AST_OP_GT => AstOpKind::Gt,
            ffi::ISL_AST_OP_CALL => AstOpKind::Call,
            ffi::ISL_AST_OP_ACCESS => AstOpKind::Access,
            ffi::ISL_AST_OP_MEMBER => AstOpKind::Member,
            ffi::ISL_AST_OP_ADDRESS_OF => AstOpKind::AddressOf,
            _ => AstOpKind::Unknown,
        }
    }
}

/// Builder turning schedules into loop ASTs.
#[derive(Debug)]
pub struct AstBuild<'ctx> {
    raw: *mut ffi::isl_ast_build,
    ctx: &'ctx Context,
}

impl<'ctx> AstBuild<'ctx> {
    /// A build without extra context constraints.
    pub fn alloc(ctx: &'ctx Context) -> Result<Self, IslError> {
        let raw = unsafe { ffi::isl_ast_build_alloc(ctx.raw) };
        Ok(AstBuild {
            raw: ctx.check(raw, "ast_build_alloc")?,
            ctx,
        })
    }

    /// A build whose parameter context is the given set.
    pub fn from_context(context_set: &Set<'ctx>) -> Result<Self, IslError> {
        let ctx = context_set.ctx;
        let raw = unsafe { ffi::isl_ast_build_from_context(context_set.copy_raw()) };
        Ok(AstBuild {
            raw: ctx.check(raw, "ast_build_from_context")?,
            ctx,
        })
    }

    /// Generates a loop AST from a schedule union map whose domain carries
    /// the iteration constraints.
    pub fn ast_from_schedule_map(&self, schedule: &UnionMap<'ctx>) -> Result<AstNode<'ctx>, IslError> {
        let raw = unsafe {
            ffi::isl_ast_build_node_from_schedule_map(self.raw, schedule.copy_raw())
        };
        Ok(AstNode {
            raw: self.ctx.check(raw, "ast_build_node_from_schedule_map")?,
            ctx: self.ctx,
        })
    }

    /// Generates a loop AST from a schedule tree.
    pub fn ast_from_schedule(&self, schedule: &Schedule<'ctx>) -> Result<AstNode<'ctx>, IslError> {
        let copy = unsafe { ffi::isl_schedule_copy(schedule.raw) };
        let copy = self.ctx.check(copy, "schedule_copy")?;
        let raw = unsafe { ffi::isl_ast_build_node_from_schedule(self.raw, copy) };
        Ok(AstNode {
            raw: self.ctx.check(raw, "ast_build_node_from_schedule")?,
            ctx: self.ctx,
        })
    }
}

impl Drop for AstBuild<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_ast_build_free(self.raw) };
    }
}

/// A node of the generated loop AST.
#[derive(Debug)]
pub struct AstNode<'ctx> {
    raw: *mut ffi::isl_ast_node,
    ctx: &'ctx Context,
}

impl<'ctx> AstNode<'ctx> {
    pub fn kind(&self) -> AstNodeKind {
        match unsafe { ffi::isl_ast_node_get_type(self.raw) } {
            ffi::ISL_AST_NODE_FOR => AstNodeKind::For,
            ffi::ISL_AST_NODE_IF => AstNodeKind::If,
            ffi::ISL_AST_NODE_BLOCK => AstNodeKind::Block,
            ffi::ISL_AST_NODE_MARK => AstNodeKind::Mark,
            ffi::ISL_AST_NODE_USER => AstNodeKind::User,
            _ => AstNodeKind::Unknown,
        }
    }

    fn expr(&self, raw: *mut ffi::isl_ast_expr, op: &'static str) -> Result<AstExpr<'ctx>, IslError> {
        Ok(AstExpr {
            raw: self.ctx.check(raw, op)?,
            ctx: self.ctx,
        })
    }

    fn node(&self, raw: *mut ffi::isl_ast_node, op: &'static str) -> Result<AstNode<'ctx>, IslError> {
        Ok(AstNode {
            raw: self.ctx.check(raw, op)?,
            ctx: self.ctx,
        })
    }

    pub fn for_iterator(&self) -> Result<AstExpr<'ctx>, IslError> {
        self.expr(
            unsafe { ffi::isl_ast_node_for_get_iterator(self.raw) },
            "ast_node_for_get_iterator",
        )
    }

    pub fn for_init(&self) -> Result<AstExpr<'ctx>, IslError> {
        self.expr(
            unsafe { ffi::isl_ast_node_for_get_init(self.raw) },
            "ast_node_for_get_init",
        )
    }

    pub fn for_cond(&self) -> Result<AstExpr<'ctx>, IslError> {
        self.expr(
            unsafe { ffi::isl_ast_node_for_get_cond(self.raw) },
            "ast_node_for_get_cond",
        )
    }

    pub fn for_inc(&self) -> Result<AstExpr<'ctx>, IslError> {
        self.expr(
            unsafe { ffi::isl_ast_node_for_get_inc(self.raw) },
            "ast_node_for_get_inc",
        )
    }

    pub fn for_body(&self) -> Result<AstNode<'ctx>, IslError> {
        self.node(
            unsafe { ffi::isl_ast_node_for_get_body(self.raw) },
            "ast_node_for_get_body",
        )
    }

    pub fn if_cond(&self) -> Result<AstExpr<'ctx>, IslError> {
        self.expr(
            unsafe { ffi::isl_ast_node_if_get_cond(self.raw) },
            "ast_node_if_get_cond",
        )
    }

    pub fn if_then(&self) -> Result<AstNode<'ctx>, IslError> {
        self.node(
            unsafe { ffi::isl_ast_node_if_get_then(self.raw) },
            "ast_node_if_get_then",
        )
    }

    pub fn user_expr(&self) -> Result<AstExpr<'ctx>, IslError> {
        self.expr(
            unsafe { ffi::isl_ast_node_user_get_expr(self.raw) },
            "ast_node_user_get_expr",
        )
    }

    pub fn block_children(&self) -> Result<Vec<AstNode<'ctx>>, IslError> {
        let list = unsafe { ffi::isl_ast_node_block_get_children(self.raw) };
        let list = self.ctx.check(list, "ast_node_block_get_children")?;
        let n = unsafe { ffi::isl_ast_node_list_n_ast_node(list) };
        let n = match self.ctx.check_size(n, "ast_node_list_n_ast_node") {
            Ok(n) => n,
            Err(err) => {
                unsafe { ffi::isl_ast_node_list_free(list) };
                return Err(err);
            }
        };
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let child = unsafe { ffi::isl_ast_node_list_get_ast_node(list, i as i32) };
            match self.ctx.check(child, "ast_node_list_get_ast_node") {
                Ok(raw) => out.push(AstNode { raw, ctx: self.ctx }),
                Err(err) => {
                    unsafe { ffi::isl_ast_node_list_free(list) };
                    return Err(err);
                }
            }
        }
        unsafe { ffi::isl_ast_node_list_free(list) };
        Ok(out)
    }
}

impl Drop for AstNode<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_ast_node_free(self.raw) };
    }
}

/// An expression of the generated loop AST.
#[derive(Debug)]
pub struct AstExpr<'ctx> {
    raw: *mut ffi::isl_ast_expr,
    ctx: &'ctx Context,
}

impl<'ctx> AstExpr<'ctx> {
    pub fn kind(&self) -> AstExprKind {
        match unsafe { ffi::isl_ast_expr_get_type(self.raw) } {
            ffi::ISL_AST_EXPR_OP => AstExprKind::Op,
            ffi::ISL_AST_EXPR_ID => AstExprKind::Id,
            ffi::ISL_AST_EXPR_INT => AstExprKind::Int,
            _ => AstExprKind::Unknown,
        }
    }

    /// The identifier name of an `Id` expression.
    pub fn id_name(&self) -> Result<String, IslError> {
        let id = unsafe { ffi::isl_ast_expr_get_id(self.raw) };
        let id = self.ctx.check(id, "ast_expr_get_id")?;
        let name = unsafe { crate::ctx::borrow_isl_string(ffi::isl_id_get_name(id)) };
        unsafe { ffi::isl_id_free(id) };
        name.ok_or_else(|| {
            IslError::new("id_get_name", crate::error::IslErrorKind::Invalid)
        })
    }

    /// The numerator of an `Int` expression as a signed machine integer.
    pub fn int_value(&self) -> Result<i64, IslError> {
        let val = unsafe { ffi::isl_ast_expr_get_val(self.raw) };
        let val = self.ctx.check(val, "ast_expr_get_val")?;
        let n = unsafe { ffi::isl_val_get_num_si(val) };
        unsafe { ffi::isl_val_free(val) };
        Ok(n)
    }

    pub fn op_kind(&self) -> AstOpKind {
        AstOpKind::from_raw(unsafe { ffi::isl_ast_expr_get_op_type(self.raw) })
    }

    pub fn op_args(&self) -> Result<Vec<AstExpr<'ctx>>, IslError> {
        let n = unsafe { ffi::isl_ast_expr_get_op_n_arg(self.raw) };
        let n = self.ctx.check_size(n, "ast_expr_get_op_n_arg")?;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let arg = unsafe { ffi::isl_ast_expr_get_op_arg(self.raw, i as i32) };
            out.push(AstExpr {
                raw: self.ctx.check(arg, "ast_expr_get_op_arg")?,
                ctx: self.ctx,
            });
        }
        Ok(out)
    }
}

impl Drop for AstExpr<'_> {
    fn drop(&mut self) {
        unsafe { ffi::isl_ast_expr_free(self.raw) };
    }
}
