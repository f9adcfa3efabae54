//! Conversion from the polyhedral library's loop AST into the core's own.

use polyc_isl as isl;
use polyc_isl::{AstExprKind, AstNodeKind, AstOpKind};

use crate::ast::{AstBinOp, AstCall, AstExpr, AstStmt, ForLoop, Guard};
use crate::error::CodegenError;

fn unsupported(detail: impl Into<String>) -> CodegenError {
    CodegenError::UnsupportedAst {
        detail: detail.into(),
    }
}

/// Converts an isl AST node into the core loop AST.
pub fn convert_ast(node: &isl::AstNode<'_>) -> Result<AstStmt, CodegenError> {
    match node.kind() {
        AstNodeKind::For => Ok(AstStmt::For(convert_for(node)?)),
        AstNodeKind::Block => {
            let children = node
                .block_children()?
                .iter()
                .map(convert_ast)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AstStmt::Block(children))
        }
        AstNodeKind::User => Ok(AstStmt::User(convert_user(node)?)),
        AstNodeKind::If => Ok(AstStmt::If(convert_guard(node)?)),
        AstNodeKind::Mark | AstNodeKind::Unknown => {
            Err(unsupported("mark or unknown AST node"))
        }
    }
}

fn convert_for(node: &isl::AstNode<'_>) -> Result<ForLoop, CodegenError> {
    let iterator = match convert_expr(&node.for_iterator()?)? {
        AstExpr::Id(name) => name,
        other => return Err(unsupported(format!("loop iterator {other:?}"))),
    };
    let init = convert_expr(&node.for_init()?)?;
    let cond = match convert_expr(&node.for_cond()?)? {
        AstExpr::Bin(bin) => bin,
        other => return Err(unsupported(format!("loop condition {other:?}"))),
    };
    // Only forward loops with a constant stride are representable.
    let inc = match convert_expr(&node.for_inc()?)? {
        AstExpr::Val(v) if v > 0 => v,
        other => return Err(unsupported(format!("loop increment {other:?}"))),
    };
    let body = convert_ast(&node.for_body()?)?;
    Ok(ForLoop {
        iterator,
        init,
        cond,
        inc,
        body: Box::new(body),
    })
}

fn convert_guard(node: &isl::AstNode<'_>) -> Result<Guard, CodegenError> {
    let cond = match convert_expr(&node.if_cond()?)? {
        AstExpr::Bin(bin) => bin,
        other => return Err(unsupported(format!("guard condition {other:?}"))),
    };
    let then = convert_ast(&node.if_then()?)?;
    Ok(Guard {
        cond,
        then: Box::new(then),
    })
}

fn convert_user(node: &isl::AstNode<'_>) -> Result<AstCall, CodegenError> {
    match convert_expr(&node.user_expr()?)? {
        AstExpr::Call(call) => Ok(call),
        other => Err(unsupported(format!("user statement body {other:?}"))),
    }
}

fn convert_op(op: AstOpKind) -> Result<crate::ast::AstOp, CodegenError> {
    use crate::ast::AstOp;
    Ok(match op {
        AstOpKind::Le => AstOp::Le,
        AstOpKind::Lt => AstOp::Lt,
        AstOpKind::Ge => AstOp::Ge,
        AstOpKind::Gt => AstOp::Gt,
        AstOpKind::Eq => AstOp::Eq,
        AstOpKind::Add => AstOp::Add,
        AstOpKind::Sub => AstOp::Sub,
        AstOpKind::Mul => AstOp::Mul,
        AstOpKind::Div => AstOp::Div,
        AstOpKind::FdivQ => AstOp::FdivQ,
        AstOpKind::PdivQ => AstOp::PdivQ,
        AstOpKind::PdivR => AstOp::PdivR,
        AstOpKind::ZdivR => AstOp::ZdivR,
        AstOpKind::Min => AstOp::Min,
        AstOpKind::Max => AstOp::Max,
        // Short-circuit forms carry the same meaning once lowered to C.
        AstOpKind::And | AstOpKind::AndThen => AstOp::And,
        AstOpKind::Or | AstOpKind::OrElse => AstOp::Or,
        other => return Err(unsupported(format!("operator {other:?}"))),
    })
}

/// Converts an isl AST expression. Multi-argument `min`/`max` are
/// left-folded into nested binary nodes.
pub fn convert_expr(expr: &isl::AstExpr<'_>) -> Result<AstExpr, CodegenError> {
    match expr.kind() {
        AstExprKind::Id => Ok(AstExpr::Id(expr.id_name()?)),
        AstExprKind::Int => Ok(AstExpr::Val(expr.int_value()?)),
        AstExprKind::Op => convert_op_expr(expr),
        AstExprKind::Unknown => Err(unsupported("unknown expression kind")),
    }
}

fn convert_op_expr(expr: &isl::AstExpr<'_>) -> Result<AstExpr, CodegenError> {
    let op = expr.op_kind();
    let args = expr
        .op_args()?
        .iter()
        .map(convert_expr)
        .collect::<Result<Vec<_>, _>>()?;

    if op == AstOpKind::Call {
        return Ok(AstExpr::Call(AstCall { args }));
    }

    if op == AstOpKind::Minus {
        let [operand] = <[AstExpr; 1]>::try_from(args)
            .map_err(|args| unsupported(format!("minus with {} arguments", args.len())))?;
        return Ok(AstExpr::Unary {
            op: crate::ast::AstUnOp::Minus,
            operand: Box::new(operand),
        });
    }

    let core_op = convert_op(op)?;
    let n = args.len();
    if n == 2 {
        let [lhs, rhs] = <[AstExpr; 2]>::try_from(args)
            .map_err(|_| unsupported("argument extraction"))?;
        return Ok(AstExpr::bin(core_op, lhs, rhs));
    }
    if n > 2 && matches!(op, AstOpKind::Min | AstOpKind::Max) {
        let mut iter = args.into_iter();
        let Some(mut acc) = iter.next() else {
            return Err(unsupported("empty argument list"));
        };
        for arg in iter {
            acc = AstExpr::bin(core_op, acc, arg);
        }
        return Ok(acc);
    }
    Err(unsupported(format!("{op:?} with {n} arguments")))
}
