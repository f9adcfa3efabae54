//! Rendering of IR expressions and constraints into isl textual syntax.

use polyc_core::{BinOp, CmpOp, Compute, Constraint, Expr, LogicOp, UnOp};

use crate::error::AffineError;

/// Renders an expression in isl's quasi-affine syntax.
///
/// Float literals are truncated to integers; loads are rejected as
/// data-dependent (callers either skip the enclosing access or escalate).
pub fn expr_to_affine(expr: &Expr) -> Result<String, AffineError> {
    match expr {
        Expr::Int(v) => Ok(v.to_string()),
        Expr::Float(v) => Ok((v.trunc() as i64).to_string()),
        Expr::Var(name) => Ok(name.clone()),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = expr_to_affine(lhs)?;
            let rhs = expr_to_affine(rhs)?;
            Ok(match op {
                BinOp::Add => format!("({lhs} + {rhs})"),
                BinOp::Sub => format!("({lhs} - {rhs})"),
                BinOp::Mul => format!("({lhs} * {rhs})"),
                BinOp::Div | BinOp::FloorDiv => format!("floor({lhs} / {rhs})"),
                BinOp::Mod => format!("({lhs} % {rhs})"),
                BinOp::Max => format!("max({lhs}, {rhs})"),
                BinOp::Min => format!("min({lhs}, {rhs})"),
            })
        }
        Expr::Unary { op, operand } => match op {
            UnOp::Neg => Ok(format!("-{}", expr_to_affine(operand)?)),
            UnOp::Not => Err(AffineError::Unsupported {
                detail: "logical not in affine expression".to_string(),
            }),
        },
        Expr::Call { name, args } => {
            // Only isl's own builtins may appear in affine text.
            if !matches!(name.as_str(), "floor" | "ceil" | "min" | "max") {
                return Err(AffineError::Unsupported {
                    detail: format!("call to '{name}' in affine expression"),
                });
            }
            let args = args
                .iter()
                .map(expr_to_affine)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{}({})", name, args.join(", ")))
        }
        Expr::Load(access) => Err(AffineError::NonAffine {
            tensor: access.tensor.name.clone(),
        }),
    }
}

fn cmp_symbol(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Lt => "<",
        CmpOp::Le => "<=",
        CmpOp::Gt => ">",
        CmpOp::Ge => ">=",
        CmpOp::Eq => "=",
        CmpOp::Ne => "!=",
    }
}

/// Renders a constraint in isl syntax. Float literals are rejected here:
/// they must never reach polyhedral constraint text.
pub fn constraint_to_affine(constraint: &Constraint) -> Result<String, AffineError> {
    if constraint_contains_float(constraint) {
        return Err(AffineError::Unsupported {
            detail: "float constant in constraint".to_string(),
        });
    }
    render_constraint(constraint)
}

fn render_constraint(constraint: &Constraint) -> Result<String, AffineError> {
    match constraint {
        Constraint::Compare { op, lhs, rhs } => Ok(format!(
            "{} {} {}",
            expr_to_affine(lhs)?,
            cmp_symbol(*op),
            expr_to_affine(rhs)?
        )),
        Constraint::Logical { op, lhs, rhs } => {
            let word = match op {
                LogicOp::And => "and",
                LogicOp::Or => "or",
            };
            Ok(format!(
                "({} {} {})",
                render_constraint(lhs)?,
                word,
                render_constraint(rhs)?
            ))
        }
    }
}

fn expr_contains_float(expr: &Expr) -> bool {
    match expr {
        Expr::Float(_) => true,
        Expr::Int(_) | Expr::Var(_) => false,
        Expr::Binary { lhs, rhs, .. } => expr_contains_float(lhs) || expr_contains_float(rhs),
        Expr::Unary { operand, .. } => expr_contains_float(operand),
        Expr::Call { args, .. } => args.iter().any(expr_contains_float),
        Expr::Load(access) => access.index.iter().any(expr_contains_float),
    }
}

fn constraint_contains_float(constraint: &Constraint) -> bool {
    match constraint {
        Constraint::Compare { lhs, rhs, .. } => {
            expr_contains_float(lhs) || expr_contains_float(rhs)
        }
        Constraint::Logical { lhs, rhs, .. } => {
            constraint_contains_float(lhs) || constraint_contains_float(rhs)
        }
    }
}

/// Renders a compute header as `(params, tuple, constraints)` strings ready
/// for composition into set/map literals: `"[N, M]"` (or `"[]"`),
/// `"S[i, j]"`, and the `and`-joined constraint conjunction (`"1 = 1"` when
/// the domain has no constraints).
pub fn compute_header(compute: &Compute) -> Result<(String, String, String), AffineError> {
    let domain = &compute.domain;
    let params = format!("[{}]", domain.params.join(", "));

    let iters = domain
        .iterators
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let tuple = format!("{}[{}]", compute.name, iters);

    let constraints = if domain.constraints.is_empty() {
        "1 = 1".to_string()
    } else {
        domain
            .constraints
            .iter()
            .map(constraint_to_affine)
            .collect::<Result<Vec<_>, _>>()?
            .join(" and ")
    };

    Ok((params, tuple, constraints))
}
