//! C source emission from the loop AST.
//!
//! Walks the lowered AST and prints a single C function. User statements
//! dispatch on the statement-name argument of the underlying call: the
//! matching compute's body is emitted with loop variables substituted for
//! its iterators (the last `k` call arguments pair positionally with the
//! compute's `k` iterators).

use std::collections::HashMap;

use polyc_core::{
    Access, Axis, AxisKind, BinOp, CmpOp, Compute, Constraint, Domain, ElemType, Expr, LogicOp,
    PrimFunc, ReduceOp, Stmt, Tensor, UnOp,
};

use crate::ast::{AstBinOp, AstCall, AstExpr, AstOp, AstStmt};
use crate::error::CodegenError;

/// Loop-variable substitution: compute iterator name to rendered C text.
type Subst = HashMap<String, String>;

/// Emits a complete C function for the AST, using `func` for the function
/// name, parameter list, and statement bodies.
pub fn ast_to_c(ast: &AstStmt, func: &PrimFunc) -> Result<String, CodegenError> {
    CodeGenerator::new(func).generate(ast)
}

/// Pretty-printer state: the target function and the current indent level.
pub struct CodeGenerator<'a> {
    func: &'a PrimFunc,
    indent: usize,
    lines: Vec<String>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(func: &'a PrimFunc) -> Self {
        CodeGenerator {
            func,
            indent: 0,
            lines: Vec::new(),
        }
    }

    pub fn generate(mut self, ast: &AstStmt) -> Result<String, CodegenError> {
        let params = if self.func.params.is_empty() {
            "void".to_string()
        } else {
            self.func
                .params
                .iter()
                .map(param_decl)
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.lines
            .push(format!("void {}({}) {{", self.func.name, params));
        self.indent = 1;
        self.emit_stmt(ast)?;
        self.lines.push("}".to_string());
        Ok(self.lines.join("\n"))
    }

    fn pad(&self) -> String {
        "    ".repeat(self.indent)
    }

    fn emit_stmt(&mut self, stmt: &AstStmt) -> Result<(), CodegenError> {
        match stmt {
            AstStmt::For(for_loop) => {
                let step = if for_loop.inc == 1 {
                    format!("{}++", for_loop.iterator)
                } else {
                    format!("{} += {}", for_loop.iterator, for_loop.inc)
                };
                self.lines.push(format!(
                    "{}for (int {} = {}; {}; {}) {{",
                    self.pad(),
                    for_loop.iterator,
                    render_ast_expr(&for_loop.init)?,
                    render_cond(&for_loop.cond)?,
                    step
                ));
                self.indent += 1;
                self.emit_stmt(&for_loop.body)?;
                self.indent -= 1;
                self.lines.push(format!("{}}}", self.pad()));
            }
            AstStmt::If(guard) => {
                self.lines
                    .push(format!("{}if ({}) {{", self.pad(), render_cond(&guard.cond)?));
                self.indent += 1;
                self.emit_stmt(&guard.then)?;
                self.indent -= 1;
                self.lines.push(format!("{}}}", self.pad()));
            }
            AstStmt::Block(stmts) => {
                for stmt in stmts {
                    self.emit_stmt(stmt)?;
                }
            }
            AstStmt::User(call) => self.emit_user(call)?,
        }
        Ok(())
    }

    fn emit_user(&mut self, call: &AstCall) -> Result<(), CodegenError> {
        let Some(AstExpr::Id(name)) = call.args.first() else {
            return Err(CodegenError::UnsupportedAst {
                detail: "user call without a statement-name id".to_string(),
            });
        };
        let compute = self
            .func
            .compute(name)
            .ok_or_else(|| CodegenError::UnknownStatement { name: name.clone() })?;

        let k = compute.domain.iterators.len();
        let loop_args = &call.args[1..];
        if loop_args.len() < k {
            return Err(CodegenError::UnsupportedAst {
                detail: format!(
                    "user call for '{name}' supplies {} loop arguments, expected at least {k}",
                    loop_args.len()
                ),
            });
        }

        // The last k arguments pair positionally with the iterators.
        let mut subst = Subst::new();
        for (axis, arg) in compute
            .domain
            .iterators
            .iter()
            .zip(&loop_args[loop_args.len() - k..])
        {
            subst.insert(axis.name.clone(), render_ast_expr(arg)?);
        }

        self.emit_compute_stmt(compute, &compute.body, &subst)
    }

    fn emit_compute_stmt(
        &mut self,
        compute: &Compute,
        stmt: &Stmt,
        subst: &Subst,
    ) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.emit_compute_stmt(compute, stmt, subst)?;
                }
                Ok(())
            }
            Stmt::Store(store) => {
                let target = render_access(&store.access, subst)?;
                let value = render_value(&store.value, subst)?;
                let assign = format!("{target} = {value};");
                match &store.guard {
                    Some(guard) => {
                        let cond = render_pred(guard, subst)?;
                        self.lines
                            .push(format!("{}if ({cond}) {assign}", self.pad()));
                    }
                    None => self.lines.push(format!("{}{assign}", self.pad())),
                }
                Ok(())
            }
            Stmt::Reduce(reduce) => {
                let target = render_access(&reduce.access, subst)?;
                let value = render_value(&reduce.value, subst)?;
                if let Some(init) = &reduce.init {
                    let cond = reduce_init_cond(compute, &reduce.access, subst)?;
                    let init_value = render_value(init, subst)?;
                    self.lines.push(format!(
                        "{}if ({cond}) {target} = {init_value};",
                        self.pad()
                    ));
                }
                let update = match reduce.op {
                    ReduceOp::Sum => format!("{target} += {value};"),
                    ReduceOp::Prod => format!("{target} *= {value};"),
                    ReduceOp::Max => {
                        format!("{target} = ({target} > {value}) ? {target} : {value};")
                    }
                    ReduceOp::Min => {
                        format!("{target} = ({target} < {value}) ? {target} : {value};")
                    }
                };
                self.lines.push(format!("{}{update}", self.pad()));
                Ok(())
            }
        }
    }
}

fn param_decl(tensor: &Tensor) -> String {
    match tensor.dtype {
        ElemType::Int => format!("int *{}", tensor.name),
        ElemType::Float => format!("float *{}", tensor.name),
    }
}

// ---------------------------------------------------------------------------
// Loop AST expressions (bounds, conditions, user-call arguments)
// ---------------------------------------------------------------------------

fn ast_op_symbol(op: AstOp) -> &'static str {
    match op {
        AstOp::Le => "<=",
        AstOp::Lt => "<",
        AstOp::Ge => ">=",
        AstOp::Gt => ">",
        AstOp::Eq => "==",
        AstOp::Add => "+",
        AstOp::Sub => "-",
        AstOp::Mul => "*",
        AstOp::Div | AstOp::FdivQ | AstOp::PdivQ => "/",
        AstOp::PdivR | AstOp::ZdivR => "%",
        AstOp::And => "&&",
        AstOp::Or => "||",
        AstOp::Min | AstOp::Max => "",
    }
}

/// Renders an AST expression; compound expressions come out parenthesized.
fn render_ast_expr(expr: &AstExpr) -> Result<String, CodegenError> {
    match expr {
        AstExpr::Id(name) => Ok(name.clone()),
        AstExpr::Val(v) => Ok(v.to_string()),
        AstExpr::Unary { operand, .. } => Ok(format!("(-{})", render_ast_expr(operand)?)),
        AstExpr::Bin(bin) => render_bin(bin, true),
        AstExpr::Call(_) => Err(CodegenError::UnsupportedAst {
            detail: "call expression outside a user statement".to_string(),
        }),
    }
}

/// Renders a condition without outer parentheses (the `for`/`if` header
/// supplies its own).
fn render_cond(cond: &AstBinOp) -> Result<String, CodegenError> {
    render_bin(cond, false)
}

fn render_bin(bin: &AstBinOp, wrap: bool) -> Result<String, CodegenError> {
    let lhs = render_ast_expr(&bin.lhs)?;
    let rhs = render_ast_expr(&bin.rhs)?;
    match bin.op {
        // C has no min/max operators; conditional expressions stand in.
        AstOp::Min => Ok(format!("({lhs} < {rhs} ? {lhs} : {rhs})")),
        AstOp::Max => Ok(format!("({lhs} > {rhs} ? {lhs} : {rhs})")),
        op => {
            let text = format!("{lhs} {} {rhs}", ast_op_symbol(op));
            Ok(if wrap { format!("({text})") } else { text })
        }
    }
}

// ---------------------------------------------------------------------------
// IR expressions (statement bodies, subscripts, predicates)
// ---------------------------------------------------------------------------

fn prec(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod => 2,
        // Rendered as conditional expressions, always self-contained.
        BinOp::Max | BinOp::Min => 3,
    }
}

fn c_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div | BinOp::FloorDiv => "/",
        BinOp::Mod => "%",
        BinOp::Max | BinOp::Min => "",
    }
}

fn needs_left_parens(parent: BinOp, child: Option<BinOp>) -> bool {
    child.map_or(false, |c| prec(c) < prec(parent))
}

fn needs_right_parens(parent: BinOp, child: Option<BinOp>) -> bool {
    let Some(child) = child else { return false };
    if prec(child) < prec(parent) {
        return true;
    }
    if prec(child) == prec(parent) && matches!(parent, BinOp::Sub | BinOp::Div | BinOp::FloorDiv | BinOp::Mod)
    {
        return true;
    }
    parent == BinOp::Mul && matches!(child, BinOp::Div | BinOp::FloorDiv | BinOp::Mod)
}

/// Renders an IR expression as C, substituting loop variables for iterator
/// references.
fn render_value(expr: &Expr, subst: &Subst) -> Result<String, CodegenError> {
    Ok(render_value_node(expr, subst)?.0)
}

/// Returns the rendered text plus the top-level arithmetic operator, used
/// by the caller for precedence-aware parenthesization.
fn render_value_node(
    expr: &Expr,
    subst: &Subst,
) -> Result<(String, Option<BinOp>), CodegenError> {
    match expr {
        Expr::Int(v) => Ok((v.to_string(), None)),
        Expr::Float(v) => Ok((format!("{v:?}"), None)),
        Expr::Var(name) => {
            let text = subst.get(name).cloned().unwrap_or_else(|| name.clone());
            Ok((parenthesize_if_spaced(text), None))
        }
        Expr::Binary { op, lhs, rhs } => match op {
            BinOp::Max | BinOp::Min => {
                let lhs = render_value(lhs, subst)?;
                let rhs = render_value(rhs, subst)?;
                let cmp = if *op == BinOp::Max { ">" } else { "<" };
                Ok((format!("(({lhs} {cmp} {rhs}) ? {lhs} : {rhs})"), None))
            }
            _ => {
                let (lhs_text, lhs_op) = render_value_node(lhs, subst)?;
                let (rhs_text, rhs_op) = render_value_node(rhs, subst)?;
                let lhs_text = if needs_left_parens(*op, lhs_op) {
                    format!("({lhs_text})")
                } else {
                    lhs_text
                };
                let rhs_text = if needs_right_parens(*op, rhs_op) {
                    format!("({rhs_text})")
                } else {
                    rhs_text
                };
                Ok((
                    format!("{lhs_text} {} {rhs_text}", c_symbol(*op)),
                    Some(*op),
                ))
            }
        },
        Expr::Unary { op, operand } => {
            let (text, inner_op) = render_value_node(operand, subst)?;
            let text = if inner_op.is_some() {
                format!("({text})")
            } else {
                text
            };
            let symbol = match op {
                UnOp::Neg => "-",
                UnOp::Not => "!",
            };
            Ok((format!("{symbol}{text}"), None))
        }
        Expr::Call { name, args } => {
            let args = args
                .iter()
                .map(|arg| render_value(arg, subst))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((format!("{}({})", name, args.join(", ")), None))
        }
        Expr::Load(access) => Ok((render_access(access, subst)?, None)),
    }
}

/// Renders a predicate without outer parentheses.
fn render_pred(constraint: &Constraint, subst: &Subst) -> Result<String, CodegenError> {
    match constraint {
        Constraint::Compare { op, lhs, rhs } => Ok(format!(
            "{} {} {}",
            render_value(lhs, subst)?,
            cmp_symbol(*op),
            render_value(rhs, subst)?
        )),
        Constraint::Logical { op, lhs, rhs } => Ok(format!(
            "{} {} {}",
            render_pred_nested(lhs, subst)?,
            logic_symbol(*op),
            render_pred_nested(rhs, subst)?
        )),
    }
}

fn render_pred_nested(constraint: &Constraint, subst: &Subst) -> Result<String, CodegenError> {
    match constraint {
        Constraint::Compare { .. } => render_pred(constraint, subst),
        Constraint::Logical { .. } => Ok(format!("({})", render_pred(constraint, subst)?)),
    }
}

fn cmp_symbol(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Lt => "<",
        CmpOp::Le => "<=",
        CmpOp::Gt => ">",
        CmpOp::Ge => ">=",
        CmpOp::Eq => "==",
        CmpOp::Ne => "!=",
    }
}

fn logic_symbol(op: LogicOp) -> &'static str {
    match op {
        LogicOp::And => "&&",
        LogicOp::Or => "||",
    }
}

// ---------------------------------------------------------------------------
// Tensor-access linearization
// ---------------------------------------------------------------------------

fn render_access(access: &Access, subst: &Subst) -> Result<String, CodegenError> {
    let indices = access
        .index
        .iter()
        .map(|idx| render_value(idx, subst))
        .collect::<Result<Vec<_>, _>>()?;
    linearize(&access.tensor, &indices)
}

fn extent_text(tensor: &Tensor, extent: &Expr) -> Result<String, CodegenError> {
    match extent {
        Expr::Int(v) => Ok(v.to_string()),
        Expr::Var(name) => Ok(name.clone()),
        _ => Err(CodegenError::Core(polyc_core::CoreError::NonLiteralExtent {
            tensor: tensor.name.clone(),
        })),
    }
}

/// Row-major linearization: `((i0*d1 + i1)*d2 + i2)...`, with any
/// space-containing subexpression parenthesized.
fn linearize(tensor: &Tensor, indices: &[String]) -> Result<String, CodegenError> {
    match indices.len() {
        0 => Ok(tensor.name.clone()),
        1 => Ok(format!("{}[{}]", tensor.name, indices[0])),
        _ => {
            let mut acc = indices[0].clone();
            for (dim, index) in indices.iter().enumerate().skip(1) {
                let extent = extent_text(tensor, &tensor.shape[dim])?;
                acc = format!(
                    "{}*{} + {}",
                    parenthesize_if_spaced(acc),
                    parenthesize_if_spaced(extent),
                    parenthesize_if_spaced(index.clone())
                );
            }
            Ok(format!("{}[({})]", tensor.name, acc))
        }
    }
}

fn parenthesize_if_spaced(text: String) -> String {
    if text.contains(' ') && !is_fully_parenthesized(&text) {
        format!("({text})")
    } else {
        text
    }
}

fn is_fully_parenthesized(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'(') || bytes.last() != Some(&b')') {
        return false;
    }
    let mut depth = 0usize;
    for (pos, byte) in bytes.iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return pos == bytes.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Reduction initializer guard
// ---------------------------------------------------------------------------

/// The conjunction `iter == lower_bound` over the compute's reduce
/// iterators. Falls back to iterators absent from the target index; a
/// reduction with neither is rejected.
fn reduce_init_cond(
    compute: &Compute,
    access: &Access,
    subst: &Subst,
) -> Result<String, CodegenError> {
    let mut axes: Vec<&Axis> = compute
        .domain
        .iterators
        .iter()
        .filter(|axis| axis.kind == AxisKind::Reduce)
        .collect();

    if axes.is_empty() {
        let mut target_names = Vec::new();
        for index in &access.index {
            index.referenced_names(&mut target_names);
        }
        axes = compute
            .domain
            .iterators
            .iter()
            .filter(|axis| !target_names.contains(&axis.name))
            .collect();
    }

    if axes.is_empty() {
        return Err(CodegenError::DegenerateReduction {
            compute: compute.name.clone(),
        });
    }

    let parts = axes
        .iter()
        .map(|axis| {
            let var = subst
                .get(&axis.name)
                .cloned()
                .unwrap_or_else(|| axis.name.clone());
            let bound = render_value(&lower_bound(&compute.domain, &axis.name), subst)?;
            Ok(format!("{var} == {bound}"))
        })
        .collect::<Result<Vec<_>, CodegenError>>()?;
    Ok(parts.join(" && "))
}

fn is_var(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::Var(var) if var == name)
}

fn plus_one(expr: &Expr) -> Expr {
    match expr {
        Expr::Int(v) => Expr::int(v + 1),
        other => Expr::add(other.clone(), Expr::int(1)),
    }
}

/// The lower bound of an iterator, read off the first matching domain
/// constraint; defaults to 0 when no bound is written down.
fn lower_bound(domain: &Domain, axis: &str) -> Expr {
    for constraint in &domain.constraints {
        if let Constraint::Compare { op, lhs, rhs } = constraint {
            match op {
                CmpOp::Le if is_var(rhs, axis) => return lhs.clone(),
                CmpOp::Lt if is_var(rhs, axis) => return plus_one(lhs),
                CmpOp::Ge if is_var(lhs, axis) => return rhs.clone(),
                CmpOp::Gt if is_var(lhs, axis) => return plus_one(rhs),
                _ => {}
            }
        }
    }
    Expr::int(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyc_core::{ReduceStore, Schedule, Store};

    fn subst_of(pairs: &[(&str, &str)]) -> Subst {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn linearize_rank_zero_and_one() {
        let scalar = Tensor::new("acc", []);
        assert_eq!(linearize(&scalar, &[]).unwrap(), "acc");

        let vec = Tensor::new("A", [Expr::int(10)]);
        assert_eq!(linearize(&vec, &["c0".to_string()]).unwrap(), "A[c0]");
    }

    #[test]
    fn linearize_matches_left_folded_polynomial() {
        let m = Tensor::new("C", [Expr::int(2), Expr::int(3)]);
        assert_eq!(
            linearize(&m, &["c0".to_string(), "c1".to_string()]).unwrap(),
            "C[(c0*3 + c1)]"
        );

        let t = Tensor::new("T", [Expr::int(2), Expr::int(3), Expr::int(4)]);
        assert_eq!(
            linearize(&t, &["c0".to_string(), "c1".to_string(), "c2".to_string()]).unwrap(),
            "T[((c0*3 + c1)*4 + c2)]"
        );
    }

    #[test]
    fn linearize_uses_symbolic_extents_verbatim() {
        let m = Tensor::new("A", [Expr::var("N"), Expr::var("M")]);
        assert_eq!(
            linearize(&m, &["c0".to_string(), "c1".to_string()]).unwrap(),
            "A[(c0*M + c1)]"
        );
    }

    #[test]
    fn linearize_parenthesizes_spaced_indices() {
        let m = Tensor::new("A", [Expr::int(4), Expr::int(4)]);
        assert_eq!(
            linearize(&m, &["c0 + 1".to_string(), "c1".to_string()]).unwrap(),
            "A[((c0 + 1)*4 + c1)]"
        );
    }

    #[test]
    fn value_precedence_right_subtraction() {
        let subst = Subst::new();
        // a - (b - c)
        let expr = Expr::sub(
            Expr::var("a"),
            Expr::sub(Expr::var("b"), Expr::var("c")),
        );
        assert_eq!(render_value(&expr, &subst).unwrap(), "a - (b - c)");

        // a - b - c stays flat
        let expr = Expr::sub(
            Expr::sub(Expr::var("a"), Expr::var("b")),
            Expr::var("c"),
        );
        assert_eq!(render_value(&expr, &subst).unwrap(), "a - b - c");
    }

    #[test]
    fn value_precedence_mul_over_add() {
        let subst = Subst::new();
        // (a + b) * c
        let expr = Expr::mul(
            Expr::add(Expr::var("a"), Expr::var("b")),
            Expr::var("c"),
        );
        assert_eq!(render_value(&expr, &subst).unwrap(), "(a + b) * c");

        // a + b * c stays flat
        let expr = Expr::add(
            Expr::var("a"),
            Expr::mul(Expr::var("b"), Expr::var("c")),
        );
        assert_eq!(render_value(&expr, &subst).unwrap(), "a + b * c");
    }

    #[test]
    fn substitution_applies_to_iterators_only() {
        let subst = subst_of(&[("i", "c0")]);
        let expr = Expr::add(Expr::var("i"), Expr::var("N"));
        assert_eq!(render_value(&expr, &subst).unwrap(), "c0 + N");
    }

    #[test]
    fn spaced_substitution_is_parenthesized() {
        let subst = subst_of(&[("i", "c0 + c3")]);
        let expr = Expr::sub(Expr::var("i"), Expr::int(1));
        assert_eq!(render_value(&expr, &subst).unwrap(), "(c0 + c3) - 1");
    }

    #[test]
    fn guard_predicate_renders_with_c_connectives() {
        let subst = subst_of(&[("i", "c0")]);
        let pred = Constraint::and(
            Constraint::lt(Expr::var("i"), Expr::int(4)),
            Constraint::ge(Expr::var("i"), Expr::int(1)),
        );
        assert_eq!(render_pred(&pred, &subst).unwrap(), "c0 < 4 && c0 >= 1");
    }

    fn gemm_compute() -> (Compute, Tensor, Tensor, Tensor) {
        let a = Tensor::new("A", [Expr::int(2), Expr::int(4)]);
        let b = Tensor::new("B", [Expr::int(4), Expr::int(3)]);
        let c = Tensor::new("C", [Expr::int(2), Expr::int(3)]);
        let compute = Compute::new(
            "S",
            Domain::new(
                Vec::new(),
                vec![Axis::new("i"), Axis::new("j"), Axis::reduce("k")],
                vec![
                    Constraint::le(Expr::int(0), Expr::var("i")),
                    Constraint::lt(Expr::var("i"), Expr::int(2)),
                    Constraint::le(Expr::int(0), Expr::var("j")),
                    Constraint::lt(Expr::var("j"), Expr::int(3)),
                    Constraint::le(Expr::int(0), Expr::var("k")),
                    Constraint::lt(Expr::var("k"), Expr::int(4)),
                ],
            ),
            Stmt::Reduce(ReduceStore::new(
                ReduceOp::Sum,
                Access::new(c.clone(), [Expr::var("i"), Expr::var("j")]),
                Expr::mul(
                    Expr::load(Access::new(a.clone(), [Expr::var("i"), Expr::var("k")])),
                    Expr::load(Access::new(b.clone(), [Expr::var("k"), Expr::var("j")])),
                ),
                Some(Expr::int(0)),
            )),
        );
        (compute, a, b, c)
    }

    #[test]
    fn reduce_init_guard_uses_reduce_iterator_lower_bound() {
        let (compute, ..) = gemm_compute();
        let subst = subst_of(&[("i", "c0"), ("j", "c1"), ("k", "c2")]);
        let Stmt::Reduce(reduce) = &compute.body else {
            unreachable!()
        };
        let cond = reduce_init_cond(&compute, &reduce.access, &subst).unwrap();
        assert_eq!(cond, "c2 == 0");
    }

    #[test]
    fn reduce_without_reduce_axes_falls_back_to_non_target_iterators() {
        let (mut compute, ..) = gemm_compute();
        for axis in &mut compute.domain.iterators {
            axis.kind = AxisKind::Spatial;
        }
        let subst = subst_of(&[("i", "c0"), ("j", "c1"), ("k", "c2")]);
        let Stmt::Reduce(reduce) = &compute.body else {
            unreachable!()
        };
        let cond = reduce_init_cond(&compute, &reduce.access, &subst).unwrap();
        assert_eq!(cond, "c2 == 0");
    }

    #[test]
    fn degenerate_reduction_is_rejected() {
        let c = Tensor::new("C", [Expr::int(4)]);
        let compute = Compute::new(
            "S",
            Domain::new(
                Vec::new(),
                vec![Axis::new("i")],
                vec![
                    Constraint::le(Expr::int(0), Expr::var("i")),
                    Constraint::lt(Expr::var("i"), Expr::int(4)),
                ],
            ),
            Stmt::Reduce(ReduceStore::new(
                ReduceOp::Sum,
                Access::new(c.clone(), [Expr::var("i")]),
                Expr::int(1),
                Some(Expr::int(0)),
            )),
        );
        let subst = subst_of(&[("i", "c0")]);
        let Stmt::Reduce(reduce) = &compute.body else {
            unreachable!()
        };
        let err = reduce_init_cond(&compute, &reduce.access, &subst).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::DegenerateReduction { compute } if compute == "S"
        ));
    }

    #[test]
    fn emits_guarded_store_on_one_line() {
        let a = Tensor::new("A", [Expr::int(8)]);
        let c = Tensor::new("C", [Expr::int(8)]);
        let func = PrimFunc::new(
            "boundary",
            [a.clone(), c.clone()],
            [Compute::new(
                "S",
                Domain::new(
                    Vec::new(),
                    vec![Axis::new("i")],
                    vec![
                        Constraint::le(Expr::int(0), Expr::var("i")),
                        Constraint::lt(Expr::var("i"), Expr::int(8)),
                    ],
                ),
                Stmt::Store(Store::guarded(
                    Access::new(c, [Expr::var("i")]),
                    Expr::load(Access::new(a, [Expr::var("i")])),
                    Constraint::lt(Expr::var("i"), Expr::int(4)),
                )),
            )],
            Schedule::new(["i"]),
        );

        let ast = AstStmt::User(AstCall {
            args: vec![AstExpr::id("S"), AstExpr::id("c0")],
        });
        let code = ast_to_c(&ast, &func).unwrap();
        assert_eq!(
            code,
            "void boundary(int *A, int *C) {\n    if (c0 < 4) C[c0] = A[c0];\n}"
        );
    }

    #[test]
    fn empty_parameter_list_renders_void() {
        let func = PrimFunc::new("noop", [], [], Schedule::default());
        let code = ast_to_c(&AstStmt::Block(Vec::new()), &func).unwrap();
        assert_eq!(code, "void noop(void) {\n}");
    }

    #[test]
    fn float_tensors_render_float_pointers_and_literals() {
        let x = Tensor::float("X", [Expr::int(4)]);
        let func = PrimFunc::new(
            "scale",
            [x.clone()],
            [Compute::new(
                "S",
                Domain::new(
                    Vec::new(),
                    vec![Axis::new("i")],
                    vec![
                        Constraint::le(Expr::int(0), Expr::var("i")),
                        Constraint::lt(Expr::var("i"), Expr::int(4)),
                    ],
                ),
                Stmt::Store(Store::new(
                    Access::new(x.clone(), [Expr::var("i")]),
                    Expr::mul(
                        Expr::load(Access::new(x, [Expr::var("i")])),
                        Expr::Float(0.5),
                    ),
                )),
            )],
            Schedule::new(["i"]),
        );
        let ast = AstStmt::User(AstCall {
            args: vec![AstExpr::id("S"), AstExpr::id("c0")],
        });
        let code = ast_to_c(&ast, &func).unwrap();
        assert_eq!(
            code,
            "void scale(float *X) {\n    X[c0] = X[c0] * 0.5;\n}"
        );
    }
}
