//! Read/write access relation extraction.
//!
//! Walks each compute body with an explicit predicate stack (Block nesting
//! and per-store guards) and emits one relation per affine access. Accesses
//! whose subscripts or predicates fall outside the affine fragment are
//! dropped from the relations: the domain and schedule stay well-formed, but
//! consumers must treat the relations as a possible under-approximation.

use polyc_core::{Access, Compute, Constraint, Expr, PrimFunc, Stmt};
use polyc_isl::{Context, UnionMap};
use tracing::debug;

use crate::affine::{compute_header, constraint_to_affine, expr_to_affine};
use crate::builder::{collect_params, param_space};
use crate::error::{AffineError, AnalysisError};

/// The read and write access relations of a function.
pub struct Accesses<'ctx> {
    pub reads: UnionMap<'ctx>,
    pub writes: UnionMap<'ctx>,
}

/// Extracts both access relations.
pub fn build_accesses<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
) -> Result<Accesses<'ctx>, AnalysisError> {
    let space = param_space(ctx, &collect_params(func))?;
    let mut extractor = Extractor {
        ctx,
        reads: UnionMap::empty(ctx)?,
        writes: UnionMap::empty(ctx)?,
    };
    for compute in &func.computes {
        let header = compute_header(compute).map_err(|err| {
            AnalysisError::unsupported(format!("domain of compute '{}'", compute.name), err)
        })?;
        let mut predicates = Vec::new();
        extractor.visit(compute, &header, &compute.body, &mut predicates)?;
    }
    Ok(Accesses {
        reads: extractor.reads.align_params(&space)?,
        writes: extractor.writes.align_params(&space)?,
    })
}

/// Extracts only the read access relation.
pub fn build_read_access<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
) -> Result<UnionMap<'ctx>, AnalysisError> {
    Ok(build_accesses(ctx, func)?.reads)
}

/// Extracts only the write access relation.
pub fn build_write_access<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
) -> Result<UnionMap<'ctx>, AnalysisError> {
    Ok(build_accesses(ctx, func)?.writes)
}

enum AccessKind {
    Read,
    Write,
}

struct Extractor<'ctx> {
    ctx: &'ctx Context,
    reads: UnionMap<'ctx>,
    writes: UnionMap<'ctx>,
}

impl<'ctx> Extractor<'ctx> {
    fn visit(
        &mut self,
        compute: &Compute,
        header: &(String, String, String),
        stmt: &Stmt,
        predicates: &mut Vec<Constraint>,
    ) -> Result<(), AnalysisError> {
        match stmt {
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.visit(compute, header, stmt, predicates)?;
                }
            }
            Stmt::Store(store) => {
                let depth = predicates.len();
                if let Some(guard) = &store.guard {
                    predicates.push(guard.clone());
                }
                self.emit(compute, header, &store.access, AccessKind::Write, predicates)?;
                self.emit_value_reads(compute, header, &store.value, predicates)?;
                self.emit_index_reads(compute, header, &store.access, predicates)?;
                predicates.truncate(depth);
            }
            Stmt::Reduce(reduce) => {
                self.emit(compute, header, &reduce.access, AccessKind::Write, predicates)?;
                // Read-modify-write: the target is also read at every point.
                self.emit(compute, header, &reduce.access, AccessKind::Read, predicates)?;
                self.emit_value_reads(compute, header, &reduce.value, predicates)?;
                if let Some(init) = &reduce.init {
                    self.emit_value_reads(compute, header, init, predicates)?;
                }
                self.emit_index_reads(compute, header, &reduce.access, predicates)?;
            }
        }
        Ok(())
    }

    fn emit_value_reads(
        &mut self,
        compute: &Compute,
        header: &(String, String, String),
        value: &Expr,
        predicates: &[Constraint],
    ) -> Result<(), AnalysisError> {
        for access in value.loads() {
            self.emit(compute, header, access, AccessKind::Read, predicates)?;
        }
        Ok(())
    }

    fn emit_index_reads(
        &mut self,
        compute: &Compute,
        header: &(String, String, String),
        access: &Access,
        predicates: &[Constraint],
    ) -> Result<(), AnalysisError> {
        for index in &access.index {
            for load in index.loads() {
                self.emit(compute, header, load, AccessKind::Read, predicates)?;
            }
        }
        Ok(())
    }

    /// Serializes one access relation and unions it in. Non-affine accesses
    /// are skipped; isl parse failures are not recoverable.
    fn emit(
        &mut self,
        compute: &Compute,
        header: &(String, String, String),
        access: &Access,
        kind: AccessKind,
        predicates: &[Constraint],
    ) -> Result<(), AnalysisError> {
        let (params, tuple, constraints) = header;
        let literal = match access_literal(params, tuple, constraints, access, predicates) {
            Ok(literal) => literal,
            Err(err) => {
                debug!(
                    compute = %compute.name,
                    tensor = %access.tensor.name,
                    reason = %err,
                    "skipping non-affine access"
                );
                return Ok(());
            }
        };
        let map = UnionMap::parse(self.ctx, &literal)?;
        match kind {
            AccessKind::Read => self.reads = self.reads.union(&map)?,
            AccessKind::Write => self.writes = self.writes.union(&map)?,
        }
        Ok(())
    }
}

fn access_literal(
    params: &str,
    tuple: &str,
    constraints: &str,
    access: &Access,
    predicates: &[Constraint],
) -> Result<String, AffineError> {
    let indices = access
        .index
        .iter()
        .map(expr_to_affine)
        .collect::<Result<Vec<_>, _>>()?;
    let mut condition = constraints.to_string();
    for predicate in predicates {
        condition.push_str(" and ");
        condition.push_str(&constraint_to_affine(predicate)?);
    }
    Ok(format!(
        "{params} -> {{ {tuple} -> {}[{}] : {condition} }}",
        access.tensor.name,
        indices.join(", ")
    ))
}
