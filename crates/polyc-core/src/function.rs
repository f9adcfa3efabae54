//! Loop-order schedules and the top-level `PrimFunc`.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::expr::{Access, Expr};
use crate::stmt::{Compute, Stmt};
use crate::tensor::Tensor;

/// A global preferred loop ordering: a sequence of iterator names.
///
/// When a compute's iterators are a subset of the global order, its time
/// vector is the projection of the global order onto that set, preserving
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Schedule {
    pub loop_order: Vec<String>,
}

impl Schedule {
    pub fn new(loop_order: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Schedule {
            loop_order: loop_order.into_iter().map(Into::into).collect(),
        }
    }

    /// The loop order restricted to the given iterator names, preserving
    /// order.
    pub fn project<'a>(&'a self, iterators: &IndexSet<&str>) -> Vec<&'a str> {
        self.loop_order
            .iter()
            .map(String::as_str)
            .filter(|name| iterators.contains(name))
            .collect()
    }
}

/// A compilable function: ordered tensor parameters, ordered computes, and
/// the global loop order. The function owns its computes; computes own their
/// domains and bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimFunc {
    pub name: String,
    pub params: Vec<Tensor>,
    pub computes: Vec<Compute>,
    pub schedule: Schedule,
}

impl PrimFunc {
    pub fn new(
        name: impl Into<String>,
        params: impl IntoIterator<Item = Tensor>,
        computes: impl IntoIterator<Item = Compute>,
        schedule: Schedule,
    ) -> Self {
        PrimFunc {
            name: name.into(),
            params: params.into_iter().collect(),
            computes: computes.into_iter().collect(),
            schedule,
        }
    }

    /// Looks up a compute by its statement name.
    pub fn compute(&self, name: &str) -> Option<&Compute> {
        self.computes.iter().find(|c| c.name == name)
    }

    /// Structural validation: unique parameter and compute names, domain
    /// name invariants, loop-order coverage of every iterator, literal or
    /// symbolic shape extents, and access ranks matching tensor ranks.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.is_empty() {
            return Err(CoreError::MissingName {
                context: "function".to_string(),
            });
        }

        let mut tensor_names = IndexSet::new();
        for tensor in &self.params {
            if !tensor_names.insert(tensor.name.as_str()) {
                return Err(CoreError::DuplicateName {
                    name: tensor.name.clone(),
                    context: format!("tensor parameters of '{}'", self.name),
                });
            }
            validate_shape(tensor)?;
        }

        let mut compute_names = IndexSet::new();
        for compute in &self.computes {
            if compute.name.is_empty() {
                return Err(CoreError::MissingName {
                    context: format!("compute of function '{}'", self.name),
                });
            }
            if !compute_names.insert(compute.name.as_str()) {
                return Err(CoreError::DuplicateName {
                    name: compute.name.clone(),
                    context: format!("computes of '{}'", self.name),
                });
            }
            compute.domain.validate(&compute.name)?;
            for axis in &compute.domain.iterators {
                if !self.schedule.loop_order.contains(&axis.name) {
                    return Err(CoreError::UnknownName {
                        name: axis.name.clone(),
                        context: format!(
                            "loop order {:?} (iterator of compute '{}')",
                            self.schedule.loop_order, compute.name
                        ),
                    });
                }
            }
            validate_body(&compute.name, &compute.body)?;
        }
        Ok(())
    }
}

fn validate_shape(tensor: &Tensor) -> Result<(), CoreError> {
    for extent in &tensor.shape {
        match extent {
            Expr::Int(_) | Expr::Var(_) => {}
            _ => {
                return Err(CoreError::NonLiteralExtent {
                    tensor: tensor.name.clone(),
                })
            }
        }
    }
    Ok(())
}

fn validate_body(compute: &str, body: &Stmt) -> Result<(), CoreError> {
    match body {
        Stmt::Store(store) => {
            validate_access(compute, &store.access)?;
            validate_value_accesses(compute, &store.value)
        }
        Stmt::Reduce(reduce) => {
            validate_access(compute, &reduce.access)?;
            validate_value_accesses(compute, &reduce.value)?;
            if let Some(init) = &reduce.init {
                validate_value_accesses(compute, init)?;
            }
            Ok(())
        }
        Stmt::Block(stmts) => {
            for stmt in stmts {
                validate_body(compute, stmt)?;
            }
            Ok(())
        }
    }
}

fn validate_value_accesses(compute: &str, value: &Expr) -> Result<(), CoreError> {
    for access in value.loads() {
        validate_access(compute, access)?;
    }
    Ok(())
}

fn validate_access(compute: &str, access: &Access) -> Result<(), CoreError> {
    if access.index.len() != access.tensor.rank() {
        return Err(CoreError::RankMismatch {
            tensor: access.tensor.name.clone(),
            expected: access.tensor.rank(),
            got: access.index.len(),
            context: format!("compute '{compute}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Axis, Domain};
    use crate::expr::{Access, Constraint};
    use crate::stmt::Store;

    fn simple_func() -> PrimFunc {
        let a = Tensor::new("A", [Expr::int(10)]);
        let c = Tensor::new("C", [Expr::int(10)]);
        let domain = Domain::new(
            Vec::new(),
            vec![Axis::new("i")],
            vec![
                Constraint::le(Expr::int(0), Expr::var("i")),
                Constraint::lt(Expr::var("i"), Expr::int(10)),
            ],
        );
        let body = Stmt::Store(Store::new(
            Access::new(c.clone(), [Expr::var("i")]),
            Expr::load(Access::new(a.clone(), [Expr::var("i")])),
        ));
        PrimFunc::new(
            "copy",
            [a, c],
            [Compute::new("S", domain, body)],
            Schedule::new(["i"]),
        )
    }

    #[test]
    fn valid_function_passes() {
        assert!(simple_func().validate().is_ok());
    }

    #[test]
    fn duplicate_param_names_rejected() {
        let mut func = simple_func();
        func.params.push(Tensor::new("A", [Expr::int(10)]));
        assert!(matches!(
            func.validate().unwrap_err(),
            CoreError::DuplicateName { .. }
        ));
    }

    #[test]
    fn iterator_outside_loop_order_rejected() {
        let mut func = simple_func();
        func.schedule = Schedule::new(["j"]);
        assert!(matches!(
            func.validate().unwrap_err(),
            CoreError::UnknownName { name, .. } if name == "i"
        ));
    }

    #[test]
    fn rank_mismatch_rejected() {
        let mut func = simple_func();
        if let Stmt::Store(store) = &mut func.computes[0].body {
            store.access.index.push(Expr::var("i"));
        }
        assert!(matches!(
            func.validate().unwrap_err(),
            CoreError::RankMismatch { tensor, .. } if tensor == "C"
        ));
    }

    #[test]
    fn non_literal_extent_rejected() {
        let mut func = simple_func();
        func.params[0].shape[0] = Expr::add(Expr::var("N"), Expr::int(1));
        assert!(matches!(
            func.validate().unwrap_err(),
            CoreError::NonLiteralExtent { tensor } if tensor == "A"
        ));
    }

    #[test]
    fn schedule_projection_preserves_order() {
        let schedule = Schedule::new(["i", "j", "k"]);
        let set: IndexSet<&str> = ["k", "i"].into_iter().collect();
        assert_eq!(schedule.project(&set), vec!["i", "k"]);
    }

    #[test]
    fn serde_roundtrip_primfunc() {
        let func = simple_func();
        let json = serde_json::to_string(&func).unwrap();
        let back: PrimFunc = serde_json::from_str(&json).unwrap();
        assert_eq!(func, back);
    }
}
