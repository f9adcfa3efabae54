//! Iteration axes and affine iteration domains.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::expr::Constraint;

/// Kind of a loop axis. `Reduce` drives reduction-initializer emission in
/// the C backend; it does not influence schedule construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisKind {
    #[default]
    Spatial,
    Reduce,
}

/// A named loop axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub kind: AxisKind,
}

impl Axis {
    pub fn new(name: impl Into<String>) -> Self {
        Axis {
            name: name.into(),
            kind: AxisKind::Spatial,
        }
    }

    pub fn reduce(name: impl Into<String>) -> Self {
        Axis {
            name: name.into(),
            kind: AxisKind::Reduce,
        }
    }
}

/// An affine iteration domain.
///
/// The iterator order defines the dimension order of the resulting integer
/// set. Constraints are interpreted as a conjunction; [`Constraint::Logical`]
/// nodes may introduce disjunctions.
///
/// Invariant: every name referenced by a constraint is either an iterator of
/// this domain or a listed symbolic parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Symbolic parameters, ordered and unique (e.g. `N`, `M`).
    pub params: Vec<String>,
    /// Loop axes, ordered.
    pub iterators: Vec<Axis>,
    /// Conjunction of constraints over iterators and parameters.
    pub constraints: Vec<Constraint>,
}

impl Domain {
    pub fn new(
        params: impl IntoIterator<Item = String>,
        iterators: impl IntoIterator<Item = Axis>,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        Domain {
            params: params.into_iter().collect(),
            iterators: iterators.into_iter().collect(),
            constraints: constraints.into_iter().collect(),
        }
    }

    pub fn iterator_names(&self) -> Vec<&str> {
        self.iterators.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn has_iterator(&self, name: &str) -> bool {
        self.iterators.iter().any(|a| a.name == name)
    }

    /// Checks the domain's name invariants. `owner` names the enclosing
    /// compute for error messages.
    pub fn validate(&self, owner: &str) -> Result<(), CoreError> {
        let mut seen = indexmap::IndexSet::new();
        for param in &self.params {
            if !seen.insert(param.as_str()) {
                return Err(CoreError::DuplicateName {
                    name: param.clone(),
                    context: format!("parameters of compute '{owner}'"),
                });
            }
        }
        for axis in &self.iterators {
            if !seen.insert(axis.name.as_str()) {
                return Err(CoreError::DuplicateName {
                    name: axis.name.clone(),
                    context: format!("iterators of compute '{owner}'"),
                });
            }
        }
        let mut referenced = Vec::new();
        for constraint in &self.constraints {
            constraint.referenced_names(&mut referenced);
        }
        for name in referenced {
            if !seen.contains(name.as_str()) {
                return Err(CoreError::UnknownName {
                    name,
                    context: format!("constraints of compute '{owner}'"),
                });
            }
        }
        Ok(())
    }
}
