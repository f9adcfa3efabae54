//! Tensor parameters of a compiled function.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::expr::Expr;

/// Element type of a tensor. Integer is the default; float tensors may
/// appear in statement bodies but float values never reach the polyhedral
/// constraint text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ElemType {
    #[default]
    Int,
    Float,
}

/// A named tensor with an ordered shape of extent expressions.
///
/// Extents must be integer literals or symbolic parameter references
/// ([`Expr::Int`] or [`Expr::Var`]); anything else is rejected by
/// [`PrimFunc::validate`](crate::function::PrimFunc::validate). Rank 0
/// (scalar) tensors are permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    pub name: String,
    pub shape: SmallVec<[Expr; 4]>,
    pub dtype: ElemType,
}

impl Tensor {
    /// An integer tensor with the given shape.
    pub fn new(name: impl Into<String>, shape: impl IntoIterator<Item = Expr>) -> Self {
        Tensor {
            name: name.into(),
            shape: shape.into_iter().collect(),
            dtype: ElemType::Int,
        }
    }

    /// A float tensor with the given shape.
    pub fn float(name: impl Into<String>, shape: impl IntoIterator<Item = Expr>) -> Self {
        Tensor {
            dtype: ElemType::Float,
            ..Tensor::new(name, shape)
        }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dtype_is_int() {
        let t = Tensor::new("A", [Expr::int(4), Expr::var("N")]);
        assert_eq!(t.dtype, ElemType::Int);
        assert_eq!(t.rank(), 2);
    }

    #[test]
    fn rank_zero_tensor() {
        let t = Tensor::new("acc", []);
        assert_eq!(t.rank(), 0);
    }

    #[test]
    fn serde_roundtrip() {
        let t = Tensor::float("B", [Expr::var("M")]);
        let json = serde_json::to_string(&t).unwrap();
        let back: Tensor = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
