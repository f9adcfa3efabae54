//! Shared IR builders for the analysis test suites.

use polyc_core::{
    Access, Axis, Compute, Constraint, Domain, Expr, PrimFunc, Schedule, Stmt, Store, Tensor,
};

/// `C[idx] = A[idx] + B[idx]` over the given iterators and constraints,
/// named `S`, with shapes derived from the parameters (or 4 per dimension
/// when there are none).
pub fn simple_func(
    iterators: Vec<Axis>,
    params: Vec<String>,
    constraints: Vec<Constraint>,
) -> PrimFunc {
    let shape: Vec<Expr> = if params.is_empty() {
        iterators.iter().map(|_| Expr::int(4)).collect()
    } else {
        params.iter().map(Expr::var).collect()
    };

    let a = Tensor::new("A", shape.clone());
    let b = Tensor::new("B", shape.clone());
    let c = Tensor::new("C", shape);

    let index: Vec<Expr> = iterators.iter().map(|it| Expr::var(&it.name)).collect();
    let loop_order: Vec<String> = iterators.iter().map(|it| it.name.clone()).collect();

    PrimFunc::new(
        "kernel",
        [a.clone(), b.clone(), c.clone()],
        [Compute::new(
            "S",
            Domain::new(params, iterators, constraints),
            Stmt::Store(Store::new(
                Access::new(c, index.clone()),
                Expr::add(
                    Expr::load(Access::new(a, index.clone())),
                    Expr::load(Access::new(b, index)),
                ),
            )),
        )],
        Schedule::new(loop_order),
    )
}

fn range_constraints(name: &str, lower: i64, upper: Expr) -> Vec<Constraint> {
    vec![
        Constraint::le(Expr::int(lower), Expr::var(name)),
        Constraint::lt(Expr::var(name), upper),
    ]
}

/// Two chained computes: `B[i] = A[i] + 1`, `C[j] = B[j] * 2`, both over
/// `0 <= _ < N`.
pub fn chained_computes_func() -> PrimFunc {
    let a = Tensor::new("A", [Expr::var("N")]);
    let b = Tensor::new("B", [Expr::var("N")]);
    let c = Tensor::new("C", [Expr::var("N")]);

    PrimFunc::new(
        "kernel",
        [a.clone(), b.clone(), c.clone()],
        [
            Compute::new(
                "S1",
                Domain::new(
                    vec!["N".to_string()],
                    vec![Axis::new("i")],
                    range_constraints("i", 0, Expr::var("N")),
                ),
                Stmt::Store(Store::new(
                    Access::new(b.clone(), [Expr::var("i")]),
                    Expr::add(
                        Expr::load(Access::new(a, [Expr::var("i")])),
                        Expr::int(1),
                    ),
                )),
            ),
            Compute::new(
                "S2",
                Domain::new(
                    vec!["N".to_string()],
                    vec![Axis::new("j")],
                    range_constraints("j", 0, Expr::var("N")),
                ),
                Stmt::Store(Store::new(
                    Access::new(c, [Expr::var("j")]),
                    Expr::mul(
                        Expr::load(Access::new(b, [Expr::var("j")])),
                        Expr::int(2),
                    ),
                )),
            ),
        ],
        Schedule::new(["i", "j"]),
    )
}

/// `C[i] = C[i - 1] + A[i]` over `1 <= i < N` -- a loop-carried RAW
/// dependence.
pub fn recurrence_func() -> PrimFunc {
    let c = Tensor::new("C", [Expr::var("N")]);
    let a = Tensor::new("A", [Expr::var("N")]);

    PrimFunc::new(
        "kernel",
        [a.clone(), c.clone()],
        [Compute::new(
            "S",
            Domain::new(
                vec!["N".to_string()],
                vec![Axis::new("i")],
                range_constraints("i", 1, Expr::var("N")),
            ),
            Stmt::Store(Store::new(
                Access::new(c.clone(), [Expr::var("i")]),
                Expr::add(
                    Expr::load(Access::new(
                        c,
                        [Expr::sub(Expr::var("i"), Expr::int(1))],
                    )),
                    Expr::load(Access::new(a, [Expr::var("i")])),
                ),
            )),
        )],
        Schedule::new(["i"]),
    )
}
