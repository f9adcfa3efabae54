//! End-to-end tests for the compilation pipeline: literal IR in, literal C
//! out.
//!
//! Covers elementwise kernels, triangular and sum-constrained domains,
//! multi-function fusion (equal and differing extents), GEMM with tiling
//! and reduction initialization, the skew-then-tile stencil, and the
//! general laws (determinism, loop counts, tiling legality, size-1 tiling).

use polyc_codegen::{compile, compile_fused, CodegenError, CompileOptions, Tile};
use polyc_core::{
    Access, Axis, Compute, Constraint, Domain, Expr, PrimFunc, ReduceOp, ReduceStore, Schedule,
    Stmt, Store, Tensor,
};

// ---------------------------------------------------------------------------
// IR builders
// ---------------------------------------------------------------------------

fn range(name: &str, lo: i64, hi: i64) -> [Constraint; 2] {
    [
        Constraint::le(Expr::int(lo), Expr::var(name)),
        Constraint::lt(Expr::var(name), Expr::int(hi)),
    ]
}

/// S1: `C[i] = A[i] + B[i]` over `0 <= i < 10`.
fn add_func() -> PrimFunc {
    let a = Tensor::new("A", [Expr::int(10)]);
    let b = Tensor::new("B", [Expr::int(10)]);
    let c = Tensor::new("C", [Expr::int(10)]);
    PrimFunc::new(
        "add_func",
        [a.clone(), b.clone(), c.clone()],
        [Compute::new(
            "S",
            Domain::new(Vec::new(), vec![Axis::new("i")], range("i", 0, 10)),
            Stmt::Store(Store::new(
                Access::new(c, [Expr::var("i")]),
                Expr::add(
                    Expr::load(Access::new(a, [Expr::var("i")])),
                    Expr::load(Access::new(b, [Expr::var("i")])),
                ),
            )),
        )],
        Schedule::new(["i"]),
    )
}

/// A 4x4 elementwise add with an extra domain constraint.
fn constrained_add(name: &str, extra: Constraint) -> PrimFunc {
    let shape = [Expr::int(4), Expr::int(4)];
    let a = Tensor::new("A", shape.clone());
    let b = Tensor::new("B", shape.clone());
    let c = Tensor::new("C", shape);
    let index = [Expr::var("i"), Expr::var("j")];
    let mut constraints: Vec<Constraint> = range("i", 0, 4).into_iter().collect();
    constraints.extend(range("j", 0, 4));
    constraints.push(extra);
    PrimFunc::new(
        name,
        [a.clone(), b.clone(), c.clone()],
        [Compute::new(
            "S",
            Domain::new(
                Vec::new(),
                vec![Axis::new("i"), Axis::new("j")],
                constraints,
            ),
            Stmt::Store(Store::new(
                Access::new(c, index.clone()),
                Expr::add(
                    Expr::load(Access::new(a, index.clone())),
                    Expr::load(Access::new(b, index)),
                ),
            )),
        )],
        Schedule::new(["i", "j"]),
    )
}

/// `output[i] = input[i] + 1` (or `* 2`) over `0 <= i < extent`.
fn elementwise_step(
    name: &str,
    input: &str,
    output: &str,
    extent: i64,
    scale: bool,
) -> PrimFunc {
    let input = Tensor::new(input, [Expr::int(10)]);
    let output = Tensor::new(output, [Expr::int(10)]);
    let value = if scale {
        Expr::mul(
            Expr::load(Access::new(input.clone(), [Expr::var("i")])),
            Expr::int(2),
        )
    } else {
        Expr::add(
            Expr::load(Access::new(input.clone(), [Expr::var("i")])),
            Expr::int(1),
        )
    };
    PrimFunc::new(
        name,
        [input, output.clone()],
        [Compute::new(
            "S",
            Domain::new(Vec::new(), vec![Axis::new("i")], range("i", 0, extent)),
            Stmt::Store(Store::new(Access::new(output, [Expr::var("i")]), value)),
        )],
        Schedule::new(["i"]),
    )
}

/// GEMM: `C[i, j] (+)= A[i, k] * B[k, j]` with a reduce axis `k` and a zero
/// initializer.
fn gemm_func(m: i64, n: i64, k: i64) -> PrimFunc {
    let a = Tensor::new("A", [Expr::int(m), Expr::int(k)]);
    let b = Tensor::new("B", [Expr::int(k), Expr::int(n)]);
    let c = Tensor::new("C", [Expr::int(m), Expr::int(n)]);
    let mut constraints: Vec<Constraint> = range("i", 0, m).into_iter().collect();
    constraints.extend(range("j", 0, n));
    constraints.extend(range("k", 0, k));
    PrimFunc::new(
        "gemm",
        [a.clone(), b.clone(), c.clone()],
        [Compute::new(
            "S",
            Domain::new(
                Vec::new(),
                vec![Axis::new("i"), Axis::new("j"), Axis::reduce("k")],
                constraints,
            ),
            Stmt::Reduce(ReduceStore::new(
                ReduceOp::Sum,
                Access::new(c, [Expr::var("i"), Expr::var("j")]),
                Expr::mul(
                    Expr::load(Access::new(a, [Expr::var("i"), Expr::var("k")])),
                    Expr::load(Access::new(b, [Expr::var("k"), Expr::var("j")])),
                ),
                Some(Expr::int(0)),
            )),
        )],
        Schedule::new(["i", "j", "k"]),
    )
}

/// The shift stencil `A[i, j] = A[i - 1, j + 1]`; its dependence distance
/// is `(1, -1)`, so `j` cannot be tiled without skewing.
fn stencil_func() -> PrimFunc {
    let a = Tensor::new("A", [Expr::int(6), Expr::int(6)]);
    let mut constraints: Vec<Constraint> = range("i", 1, 6).into_iter().collect();
    constraints.extend(range("j", 0, 5));
    PrimFunc::new(
        "stencil",
        [a.clone()],
        [Compute::new(
            "S",
            Domain::new(
                Vec::new(),
                vec![Axis::new("i"), Axis::new("j")],
                constraints,
            ),
            Stmt::Store(Store::new(
                Access::new(a.clone(), [Expr::var("i"), Expr::var("j")]),
                Expr::load(Access::new(
                    a,
                    [
                        Expr::sub(Expr::var("i"), Expr::int(1)),
                        Expr::add(Expr::var("j"), Expr::int(1)),
                    ],
                )),
            )),
        )],
        Schedule::new(["i", "j"]),
    )
}

fn count_loops(code: &str) -> usize {
    code.matches("for (").count()
}

// ---------------------------------------------------------------------------
// S1-S3: single-statement kernels
// ---------------------------------------------------------------------------

#[test]
fn s1_elementwise_add() {
    let code = compile(&add_func(), &CompileOptions::default()).unwrap();
    let expected = "\
void add_func(int *A, int *B, int *C) {
    for (int c0 = 0; c0 <= 9; c0++) {
        C[c0] = A[c0] + B[c0];
    }
}";
    assert_eq!(code, expected);
}

#[test]
fn s1_snapshot() {
    let code = compile(&add_func(), &CompileOptions::default()).unwrap();
    insta::assert_snapshot!(code, @r"
void add_func(int *A, int *B, int *C) {
    for (int c0 = 0; c0 <= 9; c0++) {
        C[c0] = A[c0] + B[c0];
    }
}
");
}

#[test]
fn s2_triangular_domain() {
    let func = constrained_add(
        "tri_func",
        Constraint::le(Expr::var("j"), Expr::var("i")),
    );
    let code = compile(&func, &CompileOptions::default()).unwrap();
    assert!(code.contains("for (int c1 = 0; c1 <= c0; c1++)"), "{code}");
    assert!(code.contains("C[(c0*4 + c1)] = A[(c0*4 + c1)] + B[(c0*4 + c1)];"), "{code}");
    assert_eq!(count_loops(&code), 2);
}

#[test]
fn s3_sum_constraint() {
    let func = constrained_add(
        "sum_func",
        Constraint::lt(Expr::add(Expr::var("i"), Expr::var("j")), Expr::int(4)),
    );
    let code = compile(&func, &CompileOptions::default()).unwrap();
    assert!(code.contains("c1 <= ((-c0) + 3)"), "{code}");
}

// ---------------------------------------------------------------------------
// S4-S5: fusion
// ---------------------------------------------------------------------------

#[test]
fn s4_fusion_of_chained_elementwise() {
    let f1 = elementwise_step("step1", "A", "B", 10, false);
    let f2 = elementwise_step("step2", "B", "C", 10, true);
    let code = compile_fused(&[f1, f2], &CompileOptions::default()).unwrap();

    let expected = "\
void fused_step1_step2(int *A, int *B, int *C) {
    for (int c0 = 0; c0 <= 9; c0++) {
        B[c0] = A[c0] + 1;
        C[c0] = B[c0] * 2;
    }
}";
    assert_eq!(code, expected);
}

#[test]
fn s5_fusion_with_differing_extents() {
    let f1 = elementwise_step("step1", "A", "B", 10, false);
    let f2 = elementwise_step("step2", "B", "D", 8, true);
    let code = compile_fused(&[f1, f2], &CompileOptions::default()).unwrap();

    assert_eq!(count_loops(&code), 1, "{code}");
    assert!(code.contains("for (int c0 = 0; c0 <= 9; c0++)"), "{code}");
    assert!(code.contains("if (c0 <= 7)"), "{code}");
    assert!(code.contains("B[c0] = A[c0] + 1;"), "{code}");
    assert!(code.contains("D[c0] = B[c0] * 2;"), "{code}");
}

// ---------------------------------------------------------------------------
// S6: GEMM, reduction lowering, tiling
// ---------------------------------------------------------------------------

#[test]
fn gemm_reduction_lowering() {
    let code = compile(&gemm_func(2, 3, 4), &CompileOptions::default()).unwrap();
    let expected = "\
void gemm(int *A, int *B, int *C) {
    for (int c0 = 0; c0 <= 1; c0++) {
        for (int c1 = 0; c1 <= 2; c1++) {
            for (int c2 = 0; c2 <= 3; c2++) {
                if (c2 == 0) C[(c0*3 + c1)] = 0;
                C[(c0*3 + c1)] += A[(c0*4 + c2)] * B[(c2*3 + c1)];
            }
        }
    }
}";
    assert_eq!(code, expected);
}

#[test]
fn s6_gemm_with_tiling() {
    let func = gemm_func(1024, 2048, 4096);
    let options = CompileOptions {
        tiles: vec![Tile::new("i", 32), Tile::new("j", 64)],
        ..CompileOptions::default()
    };
    let code = compile(&func, &options).unwrap();

    assert_eq!(count_loops(&code), 5, "{code}");
    assert!(code.contains("for (int c0 = 0;"), "{code}");
    assert!(code.contains("c0 += 32)"), "{code}");
    assert!(code.contains("c1 += 64)"), "{code}");
    assert!(code.contains("for (int c2 = 0; c2 <= 4095; c2++)"), "{code}");
    assert!(code.contains("for (int c3 = 0; c3 <= 31; c3++)"), "{code}");
    assert!(code.contains("for (int c4 = 0; c4 <= 63; c4++)"), "{code}");
    assert!(
        code.contains("if (c2 == 0) C[((c0 + c3)*2048 + (c1 + c4))] = 0;"),
        "{code}"
    );
    assert!(
        code.contains(
            "C[((c0 + c3)*2048 + (c1 + c4))] += A[((c0 + c3)*4096 + c2)] * B[(c2*2048 + (c1 + c4))];"
        ),
        "{code}"
    );
}

#[test]
fn reduction_init_is_guarded_and_update_unconditional() {
    let code = compile(&gemm_func(2, 3, 4), &CompileOptions::default()).unwrap();
    let init_line = code
        .lines()
        .find(|line| line.contains("= 0;"))
        .expect("initializer line");
    assert!(init_line.trim_start().starts_with("if (c2 == 0)"));
    let update_line = code
        .lines()
        .find(|line| line.contains("+="))
        .expect("update line");
    assert!(!update_line.contains("if"));
}

// ---------------------------------------------------------------------------
// S7: skewed + tiled stencil
// ---------------------------------------------------------------------------

#[test]
fn s7_j_tiling_alone_is_illegal() {
    let func = stencil_func();
    let options = CompileOptions {
        tiles: vec![Tile::new("j", 2)],
        ..CompileOptions::default()
    };
    let err = compile(&func, &options).unwrap_err();
    match err {
        CodegenError::IllegalTiling { axes, .. } => assert_eq!(axes, vec!["j".to_string()]),
        other => panic!("expected IllegalTiling, got {other}"),
    }
}

#[test]
fn s7_optimize_then_tile_succeeds_with_skewed_band() {
    let func = stencil_func();
    let options = CompileOptions {
        optimize: true,
        tiles: vec![Tile::new("i", 2), Tile::new("j", 2)],
        ..CompileOptions::default()
    };
    let code = compile(&func, &options).unwrap();

    // Two tiled band members step by 2; the shifted read survives.
    assert_eq!(code.matches("+= 2").count(), 2, "{code}");
    assert!(code.contains("A["), "{code}");
    assert!(code.starts_with("void stencil(int *A) {"), "{code}");
}

// ---------------------------------------------------------------------------
// General laws
// ---------------------------------------------------------------------------

#[test]
fn determinism_byte_identical_output() {
    let func = gemm_func(8, 8, 8);
    let options = CompileOptions {
        tiles: vec![Tile::new("i", 4)],
        ..CompileOptions::default()
    };
    let first = compile(&func, &options).unwrap();
    let second = compile(&func, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn identity_schedule_emits_one_loop_per_iterator() {
    let code = compile(&add_func(), &CompileOptions::default()).unwrap();
    assert_eq!(count_loops(&code), 1);

    let code = compile(&gemm_func(4, 4, 4), &CompileOptions::default()).unwrap();
    assert_eq!(count_loops(&code), 3);
}

#[test]
fn size_one_tiling_is_a_no_op() {
    let func = gemm_func(4, 4, 4);
    let untiled = compile(&func, &CompileOptions::default()).unwrap();
    let tiled = compile(
        &func,
        &CompileOptions {
            tiles: vec![
                Tile::new("i", 1),
                Tile::new("j", 1),
                Tile::new("k", 1),
            ],
            ..CompileOptions::default()
        },
    )
    .unwrap();
    assert_eq!(untiled, tiled);
}

#[test]
fn explicit_schedule_override_reorders_loops() {
    // Swap the loop order of the triangular kernel: j becomes the outer
    // loop.
    let func = constrained_add(
        "tri_func",
        Constraint::le(Expr::var("j"), Expr::var("i")),
    );
    let options = CompileOptions {
        schedule: Some(Schedule::new(["j", "i"])),
        optimize: true, // ignored: the explicit schedule wins
        ..CompileOptions::default()
    };
    let code = compile(&func, &options).unwrap();
    // With j outermost the inner loop runs i from c0 upward.
    assert!(code.contains("for (int c1 = c0; c1 <= 3; c1++)"), "{code}");
}

#[test]
fn empty_function_list_is_rejected() {
    let err = compile_fused(&[], &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CodegenError::EmptyFunctionList));
}

#[test]
fn fused_output_stays_deterministic() {
    let make = || {
        let f1 = elementwise_step("step1", "A", "B", 10, false);
        let f2 = elementwise_step("step2", "B", "C", 10, true);
        compile_fused(&[f1, f2], &CompileOptions::default()).unwrap()
    };
    assert_eq!(make(), make());
}
