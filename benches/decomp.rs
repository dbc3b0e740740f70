use criterion::{black_box, criterion_group, criterion_main, Criterion};
use factoris::linalg::hh_solve;
use factoris::{Lu, Matrix, Qr, Qrpt, Solver, Vector};

fn random_matrix(n: usize) -> Matrix<f64> {
    // Deterministic pseudo-random fill, diagonally dominated so every
    // factorization succeeds.
    let mut state = 0x2545F4914F6CDD1D_u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
    };
    let mut a = Matrix::from_fn(n, n, |_, _| next());
    for i in 0..n {
        a[(i, i)] += n as f64;
    }
    a
}

fn bench_decompose(c: &mut Criterion) {
    for n in [8, 32, 128] {
        let a = random_matrix(n);

        c.bench_function(&format!("lu_decompose_{n}"), |bch| {
            bch.iter(|| Lu::new(black_box(&a)).unwrap())
        });
        c.bench_function(&format!("qr_decompose_{n}"), |bch| {
            bch.iter(|| Qr::new(black_box(&a)).unwrap())
        });
        c.bench_function(&format!("qrpt_decompose_{n}"), |bch| {
            bch.iter(|| Qrpt::new(black_box(&a)).unwrap())
        });
    }
}

fn bench_solve(c: &mut Criterion) {
    for n in [8, 32, 128] {
        let a = random_matrix(n);
        let b = Vector::from_fn(n, |i| (i + 1) as f64);

        let lu = Lu::new(&a).unwrap();
        c.bench_function(&format!("lu_solve_{n}"), |bch| {
            bch.iter(|| lu.solve(black_box(&b)).unwrap())
        });

        let qr = Qr::new(&a).unwrap();
        c.bench_function(&format!("qr_solve_{n}"), |bch| {
            bch.iter(|| qr.solve(black_box(&b)).unwrap())
        });

        c.bench_function(&format!("hh_solve_{n}"), |bch| {
            bch.iter(|| hh_solve(black_box(&a), black_box(&b)).unwrap())
        });
    }
}

criterion_group!(benches, bench_decompose, bench_solve);
criterion_main!(benches);
