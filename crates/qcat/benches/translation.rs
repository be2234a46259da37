//! Benchmarks for circuit translation
//!
//! Run with: cargo bench -p qcat

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qcat::{BackendKind, QCircuit, default_registry};
use std::f64::consts::PI;

fn ghz(n: u32) -> QCircuit {
    let mut qc = QCircuit::new(n).unwrap();
    qc.h_gate(0).unwrap();
    for i in 0..n - 1 {
        qc.cx_gate(i, i + 1).unwrap();
    }
    qc.measure_all().unwrap();
    qc
}

fn layered(n: u32, depth: u32) -> QCircuit {
    let mut qc = QCircuit::new(n).unwrap();
    for layer in 0..depth {
        for q in 0..n {
            qc.u_gate(PI / 3.0, f64::from(layer), PI / 5.0, q).unwrap();
        }
        for q in (layer % 2..n - 1).step_by(2) {
            qc.rzz_gate(PI / 7.0, q, q + 1).unwrap();
        }
    }
    qc.measure_all().unwrap();
    qc
}

/// Benchmark translating a GHZ circuit for every backend
fn bench_ghz_translation(c: &mut Criterion) {
    let registry = default_registry();
    let mut group = c.benchmark_group("ghz_translation");

    for &kind in BackendKind::ALL {
        let backend = registry.get(kind).unwrap();
        for num_qubits in [5u32, 20] {
            let qc = ghz(num_qubits);
            group.bench_with_input(
                BenchmarkId::new(kind.name(), num_qubits),
                qc.circuit(),
                |b, circuit| {
                    b.iter(|| backend.translate(black_box(circuit)).unwrap());
                },
            );
        }
    }

    group.finish();
}

/// Benchmark translation of circuits that need decomposition
fn bench_decomposed_translation(c: &mut Criterion) {
    let registry = default_registry();
    let mut group = c.benchmark_group("decomposed_translation");
    let qc = layered(8, 10);

    for kind in [BackendKind::Cirq, BackendKind::Braket, BackendKind::QSharp] {
        let backend = registry.get(kind).unwrap();
        group.bench_function(kind.name(), |b| {
            b.iter(|| backend.translate(black_box(qc.circuit())).unwrap());
        });
    }

    group.finish();
}

/// Benchmark drawing with a warm translation cache
fn bench_cached_draw(c: &mut Criterion) {
    let mut qc = ghz(20);
    qc.draw().unwrap();

    c.bench_function("cached_draw", |b| {
        b.iter(|| qc.draw().unwrap());
    });
}

criterion_group!(
    benches,
    bench_ghz_translation,
    bench_decomposed_translation,
    bench_cached_draw
);
criterion_main!(benches);
