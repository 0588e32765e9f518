//! Rewrite benchmarks over a synthetic unit

use criterion::{criterion_group, criterion_main, Criterion};
use mapsugar::core::desugar::transform;
use mapsugar::syntax::ast::Form;
use mapsugar::syntax::make::*;

/// A unit of `n` functions each building, updating and reading an
/// aggregate
fn unit(n: u32) -> Vec<Form> {
    let mut forms = vec![file_marker(1, "bench.src")];
    for i in 0..n {
        let line = i * 4 + 2;
        let literal = map(
            line,
            vec![
                entry(line, "a", int(line, 1)),
                entry(line, "b", tuple(line, vec![var(line, "X"), atom(line, "ok")])),
                entry(line, "c", list(line, vec![int(line, 1), int(line, 2)])),
            ],
        );
        let body = vec![
            bind(line + 1, var(line + 1, "M"), literal),
            bind(
                line + 2,
                var(line + 2, "N"),
                update(line + 2, var(line + 2, "M"), vec![entry(line + 2, "a", int(line + 2, 2))]),
            ),
            field(line + 3, var(line + 3, "N"), "b"),
        ];
        forms.push(function(
            line,
            format!("f{i}"),
            vec![clause(line, vec![var(line, "X")], vec![], body)],
        ));
    }
    forms
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let forms = unit(200);
    c.bench_function("rewrite 200 functions", |b| {
        b.iter(|| transform(forms.clone(), &[]))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
