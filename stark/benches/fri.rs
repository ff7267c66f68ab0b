use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use primestark::fibonacci::{fibonacci_air, fibonacci_result, fibonacci_trace};
use primestark::field::{Polynomial, PrimeField};
use primestark::fri::{Fri, FriConfig};
use primestark::{StarkConfig, StarkSystem};
use rand::thread_rng;

fn bench_fri(c: &mut Criterion) {
    let field = PrimeField::stark252();
    let mut group = c.benchmark_group("fri");
    group.sample_size(10);

    for degree_log in [4, 6] {
        let max_degree = 1 << degree_log;
        let fri = Fri::new(field.clone(), FriConfig::new(max_degree, 4)).unwrap();
        let poly = Polynomial::new(field.sample_vec(&mut thread_rng(), max_degree));
        let commitment = fri.commit(&poly).unwrap();
        let proof = fri.prove(&commitment).unwrap();

        group.bench_with_input(BenchmarkId::new("prove", max_degree), &max_degree, |b, _| {
            b.iter(|| fri.prove(&fri.commit(&poly).unwrap()).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("verify", max_degree), &max_degree, |b, _| {
            b.iter(|| fri.verify(&commitment, &proof));
        });
    }
    group.finish();
}

fn bench_fibonacci_stark(c: &mut Criterion) {
    let field = PrimeField::stark252();
    let system = StarkSystem::new(field.clone(), StarkConfig::standard_fast_config()).unwrap();
    let mut group = c.benchmark_group("fibonacci-stark");
    group.sample_size(10);

    for num_rows in [8, 16] {
        let trace = fibonacci_trace(&field, num_rows);
        let air = fibonacci_air(&field, num_rows, &fibonacci_result(&field, num_rows));
        let proof = system.generate_proof(&trace, &air).unwrap();

        group.bench_with_input(BenchmarkId::new("prove", num_rows), &num_rows, |b, _| {
            b.iter(|| system.generate_proof(&trace, &air).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("verify", num_rows), &num_rows, |b, _| {
            b.iter(|| system.verify_proof(&proof, &air));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fri, bench_fibonacci_stark);
criterion_main!(benches);
