//! Engine performance benchmarks.
//!
//! Measures type inference, validation and the full profile pipeline over
//! synthetic people tables.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use datasieve::inference::{compute_statistics, infer_types};
use datasieve::validation::detect_duplicates;
use datasieve::{
    DataSieve, DataTable, DuplicateHandling, MissingValueHandling, RegionRule, RemediationPolicy,
    SieveConfig,
};

/// Generate a people table with duplicates, gaps and malformed fields.
fn generate_people(rows: usize) -> DataTable {
    let headers = ["id", "name", "email", "Date_of_birth", "state", "num_state", "age"];
    let names = ["Amine", "Sara", "Yacine", "Nadia", "Karim"];
    let states = [("Adrar", "01"), ("Oran", "31"), ("Blida", "09"), ("Setif", "19")];

    let data: Vec<Vec<String>> = (0..rows)
        .map(|row| {
            // every 20th row repeats its predecessor
            let n = if row % 20 == 19 { row - 1 } else { row };
            let (state, code) = states[n % states.len()];
            vec![
                n.to_string(),
                names[n % names.len()].to_string(),
                if n % 13 == 0 {
                    "not-an-email".to_string()
                } else {
                    format!("user{}@mail.dz", n)
                },
                format!("{:02}/{:02}/{}", n % 28 + 1, n % 12 + 1, 1960 + n % 50),
                state.to_string(),
                if n % 17 == 0 { "99".to_string() } else { code.to_string() },
                if n % 11 == 0 { String::new() } else { (18 + n % 60).to_string() },
            ]
        })
        .collect();

    DataTable::new(headers.iter().map(|h| h.to_string()).collect(), data)
        .expect("generated table is rectangular")
}

fn bench_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference");

    for rows in [100, 1_000, 10_000] {
        let table = generate_people(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("infer_types", rows), &table, |b, t| {
            b.iter(|| infer_types(black_box(t)))
        });

        let schema = infer_types(&table);
        group.bench_with_input(BenchmarkId::new("statistics", rows), &table, |b, t| {
            b.iter(|| compute_statistics(black_box(t), &schema))
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let sieve = DataSieve::with_config(SieveConfig::new().with_region(RegionRule::wilayas()));

    for rows in [100, 1_000, 10_000] {
        let table = generate_people(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("duplicates", rows), &table, |b, t| {
            b.iter(|| detect_duplicates(black_box(t), None))
        });
        group.bench_with_input(BenchmarkId::new("check", rows), &table, |b, t| {
            b.iter(|| sieve.check(black_box(t)))
        });
    }

    group.finish();
}

fn bench_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile");
    group.sample_size(20);

    let config = SieveConfig::new()
        .with_region(RegionRule::wilayas())
        .with_policy(RemediationPolicy::new(
            DuplicateHandling::Drop,
            MissingValueHandling::FillMedian,
        ));
    let sieve = DataSieve::with_config(config);

    for rows in [1_000, 10_000] {
        let table = generate_people(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("full", rows), &table, |b, t| {
            b.iter(|| sieve.profile(black_box(t)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_inference, bench_validation, bench_profile);
criterion_main!(benches);
