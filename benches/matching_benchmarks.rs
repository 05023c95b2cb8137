//! Performance benchmarks for the reconciliation engine.
//!
//! Audit datasets are small (hundreds of employees), so the targets are
//! loose; what matters is that the fuzzy pass's quadratic candidate scan
//! stays comfortably sub-second at realistic sizes.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use payroll_auditor::comparison::name_similarity;
use payroll_auditor::{audit, AuditConfig, FileFormat};

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Robert", "Maria", "Chen", "Priya", "Samuel", "Alice", "Omar", "Elena",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Doe", "Johnson", "Garcia", "Wei", "Patel", "Lee", "Wang", "Hassan", "Petrova",
];

/// Builds a payroll CSV with `count` employees; `perturb` respells some
/// names and nudges some amounts so matching and comparison both do real
/// work.
fn payroll_csv(count: usize, perturb: bool) -> Vec<u8> {
    let mut text = String::from("Employee ID,Employee Name,Gross Pay,Net Pay,Hours\n");
    for i in 0..count {
        let first = FIRST_NAMES[i % FIRST_NAMES.len()];
        let last = LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()];
        let gross = 900 + (i % 700);
        let cents = if perturb && i % 7 == 0 { 13 } else { 0 };

        // drop some ids and respell some names to force the fuzzy pass
        let id = if i % 5 == 0 {
            String::new()
        } else {
            format!("E{i}")
        };
        let name = if perturb && i % 5 == 0 {
            format!("{first}n {last}")
        } else {
            format!("{first} {last}")
        };
        text.push_str(&format!(
            "{id},{name} {i},{gross}.{cents:02},{}.00,38\n",
            gross - 200
        ));
    }
    text.into_bytes()
}

fn bench_audit_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("audit_end_to_end");
    for count in [100usize, 500, 1000] {
        let file_a = payroll_csv(count, false);
        let file_b = payroll_csv(count, true);
        let config = AuditConfig::default();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                audit(
                    black_box(&file_a),
                    FileFormat::Delimited,
                    black_box(&file_b),
                    FileFormat::Delimited,
                    &config,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_name_similarity(c: &mut Criterion) {
    c.bench_function("name_similarity", |b| {
        b.iter(|| {
            name_similarity(
                black_box("john smith"),
                black_box("smith jonathan"),
            )
        })
    });
}

fn bench_clean_comparison(c: &mut Criterion) {
    let file = payroll_csv(500, false);
    let config = AuditConfig::default();
    c.bench_function("audit_identical_500", |b| {
        b.iter(|| {
            audit(
                black_box(&file),
                FileFormat::Delimited,
                black_box(&file),
                FileFormat::Delimited,
                &config,
            )
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_audit_end_to_end,
    bench_name_similarity,
    bench_clean_comparison
);
criterion_main!(benches);
