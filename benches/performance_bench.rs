use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sshfinder::{combos, report::RunReport, resolver::HostResolver, types::Login};

fn bench_combination_generation(c: &mut Criterion) {
    let hosts: Vec<String> = (1..=50).map(|i| format!("10.0.0.{}", i)).collect();
    let users: Vec<String> = (1..=10).map(|i| format!("user{}", i)).collect();
    let passwords: Vec<String> = (1..=20).map(|i| format!("pass{}", i)).collect();

    c.bench_function("generate_10k_combinations", |b| {
        b.iter(|| combos::generate(black_box(&hosts), black_box(&users), black_box(&passwords)))
    });
}

fn bench_cidr_expansion(c: &mut Criterion) {
    let specs = vec!["192.168.0.0/24".to_string(), "10.0.0.0/22".to_string()];

    c.bench_function("resolve_subnets", |b| {
        b.iter(|| HostResolver::resolve(black_box(&specs)))
    });
}

fn bench_report_rendering(c: &mut Criterion) {
    let logins: Vec<Login> = (1..=200)
        .map(|i| Login {
            host: format!("10.0.{}.{}", i / 256, i % 256),
            username: "root".to_string(),
            password: format!("pass{}", i),
        })
        .collect();

    c.bench_function("build_and_render_report", |b| {
        b.iter(|| {
            let report = RunReport::build(black_box(&logins), 10_000);
            report.render(false)
        })
    });
}

criterion_group!(
    benches,
    bench_combination_generation,
    bench_cidr_expansion,
    bench_report_rendering
);
criterion_main!(benches);
