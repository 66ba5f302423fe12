//! 注册表与工具函数性能基准测试

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use snaplink::registry::{CodeRegistry, CreateLinkRequest};
use snaplink::system::ManualClock;
use snaplink::utils::{TimeParser, generate_random_code};

// ============== generate_random_code 基准测试 ==============

fn bench_generate_random_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_random_code");

    for length in [4, 6, 8, 12] {
        group.bench_with_input(BenchmarkId::new("length", length), &length, |b, &length| {
            b.iter(|| {
                let code = generate_random_code(length);
                assert_eq!(code.len(), length);
            });
        });
    }

    group.finish();
}

// ============== CodeRegistry::create 基准测试 ==============

fn bench_registry_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/create");
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    // 已有条目越多，唯一性检查越慢
    for existing in [0usize, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("existing", existing),
            &existing,
            |b, &existing| {
                let mut registry = CodeRegistry::new(Arc::new(ManualClock::new(start)));
                for _ in 0..existing {
                    registry
                        .create(CreateLinkRequest::new("https://example.com"))
                        .unwrap();
                }
                b.iter(|| {
                    let entry = registry
                        .create(CreateLinkRequest::new("https://example.com/bench"))
                        .unwrap();
                    registry.remove(&entry.code);
                });
            },
        );
    }

    group.finish();
}

// ============== TimeParser::parse_expiry 基准测试 ==============

fn bench_parse_expiry(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/parse_expiry");

    for input in ["45", "2026-10-20", "1h30m", "2026-10-20T12:00:00Z"] {
        group.bench_with_input(BenchmarkId::new("input", input), &input, |b, &input| {
            b.iter(|| {
                assert!(TimeParser::parse_expiry(input).unwrap().is_some());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_random_code,
    bench_registry_create,
    bench_parse_expiry,
);
criterion_main!(benches);
