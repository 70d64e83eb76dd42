use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use influxql_builder::config::QuerySpec;
use influxql_builder::{compile_condition, count, distinct, mean, select, time, values, Value};
use std::hint::black_box;
use std::time::Duration;

// 基准测试：条件表达式的三种写法
fn benchmark_conditions(c: &mut Criterion) {
    let test_cases: Vec<(&str, &str, Vec<Value>)> = vec![
        ("literal", "location != 'Toronto'", values![]),
        ("placeholder", r#""location" = ? AND "altitude" >= ?"#, values!["Toronto", 500]),
        ("shorthand_field", "location", values!["Toronto"]),
        ("shorthand_operator", "altitude >=", values![500]),
    ];

    let mut group = c.benchmark_group("condition_compile");

    for (name, expr, bound) in &test_cases {
        group.bench_with_input(BenchmarkId::new("compile", name), expr, |b, expr| {
            b.iter(|| black_box(compile_condition(black_box(expr), bound).expect("条件应该编译成功")))
        });
    }

    group.finish();
}

// 基准测试：完整的SELECT语句
fn benchmark_statements(c: &mut Criterion) {
    let mut simple = select(["foo"]);
    simple.from("bar");

    let mut grouped = select([mean("value")]);
    grouped
        .from("cpu")
        .filter("region", values!["uswest"])
        .and("altitude >=", values![500])
        .group_by(time(Duration::from_secs(600)))
        .fill(0);

    let mut nested = select([count(distinct("level description"))]);
    nested.from("h2o_feet").limit(100);

    let mut group = c.benchmark_group("statement_build");
    for (name, statement) in [("simple", &simple), ("grouped", &grouped), ("nested", &nested)] {
        group.bench_with_input(BenchmarkId::new("build", name), statement, |b, statement| {
            b.iter(|| black_box(statement.build().expect("语句应该编译成功")))
        });
    }
    group.finish();
}

// 基准测试：JSON描述到InfluxQL的端到端处理
fn benchmark_end_to_end(c: &mut Criterion) {
    let json = r#"{
        "fields": [{"function": "mean", "field": "value"}],
        "from": "cpu",
        "conditions": [{"expr": "region", "values": ["uswest"]}],
        "group_by": [{"time": "10m"}],
        "fill": 0
    }"#;

    c.bench_function("json_to_influxql", |b| {
        b.iter(|| {
            let spec = QuerySpec::from_json_str(black_box(json)).expect("解析应该成功");
            black_box(spec.compile().expect("编译应该成功"))
        })
    });
}

criterion_group!(benches, benchmark_conditions, benchmark_statements, benchmark_end_to_end);
criterion_main!(benches);
