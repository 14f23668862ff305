use criterion::{criterion_group, criterion_main, Criterion};
use parkprep::core::types::{Row, Value};
use parkprep::operators::join::{join, NestedLoopJoin};
use parkprep::operators::Operator;

fn make_rows(rows: usize, offset: usize) -> Vec<Row> {
    (0..rows)
        .map(|i| {
            Row::from_pairs([
                ("DCA License Number", Value::Str(format!("{}-DCA", i + offset))),
                ("Business Name", Value::Str(format!("Lot {}", i))),
                ("Latitude", Value::F64(40.0 + (i % 100) as f64 / 100.0)),
            ])
        })
        .collect()
}

fn bench_nested_loop_join(c: &mut Criterion) {
    let left = make_rows(1024, 0);
    let right = make_rows(1024, 512);
    let keys = vec!["DCA License Number".to_string()];

    c.bench_function("join_nested_loop", |b| {
        b.iter(|| {
            let out = join(&left, &right, &keys).expect("join");
            assert_eq!(out.len(), 512);
        })
    });

    let op = NestedLoopJoin {
        primary_keys: keys.clone(),
    };
    c.bench_function("join_operator_eval", |b| {
        b.iter(|| {
            let out = op
                .eval(vec![left.clone(), right.clone()])
                .expect("join");
            assert_eq!(out.len(), 512);
        })
    });
}

criterion_group!(joins, bench_nested_loop_join);
criterion_main!(joins);
