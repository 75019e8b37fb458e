use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ra_core::Report;
use serde_json::{json, Value};

fn generate_report(artifacts: usize, flows: usize) -> Value {
    let mut rng = StdRng::seed_from_u64(7);
    let artifacts: Vec<Value> = (0..artifacts)
        .map(|i| {
            if i % 3 == 0 {
                json!({"artifact_type": "rest_api", "location": {"file_path": format!("api_{}.py", i % 50)}})
            } else {
                json!({"artifact_type": "functions", "code_ref": {"file_path": format!("mod_{}.py", rng.gen_range(0..100))}})
            }
        })
        .collect();
    let flows: Vec<Value> = (0..flows)
        .map(|i| {
            let steps: Vec<Value> = (0..rng.gen_range(1..30))
                .map(|s| json!({"location": {"file_path": format!("step_{s}.py")}}))
                .collect();
            json!({"metadata": {"source": {"location": {"file_path": format!("src_{i}.py")}}, "paths": [steps]}})
        })
        .collect();
    json!({
        "status": "Completed",
        "results": {
            "artifacts": artifacts,
            "flows_result": {"flows_artifacts": {"injection": {"sql": flows}}}
        }
    })
}

fn bench_report_from_value(c: &mut Criterion) {
    let small = generate_report(100, 100);
    let large = generate_report(5_000, 2_000);
    c.bench_function("report_from_value_small", |b| {
        b.iter(|| black_box(Report::from_value(black_box(small.clone()))))
    });
    c.bench_function("report_from_value_large", |b| {
        b.iter(|| black_box(Report::from_value(black_box(large.clone()))))
    });
}

criterion_group!(benches, bench_report_from_value);
criterion_main!(benches);
