use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ra_adjust::{codec, ReportAdjuster};
use ra_core::{AdjustConfig, Report};
use serde_json::{json, Value};

fn generate_report(artifacts: usize, flows: usize) -> Value {
    let mut rng = StdRng::seed_from_u64(42);
    let artifacts: Vec<Value> = (0..artifacts)
        .map(|i| {
            if i % 4 == 0 {
                json!({"artifact_type": "rest_api", "location": {"file_path": format!("api/{}.py", i % 40)}})
            } else {
                json!({"artifact_type": "functions", "code_ref": {"file_path": format!("api/{}.py", rng.gen_range(0..80))}})
            }
        })
        .collect();
    let flows: Vec<Value> = (0..flows)
        .map(|i| {
            let dir = if rng.gen_bool(0.2) { "tests" } else { "src" };
            let steps: Vec<Value> = (0..rng.gen_range(1..30))
                .map(|s| json!({"location": {"file_path": format!("{dir}/step_{s}.py")}}))
                .collect();
            json!({"metadata": {"source": {"location": {"file_path": format!("src/source_{i}.py")}}, "paths": [steps]}})
        })
        .collect();
    json!({
        "status": "Completed",
        "compressed": false,
        "results": {
            "artifacts": artifacts,
            "flows_result": {"flows_artifacts": {"injection": {"sql": flows}}}
        },
        "project_metadata": {"name": "bench"}
    })
}

fn bench_adjust(c: &mut Criterion) {
    let adjuster = ReportAdjuster::new(AdjustConfig::default()).unwrap();
    for &(name, artifacts, flows) in &[("small", 200, 200), ("large", 10_000, 5_000)] {
        let report = Report::from_value(generate_report(artifacts, flows)).unwrap();
        c.bench_function(&format!("adjust_{name}"), |b| {
            b.iter(|| {
                let mut r = report.clone();
                black_box(adjuster.adjust(black_box(&mut r)))
            })
        });
    }
}

fn bench_codec(c: &mut Criterion) {
    let encoded = codec::encode(generate_report(2_000, 1_000)).unwrap();
    c.bench_function("decode_2k_artifacts", |b| {
        b.iter(|| black_box(codec::decode(black_box(encoded.clone()))))
    });
}

criterion_group!(benches, bench_adjust, bench_codec);
criterion_main!(benches);
