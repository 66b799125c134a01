//! Fill throughput benchmarks
//!
//! Measures template expansion and placeholder substitution with:
//! - Growing tables (10, 100, 1000 rows)
//! - Growing lists with script placeholders (10, 100, 1000 rows)
//!
//! Run benchmarks: `cargo bench --bench fill_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use platen::PipelineBuilder;
use serde_json::json;

/// Bordered item table with a header and page footer, 60 lines per page
fn table_template() -> &'static str {
    r#"{
        "pageFormat": { "pageLength": 60, "characterPitch": 12 },
        "template": {
            "header": ["Inventory ${title}"],
            "footer": ["Page %{PAGE_NO}"],
            "detail": [
                {
                    "table": "items",
                    "border": true,
                    "columns": [
                        { "source": "id", "width": 6 },
                        { "source": "name", "width": 20 },
                        { "source": "price::currency::right", "width": 12 }
                    ]
                },
                "Total: ${items::count} items"
            ]
        }
    }"#
}

fn list_template() -> &'static str {
    r#"{
        "pageFormat": { "pageLength": 60 },
        "template": [
            { "list": "items", "line": "{{row}}. {{upper(name)}} at {{price::currency}}", "header": ["Items"] }
        ]
    }"#
}

/// Generate test data rows
fn generate_items(count: usize) -> serde_json::Value {
    let items: Vec<_> = (1..=count)
        .map(|i| json!({ "id": i, "name": format!("Item {}", i), "price": i as f64 * 1.25 }))
        .collect();
    json!({ "title": "Q3", "items": items })
}

fn benchmark_table_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_fill");
    let pipeline = PipelineBuilder::new()
        .with_template_source(table_template(), "json")
        .expect("Failed to parse template")
        .build()
        .expect("Failed to build pipeline");

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        let data = generate_items(count);
        group.bench_with_input(BenchmarkId::new("rows", count), &data, |b, data| {
            b.iter(|| pipeline.fill_bytes(data.clone()).expect("Failed to fill report"));
        });
    }

    group.finish();
}

fn benchmark_list_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_fill");
    let pipeline = PipelineBuilder::new()
        .with_template_source(list_template(), "json")
        .expect("Failed to parse template")
        .build()
        .expect("Failed to build pipeline");

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        let data = generate_items(count);
        group.bench_with_input(BenchmarkId::new("rows", count), &data, |b, data| {
            b.iter(|| pipeline.fill(data.clone()).expect("Failed to fill report"));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_table_fill, benchmark_list_fill);
criterion_main!(benches);
