use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mindgraph_renderer::layout::compute_layout;
use mindgraph_renderer::render::render_svg;
use mindgraph_renderer::spec::{DiagramType, parse_spec};
use mindgraph_renderer::theme::default_style;
use serde_json::{Value, json};
use std::hint::black_box;

fn bubble_source(attributes: usize) -> Value {
    let attrs: Vec<String> = (0..attributes).map(|i| format!("attribute {i}")).collect();
    json!({"topic": "Benchmark topic", "attributes": attrs})
}

fn mindmap_source(branches: usize, children: usize) -> Value {
    let kids: Vec<Value> = (0..branches)
        .map(|b| {
            let grandkids: Vec<Value> = (0..children)
                .map(|c| json!({"text": format!("child {b}-{c}")}))
                .collect();
            json!({"text": format!("branch {b}"), "children": grandkids})
        })
        .collect();
    json!({"topic": "Central idea", "children": kids})
}

fn concept_source(concepts: usize) -> Value {
    let names: Vec<String> = (0..concepts).map(|i| format!("concept {i}")).collect();
    let relationships: Vec<Value> = (1..concepts)
        .map(|i| {
            json!({
                "from": format!("concept {}", i - 1),
                "to": format!("concept {i}"),
                "label": "leads to"
            })
        })
        .collect();
    json!({"topic": "Web", "concepts": names, "relationships": relationships})
}

fn flowchart_source(nodes: usize, back_edges: usize) -> Value {
    let node_list: Vec<Value> = (0..nodes)
        .map(|i| {
            let kind = match i {
                0 => "start",
                n if n == nodes - 1 => "end",
                n if n % 4 == 2 => "decision",
                _ => "process",
            };
            json!({"id": format!("n{i}"), "label": format!("Step {i}"), "kind": kind})
        })
        .collect();
    let mut edges: Vec<Value> = (0..nodes.saturating_sub(1))
        .map(|i| json!({"from": format!("n{i}"), "to": format!("n{}", i + 1)}))
        .collect();
    for i in 0..back_edges.min(nodes.saturating_sub(3)) {
        edges.push(json!({
            "from": format!("n{}", i + 3),
            "to": format!("n{i}"),
            "label": "retry"
        }));
    }
    json!({"title": "Generated", "nodes": node_list, "edges": edges})
}

fn cases() -> Vec<(&'static str, DiagramType, Value)> {
    vec![
        ("bubble_small", DiagramType::BubbleMap, bubble_source(5)),
        ("bubble_full", DiagramType::BubbleMap, bubble_source(15)),
        ("mindmap_medium", DiagramType::Mindmap, mindmap_source(6, 4)),
        ("mindmap_large", DiagramType::Mindmap, mindmap_source(10, 8)),
        ("concept_medium", DiagramType::ConceptMap, concept_source(12)),
        ("concept_full", DiagramType::ConceptMap, concept_source(30)),
        (
            "flowchart_medium",
            DiagramType::Flowchart,
            flowchart_source(15, 2),
        ),
        (
            "flowchart_large",
            DiagramType::Flowchart,
            flowchart_source(40, 6),
        ),
    ]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, kind, value) in cases() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &value, |b, data| {
            b.iter(|| {
                let spec = parse_spec(kind, black_box(data)).expect("parse failed");
                black_box(spec.kind());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for (name, kind, value) in cases() {
        let spec = parse_spec(kind, &value).expect("parse failed");
        let style = default_style(kind);
        group.bench_with_input(BenchmarkId::from_parameter(name), &spec, |b, spec| {
            b.iter(|| {
                let layout = compute_layout(black_box(spec), &style, None);
                black_box(layout.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    for (name, kind, value) in cases() {
        let spec = parse_spec(kind, &value).expect("parse failed");
        let style = default_style(kind);
        let layout = compute_layout(&spec, &style, None);
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, data| {
            b.iter(|| {
                let svg = render_svg(black_box(data), &style, "MindGraph");
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    for (name, kind, value) in cases() {
        let style = default_style(kind);
        group.bench_with_input(BenchmarkId::from_parameter(name), &value, |b, data| {
            b.iter(|| {
                let spec = parse_spec(kind, black_box(data)).expect("parse failed");
                let layout = compute_layout(&spec, &style, None);
                let svg = render_svg(&layout, &style, "MindGraph");
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_render, bench_end_to_end
);
criterion_main!(benches);
