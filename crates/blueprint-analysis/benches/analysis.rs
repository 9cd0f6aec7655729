use blueprint_analysis::diagnostics::scan;
use blueprint_analysis::{AnalysisHost, ContentChange, LineIndex, Position, Range};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;

const URI: &str = "file:///bench/large.bp";

fn large_blueprint(block_count: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(block_count * 96);
    for i in 0..block_count {
        // Roughly one header in eight uses an unquoted multi-word name.
        if rng.gen_range(0..8) == 0 {
            out.push_str(&format!("model Record Number {i}:\n"));
        } else {
            out.push_str(&format!("model \"Record{i}\":\n"));
        }
        out.push_str("  fields:\n");
        out.push_str("    id: Uuid primary\n");
        out.push_str("    email: Email unique required\n");
    }
    out
}

fn bench_scan(c: &mut Criterion) {
    let index = LineIndex::from_text(&large_blueprint(10_000));
    c.bench_function("diagnostics_scan/40k_lines", |b| {
        b.iter(|| black_box(scan(black_box(&index)).len()))
    });
}

fn bench_completion_deep_in_file(c: &mut Criterion) {
    let mut host = AnalysisHost::default();
    host.open_document(URI, &large_blueprint(10_000), 1).unwrap();
    let position = Position::new(20_002, 8);

    c.bench_function("completion/line_20k", |b| {
        b.iter(|| black_box(host.completions(URI, black_box(position)).unwrap().len()))
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_blueprint(10_000);
    c.bench_function("typing_middle/100_edits", |b| {
        b.iter_batched(
            || {
                let mut host = AnalysisHost::default();
                host.open_document(URI, &text, 1).unwrap();
                host
            },
            |mut host| {
                for i in 0..100u32 {
                    let at = Position::new(20_002, 10 + i);
                    let change = ContentChange::replace(Range::new(at, at), "x");
                    host.change_document(URI, &[change], 2 + i as i32).unwrap();
                }
                black_box(host.document(URI).unwrap().line_count());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_scan,
    bench_completion_deep_in_file,
    bench_typing_in_middle
);
criterion_main!(benches);
