use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pack_fs::{LineEnding, NormalizedPath, io};
use tempfile::tempdir;

fn write_atomic_benchmark(c: &mut Criterion) {
    c.bench_function("io::write_atomic", |b| {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("test_file.txt"));
        let content = "hello world".as_bytes();

        b.iter(|| {
            io::write_atomic(black_box(&path), black_box(content)).unwrap();
        })
    });
}

fn line_ending_benchmark(c: &mut Criterion) {
    let text = "<!-- agentops:begin a -->\nline\n<!-- agentops:end a -->\n".repeat(200);
    c.bench_function("LineEnding::Crlf::apply", |b| {
        b.iter(|| LineEnding::Crlf.apply(black_box(&text)))
    });
}

criterion_group!(benches, write_atomic_benchmark, line_ending_benchmark);
criterion_main!(benches);
