use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dstitch::stream::{decode_chunked, decode_sequential};
use dstitch::HEADER_SIZE;

fn synthetic_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(31) >> 3) as u8).collect()
}

fn bench_record_decoding(c: &mut Criterion) {
    let payload = synthetic_payload(1024 * 1024);

    c.bench_function("decode_sequential_1mb", |b| {
        b.iter(|| decode_sequential(black_box(&payload)))
    });
    c.bench_function("decode_chunked_1mb", |b| {
        b.iter(|| decode_chunked(black_box(&payload)))
    });
}

fn bench_full_decode(c: &mut Criterion) {
    let mut bytes = vec![0u8; HEADER_SIZE];
    bytes[..20].copy_from_slice(b"LA:Bench\rST:349525\r\r");
    bytes.extend(synthetic_payload(1024 * 1024));

    c.bench_function("decode_file_1mb", |b| {
        b.iter(|| dstitch::decode(black_box(&bytes)).unwrap())
    });
}

fn bench_geometry(c: &mut Criterion) {
    let payload = synthetic_payload(300 * 1024);
    let records = decode_sequential(&payload);

    c.bench_function("absolute_path_100k", |b| {
        b.iter(|| dstitch::geometry::absolute_path(black_box(&records)))
    });
    c.bench_function("segments_100k", |b| {
        b.iter(|| dstitch::geometry::segments(black_box(&records)))
    });
}

criterion_group!(benches, bench_record_decoding, bench_full_decode, bench_geometry);
criterion_main!(benches);
