//! Benchmarks for the TSV wire codec

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tycoonkv::protocol::{decode_records, encode_records, Record};

fn printable_batch(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new(format!("user:{:08}", i), format!("value-{}", i)))
        .collect()
}

fn binary_batch(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let value: Vec<u8> = (0..64).map(|b| (b ^ i) as u8).collect();
            Record::new(format!("blob:{:08}", i), value)
        })
        .collect()
}

fn codec_benchmarks(c: &mut Criterion) {
    let printable = printable_batch(100);
    let binary = binary_batch(100);

    c.bench_function("encode_identity_100", |b| {
        b.iter(|| encode_records(black_box(&printable)))
    });

    c.bench_function("encode_base64_100", |b| {
        b.iter(|| encode_records(black_box(&binary)))
    });

    let (identity_body, identity_enc) = encode_records(&printable);
    c.bench_function("decode_identity_100", |b| {
        b.iter(|| decode_records(black_box(&identity_body), identity_enc.content_type()).unwrap())
    });

    let (base64_body, base64_enc) = encode_records(&binary);
    c.bench_function("decode_base64_100", |b| {
        b.iter(|| decode_records(black_box(&base64_body), base64_enc.content_type()).unwrap())
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
