#![allow(unused_crate_dependencies)]
use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use packwire::{Decode, Encode, from_slice, pack, to_vec};

fn bench_packed_ints(c: &mut Criterion) {
    let values: Vec<u64> = (0..1024u64)
        .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> (i % 64))
        .collect();

    c.bench_function("pack_write_u64", |b| {
        let mut buf = Vec::with_capacity(9 * values.len());
        b.iter(|| {
            buf.clear();
            for &v in &values {
                pack::write(&mut buf, black_box(v)).expect("must write");
            }
        });
    });

    let buf = to_vec(&values).expect("must encode");
    c.bench_function("pack_read_u64", |b| {
        b.iter(|| from_slice::<Vec<u64>>(black_box(&buf)).expect("must decode"));
    });
}

fn bench_floats(c: &mut Criterion) {
    let values: Vec<f64> = (1..=256).map(|i| 1.0 / f64::from(i)).collect();
    let buf = to_vec(&values).expect("must encode");

    c.bench_function("float_write", |b| {
        let mut out = Vec::with_capacity(buf.len());
        b.iter(|| {
            out.clear();
            black_box(&values).encode(&mut out).expect("must write");
        });
    });

    c.bench_function("float_read", |b| {
        b.iter(|| Vec::<f64>::decode(&mut black_box(buf.as_slice())).expect("must read"));
    });
}

fn bench_map(c: &mut Criterion) {
    let map: BTreeMap<String, Vec<u32>> = (0..128u32)
        .map(|i| (format!("key-{i}"), (0..i % 16).collect()))
        .collect();
    let buf = to_vec(&map).expect("must encode");

    c.bench_function("map_round_trip", |b| {
        b.iter(|| {
            let buf = to_vec(black_box(&map)).expect("must encode");
            from_slice::<BTreeMap<String, Vec<u32>>>(&buf).expect("must decode")
        });
    });

    c.bench_function("map_read", |b| {
        b.iter(|| from_slice::<BTreeMap<String, Vec<u32>>>(black_box(&buf)).expect("must decode"));
    });
}

criterion_group!(benches, bench_packed_ints, bench_floats, bench_map);
criterion_main!(benches);
