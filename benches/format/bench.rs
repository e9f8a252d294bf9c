#![allow(clippy::missing_panics_doc)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dc_benches::{coordinates, random_doubles};
use dc_convert::{format_coord_nice, format_coord_shortest, DoubleToStringConverter, DtoaFlags};
use dc_dtoa::{bignum_dtoa::bignum_dtoa, double_to_ascii, DtoaMode};

const CONVERTER: DoubleToStringConverter<'static> =
    DoubleToStringConverter::new(DtoaFlags::empty(), Some("inf"), Some("NaN"), 'e', -6, 21, 6, 0);

pub fn criterion_benchmark(c: &mut Criterion) {
    let doubles = random_doubles(1000, 1);
    let coords = coordinates(1000, 2);

    c.bench_function(format!("shortest {} doubles", doubles.len()).as_str(), |b| {
        b.iter(|| {
            for &v in &doubles {
                black_box(double_to_ascii(black_box(v), DtoaMode::Shortest));
            }
        });
    });

    c.bench_function(format!("bignum shortest {} doubles", doubles.len()).as_str(), |b| {
        b.iter(|| {
            for &v in &doubles {
                if v != 0.0 {
                    black_box(bignum_dtoa(black_box(v.abs()), DtoaMode::Shortest));
                }
            }
        });
    });

    c.bench_function(format!("format_coord_shortest {} coords", coords.len()).as_str(), |b| {
        b.iter(|| {
            for &v in &coords {
                black_box(format_coord_shortest(black_box(v)));
            }
        });
    });

    c.bench_function(format!("format_coord_nice {} coords", coords.len()).as_str(), |b| {
        b.iter(|| {
            for &v in &coords {
                black_box(format_coord_nice(black_box(v)));
            }
        });
    });

    c.bench_function(format!("to_precision(17) {} doubles", doubles.len()).as_str(), |b| {
        b.iter(|| {
            for &v in &doubles {
                black_box(CONVERTER.to_precision(black_box(v), 17).unwrap());
            }
        });
    });

    c.bench_function(format!("to_fixed(3) {} coords", coords.len()).as_str(), |b| {
        b.iter(|| {
            for &v in &coords {
                black_box(CONVERTER.to_fixed(black_box(v), 3).unwrap());
            }
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
