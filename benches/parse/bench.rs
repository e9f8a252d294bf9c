#![allow(clippy::missing_panics_doc)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dc_benches::{coordinates, random_doubles};
use dc_convert::{format_coord_shortest, parse_coord, DoubleToStringConverter, DtoaFlags};

const CONVERTER: DoubleToStringConverter<'static> =
    DoubleToStringConverter::new(DtoaFlags::empty(), Some("inf"), Some("NaN"), 'e', -6, 21, 6, 0);

pub fn criterion_benchmark(c: &mut Criterion) {
    let shortest: Vec<String> = random_doubles(1000, 3)
        .into_iter()
        .map(|v| CONVERTER.to_shortest(v).unwrap())
        .collect();
    let long: Vec<String> = random_doubles(1000, 4)
        .into_iter()
        .map(|v| CONVERTER.to_precision(v, 25).unwrap())
        .collect();
    let coords: Vec<String> = coordinates(1000, 5)
        .into_iter()
        .map(format_coord_shortest)
        .collect();

    c.bench_function(format!("parse {} shortest", shortest.len()).as_str(), |b| {
        b.iter(|| {
            for text in &shortest {
                black_box(parse_coord(black_box(text)));
            }
        });
    });

    c.bench_function(format!("parse {} with 25 digits", long.len()).as_str(), |b| {
        b.iter(|| {
            for text in &long {
                black_box(parse_coord(black_box(text)));
            }
        });
    });

    c.bench_function(format!("parse {} coords", coords.len()).as_str(), |b| {
        b.iter(|| {
            for text in &coords {
                black_box(parse_coord(black_box(text)));
            }
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
