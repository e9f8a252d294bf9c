use std::fs;

use dc_convert::{
    format_coord_nice, format_coord_shortest, parse_coord, DoubleToStringConverter, DtoaFlags, FormatError,
    ParseError, SpecialValue, StringToDoubleConverter, StrtodFlags,
};
use dc_dtoa::fast_dtoa;
use rand::{rngs::StdRng, Rng, SeedableRng};
use similar::{ChangeTag, TextDiff};

const ROUND_TRIP: DoubleToStringConverter<'static> = DoubleToStringConverter::new(
    DtoaFlags::EMIT_POSITIVE_EXPONENT_SIGN,
    Some("Infinity"),
    Some("NaN"),
    'e',
    -6,
    21,
    6,
    0,
);

fn random_finite(rng: &mut StdRng) -> f64 {
    loop {
        let v = f64::from_bits(rng.random::<u64>());
        if v.is_finite() {
            return v;
        }
    }
}

fn render_coord(v: f64) -> String {
    format!("{}\t{}", format_coord_shortest(v), format_coord_nice(v))
}

fn render_converters(v: f64) -> String {
    let results = [
        ROUND_TRIP.to_shortest(v),
        ROUND_TRIP.to_fixed(v, 2),
        ROUND_TRIP.to_exponential(v, 3),
        ROUND_TRIP.to_exponential(v, -1),
        ROUND_TRIP.to_precision(v, 4),
    ];
    results
        .iter()
        .map(|result| match result {
            Ok(text) => text.clone(),
            Err(error) => format!("error: {}", error),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

macro_rules! fixture {
    ($f: ident, $render: ident) => {
        #[test]
        fn $f() {
            let input = concat!("tests/fixtures/", stringify!($f), ".txt");
            let fixture = concat!("tests/fixtures/", stringify!($f), ".fixture.txt");
            let t: String = fs::read_to_string(input)
                .unwrap()
                .lines()
                .map(|line| format!("{}\t{}\n", line, $render(line.parse::<f64>().unwrap())))
                .collect();

            if let Ok(fixture_src) = fs::read_to_string(fixture) {
                let mut failed = false;
                let diff = TextDiff::from_lines(&fixture_src, &t);
                for change in diff.iter_all_changes() {
                    let sign = match change.tag() {
                        ChangeTag::Delete => {
                            failed = true;
                            "-"
                        }
                        ChangeTag::Insert => {
                            failed = true;
                            "+"
                        }
                        ChangeTag::Equal => " ",
                    };
                    print!("{}{}", sign, change);
                }

                if failed {
                    panic!("FAIL");
                }
            } else {
                fs::write(fixture, t).unwrap();
            }
        }
    };
}

fixture!(coords, render_coord);
fixture!(converters, render_converters);

#[test]
fn coordinate_scenarios() {
    assert_eq!(format_coord_shortest(100.0), "100");
    assert_eq!(format_coord_shortest(0.0001), ".0001");

    let text = format_coord_shortest(123_456_789_012_345.0);
    assert_eq!(text, "123456789012345");
    assert_eq!(parse_coord(&text), 123_456_789_012_345.0);
}

#[test]
fn fixed_with_trailing_point_and_zero() {
    let converter = DoubleToStringConverter::new(
        DtoaFlags::EMIT_TRAILING_DECIMAL_POINT | DtoaFlags::EMIT_TRAILING_ZERO_AFTER_POINT,
        None,
        None,
        'e',
        -6,
        21,
        0,
        0,
    );
    assert_eq!(converter.to_fixed(3.0, 0).unwrap(), "3.0");
    assert_eq!(converter.to_fixed(2.5, 0).unwrap(), "3.0");
    assert_eq!(converter.to_fixed(3.25, 1).unwrap(), "3.3");
    assert_eq!(converter.to_shortest(7.0).unwrap(), "7.0");
}

#[test]
fn hex_parsing() {
    let converter = StringToDoubleConverter::new(StrtodFlags::ALLOW_HEX, 0.0, f64::NAN, None, None);
    assert_eq!(converter.string_to_double("0x1A"), (26.0, 4));
    assert_eq!(converter.string_to_double("-0X1a"), (-26.0, 5));
    assert_eq!(converter.string_to_double("0x20000000000003"), (9_007_199_254_740_996.0, 16));
    assert_eq!(converter.string_to_double("-0x20000000000003"), (-9_007_199_254_740_996.0, 17));
    assert!(converter.string_to_double("0x").0.is_nan());
    assert!(converter.string_to_double("0xg").0.is_nan());
    assert!(converter.string_to_double("0x1.8").0.is_nan());

    let decimal_only = StringToDoubleConverter::new(StrtodFlags::empty(), 0.0, f64::NAN, None, None);
    assert!(decimal_only.string_to_double("0x1A").0.is_nan());
}

#[test]
fn octal_parsing() {
    let converter = StringToDoubleConverter::new(StrtodFlags::ALLOW_OCTALS, 0.0, f64::NAN, None, None);
    assert_eq!(converter.string_to_double("017"), (15.0, 3));
    assert_eq!(converter.string_to_double("-0755"), (-493.0, 5));
    // a digit above 7 makes it decimal
    assert_eq!(converter.string_to_double("019"), (19.0, 3));
    assert_eq!(converter.string_to_double("019.5"), (19.5, 5));
    assert!(converter.string_to_double("017.5").0.is_nan());
    assert!(converter.string_to_double("017e2").0.is_nan());
}

#[test]
fn spaces_and_junk() {
    let strict = StringToDoubleConverter::new(StrtodFlags::empty(), -1.0, f64::NAN, None, None);
    assert_eq!(strict.string_to_double(""), (-1.0, 0));
    assert!(strict.string_to_double(" 1").0.is_nan());
    assert!(strict.string_to_double("1 ").0.is_nan());
    assert!(strict.string_to_double("- 1").0.is_nan());
    assert!(strict.string_to_double("1x").0.is_nan());
    assert!(strict.string_to_double(".").0.is_nan());
    assert!(strict.string_to_double("e5").0.is_nan());
    assert!(strict.string_to_double("1e").0.is_nan());
    assert!(strict.string_to_double("1e+").0.is_nan());
    assert_eq!(strict.string_to_double("1."), (1.0, 2));
    assert_eq!(strict.string_to_double(".5"), (0.5, 2));
    assert_eq!(strict.string_to_double("0."), (0.0, 2));
    assert_eq!(strict.string_to_double("+1.5E-3"), (1.5e-3, 7));

    let lenient = StringToDoubleConverter::new(
        StrtodFlags::ALLOW_LEADING_SPACES | StrtodFlags::ALLOW_TRAILING_SPACES | StrtodFlags::ALLOW_SPACES_AFTER_SIGN,
        -1.0,
        f64::NAN,
        None,
        None,
    );
    assert_eq!(lenient.string_to_double(" \t- 1.5 \n"), (-1.5, 9));
    assert_eq!(lenient.string_to_double("   "), (-1.0, 3));
    assert!(lenient.string_to_double("1 2").0.is_nan());

    let junk = StringToDoubleConverter::new(StrtodFlags::ALLOW_TRAILING_JUNK, 0.0, f64::NAN, None, None);
    assert_eq!(junk.string_to_double("12px"), (12.0, 2));
    assert_eq!(junk.string_to_double("1.5e"), (1.5, 4));
    assert_eq!(junk.string_to_double("2e+x"), (2.0, 3));
    assert!(junk.string_to_double("px").0.is_nan());
}

#[test]
fn symbols() {
    let converter = StringToDoubleConverter::new(
        StrtodFlags::ALLOW_TRAILING_SPACES,
        0.0,
        0.0,
        Some("Infinity"),
        Some("NaN"),
    );
    assert_eq!(converter.string_to_double("Infinity"), (f64::INFINITY, 8));
    assert_eq!(converter.string_to_double("-Infinity  "), (f64::NEG_INFINITY, 11));
    let (value, processed) = converter.string_to_double("NaN");
    assert!(value.is_nan());
    assert_eq!(processed, 3);
    assert_eq!(converter.string_to_double("Infinit"), (0.0, 0));
    assert_eq!(converter.string_to_double("inf"), (0.0, 0));
}

#[test]
fn errors_instead_of_sentinels() {
    let converter = StringToDoubleConverter::new(StrtodFlags::ALLOW_LEADING_SPACES, 0.0, f64::NAN, None, None);
    assert_eq!(converter.try_string_to_double("  "), Err(ParseError::Empty { processed: 2 }));
    assert_eq!(converter.try_string_to_double(""), Err(ParseError::Empty { processed: 0 }));
    assert_eq!(converter.try_string_to_double("abc"), Err(ParseError::Junk));
    assert_eq!(converter.try_string_to_double(" 25"), Ok((25.0, 3)));
}

#[test]
fn long_and_extreme_inputs() {
    let converter = StringToDoubleConverter::new(StrtodFlags::empty(), 0.0, f64::NAN, None, None);

    let mut long = "1".to_owned();
    long.push_str(&"0".repeat(1000));
    long.push_str("1e-1001");
    assert_eq!(converter.string_to_double(&long).0, 1.0);

    let mut tiny = "0.".to_owned();
    tiny.push_str(&"0".repeat(400));
    tiny.push('1');
    assert_eq!(converter.string_to_double(&tiny).0, 0.0);

    let (value, _) = converter.string_to_double("1e99999999999999");
    assert_eq!(value, f64::INFINITY);
    let (value, _) = converter.string_to_double("-1e-99999999999999");
    assert!(value == 0.0 && value.is_sign_negative());
    assert!(converter.string_to_double("-0").0.is_sign_negative());
}

#[test]
fn parse_coord_boundaries() {
    assert_eq!(parse_coord(""), 0.0);
    assert!(parse_coord("not a number").is_nan());
    assert_eq!(parse_coord("inf"), f64::INFINITY);
    assert_eq!(parse_coord("-inf"), f64::NEG_INFINITY);
    assert!(parse_coord("NaN").is_nan());
    assert_eq!(parse_coord("  - 2.5  "), -2.5);
    assert_eq!(parse_coord(".0001"), 0.0001);
    assert_eq!(parse_coord("125e-9"), 1.25e-7);
}

#[test]
fn format_errors() {
    assert_eq!(
        ROUND_TRIP.to_fixed(1.0, 61),
        Err(FormatError::DigitsOutOfRange { requested: 61, min: 0, max: 60 })
    );
    assert_eq!(
        ROUND_TRIP.to_fixed(1.0, -1),
        Err(FormatError::DigitsOutOfRange { requested: -1, min: 0, max: 60 })
    );
    assert_eq!(ROUND_TRIP.to_fixed(-1e60, 0), Err(FormatError::TooLarge(-1e60)));
    assert!(ROUND_TRIP.to_fixed(9.99e59, 0).is_ok());
    assert!(ROUND_TRIP.to_exponential(1.0, -2).is_err());
    assert!(ROUND_TRIP.to_exponential(1.0, 121).is_err());
    assert!(ROUND_TRIP.to_precision(1.0, 0).is_err());
    assert!(ROUND_TRIP.to_precision(1.0, 121).is_err());
    assert_eq!(ROUND_TRIP.to_fixed(1.0, 60).unwrap().len(), 62);

    let bare = DoubleToStringConverter::new(DtoaFlags::empty(), None, None, 'e', -6, 21, 0, 0);
    assert_eq!(bare.to_shortest(f64::NAN), Err(FormatError::MissingSymbol(SpecialValue::NaN)));
    assert_eq!(
        bare.to_precision(f64::NEG_INFINITY, 3),
        Err(FormatError::MissingSymbol(SpecialValue::Infinity))
    );
}

#[test]
fn precision_padding_limits() {
    let converter = DoubleToStringConverter::new(DtoaFlags::empty(), None, None, 'e', -6, 21, 2, 1);
    assert_eq!(converter.to_precision(0.0123, 2).unwrap(), "0.012");
    assert_eq!(converter.to_precision(0.00123, 2).unwrap(), "1.2e-3");
    assert_eq!(converter.to_precision(120.0, 2).unwrap(), "120");
    assert_eq!(converter.to_precision(1200.0, 2).unwrap(), "1.2e3");
    assert_eq!(converter.to_precision(0.5, 3).unwrap(), "0.500");
}

#[test]
fn grisu_fallback_matches_reference() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut fallbacks = 0;
    while fallbacks < 25 {
        let v = random_finite(&mut rng).abs();
        if v == 0.0 || fast_dtoa::shortest(v).is_some() {
            continue;
        }
        fallbacks += 1;
        let text = ROUND_TRIP.to_exponential(v, -1).unwrap();
        assert_eq!(text.replace("e+", "e"), format!("{:e}", v));
        assert_eq!(parse_coord(&format_coord_shortest(v)).to_bits(), v.to_bits());
    }
}

#[test]
fn coordinates_round_trip() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..50_000 {
        let v = random_finite(&mut rng);
        let shortest = format_coord_shortest(v);
        assert_eq!(parse_coord(&shortest).to_bits(), v.to_bits(), "{}", shortest);
        let nice = format_coord_nice(v);
        let reparsed = parse_coord(&nice);
        assert_eq!(reparsed, v, "{}", nice);
        assert_eq!(format_coord_nice(reparsed), nice);
    }
}

#[test]
fn shortest_is_shortest() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20_000 {
        let v = random_finite(&mut rng);
        let ours = ROUND_TRIP.to_exponential(v, -1).unwrap();
        assert_eq!(ours.replace("e+", "e"), format!("{:e}", v));
    }
}

#[test]
fn random_text_matches_std_parser() {
    let converter = StringToDoubleConverter::new(StrtodFlags::empty(), 0.0, f64::NAN, None, None);
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20_000 {
        let integral: String = (0..rng.random_range(0..12))
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        let fractional: String = (0..rng.random_range(1..12))
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        let text = format!("{}.{}e{}", integral, fractional, rng.random_range(-330..330));
        let expected = text.parse::<f64>().unwrap();
        assert_eq!(converter.string_to_double(&text), (expected, text.len()), "{}", text);
    }
}
