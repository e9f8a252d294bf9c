use std::{
    env,
    io::{self, Read},
    process,
};

use dc_convert::{
    format_coord_nice, format_coord_shortest, DoubleToStringConverter, DtoaFlags, FormatError,
    StringToDoubleConverter, StrtodFlags,
};
use tracing::debug;

const DEFAULT_DIGITS: i32 = 6;

static CONVERTER: DoubleToStringConverter<'static> = DoubleToStringConverter::new(
    DtoaFlags::EMIT_POSITIVE_EXPONENT_SIGN,
    Some("Infinity"),
    Some("NaN"),
    'e',
    -6,
    21,
    6,
    0,
);

fn usage() {
    println!(
        r"

USAGE:
dc [OPTIONS] VALUE...

DESCRIPTION:
dc converts decimal numbers to doubles and prints them back in the requested notation.
a single '-' reads whitespace separated values from stdin.

OPTIONS:
    -h, --help          Display this message
    -V, --version       Print version information
    -m, --mode MODE     [shortest|nice|coord|fixed|exponential|precision|parse], default coord
    -d, --digits N      digit count for fixed, exponential and precision
        --hex           accept 0x prefixed hexadecimal values
        --octal         accept leading zero octal values

ENVIRONMENT:
    DC_LOG              tracing filter directives, e.g. DC_LOG=trace
"
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Shortest,
    Nice,
    Coord,
    Fixed,
    Exponential,
    Precision,
    Parse,
}

impl Mode {
    fn from_name(name: &str) -> Option<Mode> {
        Some(match name {
            "shortest" => Mode::Shortest,
            "nice" => Mode::Nice,
            "coord" => Mode::Coord,
            "fixed" => Mode::Fixed,
            "exponential" => Mode::Exponential,
            "precision" => Mode::Precision,
            "parse" => Mode::Parse,
            _ => return None,
        })
    }
}

struct Options {
    mode: Mode,
    digits: i32,
    parser: StringToDoubleConverter<'static>,
    values: Vec<String>,
}

fn handle_options(args: &[String]) -> Result<Option<Options>, String> {
    if args.is_empty() {
        usage();
        return Ok(None);
    }

    let mut options = getopts::Options::new();
    options.optflag("h", "help", "display this message and exit");
    options.optflag("V", "version", "print version information and exit");
    options.optopt("m", "mode", "output notation", "MODE");
    options.optopt("d", "digits", "digit count", "N");
    options.optflag("", "hex", "accept hexadecimal input");
    options.optflag("", "octal", "accept octal input");

    let matches = options.parse(args).map_err(|e| e.to_string())?;

    if matches.opt_present("help") {
        usage();
        return Ok(None);
    }

    if matches.opt_present("version") {
        println!("dc {}", env!("CARGO_PKG_VERSION"));
        return Ok(None);
    }

    let mode = match matches.opt_str("mode") {
        Some(name) => Mode::from_name(&name).ok_or_else(|| format!("unknown mode {:?}", name))?,
        None => Mode::Coord,
    };
    let digits = match matches.opt_str("digits") {
        Some(digits) => digits
            .parse::<i32>()
            .map_err(|e| format!("invalid digit count {:?}: {}", digits, e))?,
        None => DEFAULT_DIGITS,
    };

    let mut flags = StrtodFlags::ALLOW_LEADING_SPACES | StrtodFlags::ALLOW_TRAILING_SPACES;
    flags.set(StrtodFlags::ALLOW_HEX, matches.opt_present("hex"));
    flags.set(StrtodFlags::ALLOW_OCTALS, matches.opt_present("octal"));
    let parser = StringToDoubleConverter::new(flags, 0.0, f64::NAN, Some("inf"), Some("NaN"));

    Ok(Some(Options {
        mode,
        digits,
        parser,
        values: matches.free,
    }))
}

fn make_input(free_matches: Vec<String>) -> Result<Vec<String>, String> {
    if free_matches.len() == 1 && free_matches[0] == "-" {
        let mut src = String::new();
        io::stdin()
            .read_to_string(&mut src)
            .map_err(|e| format!("could not read stdin: {}", e))?;
        return Ok(src.split_whitespace().map(str::to_owned).collect());
    }
    Ok(free_matches)
}

fn convert(options: &Options, text: &str) -> Result<String, String> {
    let (value, processed) = options
        .parser
        .try_string_to_double(text)
        .map_err(|e| format!("{:?}: {}", text, e))?;
    debug!(text, value, processed, mode = ?options.mode, "parsed input");

    let formatted: Result<String, FormatError> = match options.mode {
        Mode::Shortest => CONVERTER.to_shortest(value),
        Mode::Nice => Ok(format_coord_nice(value)),
        Mode::Coord => Ok(format_coord_shortest(value)),
        Mode::Fixed => CONVERTER.to_fixed(value, options.digits),
        Mode::Exponential => CONVERTER.to_exponential(value, options.digits),
        Mode::Precision => CONVERTER.to_precision(value, options.digits),
        Mode::Parse => Ok(format!("{}\t{}", format_coord_nice(value), processed)),
    };
    formatted.map_err(|e| format!("{:?}: {}", text, e))
}

fn main() {
    if let Err(e) = dc_tracing::init_tracing() {
        eprintln!("could not install logging: {}", e);
    }

    let args: Vec<String> = env::args_os()
        .enumerate()
        .map(|(i, arg)| {
            arg.into_string()
                .unwrap_or_else(|arg| panic!("argument {} is not valid Unicode: {:?}", i, arg))
        })
        .skip(1)
        .collect();

    let mut options = match handle_options(&args) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let values = match make_input(std::mem::take(&mut options.values)) {
        Ok(values) => values,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let mut failed = false;
    for text in &values {
        match convert(&options, text) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("error: {}", e);
                failed = true;
            }
        }
    }
    if failed {
        process::exit(1);
    }
}
