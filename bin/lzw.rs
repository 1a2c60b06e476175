#![forbid(unsafe_code)]
use std::path::PathBuf;
use std::{env, ffi, fs, io};

use lzwpack::encode::{Encoder, MAX_CODE_SIZE_LIMIT};
use lzwpack::MIN_CODE_SIZE;

fn main() -> CodingResult {
    CodingResult::catch_panic(|| run_coding(Flags::from_args(env::args_os())))
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let limit = flags.limit;
    let encoder = || match limit {
        None => Ok(Encoder::new()),
        Some(limit) => Encoder::with_code_size_limit(limit)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err)),
    };

    let out = io::stdout();
    let out = out.lock();

    match (flags.input, flags.operation) {
        (Input::File(file), Operation::Encode) => {
            let data = fs::File::open(file)?;
            let file = io::BufReader::with_capacity(1 << 20, data);

            let mut encoder = encoder()?;
            encoder.into_stream(out).encode_all(file).status
        }
        (Input::Stdin, Operation::Encode) => {
            let input = io::BufReader::with_capacity(1 << 20, io::stdin());
            let mut encoder = encoder()?;
            encoder.into_stream(out).encode_all(input).status
        }
        (Input::File(file), Operation::Decode) => {
            let data = fs::read(file)?;
            decode(&data)
        }
        (Input::Stdin, Operation::Decode) => {
            let mut data = vec![];
            io::Read::read_to_end(&mut io::stdin(), &mut data)?;
            decode(&data)
        }
    }
}

fn decode(data: &[u8]) -> Result<(), io::Error> {
    let decoded = lzwpack::decode(data)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    io::Write::write_all(&mut io::stdout(), &decoded)
}

#[derive(Debug)]
struct Flags {
    input: Input,
    operation: Operation,
    limit: Option<u8>,
}

#[derive(Debug, PartialEq)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug, PartialEq)]
enum Operation {
    Encode,
    Decode,
}

fn command() -> clap::Command<'static> {
    clap::Command::new("lzw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pack data into PDF-style LZW code streams")
        .arg(
            clap::Arg::new("decode")
                .short('d')
                .long("decode")
                .help("Decode the input")
                .takes_value(false),
        )
        .arg(
            clap::Arg::new("encode")
                .short('e')
                .long("encode")
                .help("Encode the input (default)")
                .takes_value(false),
        )
        .group(
            clap::ArgGroup::new("operation")
                .args(&["decode", "encode"])
                .multiple(false),
        )
        .arg(
            clap::Arg::new("limit")
                .short('l')
                .long("limit")
                .value_name("BITS")
                .help("Reset the code table before codes exceed BITS, 9 to 32")
                .takes_value(true)
                .value_parser(
                    clap::value_parser!(u8)
                        .range(i64::from(MIN_CODE_SIZE)..=i64::from(MAX_CODE_SIZE_LIMIT)),
                ),
        )
        .arg(
            clap::Arg::new("file")
                .help("File path, or '-' for stdin")
                .default_value("-")
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
}

impl Flags {
    /// Parse the command line, exiting with a usage message on bad arguments.
    fn from_args(args: impl IntoIterator<Item = ffi::OsString>) -> Self {
        Flags::from_matches(&command().get_matches_from(args))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        let operation = if matches.contains_id("decode") {
            Operation::Decode
        } else {
            Operation::Encode
        };

        let input = match matches.get_one::<PathBuf>("file") {
            Some(path) if path.as_os_str() != "-" => Input::File(path.clone()),
            _ => Input::Stdin,
        };

        Flags {
            input,
            operation,
            limit: matches.get_one::<u8>("limit").copied(),
        }
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("{}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}
