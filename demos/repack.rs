//! Reads bytes from stdin and prints them regrouped into fields of the width given as the first
//! argument, one field per line.

use std::io::{self, BufWriter, Read, Write};

use lzwpack::bits::BitPacker;

fn main() {
    match (|| -> io::Result<()> {
        let width = parse_width(std::env::args().nth(1))?;
        let invalid = |err: lzwpack::PackError| io::Error::new(io::ErrorKind::InvalidInput, err);

        let mut data = vec![];
        io::stdin().read_to_end(&mut data)?;

        let mut packer = BitPacker::new(8, width).map_err(invalid)?;
        for &byte in &data {
            packer.pack(byte.into()).map_err(invalid)?;
        }

        let stdout = io::stdout();
        let mut stdout = BufWriter::new(stdout.lock());
        for field in packer {
            writeln!(stdout, "{}", field)?;
        }
        stdout.flush()
    })() {
        Ok(()) => (),
        Err(err) => eprintln!("{}", err),
    }
}

fn parse_width(arg: Option<String>) -> io::Result<u8> {
    match arg {
        None => Ok(9),
        Some(arg) => arg.parse::<u8>().map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid width {:?}: {}", arg, err),
            )
        }),
    }
}
