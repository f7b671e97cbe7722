use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use srec::decoder::Decoder;
use srec::encoder::{encode, MAX_BYTES_PER_LINE};
use srec::MemoryImage;
use std::fs::File;
use std::io::{self, Read, Write};

/// Read, merge and rewrite Motorola S-record files.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// S-record file to be read. The standard input is used when '-' is
    /// given instead of a file name.
    file: String,

    /// Optional second S-record file merged over the first one. For an
    /// address present on both inputs, the value from this file wins.
    #[arg(short = 'm', long)]
    merge: Option<String>,

    /// Place the output into the given <OUT> file. The standard output is
    /// used when this flag is not given.
    #[arg(short = 'o', long)]
    out: Option<String>,

    /// First address to be kept on output, as an hexadecimal number.
    /// Defaults to the lowest address present on the inputs.
    #[arg(short = 's', long)]
    start: Option<String>,

    /// Last address to be kept on output, as an hexadecimal number. Defaults
    /// to the highest address present on the inputs. Ignored if the `size`
    /// flag is given.
    #[arg(short = 'e', long)]
    end: Option<String>,

    /// Amount of bytes to be kept on output, counting from the start
    /// address. Takes precedence over the `end` flag.
    #[arg(long)]
    size: Option<u32>,

    /// Fill the gaps inside of the output range with the given byte, as an
    /// hexadecimal number (e.g. 'FF').
    #[arg(short = 'f', long)]
    fill: Option<String>,

    /// Maximum amount of data bytes on each output line.
    #[arg(short = 'b', long, default_value_t = 16)]
    bpl: usize,

    /// Verify record checksums and print progress information.
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Validate the flags which the codec treats as caller contracts.
    if args.bpl < 1 || args.bpl > MAX_BYTES_PER_LINE {
        bail!("the '-b/--bpl' flag accepts values between 1 and {MAX_BYTES_PER_LINE}");
    }
    let fill = match &args.fill {
        Some(value) => match u8::from_str_radix(value, 16) {
            Ok(value) => Some(value),
            Err(_) => bail!("the '-f/--fill' flag expects an hexadecimal byte value"),
        },
        None => None,
    };

    // Import the data from the given input files. For overlapping addresses
    // the file that came last wins.
    let mut decoder = Decoder::new(args.verbose);
    let mut image = read_image(&mut decoder, &args.file, args.verbose)?;
    if let Some(file) = &args.merge {
        image.extend(read_image(&mut decoder, file, args.verbose)?);
    }

    // Keep only the requested address range, and optionally fill the gaps
    // inside of it.
    if let Some((start, end)) = output_range(&args, &image)? {
        image.retain(|address, _| (start..=end).contains(address));
        if let Some(value) = fill {
            for address in start..=end {
                image.entry(address).or_insert(value);
            }
        }
    }

    // Select the output stream and dump the result into it.
    let mut output: Box<dyn Write> = match &args.out {
        Some(file) => {
            if args.verbose {
                eprintln!("creating: {file}");
            }
            Box::new(File::create(file).with_context(|| format!("failed to create '{file}'"))?)
        }
        None => Box::new(io::stdout()),
    };
    for line in encode(&image, args.bpl) {
        writeln!(output, "{line}")?;
    }

    Ok(())
}

// Decode the S-record file at the given `path` ('-' refers to the standard
// input) into a memory image, reporting the checksum warnings that came out
// of it.
fn read_image(decoder: &mut Decoder, path: &str, verbose: bool) -> Result<MemoryImage> {
    if verbose {
        eprintln!("reading: {path}");
    }

    let input: Box<dyn Read> = if path == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(path).with_context(|| format!("failed to open '{path}'"))?)
    };

    let image = decoder
        .decode(input)
        .with_context(|| format!("failed to decode '{path}'"))?;
    for warning in decoder.warnings() {
        eprintln!("warning: {warning}");
    }

    Ok(image)
}

// Returns the first and the last addresses to be kept on output, or None
// when there is nothing to select at all: no explicit bounds were given and
// the inputs came out empty.
fn output_range(args: &Args, image: &MemoryImage) -> Result<Option<(u32, u32)>> {
    if image.is_empty() && args.start.is_none() && args.end.is_none() && args.size.is_none() {
        return Ok(None);
    }

    let start = match &args.start {
        Some(value) => parse_address(value, "-s/--start")?,
        None => image.keys().next().copied().unwrap_or(0),
    };
    let end = match args.size {
        Some(0) => bail!("the '--size' flag requires a value greater than zero"),
        Some(size) => match start.checked_add(size - 1) {
            Some(end) => end,
            None => bail!("the requested size runs past the last representable address"),
        },
        None => match &args.end {
            Some(value) => parse_address(value, "-e/--end")?,
            None => image.keys().next_back().copied().unwrap_or(start),
        },
    };

    Ok(Some((start, end)))
}

// Parse the given hex `value` for the flag named by `flag`.
fn parse_address(value: &str, flag: &str) -> Result<u32> {
    match u32::from_str_radix(value.trim_start_matches("0x"), 16) {
        Ok(address) => Ok(address),
        Err(_) => bail!("the '{flag}' flag expects an hexadecimal address"),
    }
}
