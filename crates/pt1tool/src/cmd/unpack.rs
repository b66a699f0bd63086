use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use pt1_codec::{CodecConfig, Pt1Header, Pt1Reader};
use pt1_raster::{save_png, PixelBuffer, RasterError};

use crate::batch::Batch;
use crate::cmd::UnpackArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_report, OutputFormat};

const UNPACK: Batch = Batch {
    mode: "unpack",
    input_ext: "pt1",
    output_ext: "png",
};

pub fn run(args: UnpackArgs, format: OutputFormat) -> CliResult<i32> {
    let config = CodecConfig {
        max_unpacked_size: parse_size(&args.max_size)?,
        strict_packed_size: args.strict,
    };

    let report = UNPACK.run(&args.input, &args.output, |input, output| {
        unpack_file(input, output, &config)
    })?;

    print_report(&report, format);
    Ok(SUCCESS)
}

fn unpack_file(input: &Path, output: &Path, config: &CodecConfig) -> Result<Pt1Header, RasterError> {
    let file = File::open(input)?;
    let image = Pt1Reader::with_config(BufReader::new(file), *config).read_image()?;
    let header = image.header;
    save_png(&PixelBuffer::from_pt1(image)?, output)?;
    Ok(header)
}

/// Parse a byte count with an optional `K`/`M`/`G` suffix (binary multiples, `iB`/`B` optional).
fn parse_size(input: &str) -> CliResult<usize> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "size must not be empty"));
    }

    let digits = input.find(|c: char| !c.is_ascii_digit()).unwrap_or(input.len());
    let (number, unit) = input.split_at(digits);
    let shift = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 0,
        "K" | "KB" | "KIB" => 10,
        "M" | "MB" | "MIB" => 20,
        "G" | "GB" | "GIB" => 30,
        other => {
            return Err(CliError::new(
                USAGE,
                format!("unsupported size unit: {other}"),
            ))
        }
    };

    let value: usize = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid size value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "size must be greater than zero"));
    }

    value
        .checked_mul(1usize << shift)
        .ok_or_else(|| CliError::new(USAGE, format!("size out of range: {input}")))
}
