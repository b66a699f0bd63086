use std::fs::File;
use std::io::BufReader;

use bytes::BytesMut;
use pt1_codec::{encode_header, Pt1Header, Pt1Reader};
use serde::Serialize;

use crate::cmd::InspectArgs;
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_raw, OutputFormat};

#[derive(Serialize)]
struct InspectOutput {
    schema_id: &'static str,
    path: String,
    image_type: i32,
    type_name: &'static str,
    bpp: u32,
    width: u32,
    height: u32,
    offset_x: i32,
    offset_y: i32,
    packed_size: u32,
    unpacked_size: u32,
    file_size: u64,
    payload_complete: bool,
    trailing_bytes: u64,
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.path).map_err(|err| io_error("failed to open file", err))?;
    let file_size = file
        .metadata()
        .map_err(|err| io_error("failed to stat file", err))?
        .len();

    let header = Pt1Reader::new(BufReader::new(file))
        .read_header()
        .map_err(|err| codec_error("invalid PT1 file", err))?;

    if let OutputFormat::Raw = format {
        let mut raw = BytesMut::new();
        encode_header(&header, &mut raw);
        print_raw(&raw);
        return Ok(SUCCESS);
    }

    let out = describe(&header, args.path.display().to_string(), file_size);
    print_inspect(&out, format);
    Ok(SUCCESS)
}

fn describe(header: &Pt1Header, path: String, file_size: u64) -> InspectOutput {
    let expected = header.file_size() as u64;
    InspectOutput {
        schema_id: "https://schemas.3leaps.dev/pt1tool/cli/v1/inspect.schema.json",
        path,
        image_type: header.image_type.as_raw(),
        type_name: header.image_type.name(),
        bpp: header.bpp(),
        width: header.width,
        height: header.height,
        offset_x: header.offset_x,
        offset_y: header.offset_y,
        packed_size: header.packed_size,
        unpacked_size: header.unpacked_size,
        file_size,
        payload_complete: file_size >= expected,
        trailing_bytes: file_size.saturating_sub(expected),
    }
}

fn print_inspect(out: &InspectOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty | OutputFormat::Raw => {
            println!("PT1 Header:");
            println!("  File:          {}", out.path);
            println!("  Type:          {} ({})", out.image_type, out.type_name);
            println!("  Bits/pixel:    {}", out.bpp);
            println!("  Dimensions:    {}x{}", out.width, out.height);
            println!("  Offset:        {},{}", out.offset_x, out.offset_y);
            println!("  Packed size:   {}", out.packed_size);
            println!("  Unpacked size: {}", out.unpacked_size);
            if out.payload_complete {
                println!("  File size:     {} (complete)", out.file_size);
            } else {
                println!("  File size:     {} (payload truncated)", out.file_size);
            }
            if out.trailing_bytes > 0 {
                println!("  Trailing:      {} bytes", out.trailing_bytes);
            }
        }
    }
}
