use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use pt1_codec::{Pt1Header, Pt1Writer};
use pt1_raster::{dynamic_to_pt1, load, select_type, RasterError};

use crate::batch::Batch;
use crate::cmd::{PackArgs, VariantArg};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

const PACK: Batch = Batch {
    mode: "pack",
    input_ext: "png",
    output_ext: "pt1",
};

pub fn run(args: PackArgs, format: OutputFormat) -> CliResult<i32> {
    let report = PACK.run(&args.input, &args.output, |input, output| {
        pack_file(input, output, args.variant)
    })?;

    print_report(&report, format);
    Ok(SUCCESS)
}

fn pack_file(input: &Path, output: &Path, variant: VariantArg) -> Result<Pt1Header, RasterError> {
    let img = load(input)?;
    let image_type = variant.fixed().unwrap_or_else(|| select_type(&img));
    let image = dynamic_to_pt1(&img, image_type)?;

    // Convert before creating the output so an unreadable input leaves no empty file behind.
    let file = File::create(output)?;
    let mut writer = Pt1Writer::new(BufWriter::new(file));
    Ok(writer.write_image(&image)?)
}
