use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use pt1_codec::ImageType;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod inspect;
pub mod pack;
pub mod unpack;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert every .pt1 file in a directory to PNG.
    #[command(visible_alias = "pt1topng")]
    Unpack(UnpackArgs),
    /// Convert every .png file in a directory to PT1.
    #[command(visible_alias = "pngtopt1")]
    Pack(PackArgs),
    /// Print the header of a single PT1 file.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Unpack(args) => unpack::run(args, format),
        Command::Pack(args) => pack::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Directory holding .pt1 files.
    pub input: PathBuf,
    /// Directory to write .png files to. Created if missing.
    pub output: PathBuf,
    /// Refuse images whose decoded size exceeds this (e.g. 64MiB, 512KiB, 1048576).
    #[arg(long, value_name = "SIZE", default_value = "256MiB")]
    pub max_size: String,
    /// Reject files whose declared packed payload holds bytes the decoder never consumed.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Directory holding .png files.
    pub input: PathBuf,
    /// Directory to write .pt1 files to. Created if missing.
    pub output: PathBuf,
    /// Pixel layout to write. `auto` picks from each image's color model.
    #[arg(long, value_enum, default_value_t = VariantArg::Auto)]
    pub variant: VariantArg,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PT1 file to read.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// Type 3 for images with alpha, type 1 for grayscale, type 2 otherwise.
    Auto,
    /// Type 0, literal tokens over BGR bytes.
    Raw,
    /// Type 1, one sample per pixel.
    Grayscale,
    /// Type 2, tagged BGR pixels.
    Color,
    /// Type 3, tagged BGR plane plus an alpha plane.
    Alpha,
}

impl VariantArg {
    /// The fixed type this choice maps to, or `None` for `auto`.
    pub fn fixed(self) -> Option<ImageType> {
        match self {
            Self::Auto => None,
            Self::Raw => Some(ImageType::Raw),
            Self::Grayscale => Some(ImageType::Grayscale),
            Self::Color => Some(ImageType::Color),
            Self::Alpha => Some(ImageType::ColorAlpha),
        }
    }
}
