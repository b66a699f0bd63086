mod batch;
mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel, LogSettings};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "pt1tool", version, about = "PT1 <-> PNG batch converter")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        env = "PT1_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "PT1_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Minimum log level for the codec (stderr). Defaults to --log-level.
    #[arg(
        long,
        value_name = "LEVEL",
        env = "PT1_CODEC_LOG_LEVEL",
        global = true
    )]
    codec_log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(LogSettings {
        format: cli.log_format,
        level: cli.log_level,
        codec_level: cli.codec_log_level,
    });

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::VariantArg;

    #[test]
    fn parses_unpack_subcommand() {
        let cli = Cli::try_parse_from([
            "pt1tool",
            "unpack",
            "/tmp/in",
            "/tmp/out",
            "--max-size",
            "64MiB",
            "--strict",
        ])
        .expect("unpack args should parse");

        match cli.command {
            Command::Unpack(args) => {
                assert_eq!(args.max_size, "64MiB");
                assert!(args.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn legacy_mode_names_are_aliases() {
        let cli = Cli::try_parse_from(["pt1tool", "pt1topng", "/tmp/in", "/tmp/out"])
            .expect("pt1topng should parse");
        assert!(matches!(cli.command, Command::Unpack(_)));

        let cli = Cli::try_parse_from(["pt1tool", "pngtopt1", "/tmp/in", "/tmp/out"])
            .expect("pngtopt1 should parse");
        assert!(matches!(cli.command, Command::Pack(_)));
    }

    #[test]
    fn pack_variant_defaults_to_auto() {
        let cli = Cli::try_parse_from(["pt1tool", "pack", "/tmp/in", "/tmp/out"])
            .expect("pack args should parse");
        match cli.command {
            Command::Pack(args) => assert_eq!(args.variant, VariantArg::Auto),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "pt1tool", "pack", "/tmp/in", "/tmp/out", "--variant", "raw",
        ])
        .expect("explicit variant should parse");
        match cli.command {
            Command::Pack(args) => assert_eq!(args.variant, VariantArg::Raw),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_output_dir() {
        let err = Cli::try_parse_from(["pt1tool", "unpack", "/tmp/in"])
            .expect_err("output dir is required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_unknown_variant() {
        let err = Cli::try_parse_from([
            "pt1tool", "pack", "/tmp/in", "/tmp/out", "--variant", "jpeg",
        ])
        .expect_err("unknown variant should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pt1tool",
            "inspect",
            "/tmp/a.pt1",
            "--format",
            "json",
            "--log-level",
            "error",
        ])
        .expect("global flags should parse after the subcommand");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.log_level, LogLevel::Error));
        assert_eq!(cli.codec_log_level, None);
    }

    #[test]
    fn codec_log_level_is_separate() {
        let cli = Cli::try_parse_from([
            "pt1tool",
            "--log-level",
            "warn",
            "--codec-log-level",
            "trace",
            "unpack",
            "/tmp/in",
            "/tmp/out",
        ])
        .expect("codec log level should parse");
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.codec_log_level, Some(LogLevel::Trace));
    }
}
