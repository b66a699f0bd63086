//! Stderr logging for the CLI.
//!
//! `--log-level` governs the tool and the raster layer. The codec emits a `trace!` per control
//! byte, so it gets its own level (`--codec-log-level`) that falls back to `--log-level`.

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

const CODEC_TARGET: &str = "pt1_codec";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct LogSettings {
    pub format: LogFormat,
    pub level: LogLevel,
    pub codec_level: Option<LogLevel>,
}

impl LogSettings {
    fn targets(&self) -> Targets {
        let codec = self.codec_level.unwrap_or(self.level);
        Targets::new()
            .with_default(LevelFilter::from(self.level))
            .with_target(CODEC_TARGET, LevelFilter::from(codec))
    }
}

pub fn init_logging(settings: LogSettings) {
    // Codec events are only told apart from tool events when their level is set separately.
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(settings.codec_level.is_some());
    let targets = settings.targets();

    let _ = match settings.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_filter(targets))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_filter(targets))
            .try_init(),
    };
}
