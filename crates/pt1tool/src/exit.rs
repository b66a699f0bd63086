use std::fmt;
use std::io;

use pt1_codec::Pt1Error;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: Pt1Error) -> CliError {
    match err {
        Pt1Error::Io(source) => io_error(context, source),
        Pt1Error::BufferLength { .. } => CliError::new(INTERNAL, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use pt1_codec::HeaderFault;

    use super::*;

    #[test]
    fn codec_errors_map_to_data_invalid() {
        let err = codec_error("inspect", Pt1Error::InvalidHeader(HeaderFault::BadSentinel(0)));
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("inspect: "));

        let err = codec_error(
            "inspect",
            Pt1Error::TruncatedStream {
                offset: 4,
                needed: 28,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn io_errors_keep_their_kind() {
        let err = codec_error(
            "open",
            Pt1Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "nope")),
        );
        assert_eq!(err.code, PERMISSION_DENIED);

        let err = io_error("open", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.code, FAILURE);
        assert_eq!(err.to_string(), "open: gone");
    }
}
