//! Directory-at-a-time conversion shared by `unpack` and `pack`.
//!
//! Only the top level of the input directory is scanned. A file that fails to convert is
//! logged and recorded in the report; the rest of the batch still runs.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use pt1_codec::Pt1Header;
use pt1_raster::RasterError;
use serde::Serialize;
use tracing::{info, warn};

use crate::exit::{io_error, CliError, CliResult, USAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Converted,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Converted => "converted",
            Self::Failed => "failed",
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub input: String,
    pub output: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub schema_id: &'static str,
    pub mode: &'static str,
    pub input_dir: String,
    pub output_dir: String,
    pub converted: usize,
    pub failed: usize,
    pub files: Vec<FileOutcome>,
}

/// One direction of conversion.
#[derive(Debug, Clone, Copy)]
pub struct Batch {
    pub mode: &'static str,
    pub input_ext: &'static str,
    pub output_ext: &'static str,
}

impl Batch {
    /// Convert every matching file in `input_dir` into `output_dir`.
    ///
    /// `convert` is handed the input path and the output path and returns the header of the
    /// PT1 side of the conversion.
    pub fn run<F>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        mut convert: F,
    ) -> CliResult<BatchReport>
    where
        F: FnMut(&Path, &Path) -> Result<Pt1Header, RasterError>,
    {
        if !input_dir.is_dir() {
            return Err(CliError::new(
                USAGE,
                format!("input directory not found: {}", input_dir.display()),
            ));
        }
        std::fs::create_dir_all(output_dir)
            .map_err(|err| io_error("failed to create output directory", err))?;

        let inputs = collect_inputs(input_dir, self.input_ext)
            .map_err(|err| io_error("failed to list input directory", err))?;
        info!(
            mode = self.mode,
            count = inputs.len(),
            input = %input_dir.display(),
            "starting batch"
        );

        let mut report = BatchReport {
            schema_id: "https://schemas.3leaps.dev/pt1tool/cli/v1/batch-report.schema.json",
            mode: self.mode,
            input_dir: input_dir.display().to_string(),
            output_dir: output_dir.display().to_string(),
            converted: 0,
            failed: 0,
            files: Vec::with_capacity(inputs.len()),
        };

        for input in inputs {
            let output = output_path(&input, output_dir, self.output_ext);
            let outcome = match convert(&input, &output) {
                Ok(header) => {
                    info!(
                        file = %input.display(),
                        image_type = header.image_type.as_raw(),
                        width = header.width,
                        height = header.height,
                        "converted"
                    );
                    report.converted += 1;
                    FileOutcome {
                        input: input.display().to_string(),
                        output: output.display().to_string(),
                        status: Status::Converted,
                        image_type: Some(header.image_type.to_string()),
                        width: Some(header.width),
                        height: Some(header.height),
                        error: None,
                    }
                }
                Err(err) => {
                    warn!(file = %input.display(), error = %err, "conversion failed");
                    report.failed += 1;
                    FileOutcome {
                        input: input.display().to_string(),
                        output: output.display().to_string(),
                        status: Status::Failed,
                        image_type: None,
                        width: None,
                        height: None,
                        error: Some(err.to_string()),
                    }
                }
            };
            report.files.push(outcome);
        }

        info!(
            mode = self.mode,
            converted = report.converted,
            failed = report.failed,
            "batch finished"
        );
        Ok(report)
    }
}

/// Regular files directly inside `dir` whose extension matches `ext`, ignoring case.
pub fn collect_inputs(dir: &Path, ext: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// `output_dir/<input stem>.<ext>`.
pub fn output_path(input: &Path, output_dir: &Path, ext: &str) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".");
    name.push(ext);
    output_dir.join(name)
}

#[cfg(test)]
mod tests {
    use pt1_codec::{ImageType, Pt1Error};

    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pt1tool-batch-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    const UNPACK: Batch = Batch {
        mode: "unpack",
        input_ext: "pt1",
        output_ext: "png",
    };

    #[test]
    fn output_path_keeps_inner_dots() {
        let out = output_path(Path::new("/in/title.v2.pt1"), Path::new("/out"), "png");
        assert_eq!(out, PathBuf::from("/out/title.v2.png"));
    }

    #[test]
    fn collects_only_matching_top_level_files() {
        let dir = temp_dir("collect");
        std::fs::write(dir.join("b.pt1"), b"").unwrap();
        std::fs::write(dir.join("a.PT1"), b"").unwrap();
        std::fs::write(dir.join("c.png"), b"").unwrap();
        std::fs::create_dir_all(dir.join("nested.pt1")).unwrap();
        std::fs::write(dir.join("nested.pt1").join("d.pt1"), b"").unwrap();

        let inputs = collect_inputs(&dir, "pt1").unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PT1", "b.pt1"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let dir = temp_dir("failures");
        let input = dir.join("in");
        std::fs::create_dir_all(&input).unwrap();
        for name in ["one.pt1", "two.pt1", "three.pt1"] {
            std::fs::write(input.join(name), b"").unwrap();
        }
        let output = dir.join("out");

        let mut seen = Vec::new();
        let report = UNPACK
            .run(&input, &output, |src, _| {
                seen.push(src.to_path_buf());
                if src.ends_with("two.pt1") {
                    Err(RasterError::Codec(Pt1Error::UnsupportedToken { offset: 33 }))
                } else {
                    Ok(Pt1Header::new(ImageType::Color, 2, 2).unwrap())
                }
            })
            .unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(report.converted, 2);
        assert_eq!(report.failed, 1);
        assert!(output.is_dir());
        let failed = report
            .files
            .iter()
            .find(|f| f.status == Status::Failed)
            .unwrap();
        assert!(failed.input.ends_with("two.pt1"));
        assert!(failed.error.is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_input_dir_is_usage_error() {
        let dir = temp_dir("missing");
        let err = UNPACK
            .run(&dir.join("absent"), &dir.join("out"), |_, _| {
                unreachable!("no inputs to convert")
            })
            .unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(!dir.join("out").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
