use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::batch::{BatchReport, Status};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_report(report: &BatchReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FILE", "STATUS", "TYPE", "SIZE", "DETAIL"]);
            for file in &report.files {
                table.add_row(vec![
                    file.input.clone(),
                    file.status.to_string(),
                    file.image_type.clone().unwrap_or_default(),
                    match (file.width, file.height) {
                        (Some(w), Some(h)) => format!("{w}x{h}"),
                        _ => String::new(),
                    },
                    file.error.clone().unwrap_or_else(|| file.output.clone()),
                ]);
            }
            println!("{table}");
            println!(
                "{}: {} converted, {} failed",
                report.mode, report.converted, report.failed
            );
        }
        OutputFormat::Pretty => {
            for file in &report.files {
                match &file.error {
                    Some(err) => println!("FAIL {} ({err})", file.input),
                    None => println!("ok   {} -> {}", file.input, file.output),
                }
            }
            println!(
                "{}: {} converted, {} failed",
                report.mode, report.converted, report.failed
            );
        }
        OutputFormat::Raw => {
            for file in &report.files {
                if file.status == Status::Converted {
                    println!("{}", file.output);
                }
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
