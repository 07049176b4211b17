// mod.rs - Output writers module

use crate::core::{LdRecord, LdSink, RunSummary};
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Column names of the LD stream
pub const LD_HEADER: [&str; 5] = ["site_i", "site_j", "D", "D'", "r2"];

/// Delimited output flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tsv,
    Csv,
}

impl OutputFormat {
    pub fn delimiter(&self) -> u8 {
        match self {
            OutputFormat::Tsv => b'\t',
            OutputFormat::Csv => b',',
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unsupported output format: {}. Use: tsv, csv", s)),
        }
    }
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| {
                format!("Failed to create parent directory '{}': {}", parent.display(), e)
            })?;
        }
    }
    Ok(())
}

/// Open an output destination; `-` is stdout
pub fn open_output(file_path: &str) -> Result<Box<dyn Write>, String> {
    if file_path == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Fixed-decimal rendering; negative zero prints as zero
pub fn format_value(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*}", precision, value);
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}

/// Streams LD records as delimited text, header first
pub struct DelimitedLdWriter<W: Write> {
    writer: W,
    delimiter: char,
    precision: usize,
}

impl<W: Write> DelimitedLdWriter<W> {
    /// Create the writer and emit the header line
    pub fn new(mut writer: W, format: OutputFormat, precision: usize) -> Result<Self, String> {
        let delimiter = format.delimiter() as char;
        let header = LD_HEADER.join(&delimiter.to_string());
        writeln!(writer, "{}", header).map_err(|e| format!("Write error: {}", e))?;
        Ok(Self {
            writer,
            delimiter,
            precision,
        })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LdSink for DelimitedLdWriter<W> {
    fn write_record(&mut self, record: &LdRecord) -> Result<(), String> {
        let sep = self.delimiter;
        writeln!(
            self.writer,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            record.site_i,
            record.site_j,
            format_value(record.d, self.precision),
            format_value(record.d_prime, self.precision),
            format_value(record.r2, self.precision),
        )
        .map_err(|e| format!("Write error: {}", e))
    }

    fn flush(&mut self) -> Result<(), String> {
        self.writer.flush().map_err(|e| format!("Flush error: {}", e))
    }

    fn finish(&mut self) -> Result<(), String> {
        self.writer.flush().map_err(|e| format!("Flush error: {}", e))
    }
}

/// Write the per-sample weight vector as a two-column delimited file
pub fn write_weights(
    file_path: &str,
    sample_ids: &[String],
    weights: &[f64],
    format: OutputFormat,
    precision: usize,
) -> Result<(), String> {
    if sample_ids.len() != weights.len() {
        return Err(format!(
            "Cannot write weights: {} samples but {} weights",
            sample_ids.len(),
            weights.len()
        ));
    }

    ensure_parent_dir(file_path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_path(file_path)
        .map_err(|e| format!("Failed to create weights file '{}': {}", file_path, e))?;

    writer
        .write_record(["sample", "weight"])
        .map_err(|e| format!("Write error: {}", e))?;
    for (sample_id, &weight) in sample_ids.iter().zip(weights) {
        writer
            .write_record([sample_id.as_str(), format_value(weight, precision).as_str()])
            .map_err(|e| format!("Write error: {}", e))?;
    }
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

/// Write the run summary as pretty JSON
pub fn write_summary_json(
    file_path: &str,
    summary: &RunSummary,
    input: &str,
    command_line: &str,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let document = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "generated": chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        "command_line": command_line,
        "input": input,
        "summary": summary,
    });
    let content = serde_json::to_string_pretty(&document)
        .map_err(|e| format!("Failed to serialize summary: {}", e))?;
    std::fs::write(file_path, content + "\n")
        .map_err(|e| format!("Failed to write summary file '{}': {}", file_path, e))
}
