// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::SiteThresholds;
use crate::data::InputFormat;
use crate::output::OutputFormat;
use regex::Regex;
use std::str::FromStr;

/// Largest accepted number of decimal places
pub const MAX_PRECISION: usize = 12;

pub struct ValidationResult {
    pub input_format: Option<InputFormat>,
    pub output_format: OutputFormat,
    pub thresholds: SiteThresholds,
    pub sample_include_regex: Option<Regex>,
    pub sample_exclude_regex: Option<Regex>,
}

fn check_fraction(name: &str, value: f64) -> Result<(), String> {
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{} must be between 0.0 and 1.0 (got {})", name, value));
    }
    Ok(())
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    let input_format = match &args.input_format {
        Some(name) => Some(InputFormat::from_str(name)?),
        None => None,
    };
    let output_format = OutputFormat::from_str(&args.format)?;

    if args.precision > MAX_PRECISION {
        return Err(format!(
            "Precision must be at most {} decimal places (got {})",
            MAX_PRECISION, args.precision
        ));
    }

    if args.threads == Some(0) {
        return Err("Number of threads must be at least 1".to_string());
    }

    // Validate thresholds
    check_fraction("min_acgt", args.min_acgt)?;
    check_fraction("min_variability", args.min_variability)?;
    let min_variability_ld = args.min_variability_ld.unwrap_or(args.min_variability);
    check_fraction("min_variability_ld", min_variability_ld)?;

    let thresholds = SiteThresholds {
        min_acgt: args.min_acgt,
        min_variability_hk: args.min_variability,
        min_variability_ld,
    };

    // Compile regex patterns
    let sample_include_regex = if let Some(pattern) = &args.include_samples {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid include_samples regex: {}", e))?)
    } else {
        None
    };

    let sample_exclude_regex = if let Some(pattern) = &args.exclude_samples {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid exclude_samples regex: {}", e))?)
    } else {
        None
    };

    Ok(ValidationResult {
        input_format,
        output_format,
        thresholds,
        sample_include_regex,
        sample_exclude_regex,
    })
}
