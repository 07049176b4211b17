// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub input: Option<String>,
    pub input_format: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,
    pub precision: Option<usize>,
    pub weights_output: Option<String>,
    pub summary_json: Option<String>,

    // Site thresholds
    pub min_acgt: Option<f64>,
    pub min_variability: Option<f64>,
    pub min_variability_ld: Option<f64>,

    // Weighting
    pub no_weighting: Option<bool>,

    // Sample filtering
    pub include_samples: Option<String>,
    pub exclude_samples: Option<String>,

    // Performance
    pub threads: Option<usize>,

    // Flags
    pub dry_run: Option<bool>,
    pub quiet: Option<bool>,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# weightedld.toml - Configuration file for weightedld
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Aligned FASTA or VCF file
input = "/path/to/alignment.fasta"

# Input format: fasta, vcf (omit to detect from the extension)
# input_format = "fasta"

# Pairwise LD output, "-" for stdout
output = "ld.tsv"

# Output format: tsv, csv
format = "tsv"

# Decimal places for D, D' and r2
precision = 4

# Per-sample weights
# weights_output = "weights.tsv"

# JSON run summary
# summary_json = "summary.json"

# =============================================================================
# SITE THRESHOLDS (strict greater-than)
# =============================================================================

# Minimum fraction of A/C/G/T calls at a site
min_acgt = 0.8

# Minimum minor allele fraction for sites used in weighting
min_variability = 0.02

# Minimum minor allele fraction for sites used in LD (defaults to min_variability)
# min_variability_ld = 0.05

# =============================================================================
# WEIGHTING
# =============================================================================

# Use flat weights instead of Henikoff weights
no_weighting = false

# =============================================================================
# SAMPLE FILTERING
# =============================================================================

# Include only samples matching regex pattern
# include_samples = "^HG.*"

# Exclude samples matching regex pattern
# exclude_samples = "outgroup"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs and report eligible sites only
dry_run = false

# Suppress status messages
quiet = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config = Config::from_toml(&Config::generate_sample()).unwrap();
        assert_eq!(config.input.as_deref(), Some("/path/to/alignment.fasta"));
        assert_eq!(config.min_acgt, Some(0.8));
        assert_eq!(config.min_variability_ld, None);
        assert_eq!(config.no_weighting, Some(false));
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_toml("min_acgt = \"high\"").is_err());
    }
}
