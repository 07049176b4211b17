// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    ///
    /// Options with a default value (`--output`, `--format`, `--precision`,
    /// `--min-acgt`, `--min-variability`) cannot tell an explicit CLI value
    /// from the default. A CLI value equal to the default is therefore
    /// replaced by the config file value when the file sets one.
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.input.is_none() {
            self.input = config.input;
        }
        if self.input_format.is_none() {
            self.input_format = config.input_format;
        }
        if self.weights_output.is_none() {
            self.weights_output = config.weights_output;
        }
        if self.summary_json.is_none() {
            self.summary_json = config.summary_json;
        }

        // Only override defaults, not explicit CLI values
        if let Some(output) = config.output.filter(|_| self.output == "-") {
            self.output = output;
        }
        if let Some(format) = config.format.filter(|_| self.format == "tsv") {
            self.format = format;
        }
        if let Some(precision) = config.precision.filter(|_| self.precision == 4) {
            self.precision = precision;
        }

        // Site thresholds (only override defaults)
        if let Some(min_acgt) = config.min_acgt.filter(|_| self.min_acgt == 0.8) {
            self.min_acgt = min_acgt;
        }
        if let Some(min_variability) =
            config.min_variability.filter(|_| self.min_variability == 0.02)
        {
            self.min_variability = min_variability;
        }
        if self.min_variability_ld.is_none() {
            self.min_variability_ld = config.min_variability_ld;
        }

        // Sample filtering
        if self.include_samples.is_none() {
            self.include_samples = config.include_samples;
        }
        if self.exclude_samples.is_none() {
            self.exclude_samples = config.exclude_samples;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.no_weighting && config.no_weighting.unwrap_or(false) {
            self.no_weighting = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }
        if !self.quiet && config.quiet.unwrap_or(false) {
            self.quiet = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["weightedld"], args).unwrap()
    }

    #[test]
    fn test_cli_takes_precedence() {
        let args = parse(&["--input", "cli.fasta", "--min-acgt", "0.9"]);
        let config = Config {
            input: Some("config.fasta".to_string()),
            min_acgt: Some(0.5),
            min_variability: Some(0.1),
            no_weighting: Some(true),
            ..Config::default()
        };
        let merged = args.merge_with_config(config);

        assert_eq!(merged.input.as_deref(), Some("cli.fasta"));
        assert_eq!(merged.min_acgt, 0.9);
        assert_eq!(merged.min_variability, 0.1);
        assert!(merged.no_weighting);
    }

    #[test]
    fn test_config_fills_defaults() {
        let args = parse(&[]);
        let config = Config {
            output: Some("out/ld.csv".to_string()),
            format: Some("csv".to_string()),
            precision: Some(6),
            min_variability_ld: Some(0.2),
            ..Config::default()
        };
        let merged = args.merge_with_config(config);

        assert_eq!(merged.output, "out/ld.csv");
        assert_eq!(merged.format, "csv");
        assert_eq!(merged.precision, 6);
        assert_eq!(merged.min_variability_ld, Some(0.2));
        assert!(!merged.quiet);
    }

    #[test]
    fn test_cli_value_equal_to_default_yields_to_config() {
        let args = parse(&["--min-acgt", "0.8", "--precision", "6"]);
        let config = Config {
            min_acgt: Some(0.9),
            precision: Some(2),
            ..Config::default()
        };
        let merged = args.merge_with_config(config);

        assert_eq!(merged.min_acgt, 0.9);
        assert_eq!(merged.precision, 6);
    }
}
