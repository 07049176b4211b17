// pipeline.rs - Site detection, weighting and LD wired together

use crate::core::henikoff::{henikoff_weights, uniform_weights};
use crate::core::ld::{compute_ld, LdOptions, LdSink};
use crate::core::sites::{detect_variable_sites, SiteEligibility, SiteThresholds};
use crate::data::AlignmentMatrix;
use serde::Serialize;
use std::time::Instant;

/// Settings for one pipeline run
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub thresholds: SiteThresholds,
    /// Henikoff weighting; flat weights of 1.0 when false
    pub weighting: bool,
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            thresholds: SiteThresholds::default(),
            weighting: true,
            show_progress: false,
        }
    }
}

/// Counters and weight statistics for a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub samples: usize,
    pub sites: usize,
    pub hk_sites: usize,
    pub ld_sites: usize,
    pub pairs: usize,
    pub weighting: bool,
    pub thresholds: SiteThresholds,
    pub weight_min: f64,
    pub weight_max: f64,
    pub weight_mean: f64,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub eligibility: SiteEligibility,
    pub weights: Vec<f64>,
    pub summary: RunSummary,
}

/// Min, max and mean of a weight vector; zeros when empty
pub fn weight_statistics(weights: &[f64]) -> (f64, f64, f64) {
    if weights.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = weights.iter().sum::<f64>() / weights.len() as f64;
    (min, max, mean)
}

/// Weights for a matrix given its HK eligibility
pub fn compute_weights(
    matrix: &AlignmentMatrix,
    eligibility: &SiteEligibility,
    weighting: bool,
) -> Vec<f64> {
    if weighting {
        henikoff_weights(&matrix.select_columns(&eligibility.hk))
    } else {
        uniform_weights(matrix.n_samples())
    }
}

/// Run all three stages and stream the LD records into `sink`
pub fn run_pipeline<S: LdSink + ?Sized>(
    matrix: &AlignmentMatrix,
    config: &PipelineConfig,
    sink: &mut S,
) -> Result<PipelineResult, String> {
    let start = Instant::now();

    let eligibility = detect_variable_sites(matrix, &config.thresholds);
    let weights = compute_weights(matrix, &eligibility, config.weighting);

    let ld_matrix = matrix.select_columns(&eligibility.ld);
    let pairs = compute_ld(
        &ld_matrix,
        &weights,
        sink,
        LdOptions {
            show_progress: config.show_progress,
        },
    )?;

    let (weight_min, weight_max, weight_mean) = weight_statistics(&weights);
    let summary = RunSummary {
        samples: matrix.n_samples(),
        sites: matrix.n_sites(),
        hk_sites: eligibility.hk_count(),
        ld_sites: eligibility.ld_count(),
        pairs,
        weighting: config.weighting,
        thresholds: config.thresholds,
        weight_min,
        weight_max,
        weight_mean,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    };

    Ok(PipelineResult {
        eligibility,
        weights,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ld::LdRecord;
    use crate::data::matrix::encode_base;

    fn matrix(rows: &[&str]) -> AlignmentMatrix {
        let ids = (0..rows.len()).map(|i| format!("s{}", i)).collect();
        let rows = rows
            .iter()
            .map(|r| r.bytes().map(encode_base).collect())
            .collect();
        AlignmentMatrix::from_rows(ids, rows).unwrap()
    }

    #[test]
    fn test_pipeline_reports_original_coordinates() {
        let m = matrix(&["GAAC", "GACC", "GCAA", "GCCA"]);
        let mut records: Vec<LdRecord> = Vec::new();
        let result = run_pipeline(&m, &PipelineConfig::default(), &mut records).unwrap();

        assert_eq!(result.eligibility.ld_site_index_map(), vec![1, 2, 3]);
        assert_eq!(result.summary.pairs, 3);
        assert_eq!(records[0].site_i, 1);
        assert_eq!(records[2].site_j, 3);
        assert_eq!(result.weights.len(), 4);
    }

    #[test]
    fn test_no_eligible_sites() {
        let m = matrix(&["AAA", "AAA", "AA-"]);
        let mut records: Vec<LdRecord> = Vec::new();
        let result = run_pipeline(&m, &PipelineConfig::default(), &mut records).unwrap();
        assert!(records.is_empty());
        assert_eq!(result.summary.ld_sites, 0);
        assert_eq!(result.weights, vec![1.0; 3]);
    }

    #[test]
    fn test_flat_weights_when_disabled() {
        let m = matrix(&["AC", "AC", "CA", "TT"]);
        let config = PipelineConfig {
            weighting: false,
            ..PipelineConfig::default()
        };
        let mut records: Vec<LdRecord> = Vec::new();
        let result = run_pipeline(&m, &config, &mut records).unwrap();
        assert_eq!(result.weights, vec![1.0; 4]);
        assert_eq!(result.summary.weight_mean, 1.0);
    }

    #[test]
    fn test_weight_statistics() {
        assert_eq!(weight_statistics(&[]), (0.0, 0.0, 0.0));
        assert_eq!(weight_statistics(&[0.5, 1.0, 0.75]), (0.5, 1.0, 0.75));
    }
}
