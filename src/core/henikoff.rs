// henikoff.rs - Henikoff position-based sequence weighting

use crate::core::sites::ColumnStats;
use crate::data::AlignmentMatrix;
use rayon::prelude::*;

/// Sum of per-column Henikoff contributions for every sample.
///
/// At each column with `k > 1` distinct symbols, a sample whose symbol
/// occurs `n` times receives `1 / (k * n)`. Gaps and ambiguous calls are
/// ordinary symbols here. Columns with a single symbol, or no rows, add
/// nothing.
pub fn henikoff_scores(matrix: &AlignmentMatrix) -> Vec<f64> {
    let n_samples = matrix.n_samples();

    // Frequency tables in parallel, accumulation in column order so the
    // floating point sums do not depend on scheduling
    let tables: Vec<ColumnStats> = (0..matrix.n_sites())
        .into_par_iter()
        .map(|site| ColumnStats::of_column(matrix, site))
        .collect();

    let mut scores = vec![0.0; n_samples];
    for (site, stats) in tables.iter().enumerate() {
        let k = stats.distinct_symbols();
        if stats.total() == 0 || k < 2 {
            continue;
        }
        for (sample, score) in scores.iter_mut().enumerate() {
            let n = stats.count(matrix.get(sample, site));
            *score += 1.0 / (k * n) as f64;
        }
    }
    scores
}

/// Henikoff weights scaled so the most distinctive sample has weight 1.0.
///
/// The result is a ratio against that sample, not a probability: a sample
/// that shares every symbol with the majority keeps a small positive
/// weight as long as at least one column distinguishes anybody. When no
/// column carries information (or there are no columns) every sample gets
/// the flat weight 1.0. The vector always has one entry per sample.
pub fn henikoff_weights(matrix: &AlignmentMatrix) -> Vec<f64> {
    let scores = henikoff_scores(matrix);
    let max_score = scores.iter().copied().fold(0.0_f64, f64::max);

    if max_score <= 0.0 || !max_score.is_finite() {
        return vec![1.0; matrix.n_samples()];
    }
    scores.into_iter().map(|s| s / max_score).collect()
}

/// Flat weights, used when weighting is switched off
pub fn uniform_weights(n_samples: usize) -> Vec<f64> {
    vec![1.0; n_samples]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::matrix::encode_base;

    fn matrix(rows: &[&str]) -> AlignmentMatrix {
        let ids = (0..rows.len()).map(|i| format!("s{}", i)).collect();
        let rows = rows
            .iter()
            .map(|r| r.bytes().map(encode_base).collect())
            .collect();
        AlignmentMatrix::from_rows(ids, rows).unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tol, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_per_column_contribution() {
        // k = 3; A twice, C twice, T once
        let scores = henikoff_scores(&matrix(&["A", "A", "C", "C", "T"]));
        assert_close(&scores, &[1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 3.0], 1e-12);
    }

    #[test]
    fn test_weights_normalised_to_most_distinct() {
        let weights = henikoff_weights(&matrix(&["AC", "AC", "CA", "CA", "TG"]));
        assert_close(&weights, &[0.5, 0.5, 0.5, 0.5, 1.0], 1e-12);
    }

    #[test]
    fn test_unique_sequence_gets_maximum() {
        let weights = henikoff_weights(&matrix(&["AAA", "AAA", "AAA", "CGT"]));
        assert_eq!(weights[3], 1.0);
        assert_eq!(weights[0], weights[1]);
        assert_eq!(weights[1], weights[2]);
        assert!(weights[0] > 0.0 && weights[0] < 1.0);
    }

    #[test]
    fn test_invariant_columns_contribute_nothing() {
        let with = henikoff_scores(&matrix(&["GA", "GA", "GC"]));
        let without = henikoff_scores(&matrix(&["A", "A", "C"]));
        assert_close(&with, &without, 1e-12);
    }

    #[test]
    fn test_gap_is_a_regular_symbol() {
        // The insertion carrier is maximally distinct at those columns
        let weights = henikoff_weights(&matrix(&["A--C", "A--C", "ATTC", "A--G"]));
        assert_eq!(weights[2], 1.0);
        assert!(weights[0] < weights[3]);
    }

    #[test]
    fn test_no_columns_gives_flat_weights() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let m = AlignmentMatrix::from_rows(ids, vec![vec![], vec![]]).unwrap();
        assert_eq!(henikoff_weights(&m), vec![1.0, 1.0]);

        let invariant = henikoff_weights(&matrix(&["AAA", "AAA"]));
        assert_eq!(invariant, vec![1.0, 1.0]);
        assert_eq!(uniform_weights(3), vec![1.0; 3]);
    }
}
