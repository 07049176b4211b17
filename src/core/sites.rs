// sites.rs - Variable site detection and per-column frequency tables

use crate::data::matrix::{is_canonical, AlignmentMatrix, ALPHABET_SIZE};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Thresholds for the two site classification passes.
///
/// `min_acgt` is shared; each pass has its own variability cutoff.
/// All comparisons are strict (`>`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteThresholds {
    pub min_acgt: f64,
    pub min_variability_hk: f64,
    pub min_variability_ld: f64,
}

impl Default for SiteThresholds {
    fn default() -> Self {
        Self {
            min_acgt: 0.8,
            min_variability_hk: 0.02,
            min_variability_ld: 0.02,
        }
    }
}

/// Symbol counts for one column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnStats {
    counts: [usize; ALPHABET_SIZE],
    total: usize,
}

impl ColumnStats {
    pub fn from_symbols<I: IntoIterator<Item = u8>>(symbols: I) -> Self {
        let mut stats = Self::default();
        for code in symbols {
            stats.counts[code as usize] += 1;
            stats.total += 1;
        }
        stats
    }

    pub fn of_column(matrix: &AlignmentMatrix, site: usize) -> Self {
        Self::from_symbols(matrix.column(site))
    }

    /// Number of calls in the column, any symbol
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, code: u8) -> usize {
        self.counts[code as usize]
    }

    /// Number of distinct symbols observed (gaps and ambiguous included)
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn canonical_count(&self) -> usize {
        self.counts[..4].iter().sum()
    }

    /// Fraction of calls that are A, C, G or T; zero for an empty column
    pub fn canonical_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.canonical_count() as f64 / self.total as f64
    }

    /// One minus the frequency of the most common canonical base among
    /// canonical calls; zero when there are no canonical calls
    pub fn minor_allele_fraction(&self) -> f64 {
        let canonical = self.canonical_count();
        if canonical == 0 {
            return 0.0;
        }
        let most_common = self.counts[..4].iter().copied().max().unwrap_or(0);
        1.0 - most_common as f64 / canonical as f64
    }

    pub fn is_variable(&self, min_acgt: f64, min_variability: f64) -> bool {
        self.canonical_count() > 0
            && self.canonical_fraction() > min_acgt
            && self.minor_allele_fraction() > min_variability
    }

    /// Most and second most frequent canonical bases; ties go to the lower code
    pub fn major_minor(&self) -> (Option<u8>, Option<u8>) {
        let mut ranked: Vec<u8> = (0..4u8)
            .filter(|&code| is_canonical(code) && self.counts[code as usize] > 0)
            .collect();
        ranked.sort_by(|&a, &b| {
            self.counts[b as usize]
                .cmp(&self.counts[a as usize])
                .then(a.cmp(&b))
        });
        (ranked.first().copied(), ranked.get(1).copied())
    }
}

/// Per-column eligibility for the weighting and LD passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEligibility {
    pub hk: Vec<bool>,
    pub ld: Vec<bool>,
}

impl SiteEligibility {
    pub fn hk_count(&self) -> usize {
        self.hk.iter().filter(|&&b| b).count()
    }

    pub fn ld_count(&self) -> usize {
        self.ld.iter().filter(|&&b| b).count()
    }

    /// Column indices of the LD-eligible sites, ascending
    pub fn ld_site_index_map(&self) -> Vec<usize> {
        self.ld
            .iter()
            .enumerate()
            .filter_map(|(site, &keep)| keep.then_some(site))
            .collect()
    }
}

/// Classify every column of the matrix under both passes
pub fn detect_variable_sites(
    matrix: &AlignmentMatrix,
    thresholds: &SiteThresholds,
) -> SiteEligibility {
    let flags: Vec<(bool, bool)> = (0..matrix.n_sites())
        .into_par_iter()
        .map(|site| {
            let stats = ColumnStats::of_column(matrix, site);
            (
                stats.is_variable(thresholds.min_acgt, thresholds.min_variability_hk),
                stats.is_variable(thresholds.min_acgt, thresholds.min_variability_ld),
            )
        })
        .collect();

    let (hk, ld) = flags.into_iter().unzip();
    SiteEligibility { hk, ld }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::matrix::{encode_base, BASE_A, BASE_C, BASE_G, BASE_T};

    fn matrix(rows: &[&str]) -> AlignmentMatrix {
        let ids = (0..rows.len()).map(|i| format!("s{}", i)).collect();
        let rows = rows
            .iter()
            .map(|r| r.bytes().map(encode_base).collect())
            .collect();
        AlignmentMatrix::from_rows(ids, rows).unwrap()
    }

    #[test]
    fn test_column_stats() {
        let stats = ColumnStats::from_symbols("AAC-N".bytes().map(encode_base));
        assert_eq!(stats.total(), 5);
        assert_eq!(stats.canonical_count(), 3);
        assert_eq!(stats.distinct_symbols(), 4);
        assert!((stats.canonical_fraction() - 0.6).abs() < 1e-12);
        assert!((stats.minor_allele_fraction() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_minor_fraction_multiple_alleles() {
        // 4 A, 3 C, 2 G, 1 T: minor fraction is 1 - 4/10
        let stats = ColumnStats::from_symbols("AAAACCCGGT".bytes().map(encode_base));
        assert!((stats.minor_allele_fraction() - 0.6).abs() < 1e-12);
        assert_eq!(stats.major_minor(), (Some(BASE_A), Some(BASE_C)));
    }

    #[test]
    fn test_major_minor_ties() {
        let stats = ColumnStats::from_symbols("TTGG".bytes().map(encode_base));
        assert_eq!(stats.major_minor(), (Some(BASE_G), Some(BASE_T)));

        let single = ColumnStats::from_symbols("CC--".bytes().map(encode_base));
        assert_eq!(single.major_minor(), (Some(BASE_C), None));

        let none = ColumnStats::from_symbols("--NN".bytes().map(encode_base));
        assert_eq!(none.major_minor(), (None, None));
    }

    #[test]
    fn test_invariant_and_gappy_columns() {
        let m = matrix(&["AAC", "A-C", "A-G", "A-G", "A-G"]);
        let sites = detect_variable_sites(&m, &SiteThresholds::default());
        // identical calls
        assert!(!sites.hk[0]);
        assert!(!sites.ld[0]);
        // too many gaps
        assert!(!sites.hk[1]);
        assert!(!sites.ld[1]);
        assert!(sites.hk[2]);
        assert_eq!(sites.ld_site_index_map(), vec![2]);
    }

    #[test]
    fn test_all_non_canonical_column() {
        let m = matrix(&["-", "N", "-"]);
        let thresholds = SiteThresholds {
            min_acgt: 0.0,
            min_variability_hk: 0.0,
            min_variability_ld: 0.0,
        };
        let sites = detect_variable_sites(&m, &thresholds);
        assert_eq!(sites.hk, vec![false]);
        assert_eq!(sites.ld, vec![false]);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // 4 of 5 calls canonical: exactly 0.8 is not enough
        let m = matrix(&["A", "C", "A", "A", "-"]);
        let sites = detect_variable_sites(&m, &SiteThresholds::default());
        assert!(!sites.hk[0]);

        // minor fraction exactly 0.25 with a 0.25 cutoff
        let m = matrix(&["A", "A", "A", "T"]);
        let thresholds = SiteThresholds {
            min_acgt: 0.8,
            min_variability_hk: 0.25,
            min_variability_ld: 0.2,
        };
        let sites = detect_variable_sites(&m, &thresholds);
        assert!(!sites.hk[0]);
        assert!(sites.ld[0]);
    }

    #[test]
    fn test_independent_variability_cutoffs() {
        let m = matrix(&["AA", "AC", "AC", "AA", "AA", "AA", "AA", "AA", "AA", "TA"]);
        let thresholds = SiteThresholds {
            min_acgt: 0.8,
            min_variability_hk: 0.02,
            min_variability_ld: 0.15,
        };
        let sites = detect_variable_sites(&m, &thresholds);
        // column 0: minor fraction 0.1
        assert!(sites.hk[0]);
        assert!(!sites.ld[0]);
        // column 1: minor fraction 0.2
        assert!(sites.hk[1]);
        assert!(sites.ld[1]);
        assert_eq!(sites.hk_count(), 2);
        assert_eq!(sites.ld_count(), 1);
    }
}
