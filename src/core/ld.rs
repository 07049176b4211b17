// ld.rs - Weighted pairwise linkage disequilibrium

use crate::core::sites::ColumnStats;
use crate::data::AlignmentMatrix;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

/// LD statistics for one pair of sites, reported with original coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LdRecord {
    pub site_i: u64,
    pub site_j: u64,
    pub d: f64,
    pub d_prime: f64,
    pub r2: f64,
}

/// Consumer of the LD record stream.
///
/// Records arrive in ascending `(i, j)` order and are never revised.
/// `flush` runs after every row of pairs sharing the same first site, so
/// a buffered sink never holds more than one row.
pub trait LdSink {
    fn write_record(&mut self, record: &LdRecord) -> Result<(), String>;

    /// Push everything written so far to the destination
    fn flush(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Called once after the last record
    fn finish(&mut self) -> Result<(), String> {
        Ok(())
    }
}

impl LdSink for Vec<LdRecord> {
    fn write_record(&mut self, record: &LdRecord) -> Result<(), String> {
        self.push(*record);
        Ok(())
    }
}

/// D, D' and r² for one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairStatistics {
    pub d: f64,
    pub d_prime: f64,
    pub r2: f64,
}

impl PairStatistics {
    pub const ZERO: PairStatistics = PairStatistics {
        d: 0.0,
        d_prime: 0.0,
        r2: 0.0,
    };

    /// Two-locus statistics from the haplotype frequency `p_ab` and the
    /// marginal frequencies `p_a`, `p_b`. Zero denominators give 0 for D'
    /// and r², never NaN.
    pub fn from_frequencies(p_ab: f64, p_a: f64, p_b: f64) -> Self {
        let d = p_ab - p_a * p_b;

        let d_max = if d >= 0.0 {
            (p_a * (1.0 - p_b)).min((1.0 - p_a) * p_b)
        } else {
            (p_a * p_b).min((1.0 - p_a) * (1.0 - p_b))
        };
        let d_prime = if d_max > 0.0 { d / d_max } else { 0.0 };

        let denominator = p_a * (1.0 - p_a) * p_b * (1.0 - p_b);
        let r2 = if denominator > 0.0 { d * d / denominator } else { 0.0 };

        Self { d, d_prime, r2 }
    }
}

/// The two alleles kept at a site: major and (if any) minor canonical base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteAlleles {
    pub major: Option<u8>,
    pub minor: Option<u8>,
}

impl SiteAlleles {
    pub fn from_stats(stats: &ColumnStats) -> Self {
        let (major, minor) = stats.major_minor();
        Self { major, minor }
    }

    #[inline]
    fn contains(&self, code: u8) -> bool {
        self.major == Some(code) || self.minor == Some(code)
    }
}

/// Weighted statistics for two columns.
///
/// Only samples carrying one of the two kept alleles at both sites are
/// used; frequencies are weighted sums over those samples divided by their
/// total weight.
pub fn pair_statistics(
    column_i: &[u8],
    column_j: &[u8],
    alleles_i: SiteAlleles,
    alleles_j: SiteAlleles,
    weights: &[f64],
) -> PairStatistics {
    let (Some(major_i), Some(major_j)) = (alleles_i.major, alleles_j.major) else {
        return PairStatistics::ZERO;
    };

    let mut total = 0.0;
    let mut w_a = 0.0;
    let mut w_b = 0.0;
    let mut w_ab = 0.0;

    for ((&x, &y), &w) in column_i.iter().zip(column_j).zip(weights) {
        if !alleles_i.contains(x) || !alleles_j.contains(y) {
            continue;
        }
        total += w;
        let is_a = x == major_i;
        let is_b = y == major_j;
        if is_a {
            w_a += w;
        }
        if is_b {
            w_b += w;
        }
        if is_a && is_b {
            w_ab += w;
        }
    }

    if total <= 0.0 {
        return PairStatistics::ZERO;
    }
    PairStatistics::from_frequencies(w_ab / total, w_a / total, w_b / total)
}

/// Options for the LD pass
#[derive(Debug, Clone, Copy, Default)]
pub struct LdOptions {
    pub show_progress: bool,
}

/// Number of unordered pairs over `n` sites
pub fn pair_count(n_sites: usize) -> usize {
    n_sites * n_sites.saturating_sub(1) / 2
}

/// Compute LD for every pair of columns and stream the records into `sink`.
///
/// Pairs sharing the same first site are evaluated in parallel and written
/// in ascending order before the next row starts, so memory stays linear in
/// the number of sites. Returns the number of records written.
pub fn compute_ld<S: LdSink + ?Sized>(
    matrix: &AlignmentMatrix,
    weights: &[f64],
    sink: &mut S,
    options: LdOptions,
) -> Result<usize, String> {
    if weights.len() != matrix.n_samples() {
        return Err(format!(
            "Weight vector has {} entries but the matrix has {} samples",
            weights.len(),
            matrix.n_samples()
        ));
    }

    let n_sites = matrix.n_sites();
    let coordinates = matrix.coordinates();
    let columns: Vec<Vec<u8>> = (0..n_sites)
        .into_par_iter()
        .map(|site| matrix.column_vec(site))
        .collect();
    let alleles: Vec<SiteAlleles> = columns
        .par_iter()
        .map(|column| SiteAlleles::from_stats(&ColumnStats::from_symbols(column.iter().copied())))
        .collect();

    let total_pairs = pair_count(n_sites);
    let pb = if options.show_progress {
        let pb = ProgressBar::new(total_pairs as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
                     {pos}/{len} ({percent}%) {per_sec} ETA: {eta}",
                )
                .map_err(|e| format!("Invalid progress template: {}", e))?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut written = 0;
    for i in 0..n_sites {
        let row: Vec<LdRecord> = (i + 1..n_sites)
            .into_par_iter()
            .map(|j| {
                let stats =
                    pair_statistics(&columns[i], &columns[j], alleles[i], alleles[j], weights);
                LdRecord {
                    site_i: coordinates[i],
                    site_j: coordinates[j],
                    d: stats.d,
                    d_prime: stats.d_prime,
                    r2: stats.r2,
                }
            })
            .collect();

        for record in &row {
            sink.write_record(record)?;
        }
        if !row.is_empty() {
            sink.flush()?;
        }
        written += row.len();
        pb.inc(row.len() as u64);
    }

    sink.finish()?;
    pb.finish_and_clear();
    Ok(written)
}
