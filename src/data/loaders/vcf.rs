// vcf.rs - VCF genotype loader

use crate::data::matrix::{encode_base, is_canonical, AlignmentMatrix, AMBIGUOUS};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const FIXED_FIELDS: usize = 9;

/// Counters reported after a VCF load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcfLoadStats {
    pub samples: usize,
    pub haplotypes: usize,
    pub records: usize,
    pub kept: usize,
    pub skipped_multiallelic: usize,
    pub skipped_non_snv: usize,
    pub missing_calls: usize,
}

/// Alleles of one sample at one record; `None` when every allele is `.`
type SampleCall = Option<Vec<u8>>;

/// Single-base code for a REF/ALT field, or None when it is not one canonical base
fn snv_code(allele: &str) -> Option<u8> {
    match allele.as_bytes() {
        [b] => Some(encode_base(*b)).filter(|&code| is_canonical(code)),
        _ => None,
    }
}

impl AlignmentMatrix {
    /// Load biallelic SNVs from a VCF file; one row per haplotype
    pub fn from_vcf(file_path: &Path) -> Result<(Self, VcfLoadStats), String> {
        let file = File::open(file_path)
            .map_err(|e| format!("Failed to open VCF file {}: {}", file_path.display(), e))?;
        Self::from_vcf_reader(BufReader::new(file), &file_path.display().to_string())
    }

    /// Parse VCF text from any buffered reader. `source` only labels errors.
    ///
    /// Each sample contributes one row per allele in its GT call, named
    /// `<sample>_<k>`. Allele `0` is stored as the REF base, `1` as the ALT
    /// base and `.` as ambiguous. A call that is missing as a whole (`.`,
    /// `./.`) fills as many ambiguous rows as the sample's ploidy, which is
    /// taken from its concrete calls. Records that are not single-nucleotide
    /// biallelic variants are skipped and counted.
    pub fn from_vcf_reader<R: BufRead>(
        reader: R,
        source: &str,
    ) -> Result<(Self, VcfLoadStats), String> {
        let mut stats = VcfLoadStats::default();
        let mut sample_names: Option<Vec<String>> = None;
        // Established by concrete calls; the hint comes from fully missing ones
        let mut ploidy: Vec<Option<usize>> = Vec::new();
        let mut ploidy_hint: Vec<Option<usize>> = Vec::new();
        let mut coordinates: Vec<u64> = Vec::new();
        // One entry per kept record, one call per sample
        let mut records: Vec<Vec<SampleCall>> = Vec::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = line.map_err(|e| {
                format!("Failed to read line {} of {}: {}", line_num, source, e)
            })?;
            let line = line.trim_end_matches('\r');

            if line.is_empty() || line.starts_with("##") {
                continue;
            }

            if let Some(header) = line.strip_prefix('#') {
                let fields: Vec<&str> = header.split('\t').collect();
                if fields.len() <= FIXED_FIELDS || fields[0] != "CHROM" {
                    return Err(format!(
                        "Invalid VCF header at line {} of {}: \
                         expected #CHROM with at least one sample column",
                        line_num, source
                    ));
                }
                let names: Vec<String> =
                    fields[FIXED_FIELDS..].iter().map(|s| s.to_string()).collect();
                ploidy = vec![None; names.len()];
                ploidy_hint = vec![None; names.len()];
                sample_names = Some(names);
                continue;
            }

            let names = sample_names.as_ref().ok_or_else(|| {
                format!("VCF record before #CHROM header at line {} of {}", line_num, source)
            })?;

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != FIXED_FIELDS + names.len() {
                return Err(format!(
                    "Invalid VCF line {} of {}: expected {} fields, found {}",
                    line_num,
                    source,
                    FIXED_FIELDS + names.len(),
                    fields.len()
                ));
            }
            stats.records += 1;

            let pos: u64 = fields[1].trim().parse().map_err(|_| {
                format!("Invalid position '{}' at line {} of {}", fields[1], line_num, source)
            })?;

            if fields[4].contains(',') {
                stats.skipped_multiallelic += 1;
                continue;
            }
            let (ref_code, alt_code) = match (snv_code(fields[3]), snv_code(fields[4])) {
                (Some(r), Some(a)) => (r, a),
                _ => {
                    stats.skipped_non_snv += 1;
                    continue;
                }
            };

            let mut calls: Vec<SampleCall> = Vec::with_capacity(names.len());
            for (sample_idx, sample_field) in fields[FIXED_FIELDS..].iter().enumerate() {
                let gt = sample_field.split(':').next().unwrap_or(".");
                let alleles: Vec<&str> = gt.split(|c| c == '|' || c == '/').collect();

                if alleles.iter().all(|&allele| allele == ".") {
                    ploidy_hint[sample_idx].get_or_insert(alleles.len());
                    calls.push(None);
                    continue;
                }

                match ploidy[sample_idx] {
                    Some(expected) if expected != alleles.len() => {
                        return Err(format!(
                            "Ploidy change for sample '{}' at line {} of {}: {} alleles, \
                             expected {}",
                            names[sample_idx],
                            line_num,
                            source,
                            alleles.len(),
                            expected
                        ));
                    }
                    Some(_) => {}
                    None => ploidy[sample_idx] = Some(alleles.len()),
                }

                let mut codes = Vec::with_capacity(alleles.len());
                for allele in alleles {
                    let code = match allele {
                        "0" => ref_code,
                        "1" => alt_code,
                        "." => {
                            stats.missing_calls += 1;
                            AMBIGUOUS
                        }
                        other => {
                            return Err(format!(
                                "Invalid genotype allele '{}' for sample '{}' at line {} of {}",
                                other, names[sample_idx], line_num, source
                            ));
                        }
                    };
                    codes.push(code);
                }
                calls.push(Some(codes));
            }

            coordinates.push(pos);
            records.push(calls);
            stats.kept += 1;
        }

        let names = sample_names.ok_or_else(|| format!("No #CHROM header found in {}", source))?;

        // Samples never called concretely get one row, or as many as their missing calls show
        let ploidy: Vec<usize> = ploidy
            .iter()
            .zip(&ploidy_hint)
            .map(|(known, hint)| known.or(*hint).unwrap_or(1))
            .collect();

        let mut sample_ids = Vec::new();
        let mut first_row = Vec::with_capacity(names.len());
        for (name, &copies) in names.iter().zip(&ploidy) {
            first_row.push(sample_ids.len());
            for k in 1..=copies {
                sample_ids.push(format!("{}_{}", name, k));
            }
        }

        let mut rows = vec![Vec::with_capacity(records.len()); sample_ids.len()];
        for calls in &records {
            for (sample_idx, call) in calls.iter().enumerate() {
                let start = first_row[sample_idx];
                match call {
                    Some(codes) => {
                        for (offset, &code) in codes.iter().enumerate() {
                            rows[start + offset].push(code);
                        }
                    }
                    None => {
                        for offset in 0..ploidy[sample_idx] {
                            rows[start + offset].push(AMBIGUOUS);
                            stats.missing_calls += 1;
                        }
                    }
                }
            }
        }

        stats.samples = names.len();
        stats.haplotypes = sample_ids.len();

        let matrix = Self::new(sample_ids, coordinates, rows)?;
        Ok((matrix, stats))
    }
}
