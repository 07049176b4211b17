// matrix.rs - Alignment matrix and symbol encoding

use regex::Regex;

/// Symbol codes stored in the matrix cells
pub const BASE_A: u8 = 0;
pub const BASE_C: u8 = 1;
pub const BASE_G: u8 = 2;
pub const BASE_T: u8 = 3;
pub const AMBIGUOUS: u8 = 4;
pub const GAP: u8 = 5;

/// Number of distinct symbol codes
pub const ALPHABET_SIZE: usize = 6;

/// Encode a raw alignment character into a symbol code.
///
/// Case-insensitive; `U` reads as `T`, `-` and `.` are gaps and every
/// other byte (N, IUPAC ambiguity codes, `?`, ...) is ambiguous.
pub fn encode_base(byte: u8) -> u8 {
    match byte.to_ascii_uppercase() {
        b'A' => BASE_A,
        b'C' => BASE_C,
        b'G' => BASE_G,
        b'T' | b'U' => BASE_T,
        b'-' | b'.' => GAP,
        _ => AMBIGUOUS,
    }
}

/// True for the four canonical bases
#[inline]
pub fn is_canonical(code: u8) -> bool {
    code < AMBIGUOUS
}

/// Rectangular samples × sites matrix of symbol codes.
///
/// Rows are samples, columns are sites. Every column carries the
/// coordinate it had in the original input (alignment column or VCF
/// position) so that sliced copies can still report where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentMatrix {
    sample_ids: Vec<String>,
    coordinates: Vec<u64>,
    cells: Vec<u8>,
}

impl AlignmentMatrix {
    /// Build a matrix from per-sample rows and explicit site coordinates.
    /// Rejects ragged input.
    pub fn new(
        sample_ids: Vec<String>,
        coordinates: Vec<u64>,
        rows: Vec<Vec<u8>>,
    ) -> Result<Self, String> {
        if sample_ids.len() != rows.len() {
            return Err(format!(
                "Matrix has {} sample ids but {} rows",
                sample_ids.len(),
                rows.len()
            ));
        }

        let n_sites = coordinates.len();
        let mut cells = Vec::with_capacity(rows.len() * n_sites);
        for (sample_id, row) in sample_ids.iter().zip(&rows) {
            if row.len() != n_sites {
                return Err(format!(
                    "Ragged alignment: sample '{}' has {} sites, expected {}",
                    sample_id,
                    row.len(),
                    n_sites
                ));
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            sample_ids,
            coordinates,
            cells,
        })
    }

    /// Build a matrix whose site coordinates are the 0-based column indices
    pub fn from_rows(sample_ids: Vec<String>, rows: Vec<Vec<u8>>) -> Result<Self, String> {
        let n_sites = rows.first().map(|r| r.len()).unwrap_or(0);
        let coordinates = (0..n_sites as u64).collect();
        Self::new(sample_ids, coordinates, rows)
    }

    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn n_sites(&self) -> usize {
        self.coordinates.len()
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Original coordinate of every column, in column order
    pub fn coordinates(&self) -> &[u64] {
        &self.coordinates
    }

    pub fn get(&self, sample: usize, site: usize) -> u8 {
        self.cells[sample * self.n_sites() + site]
    }

    pub fn row(&self, sample: usize) -> &[u8] {
        let n_sites = self.n_sites();
        &self.cells[sample * n_sites..(sample + 1) * n_sites]
    }

    /// Iterate over the codes of one column, top to bottom
    pub fn column(&self, site: usize) -> impl Iterator<Item = u8> + '_ {
        let n_sites = self.n_sites();
        (0..self.n_samples()).map(move |sample| self.cells[sample * n_sites + site])
    }

    /// Copy of one column
    pub fn column_vec(&self, site: usize) -> Vec<u8> {
        self.column(site).collect()
    }

    /// Independent copy restricted to the columns flagged `true`.
    /// Columns beyond the end of `keep` are dropped.
    pub fn select_columns(&self, keep: &[bool]) -> Self {
        let kept: Vec<usize> = (0..self.n_sites())
            .filter(|&site| keep.get(site).copied().unwrap_or(false))
            .collect();

        let coordinates = kept.iter().map(|&site| self.coordinates[site]).collect();
        let mut cells = Vec::with_capacity(self.n_samples() * kept.len());
        for sample in 0..self.n_samples() {
            let row = self.row(sample);
            cells.extend(kept.iter().map(|&site| row[site]));
        }

        Self {
            sample_ids: self.sample_ids.clone(),
            coordinates,
            cells,
        }
    }

    /// Keep only the samples for which `keep` returns true.
    /// Returns the number of samples removed.
    pub fn retain_samples<F>(&mut self, keep: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let n_sites = self.n_sites();
        let mut sample_ids = Vec::with_capacity(self.sample_ids.len());
        let mut cells = Vec::with_capacity(self.cells.len());

        for (sample, sample_id) in self.sample_ids.iter().enumerate() {
            if keep(sample_id) {
                sample_ids.push(sample_id.clone());
                cells.extend_from_slice(&self.cells[sample * n_sites..(sample + 1) * n_sites]);
            }
        }

        let removed = self.sample_ids.len() - sample_ids.len();
        self.sample_ids = sample_ids;
        self.cells = cells;
        removed
    }

    /// Apply include/exclude regex filters on sample ids.
    /// Removing every sample is an error.
    pub fn filter_samples(
        &mut self,
        include: Option<&Regex>,
        exclude: Option<&Regex>,
    ) -> Result<usize, String> {
        if include.is_none() && exclude.is_none() {
            return Ok(0);
        }

        let removed = self.retain_samples(|sample_id| {
            if let Some(regex) = include {
                if !regex.is_match(sample_id) {
                    return false;
                }
            }
            if let Some(regex) = exclude {
                if regex.is_match(sample_id) {
                    return false;
                }
            }
            true
        });

        if self.sample_ids.is_empty() {
            return Err("Sample filters removed every sample".to_string());
        }
        Ok(removed)
    }
}
