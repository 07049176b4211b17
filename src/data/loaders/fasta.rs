// fasta.rs - FASTA alignment loader

use crate::data::matrix::{encode_base, AlignmentMatrix};
use bio::io::fasta;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

impl AlignmentMatrix {
    /// Load an aligned FASTA file; one row per record
    pub fn from_fasta(file_path: &Path) -> Result<Self, String> {
        let file = File::open(file_path).map_err(|e| {
            format!("Failed to open FASTA file {}: {}", file_path.display(), e)
        })?;
        Self::from_fasta_reader(BufReader::new(file), &file_path.display().to_string())
    }

    /// Parse aligned FASTA records from any reader. `source` only labels errors.
    pub fn from_fasta_reader<R: Read>(reader: R, source: &str) -> Result<Self, String> {
        let reader = fasta::Reader::new(reader);

        let mut sample_ids = Vec::new();
        let mut rows: Vec<Vec<u8>> = Vec::new();

        for record_result in reader.records() {
            let record = record_result
                .map_err(|e| format!("Invalid FASTA record in {}: {}", source, e))?;

            let row: Vec<u8> = record
                .seq()
                .iter()
                .filter(|b| !b.is_ascii_whitespace())
                .map(|&b| encode_base(b))
                .collect();

            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(format!(
                        "Ragged alignment in {}: record '{}' has length {}, \
                         expected {} (from '{}')",
                        source,
                        record.id(),
                        row.len(),
                        first.len(),
                        sample_ids[0]
                    ));
                }
            }

            sample_ids.push(record.id().to_string());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(format!("No FASTA records found in {}", source));
        }

        Self::from_rows(sample_ids, rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::data::matrix::{AlignmentMatrix, BASE_A, BASE_C, GAP};

    #[test]
    fn test_fasta_multiline_records() {
        let input = b">s1 first sample\nAC\nGT\n>s2\nAC-T\n";
        let matrix = AlignmentMatrix::from_fasta_reader(&input[..], "inline").unwrap();
        assert_eq!(matrix.n_samples(), 2);
        assert_eq!(matrix.n_sites(), 4);
        assert_eq!(matrix.sample_ids()[0], "s1");
        assert_eq!(matrix.column_vec(0), vec![BASE_A, BASE_A]);
        assert_eq!(matrix.column_vec(2)[1], GAP);
        assert_eq!(matrix.row(1)[1], BASE_C);
    }

    #[test]
    fn test_fasta_ragged_rejected() {
        let input = b">s1\nACGT\n>s2\nACG\n";
        let error = AlignmentMatrix::from_fasta_reader(&input[..], "inline").unwrap_err();
        assert!(error.contains("Ragged"));
        assert!(error.contains("'s2'"));
    }

    #[test]
    fn test_fasta_empty_rejected() {
        let input = b"";
        assert!(AlignmentMatrix::from_fasta_reader(&input[..], "inline").is_err());
    }
}
