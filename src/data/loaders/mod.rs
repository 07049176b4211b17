// mod.rs - Input loaders (FASTA alignments and VCF genotypes)

pub mod fasta;
pub mod vcf;

pub use vcf::VcfLoadStats;

use crate::data::AlignmentMatrix;
use std::path::Path;
use std::str::FromStr;

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Fasta,
    Vcf,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fasta" | "fa" | "aln" => Ok(InputFormat::Fasta),
            "vcf" => Ok(InputFormat::Vcf),
            _ => Err(format!("Unknown input format: {}. Use: fasta, vcf", s)),
        }
    }
}

impl InputFormat {
    /// Guess the format from the file extension; anything not `.vcf` is read as FASTA
    pub fn detect(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("vcf") => InputFormat::Vcf,
            _ => InputFormat::Fasta,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Fasta => "FASTA",
            InputFormat::Vcf => "VCF",
        }
    }
}

/// A loaded matrix plus what the loader learned along the way
#[derive(Debug)]
pub struct LoadedInput {
    pub matrix: AlignmentMatrix,
    pub format: InputFormat,
    pub vcf_stats: Option<VcfLoadStats>,
}

/// Load an input file, detecting the format from the extension unless given
pub fn load_matrix(path: &Path, format: Option<InputFormat>) -> Result<LoadedInput, String> {
    let format = format.unwrap_or_else(|| InputFormat::detect(path));
    match format {
        InputFormat::Fasta => Ok(LoadedInput {
            matrix: AlignmentMatrix::from_fasta(path)?,
            format,
            vcf_stats: None,
        }),
        InputFormat::Vcf => {
            let (matrix, stats) = AlignmentMatrix::from_vcf(path)?;
            Ok(LoadedInput {
                matrix,
                format,
                vcf_stats: Some(stats),
            })
        }
    }
}
