// lib.rs - weightedld library root

//! # weightedld - Weighted pairwise linkage disequilibrium
//!
//! This library computes pairwise linkage disequilibrium (D, D' and r²)
//! between variable sites of a multiple sequence alignment or a VCF
//! genotype matrix. Each sequence is weighted with the Henikoff
//! position-based scheme so that clusters of near-identical sequences do
//! not dominate the allele frequencies.
//!
//! ## Features
//!
//! - **Two site filters**: independent variability cutoffs for the weighting and LD passes
//! - **Henikoff weighting**: per-column `1/(k·n)` scores, scaled to the most distinct sequence
//! - **Streaming LD**: records are written pair by pair, never held in memory all at once
//! - **Parallel**: site scans and pair rows run on rayon
//! - **Inputs**: aligned FASTA and biallelic SNVs from VCF
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use weightedld::prelude::*;
//!
//! let matrix = AlignmentMatrix::from_fasta(std::path::Path::new("alignment.fasta"))?;
//!
//! let mut sink = DelimitedLdWriter::new(std::io::stdout(), OutputFormat::Tsv, 4)?;
//! let result = run_pipeline(&matrix, &PipelineConfig::default(), &mut sink)?;
//!
//! println!("{} pairs from {} LD sites", result.summary.pairs, result.summary.ld_sites);
//! # Ok::<(), String>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{compute_ld, detect_variable_sites, henikoff_weights, run_pipeline};
    pub use crate::core::{LdRecord, LdSink, PipelineConfig, SiteEligibility, SiteThresholds};
    pub use crate::data::{load_matrix, AlignmentMatrix, InputFormat};
    pub use crate::output::{DelimitedLdWriter, OutputFormat};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{LdRecord, LdSink, PipelineConfig, RunSummary, SiteEligibility, SiteThresholds};
pub use data::{AlignmentMatrix, InputFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "weightedld v{} - Henikoff-weighted linkage disequilibrium",
        VERSION
    )
}
