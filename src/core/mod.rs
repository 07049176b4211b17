// mod.rs - Core logic module

pub mod henikoff;
pub mod ld;
pub mod pipeline;
pub mod sites;

// Re-export main types for convenience
pub use henikoff::{henikoff_scores, henikoff_weights, uniform_weights};
pub use ld::{compute_ld, pair_statistics, LdOptions, LdRecord, LdSink, PairStatistics, SiteAlleles};
pub use pipeline::{run_pipeline, PipelineConfig, PipelineResult, RunSummary};
pub use sites::{detect_variable_sites, ColumnStats, SiteEligibility, SiteThresholds};
