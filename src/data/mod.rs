// mod.rs - Data structures module

pub mod loaders;
pub mod matrix;

// Re-export main types for convenience
pub use loaders::{load_matrix, InputFormat, LoadedInput, VcfLoadStats};
pub use matrix::AlignmentMatrix;
