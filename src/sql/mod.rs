//! SQL stages: sample synthesis, literal parameterization and clause splitting.

pub mod builder;
pub mod parameterizer;
pub mod splitter;
pub mod tokenizer;

pub use parameterizer::{parameterize, DetectedValue, ParameterizationResult, ValueKind};
pub use splitter::{split, SplitResult};
pub use tokenizer::{tokenize, ScanState, Token};
