//! apidef-compiler: turns a natural-language API description into a structured API definition
//! record (parameters, WHERE conditions, columns, table usages) ready for a resource store.

pub mod case;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod service;
pub mod sql;
pub mod store;

pub use config::{validate, CompilerConfig, StoreCategories};
pub use error::{ConfigError, StoreError};
pub use extract::{extract, ExtractedDescription, SampleSource};
pub use model::{ApiColumn, ApiCondition, ApiParameter, ApiTableUsage, Connector, ParamLocation, ParsedApiConfig};
pub use service::{compile, ApiCompiler, ApiConfigSaver, Compilation, SavedApiConfig};
pub use sql::{parameterize, split, ParameterizationResult, SplitResult};
pub use store::{MemoryStore, ResourceStore, StoredRecord};
