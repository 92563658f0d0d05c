//! ApiCompiler: text to record. ApiConfigSaver: record to store.

mod compiler;
mod saver;
pub use compiler::{assemble, compile, ApiCompiler, Compilation};
pub use saver::{ApiConfigSaver, SavedApiConfig, PARENT_ID_FIELD, PARTITION_FIELD};
