//! Example consumer: a separate Rust project that uses apidef-compiler as a dependency.
//!
//! Run from repo root: `cargo run -p example-consumer -- path/to/description.md`
//! The description path may also come from `APIDEF_DESCRIPTION_PATH`.

use apidef_compiler::{ApiCompiler, ApiConfigSaver, CompilerConfig, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("apidef_compiler=info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("APIDEF_DESCRIPTION_PATH").ok())
        .ok_or("usage: example-consumer <description.md>")?;
    let text = std::fs::read_to_string(&path)?;

    let config = CompilerConfig::from_env()?;
    let compiler = ApiCompiler::new(config);
    let report = compiler.compile_with_report(&text);
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }

    let store = MemoryStore::new();
    let partition_id = std::env::var("APIDEF_PARTITION_ID").unwrap_or_else(|_| "default".into());
    let saved = ApiConfigSaver::new(&store, &compiler.config().categories, partition_id)
        .save(&report.config)
        .await?;
    tracing::info!("stored {} rows for api {}", store.records()?.len(), saved.api_id);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
