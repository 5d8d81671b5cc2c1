use std::path::PathBuf;

use attribute_explorer::config::AppConfig;
use attribute_explorer::tooling::cli::CliContext;
use serde_json::Value;
use tempfile::TempDir;

/// Path of a file under the crate's `data/` directory
pub fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

pub fn sample_profile() -> Value {
    let content = std::fs::read_to_string(data_file("sample_profile.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Context over a fresh workspace using the seed mapping table
pub fn seeded_context(temp_dir: &TempDir) -> CliContext {
    CliContext::with_config(temp_dir.path().to_path_buf(), AppConfig::default()).unwrap()
}
