//! Optional TOML config file supplying defaults for the CLI flags.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Defaults loaded from `docferry.toml`. Every field is optional; command
/// line flags and environment variables override whatever is set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub client_id: Option<String>,
    pub business_id: Option<String>,
    pub document_type: Option<String>,
    pub folder_id: Option<String>,
    pub max_retries: Option<u32>,
    pub chunk_size_mib: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
