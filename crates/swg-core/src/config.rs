use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transform::path_resolver::DEFAULT_CONJUNCTION;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swg.yaml";

/// Project configuration loaded from `.swg.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwgConfig {
    /// File path or `http(s)://` URL of the source document.
    pub input: String,
    pub output: String,
    /// Id of the plugin that renders the output.
    pub plugin: String,
    /// Path globs; an operation is kept only when its path matches all of them.
    pub filter: Vec<String>,
    pub tag_index: Option<usize>,
    pub conjunction: String,
    pub timeout_secs: u64,
    /// Base URL baked into generated clients.
    pub base_url: Option<String>,
}

impl Default for SwgConfig {
    fn default() -> Self {
        Self {
            input: "swagger.json".to_string(),
            output: "src/api".to_string(),
            plugin: "typescript".to_string(),
            filter: Vec::new(),
            tag_index: None,
            conjunction: DEFAULT_CONJUNCTION.to_string(),
            timeout_secs: 30,
            base_url: None,
        }
    }
}

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwgConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded config from {}", path.display());
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swg configuration
input: swagger.json     # file path or http(s) URL
output: src/api
plugin: typescript

# Keep only paths matching every glob.
filter: []
  # - /pet/**

# Take the output file (tag) from this path segment instead of the document tags.
# tag_index: 0

conjunction: By         # /user/{id} -> getUserById
timeout_secs: 30
# base_url: https://api.example.com
"#
}
