use std::path::PathBuf;
use std::time::Duration;

use crate::config::SwgConfig;
use crate::transform::PathOptions;

/// Everything one run needs, built once and passed by reference to the
/// pipeline and to every plugin's `setup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// File path or `http(s)://` URL of the source document.
    pub input: String,
    /// Directory generated files are written under.
    pub output: PathBuf,
    /// Id of the plugin that renders the output.
    pub plugin: String,
    pub paths: PathOptions,
    /// Upper bound for fetching the source document.
    pub timeout: Duration,
    pub base_url: Option<String>,
}

impl RunContext {
    pub fn from_config(config: &SwgConfig) -> Self {
        Self {
            input: config.input.clone(),
            output: PathBuf::from(&config.output),
            plugin: config.plugin.clone(),
            paths: PathOptions {
                filter: config.filter.clone(),
                tag_index: config.tag_index,
                conjunction: config.conjunction.clone(),
            },
            timeout: Duration::from_secs(config.timeout_secs),
            base_url: config.base_url.clone(),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::from_config(&SwgConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = SwgConfig {
            output: "generated".to_string(),
            filter: vec!["/pet/**".to_string()],
            tag_index: Some(2),
            timeout_secs: 3,
            ..SwgConfig::default()
        };
        let ctx = RunContext::from_config(&config);
        assert_eq!(ctx.output, PathBuf::from("generated"));
        assert_eq!(ctx.paths.filter, ["/pet/**"]);
        assert_eq!(ctx.paths.tag_index, Some(2));
        assert_eq!(ctx.paths.conjunction, "By");
        assert_eq!(ctx.timeout, Duration::from_secs(3));
    }
}
