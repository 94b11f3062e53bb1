//! `graphlens.toml` loading with `.env` and environment overrides

use graphlens_client::ClientConfig;
use graphlens_core::{Color, LayoutConfig, ViewConfig};
use graphlens_export::options::{DEFAULT_BACKGROUND, DEFAULT_QUALITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "graphlens.toml";
pub const ENV_BASE_URL: &str = "GRAPHLENS_BASE_URL";
pub const ENV_OUTPUT_DIR: &str = "GRAPHLENS_OUTPUT_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Everything a Graphlens front-end needs to start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphlensConfig {
    pub backend: ClientConfig,
    pub layout: LayoutConfig,
    pub view: ViewConfig,
    pub export: ExportConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub background: Color,
    pub quality: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            background: DEFAULT_BACKGROUND,
            quality: DEFAULT_QUALITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Results with a larger `count` refresh the aggregate total.
    pub stats_threshold: u64,
    /// Run once at startup when non-empty.
    pub initial_query: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stats_threshold: 100,
            initial_query: None,
        }
    }
}

impl GraphlensConfig {
    /// Load `path`, or `graphlens.toml` from the working directory when it
    /// exists, then `.env`, then environment overrides.
    ///
    /// An explicit `path` must exist; the implicit one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(env_file) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", env_file.display());
        }
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `GRAPHLENS_*` overrides found by `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.backend.base_url = url;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.export.output_dir = PathBuf::from(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphlens_core::EdgePolicy;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = GraphlensConfig::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.backend.query_param, "query");
        assert_eq!(config.layout.ideal_edge_length, 400.0);
        assert_eq!(config.view.edge_policy, EdgePolicy::Reject);
        assert_eq!(config.app.stats_threshold, 100);
        assert_eq!(config.export.background.to_hex(), "#0f0f23");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graphlens.toml");
        std::fs::write(
            &path,
            r##"
[backend]
query_param = "cypher"

[layout]
seed = 11
gravity = 2.5

[view]
edge_policy = "drop"

[export]
background = "#1a1a1a"

[app]
initial_query = "MATCH (n) RETURN n LIMIT 25"
"##,
        )
        .unwrap();

        let config = GraphlensConfig::from_file(&path).unwrap();
        assert_eq!(config.backend.query_param, "cypher");
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.layout.seed, Some(11));
        assert_eq!(config.layout.gravity, 2.5);
        assert_eq!(config.layout.max_iterations, 3000);
        assert_eq!(config.view.edge_policy, EdgePolicy::Drop);
        assert_eq!(config.export.background.to_hex(), "#1a1a1a");
        assert_eq!(
            config.app.initial_query.as_deref(),
            Some("MATCH (n) RETURN n LIMIT 25")
        );
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[view]\nwidth = \"wide\"\n").unwrap();

        let err = GraphlensConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = GraphlensConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://graph.internal:9000"),
            (ENV_OUTPUT_DIR, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = GraphlensConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.backend.base_url, "http://graph.internal:9000");
        assert_eq!(config.export.output_dir, PathBuf::from("exports"));
    }
}
