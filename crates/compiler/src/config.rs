//! Compiler configuration, loaded from TOML.
//!
//! ```toml
//! compiler = "neo-devpack-rs 0.4.0"
//! source = "https://github.com/example/contract"
//!
//! [logging]
//! level = "debug"
//! json = false
//! ```

use std::path::{Path, PathBuf};

use neo_smart_contract::nef::{COMPILER_FIELD_SIZE, SOURCE_URL_MAX};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings written into the module header and used by the tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Compiler name stored in the NEF header.
    pub compiler: String,
    /// Source URL used when the contract does not name one.
    pub source: Option<String>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            compiler: format!("neo-devpack-rs {}", env!("CARGO_PKG_VERSION")),
            source: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl CompilerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compiler.len() > COMPILER_FIELD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "compiler name is {} bytes, limit is {COMPILER_FIELD_SIZE}",
                self.compiler.len()
            )));
        }
        if let Some(source) = &self.source {
            if source.len() >= SOURCE_URL_MAX {
                return Err(ConfigError::Invalid(format!(
                    "source url is {} bytes, must be below {SOURCE_URL_MAX}",
                    source.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source = \"https://example.org/c\"\n[logging]\njson = true").unwrap();
        let config = CompilerConfig::load(file.path()).unwrap();
        assert_eq!(config.compiler, CompilerConfig::default().compiler);
        assert_eq!(config.source.as_deref(), Some("https://example.org/c"));
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_oversized_compiler_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "compiler = \"{}\"", "x".repeat(65)).unwrap();
        assert!(matches!(
            CompilerConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_and_bad_toml() {
        assert!(matches!(
            CompilerConfig::load(Path::new("/nonexistent/neo.toml")),
            Err(ConfigError::Io { .. })
        ));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "compiler = ").unwrap();
        assert!(matches!(
            CompilerConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(
            CompilerConfig::load_or_default(None).unwrap(),
            CompilerConfig::default()
        );
    }
}
