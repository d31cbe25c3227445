//! Server configuration.
//!
//! Settings are layered:
//! 1. **Defaults**: `0.0.0.0:3000`, log filter `info`.
//! 2. **File**: an optional TOML file (`weir.toml` unless another path is given).
//! 3. **Environment**: variables prefixed `WEIR__`, e.g. `WEIR__BIND=127.0.0.1:8080`
//!    or `WEIR__LOG=weir=debug`.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::info;

use crate::error::Error;

pub const DEFAULT_CONFIG_FILE: &str = "weir.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port` to listen on.
    pub bind: String,
    /// `tracing-subscriber` filter directive.
    pub log: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0:3000".to_owned(), log: "info".to_owned() }
    }
}

impl ServerConfig {
    /// Loads the layered configuration. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the file exists but cannot be parsed, or a value
    /// has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("WEIR").prefix_separator("__").separator("__"))
            .build()?
            .try_deserialize::<Self>()?;

        info!(path = %path.display(), bind = %config.bind, "configuration loaded");
        Ok(config)
    }
}
