//! Settings of the `kisp` binary.
//!
//! Read from an optional `kisp.toml` (or any other format `config` knows) in
//! the working directory, then overridden by `KISP_*` environment variables,
//! e.g. `KISP_SERVER__BIND=0.0.0.0:8080` or `KISP_CACHING=false`.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON snapshot of the genealogy; an empty genealogy when absent.
    pub genealogy: Option<PathBuf>,
    pub kinship_dictionary: PathBuf,
    /// Script executed before the first query.
    pub prelude: Option<PathBuf>,
    /// Full name of the person bound to `ego`.
    pub ego: Option<String>,
    pub caching: bool,
    pub log_filter: String,
    pub server: ServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            genealogy: None,
            kinship_dictionary: PathBuf::from("res/kinship-dict.json"),
            prelude: Some(PathBuf::from("res/prelude.kisp")),
            ego: None,
            caching: true,
            log_filter: "info".into(),
            server: ServerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub enabled: bool,
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { enabled: false, bind: "127.0.0.1:3000".into() }
    }
}

impl Settings {
    /// Loads `kisp.*` from the working directory and the `KISP_` environment.
    pub fn load() -> Result<Self> {
        Self::load_from("kisp")
    }

    /// Loads the named settings file (any extension `config` recognizes) and the environment.
    pub fn load_from(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("KISP").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
