//! Layered configuration of the server binary.

use crate::Cli;
use pengajuan_core::models::RequiredFiles;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// Everything the binary reads at startup, one section per crate
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Web server configuration (bind address, pagination and upload limits)
    #[serde(default)]
    pub server: pengajuan_axum::config::AxumConfig,

    /// Database configuration (file path, creation)
    #[serde(default)]
    pub database: pengajuan_sqlite::config::SqliteConfig,

    /// Required document lists, keyed by job type, written to the database
    /// at startup
    #[serde(default)]
    pub requirements: BTreeMap<String, RequiredFiles>,
}

impl AppConfig {
    /// Read the configuration. Later sources override earlier ones:
    /// built-in defaults, then the file named by `--config`, then
    /// environment variables, where `APP_<SECTION>__<KEY>` sets
    /// `<section>.<key>`.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Keep the database in a file
    /// export APP_DATABASE__DATABASE_PATH="/data/pengajuan.db"
    ///
    /// # Set server bind address
    /// export APP_SERVER__BIND_ADDRESS="0.0.0.0:3000"
    ///
    /// # Accept uploads up to 20 MiB
    /// export APP_SERVER__MAX_UPLOAD_BYTES=20971520
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        Self::load_from(cli.config.as_deref())
    }

    fn load_from(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            anyhow::ensure!(path.exists(), "Config file {} does not exist", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        // APP_SERVER__BIND_ADDRESS sets server.bind_address
        builder = builder.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}
