//! Rate file loading.
//!
//! This module provides the [`ConfigLoader`] type for loading rate tables
//! from YAML files.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::engine::TaxEngine;
use crate::error::{EngineError, EngineResult};

use super::types::RateConfig;

/// Loads and provides access to rate tables.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── flat_rate.yaml     # kind: flat_rate
/// └── progressive.yaml   # kind: progressive
/// ```
///
/// Each file holds one [`RateConfig`], tagged by `kind`. Amounts and rates
/// are written as quoted strings so they parse as exact decimals.
///
/// # Example
///
/// ```no_run
/// use income_tax_engine::config::ConfigLoader;
/// use income_tax_engine::models::{PeriodMode, SalaryViewMode};
/// use rust_decimal_macros::dec;
///
/// let loader = ConfigLoader::load("./config")?;
/// let engine = loader.engine("flat_rate")?;
/// let breakdown =
///     engine.assemble(dec!(1000), PeriodMode::Monthly, SalaryViewMode::GrossSalaryGiven);
/// println!("Net income: {}", breakdown.net_income);
/// # Ok::<(), income_tax_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    configs: Vec<RateConfig>,
}

impl ConfigLoader {
    /// Loads every `*.yaml` rate file in a directory, in file name order.
    ///
    /// Returns an error if:
    /// - the directory is missing or holds no rate files
    /// - any file contains invalid YAML or misses a required field
    /// - any table fails validation
    /// - two files use the same table name
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", dir_str),
            });
        }

        let mut configs: Vec<RateConfig> = Vec::with_capacity(files.len());
        for file in &files {
            let config = Self::load_file(file)?;
            if configs.iter().any(|c| c.name() == config.name()) {
                warn!(name = config.name(), path = %file.display(), "Duplicate rate table");
                return Err(EngineError::invalid(format!(
                    "duplicate rate table name '{}' in {}",
                    config.name(),
                    file.display()
                )));
            }
            configs.push(config);
        }

        Ok(Self { configs })
    }

    /// Loads and validates a single rate file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> EngineResult<RateConfig> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: RateConfig =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        if let Err(err) = config.validate() {
            warn!(path = %path_str, error = %err, "Rejected rate table");
            return Err(err);
        }

        info!(path = %path_str, name = config.name(), "Loaded rate table");
        Ok(config)
    }

    /// All loaded tables in file name order.
    pub fn configs(&self) -> &[RateConfig] {
        &self.configs
    }

    /// Gets a table by its name.
    pub fn get(&self, name: &str) -> EngineResult<&RateConfig> {
        self.configs
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| EngineError::invalid(format!("no rate table named '{}'", name)))
    }

    /// Builds an engine for the named table.
    pub fn engine(&self, name: &str) -> EngineResult<TaxEngine> {
        TaxEngine::new(self.get(name)?.clone())
    }
}
