//! Rate tables for the income tax engine.
//!
//! This module provides the rate table types for both jurisdictions, their
//! compiled-in defaults, and loading from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use income_tax_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config").unwrap();
//! println!("Loaded {} rate tables", loader.configs().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BracketTable, FlatRateConfig, ProgressiveRateConfig, RateConfig, TaxBracket};
