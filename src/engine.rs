//! Validated entry point.
//!
//! [`TaxEngine`] pairs a rate table with the guarantee that it passed
//! validation, so every breakdown it produces is computed over a well-formed
//! schedule.

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculation::assemble;
use crate::config::RateConfig;
use crate::error::EngineResult;
use crate::models::{IncomeBreakdown, PeriodMode, SalaryViewMode};

/// A breakdown calculator bound to one validated rate table.
///
/// The engine holds no mutable state; it is `Send + Sync` and may be shared
/// freely across threads.
///
/// # Example
///
/// ```
/// use income_tax_engine::engine::TaxEngine;
/// use income_tax_engine::models::{LevyKind, PeriodMode, SalaryViewMode};
/// use rust_decimal_macros::dec;
///
/// let engine = TaxEngine::progressive();
/// let breakdown =
///     engine.assemble(dec!(300000), PeriodMode::Annual, SalaryViewMode::GrossSalaryGiven);
///
/// assert_eq!(breakdown.levy(LevyKind::NationalIncomeTax).unwrap().amount, dec!(1727.6));
/// assert_eq!(breakdown.net_income, dec!(208872.4));
/// ```
#[derive(Debug, Clone)]
pub struct TaxEngine {
    config: RateConfig,
}

impl TaxEngine {
    /// Validates `config` and binds an engine to it.
    pub fn new(config: RateConfig) -> EngineResult<Self> {
        if let Err(err) = config.validate() {
            warn!(name = config.name(), error = %err, "Rejected rate table");
            return Err(err);
        }
        Ok(Self { config })
    }

    /// An engine over the compiled-in flat-rate table.
    pub fn flat_rate() -> Self {
        Self {
            config: RateConfig::flat_rate_default(),
        }
    }

    /// An engine over the compiled-in progressive table.
    pub fn progressive() -> Self {
        Self {
            config: RateConfig::progressive_default(),
        }
    }

    /// The rate table in use.
    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    /// Computes the breakdown of `raw_income`.
    pub fn assemble(
        &self,
        raw_income: Decimal,
        period: PeriodMode,
        salary_view: SalaryViewMode,
    ) -> IncomeBreakdown {
        assemble(raw_income, period, salary_view, &self.config)
    }
}
