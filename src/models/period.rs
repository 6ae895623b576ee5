//! Reporting period and salary view models.
//!
//! This module contains the [`PeriodMode`] and [`SalaryViewMode`] types that
//! together describe how a caller-supplied income figure is to be interpreted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The reporting period of an income figure.
///
/// # Example
///
/// ```
/// use income_tax_engine::models::PeriodMode;
/// use rust_decimal::Decimal;
///
/// assert_eq!(PeriodMode::Monthly.multiplier(), Decimal::ONE);
/// assert_eq!(PeriodMode::Annual.multiplier(), Decimal::from(12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodMode {
    /// Income is given per month.
    #[default]
    Monthly,
    /// Income is given per year.
    #[serde(alias = "annually")]
    Annual,
}

impl PeriodMode {
    /// Returns the number of months covered by this period.
    ///
    /// Monthly-based thresholds are multiplied by this value.
    pub fn multiplier(self) -> Decimal {
        match self {
            PeriodMode::Monthly => Decimal::ONE,
            PeriodMode::Annual => Decimal::from(12),
        }
    }

    /// Converts an annual amount to this period.
    ///
    /// Annual amounts pass through unchanged; monthly ones are a twelfth.
    pub fn from_annual(self, annual: Decimal) -> Decimal {
        match self {
            PeriodMode::Monthly => annual / Decimal::from(12),
            PeriodMode::Annual => annual,
        }
    }

    /// Converts a monthly amount to this period, saturating at the
    /// `Decimal` bounds.
    pub fn from_monthly(self, monthly: Decimal) -> Decimal {
        monthly.saturating_mul(self.multiplier())
    }
}

/// How a caller-supplied income figure should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryViewMode {
    /// The figure is the employee's gross salary.
    #[default]
    #[serde(alias = "employee")]
    GrossSalaryGiven,
    /// The figure is the employer's total spend: gross salary plus
    /// employer-side levies. Gross is backed out from it.
    #[serde(alias = "employer")]
    TotalEmployerCostGiven,
}
