//! Employer-side levies and salary view resolution.
//!
//! Employer levies are always computed against the caller's raw figure. When
//! that figure is the employer's total cost, gross salary is backed out by
//! subtracting those levies in a single pass. The levies are not recomputed
//! on the derived gross, so the result is an approximation.

use rust_decimal::Decimal;

use crate::config::{FlatRateConfig, ProgressiveRateConfig};
use crate::models::{Levy, LevyKind, PeriodMode, SalaryViewMode};

use super::{flat_levy, total_levies};

/// Employer levies computed against a base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerLevies {
    /// The levy lines.
    pub levies: Vec<Levy>,
    /// Sum of the levy lines.
    pub total: Decimal,
    /// Whether the high-income bonus rate was added.
    pub bonus_applied: bool,
}

impl EmployerLevies {
    fn from_levies(levies: Vec<Levy>, bonus_applied: bool) -> Self {
        let total = total_levies(&levies);
        Self {
            levies,
            total,
            bonus_applied,
        }
    }
}

/// Social tax and employer unemployment insurance premium.
pub fn flat_rate_employer_levies(base: Decimal, config: &FlatRateConfig) -> EmployerLevies {
    EmployerLevies::from_levies(
        vec![
            flat_levy(LevyKind::SocialTax, base, config.social_tax_rate),
            flat_levy(
                LevyKind::EmployerUnemploymentInsurance,
                base,
                config.employer_unemployment_insurance_rate,
            ),
        ],
        false,
    )
}

/// Employer national insurance.
///
/// The bonus rate is added to the selected base rate once `base` exceeds the
/// annual bonus threshold converted to `period`.
///
/// # Examples
///
/// ```
/// use income_tax_engine::calculation::progressive_employer_levies;
/// use income_tax_engine::config::ProgressiveRateConfig;
/// use income_tax_engine::models::PeriodMode;
/// use rust_decimal_macros::dec;
///
/// let config = ProgressiveRateConfig::default();
/// let levies = progressive_employer_levies(dec!(1000000), PeriodMode::Annual, &config);
/// assert!(levies.bonus_applied);
/// assert_eq!(levies.levies[0].rate, dec!(19.1));
/// assert_eq!(levies.total, dec!(191000));
/// ```
pub fn progressive_employer_levies(
    base: Decimal,
    period: PeriodMode,
    config: &ProgressiveRateConfig,
) -> EmployerLevies {
    let threshold = period.from_annual(config.employer_insurance_bonus_threshold);
    let bonus_applied = base > threshold;
    let rate = if bonus_applied {
        config
            .employer_insurance_rate
            .saturating_add(config.employer_insurance_bonus_rate)
    } else {
        config.employer_insurance_rate
    };

    EmployerLevies::from_levies(
        vec![flat_levy(LevyKind::NationalInsurance, base, rate)],
        bonus_applied,
    )
}

/// Gross income and employer cost after reading the raw figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryResolution {
    /// The employee's gross salary.
    pub gross_income: Decimal,
    /// The employer's total cost.
    pub total_employer_cost: Decimal,
}

/// Reads `raw_income` according to the salary view.
///
/// - `GrossSalaryGiven`: gross is the raw figure; cost adds the levies.
/// - `TotalEmployerCostGiven`: cost is the raw figure; gross subtracts the
///   levies, which were computed on the raw figure.
///
/// # Examples
///
/// ```
/// use income_tax_engine::calculation::resolve_salary_view;
/// use income_tax_engine::models::SalaryViewMode;
/// use rust_decimal_macros::dec;
///
/// let view = SalaryViewMode::TotalEmployerCostGiven;
/// let resolved = resolve_salary_view(dec!(1338), dec!(441.54), view);
/// assert_eq!(resolved.gross_income, dec!(896.46));
/// assert_eq!(resolved.total_employer_cost, dec!(1338));
/// ```
pub fn resolve_salary_view(
    raw_income: Decimal,
    total_employer_levies: Decimal,
    salary_view: SalaryViewMode,
) -> SalaryResolution {
    match salary_view {
        SalaryViewMode::GrossSalaryGiven => SalaryResolution {
            gross_income: raw_income,
            total_employer_cost: raw_income.saturating_add(total_employer_levies),
        },
        SalaryViewMode::TotalEmployerCostGiven => SalaryResolution {
            gross_income: raw_income.saturating_sub(total_employer_levies),
            total_employer_cost: raw_income,
        },
    }
}
