//! Basic exemption for the flat-rate jurisdiction.
//!
//! The exemption is deducted from gross income before income tax. It is
//! full up to the lower threshold, tapers linearly between the thresholds,
//! and is zero above the upper threshold.

use rust_decimal::Decimal;

use crate::config::FlatRateConfig;
use crate::models::PeriodMode;

/// Calculates the basic exemption for a gross income.
///
/// With `k` the period multiplier, `T1 = lower·k`, `T2 = upper·k`,
/// `Emax = ceiling·k` and `S = taper·k`:
///
/// - `gross <= T1`: `Emax`
/// - `T1 < gross <= T2`: `Emax - Emax·(gross - T1)/S`
/// - `gross > T2`: `0`
///
/// The result is not clamped. A taper shorter than `T2 - T1` yields a
/// negative exemption just below `T2`. Arithmetic saturates at the `Decimal`
/// bounds. A zero taper, which validation rejects, cuts the exemption off
/// right above `T1`.
///
/// # Examples
///
/// ```
/// use income_tax_engine::calculation::calculate_exemption;
/// use income_tax_engine::config::FlatRateConfig;
/// use income_tax_engine::models::PeriodMode;
/// use rust_decimal_macros::dec;
///
/// let config = FlatRateConfig::default();
/// let monthly = |gross| calculate_exemption(gross, PeriodMode::Monthly, &config);
///
/// assert_eq!(monthly(dec!(1000)), dec!(654));
/// assert_eq!(monthly(dec!(1500)), dec!(436));
/// assert_eq!(monthly(dec!(2500)), dec!(0));
/// ```
pub fn calculate_exemption(
    gross_income: Decimal,
    period: PeriodMode,
    config: &FlatRateConfig,
) -> Decimal {
    let lower = period.from_monthly(config.exemption_lower_threshold);
    let upper = period.from_monthly(config.exemption_upper_threshold);
    let ceiling = period.from_monthly(config.exemption_ceiling);
    let taper = period.from_monthly(config.exemption_taper);

    if gross_income <= lower {
        ceiling
    } else if gross_income <= upper {
        let reduction = ceiling
            .saturating_mul(gross_income.saturating_sub(lower))
            .checked_div(taper);
        match reduction {
            Some(reduction) => ceiling.saturating_sub(reduction),
            None if taper.is_zero() => Decimal::ZERO,
            None if ceiling.is_sign_negative() == taper.is_sign_negative() => Decimal::MIN,
            None => Decimal::MAX,
        }
    } else {
        Decimal::ZERO
    }
}
