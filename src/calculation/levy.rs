//! Flat percentage levies.
//!
//! Every flat levy of both jurisdictions (social tax, insurance premiums,
//! pension, municipality tax, social security, and flat income tax on
//! taxable income) is a percentage of a base.

use rust_decimal::Decimal;

use crate::models::{Levy, LevyKind};

/// Returns `base * rate_percent / 100`. No rounding is performed beyond
/// what `Decimal` precision forces.
///
/// Bases too large for the product saturate at `Decimal::MAX` or
/// `Decimal::MIN` instead of overflowing.
///
/// # Examples
///
/// ```
/// use income_tax_engine::calculation::calculate_levy;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(calculate_levy(dec!(1000), dec!(33)), dec!(330));
/// assert_eq!(calculate_levy(dec!(1000), dec!(1.6)), dec!(16));
/// ```
pub fn calculate_levy(base: Decimal, rate_percent: Decimal) -> Decimal {
    match base.checked_mul(rate_percent) {
        Some(product) => product / Decimal::ONE_HUNDRED,
        None => base.saturating_mul(rate_percent / Decimal::ONE_HUNDRED),
    }
}

/// Applies a flat rate to a base and wraps the result as a levy line.
pub fn flat_levy(kind: LevyKind, base: Decimal, rate_percent: Decimal) -> Levy {
    Levy {
        kind,
        rate: rate_percent,
        amount: calculate_levy(base, rate_percent),
    }
}

/// Sums the amounts of a set of levy lines, saturating at the `Decimal`
/// bounds.
pub fn total_levies(levies: &[Levy]) -> Decimal {
    levies
        .iter()
        .fold(Decimal::ZERO, |total, l| total.saturating_add(l.amount))
}

/// Returns `part` as a percentage of `whole`, zero when `whole` is zero.
pub(crate) fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    let quotient = match part.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => scaled.checked_div(whole),
        None => part
            .checked_div(whole)
            .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED)),
    };
    match quotient {
        Some(quotient) => quotient,
        None if part.is_sign_negative() == whole.is_sign_negative() => Decimal::MAX,
        None => Decimal::MIN,
    }
}
