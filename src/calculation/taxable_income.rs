//! Taxable income after exemption.

use rust_decimal::Decimal;

/// Returns `max(0, gross_income - exemption)`.
///
/// The result is never negative, however large the exemption.
///
/// # Examples
///
/// ```
/// use income_tax_engine::calculation::calculate_taxable_income;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(calculate_taxable_income(dec!(1000), dec!(654)), dec!(346));
/// assert_eq!(calculate_taxable_income(dec!(500), dec!(654)), dec!(0));
/// ```
pub fn calculate_taxable_income(gross_income: Decimal, exemption: Decimal) -> Decimal {
    gross_income.saturating_sub(exemption).max(Decimal::ZERO)
}
