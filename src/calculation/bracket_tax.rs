//! Marginal bracket tax for the progressive jurisdiction.
//!
//! Only the slice of income inside each bracket is taxed at that bracket's
//! rate. Brackets above the one containing the income contribute nothing.

use rust_decimal::Decimal;

use crate::config::BracketTable;

use super::{calculate_levy, percentage_of};

/// The part of an income that fell inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSlice {
    /// Lower bound of the bracket (exclusive).
    pub lower_limit: Decimal,
    /// Upper bound of the bracket (inclusive), `None` for the top bracket.
    pub upper_limit: Option<Decimal>,
    /// Marginal rate in percent.
    pub rate: Decimal,
    /// Income taxed inside this bracket.
    pub taxed_amount: Decimal,
    /// Tax owed on `taxed_amount`.
    pub tax: Decimal,
}

/// The result of a bracket tax calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTaxResult {
    /// Total tax owed.
    pub tax: Decimal,
    /// Brackets the income reached, lowest first.
    pub slices: Vec<BracketSlice>,
}

impl BracketTaxResult {
    /// Tax as a percentage of `income`, zero when income is not positive.
    pub fn effective_rate(&self, income: Decimal) -> Decimal {
        if income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        percentage_of(self.tax, income)
    }
}

/// Calculates bracket tax and the slice taxed in each bracket reached.
///
/// Walks the brackets in ascending order with a running lower limit starting
/// at zero. While `income > lower`, the slice `min(income, upper) - lower` is
/// taxed at the bracket rate. Income of zero or less owes nothing.
pub fn calculate_bracket_tax(income: Decimal, table: &BracketTable) -> BracketTaxResult {
    let mut previous_limit = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    let mut slices = Vec::new();

    for bracket in table.brackets() {
        if income <= previous_limit {
            break;
        }

        let top = match bracket.upper_limit {
            Some(limit) => income.min(limit),
            None => income,
        };
        let taxed_amount = top - previous_limit;
        let slice_tax = calculate_levy(taxed_amount, bracket.rate);
        tax = tax.saturating_add(slice_tax);

        slices.push(BracketSlice {
            lower_limit: previous_limit,
            upper_limit: bracket.upper_limit,
            rate: bracket.rate,
            taxed_amount,
            tax: slice_tax,
        });

        match bracket.upper_limit {
            Some(limit) => previous_limit = limit,
            None => break,
        }
    }

    BracketTaxResult { tax, slices }
}

/// Calculates the tax owed on `income` under a bracket schedule.
///
/// # Examples
///
/// ```
/// use income_tax_engine::calculation::progressive_tax;
/// use income_tax_engine::config::ProgressiveRateConfig;
/// use rust_decimal_macros::dec;
///
/// let config = ProgressiveRateConfig::default();
/// // 84800 at 1.7% plus 7150 at 4.0%
/// assert_eq!(progressive_tax(dec!(300000), &config.brackets), dec!(1727.6));
/// assert_eq!(progressive_tax(dec!(0), &config.brackets), dec!(0));
/// ```
pub fn progressive_tax(income: Decimal, table: &BracketTable) -> Decimal {
    calculate_bracket_tax(income, table).tax
}
