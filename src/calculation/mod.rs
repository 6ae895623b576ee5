//! Calculation logic for the income tax engine.
//!
//! This module contains the pure calculators: the basic exemption and
//! taxable income of the flat-rate jurisdiction, marginal bracket tax of the
//! progressive jurisdiction, flat percentage levies, employer levies with
//! salary view resolution, and the assembler that combines them into a
//! breakdown.

mod assembler;
mod bracket_tax;
mod employer_levies;
mod exemption;
mod levy;
mod taxable_income;

pub(crate) use assembler::assemble;
pub use assembler::{APPROXIMATE_GROSS_WARNING, NEGATIVE_EXEMPTION_WARNING, NEGATIVE_INCOME_WARNING};
pub use bracket_tax::{BracketSlice, BracketTaxResult, calculate_bracket_tax, progressive_tax};
pub use employer_levies::{
    EmployerLevies, SalaryResolution, flat_rate_employer_levies, progressive_employer_levies,
    resolve_salary_view,
};
pub use exemption::calculate_exemption;
pub use levy::{calculate_levy, flat_levy, total_levies};
pub(crate) use levy::percentage_of;
pub use taxable_income::calculate_taxable_income;
