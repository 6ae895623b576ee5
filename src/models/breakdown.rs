//! Income breakdown models.
//!
//! This module contains the [`IncomeBreakdown`] type returned by the
//! assembler, together with the [`Levy`] lines it is made of. All amounts are
//! unrounded; rounding for display is the caller's concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, PeriodMode, SalaryViewMode};
use crate::calculation::percentage_of;

/// The kind of a levy line.
///
/// # Example
///
/// ```
/// use income_tax_engine::models::LevyKind;
///
/// assert_eq!(LevyKind::SocialTax.label(), "Social tax");
/// assert!(LevyKind::SocialTax.is_employer_side());
/// assert!(!LevyKind::IncomeTax.is_employer_side());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyKind {
    /// Employer social tax (flat-rate jurisdiction).
    SocialTax,
    /// Employer unemployment insurance premium (flat-rate jurisdiction).
    EmployerUnemploymentInsurance,
    /// Employer national insurance contribution (progressive jurisdiction).
    NationalInsurance,
    /// Income tax on taxable income after exemption (flat-rate jurisdiction).
    IncomeTax,
    /// Employee unemployment insurance premium (flat-rate jurisdiction).
    UnemploymentInsurance,
    /// Employee funded pension contribution (flat-rate jurisdiction).
    PensionContribution,
    /// Municipality and county tax (progressive jurisdiction).
    MunicipalityTax,
    /// Bracket-based national income tax (progressive jurisdiction).
    NationalIncomeTax,
    /// Employee social security contribution (progressive jurisdiction).
    SocialSecurityContribution,
}

impl LevyKind {
    /// Human-readable name of the levy.
    pub fn label(self) -> &'static str {
        match self {
            LevyKind::SocialTax => "Social tax",
            LevyKind::EmployerUnemploymentInsurance => "Employer unemployment insurance premium",
            LevyKind::NationalInsurance => "National insurance contribution",
            LevyKind::IncomeTax => "Income tax",
            LevyKind::UnemploymentInsurance => "Unemployment insurance premium",
            LevyKind::PensionContribution => "Pension contribution",
            LevyKind::MunicipalityTax => "Municipality and county tax",
            LevyKind::NationalIncomeTax => "National income tax",
            LevyKind::SocialSecurityContribution => "Social security contribution",
        }
    }

    /// Returns true if the levy is paid by the employer on top of gross salary.
    pub fn is_employer_side(self) -> bool {
        matches!(
            self,
            LevyKind::SocialTax
                | LevyKind::EmployerUnemploymentInsurance
                | LevyKind::NationalInsurance
        )
    }
}

/// A single named levy amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Levy {
    /// What the levy is.
    pub kind: LevyKind,
    /// The percentage rate applied. For bracket tax this is the effective rate.
    pub rate: Decimal,
    /// The levy amount.
    pub amount: Decimal,
}

/// The computed breakdown of one income figure.
///
/// Invariants:
/// - `net_income = gross_income - total_employee_levies`
/// - `total_employer_cost = gross_income + total_employer_levies`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    /// Name of the rate table the breakdown was computed with.
    pub jurisdiction: String,
    /// The reporting period of all amounts.
    pub period: PeriodMode,
    /// How the input figure was read.
    pub salary_view: SalaryViewMode,
    /// Levies paid by the employer on top of gross salary.
    pub employer_levies: Vec<Levy>,
    /// Sum of `employer_levies`.
    pub total_employer_levies: Decimal,
    /// Levies and taxes deducted from gross salary.
    pub employee_levies: Vec<Levy>,
    /// Sum of `employee_levies`.
    pub total_employee_levies: Decimal,
    /// Gross salary before employee-side deductions.
    pub gross_income: Decimal,
    /// Everything the employer spends on the position.
    pub total_employer_cost: Decimal,
    /// What the employee takes home.
    pub net_income: Decimal,
    /// Rules applied while computing the breakdown.
    pub audit_trace: AuditTrace,
}

impl IncomeBreakdown {
    /// Looks up a levy line on either side by kind.
    pub fn levy(&self, kind: LevyKind) -> Option<&Levy> {
        self.employer_levies
            .iter()
            .chain(self.employee_levies.iter())
            .find(|l| l.kind == kind)
    }

    /// Total of every levy, employer and employee side.
    pub fn total_tax(&self) -> Decimal {
        self.total_employer_levies.saturating_add(self.total_employee_levies)
    }

    /// Share of the employer's total cost that goes to levies, in percent.
    ///
    /// Returns zero when the employer cost is zero.
    pub fn total_tax_percent(&self) -> Decimal {
        percentage_of(self.total_tax(), self.total_employer_cost)
    }
}
