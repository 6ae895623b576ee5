//! Breakdown assembly.
//!
//! This module orchestrates the calculators into a complete
//! [`IncomeBreakdown`]. Both jurisdictions follow the same order:
//!
//! 1. employer levies against the raw figure
//! 2. gross income from the salary view
//! 3. total employer cost
//! 4. exemption or bracket tax against gross
//! 5. remaining flat employee levies against gross
//! 6. totals and net income

use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use crate::config::{FlatRateConfig, ProgressiveRateConfig, RateConfig};
use crate::models::{AuditTrace, IncomeBreakdown, Levy, LevyKind, PeriodMode, SalaryViewMode};

use super::{
    EmployerLevies, SalaryResolution, calculate_bracket_tax, calculate_exemption,
    calculate_levy, calculate_taxable_income, flat_levy, flat_rate_employer_levies,
    progressive_employer_levies, resolve_salary_view, total_levies,
};

/// Warning raised whenever gross income is backed out of an employer cost.
pub const APPROXIMATE_GROSS_WARNING: &str = "APPROXIMATE_GROSS_FROM_EMPLOYER_COST";

/// Warning raised when the raw figure is negative.
pub const NEGATIVE_INCOME_WARNING: &str = "NEGATIVE_INCOME";

/// Warning raised when a flat-rate table yields a negative exemption.
pub const NEGATIVE_EXEMPTION_WARNING: &str = "NEGATIVE_EXEMPTION";

/// Computes the full breakdown of `raw_income` under `rates`.
///
/// Never fails: negative or out-of-range input flows through the arithmetic
/// and is flagged in the audit trace. Amounts beyond the `Decimal` range
/// saturate at its bounds. `rates` must already be validated;
/// [`crate::engine::TaxEngine::assemble`] guarantees this.
pub(crate) fn assemble(
    raw_income: Decimal,
    period: PeriodMode,
    salary_view: SalaryViewMode,
    rates: &RateConfig,
) -> IncomeBreakdown {
    let mut trace = AuditTrace::default();

    if raw_income < Decimal::ZERO {
        trace.warn(
            NEGATIVE_INCOME_WARNING,
            format!("Income {} is negative; results are not meaningful", raw_income),
            "medium",
        );
    }

    let (employer, resolution, employee_levies) = match rates {
        RateConfig::FlatRate(config) => {
            assemble_flat_rate(raw_income, period, salary_view, config, &mut trace)
        }
        RateConfig::Progressive(config) => {
            assemble_progressive(raw_income, period, salary_view, config, &mut trace)
        }
    };

    let total_employee_levies = total_levies(&employee_levies);
    let net_income = resolution.gross_income.saturating_sub(total_employee_levies);

    trace.record(
        "net_income",
        "Net Income",
        json!({
            "gross_income": resolution.gross_income.normalize().to_string(),
            "total_employee_levies": total_employee_levies.normalize().to_string()
        }),
        json!({
            "net_income": net_income.normalize().to_string()
        }),
        format!(
            "{} - {} = {}",
            resolution.gross_income.normalize(),
            total_employee_levies.normalize(),
            net_income.normalize()
        ),
    );

    debug!(
        jurisdiction = rates.name(),
        ?period,
        ?salary_view,
        gross_income = %resolution.gross_income,
        net_income = %net_income,
        "Assembled income breakdown"
    );

    IncomeBreakdown {
        jurisdiction: rates.name().to_string(),
        period,
        salary_view,
        employer_levies: employer.levies,
        total_employer_levies: employer.total,
        employee_levies,
        total_employee_levies,
        gross_income: resolution.gross_income,
        total_employer_cost: resolution.total_employer_cost,
        net_income,
        audit_trace: trace,
    }
}

fn assemble_flat_rate(
    raw_income: Decimal,
    period: PeriodMode,
    salary_view: SalaryViewMode,
    config: &FlatRateConfig,
    trace: &mut AuditTrace,
) -> (EmployerLevies, SalaryResolution, Vec<Levy>) {
    let employer = flat_rate_employer_levies(raw_income, config);
    record_employer_levies(trace, raw_income, &employer);

    let resolution = resolve(trace, raw_income, &employer, salary_view);
    let gross = resolution.gross_income;

    let exemption = calculate_exemption(gross, period, config);
    if exemption < Decimal::ZERO {
        trace.warn(
            NEGATIVE_EXEMPTION_WARNING,
            format!(
                "Exemption {} is negative; the taper of {} overshoots the upper threshold",
                exemption.normalize(),
                config.exemption_taper
            ),
            "high",
        );
    }
    let lower_threshold = period.from_monthly(config.exemption_lower_threshold);
    let upper_threshold = period.from_monthly(config.exemption_upper_threshold);
    trace.record(
        "exemption",
        "Basic Exemption",
        json!({
            "gross_income": gross.normalize().to_string(),
            "period": period,
            "lower_threshold": lower_threshold.normalize().to_string(),
            "upper_threshold": upper_threshold.normalize().to_string()
        }),
        json!({
            "exemption": exemption.normalize().to_string()
        }),
        exemption_reasoning(gross, lower_threshold, upper_threshold, exemption),
    );

    let taxable = calculate_taxable_income(gross, exemption);
    let income_tax = Levy {
        kind: LevyKind::IncomeTax,
        rate: config.income_tax_rate,
        amount: calculate_levy(taxable, config.income_tax_rate),
    };
    trace.record(
        "income_tax",
        "Income Tax",
        json!({
            "taxable_income": taxable.normalize().to_string(),
            "rate": config.income_tax_rate.normalize().to_string()
        }),
        json!({
            "income_tax": income_tax.amount.normalize().to_string()
        }),
        format!(
            "max(0, {} - {}) = {} x {}% = {}",
            gross.normalize(),
            exemption.normalize(),
            taxable.normalize(),
            config.income_tax_rate.normalize(),
            income_tax.amount.normalize()
        ),
    );

    let employee_levies = vec![
        income_tax,
        flat_levy(
            LevyKind::UnemploymentInsurance,
            gross,
            config.unemployment_insurance_rate,
        ),
        flat_levy(
            LevyKind::PensionContribution,
            gross,
            config.pension_contribution_rate,
        ),
    ];
    record_flat_employee_levies(trace, gross, &employee_levies[1..]);

    (employer, resolution, employee_levies)
}

fn assemble_progressive(
    raw_income: Decimal,
    period: PeriodMode,
    salary_view: SalaryViewMode,
    config: &ProgressiveRateConfig,
    trace: &mut AuditTrace,
) -> (EmployerLevies, SalaryResolution, Vec<Levy>) {
    let employer = progressive_employer_levies(raw_income, period, config);
    record_employer_levies(trace, raw_income, &employer);

    let resolution = resolve(trace, raw_income, &employer, salary_view);
    let gross = resolution.gross_income;

    let table = config.brackets.map_limits(|limit| period.from_annual(limit));
    let bracket_tax = calculate_bracket_tax(gross, &table);
    let national_income_tax = Levy {
        kind: LevyKind::NationalIncomeTax,
        rate: bracket_tax.effective_rate(gross),
        amount: bracket_tax.tax,
    };
    trace.record(
        "bracket_tax",
        "National Income Tax",
        json!({
            "gross_income": gross.normalize().to_string(),
            "period": period,
            "brackets_reached": bracket_tax.slices.len()
        }),
        json!({
            "tax": bracket_tax.tax.normalize().to_string(),
            "effective_rate": national_income_tax.rate.round_dp(4).normalize().to_string()
        }),
        bracket_tax
            .slices
            .iter()
            .map(|s| format!("{} x {}%", s.taxed_amount.normalize(), s.rate.normalize()))
            .collect::<Vec<_>>()
            .join(" + "),
    );

    let municipality_tax =
        flat_levy(LevyKind::MunicipalityTax, gross, config.municipality_tax_rate);
    let social_security = flat_levy(
        LevyKind::SocialSecurityContribution,
        gross,
        config.social_security_contribution_rate,
    );
    record_flat_employee_levies(trace, gross, &[municipality_tax.clone(), social_security.clone()]);

    (
        employer,
        resolution,
        vec![municipality_tax, national_income_tax, social_security],
    )
}

fn resolve(
    trace: &mut AuditTrace,
    raw_income: Decimal,
    employer: &EmployerLevies,
    salary_view: SalaryViewMode,
) -> SalaryResolution {
    let resolution = resolve_salary_view(raw_income, employer.total, salary_view);

    let reasoning = match salary_view {
        SalaryViewMode::GrossSalaryGiven => format!(
            "Gross salary given: cost = {} + {} = {}",
            raw_income.normalize(),
            employer.total.normalize(),
            resolution.total_employer_cost.normalize()
        ),
        SalaryViewMode::TotalEmployerCostGiven => {
            trace.warn(
                APPROXIMATE_GROSS_WARNING,
                "Employer levies were computed on the employer cost, not on the derived gross",
                "low",
            );
            format!(
                "Employer cost given: gross = {} - {} = {}",
                raw_income.normalize(),
                employer.total.normalize(),
                resolution.gross_income.normalize()
            )
        }
    };

    trace.record(
        "salary_view",
        "Salary View",
        json!({
            "raw_income": raw_income.normalize().to_string(),
            "salary_view": salary_view
        }),
        json!({
            "gross_income": resolution.gross_income.normalize().to_string(),
            "total_employer_cost": resolution.total_employer_cost.normalize().to_string()
        }),
        reasoning,
    );

    resolution
}

fn record_employer_levies(trace: &mut AuditTrace, base: Decimal, employer: &EmployerLevies) {
    trace.record(
        "employer_levies",
        "Employer Levies",
        json!({
            "base": base.normalize().to_string(),
            "bonus_applied": employer.bonus_applied
        }),
        json!({
            "levies": levies_json(&employer.levies),
            "total": employer.total.normalize().to_string()
        }),
        levies_reasoning(base, &employer.levies),
    );
}

fn record_flat_employee_levies(trace: &mut AuditTrace, gross: Decimal, levies: &[Levy]) {
    trace.record(
        "employee_levies",
        "Employee Levies",
        json!({
            "gross_income": gross.normalize().to_string()
        }),
        json!({
            "levies": levies_json(levies)
        }),
        levies_reasoning(gross, levies),
    );
}

fn levies_json(levies: &[Levy]) -> serde_json::Value {
    levies
        .iter()
        .map(|l| {
            json!({
                "kind": l.kind,
                "rate": l.rate.normalize().to_string(),
                "amount": l.amount.normalize().to_string()
            })
        })
        .collect()
}

fn levies_reasoning(base: Decimal, levies: &[Levy]) -> String {
    levies
        .iter()
        .map(|l| {
            format!(
                "{}: {} x {}% = {}",
                l.kind.label(),
                base.normalize(),
                l.rate.normalize(),
                l.amount.normalize()
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn exemption_reasoning(
    gross: Decimal,
    lower: Decimal,
    upper: Decimal,
    exemption: Decimal,
) -> String {
    if gross <= lower {
        format!(
            "Income {} is at or below {}: full exemption {}",
            gross.normalize(),
            lower.normalize(),
            exemption.normalize()
        )
    } else if gross <= upper {
        format!(
            "Income {} is between {} and {}: tapered exemption {}",
            gross.normalize(),
            lower.normalize(),
            upper.normalize(),
            exemption.normalize()
        )
    } else {
        format!(
            "Income {} is above {}: no exemption",
            gross.normalize(),
            upper.normalize()
        )
    }
}
