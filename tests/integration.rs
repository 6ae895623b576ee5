//! Integration tests for the income tax engine.
//!
//! This test suite covers:
//! - Flat-rate jurisdiction scenarios (monthly, annual, both salary views)
//! - Progressive jurisdiction scenarios (brackets, bonus insurance rate)
//! - Loading rate tables from the shipped YAML files
//! - Invariants checked over generated incomes with proptest

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

use income_tax_engine::calculation::{
    APPROXIMATE_GROSS_WARNING, calculate_exemption, progressive_tax,
};
use income_tax_engine::config::{
    BracketTable, ConfigLoader, FlatRateConfig, ProgressiveRateConfig, RateConfig, TaxBracket,
};
use income_tax_engine::engine::TaxEngine;
use income_tax_engine::error::EngineError;
use income_tax_engine::models::{IncomeBreakdown, LevyKind, PeriodMode, SalaryViewMode};

// =============================================================================
// Test Helpers
// =============================================================================

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn amount(breakdown: &IncomeBreakdown, kind: LevyKind) -> Decimal {
    breakdown
        .levy(kind)
        .unwrap_or_else(|| panic!("missing levy {:?}", kind))
        .amount
}

fn tolerance() -> Decimal {
    Decimal::new(1, 18)
}

fn assert_close(actual: Decimal, expected: Decimal) {
    assert!(
        (actual - expected).abs() < tolerance(),
        "{} is not within tolerance of {}",
        actual,
        expected
    );
}

// =============================================================================
// Flat-rate jurisdiction
// =============================================================================

#[test]
fn test_flat_rate_monthly_scenario_below_lower_threshold() {
    let engine = TaxEngine::flat_rate();
    let b = engine.assemble(
        decimal("1000"),
        PeriodMode::Monthly,
        SalaryViewMode::GrossSalaryGiven,
    );

    let exemption = b.audit_trace.step("exemption").unwrap();
    assert_eq!(exemption.output["exemption"].as_str().unwrap(), "654");

    assert_eq!(amount(&b, LevyKind::IncomeTax), decimal("69.2"));
    assert_eq!(amount(&b, LevyKind::UnemploymentInsurance), decimal("16"));
    assert_eq!(amount(&b, LevyKind::PensionContribution), decimal("20"));
    assert_eq!(b.total_employee_levies, decimal("105.2"));
    assert_eq!(b.net_income, decimal("894.8"));

    assert_eq!(amount(&b, LevyKind::SocialTax), decimal("330"));
    assert_eq!(amount(&b, LevyKind::EmployerUnemploymentInsurance), decimal("8"));
    assert_eq!(b.total_employer_cost, decimal("1338"));
}

#[test]
fn test_flat_rate_exemption_between_thresholds() {
    let config = FlatRateConfig::default();
    assert_eq!(
        calculate_exemption(decimal("1500"), PeriodMode::Monthly, &config),
        decimal("436")
    );
}

#[test]
fn test_flat_rate_employer_cost_view_pins_single_pass_approximation() {
    let engine = TaxEngine::flat_rate();
    let b = engine.assemble(
        decimal("1338"),
        PeriodMode::Monthly,
        SalaryViewMode::TotalEmployerCostGiven,
    );

    // Levies are taken on the 1338 cost, not on the 1000 gross that would
    // produce it, so the backed-out gross falls short of 1000.
    assert_eq!(amount(&b, LevyKind::SocialTax), decimal("441.54"));
    assert_eq!(amount(&b, LevyKind::EmployerUnemploymentInsurance), decimal("10.704"));
    assert_eq!(b.gross_income, decimal("885.756"));
    assert_eq!(b.total_employer_cost, decimal("1338"));
    assert!(b.audit_trace.has_warning(APPROXIMATE_GROSS_WARNING));

    // Employee side is computed on the backed-out gross.
    assert_eq!(
        amount(&b, LevyKind::PensionContribution),
        decimal("17.71512")
    );
}

#[test]
fn test_flat_rate_annual_scenario() {
    let engine = TaxEngine::flat_rate();
    let b = engine.assemble(
        decimal("18000"),
        PeriodMode::Annual,
        SalaryViewMode::GrossSalaryGiven,
    );

    // annual exemption 5232, taxable 12768
    assert_eq!(amount(&b, LevyKind::IncomeTax), decimal("2553.6"));
    assert_eq!(amount(&b, LevyKind::UnemploymentInsurance), decimal("288"));
    assert_eq!(amount(&b, LevyKind::PensionContribution), decimal("360"));
    assert_eq!(b.net_income, decimal("14798.4"));
    assert_eq!(b.total_employer_cost, decimal("24084"));
}

#[test]
fn test_flat_rate_total_tax_percent() {
    let engine = TaxEngine::flat_rate();
    let b = engine.assemble(
        decimal("1000"),
        PeriodMode::Monthly,
        SalaryViewMode::GrossSalaryGiven,
    );

    assert_eq!(b.total_tax(), decimal("443.2"));
    assert_eq!(b.total_tax_percent().round_dp(2), decimal("33.12"));
}

// =============================================================================
// Progressive jurisdiction
// =============================================================================

#[test]
fn test_progressive_bracket_scenario_with_zero_rate_second_band() {
    let table = BracketTable::new(vec![
        TaxBracket::bounded(decimal("208050"), decimal("0")),
        TaxBracket::bounded(decimal("292850"), decimal("0")),
        TaxBracket::bounded(decimal("670000"), decimal("1.7")),
        TaxBracket::unbounded(decimal("4.0")),
    ])
    .unwrap();

    // (292850 - 208050) x 0 + (300000 - 292850) x 1.7%
    assert_eq!(progressive_tax(decimal("300000"), &table), decimal("121.55"));
}

#[test]
fn test_progressive_default_table_scenario() {
    let engine = TaxEngine::progressive();
    let b = engine.assemble(
        decimal("300000"),
        PeriodMode::Annual,
        SalaryViewMode::GrossSalaryGiven,
    );

    assert_eq!(amount(&b, LevyKind::NationalIncomeTax), decimal("1727.6"));
    assert_eq!(amount(&b, LevyKind::MunicipalityTax), decimal("66000"));
    assert_eq!(amount(&b, LevyKind::SocialSecurityContribution), decimal("23400"));
    assert_eq!(amount(&b, LevyKind::NationalInsurance), decimal("42300"));
    assert_eq!(b.net_income, decimal("208872.4"));
    assert_eq!(b.total_employer_cost, decimal("342300"));
}

#[test]
fn test_progressive_bonus_insurance_above_threshold() {
    let engine = TaxEngine::progressive();
    let b = engine.assemble(
        decimal("1000000"),
        PeriodMode::Annual,
        SalaryViewMode::GrossSalaryGiven,
    );

    let insurance = b.levy(LevyKind::NationalInsurance).unwrap();
    assert_eq!(insurance.rate, decimal("19.1"));
    assert_eq!(insurance.amount, decimal("191000"));
    assert_eq!(amount(&b, LevyKind::NationalIncomeTax), decimal("63270.6"));
}

#[test]
fn test_progressive_selected_zone_rate() {
    let config = ProgressiveRateConfig::default()
        .with_employer_insurance_rate(decimal("0"))
        .unwrap();
    let engine = TaxEngine::new(RateConfig::Progressive(config)).unwrap();
    let b = engine.assemble(
        decimal("500000"),
        PeriodMode::Annual,
        SalaryViewMode::GrossSalaryGiven,
    );

    assert_eq!(b.total_employer_levies, decimal("0"));
    assert_eq!(b.total_employer_cost, decimal("500000"));
}

#[test]
fn test_progressive_employer_cost_view() {
    let engine = TaxEngine::progressive();
    let b = engine.assemble(
        decimal("342300"),
        PeriodMode::Annual,
        SalaryViewMode::TotalEmployerCostGiven,
    );

    assert_eq!(b.total_employer_levies, decimal("48264.3"));
    assert_eq!(b.gross_income, decimal("294035.7"));
    assert_eq!(b.total_employer_cost, decimal("342300"));
}

#[test]
fn test_zero_income_in_every_jurisdiction_and_mode() {
    for engine in [TaxEngine::flat_rate(), TaxEngine::progressive()] {
        for period in [PeriodMode::Monthly, PeriodMode::Annual] {
            for view in [
                SalaryViewMode::GrossSalaryGiven,
                SalaryViewMode::TotalEmployerCostGiven,
            ] {
                let b = engine.assemble(Decimal::ZERO, period, view);

                assert!(b.employer_levies.iter().all(|l| l.amount.is_zero()));
                assert!(b.employee_levies.iter().all(|l| l.amount.is_zero()));
                assert_eq!(b.net_income, Decimal::ZERO);
                assert_eq!(b.total_employer_cost, Decimal::ZERO);
            }
        }
    }
}

#[test]
fn test_extreme_income_in_every_jurisdiction_and_mode() {
    let extremes = [
        Decimal::MAX,
        Decimal::MIN,
        decimal("-10000000000000000000000000000"),
    ];

    for engine in [TaxEngine::flat_rate(), TaxEngine::progressive()] {
        for period in [PeriodMode::Monthly, PeriodMode::Annual] {
            for view in [
                SalaryViewMode::GrossSalaryGiven,
                SalaryViewMode::TotalEmployerCostGiven,
            ] {
                for income in extremes {
                    let b = engine.assemble(income, period, view);

                    assert_eq!(b.audit_trace.steps.last().unwrap().rule_id, "net_income");
                    assert_eq!(b.net_income.is_sign_negative(), income.is_sign_negative());
                }
            }
        }
    }
}

#[test]
fn test_progressive_annual_thresholds_are_not_scaled() {
    let engine = TaxEngine::progressive();
    let b = engine.assemble(
        decimal("100000"),
        PeriodMode::Annual,
        SalaryViewMode::GrossSalaryGiven,
    );

    assert_eq!(b.levy(LevyKind::NationalInsurance).unwrap().rate, decimal("14.1"));
    assert_eq!(b.levy(LevyKind::NationalIncomeTax).unwrap().amount, Decimal::ZERO);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_loaded_tables_compute_like_compiled_in_tables() {
    let loader = ConfigLoader::load("./config").expect("Failed to load config");

    for (name, builtin) in [
        ("flat_rate", TaxEngine::flat_rate()),
        ("progressive", TaxEngine::progressive()),
    ] {
        let loaded = loader.engine(name).unwrap();
        let income = decimal("45000");
        assert_eq!(
            loaded.assemble(income, PeriodMode::Annual, SalaryViewMode::GrossSalaryGiven),
            builtin.assemble(income, PeriodMode::Annual, SalaryViewMode::GrossSalaryGiven)
        );
    }
}

#[test]
fn test_unsorted_brackets_fail_at_construction() {
    let result = BracketTable::new(vec![
        TaxBracket::bounded(decimal("292850"), decimal("1.7")),
        TaxBracket::bounded(decimal("208050"), decimal("0")),
        TaxBracket::unbounded(decimal("4.0")),
    ]);

    assert!(matches!(
        result,
        Err(EngineError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_engine_can_be_shared_across_threads() {
    let engine = Arc::new(TaxEngine::progressive());
    let expected = engine.assemble(
        decimal("600000"),
        PeriodMode::Annual,
        SalaryViewMode::GrossSalaryGiven,
    );

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            let expected = &expected;
            scope.spawn(move || {
                let b = engine.assemble(
                    decimal("600000"),
                    PeriodMode::Annual,
                    SalaryViewMode::GrossSalaryGiven,
                );
                assert_eq!(&b, expected);
            });
        }
    });
}

// =============================================================================
// Properties
// =============================================================================

fn income_strategy() -> impl Strategy<Value = Decimal> {
    // up to 10 million with cents
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn period_strategy() -> impl Strategy<Value = PeriodMode> {
    prop_oneof![Just(PeriodMode::Monthly), Just(PeriodMode::Annual)]
}

fn salary_view_strategy() -> impl Strategy<Value = SalaryViewMode> {
    prop_oneof![
        Just(SalaryViewMode::GrossSalaryGiven),
        Just(SalaryViewMode::TotalEmployerCostGiven)
    ]
}

fn engine_strategy() -> impl Strategy<Value = TaxEngine> {
    prop_oneof![Just(TaxEngine::flat_rate()), Just(TaxEngine::progressive())]
}

proptest! {
    #[test]
    fn prop_net_plus_employee_levies_equals_gross(
        engine in engine_strategy(),
        income in income_strategy(),
        period in period_strategy(),
        view in salary_view_strategy(),
    ) {
        let b = engine.assemble(income, period, view);
        assert_close(b.net_income + b.total_employee_levies, b.gross_income);
    }

    #[test]
    fn prop_employer_cost_is_gross_plus_employer_levies(
        engine in engine_strategy(),
        income in income_strategy(),
        period in period_strategy(),
    ) {
        let b = engine.assemble(income, period, SalaryViewMode::GrossSalaryGiven);
        assert_close(b.total_employer_cost, b.gross_income + b.total_employer_levies);
    }

    #[test]
    fn prop_totals_match_levy_lines(
        engine in engine_strategy(),
        income in income_strategy(),
        period in period_strategy(),
        view in salary_view_strategy(),
    ) {
        let b = engine.assemble(income, period, view);
        let employer: Decimal = b.employer_levies.iter().map(|l| l.amount).sum();
        let employee: Decimal = b.employee_levies.iter().map(|l| l.amount).sum();
        prop_assert_eq!(employer, b.total_employer_levies);
        prop_assert_eq!(employee, b.total_employee_levies);
    }

    #[test]
    fn prop_exemption_is_non_increasing_in_income(
        a in income_strategy(),
        b in income_strategy(),
        period in period_strategy(),
    ) {
        let config = FlatRateConfig::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            calculate_exemption(low, period, &config) >= calculate_exemption(high, period, &config)
        );
    }

    #[test]
    fn prop_annual_exemption_is_at_least_monthly(income in income_strategy()) {
        let config = FlatRateConfig::default();
        prop_assert!(
            calculate_exemption(income, PeriodMode::Annual, &config)
                >= calculate_exemption(income, PeriodMode::Monthly, &config)
        );
    }

    #[test]
    fn prop_exemption_stays_within_ceiling(
        income in income_strategy(),
        period in period_strategy(),
    ) {
        let config = FlatRateConfig::default();
        let exemption = calculate_exemption(income, period, &config);
        prop_assert!(exemption >= Decimal::ZERO);
        prop_assert!(exemption <= period.from_monthly(config.exemption_ceiling));
    }

    #[test]
    fn prop_progressive_tax_is_non_decreasing(
        a in income_strategy(),
        b in income_strategy(),
    ) {
        let table = ProgressiveRateConfig::default().brackets;
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(progressive_tax(low, &table) <= progressive_tax(high, &table));
    }

    #[test]
    fn prop_progressive_tax_is_continuous_at_boundaries(step in 1i64..10_000) {
        let table = ProgressiveRateConfig::default().brackets;
        let epsilon = Decimal::new(step, 4);
        let top_rate = decimal("16.6");

        for bracket in table.brackets() {
            if let Some(limit) = bracket.upper_limit {
                let jump =
                    progressive_tax(limit + epsilon, &table) - progressive_tax(limit, &table);
                prop_assert!(jump >= Decimal::ZERO);
                prop_assert!(jump <= epsilon * top_rate / Decimal::ONE_HUNDRED);
            }
        }
    }

    #[test]
    fn prop_assemble_is_idempotent(
        engine in engine_strategy(),
        income in income_strategy(),
        period in period_strategy(),
        view in salary_view_strategy(),
    ) {
        let first = engine.assemble(income, period, view);
        let second = engine.assemble(income, period, view);
        prop_assert_eq!(first, second);
    }
}
