//! Rate table types.
//!
//! This module contains the strongly-typed rate tables for both supported
//! jurisdictions. They deserialize from YAML rate files and also ship as
//! compiled-in defaults.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One band of a progressive tax schedule.
///
/// `upper_limit` of `None` marks the unbounded top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper limit of the band, or `None` for the top band.
    #[serde(default)]
    pub upper_limit: Option<Decimal>,
    /// Marginal rate in percent applied to the slice inside this band.
    pub rate: Decimal,
}

impl TaxBracket {
    /// Creates a bounded bracket.
    pub fn bounded(upper_limit: Decimal, rate: Decimal) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate,
        }
    }

    /// Creates the unbounded top bracket.
    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }
}

/// An ordered progressive tax schedule.
///
/// Limits strictly increase and only the final bracket is unbounded.
/// [`BracketTable::new`] enforces this, and so does deserialization: a
/// malformed table in a rate file fails to parse.
///
/// # Example
///
/// ```
/// use income_tax_engine::config::{BracketTable, TaxBracket};
/// use rust_decimal_macros::dec;
///
/// let table = BracketTable::new(vec![
///     TaxBracket::bounded(dec!(10000), dec!(0)),
///     TaxBracket::unbounded(dec!(10)),
/// ]);
/// assert!(table.is_ok());
///
/// let unsorted = BracketTable::new(vec![
///     TaxBracket::bounded(dec!(10000), dec!(0)),
///     TaxBracket::bounded(dec!(5000), dec!(5)),
///     TaxBracket::unbounded(dec!(10)),
/// ]);
/// assert!(unsorted.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable(Vec<TaxBracket>);

impl BracketTable {
    /// Builds a table, failing with `InvalidConfiguration` if it is malformed.
    pub fn new(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        let table = Self(brackets);
        table.validate()?;
        Ok(table)
    }

    /// Checks ordering, the unbounded top bracket, and rate signs.
    pub fn validate(&self) -> EngineResult<()> {
        let Some((last, rest)) = self.0.split_last() else {
            return Err(EngineError::invalid("bracket table is empty"));
        };

        let mut previous_limit = Decimal::ZERO;
        for (index, bracket) in rest.iter().enumerate() {
            let limit = bracket.upper_limit.ok_or_else(|| {
                EngineError::invalid(format!(
                    "bracket {} is unbounded but is not the last bracket",
                    index + 1
                ))
            })?;
            if limit <= previous_limit {
                return Err(EngineError::invalid(format!(
                    "bracket limits must strictly increase: bracket {} has limit {} after {}",
                    index + 1,
                    limit,
                    previous_limit
                )));
            }
            check_rate(&format!("bracket {}", index + 1), bracket.rate)?;
            previous_limit = limit;
        }

        if let Some(limit) = last.upper_limit {
            return Err(EngineError::invalid(format!(
                "last bracket must be unbounded, found limit {}",
                limit
            )));
        }
        check_rate(&format!("bracket {}", self.0.len()), last.rate)
    }

    /// The brackets in ascending order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.0
    }

    /// Returns the same schedule with every bounded limit passed through `f`.
    ///
    /// `f` must be strictly increasing for the result to stay valid.
    pub(crate) fn map_limits(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self(
            self.0
                .iter()
                .map(|b| TaxBracket {
                    upper_limit: b.upper_limit.map(&f),
                    rate: b.rate,
                })
                .collect(),
        )
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = EngineError;

    fn try_from(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.0
    }
}

fn check_rate(field: &str, rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO {
        return Err(EngineError::invalid(format!(
            "{} rate must not be negative, found {}",
            field, rate
        )));
    }
    Ok(())
}

/// Rate table for the flat-rate jurisdiction.
///
/// Thresholds and the exemption ceiling are monthly amounts; they are
/// multiplied by the period multiplier before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRateConfig {
    /// Name of the table.
    pub name: String,
    /// Employer social tax rate in percent.
    pub social_tax_rate: Decimal,
    /// Employer unemployment insurance premium rate in percent.
    pub employer_unemployment_insurance_rate: Decimal,
    /// Income tax rate in percent, applied to taxable income.
    pub income_tax_rate: Decimal,
    /// Employee unemployment insurance premium rate in percent.
    pub unemployment_insurance_rate: Decimal,
    /// Employee pension contribution rate in percent.
    pub pension_contribution_rate: Decimal,
    /// Monthly gross income up to which the full exemption applies.
    pub exemption_lower_threshold: Decimal,
    /// Monthly gross income above which no exemption applies.
    pub exemption_upper_threshold: Decimal,
    /// Maximum monthly exemption.
    pub exemption_ceiling: Decimal,
    /// Monthly divisor controlling how fast the exemption shrinks between
    /// the two thresholds. Its legal basis is undocumented and awaits
    /// domain review.
    pub exemption_taper: Decimal,
}

impl Default for FlatRateConfig {
    fn default() -> Self {
        Self {
            name: "flat_rate".to_string(),
            social_tax_rate: dec!(33),
            employer_unemployment_insurance_rate: dec!(0.8),
            income_tax_rate: dec!(20),
            unemployment_insurance_rate: dec!(1.6),
            pension_contribution_rate: dec!(2),
            exemption_lower_threshold: dec!(1200),
            exemption_upper_threshold: dec!(2100),
            exemption_ceiling: dec!(654),
            exemption_taper: dec!(900),
        }
    }
}

impl FlatRateConfig {
    /// Rejects negative rates and a zero taper.
    ///
    /// Thresholds that make the taper overshoot zero are accepted; the
    /// exemption is not clamped.
    pub fn validate(&self) -> EngineResult<()> {
        check_rate("social tax", self.social_tax_rate)?;
        check_rate(
            "employer unemployment insurance",
            self.employer_unemployment_insurance_rate,
        )?;
        check_rate("income tax", self.income_tax_rate)?;
        check_rate("unemployment insurance", self.unemployment_insurance_rate)?;
        check_rate("pension contribution", self.pension_contribution_rate)?;
        if self.exemption_taper.is_zero() {
            return Err(EngineError::invalid("exemption taper must not be zero"));
        }
        Ok(())
    }
}

/// Rate table for the progressive jurisdiction.
///
/// Bracket limits and the bonus threshold are annual amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressiveRateConfig {
    /// Name of the table.
    pub name: String,
    /// Municipality and county tax rate in percent.
    pub municipality_tax_rate: Decimal,
    /// Employee social security contribution rate in percent.
    pub social_security_contribution_rate: Decimal,
    /// The employer national insurance rate in use, in percent.
    pub employer_insurance_rate: Decimal,
    /// Regional employer insurance rates the in-use rate may be chosen from.
    #[serde(default)]
    pub employer_insurance_zone_rates: Vec<Decimal>,
    /// Extra employer insurance rate added once income exceeds the bonus
    /// threshold.
    pub employer_insurance_bonus_rate: Decimal,
    /// Annual income above which the bonus rate applies.
    pub employer_insurance_bonus_threshold: Decimal,
    /// National income tax schedule.
    pub brackets: BracketTable,
}

impl Default for ProgressiveRateConfig {
    fn default() -> Self {
        Self {
            name: "progressive".to_string(),
            municipality_tax_rate: dec!(22),
            social_security_contribution_rate: dec!(7.8),
            employer_insurance_rate: dec!(14.1),
            employer_insurance_zone_rates: vec![
                dec!(14.1),
                dec!(10.6),
                dec!(7.9),
                dec!(6.4),
                dec!(5.1),
                dec!(0),
            ],
            employer_insurance_bonus_rate: dec!(5),
            employer_insurance_bonus_threshold: dec!(850000),
            brackets: BracketTable(vec![
                TaxBracket::bounded(dec!(208050), dec!(0)),
                TaxBracket::bounded(dec!(292850), dec!(1.7)),
                TaxBracket::bounded(dec!(670000), dec!(4.0)),
                TaxBracket::bounded(dec!(937900), dec!(13.6)),
                TaxBracket::unbounded(dec!(16.6)),
            ]),
        }
    }
}

impl ProgressiveRateConfig {
    /// Checks the bracket table, rate signs, and the selected insurance rate.
    pub fn validate(&self) -> EngineResult<()> {
        self.brackets.validate()?;
        check_rate("municipality tax", self.municipality_tax_rate)?;
        check_rate(
            "social security contribution",
            self.social_security_contribution_rate,
        )?;
        check_rate("employer insurance", self.employer_insurance_rate)?;
        check_rate("employer insurance bonus", self.employer_insurance_bonus_rate)?;
        if !self.employer_insurance_zone_rates.is_empty()
            && !self
                .employer_insurance_zone_rates
                .contains(&self.employer_insurance_rate)
        {
            return Err(EngineError::invalid(format!(
                "employer insurance rate {} is not one of the zone rates",
                self.employer_insurance_rate
            )));
        }
        Ok(())
    }

    /// Returns a copy of this table using another regional employer
    /// insurance rate.
    ///
    /// # Example
    ///
    /// ```
    /// use income_tax_engine::config::ProgressiveRateConfig;
    /// use rust_decimal_macros::dec;
    ///
    /// let config = ProgressiveRateConfig::default();
    /// assert!(config.with_employer_insurance_rate(dec!(10.6)).is_ok());
    /// assert!(config.with_employer_insurance_rate(dec!(12)).is_err());
    /// ```
    pub fn with_employer_insurance_rate(&self, rate: Decimal) -> EngineResult<Self> {
        let config = Self {
            employer_insurance_rate: rate,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }
}

/// A rate table for either jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateConfig {
    /// Flat income tax with an income-dependent exemption.
    FlatRate(FlatRateConfig),
    /// Marginal bracket tax.
    Progressive(ProgressiveRateConfig),
}

impl RateConfig {
    /// The compiled-in flat-rate table.
    pub fn flat_rate_default() -> Self {
        RateConfig::FlatRate(FlatRateConfig::default())
    }

    /// The compiled-in progressive table.
    pub fn progressive_default() -> Self {
        RateConfig::Progressive(ProgressiveRateConfig::default())
    }

    /// Name of the table.
    pub fn name(&self) -> &str {
        match self {
            RateConfig::FlatRate(config) => &config.name,
            RateConfig::Progressive(config) => &config.name,
        }
    }

    /// Validates the table for its jurisdiction.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            RateConfig::FlatRate(config) => config.validate(),
            RateConfig::Progressive(config) => config.validate(),
        }
    }
}
