//! Simulation parameter record supplied by the caller

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Inputs for a single amortization and equity projection
///
/// Percentages are whole-number percent: `6.5` means 6.5%. Fields omitted
/// from JSON or CSV input read as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Original loan amount
    pub principal: f64,

    /// Annual nominal interest rate (%)
    pub annual_rate: f64,

    /// Loan term in years
    pub term_years: u32,

    /// Market value of the home at purchase
    pub home_value: f64,

    /// Annual home appreciation (%), may be negative
    pub annual_home_appreciation: f64,

    /// Gross household income per year
    pub annual_income: f64,

    /// Annual income growth (%), may be negative
    pub annual_income_growth: f64,

    /// Monthly payments on debts other than the mortgage
    pub monthly_other_loan_payments: f64,

    /// Annual change in other loan payments (%), may be negative
    pub annual_loan_payment_change: f64,

    /// Years until the home is sold; `None` or 0 means hold for the full term
    ///
    /// Input values that are not positive read as `None`. Fractions are
    /// truncated to whole years.
    #[serde(default, deserialize_with = "deserialize_ownership_years")]
    pub ownership_years: Option<u32>,

    /// Selling costs as a percent of the sale price
    pub selling_costs_percent: f64,

    /// Annual PMI premium as a percent of the outstanding balance
    pub pmi_rate_percent: f64,

    /// Annual property tax as a percent of assessed value
    pub property_tax_rate_percent: f64,

    /// Annual insurance premium as a percent of market value
    pub property_insurance_rate_percent: f64,

    pub monthly_maintenance: f64,

    #[serde(alias = "monthly_hoa_fees")]
    pub monthly_hoa: f64,

    /// Assessed value as a percent of market value
    pub assessed_value_percent: f64,

    /// Marginal income tax rate (%) applied to deductible interest and tax
    pub income_tax_rate_percent: f64,
}

/// Whole ownership years from a JSON number, a CSV cell or null
fn deserialize_ownership_years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OwnershipYears;

    impl<'de> Visitor<'de> for OwnershipYears {
        type Value = Option<u32>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number of years, an empty cell or null")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok((v > 0).then(|| u32::try_from(v).unwrap_or(u32::MAX)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok((v > 0).then(|| u32::try_from(v).unwrap_or(u32::MAX)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            let years = v.trunc();
            if years.is_nan() || years <= 0.0 {
                Ok(None)
            } else {
                // saturates above u32::MAX
                Ok(Some(years as u32))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            match v.parse::<f64>() {
                Ok(years) => self.visit_f64(years),
                Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(OwnershipYears)
}

impl SimulationParameters {
    /// Ownership period with the "unset or zero means full term" default applied
    pub fn effective_ownership_years(&self) -> u32 {
        match self.ownership_years {
            Some(years) if years > 0 => years,
            _ => self.term_years,
        }
    }

    /// Total number of scheduled loan payments
    pub fn num_payments(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    /// Month in which the sale is finalized
    pub fn sale_month(&self) -> u32 {
        self.effective_ownership_years().saturating_mul(12)
    }

    /// Number of rows the engine will emit
    pub fn horizon_months(&self) -> u32 {
        self.num_payments().min(self.sale_month())
    }

    /// Structural checks that must hold before the engine runs
    ///
    /// Range checks beyond these are left to the caller.
    pub fn validate(&self) -> Result<(), EngineError> {
        let amounts = [
            ("principal", self.principal),
            ("annual_rate", self.annual_rate),
            ("home_value", self.home_value),
            ("annual_home_appreciation", self.annual_home_appreciation),
            ("annual_income", self.annual_income),
            ("annual_income_growth", self.annual_income_growth),
            ("monthly_other_loan_payments", self.monthly_other_loan_payments),
            ("annual_loan_payment_change", self.annual_loan_payment_change),
            ("selling_costs_percent", self.selling_costs_percent),
            ("pmi_rate_percent", self.pmi_rate_percent),
            ("property_tax_rate_percent", self.property_tax_rate_percent),
            ("property_insurance_rate_percent", self.property_insurance_rate_percent),
            ("monthly_maintenance", self.monthly_maintenance),
            ("monthly_hoa", self.monthly_hoa),
            ("assessed_value_percent", self.assessed_value_percent),
            ("income_tax_rate_percent", self.income_tax_rate_percent),
        ];
        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(EngineError::invalid(field, format!("must be finite, got {value}")));
            }
        }

        if self.term_years == 0 {
            return Err(EngineError::invalid("term_years", "must be at least one year"));
        }
        if self.principal < 0.0 {
            return Err(EngineError::invalid(
                "principal",
                format!("must be non-negative, got {}", self.principal),
            ));
        }
        if self.home_value < 0.0 {
            return Err(EngineError::invalid(
                "home_value",
                format!("must be non-negative, got {}", self.home_value),
            ));
        }
        if self.annual_rate < 0.0 {
            return Err(EngineError::invalid(
                "annual_rate",
                format!("must be non-negative, got {}", self.annual_rate),
            ));
        }
        // (1 + a)^(1/12) has no real root below -100%
        if self.annual_home_appreciation <= -100.0 {
            return Err(EngineError::invalid(
                "annual_home_appreciation",
                format!("must be greater than -100, got {}", self.annual_home_appreciation),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SimulationParameters {
        SimulationParameters {
            principal: 300_000.0,
            annual_rate: 6.0,
            term_years: 30,
            home_value: 375_000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_ownership_defaults_to_term() {
        let mut params = base();
        assert_eq!(params.effective_ownership_years(), 30);

        params.ownership_years = Some(0);
        assert_eq!(params.effective_ownership_years(), 30);

        params.ownership_years = Some(7);
        assert_eq!(params.effective_ownership_years(), 7);
        assert_eq!(params.sale_month(), 84);
        assert_eq!(params.horizon_months(), 84);
    }

    #[test]
    fn test_ownership_beyond_term_stops_at_term() {
        let mut params = base();
        params.ownership_years = Some(40);
        assert_eq!(params.sale_month(), 480);
        assert_eq!(params.horizon_months(), 360);
    }

    #[test]
    fn test_validate_accepts_base() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_structural_errors() {
        let cases: Vec<(&str, SimulationParameters)> = vec![
            ("term_years", SimulationParameters { term_years: 0, ..base() }),
            ("principal", SimulationParameters { principal: -1.0, ..base() }),
            ("home_value", SimulationParameters { home_value: -5.0, ..base() }),
            ("annual_rate", SimulationParameters { annual_rate: -0.5, ..base() }),
            ("annual_home_appreciation", SimulationParameters { annual_home_appreciation: -100.0, ..base() }),
            ("pmi_rate_percent", SimulationParameters { pmi_rate_percent: f64::NAN, ..base() }),
            ("annual_income", SimulationParameters { annual_income: f64::INFINITY, ..base() }),
        ];

        for (expected, params) in cases {
            match params.validate() {
                Err(EngineError::InvalidParameter { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_negative_growth_is_allowed() {
        let params = SimulationParameters {
            annual_home_appreciation: -2.0,
            annual_income_growth: -1.0,
            annual_loan_payment_change: -10.0,
            ..base()
        };
        assert!(params.validate().is_ok());
    }
}
