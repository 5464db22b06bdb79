//! Mutable simulation state for a single schedule computation

use crate::params::SimulationParameters;

/// Year-to-date totals feeding the annual tax deduction
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearAccumulators {
    pub property_tax: f64,
    pub interest: f64,
}

impl YearAccumulators {
    /// Deductible amount for the year so far
    pub fn deduction(&self) -> f64 {
        self.property_tax + self.interest
    }
}

/// State of the loan and household at the start of a month
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current month (1-indexed, 0 before the first advance)
    pub month: u32,

    /// Outstanding balance at the start of the month
    pub balance: f64,

    /// Market value at the start of the month
    pub home_value: f64,

    pub monthly_income: f64,
    pub monthly_loan_payments: f64,

    /// Cleared permanently once LTV first reaches the cancellation threshold
    pub pmi_active: bool,

    // Escrow amounts, reset once per year
    pub pmi_payment: f64,
    pub assessed_value: f64,
    pub property_tax: f64,
    pub property_insurance: f64,

    /// Running sum of equity growth, never reset
    pub cumulative_equity_growth: f64,

    pub ytd: YearAccumulators,
}

impl SimulationState {
    /// Initialize state from parameters at projection start
    pub fn from_params(params: &SimulationParameters) -> Self {
        Self {
            month: 0,
            balance: params.principal,
            home_value: params.home_value,
            monthly_income: params.annual_income / 12.0,
            monthly_loan_payments: params.monthly_other_loan_payments,
            pmi_active: true,
            pmi_payment: 0.0,
            assessed_value: 0.0,
            property_tax: 0.0,
            property_insurance: 0.0,
            cumulative_equity_growth: 0.0,
            ytd: YearAccumulators::default(),
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.month += 1;
        if self.is_year_start() {
            self.ytd = YearAccumulators::default();
        }
    }

    /// First month of a 12-month block
    pub fn is_year_start(&self) -> bool {
        self.month % 12 == 1
    }

    /// Schedule year (1-indexed)
    pub fn year(&self) -> u32 {
        self.month.div_ceil(12)
    }

    /// Apply annual growth to income and other debt payments
    ///
    /// Growth compounds from the second year on; the first year uses the
    /// starting amounts.
    pub fn apply_household_growth(&mut self, params: &SimulationParameters) {
        if self.month <= 12 {
            return;
        }
        self.monthly_income *= 1.0 + params.annual_income_growth / 100.0;
        self.monthly_loan_payments *= 1.0 + params.annual_loan_payment_change / 100.0;
    }

    /// Re-base assessed value, property tax and insurance on the current home value
    pub fn reassess(&mut self, params: &SimulationParameters) {
        self.assessed_value = params.assessed_value_percent / 100.0 * self.home_value;
        self.property_tax = self.assessed_value * (params.property_tax_rate_percent / 100.0) / 12.0;
        self.property_insurance =
            self.home_value * (params.property_insurance_rate_percent / 100.0) / 12.0;
    }

    /// Set this year's PMI; once cancelled it never comes back
    pub fn update_pmi(&mut self, ltv: Option<f64>, threshold: f64, pmi_rate_percent: f64) {
        match ltv {
            Some(ltv) if self.pmi_active && ltv > threshold => {
                self.pmi_payment = pmi_rate_percent / 100.0 * self.balance / 12.0;
            }
            _ => {
                self.pmi_payment = 0.0;
                self.pmi_active = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> SimulationParameters {
        SimulationParameters {
            principal: 300_000.0,
            annual_rate: 6.0,
            term_years: 30,
            home_value: 375_000.0,
            annual_income: 120_000.0,
            annual_income_growth: 3.0,
            monthly_other_loan_payments: 500.0,
            annual_loan_payment_change: -10.0,
            property_tax_rate_percent: 1.2,
            property_insurance_rate_percent: 0.5,
            assessed_value_percent: 80.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let state = SimulationState::from_params(&params());
        assert_eq!(state.month, 0);
        assert_eq!(state.balance, 300_000.0);
        assert_relative_eq!(state.monthly_income, 10_000.0, max_relative = 1e-12);
        assert!(state.pmi_active);
    }

    #[test]
    fn test_year_start_resets_accumulators() {
        let mut state = SimulationState::from_params(&params());
        state.advance_month();
        assert!(state.is_year_start());
        state.ytd.interest = 100.0;

        for _ in 0..11 {
            state.advance_month();
        }
        assert_eq!(state.month, 12);
        assert_eq!(state.ytd.interest, 100.0);

        state.advance_month();
        assert_eq!(state.year(), 2);
        assert_eq!(state.ytd, YearAccumulators::default());
    }

    #[test]
    fn test_household_growth_skips_first_year() {
        let p = params();
        let mut state = SimulationState::from_params(&p);
        state.month = 1;
        state.apply_household_growth(&p);
        assert_relative_eq!(state.monthly_income, 10_000.0, max_relative = 1e-12);
        assert_relative_eq!(state.monthly_loan_payments, 500.0, max_relative = 1e-12);

        state.month = 13;
        state.apply_household_growth(&p);
        assert_relative_eq!(state.monthly_income, 10_300.0, max_relative = 1e-12);
        assert_relative_eq!(state.monthly_loan_payments, 450.0, max_relative = 1e-12);
    }

    #[test]
    fn test_reassess() {
        let p = params();
        let mut state = SimulationState::from_params(&p);
        state.reassess(&p);
        assert_relative_eq!(state.assessed_value, 300_000.0, max_relative = 1e-12);
        assert_relative_eq!(state.property_tax, 300.0, max_relative = 1e-12);
        assert_relative_eq!(state.property_insurance, 375_000.0 * 0.005 / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_pmi_is_sticky_once_cancelled() {
        let mut state = SimulationState::from_params(&params());
        state.update_pmi(Some(85.0), 80.0, 0.6);
        assert_relative_eq!(state.pmi_payment, 0.006 * 300_000.0 / 12.0, max_relative = 1e-12);

        state.update_pmi(Some(80.0), 80.0, 0.6);
        assert_eq!(state.pmi_payment, 0.0);
        assert!(!state.pmi_active);

        state.update_pmi(Some(95.0), 80.0, 0.6);
        assert_eq!(state.pmi_payment, 0.0);
    }

    #[test]
    fn test_pmi_without_ltv_basis_is_disabled() {
        let mut state = SimulationState::from_params(&params());
        state.update_pmi(None, 80.0, 0.6);
        assert_eq!(state.pmi_payment, 0.0);
        assert!(!state.pmi_active);
    }
}
