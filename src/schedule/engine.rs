//! Core amortization engine for monthly loan and equity projections

use serde::{Deserialize, Serialize};

use super::rows::{Degeneracy, Schedule, ScheduleRow};
use super::state::SimulationState;
use super::tax_benefit::{TaxBenefit, YearBuffer};
use crate::error::EngineError;
use crate::params::SimulationParameters;

/// Default LTV (%) at or below which PMI is cancelled
pub const DEFAULT_PMI_CANCELLATION_LTV: f64 = 80.0;

/// Default iteration cap (100 years of monthly payments)
pub const DEFAULT_MAX_MONTHS: u32 = 1200;

/// Configuration for an engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// PMI is charged while LTV is strictly above this percentage
    pub pmi_cancellation_ltv: f64,

    /// Longest loan horizon, in months, the engine will simulate
    pub max_months: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pmi_cancellation_ltv: DEFAULT_PMI_CANCELLATION_LTV,
            max_months: DEFAULT_MAX_MONTHS,
        }
    }
}

/// Loan constants derived once per run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub monthly_rate: f64,
    pub num_payments: u32,
    pub monthly_payment: f64,
    pub monthly_home_growth_rate: f64,
    pub sale_month: u32,
    /// Number of months simulated: the earlier of payoff and sale
    pub horizon: u32,
}

impl LoanTerms {
    pub fn from_params(params: &SimulationParameters) -> Self {
        let monthly_rate = params.annual_rate / 100.0 / 12.0;
        let num_payments = params.num_payments();
        let sale_month = params.sale_month();

        Self {
            monthly_rate,
            num_payments,
            monthly_payment: level_payment(params.principal, monthly_rate, num_payments),
            monthly_home_growth_rate: (1.0 + params.annual_home_appreciation / 100.0).powf(1.0 / 12.0) - 1.0,
            sale_month,
            horizon: num_payments.min(sale_month),
        }
    }
}

/// Annuity denominator `1 - (1 + r)^-n`
///
/// Evaluated through `ln_1p`/`exp_m1` so rates far below `f64::EPSILON`
/// keep their precision. `None` when the factor is not a usable positive
/// number, which includes a zero rate.
fn annuity_factor(monthly_rate: f64, num_payments: u32) -> Option<f64> {
    let factor = -(-(num_payments as f64) * monthly_rate.ln_1p()).exp_m1();
    (factor.is_finite() && factor > 0.0).then_some(factor)
}

/// Fixed monthly payment that retires `principal` over `num_payments` months
///
/// Falls back to `principal / num_payments` when the rate is zero or too
/// small for the annuity factor to be represented.
pub fn level_payment(principal: f64, monthly_rate: f64, num_payments: u32) -> f64 {
    if num_payments == 0 {
        return 0.0;
    }
    match annuity_factor(monthly_rate, num_payments) {
        Some(factor) if monthly_rate != 0.0 => principal * monthly_rate / factor,
        _ => principal / num_payments as f64,
    }
}

/// Loan-to-value (%) against the original purchase value
///
/// `None` when there is no home value to measure against.
fn loan_to_value(balance: f64, original_home_value: f64) -> Option<f64> {
    if original_home_value > 0.0 {
        Some(balance / original_home_value * 100.0)
    } else {
        None
    }
}

/// Main amortization engine
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: EngineConfig,
}

impl AmortizationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compute the full month-by-month schedule
    ///
    /// Returns an error, and no rows, when the parameters are structurally
    /// invalid. Degenerate but computable inputs are recorded on the
    /// returned [`Schedule`].
    pub fn compute(&self, params: &SimulationParameters) -> Result<Schedule, EngineError> {
        params.validate()?;

        let terms = LoanTerms::from_params(params);
        if terms.num_payments > self.config.max_months {
            return Err(EngineError::HorizonTooLong {
                months: terms.num_payments,
                limit: self.config.max_months,
            });
        }

        let mut schedule = Schedule::new();
        if params.home_value == 0.0 {
            log::warn!("home value is zero; LTV reported as 0 and PMI disabled");
            schedule.degeneracies.push(Degeneracy::ZeroHomeValue);
        }
        if terms.monthly_rate == 0.0 {
            log::warn!("interest rate is zero; payment is principal / {} months", terms.num_payments);
            schedule.degeneracies.push(Degeneracy::ZeroInterestRate);
        } else if annuity_factor(terms.monthly_rate, terms.num_payments).is_none() {
            log::warn!(
                "monthly rate {:e} underflows the annuity factor; payment is principal / {} months",
                terms.monthly_rate,
                terms.num_payments
            );
            schedule.degeneracies.push(Degeneracy::NegligibleInterestRate);
        }

        log::debug!(
            "payment {:.2} over {} months, sale month {}, simulating {} months",
            terms.monthly_payment,
            terms.num_payments,
            terms.sale_month,
            terms.horizon
        );

        let mut state = SimulationState::from_params(params);
        let mut buffer = YearBuffer::new();
        schedule.rows.reserve(terms.horizon as usize);

        for _month in 1..=terms.horizon {
            state.advance_month();

            if state.is_year_start() {
                buffer.clear();
                self.apply_annual_step(params, &mut state);
            }

            let mut row = self.calculate_month(params, &terms, &mut state);

            if state.month == terms.sale_month {
                finalize_sale(params, &state, &mut row);
            }

            let (ending_balance, ending_home_value) = (row.ending_balance, row.ending_home_value);
            buffer.push(row);

            if state.month % 12 == 0 || state.month == terms.sale_month {
                let tax = TaxBenefit::from_totals(&state.ytd, params.income_tax_rate_percent);
                log::trace!(
                    "year {}: deduction {:.2}, benefit {:.2}",
                    state.year(),
                    tax.deduction,
                    tax.benefit
                );
                buffer.flush_into(tax, &mut schedule.rows);
            }

            // BOP values for next month come from this month's EOP
            state.balance = ending_balance;
            state.home_value = ending_home_value;
        }

        Ok(schedule)
    }

    /// Yearly step: household growth, reassessment and the PMI check
    fn apply_annual_step(&self, params: &SimulationParameters, state: &mut SimulationState) {
        state.apply_household_growth(params);
        state.reassess(params);

        let was_active = state.pmi_active;
        let ltv = loan_to_value(state.balance, params.home_value);
        state.update_pmi(ltv, self.config.pmi_cancellation_ltv, params.pmi_rate_percent);

        if was_active && !state.pmi_active {
            log::debug!("PMI cancelled at month {} (LTV {:.2}%)", state.month, ltv.unwrap_or(0.0));
        }
    }

    /// Payment split, equity movement and carrying costs for one month
    fn calculate_month(
        &self,
        params: &SimulationParameters,
        terms: &LoanTerms,
        state: &mut SimulationState,
    ) -> ScheduleRow {
        let mut row = ScheduleRow::new(state.month);

        let balance = state.balance;
        let interest_payment = balance * terms.monthly_rate;
        let principal_payment = terms.monthly_payment - interest_payment;
        let ending_balance = balance - principal_payment;

        let beginning_equity = state.home_value - balance;
        let ending_home_value = state.home_value * (1.0 + terms.monthly_home_growth_rate);
        let ending_equity = ending_home_value - ending_balance;
        let equity_growth = ending_equity - beginning_equity;

        state.cumulative_equity_growth += equity_growth;
        state.ytd.property_tax += state.property_tax;
        state.ytd.interest += interest_payment;

        row.beginning_balance = balance;
        row.payment = terms.monthly_payment;
        row.interest_payment = interest_payment;
        row.principal_payment = principal_payment;
        row.ending_balance = ending_balance;

        row.beginning_home_value = state.home_value;
        row.ending_home_value = ending_home_value;
        row.beginning_equity = beginning_equity;
        row.ending_equity = ending_equity;
        row.equity_growth = equity_growth;
        row.cumulative_equity_growth = state.cumulative_equity_growth;
        row.ltv = loan_to_value(balance, params.home_value).unwrap_or(0.0);

        row.monthly_income = state.monthly_income;
        row.monthly_loan_payments = state.monthly_loan_payments;

        row.pmi_payment = state.pmi_payment;
        row.assessed_value = state.assessed_value;
        row.property_tax = state.property_tax;
        row.property_insurance = state.property_insurance;
        row.maintenance = params.monthly_maintenance;
        row.hoa_fees = params.monthly_hoa;
        // Maintenance is reported but not escrowed
        row.total_housing_payment = terms.monthly_payment
            + state.property_tax
            + state.property_insurance
            + params.monthly_hoa
            + state.pmi_payment;

        row
    }
}

/// Sale at the start-of-month value, paying off the start-of-month balance
fn finalize_sale(params: &SimulationParameters, state: &SimulationState, row: &mut ScheduleRow) {
    let sales_proceeds = state.home_value;
    let selling_costs = sales_proceeds * (params.selling_costs_percent / 100.0);
    let loan_payoff = state.balance;
    let net_sales_proceeds = sales_proceeds - selling_costs - loan_payoff;

    log::debug!(
        "sale at month {}: proceeds {:.2}, costs {:.2}, payoff {:.2}, net {:.2}",
        state.month,
        sales_proceeds,
        selling_costs,
        loan_payoff,
        net_sales_proceeds
    );

    row.sales_proceeds = Some(sales_proceeds);
    row.selling_costs = Some(selling_costs);
    row.loan_payoff = Some(loan_payoff);
    row.net_sales_proceeds = Some(net_sales_proceeds);
}

/// Compute a schedule with the default engine configuration
pub fn compute_schedule(params: &SimulationParameters) -> Result<Schedule, EngineError> {
    AmortizationEngine::default().compute(params)
}
