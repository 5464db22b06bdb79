//! Debt-to-income ratios derived from schedule rows

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleRow;

/// DTI percentages for one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtToIncome {
    /// Housing payment share of income
    pub front_end: f64,
    /// Other-debt share of income
    pub non_housing: f64,
    /// Housing plus other debt share of income
    pub back_end: f64,
}

impl DebtToIncome {
    /// `None` when there is no income to divide by
    pub fn from_row(row: &ScheduleRow) -> Option<Self> {
        Self::from_amounts(row.total_housing_payment, row.monthly_loan_payments, row.monthly_income)
    }

    pub fn from_amounts(housing: f64, other_debt: f64, monthly_income: f64) -> Option<Self> {
        if monthly_income.is_nan() || monthly_income <= 0.0 {
            return None;
        }
        Some(Self {
            front_end: housing / monthly_income * 100.0,
            non_housing: other_debt / monthly_income * 100.0,
            back_end: (housing + other_debt) / monthly_income * 100.0,
        })
    }
}
