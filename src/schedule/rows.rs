//! Output structures for an amortization schedule

use serde::{Deserialize, Serialize};

/// A single month of the amortization and equity projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    // Timing
    pub year: u32,
    pub from_month: u32,
    pub to_month: u32,

    // Loan
    pub beginning_balance: f64,
    pub payment: f64,
    pub interest_payment: f64,
    pub principal_payment: f64,
    pub ending_balance: f64,

    // Home value and equity
    pub beginning_home_value: f64,
    pub ending_home_value: f64,
    pub beginning_equity: f64,
    pub ending_equity: f64,
    pub equity_growth: f64,
    pub cumulative_equity_growth: f64,
    pub ltv: f64,

    // Household obligations
    pub monthly_income: f64,
    pub monthly_loan_payments: f64,

    // Escrow and carrying costs
    pub pmi_payment: f64,
    pub assessed_value: f64,
    pub property_tax: f64,
    pub property_insurance: f64,
    pub maintenance: f64,
    pub hoa_fees: f64,
    pub total_housing_payment: f64,

    // Tax benefit (year-end summary fields, monthly average on every row)
    pub tax_deduction: f64,
    pub tax_benefit: f64,
    pub monthly_tax_benefit: f64,

    // Sale, populated on the sale month only
    pub sales_proceeds: Option<f64>,
    pub selling_costs: Option<f64>,
    pub loan_payoff: Option<f64>,
    pub net_sales_proceeds: Option<f64>,
}

impl ScheduleRow {
    /// Create an empty row for the given 1-based month
    pub fn new(month: u32) -> Self {
        Self {
            year: month.div_ceil(12),
            from_month: month.saturating_sub(1),
            to_month: month,
            beginning_balance: 0.0,
            payment: 0.0,
            interest_payment: 0.0,
            principal_payment: 0.0,
            ending_balance: 0.0,
            beginning_home_value: 0.0,
            ending_home_value: 0.0,
            beginning_equity: 0.0,
            ending_equity: 0.0,
            equity_growth: 0.0,
            cumulative_equity_growth: 0.0,
            ltv: 0.0,
            monthly_income: 0.0,
            monthly_loan_payments: 0.0,
            pmi_payment: 0.0,
            assessed_value: 0.0,
            property_tax: 0.0,
            property_insurance: 0.0,
            maintenance: 0.0,
            hoa_fees: 0.0,
            total_housing_payment: 0.0,
            tax_deduction: 0.0,
            tax_benefit: 0.0,
            monthly_tax_benefit: 0.0,
            sales_proceeds: None,
            selling_costs: None,
            loan_payoff: None,
            net_sales_proceeds: None,
        }
    }

    /// Whether this row carries the sale event
    pub fn is_sale(&self) -> bool {
        self.sales_proceeds.is_some()
    }

    /// Whether this row closes a 12-month block
    pub fn is_year_end(&self) -> bool {
        self.to_month % 12 == 0
    }
}

/// Degenerate inputs the engine handled with a defined convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degeneracy {
    /// Home value of zero: LTV is reported as 0 and PMI is never charged
    ZeroHomeValue,
    /// Interest rate of zero: payment is principal spread evenly over the term
    ZeroInterestRate,
    /// Rate so small the annuity factor underflows: payment falls back to
    /// principal spread evenly over the term
    NegligibleInterestRate,
}

/// Complete result of one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Monthly rows in month order
    pub rows: Vec<ScheduleRow>,

    /// Degenerate conditions encountered while computing the rows
    pub degeneracies: Vec<Degeneracy>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            degeneracies: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_degenerate(&self) -> bool {
        !self.degeneracies.is_empty()
    }

    /// The row carrying the sale event, if the sale falls inside the term
    pub fn sale_row(&self) -> Option<&ScheduleRow> {
        self.rows.iter().find(|r| r.is_sale())
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_payments: f64 = self.rows.iter().map(|r| r.payment).sum();
        let total_interest: f64 = self.rows.iter().map(|r| r.interest_payment).sum();
        let total_principal: f64 = self.rows.iter().map(|r| r.principal_payment).sum();
        let total_pmi: f64 = self.rows.iter().map(|r| r.pmi_payment).sum();
        let total_property_tax: f64 = self.rows.iter().map(|r| r.property_tax).sum();
        let total_property_insurance: f64 = self.rows.iter().map(|r| r.property_insurance).sum();
        let total_tax_benefit: f64 = self.rows.iter().map(|r| r.tax_benefit).sum();

        let pmi_cancelled_month = if total_pmi > 0.0 {
            self.rows
                .iter()
                .skip_while(|r| r.pmi_payment == 0.0)
                .find(|r| r.pmi_payment == 0.0)
                .map(|r| r.to_month)
        } else {
            None
        };

        let last = self.rows.last();

        ScheduleSummary {
            total_months: self.rows.len() as u32,
            total_payments,
            total_interest,
            total_principal,
            total_pmi,
            total_property_tax,
            total_property_insurance,
            total_tax_benefit,
            pmi_cancelled_month,
            final_balance: last.map(|r| r.ending_balance).unwrap_or(0.0),
            final_home_value: last.map(|r| r.ending_home_value).unwrap_or(0.0),
            final_equity: last.map(|r| r.ending_equity).unwrap_or(0.0),
            cumulative_equity_growth: last.map(|r| r.cumulative_equity_growth).unwrap_or(0.0),
            net_sales_proceeds: self.sale_row().and_then(|r| r.net_sales_proceeds),
        }
    }

    /// Roll the monthly rows up into one entry per schedule year
    pub fn yearly(&self) -> Vec<YearSummary> {
        let mut years: Vec<YearSummary> = Vec::new();

        for row in &self.rows {
            if years.last().is_none_or(|y| y.year != row.year) {
                years.push(YearSummary {
                    year: row.year,
                    beginning_balance: row.beginning_balance,
                    beginning_home_value: row.beginning_home_value,
                    ..Default::default()
                });
            }
            let Some(entry) = years.last_mut() else {
                continue;
            };

            entry.months += 1;
            entry.ending_balance = row.ending_balance;
            entry.ending_home_value = row.ending_home_value;
            entry.interest += row.interest_payment;
            entry.principal += row.principal_payment;
            entry.pmi += row.pmi_payment;
            entry.property_tax += row.property_tax;
            entry.property_insurance += row.property_insurance;
            entry.hoa_fees += row.hoa_fees;
            entry.total_housing_payment += row.total_housing_payment;
            entry.tax_deduction += row.tax_deduction;
            entry.tax_benefit += row.tax_benefit;
            entry.equity_growth += row.equity_growth;
        }

        years
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_months: u32,
    pub total_payments: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_pmi: f64,
    pub total_property_tax: f64,
    pub total_property_insurance: f64,
    pub total_tax_benefit: f64,
    /// First month without PMI after PMI had been charged
    pub pmi_cancelled_month: Option<u32>,
    pub final_balance: f64,
    pub final_home_value: f64,
    pub final_equity: f64,
    pub cumulative_equity_growth: f64,
    pub net_sales_proceeds: Option<f64>,
}

/// One schedule year rolled up from its monthly rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub months: u32,
    pub beginning_balance: f64,
    pub ending_balance: f64,
    pub beginning_home_value: f64,
    pub ending_home_value: f64,
    pub interest: f64,
    pub principal: f64,
    pub pmi: f64,
    pub property_tax: f64,
    pub property_insurance: f64,
    pub hoa_fees: f64,
    pub total_housing_payment: f64,
    pub tax_deduction: f64,
    pub tax_benefit: f64,
    pub equity_growth: f64,
}
