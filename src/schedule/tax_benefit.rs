//! Annual tax-benefit reconciliation
//!
//! Rows are held until the year's deductible totals are known, then patched
//! and released in month order.

use super::rows::ScheduleRow;
use super::state::YearAccumulators;

/// Tax benefit figures for one (possibly partial) year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBenefit {
    pub deduction: f64,
    pub benefit: f64,
    /// Annual benefit spread evenly over twelve months
    pub monthly: f64,
}

impl TaxBenefit {
    pub fn from_totals(ytd: &YearAccumulators, income_tax_rate_percent: f64) -> Self {
        let deduction = ytd.deduction();
        let benefit = deduction * (income_tax_rate_percent / 100.0);
        Self {
            deduction,
            benefit,
            monthly: benefit / 12.0,
        }
    }
}

/// Rows of the current year awaiting reconciliation
#[derive(Debug, Default)]
pub struct YearBuffer {
    rows: Vec<ScheduleRow>,
}

impl YearBuffer {
    pub fn new() -> Self {
        Self { rows: Vec::with_capacity(12) }
    }

    pub fn push(&mut self, row: ScheduleRow) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Backfill the year's tax benefit and move the rows into `out`
    ///
    /// Every row gets the monthly average; only a row closing a 12-month
    /// block carries the annual deduction and benefit.
    pub fn flush_into(&mut self, tax: TaxBenefit, out: &mut Vec<ScheduleRow>) {
        for mut row in self.rows.drain(..) {
            let year_end = row.is_year_end();
            row.tax_deduction = if year_end { tax.deduction } else { 0.0 };
            row.tax_benefit = if year_end { tax.benefit } else { 0.0 };
            row.monthly_tax_benefit = tax.monthly;
            out.push(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tax_benefit_from_totals() {
        let ytd = YearAccumulators { property_tax: 3_600.0, interest: 17_800.0 };
        let tax = TaxBenefit::from_totals(&ytd, 25.0);
        assert_relative_eq!(tax.deduction, 21_400.0, max_relative = 1e-12);
        assert_relative_eq!(tax.benefit, 5_350.0, max_relative = 1e-12);
        assert_relative_eq!(tax.monthly, 5_350.0 / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_flush_full_year() {
        let mut buffer = YearBuffer::new();
        for month in 13..=24 {
            buffer.push(ScheduleRow::new(month));
        }
        let tax = TaxBenefit { deduction: 1200.0, benefit: 240.0, monthly: 20.0 };

        let mut out = Vec::new();
        buffer.flush_into(tax, &mut out);

        assert!(buffer.is_empty());
        assert_eq!(out.len(), 12);
        assert_eq!(out.iter().map(|r| r.to_month).collect::<Vec<_>>(), (13..=24).collect::<Vec<_>>());
        for row in &out[..11] {
            assert_eq!(row.tax_deduction, 0.0);
            assert_eq!(row.tax_benefit, 0.0);
            assert_eq!(row.monthly_tax_benefit, 20.0);
        }
        assert_eq!(out[11].tax_deduction, 1200.0);
        assert_eq!(out[11].tax_benefit, 240.0);
    }

    #[test]
    fn test_flush_partial_year_has_no_year_end_row() {
        let mut buffer = YearBuffer::new();
        for month in 1..=5 {
            buffer.push(ScheduleRow::new(month));
        }
        let mut out = Vec::new();
        buffer.flush_into(TaxBenefit { deduction: 500.0, benefit: 100.0, monthly: 100.0 / 12.0 }, &mut out);

        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|r| r.tax_deduction == 0.0 && r.tax_benefit == 0.0));
        assert!(out.iter().all(|r| r.monthly_tax_benefit > 0.0));
    }
}
