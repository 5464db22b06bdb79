//! Fixed-width console rendering of a schedule

use super::dti::DebtToIncome;
use crate::schedule::ScheduleRow;

/// Render up to `limit` rows (all rows when `None`) as a console table
pub fn format_table(rows: &[ScheduleRow], limit: Option<usize>) -> String {
    let shown = limit.unwrap_or(rows.len()).min(rows.len());
    let mut out = String::new();

    out.push_str(&format!(
        "{:>5} {:>4} {:>10} {:>10} {:>10} {:>8} {:>10} {:>12} {:>7} {:>12} {:>12} {:>7} {:>7} {:>9} {:>12}\n",
        "Month", "Year", "Payment", "Interest", "Principal", "PMI", "Housing", "Balance", "LTV%",
        "Home Value", "Equity", "FE DTI", "BE DTI", "Tax/Mo", "Net Sale"
    ));
    out.push_str(&"-".repeat(152));
    out.push('\n');

    for row in &rows[..shown] {
        let (front, back) = match DebtToIncome::from_row(row) {
            Some(dti) => (format!("{:.2}", dti.front_end), format!("{:.2}", dti.back_end)),
            None => ("-".to_string(), "-".to_string()),
        };
        let net_sale = row
            .net_sales_proceeds
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!(
            "{:>5} {:>4} {:>10.2} {:>10.2} {:>10.2} {:>8.2} {:>10.2} {:>12.2} {:>7.2} {:>12.2} {:>12.2} {:>7} {:>7} {:>9.2} {:>12}\n",
            row.to_month,
            row.year,
            row.payment,
            row.interest_payment,
            row.principal_payment,
            row.pmi_payment,
            row.total_housing_payment,
            row.ending_balance,
            row.ltv,
            row.ending_home_value,
            row.ending_equity,
            front,
            back,
            row.monthly_tax_benefit,
            net_sale,
        ));
    }

    if rows.len() > shown {
        out.push_str(&format!("... ({} more months)\n", rows.len() - shown));
    }

    out
}
