//! CSV and JSON writers for schedules and batch summaries

use std::io::Write;

use serde::Serialize;

use crate::scenario::ScenarioOutcome;
use crate::schedule::{Schedule, ScheduleRow, YearSummary};

/// Write monthly rows as CSV with a header line
///
/// Sale columns are empty on every row except the sale month.
pub fn write_schedule_csv<W: Write>(writer: W, rows: &[ScheduleRow]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the per-year rollup as CSV
pub fn write_yearly_csv<W: Write>(writer: W, years: &[YearSummary]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for year in years {
        wtr.serialize(year)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Pretty-printed JSON document with rows, degeneracies and the summary
pub fn schedule_to_json(schedule: &Schedule) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Document<'a> {
        summary: crate::schedule::ScheduleSummary,
        degeneracies: &'a [crate::schedule::Degeneracy],
        rows: &'a [ScheduleRow],
    }

    serde_json::to_string_pretty(&Document {
        summary: schedule.summary(),
        degeneracies: &schedule.degeneracies,
        rows: &schedule.rows,
    })
}

/// One line of batch output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub scenario: String,
    pub months: u32,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_pmi: f64,
    pub total_property_tax: f64,
    pub total_tax_benefit: f64,
    pub pmi_cancelled_month: Option<u32>,
    pub final_balance: f64,
    pub final_equity: f64,
    pub cumulative_equity_growth: f64,
    pub net_sales_proceeds: Option<f64>,
    pub degenerate: bool,
    pub error: Option<String>,
}

impl SummaryRecord {
    pub fn from_outcome(outcome: &ScenarioOutcome) -> Self {
        match &outcome.result {
            Ok(schedule) => {
                let summary = schedule.summary();
                Self {
                    scenario: outcome.name.clone(),
                    months: summary.total_months,
                    monthly_payment: schedule.rows.first().map(|r| r.payment).unwrap_or(0.0),
                    total_interest: summary.total_interest,
                    total_pmi: summary.total_pmi,
                    total_property_tax: summary.total_property_tax,
                    total_tax_benefit: summary.total_tax_benefit,
                    pmi_cancelled_month: summary.pmi_cancelled_month,
                    final_balance: summary.final_balance,
                    final_equity: summary.final_equity,
                    cumulative_equity_growth: summary.cumulative_equity_growth,
                    net_sales_proceeds: summary.net_sales_proceeds,
                    degenerate: schedule.is_degenerate(),
                    error: None,
                }
            }
            Err(err) => Self {
                scenario: outcome.name.clone(),
                error: Some(err.to_string()),
                ..Default::default()
            },
        }
    }
}

/// Write one summary line per scenario outcome
pub fn write_summaries_csv<W: Write>(writer: W, outcomes: &[ScenarioOutcome]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        wtr.serialize(SummaryRecord::from_outcome(outcome))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::params::SimulationParameters;
    use crate::schedule::compute_schedule;

    fn params() -> SimulationParameters {
        SimulationParameters {
            principal: 100_000.0,
            annual_rate: 5.0,
            term_years: 2,
            home_value: 125_000.0,
            ownership_years: Some(1),
            selling_costs_percent: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_schedule_csv_header_and_sale_cells() {
        let schedule = compute_schedule(&params()).unwrap();
        let mut buf = Vec::new();
        write_schedule_csv(&mut buf, &schedule.rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("year,from_month,to_month,beginning_balance"));
        assert!(lines[0].ends_with("sales_proceeds,selling_costs,loan_payoff,net_sales_proceeds"));
        // Non-sale rows end in four empty sale cells
        assert!(lines[1].ends_with(",,,,"));
        assert!(!lines[12].ends_with(",,,,"));
    }

    #[test]
    fn test_schedule_json_round_trips_rows() {
        let schedule = compute_schedule(&params()).unwrap();
        let json = schedule_to_json(&schedule).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["rows"].as_array().map(|r| r.len()), Some(12));
        assert_eq!(value["summary"]["total_months"], 12);
        assert!(value["rows"][0]["sales_proceeds"].is_null());
        assert!(value["rows"][11]["net_sales_proceeds"].is_number());
    }

    #[test]
    fn test_summaries_include_errors() {
        let outcomes = vec![
            ScenarioOutcome {
                name: "ok".into(),
                result: compute_schedule(&params()),
            },
            ScenarioOutcome {
                name: "broken".into(),
                result: Err(EngineError::invalid("term_years", "must be at least one year")),
            },
        ];

        let mut buf = Vec::new();
        write_summaries_csv(&mut buf, &outcomes).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("scenario,months,monthly_payment"));
        assert!(lines[1].starts_with("ok,12,"));
        assert!(lines[2].starts_with("broken,0,"));
        assert!(lines[2].contains("term_years"));
    }

    #[test]
    fn test_yearly_csv() {
        let schedule = compute_schedule(&SimulationParameters {
            ownership_years: None,
            ..params()
        })
        .unwrap();
        let mut buf = Vec::new();
        write_yearly_csv(&mut buf, &schedule.yearly()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
