//! Presentation helpers: DTI ratios, file writers and console tables

mod dti;
mod table;
mod writer;

pub use dti::DebtToIncome;
pub use table::format_table;
pub use writer::{schedule_to_json, write_schedule_csv, write_summaries_csv, write_yearly_csv, SummaryRecord};
