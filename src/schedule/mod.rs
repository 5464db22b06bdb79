//! Amortization engine and schedule output

mod state;
mod engine;
mod rows;
mod tax_benefit;

pub use state::{SimulationState, YearAccumulators};
pub use engine::{
    compute_schedule, level_payment, AmortizationEngine, EngineConfig, LoanTerms,
    DEFAULT_MAX_MONTHS, DEFAULT_PMI_CANCELLATION_LTV,
};
pub use rows::{Degeneracy, Schedule, ScheduleRow, ScheduleSummary, YearSummary};
pub use tax_benefit::{TaxBenefit, YearBuffer};
