//! Mortgage Projection - month-by-month amortization and home equity engine
//!
//! This library provides:
//! - Level-payment amortization with PMI cancellation
//! - Escrow-style property tax and insurance, reassessed yearly
//! - Household income and debt tracking for DTI reporting
//! - Annual tax-benefit accrual on deductible interest and property tax
//! - An optional sale event with selling costs and loan payoff
//! - Parallel batch runs over many parameter sets

pub mod error;
pub mod params;
pub mod report;
pub mod scenario;
pub mod schedule;

// Re-export commonly used types
pub use error::{EngineError, ParamsError};
pub use params::SimulationParameters;
pub use scenario::{Scenario, ScenarioOutcome, ScenarioRunner};
pub use schedule::{compute_schedule, AmortizationEngine, EngineConfig, Schedule, ScheduleRow};
