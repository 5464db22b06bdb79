//! Simulation parameters and loading

mod data;
pub mod loader;

pub use data::SimulationParameters;
pub use loader::{load_params_json, load_scenarios_csv, load_scenarios_from_reader, params_from_json_str};
