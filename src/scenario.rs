//! Scenario runner for batch projections
//!
//! Every scenario is computed independently, so batches run in parallel
//! with no coordination beyond collecting results in input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::params::SimulationParameters;
use crate::schedule::{AmortizationEngine, EngineConfig, Schedule};

/// A labelled parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub params: SimulationParameters,
}

impl Scenario {
    pub fn new(name: impl Into<String>, params: SimulationParameters) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Result of running one scenario
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<Schedule, EngineError>,
}

/// Shared engine configuration applied to every scenario in a batch
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let outcomes = runner.run_batch(&scenarios);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: AmortizationEngine,
}

impl ScenarioRunner {
    /// Create runner with the default engine configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: AmortizationEngine::new(config),
        }
    }

    /// Run a single projection
    pub fn run(&self, params: &SimulationParameters) -> Result<Schedule, EngineError> {
        self.engine.compute(params)
    }

    /// Run many scenarios in parallel, preserving input order
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        log::info!("running {} scenarios", scenarios.len());

        let outcomes: Vec<ScenarioOutcome> = scenarios
            .par_iter()
            .map(|scenario| ScenarioOutcome {
                name: scenario.name.clone(),
                result: self.engine.compute(&scenario.params),
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            log::warn!("{failed} of {} scenarios were rejected", outcomes.len());
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(name: &str, ownership_years: Option<u32>, annual_rate: f64) -> Scenario {
        Scenario::new(
            name,
            SimulationParameters {
                principal: 250_000.0,
                annual_rate,
                term_years: 30,
                home_value: 300_000.0,
                annual_home_appreciation: 3.0,
                ownership_years,
                selling_costs_percent: 6.0,
                pmi_rate_percent: 0.5,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_batch_matches_sequential() {
        let runner = ScenarioRunner::new();
        let scenarios: Vec<_> = (1..=20)
            .map(|years| scenario(&format!("hold-{years}"), Some(years), 5.0 + years as f64 * 0.1))
            .collect();

        let outcomes = runner.run_batch(&scenarios);
        assert_eq!(outcomes.len(), scenarios.len());

        for (outcome, scenario) in outcomes.iter().zip(&scenarios) {
            assert_eq!(outcome.name, scenario.name);
            let expected = runner.run(&scenario.params).unwrap();
            assert_eq!(outcome.result.as_ref().unwrap(), &expected);
        }
    }

    #[test]
    fn test_batch_isolates_failures() {
        let runner = ScenarioRunner::new();
        let mut bad = scenario("bad", None, 6.0);
        bad.params.term_years = 0;
        let scenarios = vec![scenario("good", Some(5), 6.0), bad];

        let outcomes = runner.run_batch(&scenarios);
        assert_eq!(outcomes[0].result.as_ref().map(|s| s.len()), Ok(60));
        assert!(matches!(
            outcomes[1].result,
            Err(EngineError::InvalidParameter { field: "term_years", .. })
        ));
    }

    #[test]
    fn test_higher_rate_costs_more_interest() {
        let runner = ScenarioRunner::new();
        let outcomes = runner.run_batch(&[scenario("low", None, 4.0), scenario("high", None, 7.0)]);

        let low = outcomes[0].result.as_ref().unwrap().summary();
        let high = outcomes[1].result.as_ref().unwrap().summary();
        assert!(high.total_interest > low.total_interest);
    }
}
