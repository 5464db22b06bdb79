//! Load simulation parameters from JSON documents and scenario CSV files

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::Reader;

use super::SimulationParameters;
use crate::error::ParamsError;
use crate::scenario::Scenario;

/// Optional CSV column carrying a scenario label
pub const SCENARIO_COLUMN: &str = "scenario";

/// Parse a single parameter record from a JSON string
pub fn params_from_json_str(json: &str) -> Result<SimulationParameters, ParamsError> {
    Ok(serde_json::from_str(json)?)
}

/// Load and validate a single parameter record from a JSON file
pub fn load_params_json(path: &Path) -> Result<SimulationParameters, ParamsError> {
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;

    let params = params_from_json_str(&contents)?;
    params.validate().map_err(|source| ParamsError::Invalid {
        scenario: path.display().to_string(),
        source,
    })?;
    Ok(params)
}

/// Load scenarios from a CSV file, one parameter record per line
///
/// Header names are the snake_case parameter names. Missing columns read as
/// zero and an empty `ownership_years` cell means "hold for the full term".
/// Records are not validated here; the engine rejects them individually.
pub fn load_scenarios_csv(path: &Path) -> Result<Vec<Scenario>, ParamsError> {
    let file = File::open(path)?;
    load_scenarios_from_reader(file)
}

/// Load scenarios from any CSV reader
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<Scenario>, ParamsError> {
    let mut csv_reader = Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let name_index = headers.iter().position(|h| h == SCENARIO_COLUMN);

    let mut scenarios = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result?;
        let params: SimulationParameters = record.deserialize(Some(&headers))?;

        let name = name_index
            .and_then(|i| record.get(i))
            .filter(|label| !label.trim().is_empty())
            .map(|label| label.trim().to_string())
            .unwrap_or_else(|| format!("scenario-{}", index + 1));

        scenarios.push(Scenario { name, params });
    }

    log::debug!("loaded {} scenarios", scenarios.len());
    Ok(scenarios)
}
