//! The JSON parameter file.
//!
//! ```json
//! {
//!     "parameters": {
//!         "base_transmission_rate": 0.05,
//!         "base_recovery_rate": 0.2,
//!         "household_multiplier": 3.0,
//!         "ti_multiplier": 1.5,
//!         "ocular_multiplier": 1.2
//!     },
//!     "columns": { "visit": "visit", "ti": "RTI" },
//!     "agent_limits": { "587": 101 }
//! }
//! ```
//!
//! Every section is optional. Missing column names fall back to the defaults of
//! [`SurveyColumns`](crate::survey::SurveyColumns).

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrachomaError;
use crate::log::info;
use crate::survey::{LoadOptions, SurveyColumns};
use crate::transmission::TransmissionParameters;
use crate::village::VillageId;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parameters: TransmissionParameters,
    pub columns: SurveyColumns,
    pub agent_limits: BTreeMap<VillageId, usize>,
}

impl Config {
    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON for this struct, or the
    /// transmission parameters fail validation.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TrachomaError> {
        let path = path.as_ref();
        info!("Loading parameters from {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(reader)?;
        config.parameters.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            columns: self.columns.clone(),
            agent_limits: self.agent_limits.clone(),
        }
    }
}
