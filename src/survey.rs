//! Loading longitudinal survey rows and grouping them by village, visit and agent.
//!
//! Columns are looked up by name in the header row, so the input may carry any number of extra
//! columns in any order. Header cells are compared after stripping a UTF-8 byte-order mark, which
//! spreadsheet exports tend to prepend to the first column name.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

use crate::error::TrachomaError;
use crate::log::{debug, info, trace};
use crate::village::{Agent, AgentId, Village, VillageId, VisitNumber};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Names of the columns read from the survey file. Clinical signs are taken from the right eye.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyColumns {
    pub village: String,
    pub agent: String,
    pub infected: String,
    pub visit: String,
    pub age: String,
    pub ocular: String,
    pub tf: String,
    pub ti: String,
    pub gender: String,
    pub nasal: String,
    pub flies: String,
}

impl Default for SurveyColumns {
    fn default() -> Self {
        SurveyColumns {
            village: "VID".to_string(),
            agent: "CID".to_string(),
            infected: "IndividualPCR".to_string(),
            visit: "visit".to_string(),
            age: "age".to_string(),
            ocular: "ocular".to_string(),
            tf: "RTF".to_string(),
            ti: "RTI".to_string(),
            gender: "gender".to_string(),
            nasal: "nasal".to_string(),
            flies: "flies".to_string(),
        }
    }
}

/// Positions of the survey columns within a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColumnIndices {
    pub village: usize,
    pub agent: usize,
    pub infected: usize,
    pub visit: usize,
    pub age: usize,
    pub ocular: usize,
    pub tf: usize,
    pub ti: usize,
    pub gender: usize,
    pub nasal: usize,
    pub flies: usize,
}

impl ColumnIndices {
    /// Finds every column of `columns` in `headers`.
    ///
    /// # Errors
    ///
    /// Returns `TrachomaError::MissingColumn` naming the first column that is not present.
    pub fn from_headers(
        headers: &StringRecord,
        columns: &SurveyColumns,
    ) -> Result<Self, TrachomaError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim_start_matches(BYTE_ORDER_MARK) == name)
                .ok_or_else(|| TrachomaError::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndices {
            village: find(&columns.village)?,
            agent: find(&columns.agent)?,
            infected: find(&columns.infected)?,
            visit: find(&columns.visit)?,
            age: find(&columns.age)?,
            ocular: find(&columns.ocular)?,
            tf: find(&columns.tf)?,
            ti: find(&columns.ti)?,
            gender: find(&columns.gender)?,
            nasal: find(&columns.nasal)?,
            flies: find(&columns.flies)?,
        })
    }
}

/// Settings that control how survey rows are admitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub columns: SurveyColumns,
    /// Maximum number of unique agents admitted per village. Rows that would add a new agent to
    /// a full village are skipped; rows for agents already admitted are kept.
    pub agent_limits: BTreeMap<VillageId, usize>,
}

/// All villages in a survey, keyed by village id.
#[derive(Debug, Default)]
pub struct SurveyData {
    villages: BTreeMap<VillageId, Village>,
}

impl SurveyData {
    /// Reads a survey CSV from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, a required column is missing, or a village
    /// id or visit number is not an integer.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: &LoadOptions,
    ) -> Result<Self, TrachomaError> {
        let path = path.as_ref();
        info!("Loading survey data from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file, options)
    }

    /// Reads a survey CSV from any reader.
    ///
    /// # Errors
    ///
    /// See [`SurveyData::from_path`].
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self, TrachomaError> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let indices = ColumnIndices::from_headers(reader.headers()?, &options.columns)?;

        let mut data = SurveyData::default();
        let mut rows: u64 = 0;
        let mut skipped: u64 = 0;

        for result in reader.records() {
            let record = result?;
            rows += 1;
            if !data.add_record(&record, &indices, options)? {
                skipped += 1;
            }
        }

        info!(
            "Loaded {} rows into {} villages ({} skipped)",
            rows,
            data.villages.len(),
            skipped
        );
        Ok(data)
    }

    /// Returns false when the row was skipped because its village is full.
    fn add_record(
        &mut self,
        record: &StringRecord,
        indices: &ColumnIndices,
        options: &LoadOptions,
    ) -> Result<bool, TrachomaError> {
        let line = record.position().map_or(0, csv::Position::line);
        let village_id: VillageId =
            parse_integer(record, indices.village, &options.columns.village, line)?;
        let visit: VisitNumber = parse_integer(record, indices.visit, &options.columns.visit, line)?;
        let id = AgentId(field(record, indices.agent).to_string());

        let village = self
            .villages
            .entry(village_id)
            .or_insert_with(|| Village::new(village_id));

        if let Some(&limit) = options.agent_limits.get(&village_id) {
            if !village.contains_agent(&id) && village.num_agents() >= limit {
                trace!("line {line}: village {village_id} is full, skipping agent {id}");
                return Ok(false);
            }
        }

        let agent = Agent {
            household: id.household(),
            id,
            infected: field(record, indices.infected) == "P",
            age: field(record, indices.age).to_string(),
            ocular: is_flag_set(field(record, indices.ocular)),
            tf: is_flag_set(field(record, indices.tf)),
            ti: is_flag_set(field(record, indices.ti)),
            gender: field(record, indices.gender).to_string(),
            nasal: field(record, indices.nasal).to_string(),
            flies: field(record, indices.flies).to_string(),
        };
        village.record(visit, agent);
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `TrachomaError::UnknownVillage` if no row carried this village id.
    pub fn village(&self, id: VillageId) -> Result<&Village, TrachomaError> {
        self.villages
            .get(&id)
            .ok_or(TrachomaError::UnknownVillage(id))
    }

    /// Villages in ascending id order.
    pub fn villages(&self) -> impl Iterator<Item = &Village> {
        self.villages.values()
    }

    pub fn village_ids(&self) -> impl Iterator<Item = VillageId> + '_ {
        self.villages.keys().copied()
    }

    #[must_use]
    pub fn num_villages(&self) -> usize {
        self.villages.len()
    }
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default().trim()
}

fn is_flag_set(value: &str) -> bool {
    value == "1"
}

fn parse_integer(
    record: &StringRecord,
    index: usize,
    column: &str,
    line: u64,
) -> Result<i64, TrachomaError> {
    let value = field(record, index);
    value.parse().map_err(|_| {
        debug!("line {line}: `{value}` in column `{column}` is not an integer");
        TrachomaError::InvalidValue {
            line,
            column: column.to_string(),
            value: value.to_string(),
        }
    })
}
