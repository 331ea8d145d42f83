//! Writers for the per-village output tables.
//!
//! * `<VID>_agent_states.csv`: one row per agent, the agent id followed by its infection status
//!   at each visit (`True`/`False`), `?` where the agent was not observed. No header row.
//! * `vid_<VID>_infection_matrix.csv` / `vid_<VID>_recovery_matrix.csv`: the matrices, one CSV
//!   line per row.
//! * `vid_<VID>_initial_state.csv`: agent id and initial state (`1` infected, `0` susceptible).

use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use serde::Serialize;

use crate::error::TrachomaError;
use crate::log::info;
use crate::transmission::TransmissionMatrices;
use crate::village::{AgentId, Village, VillageId};

/// Placeholder written for visits at which an agent was not observed.
pub const UNOBSERVED: &str = "?";

#[must_use]
pub fn agent_states_file_name(village: VillageId) -> String {
    format!("{village}_agent_states.csv")
}

#[must_use]
pub fn infection_matrix_file_name(village: VillageId) -> String {
    format!("vid_{village}_infection_matrix.csv")
}

#[must_use]
pub fn recovery_matrix_file_name(village: VillageId) -> String {
    format!("vid_{village}_recovery_matrix.csv")
}

#[must_use]
pub fn initial_state_file_name(village: VillageId) -> String {
    format!("vid_{village}_initial_state.csv")
}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist.
fn generate_validate_filepath(path: &Path) -> Result<File, TrachomaError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(TrachomaError::ReportError(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

fn headerless_writer(path: &Path) -> Result<Writer<File>, TrachomaError> {
    let file = generate_validate_filepath(path)?;
    Ok(WriterBuilder::new().has_headers(false).from_writer(file))
}

/// The cells of one agent's row in the agent states table.
#[must_use]
pub fn agent_state_row(village: &Village, agent: &AgentId) -> Vec<String> {
    let mut row = Vec::with_capacity(village.num_visits() + 1);
    row.push(agent.to_string());
    row.extend(village.timeline(agent).into_iter().map(|status| match status {
        Some(true) => "True".to_string(),
        Some(false) => "False".to_string(),
        None => UNOBSERVED.to_string(),
    }));
    row
}

/// Writes the agent states table for `village` to `path`.
///
/// # Errors
///
/// Returns an error if `path` is not a `.csv` file or cannot be written.
pub fn write_agent_states(village: &Village, path: &Path) -> Result<(), TrachomaError> {
    let mut writer = headerless_writer(path)?;
    for agent in village.agents() {
        writer.write_record(agent_state_row(village, agent))?;
    }
    writer.flush()?;
    info!(
        "Wrote {} agents x {} visits for village {} to {}",
        village.num_agents(),
        village.num_visits(),
        village.id(),
        path.display()
    );
    Ok(())
}

/// Writes both matrices of `village` into `directory` and returns the paths written.
///
/// # Errors
///
/// Returns an error if either file cannot be written.
pub fn write_matrices(
    village: &Village,
    matrices: &TransmissionMatrices,
    directory: &Path,
) -> Result<[PathBuf; 2], TrachomaError> {
    let infection_path = directory.join(infection_matrix_file_name(village.id()));
    let recovery_path = directory.join(recovery_matrix_file_name(village.id()));

    matrices
        .infection
        .write_csv(generate_validate_filepath(&infection_path)?)?;
    matrices
        .recovery
        .write_csv(generate_validate_filepath(&recovery_path)?)?;

    info!(
        "Wrote {0}x{0} matrices for village {1} to {2}",
        matrices.infection.dim(),
        village.id(),
        directory.display()
    );
    Ok([infection_path, recovery_path])
}

#[derive(Serialize)]
struct InitialStateRecord<'a> {
    agent: &'a str,
    infected: u8,
}

/// Writes an initial state vector, in matrix order, with a header row.
///
/// # Errors
///
/// Returns an error if the state length differs from the number of agents or the file cannot be
/// written.
pub fn write_initial_state(
    village: &Village,
    state: &[bool],
    path: &Path,
) -> Result<(), TrachomaError> {
    if state.len() != village.num_agents() {
        return Err(TrachomaError::ReportError(format!(
            "initial state has {} entries but village {} has {} agents",
            state.len(),
            village.id(),
            village.num_agents()
        )));
    }

    let file = generate_validate_filepath(path)?;
    let mut writer = Writer::from_writer(file);
    for (agent, infected) in village.agents().zip(state) {
        writer.serialize(InitialStateRecord {
            agent: &agent.0,
            infected: u8::from(*infected),
        })?;
    }
    writer.flush()?;
    Ok(())
}
