//! Per-village transmission models from longitudinal trachoma survey data.
//!
//! A survey file holds one row per participant per visit, with the participant's village,
//! infection status (PCR) and clinical covariates. This crate
//!
//! * groups the rows by village, visit and agent ([`survey`], [`village`]),
//! * builds for each village an N×N infection-probability matrix and a diagonal recovery-rate
//!   matrix from the agents' covariates ([`transmission`]),
//! * reshapes the visits into one timeline per agent and writes it out, with `?` for visits at
//!   which an agent was not seen ([`report`]),
//! * optionally draws a random initial infection state for simulation ([`initial_state`]).
//!
//! The `trachoma` binary wires these together; see [`runner::BaseArgs`] for its arguments and
//! [`config`] for the parameter file.
pub mod config;
pub mod error;
pub mod hashing;
pub mod initial_state;
pub mod log;
pub mod matrix;
pub mod random;
pub mod report;
pub mod runner;
pub mod survey;
pub mod transmission;
pub mod village;

pub use error::TrachomaError;
pub use survey::{LoadOptions, SurveyData};
pub use transmission::{TransmissionMatrices, TransmissionParameters};
pub use village::{Agent, AgentId, HouseholdId, Village, VillageId, VisitNumber};
