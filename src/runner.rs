use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::TrachomaError;
use crate::initial_state::validate_infected_fraction;
use crate::log::{info, set_log_level, LevelFilter};
use crate::random::get_rng;
use crate::report::{
    agent_states_file_name, initial_state_file_name, write_agent_states, write_initial_state,
    write_matrices,
};
use crate::survey::SurveyData;
use crate::village::VillageId;

/// Command line arguments for the `trachoma` binary
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "trachoma", version)]
#[command(about = "Builds per-village transmission matrices and agent timelines from survey data")]
pub struct BaseArgs {
    /// Survey CSV with one row per agent per visit
    #[arg(short, long)]
    pub input: PathBuf,

    /// Village to export; may be repeated. Defaults to every village in the input
    #[arg(short, long = "village")]
    pub villages: Vec<VillageId>,

    /// Optional path for a JSON parameter file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for output files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also write the infection and recovery matrices of each village
    #[arg(short = 'm', long)]
    pub write_matrices: bool,

    /// Also write a random initial state with this fraction of agents infected
    #[arg(long)]
    pub initial_infected: Option<f64>,

    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Enable logging at this level (error, warn, info, debug, trace)
    #[arg(short, long)]
    pub log_level: Option<LevelFilter>,
}

/// What a run wrote.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub villages: Vec<VillageId>,
    pub files: Vec<PathBuf>,
}

/// Parses the process arguments and runs.
///
/// # Errors
/// Returns an error if loading, matrix construction or writing fails
pub fn run_with_args() -> Result<RunSummary, TrachomaError> {
    run(BaseArgs::parse())
}

/// Runs with already parsed arguments.
///
/// # Errors
/// Returns an error if loading, matrix construction or writing fails
pub fn run(args: BaseArgs) -> Result<RunSummary, TrachomaError> {
    if let Some(level) = args.log_level {
        set_log_level(level);
    }

    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    // Fail before any file is written.
    if let Some(fraction) = args.initial_infected {
        validate_infected_fraction(fraction)?;
    }

    let data = SurveyData::from_path(&args.input, &config.load_options())?;

    let village_ids: Vec<VillageId> = if args.villages.is_empty() {
        data.village_ids().collect()
    } else {
        args.villages.clone()
    };

    let mut summary = RunSummary::default();
    for vid in village_ids {
        summary
            .files
            .extend(export_village(&data, vid, &config, &args)?);
        summary.villages.push(vid);
    }
    info!(
        "Exported {} villages, {} files",
        summary.villages.len(),
        summary.files.len()
    );
    Ok(summary)
}

fn export_village(
    data: &SurveyData,
    vid: VillageId,
    config: &Config,
    args: &BaseArgs,
) -> Result<Vec<PathBuf>, TrachomaError> {
    let village = data.village(vid)?;
    let output_dir = args.output_dir.as_path();
    let mut files = Vec::new();

    let states_path = output_dir.join(agent_states_file_name(vid));
    write_agent_states(village, &states_path)?;
    files.push(states_path);

    if args.write_matrices {
        let matrices = village.matrices(&config.parameters)?;
        files.extend(write_matrices(village, &matrices, output_dir)?);
    }

    if let Some(fraction) = args.initial_infected {
        let mut rng = get_rng(args.random_seed, &format!("initial_state_{vid}"));
        let state = village.random_initial_state(fraction, &mut rng)?;
        let path = output_dir.join(initial_state_file_name(vid));
        write_initial_state(village, &state, &path)?;
        files.push(path);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const SURVEY: &str = "\u{feff}visit,VID,CID,IndividualPCR,age,ocular,RTF,RTI,gender,nasal,flies\n\
        1,10,1000001001,P,4,1,1,0,1,0,0\n\
        1,10,1000001002,N,6,0,0,1,2,1,1\n\
        2,10,1000001001,N,5,0,0,0,1,0,0\n\
        1,20,2000001001,N,30,0,0,0,2,0,0\n";

    fn args(dir: &Path) -> BaseArgs {
        let input = dir.join("survey.csv");
        fs::write(&input, SURVEY).unwrap();
        BaseArgs {
            input,
            villages: Vec::new(),
            config: None,
            output_dir: dir.join("out"),
            write_matrices: false,
            initial_infected: None,
            random_seed: 0,
            log_level: None,
        }
    }

    #[test]
    fn parses_arguments() {
        let args = BaseArgs::try_parse_from([
            "trachoma",
            "--input",
            "survey.csv",
            "--village",
            "10",
            "-v",
            "20",
            "-m",
            "--initial-infected",
            "0.25",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.villages, vec![10, 20]);
        assert!(args.write_matrices);
        assert_eq!(args.initial_infected, Some(0.25));
        assert_eq!(args.log_level, Some(LevelFilter::Debug));
        assert_eq!(args.output_dir, PathBuf::from("."));
    }

    #[test]
    fn input_is_required() {
        assert!(BaseArgs::try_parse_from(["trachoma"]).is_err());
    }

    #[test]
    fn exports_every_village_by_default() {
        let temp_dir = tempdir().unwrap();
        let summary = run(args(temp_dir.path())).unwrap();
        assert_eq!(summary.villages, vec![10, 20]);
        assert_eq!(summary.files.len(), 2);

        let states = fs::read_to_string(temp_dir.path().join("out/10_agent_states.csv")).unwrap();
        assert_eq!(states, "1000001001,True,False\n1000001002,False,?\n");
    }

    #[test]
    fn exports_requested_village_with_extras() {
        let temp_dir = tempdir().unwrap();
        let mut args = args(temp_dir.path());
        args.villages = vec![10];
        args.write_matrices = true;
        args.initial_infected = Some(0.5);

        let summary = run(args).unwrap();
        assert_eq!(summary.villages, vec![10]);
        let names: Vec<String> = summary
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "10_agent_states.csv",
                "vid_10_infection_matrix.csv",
                "vid_10_recovery_matrix.csv",
                "vid_10_initial_state.csv",
            ]
        );
    }

    #[test]
    fn unknown_village_fails() {
        let temp_dir = tempdir().unwrap();
        let mut args = args(temp_dir.path());
        args.villages = vec![99];
        assert!(matches!(
            run(args),
            Err(TrachomaError::UnknownVillage(99))
        ));
    }

    #[test]
    fn config_is_applied() {
        let temp_dir = tempdir().unwrap();
        let config = temp_dir.path().join("config.json");
        fs::write(
            &config,
            r#"{ "parameters": {
                "base_transmission_rate": 0.5,
                "base_recovery_rate": 0.25,
                "household_multiplier": 2.0,
                "ti_multiplier": 1.0,
                "ocular_multiplier": 1.0
            } }"#,
        )
        .unwrap();
        let mut args = args(temp_dir.path());
        args.config = Some(config);
        args.villages = vec![10];
        args.write_matrices = true;
        run(args).unwrap();

        let recovery =
            fs::read_to_string(temp_dir.path().join("out/vid_10_recovery_matrix.csv")).unwrap();
        assert_eq!(recovery, "0.25,0\n0,0.25\n");
        let infection =
            fs::read_to_string(temp_dir.path().join("out/vid_10_infection_matrix.csv")).unwrap();
        assert_eq!(infection, "0,1\n1,0\n");
    }

    #[test]
    fn bad_fraction_fails_before_writing() {
        let temp_dir = tempdir().unwrap();
        let mut args = args(temp_dir.path());
        args.initial_infected = Some(2.0);
        assert!(run(args).is_err());
        assert!(!temp_dir.path().join("out").exists());
    }
}
