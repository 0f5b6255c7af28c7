use crate::types::{Coords, SortKey, WorkoutKind};
use crate::utils::parse_coords;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "trailog.sqlite3";
const DEFAULT_KEY: &str = "workouts";

#[derive(Parser, Debug)]
#[command(
    name = "trailog",
    about = "Log running and cycling workouts pinned to map locations"
)]
pub struct Cli {
    /// SQLite file holding the saved workouts.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Storage key the collection is saved under.
    #[arg(long, default_value = DEFAULT_KEY, global = true)]
    pub key: String,

    /// Your current position. Without it map features (show, fit, add) are unavailable.
    #[arg(long, value_name = "LAT,LNG", value_parser = parse_coords, allow_hyphen_values = true, global = true)]
    pub at_home: Option<Coords>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Record a workout at a map location.
    Add {
        #[arg(value_enum)]
        kind: WorkoutKind,

        /// Where the workout happened.
        #[arg(long, value_name = "LAT,LNG", value_parser = parse_coords, allow_hyphen_values = true)]
        at: Coords,

        /// Kilometers.
        #[arg(long, allow_hyphen_values = true)]
        distance: Option<String>,

        /// Minutes.
        #[arg(long, allow_hyphen_values = true)]
        duration: Option<String>,

        /// Steps per minute (running).
        #[arg(long, allow_hyphen_values = true)]
        cadence: Option<String>,

        /// Meters climbed (cycling). May be negative.
        #[arg(long, allow_hyphen_values = true)]
        elevation: Option<String>,
    },

    /// Print the workout list in stored order.
    List {
        /// Emit list markup instead of tab-separated rows.
        #[arg(long)]
        html: bool,
    },

    /// Center the map on one workout.
    Show { id: String },

    /// Change a workout's measurements. Omitted fields keep their value.
    Edit {
        id: String,

        #[arg(long, value_enum)]
        kind: Option<WorkoutKind>,

        #[arg(long, allow_hyphen_values = true)]
        distance: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        duration: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        cadence: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        elevation: Option<String>,
    },

    /// Delete one workout.
    Delete { id: String },

    /// Delete every workout.
    Clear,

    /// Reorder the saved list.
    Sort {
        #[arg(value_enum)]
        by: SortKey,
    },

    /// Fit the map around all workouts.
    Fit,

    /// Write all workouts as GPX waypoints.
    ExportGpx { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_negative_elevation() {
        let cli = Cli::parse_from([
            "trailog",
            "add",
            "cycling",
            "--at",
            "51.5,-0.1",
            "--distance",
            "27",
            "--duration",
            "95",
            "--elevation",
            "-20",
        ]);
        match cli.cmd {
            Cmd::Add {
                kind,
                at,
                elevation,
                cadence,
                ..
            } => {
                assert_eq!(kind, WorkoutKind::Cycling);
                assert_eq!(at, Coords::new(51.5, -0.1).unwrap());
                assert_eq!(elevation.as_deref(), Some("-20"));
                assert_eq!(cadence, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.key, "workouts");
    }

    #[test]
    fn parses_sort_key() {
        let cli = Cli::parse_from(["trailog", "--at-home", "1,2", "sort", "date"]);
        assert!(matches!(cli.cmd, Cmd::Sort { by: SortKey::Date }));
        assert_eq!(cli.at_home, Some(Coords::new(1.0, 2.0).unwrap()));
    }
}
