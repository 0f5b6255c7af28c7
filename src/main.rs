#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use trailog::app::{App, POSITION_ALERT, SubmitOutcome};
use trailog::blob::SqliteBlobStore;
use trailog::cli::{self, Cmd};
use trailog::location::FixedLocation;
use trailog::persistence::WorkoutRepository;
use trailog::terminal::{TerminalMap, TerminalSurface};
use trailog::view::{DEFAULT_ZOOM, FormInput};
use trailog::{gpx, utils};

#[macro_use]
extern crate trailog;

type CliApp = App<SqliteBlobStore, TerminalMap, TerminalSurface>;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let blobs = SqliteBlobStore::open(&cli.db)
        .with_context(|| format!("opening workout database: {}", cli.db.display()))?;
    dlog!("db={} key={}", cli.db.display(), cli.key);

    let repo = WorkoutRepository::with_key(blobs, cli.key.as_str());
    let mut app = App::load(repo, TerminalMap::default(), TerminalSurface::default())
        .context("loading saved workouts")?;
    app.boot(&mut FixedLocation(cli.at_home));

    match cli.cmd {
        Cmd::Add {
            kind,
            at,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            require_map(&app)?;
            app.on_map_click(at);
            app.on_kind_change(kind);
            let input = FormInput {
                kind,
                distance: distance.unwrap_or_default(),
                duration: duration.unwrap_or_default(),
                cadence: cadence.unwrap_or_default(),
                elevation: elevation.unwrap_or_default(),
            };
            let outcome = app.submit(&input)?;
            report_submit(&app, outcome)?;
        }
        Cmd::List { html } => {
            if app.store().is_empty() {
                eprintln!("No workouts yet.");
            } else if html {
                print!("{}", app.surface().html());
            } else {
                print_rows(&app);
            }
        }
        Cmd::Show { id } => {
            require_map(&app)?;
            let Some(at) = app.focus(&id) else {
                bail!("No workout with id {id}");
            };
            println!("{at}\tzoom {DEFAULT_ZOOM}");
        }
        Cmd::Edit {
            id,
            kind,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let mut input = app.begin_edit(&id)?;
            if let Some(kind) = kind {
                input.kind = kind;
                app.on_kind_change(kind);
            }
            if let Some(v) = distance {
                input.distance = v;
            }
            if let Some(v) = duration {
                input.duration = v;
            }
            if let Some(v) = cadence {
                input.cadence = v;
            }
            if let Some(v) = elevation {
                input.elevation = v;
            }
            let outcome = app.submit(&input)?;
            report_submit(&app, outcome)?;
        }
        Cmd::Delete { id } => match app.delete(&id)? {
            Some(w) => println!("Deleted {}\t{}", w.id(), w.description()),
            None => tracing::warn!(id = %id, "no workout with that id; nothing deleted"),
        },
        Cmd::Clear => {
            app.delete_all()?;
            println!("Deleted all workouts.");
        }
        Cmd::Sort { by } => {
            app.sort_by(by)?;
            print_rows(&app);
        }
        Cmd::Fit => {
            require_map(&app)?;
            match app.zoom_to_fit() {
                Some(b) => println!("{}\t{}", b.south_west, b.north_east),
                None => eprintln!("No workouts to fit."),
            }
        }
        Cmd::ExportGpx { path } => {
            gpx::export_waypoints(&path, app.store().as_slice())?;
            println!("Wrote {} waypoints to {}", app.store().len(), path.display());
        }
    }

    Ok(())
}

fn require_map(app: &CliApp) -> Result<()> {
    if app.map_ready() {
        return Ok(());
    }
    bail!("{POSITION_ALERT}. Pass --at-home LAT,LNG to enable map features.")
}

fn report_submit(app: &CliApp, outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved(id) => {
            if let Some(item) = app.surface().items.iter().find(|i| i.id == id) {
                println!("Saved {id}\t{}", item.title);
            }
            Ok(())
        }
        SubmitOutcome::Rejected(e) => bail!("Invalid workout: {e}"),
        SubmitOutcome::Ignored => bail!("No form open; nothing saved"),
    }
}

fn print_rows(app: &CliApp) {
    for row in app.surface().rows() {
        println!("{row}");
    }
}
