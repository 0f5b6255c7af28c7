use crate::types::Coords;
use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

/// `trailog`'s own log level for `-v`/`-q` counts, starting from INFO.
/// Each `-v` steps toward TRACE and each `-q` toward ERROR.
pub fn log_level(verbose: u8, quiet: u8) -> tracing::Level {
    use tracing::Level;
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => Level::ERROR,
        -1 => Level::WARN,
        0 => Level::INFO,
        1 => Level::DEBUG,
        2..=i16::MAX => Level::TRACE,
    }
}

/// Log to stderr so stdout stays clean for list rows and exports.
/// Dependencies are held at WARN; `RUST_LOG` replaces the whole filter.
pub fn init_logging(verbose: u8, quiet: u8) {
    let level = log_level(verbose, quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,trailog={}", level.as_str().to_lowercase()))
    });
    let show_src = level >= tracing::Level::DEBUG;

    fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(show_src)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

/// Parse `"LAT,LNG"` for the command line.
pub fn parse_coords(s: &str) -> Result<Coords, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude {lng:?}: {e}"))?;
    Coords::new(lat, lng).map_err(|e| e.to_string())
}
