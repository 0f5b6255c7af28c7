use thiserror::Error;

/// Rejected workout input. Surfaced inline on the form, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkoutError {
    #[error("{field} must be a number")]
    NotFinite { field: &'static str },

    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("invalid coordinates: lat={lat} lng={lng}")]
    InvalidCoords { lat: f64, lng: f64 },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("permission to read the position was denied")]
    Denied,

    #[error("position unavailable")]
    Unavailable,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("no workout with id {0}")]
    UnknownWorkout(String),
}
