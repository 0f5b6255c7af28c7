use crate::blob::BlobStore;
use crate::dlog;
use crate::error::StorageError;
use crate::types::{Coords, Workout, WorkoutKind, id_for};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const WORKOUTS_KEY: &str = "workouts";

/// On-disk shape of one workout. Derived fields are written for readability
/// and ignored on load.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    kind: WorkoutKind,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl From<&Workout> for WorkoutRecord {
    fn from(w: &Workout) -> Self {
        Self {
            id: Some(w.id().to_string()),
            date: Some(w.date()),
            kind: w.kind(),
            coords: w.coords(),
            distance: w.distance(),
            duration: w.duration(),
            cadence: w.cadence(),
            elevation_gain: w.elevation_gain(),
            pace: w.pace(),
            speed: w.speed(),
            description: Some(w.description().to_string()),
        }
    }
}

impl WorkoutRecord {
    /// The workout, and whether `id` or `date` had to be filled in.
    fn into_workout(self) -> Option<(Workout, bool)> {
        let extra = match self.kind {
            WorkoutKind::Running => self.cadence?,
            WorkoutKind::Cycling => self.elevation_gain?,
        };
        let filled = self.id.is_none() || self.date.is_none();
        let date = self.date.unwrap_or_else(Utc::now);
        let id = self.id.unwrap_or_else(|| id_for(date));

        match Workout::restore(
            id,
            date,
            self.kind,
            self.coords,
            self.distance,
            self.duration,
            extra,
        ) {
            Ok(w) => Some((w, filled)),
            Err(e) => {
                dlog!("dropping invalid saved workout err={e}");
                None
            }
        }
    }
}

/// Result of reading the stored collection.
#[derive(Debug, Default)]
pub struct Loaded {
    pub workouts: Vec<Workout>,
    /// Entries were dropped or given a fresh id/date, so the stored value no
    /// longer matches `workouts`.
    pub repaired: bool,
}

/// Keeps the whole collection under one key of a [`BlobStore`].
pub struct WorkoutRepository<B> {
    blobs: B,
    key: String,
}

impl<B: BlobStore> WorkoutRepository<B> {
    pub fn new(blobs: B) -> Self {
        Self::with_key(blobs, WORKOUTS_KEY)
    }

    pub fn with_key(blobs: B, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn blobs(&self) -> &B {
        &self.blobs
    }

    pub const fn blobs_mut(&mut self) -> &mut B {
        &mut self.blobs
    }

    pub fn into_inner(self) -> B {
        self.blobs
    }

    /// Overwrite the stored collection with `workouts`, in order.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<(), StorageError> {
        let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
        let data = serde_json::to_string(&records)?;
        self.blobs.set(&self.key, &data)?;
        dlog!("saved workouts count={} key={}", workouts.len(), self.key);
        Ok(())
    }

    /// Read the stored collection. Missing or unreadable data yields an empty
    /// list; individual bad entries are skipped.
    pub fn load(&self) -> Result<Vec<Workout>, StorageError> {
        Ok(self.load_checked()?.workouts)
    }

    /// Like [`WorkoutRepository::load`], also reporting whether anything had
    /// to be dropped or filled in.
    pub fn load_checked(&self) -> Result<Loaded, StorageError> {
        let Some(data) = self.blobs.get(&self.key)? else {
            return Ok(Loaded::default());
        };

        let entries: Vec<JsonValue> = match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(key = %self.key, err = %e, "saved workouts unreadable; starting empty");
                return Ok(Loaded::default());
            }
        };

        let total = entries.len();
        let mut filled = 0usize;
        let workouts: Vec<Workout> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<WorkoutRecord>(entry) {
                Ok(record) => record.into_workout(),
                Err(e) => {
                    dlog!("dropping malformed saved workout err={e}");
                    None
                }
            })
            .map(|(w, was_filled)| {
                filled += usize::from(was_filled);
                w
            })
            .collect();

        let dropped = total - workouts.len();
        if dropped > 0 {
            tracing::warn!(
                kept = workouts.len(),
                dropped,
                "skipped unreadable saved workouts"
            );
        }
        if filled > 0 {
            dlog!("assigned id/date to saved workouts count={filled}");
        }
        Ok(Loaded {
            workouts,
            repaired: dropped > 0 || filled > 0,
        })
    }

    /// Remove the stored collection entirely.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.blobs.remove(&self.key)?;
        dlog!("cleared workouts key={}", self.key);
        Ok(())
    }
}
