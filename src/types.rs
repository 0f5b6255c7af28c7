use crate::error::WorkoutError;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair, stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Result<Self, WorkoutError> {
        let c = Self { lat, lng };
        if c.is_valid() {
            Ok(c)
        } else {
            Err(WorkoutError::InvalidCoords { lat, lng })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♂️",
        }
    }

    /// Name of the kind-specific input field.
    pub const fn extra_field(self) -> &'static str {
        match self {
            Self::Running => "cadence",
            Self::Cycling => "elevation gain",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    Distance,
    Date,
}

/// A logged session. `extra` holds cadence (running) or elevation gain
/// (cycling); `metric` holds pace (min/km) or speed (km/h).
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub(crate) id: String,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    kind: WorkoutKind,
    extra: f64,
    metric: f64,
    description: String,
}

/// Build a workout stamped with the current time.
pub fn create_workout(
    kind: WorkoutKind,
    coords: Coords,
    distance: f64,
    duration: f64,
    extra: f64,
) -> Result<Workout, WorkoutError> {
    Workout::create_at(kind, coords, distance, duration, extra, Utc::now())
}

impl Workout {
    pub fn create_at(
        kind: WorkoutKind,
        coords: Coords,
        distance: f64,
        duration: f64,
        extra: f64,
        date: DateTime<Utc>,
    ) -> Result<Self, WorkoutError> {
        Self::restore(id_for(date), date, kind, coords, distance, duration, extra)
    }

    /// Rebuild a workout from its base fields, recomputing everything derived.
    pub fn restore(
        id: String,
        date: DateTime<Utc>,
        kind: WorkoutKind,
        coords: Coords,
        distance: f64,
        duration: f64,
        extra: f64,
    ) -> Result<Self, WorkoutError> {
        validate(kind, distance, duration, extra)?;
        if !coords.is_valid() {
            return Err(WorkoutError::InvalidCoords {
                lat: coords.lat,
                lng: coords.lng,
            });
        }

        let metric = match kind {
            WorkoutKind::Running => duration / distance,
            WorkoutKind::Cycling => distance / (duration / 60.0),
        };

        Ok(Self {
            id,
            date,
            coords,
            distance,
            duration,
            kind,
            extra,
            metric,
            description: describe(kind, date),
        })
    }

    /// Same workout (id, date, location) with new measurements.
    pub fn revise(
        &self,
        kind: WorkoutKind,
        distance: f64,
        duration: f64,
        extra: f64,
    ) -> Result<Self, WorkoutError> {
        Self::restore(
            self.id.clone(),
            self.date,
            kind,
            self.coords,
            distance,
            duration,
            extra,
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.kind
    }

    /// Cadence or elevation gain, whichever the kind carries.
    pub const fn extra(&self) -> f64 {
        self.extra
    }

    /// Pace or speed, whichever the kind carries.
    pub const fn metric(&self) -> f64 {
        self.metric
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pace(&self) -> Option<f64> {
        (self.kind == WorkoutKind::Running).then_some(self.metric)
    }

    pub fn speed(&self) -> Option<f64> {
        (self.kind == WorkoutKind::Cycling).then_some(self.metric)
    }

    pub fn cadence(&self) -> Option<f64> {
        (self.kind == WorkoutKind::Running).then_some(self.extra)
    }

    pub fn elevation_gain(&self) -> Option<f64> {
        (self.kind == WorkoutKind::Cycling).then_some(self.extra)
    }
}

/// All inputs must be finite. Distance, duration and cadence must be positive;
/// elevation gain may be zero or negative (net descent).
pub fn validate(
    kind: WorkoutKind,
    distance: f64,
    duration: f64,
    extra: f64,
) -> Result<(), WorkoutError> {
    let extra_field = kind.extra_field();
    for (field, v) in [
        ("distance", distance),
        ("duration", duration),
        (extra_field, extra),
    ] {
        if !v.is_finite() {
            return Err(WorkoutError::NotFinite { field });
        }
    }

    let mut positive = vec![("distance", distance), ("duration", duration)];
    if kind == WorkoutKind::Running {
        positive.push((extra_field, extra));
    }
    for (field, v) in positive {
        if v <= 0.0 {
            return Err(WorkoutError::NotPositive { field });
        }
    }

    Ok(())
}

/// Last ten digits of the creation time in milliseconds.
pub fn id_for(date: DateTime<Utc>) -> String {
    let ms = date.timestamp_millis().to_string();
    let start = ms.len().saturating_sub(10);
    ms[start..].to_string()
}

fn describe(kind: WorkoutKind, date: DateTime<Utc>) -> String {
    let local = date.with_timezone(&Local);
    format!("{} on {}", kind.title(), local.format("%B %-d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn london() -> Coords {
        Coords::new(51.5, -0.1).unwrap()
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = create_workout(WorkoutKind::Running, london(), 5.2, 24.0, 178.0).unwrap();
        assert_eq!(w.pace(), Some(24.0 / 5.2));
        assert_eq!(w.speed(), None);
        assert_eq!(w.cadence(), Some(178.0));
        assert_eq!(w.kind().as_str(), "running");
        assert!((w.metric() - 4.615).abs() < 1e-3);
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let w = create_workout(WorkoutKind::Cycling, london(), 27.0, 95.0, 523.0).unwrap();
        assert_eq!(w.speed(), Some(27.0 / (95.0 / 60.0)));
        assert_eq!(w.elevation_gain(), Some(523.0));
        assert_eq!(format!("{:.1}", w.metric()), "17.1");
    }

    #[test]
    fn description_uses_local_month_and_day() {
        let date = at(1_713_096_000_000);
        let w = Workout::create_at(WorkoutKind::Running, london(), 5.0, 25.0, 170.0, date)
            .unwrap();
        let local = date.with_timezone(&Local);
        let expected = format!("Running on {}", local.format("%B %-d"));
        assert_eq!(w.description(), expected);
    }

    #[test]
    fn id_is_last_ten_digits_of_millis() {
        let date = at(1_713_096_000_123);
        assert_eq!(id_for(date), "3096000123");
        assert_eq!(id_for(at(42)), "42");
    }

    #[test]
    fn rejects_non_finite_and_non_positive_inputs() {
        let err = create_workout(WorkoutKind::Running, london(), f64::NAN, 24.0, 178.0);
        assert_eq!(err, Err(WorkoutError::NotFinite { field: "distance" }));

        let err = create_workout(WorkoutKind::Running, london(), 5.0, 0.0, 178.0);
        assert_eq!(err, Err(WorkoutError::NotPositive { field: "duration" }));

        let err = create_workout(WorkoutKind::Running, london(), 5.0, 20.0, -1.0);
        assert_eq!(err, Err(WorkoutError::NotPositive { field: "cadence" }));

        let err = create_workout(WorkoutKind::Cycling, london(), 5.0, 20.0, f64::INFINITY);
        assert_eq!(
            err,
            Err(WorkoutError::NotFinite {
                field: "elevation gain"
            })
        );
    }

    #[test]
    fn cycling_accepts_zero_and_negative_elevation() {
        assert!(create_workout(WorkoutKind::Cycling, london(), 10.0, 30.0, 0.0).is_ok());
        let downhill = create_workout(WorkoutKind::Cycling, london(), 10.0, 30.0, -120.0).unwrap();
        assert_eq!(downhill.elevation_gain(), Some(-120.0));
    }

    #[test]
    fn rejects_out_of_range_coords() {
        assert!(Coords::new(91.0, 0.0).is_err());
        assert!(Coords::new(0.0, -180.5).is_err());
        assert!(Coords::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn revise_keeps_identity_and_recomputes() {
        let w = create_workout(WorkoutKind::Running, london(), 5.0, 25.0, 170.0).unwrap();
        let edited = w.revise(WorkoutKind::Cycling, 20.0, 60.0, 100.0).unwrap();
        assert_eq!(edited.id(), w.id());
        assert_eq!(edited.date(), w.date());
        assert_eq!(edited.coords(), w.coords());
        assert_eq!(edited.speed(), Some(20.0));
        assert!(edited.description().starts_with("Cycling on "));
    }
}
