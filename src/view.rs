//! View model and the two view ports: the map and the user-facing surface.

use crate::error::WorkoutError;
use crate::types::{Coords, Workout, WorkoutKind};

pub const DEFAULT_ZOOM: u8 = 13;
pub const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Map provider capabilities the controller relies on.
pub trait MapView {
    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool);
    fn add_tile_layer(&mut self, url: &str, attribution: &str);
    /// Adds a new marker on every call.
    fn add_marker(&mut self, marker: Marker);
    fn clear_markers(&mut self);
    fn fit_bounds(&mut self, bounds: Bounds);
}

/// Form, list container and messages shown to the user.
pub trait Surface {
    fn clear_list(&mut self);
    fn append_item(&mut self, item: ListItem);
    fn show_form(&mut self, prefill: &FormInput);
    fn hide_form(&mut self);
    /// Show the cadence field for running, the elevation field for cycling.
    fn show_kind_fields(&mut self, kind: WorkoutKind);
    fn show_error(&mut self, error: &WorkoutError);
    fn hide_error(&mut self);
    fn alert(&mut self, message: &str);
}

/// Raw form values, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
        }
    }
}

impl FormInput {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation: elevation.to_string(),
        }
    }

    /// Prefill from an existing workout.
    pub fn from_workout(w: &Workout) -> Self {
        let mut input = Self {
            kind: w.kind(),
            distance: w.distance().to_string(),
            duration: w.duration().to_string(),
            ..Self::default()
        };
        match w.kind() {
            WorkoutKind::Running => input.cadence = w.extra().to_string(),
            WorkoutKind::Cycling => input.elevation = w.extra().to_string(),
        }
        input
    }

    /// `(distance, duration, extra)` parsed with form semantics.
    pub fn numbers(&self) -> (f64, f64, f64) {
        let extra = match self.kind {
            WorkoutKind::Running => &self.cadence,
            WorkoutKind::Cycling => &self.elevation,
        };
        (
            parse_field(&self.distance),
            parse_field(&self.duration),
            parse_field(extra),
        )
    }
}

/// Blank is zero; anything unparsable is NaN and fails validation.
pub fn parse_field(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    raw.parse().unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub content: String,
    pub class_name: String,
    pub min_width: u32,
    pub max_width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub workout_id: String,
    pub coords: Coords,
    pub popup: Popup,
}

pub fn marker_for(w: &Workout) -> Marker {
    Marker {
        workout_id: w.id().to_string(),
        coords: w.coords(),
        popup: Popup {
            content: format!("{} {}", w.kind().icon(), w.description()),
            class_name: format!("{}-popup", w.kind()),
            min_width: 100,
            max_width: 250,
        },
    }
}

/// One labelled figure in a list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: String,
    pub kind: WorkoutKind,
    pub title: String,
    pub details: [Detail; 4],
}

pub fn list_item_for(w: &Workout) -> ListItem {
    let distance = Detail {
        icon: w.kind().icon(),
        value: w.distance().to_string(),
        unit: "km",
    };
    let duration = Detail {
        icon: "⏱",
        value: w.duration().to_string(),
        unit: "min",
    };
    let (metric, extra) = match w.kind() {
        WorkoutKind::Running => (
            Detail {
                icon: "⚡️",
                value: format!("{:.1}", w.metric()),
                unit: "min/km",
            },
            Detail {
                icon: "🦶🏼",
                value: w.extra().to_string(),
                unit: "spm",
            },
        ),
        WorkoutKind::Cycling => (
            Detail {
                icon: "⚡️",
                value: format!("{:.1}", w.metric()),
                unit: "km/h",
            },
            Detail {
                icon: "⛰",
                value: w.extra().to_string(),
                unit: "m",
            },
        ),
    };

    ListItem {
        id: w.id().to_string(),
        kind: w.kind(),
        title: w.description().to_string(),
        details: [distance, duration, metric, extra],
    }
}

impl ListItem {
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<li class=\"workout workout--{}\" data-id=\"{}\">\n  <h2 class=\"workout__title\">{}</h2>\n",
            self.kind,
            escape_html(&self.id),
            escape_html(&self.title)
        );
        for d in &self.details {
            html.push_str(&format!(
                "  <div class=\"workout__details\">\n    <span class=\"workout__icon\">{}</span>\n    <span class=\"workout__value\">{}</span>\n    <span class=\"workout__unit\">{}</span>\n  </div>\n",
                d.icon,
                escape_html(&d.value),
                d.unit
            ));
        }
        html.push_str("</li>\n");
        html
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Smallest lat/lng box containing a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coords,
    pub north_east: Coords,
}

impl Bounds {
    pub fn covering(points: impl IntoIterator<Item = Coords>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut b = Self {
            south_west: first,
            north_east: first,
        };
        for p in points {
            b.south_west.lat = b.south_west.lat.min(p.lat);
            b.south_west.lng = b.south_west.lng.min(p.lng);
            b.north_east.lat = b.north_east.lat.max(p.lat);
            b.north_east.lng = b.north_east.lng.max(p.lng);
        }
        Some(b)
    }

    pub fn contains(&self, p: Coords) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&p.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&p.lng)
    }

    pub fn center(&self) -> Coords {
        Coords {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::create_workout;

    fn c(lat: f64, lng: f64) -> Coords {
        Coords::new(lat, lng).unwrap()
    }

    #[test]
    fn running_item_shows_pace_and_cadence() {
        let w = create_workout(WorkoutKind::Running, c(51.5, -0.1), 5.2, 24.0, 178.0).unwrap();
        let item = list_item_for(&w);
        let values: Vec<_> = item.details.iter().map(|d| (d.value.as_str(), d.unit)).collect();
        assert_eq!(
            values,
            [("5.2", "km"), ("24", "min"), ("4.6", "min/km"), ("178", "spm")]
        );
    }

    #[test]
    fn cycling_item_shows_speed_and_elevation() {
        let w = create_workout(WorkoutKind::Cycling, c(51.5, -0.1), 27.0, 95.0, 523.0).unwrap();
        let item = list_item_for(&w);
        assert_eq!(item.details[2].value, "17.1");
        assert_eq!(item.details[2].unit, "km/h");
        assert_eq!(item.details[3].value, "523");
        assert_eq!(item.details[3].unit, "m");
    }

    #[test]
    fn marker_popup_has_icon_and_description() {
        let w = create_workout(WorkoutKind::Cycling, c(10.0, 20.0), 10.0, 30.0, 5.0).unwrap();
        let m = marker_for(&w);
        assert_eq!(m.coords, c(10.0, 20.0));
        assert_eq!(m.popup.class_name, "cycling-popup");
        assert!(m.popup.content.starts_with("🚴‍♂️ Cycling on "));
    }

    #[test]
    fn html_is_escaped() {
        let item = ListItem {
            id: "1\"2".into(),
            kind: WorkoutKind::Running,
            title: "<b>".into(),
            details: std::array::from_fn(|_| Detail {
                icon: "x",
                value: "1".into(),
                unit: "km",
            }),
        };
        let html = item.to_html();
        assert!(html.contains("data-id=\"1&quot;2\""));
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.starts_with("<li class=\"workout workout--running\""));
    }

    #[test]
    fn bounds_cover_all_points() {
        let pts = [c(51.5, -0.1), c(48.85, 2.35), c(52.52, 13.4)];
        let b = Bounds::covering(pts).unwrap();
        assert_eq!(b.south_west, c(48.85, -0.1));
        assert_eq!(b.north_east, c(52.52, 13.4));
        assert!(pts.iter().all(|p| b.contains(*p)));
        assert_eq!(Bounds::covering([]), None);
    }

    #[test]
    fn form_fields_parse_like_the_browser() {
        assert_eq!(parse_field(""), 0.0);
        assert_eq!(parse_field(" 5.5 "), 5.5);
        assert!(parse_field("abc").is_nan());

        let input = FormInput::cycling("20", "60", "-15");
        assert_eq!(input.numbers(), (20.0, 60.0, -15.0));
    }

    #[test]
    fn prefill_round_trips_numbers() {
        let w = create_workout(WorkoutKind::Running, c(0.0, 0.0), 5.2, 24.0, 178.0).unwrap();
        let input = FormInput::from_workout(&w);
        assert_eq!(input, FormInput::running("5.2", "24", "178"));
    }
}
