//! Workout model and form handling for the Mapty tracker.
//!
//! Everything here is target-agnostic so it can be unit tested natively; the
//! browser wiring lives in the binary.

use chrono::{DateTime, Local};
use log::debug;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub mod config;
pub mod session;
pub mod utils;

use utils::{coerce_number, format_metric, short_id};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Running,
    Cycling,
}

impl ActivityKind {
    /// Value used by the form select and in CSS class names.
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Running => "Running",
            ActivityKind::Cycling => "Cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ActivityKind::Running => "🏃‍♂️",
            ActivityKind::Cycling => "🚴‍♂️",
        }
    }

    pub fn popup_class(self) -> &'static str {
        match self {
            ActivityKind::Running => "running-popup",
            ActivityKind::Cycling => "cycling-popup",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "running" => Ok(ActivityKind::Running),
            "cycling" => Ok(ActivityKind::Cycling),
            other => Err(InputError::UnknownActivity(other.to_string())),
        }
    }
}

/// Activity-specific payload of a workout, tagged by `type` when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Activity {
    Running { cadence: f64, pace: f64 },
    Cycling { elevation_gain: f64, speed: f64 },
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Activity::Running { .. } => ActivityKind::Running,
            Activity::Cycling { .. } => ActivityKind::Cycling,
        }
    }

    /// The derived metric: pace for running, speed for cycling.
    pub fn derived(&self) -> Metric {
        match *self {
            Activity::Running { pace, .. } => Metric {
                icon: "⚡️",
                value: pace,
                unit: "min/km",
            },
            Activity::Cycling { speed, .. } => Metric {
                icon: "⚡️",
                value: speed,
                unit: "km/h",
            },
        }
    }

    /// The raw activity-specific input: cadence or elevation gain.
    pub fn measured(&self) -> Metric {
        match *self {
            Activity::Running { cadence, .. } => Metric {
                icon: "🦶🏼",
                value: cadence,
                unit: "spm",
            },
            Activity::Cycling { elevation_gain, .. } => Metric {
                icon: "⛰",
                value: elevation_gain,
                unit: "m",
            },
        }
    }
}

/// A value with its display icon and unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    pub icon: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

/// Minutes per kilometre.
#[inline]
pub fn pace(distance: f64, duration: f64) -> f64 {
    duration / distance
}

/// Kilometres per hour, with `duration` in minutes.
#[inline]
pub fn speed(distance: f64, duration: f64) -> f64 {
    distance / (duration / 60.0)
}

/// Short identifier taken from the tail of the creation timestamp.
///
/// Two workouts created in the same millisecond get the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn from_date(date: &DateTime<Local>) -> Self {
        Self(short_id(date.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recorded workout. Derived fields are computed once at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workout {
    id: WorkoutId,
    date: DateTime<Local>,
    coords: Coords,
    distance: f64,
    duration: f64,
    description: String,
    #[serde(flatten)]
    activity: Activity,
}

impl Workout {
    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64) -> Self {
        Self::running_at(Local::now(), coords, distance, duration, cadence)
    }

    pub fn running_at(
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Self {
        let activity = Activity::Running {
            cadence,
            pace: pace(distance, duration),
        };
        Self::build(date, coords, distance, duration, activity)
    }

    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self::cycling_at(Local::now(), coords, distance, duration, elevation_gain)
    }

    pub fn cycling_at(
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Self {
        let activity = Activity::Cycling {
            elevation_gain,
            speed: speed(distance, duration),
        };
        Self::build(date, coords, distance, duration, activity)
    }

    fn build(
        date: DateTime<Local>,
        coords: Coords,
        distance: f64,
        duration: f64,
        activity: Activity,
    ) -> Self {
        Self {
            id: WorkoutId::from_date(&date),
            description: describe(activity.kind(), &date),
            date,
            coords,
            distance,
            duration,
            activity,
        }
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn date(&self) -> &DateTime<Local> {
        &self.date
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn kind(&self) -> ActivityKind {
        self.activity.kind()
    }

    /// The four rows of a list entry: distance, duration, the derived metric
    /// to one decimal, then cadence or elevation gain.
    pub fn detail_rows(&self) -> [DetailRow; 4] {
        let derived = self.activity.derived();
        let measured = self.activity.measured();
        [
            DetailRow::new(self.kind().icon(), self.distance.to_string(), "km"),
            DetailRow::new("⏱", self.duration.to_string(), "min"),
            DetailRow::new(derived.icon, format_metric(derived.value), derived.unit),
            DetailRow::new(measured.icon, measured.value.to_string(), measured.unit),
        ]
    }

    /// Popup text: activity icon followed by the description.
    pub fn popup_content(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }
}

/// One icon / value / unit row of a list entry, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl DetailRow {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// "Running on April 14"
fn describe(kind: ActivityKind, date: &DateTime<Local>) -> String {
    format!("{} on {}", kind.label(), date.format("%B %-d"))
}

/// Form inputs that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Distance => "Distance",
            Field::Duration => "Duration",
            Field::Cadence => "Cadence",
            Field::Elevation => "Elevation gain",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    NotFinite(Field),
    NotPositive(Field),
    UnknownActivity(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotFinite(field) => write!(f, "{} must be a valid number", field),
            InputError::NotPositive(field) => write!(f, "{} must be greater than zero", field),
            InputError::UnknownActivity(kind) => write!(f, "Unknown activity type '{}'", kind),
        }
    }
}

impl std::error::Error for InputError {}

/// Raw values of the workout form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

fn require_finite(values: &[(Field, f64)]) -> Result<(), InputError> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(field, _)) => Err(InputError::NotFinite(field)),
        None => Ok(()),
    }
}

fn require_positive(values: &[(Field, f64)]) -> Result<(), InputError> {
    match values.iter().find(|(_, v)| *v <= 0.0) {
        Some(&(field, _)) => Err(InputError::NotPositive(field)),
        None => Ok(()),
    }
}

/// Validate the form and build the matching workout at `coords`.
pub fn new_workout(coords: Coords, form: &WorkoutForm) -> Result<Workout, InputError> {
    new_workout_at(Local::now(), coords, form)
}

/// Same as [`new_workout`] with an explicit creation time.
///
/// Distance and duration must be finite and positive. Running cadence must be
/// finite and positive; cycling elevation gain only has to be finite.
pub fn new_workout_at(
    date: DateTime<Local>,
    coords: Coords,
    form: &WorkoutForm,
) -> Result<Workout, InputError> {
    let kind: ActivityKind = form.kind.parse()?;
    let distance = coerce_number(&form.distance);
    let duration = coerce_number(&form.duration);

    let workout = match kind {
        ActivityKind::Running => {
            let cadence = coerce_number(&form.cadence);
            let values = [
                (Field::Distance, distance),
                (Field::Duration, duration),
                (Field::Cadence, cadence),
            ];
            require_finite(&values)?;
            require_positive(&values)?;
            Workout::running_at(date, coords, distance, duration, cadence)
        }
        ActivityKind::Cycling => {
            let elevation = coerce_number(&form.elevation);
            require_finite(&[
                (Field::Distance, distance),
                (Field::Duration, duration),
                (Field::Elevation, elevation),
            ])?;
            require_positive(&[(Field::Distance, distance), (Field::Duration, duration)])?;
            Workout::cycling_at(date, coords, distance, duration, elevation)
        }
    };

    debug!(
        "Built workout {}: {}",
        workout.id(),
        serde_json::to_string(&workout).unwrap_or_default()
    );
    Ok(workout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EPS: f64 = 1e-9;

    fn noon(month: u32, day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap()
    }

    fn here() -> Coords {
        Coords::new(38.7223, -9.1393)
    }

    fn form(kind: &str, distance: &str, duration: &str, metric: &str) -> WorkoutForm {
        let mut form = WorkoutForm {
            kind: kind.to_string(),
            distance: distance.to_string(),
            duration: duration.to_string(),
            ..Default::default()
        };
        if kind == "cycling" {
            form.elevation = metric.to_string();
        } else {
            form.cadence = metric.to_string();
        }
        form
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::running(here(), 5.0, 30.0, 178.0);
        match *w.activity() {
            Activity::Running { cadence, pace } => {
                assert!((pace - 6.0).abs() < EPS);
                assert_eq!(cadence, 178.0);
            }
            ref other => panic!("expected running, got {:?}", other),
        }
    }

    #[test]
    fn running_pace_matches_formula_across_inputs() {
        for &(distance, duration) in &[(1.0, 4.5), (10.0, 52.3), (42.195, 210.0), (0.4, 2.0)] {
            let w = Workout::running(here(), distance, duration, 170.0);
            let got = w.activity().derived().value;
            assert!((got - duration / distance).abs() < EPS);
            assert!(!w.description().is_empty());
            assert!(w.description().contains("Running"));
        }
    }

    #[test]
    fn cycling_speed_is_distance_per_hour() {
        let w = Workout::cycling(here(), 20.0, 60.0, 523.0);
        match *w.activity() {
            Activity::Cycling {
                elevation_gain,
                speed,
            } => {
                assert!((speed - 20.0).abs() < EPS);
                assert_eq!(elevation_gain, 523.0);
            }
            ref other => panic!("expected cycling, got {:?}", other),
        }
    }

    #[test]
    fn cycling_speed_ignores_elevation() {
        for &elevation in &[-120.0, 0.0, 15.5, 2400.0] {
            let w = Workout::cycling(here(), 27.0, 45.0, elevation);
            assert!((w.activity().derived().value - 36.0).abs() < EPS);
            assert!(w.description().contains("Cycling"));
        }
    }

    #[test]
    fn description_names_month_and_day() {
        let run = Workout::running_at(noon(4, 14), here(), 5.0, 30.0, 178.0);
        assert_eq!(run.description(), "Running on April 14");

        let ride = Workout::cycling_at(noon(12, 3), here(), 20.0, 60.0, 10.0);
        assert_eq!(ride.description(), "Cycling on December 3");
    }

    #[test]
    fn id_is_tail_of_creation_millis() {
        let date = noon(4, 14);
        let w = Workout::running_at(date, here(), 5.0, 30.0, 178.0);
        let millis = date.timestamp_millis().to_string();
        assert_eq!(w.id().as_str().len(), 10);
        assert!(millis.ends_with(w.id().as_str()));
    }

    #[test]
    fn ids_collide_within_the_same_millisecond() {
        // Known weak invariant: the id is only as unique as the clock.
        let date = noon(6, 1);
        let a = Workout::running_at(date, here(), 5.0, 30.0, 178.0);
        let b = Workout::cycling_at(date, here(), 20.0, 60.0, 100.0);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn popup_content_starts_with_icon() {
        let w = Workout::cycling_at(noon(7, 9), here(), 20.0, 60.0, 10.0);
        assert_eq!(w.popup_content(), "🚴‍♂️ Cycling on July 9");
        assert_eq!(w.kind().popup_class(), "cycling-popup");
    }

    #[test]
    fn running_detail_rows_show_pace_and_cadence() {
        let w = Workout::running_at(noon(4, 14), here(), 5.0, 32.8, 178.0);
        let detail_rows = w.detail_rows();
        let rows: Vec<(&str, &str, &str)> = detail_rows
            .iter()
            .map(|r| (r.icon, r.value.as_str(), r.unit))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("🏃‍♂️", "5", "km"),
                ("⏱", "32.8", "min"),
                ("⚡️", "6.6", "min/km"),
                ("🦶🏼", "178", "spm"),
            ]
        );
    }

    #[test]
    fn cycling_detail_rows_show_speed_and_elevation() {
        let w = Workout::cycling_at(noon(4, 14), here(), 20.0, 60.0, 523.0);
        let rows = w.detail_rows();
        assert_eq!(rows[0].icon, "🚴‍♂️");
        assert_eq!((rows[2].value.as_str(), rows[2].unit), ("20.0", "km/h"));
        assert_eq!((rows[3].icon, rows[3].value.as_str(), rows[3].unit), ("⛰", "523", "m"));
    }

    #[test]
    fn serializes_with_type_discriminant() {
        let w = Workout::running_at(noon(4, 14), here(), 5.0, 30.0, 178.0);
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["type"], "running");
        assert_eq!(json["cadence"], 178.0);
        assert_eq!(json["pace"], 6.0);
        assert_eq!(json["coords"]["lat"], 38.7223);
        assert_eq!(json["description"], "Running on April 14");
    }

    #[test]
    fn activity_kind_parses_form_values() {
        assert_eq!("running".parse::<ActivityKind>(), Ok(ActivityKind::Running));
        assert_eq!(" cycling ".parse::<ActivityKind>(), Ok(ActivityKind::Cycling));
        assert_eq!(
            "swimming".parse::<ActivityKind>(),
            Err(InputError::UnknownActivity("swimming".to_string()))
        );
    }

    #[test]
    fn new_workout_builds_running_from_form() {
        let w = new_workout(here(), &form("running", "5", "30", "178")).unwrap();
        assert_eq!(w.kind(), ActivityKind::Running);
        assert_eq!(w.coords(), here());
        assert!((w.activity().derived().value - 6.0).abs() < EPS);
    }

    #[test]
    fn new_workout_builds_cycling_from_form() {
        let w = new_workout(here(), &form("cycling", "20", "60", "523")).unwrap();
        assert_eq!(w.kind(), ActivityKind::Cycling);
        assert!((w.activity().derived().value - 20.0).abs() < EPS);
        assert_eq!(w.activity().measured().value, 523.0);
    }

    #[test]
    fn running_rejects_non_finite_fields() {
        let cases = [
            (form("running", "abc", "30", "178"), Field::Distance),
            (form("running", "5", "inf", "178"), Field::Duration),
            (form("running", "5", "30", "NaN"), Field::Cadence),
        ];
        for (input, field) in cases {
            assert_eq!(
                new_workout(here(), &input),
                Err(InputError::NotFinite(field))
            );
        }
    }

    #[test]
    fn running_rejects_non_positive_fields() {
        let cases = [
            (form("running", "0", "30", "178"), Field::Distance),
            (form("running", "5", "-30", "178"), Field::Duration),
            (form("running", "5", "30", ""), Field::Cadence),
        ];
        for (input, field) in cases {
            assert_eq!(
                new_workout(here(), &input),
                Err(InputError::NotPositive(field))
            );
        }
    }

    #[test]
    fn finiteness_is_checked_before_positivity() {
        let input = form("running", "-5", "30", "x");
        assert_eq!(
            new_workout(here(), &input),
            Err(InputError::NotFinite(Field::Cadence))
        );
    }

    #[test]
    fn cycling_allows_zero_or_negative_elevation() {
        assert!(new_workout(here(), &form("cycling", "20", "60", "0")).is_ok());
        assert!(new_workout(here(), &form("cycling", "20", "60", "-85")).is_ok());
    }

    #[test]
    fn cycling_still_requires_finite_elevation() {
        assert_eq!(
            new_workout(here(), &form("cycling", "20", "60", "lots")),
            Err(InputError::NotFinite(Field::Elevation))
        );
    }

    #[test]
    fn cycling_requires_positive_distance_and_duration() {
        assert_eq!(
            new_workout(here(), &form("cycling", "20", "0", "100")),
            Err(InputError::NotPositive(Field::Duration))
        );
    }

    #[test]
    fn unknown_activity_is_rejected() {
        assert_eq!(
            new_workout(here(), &form("rowing", "5", "30", "20")),
            Err(InputError::UnknownActivity("rowing".to_string()))
        );
    }
}
