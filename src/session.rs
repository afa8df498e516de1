//! Per-page session state.
//!
//! Tracks whether the map is ready, the pending map click (whose presence is
//! what makes the form visible), the activity type selected in the form, and
//! the workouts recorded so far in submission order.

use crate::config::INVALID_INPUT_MESSAGE;
use crate::{new_workout_at, ActivityKind, Coords, InputError, Workout, WorkoutForm};
use chrono::{DateTime, Local};
use log::{info, warn};
use std::fmt;

/// Which activity-specific input row is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    Cadence,
    Elevation,
}

impl MetricField {
    pub fn for_kind(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Running => MetricField::Cadence,
            ActivityKind::Cycling => MetricField::Elevation,
        }
    }

    pub fn shows_cadence(self) -> bool {
        self == MetricField::Cadence
    }

    pub fn shows_elevation(self) -> bool {
        self == MetricField::Elevation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    MapNotReady,
    NoLocation,
    Invalid(InputError),
}

impl SubmitError {
    /// Text for the blocking alert shown to the user.
    pub fn alert_message(&self) -> String {
        match self {
            SubmitError::Invalid(_) => INVALID_INPUT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::MapNotReady => write!(f, "The map is not ready yet"),
            SubmitError::NoLocation => write!(f, "Click on the map to choose a location first"),
            SubmitError::Invalid(e) => write!(f, "Invalid input: {}", e),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for SubmitError {
    fn from(e: InputError) -> Self {
        SubmitError::Invalid(e)
    }
}

#[derive(Debug)]
pub struct Session {
    map_ready: bool,
    pending_click: Option<Coords>,
    selected_kind: ActivityKind,
    workouts: Vec<Workout>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            map_ready: false,
            pending_click: None,
            selected_kind: ActivityKind::Running,
            workouts: Vec::new(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn mark_map_ready(&mut self) {
        self.map_ready = true;
    }

    /// Remember a map click and reveal the form. Clicks before the map is
    /// ready are ignored.
    pub fn record_click(&mut self, coords: Coords) -> bool {
        if !self.map_ready {
            warn!("Ignoring map click before the map is ready");
            return false;
        }
        self.pending_click = Some(coords);
        true
    }

    pub fn pending_click(&self) -> Option<Coords> {
        self.pending_click
    }

    pub fn is_form_visible(&self) -> bool {
        self.pending_click.is_some()
    }

    pub fn selected_kind(&self) -> ActivityKind {
        self.selected_kind
    }

    /// The metric row follows the selected activity type.
    pub fn metric_field(&self) -> MetricField {
        MetricField::for_kind(self.selected_kind)
    }

    pub fn select_kind(&mut self, kind: ActivityKind) {
        self.selected_kind = kind;
    }

    /// Workouts in submission order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// Workouts in display order: the latest submission first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter().rev()
    }

    pub fn submit(&mut self, form: &WorkoutForm) -> Result<&Workout, SubmitError> {
        self.submit_at(Local::now(), form)
    }

    /// Validate `form` against the pending click and record the workout.
    ///
    /// On error nothing changes: the click stays pending and the list is
    /// untouched. On success the click is consumed and the form hides.
    pub fn submit_at(
        &mut self,
        date: DateTime<Local>,
        form: &WorkoutForm,
    ) -> Result<&Workout, SubmitError> {
        if !self.map_ready {
            return Err(SubmitError::MapNotReady);
        }
        let coords = self.pending_click.ok_or(SubmitError::NoLocation)?;
        let workout = new_workout_at(date, coords, form)?;

        info!(
            "Recorded {} ({} km, {} min) at ({:.5}, {:.5})",
            workout.description(),
            workout.distance(),
            workout.duration(),
            coords.lat,
            coords.lng
        );
        self.pending_click = None;
        self.workouts.push(workout);
        Ok(&self.workouts[self.workouts.len() - 1])
    }
}
