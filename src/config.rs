//! Application-level configuration constants.

use log::Level;

// Logging
pub const LOG_LEVEL: Level = Level::Info;

// Map view
pub const MAP_CONTAINER_ID: &str = "map";
pub const MAP_ZOOM_LEVEL: u8 = 13;
pub const TILE_MAX_ZOOM: u8 = 19;
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, Tiles style by <a href=\"https://www.hotosm.org/\" target=\"_blank\">Humanitarian OpenStreetMap Team</a> hosted by <a href=\"https://openstreetmap.fr/\" target=\"_blank\">OpenStreetMap France</a>";

// Marker popups
pub const POPUP_MAX_WIDTH: u32 = 200;
pub const POPUP_MIN_WIDTH: u32 = 80;

// UI Behavior
pub const FORM_DISPLAY_RESET_MS: u32 = 1_000;

// Workout identifiers keep this many trailing digits of the creation millis
pub const WORKOUT_ID_DIGITS: usize = 10;

// User-facing messages
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";
pub const GEOLOCATION_FAILED_MESSAGE: &str = "Could not get your position";
