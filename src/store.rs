//! Thread-local session store.
//!
//! Holds the session and the live map outside of component state so map
//! callbacks registered once at startup always see the current values.
//! Components re-render through a force-update handle after mutating it.

use crate::map::LeafletMap;
use mapty::session::Session;
use std::cell::RefCell;

thread_local! {
    /// Workouts and UI flags for this page load.
    pub static SESSION: RefCell<Session> = RefCell::new(Session::new());

    /// Set once geolocation succeeds and the map is initialised.
    pub static MAP: RefCell<Option<LeafletMap>> = const { RefCell::new(None) };
}
