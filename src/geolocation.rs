//! One-shot device position request.
//!
//! The browser answers `getCurrentPosition` through one of two callbacks; both
//! share the sending half of a oneshot channel so whichever fires first
//! resolves the future and the other becomes a no-op.

use futures::channel::oneshot;
use mapty::Coords;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, PartialEq)]
pub enum GeolocationError {
    Unsupported,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown(u16),
    Dropped,
}

impl GeolocationError {
    /// Map a `GeolocationPositionError.code` onto an error.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            other => GeolocationError::Unknown(other),
        }
    }
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeolocationError::Unsupported => write!(f, "Geolocation is not available"),
            GeolocationError::PermissionDenied => write!(f, "Permission to read the position was denied"),
            GeolocationError::PositionUnavailable => write!(f, "Position is unavailable"),
            GeolocationError::Timeout => write!(f, "Timed out waiting for a position"),
            GeolocationError::Unknown(code) => write!(f, "Geolocation failed with code {}", code),
            GeolocationError::Dropped => write!(f, "Geolocation request was dropped"),
        }
    }
}

impl std::error::Error for GeolocationError {}

type Reply = Rc<RefCell<Option<oneshot::Sender<Result<Coords, GeolocationError>>>>>;

fn number_field(value: &JsValue, key: &str) -> Option<f64> {
    js_sys::Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
}

fn coords_from_position(position: &JsValue) -> Option<Coords> {
    let coords = js_sys::Reflect::get(position, &JsValue::from_str("coords")).ok()?;
    Some(Coords::new(
        number_field(&coords, "latitude")?,
        number_field(&coords, "longitude")?,
    ))
}

fn reply(slot: &Reply, result: Result<Coords, GeolocationError>) {
    if let Some(tx) = slot.borrow_mut().take() {
        let _ = tx.send(result);
    }
}

/// Ask the browser for the current position once. No retries.
pub async fn current_position() -> Result<Coords, GeolocationError> {
    let geolocation = gloo_utils::window()
        .navigator()
        .geolocation()
        .map_err(|_| GeolocationError::Unsupported)?;

    let (tx, rx) = oneshot::channel();
    let slot: Reply = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let slot = slot.clone();
        Closure::once_into_js(move |position: JsValue| {
            let result = coords_from_position(&position).ok_or(GeolocationError::PositionUnavailable);
            reply(&slot, result);
        })
    };
    let on_error = {
        let slot = slot.clone();
        Closure::once_into_js(move |error: JsValue| {
            let code = number_field(&error, "code").unwrap_or_default() as u16;
            reply(&slot, Err(GeolocationError::from_code(code)));
        })
    };

    geolocation
        .get_current_position_with_error_callback(
            on_success.unchecked_ref(),
            Some(on_error.unchecked_ref()),
        )
        .map_err(|_| GeolocationError::Unsupported)?;

    rx.await.unwrap_or(Err(GeolocationError::Dropped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_follow_the_geolocation_api() {
        assert_eq!(GeolocationError::from_code(1), GeolocationError::PermissionDenied);
        assert_eq!(GeolocationError::from_code(2), GeolocationError::PositionUnavailable);
        assert_eq!(GeolocationError::from_code(3), GeolocationError::Timeout);
        assert_eq!(GeolocationError::from_code(9), GeolocationError::Unknown(9));
    }
}
