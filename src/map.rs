//! JavaScript interop for the Leaflet map.
//! Provides Rust bindings to the helper functions defined in map_helpers.js.

use log::{error, info};
use mapty::config::{
    MAP_CONTAINER_ID, MAP_ZOOM_LEVEL, POPUP_MAX_WIDTH, POPUP_MIN_WIDTH, TILE_ATTRIBUTION,
    TILE_MAX_ZOOM, TILE_URL,
};
use mapty::{Coords, Workout};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/map_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap, catch)]
    fn init_map(
        container_id: &str,
        lat: f64,
        lng: f64,
        zoom: u8,
        tile_url: &str,
        max_zoom: u8,
        attribution: &str,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = onMapClick)]
    fn on_map_click(map: &JsValue, handler: &Closure<dyn FnMut(f64, f64)>);

    #[wasm_bindgen(js_name = addWorkoutMarker)]
    fn add_workout_marker(map: &JsValue, lat: f64, lng: f64, popup_options: JsValue, content: &str);
}

/// Options handed to `L.popup`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: &'static str,
}

impl PopupOptions {
    pub fn for_workout(workout: &Workout) -> Self {
        Self {
            max_width: POPUP_MAX_WIDTH,
            min_width: POPUP_MIN_WIDTH,
            auto_close: false,
            close_on_click: false,
            class_name: workout.kind().popup_class(),
        }
    }
}

/// A live Leaflet map plus the click handler it calls into.
pub struct LeafletMap {
    handle: JsValue,
    _on_click: Closure<dyn FnMut(f64, f64)>,
}

impl LeafletMap {
    /// Center a new map on `center`, add the tile layer and start forwarding
    /// clicks to `on_click`.
    pub fn open(center: Coords, on_click: impl FnMut(Coords) + 'static) -> Result<Self, String> {
        let handle = init_map(
            MAP_CONTAINER_ID,
            center.lat,
            center.lng,
            MAP_ZOOM_LEVEL,
            TILE_URL,
            TILE_MAX_ZOOM,
            TILE_ATTRIBUTION,
        )
        .map_err(|e| format!("Failed to initialise map: {:?}", e))?;

        let mut on_click = on_click;
        let closure = Closure::wrap(Box::new(move |lat: f64, lng: f64| {
            on_click(Coords::new(lat, lng));
        }) as Box<dyn FnMut(f64, f64)>);
        on_map_click(&handle, &closure);

        info!("Map ready at ({:.5}, {:.5})", center.lat, center.lng);
        Ok(Self {
            handle,
            _on_click: closure,
        })
    }

    /// Drop a marker for `workout` with its popup already open.
    pub fn add_marker(&self, workout: &Workout) {
        let options = match serde_wasm_bindgen::to_value(&PopupOptions::for_workout(workout)) {
            Ok(options) => options,
            Err(e) => {
                error!("Failed to build popup options: {}", e);
                return;
            }
        };
        let coords = workout.coords();
        add_workout_marker(
            &self.handle,
            coords.lat,
            coords.lng,
            options,
            &workout.popup_content(),
        );
    }
}
