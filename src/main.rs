//! Main module for the Mapty workout tracker using Yew.
//! Wires the map, the workout form and the workout list together.

use gloo_timers::callback::Timeout;
use log::{debug, error, info, warn};
use mapty::config::{
    FORM_DISPLAY_RESET_MS, GEOLOCATION_FAILED_MESSAGE, LOG_LEVEL, MAP_CONTAINER_ID,
};
use mapty::{ActivityKind, Coords, WorkoutForm};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

mod components;
mod geolocation;
mod hooks;
mod map;
mod store;

use components::render_workouts;
use geolocation::current_position;
use hooks::{use_form_field, FormField};
use map::LeafletMap;
use store::{MAP, SESSION};

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Show a blocking browser alert.
fn alert(message: &str) {
    if gloo_utils::window().alert_with_message(message).is_err() {
        error!("Failed to show alert: {}", message);
    }
}

/// Initialise the map at `center` and route its clicks into the session.
fn load_map(center: Coords, trigger: UseForceUpdateHandle) {
    let on_click = {
        let trigger = trigger.clone();
        move |coords: Coords| {
            if SESSION.with(|s| s.borrow_mut().record_click(coords)) {
                debug!("Map clicked at ({:.5}, {:.5})", coords.lat, coords.lng);
                trigger.force_update();
            }
        }
    };

    match LeafletMap::open(center, on_click) {
        Ok(map) => {
            MAP.with(|m| *m.borrow_mut() = Some(map));
            SESSION.with(|s| s.borrow_mut().mark_map_ready());
            trigger.force_update();
        }
        Err(e) => {
            error!("{}", e);
            alert(&e);
        }
    }
}

/// Hide the form without its slide-out transition, then restore the layout
/// once `FORM_DISPLAY_RESET_MS` has passed.
fn suppress_form_display(
    display_suppressed: &UseStateHandle<bool>,
    reset_timer: &Rc<RefCell<Option<Timeout>>>,
) {
    display_suppressed.set(true);
    let setter = display_suppressed.clone();
    let handle = Timeout::new(FORM_DISPLAY_RESET_MS, move || setter.set(false));
    // Replacing the handle cancels a reset that is still pending
    *reset_timer.borrow_mut() = Some(handle);
}

/// Renders one labelled text input row of the form.
fn render_input_row(
    label: &'static str,
    input_class: &'static str,
    placeholder: &'static str,
    field: &FormField,
    hidden: bool,
) -> Html {
    html! {
        <div class={classes!("form__row", hidden.then_some("form__row--hidden"))}>
            <label class="form__label">{ label }</label>
            <input class={classes!("form__input", input_class)}
                {placeholder}
                ref={field.node.clone()}
                value={field.text.clone()}
                oninput={field.oninput.clone()}
            />
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring session state, effects and UI.
#[function_component(App)]
fn app() -> Html {
    let trigger = use_force_update();
    let distance = use_form_field();
    let duration = use_form_field();
    let cadence = use_form_field();
    let elevation = use_form_field();
    // True while the form is forced to `display: none` after a submit
    let display_suppressed = use_state(|| false);
    let reset_timer = use_mut_ref(|| None::<Timeout>);

    // Request the device position once on mount
    {
        let trigger = trigger.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match current_position().await {
                    Ok(coords) => load_map(coords, trigger),
                    Err(e) => {
                        warn!("Geolocation failed: {}", e);
                        alert(GEOLOCATION_FAILED_MESSAGE);
                    }
                }
            });
            || ()
        });
    }

    let (pending_click, form_visible, kind, metric_field) = SESSION.with(|s| {
        let s = s.borrow();
        (
            s.pending_click(),
            s.is_form_visible(),
            s.selected_kind(),
            s.metric_field(),
        )
    });

    // Move focus to the distance input on every new click
    {
        let node = distance.node.clone();
        use_effect_with(pending_click, move |click| {
            if click.is_some() {
                if let Some(input) = node.cast::<HtmlInputElement>() {
                    if let Err(e) = input.focus() {
                        warn!("Failed to focus the distance input: {:?}", e);
                    }
                }
            }
            || ()
        });
    }

    let on_kind_change = {
        let trigger = trigger.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse::<ActivityKind>() {
                Ok(selected) => {
                    SESSION.with(|s| s.borrow_mut().select_kind(selected));
                    trigger.force_update();
                }
                Err(e) => warn!("{}", e),
            }
        })
    };

    let onsubmit = {
        let fields = [
            distance.clone(),
            duration.clone(),
            cadence.clone(),
            elevation.clone(),
        ];
        let display_suppressed = display_suppressed.clone();
        let reset_timer = reset_timer.clone();
        let trigger = trigger.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let [distance, duration, cadence, elevation] = &fields;
            let form = WorkoutForm {
                kind: SESSION.with(|s| s.borrow().selected_kind()).to_string(),
                distance: distance.text.clone(),
                duration: duration.text.clone(),
                cadence: cadence.text.clone(),
                elevation: elevation.text.clone(),
            };

            let result = SESSION.with(|s| s.borrow_mut().submit(&form).cloned());
            match result {
                Ok(workout) => {
                    MAP.with(|m| {
                        if let Some(map) = m.borrow().as_ref() {
                            map.add_marker(&workout);
                        }
                    });
                    fields.iter().for_each(|field| field.clear.emit(()));
                    suppress_form_display(&display_suppressed, &reset_timer);
                    trigger.force_update();
                }
                Err(err) => {
                    warn!("Rejected workout: {}", err);
                    alert(&err.alert_message());
                }
            }
        })
    };

    let workouts = SESSION.with(|s| render_workouts(s.borrow().newest_first()));

    html! {
        <div class="app">
            <div class="sidebar">
                <ul class="workouts">
                    <form class={classes!("form", (!form_visible).then_some("hidden"))}
                        style={(*display_suppressed).then_some("display: none")}
                        {onsubmit}>
                        <div class="form__row">
                            <label class="form__label">{ "Type" }</label>
                            <select class="form__input form__input--type" onchange={on_kind_change}>
                                <option value="running" selected={kind == ActivityKind::Running}>{ "Running" }</option>
                                <option value="cycling" selected={kind == ActivityKind::Cycling}>{ "Cycling" }</option>
                            </select>
                        </div>
                        { render_input_row("Distance", "form__input--distance", "km", &distance, false) }
                        { render_input_row("Duration", "form__input--duration", "min", &duration, false) }
                        { render_input_row("Cadence", "form__input--cadence", "step/min", &cadence, !metric_field.shows_cadence()) }
                        { render_input_row("Elev Gain", "form__input--elevation", "meters", &elevation, !metric_field.shows_elevation()) }
                        <button class="form__btn">{ "OK" }</button>
                    </form>
                    { workouts }
                </ul>
            </div>
            <div id={MAP_CONTAINER_ID}></div>
        </div>
    }
}

/// Entry point: installs the console logger and the panic hook, then renders the app.
fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(LOG_LEVEL) {
        error!("Logger already installed: {}", e);
    }
    info!("Starting Mapty");
    yew::Renderer::<App>::new().render();
}
