//! Pure Yew view components for the workout list.
//!
//! Stateless renderers driven by the session's workouts.

use mapty::{DetailRow, Workout};
use yew::prelude::*;

/// Renders workouts in the order given, as the list under the form.
pub fn render_workouts<'a>(workouts: impl Iterator<Item = &'a Workout>) -> Html {
    workouts.map(render_workout).collect::<Html>()
}

/// Renders one list entry with its title and detail rows.
fn render_workout(workout: &Workout) -> Html {
    html! {
        <li class={classes!("workout", format!("workout--{}", workout.kind()))}
            data-id={workout.id().to_string()}
            key={workout.id().to_string()}>
            <h2 class="workout__title">{ workout.description() }</h2>
            { workout.detail_rows().into_iter().map(|row| {
                let DetailRow { icon, value, unit } = row;
                html! { <WorkoutDetail {icon} {value} {unit} /> }
            }).collect::<Html>() }
        </li>
    }
}

/// One icon / value / unit row of a workout entry.
#[derive(Properties, PartialEq)]
pub struct WorkoutDetailProps {
    pub icon: AttrValue,
    pub value: AttrValue,
    pub unit: AttrValue,
}

#[function_component(WorkoutDetail)]
pub fn workout_detail(props: &WorkoutDetailProps) -> Html {
    html! {
        <div class="workout__details">
            <span class="workout__icon">{ props.icon.clone() }</span>
            <span class="workout__value">{ props.value.clone() }</span>
            <span class="workout__unit">{ props.unit.clone() }</span>
        </div>
    }
}
