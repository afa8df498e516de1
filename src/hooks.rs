use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the raw text of a form input and the callbacks that drive it.
#[derive(Clone, PartialEq)]
pub struct FormField {
    /// The current text content of the input field.
    pub text: String,
    /// Callback for the input's `oninput` event. Mirrors the typed text.
    pub oninput: Callback<InputEvent>,
    /// Callback to empty the field, used after a successful submit.
    pub clear: Callback<()>,
    /// Ref attached to the input element, e.g. to move focus to it.
    pub node: NodeRef,
}

/// Custom hook to keep a text input's value in component state.
///
/// Values are left unparsed; coercion and validation happen on submit.
#[hook]
pub fn use_form_field() -> FormField {
    let text_state_handle: UseStateHandle<String> = use_state(String::new);
    let node = use_node_ref();

    let oninput = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let clear = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |_: ()| text_setter.set(String::new()))
    };

    FormField {
        text: (*text_state_handle).clone(),
        oninput,
        clear,
        node,
    }
}
