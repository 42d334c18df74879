use contracts::metadata::FieldDescriptor;
use leptos::prelude::*;
use serde_json::Value;

use super::{value_as_string, FieldLabel};
use crate::shared::icons::icon;

/// Obscured input with a show/hide toggle.
#[component]
pub fn PasswordInput(
    field: FieldDescriptor,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let (text, set_text) = signal(value_as_string(&value));
    let (visible, set_visible) = signal(false);

    let handle_input = move |raw: String| {
        set_text.set(raw.clone());
        let canonical = if raw.is_empty() {
            Value::Null
        } else {
            Value::String(raw)
        };
        on_change.run(canonical);
    };

    view! {
        <div class="field">
            <FieldLabel field=field />
            <div class="field__password">
                <input
                    type=move || if visible.get() { "text" } else { "password" }
                    class="field__input"
                    prop:value=move || text.get()
                    on:input=move |ev| handle_input(event_target_value(&ev))
                />
                <button
                    type="button"
                    class="field__password-toggle"
                    on:click=move |_| set_visible.update(|v| *v = !*v)
                >
                    {move || if visible.get() { icon("eye-off") } else { icon("eye") }}
                </button>
            </div>
        </div>
    }
}
