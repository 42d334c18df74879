use contracts::metadata::FieldDescriptor;
use leptos::prelude::*;
use serde_json::Value;

use super::{value_as_string, FieldLabel};
use crate::shared::date_utils;

/// Native date / datetime-local picker. Stored timestamps are rendered with
/// local calendar components so UTC midnights never show the previous day.
#[component]
pub fn DateInput(
    field: FieldDescriptor,
    with_time: bool,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let raw = value_as_string(&value);
    let initial = if with_time {
        date_utils::datetime_input_value(&raw)
    } else {
        date_utils::date_input_value(&raw)
    };
    let (current, set_current) = signal(initial);

    let handle_change = move |raw: String| {
        set_current.set(raw.clone());
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
            <input
                type=if with_time { "datetime-local" } else { "date" }
                class="field__input"
                prop:value=move || current.get()
                on:change=move |ev| handle_change(event_target_value(&ev))
            />
        </div>
    }
}
