use contracts::metadata::{FieldDescriptor, FieldType};
use leptos::prelude::*;
use serde_json::Value;

use super::{value_as_string, FieldLabel};

/// Plain text input. `numeric` fields constrain the keyboard and store a
/// number; everything else stores a string. Empty input stores null.
#[component]
pub fn TextInput(
    field: FieldDescriptor,
    numeric: bool,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let input_type = if numeric {
        "number"
    } else if field.field_type == FieldType::Email {
        "email"
    } else {
        "text"
    };

    let (text, set_text) = signal(value_as_string(&value));

    let handle_input = move |raw: String| {
        set_text.set(raw.clone());
        let canonical = if raw.is_empty() {
            Value::Null
        } else if numeric {
            raw.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null)
        } else {
            Value::String(raw)
        };
        on_change.run(canonical);
    };

    view! {
        <div class="field">
            <FieldLabel field=field />
            <input
                type=input_type
                class="field__input"
                prop:value=move || text.get()
                on:input=move |ev| handle_input(event_target_value(&ev))
            />
        </div>
    }
}
