use contracts::metadata::FieldDescriptor;
use leptos::prelude::*;
use serde_json::Value;

use super::{value_as_string, FieldLabel};

/// Fixed-option dropdown fed by the descriptor's `options`.
#[component]
pub fn StaticSelect(
    field: FieldDescriptor,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let options = field.options.clone();
    let (current, set_current) = signal(value_as_string(&value));

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
            <select
                class="field__input"
                prop:value=move || current.get()
                on:change=move |ev| handle_change(event_target_value(&ev))
            >
                <option value="">"Selecione..."</option>
                {options
                    .into_iter()
                    .map(|opt| {
                        let display = opt.display();
                        view! { <option value=opt.value.clone()>{display}</option> }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}
