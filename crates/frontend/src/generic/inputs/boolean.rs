use contracts::metadata::FieldDescriptor;
use leptos::prelude::*;
use serde_json::Value;

use super::FieldLabel;

/// Labels depend on the field: status-like columns read Ativo/Inativo, the
/// rest Sim/Não.
fn labels(field: &FieldDescriptor) -> (&'static str, &'static str) {
    if field.name.to_lowercase().contains("situacao") {
        ("Ativo", "Inativo")
    } else {
        ("Sim", "Não")
    }
}

/// Tri-state boolean select. The unset option only exists while the field
/// is not required.
#[component]
pub fn BooleanSelect(
    field: FieldDescriptor,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let (true_label, false_label) = labels(&field);
    let required = field.required;
    let initial = match value {
        Value::Bool(true) => "true",
        Value::Bool(false) => "false",
        _ => "",
    };
    let (current, set_current) = signal(initial.to_string());

    let handle_change = move |raw: String| {
        set_current.set(raw.clone());
        let canonical = match raw.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Null,
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
                {(!required).then(|| view! { <option value="">"—"</option> })}
                <option value="true">{true_label}</option>
                <option value="false">{false_label}</option>
            </select>
        </div>
    }
}
