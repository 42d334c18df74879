//! Metadata-driven field inputs.
//!
//! `FieldInput` maps a resolved `InputKind` to the concrete component. Each
//! input receives the draft's current value at mount and reports canonical
//! values back through `on_change`; it never touches the draft directly.

pub mod boolean;
pub mod creatable;
pub mod date;
pub mod masked;
pub mod order_items;
pub mod password;
pub mod reference;
pub mod rule_builder;
pub mod select;
pub mod text;

use contracts::metadata::{resolve_input, FieldDescriptor, InputKind};
use leptos::prelude::*;
use serde_json::Value;

#[component]
pub fn FieldInput(
    field: FieldDescriptor,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    match resolve_input(&field) {
        InputKind::Masked(mask) => view! {
            <masked::MaskedInput field=field mask=mask value=value on_change=on_change />
        }
        .into_any(),
        InputKind::Reference { model, label_field } => view! {
            <reference::ReferenceSelect
                field=field
                model=model
                label_field=label_field
                value=value
                on_change=on_change
            />
        }
        .into_any(),
        InputKind::Password => view! {
            <password::PasswordInput field=field value=value on_change=on_change />
        }
        .into_any(),
        InputKind::Text { numeric } => view! {
            <text::TextInput field=field numeric=numeric value=value on_change=on_change />
        }
        .into_any(),
        InputKind::Date { with_time } => view! {
            <date::DateInput field=field with_time=with_time value=value on_change=on_change />
        }
        .into_any(),
        InputKind::Boolean => view! {
            <boolean::BooleanSelect field=field value=value on_change=on_change />
        }
        .into_any(),
        InputKind::Select => view! {
            <select::StaticSelect field=field value=value on_change=on_change />
        }
        .into_any(),
        InputKind::CreatableSelect => view! {
            <creatable::CreatableSelect field=field value=value on_change=on_change />
        }
        .into_any(),
        InputKind::RuleBuilder => view! {
            <rule_builder::RuleBuilderInput field=field value=value on_change=on_change />
        }
        .into_any(),
        InputKind::OrderItems => view! {
            <order_items::OrderItemsInput value=value on_change=on_change />
        }
        .into_any(),
    }
}

/// Shared label row: field label plus the required marker.
#[component]
pub fn FieldLabel(field: FieldDescriptor) -> impl IntoView {
    view! {
        <label class="field__label">
            {field.label.clone()}
            {field.required.then(|| view! { <span class="field__required">" *"</span> })}
        </label>
    }
}

/// Text content of a stored value, for inputs that edit strings.
pub fn value_as_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
