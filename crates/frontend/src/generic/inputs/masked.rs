use contracts::masking;
use contracts::metadata::{FieldDescriptor, FormatMask};
use leptos::prelude::*;
use serde_json::Value;

use super::FieldLabel;

/// Text input backed by the masking engine: every keystroke is reformatted
/// for display and canonicalized for the draft.
#[component]
pub fn MaskedInput(
    field: FieldDescriptor,
    mask: FormatMask,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let (display, set_display) = signal(masking::display_stored(&mask, &value));

    let handle_input = move |raw: String| {
        let out = masking::process(&mask, &raw);
        set_display.set(out.display);
        on_change.run(out.canonical);
    };

    view! {
        <div class="field">
            <FieldLabel field=field />
            <input
                type="text"
                class="field__input"
                prop:value=move || display.get()
                on:input=move |ev| handle_input(event_target_value(&ev))
            />
        </div>
    }
}
