use contracts::metadata::FieldDescriptor;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use super::{value_as_string, FieldLabel};
use crate::generic::ActiveModel;
use crate::shared::api::generic::fetch_distinct;
use crate::system::session::context::use_session;

/// Free-text select seeded with the column's existing distinct values.
/// Typing stores the text as-is; picking a suggestion stores it too, and a
/// new value typed by the user joins the suggestion list once chosen.
#[component]
pub fn CreatableSelect(
    field: FieldDescriptor,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let session = use_session();
    let model = use_context::<ActiveModel>()
        .map(|m| m.0.get_untracked())
        .unwrap_or_default();
    let field_name = field.name.clone();

    let (text, set_text) = signal(value_as_string(&value));
    let options: RwSignal<Vec<String>> = RwSignal::new(Vec::new());
    let open = RwSignal::new(false);

    if !model.is_empty() {
        spawn_local(async move {
            match fetch_distinct(&session, &model, &field_name).await {
                Ok(values) => options.set(
                    values
                        .into_iter()
                        .filter_map(|v| match v {
                            Value::String(s) if !s.is_empty() => Some(s),
                            Value::Null | Value::String(_) => None,
                            other => Some(other.to_string()),
                        })
                        .collect(),
                ),
                Err(e) => log::warn!("distinct values unavailable: {}", e),
            }
        });
    }

    let emit = move |raw: String| {
        let canonical = if raw.is_empty() {
            Value::Null
        } else {
            Value::String(raw)
        };
        on_change.run(canonical);
    };

    let handle_input = move |raw: String| {
        set_text.set(raw.clone());
        open.set(true);
        emit(raw);
    };

    let pick = move |choice: String| {
        options.update(|opts| {
            if !opts.iter().any(|o| o == &choice) {
                opts.push(choice.clone());
            }
        });
        set_text.set(choice.clone());
        emit(choice);
        open.set(false);
    };

    let suggestions = move || {
        let typed = text.get().to_lowercase();
        options
            .get()
            .into_iter()
            .filter(|opt| typed.is_empty() || opt.to_lowercase().contains(&typed))
            .collect::<Vec<_>>()
    };

    view! {
        <div class="field">
            <FieldLabel field=field />
            <div class="creatable">
                <input
                    type="text"
                    class="field__input"
                    prop:value=move || text.get()
                    on:input=move |ev| handle_input(event_target_value(&ev))
                    on:focus=move |_| open.set(true)
                />
                <Show when=move || open.get()>
                    <ul class="creatable__options">
                        {move || {
                            let typed = text.get();
                            let listed = suggestions();
                            let offer_new = !typed.is_empty()
                                && !listed.iter().any(|o| o == &typed);
                            view! {
                                {listed
                                    .into_iter()
                                    .map(|opt| {
                                        let display = opt.clone();
                                        view! {
                                            <li
                                                class="creatable__option"
                                                on:click=move |_| pick(opt.clone())
                                            >
                                                {display}
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                                {offer_new
                                    .then(|| {
                                        let fresh = typed.clone();
                                        view! {
                                            <li
                                                class="creatable__option creatable__option--new"
                                                on:click=move |_| pick(fresh.clone())
                                            >
                                                {format!("Adicionar \"{}\"", typed)}
                                            </li>
                                        }
                                    })}
                            }
                        }}
                    </ul>
                </Show>
            </div>
        </div>
    }
}
