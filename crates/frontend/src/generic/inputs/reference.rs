use contracts::metadata::FieldDescriptor;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use super::FieldLabel;
use crate::shared::api::generic::{resolve_label, search_references, RefLookup, RefOption};
use crate::shared::debounce::Debouncer;
use crate::shared::icons::icon;
use crate::system::session::context::use_session;

/// Bare async FK picker: current label, search-as-you-type dropdown,
/// clear button. The stored label is resolved once at mount; search results
/// live only while the dropdown is open.
#[component]
pub fn ReferencePicker(
    lookup: RefLookup,
    initial: Option<i64>,
    on_select: Callback<Option<RefOption>>,
) -> impl IntoView {
    let session = use_session();
    let target = StoredValue::new(lookup);

    let selected = RwSignal::new(initial);
    let label = RwSignal::new(String::new());
    let open = RwSignal::new(false);
    let term = RwSignal::new(String::new());
    let results: RwSignal<Vec<RefOption>> = RwSignal::new(Vec::new());
    let debouncer = Debouncer::new();

    if let Some(id) = initial {
        spawn_local(async move {
            let lookup = target.get_value();
            label.set(resolve_label(&session, &lookup, id).await);
        });
    }

    let close = move || {
        open.set(false);
        term.set(String::new());
        results.set(Vec::new());
        debouncer.cancel();
    };

    let handle_search = move |raw: String| {
        term.set(raw);
        debouncer.schedule(300, move || {
            let q = term.get_untracked();
            spawn_local(async move {
                let lookup = target.get_value();
                match search_references(&session, &lookup, &q).await {
                    Ok(found) => results.set(found),
                    Err(e) => log::warn!("reference search failed: {}", e),
                }
            });
        });
    };

    let pick = move |opt: RefOption| {
        selected.set(Some(opt.id));
        label.set(opt.label.clone());
        on_select.run(Some(opt));
        close();
    };

    let clear = move |_| {
        selected.set(None);
        label.set(String::new());
        on_select.run(None);
    };

    view! {
        <div class="refselect">
            <div class="refselect__control">
                <button
                    type="button"
                    class="refselect__value"
                    on:click=move |_| {
                        if open.get() {
                            close();
                        } else {
                            open.set(true);
                            handle_search(String::new());
                        }
                    }
                >
                    <span>
                        {move || {
                            if selected.get().is_some() {
                                let l = label.get();
                                if l.is_empty() { "...".to_string() } else { l }
                            } else {
                                "Selecione...".to_string()
                            }
                        }}
                    </span>
                    {icon("chevron-down")}
                </button>
                <Show when=move || selected.get().is_some()>
                    <button type="button" class="refselect__clear" on:click=clear title="Limpar">
                        {icon("x")}
                    </button>
                </Show>
            </div>
            <Show when=move || open.get()>
                <div class="refselect__dropdown">
                    <input
                        type="text"
                        class="refselect__search"
                        placeholder="Digite para buscar..."
                        prop:value=move || term.get()
                        on:input=move |ev| handle_search(event_target_value(&ev))
                    />
                    <ul class="refselect__options">
                        {move || {
                            let found = results.get();
                            if found.is_empty() {
                                view! { <li class="refselect__empty">"Nenhum resultado"</li> }
                                    .into_any()
                            } else {
                                found
                                    .into_iter()
                                    .map(|opt| {
                                        let display = opt.label.clone();
                                        view! {
                                            <li
                                                class="refselect__option"
                                                on:click=move |_| pick(opt.clone())
                                            >
                                                {display}
                                            </li>
                                        }
                                    })
                                    .collect_view()
                                    .into_any()
                            }
                        }}
                    </ul>
                </div>
            </Show>
        </div>
    }
}

/// Labeled form field wrapping the picker; stores the selected id, or null
/// when cleared.
#[component]
pub fn ReferenceSelect(
    field: FieldDescriptor,
    model: String,
    label_field: String,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let initial = value.as_i64();
    let forward = Callback::new(move |opt: Option<RefOption>| {
        on_change.run(match opt {
            Some(o) => Value::from(o.id),
            None => Value::Null,
        });
    });

    view! {
        <div class="field">
            <FieldLabel field=field />
            <ReferencePicker
                lookup=RefLookup::new(model, label_field)
                initial=initial
                on_select=forward
            />
        </div>
    }
}
