//! Metadata-driven create/edit form.
//!
//! One component serves every model: the route decides which metadata to
//! fetch, the metadata decides which inputs to mount. The draft map is the
//! single source of truth for the submit body; inputs push canonical values
//! into it and never read it back.

use contracts::metadata::{empty_draft, group_tabs, ModelMetadata, DEFAULT_TAB};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};
use serde_json::{Map, Value};

use super::inputs::FieldInput;
use super::ActiveModel;
use crate::shared::api::generic::{
    create_record, fetch_metadata, fetch_record, update_record, SaveError,
};
use crate::system::session::context::use_session;

#[component]
pub fn GenericForm() -> impl IntoView {
    let session = use_session();
    let params = use_params_map();
    let navigate = use_navigate();

    let model = Memo::new(move |_| params.read().get("model").unwrap_or_default());
    let record_id = Memo::new(move |_| {
        params.read().get("id").and_then(|raw| raw.parse::<i64>().ok())
    });

    let active_model = RwSignal::new(String::new());
    provide_context(ActiveModel(active_model));

    // metadata plus the initial values the inputs were mounted with
    let ready: RwSignal<Option<(ModelMetadata, Map<String, Value>)>> = RwSignal::new(None);
    let draft: RwSignal<Map<String, Value>> = RwSignal::new(Map::new());
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let save_error: RwSignal<Option<String>> = RwSignal::new(None);
    let active_tab: RwSignal<String> = RwSignal::new(String::new());
    let saving = RwSignal::new(false);

    Effect::new(move |_| {
        let model_name = model.get();
        let id = record_id.get();
        if model_name.is_empty() {
            return;
        }
        active_model.set(model_name.clone());
        ready.set(None);
        load_error.set(None);
        save_error.set(None);
        spawn_local(async move {
            let metadata = match fetch_metadata(&session, &model_name).await {
                Ok(m) => m,
                Err(e) => {
                    load_error.set(Some(format!("Erro ao carregar metadados: {}", e)));
                    return;
                }
            };
            let initial = match id {
                Some(id) => match fetch_record(&session, &model_name, id).await {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => {
                        load_error.set(Some("Registro em formato inesperado.".to_string()));
                        return;
                    }
                    Err(e) => {
                        load_error.set(Some(format!("Erro ao carregar registro: {}", e)));
                        return;
                    }
                },
                None => empty_draft(&metadata.fields),
            };
            active_tab.set(
                metadata
                    .fields
                    .first()
                    .map(|f| f.tab_name().to_string())
                    .unwrap_or_else(|| DEFAULT_TAB.to_string()),
            );
            draft.set(initial.clone());
            ready.set(Some((metadata, initial)));
        });
    });

    let submit = Callback::new({
        let navigate = navigate.clone();
        move |_: ()| {
            if saving.get_untracked() {
                return;
            }
            let model_name = model.get_untracked();
            let id = record_id.get_untracked();
            saving.set(true);
            save_error.set(None);
            let navigate = navigate.clone();
            spawn_local(async move {
                let body = Value::Object(draft.get_untracked());
                let result = match id {
                    Some(id) => update_record(&session, &model_name, id, &body).await,
                    None => create_record(&session, &model_name, &body).await,
                };
                saving.set(false);
                match result {
                    Ok(_) => navigate(&format!("/{}", model_name), Default::default()),
                    Err(SaveError::Validation) => save_error.set(Some(
                        "Erro de validação. Verifique os campos preenchidos.".to_string(),
                    )),
                    Err(SaveError::Other(e)) => {
                        log::error!("save failed: {}", e);
                        save_error.set(Some("Erro ao salvar. Tente novamente.".to_string()));
                    }
                }
            });
        }
    });

    let cancel = Callback::new({
        let navigate = navigate.clone();
        move |_: ()| {
            navigate(&format!("/{}", model.get_untracked()), Default::default());
        }
    });

    view! {
        <div class="form-page">
            {move || {
                if let Some(msg) = load_error.get() {
                    return view! { <div class="alert alert--error">{msg}</div> }.into_any();
                }
                let Some((metadata, initial)) = ready.get() else {
                    return view! { <p class="loading">"Carregando..."</p> }.into_any();
                };

                let title = if record_id.get_untracked().is_some() {
                    format!("Editar {}", metadata.display_name)
                } else {
                    format!("Novo {}", metadata.display_name)
                };
                let tabs = group_tabs(&metadata.fields);
                let tab_names: Vec<String> = tabs.iter().map(|t| t.name.clone()).collect();
                let show_tab_bar = tab_names.len() > 1;

                view! {
                    <h1 class="page-title">{title}</h1>
                    {show_tab_bar
                        .then(|| view! {
                            <div class="tabs">
                                {tab_names
                                    .into_iter()
                                    .map(|name| {
                                        let display = name.clone();
                                        let is_active = {
                                            let name = name.clone();
                                            move || active_tab.get() == name
                                        };
                                        view! {
                                            <button
                                                type="button"
                                                class="tabs__tab"
                                                class:tabs__tab--active=is_active
                                                on:click=move |_| active_tab.set(name.clone())
                                            >
                                                {display}
                                            </button>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        })}
                    {tabs
                        .into_iter()
                        .map(|tab| {
                            let tab_name = tab.name.clone();
                            // every tab stays mounted so hidden edits survive
                            let display = move || {
                                if active_tab.get() == tab_name { "grid" } else { "none" }
                            };
                            view! {
                                <div class="form-grid" style:display=display>
                                    {tab.fields
                                        .into_iter()
                                        .filter(|f| f.name != "id")
                                        .map(|field| {
                                            let name = field.name.clone();
                                            let value = initial
                                                .get(&field.name)
                                                .cloned()
                                                .unwrap_or(Value::Null);
                                            let on_change = Callback::new(move |v: Value| {
                                                draft.update_untracked(|d| {
                                                    d.insert(name.clone(), v);
                                                });
                                            });
                                            view! {
                                                <FieldInput
                                                    field=field
                                                    value=value
                                                    on_change=on_change
                                                />
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            }
                        })
                        .collect_view()}
                    {move || {
                        save_error
                            .get()
                            .map(|msg| view! { <div class="alert alert--error">{msg}</div> })
                    }}
                    <div class="form-actions">
                        <button
                            type="button"
                            class="btn btn--secondary"
                            on:click=move |_| cancel.run(())
                        >
                            "Cancelar"
                        </button>
                        <button
                            type="button"
                            class="btn btn--primary"
                            disabled=move || saving.get()
                            on:click=move |_| submit.run(())
                        >
                            {move || if saving.get() { "Salvando..." } else { "Salvar" }}
                        </button>
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}
