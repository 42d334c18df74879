//! Metadata-driven list page with search, pagination, selection and the
//! status-transition actions for filtered order views.

pub mod actions;

use contracts::masking;
use contracts::metadata::{resolve_input, FieldDescriptor, InputKind, ModelMetadata};
use contracts::query::{ListQuery, PageInfo, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};
use serde_json::{json, Value};

use self::actions::{actions_for, ActionKind, StatusAction};
use super::programacao::ProgramacaoModal;
use crate::shared::api::generic::{
    delete_record, export_csv, fetch_list, fetch_metadata, update_record, SaveError,
};
use crate::shared::components::pagination::PaginationControls;
use crate::shared::date_utils;
use crate::shared::debounce::Debouncer;
use crate::shared::icons::icon;
use crate::system::session::context::use_session;

fn alert(message: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Columns are every metadata field except the id and the structured editors
/// that have no tabular rendering.
fn list_columns(metadata: &ModelMetadata) -> Vec<FieldDescriptor> {
    metadata
        .fields
        .iter()
        .filter(|f| f.name != "id")
        .filter(|f| {
            !matches!(
                resolve_input(f),
                InputKind::RuleBuilder | InputKind::OrderItems
            )
        })
        .cloned()
        .collect()
}

fn cell_view(field: &FieldDescriptor, value: &Value) -> AnyView {
    if value.is_null() {
        return view! { <span class="cell cell--empty">"-"</span> }.into_any();
    }
    match resolve_input(field) {
        InputKind::Password => view! { <span class="cell">"*********"</span> }.into_any(),
        InputKind::Masked(mask) => {
            let text = masking::display_stored(&mask, value);
            view! { <span class="cell">{text}</span> }.into_any()
        }
        InputKind::Boolean => {
            let truthy = value.as_bool().unwrap_or(false);
            let situacao = field.name.to_lowercase().contains("situacao");
            let label = match (situacao, truthy) {
                (true, true) => "Ativo",
                (true, false) => "Inativo",
                (false, true) => "Sim",
                (false, false) => "Não",
            };
            let class = if truthy { "badge badge--on" } else { "badge badge--off" };
            view! { <span class=class>{label}</span> }.into_any()
        }
        InputKind::Date { with_time } => {
            let raw = value.as_str().unwrap_or_default();
            let text = if with_time {
                date_utils::format_datetime_br(raw)
            } else {
                date_utils::format_date_br(raw)
            };
            view! { <span class="cell">{text}</span> }.into_any()
        }
        _ => {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            view! { <span class="cell">{text}</span> }.into_any()
        }
    }
}

#[component]
pub fn GenericList() -> impl IntoView {
    let session = use_session();
    let params = use_params_map();
    let navigate = use_navigate();

    let model = Memo::new(move |_| params.read().get("model").unwrap_or_default());
    let status = Memo::new(move |_| params.read().get("status"));

    let metadata: RwSignal<Option<ModelMetadata>> = RwSignal::new(None);
    let rows: RwSignal<Vec<Value>> = RwSignal::new(Vec::new());
    let total_count = RwSignal::new(0u32);
    let page = RwSignal::new(1u32);
    let search_text = RwSignal::new(String::new());
    let search_applied = RwSignal::new(String::new());
    let selected: RwSignal<Option<i64>> = RwSignal::new(None);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let programming: RwSignal<Option<i64>> = RwSignal::new(None);
    let debouncer = Debouncer::new();

    // view change resets everything, including the typed search
    Effect::new(move |_| {
        let model_name = model.get();
        status.track();
        if model_name.is_empty() {
            return;
        }
        debouncer.cancel();
        page.set(1);
        search_text.set(String::new());
        search_applied.set(String::new());
        selected.set(None);
        metadata.set(None);
        load_error.set(None);
        spawn_local(async move {
            match fetch_metadata(&session, &model_name).await {
                Ok(m) => metadata.set(Some(m)),
                Err(e) => load_error.set(Some(format!("Erro ao carregar metadados: {}", e))),
            }
        });
    });

    Effect::new(move |_| {
        let model_name = model.get();
        let query = ListQuery {
            page: page.get(),
            limit: DEFAULT_PAGE_SIZE,
            search_term: search_applied.get(),
            status_filter: status.get(),
        };
        if model_name.is_empty() {
            return;
        }
        spawn_local(async move {
            match fetch_list(&session, &model_name, &query).await {
                Ok(response) => {
                    rows.set(response.items);
                    total_count.set(response.total_count);
                }
                Err(e) => load_error.set(Some(format!("Erro ao carregar registros: {}", e))),
            }
        });
    });

    let on_search = move |raw: String| {
        search_text.set(raw);
        debouncer.schedule(500, move || {
            page.set(1);
            selected.set(None);
            search_applied.set(search_text.get_untracked());
        });
    };

    let drop_selected_row = move || {
        let Some(id) = selected.get_untracked() else {
            return;
        };
        rows.update(|items| items.retain(|r| r.get("id").and_then(Value::as_i64) != Some(id)));
        total_count.update(|t| *t = t.saturating_sub(1));
        selected.set(None);
    };

    let handle_delete = move |_| {
        let Some(id) = selected.get_untracked() else {
            return;
        };
        if !confirm("Tem certeza que deseja excluir este registro?") {
            return;
        }
        let model_name = model.get_untracked();
        spawn_local(async move {
            match delete_record(&session, &model_name, id).await {
                Ok(()) => drop_selected_row(),
                Err(e) => {
                    log::error!("delete failed: {}", e);
                    alert("Erro ao excluir o registro.");
                }
            }
        });
    };

    let handle_export = move |_| {
        let model_name = model.get_untracked();
        let term = search_applied.get_untracked();
        spawn_local(async move {
            if let Err(e) = export_csv(&session, &model_name, &term).await {
                log::error!("export failed: {}", e);
                alert("Erro ao exportar os registros.");
            }
        });
    };

    let run_action = move |action: StatusAction| {
        let Some(id) = selected.get_untracked() else {
            return;
        };
        match action.kind {
            ActionKind::Programacao => programming.set(Some(id)),
            ActionKind::Transition { target } => {
                if !confirm(action.confirm) {
                    return;
                }
                let model_name = model.get_untracked();
                spawn_local(async move {
                    let body = json!({ "situacao": target });
                    match update_record(&session, &model_name, id, &body).await {
                        Ok(_) => drop_selected_row(),
                        Err(SaveError::Validation) => {
                            alert("Erro de validação ao mudar a situação.");
                        }
                        Err(SaveError::Other(e)) => {
                            log::error!("transition failed: {}", e);
                            alert("Erro ao mudar a situação do registro.");
                        }
                    }
                });
            }
        }
    };

    let nav_new = {
        let navigate = navigate.clone();
        move |_| navigate(&format!("/{}/new", model.get_untracked()), Default::default())
    };
    let nav_edit = {
        let navigate = navigate.clone();
        move |_| {
            if let Some(id) = selected.get_untracked() {
                navigate(
                    &format!("/{}/edit/{}", model.get_untracked(), id),
                    Default::default(),
                );
            }
        }
    };

    let page_info = Signal::derive(move || PageInfo {
        total_count: total_count.get(),
        limit: DEFAULT_PAGE_SIZE,
    });
    let on_page_change = Callback::new(move |p: u32| {
        selected.set(None);
        page.set(p);
    });

    let title = move || {
        let base = metadata
            .get()
            .map(|m| m.plural().to_string())
            .unwrap_or_else(|| model.get());
        match status.get() {
            Some(s) => format!("{} — {}", base, s),
            None => base,
        }
    };

    let has_selection = move || selected.get().is_some();

    view! {
        <div class="list-page">
            <div class="list-page__head">
                <h1 class="page-title">{title}</h1>
                <input
                    type="text"
                    class="list-page__search"
                    placeholder="Buscar..."
                    prop:value=move || search_text.get()
                    on:input=move |ev| on_search(event_target_value(&ev))
                />
            </div>

            <div class="list-page__actions">
                <button class="btn btn--primary" on:click=nav_new>
                    {icon("plus")}
                    " Novo"
                </button>
                <button class="btn btn--secondary" disabled=move || !has_selection() on:click=nav_edit>
                    {icon("edit")}
                    " Editar"
                </button>
                <button
                    class="btn btn--danger"
                    disabled=move || !has_selection()
                    on:click=handle_delete
                >
                    {icon("delete")}
                    " Excluir"
                </button>
                <button class="btn btn--secondary" on:click=handle_export>
                    {icon("download")}
                    " Exportar CSV"
                </button>
                {move || {
                    actions_for(&model.get(), status.get().as_deref())
                        .into_iter()
                        .map(|action| {
                            view! {
                                <button
                                    class="btn btn--accent"
                                    disabled=move || !has_selection()
                                    on:click=move |_| run_action(action)
                                >
                                    {action.label}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>

            {move || {
                load_error
                    .get()
                    .map(|msg| view! { <div class="alert alert--error">{msg}</div> })
            }}

            {move || {
                let Some(meta) = metadata.get() else {
                    return view! { <p class="loading">"Carregando..."</p> }.into_any();
                };
                let columns = list_columns(&meta);
                let header = columns
                    .iter()
                    .map(|f| view! { <th>{f.label.clone()}</th> })
                    .collect_view();
                view! {
                    <table class="list-table">
                        <thead>
                            <tr>{header}</tr>
                        </thead>
                        <tbody>
                            {move || {
                                let columns = columns.clone();
                                rows.get()
                                    .into_iter()
                                    .map(|record| {
                                        let id = record.get("id").and_then(Value::as_i64);
                                        let cells = columns
                                            .iter()
                                            .map(|field| {
                                                let value = record
                                                    .get(&field.name)
                                                    .cloned()
                                                    .unwrap_or(Value::Null);
                                                view! { <td>{cell_view(field, &value)}</td> }
                                            })
                                            .collect_view();
                                        view! {
                                            <tr
                                                class:list-table__row--selected=move || {
                                                    id.is_some() && selected.get() == id
                                                }
                                                on:click=move |_| {
                                                    if selected.get_untracked() == id {
                                                        selected.set(None);
                                                    } else {
                                                        selected.set(id);
                                                    }
                                                }
                                            >
                                                {cells}
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                }
                .into_any()
            }}

            <PaginationControls page=page page_info=page_info on_page_change=on_page_change />

            {move || {
                programming
                    .get()
                    .map(|order_id| {
                        let on_close = Callback::new(move |_: ()| programming.set(None));
                        let on_saved = Callback::new(move |_: ()| {
                            drop_selected_row();
                            programming.set(None);
                        });
                        view! {
                            <ProgramacaoModal
                                order_id=order_id
                                on_close=on_close
                                on_saved=on_saved
                            />
                        }
                    })
            }}
        </div>
    }
}
