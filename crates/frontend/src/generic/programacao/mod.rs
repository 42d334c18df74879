//! Order-programming dialog: splits every order line between stock
//! withdrawals and production, then confirms the transition to "Produção".

use chrono::Local;
use contracts::orders::{AllocationLine, FinalizePayload, OrderItem};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::shared::api::generic::{
    fetch_record, fetch_stock_lots, resolve_label, update_record, RefLookup, SaveError,
};
use crate::shared::components::modal::Modal;
use crate::shared::icons::icon;
use crate::system::session::context::use_session;

fn alert(message: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(message);
    }
}

#[component]
pub fn ProgramacaoModal(
    order_id: i64,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let session = use_session();

    let lines: RwSignal<Vec<AllocationLine>> = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let data_finalizacao = RwSignal::new(Local::now().format("%Y-%m-%d").to_string());
    let ordem_finalizacao = RwSignal::new("1.0".to_string());
    let expanded: RwSignal<Option<usize>> = RwSignal::new(None);
    let saving = RwSignal::new(false);

    spawn_local(async move {
        let record = match fetch_record(&session, "pedidos", order_id).await {
            Ok(r) => r,
            Err(e) => {
                load_error.set(Some(format!("Erro ao carregar o pedido: {}", e)));
                loading.set(false);
                return;
            }
        };
        if let Some(Value::String(seq)) = record.get("ordem_finalizacao") {
            if !seq.is_empty() {
                ordem_finalizacao.set(seq.clone());
            }
        }
        let items: Vec<OrderItem> = record
            .get("itens")
            .cloned()
            .map(|v| serde_json::from_value(v).unwrap_or_default())
            .unwrap_or_default();
        if items.is_empty() {
            load_error.set(Some("O pedido não possui itens para programar.".to_string()));
            loading.set(false);
            return;
        }

        let mut built = Vec::with_capacity(items.len());
        let products = RefLookup::new("produtos", "descricao");
        for item in items {
            let label = resolve_label(&session, &products, item.id_produto).await;
            let lots = match fetch_stock_lots(&session, item.id_produto).await {
                Ok(lots) => lots,
                Err(e) => {
                    log::warn!("stock lookup for product {} failed: {}", item.id_produto, e);
                    Vec::new()
                }
            };
            built.push(AllocationLine::new(item, lots, label));
        }
        lines.set(built);
        loading.set(false);
    });

    let set_produce = move |index: usize, raw: String| {
        let qty = raw.trim().parse::<u32>().unwrap_or(0);
        lines.update(|ls| {
            if let Some(line) = ls.get_mut(index) {
                line.set_to_produce(qty);
            }
        });
    };

    let set_lot = move |index: usize, lot_id: i64, raw: String| {
        let qty = raw.trim().parse::<u32>().unwrap_or(0);
        lines.update(|ls| {
            if let Some(line) = ls.get_mut(index) {
                line.set_withdrawal(lot_id, qty);
            }
        });
    };

    let save = move |_| {
        if saving.get_untracked() {
            return;
        }
        let snapshot = lines.get_untracked();
        let payload = match FinalizePayload::build(
            data_finalizacao.get_untracked(),
            ordem_finalizacao.get_untracked(),
            &snapshot,
        ) {
            Ok(p) => p,
            Err(msg) => {
                alert(&msg);
                return;
            }
        };
        let body = match serde_json::to_value(&payload) {
            Ok(b) => b,
            Err(e) => {
                log::error!("failed to serialize programming payload: {}", e);
                return;
            }
        };
        saving.set(true);
        spawn_local(async move {
            let result = update_record(&session, "pedidos", order_id, &body).await;
            saving.set(false);
            match result {
                Ok(_) => on_saved.run(()),
                Err(SaveError::Validation) => {
                    alert("Erro de validação ao programar o pedido.");
                }
                Err(SaveError::Other(e)) => {
                    log::error!("programming failed: {}", e);
                    alert("Erro ao programar o pedido. Tente novamente.");
                }
            }
        });
    };

    view! {
        <Modal title=format!("Programar Pedido #{}", order_id) on_close=on_close>
            {move || {
                if loading.get() {
                    return view! { <p class="loading">"Carregando..."</p> }.into_any();
                }
                if let Some(msg) = load_error.get() {
                    return view! { <div class="alert alert--error">{msg}</div> }.into_any();
                }
                view! {
                    <div class="programacao">
                        <div class="programacao__header">
                            <div class="field">
                                <label class="field__label">"Data de Finalização"</label>
                                <input
                                    type="date"
                                    class="field__input"
                                    prop:value=move || data_finalizacao.get()
                                    on:change=move |ev| {
                                        data_finalizacao.set(event_target_value(&ev))
                                    }
                                />
                            </div>
                            <div class="field">
                                <label class="field__label">"Ordem de Finalização"</label>
                                <input
                                    type="text"
                                    class="field__input"
                                    prop:value=move || ordem_finalizacao.get()
                                    on:change=move |ev| {
                                        ordem_finalizacao.set(event_target_value(&ev))
                                    }
                                />
                            </div>
                        </div>

                        {move || {
                            lines
                                .get()
                                .into_iter()
                                .enumerate()
                                .map(|(index, line)| {
                                    line_card(line, index, expanded, set_produce, set_lot)
                                })
                                .collect_view()
                        }}

                        <div class="programacao__actions">
                            <button
                                type="button"
                                class="btn btn--secondary"
                                on:click=move |_| on_close.run(())
                            >
                                "Cancelar"
                            </button>
                            <button
                                type="button"
                                class="btn btn--primary"
                                disabled=move || saving.get()
                                on:click=save
                            >
                                {move || {
                                    if saving.get() { "Salvando..." } else { "Confirmar Programação" }
                                }}
                            </button>
                        </div>
                    </div>
                }
                .into_any()
            }}
        </Modal>
    }
}

fn line_card(
    line: AllocationLine,
    index: usize,
    expanded: RwSignal<Option<usize>>,
    set_produce: impl Fn(usize, String) + Copy + 'static,
    set_lot: impl Fn(usize, i64, String) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let has_lots = line.has_lots();
    let withdrawals = line.withdrawals.clone();
    let lots = line.lots.clone();
    let is_open = move || expanded.get() == Some(index);

    view! {
        <div class="programacao__line">
            <div class="programacao__line-head">
                <span class="programacao__product">{line.product_label.clone()}</span>
                <span class="programacao__required">
                    {format!("Quantidade: {}", line.required())}
                </span>
            </div>
            <div class="programacao__split">
                <div class="field">
                    <label class="field__label">"A Retirar"</label>
                    <input
                        type="number"
                        class="field__input"
                        readonly=true
                        prop:value=line.to_withdraw().to_string()
                    />
                </div>
                <div class="field">
                    <label class="field__label">"A Produzir"</label>
                    <input
                        type="number"
                        min="0"
                        class="field__input"
                        readonly=has_lots
                        prop:value=line.to_produce().to_string()
                        on:change=move |ev| {
                            if !has_lots {
                                set_produce(index, event_target_value(&ev));
                            }
                        }
                    />
                </div>
                {has_lots
                    .then(|| view! {
                        <button
                            type="button"
                            class="btn btn--secondary"
                            on:click=move |_| {
                                expanded.set(if is_open() { None } else { Some(index) });
                            }
                        >
                            {icon("chevron-down")}
                            {move || {
                                if is_open() { " Ocultar lotes" } else { " Retirar do estoque" }
                            }}
                        </button>
                    })}
                {(!has_lots)
                    .then(|| view! {
                        <span class="programacao__no-stock">"Sem estoque disponível"</span>
                    })}
            </div>
            <Show when=is_open>
                <table class="programacao__lots">
                    <thead>
                        <tr>
                            <th>"Lote"</th>
                            <th>"Localização"</th>
                            <th>"Disponível"</th>
                            <th>"Retirar"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {lots
                            .iter()
                            .map(|lot| {
                                let lot_id = lot.id;
                                let assigned = withdrawals.get(&lot_id).copied().unwrap_or(0);
                                view! {
                                    <tr>
                                        <td>{lot.lot_code().to_string()}</td>
                                        <td>{lot.location()}</td>
                                        <td>{lot.quantidade}</td>
                                        <td>
                                            <input
                                                type="number"
                                                min="0"
                                                max=lot.quantidade.to_string()
                                                class="field__input"
                                                prop:value=assigned.to_string()
                                                on:change=move |ev| {
                                                    set_lot(index, lot_id, event_target_value(&ev))
                                                }
                                            />
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </Show>
        </div>
    }
}
