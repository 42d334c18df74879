use contracts::orders::OrderItem;
use leptos::prelude::*;
use serde_json::{Map, Value};

use super::reference::ReferencePicker;
use crate::shared::api::generic::{RefLookup, RefOption};
use crate::shared::icons::icon;

/// Editable `itens` table for order forms: one row per line with a product
/// picker and a quantity. Columns this editor does not know about survive
/// the round trip untouched.
#[component]
pub fn OrderItemsInput(value: Value, on_change: Callback<Value>) -> impl IntoView {
    let initial: Vec<OrderItem> = serde_json::from_value(value).unwrap_or_default();
    let rows: RwSignal<Vec<OrderItem>> = RwSignal::new(initial);

    let emit = move || {
        let snapshot = rows.get_untracked();
        match serde_json::to_value(&snapshot) {
            Ok(array) => on_change.run(array),
            Err(e) => log::error!("failed to serialize order items: {}", e),
        }
    };

    let add_row = move |_| {
        rows.update(|items| {
            items.push(OrderItem {
                id: None,
                id_produto: 0,
                descricao: None,
                quantidade: 1,
                numero_a_retirar: 0,
                numero_a_produzir: 0,
                extra: Map::new(),
            });
        });
        emit();
    };

    let remove_row = move |index: usize| {
        rows.update(|items| {
            if index < items.len() {
                items.remove(index);
            }
        });
        emit();
    };

    let set_product = move |index: usize, opt: Option<RefOption>| {
        rows.update(|items| {
            if let Some(item) = items.get_mut(index) {
                match opt {
                    Some(o) => {
                        item.id_produto = o.id;
                        item.descricao = Some(o.label);
                    }
                    None => {
                        item.id_produto = 0;
                        item.descricao = None;
                    }
                }
            }
        });
        emit();
    };

    let set_quantity = move |index: usize, raw: String| {
        let qty = raw.parse::<u32>().unwrap_or(0);
        rows.update(|items| {
            if let Some(item) = items.get_mut(index) {
                item.quantidade = qty;
            }
        });
        emit();
    };

    view! {
        <div class="field field--wide">
            <label class="field__label">"Itens do Pedido"</label>
            <table class="items-table">
                <thead>
                    <tr>
                        <th>"Produto"</th>
                        <th class="items-table__qty">"Quantidade"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        rows.get()
                            .into_iter()
                            .enumerate()
                            .map(|(index, item)| {
                                let product = (item.id_produto > 0).then_some(item.id_produto);
                                let on_product = Callback::new(move |opt| set_product(index, opt));
                                view! {
                                    <tr>
                                        <td>
                                            <ReferencePicker
                                                lookup=RefLookup::active_products()
                                                initial=product
                                                on_select=on_product
                                            />
                                        </td>
                                        <td class="items-table__qty">
                                            <input
                                                type="number"
                                                min="0"
                                                class="field__input"
                                                prop:value=item.quantidade.to_string()
                                                on:change=move |ev| {
                                                    set_quantity(index, event_target_value(&ev))
                                                }
                                            />
                                        </td>
                                        <td>
                                            <button
                                                type="button"
                                                class="btn btn--icon btn--danger"
                                                title="Remover item"
                                                on:click=move |_| remove_row(index)
                                            >
                                                {icon("delete")}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
            <button type="button" class="btn btn--secondary" on:click=add_row>
                {icon("plus")}
                " Adicionar Item"
            </button>
        </div>
    }
}
