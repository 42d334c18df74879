use chrono::{Duration, Local};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api::generic::{self, DashboardStats};
use crate::system::session::context::use_session;

fn format_currency(value: f64) -> String {
    contracts::masking::display_stored(
        &contracts::metadata::FormatMask::Currency,
        &serde_json::json!(value),
    )
}

#[component]
fn StatCard(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="stat-card">
            <span class="stat-card__label">{label}</span>
            <span class="stat-card__value">{move || value.get()}</span>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let (stats, set_stats) = signal::<Option<DashboardStats>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    // Default window: last 30 days.
    let end_date = Local::now().date_naive();
    let start_date = end_date - Duration::days(30);
    let (range, set_range) = signal((start_date.to_string(), end_date.to_string()));

    let fetch = move || {
        let (start, end) = range.get();
        spawn_local(async move {
            match generic::fetch_dashboard_stats(&session, &start, &end).await {
                Ok(data) => {
                    set_stats.set(Some(data));
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    Effect::new(move |_| {
        // refetch whenever the range changes
        range.track();
        fetch();
    });

    let summary = move |f: fn(&DashboardStats) -> String| {
        Signal::derive(move || stats.get().as_ref().map(f).unwrap_or_else(|| "—".to_string()))
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Dashboard"</h1>
                </div>
                <div class="header__actions">
                    <input
                        type="date"
                        class="input"
                        prop:value=move || range.get().0
                        on:change=move |ev| {
                            let v = event_target_value(&ev);
                            set_range.update(|r| r.0 = v);
                        }
                    />
                    <input
                        type="date"
                        class="input"
                        prop:value=move || range.get().1
                        on:change=move |ev| {
                            let v = event_target_value(&ev);
                            set_range.update(|r| r.1 = v);
                        }
                    />
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <div class="stat-grid">
                <StatCard label="Faturamento" value=summary(|s| format_currency(s.summary.revenue)) />
                <StatCard label="Pedidos" value=summary(|s| s.summary.orders.to_string()) />
                <StatCard label="A Receber" value=summary(|s| format_currency(s.summary.to_receive)) />
                <StatCard label="A Pagar" value=summary(|s| format_currency(s.summary.to_pay)) />
                <StatCard label="Saldo" value=summary(|s| format_currency(s.summary.net_balance)) />
            </div>

            <div class="dashboard-panels">
                <div class="panel">
                    <h2 class="panel__title">"Pedidos Recentes"</h2>
                    <table class="table__data table--striped">
                        <thead class="table__head">
                            <tr>
                                <th class="table__header-cell">"Nº"</th>
                                <th class="table__header-cell">"Cliente"</th>
                                <th class="table__header-cell">"Total"</th>
                                <th class="table__header-cell">"Situação"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || stats.get().map(|s| s.recent_orders).unwrap_or_default()
                                .into_iter()
                                .map(|order| view! {
                                    <tr class="table__row">
                                        <td class="table__cell">{order.id}</td>
                                        <td class="table__cell">{order.cliente}</td>
                                        <td class="table__cell">{format_currency(order.total)}</td>
                                        <td class="table__cell">{order.situacao}</td>
                                    </tr>
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                </div>

                <div class="panel">
                    <h2 class="panel__title">"Estoque Baixo"</h2>
                    <table class="table__data table--striped">
                        <thead class="table__head">
                            <tr>
                                <th class="table__header-cell">"SKU"</th>
                                <th class="table__header-cell">"Produto"</th>
                                <th class="table__header-cell">"Qtd."</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || stats.get().map(|s| s.low_stock).unwrap_or_default()
                                .into_iter()
                                .map(|item| view! {
                                    <tr class="table__row">
                                        <td class="table__cell">{item.sku}</td>
                                        <td class="table__cell">{item.produto}</td>
                                        <td class="table__cell">{item.quantidade}</td>
                                    </tr>
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
