use contracts::query::PageInfo;
use leptos::prelude::*;

use crate::shared::icons::icon;

/// Pager for the generic lists. Pages are 1-based; an empty result set
/// still shows "Página 1 de 1".
#[component]
pub fn PaginationControls(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] page_info: Signal<PageInfo>,
    on_page_change: Callback<u32>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let p = page.get();
                    if page_info.get().has_prev(p) {
                        on_page_change.run(p - 1);
                    }
                }
                disabled=move || !page_info.get().has_prev(page.get())
                title="Página anterior"
            >
                {icon("chevron-left")}
                "Anterior"
            </button>
            <span class="pagination-info">
                {move || {
                    let info = page_info.get();
                    format!(
                        "Página {} de {} ({} registros)",
                        page.get(),
                        info.total_pages(),
                        info.total_count
                    )
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let p = page.get();
                    if page_info.get().has_next(p) {
                        on_page_change.run(p + 1);
                    }
                }
                disabled=move || !page_info.get().has_next(page.get())
                title="Próxima página"
            >
                "Próxima"
                {icon("chevron-right")}
            </button>
        </div>
    }
}
