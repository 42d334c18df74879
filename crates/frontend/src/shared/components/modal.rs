use crate::shared::icons::icon;
use leptos::prelude::*;

/// Overlay modal surface. Closing is always explicit (the X button or the
/// caller's own actions); clicking the backdrop does nothing so half-filled
/// allocations are not lost by accident.
#[component]
pub fn Modal(
    #[prop(into)] title: Signal<String>,
    on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <div class="modal-overlay">
            <div class="modal">
                <div class="modal__header">
                    <h2 class="modal__title">{move || title.get()}</h2>
                    <button class="modal__close" on:click=move |_| on_close.run(())>
                        {icon("x")}
                    </button>
                </div>
                <div class="modal__body">{children()}</div>
            </div>
        </div>
    }
}
