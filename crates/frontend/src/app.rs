use crate::routes::routes::AppRoutes;
use crate::system::session::context::Session;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Session is restored from localStorage once at mount; expired tokens
    // are discarded before anything renders.
    provide_context(Session::restore());

    view! {
        <AppRoutes />
    }
}
