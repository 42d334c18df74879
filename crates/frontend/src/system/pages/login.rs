use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::system::session::api;
use crate::system::session::context::use_session;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let submit = move || {
        let user = username.get();
        let pass = password.get();
        if user.trim().is_empty() || pass.is_empty() {
            set_error.set(Some("Informe usuário e senha.".to_string()));
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::login(user.trim(), &pass).await {
                Ok(token) => match session.establish(token) {
                    Ok(()) => navigate("/dashboard", Default::default()),
                    Err(e) => set_error.set(Some(e)),
                },
                Err(e) => set_error.set(Some(e)),
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <form
                class="login-card"
                on:submit=move |ev| {
                    ev.prevent_default();
                    submit();
                }
            >
                <h1 class="login-card__title">"Console ERP"</h1>

                {move || error.get().map(|e| view! {
                    <div class="login-card__error">{e}</div>
                })}

                <label class="login-card__label">"Usuário"</label>
                <input
                    type="text"
                    class="login-card__input"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />

                <label class="login-card__label">"Senha"</label>
                <input
                    type="password"
                    class="login-card__input"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />

                <button type="submit" class="button button--primary" disabled=move || busy.get()>
                    {move || if busy.get() { "Entrando..." } else { "Entrar" }}
                </button>
            </form>
        </div>
    }
}
