use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::shared::icons::icon;
use crate::system::session::context::use_session;

const ORDER_STATUSES: [&str; 7] = [
    "Orçamento",
    "Aprovação",
    "Programação",
    "Produção",
    "Embalagem",
    "Faturamento",
    "Expedição",
];

struct NavItem {
    label: &'static str,
    path: &'static str,
    icon: &'static str,
    admin_only: bool,
}

const NAV_ITEMS: [NavItem; 8] = [
    NavItem { label: "Dashboard", path: "/dashboard", icon: "dashboard", admin_only: false },
    NavItem { label: "Usuários", path: "/usuarios", icon: "customers", admin_only: true },
    NavItem { label: "Cadastros", path: "/cadastros", icon: "customers", admin_only: false },
    NavItem { label: "Produtos", path: "/produtos", icon: "products", admin_only: false },
    NavItem { label: "Embalagens", path: "/embalagens", icon: "inventory", admin_only: false },
    NavItem { label: "Estoque", path: "/estoque", icon: "inventory", admin_only: false },
    NavItem { label: "Financeiro", path: "/contas", icon: "orders", admin_only: false },
    NavItem { label: "Fiscal", path: "/tributacoes", icon: "orders", admin_only: false },
];

#[component]
fn Sidebar() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let is_admin = move || {
        session
            .claims()
            .and_then(|c| c.role)
            .map(|r| r == "admin")
            .unwrap_or(false)
    };

    let handle_logout = move |_| {
        session.logout();
        navigate("/login", Default::default());
    };

    view! {
        <aside class="sidebar">
            <div class="sidebar__brand">"Console ERP"</div>
            <nav class="sidebar__nav">
                {NAV_ITEMS
                    .iter()
                    .map(|item| {
                        let hidden = item.admin_only;
                        view! {
                            <Show when=move || !hidden || is_admin()>
                                <A href=item.path attr:class="sidebar__link">
                                    {icon(item.icon)}
                                    <span>{item.label}</span>
                                </A>
                            </Show>
                        }
                    })
                    .collect_view()}

                <div class="sidebar__group">
                    <A href="/pedidos" attr:class="sidebar__link">
                        {icon("orders")}
                        <span>"Pedidos"</span>
                    </A>
                    <div class="sidebar__sublinks">
                        {ORDER_STATUSES
                            .iter()
                            .map(|status| {
                                view! {
                                    <A
                                        href=format!("/pedidos/{}", status)
                                        attr:class="sidebar__sublink"
                                    >
                                        {*status}
                                    </A>
                                }
                            })
                            .collect_view()}
                        <A href="/pedidos" attr:class="sidebar__sublink">"Histórico"</A>
                    </div>
                </div>
            </nav>
            <div class="sidebar__footer">
                <span class="sidebar__user">
                    {move || session.claims().map(|c| c.username()).unwrap_or_default()}
                </span>
                <button class="sidebar__logout" on:click=handle_logout>
                    {icon("logout")}
                    "Sair"
                </button>
            </div>
        </aside>
    }
}

/// Authenticated page frame: sidebar plus content area. Redirects to the
/// login view whenever the session token disappears.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    Effect::new(move |_| {
        if !session.is_authenticated() {
            navigate("/login", Default::default());
        }
    });

    view! {
        <div class="shell">
            <Sidebar />
            <main class="shell__content">{children()}</main>
        </div>
    }
}
