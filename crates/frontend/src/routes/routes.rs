use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::dashboard::DashboardPage;
use crate::generic::form::GenericForm;
use crate::generic::list::GenericList;
use crate::layout::Shell;
use crate::system::pages::login::LoginPage;

// Static segments ("new", "edit") outrank the :status parameter, so
// /pedidos/new opens the form while /pedidos/Aprovação filters the list.
#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Routes fallback=|| view! { <Redirect path="/login" /> }>
                <Route path=path!("/login") view=LoginPage />
                <Route path=path!("/") view=|| view! { <Redirect path="/dashboard" /> } />
                <Route
                    path=path!("/dashboard")
                    view=|| view! { <Shell><DashboardPage /></Shell> }
                />
                <Route
                    path=path!("/:model")
                    view=|| view! { <Shell><GenericList /></Shell> }
                />
                <Route
                    path=path!("/:model/new")
                    view=|| view! { <Shell><GenericForm /></Shell> }
                />
                <Route
                    path=path!("/:model/edit/:id")
                    view=|| view! { <Shell><GenericForm /></Shell> }
                />
                <Route
                    path=path!("/:model/:status")
                    view=|| view! { <Shell><GenericList /></Shell> }
                />
            </Routes>
        </Router>
    }
}
