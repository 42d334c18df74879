use leptos::prelude::*;

use super::{storage, token};
use super::token::Claims;

/// Authenticated session, provided once at the app root. The API layer
/// receives it explicitly; there is no global token.
#[derive(Clone, Copy)]
pub struct Session {
    token: RwSignal<Option<String>>,
    claims: RwSignal<Option<Claims>>,
}

impl Session {
    /// Restores a persisted session. Expired or undecodable tokens are
    /// dropped from storage.
    pub fn restore() -> Self {
        let mut stored = storage::get_token();
        let mut claims = None;
        if let Some(t) = &stored {
            match token::decode(t) {
                Some(c) if !c.is_expired() => claims = Some(c),
                _ => {
                    storage::clear_token();
                    stored = None;
                }
            }
        }
        Self {
            token: RwSignal::new(stored),
            claims: RwSignal::new(claims),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }

    pub fn claims(&self) -> Option<Claims> {
        self.claims.get()
    }

    /// Accepts a freshly issued token, persisting it for the next visit.
    pub fn establish(&self, access_token: String) -> Result<(), String> {
        let claims = token::decode(&access_token)
            .filter(|c| !c.is_expired())
            .ok_or_else(|| "Token inválido recebido do servidor.".to_string())?;
        storage::save_token(&access_token);
        self.claims.set(Some(claims));
        self.token.set(Some(access_token));
        Ok(())
    }

    pub fn logout(&self) {
        storage::clear_token();
        self.token.set(None);
        self.claims.set(None);
    }

    /// Any 401 lands here: drop the session and hard-redirect to the login
    /// view, whatever screen was active.
    pub fn expire(&self) {
        self.logout();
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/login");
        }
    }
}

pub fn use_session() -> Session {
    use_context::<Session>().expect("Session not found in context")
}
