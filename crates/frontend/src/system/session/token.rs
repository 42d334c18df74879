//! Client-side JWT payload inspection. Only reads the claims the UI needs;
//! signature verification stays on the backend.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<f64>,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        match self.exp {
            Some(exp) => exp * 1000.0 < js_sys::Date::now(),
            None => false,
        }
    }

    pub fn username(&self) -> String {
        self.sub.clone().unwrap_or_else(|| "usuário".to_string())
    }
}

/// Decodes the payload segment of a JWT. Returns `None` for anything that is
/// not a well-formed token.
pub fn decode(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    // base64url to standard base64, padded for atob
    let mut standard = payload.replace('-', "+").replace('_', "/");
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    let json = web_sys::window()?.atob(&standard).ok()?;
    serde_json::from_str(&json).ok()
}
