//! HTTP plumbing shared by every backend call.
//!
//! All requests carry the session's bearer token; a 401 on any of them
//! expires the session and redirects to the login view.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::system::session::context::Session;

/// Base URL for the API server. The backend listens on port 8000 next to
/// wherever the app is served from.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:8000", protocol, hostname)
}

pub fn api_url(path: &str) -> String {
    format!("{}/api/v1{}", api_base(), path)
}

fn bearer(session: &Session) -> String {
    format!("Bearer {}", session.token().unwrap_or_default())
}

/// Maps 401 to a session expiry; passes every other response through for
/// the caller to inspect.
pub fn check_authorized(session: &Session, response: Response) -> Result<Response, String> {
    if response.status() == 401 {
        session.expire();
        return Err("Sessão expirada. Faça login novamente.".to_string());
    }
    Ok(response)
}

/// Authenticated GET returning the raw response.
pub async fn get(session: &Session, path: &str) -> Result<Response, String> {
    let response = Request::get(&api_url(path))
        .header("Authorization", &bearer(session))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check_authorized(session, response)
}

/// Authenticated GET decoding a JSON body.
pub async fn get_json<T: DeserializeOwned>(session: &Session, path: &str) -> Result<T, String> {
    let response = get(session, path).await?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Authenticated POST/PUT with a JSON body. Status handling is left to the
/// caller (saves distinguish 422 from other failures).
pub async fn send_json(
    session: &Session,
    method: &str,
    path: &str,
    body: &Value,
) -> Result<Response, String> {
    let builder = match method {
        "POST" => Request::post(&api_url(path)),
        "PUT" => Request::put(&api_url(path)),
        other => return Err(format!("Unsupported method: {}", other)),
    };
    let response = builder
        .header("Authorization", &bearer(session))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check_authorized(session, response)
}

/// Authenticated DELETE.
pub async fn delete(session: &Session, path: &str) -> Result<(), String> {
    let response = Request::delete(&api_url(path))
        .header("Authorization", &bearer(session))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    let response = check_authorized(session, response)?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    Ok(())
}
