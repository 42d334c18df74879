use gloo_net::http::Request;
use serde::Deserialize;

use crate::shared::api::client::api_url;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges credentials for a bearer token. The endpoint takes a
/// form-encoded body, not JSON.
pub async fn login(username: &str, password: &str) -> Result<String, String> {
    let body = format!(
        "username={}&password={}",
        urlencoding::encode(username),
        urlencoding::encode(password)
    );

    let response = Request::post(&api_url("/login/token"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if response.status() == 401 {
        return Err("Usuário ou senha inválidos.".to_string());
    }
    if !response.ok() {
        return Err(format!("Login failed: {}", response.status()));
    }

    response
        .json::<TokenResponse>()
        .await
        .map(|r| r.access_token)
        .map_err(|e| format!("Failed to parse response: {}", e))
}
