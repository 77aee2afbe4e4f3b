//! Client for the authentication endpoints.
//!
//! Unlike the diagram endpoints, auth responses come back bare: a login
//! returns the token and user directly, and rejections carry a plain
//! `{ "message": ... }` body.
use log::{debug, error, info};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    AuthSession, DiaglabError, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    Result,
};

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    message: Option<String>,
}

/// HTTP client for `/auth/login` and `/auth/signup`.
pub struct AuthApi {
    base_url: String,
    client: Client,
}

impl AuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        AuthApi {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Exchanges credentials for a session.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession> {
        let url = format!("{}/auth/login", self.base_url);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_message(&body)
                .unwrap_or_else(|| format!("login failed with status {}", status));
            error!("Login rejected: {}", message);
            return Err(DiaglabError::Api { message });
        }

        let parsed: LoginResponse = serde_json::from_str(&body)?;
        info!("Signed in as {}", parsed.user.email);
        Ok(parsed.into())
    }

    /// Creates a new account. Registering does not sign the user in; a
    /// login must follow.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        let url = format!("{}/auth/signup", self.base_url);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_message(&body)
                .unwrap_or_else(|| format!("registration failed with status {}", status));
            error!("Registration rejected: {}", message);
            return Err(DiaglabError::Api { message });
        }

        let parsed: RegisterResponse = serde_json::from_str(&body)?;
        info!("Account created for {}", parsed.user.email);
        Ok(parsed)
    }
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<AuthErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
}
