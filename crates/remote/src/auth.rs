//! Auth session client for the hosted backend.
//!
//! The sync core does not implement auth; it only reacts to session
//! presence. This client wraps the sign-up/sign-in/sign-out endpoints and
//! broadcasts session changes over a watch channel so consumers (the table
//! client, screens) can react without polling.

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;

use wayfarer_core::{Error, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Authenticated user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Active session: the bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Receiver half of session-change notifications.
pub type SessionWatcher = watch::Receiver<Option<Session>>;

/// Error body shape returned by the auth endpoints.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(alias = "error_description", alias = "msg")]
    message: String,
}

/// Client for the hosted auth endpoints.
#[derive(Debug)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    sessions: watch::Sender<Option<Session>>,
}

impl AuthClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {}", e)))?;
        let (sessions, _) = watch::channel(None);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            sessions,
        })
    }

    /// Subscribe to session changes. The current value is observable
    /// immediately; `None` means signed out.
    pub fn subscribe(&self) -> SessionWatcher {
        self.sessions.subscribe()
    }

    /// The current session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.sessions.borrow().clone()
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::network("invalid API key format"))?;
        headers.insert("apikey", api_key);
        Ok(headers)
    }

    async fn parse_session(response: reqwest::Response) -> Result<Session> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<AuthErrorBody>(&body) {
                return Err(Error::remote(status.as_u16(), error.message));
            }
            return Err(Error::remote(
                status.as_u16(),
                format!("auth request failed: {}", body),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::remote(status.as_u16(), format!("failed to parse session: {}", e)))
    }

    /// Register a new account and start its session.
    ///
    /// POST /auth/v1/signup
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        let session = Self::parse_session(response).await?;
        debug!("signed up user {}", session.user.id);
        let _ = self.sessions.send(Some(session.clone()));
        Ok(session)
    }

    /// Exchange credentials for a session.
    ///
    /// POST /auth/v1/token?grant_type=password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        let session = Self::parse_session(response).await?;
        debug!("signed in user {}", session.user.id);
        let _ = self.sessions.send(Some(session.clone()));
        Ok(session)
    }

    /// Revoke the current session. The local session is cleared even when
    /// the revocation request fails; the token will expire server-side.
    ///
    /// POST /auth/v1/logout
    pub async fn sign_out(&self) -> Result<()> {
        let token = self.current_session().map(|s| s.access_token);
        let _ = self.sessions.send(None);

        let Some(token) = token else {
            return Ok(());
        };

        let url = format!("{}/auth/v1/logout", self.base_url);
        let mut headers = self.headers()?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::network("invalid access token format"))?;
        headers.insert(AUTHORIZATION, bearer);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!("sign-out revocation returned {}", status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::start_mock_server;
    use serde_json::json;

    fn session_body() -> String {
        json!({
            "access_token": "jwt-token",
            "refresh_token": "refresh-token",
            "user": { "id": "user-1", "email": "traveler@example.com" }
        })
        .to_string()
    }

    #[tokio::test]
    async fn sign_in_stores_session_and_notifies_watchers() {
        let (base_url, requests, server) =
            start_mock_server(vec![(200, session_body())]).await;

        let auth = AuthClient::new(&base_url, "anon-key").expect("client");
        let watcher = auth.subscribe();
        assert!(watcher.borrow().is_none());

        let session = auth
            .sign_in("traveler@example.com", "hunter2")
            .await
            .expect("sign in");
        assert_eq!(session.user.id, "user-1");
        assert_eq!(
            watcher.borrow().as_ref().map(|s| s.access_token.clone()),
            Some("jwt-token".to_string())
        );

        let captured = requests.lock().await;
        assert!(captured[0].path.contains("grant_type=password"));

        server.abort();
    }

    #[tokio::test]
    async fn bad_credentials_surface_the_backend_message() {
        let (base_url, _requests, server) = start_mock_server(vec![(
            400,
            json!({"error_description": "Invalid login credentials"}).to_string(),
        )])
        .await;

        let auth = AuthClient::new(&base_url, "anon-key").expect("client");
        let result = auth.sign_in("traveler@example.com", "wrong").await;

        match result {
            Err(Error::Remote { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.contains("Invalid login credentials"));
            }
            other => panic!("expected remote rejection, got {:?}", other),
        }
        assert!(auth.current_session().is_none());

        server.abort();
    }

    #[tokio::test]
    async fn sign_out_clears_session_even_if_revocation_fails() {
        let (base_url, _requests, server) =
            start_mock_server(vec![(200, session_body()), (500, String::new())]).await;

        let auth = AuthClient::new(&base_url, "anon-key").expect("client");
        auth.sign_in("traveler@example.com", "hunter2")
            .await
            .expect("sign in");
        assert!(auth.current_session().is_some());

        auth.sign_out().await.expect("sign out");
        assert!(auth.current_session().is_none());

        server.abort();
    }
}
