//! SponsorsClub API client implementation
//!
//! Every protected request goes through [`SponsorsClubClient::call`], which
//! attaches the bearer token, refreshes once on a 401, retries once, and
//! tears the session down when that is not enough.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{AbortRegistration, Abortable};
use log::{debug, info, warn};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use super::models::{LoginRequest, RefreshResponse, TokenPair};
use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_WEB_URL, LOGIN_PATH};
use crate::error::{ApiError, Result};
use crate::session::{MemorySessionStore, Navigator, Session, SessionStore, TerminalNavigator};

/// Token refresh endpoint
pub const REFRESH_PATH: &str = "/api/auth/refresh/";

/// Login endpoint
pub const LOGIN_ENDPOINT: &str = "/api/auth/login/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body fields checked, in order, for a human-readable error
const ERROR_FIELDS: [&str; 3] = ["message", "detail", "error"];

/// Builder for [`SponsorsClubClient`]
pub struct ClientBuilder {
    base_url: String,
    login_location: String,
    timeout: Duration,
    session: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            login_location: format!("{}{}?origin=logout", DEFAULT_WEB_URL, LOGIN_PATH),
            timeout: DEFAULT_TIMEOUT,
            session: None,
            navigator: None,
        }
    }
}

impl ClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Where session teardown navigates to
    pub fn login_location(mut self, location: impl Into<String>) -> Self {
        self.login_location = location.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session = Some(store);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> Result<SponsorsClubClient> {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(SponsorsClubClient {
            http,
            base_url: self.base_url,
            login_location: self.login_location,
            session: self
                .session
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            navigator: self
                .navigator
                .unwrap_or_else(|| Arc::new(TerminalNavigator)),
            refresh_guard: Mutex::new(()),
        })
    }
}

/// Authenticated SponsorsClub API client
///
/// Holds no token of its own: the session store is read before every request,
/// so a refresh or a logout is visible to the next call immediately.
pub struct SponsorsClubClient {
    http: HttpClient,
    base_url: String,
    login_location: String,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    // Single-flight guard for refreshes triggered by a 401.
    refresh_guard: Mutex<()>,
}

impl SponsorsClubClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform an authenticated request and return the decoded JSON body.
    ///
    /// An empty success body is returned as `Value::Null`.
    ///
    /// # Errors
    /// - `Unauthenticated` when there is no session; nothing is sent.
    /// - `AuthExpired` when the retry after a refresh is still rejected; the
    ///   session is torn down first.
    /// - `RefreshFailed` when the refresh itself fails; the session is torn down first.
    /// - `Status` for any other non-2xx response, `Network` for transport failures.
    pub async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let session = self.session.load()?.ok_or(ApiError::Unauthenticated)?;
        let token = session.access_token;

        let response = self.send(&method, path, body, Some(&token)).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return read_body(response).await;
        }

        debug!("{} {} rejected with 401, refreshing access token", method, path);
        let fresh = match self.refresh_after(&token).await {
            Ok(fresh) => fresh,
            Err(err) => {
                if matches!(err.as_api(), Some(ApiError::RefreshFailed)) {
                    self.end_session();
                }
                return Err(err);
            }
        };

        let retry = self.send(&method, path, body, Some(&fresh)).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            info!("{} {} still rejected after refresh, ending session", method, path);
            self.end_session();
            return Err(ApiError::AuthExpired.into());
        }

        read_body(retry).await
    }

    /// Like [`call`](Self::call), decoding the body into `T`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let value = self.call(method, path, body).await?;
        decode(value)
    }

    /// Like [`call`](Self::call), cancellable through the matching `AbortHandle`.
    ///
    /// An aborted call returns `Cancelled` and sends nothing further.
    pub async fn call_abortable(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        registration: AbortRegistration,
    ) -> Result<Value> {
        match Abortable::new(self.call(method, path, body), registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                debug!("Call to {} aborted", path);
                Err(ApiError::Cancelled.into())
            }
        }
    }

    /// Request without refresh handling.
    ///
    /// With `with_bearer`, the stored access token is attached when one exists.
    pub async fn public_call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        with_bearer: bool,
    ) -> Result<Value> {
        let token = if with_bearer {
            self.session.access_token()?
        } else {
            None
        };
        let response = self.send(&method, path, body, token.as_deref()).await?;
        read_body(response).await
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Stores the new token before returning it. Does not clear anything on failure.
    pub async fn refresh(&self) -> Result<String> {
        let _guard = self.refresh_guard.lock().await;
        self.refresh_locked().await
    }

    /// Refresh on behalf of a request rejected while using `stale`.
    async fn refresh_after(&self, stale: &str) -> Result<String> {
        let _guard = self.refresh_guard.lock().await;

        // Another call may have refreshed while this one waited for the guard.
        if let Some(session) = self.session.load()? {
            if session.access_token != stale {
                debug!("Access token already refreshed by a concurrent call");
                return Ok(session.access_token);
            }
        }

        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<String> {
        let Some(refresh_token) = self.session.refresh_token()? else {
            debug!("No refresh token stored, cannot refresh");
            return Err(ApiError::RefreshFailed.into());
        };

        info!("Refreshing access token");
        let body = serde_json::json!({ "refresh": refresh_token });
        let response = match self.send(&Method::POST, REFRESH_PATH, Some(&body), None).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                return Err(ApiError::RefreshFailed.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Token refresh rejected with status {}", status);
            return Err(ApiError::RefreshFailed.into());
        }

        let refreshed: RefreshResponse = response.json().await.map_err(|e| {
            warn!("Token refresh returned an unreadable body: {}", e);
            ApiError::RefreshFailed
        })?;

        match refreshed.refresh {
            Some(rotated) => self
                .session
                .store(&Session::new(refreshed.access.clone(), rotated))?,
            None => self.session.set_access_token(&refreshed.access)?,
        }

        Ok(refreshed.access)
    }

    /// Post credentials and store the issued token pair as the new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let value = self
            .public_call(Method::POST, LOGIN_ENDPOINT, Some(&body), false)
            .await?;
        let tokens: TokenPair = decode(value)?;

        self.session
            .store(&Session::new(tokens.access, tokens.refresh))?;
        info!("Signed in as {}", email);
        Ok(())
    }

    /// Clear both tokens and navigate to the login entry point.
    ///
    /// Idempotent; the navigation happens even if clearing storage fails.
    pub fn logout(&self) -> Result<()> {
        let cleared = self.session.clear();
        if let Err(ref e) = cleared {
            warn!("Failed to clear session storage: {}", e);
        }
        self.navigator.navigate(&self.login_location);
        cleared
    }

    /// Logout on an auth failure path. `logout` already logs a storage error,
    /// and the auth error is what the caller gets back.
    fn end_session(&self) {
        let _ = self.logout();
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> std::result::Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        debug!("{} {} -> {}", method, path, response.status());
        Ok(response)
    }
}

/// Decode a JSON value into a model.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
    })
}

/// Turn a response into its JSON body or an `ApiError::Status`.
async fn read_body(response: Response) -> Result<Value> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(ApiError::from)?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&bytes, status),
        }
        .into());
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
    })
}

/// Pull a readable message out of an error body.
///
/// Looks at `message`, `detail` and `error`, then DRF's `non_field_errors`,
/// then the first field error. Falls back to a generic message.
pub(crate) fn error_message(body: &[u8], status: StatusCode) -> String {
    let fallback = || match status.canonical_reason() {
        Some(reason) => format!("Request failed with status {} {}", status.as_u16(), reason),
        None => format!("Request failed with status {}", status.as_u16()),
    };

    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return fallback();
    };

    let first_text = |v: &Value| -> Option<String> {
        match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => items.iter().find_map(|i| i.as_str()).map(str::to_string),
            _ => None,
        }
    };

    match &value {
        Value::String(s) if !s.trim().is_empty() => s.clone(),
        Value::Object(map) => ERROR_FIELDS
            .iter()
            .chain(std::iter::once(&"non_field_errors"))
            .find_map(|key| map.get(*key).and_then(first_text))
            .or_else(|| {
                map.iter()
                    .find_map(|(field, v)| first_text(v).map(|msg| format!("{}: {}", field, msg)))
            })
            .unwrap_or_else(fallback),
        _ => fallback(),
    }
}
