//! OAuth2 credentials for the Google Tasks API
//!
//! - [`ClientSecret`]: the client-secret JSON downloaded from Google Cloud
//! - [`TokenStore`]: the persisted token file (mode 0600 on Unix)
//! - [`OAuthClient`]: consent URL, code exchange and refresh
//! - [`Credentials`]: a stored token kept fresh for the backend

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Scope granting read/write access to the user's tasks
pub const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";

/// Out-of-band redirect: the user pastes the code back by hand
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed early
const EXPIRY_SKEW_SECONDS: i64 = 10;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("unable to read credentials file {path}: {source}")]
    ReadCredentials {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse credentials: {0}")]
    InvalidCredentials(String),

    #[error("token not found at {path}, run with --auth first: {source}")]
    MissingToken {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse token file {path}: {source}")]
    InvalidToken {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unable to save token to {path}: {source}")]
    SaveToken {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid auth URI: {0}")]
    InvalidAuthUri(#[from] url::ParseError),

    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {message}")]
    TokenEndpoint { status: u16, message: String },

    #[error("token expired and no refresh token is available, run with --auth again")]
    NoRefreshToken,
}

// ============================================================================
// Client secret
// ============================================================================

/// OAuth client registration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Google wraps the registration in an `installed` or `web` section
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let content = fs::read_to_string(path).map_err(|source| AuthError::ReadCredentials {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AuthError> {
        let file: CredentialsFile = serde_json::from_str(content)
            .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;

        file.installed.or(file.web).ok_or_else(|| {
            AuthError::InvalidCredentials(
                "expected an \"installed\" or \"web\" client section".to_string(),
            )
        })
    }
}

// ============================================================================
// Token and token store
// ============================================================================

/// Persisted OAuth token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Whether the token can be used at `now` without refreshing
    ///
    /// A missing expiry, or the year-1 placeholder some tools write, means
    /// the token does not expire.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expiry {
            None => true,
            Some(expiry) if expiry.year() <= 1 => true,
            Some(expiry) => expiry - Duration::seconds(EXPIRY_SKEW_SECONDS) > now,
        }
    }
}

/// Token file on disk
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Token, AuthError> {
        let content = fs::read_to_string(&self.path).map_err(|source| AuthError::MissingToken {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| AuthError::InvalidToken {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, token: &Token) -> Result<(), AuthError> {
        let save_err = |source| AuthError::SaveToken {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string(token)
            .map_err(|e| save_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path).map_err(save_err)?;
        file.write_all(json.as_bytes()).map_err(save_err)?;
        file.write_all(b"\n").map_err(save_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(save_err)?;
        }

        Ok(())
    }
}

// ============================================================================
// OAuth client
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Talks to Google's OAuth endpoints for one client registration
#[derive(Debug, Clone)]
pub struct OAuthClient {
    secret: ClientSecret,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(secret: ClientSecret) -> Self {
        Self::with_http(secret, reqwest::Client::new())
    }

    pub fn with_http(secret: ClientSecret, http: reqwest::Client) -> Self {
        Self { secret, http }
    }

    /// Consent URL for manual, headless authorization
    pub fn auth_url(&self) -> Result<String, AuthError> {
        let url = url::Url::parse_with_params(
            &self.secret.auth_uri,
            &[
                ("access_type", "offline"),
                ("client_id", self.secret.client_id.as_str()),
                ("prompt", "consent"),
                ("redirect_uri", OOB_REDIRECT_URI),
                ("response_type", "code"),
                ("scope", TASKS_SCOPE),
                ("state", "state-token"),
            ],
        )?;
        Ok(url.to_string())
    }

    /// Trade an authorization code for a token
    pub async fn exchange_code(&self, code: &str) -> Result<Token, AuthError> {
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", OOB_REDIRECT_URI),
                ("client_id", &self.secret.client_id),
                ("client_secret", &self.secret.client_secret),
            ])
            .await?;

        Ok(into_token(response, None))
    }

    /// Obtain a new access token; the refresh token is kept unless the
    /// endpoint issues a new one
    pub async fn refresh(&self, token: &Token) -> Result<Token, AuthError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NoRefreshToken)?;

        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", &self.secret.client_id),
                ("client_secret", &self.secret.client_secret),
            ])
            .await?;

        Ok(into_token(response, Some(refresh_token)))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(&self.secret.token_uri)
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(AuthError::TokenEndpoint { status, message });
        }

        Ok(response.json().await?)
    }
}

fn into_token(response: TokenResponse, previous_refresh: Option<&str>) -> Token {
    Token {
        access_token: response.access_token,
        token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
        refresh_token: response
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string)),
        expiry: response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs)),
    }
}

// ============================================================================
// Bearer credential for the backend
// ============================================================================

/// Supplies a currently-valid bearer token before each backend request
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// A fixed token, for tests and pre-authorized environments
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

/// Stored token that refreshes itself and writes refreshed tokens back
pub struct Credentials {
    oauth: OAuthClient,
    store: TokenStore,
    token: Mutex<Token>,
}

impl Credentials {
    /// Read the stored token and make sure it is usable right now
    ///
    /// Fails if the token file is missing or the refresh is rejected. A
    /// refreshed token that cannot be written back only logs a warning.
    pub async fn load(oauth: OAuthClient, store: TokenStore) -> Result<Self, AuthError> {
        let mut token = store.load()?;
        refresh_if_needed(&oauth, &store, &mut token).await?;

        Ok(Self {
            oauth,
            store,
            token: Mutex::new(token),
        })
    }
}

#[async_trait]
impl TokenSource for Credentials {
    async fn access_token(&self) -> Result<String, AuthError> {
        let mut token = self.token.lock().await;
        refresh_if_needed(&self.oauth, &self.store, &mut token).await?;
        Ok(token.access_token.clone())
    }
}

async fn refresh_if_needed(
    oauth: &OAuthClient,
    store: &TokenStore,
    token: &mut Token,
) -> Result<(), AuthError> {
    if token.is_valid_at(Utc::now()) {
        return Ok(());
    }

    info!("Access token expired, refreshing");
    let refreshed = oauth.refresh(token).await?;

    if refreshed.access_token != token.access_token {
        if let Err(e) = store.save(&refreshed) {
            warn!("Failed to save refreshed token: {}", e);
        }
    }

    *token = refreshed;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CREDENTIALS_JSON: &str = r#"{
        "installed": {
            "client_id": "client-123.apps.googleusercontent.com",
            "client_secret": "shh",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "redirect_uris": ["http://localhost"]
        }
    }"#;

    fn secret_for(server: &MockServer) -> ClientSecret {
        ClientSecret {
            client_id: "client-123".to_string(),
            client_secret: "shh".to_string(),
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: format!("{}/token", server.uri()),
        }
    }

    fn expired_token() -> Token {
        Token {
            access_token: "stale".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: Some("refresh-456".to_string()),
            expiry: Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_parse_installed_credentials() {
        let secret = ClientSecret::from_json(CREDENTIALS_JSON).unwrap();
        assert_eq!(secret.client_id, "client-123.apps.googleusercontent.com");
        assert_eq!(secret.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_parse_web_credentials_with_defaults() {
        let secret =
            ClientSecret::from_json(r#"{"web": {"client_id": "w", "client_secret": "s"}}"#).unwrap();
        assert_eq!(secret.client_id, "w");
        assert_eq!(secret.auth_uri, DEFAULT_AUTH_URI);
    }

    #[test]
    fn test_credentials_without_client_section() {
        let err = ClientSecret::from_json(r#"{"other": {}}"#).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
    }

    #[test]
    fn test_auth_url_contains_offline_consent() {
        let secret = ClientSecret::from_json(CREDENTIALS_JSON).unwrap();
        let url = OAuthClient::new(secret).auth_url().unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=urn%3Aietf%3Awg%3Aoauth%3A2.0%3Aoob"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Ftasks"));
    }

    #[test]
    fn test_save_and_read_token() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        let token = Token {
            access_token: "access-123".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: Some("refresh-456".to_string()),
            expiry: Some(Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap()),
        };

        store.save(&token).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        assert_eq!(store.load().unwrap(), token);
    }

    #[test]
    fn test_read_token_written_by_other_tools() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.json");
        fs::write(
            &path,
            r#"{"access_token":"a","token_type":"Bearer","refresh_token":"r","expiry":"0001-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let token = TokenStore::new(&path).load().unwrap();
        assert!(token.is_valid_at(Utc::now()));
    }

    #[test]
    fn test_missing_token_file() {
        let err = TokenStore::new("/nonexistent/path/token.json")
            .load()
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingToken { .. }));
        assert!(err.to_string().contains("--auth"));
    }

    #[test]
    fn test_token_validity_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut token = expired_token();

        token.expiry = Some(now + Duration::minutes(5));
        assert!(token.is_valid_at(now));

        token.expiry = Some(now + Duration::seconds(5));
        assert!(!token.is_valid_at(now));

        token.expiry = None;
        assert!(token.is_valid_at(now));

        token.access_token.clear();
        assert!(!token.is_valid_at(now));
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .mount(&server)
            .await;

        let oauth = OAuthClient::new(secret_for(&server));
        let refreshed = oauth.refresh(&expired_token()).await.unwrap();

        assert_eq!(refreshed.access_token, "fresh");
        assert_eq!(refreshed.refresh_token.as_deref(), Some("refresh-456"));
        assert!(refreshed.is_valid_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_refresh_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })))
            .mount(&server)
            .await;

        let oauth = OAuthClient::new(secret_for(&server));
        let err = oauth.refresh(&expired_token()).await.unwrap_err();

        match err {
            AuthError::TokenEndpoint { status, message } => {
                assert_eq!(status, 400);
                assert!(message.starts_with("invalid_grant"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token() {
        let server = MockServer::start().await;
        let mut token = expired_token();
        token.refresh_token = None;

        let err = OAuthClient::new(secret_for(&server))
            .refresh(&token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NoRefreshToken));
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=4%2Fabc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "first",
                "refresh_token": "long-lived",
                "expires_in": 3599
            })))
            .mount(&server)
            .await;

        let token = OAuthClient::new(secret_for(&server))
            .exchange_code("4/abc")
            .await
            .unwrap();

        assert_eq!(token.access_token, "first");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.refresh_token.as_deref(), Some("long-lived"));
    }

    #[tokio::test]
    async fn test_credentials_refresh_and_persist_at_startup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("tasks-token.json"));
        store.save(&expired_token()).unwrap();

        let credentials = Credentials::load(OAuthClient::new(secret_for(&server)), store.clone())
            .await
            .unwrap();

        assert_eq!(credentials.access_token().await.unwrap(), "fresh");
        assert_eq!(store.load().unwrap().access_token, "fresh");
    }
}
