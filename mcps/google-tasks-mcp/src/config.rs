//! Configuration loading for google-tasks-mcp
//!
//! Settings are resolved from, highest priority first:
//! 1. Command-line flags
//! 2. Environment variables (GOOGLE_OAUTH_CREDENTIALS, GOOGLE_TOKEN_FILE, TIMEZONE)
//! 3. TOML file at $GOOGLE_TASKS_CONFIG_PATH or <config_dir>/google-tasks-mcp/config.toml
//! 4. Default values

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::google::DEFAULT_BASE_URL;
use crate::due::DisplayZone;

/// File name of the token stored next to the credentials
pub const DEFAULT_TOKEN_FILE_NAME: &str = "tasks-token.json";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "google-tasks-mcp")]
#[command(about = "MCP server exposing Google Tasks as tools over stdio")]
#[command(version)]
pub struct Cli {
    /// Print the OAuth consent URL and exit
    #[arg(long)]
    pub auth: bool,

    /// Exchange an authorization code for a token, save it and exit
    #[arg(long, value_name = "CODE")]
    pub token: Option<String>,

    /// OAuth client-secret JSON downloaded from Google Cloud
    #[arg(long, env = "GOOGLE_OAUTH_CREDENTIALS", value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Token file (default: tasks-token.json next to the credentials)
    #[arg(long, env = "GOOGLE_TOKEN_FILE", value_name = "PATH")]
    pub token_file: Option<PathBuf>,

    /// Zone for due dates: UTC, an IANA name or a fixed offset like +04:00
    #[arg(long, env = "TIMEZONE", value_name = "ZONE")]
    pub timezone: Option<String>,
}

/// Contents of the optional config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Client-secret JSON path
    pub credentials: Option<PathBuf>,
    /// Token file path
    pub token_file: Option<PathBuf>,
    /// Tasks API root, for proxies and testing
    pub api_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub timezone: Option<String>,
}

/// Fully resolved settings the server runs with
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: PathBuf,
    pub token_file: PathBuf,
    pub zone: DisplayZone,
    pub api_base_url: String,
}

impl Config {
    /// Load the config file if one exists, otherwise defaults
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                tracing::debug!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("unable to parse config file {}", path.display()))
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("GOOGLE_TASKS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("google-tasks-mcp").join("config.toml"))
    }

    /// Merge the file with CLI/env values and apply defaults
    pub fn resolve(self, cli: &Cli) -> Result<Settings> {
        let credentials = match cli.credentials.clone().or(self.google.credentials) {
            Some(path) => path,
            None => bail!(
                "GOOGLE_OAUTH_CREDENTIALS is required (path to the OAuth client-secret JSON)"
            ),
        };

        let token_file = cli
            .token_file
            .clone()
            .or(self.google.token_file)
            .unwrap_or_else(|| default_token_file(&credentials));

        let zone = match cli.timezone.as_deref().or(self.display.timezone.as_deref()) {
            Some(name) => name
                .parse::<DisplayZone>()
                .with_context(|| format!("invalid TIMEZONE {:?}", name))?,
            None => DisplayZone::Utc,
        };

        let api_base_url = self
            .google
            .api_base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Settings {
            credentials,
            token_file,
            zone,
            api_base_url,
        })
    }
}

fn default_token_file(credentials: &Path) -> PathBuf {
    credentials
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_TOKEN_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli_with_credentials(path: &str) -> Cli {
        Cli {
            credentials: Some(PathBuf::from(path)),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_from_credentials_path() {
        let settings = Config::default()
            .resolve(&cli_with_credentials("/secrets/client.json"))
            .unwrap();

        assert_eq!(settings.token_file, PathBuf::from("/secrets/tasks-token.json"));
        assert_eq!(settings.zone, DisplayZone::Utc);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_bare_credentials_file_name() {
        let settings = Config::default()
            .resolve(&cli_with_credentials("client.json"))
            .unwrap();
        assert_eq!(settings.token_file, PathBuf::from("tasks-token.json"));
    }

    #[test]
    fn test_missing_credentials_is_an_error() {
        let err = Config::default().resolve(&Cli::default()).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_OAUTH_CREDENTIALS"));
    }

    #[test]
    fn test_invalid_timezone_is_an_error() {
        let mut cli = cli_with_credentials("/secrets/client.json");
        cli.timezone = Some("Mars/Olympus_Mons".to_string());
        assert!(Config::default().resolve(&cli).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[google]
credentials = "/from/file/client.json"
token_file = "/from/file/token.json"
api_base_url = "http://localhost:9000/tasks/v1"

[display]
timezone = "Asia/Tbilisi"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        let from_file = config.clone().resolve(&Cli::default()).unwrap();
        assert_eq!(from_file.credentials, PathBuf::from("/from/file/client.json"));
        assert_eq!(from_file.token_file, PathBuf::from("/from/file/token.json"));
        assert_eq!(from_file.zone.to_string(), "Asia/Tbilisi");
        assert_eq!(from_file.api_base_url, "http://localhost:9000/tasks/v1");

        let cli = Cli {
            credentials: Some(PathBuf::from("/from/cli/client.json")),
            timezone: Some("+04:00".to_string()),
            ..Default::default()
        };
        let overridden = config.resolve(&cli).unwrap();
        assert_eq!(overridden.credentials, PathBuf::from("/from/cli/client.json"));
        assert_eq!(overridden.token_file, PathBuf::from("/from/file/token.json"));
        assert_eq!(overridden.zone.to_string(), "+04:00");
    }

    #[test]
    fn test_cli_flags_parse() {
        let cli = Cli::try_parse_from(["google-tasks-mcp", "--token", "4/abc", "--timezone", "UTC"])
            .unwrap();
        assert_eq!(cli.token.as_deref(), Some("4/abc"));
        assert!(!cli.auth);
    }
}
