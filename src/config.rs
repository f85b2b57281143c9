//! Case bot configuration.
//!
//! Loaded from `~/.casebot/config.toml`. Every key is optional; a missing
//! file means all defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_ENDPOINT: &str =
    "https://webto.salesforce.com/servlet/servlet.WebToCase?encoding=UTF-8&orgId=00DgL00000MPwfJ";
const DEFAULT_ORG_ID: &str = "00DgL00000MPwfJ";
const DEFAULT_RETURN_URL: &str = "https://auraqubesconsulting.com/";

/// Case bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Name the bot introduces itself with and signs cases with.
    pub assistant_name: String,

    /// Default page id when neither `--page` nor `CASEBOT_PAGE` is set.
    pub page: Option<String>,

    /// Pause before each bot message is revealed.
    pub typing_delay_ms: u64,

    /// Where per-session draft directories live.
    /// Defaults to `~/.casebot/sessions`.
    pub sessions_dir: Option<PathBuf>,

    pub bridge: BridgeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant_name: "AuraVoice".to_string(),
            page: None,
            typing_delay_ms: 360,
            sessions_dir: None,
            bridge: BridgeConfig::default(),
        }
    }
}

/// Where submitted cases go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BridgeConfig {
    pub mode: BridgeMode,

    /// Web-to-Case servlet URL.
    pub endpoint: String,

    pub org_id: String,

    /// Page the CRM redirects to after accepting a case.
    pub return_url: String,

    /// Directory for outbox submissions.
    /// Defaults to `~/.casebot/outbox`.
    pub outbox_dir: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mode: BridgeMode::Post,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            org_id: DEFAULT_ORG_ID.to_string(),
            return_url: DEFAULT_RETURN_URL.to_string(),
            outbox_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeMode {
    /// Form-post the case to the endpoint.
    #[default]
    Post,

    /// Write the case to a local outbox directory instead.
    Outbox,
}

impl Config {
    /// Load config from `~/.casebot/config.toml`.
    /// Returns defaults if the file is missing, an error if it is invalid.
    pub fn load() -> Result<Self, String> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };

        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// Parse config from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// The config file path: `~/.casebot/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::home().map(|h| h.join("config.toml"))
    }

    /// Sessions root: configured, else `~/.casebot/sessions`.
    pub fn sessions_dir(&self) -> Option<PathBuf> {
        self.sessions_dir
            .clone()
            .or_else(|| Self::home().map(|h| h.join("sessions")))
    }

    /// Outbox directory: configured, else `~/.casebot/outbox`.
    pub fn outbox_dir(&self) -> Option<PathBuf> {
        self.bridge
            .outbox_dir
            .clone()
            .or_else(|| Self::home().map(|h| h.join("outbox")))
    }

    fn home() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".casebot"))
    }
}
