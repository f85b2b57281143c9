//! Form bridge: hands a finished case to the CRM.
//!
//! Submission is one-way. The post bridge launches `curl` against the
//! Web-to-Case endpoint and does not wait for it; there is no
//! acknowledgement, retry or timeout. The outbox bridge writes the same
//! fields to a local JSON file instead, for dry runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::{fs, io};

use jiff::Timestamp;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::{BridgeConfig, BridgeMode};
use crate::form::CaseForm;

/// Errors that can occur while handing off a case.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to run curl: {0}")]
    Spawn(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something a finished case can be submitted to.
pub trait FormBridge {
    /// Fire-and-forget. `Ok` means the handoff started, not that the CRM accepted it.
    fn submit(&self, form: &CaseForm) -> Result<(), BridgeError>;
}

/// The Web-to-Case target: endpoint plus the hidden fields it expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebToCase {
    pub endpoint: String,
    pub org_id: String,
    pub return_url: String,
}

impl WebToCase {
    /// Every field posted for `form`, hidden fields first.
    pub fn fields(&self, form: &CaseForm) -> Vec<(&'static str, String)> {
        vec![
            ("orgid", self.org_id.clone()),
            ("retURL", self.return_url.clone()),
            ("name", form.name.clone()),
            ("email", form.email.clone()),
            ("phone", form.phone.clone()),
            ("subject", form.subject.clone()),
            ("description", form.description.clone()),
        ]
    }
}

/// The configured submission target.
#[derive(Debug, Clone)]
pub enum Bridge {
    /// Form-post to the endpoint via `curl`.
    Post(WebToCase),

    /// Write submissions to `dir` as JSON.
    Outbox { target: WebToCase, dir: PathBuf },
}

impl Bridge {
    /// Builds the bridge from config. `outbox_dir` is used when the config
    /// (or `--dry-run`) selects outbox mode.
    ///
    /// A post bridge without an org id, an endpoint or a runnable `curl`
    /// cannot submit anything, so it is refused here rather than on the
    /// first submit.
    pub fn from_config(
        config: &BridgeConfig,
        dry_run: bool,
        outbox_dir: Option<PathBuf>,
    ) -> Result<Self, String> {
        Self::build(config, dry_run, outbox_dir, program_runs)
    }

    fn build(
        config: &BridgeConfig,
        dry_run: bool,
        outbox_dir: Option<PathBuf>,
        available: impl Fn(&str) -> bool,
    ) -> Result<Self, String> {
        let target = WebToCase {
            endpoint: config.endpoint.trim().to_string(),
            org_id: config.org_id.trim().to_string(),
            return_url: config.return_url.trim().to_string(),
        };

        if dry_run || config.mode == BridgeMode::Outbox {
            let dir = outbox_dir.ok_or("could not determine outbox directory")?;
            return Ok(Self::Outbox { target, dir });
        }

        if target.org_id.is_empty() {
            return Err("Web-to-Case org id is missing (set bridge.org-id)".to_string());
        }
        if target.endpoint.is_empty() {
            return Err("Web-to-Case endpoint is missing (set bridge.endpoint)".to_string());
        }
        if !available(CURL) {
            return Err(format!("`{CURL}` is not available to post cases"));
        }
        Ok(Self::Post(target))
    }
}

const CURL: &str = "curl";

/// Whether `program --version` runs and exits successfully.
fn program_runs(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

impl FormBridge for Bridge {
    fn submit(&self, form: &CaseForm) -> Result<(), BridgeError> {
        match self {
            Self::Post(target) => post(target, form),
            Self::Outbox { target, dir } => write_outbox(target, dir, form).map(|_| ()),
        }
    }
}

/// Launch `curl` with the URL-encoded fields and let it run on its own.
fn post(target: &WebToCase, form: &CaseForm) -> Result<(), BridgeError> {
    let mut cmd = Command::new(CURL);
    cmd.args(["--silent", "--request", "POST"]);
    for (name, value) in target.fields(form) {
        cmd.arg("--data-urlencode").arg(format!("{name}={value}"));
    }
    cmd.arg(&target.endpoint)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let child = cmd.spawn().map_err(BridgeError::Spawn)?;
    info!(pid = child.id(), endpoint = %target.endpoint, "case handed to curl");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboxEntry<'a> {
    id: Uuid,
    submitted_at: Timestamp,
    endpoint: &'a str,
    fields: BTreeMap<&'static str, String>,
}

/// Write one submission as `<dir>/<uuid>.json`. Returns the file path.
fn write_outbox(target: &WebToCase, dir: &Path, form: &CaseForm) -> Result<PathBuf, BridgeError> {
    fs::create_dir_all(dir)?;
    let entry = OutboxEntry {
        id: Uuid::new_v4(),
        submitted_at: Timestamp::now(),
        endpoint: &target.endpoint,
        fields: target.fields(form).into_iter().collect(),
    };
    let path = dir.join(format!("{}.json", entry.id));
    fs::write(&path, serde_json::to_string_pretty(&entry)?)?;
    info!(path = %path.display(), "case written to outbox");
    Ok(path)
}
