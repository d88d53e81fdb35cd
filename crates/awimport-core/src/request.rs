//! Inputs for one import run.
//!
//! An [`ImportRequest`] carries everything the host pipeline hands over:
//! service settings, the previous importer step's summary, and the artifact
//! paths it produced. Service settings are only validated once the change
//! gate decides an upload is needed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::{ImportError, Result};
use crate::schedule::DeploymentHour;
use crate::types::PushMode;
use crate::upload::ArtifactKind;

pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// What the preceding importer step reported about the package it added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImporterSummary {
    pub name: String,
    pub version: String,
    /// Set only when the importer wrote a new pkginfo during this run.
    pub pkginfo_path: Option<PathBuf>,
}

impl ImporterSummary {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            pkginfo_path: None,
        }
    }

    pub fn with_pkginfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pkginfo_path = Some(path.into());
        self
    }
}

/// Local artifact paths produced by the importer step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub installer: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
    pub icon: Option<PathBuf>,
}

impl ArtifactPaths {
    pub fn get(&self, kind: ArtifactKind) -> Option<&Path> {
        match kind {
            ArtifactKind::Installer => self.installer.as_deref(),
            ArtifactKind::Metadata => self.metadata.as_deref(),
            ArtifactKind::Icon => self.icon.as_deref(),
        }
    }
}

/// Credentials sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated connection settings for the AirWatch API.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub group_id: String,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

/// Full input of an import run
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// Root of the munki repository; relative artifact paths resolve against it
    pub repo_path: PathBuf,
    /// Import even when the importer step reported nothing new
    pub force_import: bool,
    pub base_url: String,
    /// Organization group identifier, e.g. `GRP1`
    pub group_id: String,
    pub api_token: String,
    pub username: String,
    pub password: String,
    /// Assignment target; assignment is skipped when unset
    pub smart_group_name: Option<String>,
    pub push_mode: PushMode,
    pub deployment_hour: Option<DeploymentHour>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub summary: ImporterSummary,
    pub artifacts: ArtifactPaths,
}

impl ImportRequest {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            force_import: false,
            base_url: String::new(),
            group_id: String::new(),
            api_token: String::new(),
            username: String::new(),
            password: String::new(),
            smart_group_name: None,
            push_mode: PushMode::default(),
            deployment_hour: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            summary: ImporterSummary::default(),
            artifacts: ArtifactPaths::default(),
        }
    }

    /// Set the service base URL and organization group identifier
    pub fn with_service(mut self, base_url: impl Into<String>, group_id: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.group_id = group_id.into();
        self
    }

    /// Set the API token and basic-auth credentials
    pub fn with_credentials(
        mut self,
        api_token: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.api_token = api_token.into();
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_force_import(mut self, force: bool) -> Self {
        self.force_import = force;
        self
    }

    pub fn with_smart_group(mut self, name: impl Into<String>) -> Self {
        self.smart_group_name = Some(name.into());
        self
    }

    pub fn with_push_mode(mut self, mode: PushMode) -> Self {
        self.push_mode = mode;
        self
    }

    pub fn with_deployment_hour(mut self, hour: DeploymentHour) -> Self {
        self.deployment_hour = Some(hour);
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_summary(mut self, summary: ImporterSummary) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_installer(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifacts.installer = Some(path.into());
        self
    }

    pub fn with_metadata(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifacts.metadata = Some(path.into());
        self
    }

    pub fn with_icon(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifacts.icon = Some(path.into());
        self
    }

    /// Resolve an artifact path, joining relative paths onto the repo root.
    ///
    /// Installer and metadata are mandatory; a missing path is a precondition
    /// failure. The icon is optional and yields `Ok(None)` when absent.
    pub fn artifact_path(&self, kind: ArtifactKind) -> Result<Option<PathBuf>> {
        match self.artifacts.get(kind) {
            Some(path) if !path.as_os_str().is_empty() => Ok(Some(self.resolve(path))),
            _ if kind.is_required() => Err(ImportError::MissingArtifact(kind)),
            _ => Ok(None),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.repo_path.join(path)
        }
    }

    /// Validate the connection settings needed once uploading starts.
    pub fn service_settings(&self) -> Result<ServiceSettings> {
        let base_url = require("airwatch_url", &self.base_url)?;
        let group_id = require("airwatch_groupid", &self.group_id)?;
        let api_token = require("api_token", &self.api_token)?;
        let username = require("api_username", &self.username)?;
        let password = require("api_password", &self.password)?;

        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ImportError::config("airwatch_url", e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ImportError::config(
                "airwatch_url",
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        Ok(ServiceSettings {
            base_url,
            group_id: group_id.trim().to_string(),
            credentials: Credentials {
                api_token: api_token.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            },
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
        })
    }
}

fn require<'a>(setting: &'static str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(ImportError::config(setting, "must not be empty"));
    }
    Ok(value)
}
