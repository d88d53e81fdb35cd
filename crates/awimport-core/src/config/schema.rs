//! Configuration schema for awimport.toml
//!
//! Every field is optional so the file can be layered under environment
//! variables and command-line flags:
//!
//! ```toml
//! [airwatch]
//! url = "https://myorg.awmdm.com"
//! group_id = "GRP1"
//! api_token = "..."
//! username = "api-user"
//! password = "..."
//! smart_group_name = "All Macs"
//! push_mode = "OnDemand"
//! deployment_time = 22
//!
//! [munki]
//! repo_path = "/Volumes/munki_repo"
//! force_import = false
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::request::{
    ArtifactPaths, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, ImportRequest,
    ImporterSummary,
};
use crate::schedule::DeploymentHour;
use crate::types::PushMode;

/// Root configuration structure for awimport.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterConfig {
    /// AirWatch service connection and assignment settings
    #[serde(default)]
    pub airwatch: AirWatchConfig,

    /// Munki repository settings
    #[serde(default)]
    pub munki: MunkiConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirWatchConfig {
    /// Base URL, e.g. https://myorg.awmdm.com
    #[serde(default)]
    pub url: Option<String>,

    /// Organization group identifier where files are uploaded
    #[serde(default)]
    pub group_id: Option<String>,

    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Smart group the app is assigned to
    #[serde(default)]
    pub smart_group_name: Option<String>,

    /// Auto or OnDemand
    #[serde(default)]
    pub push_mode: Option<String>,

    /// Hour of day (0-23) the deployment becomes effective
    #[serde(default)]
    pub deployment_time: Option<u32>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunkiConfig {
    #[serde(default)]
    pub repo_path: Option<PathBuf>,

    #[serde(default)]
    pub force_import: Option<bool>,
}

impl ImporterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `overlay` on top of `self`; values set in `overlay` win.
    pub fn merge(self, overlay: ImporterConfig) -> Self {
        let base = self;
        Self {
            airwatch: AirWatchConfig {
                url: overlay.airwatch.url.or(base.airwatch.url),
                group_id: overlay.airwatch.group_id.or(base.airwatch.group_id),
                api_token: overlay.airwatch.api_token.or(base.airwatch.api_token),
                username: overlay.airwatch.username.or(base.airwatch.username),
                password: overlay.airwatch.password.or(base.airwatch.password),
                smart_group_name: overlay
                    .airwatch
                    .smart_group_name
                    .or(base.airwatch.smart_group_name),
                push_mode: overlay.airwatch.push_mode.or(base.airwatch.push_mode),
                deployment_time: overlay
                    .airwatch
                    .deployment_time
                    .or(base.airwatch.deployment_time),
                timeout_secs: overlay.airwatch.timeout_secs.or(base.airwatch.timeout_secs),
                connect_timeout_secs: overlay
                    .airwatch
                    .connect_timeout_secs
                    .or(base.airwatch.connect_timeout_secs),
            },
            munki: MunkiConfig {
                repo_path: overlay.munki.repo_path.or(base.munki.repo_path),
                force_import: overlay.munki.force_import.or(base.munki.force_import),
            },
        }
    }

    /// Check values that can be judged without the rest of the run.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(mode) = non_blank(&self.airwatch.push_mode) {
            mode.parse::<PushMode>()
                .map_err(|e| anyhow::anyhow!(e))
                .context("Invalid airwatch.push_mode")?;
        }
        if let Some(hour) = self.airwatch.deployment_time {
            DeploymentHour::new(hour).context("Invalid airwatch.deployment_time")?;
        }
        if self.airwatch.timeout_secs == Some(0) {
            anyhow::bail!("airwatch.timeout_secs must be greater than zero");
        }
        if self.airwatch.connect_timeout_secs == Some(0) {
            anyhow::bail!("airwatch.connect_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Turn the layered configuration into a run request.
    ///
    /// Service settings are carried over as-is; emptiness is only checked
    /// once the run decides to upload.
    pub fn into_request(
        self,
        summary: ImporterSummary,
        artifacts: ArtifactPaths,
    ) -> anyhow::Result<ImportRequest> {
        self.validate()?;

        let repo_path = self
            .munki
            .repo_path
            .ok_or_else(|| anyhow::anyhow!("Missing required setting: munki_repo_path"))?;
        let aw = self.airwatch;

        let push_mode = match non_blank(&aw.push_mode) {
            Some(mode) => mode.parse::<PushMode>().map_err(|e| anyhow::anyhow!(e))?,
            None => PushMode::default(),
        };

        let mut request = ImportRequest::new(repo_path)
            .with_force_import(self.munki.force_import.unwrap_or(false))
            .with_service(aw.url.unwrap_or_default(), aw.group_id.unwrap_or_default())
            .with_credentials(
                aw.api_token.unwrap_or_default(),
                aw.username.unwrap_or_default(),
                aw.password.unwrap_or_default(),
            )
            .with_push_mode(push_mode)
            .with_timeouts(
                Duration::from_secs(aw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
                Duration::from_secs(
                    aw.connect_timeout_secs
                        .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
                ),
            )
            .with_summary(summary);

        if let Some(name) = aw.smart_group_name.filter(|n| !n.trim().is_empty()) {
            request = request.with_smart_group(name);
        }
        if let Some(hour) = aw.deployment_time {
            request = request.with_deployment_hour(DeploymentHour::new(hour)?);
        }
        request.artifacts = artifacts;

        Ok(request)
    }
}

/// Pipelines export unset variables as empty strings.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_layer() -> ImporterConfig {
        ImporterConfig {
            airwatch: AirWatchConfig {
                url: Some("https://file.example.com".into()),
                group_id: Some("GRP1".into()),
                push_mode: Some("Auto".into()),
                ..Default::default()
            },
            munki: MunkiConfig {
                repo_path: Some(PathBuf::from("/repo")),
                force_import: Some(false),
            },
        }
    }

    #[test]
    fn overlay_values_win() {
        let overlay = ImporterConfig {
            airwatch: AirWatchConfig {
                url: Some("https://env.example.com".into()),
                ..Default::default()
            },
            munki: MunkiConfig {
                force_import: Some(true),
                ..Default::default()
            },
        };

        let merged = file_layer().merge(overlay);
        assert_eq!(merged.airwatch.url.as_deref(), Some("https://env.example.com"));
        assert_eq!(merged.airwatch.group_id.as_deref(), Some("GRP1"));
        assert_eq!(merged.munki.force_import, Some(true));
        assert_eq!(merged.munki.repo_path, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn into_request_applies_defaults() {
        let request = file_layer()
            .into_request(ImporterSummary::default(), ArtifactPaths::default())
            .unwrap();
        assert_eq!(request.push_mode, PushMode::Auto);
        assert_eq!(request.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(request.smart_group_name.is_none());
        assert!(!request.force_import);
    }

    #[test]
    fn into_request_requires_repo_path() {
        let mut config = file_layer();
        config.munki.repo_path = None;
        let err = config
            .into_request(ImporterSummary::default(), ArtifactPaths::default())
            .unwrap_err();
        assert!(err.to_string().contains("munki_repo_path"));
    }

    #[test]
    fn blank_smart_group_is_treated_as_unset() {
        let mut config = file_layer();
        config.airwatch.smart_group_name = Some("  ".into());
        let request = config
            .into_request(ImporterSummary::default(), ArtifactPaths::default())
            .unwrap();
        assert!(request.smart_group_name.is_none());
    }

    #[test]
    fn validate_rejects_unknown_push_mode() {
        let mut config = file_layer();
        config.airwatch.push_mode = Some("eventually".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_deployment_time() {
        let mut config = file_layer();
        config.airwatch.deployment_time = Some(31);
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_push_mode_falls_back_to_auto() {
        let mut config = file_layer();
        config.airwatch.push_mode = Some(String::new());
        assert!(config.validate().is_ok());

        let request = config
            .into_request(ImporterSummary::default(), ArtifactPaths::default())
            .unwrap();
        assert_eq!(request.push_mode, PushMode::Auto);
    }

    #[test]
    fn validate_rejects_zero_timeouts() {
        let mut config = file_layer();
        config.airwatch.connect_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = file_layer();
        config.airwatch.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
