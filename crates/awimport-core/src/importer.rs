//! Import command implementation.
//!
//! Runs the whole workflow strictly in sequence: change gate, local
//! preconditions, organization group lookup, artifact uploads, app object
//! creation and lookup, then smart group assignment.

use serde::Serialize;

use crate::apps::{self, AppBlobs};
use crate::assign;
use crate::client::AirWatchClient;
use crate::error::{ImportError, Result};
use crate::gate::{self, GateDecision};
use crate::groups;
use crate::request::ImportRequest;
use crate::types::ServiceId;
use crate::upload::{self, ArtifactKind};

/// Why a run ended without contacting the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The importer step reported no new pkginfo
    NothingNew,
    /// `force_import` was set but there was nothing new to import
    ForcedWithoutChanges,
}

/// Result of the assignment step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    Assigned {
        smart_group: String,
        smart_group_id: ServiceId,
    },
    /// The app exists but the assignment call did not succeed
    Failed { smart_group: String, reason: String },
    /// No smart group configured
    Skipped,
}

/// Identifiers of everything created during an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedApp {
    pub og_id: String,
    pub app_id: String,
    pub installer_blob_id: String,
    pub metadata_blob_id: String,
    /// Empty when no icon was uploaded
    pub icon_blob_id: String,
    pub assignment: AssignmentOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported(ImportedApp),
    Skipped { reason: SkipReason },
}

/// Report from an import run
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Name of the app as reported by the importer step
    pub name: String,
    pub version: String,
    pub outcome: ImportOutcome,
    /// Non-fatal problems (icon upload, assignment)
    pub warnings: Vec<String>,
}

impl ImportReport {
    fn skipped(request: &ImportRequest, reason: SkipReason) -> Self {
        Self {
            name: request.summary.name.clone(),
            version: request.summary.version.clone(),
            outcome: ImportOutcome::Skipped { reason },
            warnings: Vec::new(),
        }
    }

    pub fn imported(&self) -> Option<&ImportedApp> {
        match &self.outcome {
            ImportOutcome::Imported(app) => Some(app),
            ImportOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, ImportOutcome::Skipped { .. })
    }
}

/// Import command orchestrator
#[derive(Debug, Default)]
pub struct ImportCommand;

impl ImportCommand {
    pub fn new() -> Self {
        Self
    }

    /// Execute one import run.
    ///
    /// Returns an error for every fatal condition; icon and assignment
    /// failures end up in [`ImportReport::warnings`].
    pub async fn execute(&self, request: &ImportRequest) -> Result<ImportReport> {
        match gate::evaluate(&request.summary, request.force_import) {
            GateDecision::Import => {}
            GateDecision::NothingNew => {
                tracing::info!("No updates so nothing to import to AirWatch");
                return Ok(ImportReport::skipped(request, SkipReason::NothingNew));
            }
            GateDecision::ForcedWithoutChanges => {
                let message = "force_import is set but the importer reported nothing new; \
                               importing the whole repository is not supported, nothing was uploaded"
                    .to_string();
                tracing::warn!("{}", message);
                let mut report = ImportReport::skipped(request, SkipReason::ForcedWithoutChanges);
                report.warnings.push(message);
                return Ok(report);
            }
        }

        // Local preconditions; no request is made until all of these hold.
        let installer_path = required_path(request, ArtifactKind::Installer)?;
        let metadata_path = required_path(request, ArtifactKind::Metadata)?;
        let icon_path = request.artifact_path(ArtifactKind::Icon)?;
        let name = non_empty("app name", &request.summary.name)?;
        let version = non_empty("app version", &request.summary.version)?;
        let settings = request.service_settings()?;

        let client = AirWatchClient::new(&settings)?;
        tracing::info!(app = name, version, "Beginning the AirWatch import process for {}.", name);

        let og_id = groups::resolve_organization_group(&client, &settings.group_id).await?;

        let installer =
            upload::upload_artifact(&client, &og_id, ArtifactKind::Installer, &installer_path).await?;
        let metadata =
            upload::upload_artifact(&client, &og_id, ArtifactKind::Metadata, &metadata_path).await?;

        let mut warnings = Vec::new();
        let icon_id = match icon_path {
            None => String::new(),
            Some(path) => match upload::upload_artifact(&client, &og_id, ArtifactKind::Icon, &path).await {
                Ok(blob) => blob.id,
                Err(e) => {
                    tracing::warn!(error = %e, "Something went wrong while uploading the icon; continuing app object creation");
                    warnings.push(format!("icon upload failed: {}", e));
                    String::new()
                }
            },
        };

        let blobs = AppBlobs {
            installer,
            metadata,
            icon_id,
        };
        apps::create_application(&client, &og_id, &blobs).await?;
        let app_id = apps::find_application_id(&client, &og_id, name, version).await?;

        let assignment = match request.smart_group_name.as_deref() {
            None => {
                tracing::info!("No smart group configured; skipping assignment");
                AssignmentOutcome::Skipped
            }
            Some(smart_group) => {
                let outcome = self.assign(&client, request, &app_id, smart_group).await?;
                if let AssignmentOutcome::Failed { reason, .. } = &outcome {
                    let message = format!(
                        "Unable to successfully assign the app [{}] to the group [{}]: {}",
                        name, smart_group, reason
                    );
                    tracing::warn!("{}", message);
                    warnings.push(message);
                }
                outcome
            }
        };

        tracing::info!(app_id = %app_id, "Application was successfully uploaded to AirWatch.");
        Ok(ImportReport {
            name: name.to_string(),
            version: version.to_string(),
            outcome: ImportOutcome::Imported(ImportedApp {
                og_id,
                app_id,
                installer_blob_id: blobs.installer.id,
                metadata_blob_id: blobs.metadata.id,
                icon_blob_id: blobs.icon_id,
                assignment,
            }),
            warnings,
        })
    }

    /// Resolve the smart group (fatal when missing), then submit the
    /// assignment (non-fatal when rejected).
    async fn assign(
        &self,
        client: &AirWatchClient,
        request: &ImportRequest,
        app_id: &str,
        smart_group: &str,
    ) -> Result<AssignmentOutcome> {
        let smart_group_id = groups::resolve_smart_group(client, smart_group).await?;
        let effective_date = request.deployment_hour.map(|hour| hour.effective_date());
        let body = assign::build_assignment(smart_group_id.clone(), request.push_mode, effective_date);

        let outcome = match assign::submit_assignment(client, app_id, &body).await {
            Ok(status) if status.is_success() => AssignmentOutcome::Assigned {
                smart_group: smart_group.to_string(),
                smart_group_id,
            },
            Ok(status) => AssignmentOutcome::Failed {
                smart_group: smart_group.to_string(),
                reason: format!("HTTP {}", status),
            },
            Err(e) => AssignmentOutcome::Failed {
                smart_group: smart_group.to_string(),
                reason: e.to_string(),
            },
        };
        Ok(outcome)
    }
}

fn required_path(request: &ImportRequest, kind: ArtifactKind) -> Result<std::path::PathBuf> {
    request
        .artifact_path(kind)?
        .ok_or(ImportError::MissingArtifact(kind))
}

fn non_empty<'a>(setting: &'static str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(ImportError::config(setting, "the importer summary did not report it"));
    }
    Ok(value)
}
