//! Smart group assignment of an internal app.

use reqwest::StatusCode;

use crate::client::AirWatchClient;
use crate::client::models::{AssignmentRequest, DeploymentParameters};
use crate::error::Result;
use crate::types::{PushMode, ServiceId};

pub fn assignment_path(app_id: &str) -> String {
    format!("/api/mam/apps/internal/{}/assignments", app_id)
}

pub fn build_assignment(
    smart_group_id: ServiceId,
    push_mode: PushMode,
    effective_date: Option<String>,
) -> AssignmentRequest {
    AssignmentRequest {
        smart_group_ids: vec![smart_group_id],
        deployment_parameters: DeploymentParameters {
            push_mode,
            effective_date,
        },
    }
}

/// Submit an assignment and return the service's status code.
///
/// A non-success status is left for the caller to judge: by then the app
/// object exists, so the run as a whole still succeeds.
pub async fn submit_assignment(
    client: &AirWatchClient,
    app_id: &str,
    assignment: &AssignmentRequest,
) -> Result<StatusCode> {
    let url = client.endpoint(&assignment_path(app_id), &[])?;
    client.post_json("assign the app", url, assignment).await
}
