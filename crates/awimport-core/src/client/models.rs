//! Wire types for the AirWatch REST API.
//!
//! Field names follow the service's PascalCase (search results) and camelCase
//! (app creation) conventions.

use serde::{Deserialize, Serialize};

use crate::types::{PushMode, ServiceId};

/// `{"Value": ...}` wrapper used for entity identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityId {
    #[serde(rename = "Value")]
    pub value: ServiceId,
}

/// Response of `GET /api/system/groups/search`
#[derive(Debug, Clone, Deserialize)]
pub struct LocationGroupSearch {
    #[serde(rename = "LocationGroups")]
    pub location_groups: Vec<LocationGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationGroup {
    #[serde(rename = "GroupId")]
    pub group_id: String,
    #[serde(rename = "Id")]
    pub id: EntityId,
}

/// Response of `POST /api/mam/blobs/uploadblob`
#[derive(Debug, Clone, Deserialize)]
pub struct BlobUploadResponse {
    #[serde(rename = "Value", default)]
    pub value: Option<ServiceId>,
}

/// Body of `POST /api/mam/groups/{og}/macos/apps`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    pub pkg_info_blob_id: String,
    pub application_blob_id: String,
    pub application_icon_id: String,
    pub is_managed_install: bool,
}

/// Response of `GET /api/mam/apps/search`
#[derive(Debug, Clone, Deserialize)]
pub struct AppSearch {
    #[serde(rename = "Application")]
    pub applications: Vec<AppSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppSummary {
    #[serde(rename = "ApplicationName", default)]
    pub name: String,
    #[serde(rename = "ActualFileVersion", default)]
    pub version: Option<String>,
    #[serde(rename = "Id")]
    pub id: EntityId,
}

/// Response of `GET /api/mdm/smartgroups/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SmartGroupSearch {
    #[serde(rename = "SmartGroups")]
    pub smart_groups: Vec<SmartGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmartGroup {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SmartGroupID")]
    pub id: ServiceId,
}

/// Body of `POST /api/mam/apps/internal/{id}/assignments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRequest {
    #[serde(rename = "SmartGroupIds")]
    pub smart_group_ids: Vec<ServiceId>,
    #[serde(rename = "DeploymentParameters")]
    pub deployment_parameters: DeploymentParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentParameters {
    #[serde(rename = "PushMode")]
    pub push_mode: PushMode,
    #[serde(rename = "EffectiveDate", skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
}
