//! App object creation and lookup.
//!
//! Creating a macOS app returns no identifier, so the new app is found again
//! through the app search by name and version.

use crate::client::AirWatchClient;
use crate::client::models::{AppSearch, AppSummary, CreateAppRequest};
use crate::error::{ImportError, Result};
use crate::upload::UploadedBlob;

pub const APP_SEARCH_PATH: &str = "/api/mam/apps/search";

pub fn create_app_path(og_id: &str) -> String {
    format!("/api/mam/groups/{}/macos/apps", og_id)
}

/// Blob IDs an app object is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppBlobs {
    pub installer: UploadedBlob,
    pub metadata: UploadedBlob,
    /// Empty when no icon was uploaded
    pub icon_id: String,
}

impl AppBlobs {
    pub fn to_create_request(&self) -> CreateAppRequest {
        CreateAppRequest {
            pkg_info_blob_id: self.metadata.id.clone(),
            application_blob_id: self.installer.id.clone(),
            application_icon_id: self.icon_id.clone(),
            is_managed_install: true,
        }
    }
}

/// First entry whose version equals `version` and whose name is contained in `name`.
pub fn select_application<'a>(
    apps: &'a [AppSummary],
    name: &str,
    version: &str,
) -> Option<&'a AppSummary> {
    apps.iter().find(|app| {
        app.version.as_deref() == Some(version) && name.contains(app.name.as_str())
    })
}

/// Create the app object in an organization group.
pub async fn create_application(client: &AirWatchClient, og_id: &str, blobs: &AppBlobs) -> Result<()> {
    let step = "create the App Object";
    let url = client.endpoint(&create_app_path(og_id), &[])?;

    tracing::info!("Creating App Object in AirWatch...");
    let status = client.post_json(step, url, &blobs.to_create_request()).await?;
    if !status.is_success() {
        return Err(ImportError::status(step, status));
    }
    Ok(())
}

/// Find the ID of a freshly created app.
pub async fn find_application_id(
    client: &AirWatchClient,
    og_id: &str,
    name: &str,
    version: &str,
) -> Result<String> {
    let step = format!("retrieve the App ID for {} {}", name, version);
    let url = client.endpoint(
        APP_SEARCH_PATH,
        &[("locationgroupid", og_id), ("applicationname", name)],
    )?;

    let search: Option<AppSearch> = client.get_json(&step, url).await?;
    let apps = search.map(|s| s.applications).unwrap_or_default();

    let app_id = select_application(&apps, name, version)
        .map(|app| app.id.value.to_string())
        .ok_or_else(|| ImportError::not_found("application", format!("{} {}", name, version)))?;

    tracing::info!(app_id = %app_id, "App ID: {}", app_id);
    Ok(app_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::EntityId;
    use crate::types::ServiceId;
    use crate::upload::ArtifactKind;

    fn app(name: &str, version: Option<&str>, id: i64) -> AppSummary {
        AppSummary {
            name: name.into(),
            version: version.map(Into::into),
            id: EntityId {
                value: ServiceId::Number(id),
            },
        }
    }

    #[test]
    fn picks_first_matching_version_and_name() {
        let apps = vec![
            app("Firefox", Some("120.0"), 1),
            app("Firefox", Some("121.0"), 2),
            app("Firefox", Some("121.0"), 3),
        ];
        let found = select_application(&apps, "Firefox", "121.0").unwrap();
        assert_eq!(found.id.value, ServiceId::Number(2));
    }

    #[test]
    fn name_may_be_contained_in_expected_name() {
        let apps = vec![app("Firefox", Some("121.0"), 9)];
        assert!(select_application(&apps, "Firefox ESR", "121.0").is_some());
    }

    #[test]
    fn entries_failing_either_test_are_ignored() {
        let apps = vec![
            app("Thunderbird", Some("121.0"), 1),
            app("Firefox", Some("120.0"), 2),
            app("Firefox", None, 3),
        ];
        assert!(select_application(&apps, "Firefox", "121.0").is_none());
    }

    #[test]
    fn empty_entry_name_is_contained_in_any_name() {
        let apps = vec![app("", Some("121.0"), 4), app("Firefox", Some("121.0"), 5)];
        let found = select_application(&apps, "Firefox", "121.0").unwrap();
        assert_eq!(found.id.value, ServiceId::Number(4));
    }

    #[test]
    fn create_request_maps_blob_roles() {
        let blobs = AppBlobs {
            installer: UploadedBlob {
                kind: ArtifactKind::Installer,
                id: "b1".into(),
            },
            metadata: UploadedBlob {
                kind: ArtifactKind::Metadata,
                id: "b2".into(),
            },
            icon_id: String::new(),
        };
        let body = blobs.to_create_request();
        assert_eq!(body.application_blob_id, "b1");
        assert_eq!(body.pkg_info_blob_id, "b2");
        assert_eq!(body.application_icon_id, "");
        assert!(body.is_managed_install);
    }
}
