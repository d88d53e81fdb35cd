//! Artifact blob uploads.

use std::fmt;
use std::path::Path;

use crate::client::AirWatchClient;
use crate::client::models::BlobUploadResponse;
use crate::error::{ImportError, Result};

pub const UPLOAD_BLOB_PATH: &str = "/api/mam/blobs/uploadblob";

/// The three artifacts an import can upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The pkg/dmg/mpkg payload
    Installer,
    /// The munki pkginfo plist
    Metadata,
    /// Optional PNG icon
    Icon,
}

impl ArtifactKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Installer => "application/octet-stream",
            ArtifactKind::Metadata => "text/xml",
            ArtifactKind::Icon => "image/png",
        }
    }

    /// `moduleType` query value; only installers go in as `Application`.
    pub fn module_type(&self) -> &'static str {
        match self {
            ArtifactKind::Installer => "Application",
            ArtifactKind::Metadata | ArtifactKind::Icon => "General",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, ArtifactKind::Icon)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactKind::Installer => "pkg",
            ArtifactKind::Metadata => "pkginfo",
            ArtifactKind::Icon => "icon",
        })
    }
}

/// A blob stored by the service, referenced by later API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedBlob {
    pub kind: ArtifactKind,
    pub id: String,
}

/// Stream one artifact to the blob endpoint of an organization group.
pub async fn upload_artifact(
    client: &AirWatchClient,
    og_id: &str,
    kind: ArtifactKind,
    path: &Path,
) -> Result<UploadedBlob> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ImportError::config("artifact path", format!("{} has no file name", path.display())))?;

    let step = format!("upload the {}", kind);
    let url = client.endpoint(
        UPLOAD_BLOB_PATH,
        &[
            ("filename", file_name.as_str()),
            ("organizationgroup", og_id),
            ("moduleType", kind.module_type()),
        ],
    )?;

    tracing::info!(artifact = %kind, file = %file_name, "Uploading {}...", kind);
    let response: BlobUploadResponse = client
        .post_file(&step, url, kind.content_type(), path)
        .await?;

    let id = response
        .value
        .ok_or_else(|| ImportError::malformed(&step, "response has no `Value` field"))?
        .into_string();

    tracing::info!(artifact = %kind, blob_id = %id, "{} blob ID: {}", kind, id);
    Ok(UploadedBlob { kind, id })
}
