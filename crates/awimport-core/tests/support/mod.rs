#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use awimport_core::request::{ImportRequest, ImporterSummary};

pub const GROUP_ID: &str = "GRP1";
pub const OG_ID: i64 = 42;
pub const APP_NAME: &str = "App";
pub const APP_VERSION: &str = "1.0";
pub const APP_ID: i64 = 77;
pub const SMART_GROUP: &str = "All Macs";
pub const SMART_GROUP_ID: i64 = 17;

pub struct Fixture {
    pub server: MockServer,
    pub temp: TempDir,
}

impl Fixture {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(temp.path().join("pkgs")).expect("Failed to create pkgs dir");
        std::fs::create_dir_all(temp.path().join("pkgsinfo")).expect("Failed to create pkgsinfo dir");
        std::fs::create_dir_all(temp.path().join("icons")).expect("Failed to create icons dir");
        Self { server, temp }
    }

    pub fn repo(&self) -> PathBuf {
        self.temp.path().to_path_buf()
    }

    pub fn write(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.temp.path().join(relative);
        std::fs::write(&path, content).expect("Failed to write artifact");
        path
    }

    /// Request for a run where the importer just added `App 1.0`, with
    /// installer and pkginfo on disk and no icon.
    pub fn request(&self) -> ImportRequest {
        self.write("pkgs/app.pkg", b"installer-bytes");
        self.write("pkgsinfo/app.pkginfo", b"<?xml version=\"1.0\"?><plist/>");

        ImportRequest::new(self.repo())
            .with_service(self.server.uri(), GROUP_ID)
            .with_credentials("tenant-token", "api-user", "api-pass")
            .with_summary(
                ImporterSummary::new(APP_NAME, APP_VERSION).with_pkginfo_path("pkgsinfo/app.pkginfo"),
            )
            .with_installer("pkgs/app.pkg")
            .with_metadata("pkgsinfo/app.pkginfo")
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    pub async fn requests_to(&self, wanted: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == wanted)
            .collect()
    }

    pub async fn mount_og_search(&self) {
        Mock::given(method("GET"))
            .and(path("/api/system/groups/search"))
            .and(query_param("groupid", GROUP_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "LocationGroups": [
                    { "GroupId": GROUP_ID, "Id": { "Value": OG_ID } }
                ]
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_upload(&self, filename: &str, body: Value) {
        Mock::given(method("POST"))
            .and(path("/api/mam/blobs/uploadblob"))
            .and(query_param("filename", filename))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_standard_uploads(&self) {
        self.mount_upload("app.pkg", json!({ "Value": "b1" })).await;
        self.mount_upload("app.pkginfo", json!({ "Value": "b2" })).await;
    }

    pub async fn mount_create(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/api/mam/groups/{}/macos/apps", OG_ID)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_app_search(&self, applications: Value) {
        Mock::given(method("GET"))
            .and(path("/api/mam/apps/search"))
            .and(query_param("locationgroupid", OG_ID.to_string()))
            .and(query_param("applicationname", APP_NAME))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Application": applications
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_standard_app_search(&self) {
        self.mount_app_search(json!([
            { "ActualFileVersion": APP_VERSION, "ApplicationName": APP_NAME, "Id": { "Value": APP_ID } }
        ]))
        .await;
    }

    pub async fn mount_smart_group_search(&self) {
        Mock::given(method("GET"))
            .and(path("/api/mdm/smartgroups/search"))
            .and(query_param("name", SMART_GROUP))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "SmartGroups": [
                    { "Name": SMART_GROUP, "SmartGroupID": SMART_GROUP_ID }
                ]
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_assignment(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/api/mam/apps/internal/{}/assignments", APP_ID)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Every endpoint answering the happy path.
    pub async fn mount_happy_path(&self) {
        self.mount_og_search().await;
        self.mount_standard_uploads().await;
        self.mount_create(200).await;
        self.mount_standard_app_search().await;
        self.mount_smart_group_search().await;
        self.mount_assignment(200).await;
    }
}

pub fn json_body(request: &wiremock::Request) -> Value {
    serde_json::from_slice(&request.body).expect("request body should be JSON")
}
