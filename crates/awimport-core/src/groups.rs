//! Organization group and smart group lookups.

use crate::client::AirWatchClient;
use crate::client::models::{LocationGroup, LocationGroupSearch, SmartGroup, SmartGroupSearch};
use crate::error::{ImportError, Result};
use crate::types::ServiceId;

pub const GROUP_SEARCH_PATH: &str = "/api/system/groups/search";
pub const SMART_GROUP_SEARCH_PATH: &str = "/api/mdm/smartgroups/search";

/// Pick the location group whose `GroupId` is exactly `group_id`.
pub fn select_location_group<'a>(
    groups: &'a [LocationGroup],
    group_id: &str,
) -> Option<&'a LocationGroup> {
    groups.iter().find(|group| group.group_id == group_id)
}

/// Pick the smart group whose name is exactly `name`.
pub fn select_smart_group<'a>(groups: &'a [SmartGroup], name: &str) -> Option<&'a SmartGroup> {
    groups.iter().find(|group| group.name == name)
}

/// Resolve the internal ID of an organization group from its group identifier.
///
/// The returned value is used in every upload and app URL of the run.
pub async fn resolve_organization_group(client: &AirWatchClient, group_id: &str) -> Result<String> {
    let step = format!("retrieve an ID for the Organization Group {}", group_id);
    let url = client.endpoint(GROUP_SEARCH_PATH, &[("groupid", group_id)])?;

    let search: Option<LocationGroupSearch> = client.get_json(&step, url).await?;
    let groups = search.map(|s| s.location_groups).unwrap_or_default();

    let og_id = select_location_group(&groups, group_id)
        .map(|group| group.id.value.to_string())
        .ok_or_else(|| ImportError::not_found("organization group", group_id))?;

    tracing::info!(group_id, og_id = %og_id, "OG ID: {}", og_id);
    Ok(og_id)
}

/// Resolve a smart group ID by exact name.
pub async fn resolve_smart_group(client: &AirWatchClient, name: &str) -> Result<ServiceId> {
    let step = format!("search for smart group {}", name);
    let url = client.endpoint(SMART_GROUP_SEARCH_PATH, &[("name", name)])?;

    let search: Option<SmartGroupSearch> = client.get_json(&step, url).await?;
    let groups = search.map(|s| s.smart_groups).unwrap_or_default();

    let id = select_smart_group(&groups, name)
        .map(|group| group.id.clone())
        .ok_or_else(|| ImportError::not_found("smart group", name))?;

    tracing::info!(smart_group = name, smart_group_id = %id, "Smart Group ID: {}", id);
    Ok(id)
}
