//! Shared core types used across configuration and the wire layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How AirWatch delivers an assigned app to devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PushMode {
    /// Installed automatically once the device is in the smart group.
    #[default]
    Auto,
    /// Offered in the catalog; the user installs it.
    OnDemand,
}

impl PushMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushMode::Auto => "Auto",
            PushMode::OnDemand => "OnDemand",
        }
    }
}

impl fmt::Display for PushMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PushMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(PushMode::Auto),
            "ondemand" | "on-demand" | "on_demand" => Ok(PushMode::OnDemand),
            other => Err(format!(
                "unknown push mode '{}', expected Auto or OnDemand",
                other
            )),
        }
    }
}

/// An identifier the service may encode either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceId {
    Number(i64),
    Text(String),
}

impl ServiceId {
    pub fn into_string(self) -> String {
        match self {
            ServiceId::Number(n) => n.to_string(),
            ServiceId::Text(s) => s,
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Number(n) => write!(f, "{}", n),
            ServiceId::Text(s) => f.write_str(s),
        }
    }
}
