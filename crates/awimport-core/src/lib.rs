//! awimport core library
//!
//! Uploads a munki-imported package (installer, pkginfo, optional icon) to
//! AirWatch, registers it as a macOS app and assigns it to a smart group.

pub mod apps;
pub mod assign;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod groups;
pub mod importer;
pub mod output;
pub mod request;
pub mod schedule;
pub mod types;
pub mod upload;
