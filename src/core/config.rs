//! Export settings
//!
//! Settings are plain JSON (camelCase keys). Missing keys fall back to the
//! defaults, and a missing or unreadable file yields the full default set.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// File extensions written by Multi Export, in order
    pub multi_export_formats: Vec<String>,
    /// Quality passed to the host for Multi Export (lossy formats only)
    pub multi_export_quality: u8,
    /// Extension of the layer archive written next to the document
    pub archive_extension: String,
    /// Name of the manifest member inside the archive
    pub manifest_name: String,
    /// Deepest group nesting the walker will descend into
    pub max_depth: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            multi_export_formats: ["png", "jpg", "webp", "avif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            multi_export_quality: 90,
            archive_extension: "lzip".to_string(),
            manifest_name: "lzip.conf.json".to_string(),
            max_depth: 64,
        }
    }
}

impl ExportSettings {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let settings = match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json_str(&json).unwrap_or_else(|err| {
                tracing::warn!("Invalid export settings {:?}: {}", path, err);
                Self::default()
            }),
            Err(err) => {
                tracing::warn!("Failed to read export settings {:?}: {}", path, err);
                Self::default()
            }
        };

        tracing::debug!("Loaded export settings: {:?}", settings);
        settings
    }
}
