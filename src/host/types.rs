//! Value types shared between the exporter and host implementations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node type as reported by the host application
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Group,
    Paint,
    Vector,
    Filter,
    Fill,
    Clone,
    File,
    Mask,
    /// Any type string the exporter does not know about
    Other(String),
}

impl NodeType {
    /// Map a host type string ("grouplayer", "paintlayer", ...) to a node type
    pub fn from_host_str(kind: &str) -> Self {
        match kind {
            "grouplayer" => NodeType::Group,
            "paintlayer" => NodeType::Paint,
            "vectorlayer" => NodeType::Vector,
            "filterlayer" => NodeType::Filter,
            "filllayer" => NodeType::Fill,
            "clonelayer" => NodeType::Clone,
            "filelayer" => NodeType::File,
            "transparencymask" | "filtermask" | "transformmask" | "selectionmask"
            | "colorizemask" => NodeType::Mask,
            other => NodeType::Other(other.to_string()),
        }
    }

    /// Host type string for this node type
    pub fn as_host_str(&self) -> &str {
        match self {
            NodeType::Group => "grouplayer",
            NodeType::Paint => "paintlayer",
            NodeType::Vector => "vectorlayer",
            NodeType::Filter => "filterlayer",
            NodeType::Fill => "filllayer",
            NodeType::Clone => "clonelayer",
            NodeType::File => "filelayer",
            NodeType::Mask => "transparencymask",
            NodeType::Other(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_host_str())
    }
}

/// Options passed to `Document::export_image`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// 0-100, only meaningful for lossy formats
    pub quality: u8,
    /// Preserve transparency
    pub alpha: bool,
}

impl ExportOptions {
    /// Fixed policy for isolated layer renders
    pub const LAYER_RENDER: ExportOptions = ExportOptions {
        quality: 100,
        alpha: true,
    };

    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
            alpha: true,
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::with_quality(90)
    }
}

/// Errors reported by host node operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("node no longer exists: {0}")]
    NodeGone(String),

    #[error("host rejected operation: {0}")]
    Rejected(String),
}
