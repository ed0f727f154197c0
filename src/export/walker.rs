//! Layer tree walker
//!
//! Visits the document depth-first in native sibling order, renders every
//! paintable layer in isolation, and builds the manifest bottom-up.

use super::manifest::ManifestEntry;
use super::render::render_isolated;
use super::sanitize::sanitize_name;
use crate::core::ExportError;
use crate::host::{Document, NodeType};
use indexmap::IndexMap;

const LAYER_EXTENSION: &str = "png";

/// How the walker treats a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Descended into; always appears in the manifest, even when empty
    Group,
    /// Rendered to its own image
    Paintable,
    /// Skipped entirely
    Unsupported,
}

impl NodeKind {
    /// Paint and vector layers are paintable. Filter, fill, clone and file
    /// layers, masks, and unknown host types are unsupported.
    pub fn classify(node_type: &NodeType) -> Self {
        match node_type {
            NodeType::Group => NodeKind::Group,
            NodeType::Paint | NodeType::Vector => NodeKind::Paintable,
            NodeType::Filter
            | NodeType::Fill
            | NodeType::Clone
            | NodeType::File
            | NodeType::Mask
            | NodeType::Other(_) => NodeKind::Unsupported,
        }
    }
}

/// Rendered layer images keyed by archive path, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ArchiveContents {
    images: IndexMap<String, Vec<u8>>,
}

impl ArchiveContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` at `path`. An existing image at the same path is
    /// replaced and returned.
    pub fn insert(&mut self, path: String, bytes: Vec<u8>) -> Option<Vec<u8>> {
        let replaced = self.images.insert(path, bytes);
        if replaced.is_some() {
            tracing::warn!("Archive path collision, previous layer image overwritten");
        }
        replaced
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.images.get(path).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.images
            .iter()
            .map(|(path, bytes)| (path.as_str(), bytes.as_slice()))
    }
}

fn layer_path(prefix: &[String], name: &str) -> String {
    let mut segments = prefix.to_vec();
    segments.push(format!("{}.{}", sanitize_name(name), LAYER_EXTENSION));
    segments.join("/")
}

pub struct LayerTreeWalker<'d, D: Document> {
    doc: &'d mut D,
    contents: ArchiveContents,
    max_depth: usize,
}

impl<'d, D: Document> LayerTreeWalker<'d, D> {
    pub fn new(doc: &'d mut D, max_depth: usize) -> Self {
        Self {
            doc,
            contents: ArchiveContents::new(),
            max_depth,
        }
    }

    /// Walk every top-level node and hand back the manifest entries together
    /// with the rendered images
    pub fn walk_document(mut self) -> Result<(Vec<ManifestEntry>, ArchiveContents), ExportError> {
        let mut entries = Vec::new();
        let mut prefix = Vec::new();
        for node in self.doc.top_level_nodes() {
            if let Some(entry) = self.walk(node, &mut prefix)? {
                entries.push(entry);
            }
        }
        Ok((entries, self.contents))
    }

    /// Walk one node. `prefix` holds the sanitized names of the enclosing
    /// groups and is left unchanged on return.
    pub fn walk(
        &mut self,
        node: D::NodeId,
        prefix: &mut Vec<String>,
    ) -> Result<Option<ManifestEntry>, ExportError> {
        if prefix.len() > self.max_depth {
            return Err(ExportError::DepthLimitExceeded {
                depth: self.max_depth,
            });
        }

        let name = self.doc.node_name(node);
        let node_type = self.doc.node_type(node);
        match NodeKind::classify(&node_type) {
            NodeKind::Group => {
                prefix.push(sanitize_name(&name));
                let result = self.walk_children(node, prefix);
                prefix.pop();
                Ok(Some(ManifestEntry::group(name, result?)))
            }
            NodeKind::Paintable => {
                let path = layer_path(prefix, &name);
                let bytes = render_isolated(&mut *self.doc, node)?;
                self.contents.insert(path.clone(), bytes);
                Ok(Some(ManifestEntry::layer(path)))
            }
            NodeKind::Unsupported => {
                tracing::debug!("Skipping '{}' ({})", name, node_type);
                Ok(None)
            }
        }
    }

    fn walk_children(
        &mut self,
        group: D::NodeId,
        prefix: &mut Vec<String>,
    ) -> Result<Vec<ManifestEntry>, ExportError> {
        let mut entries = Vec::new();
        for child in self.doc.child_nodes(group) {
            if let Some(entry) = self.walk(child, prefix)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}
