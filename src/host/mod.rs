//! Host application contract
//!
//! The exporter never composites or encodes pixels itself. Everything it
//! needs from the image editor is expressed by the two traits below:
//! - [`Application`] - access to the active document
//! - [`Document`] - dimensions, file path, layer tree, visibility, export
//!
//! [`memory`] provides an in-process implementation backed by the `image`
//! crate.

pub mod memory;
pub mod types;

pub use types::*;

use std::fmt::Debug;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// A layered document owned by the host application
pub trait Document {
    /// Stable node identity for the duration of one export
    type NodeId: Copy + Eq + Hash + Debug;

    /// Path the document is saved at, `None` if it was never saved
    fn file_name(&self) -> Option<PathBuf>;

    /// Save to the current file name. Returns `false` on failure.
    fn save(&mut self) -> bool;

    /// Prompt the user for a file name and save. Returns `false` if cancelled.
    fn save_as(&mut self) -> bool;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Top-level nodes, bottom-most first
    fn top_level_nodes(&self) -> Vec<Self::NodeId>;

    /// Export the current projection to `path`. Returns `false` on failure.
    fn export_image(&mut self, path: &Path, options: &ExportOptions) -> bool;

    /// Recompute the visible composite. Blocks until done.
    fn refresh_projection(&mut self);

    fn batchmode(&self) -> bool;

    /// Suppress host dialogs during scripted export
    fn set_batchmode(&mut self, batchmode: bool);

    fn node_name(&self, node: Self::NodeId) -> String;

    fn node_type(&self, node: Self::NodeId) -> NodeType;

    /// Children, bottom-most first
    fn child_nodes(&self, node: Self::NodeId) -> Vec<Self::NodeId>;

    /// Parent group, `None` for top-level nodes
    fn parent_node(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    fn visible(&self, node: Self::NodeId) -> bool;

    fn set_visible(&mut self, node: Self::NodeId, visible: bool) -> Result<(), HostError>;
}

/// The host application facade
pub trait Application {
    type Document: Document;

    fn active_document(&mut self) -> Option<&mut Self::Document>;
}

impl<A: Application + ?Sized> Application for &mut A {
    type Document = A::Document;

    fn active_document(&mut self) -> Option<&mut Self::Document> {
        (**self).active_document()
    }
}
