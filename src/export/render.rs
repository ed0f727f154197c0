//! Isolated rendering of a single layer
//!
//! The host can only export the whole visible composite, so a layer's own
//! contribution is captured by hiding everything, showing the layer and its
//! ancestor chain, refreshing, exporting, and then putting the original
//! visibility back.

use super::visibility;
use crate::core::ExportError;
use crate::host::{Document, ExportOptions};

const TRANSIENT_FILE: &str = "layer.png";

/// Make `node` and every ancestor up to the root visible
fn reveal_with_ancestors<D: Document>(doc: &mut D, node: D::NodeId) -> Result<(), ExportError> {
    let mut current = Some(node);
    while let Some(next) = current {
        doc.set_visible(next, true)?;
        current = doc.parent_node(next);
    }
    Ok(())
}

/// Render `node` alone against transparency and return the PNG bytes.
///
/// Visibility of every node is restored before returning, on success and on
/// failure alike.
pub fn render_isolated<D: Document>(doc: &mut D, node: D::NodeId) -> Result<Vec<u8>, ExportError> {
    let name = doc.node_name(node);
    let snapshot = visibility::snapshot(doc);
    visibility::set_all(doc, false);

    let result = (|| -> Result<Vec<u8>, ExportError> {
        reveal_with_ancestors(doc, node)?;
        doc.refresh_projection();

        // Dropping the scratch dir discards partial output on every path
        let scratch = tempfile::Builder::new().prefix("layerzip-").tempdir()?;
        let path = scratch.path().join(TRANSIENT_FILE);
        if !doc.export_image(&path, &ExportOptions::LAYER_RENDER) {
            return Err(ExportError::LayerExportFailed { name: name.clone() });
        }
        Ok(std::fs::read(&path)?)
    })();

    visibility::restore_logged(doc, &snapshot);

    match result {
        Ok(ref bytes) => tracing::debug!("Rendered layer '{}' ({} bytes)", name, bytes.len()),
        Err(ref e) => tracing::warn!("Rendering layer '{}' failed: {}", name, e),
    }
    result
}
