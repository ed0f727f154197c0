//! Multi-format export of the flattened document

use crate::core::{ExportError, ExportSettings};
use crate::host::{Document, ExportOptions};
use std::path::PathBuf;

/// Export `<stem>.<ext>` next to the document for every configured format.
///
/// A format the host fails to write is logged and skipped; the returned list
/// holds only the files that were written.
pub fn multi_export<D: Document>(
    doc: &mut D,
    settings: &ExportSettings,
) -> Result<Vec<PathBuf>, ExportError> {
    let document_path = doc.file_name().ok_or(ExportError::SaveCancelled)?;
    let options = ExportOptions::with_quality(settings.multi_export_quality);

    let mut written = Vec::new();
    for extension in &settings.multi_export_formats {
        let output = document_path.with_extension(extension);
        if doc.export_image(&output, &options) {
            tracing::debug!("Exported {:?}", output);
            written.push(output);
        } else {
            tracing::warn!("Export to {:?} failed", output);
        }
    }

    tracing::info!(
        "Multi export complete: {}/{} formats",
        written.len(),
        settings.multi_export_formats.len()
    );
    Ok(written)
}
