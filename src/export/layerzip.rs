//! Export a whole document as a `.lzip` archive

use super::archive::{archive_path_for, build_archive, write_archive};
use super::manifest::Manifest;
use super::walker::LayerTreeWalker;
use crate::core::{ExportError, ExportSettings};
use crate::host::Document;
use std::path::PathBuf;
use std::time::Instant;

/// Render every paintable layer, assemble the archive next to the document
/// and return its path.
///
/// Nothing is written when any layer fails to render; an existing archive at
/// the destination stays untouched.
pub fn export_layer_zip<D: Document>(
    doc: &mut D,
    settings: &ExportSettings,
) -> Result<PathBuf, ExportError> {
    let total_start = Instant::now();
    let document_path = doc.file_name().ok_or(ExportError::SaveCancelled)?;
    let target = archive_path_for(&document_path, &settings.archive_extension);
    tracing::info!("[LZIP] Exporting {:?} -> {:?}", document_path, target);

    // Phase 1: isolate and render every layer
    let t1 = Instant::now();
    let walked = LayerTreeWalker::new(&mut *doc, settings.max_depth).walk_document();
    // Leave the host showing the restored composite, not the last isolation
    doc.refresh_projection();
    let (layers, contents) = walked?;
    let render_ms = t1.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        "[LZIP] Phase 1 - Render: {:.1}ms ({} images)",
        render_ms,
        contents.len()
    );

    // Phase 2: assemble in memory, then replace the file
    let t2 = Instant::now();
    let manifest = Manifest {
        width: doc.width(),
        height: doc.height(),
        layers,
    };
    let bytes = build_archive(&settings.manifest_name, &manifest, &contents)?;
    write_archive(&target, &bytes)?;
    let write_ms = t2.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        "[LZIP] Phase 2 - Archive: {:.1}ms ({} bytes)",
        write_ms,
        bytes.len()
    );

    tracing::info!(
        "[LZIP] Total export time: {:.1}ms",
        total_start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(target)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::export::archive::read_archive;
    use crate::export::manifest::ManifestEntry;
    use crate::export::visibility;
    use crate::host::memory::MemoryDocument;
    use crate::host::NodeType;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    fn sample_document(path: PathBuf) -> MemoryDocument {
        let mut doc = MemoryDocument::new(4, 3).with_file_name(path);
        let red = doc.filled_rect((0, 0, 4, 3), RED);
        doc.add_paint_layer(None, "Background", red);
        let group = doc.add_group(None, "Line Art");
        let green = doc.filled_rect((1, 1, 2, 1), GREEN);
        let ink = doc.add_paint_layer(Some(group), "Ink", green);
        doc.add_node(Some(group), "Levels", NodeType::Filter, None);
        doc.set_visible(ink, false).unwrap();
        doc
    }

    #[test]
    fn test_export_layer_zip() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = sample_document(dir.path().join("scene.kra"));
        let before = visibility::snapshot(&doc);
        let settings = ExportSettings::default();

        let path = export_layer_zip(&mut doc, &settings).unwrap();
        assert_eq!(path, dir.path().join("scene.lzip"));
        assert_eq!(visibility::snapshot(&doc), before);

        let archive = read_archive(&path, &settings.manifest_name).unwrap();
        assert_eq!(archive.manifest.width, 4);
        assert_eq!(archive.manifest.height, 3);
        assert_eq!(
            archive.manifest.layers,
            vec![
                ManifestEntry::layer("Background.png"),
                ManifestEntry::group("Line Art", vec![ManifestEntry::layer("Line_Art/Ink.png")]),
            ]
        );

        let ink = image::load_from_memory(&archive.images["Line_Art/Ink.png"])
            .unwrap()
            .to_rgba8();
        assert_eq!(*ink.get_pixel(1, 1), GREEN);
        assert_eq!(ink.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_failed_layer_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = sample_document(dir.path().join("scene.kra"));
        let broken = doc.top_level_nodes()[0];
        doc.fail_exports_while_visible(broken);
        let before = visibility::snapshot(&doc);

        let target = dir.path().join("scene.lzip");
        std::fs::write(&target, b"previous export").unwrap();

        let err = export_layer_zip(&mut doc, &ExportSettings::default()).unwrap_err();
        assert!(matches!(err, ExportError::LayerExportFailed { .. }));
        assert_eq!(std::fs::read(&target).unwrap(), b"previous export");
        assert_eq!(visibility::snapshot(&doc), before);
    }

    #[test]
    fn test_unsaved_document_is_rejected() {
        let mut doc = MemoryDocument::new(1, 1);
        let err = export_layer_zip(&mut doc, &ExportSettings::default()).unwrap_err();
        assert!(matches!(err, ExportError::SaveCancelled));
    }
}
