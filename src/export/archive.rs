//! LayerZip (.lzip) container
//!
//! A `.lzip` is a ZIP archive containing:
//! - lzip.conf.json: manifest (width, height, layer hierarchy)
//! - <group>/<...>/<layer>.png: one isolated render per paintable layer
//!
//! The archive is assembled entirely in memory and only then written to
//! disk through a temporary sibling file that replaces the destination.

use super::manifest::Manifest;
use super::walker::ArchiveContents;
use crate::core::ExportError;
use indexmap::IndexMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// `<folder>/<stem>.<extension>` for a document at `document`
pub fn archive_path_for(document: &Path, extension: &str) -> PathBuf {
    document.with_extension(extension)
}

/// Build the complete archive in memory
pub fn build_archive(
    manifest_name: &str,
    manifest: &Manifest,
    contents: &ArchiveContents,
) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    zip.start_file(manifest_name, options)?;
    zip.write_all(&manifest.to_json()?)?;

    for (path, bytes) in contents.iter() {
        zip.start_file(path, options)?;
        zip.write_all(bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Replace `path` with `bytes` in one step
pub fn write_archive(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".lzip-")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path)?;
    Ok(())
}

/// A `.lzip` read back from disk
#[derive(Debug, Clone)]
pub struct LayerZipArchive {
    pub manifest: Manifest,
    /// Images referenced by the manifest, in manifest order
    pub images: IndexMap<String, Vec<u8>>,
}

/// Open a `.lzip` and load its manifest and every referenced image
pub fn read_archive(path: &Path, manifest_name: &str) -> Result<LayerZipArchive, ExportError> {
    let bytes = std::fs::read(path)?;
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let manifest = {
        let mut member = archive.by_name(manifest_name).map_err(|_| {
            ExportError::InvalidArchive(format!("missing manifest '{}'", manifest_name))
        })?;
        let mut json = Vec::new();
        member.read_to_end(&mut json)?;
        Manifest::from_json(&json)?
    };

    let mut images = IndexMap::new();
    for layer_path in manifest.layer_paths() {
        let mut member = archive.by_name(layer_path).map_err(|_| {
            ExportError::InvalidArchive(format!("missing layer image '{}'", layer_path))
        })?;
        let mut data = Vec::new();
        member.read_to_end(&mut data)?;
        images.insert(layer_path.to_string(), data);
    }

    tracing::debug!(
        "Read archive {:?}: {} layer images",
        path,
        images.len()
    );

    Ok(LayerZipArchive { manifest, images })
}
