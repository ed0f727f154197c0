//! Export pipelines
//!
//! - LayerZip (.lzip) - layer hierarchy plus one isolated render per layer
//! - Multi export - flattened document in several raster formats

pub mod archive;
pub mod layerzip;
pub mod manifest;
pub mod multi;
pub mod render;
pub mod sanitize;
pub mod visibility;
pub mod walker;

pub use archive::{read_archive, LayerZipArchive};
pub use layerzip::export_layer_zip;
pub use manifest::{Manifest, ManifestEntry};
pub use multi::multi_export;
pub use sanitize::sanitize_name;
pub use walker::{ArchiveContents, LayerTreeWalker, NodeKind};
