//! In-memory document host
//!
//! A small layer-tree model that implements [`Document`] and [`Application`]
//! without an editor attached. Layers hold full-canvas RGBA buffers; the
//! projection is composited bottom-to-top from every node that is visible
//! together with all of its ancestors. Adding or removing nodes recomposites
//! immediately; visibility edits wait for `refresh_projection`. Export
//! encodes the current projection with the `image` crate.
//!
//! The fault-injection hooks (`fail_exports_while_visible`, `remove_node`,
//! `set_save_as_target(None)`) exist so the exporter's failure paths can be
//! driven deterministically.

use super::{Application, Document, ExportOptions, HostError, NodeType};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbImage, RgbaImage};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// AVIF encoder speed (1 = slowest/best, 10 = fastest)
const AVIF_SPEED: u8 = 10;

/// Written before a failing export returns, mimicking a half-written file
const PARTIAL_EXPORT_BYTES: &[u8] = b"\x89PNG\r\n\x1a\npartial";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryNodeId(usize);

#[derive(Debug, Clone)]
struct MemoryNode {
    name: String,
    node_type: NodeType,
    visible: bool,
    parent: Option<MemoryNodeId>,
    children: Vec<MemoryNodeId>,
    pixels: Option<RgbaImage>,
    removed: bool,
}

/// Layered document held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    width: u32,
    height: u32,
    file_name: Option<PathBuf>,
    save_as_target: Option<PathBuf>,
    nodes: Vec<MemoryNode>,
    roots: Vec<MemoryNodeId>,
    projection: RgbaImage,
    batchmode: bool,
    failing_exports: HashSet<MemoryNodeId>,
    refresh_count: usize,
    export_count: usize,
    save_count: usize,
}

impl MemoryDocument {
    /// Create an empty, unsaved document
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            file_name: None,
            save_as_target: None,
            nodes: Vec::new(),
            roots: Vec::new(),
            projection: RgbaImage::new(width, height),
            batchmode: false,
            failing_exports: HashSet::new(),
            refresh_count: 0,
            export_count: 0,
            save_count: 0,
        }
    }

    pub fn with_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_name = Some(path.into());
        self
    }

    /// Path the save-as prompt will pick. `None` makes the prompt cancel.
    pub fn set_save_as_target(&mut self, target: Option<PathBuf>) {
        self.save_as_target = target;
    }

    /// Canvas-sized transparent buffer with `rect` (x, y, w, h) filled
    pub fn filled_rect(&self, rect: (u32, u32, u32, u32), color: Rgba<u8>) -> RgbaImage {
        let (x0, y0, w, h) = rect;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            if x >= x0 && x < x0.saturating_add(w) && y >= y0 && y < y0.saturating_add(h) {
                color
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    /// Append a node on top of `parent`'s children (or the top-level stack)
    pub fn add_node(
        &mut self,
        parent: Option<MemoryNodeId>,
        name: &str,
        node_type: NodeType,
        pixels: Option<RgbaImage>,
    ) -> MemoryNodeId {
        let id = MemoryNodeId(self.nodes.len());
        self.nodes.push(MemoryNode {
            name: name.to_string(),
            node_type,
            visible: true,
            parent,
            children: Vec::new(),
            pixels,
            removed: false,
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        self.recomposite();
        id
    }

    pub fn add_group(&mut self, parent: Option<MemoryNodeId>, name: &str) -> MemoryNodeId {
        self.add_node(parent, name, NodeType::Group, None)
    }

    pub fn add_paint_layer(
        &mut self,
        parent: Option<MemoryNodeId>,
        name: &str,
        pixels: RgbaImage,
    ) -> MemoryNodeId {
        self.add_node(parent, name, NodeType::Paint, Some(pixels))
    }

    /// Detach a node (and its subtree) from the tree. Later `set_visible`
    /// calls on any of them fail with [`HostError::NodeGone`].
    pub fn remove_node(&mut self, id: MemoryNodeId) {
        match self.nodes[id.0].parent {
            Some(parent) => self.nodes[parent.0].children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let node = &mut self.nodes[next.0];
            node.removed = true;
            pending.extend(node.children.iter().copied());
        }
        self.recomposite();
    }

    /// Make `export_image` fail whenever `id` contributes to the projection
    pub fn fail_exports_while_visible(&mut self, id: MemoryNodeId) {
        self.failing_exports.insert(id);
    }

    /// Visible together with every ancestor
    pub fn is_effectively_visible(&self, id: MemoryNodeId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            let node = &self.nodes[next.0];
            if node.removed || !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Current composite
    pub fn projection(&self) -> &RgbaImage {
        &self.projection
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }

    pub fn export_count(&self) -> usize {
        self.export_count
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// Editing the tree updates the projection, like a live canvas would.
    /// Visibility changes only show up after `refresh_projection`.
    fn recomposite(&mut self) {
        let mut canvas = RgbaImage::new(self.width, self.height);
        self.composite_into(&mut canvas, &self.roots);
        self.projection = canvas;
    }

    fn composite_into(&self, canvas: &mut RgbaImage, ids: &[MemoryNodeId]) {
        for id in ids {
            let node = &self.nodes[id.0];
            if node.removed || !node.visible {
                continue;
            }
            if let Some(ref pixels) = node.pixels {
                imageops::overlay(canvas, pixels, 0, 0);
            }
            self.composite_into(canvas, &node.children);
        }
    }

    fn encode_projection(
        &self,
        format: ImageFormat,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, image::ImageError> {
        let image = if options.alpha && format != ImageFormat::Jpeg {
            DynamicImage::ImageRgba8(self.projection.clone())
        } else {
            DynamicImage::ImageRgb8(flatten_on_white(&self.projection))
        };
        let quality = options.quality.clamp(1, 100);

        let mut buf = Cursor::new(Vec::new());
        match format {
            ImageFormat::Png => image.write_with_encoder(PngEncoder::new(&mut buf))?,
            ImageFormat::Jpeg => {
                image.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?
            }
            ImageFormat::WebP => image.write_with_encoder(WebPEncoder::new_lossless(&mut buf))?,
            ImageFormat::Avif => image.write_with_encoder(AvifEncoder::new_with_speed_quality(
                &mut buf, AVIF_SPEED, quality,
            ))?,
            other => image.write_to(&mut buf, other)?,
        }
        Ok(buf.into_inner())
    }

    fn node(&self, id: MemoryNodeId) -> &MemoryNode {
        &self.nodes[id.0]
    }
}

fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    let mut canvas = RgbaImage::from_pixel(image.width(), image.height(), Rgba([255; 4]));
    imageops::overlay(&mut canvas, image, 0, 0);
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

impl Document for MemoryDocument {
    type NodeId = MemoryNodeId;

    fn file_name(&self) -> Option<PathBuf> {
        self.file_name.clone()
    }

    fn save(&mut self) -> bool {
        if self.file_name.is_none() {
            return false;
        }
        self.save_count += 1;
        true
    }

    fn save_as(&mut self) -> bool {
        match self.save_as_target.clone() {
            Some(target) => {
                self.file_name = Some(target);
                self.save_count += 1;
                true
            }
            None => false,
        }
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn top_level_nodes(&self) -> Vec<MemoryNodeId> {
        self.roots.clone()
    }

    fn export_image(&mut self, path: &Path, options: &ExportOptions) -> bool {
        self.export_count += 1;

        let failing = self
            .failing_exports
            .iter()
            .any(|id| self.is_effectively_visible(*id));
        if failing {
            tracing::debug!("Injected export failure for {:?}", path);
            if let Err(e) = std::fs::write(path, PARTIAL_EXPORT_BYTES) {
                tracing::debug!("Partial export write failed: {}", e);
            }
            return false;
        }

        let format = match ImageFormat::from_path(path) {
            Ok(format) => format,
            Err(e) => {
                tracing::warn!("Unknown export format for {:?}: {}", path, e);
                return false;
            }
        };

        let result = self
            .encode_projection(format, options)
            .map_err(|e| e.to_string())
            .and_then(|bytes| std::fs::write(path, bytes).map_err(|e| e.to_string()));
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Export to {:?} failed: {}", path, e);
                false
            }
        }
    }

    fn refresh_projection(&mut self) {
        self.recomposite();
        self.refresh_count += 1;
    }

    fn batchmode(&self) -> bool {
        self.batchmode
    }

    fn set_batchmode(&mut self, batchmode: bool) {
        self.batchmode = batchmode;
    }

    fn node_name(&self, node: MemoryNodeId) -> String {
        self.node(node).name.clone()
    }

    fn node_type(&self, node: MemoryNodeId) -> NodeType {
        self.node(node).node_type.clone()
    }

    fn child_nodes(&self, node: MemoryNodeId) -> Vec<MemoryNodeId> {
        self.node(node).children.clone()
    }

    fn parent_node(&self, node: MemoryNodeId) -> Option<MemoryNodeId> {
        self.node(node).parent
    }

    fn visible(&self, node: MemoryNodeId) -> bool {
        self.node(node).visible
    }

    fn set_visible(&mut self, node: MemoryNodeId, visible: bool) -> Result<(), HostError> {
        let node = &mut self.nodes[node.0];
        if node.removed {
            return Err(HostError::NodeGone(node.name.clone()));
        }
        node.visible = visible;
        Ok(())
    }
}

/// Application facade over a set of open memory documents
#[derive(Debug, Clone, Default)]
pub struct MemoryApplication {
    documents: Vec<MemoryDocument>,
    active: Option<usize>,
}

impl MemoryApplication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document and make it the active one
    pub fn open(&mut self, document: MemoryDocument) -> usize {
        self.documents.push(document);
        let index = self.documents.len() - 1;
        self.active = Some(index);
        index
    }

    pub fn document(&self, index: usize) -> Option<&MemoryDocument> {
        self.documents.get(index)
    }

    pub fn document_mut(&mut self, index: usize) -> Option<&mut MemoryDocument> {
        self.documents.get_mut(index)
    }

    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|i| *i < self.documents.len());
    }
}

impl Application for MemoryApplication {
    type Document = MemoryDocument;

    fn active_document(&mut self) -> Option<&mut MemoryDocument> {
        let index = self.active?;
        self.documents.get_mut(index)
    }
}
