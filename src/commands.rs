//! User-invoked commands - the glue between the host menu and the exporters

use crate::core::{ExportError, ExportSettings};
use crate::export::{export_layer_zip, multi_export};
use crate::host::{Application, Document};
use serde::Serialize;
use std::path::PathBuf;

pub const MULTI_EXPORT: &str = "multi_export";
pub const EXPORT_LAYER_ZIP: &str = "export_layer_zip";

/// Menu entry registered with the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub menu: &'static str,
}

pub const COMMANDS: [CommandSpec; 2] = [
    CommandSpec {
        id: MULTI_EXPORT,
        label: "Multi Export (PNG, JPG, WebP, AVIF)",
        menu: "tools/scripts",
    },
    CommandSpec {
        id: EXPORT_LAYER_ZIP,
        label: "Export as LayerZip",
        menu: "tools/scripts",
    },
];

/// Why a command did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    NoActiveDocument,
    SaveCancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Files written by the command
    Exported(Vec<PathBuf>),
    Skipped(SkipReason),
}

/// Runs the registered commands against the host's active document
pub struct CommandDispatcher<A: Application> {
    app: A,
    settings: ExportSettings,
}

impl<A: Application> CommandDispatcher<A> {
    pub fn new(app: A) -> Self {
        Self::with_settings(app, ExportSettings::default())
    }

    pub fn with_settings(app: A, settings: ExportSettings) -> Self {
        Self { app, settings }
    }

    pub fn commands(&self) -> &'static [CommandSpec] {
        &COMMANDS
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Run the command registered as `id`.
    ///
    /// A missing document or a cancelled save prompt is not an error; the
    /// command is skipped silently.
    pub fn invoke(&mut self, id: &str) -> Result<CommandOutcome, ExportError> {
        if !COMMANDS.iter().any(|c| c.id == id) {
            return Err(ExportError::UnknownCommand(id.to_string()));
        }
        tracing::info!("Running command '{}'", id);

        let result = self.run(id);
        match result {
            Err(ExportError::NoActiveDocument) => {
                tracing::debug!("'{}' skipped: no active document", id);
                Ok(CommandOutcome::Skipped(SkipReason::NoActiveDocument))
            }
            Err(ExportError::SaveCancelled) => {
                tracing::debug!("'{}' skipped: save cancelled", id);
                Ok(CommandOutcome::Skipped(SkipReason::SaveCancelled))
            }
            Err(e) => {
                tracing::error!("'{}' failed: {}", id, e);
                Err(e)
            }
            Ok(paths) => Ok(CommandOutcome::Exported(paths)),
        }
    }

    fn run(&mut self, id: &str) -> Result<Vec<PathBuf>, ExportError> {
        let doc = self
            .app
            .active_document()
            .ok_or(ExportError::NoActiveDocument)?;
        ensure_saved(doc)?;

        let previous_batchmode = doc.batchmode();
        doc.set_batchmode(true);
        let result = match id {
            MULTI_EXPORT => multi_export(doc, &self.settings),
            _ => export_layer_zip(doc, &self.settings).map(|path| vec![path]),
        };
        doc.set_batchmode(previous_batchmode);
        result
    }
}

/// Prompt for a file name if the document was never saved, then save it
fn ensure_saved<D: Document>(doc: &mut D) -> Result<(), ExportError> {
    if doc.file_name().is_none() {
        doc.save_as();
        if doc.file_name().is_none() {
            return Err(ExportError::SaveCancelled);
        }
    }

    if !doc.save() {
        tracing::warn!("Saving {:?} failed, exporting anyway", doc.file_name());
    }
    Ok(())
}
