use crate::host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No active document")]
    NoActiveDocument,

    #[error("Save cancelled")]
    SaveCancelled,

    #[error("Failed to export layer '{name}'")]
    LayerExportFailed { name: String },

    #[error("Layer tree deeper than {depth} levels")]
    DepthLimitExceeded { depth: usize },

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ExportError> for String {
    fn from(e: ExportError) -> Self {
        e.to_string()
    }
}

impl From<tempfile::PersistError> for ExportError {
    fn from(e: tempfile::PersistError) -> Self {
        ExportError::Io(e.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_export_failed_names_the_layer() {
        let message: String = ExportError::LayerExportFailed {
            name: "Ink [final]".to_string(),
        }
        .into();
        assert_eq!(message, "Failed to export layer 'Ink [final]'");
    }
}
