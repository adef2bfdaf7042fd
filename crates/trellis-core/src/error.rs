//! Error types for the document model, codec, and import paths.
//!
//! None of these abort the process. Codec errors are recovered per node or
//! per declaration; import errors abort a load and leave the canvas as it
//! was; validation errors reject a single structural edit.

use crate::id::NodeId;
use thiserror::Error;

/// Errors raised while rebuilding live nodes from canonical ones.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Structural error: unrecognized tag `{tag}`")]
    Structural { tag: String },

    #[error("Style parse error: {0}")]
    StyleParse(#[from] StyleParseError),
}

/// A single malformed inline style declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed declaration `{declaration}`: {reason}")]
pub struct StyleParseError {
    pub declaration: String,
    pub reason: &'static str,
}

/// An unparseable project or markup file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid project JSON: {0}")]
    Json(String),

    #[error("Project is missing a version and carries no legacy markup")]
    UnknownFormat,

    #[error("Markup parse error at byte {offset}: {message}")]
    Markup { offset: usize, message: String },
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        ImportError::Json(e.to_string())
    }
}

/// An illegal structural edit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Cannot move {dragged} into its own descendant {target}")]
    WouldCreateCycle { dragged: NodeId, target: NodeId },

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("The canvas root cannot be moved or deleted")]
    RootImmutable,

    #[error("{0} is not managed by the canvas")]
    Unmanaged(NodeId),
}

pub type ImportResult<T> = Result<T, ImportError>;
