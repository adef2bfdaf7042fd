//! Editor errors. Every variant means "the operation did not happen".

use thiserror::Error;
use trellis_core::{CodecError, ImportError, NodeId, StyleParseError, ValidationError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Style(#[from] StyleParseError),

    #[error("No element is selected")]
    NothingSelected,

    #[error("{0} does not support inline text editing")]
    NotEditable(NodeId),

    #[error("No inline edit is in progress")]
    NoActiveEdit,

    #[error("Id `{0}` is already in use")]
    DuplicateId(String),

    #[error("`{0}` is reserved for the editor")]
    ReservedAttribute(String),

    #[error("Unknown template `{0}`")]
    UnknownTemplate(String),

    #[error("History snapshot error: {0}")]
    History(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
