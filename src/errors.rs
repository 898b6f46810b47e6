//! Error types for schema compilation and transcoding.

use thiserror::Error;

/// Errors produced when compiling a record into a [crate::schema::Schema].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field's kind cannot be determined and no directive resolves it.
    #[error("field `{field}`: kind cannot be classified")]
    UnclassifiableKind { field: &'static str },
    /// An integer field carries a `size` directive of 0 or more than 8 bytes.
    #[error("field `{field}`: unsupported wire width {width}")]
    UnsupportedWidth { field: &'static str, width: usize },
}

/// Errors produced by [crate::transcoder::Transcoder::encode].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Remaining capacity is smaller than the next field's wire length.
    /// `written` counts the bytes written before the offending field; no
    /// byte of the offending field itself is written.
    #[error("buffer too small for field `{field}` after {written} bytes")]
    BufferTooSmall { field: &'static str, written: usize },
}

impl EncodeError {
    pub(crate) fn advanced_by(self, n: usize) -> Self {
        match self {
            EncodeError::BufferTooSmall { field, written } => {
                EncodeError::BufferTooSmall { field, written: written + n }
            }
        }
    }
}

/// Errors produced by [crate::transcoder::Transcoder::decode].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Remaining input is shorter than the next field requires, or a
    /// variable-width string has no terminator before the end of input.
    /// `consumed` counts the bytes consumed before the offending field.
    #[error("unexpected end of input at field `{field}` after {consumed} bytes")]
    UnexpectedEnd { field: &'static str, consumed: usize },
}

impl DecodeError {
    pub(crate) fn advanced_by(self, n: usize) -> Self {
        match self {
            DecodeError::UnexpectedEnd { field, consumed } => {
                DecodeError::UnexpectedEnd { field, consumed: consumed + n }
            }
        }
    }
}
