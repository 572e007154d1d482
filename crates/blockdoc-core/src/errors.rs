use thiserror::Error;

/// Result type alias using BlockDocError
pub type Result<T> = std::result::Result<T, BlockDocError>;

/// Comprehensive error taxonomy for blockdoc operations
///
/// Structural command failures (`BlockNotFound`) propagate to the immediate
/// caller: they indicate a programming or usage error, and the operation
/// aborts with no partial mutation. Content-interpretation failures
/// (`ParseFailure`) are recovered inside the ingestion pipeline by falling
/// back to plain-text insertion; they never surface to the end user.
///
/// A malformed numbered-list index is deliberately *not* an error: the index
/// parser is total and defaults to 1, so a corrupt attribute can never abort
/// a renumbering pass. An unrecognized clipboard format is likewise not an
/// error but an explicit no-op paste outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockDocError {
    /// Referenced block id is absent from the document
    #[error("Block not found: {block_id}")]
    BlockNotFound { block_id: String },

    /// Raw position does not fall inside any block container
    #[error("Position {position} is outside any block")]
    PositionOutsideBlock { position: u64 },

    /// External content could not be interpreted (Markdown, HTML, metadata)
    #[error("{format} parse failure: {message}")]
    ParseFailure { format: String, message: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error (structural invariant breach)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BlockDocError {
    /// Get the stable error code for this error
    ///
    /// Codes are stable identifiers for programmatic error handling,
    /// testing, and log assertions.
    pub fn code(&self) -> &'static str {
        match self {
            BlockDocError::BlockNotFound { .. } => "ERR_BLOCK_NOT_FOUND",
            BlockDocError::PositionOutsideBlock { .. } => "ERR_POSITION_OUTSIDE_BLOCK",
            BlockDocError::ParseFailure { .. } => "ERR_PARSE_FAILURE",
            BlockDocError::Serialization { .. } => "ERR_SERIALIZATION",
            BlockDocError::Internal { .. } => "ERR_INTERNAL",
        }
    }

    /// Shorthand for an internal invariant breach
    pub fn internal(message: impl Into<String>) -> Self {
        BlockDocError::Internal {
            message: message.into(),
        }
    }
}

/// Conversion from serde_json::Error to BlockDocError
impl From<serde_json::Error> for BlockDocError {
    fn from(err: serde_json::Error) -> Self {
        BlockDocError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        let cases = [
            (
                BlockDocError::BlockNotFound {
                    block_id: "b1".to_string(),
                },
                "ERR_BLOCK_NOT_FOUND",
            ),
            (
                BlockDocError::PositionOutsideBlock { position: 7 },
                "ERR_POSITION_OUTSIDE_BLOCK",
            ),
            (
                BlockDocError::ParseFailure {
                    format: "markdown".to_string(),
                    message: "bad".to_string(),
                },
                "ERR_PARSE_FAILURE",
            ),
        ];
        for (err, expected_code) in cases {
            assert_eq!(err.code(), expected_code, "Wrong code for {:?}", err);
        }
    }

    #[test]
    fn test_display_includes_block_id() {
        let err = BlockDocError::BlockNotFound {
            block_id: "b-42".to_string(),
        };
        assert!(err.to_string().contains("b-42"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: BlockDocError = json_err.into();
        assert!(matches!(err, BlockDocError::Serialization { .. }));
    }
}
