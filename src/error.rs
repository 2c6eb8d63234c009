//! Error taxonomy for the requirements pipeline
//!
//! Library code returns [`ReqscribeError`] so callers can tell an empty
//! submission apart from a malformed model reply or a dead network. The CLI
//! layer wraps these in `anyhow` like everything else at the edge.

use crate::session::RequestState;
use std::io;

/// Errors produced while encoding inputs, talking to the generation service,
/// or exporting results
#[derive(Debug, thiserror::Error)]
pub enum ReqscribeError {
    /// Nothing to send: the text is blank and no files are attached
    #[error("Please enter some text or attach at least one file.")]
    InvalidInput,

    /// The service answered, but not with the document we asked for
    #[error("The response from the generation service could not be read: {0}")]
    ResponseParse(String),

    /// Transport failure, non-success status, or timeout
    #[error("Communication with the generation service failed: {0}")]
    Communication(String),

    /// Missing or unusable configuration; fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Failed to read file '{name}': {source}")]
    FileRead {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Cannot move from {from} to {to}")]
    InvalidTransition {
        from: RequestState,
        to: RequestState,
    },

    #[error("Export failed: {0}")]
    Export(String),
}

impl ReqscribeError {
    /// Whether this error should abort startup instead of being shown inline
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type Result<T, E = ReqscribeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(ReqscribeError::Configuration("missing key".to_string()).is_fatal());
        assert!(!ReqscribeError::InvalidInput.is_fatal());
        assert!(!ReqscribeError::Communication("timeout".to_string()).is_fatal());
    }

    #[test]
    fn test_parse_and_communication_messages_differ() {
        let parse = ReqscribeError::ResponseParse("eof".to_string()).to_string();
        let comm = ReqscribeError::Communication("eof".to_string()).to_string();
        assert_ne!(parse, comm);
        assert!(parse.contains("could not be read"));
        assert!(comm.contains("Communication"));
    }
}
