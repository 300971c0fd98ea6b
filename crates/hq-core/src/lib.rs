//! Shared primitives used across Hoverquote crates.

use thiserror::Error;

/// Result alias used across the workspace.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Workspace error carrying a stable dotted code and a readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct PreviewError {
    pub code: &'static str,
    pub message: String,
}

impl PreviewError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PreviewError;

    #[test]
    fn display_joins_code_and_message() {
        let error = PreviewError::new("dom.node_missing", "node 7 does not exist");
        assert_eq!(error.to_string(), "dom.node_missing: node 7 does not exist");
    }
}
