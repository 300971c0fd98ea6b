//! Fetch failure taxonomy.

use thiserror::Error;

/// Transport or decode failure for one API request.
///
/// Absence of an entity is not an error; resolvers report it as an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request to `{path}` failed: {message}")]
    Transport { path: String, message: String },

    #[error("request to `{path}` returned status {status}")]
    Status { path: String, status: u16 },

    #[error("response from `{path}` could not be decoded: {message}")]
    Decode { path: String, message: String },

    #[error("request to `{path}` was cancelled")]
    Cancelled { path: String },
}

impl FetchError {
    pub fn decode(path: &str, error: &serde_json::Error) -> Self {
        Self::Decode {
            path: path.to_owned(),
            message: error.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Transport { path, .. }
            | Self::Status { path, .. }
            | Self::Decode { path, .. }
            | Self::Cancelled { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FetchError;

    #[test]
    fn decode_errors_keep_path_and_reason() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let Err(error) = parse else {
            panic!("malformed JSON should not parse");
        };
        let error = FetchError::decode("/api/1.0/boards/meta/", &error);
        assert_eq!(error.path(), "/api/1.0/boards/meta/");
        assert!(error.to_string().starts_with("response from `/api/1.0/boards/meta/`"));
    }

    #[test]
    fn status_errors_render_code() {
        let error = FetchError::Status {
            path: "/api/1.0/topics/1/".to_owned(),
            status: 502,
        };
        assert_eq!(
            error.to_string(),
            "request to `/api/1.0/topics/1/` returned status 502"
        );
    }
}
