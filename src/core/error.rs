use thiserror::Error;

use super::image::MAX_UPLOAD_BYTES;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("API key not configured. Set GEMINI_API_KEY environment variable or run: foto key connect")]
    MissingApiKey,

    #[error("API error: {message}")]
    Api {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("File is too large ({size} bytes). Please pick an image of at most {MAX_UPLOAD_BYTES} bytes (5 MiB)")]
    FileTooLarge { size: u64 },

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Heuristic for API failures that usually mean the key is bad or was
    /// never picked, so the surfaces can suggest re-running key selection.
    /// Purely a display hint; callers still get the original failure.
    pub fn is_credential_error(&self) -> bool {
        match self {
            StudioError::MissingApiKey => true,
            StudioError::Api { message, .. } => {
                message.contains("API key")
                    || message.contains("API_KEY")
                    || message.contains("Requested entity was not found")
                    || message.contains("PERMISSION_DENIED")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        StudioError::Api {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_are_recognized() {
        assert!(StudioError::MissingApiKey.is_credential_error());

        let api = StudioError::Api {
            message: "Requested entity was not found.".into(),
            source: None,
        };
        assert!(api.is_credential_error());

        let api = StudioError::Api {
            message: "API key not valid. Please pass a valid API key.".into(),
            source: None,
        };
        assert!(api.is_credential_error());

        let quota = StudioError::Api {
            message: "Resource has been exhausted".into(),
            source: None,
        };
        assert!(!quota.is_credential_error());

        assert!(!StudioError::InvalidDataUri("nope".into()).is_credential_error());
    }

    #[test]
    fn file_too_large_names_the_limit() {
        let err = StudioError::FileTooLarge { size: 5_242_881 };
        let msg = err.to_string();
        assert!(msg.contains("too large"));
        assert!(msg.contains("5 MiB"));
    }
}
