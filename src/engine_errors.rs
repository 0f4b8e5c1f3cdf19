//! # Engine Error Types Module
//!
//! Error types for the two places where the engine can report a failure:
//! declared configuration (the synonym table) and the external collaborators
//! (file ingestion, forecasting, analysis). Table parsing itself never fails.

/// Errors raised while building a declared synonym table
#[derive(Debug, Clone, PartialEq)]
pub enum SynonymTableError {
    /// The same raw label maps to two different canonical names
    ConflictingEntry {
        raw: String,
        first: String,
        second: String,
    },
    /// A canonical name would itself be rewritten to another name
    NotIdempotent { canonical: String, rewritten: String },
    /// The table file could not be read or decoded
    Load(String),
}

impl std::fmt::Display for SynonymTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynonymTableError::ConflictingEntry { raw, first, second } => write!(
                f,
                "Conflicting synonym entry: '{raw}' maps to both '{first}' and '{second}'"
            ),
            SynonymTableError::NotIdempotent {
                canonical,
                rewritten,
            } => write!(
                f,
                "Canonical name '{canonical}' would be normalized again to '{rewritten}'"
            ),
            SynonymTableError::Load(msg) => write!(f, "Synonym table load error: {msg}"),
        }
    }
}

impl std::error::Error for SynonymTableError {}

/// Errors reported by external collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// Uploaded sales file could not be read or parsed
    Upload(String),
    /// Forecast request failed
    Forecast(String),
    /// Inventory analysis request failed
    Analysis(String),
    /// Collaborator is not configured (e.g. missing API key)
    Configuration(String),
    /// Collaborator did not answer in time
    Timeout(String),
    /// Network or HTTP-level failure
    Transport(String),
    /// Collaborator answered with something that could not be decoded
    InvalidResponse(String),
    /// Another request of the same kind is still outstanding
    Busy(String),
}

impl std::fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollaboratorError::Upload(msg) => write!(f, "Upload error: {msg}"),
            CollaboratorError::Forecast(msg) => write!(f, "Forecast error: {msg}"),
            CollaboratorError::Analysis(msg) => write!(f, "Analysis error: {msg}"),
            CollaboratorError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            CollaboratorError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            CollaboratorError::Transport(msg) => write!(f, "Transport error: {msg}"),
            CollaboratorError::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            CollaboratorError::Busy(msg) => write!(f, "Request already in progress: {msg}"),
        }
    }
}

impl std::error::Error for CollaboratorError {}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CollaboratorError::Timeout(err.to_string())
        } else if err.is_decode() {
            CollaboratorError::InvalidResponse(err.to_string())
        } else {
            CollaboratorError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for CollaboratorError {
    fn from(err: std::io::Error) -> Self {
        CollaboratorError::Upload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_error_display() {
        let err = CollaboratorError::Forecast("empty response".to_string());
        assert_eq!(err.to_string(), "Forecast error: empty response");

        let err = CollaboratorError::Timeout("30s elapsed".to_string());
        assert_eq!(err.to_string(), "Timeout error: 30s elapsed");
    }

    #[test]
    fn test_io_error_maps_to_upload() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(CollaboratorError::from(io), CollaboratorError::Upload(_)));
    }

    #[test]
    fn test_synonym_error_display() {
        let err = SynonymTableError::NotIdempotent {
            canonical: "Chicken".to_string(),
            rewritten: "Poultry".to_string(),
        };
        assert!(err.to_string().contains("'Chicken'"));
        assert!(err.to_string().contains("'Poultry'"));
    }
}
