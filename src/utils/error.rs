use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Firestore returned {status}: {message}")]
    StoreError { status: u16, message: String },

    #[error("Unexpected Firestore payload: {message}")]
    DecodeError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl ResultsError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ResultsError::HttpError(_) => "Could not reach the Firestore service".to_string(),
            ResultsError::StoreError { status, .. } if *status == 403 || *status == 401 => {
                "Firestore refused the request (permission denied)".to_string()
            }
            ResultsError::StoreError { status, .. } => {
                format!("Firestore rejected the request (HTTP {})", status)
            }
            ResultsError::DecodeError { .. } | ResultsError::SerializationError(_) => {
                "Firestore answered with data that could not be read".to_string()
            }
            ResultsError::IoError(e) => format!("File access failed: {}", e),
            ResultsError::ConfigValidationError { .. }
            | ResultsError::InvalidConfigValueError { .. }
            | ResultsError::MissingConfigError { .. } => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ResultsError::HttpError(_) => "Check the network connection and the configured endpoint",
            ResultsError::StoreError { status: 401, .. } | ResultsError::StoreError { status: 403, .. } => {
                "Check the API key and the Firestore security rules for the collection"
            }
            ResultsError::StoreError { status: 404, .. } => {
                "Check the project id and database name"
            }
            ResultsError::StoreError { .. } => "Retry later; the service may be unavailable",
            ResultsError::DecodeError { .. } | ResultsError::SerializationError(_) => {
                "Verify that the endpoint points at the Firestore REST API (v1)"
            }
            ResultsError::IoError(_) => "Make sure the file exists and is readable",
            ResultsError::ConfigValidationError { .. }
            | ResultsError::InvalidConfigValueError { .. }
            | ResultsError::MissingConfigError { .. } => {
                "Fix the configuration file or pass --project-id / FIREBASE_PROJECT_ID"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ResultsError>;
