/// Message shown when the server gives no usable `message`.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Failure of a client operation. Every variant collapses to one
/// human-readable message through `Display`.
#[derive(Debug)]
pub enum ClientError {
    /// Login rejected by the server.
    Auth(String),
    /// Non-2xx answer to an authenticated call.
    Api { status: u16, message: String },
    /// The request could not complete or its body could not be read.
    Network(String),
    Storage(StorageError),
    /// Bad client settings.
    Config(String),
    /// An authenticated operation was attempted with no session.
    Unauthenticated,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Auth(msg) => f.write_str(msg),
            ClientError::Api { message, .. } => f.write_str(message),
            ClientError::Network(msg) => f.write_str(msg),
            ClientError::Storage(err) => write!(f, "Could not save session: {err}"),
            ClientError::Config(msg) => f.write_str(msg),
            ClientError::Unauthenticated => f.write_str("Please log in first."),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<StorageError> for ClientError {
    fn from(err: StorageError) -> Self {
        ClientError::Storage(err)
    }
}

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "I/O error: {err}"),
            StorageError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Json(err)
    }
}
