//! Error type shared by every resource client.

use std::fmt;

use crate::resource::ResourceId;

/// Error returned by [`ResourceClient`](crate::ResourceClient) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Network failure, undecodable body, or a non-2xx status not otherwise classified.
    Transport(String),
    /// The server has no record with this id.
    NotFound { collection: String, id: ResourceId },
    /// The server (or the local backend) rejected the payload.
    Validation(String),
}

impl ClientError {
    pub fn not_found(collection: &str, id: ResourceId) -> Self {
        ClientError::NotFound {
            collection: collection.to_string(),
            id,
        }
    }

    /// Human-readable detail without the variant prefix.
    ///
    /// This is what the dashboard store surfaces in `StoreStatus::Error`.
    pub fn message(&self) -> String {
        match self {
            ClientError::Transport(msg) | ClientError::Validation(msg) => msg.clone(),
            ClientError::NotFound { collection, id } => format!("{}/{} not found", collection, id),
        }
    }

    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ClientError::Transport(_) => 502,
            ClientError::NotFound { .. } => 404,
            ClientError::Validation(_) => 422,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "transport error: {}", msg),
            ClientError::NotFound { collection, id } => {
                write!(f, "not found: {}/{}", collection, id)
            }
            ClientError::Validation(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Transport(format!("decode failed: {}", err))
    }
}
