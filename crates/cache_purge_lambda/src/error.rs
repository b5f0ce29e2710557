//! Failures of a single purge cycle.
//!
//! Every variant names the step it came from so that log queries can tell a
//! failed metadata rewrite apart from a rejected purge.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurgeError {
    #[error("existence check failed for {bucket}/{key}: {message}")]
    ExistenceCheck {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("metadata update failed for {bucket}/{key}: {message}")]
    MetadataUpdate {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("purge request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("purge of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("purge of {url} returned an unreadable body: {message}")]
    MalformedResponse { url: String, message: String },
}

impl PurgeError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ExistenceCheck { .. } => "existence_check",
            Self::MetadataUpdate { .. } => "metadata_update",
            Self::Transport { .. } => "purge_request",
            Self::Status { .. } => "purge_status",
            Self::MalformedResponse { .. } => "purge_response",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
