use thiserror::Error;

/// The error type surfaced by [`crate::WebhookFlowApi`]. Backend-specific errors are flattened into strings at this
/// seam so that callers don't need to be generic over the backend's error type.
#[derive(Debug, Clone, Error)]
pub enum WebhookFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
