use serde::{Deserialize, Serialize};

/// The fixed acknowledgment body returned for every accepted webhook delivery, including events the gateway does not
/// handle. Anything other than this (on a 2xx) makes the processor retry the delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub ok: bool,
}

impl WebhookAck {
    pub fn acknowledged() -> Self {
        Self { ok: true }
    }
}
