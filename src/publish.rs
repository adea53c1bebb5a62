//! Best-effort event publishing over NATS
//!
//! Publishing is fire-and-forget: a down or unconfigured bus never fails the
//! request that raised the event.

use crate::domain::DomainEvent;

#[derive(Clone, Default)]
pub struct EventPublisher {
    client: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn new(client: Option<async_nats::Client>) -> Self {
        Self { client }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub async fn publish(&self, event: DomainEvent) {
        let Some(client) = &self.client else {
            return;
        };
        let payload = match serde_json::to_vec(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize domain event");
                return;
            }
        };
        if let Err(e) = client.publish(event.subject(), payload.into()).await {
            tracing::warn!(error = %e, subject = event.subject(), "failed to publish event");
        }
    }
}
