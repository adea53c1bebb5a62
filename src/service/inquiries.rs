//! Contact / preorder inquiry intake and back-office handling

use chrono::Utc;
use uuid::Uuid;

use crate::domain::events::DomainEvent;
use crate::domain::{Inquiry, InquiryResponse, InquiryStatus, InquiryType};
use crate::publish::EventPublisher;
use crate::service::SharedStore;
use crate::store::{InquiryFilter, InquiryStats, Page, PageRequest};
use crate::{Error, Result};

/// Public submission payload; everything but phone, type and the preorder
/// fields is required.
#[derive(Clone, Debug)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub inquiry_type: Option<InquiryType>,
    pub product_id: Option<Uuid>,
    pub quantity: Option<i64>,
}

#[derive(Clone)]
pub struct InquiryService {
    store: SharedStore,
    events: EventPublisher,
}

impl InquiryService {
    pub fn new(store: SharedStore, events: EventPublisher) -> Self {
        Self { store, events }
    }

    pub async fn submit(&self, submission: Submission) -> Result<Inquiry> {
        for (field, value) in [
            ("name", &submission.name),
            ("email", &submission.email),
            ("subject", &submission.subject),
            ("message", &submission.message),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(format!(
                    "name, email, subject, and message are required (missing {field})"
                )));
            }
        }
        let inquiry = Inquiry::submit(
            submission.name,
            submission.email,
            submission.phone,
            submission.subject,
            submission.message,
            submission.inquiry_type.unwrap_or_default(),
            submission.product_id,
            submission.quantity,
        );
        let inquiry = self.store.insert_inquiry(inquiry).await?;
        self.events
            .publish(DomainEvent::InquiryReceived {
                inquiry_id: inquiry.id,
                inquiry_type: inquiry.inquiry_type.as_str().to_string(),
            })
            .await;
        Ok(inquiry)
    }

    pub async fn get(&self, id: Uuid) -> Result<Inquiry> {
        self.store
            .inquiry(id)
            .await?
            .ok_or(Error::NotFound("contact inquiry"))
    }

    pub async fn list(&self, filter: &InquiryFilter, page: PageRequest) -> Result<Page<Inquiry>> {
        self.store.list_inquiries(filter, page).await
    }

    pub async fn update_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry> {
        self.store.set_inquiry_status(id, status).await
    }

    /// Attaches a staff reply and marks the inquiry replied.
    pub async fn respond(&self, id: Uuid, responder: Uuid, message: String) -> Result<Inquiry> {
        if message.trim().is_empty() {
            return Err(Error::validation("response message is required"));
        }
        self.store
            .set_inquiry_response(
                id,
                InquiryResponse {
                    message,
                    responded_by: responder,
                    responded_at: Utc::now(),
                },
            )
            .await
    }

    /// Reassigns without touching status.
    pub async fn assign(&self, id: Uuid, assignee: Option<Uuid>) -> Result<Inquiry> {
        self.store.assign_inquiry(id, assignee).await
    }

    pub async fn stats(&self) -> Result<InquiryStats> {
        self.store.inquiry_stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InquiryStore, MemoryStore};
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStore>, InquiryService) {
        let store = Arc::new(MemoryStore::new());
        let service = InquiryService::new(store.clone(), EventPublisher::disabled());
        (store, service)
    }

    fn submission() -> Submission {
        Submission {
            name: "Meera".into(),
            email: "meera@example.com".into(),
            phone: Some("+91 98765 43210".into()),
            subject: "Bulk zari pricing".into(),
            message: "Looking for 200 units of golden zari.".into(),
            inquiry_type: None,
            product_id: None,
            quantity: None,
        }
    }

    #[tokio::test]
    async fn test_missing_email_rejected_and_not_persisted() {
        let (store, service) = setup();
        let err = service
            .submit(Submission { email: "  ".into(), ..submission() })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let all = store
            .list_inquiries(&InquiryFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total, 0);
    }

    #[tokio::test]
    async fn test_submit_defaults() {
        let (_, service) = setup();
        let inquiry = service.submit(submission()).await.unwrap();
        assert_eq!(inquiry.status, InquiryStatus::New);
        assert_eq!(inquiry.inquiry_type, InquiryType::General);
    }

    #[tokio::test]
    async fn test_respond_sets_replied_with_timestamp() {
        let (_, service) = setup();
        let inquiry = service.submit(submission()).await.unwrap();
        let responder = Uuid::now_v7();
        let replied = service
            .respond(inquiry.id, responder, "Quote attached.".into())
            .await
            .unwrap();
        assert_eq!(replied.status, InquiryStatus::Replied);
        let response = replied.response.unwrap();
        assert_eq!(response.responded_by, responder);
    }

    #[tokio::test]
    async fn test_respond_to_missing_inquiry() {
        let (_, service) = setup();
        assert!(matches!(
            service
                .respond(Uuid::now_v7(), Uuid::now_v7(), "hi".into())
                .await
                .unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_assign_keeps_status() {
        let (_, service) = setup();
        let inquiry = service.submit(submission()).await.unwrap();
        let assignee = Uuid::now_v7();
        let assigned = service.assign(inquiry.id, Some(assignee)).await.unwrap();
        assert_eq!(assigned.assigned_to, Some(assignee));
        assert_eq!(assigned.status, InquiryStatus::New);
    }

    #[tokio::test]
    async fn test_stats_counts_by_status() {
        let (_, service) = setup();
        let a = service.submit(submission()).await.unwrap();
        service.submit(submission()).await.unwrap();
        service
            .respond(a.id, Uuid::now_v7(), "done".into())
            .await
            .unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_contacts, 2);
        assert_eq!(stats.new_contacts, 1);
        assert_eq!(stats.replied_contacts, 1);
    }
}
