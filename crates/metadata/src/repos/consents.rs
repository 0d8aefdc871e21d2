//! Informed-consent repository.

use crate::error::MetadataResult;
use crate::models::ConsentRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for consent record operations.
#[async_trait]
pub trait ConsentRepo: Send + Sync {
    /// Create a new consent record.
    async fn create_consent(&self, consent: &ConsentRow) -> MetadataResult<()>;

    /// Get a consent record by ID.
    async fn get_consent(&self, consent_id: Uuid) -> MetadataResult<Option<ConsentRow>>;

    /// List consent records for a participant, newest signature first.
    async fn list_consents_for_user(&self, user_id: Uuid) -> MetadataResult<Vec<ConsentRow>>;

    /// Set the withdrawal status of a consent record.
    ///
    /// Returns `NotFound` when the consent does not exist.
    async fn set_withdrawal_status(&self, consent_id: Uuid, status: &str) -> MetadataResult<()>;
}
