//! Audit trail repository.

use crate::error::MetadataResult;
use crate::models::AuditLogRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Filter for audit log listings.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Restrict to entries touching one resource (e.g. a sample id).
    pub resource: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

/// One page of audit entries plus the unpaged total.
#[derive(Debug, Clone)]
pub struct AuditPage {
    pub logs: Vec<AuditLogRow>,
    pub total: u64,
}

/// Repository for the append-only audit trail. Entries are never updated
/// or deleted.
#[async_trait]
pub trait AuditRepo: Send + Sync {
    /// Append an audit entry.
    async fn append_audit(&self, entry: &AuditLogRow) -> MetadataResult<()>;

    /// List entries recorded by users of an institution, newest first.
    async fn list_audit_logs(
        &self,
        institution_id: Uuid,
        filter: &AuditFilter,
    ) -> MetadataResult<AuditPage>;
}
