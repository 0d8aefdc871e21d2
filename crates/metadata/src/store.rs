//! Metadata store trait and the SQLite implementation.

use crate::error::MetadataResult;
use crate::repos::{AuditRepo, ConsentRepo, InstitutionRepo, ResultRepo, SampleRepo, UserRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore:
    InstitutionRepo + UserRepo + ConsentRepo + SampleRepo + ResultRepo + AuditRepo + Send + Sync
{
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; using a single connection avoids
            // persistent "database is locked" failures under test/axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::debug!("schema migration applied");
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement all the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::error::MetadataError;
    use crate::models::*;
    use crate::repos::{AuditFilter, AuditPage, SampleFilter, SamplePage};
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[async_trait]
    impl InstitutionRepo for SqliteStore {
        async fn create_institution(&self, institution: &InstitutionRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO institutions (
                    institution_id, name, country, irb_approval_number,
                    contact_person, contact_email, data_retention_months, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(institution.institution_id)
            .bind(&institution.name)
            .bind(&institution.country)
            .bind(&institution.irb_approval_number)
            .bind(&institution.contact_person)
            .bind(&institution.contact_email)
            .bind(institution.data_retention_months)
            .bind(institution.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn list_institutions(&self) -> MetadataResult<Vec<InstitutionRow>> {
            let rows = sqlx::query_as::<_, InstitutionRow>(
                "SELECT * FROM institutions ORDER BY name",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn get_institution(
            &self,
            institution_id: Uuid,
        ) -> MetadataResult<Option<InstitutionRow>> {
            let row = sqlx::query_as::<_, InstitutionRow>(
                "SELECT * FROM institutions WHERE institution_id = ?",
            )
            .bind(institution_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn count_institutions(&self) -> MetadataResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM institutions")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }

    #[async_trait]
    impl UserRepo for SqliteStore {
        async fn create_user(&self, user: &UserRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO users (
                    user_id, email, password_hash, role, institution_id,
                    mfa_enabled, is_active, created_at, last_login
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user.user_id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.role)
            .bind(user.institution_id)
            .bind(user.mfa_enabled)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.last_login)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                // The UNIQUE index on email is the authority on duplicates.
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    MetadataError::AlreadyExists(format!(
                        "user email '{}' already exists",
                        user.email
                    ))
                }
                other => MetadataError::from(other),
            })?;
            Ok(())
        }

        async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_user_by_email(&self, email: &str) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn set_last_login(
            &self,
            user_id: Uuid,
            last_login: OffsetDateTime,
        ) -> MetadataResult<()> {
            let result = sqlx::query("UPDATE users SET last_login = ? WHERE user_id = ?")
                .bind(last_login)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "user_id {} not found",
                    user_id
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ConsentRepo for SqliteStore {
        async fn create_consent(&self, consent: &ConsentRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO consent_records (
                    consent_id, user_id, consent_version, data_retention_period,
                    permitted_uses, withdrawal_status, irb_reference, notes,
                    signed_at, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(consent.consent_id)
            .bind(consent.user_id)
            .bind(&consent.consent_version)
            .bind(&consent.data_retention_period)
            .bind(&consent.permitted_uses)
            .bind(&consent.withdrawal_status)
            .bind(&consent.irb_reference)
            .bind(&consent.notes)
            .bind(consent.signed_at)
            .bind(consent.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_consent(&self, consent_id: Uuid) -> MetadataResult<Option<ConsentRow>> {
            let row = sqlx::query_as::<_, ConsentRow>(
                "SELECT * FROM consent_records WHERE consent_id = ?",
            )
            .bind(consent_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn list_consents_for_user(&self, user_id: Uuid) -> MetadataResult<Vec<ConsentRow>> {
            let rows = sqlx::query_as::<_, ConsentRow>(
                "SELECT * FROM consent_records WHERE user_id = ? ORDER BY signed_at DESC",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn set_withdrawal_status(
            &self,
            consent_id: Uuid,
            status: &str,
        ) -> MetadataResult<()> {
            let result =
                sqlx::query("UPDATE consent_records SET withdrawal_status = ? WHERE consent_id = ?")
                    .bind(status)
                    .bind(consent_id)
                    .execute(&self.pool)
                    .await?;
            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "consent_id {} not found",
                    consent_id
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SampleRepo for SqliteStore {
        async fn create_sample(&self, sample: &SampleRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO samples (
                    sample_id, sample_code, participant_id, user_id, institution_id,
                    consent_id, status, population_hint, uploaded_at, processed_at, notes
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(sample.sample_id)
            .bind(&sample.sample_code)
            .bind(&sample.participant_id)
            .bind(sample.user_id)
            .bind(sample.institution_id)
            .bind(sample.consent_id)
            .bind(&sample.status)
            .bind(&sample.population_hint)
            .bind(sample.uploaded_at)
            .bind(sample.processed_at)
            .bind(&sample.notes)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_sample(&self, sample_id: Uuid) -> MetadataResult<Option<SampleRow>> {
            let row = sqlx::query_as::<_, SampleRow>("SELECT * FROM samples WHERE sample_id = ?")
                .bind(sample_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_samples(
            &self,
            institution_id: Uuid,
            filter: &SampleFilter,
        ) -> MetadataResult<SamplePage> {
            let (total, samples) = match filter.status.as_deref() {
                Some(status) => {
                    let total: i64 = sqlx::query_scalar(
                        "SELECT COUNT(*) FROM samples WHERE institution_id = ? AND status = ?",
                    )
                    .bind(institution_id)
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?;

                    let rows = sqlx::query_as::<_, SampleRow>(
                        "SELECT * FROM samples WHERE institution_id = ? AND status = ? \
                         ORDER BY uploaded_at DESC LIMIT ? OFFSET ?",
                    )
                    .bind(institution_id)
                    .bind(status)
                    .bind(filter.limit)
                    .bind(filter.offset)
                    .fetch_all(&self.pool)
                    .await?;
                    (total, rows)
                }
                None => {
                    let total: i64 = sqlx::query_scalar(
                        "SELECT COUNT(*) FROM samples WHERE institution_id = ?",
                    )
                    .bind(institution_id)
                    .fetch_one(&self.pool)
                    .await?;

                    let rows = sqlx::query_as::<_, SampleRow>(
                        "SELECT * FROM samples WHERE institution_id = ? \
                         ORDER BY uploaded_at DESC LIMIT ? OFFSET ?",
                    )
                    .bind(institution_id)
                    .bind(filter.limit)
                    .bind(filter.offset)
                    .fetch_all(&self.pool)
                    .await?;
                    (total, rows)
                }
            };

            Ok(SamplePage {
                samples,
                total: total as u64,
            })
        }

        async fn update_sample_status(
            &self,
            sample_id: Uuid,
            status: &str,
            processed_at: Option<OffsetDateTime>,
        ) -> MetadataResult<()> {
            let result = match processed_at {
                Some(processed_at) => {
                    sqlx::query(
                        "UPDATE samples SET status = ?, processed_at = ? WHERE sample_id = ?",
                    )
                    .bind(status)
                    .bind(processed_at)
                    .bind(sample_id)
                    .execute(&self.pool)
                    .await?
                }
                None => {
                    sqlx::query("UPDATE samples SET status = ? WHERE sample_id = ?")
                        .bind(status)
                        .bind(sample_id)
                        .execute(&self.pool)
                        .await?
                }
            };

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "sample_id {} not found",
                    sample_id
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ResultRepo for SqliteStore {
        async fn insert_ancestry_results(
            &self,
            results: &[AncestryResultRow],
        ) -> MetadataResult<()> {
            // Single transaction so concurrent materialization of the same
            // sample either fully wins or fully loses per row.
            let mut tx = self.pool.begin().await?;
            for result in results {
                sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO ancestry_results (
                        result_id, sample_id, population_group, percentage,
                        confidence_interval_lower, confidence_interval_upper,
                        reference_dataset, reference_sample_size,
                        methodology_version, computed_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(result.result_id)
                .bind(result.sample_id)
                .bind(&result.population_group)
                .bind(result.percentage)
                .bind(result.confidence_interval_lower)
                .bind(result.confidence_interval_upper)
                .bind(&result.reference_dataset)
                .bind(result.reference_sample_size)
                .bind(&result.methodology_version)
                .bind(result.computed_at)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
            Ok(())
        }

        async fn list_ancestry_results(
            &self,
            sample_id: Uuid,
        ) -> MetadataResult<Vec<AncestryResultRow>> {
            let rows = sqlx::query_as::<_, AncestryResultRow>(
                "SELECT * FROM ancestry_results WHERE sample_id = ? ORDER BY percentage DESC",
            )
            .bind(sample_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn insert_health_markers(&self, markers: &[HealthMarkerRow]) -> MetadataResult<()> {
            let mut tx = self.pool.begin().await?;
            for marker in markers {
                sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO health_markers (
                        marker_id, sample_id, gene_name, variant_rsid, chromosome,
                        position, genotype, phenotype, clinical_significance,
                        population_frequency, disclaimer, computed_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(marker.marker_id)
                .bind(marker.sample_id)
                .bind(&marker.gene_name)
                .bind(&marker.variant_rsid)
                .bind(&marker.chromosome)
                .bind(marker.position)
                .bind(&marker.genotype)
                .bind(&marker.phenotype)
                .bind(&marker.clinical_significance)
                .bind(&marker.population_frequency)
                .bind(&marker.disclaimer)
                .bind(marker.computed_at)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
            Ok(())
        }

        async fn list_health_markers(
            &self,
            sample_id: Uuid,
        ) -> MetadataResult<Vec<HealthMarkerRow>> {
            let rows = sqlx::query_as::<_, HealthMarkerRow>(
                "SELECT * FROM health_markers WHERE sample_id = ? ORDER BY gene_name",
            )
            .bind(sample_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }
    }

    #[async_trait]
    impl AuditRepo for SqliteStore {
        async fn append_audit(&self, entry: &AuditLogRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO audit_logs (
                    log_id, user_id, action, resource_accessed, timestamp,
                    ip_address, user_agent, details
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(entry.log_id)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(&entry.resource_accessed)
            .bind(entry.timestamp)
            .bind(&entry.ip_address)
            .bind(&entry.user_agent)
            .bind(&entry.details)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn list_audit_logs(
            &self,
            institution_id: Uuid,
            filter: &AuditFilter,
        ) -> MetadataResult<AuditPage> {
            // Institution scoping goes through the acting users, not the
            // resource: an entry belongs to the institution of whoever acted.
            let (total, logs) = match filter.resource.as_deref() {
                Some(resource) => {
                    let total: i64 = sqlx::query_scalar(
                        "SELECT COUNT(*) FROM audit_logs \
                         WHERE user_id IN (SELECT user_id FROM users WHERE institution_id = ?) \
                           AND resource_accessed = ?",
                    )
                    .bind(institution_id)
                    .bind(resource)
                    .fetch_one(&self.pool)
                    .await?;

                    let rows = sqlx::query_as::<_, AuditLogRow>(
                        "SELECT * FROM audit_logs \
                         WHERE user_id IN (SELECT user_id FROM users WHERE institution_id = ?) \
                           AND resource_accessed = ? \
                         ORDER BY timestamp DESC LIMIT ? OFFSET ?",
                    )
                    .bind(institution_id)
                    .bind(resource)
                    .bind(filter.limit)
                    .bind(filter.offset)
                    .fetch_all(&self.pool)
                    .await?;
                    (total, rows)
                }
                None => {
                    let total: i64 = sqlx::query_scalar(
                        "SELECT COUNT(*) FROM audit_logs \
                         WHERE user_id IN (SELECT user_id FROM users WHERE institution_id = ?)",
                    )
                    .bind(institution_id)
                    .fetch_one(&self.pool)
                    .await?;

                    let rows = sqlx::query_as::<_, AuditLogRow>(
                        "SELECT * FROM audit_logs \
                         WHERE user_id IN (SELECT user_id FROM users WHERE institution_id = ?) \
                         ORDER BY timestamp DESC LIMIT ? OFFSET ?",
                    )
                    .bind(institution_id)
                    .bind(filter.limit)
                    .bind(filter.offset)
                    .fetch_all(&self.pool)
                    .await?;
                    (total, rows)
                }
            };

            Ok(AuditPage {
                logs,
                total: total as u64,
            })
        }
    }
}

const SCHEMA_SQL: &str = r#"
-- Partner institutions
CREATE TABLE IF NOT EXISTS institutions (
    institution_id BLOB PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    country TEXT NOT NULL,
    irb_approval_number TEXT,
    contact_person TEXT,
    contact_email TEXT,
    data_retention_months INTEGER NOT NULL DEFAULT 60,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_institutions_name ON institutions(name);

-- Lab users
CREATE TABLE IF NOT EXISTS users (
    user_id BLOB PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    institution_id BLOB NOT NULL REFERENCES institutions(institution_id),
    mfa_enabled INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    last_login TEXT
);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_users_institution ON users(institution_id);

-- Informed-consent records
CREATE TABLE IF NOT EXISTS consent_records (
    consent_id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL REFERENCES users(user_id),
    consent_version TEXT NOT NULL,
    data_retention_period TEXT NOT NULL,
    permitted_uses TEXT NOT NULL,
    withdrawal_status TEXT NOT NULL DEFAULT 'active',
    irb_reference TEXT,
    notes TEXT,
    signed_at TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_consent_user ON consent_records(user_id);

-- Sample metadata (no genomic payloads)
CREATE TABLE IF NOT EXISTS samples (
    sample_id BLOB PRIMARY KEY,
    sample_code TEXT NOT NULL,
    participant_id TEXT,
    user_id BLOB NOT NULL REFERENCES users(user_id),
    institution_id BLOB NOT NULL REFERENCES institutions(institution_id),
    consent_id BLOB NOT NULL REFERENCES consent_records(consent_id),
    status TEXT NOT NULL DEFAULT 'received',
    population_hint TEXT,
    uploaded_at TEXT NOT NULL,
    processed_at TEXT,
    notes TEXT
);
CREATE INDEX IF NOT EXISTS idx_samples_institution ON samples(institution_id, status);
CREATE INDEX IF NOT EXISTS idx_samples_consent ON samples(consent_id);

-- Ancestry composition rows
CREATE TABLE IF NOT EXISTS ancestry_results (
    result_id BLOB PRIMARY KEY,
    sample_id BLOB NOT NULL REFERENCES samples(sample_id),
    population_group TEXT NOT NULL,
    percentage REAL NOT NULL,
    confidence_interval_lower REAL NOT NULL,
    confidence_interval_upper REAL NOT NULL,
    reference_dataset TEXT NOT NULL,
    reference_sample_size INTEGER NOT NULL,
    methodology_version TEXT NOT NULL,
    computed_at TEXT NOT NULL
);
-- One row per population group per sample; concurrent materialization
-- resolves through INSERT OR IGNORE against this index.
CREATE UNIQUE INDEX IF NOT EXISTS idx_ancestry_sample_population
    ON ancestry_results(sample_id, population_group);

-- Health-relevant gene variants
CREATE TABLE IF NOT EXISTS health_markers (
    marker_id BLOB PRIMARY KEY,
    sample_id BLOB NOT NULL REFERENCES samples(sample_id),
    gene_name TEXT NOT NULL,
    variant_rsid TEXT NOT NULL,
    chromosome TEXT NOT NULL,
    position INTEGER NOT NULL,
    genotype TEXT NOT NULL,
    phenotype TEXT NOT NULL,
    clinical_significance TEXT,
    population_frequency TEXT,
    disclaimer TEXT NOT NULL,
    computed_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_markers_sample_gene_variant
    ON health_markers(sample_id, gene_name, variant_rsid);

-- Append-only audit trail
CREATE TABLE IF NOT EXISTS audit_logs (
    log_id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL,
    action TEXT NOT NULL,
    resource_accessed TEXT,
    timestamp TEXT NOT NULL,
    ip_address TEXT,
    user_agent TEXT,
    details TEXT
);
CREATE INDEX IF NOT EXISTS idx_audit_user_time ON audit_logs(user_id, timestamp);
CREATE INDEX IF NOT EXISTS idx_audit_resource ON audit_logs(resource_accessed);
"#;
