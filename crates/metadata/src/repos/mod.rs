//! Repository traits for metadata operations.

pub mod audit;
pub mod consents;
pub mod institutions;
pub mod results;
pub mod samples;
pub mod users;

pub use audit::{AuditFilter, AuditPage, AuditRepo};
pub use consents::ConsentRepo;
pub use institutions::InstitutionRepo;
pub use results::ResultRepo;
pub use samples::{SampleFilter, SamplePage, SampleRepo};
pub use users::UserRepo;
