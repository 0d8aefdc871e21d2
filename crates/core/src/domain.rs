//! Domain vocabulary: roles, consent state, sample lifecycle, permitted uses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a lab user holds within their institution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access within the institution, including audit logs.
    LabAdmin,
    /// Uploads samples and reads results.
    Researcher,
    /// Handles physical samples; same data surface as researchers.
    LabTechnician,
    /// Read-only participant (unused by any special-cased check).
    Observer,
}

impl UserRole {
    /// Parse from the stored string form.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "lab_admin" => Ok(Self::LabAdmin),
            "researcher" => Ok(Self::Researcher),
            "lab_technician" => Ok(Self::LabTechnician),
            "observer" => Ok(Self::Observer),
            _ => Err(crate::Error::InvalidRole(s.to_string())),
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LabAdmin => "lab_admin",
            Self::Researcher => "researcher",
            Self::LabTechnician => "lab_technician",
            Self::Observer => "observer",
        }
    }

    /// Whether this role may read the institution's audit trail.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::LabAdmin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Withdrawal state of an informed-consent record.
///
/// Withdrawal is one-way: no operation returns a record to `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    Active,
    Withdrawn,
    Expired,
}

impl ConsentStatus {
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "active" => Ok(Self::Active),
            "withdrawn" => Ok(Self::Withdrawn),
            "expired" => Ok(Self::Expired),
            _ => Err(crate::Error::InvalidStatus(format!("consent status: {s}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Withdrawn => "withdrawn",
            Self::Expired => "expired",
        }
    }

    /// Only `Active` consent permits producing or reading results.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing state of a sample. Transitions only move forward:
/// `Received -> Processing -> ResultsAvailable -> Archived`.
///
/// `Archived` is declared for completeness; no operation currently drives a
/// sample there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStatus {
    Received,
    Processing,
    ResultsAvailable,
    Archived,
}

impl SampleStatus {
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s {
            "received" => Ok(Self::Received),
            "processing" => Ok(Self::Processing),
            "results_available" => Ok(Self::ResultsAvailable),
            "archived" => Ok(Self::Archived),
            _ => Err(crate::Error::InvalidStatus(format!("sample status: {s}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Processing => "processing",
            Self::ResultsAvailable => "results_available",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Uses a participant consented to. Stored as JSON alongside the consent
/// record; the four flags are independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermittedUses {
    pub research: bool,
    pub publication: bool,
    pub secondary_research: bool,
    pub third_party_sharing: bool,
}

impl Default for PermittedUses {
    fn default() -> Self {
        Self {
            research: true,
            publication: true,
            secondary_research: true,
            third_party_sharing: false,
        }
    }
}
