//! Demonstration data seeding.
//!
//! Runs once against an empty database: five partner institutions, seven lab
//! users (all with the password `demo_password_123`), an active consent
//! record per user, and eight processed samples with materialized results.

use crate::error::{ApiError, ApiResult};
use crate::workflow::{build_ancestry_rows, build_marker_rows};
use helix_core::domain::{ConsentStatus, PermittedUses, SampleStatus, UserRole};
use helix_core::password::hash_password;
use helix_metadata::MetadataStore;
use helix_metadata::models::{ConsentRow, InstitutionRow, SampleRow, UserRow};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Password shared by every seeded demo account.
pub const DEMO_PASSWORD: &str = "demo_password_123";

struct InstitutionSeed {
    name: &'static str,
    country: &'static str,
    irb_approval_number: &'static str,
    contact_person: &'static str,
    contact_email: &'static str,
}

const INSTITUTIONS: [InstitutionSeed; 5] = [
    InstitutionSeed {
        name: "Kenyatta National Hospital",
        country: "Kenya",
        irb_approval_number: "KNH-IRB-2024-156",
        contact_person: "Dr. Jane Kimani",
        contact_email: "j.kimani@knh.org",
    },
    InstitutionSeed {
        name: "College of Medicine Makerere University",
        country: "Uganda",
        irb_approval_number: "COMU-IRB-2024-089",
        contact_person: "Prof. William Kasomo",
        contact_email: "w.kasomo@makerere.ac.ug",
    },
    InstitutionSeed {
        name: "University of Lagos Medical Research Centre",
        country: "Nigeria",
        irb_approval_number: "UNILAG-IRB-2024-203",
        contact_person: "Dr. Oluwaseun Adeyemi",
        contact_email: "oadeyemi@unilag.edu.ng",
    },
    InstitutionSeed {
        name: "University of Addis Ababa Institute of Genetics",
        country: "Ethiopia",
        irb_approval_number: "UOAA-IRB-2024-067",
        contact_person: "Dr. Desta Hailu",
        contact_email: "d.hailu@addisababa.edu.et",
    },
    InstitutionSeed {
        name: "Stellenbosch University Medical School",
        country: "South Africa",
        irb_approval_number: "SUN-IRB-2024-134",
        contact_person: "Prof. Thabo Mthembu",
        contact_email: "t.mthembu@sun.ac.za",
    },
];

struct UserSeed {
    email: &'static str,
    role: UserRole,
    institution: usize,
}

const USERS: [UserSeed; 7] = [
    UserSeed {
        email: "jane.kimani@knh.org",
        role: UserRole::LabAdmin,
        institution: 0,
    },
    UserSeed {
        email: "david.kipchoge@knh.org",
        role: UserRole::Researcher,
        institution: 0,
    },
    UserSeed {
        email: "moses.owuor@knh.org",
        role: UserRole::LabTechnician,
        institution: 0,
    },
    UserSeed {
        email: "william.kasomo@makerere.ac.ug",
        role: UserRole::LabAdmin,
        institution: 1,
    },
    UserSeed {
        email: "oluwaseun.adeyemi@unilag.edu.ng",
        role: UserRole::Researcher,
        institution: 2,
    },
    UserSeed {
        email: "desta.hailu@addisababa.edu.et",
        role: UserRole::Researcher,
        institution: 3,
    },
    UserSeed {
        email: "thabo.mthembu@sun.ac.za",
        role: UserRole::LabAdmin,
        institution: 4,
    },
];

struct SampleSeed {
    sample_code: &'static str,
    participant_id: &'static str,
    owner_email: &'static str,
    population_hint: &'static str,
}

const SAMPLES: [SampleSeed; 8] = [
    SampleSeed {
        sample_code: "KEN-2024-00523",
        participant_id: "P20240523",
        owner_email: "jane.kimani@knh.org",
        population_hint: "Kikuyu",
    },
    SampleSeed {
        sample_code: "KEN-2024-00524",
        participant_id: "P20240524",
        owner_email: "jane.kimani@knh.org",
        population_hint: "Luhya",
    },
    SampleSeed {
        sample_code: "KEN-2024-00525",
        participant_id: "P20240525",
        owner_email: "david.kipchoge@knh.org",
        population_hint: "Maasai",
    },
    SampleSeed {
        sample_code: "UGA-2024-00234",
        participant_id: "P20240234",
        owner_email: "william.kasomo@makerere.ac.ug",
        population_hint: "Luganda",
    },
    SampleSeed {
        sample_code: "NGA-2024-01245",
        participant_id: "P20240245",
        owner_email: "oluwaseun.adeyemi@unilag.edu.ng",
        population_hint: "Yoruba",
    },
    SampleSeed {
        sample_code: "NGA-2024-01246",
        participant_id: "P20240246",
        owner_email: "oluwaseun.adeyemi@unilag.edu.ng",
        population_hint: "Igbo",
    },
    SampleSeed {
        sample_code: "ETH-2024-00567",
        participant_id: "P20240567",
        owner_email: "desta.hailu@addisababa.edu.et",
        population_hint: "Amhara",
    },
    SampleSeed {
        sample_code: "ZAF-2024-00892",
        participant_id: "P20240892",
        owner_email: "thabo.mthembu@sun.ac.za",
        population_hint: "Zulu",
    },
];

/// Populate an empty database with the demonstration dataset.
pub async fn seed_demo_data(metadata: &dyn MetadataStore) -> ApiResult<()> {
    let now = OffsetDateTime::now_utc();

    let mut institution_ids = Vec::with_capacity(INSTITUTIONS.len());
    for seed in &INSTITUTIONS {
        let row = InstitutionRow {
            institution_id: Uuid::new_v4(),
            name: seed.name.to_string(),
            country: seed.country.to_string(),
            irb_approval_number: Some(seed.irb_approval_number.to_string()),
            contact_person: Some(seed.contact_person.to_string()),
            contact_email: Some(seed.contact_email.to_string()),
            data_retention_months: 60,
            created_at: now,
        };
        metadata.create_institution(&row).await?;
        institution_ids.push(row.institution_id);
    }

    // One shared hash: hashing is deliberately slow, and every demo account
    // uses the same password.
    let password_hash = hash_password(DEMO_PASSWORD)?;
    let permitted_uses = serde_json::to_string(&PermittedUses::default())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    // email -> (user_id, institution_id, consent_id)
    let mut accounts = Vec::with_capacity(USERS.len());
    for seed in &USERS {
        let user = UserRow {
            user_id: Uuid::new_v4(),
            email: seed.email.to_string(),
            password_hash: password_hash.clone(),
            role: seed.role.as_str().to_string(),
            institution_id: institution_ids[seed.institution],
            mfa_enabled: false,
            is_active: true,
            created_at: now,
            last_login: None,
        };
        metadata.create_user(&user).await?;

        let consent = ConsentRow {
            consent_id: Uuid::new_v4(),
            user_id: user.user_id,
            consent_version: "2.1".to_string(),
            data_retention_period: "60 months".to_string(),
            permitted_uses: permitted_uses.clone(),
            withdrawal_status: ConsentStatus::Active.as_str().to_string(),
            irb_reference: Some("IRB-2024-XXXXX".to_string()),
            notes: None,
            signed_at: now - Duration::days(90),
            created_at: now,
        };
        metadata.create_consent(&consent).await?;

        accounts.push((seed.email, user.user_id, user.institution_id, consent.consent_id));
    }

    let uploaded_at = now - Duration::days(30);
    let processed_at = now - Duration::days(25);
    for seed in &SAMPLES {
        let (_, user_id, institution_id, consent_id) = *accounts
            .iter()
            .find(|(email, ..)| *email == seed.owner_email)
            .ok_or_else(|| ApiError::Internal(format!("unknown seed owner {}", seed.owner_email)))?;

        let sample = SampleRow {
            sample_id: Uuid::new_v4(),
            sample_code: seed.sample_code.to_string(),
            participant_id: Some(seed.participant_id.to_string()),
            user_id,
            institution_id,
            consent_id,
            status: SampleStatus::ResultsAvailable.as_str().to_string(),
            population_hint: Some(seed.population_hint.to_string()),
            uploaded_at,
            processed_at: Some(processed_at),
            notes: Some(format!(
                "Sample from {} population cohort",
                seed.population_hint
            )),
        };
        metadata.create_sample(&sample).await?;
        metadata
            .insert_ancestry_results(&build_ancestry_rows(&sample, processed_at))
            .await?;
        metadata
            .insert_health_markers(&build_marker_rows(&sample, processed_at))
            .await?;
    }

    tracing::info!(
        institutions = INSTITUTIONS.len(),
        users = USERS.len(),
        samples = SAMPLES.len(),
        "seeded demonstration data"
    );
    Ok(())
}
