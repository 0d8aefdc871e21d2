//! Static lookup tables backing result materialization.
//!
//! Results in this portal are demonstrative, not computed from genomic data.
//! A sample's `population_hint` selects an ancestry composition profile and a
//! set of health-marker calls from these tables; unknown or absent hints fall
//! back to a generic profile. The tables are immutable, so materializing the
//! same sample twice always produces the same rows.

/// Reference panel name recorded on every ancestry row.
pub const REFERENCE_DATASET: &str = "1KG-African-2023";

/// Reference panel size recorded on every ancestry row.
pub const REFERENCE_SAMPLE_SIZE: i64 = 2847;

/// Methodology tag recorded on every ancestry row.
pub const METHODOLOGY_VERSION: &str = "PCA v2.1";

/// Methodology description in the results response.
pub const METHODOLOGY: &str =
    "PCA-based ancestry inference with admixture modeling (STRUCTURE-like)";

/// Limitations note in the results response.
pub const LIMITATIONS: &str = "Confidence intervals reflect 95% CI from reference dataset. \
     Limited availability of some rare populations. \
     Ancestry inference assumes recent divergence.";

/// Confidence-interval note in the results response.
pub const CONFIDENCE_NOTE: &str =
    "95% CI based on reference dataset sample sizes (range: 150-2847 samples per population)";

/// Top-level disclaimer in the results response.
pub const RESULTS_DISCLAIMER: &str = "Results are for research use only. Not diagnostic. \
     Consult medical professionals for clinical interpretation.";

/// Disclaimer recorded on every health-marker row.
pub const MARKER_DISCLAIMER: &str = "For research use only. Not diagnostic. \
     Phenotype prediction has error rates. \
     Consult genetic counselor for clinical interpretation.";

/// One population component of an ancestry composition profile.
#[derive(Debug, Clone, Copy)]
pub struct AncestryComponent {
    pub population_group: &'static str,
    pub percentage: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// One health-marker call.
#[derive(Debug, Clone, Copy)]
pub struct MarkerProfile {
    pub gene_name: &'static str,
    pub variant_rsid: &'static str,
    pub chromosome: &'static str,
    pub position: i64,
    pub genotype: &'static str,
    pub phenotype: &'static str,
    pub clinical_significance: &'static str,
    /// JSON map of region to allele frequency.
    pub population_frequency: &'static str,
}

const fn component(
    population_group: &'static str,
    percentage: f64,
    ci_lower: f64,
    ci_upper: f64,
) -> AncestryComponent {
    AncestryComponent {
        population_group,
        percentage,
        ci_lower,
        ci_upper,
    }
}

/// Fallback composition for samples with no recognized population hint.
const DEFAULT_ANCESTRY: [AncestryComponent; 3] = [
    component("Bantu", 85.0, 78.0, 92.0),
    component("Nilotic", 12.0, 7.0, 18.0),
    component("North African", 3.0, 1.0, 8.0),
];

const KIKUYU_ANCESTRY: [AncestryComponent; 3] = [
    component("Bantu", 92.0, 87.0, 96.0),
    component("Nilotic", 7.0, 3.0, 12.0),
    component("North African", 1.0, 0.0, 5.0),
];

const LUHYA_ANCESTRY: [AncestryComponent; 3] = [
    component("Bantu", 88.0, 82.0, 93.0),
    component("Nilotic", 10.0, 5.0, 16.0),
    component("North African", 2.0, 0.0, 6.0),
];

const MAASAI_ANCESTRY: [AncestryComponent; 3] = [
    component("Nilotic", 78.0, 71.0, 85.0),
    component("Bantu", 18.0, 12.0, 24.0),
    component("Cushitic", 4.0, 1.0, 9.0),
];

const LUGANDA_ANCESTRY: [AncestryComponent; 3] = [
    component("Bantu", 85.0, 79.0, 90.0),
    component("Nilotic", 12.0, 7.0, 19.0),
    component("North African", 3.0, 1.0, 8.0),
];

const YORUBA_ANCESTRY: [AncestryComponent; 3] = [
    component("West African", 56.0, 48.0, 63.0),
    component("Bantu", 42.0, 35.0, 49.0),
    component("North African", 2.0, 0.0, 6.0),
];

const IGBO_ANCESTRY: [AncestryComponent; 3] = [
    component("West African", 60.0, 52.0, 67.0),
    component("Bantu", 38.0, 31.0, 45.0),
    component("North African", 2.0, 0.0, 6.0),
];

const AMHARA_ANCESTRY: [AncestryComponent; 3] = [
    component("Afroasiatic", 65.0, 58.0, 71.0),
    component("North African", 25.0, 18.0, 32.0),
    component("Nilotic", 10.0, 5.0, 16.0),
];

const ZULU_ANCESTRY: [AncestryComponent; 3] = [
    component("Bantu", 96.0, 93.0, 98.0),
    component("Nilotic", 3.0, 1.0, 6.0),
    component("North African", 1.0, 0.0, 3.0),
];

/// Look up the ancestry composition profile for a population hint.
pub fn ancestry_profile(hint: Option<&str>) -> &'static [AncestryComponent] {
    match hint {
        Some("Kikuyu") => &KIKUYU_ANCESTRY,
        Some("Luhya") => &LUHYA_ANCESTRY,
        Some("Maasai") => &MAASAI_ANCESTRY,
        Some("Luganda") => &LUGANDA_ANCESTRY,
        Some("Yoruba") => &YORUBA_ANCESTRY,
        Some("Igbo") => &IGBO_ANCESTRY,
        Some("Amhara") => &AMHARA_ANCESTRY,
        Some("Zulu") => &ZULU_ANCESTRY,
        _ => &DEFAULT_ANCESTRY,
    }
}

const LCT_FREQUENCIES: &str =
    r#"{"East African": "0.70", "West African": "0.05", "North African": "0.02"}"#;
const HBB_FREQUENCIES: &str =
    r#"{"East African": "0.18", "West African": "0.25", "North African": "0.02"}"#;
const G6PD_FREQUENCIES: &str =
    r#"{"East African": "0.08", "West African": "0.15", "North African": "0.10"}"#;
const DUFFY_FREQUENCIES: &str =
    r#"{"East African": "0.88", "West African": "0.92", "North African": "0.40"}"#;

const fn lct(genotype: &'static str, phenotype: &'static str) -> MarkerProfile {
    MarkerProfile {
        gene_name: "LCT",
        variant_rsid: "rs4988235",
        chromosome: "chr2",
        position: 136_594_750,
        genotype,
        phenotype,
        clinical_significance: "Lactose tolerance phenotype",
        population_frequency: LCT_FREQUENCIES,
    }
}

const fn hbb(genotype: &'static str, phenotype: &'static str) -> MarkerProfile {
    MarkerProfile {
        gene_name: "HBB",
        variant_rsid: "rs334",
        chromosome: "chr11",
        position: 5_248_232,
        genotype,
        phenotype,
        clinical_significance: "Sickle cell disease; potential malarial resistance",
        population_frequency: HBB_FREQUENCIES,
    }
}

const fn g6pd(genotype: &'static str, phenotype: &'static str) -> MarkerProfile {
    MarkerProfile {
        gene_name: "G6PD",
        variant_rsid: "rs1050829",
        chromosome: "chrX",
        position: 154_519_747,
        genotype,
        phenotype,
        clinical_significance: "G6PD deficiency; hemolysis risk with triggers",
        population_frequency: G6PD_FREQUENCIES,
    }
}

const fn duffy(genotype: &'static str, phenotype: &'static str) -> MarkerProfile {
    MarkerProfile {
        gene_name: "DUFFY",
        variant_rsid: "rs2814778",
        chromosome: "chr1",
        position: 159_235_043,
        genotype,
        phenotype,
        clinical_significance: "Plasmodium vivax malaria resistance",
        population_frequency: DUFFY_FREQUENCIES,
    }
}

/// Marker calls typical of Bantu-majority compositions.
const BANTU_MARKERS: [MarkerProfile; 4] = [
    lct("C/T", "Intermediate"),
    hbb("A/S", "Sickle Cell Trait (AS)"),
    g6pd("A/A", "Deficiency"),
    duffy("-/-", "Duffy Negative (P. vivax resistant)"),
];

const YORUBA_MARKERS: [MarkerProfile; 4] = [
    lct("T/T", "Lactose Intolerant"),
    hbb("A/S", "Sickle Cell Trait (AS)"),
    g6pd("A/G", "Intermediate"),
    duffy("-/-", "Duffy Negative (P. vivax resistant)"),
];

const MAASAI_MARKERS: [MarkerProfile; 4] = [
    lct("C/T", "Intermediate"),
    hbb("A/A", "Normal"),
    g6pd("A/A", "Deficiency"),
    duffy("-/-", "Duffy Negative (P. vivax resistant)"),
];

const AMHARA_MARKERS: [MarkerProfile; 4] = [
    lct("C/T", "Intermediate"),
    hbb("A/A", "Normal"),
    g6pd("A/G", "Intermediate"),
    duffy("A/-", "Intermediate"),
];

/// Fallback marker calls for samples with no recognized population hint.
const DEFAULT_MARKERS: [MarkerProfile; 3] = [
    lct("C/C", "Lactase Persistent"),
    hbb("A/S", "Sickle Cell Trait (AS)"),
    g6pd("A/A", "Deficiency"),
];

/// Look up the health-marker calls for a population hint.
pub fn health_markers(hint: Option<&str>) -> &'static [MarkerProfile] {
    match hint {
        Some("Kikuyu") | Some("Luhya") | Some("Luganda") | Some("Zulu") | Some("Igbo") => {
            &BANTU_MARKERS
        }
        Some("Yoruba") => &YORUBA_MARKERS,
        Some("Maasai") => &MAASAI_MARKERS,
        Some("Amhara") => &AMHARA_MARKERS,
        _ => &DEFAULT_MARKERS,
    }
}
