//! Simulated participants and requests for the reference runtime.
//!
//! All data in this module is hardcoded and fictional. The organization
//! registry stands in for the onboarding process of a real consortium.

use std::collections::BTreeSet;

use sha2::{Digest, Sha256};

use carechain_contracts::{
    records::{ClaimDocument, Organization},
    request::{IssuePolicyRequest, ShareDataRequest, SubmitClaimRequest},
};

/// Hex SHA-256 of `content`, used for mock document and data-set digests.
pub fn digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

// ── Organization registry (mock) ─────────────────────────────────────────────

fn org(id: &str, name: &str, org_type: &str, permissions: &[&str]) -> Organization {
    Organization {
        id: id.to_string(),
        name: name.to_string(),
        org_type: org_type.to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect::<BTreeSet<_>>(),
        public_key: format!("PK_{}", &digest(id)[..16]),
    }
}

/// The consortium registered at start-up.
pub fn organizations() -> Vec<Organization> {
    vec![
        org(
            "INS001",
            "HealthFirst Insurance",
            "insurance",
            &["policy:issue", "claim:review", "data:receive"],
        ),
        org(
            "INS002",
            "MediCare Plus",
            "insurance",
            &["policy:issue", "claim:review", "data:receive"],
        ),
        org(
            "HOSP001",
            "City General Hospital",
            "hospital",
            &["claim:submit", "data:share", "data:receive"],
        ),
        org(
            "HOSP002",
            "St. Mary's Medical Center",
            "hospital",
            &["claim:submit", "data:share", "data:receive"],
        ),
        org(
            "LAB001",
            "Precision Diagnostics Lab",
            "laboratory",
            &["data:share"],
        ),
        org(
            "PHARM001",
            "Wellness Pharmacy",
            "pharmacy",
            &["data:receive", "token:redeem"],
        ),
    ]
}

// ── Policies (mock) ──────────────────────────────────────────────────────────

/// POL001 for PAT001, coverage 75 000.
pub fn primary_policy() -> IssuePolicyRequest {
    IssuePolicyRequest {
        policy_id: "POL001".to_string(),
        patient_id: "PAT001".to_string(),
        insurance_company: "INS001".to_string(),
        coverage: 75_000,
        premium: 500,
        conditions: vec!["pre-existing: none".to_string(), "outpatient covered".to_string()],
    }
}

/// POL002 for PAT002, coverage 20 000.
pub fn secondary_policy() -> IssuePolicyRequest {
    IssuePolicyRequest {
        policy_id: "POL002".to_string(),
        patient_id: "PAT002".to_string(),
        insurance_company: "INS002".to_string(),
        coverage: 20_000,
        premium: 220,
        conditions: vec!["dental excluded".to_string()],
    }
}

/// POL003 for PAT003, coverage 150 000.
pub fn premium_policy() -> IssuePolicyRequest {
    IssuePolicyRequest {
        policy_id: "POL003".to_string(),
        patient_id: "PAT003".to_string(),
        insurance_company: "INS001".to_string(),
        coverage: 150_000,
        premium: 1_400,
        conditions: vec!["inpatient surgery covered".to_string()],
    }
}

// ── Claims (mock) ────────────────────────────────────────────────────────────

fn documents(types: &[&str], claim_id: &str) -> Vec<ClaimDocument> {
    types
        .iter()
        .map(|t| ClaimDocument::new(*t, digest(&format!("{claim_id}/{t}"))))
        .collect()
}

const ALL_DOCUMENTS: &[&str] = &["medical_report", "bills", "prescription"];

/// CLM001: 15 000 against POL001 with every required document. Approves at 100.
pub fn approvable_claim() -> SubmitClaimRequest {
    SubmitClaimRequest {
        claim_id: "CLM001".to_string(),
        policy_id: "POL001".to_string(),
        patient_id: "PAT001".to_string(),
        hospital_id: "HOSP001".to_string(),
        diagnosis: "Appendicitis - laparoscopic appendectomy".to_string(),
        treatment_cost: 15_000,
        documents: documents(ALL_DOCUMENTS, "CLM001"),
    }
}

/// CLM002: 90 000 against POL001, above coverage.
pub fn over_coverage_claim() -> SubmitClaimRequest {
    SubmitClaimRequest {
        claim_id: "CLM002".to_string(),
        policy_id: "POL001".to_string(),
        patient_id: "PAT001".to_string(),
        hospital_id: "HOSP002".to_string(),
        diagnosis: "Elective cosmetic procedure".to_string(),
        treatment_cost: 90_000,
        documents: documents(ALL_DOCUMENTS, "CLM002"),
    }
}

/// CLM003: POL002 claim without a prescription.
pub fn undocumented_claim() -> SubmitClaimRequest {
    SubmitClaimRequest {
        claim_id: "CLM003".to_string(),
        policy_id: "POL002".to_string(),
        patient_id: "PAT002".to_string(),
        hospital_id: "HOSP001".to_string(),
        diagnosis: "Sprained ankle".to_string(),
        treatment_cost: 1_200,
        documents: documents(&["medical_report", "bills"], "CLM003"),
    }
}

/// CLM004: 18 000 against POL002 (ratio 0.9). Approves at 85.
pub fn high_ratio_claim() -> SubmitClaimRequest {
    SubmitClaimRequest {
        claim_id: "CLM004".to_string(),
        policy_id: "POL002".to_string(),
        patient_id: "PAT002".to_string(),
        hospital_id: "HOSP002".to_string(),
        diagnosis: "Fractured femur - surgical fixation".to_string(),
        treatment_cost: 18_000,
        documents: documents(&["medical_report", "bills", "prescription", "xray"], "CLM004"),
    }
}

/// CLM005: 60 000 against POL003 (ratio 0.4). Large enough to be archived.
pub fn large_claim() -> SubmitClaimRequest {
    SubmitClaimRequest {
        claim_id: "CLM005".to_string(),
        policy_id: "POL003".to_string(),
        patient_id: "PAT003".to_string(),
        hospital_id: "HOSP001".to_string(),
        diagnosis: "Coronary artery bypass graft".to_string(),
        treatment_cost: 60_000,
        documents: documents(ALL_DOCUMENTS, "CLM005"),
    }
}

// ── Data sharing (mock) ──────────────────────────────────────────────────────

/// Lab results for PAT001 sent from the lab to the hospital.
pub fn lab_results_share() -> ShareDataRequest {
    ShareDataRequest {
        from_org: "LAB001".to_string(),
        to_org: "HOSP001".to_string(),
        data_type: "lab_results".to_string(),
        data_hash: digest("PAT001/cbc-panel/2026-02-10"),
        patient_id: Some("PAT001".to_string()),
    }
}

/// A discharge summary addressed to an organization that is not registered.
pub fn unregistered_share() -> ShareDataRequest {
    ShareDataRequest {
        from_org: "HOSP001".to_string(),
        to_org: "UNKNOWN_BROKER".to_string(),
        data_type: "discharge_summary".to_string(),
        data_hash: digest("PAT001/discharge/2026-02-12"),
        patient_id: Some("PAT001".to_string()),
    }
}

/// Prescription history pushed by the pharmacy, which may only receive data.
pub fn unpermitted_share() -> ShareDataRequest {
    ShareDataRequest {
        from_org: "PHARM001".to_string(),
        to_org: "INS001".to_string(),
        data_type: "prescription_history".to_string(),
        data_hash: digest("PAT001/rx-history/2026-02-14"),
        patient_id: Some("PAT001".to_string()),
    }
}
