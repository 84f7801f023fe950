use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{is_present, SubmittedRecord};
use super::extract::{extract, has_any_street_address, ExtractedFields};
use super::profile::{classify, Classification, ProfileTier};
use super::scoring::score;

pub const MISSING_OR_INVALID_PROFILE: &str = "Patient's profile is missing or not defined in the IG. \
     Please provide the IDI profile the patient resource conforms to.";

/// Why a record was not eligible for matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("{}", MISSING_OR_INVALID_PROFILE)]
    UnclassifiableProfile,
    #[error(
        "The Patient resource provided is not conformant to profile: {profile} as claimed. \
         Please check the profile's constraints and ensure the minimum search fields are provided."
    )]
    InsufficientCriteria { profile: String },
}

/// Eligibility decision for one submitted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub classification: Classification,
    pub score: u32,
    pub accepted: bool,
    /// Empty exactly when the record was accepted.
    pub reason: String,
}

impl ValidationOutcome {
    fn accepted(tier: ProfileTier, score: u32) -> Self {
        Self {
            classification: Classification::Tier(tier),
            score,
            accepted: true,
            reason: String::new(),
        }
    }

    fn rejected(classification: Classification, score: u32, reason: RejectionReason) -> Self {
        Self {
            classification,
            score,
            accepted: false,
            reason: reason.to_string(),
        }
    }

    pub fn tier(&self) -> Option<ProfileTier> {
        self.classification.tier()
    }
}

/// Decide whether the record carries enough identifying detail for the tier it claims.
pub fn validate(record: &SubmittedRecord) -> ValidationOutcome {
    let declared = record.declared_profile.as_deref();
    let tier = match classify(declared) {
        Classification::Tier(tier) => tier,
        Classification::Unclassified => {
            return ValidationOutcome::rejected(
                Classification::Unclassified,
                0,
                RejectionReason::UnclassifiableProfile,
            );
        }
    };

    let fields = extract(record);
    let total = score(&fields);
    let accepted = meets_minimum_criteria(tier, record, &fields, total);
    debug!(%tier, score = total, accepted, "minimum criteria evaluated");

    if accepted {
        ValidationOutcome::accepted(tier, total)
    } else {
        ValidationOutcome::rejected(
            Classification::Tier(tier),
            total,
            RejectionReason::InsufficientCriteria {
                profile: tier.profile_url().to_string(),
            },
        )
    }
}

fn meets_minimum_criteria(
    tier: ProfileTier,
    record: &SubmittedRecord,
    fields: &ExtractedFields,
    total: u32,
) -> bool {
    if !fields.has_qualifying_contact {
        return false;
    }

    match tier.minimum_score() {
        Some(minimum) => total >= minimum,
        None => has_base_tier_detail(record, fields),
    }
}

fn has_base_tier_detail(record: &SubmittedRecord, fields: &ExtractedFields) -> bool {
    record
        .identifiers
        .iter()
        .any(|identifier| !identifier.is_empty())
        || record.telecom.iter().any(|point| !point.is_empty())
        || fields.has_full_name
        || has_any_street_address(record)
        || is_present(&record.birth_date)
}
