use serde::{Deserialize, Serialize};
use std::fmt;

pub const BASE_PROFILE: &str =
    "http://hl7.org/fhir/us/identity-matching/StructureDefinition/IDI-Patient";
pub const LEVEL0_PROFILE: &str =
    "http://hl7.org/fhir/us/identity-matching/StructureDefinition/IDI-Patient-L0";
pub const LEVEL1_PROFILE: &str =
    "http://hl7.org/fhir/us/identity-matching/StructureDefinition/IDI-Patient-L1";

/// Conformance tier a submitted record claims to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileTier {
    Base,
    Level0,
    Level1,
}

impl ProfileTier {
    pub const ALL: [ProfileTier; 3] = [Self::Base, Self::Level0, Self::Level1];

    pub fn profile_url(self) -> &'static str {
        match self {
            Self::Base => BASE_PROFILE,
            Self::Level0 => LEVEL0_PROFILE,
            Self::Level1 => LEVEL1_PROFILE,
        }
    }

    /// Weighted score a record must reach; `None` for the unweighted base tier.
    pub fn minimum_score(self) -> Option<u32> {
        match self {
            Self::Base => None,
            Self::Level0 => Some(10),
            Self::Level1 => Some(20),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Base => "IDI-Patient",
            Self::Level0 => "IDI-Patient-L0",
            Self::Level1 => "IDI-Patient-L1",
        }
    }
}

impl fmt::Display for ProfileTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of matching a declared profile against the known tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Tier(ProfileTier),
    Unclassified,
}

impl Classification {
    pub fn tier(self) -> Option<ProfileTier> {
        match self {
            Self::Tier(tier) => Some(tier),
            Self::Unclassified => None,
        }
    }
}

/// Exact-match lookup; anything else, including an absent profile, is unclassified.
pub fn classify(declared_profile: Option<&str>) -> Classification {
    declared_profile
        .and_then(|declared| {
            ProfileTier::ALL
                .into_iter()
                .find(|tier| tier.profile_url() == declared)
        })
        .map(Classification::Tier)
        .unwrap_or(Classification::Unclassified)
}
