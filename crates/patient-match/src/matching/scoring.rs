use serde::{Deserialize, Serialize};

use super::extract::ExtractedFields;

pub const PASSPORT_WEIGHT: u32 = 10;
pub const DRIVERS_LICENSE_WEIGHT: u32 = 10;
pub const SUPPORTING_DETAIL_WEIGHT: u32 = 4;
pub const FULL_NAME_WEIGHT: u32 = 4;
pub const BIRTH_DATE_WEIGHT: u32 = 2;

pub const MAX_SCORE: u32 = PASSPORT_WEIGHT
    + DRIVERS_LICENSE_WEIGHT
    + SUPPORTING_DETAIL_WEIGHT
    + FULL_NAME_WEIGHT
    + BIRTH_DATE_WEIGHT;

/// Rubric line a record can earn points for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSignal {
    Passport,
    DriversLicense,
    /// Home address, other identifier, phone, email or photo; awarded once.
    SupportingDetail,
    FullName,
    BirthDate,
}

impl WeightSignal {
    pub fn weight(self) -> u32 {
        match self {
            Self::Passport => PASSPORT_WEIGHT,
            Self::DriversLicense => DRIVERS_LICENSE_WEIGHT,
            Self::SupportingDetail => SUPPORTING_DETAIL_WEIGHT,
            Self::FullName => FULL_NAME_WEIGHT,
            Self::BirthDate => BIRTH_DATE_WEIGHT,
        }
    }

    fn is_present(self, fields: &ExtractedFields) -> bool {
        match self {
            Self::Passport => fields.has_passport,
            Self::DriversLicense => fields.has_drivers_license,
            Self::SupportingDetail => {
                fields.has_qualifying_address
                    || fields.has_other_identifier
                    || fields.has_phone
                    || fields.has_email
                    || fields.has_photo
            }
            Self::FullName => fields.has_full_name,
            Self::BirthDate => fields.has_birth_date,
        }
    }
}

const RUBRIC: [WeightSignal; 5] = [
    WeightSignal::Passport,
    WeightSignal::DriversLicense,
    WeightSignal::SupportingDetail,
    WeightSignal::FullName,
    WeightSignal::BirthDate,
];

/// Points awarded for a single rubric line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub signal: WeightSignal,
    pub points: u32,
}

/// Awarded rubric lines in rubric order; the points sum to [`score`].
pub fn breakdown(fields: &ExtractedFields) -> Vec<ScoreComponent> {
    RUBRIC
        .into_iter()
        .filter(|signal| signal.is_present(fields))
        .map(|signal| ScoreComponent {
            signal,
            points: signal.weight(),
        })
        .collect()
}

pub fn score(fields: &ExtractedFields) -> u32 {
    RUBRIC
        .into_iter()
        .filter(|signal| signal.is_present(fields))
        .map(WeightSignal::weight)
        .sum()
}
