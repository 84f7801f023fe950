use serde::{Deserialize, Serialize};

use super::domain::{
    is_present, SubmittedRecord, TelecomSystem, DRIVERS_LICENSE_TYPE_CODE, PASSPORT_TYPE_CODE,
};

/// Policy-relevant signals pulled out of a submitted record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub has_passport: bool,
    pub has_drivers_license: bool,
    pub has_qualifying_address: bool,
    pub has_other_identifier: bool,
    pub has_phone: bool,
    pub has_email: bool,
    pub has_photo: bool,
    pub has_full_name: bool,
    pub has_birth_date: bool,
    pub has_qualifying_contact: bool,
}

pub fn extract(record: &SubmittedRecord) -> ExtractedFields {
    ExtractedFields {
        has_passport: has_identifier_of_type(record, PASSPORT_TYPE_CODE),
        has_drivers_license: has_identifier_of_type(record, DRIVERS_LICENSE_TYPE_CODE),
        has_qualifying_address: has_home_street_address(record),
        has_other_identifier: has_other_identifier(record),
        has_phone: has_telecom(record, &TelecomSystem::Phone),
        has_email: has_telecom(record, &TelecomSystem::Email),
        has_photo: record.has_photo,
        has_full_name: has_full_name(record),
        has_birth_date: is_present(&record.birth_date),
        has_qualifying_contact: has_qualifying_contact(record),
    }
}

fn has_identifier_of_type(record: &SubmittedRecord, code: &str) -> bool {
    record
        .identifiers
        .iter()
        .any(|identifier| identifier.is_type(code) && identifier.has_value())
}

fn has_other_identifier(record: &SubmittedRecord) -> bool {
    record.identifiers.iter().any(|identifier| {
        identifier.type_code.as_deref().is_some_and(|code| {
            code != PASSPORT_TYPE_CODE && code != DRIVERS_LICENSE_TYPE_CODE
        }) && identifier.has_value()
    })
}

fn has_telecom(record: &SubmittedRecord, system: &TelecomSystem) -> bool {
    record
        .telecom
        .iter()
        .any(|entry| entry.is_reachable_by(system))
}

/// Strict address test used by the weighted tiers: home use, street line and city.
pub fn has_home_street_address(record: &SubmittedRecord) -> bool {
    record
        .addresses
        .iter()
        .any(|address| address.is_home() && address.has_street_line() && address.has_city())
}

/// Loose address test used by the base tier: street line and city, any use.
pub fn has_any_street_address(record: &SubmittedRecord) -> bool {
    record
        .addresses
        .iter()
        .any(|address| address.has_street_line() && address.has_city())
}

pub fn has_full_name(record: &SubmittedRecord) -> bool {
    record
        .name
        .as_ref()
        .is_some_and(|name| name.first_given().is_some() && name.family().is_some())
}

/// Only the first listed contact is considered.
pub fn has_qualifying_contact(record: &SubmittedRecord) -> bool {
    record
        .contacts
        .first()
        .is_some_and(|contact| contact.is_qualifying())
}
