use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::{json, Value};

use crate::matching::audit::{AuditError, AuditEvent, AuditOutcome, AuditSink};
use crate::matching::domain::{
    ContactParty, ContactPoint, Identifier, PersonName, PostalAddress, SubmittedRecord,
    TelecomSystem,
};
use crate::matching::profile::ProfileTier;
use crate::matching::{AccessTokenValidator, PatientMatchService};

pub(super) const BASE_URL: &str = "http://localhost:3000";
pub(super) const TOKEN: &str = "test-token";

pub(super) fn identifier(code: &str, value: &str) -> Identifier {
    Identifier {
        type_code: Some(code.to_string()),
        value: Some(value.to_string()),
    }
}

pub(super) fn telecom(system: TelecomSystem, value: &str) -> ContactPoint {
    ContactPoint {
        system: Some(system),
        value: Some(value.to_string()),
    }
}

pub(super) fn address(usage: Option<&str>, line: &str, city: &str) -> PostalAddress {
    PostalAddress {
        usage: usage.map(str::to_string),
        lines: vec![line.to_string()],
        city: Some(city.to_string()),
        ..PostalAddress::default()
    }
}

pub(super) fn full_name() -> PersonName {
    PersonName {
        given: vec!["Maria".to_string()],
        family: Some("Okafor".to_string()),
        ..PersonName::default()
    }
}

pub(super) fn named_contact() -> ContactParty {
    ContactParty {
        name: Some(PersonName {
            given: vec!["Daniel".to_string()],
            family: Some("Okafor".to_string()),
            ..PersonName::default()
        }),
        ..ContactParty::default()
    }
}

pub(super) fn record_for(tier: ProfileTier) -> SubmittedRecord {
    SubmittedRecord {
        declared_profile: Some(tier.profile_url().to_string()),
        ..SubmittedRecord::default()
    }
}

/// Every signal the rubric knows about, plus a qualifying contact.
pub(super) fn fully_populated(declared_profile: Option<&str>) -> SubmittedRecord {
    SubmittedRecord {
        declared_profile: declared_profile.map(str::to_string),
        identifiers: vec![
            identifier("PPN", "P-4410921"),
            identifier("DL", "OH-99812"),
            identifier("SS", "123-45-6789"),
        ],
        telecom: vec![
            telecom(TelecomSystem::Phone, "+1 555 0100"),
            telecom(TelecomSystem::Email, "maria@example.org"),
        ],
        addresses: vec![address(Some("home"), "400 Main St", "Columbus")],
        name: Some(full_name()),
        birth_date: Some("1979-03-14".to_string()),
        has_photo: true,
        contacts: vec![named_contact()],
    }
}

#[derive(Default)]
pub(super) struct MemoryAudit {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditSink for MemoryAudit {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .expect("audit mutex poisoned")
            .push(event);
        Ok(())
    }
}

impl MemoryAudit {
    pub(super) fn outcomes(&self) -> Vec<AuditOutcome> {
        self.events
            .lock()
            .expect("audit mutex poisoned")
            .iter()
            .map(|event| event.outcome)
            .collect()
    }
}

pub(super) struct UnavailableAudit;

impl AuditSink for UnavailableAudit {
    fn record(&self, _event: AuditEvent) -> Result<(), AuditError> {
        Err(AuditError::Unavailable("audit store offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<PatientMatchService<MemoryAudit>>, Arc<MemoryAudit>) {
    let audit = Arc::new(MemoryAudit::default());
    let service = Arc::new(PatientMatchService::new(
        AccessTokenValidator::new(vec![TOKEN.to_string()]),
        audit.clone(),
        BASE_URL,
    ));
    (service, audit)
}

pub(super) fn parameters_body(patient: Value) -> Vec<u8> {
    json!({
        "resourceType": "Parameters",
        "parameter": [{ "name": "resource", "resource": patient }]
    })
    .to_string()
    .into_bytes()
}

/// Level 0 patient with a passport, full name and a named contact (score 14).
pub(super) fn level0_patient() -> Value {
    json!({
        "resourceType": "Patient",
        "meta": { "profile": [ProfileTier::Level0.profile_url()] },
        "identifier": [{
            "type": { "coding": [{
                "system": "http://terminology.hl7.org/CodeSystem/v2-0203",
                "code": "PPN"
            }] },
            "value": "P-4410921"
        }],
        "name": [{ "family": "Okafor", "given": ["Maria"] }],
        "contact": [{ "name": { "family": "Okafor", "given": ["Daniel"] } }]
    })
}

pub(super) async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("json body")
}
