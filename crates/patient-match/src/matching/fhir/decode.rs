use serde_json::Value;

use super::resources::{
    FhirAddress, FhirContactPoint, FhirHumanName, FhirIdentifier, FhirParameters, FhirPatient,
    FhirPatientContact,
};
use super::xml::{parse_document, XmlElement, XmlSyntaxError};
use super::WireFormat;
use crate::matching::domain::{
    ContactParty, ContactPoint, Identifier, PersonName, PostalAddress, SubmittedRecord,
    TelecomSystem, DRIVERS_LICENSE_TYPE_CODE, PASSPORT_TYPE_CODE,
};

pub const REQUIRES_PARAMETERS: &str = "Patient matching Patient/$match Operation requires a \
     Parameters resource containing a single Patient resource in parameter field.";
pub const REQUIRES_PATIENT: &str =
    "Parameters.parameter must contain a single patient resource as the first element.";
pub const MISSING_PARAMETER: &str = "Missing Parameters.parameter";
pub const UNSUPPORTED_MEDIA_TYPE: &str = "Patient/$match request bodies must be FHIR JSON \
     (application/fhir+json) or FHIR XML (application/fhir+xml).";

/// Reasons a request body never reaches the minimum-criteria validator.
#[derive(Debug, thiserror::Error)]
pub enum MatchRequestError {
    #[error("{}", REQUIRES_PARAMETERS)]
    NotParameters,
    #[error("{}", MISSING_PARAMETER)]
    MissingParameter,
    #[error("{}", REQUIRES_PATIENT)]
    NotPatient,
    #[error("{}", UNSUPPORTED_MEDIA_TYPE)]
    UnsupportedMediaType,
    #[error("unable to parse FHIR resource: {0}")]
    Unparseable(#[from] serde_json::Error),
    #[error("unable to parse FHIR XML resource: {0}")]
    UnparseableXml(#[from] XmlSyntaxError),
}

impl MatchRequestError {
    /// Structural problems the client can fix, as opposed to unparseable payloads.
    pub fn is_malformed_input(&self) -> bool {
        !matches!(
            self,
            MatchRequestError::Unparseable(_) | MatchRequestError::UnparseableXml(_)
        )
    }
}

/// Decode a `Parameters` document whose first parameter carries the Patient to match.
pub fn decode_match_request(
    body: &[u8],
    format: WireFormat,
) -> Result<SubmittedRecord, MatchRequestError> {
    match format {
        WireFormat::Json => decode_json(body),
        WireFormat::Xml => decode_xml(body),
    }
}

fn decode_json(body: &[u8]) -> Result<SubmittedRecord, MatchRequestError> {
    let document: Value = serde_json::from_slice(body)?;
    if resource_type(&document) != Some("Parameters") {
        return Err(MatchRequestError::NotParameters);
    }

    let parameters: FhirParameters = serde_json::from_value(document)?;
    let first = parameters
        .parameter
        .into_iter()
        .next()
        .ok_or(MatchRequestError::MissingParameter)?;

    let resource = first
        .resource
        .filter(|resource| resource_type(resource) == Some("Patient"))
        .ok_or(MatchRequestError::NotPatient)?;

    let patient: FhirPatient = serde_json::from_value(resource)?;
    Ok(SubmittedRecord::from(patient))
}

fn decode_xml(body: &[u8]) -> Result<SubmittedRecord, MatchRequestError> {
    let document = parse_document(body)?
        .filter(|root| root.name == "Parameters")
        .ok_or(MatchRequestError::NotParameters)?;

    let first = document
        .child("parameter")
        .ok_or(MatchRequestError::MissingParameter)?;

    let patient = first
        .child("resource")
        .and_then(XmlElement::first_child)
        .filter(|resource| resource.name == "Patient")
        .ok_or(MatchRequestError::NotPatient)?;

    Ok(SubmittedRecord::from(FhirPatient::from(patient)))
}

fn resource_type(value: &Value) -> Option<&str> {
    value.get("resourceType").and_then(Value::as_str)
}

impl From<FhirPatient> for SubmittedRecord {
    fn from(patient: FhirPatient) -> Self {
        let declared_profile = patient
            .meta
            .and_then(|meta| meta.profile.into_iter().next());

        SubmittedRecord {
            declared_profile,
            identifiers: patient.identifier.into_iter().map(Identifier::from).collect(),
            telecom: patient.telecom.into_iter().map(ContactPoint::from).collect(),
            addresses: patient
                .address
                .into_iter()
                .map(PostalAddress::from)
                .collect(),
            name: patient.name.into_iter().next().map(PersonName::from),
            birth_date: patient.birth_date,
            has_photo: !patient.photo.is_empty(),
            contacts: patient
                .contact
                .into_iter()
                .map(ContactParty::from)
                .collect(),
        }
    }
}

impl From<FhirIdentifier> for Identifier {
    fn from(identifier: FhirIdentifier) -> Self {
        let codes: Vec<String> = identifier
            .kind
            .map(|concept| {
                concept
                    .coding
                    .into_iter()
                    .filter_map(|coding| coding.code)
                    .collect()
            })
            .unwrap_or_default();

        // Prefer a policy-relevant code when several codings are present.
        let type_code = codes
            .iter()
            .find(|code| *code == PASSPORT_TYPE_CODE || *code == DRIVERS_LICENSE_TYPE_CODE)
            .or_else(|| codes.first())
            .cloned();

        Identifier {
            type_code,
            value: identifier.value,
        }
    }
}

impl From<FhirContactPoint> for ContactPoint {
    fn from(point: FhirContactPoint) -> Self {
        ContactPoint {
            system: point.system.as_deref().map(TelecomSystem::from_code),
            value: point.value,
        }
    }
}

impl From<FhirAddress> for PostalAddress {
    fn from(address: FhirAddress) -> Self {
        PostalAddress {
            usage: address.usage,
            lines: address.line,
            city: address.city,
            text: address.text,
            district: address.district,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

impl From<FhirHumanName> for PersonName {
    fn from(name: FhirHumanName) -> Self {
        PersonName {
            given: name.given,
            family: name.family,
            text: name.text,
            prefix: name.prefix,
            suffix: name.suffix,
        }
    }
}

impl From<FhirPatientContact> for ContactParty {
    fn from(contact: FhirPatientContact) -> Self {
        ContactParty {
            name: contact.name.map(PersonName::from),
            telecom: contact
                .telecom
                .into_iter()
                .map(ContactPoint::from)
                .collect(),
            address: contact.address.map(PostalAddress::from),
            organization: contact
                .organization
                .and_then(|reference| reference.reference.or(reference.display)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parameters_with(resource: Value) -> Vec<u8> {
        json!({
            "resourceType": "Parameters",
            "parameter": [{ "name": "resource", "resource": resource }]
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn decodes_patient_fields() {
        let body = parameters_with(json!({
            "resourceType": "Patient",
            "meta": { "profile": ["http://example.org/profile-a", "http://example.org/b"] },
            "identifier": [{
                "type": { "coding": [
                    { "system": "http://example.org/local", "code": "MR" },
                    { "system": "http://terminology.hl7.org/CodeSystem/v2-0203", "code": "PPN" }
                ] },
                "value": "X1234567"
            }],
            "name": [{ "family": "Rivera", "given": ["Ana", "Luz"] }, { "family": "Other" }],
            "telecom": [{ "system": "email", "value": "ana@example.org" }],
            "address": [{ "use": "home", "line": ["12 Elm St"], "city": "Dayton" }],
            "birthDate": "1984-07-02",
            "photo": [{ "contentType": "image/png" }],
            "contact": [{ "organization": { "display": "Dayton Clinic" } }]
        }));

        let record = decode_match_request(&body, WireFormat::Json).expect("decodes");

        assert_eq!(
            record.declared_profile.as_deref(),
            Some("http://example.org/profile-a")
        );
        assert_eq!(record.identifiers[0].type_code.as_deref(), Some("PPN"));
        let name = record.name.expect("first name kept");
        assert_eq!(name.first_given(), Some("Ana"));
        assert_eq!(name.family(), Some("Rivera"));
        assert_eq!(record.telecom[0].system, Some(TelecomSystem::Email));
        assert_eq!(record.addresses[0].usage.as_deref(), Some("home"));
        assert_eq!(record.birth_date.as_deref(), Some("1984-07-02"));
        assert!(record.has_photo);
        assert_eq!(
            record.contacts[0].organization.as_deref(),
            Some("Dayton Clinic")
        );
    }

    #[test]
    fn rejects_non_parameters_resource() {
        let body = json!({ "resourceType": "Patient" }).to_string();
        assert!(matches!(
            decode_match_request(body.as_bytes(), WireFormat::Json),
            Err(MatchRequestError::NotParameters)
        ));
    }

    #[test]
    fn rejects_empty_parameter_list() {
        let body = json!({ "resourceType": "Parameters", "parameter": [] }).to_string();
        assert!(matches!(
            decode_match_request(body.as_bytes(), WireFormat::Json),
            Err(MatchRequestError::MissingParameter)
        ));
    }

    #[test]
    fn rejects_non_patient_first_parameter() {
        let body = parameters_with(json!({ "resourceType": "Practitioner" }));
        assert!(matches!(
            decode_match_request(&body, WireFormat::Json),
            Err(MatchRequestError::NotPatient)
        ));
    }

    #[test]
    fn invalid_json_is_not_malformed_input() {
        let err = decode_match_request(b"{ not json", WireFormat::Json).expect_err("fails");
        assert!(matches!(err, MatchRequestError::Unparseable(_)));
        assert!(!err.is_malformed_input());
    }

    #[test]
    fn decodes_xml_patient_fields() {
        let body = br#"<Parameters xmlns="http://hl7.org/fhir">
              <parameter>
                <name value="resource"/>
                <resource>
                  <Patient>
                    <meta><profile value="http://example.org/profile-a"/></meta>
                    <identifier>
                      <type><coding><code value="MR"/></coding><coding><code value="DL"/></coding></type>
                      <value value="OH-1"/>
                    </identifier>
                    <name><family value="Rivera"/><given value="Ana"/><given value="Luz"/></name>
                    <telecom><system value="phone"/><value value="555"/></telecom>
                    <address><use value="home"/><line value="12 Elm St"/><city value="Dayton"/></address>
                    <birthDate value="1984-07-02"/>
                    <contact><address><postalCode value="45402"/></address></contact>
                  </Patient>
                </resource>
              </parameter>
            </Parameters>"#;

        let record = decode_match_request(body, WireFormat::Xml).expect("decodes");

        assert_eq!(
            record.declared_profile.as_deref(),
            Some("http://example.org/profile-a")
        );
        assert_eq!(record.identifiers[0].type_code.as_deref(), Some("DL"));
        assert_eq!(record.identifiers[0].value.as_deref(), Some("OH-1"));
        let name = record.name.expect("name");
        assert_eq!(name.given, vec!["Ana".to_string(), "Luz".to_string()]);
        assert_eq!(name.family(), Some("Rivera"));
        assert_eq!(record.telecom[0].system, Some(TelecomSystem::Phone));
        assert_eq!(record.addresses[0].lines, vec!["12 Elm St".to_string()]);
        assert_eq!(record.birth_date.as_deref(), Some("1984-07-02"));
        assert!(!record.has_photo);
        let contact_address = record.contacts[0].address.as_ref().expect("contact address");
        assert_eq!(contact_address.postal_code.as_deref(), Some("45402"));
    }

    #[test]
    fn xml_structure_errors_match_json_ones() {
        let cases: [(&[u8], fn(&MatchRequestError) -> bool); 4] = [
            (b"<Patient xmlns=\"http://hl7.org/fhir\"/>", |err| {
                matches!(err, MatchRequestError::NotParameters)
            }),
            (b"", |err| matches!(err, MatchRequestError::NotParameters)),
            (b"<Parameters xmlns=\"http://hl7.org/fhir\"/>", |err| {
                matches!(err, MatchRequestError::MissingParameter)
            }),
            (
                b"<Parameters><parameter><resource><Group/></resource></parameter></Parameters>",
                |err| matches!(err, MatchRequestError::NotPatient),
            ),
        ];

        for (body, expected) in cases {
            let err = decode_match_request(body, WireFormat::Xml).expect_err("rejected");
            assert!(expected(&err), "unexpected error {err:?}");
            assert!(err.is_malformed_input());
        }
    }

    #[test]
    fn broken_xml_is_not_malformed_input() {
        let err = decode_match_request(b"<Parameters><parameter>", WireFormat::Xml)
            .expect_err("fails");
        assert!(matches!(err, MatchRequestError::UnparseableXml(_)));
        assert!(!err.is_malformed_input());
    }
}
