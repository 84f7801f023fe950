//! Serde views over the subset of FHIR R4 JSON the match operation reads.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct FhirParameters {
    pub parameter: Vec<FhirParameterComponent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct FhirParameterComponent {
    pub resource: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct FhirPatient {
    pub meta: Option<FhirMeta>,
    pub identifier: Vec<FhirIdentifier>,
    pub name: Vec<FhirHumanName>,
    pub telecom: Vec<FhirContactPoint>,
    pub address: Vec<FhirAddress>,
    pub birth_date: Option<String>,
    pub photo: Vec<Value>,
    pub contact: Vec<FhirPatientContact>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FhirMeta {
    pub profile: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FhirIdentifier {
    #[serde(rename = "type")]
    pub kind: Option<FhirCodeableConcept>,
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FhirCodeableConcept {
    pub coding: Vec<FhirCoding>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FhirCoding {
    pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FhirHumanName {
    pub text: Option<String>,
    pub family: Option<String>,
    pub given: Vec<String>,
    pub prefix: Vec<String>,
    pub suffix: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FhirContactPoint {
    pub system: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct FhirAddress {
    #[serde(rename = "use")]
    pub usage: Option<String>,
    pub text: Option<String>,
    pub line: Vec<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FhirPatientContact {
    pub name: Option<FhirHumanName>,
    pub telecom: Vec<FhirContactPoint>,
    pub address: Option<FhirAddress>,
    pub organization: Option<FhirReference>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FhirReference {
    pub reference: Option<String>,
    pub display: Option<String>,
}
