//! FHIR XML reading for `Patient/$match` request bodies.
//!
//! FHIR XML carries primitive values in `value` attributes, so the document is read into a small
//! element tree and then mapped onto the same resource views the JSON path deserializes into.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::resources::{
    FhirAddress, FhirCodeableConcept, FhirCoding, FhirContactPoint, FhirHumanName,
    FhirIdentifier, FhirMeta, FhirPatient, FhirPatientContact, FhirReference,
};

#[derive(Debug, thiserror::Error)]
pub enum XmlSyntaxError {
    #[error(transparent)]
    Reader(#[from] quick_xml::Error),
    #[error(transparent)]
    Attribute(#[from] AttrError),
    #[error("element <{0}> is never closed")]
    Unclosed(String),
}

/// Element with its `value` attribute and child elements; text content is ignored.
#[derive(Debug, Default)]
pub(crate) struct XmlElement {
    pub name: String,
    pub value: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlSyntaxError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut value = None;
        for attribute in start.attributes() {
            let attribute = attribute?;
            if attribute.key.local_name().as_ref() == b"value" {
                value = Some(attribute.unescape_value()?.into_owned());
            }
        }

        Ok(Self {
            name,
            value,
            children: Vec::new(),
        })
    }

    pub(crate) fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub(crate) fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First child element of any name, e.g. the resource inside `<resource>`.
    pub(crate) fn first_child(&self) -> Option<&XmlElement> {
        self.children.first()
    }

    fn value_of(&self, name: &str) -> Option<String> {
        self.child(name).and_then(|child| child.value.clone())
    }

    fn values_of(&self, name: &str) -> Vec<String> {
        self.children(name)
            .filter_map(|child| child.value.clone())
            .collect()
    }
}

/// Read the document element, or `None` when the body holds no element at all.
pub(crate) fn parse_document(body: &[u8]) -> Result<Option<XmlElement>, XmlSyntaxError> {
    let mut reader = Reader::from_reader(body);
    let mut open: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => open.push(XmlElement::open(&start)?),
            Event::Empty(start) => {
                let element = XmlElement::open(&start)?;
                attach(&mut open, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = open.pop() {
                    attach(&mut open, &mut root, element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match open.pop() {
        Some(unclosed) => Err(XmlSyntaxError::Unclosed(unclosed.name)),
        None => Ok(root),
    }
}

fn attach(open: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

impl From<&XmlElement> for FhirPatient {
    fn from(patient: &XmlElement) -> Self {
        FhirPatient {
            meta: patient.child("meta").map(|meta| FhirMeta {
                profile: meta.values_of("profile"),
            }),
            identifier: patient.children("identifier").map(identifier).collect(),
            name: patient.children("name").map(human_name).collect(),
            telecom: patient.children("telecom").map(contact_point).collect(),
            address: patient.children("address").map(address).collect(),
            birth_date: patient.value_of("birthDate"),
            photo: patient
                .children("photo")
                .map(|_| serde_json::Value::Null)
                .collect(),
            contact: patient.children("contact").map(contact).collect(),
        }
    }
}

fn identifier(element: &XmlElement) -> FhirIdentifier {
    FhirIdentifier {
        kind: element.child("type").map(|concept| FhirCodeableConcept {
            coding: concept
                .children("coding")
                .map(|coding| FhirCoding {
                    code: coding.value_of("code"),
                })
                .collect(),
        }),
        value: element.value_of("value"),
    }
}

fn human_name(element: &XmlElement) -> FhirHumanName {
    FhirHumanName {
        text: element.value_of("text"),
        family: element.value_of("family"),
        given: element.values_of("given"),
        prefix: element.values_of("prefix"),
        suffix: element.values_of("suffix"),
    }
}

fn contact_point(element: &XmlElement) -> FhirContactPoint {
    FhirContactPoint {
        system: element.value_of("system"),
        value: element.value_of("value"),
    }
}

fn address(element: &XmlElement) -> FhirAddress {
    FhirAddress {
        usage: element.value_of("use"),
        text: element.value_of("text"),
        line: element.values_of("line"),
        city: element.value_of("city"),
        district: element.value_of("district"),
        state: element.value_of("state"),
        postal_code: element.value_of("postalCode"),
        country: element.value_of("country"),
    }
}

fn contact(element: &XmlElement) -> FhirPatientContact {
    FhirPatientContact {
        name: element.child("name").map(human_name),
        telecom: element.children("telecom").map(contact_point).collect(),
        address: element.child("address").map(address),
        organization: element.child("organization").map(|reference| FhirReference {
            reference: reference.value_of("reference"),
            display: reference.value_of("display"),
        }),
    }
}
