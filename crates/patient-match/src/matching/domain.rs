use serde::{Deserialize, Serialize};

/// Identifier type-code for passport numbers.
pub const PASSPORT_TYPE_CODE: &str = "PPN";
/// Identifier type-code for driver's licence numbers.
pub const DRIVERS_LICENSE_TYPE_CODE: &str = "DL";

/// Demographic record submitted for matching, already decoded from the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedRecord {
    /// Conformance profile the submitter claims the record meets.
    pub declared_profile: Option<String>,
    pub identifiers: Vec<Identifier>,
    pub telecom: Vec<ContactPoint>,
    pub addresses: Vec<PostalAddress>,
    pub name: Option<PersonName>,
    pub birth_date: Option<String>,
    pub has_photo: bool,
    pub contacts: Vec<ContactParty>,
}

/// Coded identifier such as a passport or licence number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub type_code: Option<String>,
    pub value: Option<String>,
}

impl Identifier {
    pub fn has_value(&self) -> bool {
        is_present(&self.value)
    }

    pub fn is_type(&self, code: &str) -> bool {
        self.type_code.as_deref() == Some(code)
    }

    /// Neither a type-code nor a value was supplied.
    pub fn is_empty(&self) -> bool {
        !is_present(&self.type_code) && !self.has_value()
    }
}

/// Channel a telecom entry reaches the person through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelecomSystem {
    Phone,
    Email,
    Other(String),
}

impl TelecomSystem {
    pub fn from_code(code: &str) -> Self {
        match code {
            "phone" => Self::Phone,
            "email" => Self::Email,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: Option<TelecomSystem>,
    pub value: Option<String>,
}

impl ContactPoint {
    pub fn is_reachable_by(&self, system: &TelecomSystem) -> bool {
        self.system.as_ref() == Some(system) && is_present(&self.value)
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_none() && !is_present(&self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    /// Usage tag such as `home`, `work` or `temp`.
    pub usage: Option<String>,
    pub lines: Vec<String>,
    pub city: Option<String>,
    /// Free-text rendering of the whole address.
    pub text: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl PostalAddress {
    pub fn has_street_line(&self) -> bool {
        self.lines.iter().any(|line| !line.trim().is_empty())
    }

    pub fn has_city(&self) -> bool {
        is_present(&self.city)
    }

    pub fn is_home(&self) -> bool {
        self.usage.as_deref() == Some("home")
    }

    /// No element of the address is populated.
    pub fn is_empty(&self) -> bool {
        !self.has_street_line()
            && self.usage.is_none()
            && [
                &self.city,
                &self.text,
                &self.district,
                &self.state,
                &self.postal_code,
                &self.country,
            ]
            .into_iter()
            .all(|part| !is_present(part))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub given: Vec<String>,
    pub family: Option<String>,
    /// Full name as a single display string.
    pub text: Option<String>,
    pub prefix: Vec<String>,
    pub suffix: Vec<String>,
}

impl PersonName {
    pub fn first_given(&self) -> Option<&str> {
        self.given
            .iter()
            .map(|part| part.trim())
            .find(|part| !part.is_empty())
    }

    pub fn family(&self) -> Option<&str> {
        self.family
            .as_deref()
            .map(str::trim)
            .filter(|family| !family.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.first_given().is_none()
            && self.family().is_none()
            && !is_present(&self.text)
            && self
                .prefix
                .iter()
                .chain(&self.suffix)
                .all(|part| part.trim().is_empty())
    }
}

/// Emergency or guardian contact attached to the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactParty {
    pub name: Option<PersonName>,
    pub telecom: Vec<ContactPoint>,
    pub address: Option<PostalAddress>,
    pub organization: Option<String>,
}

impl ContactParty {
    /// A contact counts when it carries any way to identify or reach the party.
    pub fn is_qualifying(&self) -> bool {
        self.name.as_ref().is_some_and(|name| !name.is_empty())
            || self.telecom.iter().any(|point| !point.is_empty())
            || self
                .address
                .as_ref()
                .is_some_and(|address| !address.is_empty())
            || is_present(&self.organization)
    }
}

pub(crate) fn is_present(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|value| !value.trim().is_empty())
}
