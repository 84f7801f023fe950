use serde_json::json;

use super::WireFormat;

const FHIR_NAMESPACE: &str = "http://hl7.org/fhir";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Fatal,
    Error,
}

impl IssueSeverity {
    pub fn code(self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    Invalid,
    Structure,
    NotSupported,
}

impl IssueType {
    pub fn code(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Structure => "structure",
            Self::NotSupported => "not-supported",
        }
    }
}

/// Single-issue `OperationOutcome` returned for every rejected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub severity: IssueSeverity,
    pub code: IssueType,
    pub text: String,
}

impl OperationOutcome {
    pub fn new(severity: IssueSeverity, code: IssueType, text: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            text: text.into(),
        }
    }

    pub fn render(&self, format: WireFormat) -> String {
        match format {
            WireFormat::Json => json!({
                "resourceType": "OperationOutcome",
                "issue": [{
                    "severity": self.severity.code(),
                    "code": self.code.code(),
                    "details": { "text": self.text },
                }],
            })
            .to_string(),
            WireFormat::Xml => format!(
                "<OperationOutcome xmlns=\"{FHIR_NAMESPACE}\"><issue>\
                 <severity value=\"{}\"/><code value=\"{}\"/>\
                 <details><text value=\"{}\"/></details>\
                 </issue></OperationOutcome>",
                self.severity.code(),
                self.code.code(),
                escape_attribute(&self.text),
            ),
        }
    }
}

/// Search-set bundle with no entries; candidate search is not performed.
pub fn empty_searchset(format: WireFormat) -> String {
    match format {
        WireFormat::Json => json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 0,
        })
        .to_string(),
        WireFormat::Xml => format!(
            "<Bundle xmlns=\"{FHIR_NAMESPACE}\"><type value=\"searchset\"/>\
             <total value=\"0\"/></Bundle>"
        ),
    }
}

fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
