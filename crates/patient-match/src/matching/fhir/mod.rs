//! FHIR wire handling for `Patient/$match`: request decoding and response rendering.

mod decode;
mod encode;
mod resources;
mod xml;

pub use decode::{
    decode_match_request, MatchRequestError, MISSING_PARAMETER, REQUIRES_PARAMETERS,
    REQUIRES_PATIENT, UNSUPPORTED_MEDIA_TYPE,
};
pub use encode::{empty_searchset, IssueSeverity, IssueType, OperationOutcome};
pub use xml::XmlSyntaxError;

use mime::Mime;

/// Serialization the caller speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Xml,
}

impl WireFormat {
    /// Short name as used in `fhir+json` / `fhir+xml`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/fhir+json; charset=utf-8",
            Self::Xml => "application/fhir+xml; charset=utf-8",
        }
    }

    /// Interpret a single media type such as `application/fhir+json`.
    pub fn from_media_type(raw: &str) -> Option<Self> {
        let parsed: Mime = raw.trim().parse().ok()?;
        let is = |name: mime::Name<'_>| parsed.subtype() == name || parsed.suffix() == Some(name);

        if is(mime::JSON) {
            Some(Self::Json)
        } else if is(mime::XML) {
            Some(Self::Xml)
        } else {
            None
        }
    }

    /// First JSON or XML entry of an `Accept` header, in listed order.
    pub fn from_accept(raw: &str) -> Option<Self> {
        raw.split(',').find_map(Self::from_media_type)
    }
}
