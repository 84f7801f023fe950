//! Demographic `Patient/$match` intake: minimum-criteria validation and weighted scoring.
//!
//! The core (`profile`, `extract`, `scoring`, `validator`) is pure and holds no state, so a
//! single record can be validated from any number of tasks at once. `service` and `router`
//! wrap it with bearer-token checks, FHIR wire handling and auditing. Candidate search against
//! stored records is not performed; accepted requests answer with an empty search-set bundle.

pub mod audit;
pub mod auth;
pub mod domain;
pub mod extract;
pub mod fhir;
pub mod profile;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validator;

#[cfg(test)]
mod tests;

pub use audit::{AuditError, AuditEvent, AuditOutcome, AuditSink, TracingAuditSink};
pub use auth::{AccessTokenValidator, AuthError};
pub use domain::{
    ContactParty, ContactPoint, Identifier, PersonName, PostalAddress, SubmittedRecord,
    TelecomSystem,
};
pub use extract::{extract, ExtractedFields};
pub use fhir::{decode_match_request, MatchRequestError, WireFormat};
pub use profile::{classify, Classification, ProfileTier};
pub use router::match_router;
pub use scoring::{breakdown, score, ScoreComponent, WeightSignal, MAX_SCORE};
pub use service::{MatchRequest, MatchResponse, PatientMatchService};
pub use validator::{validate, RejectionReason, ValidationOutcome, MISSING_OR_INVALID_PROFILE};
