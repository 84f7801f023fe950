use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{error, info, warn};

use super::audit::{AuditEvent, AuditOutcome, AuditSink};
use super::auth::{AccessTokenValidator, AuthError};
use super::fhir::{
    decode_match_request, empty_searchset, IssueSeverity, IssueType, MatchRequestError,
    OperationOutcome, WireFormat,
};
use super::validator::{validate, ValidationOutcome};
use crate::config::AppConfig;

pub const MATCH_OPERATION: &str = "POST /Patient/$match";

/// Inbound `$match` request as seen by the orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchRequest<'a> {
    pub body: &'a [u8],
    pub content_type: Option<&'a str>,
    pub accept: Option<&'a str>,
    pub authorization: Option<&'a str>,
}

/// Fully rendered reply, ready to be written to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    /// Location of the Patient collection.
    pub location: String,
    pub body: String,
    pub audit: AuditOutcome,
    pub validation: Option<ValidationOutcome>,
}

/// Orchestrates authentication, decoding, validation, rendering and auditing.
pub struct PatientMatchService<S> {
    auth: AccessTokenValidator,
    audit: Arc<S>,
    base_url: String,
}

impl<S> PatientMatchService<S>
where
    S: AuditSink + 'static,
{
    pub fn new(auth: AccessTokenValidator, audit: Arc<S>, base_url: impl Into<String>) -> Self {
        Self {
            auth,
            audit,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig, audit: Arc<S>) -> Self {
        Self::new(
            AccessTokenValidator::from_config(&config.auth),
            audit,
            config.server.base_url(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn handle(&self, request: MatchRequest<'_>) -> MatchResponse {
        let request_format = match request.content_type {
            Some(raw) => WireFormat::from_media_type(raw),
            None => Some(WireFormat::Json),
        };
        let response_format = request
            .accept
            .and_then(WireFormat::from_accept)
            .or(request_format)
            .unwrap_or(WireFormat::Json);

        info!(
            request_format = request_format.map_or("unsupported", WireFormat::name),
            response_format = response_format.name(),
            "{MATCH_OPERATION}"
        );

        if let Err(err) = self.auth.authorize(request.authorization) {
            return self.unauthorized(err);
        }

        let response = match request_format {
            Some(format) => self.match_record(request.body, format, response_format),
            None => self.reject_request(MatchRequestError::UnsupportedMediaType, response_format),
        };

        self.record_audit(response.audit);
        response
    }

    fn match_record(
        &self,
        body: &[u8],
        request_format: WireFormat,
        format: WireFormat,
    ) -> MatchResponse {
        let record = match decode_match_request(body, request_format) {
            Ok(record) => record,
            Err(err) => return self.reject_request(err, format),
        };

        let outcome = validate(&record);
        if outcome.accepted {
            info!(
                tier = ?outcome.tier(),
                score = outcome.score,
                "minimum criteria met; candidate search not performed"
            );
            return self.respond(
                StatusCode::ACCEPTED,
                format,
                empty_searchset(format),
                AuditOutcome::Success,
                Some(outcome),
            );
        }

        warn!(
            classification = ?outcome.classification,
            score = outcome.score,
            "patient resource is not conformant to the claimed profile"
        );
        let body =
            OperationOutcome::new(IssueSeverity::Error, IssueType::Invalid, &outcome.reason)
                .render(format);
        self.respond(
            StatusCode::BAD_REQUEST,
            format,
            body,
            AuditOutcome::MinorFailure,
            Some(outcome),
        )
    }

    fn reject_request(&self, err: MatchRequestError, format: WireFormat) -> MatchResponse {
        let (status, outcome, audit) = match &err {
            MatchRequestError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                OperationOutcome::new(
                    IssueSeverity::Error,
                    IssueType::NotSupported,
                    err.to_string(),
                ),
                AuditOutcome::MinorFailure,
            ),
            err if err.is_malformed_input() => (
                StatusCode::BAD_REQUEST,
                OperationOutcome::new(
                    IssueSeverity::Error,
                    IssueType::Invalid,
                    err.to_string(),
                ),
                AuditOutcome::MinorFailure,
            ),
            err => (
                StatusCode::BAD_REQUEST,
                OperationOutcome::new(
                    IssueSeverity::Fatal,
                    IssueType::Structure,
                    err.to_string(),
                ),
                AuditOutcome::SeriousFailure,
            ),
        };

        if audit == AuditOutcome::SeriousFailure {
            error!(error = %err, "match request could not be processed");
        } else {
            warn!(error = %err, "match request rejected before validation");
        }

        self.respond(status, format, outcome.render(format), audit, None)
    }

    fn unauthorized(&self, err: AuthError) -> MatchResponse {
        warn!(error = ?err, "match request failed bearer token check");
        self.record_audit(AuditOutcome::MinorFailure);

        MatchResponse {
            status: StatusCode::UNAUTHORIZED,
            content_type: "application/json",
            location: self.patient_location(),
            body: serde_json::json!({ "error": err.to_string() }).to_string(),
            audit: AuditOutcome::MinorFailure,
            validation: None,
        }
    }

    fn respond(
        &self,
        status: StatusCode,
        format: WireFormat,
        body: String,
        audit: AuditOutcome,
        validation: Option<ValidationOutcome>,
    ) -> MatchResponse {
        MatchResponse {
            status,
            content_type: format.content_type(),
            location: self.patient_location(),
            body,
            audit,
            validation,
        }
    }

    fn patient_location(&self) -> String {
        format!("{}/Patient", self.base_url.trim_end_matches('/'))
    }

    fn record_audit(&self, outcome: AuditOutcome) {
        if let Err(err) = self
            .audit
            .record(AuditEvent::execute(outcome, MATCH_OPERATION))
        {
            error!(error = %err, "failed to record audit event");
        }
    }
}
