use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Severity of the overall request outcome recorded for auditors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    MinorFailure,
    SeriousFailure,
}

impl AuditOutcome {
    /// FHIR `AuditEvent.outcome` code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Success => "0",
            Self::MinorFailure => "4",
            Self::SeriousFailure => "8",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Execute,
}

/// One entry per handled match request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub outcome: AuditOutcome,
    pub description: String,
    pub recorded: DateTime<Utc>,
}

impl AuditEvent {
    pub fn execute(outcome: AuditOutcome, description: impl Into<String>) -> Self {
        Self {
            action: AuditAction::Execute,
            outcome,
            description: description.into(),
            recorded: Utc::now(),
        }
    }
}

/// Destination for audit events (database, log pipeline, ...).
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Writes audit events to the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        info!(
            target: "audit",
            action = ?event.action,
            outcome = event.outcome.code(),
            description = %event.description,
            recorded = %event.recorded.to_rfc3339(),
            "audit event"
        );
        Ok(())
    }
}
