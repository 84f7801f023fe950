use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use super::audit::AuditSink;
use super::service::{MatchRequest, PatientMatchService};

/// Router builder exposing the `Patient/$match` operation.
pub fn match_router<S>(service: Arc<PatientMatchService<S>>) -> Router
where
    S: AuditSink + 'static,
{
    Router::new()
        .route("/Patient/$match", post(match_handler::<S>))
        .with_state(service)
}

pub(crate) async fn match_handler<S>(
    State(service): State<Arc<PatientMatchService<S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    S: AuditSink + 'static,
{
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    let reply = service.handle(MatchRequest {
        body: &body,
        content_type: header_value(header::CONTENT_TYPE),
        accept: header_value(header::ACCEPT),
        authorization: header_value(header::AUTHORIZATION),
    });

    (
        reply.status,
        [
            (header::CONTENT_TYPE, reply.content_type.to_string()),
            (header::LOCATION, reply.location),
        ],
        reply.body,
    )
        .into_response()
}
