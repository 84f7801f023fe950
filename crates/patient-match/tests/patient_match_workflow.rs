//! End-to-end behavior of the `Patient/$match` intake through the public service facade and
//! HTTP router.

mod common {
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};

    use patient_match::matching::{
        AccessTokenValidator, AuditError, AuditEvent, AuditSink, PatientMatchService,
    };

    pub(super) const TOKEN: &str = "integration-token";

    #[derive(Default)]
    pub(super) struct RecordingAudit {
        pub(super) events: Mutex<Vec<AuditEvent>>,
    }

    impl AuditSink for RecordingAudit {
        fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
            self.events.lock().expect("audit mutex").push(event);
            Ok(())
        }
    }

    pub(super) fn build_service() -> (Arc<PatientMatchService<RecordingAudit>>, Arc<RecordingAudit>)
    {
        let audit = Arc::new(RecordingAudit::default());
        let service = Arc::new(PatientMatchService::new(
            AccessTokenValidator::new(vec![TOKEN.to_string()]),
            audit.clone(),
            "https://match.example.org/fhir",
        ));
        (service, audit)
    }

    pub(super) fn parameters(patient: Value) -> String {
        json!({
            "resourceType": "Parameters",
            "id": "match-request",
            "parameter": [
                { "name": "resource", "resource": patient },
                { "name": "count", "valueInteger": 5 }
            ]
        })
        .to_string()
    }

    pub(super) fn level1_patient() -> Value {
        json!({
            "resourceType": "Patient",
            "meta": {
                "profile": ["http://hl7.org/fhir/us/identity-matching/StructureDefinition/IDI-Patient-L1"]
            },
            "identifier": [
                {
                    "type": { "coding": [{ "code": "PPN" }] },
                    "value": "P-55012"
                },
                {
                    "type": { "coding": [{ "code": "DL" }] },
                    "value": "OH-77120"
                }
            ],
            "name": [{ "family": "Nguyen", "given": ["Linh"] }],
            "birthDate": "1991-11-30",
            "contact": [{ "telecom": [{ "system": "phone", "value": "+1 555 0142" }] }]
        })
    }
}

mod validation {
    use patient_match::matching::{
        decode_match_request, extract, score, validate, Classification, ProfileTier, WireFormat,
    };

    use super::common::*;

    #[test]
    fn decoded_level1_patient_reaches_maximum_weighted_tier() {
        let record =
            decode_match_request(parameters(level1_patient()).as_bytes(), WireFormat::Json)
                .expect("request decodes");

        let fields = extract(&record);
        assert_eq!(score(&fields), 26);

        let outcome = validate(&record);
        assert!(outcome.accepted);
        assert_eq!(
            outcome.classification,
            Classification::Tier(ProfileTier::Level1)
        );
    }

    #[test]
    fn level1_without_driver_licence_falls_short() {
        let mut patient = level1_patient();
        patient["identifier"]
            .as_array_mut()
            .expect("identifiers")
            .truncate(1);

        let record = decode_match_request(parameters(patient).as_bytes(), WireFormat::Json)
            .expect("request decodes");
        let outcome = validate(&record);

        assert_eq!(outcome.score, 16);
        assert!(!outcome.accepted);
        assert!(outcome.reason.contains("IDI-Patient-L1"));
    }
}

mod routing {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use patient_match::matching::{match_router, AuditOutcome};
    use tower::ServiceExt;

    use super::common::*;

    #[tokio::test]
    async fn accepted_match_is_audited_once() {
        let (service, audit) = build_service();
        let app = match_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/Patient/$match")
                    .header(header::CONTENT_TYPE, "application/fhir+json")
                    .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                    .body(Body::from(parameters(level1_patient())))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("https://match.example.org/fhir/Patient")
        );

        let events = audit.events.lock().expect("audit mutex").clone();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, AuditOutcome::Success);
        assert_eq!(events[0].description, "POST /Patient/$match");
    }

    #[tokio::test]
    async fn xml_accept_renders_operation_outcome() {
        let (service, audit) = build_service();
        let app = match_router(service);
        let mut patient = level1_patient();
        patient["meta"]["profile"][0] = "urn:unknown-profile".into();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/Patient/$match")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::ACCEPT, "application/fhir+xml")
                    .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                    .body(Body::from(parameters(patient)))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("body");
        let xml = String::from_utf8(body.to_vec()).expect("utf-8");
        assert!(xml.starts_with("<OperationOutcome"));
        assert!(xml.contains("profile is missing or not defined"));

        let events = audit.events.lock().expect("audit mutex").clone();
        assert_eq!(events[0].outcome, AuditOutcome::MinorFailure);
    }
}
