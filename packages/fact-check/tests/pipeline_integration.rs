//! Integration tests for the fact-check pipeline.
//!
//! These tests run the full flows against mocks:
//! 1. Fused text check (extraction + verdict in one backend call)
//! 2. Video check (transcript, claim extraction, sequential verification)
//! 3. Session state and progress reporting
//! 4. History recording

use async_trait::async_trait;
use fact_check::{
    testing::{agent_response, MockAgentCall},
    BackendKind, CheckSession, ClaimStatus, FactCheckConfig, FactCheckError, FactChecker,
    HistoryEntry, HistoryStore, MemoryStore, MockAgent, MockBackend, SessionEvent, SessionState,
    Settings, StatusKind, TranscriptSegment, AGENT_FALLBACK, NO_CREDENTIAL_MESSAGE,
};
use mockall::mock;

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const VIDEO_ID: &str = "dQw4w9WgXcQ";

fn checker(backend: MockBackend) -> FactChecker<MockBackend, MemoryStore> {
    FactChecker::new(backend, MemoryStore::new())
}

fn transcript() -> Vec<TranscriptSegment> {
    vec![
        TranscriptSegment::new(0.0, "Welcome back to the channel."),
        TranscriptSegment::new(12.5, "The Eiffel Tower is 330 metres tall."),
        TranscriptSegment::new(40.0, "Napoleon was very short."),
        TranscriptSegment::new(75.2, "Honey never spoils."),
    ]
}

const THREE_CLAIMS: &str = r#"{"claims": [
    {"text": "The Eiffel Tower is 330 metres tall", "timestamp": 12.5},
    {"text": "Napoleon was very short", "timestamp": 40.0},
    {"text": "Honey never spoils", "timestamp": 75.2}
]}"#;

// =============================================================================
// Fused text check
// =============================================================================

#[tokio::test]
async fn test_text_check_returns_verdict_and_records_history() {
    let backend = MockBackend::new().with_response(
        r#"{"status": "DEBUNKED", "summary": "Not visible to the naked eye.",
            "confidence": 0.92,
            "sources": [{"name": "NASA", "domain": "nasa.gov", "url": "https://www.nasa.gov/great-wall"}]}"#,
    );
    let checker = checker(backend.clone());

    let result = checker
        .check_text("The Great Wall of China is visible from space.")
        .await
        .unwrap();

    assert_eq!(result.claims.len(), 1);
    assert_eq!(result.claims[0].status, ClaimStatus::Debunked);
    assert_eq!(result.claims[0].sources[0].name, "NASA");
    assert!((result.overall_score - 0.92).abs() < 1e-9);
    assert_eq!(result.backend.as_deref(), Some("mock"));

    // One backend round-trip, asking for structured output
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].has_schema);
    assert!(calls[0].prompt.contains("The Great Wall of China"));

    let history = checker.history().list().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "The Great Wall of China is visible from space.");
    assert_eq!(history[0].result, "Debunked: Not visible to the naked eye.");
}

#[tokio::test]
async fn test_text_check_keeps_verdict_explanation_with_claims_list() {
    // Both the top-level verdict block and the claims list, as the prompt asks
    let backend = MockBackend::new().with_response(
        r#"{"status": "DEBUNKED", "summary": "The wall is not visible from orbit.",
            "correction": null, "confidence": 0.9,
            "sources": [{"name": "NASA", "domain": "nasa.gov", "url": "https://www.nasa.gov/great-wall"}],
            "claims": [{"text": "The Great Wall is visible from space", "status": "DEBUNKED"}]}"#,
    );
    let checker = checker(backend);

    let result = checker
        .check_text("The Great Wall is visible from space.")
        .await
        .unwrap();

    assert_eq!(result.claims.len(), 1);
    let claim = &result.claims[0];
    assert_eq!(claim.text, "The Great Wall is visible from space");
    assert_eq!(claim.correction.as_deref(), Some("The wall is not visible from orbit."));
    assert_eq!(claim.sources.len(), 1);
    assert_eq!(claim.sources[0].url, "https://www.nasa.gov/great-wall");

    let history = checker.history().list().await.unwrap();
    assert_eq!(history[0].result, "Debunked: The wall is not visible from orbit.");
}

#[tokio::test]
async fn test_not_factual_is_distinct_from_unverifiable() {
    let checker = checker(
        MockBackend::new()
            .with_response(r#"{"status":"NOT_FACTUAL","summary":"opinion, no claim"}"#)
            .with_response(r#"{"status":"UNVERIFIABLE","summary":"no sources found"}"#),
    );

    let opinion = checker.check_text("Pineapple belongs on pizza.").await.unwrap();
    let unknown = checker.check_text("My neighbour owns 40 cats.").await.unwrap();

    assert_eq!(opinion.claims.len(), 1);
    assert_eq!(opinion.claims[0].status, ClaimStatus::NotFactual);
    assert_eq!(opinion.claims[0].correction.as_deref(), Some("opinion, no claim"));
    assert!(opinion.is_not_factual());

    assert_eq!(unknown.claims[0].status, ClaimStatus::Unverifiable);
    assert_ne!(opinion.claims[0].status.kind(), unknown.claims[0].status.kind());
    assert_eq!(opinion.claims[0].status.kind(), StatusKind::NoClaim);
    assert_ne!(opinion.summary(), unknown.summary());
}

#[tokio::test]
async fn test_malformed_json_is_soft_failure() {
    let checker = checker(MockBackend::new().with_response("not json"));

    let result = checker.check_text("Water boils at 100C at sea level.").await.unwrap();

    assert_eq!(result.claims.len(), 1);
    assert_eq!(result.claims[0].status, ClaimStatus::Unknown);
    assert_eq!(result.claims[0].correction.as_deref(), Some("not json"));
    assert!(result.claims[0].sources.is_empty());
    assert!(result.parse_error.is_some());
}

#[tokio::test]
async fn test_backend_failure_propagates_for_text_check() {
    let checker = checker(MockBackend::new().failing("connection reset by peer"));

    let err = checker.check_text("Some claim.").await.unwrap_err();

    assert!(matches!(err, FactCheckError::Backend(_)));
    assert!(checker.history().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_text_is_invalid_input() {
    let backend = MockBackend::new().with_default_response("{}");
    let checker = checker(backend.clone());

    let err = checker.check_text("   \n ").await.unwrap_err();

    assert!(matches!(err, FactCheckError::InvalidInput { .. }));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_long_input_is_truncated_silently() {
    let backend = MockBackend::new().with_default_response(r#"{"status":"TRUE"}"#);
    let config = FactCheckConfig::default().with_max_input_chars(20);
    let checker = FactChecker::with_config(backend.clone(), MemoryStore::new(), config);

    let result = checker
        .check_text("alpha beta gamma delta epsilon zeta eta theta")
        .await
        .unwrap();

    assert_eq!(result.input_text, "alpha beta gamma");
    assert!(!backend.calls()[0].prompt.contains("delta"));
}

// =============================================================================
// Video pipeline
// =============================================================================

#[tokio::test]
async fn test_video_check_absorbs_single_claim_failure() {
    let backend = MockBackend::new().with_response(THREE_CLAIMS);
    let agent = MockAgent::new()
        .with_transcript(VIDEO_ID, transcript())
        .with_verdict(
            "The Eiffel Tower is 330 metres tall",
            agent_response(
                "It measures 330 m since 2022.",
                &[("Official site", "https://www.toureiffel.paris/en")],
                "True",
            ),
        )
        .with_failing_claim("Napoleon was very short")
        .with_verdict(
            "Honey never spoils",
            agent_response("Sealed honey keeps for millennia.", &[], "Partially true"),
        );
    let checker = checker(backend);
    let mut session = CheckSession::new();

    let result = checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap();

    assert_eq!(result.claims.len(), 3);
    assert_eq!(result.claims[0].status, ClaimStatus::Verified);
    assert_eq!(result.claims[0].timestamp, Some(12.5));
    assert_eq!(result.claims[0].sources[0].domain, "toureiffel.paris");

    assert_eq!(result.claims[1].status, ClaimStatus::Unverifiable);
    assert_eq!(result.claims[1].correction.as_deref(), Some(AGENT_FALLBACK));
    assert!(result.claims[1].sources.is_empty());

    assert_eq!(result.claims[2].status, ClaimStatus::PartiallyTrue);

    assert_eq!(session.state(), &SessionState::Done);
    assert_eq!(session.claims().len(), 3);
    assert_eq!(session.result().map(|r| r.id), Some(result.id));
}

#[tokio::test]
async fn test_video_verification_is_sequential_in_claim_order() {
    let agent = MockAgent::new()
        .with_transcript(VIDEO_ID, transcript())
        .with_default_verdict("Verification: true");
    let checker = checker(MockBackend::new().with_response(THREE_CLAIMS));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut session = CheckSession::new().with_progress(tx);

    checker
        .check_video(&mut session, VIDEO_ID, &agent, &agent)
        .await
        .unwrap();

    assert_eq!(
        agent.calls(),
        vec![
            MockAgentCall::Transcript { video_id: VIDEO_ID.into() },
            MockAgentCall::Verify { claim: "The Eiffel Tower is 330 metres tall".into() },
            MockAgentCall::Verify { claim: "Napoleon was very short".into() },
            MockAgentCall::Verify { claim: "Honey never spoils".into() },
        ]
    );

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(
        events,
        vec![
            SessionEvent::StateChanged(SessionState::Extracting),
            SessionEvent::Notice("Verifying 3 claims…".into()),
            SessionEvent::StateChanged(SessionState::Verifying { current: 1, total: 3 }),
            SessionEvent::StateChanged(SessionState::Verifying { current: 2, total: 3 }),
            SessionEvent::StateChanged(SessionState::Verifying { current: 3, total: 3 }),
            SessionEvent::StateChanged(SessionState::Done),
        ]
    );
}

#[tokio::test]
async fn test_every_claim_failing_still_returns_all_claims() {
    let agent = MockAgent::new().with_transcript(VIDEO_ID, transcript());
    let checker = checker(MockBackend::new().with_response(THREE_CLAIMS));
    let mut session = CheckSession::new();

    let result = checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap();

    assert_eq!(result.claims.len(), 3);
    assert!(result
        .claims
        .iter()
        .all(|c| c.status == ClaimStatus::Unverifiable && c.correction.as_deref() == Some(AGENT_FALLBACK)));
    assert_eq!(session.state(), &SessionState::Done);
}

#[tokio::test]
async fn test_video_without_claims_skips_verification() {
    let agent = MockAgent::new().with_transcript(VIDEO_ID, transcript());
    let checker = checker(MockBackend::new().with_response(r#"{"claims": []}"#));
    let mut session = CheckSession::new();

    let result = checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap();

    assert!(result.claims.is_empty());
    assert!(agent.verified_claims().is_empty());
    assert_eq!(session.state(), &SessionState::Done);
    assert_eq!(checker.history().list().await.unwrap()[0].result, "No factual claims found.");
}

#[tokio::test]
async fn test_unparseable_claims_skip_verification() {
    let agent = MockAgent::new().with_transcript(VIDEO_ID, transcript());
    let checker = checker(MockBackend::new().with_response("Sorry, I can't help with that."));
    let mut session = CheckSession::new();

    let result = checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap();

    assert!(result.parse_error.is_some());
    assert_eq!(result.claims[0].status, ClaimStatus::Unknown);
    assert!(agent.verified_claims().is_empty());
}

#[tokio::test]
async fn test_empty_transcript_ends_in_error() {
    let agent = MockAgent::new().with_transcript(VIDEO_ID, vec![TranscriptSegment::new(0.0, "  ")]);
    let backend = MockBackend::new().with_default_response(THREE_CLAIMS);
    let checker = checker(backend.clone());
    let mut session = CheckSession::new();

    let err = checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap_err();

    assert!(matches!(err, FactCheckError::NoTranscript { .. }));
    assert!(matches!(session.state(), SessionState::Error { .. }));
    assert_eq!(backend.call_count(), 0);
    assert!(checker.history().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_service_not_running_is_user_actionable() {
    let agent = MockAgent::new().unavailable();
    let checker = checker(MockBackend::new());
    let mut session = CheckSession::new();

    let err = checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap_err();

    assert!(matches!(err, FactCheckError::ServiceUnavailable { .. }));
    assert!(err.is_user_actionable());
    match session.state() {
        SessionState::Error { message } => assert!(message.contains("local agent service")),
        other => panic!("expected error state, got {}", other),
    }
}

#[tokio::test]
async fn test_backend_failure_during_extraction_ends_in_error() {
    let agent = MockAgent::new().with_transcript(VIDEO_ID, transcript());
    let checker = checker(MockBackend::new().failing("503 Service Unavailable"));
    let mut session = CheckSession::new();

    let err = checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap_err();

    assert!(matches!(err, FactCheckError::Backend(_)));
    assert!(matches!(session.state(), SessionState::Error { .. }));
}

#[tokio::test]
async fn test_invalid_video_reference() {
    let agent = MockAgent::new();
    let checker = checker(MockBackend::new());
    let mut session = CheckSession::new();

    let err = checker
        .check_video(&mut session, "https://example.com/not-a-video", &agent, &agent)
        .await
        .unwrap_err();

    assert!(matches!(err, FactCheckError::InvalidInput { .. }));
    assert!(agent.calls().is_empty());
}

#[tokio::test]
async fn test_session_cannot_be_reused() {
    let agent = MockAgent::new().with_transcript(VIDEO_ID, transcript());
    let checker = checker(MockBackend::new().with_default_response(r#"{"claims": []}"#));
    let mut session = CheckSession::new();

    checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap();
    let err = checker
        .check_video(&mut session, VIDEO_URL, &agent, &agent)
        .await
        .unwrap_err();

    assert!(matches!(err, FactCheckError::InvalidTransition { .. }));
    assert_eq!(session.state(), &SessionState::Done);
}

#[tokio::test]
async fn test_missing_credential_ends_session_in_error() {
    let mut session = CheckSession::new();

    let err = FactChecker::for_session(
        &mut session,
        &Settings::new().with_preferred_model(BackendKind::OpenAi),
        MemoryStore::new(),
        FactCheckConfig::default(),
    )
    .err()
    .unwrap();

    assert!(matches!(err, FactCheckError::Config(_)));
    match session.state() {
        SessionState::Error { message } => assert!(message.contains(NO_CREDENTIAL_MESSAGE)),
        other => panic!("expected error state, got {}", other),
    }
}

// =============================================================================
// History failures
// =============================================================================

mock! {
    pub History {}

    #[async_trait]
    impl HistoryStore for History {
        async fn append(&self, entry: HistoryEntry) -> fact_check::Result<()>;
        async fn list(&self) -> fact_check::Result<Vec<HistoryEntry>>;
        async fn clear(&self) -> fact_check::Result<()>;
    }
}

#[tokio::test]
async fn test_history_failure_does_not_fail_check() {
    let mut history = MockHistory::new();
    history.expect_append().times(1).returning(|_| {
        Err(FactCheckError::Storage(Box::new(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only storage",
        ))))
    });
    let checker = FactChecker::new(
        MockBackend::new().with_response(r#"{"status":"TRUE","summary":"Correct."}"#),
        history,
    );

    let result = checker.check_text("Paris is the capital of France.").await.unwrap();

    assert_eq!(result.claims[0].status, ClaimStatus::Verified);
}
