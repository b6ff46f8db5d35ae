//! Batch lifecycle integration tests.
//!
//! These tests drive the batch runner with mock renderer and mailer:
//! - End-to-end issuance and the issuance log
//! - Sequence numbering across skipped rows
//! - Template fallback
//! - Session opened and closed exactly once
//! - Fatal setup failures

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use admit_core::{
    batch::{BatchError, BatchPhase, BatchRunner, RowOutcome, SkipReason},
    codec::IdentifierCodec,
    credentials::CredentialError,
    mailer::MailError,
    renderer::RenderError,
    roster::{Roster, RosterError},
    template::TemplateResolver,
    testing::{fixtures, MockCredentialProvider, MockMailer, MockRenderer},
};

/// Test helper wiring a runner to mocks in a temp directory.
struct TestHarness {
    runner: BatchRunner,
    renderer: Arc<MockRenderer>,
    mailer: Arc<MockMailer>,
    credentials: Arc<MockCredentialProvider>,
    temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    fn with_delay(delay: Duration) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let renderer = Arc::new(MockRenderer::new());
        let mailer = Arc::new(MockMailer::new());
        let credentials = Arc::new(MockCredentialProvider::default());

        let runner = BatchRunner::new(
            fixtures::settings(temp_dir.path()).with_row_delay(delay),
            IdentifierCodec::new(fixtures::codes()),
            TemplateResolver::new(temp_dir.path().join("templates"), "jpeg", fixtures::codes()),
            renderer.clone(),
            mailer.clone(),
            credentials.clone(),
        );

        Self {
            runner,
            renderer,
            mailer,
            credentials,
            temp_dir,
        }
    }

    fn log_path(&self) -> PathBuf {
        self.temp_dir.path().join("out").join("issued_tickets.csv")
    }

    fn add_template(&self, relative: &str) -> PathBuf {
        let path = self.temp_dir.path().join("templates").join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"template").unwrap();
        path
    }
}

/// Alice is complete, Bob has no email, Carol is a full-day platinum+ early bird.
fn scenario() -> Roster {
    fixtures::roster(&[
        ["Alice", "Smith", "alice@x.com", "Pankaj Rai", "regular", "gold"],
        ["Bob", "", "", "Sarika Singh", "full-day", "silver"],
        ["Carol", "", "carol@x.com", "Full-Day", "early bird", "platinum+"],
    ])
}

fn identifiers(report: &admit_core::BatchReport) -> Vec<String> {
    report.log.identifiers().map(str::to_string).collect()
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let harness = TestHarness::new();

    let report = harness.runner.run(&scenario()).await.unwrap();

    assert_eq!(report.issued(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.sequences_used(), 2);
    assert_eq!(
        identifiers(&report),
        vec![
            "PR-GR-0001-C2A835".to_string(),
            String::new(),
            "FD-PPE-0002-B4C905".to_string(),
        ]
    );

    // Bob is reported at sheet row 3 and never reaches the renderer
    assert_eq!(report.rows[1].row, 3);
    assert!(matches!(
        &report.rows[1].outcome,
        RowOutcome::Skipped(SkipReason::MissingFields(missing)) if missing.fields == vec!["Email ID"]
    ));
    assert_eq!(harness.renderer.render_count().await, 2);

    let sent = harness.mailer.sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "alice@x.com");
    assert!(sent[0].subject.contains("PR-GR-0001-C2A835"));
    assert!(sent[0].body.contains("Dear Alice Smith,"));
    assert!(sent[0].body.contains("PR-GR-0001-C2A835"));
    assert_eq!(sent[0].attachments.len(), 2);
    assert_eq!(sent[0].attachments[0].filename, "ticket_PR-GR-0001-C2A835.jpeg");
    assert_eq!(sent[0].attachments[1].filename, "Rules.pdf");
    assert_eq!(sent[1].to, "carol@x.com");
    assert!(sent[1].subject.contains("FD-PPE-0002-B4C905"));

    let written = std::fs::read_to_string(harness.log_path()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines[0],
        "First Name,Last Name,Email ID,Speaker,Ticket Type,Ticket Tier,Ticket Number"
    );
    assert_eq!(
        lines[1],
        "Alice,Smith,alice@x.com,Pankaj Rai,regular,gold,PR-GR-0001-C2A835"
    );
    assert_eq!(lines[2], "Bob,,,Sarika Singh,full-day,silver,");
    assert!(lines[3].ends_with(",FD-PPE-0002-B4C905"));

    assert_eq!(harness.runner.phase().await, BatchPhase::Done);
}

#[tokio::test]
async fn test_session_opened_and_closed_once() {
    let harness = TestHarness::new();
    harness.mailer.fail_for_recipient("alice@x.com").await;

    harness.runner.run(&scenario()).await.unwrap();

    assert_eq!(harness.credentials.request_count().await, 1);
    assert_eq!(
        harness.mailer.recorded_opens().await,
        vec!["tickets@example.org".to_string()]
    );
    assert_eq!(harness.mailer.close_count().await, 1);
}

#[tokio::test]
async fn test_render_failure_burns_sequence() {
    let harness = TestHarness::new();
    harness
        .renderer
        .set_next_error(RenderError::DecodeFailed {
            path: PathBuf::from("templates/General/General.jpeg"),
            reason: "truncated".to_string(),
        })
        .await;

    let report = harness.runner.run(&scenario()).await.unwrap();

    match &report.rows[0].outcome {
        RowOutcome::Skipped(SkipReason::RenderFailed { identifier, .. }) => {
            assert_eq!(identifier.as_str(), "PR-GR-0001-C2A835");
        }
        other => panic!("expected render failure, got {:?}", other),
    }
    assert_eq!(
        identifiers(&report),
        vec![String::new(), String::new(), "FD-PPE-0002-B4C905".to_string()]
    );
    assert_eq!(harness.mailer.send_attempts().await, 1);
}

#[tokio::test]
async fn test_delivery_failure_is_isolated() {
    let harness = TestHarness::new();
    harness.mailer.fail_for_recipient("alice@x.com").await;

    let report = harness.runner.run(&scenario()).await.unwrap();

    assert_eq!(report.count("delivery_failed"), 1);
    assert_eq!(report.issued(), 1);
    assert_eq!(
        identifiers(&report),
        vec![String::new(), String::new(), "FD-PPE-0002-B4C905".to_string()]
    );
    assert_eq!(harness.mailer.send_attempts().await, 2);
}

#[tokio::test]
async fn test_missing_template_skips_row() {
    let harness = TestHarness::new();
    harness.renderer.set_check_templates(true).await;
    harness.add_template("Full-Day/Full-Day_platinum+.jpeg");

    let report = harness.runner.run(&scenario()).await.unwrap();

    match &report.rows[0].outcome {
        RowOutcome::Skipped(SkipReason::ResourceNotFound { template, .. }) => {
            assert!(template.ends_with("General/General.jpeg"));
        }
        other => panic!("expected missing template, got {:?}", other),
    }
    assert_eq!(report.count("resource_not_found"), 1);
    assert_eq!(
        identifiers(&report),
        vec![String::new(), String::new(), "FD-PPE-0002-B4C905".to_string()]
    );
}

#[tokio::test]
async fn test_template_fallback() {
    let harness = TestHarness::new();
    let exact = harness.add_template("Pankaj Rai/Pankaj Rai_gold.jpeg");
    let general = harness.add_template("General/General.jpeg");

    let roster = fixtures::roster(&[
        ["Alice", "", "alice@x.com", "Pankaj Rai", "regular", "gold"],
        ["Dan", "", "dan@x.com", "Unknown Speaker", "regular", "gold"],
        ["Eve", "", "eve@x.com", "Pankaj Rai", "regular", "diamond"],
    ]);
    harness.runner.run(&roster).await.unwrap();

    let templates: Vec<PathBuf> = harness
        .renderer
        .recorded_renders()
        .await
        .into_iter()
        .map(|r| r.request.template)
        .collect();
    assert_eq!(templates, vec![exact, general.clone(), general]);
}

#[tokio::test]
async fn test_unknown_categories_use_sentinels() {
    let harness = TestHarness::new();
    let roster = fixtures::roster(&[["Dan", "", "dan@x.com", "Nobody", "vip", "bronze"]]);

    let report = harness.runner.run(&roster).await.unwrap();

    let identifier = report.rows[0].outcome.issued_identifier().unwrap();
    assert!(identifier.as_str().starts_with("XX-XX-0001-"));
    assert!(identifier.needs_triage());
}

#[tokio::test]
async fn test_missing_columns_is_fatal() {
    let harness = TestHarness::new();

    let result = harness
        .runner
        .run(&fixtures::roster_without("Email ID"))
        .await;

    match result {
        Err(BatchError::Roster(RosterError::MissingColumns { missing, .. })) => {
            assert_eq!(missing, vec!["Email ID".to_string()]);
        }
        other => panic!("expected missing columns, got {:?}", other.map(|_| ())),
    }
    assert_eq!(harness.credentials.request_count().await, 0);
    assert_eq!(harness.mailer.open_count().await, 0);
    assert_eq!(harness.renderer.render_count().await, 0);
    assert!(!harness.log_path().exists());
    assert_eq!(harness.runner.phase().await, BatchPhase::Fatal);
}

#[tokio::test]
async fn test_authentication_failure_is_fatal() {
    let harness = TestHarness::new();
    harness
        .mailer
        .set_next_open_error(MailError::Authentication("535 bad credentials".to_string()))
        .await;

    let result = harness.runner.run(&scenario()).await;

    assert!(matches!(result, Err(BatchError::Authentication(_))));
    assert_eq!(harness.renderer.render_count().await, 0);
    assert_eq!(harness.mailer.send_attempts().await, 0);
    assert_eq!(harness.mailer.close_count().await, 0);
    assert!(!harness.log_path().exists());
}

#[tokio::test]
async fn test_credentials_failure_is_fatal() {
    let harness = TestHarness::new();
    harness
        .credentials
        .set_next_error(CredentialError::Empty)
        .await;

    let result = harness.runner.run(&scenario()).await;

    assert!(matches!(result, Err(BatchError::Credentials(_))));
    assert_eq!(harness.mailer.open_count().await, 0);
    assert!(!harness.log_path().exists());
}

#[tokio::test]
async fn test_close_failure_is_not_fatal() {
    let harness = TestHarness::new();
    harness
        .mailer
        .set_next_close_error(MailError::Connection("reset by peer".to_string()))
        .await;

    let report = harness.runner.run(&scenario()).await.unwrap();

    assert_eq!(report.issued(), 2);
    assert_eq!(harness.mailer.close_count().await, 1);
    assert!(harness.log_path().exists());
}

#[tokio::test]
async fn test_row_delay_after_accepted_rows() {
    let harness = TestHarness::with_delay(Duration::from_millis(100));

    let started = Instant::now();
    harness.runner.run(&scenario()).await.unwrap();
    let elapsed = started.elapsed();

    // Two accepted rows pause, the rejected row does not
    assert!(elapsed >= Duration::from_millis(200), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(290), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_empty_roster_still_writes_log() {
    let harness = TestHarness::new();

    let report = harness.runner.run(&fixtures::roster(&[])).await.unwrap();

    assert!(report.rows.is_empty());
    assert_eq!(harness.mailer.open_count().await, 1);
    assert_eq!(harness.mailer.close_count().await, 1);
    let written = std::fs::read_to_string(harness.log_path()).unwrap();
    assert!(written.starts_with("First Name,"));
    assert!(written.trim_end().ends_with("Ticket Number"));
}
