//! Batch runner implementation.
//!
//! Drives one roster through the issuance pipeline:
//! - Column check, then credentials and a single mail session
//! - Rows strictly in input order, one at a time
//! - Session closed once, issuance log written once

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::codec::IdentifierCodec;
use crate::credentials::CredentialProvider;
use crate::mailer::{AttachmentFile, MailSession, Mailer};
use crate::metrics;
use crate::renderer::{RenderRequest, Renderer};
use crate::roster::{
    sheet_row, validate, AttendeeRecord, IssuanceLog, Roster, REQUIRED_COLUMNS,
};
use crate::template::TemplateResolver;

use super::config::BatchSettings;
use super::types::{
    BatchError, BatchPhase, BatchReport, RowOutcome, RowResult, SequenceCounter, SkipReason,
};

/// Issues tickets for every eligible row of a roster.
pub struct BatchRunner {
    settings: BatchSettings,
    codec: IdentifierCodec,
    templates: TemplateResolver,
    renderer: Arc<dyn Renderer>,
    mailer: Arc<dyn Mailer>,
    credentials: Arc<dyn CredentialProvider>,
    phase: Arc<RwLock<BatchPhase>>,
}

impl BatchRunner {
    pub fn new(
        settings: BatchSettings,
        codec: IdentifierCodec,
        templates: TemplateResolver,
        renderer: Arc<dyn Renderer>,
        mailer: Arc<dyn Mailer>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            settings,
            codec,
            templates,
            renderer,
            mailer,
            credentials,
            phase: Arc::new(RwLock::new(BatchPhase::Start)),
        }
    }

    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Current phase of the run.
    pub async fn phase(&self) -> BatchPhase {
        *self.phase.read().await
    }

    async fn set_phase(&self, phase: BatchPhase) {
        *self.phase.write().await = phase;
    }

    /// Runs the whole batch.
    ///
    /// Fails before any row is touched when required columns are missing,
    /// credentials are unavailable or the session cannot be opened; nothing
    /// is rendered, sent or logged in that case. Row failures never abort
    /// the run.
    pub async fn run(&self, roster: &Roster) -> Result<BatchReport, BatchError> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("batch", run_id = %run_id);

        let result = self.run_inner(roster, run_id).instrument(span).await;
        if result.is_err() {
            self.set_phase(BatchPhase::Fatal).await;
        }
        result
    }

    async fn run_inner(&self, roster: &Roster, run_id: String) -> Result<BatchReport, BatchError> {
        let started_at = Utc::now();
        self.set_phase(BatchPhase::Start).await;

        info!(
            "Roster has {} rows, columns: {:?}",
            roster.len(),
            roster.headers()
        );
        roster.require_columns(&REQUIRED_COLUMNS)?;

        tokio::fs::create_dir_all(&self.settings.output_dir)
            .await
            .map_err(|source| BatchError::OutputDir {
                path: self.settings.output_dir.clone(),
                source,
            })?;

        self.set_phase(BatchPhase::Authenticating).await;
        let credentials = self.credentials.credentials().await?;
        debug!(
            "Got credentials for {} via {}",
            credentials.username,
            self.credentials.method_name()
        );
        let mut session = self
            .mailer
            .open(&credentials)
            .await
            .map_err(BatchError::Authentication)?;
        drop(credentials);
        info!("Opened {} session", self.mailer.name());

        let mut log = IssuanceLog::from_roster(roster);
        let mut sequence = SequenceCounter::new();
        let mut rows = Vec::with_capacity(roster.len());

        for (index, record) in roster.records().enumerate() {
            self.set_phase(BatchPhase::Processing {
                row: sheet_row(index),
            })
            .await;

            let outcome = self
                .process_row(session.as_mut(), &mut sequence, index, &record)
                .await;

            metrics::ROWS_TOTAL
                .with_label_values(&[outcome.label()])
                .inc();
            if let Some(identifier) = outcome.issued_identifier() {
                log.record(index, identifier);
            }
            let pause = outcome.consumed_sequence();

            rows.push(RowResult {
                index,
                row: sheet_row(index),
                name: record.display_name(),
                outcome,
            });

            if pause && !self.settings.row_delay.is_zero() {
                tokio::time::sleep(self.settings.row_delay).await;
            }
        }

        self.set_phase(BatchPhase::Closing).await;
        if let Err(e) = session.close().await {
            warn!("Failed to close mail session: {}", e);
        }

        log.write_to_path(&self.settings.log_path)
            .map_err(BatchError::Log)?;

        let report = BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            rows,
            log_path: self.settings.log_path.clone(),
            log,
        };

        info!(
            "Batch complete: {} issued, {} skipped, log written to {:?}",
            report.issued(),
            report.skipped(),
            report.log_path
        );
        self.set_phase(BatchPhase::Done).await;

        Ok(report)
    }

    /// Processes one row: validate, number, render, send.
    ///
    /// Rows rejected for missing fields leave `sequence` untouched. Every
    /// other outcome, including render and delivery failures, consumes one
    /// sequence value.
    pub async fn process_row(
        &self,
        session: &mut dyn MailSession,
        sequence: &mut SequenceCounter,
        index: usize,
        record: &AttendeeRecord,
    ) -> RowOutcome {
        let row = sheet_row(index);

        let attendee = match validate(record) {
            Ok(attendee) => attendee,
            Err(missing) => {
                warn!(
                    "Row {}: skipping {}: {}",
                    row,
                    record.display_name(),
                    missing
                );
                return RowOutcome::Skipped(SkipReason::MissingFields(missing));
            }
        };

        let identifier = self.codec.encode(
            &attendee.speaker,
            &attendee.ticket_tier,
            &attendee.ticket_type,
            sequence.advance(),
        );
        if identifier.needs_triage() {
            warn!(
                "Row {}: unknown category for {} ({} / {} / {}), issued {}",
                row,
                attendee.full_name(),
                attendee.speaker,
                attendee.ticket_tier,
                attendee.ticket_type,
                identifier
            );
        }

        let template = self
            .templates
            .resolve(&attendee.speaker, &attendee.ticket_tier);
        if template.is_fallback {
            debug!("Row {}: using fallback template {:?}", row, template.path);
        }

        let file_name = identifier.artifact_file_name(&self.settings.artifact_extension);
        let request = RenderRequest {
            template: template.path.clone(),
            text: identifier.to_string(),
            output: self.settings.output_dir.join(&file_name),
        };

        let timer = metrics::RENDER_DURATION.start_timer();
        let rendered = self.renderer.render(request).await;
        timer.observe_duration();

        let artifact = match rendered {
            Ok(artifact) => artifact,
            Err(e) if e.is_resource_not_found() => {
                warn!(
                    "Row {}: skipping {}: template not found at {:?}",
                    row,
                    attendee.full_name(),
                    template.path
                );
                return RowOutcome::Skipped(SkipReason::ResourceNotFound {
                    identifier,
                    template: template.path,
                });
            }
            Err(e) => {
                warn!(
                    "Row {}: skipping {}: render failed: {}",
                    row,
                    attendee.full_name(),
                    e
                );
                return RowOutcome::Skipped(SkipReason::RenderFailed {
                    identifier,
                    error: e.to_string(),
                });
            }
        };

        let attachments = vec![
            AttachmentFile::new(artifact.path.clone(), file_name),
            self.settings.supplement.clone(),
        ];
        let message = self
            .settings
            .message
            .compose(&attendee, &identifier, attachments);

        let timer = metrics::DELIVERY_DURATION.start_timer();
        let sent = session.send(&message).await;
        timer.observe_duration();

        match sent {
            Ok(receipt) => {
                info!(
                    "Row {}: issued {} to {} <{}>",
                    row,
                    identifier,
                    attendee.full_name(),
                    attendee.email
                );
                RowOutcome::Issued {
                    identifier,
                    artifact,
                    receipt,
                }
            }
            Err(e) => {
                warn!(
                    "Row {}: skipping {}: delivery to {} failed: {}",
                    row,
                    attendee.full_name(),
                    attendee.email,
                    e
                );
                RowOutcome::Skipped(SkipReason::DeliveryFailed {
                    identifier,
                    error: e.to_string(),
                })
            }
        }
    }
}
