//! Export orchestration
//!
//! One export at a time: a busy flag is raised for the whole call and a
//! second trigger while it is up does nothing. Every error from layout or
//! delivery is caught here, reported once, and never retried.

use super::filename::{derive_title, output_filename};
use super::sink::ArtifactSink;
use crate::config::PageGeometry;
use crate::error::{ExportError, ExportResult};
use crate::message::{Notification, Notifier};
use crate::pdf::{layout_document, render_pdf};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// A generated PDF ready for delivery
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub title: String,
    pub filename: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Summary of a delivered export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub title: String,
    pub filename: String,
    pub path: PathBuf,
    pub page_count: usize,
    pub size_bytes: usize,
}

/// Result of triggering an export
#[derive(Debug)]
pub enum ExportOutcome {
    /// The document was generated and delivered
    Delivered(ExportReport),
    /// The export failed and the user was notified
    Failed(ExportError),
    /// Another export was in flight; nothing happened
    Busy,
}

/// Clears the busy flag when dropped
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Runs exports and guards against overlapping ones
#[derive(Debug)]
pub struct ExportController {
    busy: AtomicBool,
    geometry: PageGeometry,
    default_title: String,
}

impl ExportController {
    pub fn new(default_title: impl Into<String>) -> Self {
        Self::with_geometry(default_title, PageGeometry::a4())
    }

    pub fn with_geometry(default_title: impl Into<String>, geometry: PageGeometry) -> Self {
        Self {
            busy: AtomicBool::new(false),
            geometry,
            default_title: default_title.into(),
        }
    }

    /// Whether an export is in flight; the trigger should be disabled while true
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Raise the busy flag, or `None` if it is already up
    pub fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag: &self.busy })
    }

    /// Generate the PDF for a buffer snapshot without delivering it
    pub fn build(&self, snapshot: &str, now: DateTime<Utc>) -> ExportResult<ExportArtifact> {
        let title = derive_title(snapshot, &self.default_title);
        log::debug!("Exporting \"{}\" ({} bytes of markdown)", title, snapshot.len());

        let plan = layout_document(snapshot, &self.geometry)?;
        for placement in &plan.placements {
            log::trace!(
                "line {} {:?} on page {} at {:.1}mm ({} runs)",
                placement.source_line + 1,
                placement.kind,
                placement.page + 1,
                placement.y,
                placement.sub_lines
            );
        }
        let bytes = render_pdf(&plan, &title);
        let filename = output_filename(&title, now);

        Ok(ExportArtifact {
            title,
            filename,
            page_count: plan.page_count(),
            bytes,
        })
    }

    /// Export a buffer snapshot, stamping the filename with the current time
    pub async fn export<S, N>(
        &self,
        snapshot: String,
        sink: &mut S,
        notifier: &mut N,
    ) -> ExportOutcome
    where
        S: ArtifactSink,
        N: Notifier,
    {
        self.export_at(snapshot, Utc::now(), sink, notifier).await
    }

    /// Export a buffer snapshot with an explicit timestamp
    pub async fn export_at<S, N>(
        &self,
        snapshot: String,
        now: DateTime<Utc>,
        sink: &mut S,
        notifier: &mut N,
    ) -> ExportOutcome
    where
        S: ArtifactSink,
        N: Notifier,
    {
        let Some(_guard) = self.try_begin() else {
            log::debug!("Export already in progress, ignoring trigger");
            return ExportOutcome::Busy;
        };

        match self.run(&snapshot, now, sink).await {
            Ok(report) => {
                notifier.notify(Notification::ExportSucceeded {
                    title: report.title.clone(),
                    filename: report.filename.clone(),
                });
                ExportOutcome::Delivered(report)
            }
            Err(err) => {
                log::error!("PDF generation failed: {}", err);
                notifier.notify(Notification::ExportFailed {
                    message: err.user_message(),
                });
                ExportOutcome::Failed(err)
            }
        }
    }

    async fn run<S: ArtifactSink>(
        &self,
        snapshot: &str,
        now: DateTime<Utc>,
        sink: &mut S,
    ) -> ExportResult<ExportReport> {
        let artifact = self.build(snapshot, now)?;
        let size_bytes = artifact.bytes.len();
        let path = sink.deliver(&artifact.filename, artifact.bytes).await?;

        Ok(ExportReport {
            title: artifact.title,
            filename: artifact.filename,
            path,
            page_count: artifact.page_count,
            size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TITLE;
    use crate::error::LayoutError;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[derive(Default)]
    struct MemorySink {
        delivered: Vec<(String, Vec<u8>)>,
    }

    impl ArtifactSink for MemorySink {
        async fn deliver(&mut self, filename: &str, bytes: Vec<u8>) -> ExportResult<PathBuf> {
            self.delivered.push((filename.to_string(), bytes));
            Ok(PathBuf::from(filename))
        }
    }

    struct FailingSink;

    impl ArtifactSink for FailingSink {
        async fn deliver(&mut self, filename: &str, _bytes: Vec<u8>) -> ExportResult<PathBuf> {
            Err(ExportError::Write {
                path: PathBuf::from(filename),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    /// Records the controller's state while delivery is in progress
    struct StateRecordingSink<'a> {
        controller: &'a ExportController,
        busy_during_delivery: Option<bool>,
        second_trigger_blocked: Option<bool>,
    }

    impl ArtifactSink for StateRecordingSink<'_> {
        async fn deliver(&mut self, filename: &str, _bytes: Vec<u8>) -> ExportResult<PathBuf> {
            self.busy_during_delivery = Some(self.controller.is_busy());
            self.second_trigger_blocked = Some(self.controller.try_begin().is_none());
            Ok(PathBuf::from(filename))
        }
    }

    #[tokio::test]
    async fn test_end_to_end_export() {
        let controller = ExportController::new(DEFAULT_TITLE);
        let mut sink = MemorySink::default();
        let mut notes: Vec<Notification> = Vec::new();

        let outcome = controller
            .export_at(
                "# Title\n\nSome text here.".to_string(),
                fixed_time(),
                &mut sink,
                &mut notes,
            )
            .await;

        let report = match outcome {
            ExportOutcome::Delivered(report) => report,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(report.title, "Title");
        assert_eq!(report.filename, "title-2024-01-02T03-04-05.pdf");
        assert!(report.filename.starts_with("title-"));
        assert_eq!(report.page_count, 1);

        assert_eq!(sink.delivered.len(), 1);
        assert!(sink.delivered[0].1.starts_with(b"%PDF-"));
        assert_eq!(report.size_bytes, sink.delivered[0].1.len());

        assert_eq!(
            notes,
            vec![Notification::ExportSucceeded {
                title: "Title".to_string(),
                filename: "title-2024-01-02T03-04-05.pdf".to_string(),
            }]
        );
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_default_title_used_without_heading() {
        let controller = ExportController::new(DEFAULT_TITLE);
        let mut sink = MemorySink::default();
        let mut notes: Vec<Notification> = Vec::new();

        controller
            .export_at("just text".to_string(), fixed_time(), &mut sink, &mut notes)
            .await;
        assert_eq!(sink.delivered[0].0, "markdown-document-2024-01-02T03-04-05.pdf");
    }

    #[tokio::test]
    async fn test_busy_flag_spans_the_call() {
        let controller = ExportController::new(DEFAULT_TITLE);
        assert!(!controller.is_busy());

        let mut recorder = StateRecordingSink {
            controller: &controller,
            busy_during_delivery: None,
            second_trigger_blocked: None,
        };
        let mut notes: Vec<Notification> = Vec::new();
        let outcome = controller
            .export("# Doc".to_string(), &mut recorder, &mut notes)
            .await;

        assert!(matches!(outcome, ExportOutcome::Delivered(_)));
        assert_eq!(recorder.busy_during_delivery, Some(true));
        assert_eq!(recorder.second_trigger_blocked, Some(true));
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_trigger_while_busy_is_noop() {
        let controller = ExportController::new(DEFAULT_TITLE);
        let guard = controller.try_begin().unwrap();

        let mut sink = MemorySink::default();
        let mut notes: Vec<Notification> = Vec::new();
        let outcome = controller
            .export("# Doc".to_string(), &mut sink, &mut notes)
            .await;

        assert!(matches!(outcome, ExportOutcome::Busy));
        assert!(sink.delivered.is_empty());
        assert!(notes.is_empty());
        assert!(controller.is_busy());

        drop(guard);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_delivery_failure_reported_once_and_flag_cleared() {
        let controller = ExportController::new(DEFAULT_TITLE);
        let mut notes: Vec<Notification> = Vec::new();

        let outcome = controller
            .export("# Doc".to_string(), &mut FailingSink, &mut notes)
            .await;

        assert!(matches!(outcome, ExportOutcome::Failed(ExportError::Write { .. })));
        assert_eq!(notes.len(), 1);
        assert!(matches!(notes[0], Notification::ExportFailed { .. }));
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_layout_failure_delivers_nothing() {
        let geometry = PageGeometry {
            width: 30.0,
            height: 297.0,
            margin: 20.0,
        };
        let controller = ExportController::with_geometry(DEFAULT_TITLE, geometry);
        let mut sink = MemorySink::default();
        let mut notes: Vec<Notification> = Vec::new();

        let outcome = controller
            .export("# Doc".to_string(), &mut sink, &mut notes)
            .await;

        assert!(matches!(
            outcome,
            ExportOutcome::Failed(ExportError::Layout(LayoutError::InvalidGeometry { .. }))
        ));
        assert!(sink.delivered.is_empty());
        assert_eq!(notes.len(), 1);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_build_is_repeatable() {
        let controller = ExportController::new(DEFAULT_TITLE);
        let source = "# Repeat\n\n- one\n- two\n\n> quote\n".repeat(30);
        let first = controller.build(&source, fixed_time()).unwrap();
        let second = controller.build(&source, fixed_time()).unwrap();
        assert_eq!(first.page_count, second.page_count);
        assert_eq!(first.bytes, second.bytes);
    }
}
