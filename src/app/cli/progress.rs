use crate::domain::{Phase, ProgressEvent};
use crate::ports::ProgressReporter;

/// Progress lines on stderr so stdout stays clean for the article.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleProgress {
    target_length: usize,
}

impl ConsoleProgress {
    pub fn new(target_length: usize) -> Self {
        Self { target_length }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::PhaseEntered(Phase::Drafting) => eprintln!("⏳ Drafting article..."),
            ProgressEvent::PhaseEntered(Phase::Finalizing) => eprintln!("⏳ Finalizing..."),
            ProgressEvent::PhaseEntered(_) => {}
            ProgressEvent::PlanReady { headings } => {
                eprintln!("  Heading plan: {} candidate(s)", headings)
            }
            ProgressEvent::DraftReceived { metrics, .. } => eprintln!(
                "  First draft: {}/{} chars, {} section(s), {} subsection(s)",
                metrics.normalized_length,
                self.target_length,
                metrics.section_count,
                metrics.subsection_count
            ),
            ProgressEvent::ContinuationMerged { iteration, max_retries, metrics, .. } => {
                eprintln!(
                    "  Continuation {}/{}: {}/{} chars, {} section(s), {} subsection(s)",
                    iteration,
                    max_retries,
                    metrics.normalized_length,
                    self.target_length,
                    metrics.section_count,
                    metrics.subsection_count
                )
            }
            ProgressEvent::SummaryAppended { .. } => eprintln!("  Summary appended"),
            ProgressEvent::Finished { .. } => {}
        }
    }
}
