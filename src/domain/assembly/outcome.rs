use std::fmt;

use crate::domain::draft::DraftMetrics;

/// Assembler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Drafting,
    Expanding,
    Finalizing,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Drafting => "drafting",
            Phase::Expanding => "expanding",
            Phase::Finalizing => "finalizing",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStatus {
    /// Every threshold was met.
    Complete,
    /// The retry guard ran out first; the text is best-effort.
    Shortfall,
    /// The run was stopped early; the text is whatever had been accumulated.
    Cancelled,
}

impl AssemblyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyStatus::Complete => "complete",
            AssemblyStatus::Shortfall => "shortfall",
            AssemblyStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AssemblyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable steps of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    PhaseEntered(Phase),
    PlanReady { headings: usize },
    DraftReceived { metrics: DraftMetrics, discarded_summaries: usize },
    ContinuationMerged {
        iteration: u32,
        max_retries: u32,
        metrics: DraftMetrics,
        discarded_summaries: usize,
    },
    SummaryAppended { metrics: DraftMetrics },
    Finished { status: AssemblyStatus },
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleOutcome {
    /// Final text in the requested output format.
    pub text: String,
    pub status: AssemblyStatus,
    pub continuation_calls: u32,
    /// Metrics of the marked draft the text was produced from.
    pub metrics: DraftMetrics,
    pub summary_appended: bool,
    pub discarded_summaries: usize,
}

impl ArticleOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == AssemblyStatus::Complete
    }

    /// Character count of the final text, as shown to the user.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
