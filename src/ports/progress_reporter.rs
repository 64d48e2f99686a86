use crate::domain::assembly::ProgressEvent;

/// Port for observing a generation run as it progresses.
pub trait ProgressReporter {
    fn report(&self, event: &ProgressEvent);
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: &ProgressEvent) {}
}
