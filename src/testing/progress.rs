use std::cell::RefCell;

use crate::domain::assembly::{Phase, ProgressEvent};
use crate::ports::ProgressReporter;

/// Reporter that keeps every event for later inspection.
#[derive(Default)]
pub struct RecordingProgress {
    events: RefCell<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.borrow().clone()
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::PhaseEntered(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Normalized length after the first draft and after each continuation.
    pub fn normalized_lengths(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::DraftReceived { metrics, .. }
                | ProgressEvent::ContinuationMerged { metrics, .. } => {
                    Some(metrics.normalized_length)
                }
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: &ProgressEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
