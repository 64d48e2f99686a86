//! Draft accumulator for one generation run.

use crate::domain::Thresholds;
use crate::domain::markup::{self, Document, Segment, SegmentKind, SummaryMarkers};

/// Structural snapshot of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftMetrics {
    /// Body length with markup, whitespace and the summary span removed.
    pub normalized_length: usize,
    /// Same measure including the summary span.
    pub total_length: usize,
    pub section_count: usize,
    pub subsection_count: usize,
    pub has_summary: bool,
}

impl DraftMetrics {
    /// Length and heading-count minimums all hold.
    pub fn satisfies(&self, thresholds: &Thresholds) -> bool {
        self.normalized_length >= thresholds.min_total_length
            && self.section_count >= thresholds.min_section_count
            && self.subsection_count >= thresholds.min_subsection_total()
    }
}

/// Marked text grown across continuation calls.
///
/// Every mutation leaves at most one summary span, positioned last.
#[derive(Debug, Clone)]
pub struct Draft {
    marked_text: String,
    markers: SummaryMarkers,
}

impl Draft {
    /// Start a draft from the first response, dropping all but the last summary.
    pub fn new(initial: &str, markers: SummaryMarkers) -> (Self, usize) {
        let document = Document::parse(initial, &markers);
        let discarded = document.discarded_summaries();
        (Self { marked_text: document.render(), markers }, discarded)
    }

    pub fn text(&self) -> &str {
        &self.marked_text
    }

    pub fn into_text(self) -> String {
        self.marked_text
    }

    pub fn markers(&self) -> &SummaryMarkers {
        &self.markers
    }

    pub fn metrics(&self) -> DraftMetrics {
        let document = Document::parse(&self.marked_text, &self.markers);
        DraftMetrics {
            normalized_length: markup::normalized_length(&document.body_text()),
            total_length: markup::normalized_length(&self.marked_text),
            section_count: document.section_count(),
            subsection_count: document.subsection_count(),
            has_summary: document.summary().is_some(),
        }
    }

    /// Append a continuation after a blank line.
    ///
    /// The current summary is detached first so continuation text never lands
    /// inside it. A summary inside the continuation replaces it; otherwise it
    /// is re-attached at the end. Returns the number of summary spans dropped.
    pub fn merge_continuation(&mut self, addition: &str) -> usize {
        let mut current = Document::parse(&self.marked_text, &self.markers);
        let previous = current.take_summary();

        let body = current.body_text();
        let mut merged = String::with_capacity(body.len() + addition.len() + 2);
        merged.push_str(body.trim_end());
        if !merged.is_empty() {
            merged.push_str("\n\n");
        }
        merged.push_str(addition);

        let mut next = Document::parse(&merged, &self.markers);
        let mut discarded = next.discarded_summaries();
        match (previous, next.summary().is_some()) {
            (Some(_), true) => discarded += 1,
            (Some(previous), false) => next = next.with_summary(previous),
            (None, _) => {}
        }

        self.marked_text = next.render();
        discarded
    }

    /// Append a requested summary, adding a summary heading if the response lacks one.
    pub fn append_summary(&mut self, summary: &str) {
        let summary = summary.trim();
        if summary.is_empty() {
            return;
        }

        let parsed = Document::parse(summary, &self.markers);
        let text = if parsed.summary().is_some() {
            summary.to_string()
        } else {
            let heading = markup::section_heading(self.markers.primary(), &self.marked_text);
            format!("{}\n{}", heading, summary)
        };

        let current = Document::parse(&self.marked_text, &self.markers);
        let mut merged = String::from(current.render().trim_end());
        if !merged.is_empty() {
            merged.push_str("\n\n");
        }
        merged.push_str(&text);
        self.marked_text = Document::parse(&merged, &self.markers).render();
    }

    /// Summary segment, if any.
    pub fn summary(&self) -> Option<Segment> {
        Document::parse(&self.marked_text, &self.markers).summary().cloned()
    }

    /// Count of summary spans in document order; at most one after any mutation.
    pub fn summary_span_count(&self) -> usize {
        markup::parse_segments(&self.marked_text, &self.markers)
            .iter()
            .filter(|s| s.kind == SegmentKind::Summary)
            .count()
    }
}
