//! Drafting, expansion and finalization of one article.

use std::thread;
use std::time::Duration;

use super::{ArticleOutcome, AssemblyStatus, CancellationToken, Phase, ProgressEvent};
use crate::domain::draft::Draft;
use crate::domain::markup::{self, SummaryMarkers};
use crate::domain::prompt::{CompletionRequest, PromptBuilder, TemplateRenderer};
use crate::domain::titles::parse_heading_plan;
use crate::domain::{AppError, GenerationRequest, OutputFormat};
use crate::ports::{CompletionGateway, NoopProgress, ProgressReporter};

static NOOP_PROGRESS: NoopProgress = NoopProgress;

/// Loop bounds and pacing for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyPolicy {
    /// Maximum continuation calls before giving up on the thresholds.
    pub max_retries: u32,
    /// Pause between consecutive continuation calls.
    pub pacing: Duration,
    /// Ask for a heading plan before the first draft.
    pub use_heading_plan: bool,
}

impl Default for AssemblyPolicy {
    fn default() -> Self {
        Self { max_retries: 8, pacing: Duration::ZERO, use_heading_plan: true }
    }
}

/// Grows a draft through sequential gateway calls until it meets the
/// request's thresholds or the retry guard runs out.
pub struct Assembler<'a, G, R>
where
    G: CompletionGateway + ?Sized,
    R: TemplateRenderer,
{
    gateway: &'a G,
    prompts: &'a PromptBuilder<R>,
    policy: AssemblyPolicy,
    reporter: &'a dyn ProgressReporter,
    cancellation: CancellationToken,
}

impl<'a, G, R> Assembler<'a, G, R>
where
    G: CompletionGateway + ?Sized,
    R: TemplateRenderer,
{
    pub fn new(gateway: &'a G, prompts: &'a PromptBuilder<R>, policy: AssemblyPolicy) -> Self {
        Self {
            gateway,
            prompts,
            policy,
            reporter: &NOOP_PROGRESS,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: &'a dyn ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Run the whole state machine for `request`.
    ///
    /// Gateway and template errors abort the run. Falling short of the
    /// thresholds or being cancelled does not; both are reported through
    /// [`ArticleOutcome::status`].
    pub fn run(&self, request: &GenerationRequest) -> Result<ArticleOutcome, AppError> {
        match self.run_phases(request) {
            Ok(outcome) => {
                self.reporter.report(&ProgressEvent::Finished { status: outcome.status });
                self.enter(Phase::Done);
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(error = %err, "article generation failed");
                self.enter(Phase::Failed);
                Err(err)
            }
        }
    }

    fn run_phases(&self, request: &GenerationRequest) -> Result<ArticleOutcome, AppError> {
        let markers = self.prompts.markers().clone();

        self.enter(Phase::Drafting);
        let Some((mut draft, mut discarded)) = self.draft(request, markers)? else {
            return Ok(self.finish(
                Draft::new("", self.prompts.markers().clone()).0,
                request.output_format(),
                Tally { status: AssemblyStatus::Cancelled, ..Tally::default() },
            ));
        };

        self.enter(Phase::Expanding);
        let (status, calls, merged_discards) = self.expand(request, &mut draft)?;
        discarded += merged_discards;

        self.enter(Phase::Finalizing);
        let mut tally = Tally {
            status,
            continuation_calls: calls,
            summary_appended: false,
            discarded_summaries: discarded,
        };
        if status != AssemblyStatus::Cancelled && !draft.metrics().has_summary {
            if self.cancellation.is_cancelled() {
                tally.status = AssemblyStatus::Cancelled;
            } else {
                let payload = self.prompts.summary_request(request, draft.text())?;
                let summary = self.complete(&payload)?;
                draft.append_summary(&summary);
                let metrics = draft.metrics();
                tally.summary_appended = metrics.has_summary;
                if !metrics.has_summary {
                    tracing::warn!("summary request returned no content");
                }
                self.reporter.report(&ProgressEvent::SummaryAppended { metrics });
            }
        }

        Ok(self.finish(draft, request.output_format(), tally))
    }

    /// Request the heading plan and first draft. `None` when cancelled first.
    fn draft(
        &self,
        request: &GenerationRequest,
        markers: SummaryMarkers,
    ) -> Result<Option<(Draft, usize)>, AppError> {
        let plan = if self.policy.use_heading_plan {
            if self.cancellation.is_cancelled() {
                return Ok(None);
            }
            let payload = self.prompts.heading_plan_request(request)?;
            let plan = parse_heading_plan(&self.complete(&payload)?);
            self.reporter.report(&ProgressEvent::PlanReady { headings: plan.len() });
            plan
        } else {
            Vec::new()
        };

        if self.cancellation.is_cancelled() {
            return Ok(None);
        }
        let payload = self.prompts.article_request(request, &plan)?;
        let first = self.complete(&payload)?;
        let (draft, discarded) = Draft::new(&first, markers);
        let metrics = draft.metrics();
        tracing::info!(
            normalized_length = metrics.normalized_length,
            sections = metrics.section_count,
            subsections = metrics.subsection_count,
            "first draft received"
        );
        self.reporter
            .report(&ProgressEvent::DraftReceived { metrics, discarded_summaries: discarded });
        Ok(Some((draft, discarded)))
    }

    fn expand(
        &self,
        request: &GenerationRequest,
        draft: &mut Draft,
    ) -> Result<(AssemblyStatus, u32, usize), AppError> {
        let thresholds = request.thresholds();
        let mut calls = 0u32;
        let mut discarded = 0usize;

        loop {
            let metrics = draft.metrics();
            if metrics.satisfies(thresholds) {
                return Ok((AssemblyStatus::Complete, calls, discarded));
            }
            if calls >= self.policy.max_retries {
                tracing::warn!(
                    normalized_length = metrics.normalized_length,
                    target = thresholds.min_total_length,
                    sections = metrics.section_count,
                    subsections = metrics.subsection_count,
                    "retry guard exhausted, finalizing best-effort draft"
                );
                return Ok((AssemblyStatus::Shortfall, calls, discarded));
            }
            if calls > 0 && !self.policy.pacing.is_zero() {
                thread::sleep(self.policy.pacing);
            }
            if self.cancellation.is_cancelled() {
                tracing::info!(calls, "run cancelled during expansion");
                return Ok((AssemblyStatus::Cancelled, calls, discarded));
            }

            let payload = self.prompts.continuation_request(request, draft.text())?;
            let addition = self.complete(&payload)?;
            calls += 1;
            let dropped = draft.merge_continuation(&addition);
            discarded += dropped;

            let metrics = draft.metrics();
            tracing::debug!(
                iteration = calls,
                added_chars = addition.chars().count(),
                normalized_length = metrics.normalized_length,
                "continuation merged"
            );
            self.reporter.report(&ProgressEvent::ContinuationMerged {
                iteration: calls,
                max_retries: self.policy.max_retries,
                metrics,
                discarded_summaries: dropped,
            });
        }
    }

    fn complete(&self, payload: &CompletionRequest) -> Result<String, AppError> {
        tracing::debug!(
            model = %payload.model,
            max_tokens = payload.max_tokens,
            prompt_chars = payload.user_prompt().chars().count(),
            "sending completion request"
        );
        self.gateway.complete(payload)
    }

    fn enter(&self, phase: Phase) {
        tracing::debug!(%phase, "assembler phase");
        self.reporter.report(&ProgressEvent::PhaseEntered(phase));
    }

    fn finish(&self, draft: Draft, format: OutputFormat, tally: Tally) -> ArticleOutcome {
        let metrics = draft.metrics();
        let text = match format {
            OutputFormat::Structured => draft.into_text(),
            OutputFormat::Plain => markup::to_plain(draft.text()),
        };
        ArticleOutcome {
            text,
            status: tally.status,
            continuation_calls: tally.continuation_calls,
            metrics,
            summary_appended: tally.summary_appended,
            discarded_summaries: tally.discarded_summaries,
        }
    }
}

struct Tally {
    status: AssemblyStatus,
    continuation_calls: u32,
    summary_appended: bool,
    discarded_summaries: usize,
}

impl Default for Tally {
    fn default() -> Self {
        Self {
            status: AssemblyStatus::Complete,
            continuation_calls: 0,
            summary_appended: false,
            discarded_summaries: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::markup::{SegmentKind, parse_segments};
    use crate::domain::{Thresholds, Tone};
    use crate::testing::{EchoRenderer, RecordingProgress, ScriptedGateway};

    fn builder() -> PromptBuilder<EchoRenderer> {
        PromptBuilder::new(EchoRenderer, "test-model", SummaryMarkers::default())
    }

    fn no_plan() -> AssemblyPolicy {
        AssemblyPolicy { use_heading_plan: false, ..AssemblyPolicy::default() }
    }

    fn request(format: OutputFormat, thresholds: Thresholds) -> GenerationRequest {
        GenerationRequest::new("rust", "Rust Guide", Tone::Friendly, format, thresholds).unwrap()
    }

    fn section(title: &str, body_chars: usize, subsections: usize) -> String {
        let mut out = format!("<h2>{}</h2><p>{}</p>", title, "x".repeat(body_chars));
        for i in 0..subsections {
            out.push_str(&format!("<h3>{} {}</h3><p>{}</p>", title, i, "y".repeat(body_chars)));
        }
        out
    }

    fn small_thresholds() -> Thresholds {
        Thresholds {
            min_total_length: 300,
            min_section_count: 2,
            min_subsections_per_section: 1,
            ..Thresholds::default()
        }
    }

    fn summary_spans(text: &str) -> Vec<String> {
        parse_segments(text, &SummaryMarkers::default())
            .into_iter()
            .filter(|s| s.kind == SegmentKind::Summary)
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn short_first_draft_is_expanded_before_finalizing() {
        let first = format!("{}{}", section("Alpha", 240, 0), section("Beta", 240, 0));
        let gateway = ScriptedGateway::new([
            first,
            section("Gamma", 1000, 4),
            format!("{}<h2>Summary</h2><p>wrap</p>", section("Delta", 1000, 4)),
        ]);
        let thresholds = Thresholds {
            min_total_length: 3000,
            min_section_count: 2,
            min_subsections_per_section: 2,
            ..Thresholds::default()
        };
        let prompts = builder();
        let outcome = Assembler::new(&gateway, &prompts, no_plan())
            .run(&request(OutputFormat::Structured, thresholds))
            .unwrap();

        assert!(outcome.continuation_calls >= 1);
        assert_eq!(outcome.status, AssemblyStatus::Complete);
        assert_eq!(summary_spans(&outcome.text).len(), 1);
        assert!(gateway.requests()[1].user_prompt().starts_with("continuation|"));
    }

    #[test]
    fn satisfying_first_draft_skips_continuation() {
        let first = format!(
            "{}{}<h2>Summary</h2><p>done</p>",
            section("Alpha", 100, 1),
            section("Beta", 100, 1)
        );
        let gateway = ScriptedGateway::new([first]);
        let prompts = builder();
        let outcome = Assembler::new(&gateway, &prompts, no_plan())
            .run(&request(OutputFormat::Structured, small_thresholds()))
            .unwrap();

        assert_eq!(outcome.continuation_calls, 0);
        assert_eq!(outcome.status, AssemblyStatus::Complete);
        assert!(!outcome.summary_appended);
        assert_eq!(gateway.call_count(), 1);
    }

    #[test]
    fn repeated_summary_keeps_only_the_later_one() {
        let first = format!(
            "{}<h2>Summary</h2><p>EARLY</p>{}<h2>Summary</h2><p>LATE</p>",
            section("Alpha", 100, 1),
            section("Beta", 100, 1)
        );
        let gateway = ScriptedGateway::new([first]);
        let prompts = builder();
        let outcome = Assembler::new(&gateway, &prompts, no_plan())
            .run(&request(OutputFormat::Structured, small_thresholds()))
            .unwrap();

        let spans = summary_spans(&outcome.text);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].contains("LATE"));
        assert!(!outcome.text.contains("EARLY"));
        assert!(outcome.text.find("Beta").unwrap() < outcome.text.find("LATE").unwrap());
        assert_eq!(outcome.discarded_summaries, 1);
    }

    #[test]
    fn empty_gateway_is_bounded_by_the_retry_guard() {
        let gateway = ScriptedGateway::always_empty();
        let prompts = builder();
        let policy = AssemblyPolicy { max_retries: 6, ..no_plan() };
        let outcome = Assembler::new(&gateway, &prompts, policy)
            .run(&request(OutputFormat::Structured, Thresholds::default()))
            .unwrap();

        assert_eq!(outcome.status, AssemblyStatus::Shortfall);
        assert_eq!(outcome.continuation_calls, 6);
        // draft + 6 continuations + summary request
        assert_eq!(gateway.call_count(), 8);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn truncated_heading_does_not_hide_a_later_summary() {
        let gateway = ScriptedGateway::new([
            "<h2>A</h2><p>aaaa</p><h3>Cut".to_string(),
            "<p>more body text</p><h2>Summary</h2><p>wrap up</p>".to_string(),
            "<h2>Summary</h2><p>second summary</p>".to_string(),
        ]);
        let thresholds = Thresholds {
            min_total_length: 10,
            min_section_count: 1,
            min_subsections_per_section: 1,
            ..Thresholds::default()
        };
        let prompts = builder();
        let outcome = Assembler::new(&gateway, &prompts, no_plan())
            .run(&request(OutputFormat::Structured, thresholds))
            .unwrap();

        assert_eq!(gateway.call_count(), 2);
        assert_eq!(outcome.status, AssemblyStatus::Complete);
        assert!(!outcome.summary_appended);
        let spans = summary_spans(&outcome.text);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].contains("wrap up"));
        assert_eq!(outcome.text.matches("<h2>Summary</h2>").count(), 1);
        assert!(!outcome.text.contains("second summary"));
    }

    #[test]
    fn missing_summary_is_requested_once() {
        let first = format!("{}{}", section("Alpha", 100, 1), section("Beta", 100, 1));
        let gateway = ScriptedGateway::new([first, "<p>closing words</p>".to_string()]);
        let prompts = builder();
        let outcome = Assembler::new(&gateway, &prompts, no_plan())
            .run(&request(OutputFormat::Structured, small_thresholds()))
            .unwrap();

        assert!(outcome.summary_appended);
        assert_eq!(gateway.call_count(), 2);
        assert!(gateway.requests()[1].user_prompt().starts_with("summary|"));
        let spans = summary_spans(&outcome.text);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].contains("closing words"));
    }

    #[test]
    fn normalized_length_never_decreases_across_iterations() {
        let gateway = ScriptedGateway::new([
            format!("{}<h2>Summary</h2><p>{}</p>", section("Alpha", 50, 0), "s".repeat(400)),
            format!("{}<h2>Summary</h2><p>short</p>", section("Beta", 30, 0)),
            String::new(),
            format!("<h2>Summary</h2><p>x</p>{}", section("Gamma", 30, 1)),
        ]);
        let prompts = builder();
        let reporter = RecordingProgress::default();
        let policy = AssemblyPolicy { max_retries: 3, ..no_plan() };
        Assembler::new(&gateway, &prompts, policy)
            .with_reporter(&reporter)
            .run(&request(OutputFormat::Structured, Thresholds::default()))
            .unwrap();

        let lengths = reporter.normalized_lengths();
        assert_eq!(lengths.len(), 4);
        assert!(lengths.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", lengths);
    }

    #[test]
    fn heading_plan_feeds_the_article_prompt() {
        let gateway = ScriptedGateway::new([
            "H2: Rust basics\nH2: Rust tooling".to_string(),
            format!(
                "{}{}<h2>Summary</h2><p>s</p>",
                section("Alpha", 100, 1),
                section("Beta", 100, 1)
            ),
        ]);
        let prompts = builder();
        Assembler::new(&gateway, &prompts, AssemblyPolicy::default())
            .run(&request(OutputFormat::Structured, small_thresholds()))
            .unwrap();

        let requests = gateway.requests();
        assert!(requests[0].user_prompt().starts_with("heading_plan|"));
        assert!(requests[1].user_prompt().contains("- Rust basics\n- Rust tooling"));
    }

    #[test]
    fn plain_output_is_rewritten() {
        let first = format!(
            "<h1>Rust Guide</h1>{}{}<h2>Summary</h2><p>done</p>",
            section("Alpha", 100, 1),
            section("Beta", 100, 1)
        );
        let gateway = ScriptedGateway::new([first]);
        let prompts = builder();
        let outcome = Assembler::new(&gateway, &prompts, no_plan())
            .run(&request(OutputFormat::Plain, small_thresholds()))
            .unwrap();

        assert!(outcome.text.starts_with("# Rust Guide\n\n## Alpha"));
        assert!(outcome.text.ends_with("## Summary\n\ndone"));
        assert!(!outcome.text.contains('<'));
    }

    #[test]
    fn cancellation_stops_before_the_next_call() {
        let first = section("Alpha", 10, 0);
        let gateway = ScriptedGateway::new([first]);
        let prompts = builder();
        let token = CancellationToken::new();
        gateway.cancel_after_calls(1, token.clone());
        let outcome = Assembler::new(&gateway, &prompts, no_plan())
            .with_cancellation(token)
            .run(&request(OutputFormat::Structured, Thresholds::default()))
            .unwrap();

        assert_eq!(outcome.status, AssemblyStatus::Cancelled);
        assert_eq!(outcome.continuation_calls, 0);
        assert_eq!(gateway.call_count(), 1);
        assert!(outcome.text.contains("Alpha"));
    }

    #[test]
    fn cancelled_before_start_makes_no_calls() {
        let gateway = ScriptedGateway::always_empty();
        let prompts = builder();
        let token = CancellationToken::new();
        token.cancel();
        let outcome = Assembler::new(&gateway, &prompts, AssemblyPolicy::default())
            .with_cancellation(token)
            .run(&request(OutputFormat::Structured, Thresholds::default()))
            .unwrap();

        assert_eq!(outcome.status, AssemblyStatus::Cancelled);
        assert_eq!(gateway.call_count(), 0);
        assert!(outcome.text.is_empty());
    }

    #[test]
    fn gateway_failure_aborts_the_run() {
        let gateway = ScriptedGateway::failing(503, "service unavailable");
        let prompts = builder();
        let reporter = RecordingProgress::default();
        let err = Assembler::new(&gateway, &prompts, no_plan())
            .with_reporter(&reporter)
            .run(&request(OutputFormat::Structured, Thresholds::default()))
            .unwrap_err();

        assert!(matches!(err, AppError::Gateway { status: 503, .. }));
        assert_eq!(reporter.phases().last(), Some(&Phase::Failed));
    }

    #[test]
    fn continuation_failure_aborts_after_the_first_draft() {
        let gateway = ScriptedGateway::new([section("Alpha", 20, 0)]);
        gateway.push_error(AppError::Http("connection reset".to_string()));
        let prompts = builder();
        let reporter = RecordingProgress::default();
        let err = Assembler::new(&gateway, &prompts, no_plan())
            .with_reporter(&reporter)
            .run(&request(OutputFormat::Structured, small_thresholds()))
            .unwrap_err();

        assert!(matches!(err, AppError::Http(_)));
        assert_eq!(gateway.call_count(), 2);
        let events = reporter.events();
        assert!(matches!(events[1], ProgressEvent::DraftReceived { .. }));
        assert_eq!(events.last(), Some(&ProgressEvent::PhaseEntered(Phase::Failed)));
    }

    #[test]
    fn phases_are_visited_in_order() {
        let first = format!(
            "{}{}<h2>Summary</h2><p>s</p>",
            section("Alpha", 100, 1),
            section("Beta", 100, 1)
        );
        let gateway = ScriptedGateway::new([first]);
        let prompts = builder();
        let reporter = RecordingProgress::default();
        Assembler::new(&gateway, &prompts, no_plan())
            .with_reporter(&reporter)
            .run(&request(OutputFormat::Structured, small_thresholds()))
            .unwrap();

        assert_eq!(
            reporter.phases(),
            vec![Phase::Drafting, Phase::Expanding, Phase::Finalizing, Phase::Done]
        );
    }
}
