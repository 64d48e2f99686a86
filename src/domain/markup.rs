//! Lightweight structural parsing of generated drafts.
//!
//! Drafts arrive as heading/paragraph markup (`<h2>..</h2>`) or, when the
//! remote model ignores the requested format, as `##`-style headings. Both are
//! recognised. A draft is split into segments, each starting at a heading, and
//! summary sections are handled on those segments rather than by splicing
//! strings.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static HTML_HEADING_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h([1-6])\b[^<>]*>").expect("heading open pattern is valid"));

static HTML_HEADING_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</h[1-6]\s*>").expect("heading close pattern is valid"));

// Where an unclosed heading stops: the line break or the first block tag.
static HEADING_CUTOFF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\n|<(?:p|div|ul|ol|li|table|section|blockquote)\b")
        .expect("heading cutoff pattern is valid")
});

static MARKDOWN_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]{0,3}(#{1,3})[ \t]+([^\n]+?)[ \t]*$")
        .expect("markdown heading pattern is valid")
});

static MARKDOWN_HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]{0,3}#{1,3}[ \t]+").expect("heading marker pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!][^<>]*>").expect("tag pattern is valid"));

static CARRIAGE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n?").expect("carriage return pattern is valid"));

static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("paragraph pattern is valid")
});

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

static TRAILING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("trailing space pattern is valid"));

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run pattern is valid"));

/// Role of a segment within a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Text before the first heading.
    Preamble,
    /// Top-level (`h1`) heading and its text.
    Title,
    /// Section-level (`h2`) heading and its text.
    Section,
    /// Subsection-level (`h3`) heading and its text.
    Subsection,
    /// Section-level heading carrying a summary marker, together with any
    /// subsections that follow it up to the next section-level heading.
    Summary,
}

/// Contiguous slice of a draft, starting at a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub heading: Option<String>,
    pub text: String,
}

/// Case-insensitive heading texts that identify a summary section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryMarkers {
    markers: Vec<String>,
}

impl SummaryMarkers {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_string())
            .filter(|m| !normalize_marker(m).is_empty())
            .collect();
        Self { markers }
    }

    pub fn matches(&self, heading: &str) -> bool {
        let heading = normalize_marker(heading);
        self.markers.iter().any(|m| normalize_marker(m) == heading)
    }

    /// Heading used when a summary has to be added explicitly.
    pub fn primary(&self) -> &str {
        self.markers.first().map(String::as_str).unwrap_or("Summary")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.markers
    }
}

impl Default for SummaryMarkers {
    fn default() -> Self {
        Self::new(["Summary", "まとめ"])
    }
}

fn normalize_marker(text: &str) -> String {
    text.trim().trim_end_matches([':', '：']).trim().to_lowercase()
}

struct HeadingMatch {
    start: usize,
    end: usize,
    level: usize,
    title: String,
}

fn find_headings(text: &str) -> Vec<HeadingMatch> {
    let mut found: Vec<HeadingMatch> = html_headings(text)
        .into_iter()
        .chain(MARKDOWN_HEADING.captures_iter(text).filter_map(|caps| markdown_heading(&caps)))
        .collect();
    found.sort_by_key(|h| h.start);

    let mut headings: Vec<HeadingMatch> = Vec::with_capacity(found.len());
    for heading in found {
        if headings.last().is_some_and(|prev| heading.start < prev.end) {
            continue;
        }
        headings.push(heading);
    }
    headings
}

/// `<h1>`..`<h3>` headings. A heading never runs past the next heading open
/// tag; one left unclosed ends at its line break or first block tag.
fn html_headings(text: &str) -> Vec<HeadingMatch> {
    let opens: Vec<Captures<'_>> = HTML_HEADING_OPEN.captures_iter(text).collect();
    let mut headings = Vec::new();
    for (i, caps) in opens.iter().enumerate() {
        let (Some(tag), Some(level)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(level) = level.as_str().parse::<usize>() else {
            continue;
        };
        if level > 3 {
            continue;
        }

        let limit = opens.get(i + 1).and_then(|next| next.get(0)).map_or(text.len(), |m| m.start());
        let window = &text[tag.end()..limit];
        let (content, consumed) = match HTML_HEADING_CLOSE.find(window) {
            Some(close) => (&window[..close.start()], close.end()),
            None => {
                let cut = HEADING_CUTOFF.find(window).map_or(window.len(), |m| m.start());
                (&window[..cut], cut)
            }
        };
        headings.push(HeadingMatch {
            start: tag.start(),
            end: tag.end() + consumed,
            level,
            title: clean_inline(content),
        });
    }
    headings
}

fn markdown_heading(caps: &Captures<'_>) -> Option<HeadingMatch> {
    let whole = caps.get(0)?;
    Some(HeadingMatch {
        start: whole.start(),
        end: whole.end(),
        level: caps.get(1)?.as_str().len(),
        title: clean_inline(caps.get(2)?.as_str()),
    })
}

fn clean_inline(text: &str) -> String {
    strip_tags(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a draft into heading-delimited segments in document order.
///
/// Concatenating the `text` of every returned segment reproduces `text`.
pub fn parse_segments(text: &str, markers: &SummaryMarkers) -> Vec<Segment> {
    let headings = find_headings(text);
    let mut segments: Vec<Segment> = Vec::with_capacity(headings.len() + 1);

    let first_start = headings.first().map_or(text.len(), |h| h.start);
    if first_start > 0 {
        segments.push(Segment {
            kind: SegmentKind::Preamble,
            heading: None,
            text: text[..first_start].to_string(),
        });
    }

    for (i, heading) in headings.iter().enumerate() {
        let end = headings.get(i + 1).map_or(text.len(), |next| next.start);
        let chunk = &text[heading.start..end];
        let kind = match heading.level {
            1 => SegmentKind::Title,
            2 if markers.matches(&heading.title) => SegmentKind::Summary,
            2 => SegmentKind::Section,
            _ => SegmentKind::Subsection,
        };

        if kind == SegmentKind::Subsection
            && let Some(last) = segments.last_mut()
            && last.kind == SegmentKind::Summary
        {
            last.text.push_str(chunk);
            continue;
        }

        segments.push(Segment { kind, heading: Some(heading.title.clone()), text: chunk.to_string() });
    }

    segments
}

/// Remove every summary span and return the last one in document order.
///
/// Earlier summaries are discarded; the returned body keeps all other
/// segments in their original order.
pub fn dedup_summaries(segments: Vec<Segment>) -> (Vec<Segment>, Option<Segment>, usize) {
    let mut body = Vec::with_capacity(segments.len());
    let mut summary = None;
    let mut discarded = 0;
    for segment in segments {
        if segment.kind == SegmentKind::Summary {
            if summary.replace(segment).is_some() {
                discarded += 1;
            }
        } else {
            body.push(segment);
        }
    }
    (body, summary, discarded)
}

/// A draft with at most one summary span, always positioned last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    body: Vec<Segment>,
    summary: Option<Segment>,
    discarded_summaries: usize,
}

impl Document {
    pub fn parse(text: &str, markers: &SummaryMarkers) -> Self {
        let (body, summary, discarded_summaries) = dedup_summaries(parse_segments(text, markers));
        Self { body, summary, discarded_summaries }
    }

    pub fn body(&self) -> &[Segment] {
        &self.body
    }

    pub fn summary(&self) -> Option<&Segment> {
        self.summary.as_ref()
    }

    /// Summary spans dropped while parsing because a later one existed.
    pub fn discarded_summaries(&self) -> usize {
        self.discarded_summaries
    }

    pub fn body_text(&self) -> String {
        self.body.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn section_count(&self) -> usize {
        self.count(SegmentKind::Section)
    }

    pub fn subsection_count(&self) -> usize {
        self.count(SegmentKind::Subsection)
    }

    fn count(&self, kind: SegmentKind) -> usize {
        self.body.iter().filter(|s| s.kind == kind).count()
    }

    /// Replace the summary span.
    pub fn with_summary(mut self, summary: Segment) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Detach the summary, leaving only body segments.
    pub fn take_summary(&mut self) -> Option<Segment> {
        self.summary.take()
    }

    /// Render the body followed by the summary, separated by one blank line.
    pub fn render(&self) -> String {
        let body = self.body_text();
        let Some(summary) = &self.summary else {
            return body;
        };
        let body = body.trim_end();
        let mut out = String::with_capacity(body.len() + summary.text.len() + 3);
        out.push_str(body);
        if !body.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(summary.text.trim());
        out.push('\n');
        out
    }
}

/// Section-level heading in the markup style already used by `sample`.
///
/// Drafts without any heading markup get `<h2>` markup.
pub fn section_heading(title: &str, sample: &str) -> String {
    if html_headings(sample).is_empty() && MARKDOWN_HEADING.is_match(sample) {
        format!("## {}", title)
    } else {
        format!("<h2>{}</h2>", title)
    }
}

/// Remove markup tags, repeating until none remain.
pub fn strip_tags(text: &str) -> String {
    let mut current = text.to_string();
    while TAG.is_match(&current) {
        current = TAG.replace_all(&current, "").into_owned();
    }
    current
}

/// Character count with markup and every whitespace character removed.
///
/// Both tags and the `#` markers of markdown headings count as markup.
pub fn normalized_length(text: &str) -> usize {
    let text = MARKDOWN_HEADING_MARKER.replace_all(text, "");
    strip_tags(&text).chars().filter(|c| !c.is_whitespace()).count()
}

fn rewrite_html_headings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for heading in html_headings(text) {
        out.push_str(&text[cursor..heading.start]);
        out.push_str(&format!("\n{} {}\n", "#".repeat(heading.level), heading.title));
        cursor = heading.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Rewrite marked text into plain text with `#`-style headings.
///
/// Applying the rewrite to its own output returns the output unchanged.
pub fn to_plain(marked: &str) -> String {
    let text = CARRIAGE_RETURN.replace_all(marked, "\n");
    let text = rewrite_html_headings(&text);
    let text = PARAGRAPH.replace_all(&text, "\n$1\n");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = strip_tags(&text);
    let text = TRAILING_SPACE.replace_all(&text, "\n");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}
