//! Parsing of title suggestions and heading plans from free-form responses.

use std::sync::LazyLock;

use regex::Regex;

/// Titles kept from one suggestion response.
pub const MAX_TITLES: usize = 3;

/// Heading-plan entries rendered into the article prompt.
pub const MAX_PLAN_HEADINGS: usize = 8;

const MIN_FALLBACK_TITLE_CHARS: usize = 5;

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\)\s*(.+)$").expect("numbered line pattern is valid"));

static PLAN_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^H2:\s*").expect("plan prefix pattern is valid"));

fn non_empty_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Extract up to three titles from a suggestion response.
///
/// Lines shaped like `1) Title` are preferred. When the model ignored the
/// numbered format, the first lines that are not bullets and have at least
/// five characters are used instead.
pub fn parse_titles(raw: &str) -> Vec<String> {
    let numbered: Vec<String> = non_empty_lines(raw)
        .filter_map(|line| NUMBERED_LINE.captures(line))
        .map(|caps| caps[2].trim().to_string())
        .filter(|title| !title.is_empty())
        .take(MAX_TITLES)
        .collect();
    if !numbered.is_empty() {
        return numbered;
    }

    non_empty_lines(raw)
        .filter(|line| !line.starts_with(['-', '*']))
        .filter(|line| line.chars().count() >= MIN_FALLBACK_TITLE_CHARS)
        .take(MAX_TITLES)
        .map(str::to_string)
        .collect()
}

/// Extract section topics from a heading-plan response.
pub fn parse_heading_plan(raw: &str) -> Vec<String> {
    non_empty_lines(raw)
        .map(|line| line.trim_start_matches(['-', '*', '•']).trim_start())
        .map(|line| PLAN_PREFIX.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
