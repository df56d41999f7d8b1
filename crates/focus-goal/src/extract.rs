// extract.rs — Best-effort extraction of GoalFields from free-form text.
//
// Issue bodies and task descriptions sometimes carry labeled lines:
//   **WHO:** Alice
//   - WHY: invoices are off by a cent
//   measured by: zero rounding diffs in the nightly report
//
// Each recognized label fills one slot; everything else is ignored. Upstream
// text is never guaranteed to follow the format, so a miss leaves the slot
// at its default rather than failing.

use std::sync::OnceLock;

use regex::Regex;

use crate::fields::GoalFields;

/// Maximum length (in characters) of the fallback headline.
pub const HEADLINE_MAX_CHARS: usize = 100;

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:[-+]\s+|\*\s+)?[*_]*\s*(measured[\s_]*by|whom|who|what|when|where|why|how|which|lest|with)\s*[*_]*\s*:(.*)$",
        )
        .expect("label pattern is a valid regex")
    })
}

/// Labeled slots found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Matched slots filled in, everything else at its default.
    pub fields: GoalFields,
    /// Canonical labels that matched, in order of appearance.
    pub matched: Vec<&'static str>,
}

impl Extraction {
    pub fn has(&self, label: &str) -> bool {
        self.matched.iter().any(|m| *m == label)
    }
}

/// Parse `LABEL: value` lines out of `text`, without any headline fallback.
///
/// Labels are case-insensitive and may be wrapped in `*`/`_` emphasis.
/// The first non-empty match per label wins.
pub fn extract_labels(text: &str) -> Extraction {
    let mut fields = GoalFields::default();
    let mut matched: Vec<&'static str> = Vec::new();

    for line in text.lines() {
        let Some(caps) = label_pattern().captures(line) else {
            continue;
        };
        let label = canonical_label(&caps[1]);
        if matched.contains(&label) {
            continue;
        }
        let value = clean_value(&caps[2]);
        if value.is_empty() {
            continue;
        }
        if let Some(slot) = fields.slot_mut(label) {
            *slot = value.to_string();
            matched.push(label);
        }
    }

    tracing::debug!(matched = matched.len(), "extracted goal fields");
    Extraction { fields, matched }
}

/// Parse `text` into a full field record.
///
/// Same as [`extract_labels`], except that when no `WHAT` line is found the
/// first non-blank line (truncated to [`HEADLINE_MAX_CHARS`]) becomes the
/// `what` slot, so every record has a usable headline.
pub fn extract_fields(text: &str) -> GoalFields {
    let extraction = extract_labels(text);
    let has_what = extraction.has("WHAT");
    let mut fields = extraction.fields;
    if !has_what {
        if let Some(headline) = first_line_headline(text) {
            fields.what = headline;
        }
    }
    fields
}

/// First non-blank line of `text`, trimmed and truncated.
pub fn first_line_headline(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(truncate_chars(line, HEADLINE_MAX_CHARS))
}

fn canonical_label(raw: &str) -> &'static str {
    let lower = raw.to_ascii_lowercase();
    match lower.as_str() {
        "who" => "WHO",
        "whom" => "WHOM",
        "what" => "WHAT",
        "when" => "WHEN",
        "where" => "WHERE",
        "why" => "WHY",
        "how" => "HOW",
        "which" => "WHICH",
        "lest" => "LEST",
        "with" => "WITH",
        // measured by / measured_by / measuredby
        _ => "MEASURED BY",
    }
}

/// Strip leftover emphasis markers and whitespace from both ends.
fn clean_value(raw: &str) -> &str {
    raw.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
