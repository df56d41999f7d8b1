// fields.rs — GoalFields: the fixed descriptive record attached to every goal.
//
// Eleven text slots, each with a named fallback. Renderers can print any
// slot without checking for absence; a slot that was never filled in reads
// as its default ("Success metrics not defined", ...).

use serde::{Deserialize, Serialize};

pub const DEFAULT_WHO: &str = "Owner not specified";
pub const DEFAULT_WHOM: &str = "Stakeholders not specified";
pub const DEFAULT_WHAT: &str = "Objective not specified";
pub const DEFAULT_WHEN: &str = "No deadline set";
pub const DEFAULT_WHERE: &str = "Location not specified";
pub const DEFAULT_WHY: &str = "Rationale not provided";
pub const DEFAULT_HOW: &str = "Approach not defined";
pub const DEFAULT_WHICH: &str = "Scope not specified";
pub const DEFAULT_LEST: &str = "Risks not identified";
pub const DEFAULT_WITH: &str = "No dependencies listed";
pub const DEFAULT_MEASURED_BY: &str = "Success metrics not defined";

/// Descriptive fields for a goal.
///
/// Deserialization fills any missing slot with its default, so documents
/// written before a slot existed still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GoalFields {
    /// Who is doing the work.
    pub who: String,
    /// Who the work is for.
    pub whom: String,
    /// What is being done.
    pub what: String,
    /// Deadline or timeframe.
    pub when: String,
    /// Files, modules, or systems touched.
    pub r#where: String,
    /// Motivation.
    pub why: String,
    /// Approach.
    pub how: String,
    /// Which variant/scope/option was chosen.
    pub which: String,
    /// Risks to avoid ("lest we break X").
    pub lest: String,
    /// Tools, dependencies, collaborators.
    pub with: String,
    /// Success criteria.
    pub measured_by: String,
}

impl Default for GoalFields {
    fn default() -> Self {
        Self {
            who: DEFAULT_WHO.to_string(),
            whom: DEFAULT_WHOM.to_string(),
            what: DEFAULT_WHAT.to_string(),
            when: DEFAULT_WHEN.to_string(),
            r#where: DEFAULT_WHERE.to_string(),
            why: DEFAULT_WHY.to_string(),
            how: DEFAULT_HOW.to_string(),
            which: DEFAULT_WHICH.to_string(),
            lest: DEFAULT_LEST.to_string(),
            with: DEFAULT_WITH.to_string(),
            measured_by: DEFAULT_MEASURED_BY.to_string(),
        }
    }
}

impl GoalFields {
    /// `(LABEL, value)` pairs in display order.
    pub fn labeled(&self) -> [(&'static str, &str); 11] {
        [
            ("WHO", self.who.as_str()),
            ("WHOM", self.whom.as_str()),
            ("WHAT", self.what.as_str()),
            ("WHEN", self.when.as_str()),
            ("WHERE", self.r#where.as_str()),
            ("WHY", self.why.as_str()),
            ("HOW", self.how.as_str()),
            ("WHICH", self.which.as_str()),
            ("LEST", self.lest.as_str()),
            ("WITH", self.with.as_str()),
            ("MEASURED BY", self.measured_by.as_str()),
        ]
    }

    /// Mutable access to a slot by its canonical label.
    pub(crate) fn slot_mut(&mut self, label: &str) -> Option<&mut String> {
        match label {
            "WHO" => Some(&mut self.who),
            "WHOM" => Some(&mut self.whom),
            "WHAT" => Some(&mut self.what),
            "WHEN" => Some(&mut self.when),
            "WHERE" => Some(&mut self.r#where),
            "WHY" => Some(&mut self.why),
            "HOW" => Some(&mut self.how),
            "WHICH" => Some(&mut self.which),
            "LEST" => Some(&mut self.lest),
            "WITH" => Some(&mut self.with),
            "MEASURED BY" => Some(&mut self.measured_by),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_never_empty() {
        let fields = GoalFields::default();
        for (label, value) in fields.labeled() {
            assert!(!value.is_empty(), "{} default is empty", label);
        }
    }

    #[test]
    fn where_serializes_without_raw_prefix() {
        let json = serde_json::to_string(&GoalFields::default()).unwrap();
        assert!(json.contains("\"where\":"));
        assert!(json.contains("\"measured_by\":"));
    }

    #[test]
    fn partial_document_fills_defaults() {
        let fields: GoalFields = serde_json::from_str(r#"{"who":"Alice"}"#).unwrap();
        assert_eq!(fields.who, "Alice");
        assert_eq!(fields.measured_by, DEFAULT_MEASURED_BY);
    }
}
