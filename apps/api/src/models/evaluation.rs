//! Evaluation record — the wire shape and its validated form.
//!
//! The HTTP layer deserializes into [`EvaluationRequest`], where every field
//! is optional so a malformed body still reaches our own validation instead
//! of a generic deserialization rejection. [`EvaluationRequest::into_record`]
//! checks the required top-level fields and produces the read-only
//! [`EvaluationRecord`] the layout engine consumes. Validation happens before
//! any response byte is produced, so a missing field still gets a 400.
//!
//! Scores and comments are `BTreeMap`s on purpose: criteria within a section
//! render in canonical (lexicographic) key order, independent of the key
//! order of the incoming JSON.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Raw request body for `POST /generate-pdf`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[serde(default)]
    pub evaluator_name: Option<String>,
    #[serde(default)]
    pub resident_name: Option<String>,
    #[serde(default)]
    pub scores: Option<BTreeMap<String, Option<String>>>,
    #[serde(default)]
    pub comments: Option<BTreeMap<String, Option<String>>>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub average_score: Option<String>,
}

impl EvaluationRequest {
    /// Validates required top-level fields and builds the record.
    ///
    /// Returns the name of the first missing field on failure.
    pub fn into_record(self) -> Result<EvaluationRecord, String> {
        let evaluator_name = self
            .evaluator_name
            .ok_or_else(|| "missing required field: evaluatorName".to_string())?;
        let resident_name = self
            .resident_name
            .ok_or_else(|| "missing required field: residentName".to_string())?;
        let scores = self
            .scores
            .ok_or_else(|| "missing required field: scores".to_string())?;
        let comments = self
            .comments
            .ok_or_else(|| "missing required field: comments".to_string())?;

        Ok(EvaluationRecord {
            evaluator_name,
            resident_name,
            scores,
            comments,
            recommendation: self.recommendation,
            average_score: self.average_score,
        })
    }
}

/// Validated, immutable input to a single rendering pass.
#[derive(Debug, Clone)]
pub struct EvaluationRecord {
    pub evaluator_name: String,
    pub resident_name: String,
    /// criterionId → score value. Absent/blank values render as `?`.
    pub scores: BTreeMap<String, Option<String>>,
    /// sectionCommentKey → free text. Absent/blank values get the placeholder.
    pub comments: BTreeMap<String, Option<String>>,
    pub recommendation: Option<String>,
    pub average_score: Option<String>,
}

impl EvaluationRecord {
    /// Criteria whose key starts with `prefix`, in canonical key order.
    pub fn scores_for<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, Option<&'a str>)> {
        self.scores
            .iter()
            .filter(move |(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.as_str(), non_blank(value.as_deref())))
    }

    /// Comment text for a section key, if present and non-blank.
    pub fn comment(&self, key: &str) -> Option<&str> {
        non_blank(self.comments.get(key).and_then(|v| v.as_deref()))
    }

    pub fn recommendation(&self) -> Option<&str> {
        non_blank(self.recommendation.as_deref())
    }

    pub fn average_score(&self) -> Option<&str> {
        non_blank(self.average_score.as_deref())
    }
}

/// Blank strings count as absent — the original form submits empty strings
/// for untouched inputs.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
