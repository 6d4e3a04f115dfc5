//! User-facing copy for verdicts.

use crate::comparison::ComparisonVerdict;
use crate::quality::QualityVerdict;
use crate::types::Severity;
use serde::Serialize;

/// Consecutive rejections after which a general retry hint is shown.
const RETRY_HINT_AFTER: u32 = 3;
const RETRY_HINT: &str =
    "Having trouble? Try a brighter spot and hold the phone at eye level.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Caution,
    Negative,
}

impl From<Severity> for Tone {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Success => Tone::Positive,
            Severity::Warning => Tone::Caution,
            Severity::Error => Tone::Negative,
        }
    }
}

/// What a screen shows after a capture or comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub title: String,
    pub body: Option<String>,
    pub tone: Tone,
    pub suggestions: Vec<String>,
    pub retry_hint: Option<String>,
    pub can_retake: bool,
}

impl From<&QualityVerdict> for Presentation {
    fn from(verdict: &QualityVerdict) -> Self {
        let body = verdict
            .details
            .clone()
            .or_else(|| verdict.score.map(|s| format!("Quality score: {s}/100")));

        let retry_hint = (!verdict.success && verdict.failure_count >= RETRY_HINT_AFTER)
            .then(|| RETRY_HINT.to_string());

        Self {
            title: verdict.message.clone(),
            body,
            tone: verdict.severity.into(),
            suggestions: verdict.suggestions.clone(),
            retry_hint,
            can_retake: !verdict.success,
        }
    }
}

impl From<&ComparisonVerdict> for Presentation {
    fn from(verdict: &ComparisonVerdict) -> Self {
        let suggestions = if verdict.success {
            Vec::new()
        } else {
            vec!["Retake your photo facing the camera in good light".to_string()]
        };

        Self {
            title: verdict.message.clone(),
            body: verdict.details.clone(),
            tone: verdict.severity.into(),
            suggestions,
            retry_hint: None,
            can_retake: !verdict.success,
        }
    }
}

impl std::fmt::Display for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = match self.tone {
            Tone::Positive => "✓",
            Tone::Caution => "!",
            Tone::Negative => "✗",
        };
        writeln!(f, "{marker} {}", self.title)?;
        if let Some(body) = &self.body {
            writeln!(f, "  {body}")?;
        }
        for suggestion in &self.suggestions {
            writeln!(f, "  - {suggestion}")?;
        }
        if let Some(hint) = &self.retry_hint {
            writeln!(f, "  {hint}")?;
        }
        Ok(())
    }
}
