//! Grounding rule sets: the indicator phrases the gate looks for.
//!
//! A rule set is ordered. The gate reports the first indicator, in this
//! order, that occurs in the text, so the same rule set always yields the
//! same decision.

use crate::error::LmlError;
use serde::Serialize;

/// Law identifier attached to the default rule set (inference from absence).
pub const DEFAULT_LAW_ID: &str = "L-001";

/// Indicators used when no configuration overrides them.
pub const DEFAULT_INDICATORS: [&str; 9] = [
    "according to",
    "study",
    "research",
    "published",
    "source",
    "evidence",
    "paper",
    "journal",
    "documented",
];

/// Ordered, case-insensitive indicator phrases under a law identifier.
///
/// An empty rule set is legal. The gate then blocks everything and says so
/// through [`DecisionReason::EmptyRuleSet`](crate::gate::DecisionReason).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingRuleSet {
    law_id: String,
    indicators: Vec<String>,
    #[serde(skip)]
    normalized: Vec<String>,
}

impl GroundingRuleSet {
    /// Build a rule set. Blank phrases would match every text and are
    /// rejected.
    pub fn new(
        law_id: impl Into<String>,
        indicators: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, LmlError> {
        let law_id = law_id.into();
        if law_id.trim().is_empty() {
            return Err(LmlError::invalid("law_id", "must be non-blank"));
        }

        let indicators: Vec<String> = indicators.into_iter().map(Into::into).collect();
        if let Some(pos) = indicators.iter().position(|p| p.trim().is_empty()) {
            return Err(LmlError::invalid(
                "indicators",
                format!("indicator #{} is blank", pos + 1),
            ));
        }
        let normalized = indicators.iter().map(|p| normalize(p)).collect();

        Ok(Self {
            law_id,
            indicators,
            normalized,
        })
    }

    /// A rule set with no indicators.
    pub fn empty(law_id: impl Into<String>) -> Result<Self, LmlError> {
        Self::new(law_id, Vec::<String>::new())
    }

    pub fn law_id(&self) -> &str {
        &self.law_id
    }

    /// Indicators as configured, in evaluation order.
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// `(configured, normalized)` pairs in evaluation order.
    pub(crate) fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.indicators
            .iter()
            .map(String::as_str)
            .zip(self.normalized.iter().map(String::as_str))
    }
}

impl Default for GroundingRuleSet {
    fn default() -> Self {
        let indicators: Vec<String> = DEFAULT_INDICATORS.iter().map(|s| s.to_string()).collect();
        let normalized = indicators.iter().map(|p| normalize(p)).collect();
        Self {
            law_id: DEFAULT_LAW_ID.to_string(),
            indicators,
            normalized,
        }
    }
}

/// Case-insensitive comparison form.
pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase()
}
