//! Admissibility gate.
//!
//! Classifies a piece of text against a [`GroundingRuleSet`]: the text is
//! admitted exactly when it contains at least one indicator phrase,
//! compared case-insensitively.
//!
//! This is a lexical heuristic. A matching phrase says the text *mentions*
//! a source-like word; it says nothing about whether a source exists or the
//! claim is true.
//!
//! [`evaluate`] is a pure function of its arguments: no state is kept
//! between calls, and any number of threads may call it at once.

use crate::grounding::{GroundingRuleSet, normalize};
use serde::{Deserialize, Serialize};

/// Why the gate decided the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// An indicator occurs in the text.
    Grounded,
    /// No indicator occurs in the text.
    NoIndicator,
    /// The text is empty.
    EmptyText,
    /// The rule set has no indicators, so nothing can be admitted. A
    /// configuration problem, not a detection.
    EmptyRuleSet,
}

impl DecisionReason {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Grounded => "grounding indicator detected",
            Self::NoIndicator => "inference from absence (no grounding indicator)",
            Self::EmptyText => "empty text",
            Self::EmptyRuleSet => "rule set has no indicators; every text is blocked",
        }
    }

    /// Whether the decision reflects degenerate configuration rather than
    /// the text itself.
    pub fn is_configuration_degenerate(self) -> bool {
        matches!(self, Self::EmptyRuleSet)
    }
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDecision {
    pub admitted: bool,
    /// The first matching indicator, as configured.
    #[serde(default)]
    pub matched_indicator: Option<String>,
    pub reason: DecisionReason,
}

impl GateDecision {
    fn blocked(reason: DecisionReason) -> Self {
        Self {
            admitted: false,
            matched_indicator: None,
            reason,
        }
    }
}

/// Decide whether `text` satisfies the grounding contract in `rules`.
///
/// Checks run in this order: empty rule set, empty text, indicator scan in
/// rule order.
pub fn evaluate(text: &str, rules: &GroundingRuleSet) -> GateDecision {
    if rules.is_empty() {
        return GateDecision::blocked(DecisionReason::EmptyRuleSet);
    }
    if text.is_empty() {
        return GateDecision::blocked(DecisionReason::EmptyText);
    }

    let haystack = normalize(text);
    match rules
        .pairs()
        .find(|(_, needle)| haystack.contains(needle))
    {
        Some((configured, _)) => GateDecision {
            admitted: true,
            matched_indicator: Some(configured.to_string()),
            reason: DecisionReason::Grounded,
        },
        None => GateDecision::blocked(DecisionReason::NoIndicator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_study_is_admitted() {
        let decision = evaluate(
            "According to a published study, the effect is measurable.",
            &GroundingRuleSet::default(),
        );
        assert!(decision.admitted);
        assert_eq!(decision.matched_indicator.as_deref(), Some("according to"));
        assert_eq!(decision.reason, DecisionReason::Grounded);
    }

    #[test]
    fn unexplained_forces_are_blocked() {
        let decision = evaluate(
            "The sky is blue because of unexplained forces",
            &GroundingRuleSet::default(),
        );
        assert!(!decision.admitted);
        assert_eq!(decision.matched_indicator, None);
        assert_eq!(decision.reason, DecisionReason::NoIndicator);
    }

    #[test]
    fn empty_text_is_blocked() {
        let decision = evaluate("", &GroundingRuleSet::default());
        assert!(!decision.admitted);
        assert_eq!(decision.reason, DecisionReason::EmptyText);
    }

    #[test]
    fn empty_rule_set_blocks_and_says_so() {
        let rules = GroundingRuleSet::empty("L-001").unwrap();
        let decision = evaluate("anything", &rules);
        assert!(!decision.admitted);
        assert_eq!(decision.reason, DecisionReason::EmptyRuleSet);
        assert!(decision.reason.is_configuration_degenerate());

        // Configuration is reported ahead of the text.
        assert_eq!(evaluate("", &rules).reason, DecisionReason::EmptyRuleSet);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = GroundingRuleSet::new("L-001", ["Peer Reviewed"]).unwrap();
        let decision = evaluate("this was PEER REVIEWED last year", &rules);
        assert!(decision.admitted);
        assert_eq!(decision.matched_indicator.as_deref(), Some("Peer Reviewed"));
    }

    #[test]
    fn first_indicator_in_rule_order_wins() {
        // "journal" appears first in the text, "study" first in the rules.
        let text = "A journal printed the study.";
        let decision = evaluate(text, &GroundingRuleSet::default());
        assert_eq!(decision.matched_indicator.as_deref(), Some("study"));

        let reversed = GroundingRuleSet::new("L-001", ["journal", "study"]).unwrap();
        let decision = evaluate(text, &reversed);
        assert_eq!(decision.matched_indicator.as_deref(), Some("journal"));
    }

    #[test]
    fn substring_match_is_lexical_only() {
        // "resource" contains "source": the heuristic admits it.
        let decision = evaluate("We ran out of resources.", &GroundingRuleSet::default());
        assert!(decision.admitted);
        assert_eq!(decision.matched_indicator.as_deref(), Some("source"));
    }

    #[test]
    fn evaluate_is_idempotent() {
        let rules = GroundingRuleSet::default();
        let text = "Evidence suggests otherwise.";
        assert_eq!(evaluate(text, &rules), evaluate(text, &rules));
    }

    #[test]
    fn concurrent_callers_agree() {
        let rules = GroundingRuleSet::default();
        let texts = [
            "According to the paper",
            "no grounding here",
            "",
            "Documented in 1998",
        ];
        let expected: Vec<_> = texts.iter().map(|t| evaluate(t, &rules)).collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let rules = &rules;
                    scope.spawn(move || {
                        texts
                            .iter()
                            .map(|t| evaluate(t, rules))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn decision_json_shape() {
        let decision = evaluate("per the journal", &GroundingRuleSet::default());
        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            serde_json::json!({
                "admitted": true,
                "matchedIndicator": "journal",
                "reason": "grounded",
            })
        );
    }
}
