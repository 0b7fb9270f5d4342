//! Enforcement around an opaque text generator.
//!
//! The generator is anything that turns a prompt into text. The kernel
//! never looks inside it: it runs the generator once, hands the output to
//! the gate, and releases the text only when the gate admits it.

use crate::error::LmlError;
use crate::gate::{GateDecision, evaluate};
use crate::grounding::GroundingRuleSet;
use serde::Serialize;

/// Replacement shown in place of blocked output.
pub const BLOCKED_PLACEHOLDER: &str = "[OUTPUT BLOCKED]";

/// The external text producer.
pub trait Generator {
    /// Name used in reports.
    fn name(&self) -> &str;

    /// Produce text for `prompt`, or a message describing the failure.
    fn generate(&self, prompt: &str) -> Result<String, String>;
}

/// Adapts a closure into a [`Generator`].
pub struct FnGenerator<F> {
    name: String,
    produce: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(&str) -> Result<String, String>,
{
    pub fn new(name: impl Into<String>, produce: F) -> Self {
        Self {
            name: name.into(),
            produce,
        }
    }
}

impl<F> Generator for FnGenerator<F>
where
    F: Fn(&str) -> Result<String, String>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, prompt: &str) -> Result<String, String> {
        (self.produce)(prompt)
    }
}

/// One generator run and the gate's verdict on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enforcement {
    pub generator: String,
    pub prompt: String,
    pub law_id: String,
    pub raw_output: String,
    pub decision: GateDecision,
}

impl Enforcement {
    /// The generated text if admitted, `None` if blocked.
    pub fn released_output(&self) -> Option<&str> {
        self.decision.admitted.then_some(self.raw_output.as_str())
    }

    /// What a caller shows downstream.
    pub fn final_output(&self) -> &str {
        self.released_output().unwrap_or(BLOCKED_PLACEHOLDER)
    }
}

/// Run `generator` on `prompt` and gate the result.
pub fn enforce<G: Generator + ?Sized>(
    generator: &G,
    prompt: &str,
    rules: &GroundingRuleSet,
) -> Result<Enforcement, LmlError> {
    let raw_output = generator
        .generate(prompt)
        .map_err(|message| LmlError::Generator {
            generator: generator.name().to_string(),
            message,
        })?;
    let decision = evaluate(&raw_output, rules);
    Ok(Enforcement {
        generator: generator.name().to_string(),
        prompt: prompt.to_string(),
        law_id: rules.law_id().to_string(),
        raw_output,
        decision,
    })
}

/// Tally over several enforcement runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcementSummary {
    pub tested: usize,
    pub admitted: usize,
    pub blocked: usize,
    /// Generators that failed before producing text.
    pub failed: usize,
    /// Runs whose raw output was released downstream.
    pub emitted: usize,
}

impl EnforcementSummary {
    pub fn from_runs<'a>(
        runs: impl IntoIterator<Item = &'a Result<Enforcement, LmlError>>,
    ) -> Self {
        runs.into_iter()
            .fold(Self::default(), |mut summary, run| {
                summary.tested += 1;
                match run {
                    Ok(e) if e.decision.admitted => summary.admitted += 1,
                    Ok(_) => summary.blocked += 1,
                    Err(_) => summary.failed += 1,
                }
                if matches!(run, Ok(e) if e.released_output().is_some()) {
                    summary.emitted += 1;
                }
                summary
            })
    }

    /// Runs whose output was released without the gate admitting it.
    pub fn forbidden_emitted(&self) -> usize {
        self.emitted.saturating_sub(self.admitted)
    }

    /// Fails unless exactly the admitted runs were released.
    pub fn check(&self) -> Result<(), LmlError> {
        if self.emitted != self.admitted {
            return Err(LmlError::IdentityViolation {
                scope: "enforcement summary".to_string(),
                expected: format!("{} emitted (admitted)", self.admitted),
                actual: format!("{} emitted", self.emitted),
            });
        }
        Ok(())
    }
}
