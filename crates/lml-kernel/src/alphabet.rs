//! The operation alphabet paths are drawn from.
//!
//! One operation is distinguished: its occurrences per path are bounded.
//! Every other operation is unrestricted. Only the alphabet's size reaches
//! the counter; the names exist for configuration and reporting.

use crate::error::LmlError;
use serde::Serialize;
use std::collections::BTreeSet;

/// The state-evolving operation in the default alphabet.
pub const EVOLVE: &str = "EVOLVE";
/// Emits output without evolving state.
pub const EMIT: &str = "EMIT";
/// Gates output without evolving state.
pub const GATE: &str = "GATE";

/// A validated, ordered alphabet with one distinguished operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationAlphabet {
    operations: Vec<String>,
    distinguished: String,
}

impl OperationAlphabet {
    /// Build an alphabet.
    ///
    /// Operation names must be non-blank and unique, and `distinguished`
    /// must name one of them.
    pub fn new(
        operations: impl IntoIterator<Item = impl Into<String>>,
        distinguished: impl Into<String>,
    ) -> Result<Self, LmlError> {
        let operations: Vec<String> = operations.into_iter().map(Into::into).collect();
        let distinguished = distinguished.into();

        if operations.is_empty() {
            return Err(LmlError::invalid(
                "alphabet",
                "must contain at least one operation",
            ));
        }
        let mut seen = BTreeSet::new();
        for op in &operations {
            if op.trim().is_empty() {
                return Err(LmlError::invalid("alphabet", "operation names must be non-blank"));
            }
            if !seen.insert(op.as_str()) {
                return Err(LmlError::invalid(
                    "alphabet",
                    format!("duplicate operation `{op}`"),
                ));
            }
        }
        if !seen.contains(distinguished.as_str()) {
            return Err(LmlError::invalid(
                "alphabet",
                format!("distinguished operation `{distinguished}` is not in the alphabet"),
            ));
        }

        Ok(Self {
            operations,
            distinguished,
        })
    }

    /// Number of operations, `m`.
    pub fn size(&self) -> u32 {
        // `new` guarantees at least one entry; alphabets beyond u32 are not
        // constructible from any realistic configuration.
        u32::try_from(self.operations.len()).unwrap_or(u32::MAX)
    }

    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn distinguished(&self) -> &str {
        &self.distinguished
    }

    /// Operations that may appear any number of times.
    pub fn unrestricted(&self) -> impl Iterator<Item = &str> {
        self.operations
            .iter()
            .map(String::as_str)
            .filter(|op| *op != self.distinguished)
    }
}

impl Default for OperationAlphabet {
    fn default() -> Self {
        Self {
            operations: vec![EVOLVE.to_string(), EMIT.to_string(), GATE.to_string()],
            distinguished: EVOLVE.to_string(),
        }
    }
}
