//! Error types for LML kernel operations.

/// Errors arising from invalid inputs or broken certification identities.
#[derive(Debug, thiserror::Error)]
pub enum LmlError {
    /// A caller-supplied parameter is outside its domain.
    ///
    /// Raised before any counting starts; no partial result accompanies it.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// `admissible + blocked` disagrees with the independently computed
    /// path total.
    #[error("identity violation at {scope}: expected {expected}, got {actual}")]
    IdentityViolation {
        scope: String,
        expected: String,
        actual: String,
    },

    /// A certificate does not match its recomputation.
    #[error("certificate mismatch on `{field}`: claimed {claimed}, recomputed {recomputed}")]
    CertificateMismatch {
        field: &'static str,
        claimed: String,
        recomputed: String,
    },

    /// Configuration text is not valid TOML for the expected shape.
    #[error("invalid toml configuration: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// JSON input is malformed.
    #[error("invalid json: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// The external generator failed to produce text.
    #[error("generator `{generator}` failed: {message}")]
    Generator { generator: String, message: String },
}

impl LmlError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Whether the caller supplied input outside the accepted domain.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

/// Convert a raw signed parameter into the `u32` domain the counter works in.
///
/// Rejects negative values and values beyond `u32::MAX`.
pub(crate) fn non_negative_u32(name: &'static str, value: i64) -> Result<u32, LmlError> {
    if value < 0 {
        return Err(LmlError::invalid(name, format!("must be >= 0, got {value}")));
    }
    u32::try_from(value)
        .map_err(|_| LmlError::invalid(name, format!("exceeds supported range, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_rejected() {
        let err = non_negative_u32("depth", -1).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert_eq!(
            err.to_string(),
            "invalid parameter `depth`: must be >= 0, got -1"
        );
    }

    #[test]
    fn oversized_values_rejected() {
        let err = non_negative_u32("bound", i64::from(u32::MAX) + 1).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn in_range_values_pass() {
        assert_eq!(non_negative_u32("depth", 0).unwrap(), 0);
        assert_eq!(non_negative_u32("depth", 40).unwrap(), 40);
    }
}
