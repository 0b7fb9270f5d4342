//! TOML configuration.
//!
//! ```toml
//! [alphabet]
//! operations = ["EVOLVE", "EMIT", "GATE"]
//! distinguished = "EVOLVE"
//!
//! [certification]
//! bound = 1
//! max_depth = 40
//!
//! [grounding]
//! law_id = "L-001"
//! indicators = ["according to", "study"]
//! ```
//!
//! Every table and key is optional. A missing `indicators` key means the
//! default indicators; `indicators = []` means an empty rule set.

use crate::alphabet::OperationAlphabet;
use crate::certify::CertifyRequest;
use crate::error::LmlError;
use crate::grounding::{DEFAULT_INDICATORS, DEFAULT_LAW_ID, GroundingRuleSet};
use serde::Deserialize;

pub const DEFAULT_BOUND: i64 = 1;
pub const DEFAULT_MAX_DEPTH: i64 = 40;

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmlConfig {
    pub alphabet: OperationAlphabet,
    pub certification: CertificationConfig,
    pub grounding: GroundingRuleSet,
}

/// Certification defaults. Kept signed so out-of-domain values reach the
/// certifier and fail there with the usual error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificationConfig {
    pub bound: i64,
    pub max_depth: i64,
}

impl Default for CertificationConfig {
    fn default() -> Self {
        Self {
            bound: DEFAULT_BOUND,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for LmlConfig {
    fn default() -> Self {
        Self {
            alphabet: OperationAlphabet::default(),
            certification: CertificationConfig::default(),
            grounding: GroundingRuleSet::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    alphabet: Option<RawAlphabet>,
    #[serde(default)]
    certification: RawCertification,
    #[serde(default)]
    grounding: RawGrounding,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAlphabet {
    operations: Vec<String>,
    distinguished: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCertification {
    bound: Option<i64>,
    max_depth: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGrounding {
    law_id: Option<String>,
    indicators: Option<Vec<String>>,
}

impl LmlConfig {
    /// Parse and validate configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, LmlError> {
        let raw: RawConfig = toml::from_str(text)?;

        let alphabet = match raw.alphabet {
            Some(a) => OperationAlphabet::new(a.operations, a.distinguished)?,
            None => OperationAlphabet::default(),
        };
        let certification = CertificationConfig {
            bound: raw.certification.bound.unwrap_or(DEFAULT_BOUND),
            max_depth: raw.certification.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        };
        let law_id = raw
            .grounding
            .law_id
            .unwrap_or_else(|| DEFAULT_LAW_ID.to_string());
        let grounding = match raw.grounding.indicators {
            Some(indicators) => GroundingRuleSet::new(law_id, indicators)?,
            None => GroundingRuleSet::new(law_id, DEFAULT_INDICATORS)?,
        };

        Ok(Self {
            alphabet,
            certification,
            grounding,
        })
    }

    /// Certification request for the configured alphabet and defaults.
    pub fn certify_request(&self) -> CertifyRequest {
        CertifyRequest::new(
            i64::from(self.alphabet.size()),
            self.certification.bound,
            self.certification.max_depth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        let config = LmlConfig::from_toml_str("").unwrap();
        assert_eq!(config, LmlConfig::default());
        let request = config.certify_request();
        assert_eq!(request, CertifyRequest::new(3, 1, 40));
    }

    #[test]
    fn full_configuration() {
        let config = LmlConfig::from_toml_str(
            r#"
            [alphabet]
            operations = ["EVOLVE", "EMIT", "GATE", "WAIT"]
            distinguished = "EVOLVE"

            [certification]
            bound = 2
            max_depth = 12

            [grounding]
            law_id = "L-007"
            indicators = ["cited", "Dataset"]
            "#,
        )
        .unwrap();
        assert_eq!(config.alphabet.size(), 4);
        assert_eq!(config.certify_request(), CertifyRequest::new(4, 2, 12));
        assert_eq!(config.grounding.law_id(), "L-007");
        assert_eq!(config.grounding.indicators(), ["cited", "Dataset"]);
    }

    #[test]
    fn explicit_empty_indicators_give_empty_rule_set() {
        let config = LmlConfig::from_toml_str("[grounding]\nindicators = []\n").unwrap();
        assert!(config.grounding.is_empty());
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = LmlConfig::from_toml_str("[certification]\ndepth = 3\n").unwrap_err();
        assert!(matches!(err, LmlError::ParseToml(_)));
    }

    #[test]
    fn invalid_alphabet_rejected() {
        let err = LmlConfig::from_toml_str(
            "[alphabet]\noperations = [\"A\"]\ndistinguished = \"B\"\n",
        )
        .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn negative_bound_is_carried_to_certifier() {
        let config = LmlConfig::from_toml_str("[certification]\nbound = -1\n").unwrap();
        let err = crate::certify::certify_with(&config.certify_request()).unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}
