//! # LML Kernel
//!
//! Two independent pieces:
//!
//! - **Certification**: proves, by counting, that every execution path over
//!   an operation alphabet is classified as either admissible or blocked.
//!   Paths are counted in closed form with exact integers; none is ever
//!   enumerated or run.
//! - **Admissibility gate**: decides whether a piece of text contains one
//!   of a configured list of grounding indicators.
//!
//! ## Architecture
//!
//! ```text
//! OperationAlphabet     ← m operations, one distinguished
//!     │
//! PathSpaceSpec         ← (m, L, k), validated
//!     │ count
//! DepthCount            ← admissible + blocked = m^L
//!     │ fold over L = 1..=D
//! CertificationResult   ← cumulative totals, leaked = 0 by identity
//!
//! GroundingRuleSet ──evaluate(text)──▶ GateDecision
//!     └──────── enforce(generator, prompt) ──▶ Enforcement
//! ```
//!
//! Every operation is a pure function of its inputs.

pub mod alphabet;
pub mod certify;
pub mod config;
pub mod counter;
pub mod enforce;
pub mod error;
pub mod gate;
pub mod grounding;
pub mod witness;

pub use alphabet::OperationAlphabet;
pub use certify::{
    CertificationResult, CertifyRequest, LeakDerivation, MAX_VERIFIED_DEPTH, certify, certify_with,
    verify_certificate,
};
pub use config::{CertificationConfig, LmlConfig};
pub use counter::{DepthCount, PathSpaceSpec, count};
pub use enforce::{
    BLOCKED_PLACEHOLDER, Enforcement, EnforcementSummary, FnGenerator, Generator, enforce,
};
pub use error::LmlError;
pub use gate::{DecisionReason, GateDecision, evaluate};
pub use grounding::{DEFAULT_INDICATORS, DEFAULT_LAW_ID, GroundingRuleSet};
pub use witness::compute_certificate_id;
