//! Certification aggregator.
//!
//! Counts every depth `1..=max_depth` independently and folds the counts
//! with exact addition. Because `admissible + blocked == m^L` holds at each
//! depth, the cumulative totals cover the whole path space and nothing can
//! fall between the two classes. That is the entire content of
//! "zero leaked": an algebraic identity, recorded as such in the result,
//! not an observation of any running system.

use crate::counter::{self, DepthCount, PathSpaceSpec, decimal, validate_alphabet_size};
use crate::error::{LmlError, non_negative_u32};
use crate::witness::{CertificateKey, compute_certificate_id};
use num::BigUint;
use num::traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// How the reported `leaked` value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeakDerivation {
    /// Follows from `admissible + blocked == m^L` at every depth.
    AlgebraicIdentity,
}

impl LeakDerivation {
    /// Plain statement of what the derivation does and does not establish.
    pub fn statement(self) -> &'static str {
        match self {
            Self::AlgebraicIdentity => {
                "leaked = 0 follows from admissible + blocked = m^L at every depth; \
                 it is a counting identity, not a measurement of any execution"
            }
        }
    }
}

/// Parameters for [`certify_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertifyRequest {
    pub alphabet_size: i64,
    pub bound: i64,
    pub max_depth: i64,
    /// Scoped worker threads the depth range is split across. `0` and `1`
    /// both mean a single sequential fold.
    pub workers: usize,
    /// Keep the per-depth counts in the result.
    pub include_depths: bool,
}

impl CertifyRequest {
    pub fn new(alphabet_size: i64, bound: i64, max_depth: i64) -> Self {
        Self {
            alphabet_size,
            bound,
            max_depth,
            workers: 1,
            include_depths: false,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_depths(mut self, include_depths: bool) -> Self {
        self.include_depths = include_depths;
        self
    }
}

/// Immutable certificate over depths `from_depth..=to_depth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationResult {
    pub alphabet_size: u32,
    pub bound: u32,
    pub from_depth: u32,
    pub to_depth: u32,
    /// `Σ m^L` over the covered range, computed in closed form.
    #[serde(with = "decimal")]
    pub total_paths: BigUint,
    #[serde(with = "decimal")]
    pub cumulative_admissible: BigUint,
    #[serde(with = "decimal")]
    pub cumulative_blocked: BigUint,
    /// Always `0`; see `leaked_derivation`.
    pub leaked: u64,
    pub leaked_derivation: LeakDerivation,
    /// Always `false`: no path was executed or sampled.
    pub empirically_observed: bool,
    pub certificate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depths: Option<Vec<DepthCount>>,
}

impl CertificationResult {
    /// Parse a certificate previously rendered as JSON.
    pub fn from_json(text: &str) -> Result<Self, LmlError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Certify depths `1..=max_depth` sequentially, without per-depth output.
pub fn certify(
    alphabet_size: i64,
    bound: i64,
    max_depth: i64,
) -> Result<CertificationResult, LmlError> {
    certify_with(&CertifyRequest::new(alphabet_size, bound, max_depth))
}

/// Certify according to `request`.
///
/// All parameters are validated before any counting starts.
pub fn certify_with(request: &CertifyRequest) -> Result<CertificationResult, LmlError> {
    let alphabet_size = validate_alphabet_size(request.alphabet_size)?;
    let bound = non_negative_u32("bound", request.bound)?;
    if request.max_depth < 1 {
        return Err(LmlError::invalid(
            "max_depth",
            format!("must be >= 1, got {}", request.max_depth),
        ));
    }
    let max_depth = non_negative_u32("max_depth", request.max_depth)?;

    let span = tracing::debug_span!("certify", alphabet_size, bound, max_depth);
    let _guard = span.enter();

    let range = 1..=max_depth;
    let tally = if request.workers > 1 {
        fold_parallel(alphabet_size, bound, range, request.workers, request.include_depths)
    } else {
        fold_range(alphabet_size, bound, range, request.include_depths)
    };

    let total_paths = geometric_total(alphabet_size, max_depth);
    let covered = &tally.admissible + &tally.blocked;
    if covered != total_paths {
        return Err(LmlError::IdentityViolation {
            scope: format!("depths 1..={max_depth}"),
            expected: total_paths.to_str_radix(10),
            actual: covered.to_str_radix(10),
        });
    }

    let certificate_id = compute_certificate_id(&CertificateKey {
        alphabet_size,
        bound,
        from_depth: 1,
        to_depth: max_depth,
        cumulative_admissible: &tally.admissible,
        cumulative_blocked: &tally.blocked,
    });
    tracing::debug!(%certificate_id, "certification complete");

    Ok(CertificationResult {
        alphabet_size,
        bound,
        from_depth: 1,
        to_depth: max_depth,
        total_paths,
        cumulative_admissible: tally.admissible,
        cumulative_blocked: tally.blocked,
        leaked: 0,
        leaked_derivation: LeakDerivation::AlgebraicIdentity,
        empirically_observed: false,
        certificate_id,
        depths: request.include_depths.then_some(tally.depths),
    })
}

/// Deepest range [`verify_certificate`] will recompute.
///
/// Certificates arrive as untrusted input and recomputation cost grows with
/// `toDepth` squared; anything deeper is rejected before counting starts.
pub const MAX_VERIFIED_DEPTH: u32 = 1024;

/// Recompute a certificate from its parameters and compare every claim.
///
/// Fails with [`LmlError::InvalidParameter`] when `toDepth` exceeds
/// [`MAX_VERIFIED_DEPTH`].
pub fn verify_certificate(claimed: &CertificationResult) -> Result<(), LmlError> {
    if claimed.to_depth > MAX_VERIFIED_DEPTH {
        return Err(LmlError::invalid(
            "toDepth",
            format!(
                "{} exceeds the verification limit of {MAX_VERIFIED_DEPTH}",
                claimed.to_depth
            ),
        ));
    }
    if claimed.from_depth != 1 {
        return Err(mismatch("fromDepth", claimed.from_depth, 1));
    }
    if claimed.leaked != 0 {
        return Err(mismatch("leaked", claimed.leaked, 0));
    }
    if claimed.empirically_observed {
        return Err(mismatch("empiricallyObserved", true, false));
    }

    let request = CertifyRequest::new(
        i64::from(claimed.alphabet_size),
        i64::from(claimed.bound),
        i64::from(claimed.to_depth),
    )
    .with_depths(claimed.depths.is_some());
    let recomputed = certify_with(&request)?;

    if claimed.total_paths != recomputed.total_paths {
        return Err(mismatch("totalPaths", &claimed.total_paths, &recomputed.total_paths));
    }
    if claimed.cumulative_admissible != recomputed.cumulative_admissible {
        return Err(mismatch(
            "cumulativeAdmissible",
            &claimed.cumulative_admissible,
            &recomputed.cumulative_admissible,
        ));
    }
    if claimed.cumulative_blocked != recomputed.cumulative_blocked {
        return Err(mismatch(
            "cumulativeBlocked",
            &claimed.cumulative_blocked,
            &recomputed.cumulative_blocked,
        ));
    }
    if claimed.depths != recomputed.depths {
        return Err(mismatch(
            "depths",
            "per-depth counts as given",
            "different per-depth counts",
        ));
    }
    if claimed.certificate_id != recomputed.certificate_id {
        return Err(mismatch(
            "certificateId",
            &claimed.certificate_id,
            &recomputed.certificate_id,
        ));
    }
    Ok(())
}

fn mismatch(
    field: &'static str,
    claimed: impl std::fmt::Display,
    recomputed: impl std::fmt::Display,
) -> LmlError {
    LmlError::CertificateMismatch {
        field,
        claimed: claimed.to_string(),
        recomputed: recomputed.to_string(),
    }
}

/// Partial sums over a contiguous run of depths.
struct Tally {
    admissible: BigUint,
    blocked: BigUint,
    depths: Vec<DepthCount>,
}

impl Tally {
    fn empty() -> Self {
        Self {
            admissible: BigUint::zero(),
            blocked: BigUint::zero(),
            depths: Vec::new(),
        }
    }

    fn absorb(mut self, count: DepthCount, keep: bool) -> Self {
        self.admissible += &count.admissible;
        self.blocked += &count.blocked;
        if keep {
            self.depths.push(count);
        }
        self
    }

    /// `other` must cover depths after `self` for `depths` to stay ascending.
    fn merge(mut self, other: Tally) -> Self {
        self.admissible += other.admissible;
        self.blocked += other.blocked;
        self.depths.extend(other.depths);
        self
    }
}

fn fold_range(alphabet_size: u32, bound: u32, range: RangeInclusive<u32>, keep: bool) -> Tally {
    range
        .map(|depth| counter::count(&PathSpaceSpec::from_validated(alphabet_size, depth, bound)))
        .fold(Tally::empty(), |tally, count| tally.absorb(count, keep))
}

fn fold_parallel(
    alphabet_size: u32,
    bound: u32,
    range: RangeInclusive<u32>,
    workers: usize,
    keep: bool,
) -> Tally {
    let chunks = split_range(range, workers);
    std::thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| scope.spawn(move || fold_range(alphabet_size, bound, chunk, keep)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .fold(Tally::empty(), Tally::merge)
    })
}

/// Split `range` into at most `parts` contiguous, ascending, non-empty chunks.
fn split_range(range: RangeInclusive<u32>, parts: usize) -> Vec<RangeInclusive<u32>> {
    let (start, end) = (*range.start(), *range.end());
    if start > end {
        return Vec::new();
    }
    let len = u64::from(end - start) + 1;
    let parts = (parts.max(1) as u64).min(len);
    let chunk = len.div_ceil(parts);

    let mut chunks = Vec::with_capacity(parts as usize);
    let mut lo = u64::from(start);
    while lo <= u64::from(end) {
        let hi = (lo + chunk - 1).min(u64::from(end));
        // Both bounds lie within the original u32 range.
        chunks.push(lo as u32..=hi as u32);
        lo = hi + 1;
    }
    chunks
}

/// `Σ_{L=1}^{max_depth} m^L` in closed form.
fn geometric_total(alphabet_size: u32, max_depth: u32) -> BigUint {
    if alphabet_size == 1 {
        return BigUint::from(max_depth);
    }
    let m = BigUint::from(alphabet_size);
    let numerator = m.pow(max_depth + 1) - &m;
    numerator / (m - BigUint::one())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_depths_over_three_operations() {
        let result = certify(3, 1, 40).unwrap();
        let expected: BigUint = "18236498188585393200".parse().unwrap();
        assert_eq!(result.total_paths, expected);
        assert_eq!(
            &result.cumulative_admissible + &result.cumulative_blocked,
            expected
        );
        assert_eq!(result.leaked, 0);
        assert_eq!(result.leaked_derivation, LeakDerivation::AlgebraicIdentity);
        assert!(!result.empirically_observed);
        assert!(result.depths.is_none());
    }

    #[test]
    fn cumulative_matches_two_term_sum() {
        // Σ_{L=1}^{40} (2^L + L·2^(L−1)).
        let expected: BigUint = (1..=40u32)
            .map(|l| BigUint::from(2u32).pow(l) + BigUint::from(l) * BigUint::from(2u32).pow(l - 1))
            .sum();
        let result = certify(3, 1, 40).unwrap();
        assert_eq!(result.cumulative_admissible, expected);
    }

    #[test]
    fn max_depth_must_be_positive() {
        assert!(certify(3, 1, 0).unwrap_err().is_invalid_parameter());
        assert!(certify(3, 1, -5).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn invalid_alphabet_and_bound_rejected() {
        assert!(certify(0, 1, 3).unwrap_err().is_invalid_parameter());
        assert!(certify(3, -1, 3).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn parallel_fold_matches_sequential() {
        let sequential = certify_with(&CertifyRequest::new(4, 3, 57).with_depths(true)).unwrap();
        for workers in [2, 3, 8, 64, 100] {
            let parallel = certify_with(
                &CertifyRequest::new(4, 3, 57)
                    .with_workers(workers)
                    .with_depths(true),
            )
            .unwrap();
            assert_eq!(parallel, sequential, "workers={workers}");
        }
    }

    #[test]
    fn depths_listed_in_ascending_order() {
        let result = certify_with(&CertifyRequest::new(3, 1, 5).with_depths(true)).unwrap();
        let depths = result.depths.unwrap();
        assert_eq!(
            depths.iter().map(|d| d.depth).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert_eq!(depths[0].admissible, BigUint::from(3u32));
        assert_eq!(depths[1].admissible, BigUint::from(8u32));
        assert_eq!(depths[1].blocked, BigUint::from(1u32));
    }

    #[test]
    fn unary_alphabet_total() {
        let result = certify(1, 0, 6).unwrap();
        assert_eq!(result.total_paths, BigUint::from(6u32));
        assert!(result.cumulative_admissible.is_zero());
        assert_eq!(result.cumulative_blocked, BigUint::from(6u32));
    }

    #[test]
    fn certify_is_idempotent() {
        let a = certify(3, 2, 33).unwrap();
        let b = certify(3, 2, 33).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn split_range_covers_everything_once() {
        for len in 1..=20u32 {
            for parts in 1..=25 {
                let chunks = split_range(1..=len, parts);
                let flattened: Vec<u32> = chunks.iter().flat_map(|c| c.clone()).collect();
                assert_eq!(flattened, (1..=len).collect::<Vec<_>>());
                assert!(chunks.len() <= parts);
            }
        }
    }

    #[test]
    fn verify_accepts_genuine_certificate() {
        let result = certify_with(&CertifyRequest::new(3, 1, 12).with_depths(true)).unwrap();
        verify_certificate(&result).unwrap();

        let json = serde_json::to_string(&result).unwrap();
        let parsed = CertificationResult::from_json(&json).unwrap();
        verify_certificate(&parsed).unwrap();
    }

    #[test]
    fn verify_rejects_tampered_counts() {
        let mut result = certify(3, 1, 12).unwrap();
        result.cumulative_blocked += 1u32;
        let err = verify_certificate(&result).unwrap_err();
        assert!(matches!(
            err,
            LmlError::CertificateMismatch {
                field: "cumulativeBlocked",
                ..
            }
        ));
    }

    #[test]
    fn verify_rejects_claimed_observation() {
        let mut result = certify(3, 1, 4).unwrap();
        result.empirically_observed = true;
        assert!(matches!(
            verify_certificate(&result).unwrap_err(),
            LmlError::CertificateMismatch {
                field: "empiricallyObserved",
                ..
            }
        ));
    }

    #[test]
    fn verify_rejects_foreign_certificate_id() {
        let mut result = certify(3, 1, 4).unwrap();
        result.certificate_id = certify(3, 1, 5).unwrap().certificate_id;
        assert!(matches!(
            verify_certificate(&result).unwrap_err(),
            LmlError::CertificateMismatch {
                field: "certificateId",
                ..
            }
        ));
    }

    #[test]
    fn verify_refuses_oversized_depth_before_counting() {
        let mut result = certify(3, 1, 4).unwrap();
        result.to_depth = 4_000_000_000;
        let err = verify_certificate(&result).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("toDepth"));
    }

    #[test]
    fn verify_accepts_certificate_at_depth_limit() {
        let result = certify(2, 0, i64::from(MAX_VERIFIED_DEPTH)).unwrap();
        verify_certificate(&result).unwrap();
    }
}
