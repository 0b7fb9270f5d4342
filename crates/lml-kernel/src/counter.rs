//! Path-space counter.
//!
//! A path of length `L` is a word over an alphabet of `m` operations. It is
//! admissible when the distinguished operation occurs at most `k` times.
//! Choosing the `e` positions of the distinguished operation and filling the
//! rest from the other `m - 1` symbols gives
//!
//! ```text
//! admissible(m, k, L) = Σ_{e=0}^{min(k, L)} C(L, e) · (m − 1)^(L − e)
//! blocked(m, k, L)    = m^L − admissible(m, k, L)
//! ```
//!
//! Blocked paths are never counted on their own, and no path is ever
//! enumerated. Work is `O(min(k, L))` big-integer operations per depth.

use crate::error::{LmlError, non_negative_u32};
use num::BigUint;
use num::traits::{One, Zero};
use serde::{Deserialize, Serialize};

/// Validated counting parameters for a single depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSpaceSpec {
    alphabet_size: u32,
    depth: u32,
    bound: u32,
}

impl PathSpaceSpec {
    /// Validate raw parameters.
    ///
    /// Fails with [`LmlError::InvalidParameter`] when `alphabet_size < 1`,
    /// `depth < 0` or `bound < 0`. A `bound` above `depth` is accepted and
    /// clamped when counting.
    pub fn new(alphabet_size: i64, depth: i64, bound: i64) -> Result<Self, LmlError> {
        Ok(Self {
            alphabet_size: validate_alphabet_size(alphabet_size)?,
            depth: non_negative_u32("depth", depth)?,
            bound: non_negative_u32("bound", bound)?,
        })
    }

    pub(crate) fn from_validated(alphabet_size: u32, depth: u32, bound: u32) -> Self {
        Self {
            alphabet_size,
            depth,
            bound,
        }
    }

    pub fn alphabet_size(&self) -> u32 {
        self.alphabet_size
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn bound(&self) -> u32 {
        self.bound
    }

    /// `min(bound, depth)`: a bound past the path length restricts nothing.
    pub fn effective_bound(&self) -> u32 {
        self.bound.min(self.depth)
    }

    /// `m^L`.
    pub fn total_paths(&self) -> BigUint {
        BigUint::from(self.alphabet_size).pow(self.depth)
    }
}

pub(crate) fn validate_alphabet_size(alphabet_size: i64) -> Result<u32, LmlError> {
    if alphabet_size < 1 {
        return Err(LmlError::invalid(
            "alphabet_size",
            format!("must be >= 1, got {alphabet_size}"),
        ));
    }
    u32::try_from(alphabet_size).map_err(|_| {
        LmlError::invalid(
            "alphabet_size",
            format!("exceeds supported range, got {alphabet_size}"),
        )
    })
}

/// Exact path counts at one depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthCount {
    pub depth: u32,
    pub effective_bound: u32,
    #[serde(with = "decimal")]
    pub admissible: BigUint,
    #[serde(with = "decimal")]
    pub blocked: BigUint,
}

impl DepthCount {
    /// `admissible + blocked`, which is `m^L` for every counted depth.
    pub fn total(&self) -> BigUint {
        &self.admissible + &self.blocked
    }
}

/// Count admissible and blocked paths for one depth.
pub fn count(spec: &PathSpaceSpec) -> DepthCount {
    let effective_bound = spec.effective_bound();
    let admissible = admissible_paths(spec.alphabet_size, spec.depth, effective_bound);
    // admissible is a partial sum of the binomial expansion of m^L, so it
    // never exceeds the total.
    let blocked = spec.total_paths() - &admissible;
    DepthCount {
        depth: spec.depth,
        effective_bound,
        admissible,
        blocked,
    }
}

/// `Σ_{e=0}^{bound} C(depth, e) · (m − 1)^(depth − e)` with `bound <= depth`.
fn admissible_paths(alphabet_size: u32, depth: u32, bound: u32) -> BigUint {
    debug_assert!(bound <= depth);
    let free = BigUint::from(alphabet_size - 1);

    // Walk e downward so (m − 1)^(depth − e) only ever grows by one factor.
    let mut power = free.pow(depth - bound);
    let mut sum = BigUint::zero();
    for binomial in binomial_row(depth, bound).iter().rev() {
        sum += binomial * &power;
        power *= &free;
    }
    sum
}

/// `C(n, 0), C(n, 1), ..., C(n, upto)` with `upto <= n`, each derived from
/// its predecessor.
fn binomial_row(n: u32, upto: u32) -> Vec<BigUint> {
    debug_assert!(upto <= n);
    let mut row = Vec::with_capacity(upto as usize + 1);
    let mut c = BigUint::one();
    row.push(c.clone());
    for e in 0..upto {
        c *= n - e;
        c /= e + 1;
        row.push(c.clone());
    }
    row
}

/// Serde adapter writing big integers as decimal strings.
pub(crate) mod decimal {
    use num::BigUint;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
