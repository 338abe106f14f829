//! Half-open interval endpoints over the extended reals.
//!
//! An `Endpoint` is either a closed bound (the value itself belongs to the
//! interval) or an open bound, written `almost(x)` in Femtocode source: the
//! open limit immediately adjacent to `x`. `Closed(f64::INFINITY)` is the
//! attainable `inf` of the extended reals; `Open(f64::INFINITY)` bounds the
//! unbounded-but-finite reals.

use crate::error::FemtocodeError;
use crate::FemtoResult;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy)]
pub enum Endpoint {
    Closed(f64),
    Open(f64),
}

impl Endpoint {
    pub const NEG_INF: Endpoint = Endpoint::Closed(f64::NEG_INFINITY);
    pub const INF: Endpoint = Endpoint::Closed(f64::INFINITY);
    pub const ALMOST_NEG_INF: Endpoint = Endpoint::Open(f64::NEG_INFINITY);
    pub const ALMOST_INF: Endpoint = Endpoint::Open(f64::INFINITY);

    pub fn value(self) -> f64 {
        match self {
            Endpoint::Closed(v) | Endpoint::Open(v) => v,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Endpoint::Open(_))
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Endpoint::Closed(_))
    }

    pub fn is_finite(self) -> bool {
        self.value().is_finite()
    }

    /// Flip closed to open and open to closed at the same real value.
    /// Used to turn interval boundaries inside out during `difference`
    /// and `intersection`.
    pub fn complement(self) -> Endpoint {
        match self {
            Endpoint::Closed(v) => Endpoint::Open(v),
            Endpoint::Open(v) => Endpoint::Closed(v),
        }
    }

    /// Same openness, negated value.
    pub fn negate(self) -> Endpoint {
        match self {
            Endpoint::Closed(v) => Endpoint::Closed(-v),
            Endpoint::Open(v) => Endpoint::Open(-v),
        }
    }

    /// The smaller endpoint; on equal values the closed one wins because
    /// it is the more inclusive lower bound.
    pub fn minimum(self, other: Endpoint) -> Endpoint {
        if self.value() < other.value() {
            self
        } else if other.value() < self.value() {
            other
        } else if self.is_closed() {
            self
        } else {
            other
        }
    }

    /// The larger endpoint; on equal values the closed one wins because
    /// it is the more inclusive upper bound.
    pub fn maximum(self, other: Endpoint) -> Endpoint {
        if self.value() > other.value() {
            self
        } else if other.value() > self.value() {
            other
        } else if self.is_closed() {
            self
        } else {
            other
        }
    }

    pub fn minimum_of(endpoints: impl IntoIterator<Item = Endpoint>) -> FemtoResult<Endpoint> {
        endpoints
            .into_iter()
            .reduce(Endpoint::minimum)
            .ok_or_else(|| FemtocodeError::invalid_argument("minimum of no endpoints"))
    }

    pub fn maximum_of(endpoints: impl IntoIterator<Item = Endpoint>) -> FemtoResult<Endpoint> {
        endpoints
            .into_iter()
            .reduce(Endpoint::maximum)
            .ok_or_else(|| FemtocodeError::invalid_argument("maximum of no endpoints"))
    }

    /// Endpoint sum. Openness of the result follows the operands, except
    /// that an infinite operand imposes its own openness: the sum is the
    /// IEEE limit and a finite perturbation of the other operand does not
    /// move it. The caller must rule out `inf + -inf` beforehand.
    pub fn plus(self, other: Endpoint) -> Endpoint {
        let v = self.value() + other.value();
        debug_assert!(!v.is_nan(), "indeterminate endpoint sum");
        Endpoint::with_openness(v, combined_openness(self, other))
    }

    pub fn minus(self, other: Endpoint) -> Endpoint {
        self.plus(other.negate())
    }

    pub fn with_openness(value: f64, open: bool) -> Endpoint {
        if open {
            Endpoint::Open(value)
        } else {
            Endpoint::Closed(value)
        }
    }
}

/// Openness rule for binary endpoint arithmetic: open if either operand is
/// open, unless exactly one operand is infinite, in which case the
/// infinite operand decides.
pub(crate) fn combined_openness(a: Endpoint, b: Endpoint) -> bool {
    match (a.value().is_infinite(), b.value().is_infinite()) {
        (true, false) => a.is_open(),
        (false, true) => b.is_open(),
        _ => a.is_open() || b.is_open(),
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        // almost(x) is a different endpoint than x itself
        self.value() == other.value() && self.is_open() == other.is_open()
    }
}

impl Eq for Endpoint {}

impl PartialOrd for Endpoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Endpoint {
    fn cmp(&self, other: &Self) -> Ordering {
        // Canonical order: by value, closed before open. NaN is never
        // constructed (schema constructors reject it).
        self.value()
            .partial_cmp(&other.value())
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.is_open().cmp(&other.is_open()))
    }
}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // +0.0 normalizes -0.0 so the two zeros hash alike
        (self.value() + 0.0).to_bits().hash(state);
        self.is_open().hash(state);
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |v: f64| -> String {
            if v == f64::INFINITY {
                "inf".to_string()
            } else if v == f64::NEG_INFINITY {
                "-inf".to_string()
            } else {
                format!("{}", v)
            }
        };
        match self {
            Endpoint::Closed(v) => write!(f, "{}", render(*v)),
            Endpoint::Open(v) => write!(f, "almost({})", render(*v)),
        }
    }
}
