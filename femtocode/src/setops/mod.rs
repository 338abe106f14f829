//! The three set operations over schemas: `union`, `intersection`, and
//! `difference`. All of them allocate fresh schemas; operands are never
//! mutated.
//!
//! `Impossible` is absorbing for *all three* entry points' internals,
//! including union. That deviates from classical set theory on purpose:
//! any code path that produces `Impossible` is a compile error, so the
//! marker must survive aggregation instead of being swallowed by a
//! harmless branch.

mod difference;
mod intersection;
mod union;

pub use difference::difference;
pub use intersection::intersection;
pub use union::union;

pub(crate) use difference::difference_pair;
pub(crate) use intersection::intersection_pair;
pub(crate) use union::union_list;

use crate::almost::Endpoint;
use crate::error::FemtocodeError;
use crate::schema::Schema;
use crate::FemtoResult;

/// The tighter of two lower bounds: larger value wins; on equal values the
/// open one wins because it excludes the boundary point.
pub(crate) fn tighter_lower(a: Endpoint, b: Endpoint) -> Endpoint {
    a.complement().maximum(b.complement()).complement()
}

/// The tighter of two upper bounds: smaller value wins; ties go to open.
pub(crate) fn tighter_upper(a: Endpoint, b: Endpoint) -> Endpoint {
    a.complement().minimum(b.complement()).complement()
}

/// Round closed fractional bounds inward so they can serve as whole-number
/// interval endpoints.
pub(crate) fn clamp_whole(min: Endpoint, max: Endpoint) -> (Endpoint, Endpoint) {
    let min = match min {
        Endpoint::Closed(v) if v.is_finite() && v.fract() != 0.0 => Endpoint::Closed(v.ceil()),
        e => e,
    };
    let max = match max {
        Endpoint::Closed(v) if v.is_finite() && v.fract() != 0.0 => Endpoint::Closed(v.floor()),
        e => e,
    };
    (min, max)
}

/// Walk a finite schema tree looking for an unresolved alias string.
/// `Ref` nodes are not entered; they are already resolved.
pub(crate) fn find_unresolved(schema: &Schema) -> Option<&str> {
    match schema {
        Schema::Alias(name) => Some(name),
        Schema::Collection { items, .. } => find_unresolved(items),
        Schema::Record { fields, .. } => fields.values().find_map(find_unresolved),
        Schema::Union { possibilities } => possibilities.iter().find_map(find_unresolved),
        _ => None,
    }
}

pub(crate) fn ensure_resolved(schema: &Schema) -> FemtoResult<()> {
    match find_unresolved(schema) {
        Some(name) => Err(FemtocodeError::unresolved(name)),
        None => Ok(()),
    }
}

/// A length range `[fewest, most]` viewed as a whole-number schema, so the
/// size arithmetic of strings and collections reuses the Number rules.
pub(crate) fn size_schema(fewest: Endpoint, most: Endpoint) -> Schema {
    Schema::Number {
        alias: None,
        min: fewest,
        max: most,
        whole: true,
    }
}

/// The `(min, max)` intervals inside a number-or-union-of-numbers schema;
/// empty for anything else.
pub(crate) fn number_intervals(schema: &Schema) -> Vec<(Endpoint, Endpoint)> {
    match schema {
        Schema::Number { min, max, .. } => vec![(*min, *max)],
        Schema::Union { possibilities } => {
            possibilities.iter().flat_map(number_intervals).collect()
        }
        _ => Vec::new(),
    }
}
