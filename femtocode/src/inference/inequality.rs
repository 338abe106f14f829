use super::{intervals_of, Predicate};
use crate::almost::Endpoint;
use crate::error::FemtocodeError;
use crate::schema::Schema;
use crate::setops::{difference_pair, intersection_pair};
use crate::FemtoResult;

/// Infer a comparison between two expressions.
///
/// Returns `(result, left, right)`: the schema of the comparison itself
/// and the refined operand schemas under the assumption that it held.
/// When the comparison is decided statically the result is
/// `Boolean(just=true)`, or `Impossible` when it can never hold; when it
/// is undecidable the result is plain `Boolean` and the operands are
/// narrowed to the region where it can hold.
pub fn inequality(
    predicate: Predicate,
    left: &Schema,
    right: &Schema,
) -> FemtoResult<(Schema, Schema, Schema)> {
    match predicate {
        Predicate::Eq => equal(left, right),
        Predicate::Ne => not_equal(left, right),
        Predicate::Lt => ordered(left, right, true),
        Predicate::Le => ordered(left, right, false),
        Predicate::Gt => {
            let (result, r, l) = ordered(right, left, true)?;
            Ok((result, l, r))
        }
        Predicate::Ge => {
            let (result, r, l) = ordered(right, left, false)?;
            Ok((result, l, r))
        }
        other => Err(FemtocodeError::invalid_argument(format!(
            "\"{}\" does not compare two expressions",
            other.opcode()
        ))),
    }
}

/// Singletons are the only schemas on which equality is decidable.
fn is_singleton(schema: &Schema) -> bool {
    match schema {
        Schema::Null { .. } => true,
        Schema::Boolean { just, .. } => just.is_some(),
        Schema::Number { min, max, .. } => min == max,
        _ => false,
    }
}

fn equal(left: &Schema, right: &Schema) -> FemtoResult<(Schema, Schema, Schema)> {
    let overlap = intersection_pair(left, right);
    if overlap.is_impossible() {
        return Ok((overlap.clone(), overlap.clone(), overlap));
    }
    if left == right && is_singleton(left) {
        return Ok((Schema::boolean_just(true), left.clone(), right.clone()));
    }
    Ok((Schema::boolean(), overlap.clone(), overlap))
}

fn not_equal(left: &Schema, right: &Schema) -> FemtoResult<(Schema, Schema, Schema)> {
    let overlap = intersection_pair(left, right);
    if overlap.is_impossible() {
        return Ok((Schema::boolean_just(true), left.clone(), right.clone()));
    }
    if left == right && is_singleton(left) {
        let impossible =
            Schema::impossible_because("the two sides are always equal");
        return Ok((impossible.clone(), impossible.clone(), impossible));
    }
    let refined_left = if is_singleton(right) {
        difference_pair(left, right)
    } else {
        left.clone()
    };
    let refined_right = if is_singleton(left) {
        difference_pair(right, left)
    } else {
        right.clone()
    };
    Ok((Schema::boolean(), refined_left, refined_right))
}

/// `left < right` (`strict`) or `left <= right`.
fn ordered(
    left: &Schema,
    right: &Schema,
    strict: bool,
) -> FemtoResult<(Schema, Schema, Schema)> {
    let lints = intervals_of(left)?;
    let rints = intervals_of(right)?;

    // envelope of each side: the comparison is decided by the extremes
    let lmin = Endpoint::minimum_of(lints.iter().map(|i| i.min))?;
    let lmax = Endpoint::maximum_of(lints.iter().map(|i| i.max))?;
    let rmin = Endpoint::minimum_of(rints.iter().map(|i| i.min))?;
    let rmax = Endpoint::maximum_of(rints.iter().map(|i| i.max))?;

    let always = if strict {
        lmax.value() < rmin.value()
            || (lmax.value() == rmin.value() && (lmax.is_open() || rmin.is_open()))
    } else {
        lmax.value() <= rmin.value()
    };
    if always {
        return Ok((Schema::boolean_just(true), left.clone(), right.clone()));
    }

    let never = if strict {
        lmin.value() >= rmax.value()
    } else {
        lmin.value() > rmax.value()
            || (lmin.value() == rmax.value() && (lmin.is_open() || rmax.is_open()))
    };
    if never {
        let op = if strict { "<" } else { "<=" };
        let impossible = Schema::impossible_because(format!(
            "no value of the left side is ever {} a value of the right side",
            op
        ));
        return Ok((impossible.clone(), impossible.clone(), impossible));
    }

    // l < r <= rmax constrains l below rmax (strictly for <); likewise
    // lmin constrains r from below
    let left_bound = if strict {
        Schema::number(Endpoint::NEG_INF, Endpoint::Open(rmax.value()), false)?
    } else {
        Schema::number(Endpoint::NEG_INF, rmax, false)?
    };
    let right_bound = if strict {
        Schema::number(Endpoint::Open(lmin.value()), Endpoint::INF, false)?
    } else {
        Schema::number(lmin, Endpoint::INF, false)?
    };
    Ok((
        Schema::boolean(),
        intersection_pair(left, &left_bound),
        intersection_pair(right, &right_bound),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(min: f64, max: f64) -> Schema {
        Schema::real_range(min, max).unwrap()
    }

    #[test]
    fn disjoint_intervals_decide_less_than() {
        let (result, l, r) = inequality(Predicate::Lt, &real(0.0, 1.0), &real(2.0, 3.0)).unwrap();
        assert_eq!(result, Schema::boolean_just(true));
        assert_eq!(l, real(0.0, 1.0));
        assert_eq!(r, real(2.0, 3.0));
    }

    #[test]
    fn touching_intervals_decide_le_but_not_lt() {
        let (le, _, _) = inequality(Predicate::Le, &real(0.0, 2.0), &real(2.0, 3.0)).unwrap();
        assert_eq!(le, Schema::boolean_just(true));
        let (lt, _, _) = inequality(Predicate::Lt, &real(0.0, 2.0), &real(2.0, 3.0)).unwrap();
        assert_eq!(lt, Schema::boolean());
    }

    #[test]
    fn reversed_intervals_are_impossible() {
        let (result, l, _) = inequality(Predicate::Lt, &real(5.0, 9.0), &real(0.0, 2.0)).unwrap();
        assert!(result.is_impossible());
        assert!(l.is_impossible());
    }

    #[test]
    fn overlap_narrows_both_sides() {
        let (result, l, r) = inequality(Predicate::Lt, &real(0.0, 10.0), &real(5.0, 7.0)).unwrap();
        assert_eq!(result, Schema::boolean());
        assert_eq!(
            l,
            Schema::number(Endpoint::Closed(0.0), Endpoint::Open(7.0), false).unwrap()
        );
        // the lower bound almost(0) is looser than 5, so the right side
        // keeps its own
        assert_eq!(r, real(5.0, 7.0));
    }

    #[test]
    fn greater_than_swaps_the_refinements() {
        let (result, l, r) = inequality(Predicate::Gt, &real(0.0, 10.0), &real(5.0, 7.0)).unwrap();
        assert_eq!(result, Schema::boolean());
        assert_eq!(
            l,
            Schema::number(Endpoint::Open(5.0), Endpoint::Closed(10.0), false).unwrap()
        );
        assert_eq!(r, real(5.0, 7.0));
    }

    #[test]
    fn equality_of_the_same_singleton_is_true() {
        let five = real(5.0, 5.0);
        let (result, _, _) = inequality(Predicate::Eq, &five, &five).unwrap();
        assert_eq!(result, Schema::boolean_just(true));
    }

    #[test]
    fn equality_of_disjoint_schemas_is_impossible() {
        let (result, _, _) =
            inequality(Predicate::Eq, &real(0.0, 1.0), &real(2.0, 3.0)).unwrap();
        assert!(result.is_impossible());
    }

    #[test]
    fn equality_refines_to_the_overlap() {
        let (result, l, r) =
            inequality(Predicate::Eq, &real(0.0, 5.0), &real(3.0, 9.0)).unwrap();
        assert_eq!(result, Schema::boolean());
        assert_eq!(l, real(3.0, 5.0));
        assert_eq!(l, r);
    }

    #[test]
    fn not_equal_carves_out_a_singleton() {
        let (result, l, r) =
            inequality(Predicate::Ne, &real(0.0, 10.0), &real(5.0, 5.0)).unwrap();
        assert_eq!(result, Schema::boolean());
        assert_ne!(l, real(0.0, 10.0));
        assert_eq!(r, real(5.0, 5.0));
    }

    #[test]
    fn ordering_a_string_is_an_argument_error() {
        assert!(inequality(Predicate::Lt, &Schema::string(), &real(0.0, 1.0)).is_err());
    }

    #[test]
    fn union_envelope_decides_when_all_alternatives_do() {
        let u = crate::setops::union(&[real(0.0, 1.0), real(2.0, 3.0)]).unwrap();
        let (result, _, _) = inequality(Predicate::Lt, &u, &real(10.0, 20.0)).unwrap();
        assert_eq!(result, Schema::boolean_just(true));
    }
}
