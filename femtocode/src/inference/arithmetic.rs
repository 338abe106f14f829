//! Interval arithmetic over `Number` schemas.
//!
//! Every operator is total: combinations that IEEE or Python would turn
//! into an exception or a `nan` become the `Impossible` schema instead,
//! so a compile-time schema is enough to prove a program cannot fault at
//! runtime. Division by an attained zero follows Java and lands on a
//! signed infinity; the genuinely indeterminate forms (`inf + -inf`,
//! `0 * inf`, `0/0`, `inf/inf`, `1 ** inf`, a negative base under a
//! non-integer exponent) are `Impossible`.

use super::{intervals_of, Interval};
use crate::almost::{combined_openness, Endpoint};
use crate::schema::Schema;
use crate::setops::union_list;
use crate::FemtoResult;

pub fn add(a: &Schema, b: &Schema) -> FemtoResult<Schema> {
    lift(a, b, add_pair)
}

pub fn subtract(a: &Schema, b: &Schema) -> FemtoResult<Schema> {
    lift(a, b, |ia, ib| {
        let negated = Interval {
            min: ib.max.negate(),
            max: ib.min.negate(),
            whole: ib.whole,
        };
        add_pair(ia, &negated)
    })
}

pub fn multiply(a: &Schema, b: &Schema) -> FemtoResult<Schema> {
    lift(a, b, multiply_pair)
}

pub fn divide(a: &Schema, b: &Schema) -> FemtoResult<Schema> {
    lift(a, b, divide_pair)
}

pub fn floordivide(a: &Schema, b: &Schema) -> FemtoResult<Schema> {
    lift(a, b, floordivide_pair)
}

pub fn power(a: &Schema, b: &Schema) -> FemtoResult<Schema> {
    lift(a, b, power_pair)
}

pub fn modulo(a: &Schema, b: &Schema) -> FemtoResult<Schema> {
    lift(a, b, modulo_pair)
}

/// Distribute a pairwise interval operator over `Union` operands and glue
/// the resulting pieces back together. An `Impossible` operand absorbs
/// the whole result.
fn lift(
    a: &Schema,
    b: &Schema,
    op: impl Fn(&Interval, &Interval) -> FemtoResult<Schema>,
) -> FemtoResult<Schema> {
    if a.is_impossible() {
        return Ok(a.clone());
    }
    if b.is_impossible() {
        return Ok(b.clone());
    }
    let left = intervals_of(a)?;
    let right = intervals_of(b)?;
    let mut pieces = Vec::with_capacity(left.len() * right.len());
    for ia in &left {
        for ib in &right {
            pieces.push(op(ia, ib)?);
        }
    }
    Ok(union_list(pieces))
}

fn indeterminate(form: &str) -> Schema {
    Schema::impossible_because(format!(
        "Extended real type allows for indeterminate form ({})",
        form
    ))
}

/// Build the result interval from a set of candidate endpoints. A
/// wholeness claim is dropped when an endpoint is an attained infinity
/// (an overflowed integer power is no longer representable as whole).
fn interval_schema(candidates: Vec<Endpoint>, whole: bool) -> FemtoResult<Schema> {
    debug_assert!(candidates.iter().all(|e| !e.value().is_nan()));
    let min = Endpoint::minimum_of(candidates.iter().copied())?;
    let max = Endpoint::maximum_of(candidates.iter().copied())?;
    let whole = whole && min != Endpoint::NEG_INF && max != Endpoint::INF;
    Schema::number(min, max, whole)
}

/// Endpoint sum where an attained infinity dominates an `almost`
/// infinity of the opposite sign; the truly indeterminate pairings are
/// rejected before this runs.
fn endpoint_sum(x: Endpoint, y: Endpoint) -> Endpoint {
    let v = x.value() + y.value();
    if v.is_nan() {
        return if x.is_closed() { x } else { y };
    }
    Endpoint::with_openness(v, combined_openness(x, y))
}

fn add_pair(a: &Interval, b: &Interval) -> FemtoResult<Schema> {
    if (a.max == Endpoint::INF && b.min == Endpoint::NEG_INF)
        || (a.min == Endpoint::NEG_INF && b.max == Endpoint::INF)
    {
        return Ok(indeterminate("inf + -inf"));
    }
    Schema::number(
        endpoint_sum(a.min, b.min),
        endpoint_sum(a.max, b.max),
        a.whole && b.whole,
    )
}

/// Split an interval at zero into sign-definite parts, tagged with their
/// sign. The zero-adjacent boundary is `almost(0)` for reals and `±1` for
/// whole numbers; an attained zero is handled separately by each caller.
fn sign_parts(i: &Interval) -> Vec<(Interval, f64)> {
    let mut parts = Vec::new();
    if i.min.value() < 0.0 {
        let max = if i.max.value() > 0.0 || i.max == Endpoint::Closed(0.0) {
            if i.whole {
                Endpoint::Closed(-1.0)
            } else {
                Endpoint::Open(0.0)
            }
        } else {
            i.max
        };
        parts.push((
            Interval {
                min: i.min,
                max,
                whole: i.whole,
            },
            -1.0,
        ));
    }
    if i.max.value() > 0.0 {
        let min = if i.min.value() < 0.0 || i.min == Endpoint::Closed(0.0) {
            if i.whole {
                Endpoint::Closed(1.0)
            } else {
                Endpoint::Open(0.0)
            }
        } else {
            i.min
        };
        parts.push((
            Interval {
                min,
                max: i.max,
                whole: i.whole,
            },
            1.0,
        ));
    }
    parts
}

/// Candidate products for one corner of a sign-definite part pair.
///
/// The `0 * inf` mixes that survive the indeterminate pre-checks are the
/// limit cases: an `almost` zero against an attained infinity lands on
/// that infinity, an attained zero against an `almost` infinity stays
/// zero, and two `almost` limits spread over the whole open ray, which
/// takes both a near-zero and a near-infinite candidate to cover.
fn mul_corner(x: Endpoint, y: Endpoint, sign: f64) -> Vec<Endpoint> {
    let xv = x.value();
    let yv = y.value();
    if (xv == 0.0 && yv.is_infinite()) || (yv == 0.0 && xv.is_infinite()) {
        let (zero, infinite) = if xv == 0.0 { (x, y) } else { (y, x) };
        return match (zero.is_closed(), infinite.is_closed()) {
            (false, true) => vec![Endpoint::Closed(sign * f64::INFINITY)],
            (false, false) => vec![
                Endpoint::Open(0.0),
                Endpoint::Open(sign * f64::INFINITY),
            ],
            (true, false) => vec![Endpoint::Closed(0.0)],
            (true, true) => vec![
                Endpoint::Closed(0.0),
                Endpoint::Closed(sign * f64::INFINITY),
            ],
        };
    }
    let v = xv * yv;
    let open = if v.is_infinite() {
        !((xv.is_infinite() && x.is_closed()) || (yv.is_infinite() && y.is_closed()))
    } else {
        x.is_open() || y.is_open()
    };
    vec![Endpoint::with_openness(v, open)]
}

fn multiply_pair(a: &Interval, b: &Interval) -> FemtoResult<Schema> {
    if (a.attains(0.0) && b.attains_infinite()) || (b.attains(0.0) && a.attains_infinite()) {
        return Ok(indeterminate("0 * inf"));
    }
    let mut candidates = Vec::new();
    if a.attains(0.0) || b.attains(0.0) {
        candidates.push(Endpoint::Closed(0.0));
    }
    for (pa, sa) in sign_parts(a) {
        for (pb, sb) in sign_parts(b) {
            for x in [pa.min, pa.max] {
                for y in [pb.min, pb.max] {
                    candidates.extend(mul_corner(x, y, sa * sb));
                }
            }
        }
    }
    interval_schema(candidates, a.whole && b.whole)
}

/// The reciprocal of a sign-definite divisor part. Order reverses within
/// the part; an `almost(0)` bound becomes the part's `almost` infinity
/// and an infinite bound becomes a zero of matching openness.
fn reciprocal(p: &Interval, sign: f64) -> Interval {
    Interval {
        min: recip_endpoint(p.max, sign),
        max: recip_endpoint(p.min, sign),
        whole: false,
    }
}

fn recip_endpoint(e: Endpoint, sign: f64) -> Endpoint {
    let v = e.value();
    if v == 0.0 {
        Endpoint::Open(sign * f64::INFINITY)
    } else if v.is_infinite() {
        Endpoint::with_openness(0.0, e.is_open())
    } else {
        Endpoint::with_openness(1.0 / v, e.is_open())
    }
}

fn divide_pair(a: &Interval, b: &Interval) -> FemtoResult<Schema> {
    if b.min == Endpoint::Closed(0.0) && b.max == Endpoint::Closed(0.0) {
        return Ok(indeterminate("0/0"));
    }
    if a.attains(0.0) && b.attains(0.0) {
        return Ok(indeterminate("0/0"));
    }
    if a.attains_infinite() && b.attains_infinite() {
        return Ok(indeterminate("inf/inf"));
    }
    let mut candidates = Vec::new();
    if a.attains(0.0) {
        candidates.push(Endpoint::Closed(0.0));
    }
    if b.attains(0.0) {
        // division by an attained zero lands on a signed infinity (Java
        // x/0.0) rather than raising; a divisor reaching below zero also
        // exposes the negative zero
        for (_, sa) in sign_parts(a) {
            if b.max.value() >= 0.0 {
                candidates.push(Endpoint::Closed(sa * f64::INFINITY));
            }
            if b.min.value() < 0.0 {
                candidates.push(Endpoint::Closed(-sa * f64::INFINITY));
            }
        }
    }
    for (pa, sa) in sign_parts(a) {
        for (pb, sb) in sign_parts(b) {
            let rb = reciprocal(&pb, sb);
            for x in [pa.min, pa.max] {
                for y in [rb.min, rb.max] {
                    candidates.extend(mul_corner(x, y, sa * sb));
                }
            }
        }
    }
    interval_schema(candidates, false)
}

fn floordivide_pair(a: &Interval, b: &Interval) -> FemtoResult<Schema> {
    if !a.whole || !b.whole {
        return Ok(Schema::impossible_because(
            "floor division is only defined for whole numbers",
        ));
    }
    if b.attains(0.0) {
        return Ok(Schema::impossible_because("whole-number division by zero"));
    }
    let mut candidates = Vec::new();
    if a.attains(0.0) {
        candidates.push(Endpoint::Closed(0.0));
    }
    for (pa, sa) in sign_parts(a) {
        for (pb, sb) in sign_parts(b) {
            for x in [pa.min, pa.max] {
                for y in [pb.min, pb.max] {
                    candidates.extend(floordiv_corner(x, y, sa * sb));
                }
            }
        }
    }
    interval_schema(candidates, true)
}

fn floordiv_corner(x: Endpoint, y: Endpoint, sign: f64) -> Vec<Endpoint> {
    let xv = x.value();
    let yv = y.value();
    match (xv.is_infinite(), yv.is_infinite()) {
        // unbounded over unbounded reaches both the truncation floor and
        // any magnitude
        (true, true) => vec![
            Endpoint::Closed(if sign > 0.0 { 0.0 } else { -1.0 }),
            Endpoint::Open(sign * f64::INFINITY),
        ],
        (true, false) => vec![Endpoint::Open(sign * f64::INFINITY)],
        // a bounded dividend over an ever-larger divisor truncates to 0
        // or, from below, to -1
        (false, true) => vec![Endpoint::Closed(if sign > 0.0 { 0.0 } else { -1.0 })],
        (false, false) => vec![Endpoint::Closed((xv / yv).floor())],
    }
}

fn power_pair(a: &Interval, b: &Interval) -> FemtoResult<Schema> {
    if a.min.value() < 0.0 && !b.whole {
        return Ok(indeterminate("negative ** non-integer"));
    }
    if (a.attains(1.0) || a.attains(-1.0)) && b.attains_infinite() {
        return Ok(indeterminate("1 ** inf"));
    }

    // exponent sample points: corners, zero, and corner parities (for a
    // negative base, consecutive exponents flip the sign of the result)
    let mut exp_pts = vec![b.min, b.max];
    if b.attains(0.0) {
        exp_pts.push(Endpoint::Closed(0.0));
    }
    if b.whole {
        if b.min.is_finite() && b.min.value() + 1.0 <= b.max.value() {
            exp_pts.push(Endpoint::Closed(b.min.value() + 1.0));
        }
        if b.max.is_finite() && b.max.value() - 1.0 >= b.min.value() {
            exp_pts.push(Endpoint::Closed(b.max.value() - 1.0));
        }
    }

    // base sample points: part corners, plus the monotonicity breaks at
    // one and zero when the interval crosses them
    let mut base_parts: Vec<(Vec<Endpoint>, f64)> = Vec::new();
    for (part, s) in sign_parts(a) {
        let mut pts = vec![part.min, part.max];
        if s > 0.0 && a.attains(1.0) {
            pts.push(Endpoint::Closed(1.0));
        }
        if s < 0.0 && a.attains(-1.0) {
            pts.push(Endpoint::Closed(-1.0));
        }
        base_parts.push((pts, s));
    }
    if a.attains(0.0) {
        base_parts.push((vec![Endpoint::Closed(0.0)], 0.0));
    }

    let mut candidates = Vec::new();
    for (pts, s) in &base_parts {
        for x in pts {
            for y in &exp_pts {
                // a signed zero keeps track of which side of zero the
                // base approaches from
                let xv = if x.value() == 0.0 && *s < 0.0 {
                    -0.0
                } else {
                    x.value()
                };
                let v = xv.powf(y.value());
                if v.is_nan() {
                    return Ok(indeterminate("power"));
                }
                let open = combined_openness(*x, *y);
                candidates.push(Endpoint::with_openness(v, open));
                if *s < 0.0 && y.value().is_infinite() {
                    // a negative base under an unbounded exponent
                    // alternates sign
                    candidates.push(Endpoint::with_openness(-v, open));
                }
            }
        }
    }

    let whole = a.whole && b.whole && b.min.value() >= 0.0;
    interval_schema(candidates, whole)
}

fn modulo_pair(a: &Interval, b: &Interval) -> FemtoResult<Schema> {
    if a.attains_infinite() {
        return Ok(indeterminate("inf % x"));
    }
    if b.attains(0.0) {
        return Ok(indeterminate("x % 0"));
    }
    let whole = a.whole && b.whole;
    if b.min.value() >= 0.0 {
        // positive divisor: result in [0, almost(divisor.max)], or the
        // dividend itself when it already lies inside [0, divisor)
        let below = a.max.value() < b.min.value()
            || (a.max.value() == b.min.value() && (a.max.is_open() || b.min.is_open()));
        if a.min.value() >= 0.0 && below {
            return Schema::number(a.min, a.max, a.whole);
        }
        let band = Endpoint::Open(b.max.value());
        let max = if a.min.value() >= 0.0 {
            band.minimum(a.max)
        } else {
            band
        };
        Schema::number(Endpoint::Closed(0.0), max, whole)
    } else {
        // negative divisor: the mirror image, with the result sign
        // following the divisor as in Python
        let above = b.max.value() < a.min.value()
            || (b.max.value() == a.min.value() && (b.max.is_open() || a.min.is_open()));
        if a.max.value() <= 0.0 && above {
            return Schema::number(a.min, a.max, a.whole);
        }
        let band = Endpoint::Open(b.min.value());
        let min = if a.max.value() <= 0.0 {
            band.maximum(a.min)
        } else {
            band
        };
        Schema::number(min, Endpoint::Closed(0.0), whole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer(min: f64, max: f64) -> Schema {
        Schema::integer_range(min, max).unwrap()
    }

    fn real(min: f64, max: f64) -> Schema {
        Schema::real_range(min, max).unwrap()
    }

    #[test]
    fn addition_sums_endpoints() {
        assert_eq!(
            add(&integer(1.0, 10.0), &integer(5.0, 6.0)).unwrap(),
            integer(6.0, 16.0)
        );
        assert_eq!(
            add(&real(0.5, 1.5), &integer(1.0, 1.0)).unwrap(),
            real(1.5, 2.5)
        );
    }

    #[test]
    fn adding_opposite_infinities_is_indeterminate() {
        let result = add(&Schema::extended(), &Schema::extended()).unwrap();
        assert!(result.is_impossible());
        assert!(result.reason().unwrap().contains("indeterminate"));
    }

    #[test]
    fn subtraction_flips_the_interval() {
        assert_eq!(
            subtract(&integer(1.0, 10.0), &integer(2.0, 3.0)).unwrap(),
            integer(-2.0, 8.0)
        );
    }

    #[test]
    fn multiplication_tracks_signs() {
        assert_eq!(
            multiply(&integer(-3.0, -1.0), &integer(2.0, 4.0)).unwrap(),
            integer(-12.0, -2.0)
        );
        assert_eq!(
            multiply(&integer(-2.0, 3.0), &integer(-1.0, 5.0)).unwrap(),
            integer(-10.0, 15.0)
        );
    }

    #[test]
    fn multiplying_zero_by_infinity_is_indeterminate() {
        let zero = real(0.0, 1.0);
        assert!(multiply(&zero, &Schema::extended()).unwrap().is_impossible());
        // almost(inf) never attains infinity, so the form never arises
        assert!(!multiply(&zero, &Schema::real()).unwrap().is_impossible());
    }

    #[test]
    fn division_by_the_constant_zero_is_impossible() {
        let result = divide(&integer(1.0, 10.0), &integer(0.0, 0.0)).unwrap();
        assert!(result.is_impossible());
        assert!(result.reason().unwrap().contains("0/0"));
    }

    #[test]
    fn division_by_a_zero_crossing_interval_spans_everything() {
        assert_eq!(
            divide(&integer(1.0, 10.0), &integer(-1.0, 1.0)).unwrap(),
            Schema::extended()
        );
    }

    #[test]
    fn division_is_never_whole() {
        match divide(&integer(1.0, 10.0), &integer(2.0, 2.0)).unwrap() {
            Schema::Number {
                min, max, whole, ..
            } => {
                assert!(!whole);
                assert_eq!(min, Endpoint::Closed(0.5));
                assert_eq!(max, Endpoint::Closed(5.0));
            }
            other => panic!("expected a number, got {}", other.kind()),
        }
    }

    #[test]
    fn floor_division_truncates_toward_negative_infinity() {
        assert_eq!(
            floordivide(&integer(1.0, 10.0), &integer(3.0, 3.0)).unwrap(),
            integer(0.0, 3.0)
        );
        assert_eq!(
            floordivide(&integer(1.0, 10.0), &integer(-3.0, -2.0)).unwrap(),
            integer(-5.0, -1.0)
        );
    }

    #[test]
    fn floor_division_rejects_reals_and_zero_divisors() {
        assert!(floordivide(&real(1.0, 10.0), &integer(2.0, 2.0))
            .unwrap()
            .is_impossible());
        assert!(floordivide(&integer(1.0, 10.0), &integer(-1.0, 1.0))
            .unwrap()
            .is_impossible());
    }

    #[test]
    fn power_of_positive_wholes_is_whole() {
        assert_eq!(
            power(&integer(2.0, 3.0), &integer(2.0, 3.0)).unwrap(),
            integer(4.0, 27.0)
        );
    }

    #[test]
    fn power_with_a_negative_exponent_is_real() {
        match power(&integer(2.0, 2.0), &integer(-1.0, -1.0)).unwrap() {
            Schema::Number { whole, min, .. } => {
                assert!(!whole);
                assert_eq!(min, Endpoint::Closed(0.5));
            }
            other => panic!("expected a number, got {}", other.kind()),
        }
    }

    #[test]
    fn negative_base_with_real_exponent_is_indeterminate() {
        assert!(power(&real(-2.0, -1.0), &real(0.5, 1.5))
            .unwrap()
            .is_impossible());
    }

    #[test]
    fn negative_base_alternates_under_even_and_odd_exponents() {
        assert_eq!(
            power(&integer(-2.0, -2.0), &integer(2.0, 3.0)).unwrap(),
            integer(-8.0, 4.0)
        );
    }

    #[test]
    fn one_to_an_attained_infinity_is_indeterminate() {
        let exp = Schema::number(Endpoint::Closed(0.0), Endpoint::INF, false).unwrap();
        assert!(power(&real(0.5, 1.5), &exp).unwrap().is_impossible());
    }

    #[test]
    fn modulo_stays_inside_the_divisor_band() {
        assert_eq!(
            modulo(&integer(-10.0, 100.0), &integer(3.0, 3.0)).unwrap(),
            integer(0.0, 2.0)
        );
        assert_eq!(
            modulo(&integer(5.0, 5.0), &integer(-3.0, -3.0)).unwrap(),
            integer(-2.0, 0.0)
        );
    }

    #[test]
    fn modulo_keeps_a_small_dividend() {
        assert_eq!(
            modulo(&integer(3.0, 7.0), &integer(10.0, 12.0)).unwrap(),
            integer(3.0, 7.0)
        );
    }

    #[test]
    fn modulo_rejects_infinite_dividends_and_zero_divisors() {
        assert!(modulo(&Schema::extended(), &integer(3.0, 3.0))
            .unwrap()
            .is_impossible());
        assert!(modulo(&integer(1.0, 5.0), &integer(0.0, 0.0))
            .unwrap()
            .is_impossible());
    }

    #[test]
    fn union_operands_distribute_pairwise() {
        let u = crate::setops::union(&[integer(0.0, 1.0), integer(10.0, 11.0)]).unwrap();
        let result = add(&u, &integer(100.0, 100.0)).unwrap();
        let expected = crate::setops::union(&[integer(100.0, 101.0), integer(110.0, 111.0)])
            .unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn arithmetic_on_non_numbers_is_an_argument_error() {
        assert!(add(&Schema::string(), &integer(0.0, 1.0)).is_err());
    }

    #[test]
    fn impossible_operands_absorb() {
        let poison = Schema::impossible_because("upstream failure");
        let result = add(&poison, &integer(0.0, 1.0)).unwrap();
        assert_eq!(result.reason(), Some("upstream failure"));
    }
}
