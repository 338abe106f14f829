use femtocode::{difference, intersection, union, Endpoint, FemtoResult, Schema};

#[test]
fn union_glues_touching_real_intervals() -> FemtoResult<()> {
    let glued = union(&[
        Schema::real_range(0.0, 5.0)?,
        Schema::real_range(5.0, 10.0)?,
    ])?;
    assert_eq!(glued, Schema::real_range(0.0, 10.0)?);
    Ok(())
}

#[test]
fn union_glues_whole_intervals_across_a_unit_gap() -> FemtoResult<()> {
    let glued = union(&[
        Schema::integer_range(0.0, 5.0)?,
        Schema::integer_range(6.0, 10.0)?,
    ])?;
    assert_eq!(glued, Schema::integer_range(0.0, 10.0)?);
    Ok(())
}

#[test]
fn union_keeps_separated_real_intervals_apart() -> FemtoResult<()> {
    let kept = union(&[
        Schema::real_range(0.0, 1.0)?,
        Schema::real_range(2.0, 3.0)?,
    ])?;
    match kept {
        Schema::Union { possibilities } => assert_eq!(possibilities.len(), 2),
        other => panic!("expected a union, got {}", other.kind()),
    }
    Ok(())
}

#[test]
fn union_merges_transitively_through_a_bridge() -> FemtoResult<()> {
    // neither outer interval touches the other, but the middle one
    // touches both
    let glued = union(&[
        Schema::real_range(0.0, 1.0)?,
        Schema::real_range(4.0, 5.0)?,
        Schema::real_range(1.0, 4.0)?,
    ])?;
    assert_eq!(glued, Schema::real_range(0.0, 5.0)?);
    Ok(())
}

#[test]
fn union_of_both_boolean_singletons_is_the_full_boolean() -> FemtoResult<()> {
    let merged = union(&[Schema::boolean_just(true), Schema::boolean_just(false)])?;
    assert_eq!(merged, Schema::boolean());
    Ok(())
}

#[test]
fn union_absorbs_an_impossible_operand() -> FemtoResult<()> {
    let poisoned = union(&[
        Schema::integer(),
        Schema::impossible_because("something upstream went wrong"),
    ])?;
    assert!(poisoned.is_impossible());
    assert_eq!(poisoned.reason(), Some("something upstream went wrong"));
    Ok(())
}

#[test]
fn union_of_a_whole_interval_inside_a_real_one_collapses() -> FemtoResult<()> {
    let merged = union(&[
        Schema::integer_range(2.0, 4.0)?,
        Schema::real_range(0.0, 10.0)?,
    ])?;
    assert_eq!(merged, Schema::real_range(0.0, 10.0)?);
    Ok(())
}

#[test]
fn intersection_keeps_the_tighter_bounds() -> FemtoResult<()> {
    let overlap = intersection(&[
        Schema::real_range(0.0, 10.0)?,
        Schema::real_range(5.0, 20.0)?,
    ])?;
    assert_eq!(overlap, Schema::real_range(5.0, 10.0)?);
    Ok(())
}

#[test]
fn intersection_with_wholes_rounds_fractional_bounds_inward() -> FemtoResult<()> {
    let overlap = intersection(&[Schema::integer(), Schema::real_range(0.5, 3.5)?])?;
    assert_eq!(overlap, Schema::integer_range(1.0, 3.0)?);
    Ok(())
}

#[test]
fn intersection_of_disjoint_intervals_is_impossible_with_a_reason() -> FemtoResult<()> {
    let overlap = intersection(&[
        Schema::real_range(0.0, 1.0)?,
        Schema::real_range(2.0, 3.0)?,
    ])?;
    assert!(overlap.is_impossible());
    assert!(overlap.reason().is_some());
    Ok(())
}

#[test]
fn intersection_distributes_over_unions() -> FemtoResult<()> {
    let either = union(&[Schema::null(), Schema::real_range(0.0, 10.0)?])?;
    let overlap = intersection(&[either, Schema::real_range(5.0, 20.0)?])?;
    assert_eq!(overlap, Schema::real_range(5.0, 10.0)?);
    Ok(())
}

#[test]
fn intersection_of_open_and_closed_bounds_prefers_open() -> FemtoResult<()> {
    let overlap = intersection(&[
        Schema::number(Endpoint::Open(0.0), Endpoint::Closed(5.0), false)?,
        Schema::number(Endpoint::Closed(0.0), Endpoint::Open(5.0), false)?,
    ])?;
    assert_eq!(
        overlap,
        Schema::number(Endpoint::Open(0.0), Endpoint::Open(5.0), false)?
    );
    Ok(())
}

#[test]
fn difference_carves_an_open_hole_from_the_middle() -> FemtoResult<()> {
    let carved = difference(&Schema::real_range(0.0, 10.0)?, &Schema::real_range(3.0, 5.0)?)?;
    let expected = union(&[
        Schema::number(Endpoint::Closed(0.0), Endpoint::Open(3.0), false)?,
        Schema::number(Endpoint::Open(5.0), Endpoint::Closed(10.0), false)?,
    ])?;
    assert_eq!(carved, expected);
    Ok(())
}

#[test]
fn difference_of_whole_intervals_lands_on_integers() -> FemtoResult<()> {
    let carved = difference(
        &Schema::integer_range(0.0, 10.0)?,
        &Schema::integer_range(3.0, 5.0)?,
    )?;
    let expected = union(&[
        Schema::integer_range(0.0, 2.0)?,
        Schema::integer_range(6.0, 10.0)?,
    ])?;
    assert_eq!(carved, expected);
    Ok(())
}

#[test]
fn difference_leaves_an_untouchable_shape_alone() -> FemtoResult<()> {
    assert_eq!(difference(&Schema::string(), &Schema::real())?, Schema::string());
    assert_eq!(difference(&Schema::null(), &Schema::boolean())?, Schema::null());
    Ok(())
}

#[test]
fn difference_that_removes_everything_is_impossible() -> FemtoResult<()> {
    let nothing = difference(&Schema::real_range(0.0, 5.0)?, &Schema::real_range(0.0, 10.0)?)?;
    assert!(nothing.is_impossible());
    Ok(())
}

#[test]
fn difference_removes_each_union_alternative_in_turn() -> FemtoResult<()> {
    let excluded = union(&[
        Schema::real_range(0.0, 2.0)?,
        Schema::real_range(8.0, 10.0)?,
    ])?;
    let carved = difference(&Schema::real_range(0.0, 10.0)?, &excluded)?;
    assert_eq!(
        carved,
        Schema::number(Endpoint::Open(2.0), Endpoint::Open(8.0), false)?
    );
    Ok(())
}

#[test]
fn difference_does_not_puncture_a_real_interval_with_wholes() -> FemtoResult<()> {
    // removing countably many points from a continuum leaves the
    // continuum, as far as the algebra can tell
    let untouched = difference(
        &Schema::real_range(0.0, 10.0)?,
        &Schema::integer_range(3.0, 5.0)?,
    )?;
    assert_eq!(untouched, Schema::real_range(0.0, 10.0)?);
    Ok(())
}

#[test]
fn difference_from_a_boolean_flips_the_singleton() -> FemtoResult<()> {
    assert_eq!(
        difference(&Schema::boolean(), &Schema::boolean_just(true))?,
        Schema::boolean_just(false)
    );
    assert!(difference(&Schema::boolean(), &Schema::boolean())?.is_impossible());
    Ok(())
}

#[test]
fn containment_follows_the_value_sets() -> FemtoResult<()> {
    assert!(Schema::extended().contains(&Schema::real()));
    assert!(Schema::real().contains(&Schema::integer()));
    assert!(!Schema::integer().contains(&Schema::real()));

    let wide = Schema::real_range(0.0, 10.0)?;
    let narrow = Schema::real_range(2.0, 3.0)?;
    assert!(wide.contains(&narrow));
    assert!(!narrow.contains(&wide));

    let either = union(&[Schema::null(), wide.clone()])?;
    assert!(either.contains(&Schema::null()));
    assert!(either.contains(&narrow));
    assert!(!either.contains(&Schema::string()));
    Ok(())
}

#[test]
fn set_operations_reject_unresolved_aliases() {
    let dangling = Schema::collection_of(Schema::Alias("elsewhere".into()));
    assert!(union(&[dangling.clone()]).is_err());
    assert!(intersection(&[dangling.clone(), Schema::empty()]).is_err());
    assert!(difference(&dangling, &Schema::empty()).is_err());
}
