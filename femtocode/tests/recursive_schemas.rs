use femtocode::{difference, intersection, resolve, union, FemtoResult, Schema};

fn tree() -> FemtoResult<Schema> {
    let declaration = Schema::record_of([
        ("value", Schema::real()),
        ("children", Schema::collection_of(Schema::Alias("tree".into()))),
    ])?
    .with_alias("tree")?;
    Ok(resolve(&[declaration])?.pop().unwrap_or_else(Schema::impossible))
}

fn children_of(t: &Schema) -> Schema {
    match t {
        Schema::Record { fields, .. } => match &fields["children"] {
            Schema::Collection { items, .. } => (**items).clone(),
            other => panic!("expected a collection, got {}", other.kind()),
        },
        other => panic!("expected a record, got {}", other.kind()),
    }
}

#[test]
fn a_resolved_schema_intersects_with_itself() -> FemtoResult<()> {
    let t = tree()?;
    assert_eq!(intersection(&[t.clone(), t.clone()])?, t);
    Ok(())
}

#[test]
fn union_with_null_makes_a_nullable_tree() -> FemtoResult<()> {
    let t = tree()?;
    let nullable = union(&[Schema::null(), t.clone()])?;
    match &nullable {
        Schema::Union { possibilities } => {
            assert_eq!(possibilities.len(), 2);
            assert!(possibilities.contains(&t));
        }
        other => panic!("expected a union, got {}", other.kind()),
    }
    Ok(())
}

#[test]
fn removing_a_recursive_type_from_itself_is_impossible() -> FemtoResult<()> {
    let t = tree()?;
    let node = children_of(&t);
    // `node` is a reference to "tree"; subtracting it from itself leaves
    // nothing
    assert!(difference(&node, &node)?.is_impossible());
    Ok(())
}

#[test]
fn narrowing_a_recursive_field_keeps_the_reference() -> FemtoResult<()> {
    let t = tree()?;
    let wide = Schema::record_of([
        ("value", Schema::extended()),
        ("children", Schema::collection_of(children_of(&t))),
    ])?;
    let overlap = intersection(&[t.clone(), wide])?;
    match &overlap {
        Schema::Record { fields, .. } => {
            assert_eq!(fields["value"], Schema::real());
            match &fields["children"] {
                Schema::Collection { items, .. } => {
                    assert!(matches!(items.as_ref(), Schema::Ref(r) if r.name() == "tree"));
                }
                other => panic!("expected a collection, got {}", other.kind()),
            }
        }
        other => panic!("expected a record, got {}", other.kind()),
    }
    Ok(())
}

#[test]
fn definitions_are_visible_across_declaration_roots() -> FemtoResult<()> {
    let definition = Schema::integer_range(0.0, 255.0)?.with_alias("byte")?;
    let user = Schema::collection_of(Schema::Alias("byte".into()));
    let resolved = resolve(&[definition, user])?;
    match &resolved[1] {
        Schema::Collection { items, .. } => {
            assert!(matches!(items.as_ref(), Schema::Ref(r) if r.name() == "byte"));
        }
        other => panic!("expected a collection, got {}", other.kind()),
    }
    Ok(())
}

#[test]
fn nominal_identity_makes_cyclic_equality_total() -> FemtoResult<()> {
    // two separately-resolved copies of the same declaration compare
    // equal without unrolling the cycle
    assert_eq!(tree()?, tree()?);
    Ok(())
}
