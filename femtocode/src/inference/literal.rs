use super::Predicate;
use crate::almost::Endpoint;
use crate::error::FemtocodeError;
use crate::schema::{Charset, Schema};
use crate::setops::{
    difference_pair, intersection_pair, number_intervals, size_schema, union_list,
};
use crate::value::LiteralValue;
use crate::FemtoResult;

/// Refine `schema` under the assumption `schema <op> value` holds.
///
/// A predicate that can never hold refines to `Impossible`; a predicate
/// the schema already guarantees refines to the schema itself. Applying a
/// predicate to a shape it makes no sense for (ordering a string against
/// a number, taking the size of a boolean) also refines to `Impossible`,
/// so that unfit alternatives drop out of unions. Only a malformed
/// request — a literal of the wrong type for the opcode — is an error.
pub fn literal(schema: &Schema, predicate: Predicate, value: &LiteralValue) -> FemtoResult<Schema> {
    match schema {
        Schema::Impossible { .. } => Ok(schema.clone()),
        Schema::Alias(name) => Err(FemtocodeError::unresolved(name)),
        Schema::Ref(r) => match r.target() {
            Some(target) => literal(target, predicate, value),
            None => Err(FemtocodeError::unresolved(r.name())),
        },
        Schema::Union { possibilities } => {
            let mut survivors = Vec::new();
            let mut first_impossible = None;
            for possibility in possibilities {
                let refined = literal(possibility, predicate, value)?;
                if refined.is_impossible() {
                    if first_impossible.is_none() {
                        first_impossible = Some(refined);
                    }
                } else {
                    survivors.push(refined);
                }
            }
            if survivors.is_empty() {
                Ok(first_impossible
                    .unwrap_or_else(|| Schema::impossible_because("union had no possibilities")))
            } else {
                Ok(union_list(survivors))
            }
        }
        _ => match predicate {
            Predicate::Eq => equality(schema, value),
            Predicate::Ne => inequality_literal(schema, value),
            Predicate::Lt | Predicate::Le | Predicate::Gt | Predicate::Ge => {
                ordering(schema, predicate, value)
            }
            _ if predicate.is_size() => size(schema, predicate, value),
            Predicate::Ordered | Predicate::NotOrdered => orderedness(schema, predicate),
            _ => unreachable!(),
        },
    }
}

fn never(schema: &Schema, value: &LiteralValue) -> Schema {
    Schema::impossible_because(format!("{} can never equal {}", schema.kind(), value))
}

fn equality(schema: &Schema, value: &LiteralValue) -> FemtoResult<Schema> {
    match (schema, value) {
        (Schema::Null { .. }, LiteralValue::Null) => Ok(Schema::null()),
        (Schema::Boolean { .. }, LiteralValue::Boolean(b)) => {
            if schema.contains_value(value) {
                Ok(Schema::boolean_just(*b))
            } else {
                Ok(never(schema, value))
            }
        }
        (Schema::Number { .. }, LiteralValue::Number(n)) => {
            if n.is_nan() {
                return Err(FemtocodeError::invalid_argument("literal may not be nan"));
            }
            let singleton = Schema::number(Endpoint::Closed(*n), Endpoint::Closed(*n), false)?;
            Ok(intersection_pair(schema, &singleton))
        }
        (Schema::String { charset, .. }, LiteralValue::String(s)) => {
            let len = match charset {
                Charset::Bytes => s.len(),
                Charset::Unicode => s.chars().count(),
            } as f64;
            let sized = Schema::String {
                alias: None,
                charset: *charset,
                fewest: Endpoint::Closed(len),
                most: Endpoint::Closed(len),
            };
            Ok(intersection_pair(schema, &sized))
        }
        (Schema::Collection { items, .. }, LiteralValue::Collection(values)) => {
            let n = values.len() as f64;
            let pattern = if values.is_empty() {
                Schema::empty()
            } else {
                let mut refined = Vec::with_capacity(values.len());
                for v in values {
                    refined.push(literal(items, Predicate::Eq, v)?);
                }
                let item_pattern = union_list(refined);
                if item_pattern.is_impossible() {
                    return Ok(item_pattern);
                }
                Schema::collection(item_pattern, Endpoint::Closed(n), Endpoint::Closed(n), true)?
            };
            Ok(intersection_pair(schema, &pattern))
        }
        (Schema::Record { fields, .. }, LiteralValue::Record(values)) => {
            if !fields.keys().eq(values.keys()) {
                return Ok(Schema::impossible_because(
                    "record fields do not match the literal's fields",
                ));
            }
            let mut refined = std::collections::BTreeMap::new();
            for (name, field) in fields {
                let narrowed = literal(field, Predicate::Eq, &values[name])?;
                if narrowed.is_impossible() {
                    return Ok(narrowed);
                }
                refined.insert(name.clone(), narrowed);
            }
            Ok(Schema::Record {
                alias: None,
                fields: refined,
            })
        }
        _ => Ok(never(schema, value)),
    }
}

/// `!=` removes at most a single point; anything coarser than a point
/// (string contents, collection elements) cannot be excluded from the
/// schema's vocabulary, so the schema passes through unchanged.
fn inequality_literal(schema: &Schema, value: &LiteralValue) -> FemtoResult<Schema> {
    if !schema.contains_value(value) {
        return Ok(schema.clone());
    }
    match (schema, value) {
        (Schema::Null { .. }, LiteralValue::Null) => Ok(Schema::impossible_because(
            "null is always equal to the literal null",
        )),
        (Schema::Boolean { .. }, LiteralValue::Boolean(b)) => {
            Ok(difference_pair(schema, &Schema::boolean_just(*b)))
        }
        (Schema::Number { .. }, LiteralValue::Number(n)) => {
            let singleton = Schema::number(Endpoint::Closed(*n), Endpoint::Closed(*n), false)?;
            Ok(difference_pair(schema, &singleton))
        }
        _ => Ok(schema.clone()),
    }
}

fn ordering(schema: &Schema, predicate: Predicate, value: &LiteralValue) -> FemtoResult<Schema> {
    let n = match value.as_number() {
        Some(n) if !n.is_nan() => n,
        _ => {
            return Err(FemtocodeError::invalid_argument(format!(
                "ordering comparison requires a numeric literal, not {}",
                value
            )))
        }
    };
    if !matches!(schema, Schema::Number { .. }) {
        return Ok(Schema::impossible_because(format!(
            "{} is never ordered against a number",
            schema.kind()
        )));
    }
    let bound = match predicate {
        Predicate::Lt => Schema::number(Endpoint::NEG_INF, Endpoint::Open(n), false),
        Predicate::Le => Schema::number(Endpoint::NEG_INF, Endpoint::Closed(n), false),
        Predicate::Gt => Schema::number(Endpoint::Open(n), Endpoint::INF, false),
        Predicate::Ge => Schema::number(Endpoint::Closed(n), Endpoint::INF, false),
        _ => unreachable!(),
    }?;
    Ok(intersection_pair(schema, &bound))
}

fn size(schema: &Schema, predicate: Predicate, value: &LiteralValue) -> FemtoResult<Schema> {
    if !matches!(value, LiteralValue::Number(_)) {
        return Err(FemtocodeError::invalid_argument(format!(
            "size comparison requires a numeric literal, not {}",
            value
        )));
    }
    match schema {
        Schema::String {
            charset,
            fewest,
            most,
            ..
        } => {
            let sizes = literal(
                &size_schema(*fewest, *most),
                predicate.without_size(),
                value,
            )?;
            if sizes.is_impossible() {
                return Ok(sizes);
            }
            let pieces = number_intervals(&sizes)
                .into_iter()
                .map(|(fewest, most)| Schema::String {
                    alias: None,
                    charset: *charset,
                    fewest,
                    most,
                })
                .collect::<Vec<_>>();
            Ok(union_list(pieces))
        }
        Schema::Collection {
            items,
            fewest,
            most,
            ordered,
            ..
        } => {
            let sizes = literal(
                &size_schema(*fewest, *most),
                predicate.without_size(),
                value,
            )?;
            if sizes.is_impossible() {
                return Ok(sizes);
            }
            let mut pieces = Vec::new();
            for (fewest, most) in number_intervals(&sizes) {
                pieces.push(Schema::collection((**items).clone(), fewest, most, *ordered)?);
            }
            Ok(union_list(pieces))
        }
        _ => Ok(Schema::impossible_because(format!(
            "{} has no size",
            schema.kind()
        ))),
    }
}

fn orderedness(schema: &Schema, predicate: Predicate) -> FemtoResult<Schema> {
    match schema {
        Schema::Collection { ordered, .. } => {
            if *ordered == (predicate == Predicate::Ordered) {
                Ok(schema.clone())
            } else if *ordered {
                Ok(Schema::impossible_because("the collection is ordered"))
            } else {
                Ok(Schema::impossible_because("the collection is unordered"))
            }
        }
        _ => Ok(Schema::impossible_because(format!(
            "{} has no element order",
            schema.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greater_than_opens_the_lower_bound() {
        let refined = literal(
            &Schema::real_range(0.0, 10.0).unwrap(),
            Predicate::Gt,
            &LiteralValue::Number(3.0),
        )
        .unwrap();
        assert_eq!(
            refined,
            Schema::number(Endpoint::Open(3.0), Endpoint::Closed(10.0), false).unwrap()
        );
    }

    #[test]
    fn disjoint_ordering_is_impossible() {
        let refined = literal(
            &Schema::real_range(-10.0, -5.0).unwrap(),
            Predicate::Gt,
            &LiteralValue::Number(3.0),
        )
        .unwrap();
        assert!(refined.is_impossible());
    }

    #[test]
    fn equality_narrows_to_a_point() {
        let refined = literal(
            &Schema::integer_range(0.0, 10.0).unwrap(),
            Predicate::Eq,
            &LiteralValue::Number(4.0),
        )
        .unwrap();
        assert_eq!(refined, Schema::integer_range(4.0, 4.0).unwrap());
    }

    #[test]
    fn equality_against_a_fraction_kills_a_whole_interval() {
        let refined = literal(
            &Schema::integer_range(0.0, 10.0).unwrap(),
            Predicate::Eq,
            &LiteralValue::Number(4.5),
        )
        .unwrap();
        assert!(refined.is_impossible());
    }

    #[test]
    fn inequality_splits_an_interval() {
        let refined = literal(
            &Schema::real_range(0.0, 10.0).unwrap(),
            Predicate::Ne,
            &LiteralValue::Number(5.0),
        )
        .unwrap();
        let expected = union_list(vec![
            Schema::number(Endpoint::Closed(0.0), Endpoint::Open(5.0), false).unwrap(),
            Schema::number(Endpoint::Open(5.0), Endpoint::Closed(10.0), false).unwrap(),
        ]);
        assert_eq!(refined, expected);
    }

    #[test]
    fn union_refinement_drops_dead_alternatives() {
        let u = union_list(vec![
            Schema::real_range(0.0, 1.0).unwrap(),
            Schema::real_range(5.0, 9.0).unwrap(),
        ]);
        let refined = literal(&u, Predicate::Gt, &LiteralValue::Number(2.0)).unwrap();
        assert_eq!(refined, Schema::real_range(5.0, 9.0).unwrap());
    }

    #[test]
    fn size_refinement_narrows_collection_lengths() {
        let c = Schema::collection(
            Schema::real(),
            Endpoint::Closed(0.0),
            Endpoint::Closed(10.0),
            false,
        )
        .unwrap();
        let refined = literal(&c, Predicate::SizeLe, &LiteralValue::Number(3.0)).unwrap();
        assert_eq!(
            refined,
            Schema::collection(
                Schema::real(),
                Endpoint::Closed(0.0),
                Endpoint::Closed(3.0),
                false
            )
            .unwrap()
        );
    }

    #[test]
    fn orderedness_must_match_the_flag() {
        let c = Schema::collection(
            Schema::real(),
            Endpoint::Closed(1.0),
            Endpoint::Closed(5.0),
            true,
        )
        .unwrap();
        assert_eq!(
            literal(&c, Predicate::Ordered, &LiteralValue::Null).unwrap(),
            c
        );
        assert!(literal(&c, Predicate::NotOrdered, &LiteralValue::Null)
            .unwrap()
            .is_impossible());
    }

    #[test]
    fn equality_on_the_wrong_kind_is_impossible() {
        let refined = literal(
            &Schema::string(),
            Predicate::Eq,
            &LiteralValue::Number(3.0),
        )
        .unwrap();
        assert!(refined.is_impossible());
    }
}
