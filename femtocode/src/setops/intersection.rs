use super::{ensure_resolved, size_schema, tighter_lower, tighter_upper, union_list};
use crate::error::FemtocodeError;
use crate::schema::Schema;
use crate::FemtoResult;
use std::collections::HashSet;

/// Intersection of one or more schemas. An empty overlap is not an error:
/// it is the `Impossible` schema, carrying the first reason encountered.
pub fn intersection(schemas: &[Schema]) -> FemtoResult<Schema> {
    let mut iter = schemas.iter();
    let first = iter
        .next()
        .ok_or_else(|| FemtocodeError::invalid_argument("intersection of no schemas"))?;
    ensure_resolved(first)?;
    let mut result = first.clone();
    for schema in iter {
        ensure_resolved(schema)?;
        result = intersection_pair(&result, schema);
    }
    Ok(result)
}

pub(crate) fn intersection_pair(a: &Schema, b: &Schema) -> Schema {
    let mut expanded = HashSet::new();
    intersect(a, b, &mut expanded)
}

fn no_overlap(a: &Schema, b: &Schema) -> Schema {
    Schema::impossible_because(format!("{} and {} have no overlap", a.kind(), b.kind()))
}

fn intersect(a: &Schema, b: &Schema, expanded: &mut HashSet<String>) -> Schema {
    match (a, b) {
        (Schema::Impossible { .. }, _) => a.clone(),
        (_, Schema::Impossible { .. }) => b.clone(),

        // recursive references: nominal equality first, then a single
        // coinductive expansion per name
        (Schema::Ref(ra), Schema::Ref(rb)) if ra.name() == rb.name() => a.clone(),
        (Schema::Ref(ra), _) => {
            if !expanded.insert(ra.name().to_string()) {
                return a.clone();
            }
            match ra.target() {
                Some(target) => intersect(target, b, expanded),
                None => Schema::impossible_because(format!(
                    "reference \"{}\" was never resolved",
                    ra.name()
                )),
            }
        }
        (_, Schema::Ref(rb)) => {
            if !expanded.insert(rb.name().to_string()) {
                return b.clone();
            }
            match rb.target() {
                Some(target) => intersect(a, target, expanded),
                None => Schema::impossible_because(format!(
                    "reference \"{}\" was never resolved",
                    rb.name()
                )),
            }
        }

        (Schema::Union { possibilities }, _) => {
            distribute(possibilities, std::slice::from_ref(b), expanded)
        }
        (_, Schema::Union { possibilities }) => {
            distribute(std::slice::from_ref(a), possibilities, expanded)
        }

        (Schema::Null { .. }, Schema::Null { .. }) => Schema::null(),
        (Schema::Boolean { just: ja, .. }, Schema::Boolean { just: jb, .. }) => match (ja, jb) {
            (None, None) => Schema::boolean(),
            (Some(x), None) | (None, Some(x)) => Schema::boolean_just(*x),
            (Some(x), Some(y)) if x == y => Schema::boolean_just(*x),
            _ => Schema::impossible_because("true and false have no overlap"),
        },
        (
            Schema::Number {
                min: amin,
                max: amax,
                whole: awhole,
                ..
            },
            Schema::Number {
                min: bmin,
                max: bmax,
                whole: bwhole,
                ..
            },
        ) => {
            let mut min = tighter_lower(*amin, *bmin);
            let mut max = tighter_upper(*amax, *bmax);
            if min.value() > max.value()
                || (min.value() == max.value() && (min.is_open() || max.is_open()))
            {
                return no_overlap(a, b);
            }
            let whole = *awhole || *bwhole;
            if whole {
                (min, max) = super::clamp_whole(min, max);
            }
            Schema::number(min, max, whole).unwrap_or_else(|_| no_overlap(a, b))
        }
        (
            Schema::String {
                charset: ca,
                fewest: fa,
                most: ma,
                ..
            },
            Schema::String {
                charset: cb,
                fewest: fb,
                most: mb,
                ..
            },
        ) => {
            if ca != cb {
                return Schema::impossible_because(format!(
                    "{} string and {} string have no overlap",
                    ca.name(),
                    cb.name()
                ));
            }
            match intersect(&size_schema(*fa, *ma), &size_schema(*fb, *mb), expanded) {
                Schema::Number { min, max, .. } => Schema::String {
                    alias: None,
                    charset: *ca,
                    fewest: min,
                    most: max,
                },
                _ => Schema::impossible_because("string lengths have no overlap"),
            }
        }
        (
            Schema::Collection {
                items: ia,
                fewest: fa,
                most: ma,
                ordered: oa,
                ..
            },
            Schema::Collection {
                items: ib,
                fewest: fb,
                most: mb,
                ordered: ob,
                ..
            },
        ) => {
            let (fewest, most) =
                match intersect(&size_schema(*fa, *ma), &size_schema(*fb, *mb), expanded) {
                    Schema::Number { min, max, .. } => (min, max),
                    _ => {
                        return Schema::impossible_because("collection sizes have no overlap");
                    }
                };
            if most.value() == 0.0 {
                return Schema::empty();
            }
            let items = if ma.value() == 0.0 {
                (**ib).clone()
            } else if mb.value() == 0.0 {
                (**ia).clone()
            } else {
                let merged = intersect(ia, ib, expanded);
                if merged.is_impossible() {
                    return merged;
                }
                merged
            };
            Schema::collection(items, fewest, most, *oa || *ob)
                .unwrap_or_else(|_| no_overlap(a, b))
        }
        (Schema::Record { fields: fa, .. }, Schema::Record { fields: fb, .. }) => {
            if !fa.keys().eq(fb.keys()) {
                return Schema::impossible_because(
                    "records with different fields have no overlap",
                );
            }
            let mut fields = std::collections::BTreeMap::new();
            for (name, left) in fa {
                let merged = intersect(left, &fb[name], expanded);
                if merged.is_impossible() {
                    return merged;
                }
                fields.insert(name.clone(), merged);
            }
            Schema::Record {
                alias: None,
                fields,
            }
        }
        _ => no_overlap(a, b),
    }
}

/// Element-wise intersection of two alternative lists: keep survivors,
/// collapse to the sole remainder, or re-union. If nothing survives, the
/// first impossibility's reason is reported.
fn distribute(left: &[Schema], right: &[Schema], expanded: &mut HashSet<String>) -> Schema {
    let mut survivors = Vec::new();
    let mut first_impossible = None;
    for l in left {
        for r in right {
            let merged = intersect(l, r, expanded);
            if merged.is_impossible() {
                if first_impossible.is_none() {
                    first_impossible = Some(merged);
                }
            } else {
                survivors.push(merged);
            }
        }
    }
    if survivors.is_empty() {
        first_impossible
            .unwrap_or_else(|| Schema::impossible_because("union had no possibilities"))
    } else {
        union_list(survivors)
    }
}
