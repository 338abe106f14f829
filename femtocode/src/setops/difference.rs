use super::{
    clamp_whole, ensure_resolved, intersection_pair, number_intervals, size_schema, tighter_lower,
    tighter_upper, union_list,
};
use crate::schema::Schema;
use crate::FemtoResult;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// Everything in `universal` that is not in `excluded`.
///
/// Shapes the exclusion cannot touch pass through unchanged; an exclusion
/// that covers everything yields `Impossible`.
pub fn difference(universal: &Schema, excluded: &Schema) -> FemtoResult<Schema> {
    ensure_resolved(universal)?;
    ensure_resolved(excluded)?;
    Ok(difference_pair(universal, excluded))
}

pub(crate) fn difference_pair(universal: &Schema, excluded: &Schema) -> Schema {
    let mut expanded = HashSet::new();
    diff(universal, excluded, &mut expanded)
}

fn diff(universal: &Schema, excluded: &Schema, expanded: &mut HashSet<String>) -> Schema {
    match (universal, excluded) {
        (Schema::Impossible { .. }, _) => universal.clone(),
        (_, Schema::Impossible { .. }) => universal.clone(),

        (Schema::Ref(ru), Schema::Ref(re)) if ru.name() == re.name() => {
            Schema::impossible_because(format!(
                "removing \"{}\" from itself leaves no possible values",
                ru.name()
            ))
        }
        (Schema::Ref(ru), _) => {
            if !expanded.insert(ru.name().to_string()) {
                return universal.clone();
            }
            match ru.target() {
                Some(target) => diff(target, excluded, expanded),
                None => universal.clone(),
            }
        }
        (_, Schema::Ref(re)) => {
            if !expanded.insert(re.name().to_string()) {
                return universal.clone();
            }
            match re.target() {
                Some(target) => diff(universal, target, expanded),
                None => universal.clone(),
            }
        }

        // difference from a union is element-wise
        (Schema::Union { possibilities }, _) => {
            let mut survivors = Vec::new();
            let mut first_impossible = None;
            for possibility in possibilities {
                let piece = diff(possibility, excluded, expanded);
                if piece.is_impossible() {
                    if first_impossible.is_none() {
                        first_impossible = Some(piece);
                    }
                } else {
                    survivors.push(piece);
                }
            }
            if survivors.is_empty() {
                first_impossible.unwrap_or_else(|| {
                    Schema::impossible_because("union had no possibilities")
                })
            } else {
                union_list(survivors)
            }
        }
        // removing a union removes each alternative in turn
        (_, Schema::Union { possibilities }) => {
            let mut result = universal.clone();
            for possibility in possibilities {
                result = diff(&result, possibility, expanded);
                if result.is_impossible() {
                    return result;
                }
            }
            result
        }

        (Schema::Null { .. }, Schema::Null { .. }) => {
            Schema::impossible_because("removing null from null leaves no possible values")
        }
        (Schema::Boolean { just: ju, .. }, Schema::Boolean { just: je, .. }) => match (ju, je) {
            (_, None) => {
                Schema::impossible_because("removing all booleans leaves no possible values")
            }
            (None, Some(x)) => Schema::boolean_just(!x),
            (Some(y), Some(x)) if y == x => Schema::impossible_because(format!(
                "removing {} from {} leaves no possible values",
                x, y
            )),
            (Some(_), Some(_)) => universal.clone(),
        },
        (Schema::Number { .. }, Schema::Number { .. }) => {
            diff_numbers(universal, excluded)
        }
        (
            Schema::String {
                charset: cu,
                fewest: fu,
                most: mu,
                ..
            },
            Schema::String {
                charset: ce,
                fewest: fe,
                most: me,
                ..
            },
        ) => {
            if cu != ce {
                return universal.clone();
            }
            let sizes = diff_numbers(&size_schema(*fu, *mu), &size_schema(*fe, *me));
            let mut pieces = Vec::new();
            for (fewest, most) in number_intervals(&sizes) {
                pieces.push(Schema::String {
                    alias: None,
                    charset: *cu,
                    fewest,
                    most,
                });
            }
            if pieces.is_empty() {
                Schema::impossible_because("removing all string lengths leaves no possible values")
            } else {
                union_list(pieces)
            }
        }
        (
            Schema::Collection {
                items: iu,
                fewest: fu,
                most: mu,
                ordered: ou,
                ..
            },
            Schema::Collection {
                items: ie,
                fewest: fe,
                most: me,
                ordered: oe,
                ..
            },
        ) => {
            if ou != oe {
                return universal.clone();
            }
            let mut pieces = Vec::new();

            // collections whose items escape the exclusion, any size
            let items_outside = diff(iu, ie, expanded);
            if !items_outside.is_impossible() {
                if let Ok(piece) = Schema::collection(items_outside, *fu, *mu, *ou) {
                    pieces.push(piece);
                }
            }

            // collections whose items overlap the exclusion but whose size
            // escapes it
            let items_inside = intersection_pair(iu, ie);
            if !items_inside.is_impossible() {
                let sizes = diff_numbers(&size_schema(*fu, *mu), &size_schema(*fe, *me));
                for (fewest, most) in number_intervals(&sizes) {
                    if let Ok(piece) =
                        Schema::collection(items_inside.clone(), fewest, most, *ou)
                    {
                        pieces.push(piece);
                    }
                }
            }

            if pieces.is_empty() {
                Schema::impossible_because("removing all collections leaves no possible values")
            } else {
                union_list(pieces)
            }
        }
        (Schema::Record { fields: fu, .. }, Schema::Record { fields: fe, .. }) => {
            // an exclusion with a field the universal lacks excludes nothing
            if fe.keys().any(|name| !fu.contains_key(name)) {
                return universal.clone();
            }
            let mut pieces = Vec::new();
            'fields: for carved in fe.keys() {
                let mut fields = BTreeMap::new();
                for (name, left) in fu {
                    let combined = match fe.get(name) {
                        Some(right) if name == carved => diff(left, right, expanded),
                        Some(right) => intersection_pair(left, right),
                        None => left.clone(),
                    };
                    if combined.is_impossible() {
                        continue 'fields;
                    }
                    fields.insert(name.clone(), combined);
                }
                pieces.push(Schema::Record {
                    alias: None,
                    fields,
                });
            }
            if pieces.is_empty() {
                Schema::impossible_because("removing all field combinations leaves no possible values")
            } else {
                union_list(pieces)
            }
        }
        // different variants: the exclusion cannot touch the universal
        _ => universal.clone(),
    }
}

/// Interval subtraction, producing `Impossible`, one interval, or a
/// two-interval union.
///
/// Removing a non-singleton whole interval from a continuous real one
/// returns the real interval unchanged: the true result would be a real
/// line with countably many punctures, which the algebra cannot (and does
/// not want to) represent.
fn diff_numbers(universal: &Schema, excluded: &Schema) -> Schema {
    let (umin, umax, uwhole) = match universal {
        Schema::Number {
            min, max, whole, ..
        } => (*min, *max, *whole),
        _ => return universal.clone(),
    };
    let (emin, emax, ewhole) = match excluded {
        Schema::Number {
            min, max, whole, ..
        } => (*min, *max, *whole),
        _ => return universal.clone(),
    };

    if !uwhole && ewhole && emin != emax {
        return universal.clone();
    }

    let mut pieces = Vec::new();

    // part of the universal below the exclusion
    {
        let mut min = umin;
        let mut max = tighter_upper(umax, emin.complement());
        if uwhole {
            (min, max) = clamp_whole(min, max);
        }
        if let Ok(piece) = Schema::number(min, max, uwhole) {
            pieces.push(piece);
        }
    }
    // part of the universal above the exclusion
    {
        let mut min = tighter_lower(umin, emax.complement());
        let mut max = umax;
        if uwhole {
            (min, max) = clamp_whole(min, max);
        }
        if let Ok(piece) = Schema::number(min, max, uwhole) {
            pieces.push(piece);
        }
    }

    if pieces.is_empty() {
        Schema::impossible_because(format!(
            "removing {} <= x <= {} from {} <= x <= {} leaves no possible values",
            emin, emax, umin, umax
        ))
    } else {
        union_list(pieces)
    }
}
