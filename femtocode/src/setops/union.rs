use super::{ensure_resolved, size_schema};
use crate::almost::Endpoint;
use crate::error::FemtocodeError;
use crate::schema::Schema;
use crate::FemtoResult;

/// Union of one or more schemas.
///
/// Distributes over `Union` operands, glues adjacent numeric intervals,
/// and falls back to a flat, sorted `Union` for shapes that stay
/// distinct. An `Impossible` operand absorbs the whole union; when
/// several operands are `Impossible` the last one's reason wins.
pub fn union(schemas: &[Schema]) -> FemtoResult<Schema> {
    if schemas.is_empty() {
        return Err(FemtocodeError::invalid_argument("union of no schemas"));
    }
    for schema in schemas {
        ensure_resolved(schema)?;
    }
    Ok(union_list(schemas.to_vec()))
}

/// Union over an already-validated, non-empty operand list.
pub(crate) fn union_list(schemas: Vec<Schema>) -> Schema {
    let mut flat = Vec::new();
    for schema in schemas {
        flatten_into(schema, &mut flat);
    }
    if let Some(impossible) = flat.iter().rev().find(|s| s.is_impossible()) {
        return impossible.clone();
    }

    // Merge pairwise until nothing more collapses. Each successful merge
    // may enable further ones (interval gluing is not confluent in a
    // single pass).
    let mut changed = true;
    while changed {
        changed = false;
        'scan: for i in 0..flat.len() {
            for j in (i + 1)..flat.len() {
                if let Some(merged) = merge_pair(&flat[i], &flat[j]) {
                    flat[i] = merged;
                    flat.remove(j);
                    changed = true;
                    break 'scan;
                }
            }
        }
    }

    Schema::union_unchecked(flat)
}

fn flatten_into(schema: Schema, out: &mut Vec<Schema>) {
    match schema {
        Schema::Union { possibilities } => {
            for possibility in possibilities {
                flatten_into(possibility, out);
            }
        }
        other => out.push(other),
    }
}

fn merged_alias(a: &Schema, b: &Schema) -> Option<String> {
    a.alias().or_else(|| b.alias()).map(str::to_string)
}

/// Try to collapse two non-union schemas into one. `None` means they stay
/// separate alternatives.
fn merge_pair(a: &Schema, b: &Schema) -> Option<Schema> {
    if a == b {
        return Some(a.clone());
    }
    match (a, b) {
        (Schema::Null { .. }, Schema::Null { .. }) => Some(Schema::Null {
            alias: merged_alias(a, b),
        }),
        (Schema::Boolean { just: ja, .. }, Schema::Boolean { just: jb, .. }) => {
            let just = match (ja, jb) {
                (Some(x), Some(y)) if x == y => Some(*x),
                _ => None,
            };
            Some(Schema::Boolean {
                alias: merged_alias(a, b),
                just,
            })
        }
        (Schema::Number { .. }, Schema::Number { .. }) => merge_numbers(a, b),
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
                return None;
            }
            let sizes = merge_numbers(&size_schema(*fa, *ma), &size_schema(*fb, *mb))?;
            match sizes {
                Schema::Number { min, max, .. } => Some(Schema::String {
                    alias: merged_alias(a, b),
                    charset: *ca,
                    fewest: min,
                    most: max,
                }),
                _ => None,
            }
        }
        (
            Schema::Collection {
                items: ia,
                fewest: fa,
                most: ma,
                ordered: oa,
                absorbed: aa,
                ..
            },
            Schema::Collection {
                items: ib,
                fewest: fb,
                most: mb,
                ordered: ob,
                absorbed: ab,
                ..
            },
        ) => {
            let a_empty = ma.value() == 0.0;
            let b_empty = mb.value() == 0.0;
            if !(ia == ib || a_empty || b_empty) {
                return None;
            }
            let sizes = merge_numbers(&size_schema(*fa, *ma), &size_schema(*fb, *mb))?;
            let (fewest, most) = match sizes {
                Schema::Number { min, max, .. } => (min, max),
                _ => return None,
            };
            let items = if a_empty { ib.clone() } else { ia.clone() };
            let mut absorbed = aa.clone();
            absorbed.extend(ab.iter().cloned());
            Some(Schema::Collection {
                alias: merged_alias(a, b),
                items,
                fewest,
                most,
                ordered: *oa && *ob,
                absorbed,
            })
        }
        (Schema::Record { fields: fa, .. }, Schema::Record { fields: fb, .. }) => {
            if !fa.keys().eq(fb.keys()) {
                return None;
            }
            if a.contains(b) {
                Some(a.clone())
            } else if b.contains(a) {
                Some(b.clone())
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Glue two number intervals into one when their union is itself an
/// interval: overlapping or touching reals, whole intervals separated by
/// at most a unit gap, or a whole interval absorbed by a real one.
fn merge_numbers(a: &Schema, b: &Schema) -> Option<Schema> {
    let (amin, amax, awhole) = number_parts(a)?;
    let (bmin, bmax, bwhole) = number_parts(b)?;

    if awhole != bwhole {
        // a whole interval inside a real interval collapses into the real
        if !awhole && a.contains(b) {
            return Some(realias(a.clone(), merged_alias(a, b)));
        }
        if !bwhole && b.contains(a) {
            return Some(realias(b.clone(), merged_alias(a, b)));
        }
        return None;
    }

    let (lo_max, hi_min) = if amin.minimum(bmin) == amin {
        (amax, bmin)
    } else {
        (bmax, amin)
    };

    let glues = if awhole {
        // integers glue across a gap of at most one unit
        hi_min.value() - lo_max.value() <= 1.0
    } else {
        hi_min.value() < lo_max.value()
            || (hi_min.value() == lo_max.value() && (hi_min.is_closed() || lo_max.is_closed()))
    };
    if !glues {
        return None;
    }

    Some(Schema::Number {
        alias: merged_alias(a, b),
        min: amin.minimum(bmin),
        max: amax.maximum(bmax),
        whole: awhole,
    })
}

fn number_parts(schema: &Schema) -> Option<(Endpoint, Endpoint, bool)> {
    match schema {
        Schema::Number {
            min, max, whole, ..
        } => Some((*min, *max, *whole)),
        _ => None,
    }
}

fn realias(schema: Schema, alias: Option<String>) -> Schema {
    match schema {
        Schema::Number {
            min, max, whole, ..
        } => Schema::Number {
            alias,
            min,
            max,
            whole,
        },
        other => other,
    }
}
