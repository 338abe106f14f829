//! Type inference for expressions: refining schemas under predicates and
//! propagating intervals through arithmetic.
//!
//! Everything here narrows or combines existing schemas; nothing executes.
//! A predicate that can never hold yields the `Impossible` schema rather
//! than an error, so alternatives inside a `Union` die quietly while the
//! survivors carry on.

mod arithmetic;
mod inequality;
mod literal;

pub use arithmetic::{add, divide, floordivide, modulo, multiply, power, subtract};
pub use inequality::inequality;
pub use literal::literal;

use crate::almost::Endpoint;
use crate::error::FemtocodeError;
use crate::schema::Schema;
use crate::FemtoResult;
use std::collections::HashSet;
use std::str::FromStr;

/// A comparison opcode, as it appears in Femtocode source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    SizeEq,
    SizeNe,
    SizeLt,
    SizeLe,
    SizeGt,
    SizeGe,
    Ordered,
    NotOrdered,
}

impl Predicate {
    pub fn opcode(self) -> &'static str {
        match self {
            Predicate::Eq => "==",
            Predicate::Ne => "!=",
            Predicate::Lt => "<",
            Predicate::Le => "<=",
            Predicate::Gt => ">",
            Predicate::Ge => ">=",
            Predicate::SizeEq => "size==",
            Predicate::SizeNe => "size!=",
            Predicate::SizeLt => "size<",
            Predicate::SizeLe => "size<=",
            Predicate::SizeGt => "size>",
            Predicate::SizeGe => "size>=",
            Predicate::Ordered => "ordered",
            Predicate::NotOrdered => "notordered",
        }
    }

    pub fn is_size(self) -> bool {
        matches!(
            self,
            Predicate::SizeEq
                | Predicate::SizeNe
                | Predicate::SizeLt
                | Predicate::SizeLe
                | Predicate::SizeGt
                | Predicate::SizeGe
        )
    }

    /// The element-level comparison inside a size predicate.
    pub(crate) fn without_size(self) -> Predicate {
        match self {
            Predicate::SizeEq => Predicate::Eq,
            Predicate::SizeNe => Predicate::Ne,
            Predicate::SizeLt => Predicate::Lt,
            Predicate::SizeLe => Predicate::Le,
            Predicate::SizeGt => Predicate::Gt,
            Predicate::SizeGe => Predicate::Ge,
            other => other,
        }
    }
}

impl FromStr for Predicate {
    type Err = FemtocodeError;

    fn from_str(s: &str) -> FemtoResult<Predicate> {
        match s {
            "==" => Ok(Predicate::Eq),
            "!=" => Ok(Predicate::Ne),
            "<" => Ok(Predicate::Lt),
            "<=" => Ok(Predicate::Le),
            ">" => Ok(Predicate::Gt),
            ">=" => Ok(Predicate::Ge),
            "size==" => Ok(Predicate::SizeEq),
            "size!=" => Ok(Predicate::SizeNe),
            "size<" => Ok(Predicate::SizeLt),
            "size<=" => Ok(Predicate::SizeLe),
            "size>" => Ok(Predicate::SizeGt),
            "size>=" => Ok(Predicate::SizeGe),
            "ordered" => Ok(Predicate::Ordered),
            "notordered" => Ok(Predicate::NotOrdered),
            other => Err(FemtocodeError::invalid_argument(format!(
                "\"{}\" is not a comparison opcode",
                other
            ))),
        }
    }
}

/// A numeric interval pulled out of a `Number` schema.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Interval {
    pub min: Endpoint,
    pub max: Endpoint,
    pub whole: bool,
}

impl Interval {
    /// True when `v` is an attainable value of the interval.
    pub fn attains(&self, v: f64) -> bool {
        (self.min.value() < v || self.min == Endpoint::Closed(v))
            && (self.max.value() > v || self.max == Endpoint::Closed(v))
    }

    /// True when an infinite value is attainable (a closed `inf` or
    /// `-inf` endpoint, as opposed to `almost(inf)`).
    pub fn attains_infinite(&self) -> bool {
        self.min == Endpoint::NEG_INF || self.max == Endpoint::INF
    }
}

/// Flatten a numeric schema (a `Number`, or a `Union` or reference over
/// them) into its intervals. Anything non-numeric is an argument error.
pub(crate) fn intervals_of(schema: &Schema) -> FemtoResult<Vec<Interval>> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    collect_intervals(schema, &mut out, &mut seen)?;
    Ok(out)
}

fn collect_intervals(
    schema: &Schema,
    out: &mut Vec<Interval>,
    seen: &mut HashSet<String>,
) -> FemtoResult<()> {
    match schema {
        Schema::Number {
            min, max, whole, ..
        } => {
            out.push(Interval {
                min: *min,
                max: *max,
                whole: *whole,
            });
            Ok(())
        }
        Schema::Union { possibilities } => {
            for possibility in possibilities {
                collect_intervals(possibility, out, seen)?;
            }
            Ok(())
        }
        Schema::Ref(r) => {
            if !seen.insert(r.name().to_string()) {
                return Err(FemtocodeError::invalid_argument(format!(
                    "\"{}\" is recursive, not numeric",
                    r.name()
                )));
            }
            match r.target() {
                Some(target) => collect_intervals(target, out, seen),
                None => Err(FemtocodeError::unresolved(r.name())),
            }
        }
        Schema::Alias(name) => Err(FemtocodeError::unresolved(name)),
        other => Err(FemtocodeError::invalid_argument(format!(
            "expected a numeric schema, found {}",
            other.kind()
        ))),
    }
}
