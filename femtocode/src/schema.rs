//! The schema algebra's data model.
//!
//! A [`Schema`] describes a set of values: not just a kind (number, string,
//! collection, record, union) but quantitative bounds — numeric intervals
//! with half-open endpoints, length ranges, field maps, and explicit
//! impossibility. Schemas are immutable values; the set operations in
//! [`crate::setops`] and the inference rules in [`crate::inference`]
//! always allocate fresh ones.
//!
//! Recursive types are expressed with aliases: a node may carry a name,
//! and an [`Schema::Alias`] leaf refers to that name. [`crate::resolve`]
//! turns alias leaves into [`Schema::Ref`] nodes whose shared cell points
//! back at the defining node, so schema trees stay finite while the type
//! graph is cyclic.

use crate::almost::Endpoint;
use crate::error::FemtocodeError;
use crate::value::LiteralValue;
use crate::FemtoResult;
use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Character set of a string schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Charset {
    Bytes,
    Unicode,
}

impl Charset {
    pub fn name(self) -> &'static str {
        match self {
            Charset::Bytes => "bytes",
            Charset::Unicode => "unicode",
        }
    }
}

/// A resolved reference to a named schema node. The cell is written once,
/// by `resolve`, and shared between every reference to the same name
/// within a schema group; that sharing is what forms cycles.
#[derive(Debug, Clone)]
pub struct SchemaRef {
    pub(crate) name: String,
    pub(crate) target: Arc<OnceCell<Schema>>,
}

impl SchemaRef {
    pub(crate) fn new(name: impl Into<String>, target: Arc<OnceCell<Schema>>) -> Self {
        SchemaRef {
            name: name.into(),
            target,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The referenced schema, if the knot has been tied
    pub fn target(&self) -> Option<&Schema> {
        self.target.get()
    }
}

#[derive(Debug, Clone)]
pub enum Schema {
    /// The empty type: a compile-time error marker carrying an optional
    /// explanation of what went wrong
    Impossible {
        alias: Option<String>,
        reason: Option<String>,
    },

    /// The singleton type containing `none`
    Null { alias: Option<String> },

    /// Booleans, optionally refined to a single truth value
    Boolean {
        alias: Option<String>,
        just: Option<bool>,
    },

    /// A closed interval on the extended reals, optionally integer-only
    Number {
        alias: Option<String>,
        min: Endpoint,
        max: Endpoint,
        whole: bool,
    },

    /// Strings of a charset whose length lies in `[fewest, most]`
    String {
        alias: Option<String>,
        charset: Charset,
        fewest: Endpoint,
        most: Endpoint,
    },

    /// Sequences of `items` with length in `[fewest, most]`
    Collection {
        alias: Option<String>,
        items: Box<Schema>,
        fewest: Endpoint,
        most: Endpoint,
        ordered: bool,
        /// Alias definitions absorbed from an item type that was
        /// normalized away (`most == 0`); walked by `resolve`, invisible
        /// to equality, ordering, and serialization
        absorbed: Vec<Schema>,
    },

    /// Product type with width subtyping
    Record {
        alias: Option<String>,
        fields: BTreeMap<String, Schema>,
    },

    /// Flat, sorted sum type; never nested, never aliased itself
    Union { possibilities: Vec<Schema> },

    /// An unresolved textual reference to an alias; illegal in semantic
    /// queries until `resolve` replaces it
    Alias(String),

    /// A resolved reference produced by `resolve`
    Ref(SchemaRef),
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a `[fewest, most]` length range: a closed nonnegative integer
/// lower bound and a closed integer or `almost(inf)` upper bound.
fn checked_size_range(fewest: Endpoint, most: Endpoint) -> FemtoResult<(Endpoint, Endpoint)> {
    match fewest {
        Endpoint::Closed(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => {}
        _ => {
            return Err(FemtocodeError::declaration(format!(
                "fewest must be a nonnegative integer, not {}",
                fewest
            )))
        }
    }
    match most {
        Endpoint::Closed(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => {}
        Endpoint::Open(v) if v == f64::INFINITY => {}
        _ => {
            return Err(FemtocodeError::declaration(format!(
                "most must be a nonnegative integer or almost(inf), not {}",
                most
            )))
        }
    }
    if fewest.value() > most.value() {
        return Err(FemtocodeError::declaration(format!(
            "fewest ({}) must not exceed most ({})",
            fewest, most
        )));
    }
    Ok((fewest, most))
}

/// Pull an open whole-number lower bound in by one unit
fn whole_min(min: Endpoint) -> FemtoResult<Endpoint> {
    match min {
        Endpoint::Open(v) if v.is_infinite() => Ok(min),
        Endpoint::Open(v) if v.fract() == 0.0 => Ok(Endpoint::Closed(v + 1.0)),
        Endpoint::Open(v) => Ok(Endpoint::Closed(v.ceil())),
        Endpoint::Closed(v) if v.is_infinite() => Err(FemtocodeError::declaration(
            "whole numbers cannot attain inf; use almost(-inf)/almost(inf)",
        )),
        Endpoint::Closed(v) if v.fract() == 0.0 => Ok(min),
        Endpoint::Closed(v) => Err(FemtocodeError::declaration(format!(
            "whole number endpoint must be integral, not {}",
            v
        ))),
    }
}

/// Pull an open whole-number upper bound in by one unit
fn whole_max(max: Endpoint) -> FemtoResult<Endpoint> {
    match max {
        Endpoint::Open(v) if v.is_infinite() => Ok(max),
        Endpoint::Open(v) if v.fract() == 0.0 => Ok(Endpoint::Closed(v - 1.0)),
        Endpoint::Open(v) => Ok(Endpoint::Closed(v.floor())),
        Endpoint::Closed(v) if v.is_infinite() => Err(FemtocodeError::declaration(
            "whole numbers cannot attain inf; use almost(-inf)/almost(inf)",
        )),
        Endpoint::Closed(v) if v.fract() == 0.0 => Ok(max),
        Endpoint::Closed(v) => Err(FemtocodeError::declaration(format!(
            "whole number endpoint must be integral, not {}",
            v
        ))),
    }
}

impl Schema {
    // ----- named instances ------------------------------------------------

    pub fn impossible() -> Schema {
        Schema::Impossible {
            alias: None,
            reason: None,
        }
    }

    pub fn impossible_because(reason: impl Into<String>) -> Schema {
        Schema::Impossible {
            alias: None,
            reason: Some(reason.into()),
        }
    }

    pub fn null() -> Schema {
        Schema::Null { alias: None }
    }

    pub fn boolean() -> Schema {
        Schema::Boolean {
            alias: None,
            just: None,
        }
    }

    pub fn boolean_just(value: bool) -> Schema {
        Schema::Boolean {
            alias: None,
            just: Some(value),
        }
    }

    /// All integers: `Number(almost(-inf), almost(inf), whole)`
    pub fn integer() -> Schema {
        Schema::Number {
            alias: None,
            min: Endpoint::ALMOST_NEG_INF,
            max: Endpoint::ALMOST_INF,
            whole: true,
        }
    }

    /// All finite reals
    pub fn real() -> Schema {
        Schema::Number {
            alias: None,
            min: Endpoint::ALMOST_NEG_INF,
            max: Endpoint::ALMOST_INF,
            whole: false,
        }
    }

    /// The extended reals, `-inf` and `inf` included
    pub fn extended() -> Schema {
        Schema::Number {
            alias: None,
            min: Endpoint::NEG_INF,
            max: Endpoint::INF,
            whole: false,
        }
    }

    /// Unicode strings of any length
    pub fn string() -> Schema {
        Schema::String {
            alias: None,
            charset: Charset::Unicode,
            fewest: Endpoint::Closed(0.0),
            most: Endpoint::ALMOST_INF,
        }
    }

    /// The empty collection
    pub fn empty() -> Schema {
        Schema::Collection {
            alias: None,
            items: Box::new(Schema::null()),
            fewest: Endpoint::Closed(0.0),
            most: Endpoint::Closed(0.0),
            ordered: true,
            absorbed: Vec::new(),
        }
    }

    // ----- checked constructors -------------------------------------------

    /// Construct a number schema, enforcing the interval invariants.
    ///
    /// A single-point non-whole interval over a finite integer is promoted
    /// to `whole`; this keeps equality well-defined between, say, the
    /// literal `3` arriving as a real and the same literal as an integer.
    pub fn number(min: Endpoint, max: Endpoint, whole: bool) -> FemtoResult<Schema> {
        if min.value().is_nan() || max.value().is_nan() {
            return Err(FemtocodeError::declaration("number endpoint may not be nan"));
        }
        if whole {
            let min = whole_min(min)?;
            let max = whole_max(max)?;
            if min.value() > max.value() {
                return Err(FemtocodeError::declaration(format!(
                    "empty whole-number interval: min {} exceeds max {}",
                    min, max
                )));
            }
            if min.value() == max.value() && (min.is_open() || max.is_open()) {
                return Err(FemtocodeError::declaration(
                    "single-point interval must have closed endpoints",
                ));
            }
            return Ok(Schema::Number {
                alias: None,
                min,
                max,
                whole: true,
            });
        }
        if min.value() > max.value() {
            return Err(FemtocodeError::declaration(format!(
                "empty interval: min {} exceeds max {}",
                min, max
            )));
        }
        if min.value() == max.value() {
            if min.is_open() || max.is_open() {
                return Err(FemtocodeError::declaration(
                    "single-point interval must have closed endpoints",
                ));
            }
            let v = min.value();
            if v.is_finite() && v.fract() == 0.0 {
                return Ok(Schema::Number {
                    alias: None,
                    min,
                    max,
                    whole: true,
                });
            }
        }
        Ok(Schema::Number {
            alias: None,
            min,
            max,
            whole: false,
        })
    }

    /// `Number(min, max, whole)` over closed integral endpoints
    pub fn integer_range(min: f64, max: f64) -> FemtoResult<Schema> {
        Schema::number(Endpoint::Closed(min), Endpoint::Closed(max), true)
    }

    /// `Number(min, max)` over closed real endpoints
    pub fn real_range(min: f64, max: f64) -> FemtoResult<Schema> {
        Schema::number(Endpoint::Closed(min), Endpoint::Closed(max), false)
    }

    pub fn string_sized(charset: Charset, fewest: Endpoint, most: Endpoint) -> FemtoResult<Schema> {
        let (fewest, most) = checked_size_range(fewest, most)?;
        Ok(Schema::String {
            alias: None,
            charset,
            fewest,
            most,
        })
    }

    /// Collections of `items` with length in `[fewest, most]`.
    ///
    /// A collection that can only be empty normalizes its item type to
    /// `Null`; alias definitions inside the dropped item type are absorbed
    /// so `resolve` still sees them.
    pub fn collection(
        items: Schema,
        fewest: Endpoint,
        most: Endpoint,
        ordered: bool,
    ) -> FemtoResult<Schema> {
        let (fewest, most) = checked_size_range(fewest, most)?;
        if most.value() == 0.0 {
            let absorbed = if matches!(items, Schema::Null { alias: None }) {
                Vec::new()
            } else {
                vec![items]
            };
            return Ok(Schema::Collection {
                alias: None,
                items: Box::new(Schema::null()),
                fewest: Endpoint::Closed(0.0),
                most: Endpoint::Closed(0.0),
                ordered: true,
                absorbed,
            });
        }
        Ok(Schema::Collection {
            alias: None,
            items: Box::new(items),
            fewest,
            most,
            ordered,
            absorbed: Vec::new(),
        })
    }

    /// An unordered collection of `items` with unconstrained length
    pub fn collection_of(items: Schema) -> Schema {
        Schema::Collection {
            alias: None,
            items: Box::new(items),
            fewest: Endpoint::Closed(0.0),
            most: Endpoint::ALMOST_INF,
            ordered: false,
            absorbed: Vec::new(),
        }
    }

    pub fn record(fields: BTreeMap<String, Schema>) -> FemtoResult<Schema> {
        if fields.is_empty() {
            return Err(FemtocodeError::declaration("record must have at least one field"));
        }
        for name in fields.keys() {
            if !is_identifier(name) {
                return Err(FemtocodeError::declaration(format!(
                    "record field name \"{}\" is not a valid identifier",
                    name
                )));
            }
        }
        Ok(Schema::Record { alias: None, fields })
    }

    pub fn record_of<S: Into<String>>(
        fields: impl IntoIterator<Item = (S, Schema)>,
    ) -> FemtoResult<Schema> {
        Schema::record(
            fields
                .into_iter()
                .map(|(name, schema)| (name.into(), schema))
                .collect(),
        )
    }

    /// Internal union assembly: the caller has already distributed and
    /// flattened; this sorts, deduplicates, and collapses singletons.
    pub(crate) fn union_unchecked(mut possibilities: Vec<Schema>) -> Schema {
        possibilities.sort();
        possibilities.dedup();
        if possibilities.len() > 1 {
            return Schema::Union { possibilities };
        }
        match possibilities.pop() {
            Some(only) => only,
            None => Schema::impossible_because("union of no possibilities"),
        }
    }

    /// Attach an alias name to this schema node. Union nodes cannot carry
    /// aliases; name one of the possibilities instead.
    pub fn with_alias(mut self, name: impl Into<String>) -> FemtoResult<Schema> {
        let name = name.into();
        if name.is_empty() {
            return Err(FemtocodeError::declaration("alias must not be empty"));
        }
        let slot = match &mut self {
            Schema::Impossible { alias, .. }
            | Schema::Null { alias }
            | Schema::Boolean { alias, .. }
            | Schema::Number { alias, .. }
            | Schema::String { alias, .. }
            | Schema::Collection { alias, .. }
            | Schema::Record { alias, .. } => alias,
            Schema::Union { .. } => {
                return Err(FemtocodeError::declaration(
                    "a union cannot carry an alias; alias one of its possibilities",
                ))
            }
            Schema::Alias(_) | Schema::Ref(_) => {
                return Err(FemtocodeError::declaration(
                    "an alias reference cannot itself be aliased",
                ))
            }
        };
        *slot = Some(name);
        Ok(self)
    }

    // ----- accessors ------------------------------------------------------

    pub fn alias(&self) -> Option<&str> {
        match self {
            Schema::Impossible { alias, .. }
            | Schema::Null { alias }
            | Schema::Boolean { alias, .. }
            | Schema::Number { alias, .. }
            | Schema::String { alias, .. }
            | Schema::Collection { alias, .. }
            | Schema::Record { alias, .. } => alias.as_deref(),
            _ => None,
        }
    }

    pub fn is_impossible(&self) -> bool {
        matches!(self, Schema::Impossible { .. })
    }

    /// The explanation carried by an `Impossible`, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Schema::Impossible { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn rank(&self) -> u8 {
        match self {
            Schema::Impossible { .. } => 0,
            Schema::Null { .. } => 1,
            Schema::Boolean { .. } => 2,
            Schema::Number { .. } => 3,
            Schema::String { .. } => 4,
            Schema::Collection { .. } => 5,
            Schema::Record { .. } => 6,
            Schema::Union { .. } => 7,
            Schema::Alias(_) => 8,
            Schema::Ref(_) => 9,
        }
    }

    /// Short kind name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Impossible { .. } => "impossible",
            Schema::Null { .. } => "null",
            Schema::Boolean { .. } => "boolean",
            Schema::Number { whole: true, .. } => "integer",
            Schema::Number { .. } => "real",
            Schema::String { .. } => "string",
            Schema::Collection { .. } => "collection",
            Schema::Record { .. } => "record",
            Schema::Union { .. } => "union",
            Schema::Alias(_) | Schema::Ref(_) => "reference",
        }
    }

    // ----- subsumption ----------------------------------------------------

    /// `other in self`: every value admitted by `other` is admitted by
    /// `self`. Recursive references are compared nominally and expanded
    /// coinductively.
    pub fn contains(&self, other: &Schema) -> bool {
        let mut left_seen = HashSet::new();
        let mut right_seen = HashSet::new();
        self.contains_impl(other, &mut left_seen, &mut right_seen)
    }

    fn contains_impl(
        &self,
        other: &Schema,
        left_seen: &mut HashSet<String>,
        right_seen: &mut HashSet<String>,
    ) -> bool {
        match (self, other) {
            (Schema::Ref(a), Schema::Ref(b)) if a.name == b.name => true,
            (Schema::Ref(a), _) => {
                if !left_seen.insert(a.name.clone()) {
                    return true;
                }
                match a.target() {
                    Some(target) => target.contains_impl(other, left_seen, right_seen),
                    None => false,
                }
            }
            (_, Schema::Ref(b)) => {
                if !right_seen.insert(b.name.clone()) {
                    return true;
                }
                match b.target() {
                    Some(target) => self.contains_impl(target, left_seen, right_seen),
                    None => false,
                }
            }
            (Schema::Alias(_), _) | (_, Schema::Alias(_)) => false,
            // the empty type is contained in everything
            (_, Schema::Impossible { .. }) => true,
            (Schema::Impossible { .. }, _) => false,
            (Schema::Union { possibilities }, Schema::Union { possibilities: others }) => others
                .iter()
                .all(|o| {
                    possibilities
                        .iter()
                        .any(|p| p.contains_impl(o, left_seen, right_seen))
                }),
            (Schema::Union { possibilities }, _) => possibilities
                .iter()
                .any(|p| p.contains_impl(other, left_seen, right_seen)),
            (_, Schema::Union { possibilities }) => possibilities
                .iter()
                .all(|o| self.contains_impl(o, left_seen, right_seen)),
            (Schema::Null { .. }, Schema::Null { .. }) => true,
            (Schema::Boolean { just: mine, .. }, Schema::Boolean { just: theirs, .. }) => {
                match mine {
                    None => true,
                    Some(b) => *theirs == Some(*b),
                }
            }
            (
                Schema::Number {
                    min, max, whole, ..
                },
                Schema::Number {
                    min: omin,
                    max: omax,
                    whole: owhole,
                    ..
                },
            ) => {
                min.minimum(*omin) == *min
                    && max.maximum(*omax) == *max
                    && (!*whole
                        || *owhole
                        || (omin == omax && omin.value().fract() == 0.0))
            }
            (
                Schema::String {
                    charset,
                    fewest,
                    most,
                    ..
                },
                Schema::String {
                    charset: ocharset,
                    fewest: ofewest,
                    most: omost,
                    ..
                },
            ) => {
                charset == ocharset
                    && fewest.minimum(*ofewest) == *fewest
                    && most.maximum(*omost) == *most
            }
            (
                Schema::Collection {
                    items,
                    fewest,
                    most,
                    ordered,
                    ..
                },
                Schema::Collection {
                    items: oitems,
                    fewest: ofewest,
                    most: omost,
                    ordered: oordered,
                    ..
                },
            ) => {
                (!*ordered || *oordered)
                    && fewest.minimum(*ofewest) == *fewest
                    && most.maximum(*omost) == *most
                    && (most.value() == 0.0
                        || omost.value() == 0.0
                        || items.contains_impl(oitems, left_seen, right_seen))
            }
            (Schema::Record { fields, .. }, Schema::Record { fields: ofields, .. }) => {
                fields.iter().all(|(name, schema)| {
                    ofields
                        .get(name)
                        .map(|other_schema| {
                            schema.contains_impl(other_schema, left_seen, right_seen)
                        })
                        .unwrap_or(false)
                })
            }
            _ => false,
        }
    }

    /// Value containment: would `value` typecheck against this schema?
    pub fn contains_value(&self, value: &LiteralValue) -> bool {
        match (self, value) {
            (Schema::Ref(r), _) => r
                .target()
                .map(|target| target.contains_value(value))
                .unwrap_or(false),
            (Schema::Alias(_), _) => false,
            (Schema::Impossible { .. }, _) => false,
            (Schema::Union { possibilities }, _) => {
                possibilities.iter().any(|p| p.contains_value(value))
            }
            (Schema::Null { .. }, LiteralValue::Null) => true,
            (Schema::Boolean { just, .. }, LiteralValue::Boolean(b)) => match just {
                None => true,
                Some(j) => j == b,
            },
            (
                Schema::Number {
                    min, max, whole, ..
                },
                LiteralValue::Number(n),
            ) => {
                if n.is_nan() {
                    return false;
                }
                if *whole && !(n.is_finite() && n.fract() == 0.0) {
                    return false;
                }
                let above_min = *n > min.value() || (*n == min.value() && min.is_closed());
                let below_max = *n < max.value() || (*n == max.value() && max.is_closed());
                above_min && below_max
            }
            (
                Schema::String {
                    charset,
                    fewest,
                    most,
                    ..
                },
                LiteralValue::String(s),
            ) => {
                let len = match charset {
                    Charset::Bytes => s.len(),
                    Charset::Unicode => s.chars().count(),
                } as f64;
                len >= fewest.value()
                    && (len < most.value() || (len == most.value() && most.is_closed()))
            }
            (
                Schema::Collection {
                    items,
                    fewest,
                    most,
                    ..
                },
                LiteralValue::Collection(values),
            ) => {
                let len = values.len() as f64;
                len >= fewest.value()
                    && (len < most.value() || (len == most.value() && most.is_closed()))
                    && values.iter().all(|v| items.contains_value(v))
            }
            (Schema::Record { fields, .. }, LiteralValue::Record(values)) => {
                fields.iter().all(|(name, schema)| {
                    values
                        .get(name)
                        .map(|v| schema.contains_value(v))
                        .unwrap_or(false)
                })
            }
            _ => false,
        }
    }
}

// Total order for canonical forms: primary key is the variant, secondary
// keys are variant-specific. References compare by name alone, which both
// keeps the order total on cyclic groups and makes structurally equal
// resolutions of the same declarations compare equal.
impl Ord for Schema {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (
                Schema::Impossible { alias, reason },
                Schema::Impossible {
                    alias: oalias,
                    reason: oreason,
                },
            ) => reason.cmp(oreason).then_with(|| alias.cmp(oalias)),
            (Schema::Null { alias }, Schema::Null { alias: oalias }) => alias.cmp(oalias),
            (
                Schema::Boolean { alias, just },
                Schema::Boolean {
                    alias: oalias,
                    just: ojust,
                },
            ) => just.cmp(ojust).then_with(|| alias.cmp(oalias)),
            (
                Schema::Number {
                    alias,
                    min,
                    max,
                    whole,
                },
                Schema::Number {
                    alias: oalias,
                    min: omin,
                    max: omax,
                    whole: owhole,
                },
            ) => min
                .cmp(omin)
                .then_with(|| max.cmp(omax))
                .then_with(|| whole.cmp(owhole))
                .then_with(|| alias.cmp(oalias)),
            (
                Schema::String {
                    alias,
                    charset,
                    fewest,
                    most,
                },
                Schema::String {
                    alias: oalias,
                    charset: ocharset,
                    fewest: ofewest,
                    most: omost,
                },
            ) => charset
                .cmp(ocharset)
                .then_with(|| fewest.cmp(ofewest))
                .then_with(|| most.cmp(omost))
                .then_with(|| alias.cmp(oalias)),
            (
                Schema::Collection {
                    alias,
                    items,
                    fewest,
                    most,
                    ordered,
                    ..
                },
                Schema::Collection {
                    alias: oalias,
                    items: oitems,
                    fewest: ofewest,
                    most: omost,
                    ordered: oordered,
                    ..
                },
            ) => items
                .cmp(oitems)
                .then_with(|| fewest.cmp(ofewest))
                .then_with(|| most.cmp(omost))
                .then_with(|| ordered.cmp(oordered))
                .then_with(|| alias.cmp(oalias)),
            (
                Schema::Record { alias, fields },
                Schema::Record {
                    alias: oalias,
                    fields: ofields,
                },
            ) => fields.cmp(ofields).then_with(|| alias.cmp(oalias)),
            (
                Schema::Union { possibilities },
                Schema::Union {
                    possibilities: others,
                },
            ) => possibilities.cmp(others),
            (Schema::Alias(name), Schema::Alias(oname)) => name.cmp(oname),
            (Schema::Ref(a), Schema::Ref(b)) => a.name.cmp(&b.name),
            _ => unreachable!("rank already ordered distinct variants"),
        })
    }
}

impl PartialOrd for Schema {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Schema::Impossible { alias, reason } => {
                alias.hash(state);
                reason.hash(state);
            }
            Schema::Null { alias } => alias.hash(state),
            Schema::Boolean { alias, just } => {
                alias.hash(state);
                just.hash(state);
            }
            Schema::Number {
                alias,
                min,
                max,
                whole,
            } => {
                alias.hash(state);
                min.hash(state);
                max.hash(state);
                whole.hash(state);
            }
            Schema::String {
                alias,
                charset,
                fewest,
                most,
            } => {
                alias.hash(state);
                charset.hash(state);
                fewest.hash(state);
                most.hash(state);
            }
            Schema::Collection {
                alias,
                items,
                fewest,
                most,
                ordered,
                ..
            } => {
                alias.hash(state);
                items.hash(state);
                fewest.hash(state);
                most.hash(state);
                ordered.hash(state);
            }
            Schema::Record { alias, fields } => {
                alias.hash(state);
                fields.hash(state);
            }
            Schema::Union { possibilities } => possibilities.hash(state),
            Schema::Alias(name) => name.hash(state),
            Schema::Ref(r) => r.name.hash(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_integral_real_promotes_to_whole() {
        let three = Schema::real_range(3.0, 3.0).unwrap();
        assert!(matches!(three, Schema::Number { whole: true, .. }));
        assert_eq!(three, Schema::integer_range(3.0, 3.0).unwrap());
    }

    #[test]
    fn singleton_fractional_real_stays_real() {
        let half = Schema::real_range(0.5, 0.5).unwrap();
        assert!(matches!(half, Schema::Number { whole: false, .. }));
    }

    #[test]
    fn open_singleton_is_rejected() {
        assert!(Schema::number(Endpoint::Open(2.0), Endpoint::Closed(2.0), false).is_err());
        assert!(Schema::number(Endpoint::Closed(5.0), Endpoint::Closed(2.0), false).is_err());
    }

    #[test]
    fn whole_open_endpoints_shift_inward() {
        let shifted = Schema::number(Endpoint::Open(0.0), Endpoint::Open(10.0), true).unwrap();
        assert_eq!(shifted, Schema::integer_range(1.0, 9.0).unwrap());
    }

    #[test]
    fn whole_numbers_reject_attained_infinity() {
        assert!(Schema::number(Endpoint::Closed(0.0), Endpoint::INF, true).is_err());
        assert!(Schema::number(Endpoint::Closed(0.0), Endpoint::ALMOST_INF, true).is_ok());
    }

    #[test]
    fn empty_collection_normalizes() {
        let c = Schema::collection(
            Schema::real(),
            Endpoint::Closed(0.0),
            Endpoint::Closed(0.0),
            false,
        )
        .unwrap();
        assert_eq!(c, Schema::empty());
    }

    #[test]
    fn number_containment_respects_openness() {
        let closed = Schema::real_range(0.0, 10.0).unwrap();
        let open = Schema::number(Endpoint::Open(0.0), Endpoint::Open(10.0), false).unwrap();
        assert!(closed.contains(&open));
        assert!(!open.contains(&closed));
    }

    #[test]
    fn whole_contains_integral_singleton() {
        let integers = Schema::integer();
        assert!(integers.contains(&Schema::real_range(4.0, 4.0).unwrap()));
        assert!(!integers.contains(&Schema::real_range(4.5, 4.5).unwrap()));
        assert!(!integers.contains(&Schema::real()));
        assert!(Schema::real().contains(&integers));
    }

    #[test]
    fn record_width_subtyping() {
        let wide = Schema::record_of([("x", Schema::real()), ("y", Schema::real())]).unwrap();
        let narrow = Schema::record_of([("x", Schema::real())]).unwrap();
        // narrow requires only x, so any wide value qualifies
        assert!(narrow.contains(&wide));
        assert!(!wide.contains(&narrow));
    }

    #[test]
    fn union_containment_per_alternative() {
        let u = Schema::union_unchecked(vec![Schema::null(), Schema::real()]);
        assert!(u.contains(&Schema::null()));
        assert!(u.contains(&Schema::real_range(1.0, 2.0).unwrap()));
        assert!(!u.contains(&Schema::string()));
    }

    #[test]
    fn value_containment() {
        let n = Schema::integer_range(0.0, 10.0).unwrap();
        assert!(n.contains_value(&LiteralValue::Number(7.0)));
        assert!(!n.contains_value(&LiteralValue::Number(7.5)));
        assert!(!n.contains_value(&LiteralValue::Number(11.0)));
        assert!(!n.contains_value(&LiteralValue::Boolean(true)));

        let s = Schema::string();
        assert!(s.contains_value(&LiteralValue::from("hello")));
    }

    #[test]
    fn union_on_alias_is_rejected() {
        let u = Schema::union_unchecked(vec![Schema::null(), Schema::real()]);
        assert!(u.with_alias("nope").is_err());
    }

    #[test]
    fn invalid_field_names_are_rejected() {
        assert!(Schema::record_of([("3bad", Schema::real())]).is_err());
        assert!(Schema::record_of([("ok_name", Schema::real())]).is_ok());
    }
}
