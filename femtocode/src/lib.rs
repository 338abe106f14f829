//! # Femtocode schema algebra
//!
//! **Types with interval-level precision**
//!
//! A schema describes the set of values an expression can take: not just
//! "a number", but "a whole number between 1 and 10" or "a string of at
//! most 5 bytes, or null". Because schemas are sets, they support set
//! operations (union, intersection, difference), containment queries, and
//! refinement: given what a predicate or an arithmetic operator does, a
//! schema can be narrowed to exactly the values that survive.
//!
//! ## Quick start
//!
//! ```rust
//! use femtocode::{literal, union, Predicate, Schema};
//!
//! fn main() -> femtocode::FemtoResult<()> {
//!     let small = Schema::integer_range(0.0, 10.0)?;
//!     let large = Schema::real_range(20.0, 30.0)?;
//!     let either = union(&[small, large])?;
//!
//!     // Inside an `if x >= 25` branch, only one alternative survives.
//!     let narrowed = literal(&either, Predicate::Ge, &25.0.into())?;
//!     assert_eq!(narrowed, Schema::real_range(25.0, 30.0)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Core concepts
//!
//! ### Endpoints
//! Interval bounds are [`Endpoint`]s: `Closed(x)` includes `x`,
//! `Open(x)` ("almost x") excludes it. Infinities are ordinary endpoint
//! values, so `almost(inf)` means "finite but unbounded" while a closed
//! `inf` means infinity itself is attainable.
//!
//! ### Impossible
//! The empty set is a first-class schema. Set operations and inference
//! never fail just because no value qualifies; they return
//! `Schema::Impossible`, usually with a reason, and union aggregation
//! propagates it so the diagnostic reaches the caller.
//!
//! ### Aliases and recursion
//! A schema node may carry an alias, and an `Alias` leaf names one.
//! [`resolve`] ties these trees into graphs: alias leaves become shared
//! references, which is how recursive record types are expressed.
//!
//! ### JSON
//! [`to_json`] and [`from_json`] round-trip schemas through a compact
//! JSON form; deserialization resolves aliases before returning.

pub mod almost;
pub mod error;
pub mod inference;
pub mod pretty;
pub mod resolve;
pub mod schema;
pub mod serializers;
pub mod setops;
pub mod value;

pub use almost::Endpoint;
pub use error::FemtocodeError;
pub use inference::{
    add, divide, floordivide, inequality, literal, modulo, multiply, power, subtract, Predicate,
};
pub use pretty::{compare, pretty};
pub use resolve::resolve;
pub use schema::{Charset, Schema, SchemaRef};
pub use serializers::{from_json, from_json_str, to_json, to_json_string};
pub use setops::{difference, intersection, union};
pub use value::LiteralValue;

/// Result type for schema algebra operations
pub type FemtoResult<T> = Result<T, FemtocodeError>;
