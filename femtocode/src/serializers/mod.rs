//! Wire representations of schemas.

mod json;

pub use json::{from_json, from_json_str, to_json, to_json_string};
