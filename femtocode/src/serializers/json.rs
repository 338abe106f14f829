//! The JSON form of schemas.
//!
//! Unparameterized primitives serialize as bare strings (`"integer"`,
//! `"string"`, ...); everything else is an object with a `"type"` tag and
//! the variant's attributes. Endpoints are a plain number, `"inf"`,
//! `"-inf"`, or `{"almost": ...}`. An aliased node carries
//! `"alias": "name"` and a reference to it is the one-key object
//! `{"alias": "name"}`; `from_json` resolves those references before
//! returning, so the result is immediately usable.

use crate::almost::Endpoint;
use crate::error::FemtocodeError;
use crate::pretty;
use crate::resolve::resolve;
use crate::schema::{Charset, Schema};
use crate::setops::union_list;
use crate::FemtoResult;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

pub fn to_json(schema: &Schema) -> Value {
    if let Some(name) = pretty::named_form(schema) {
        return Value::String(name.to_string());
    }
    match schema {
        Schema::Impossible { alias, reason } => {
            let mut map = tagged("impossible", alias);
            if let Some(reason) = reason {
                map.insert("reason".to_string(), json!(reason));
            }
            Value::Object(map)
        }
        Schema::Null { alias } => Value::Object(tagged("null", alias)),
        Schema::Boolean { alias, just } => {
            let mut map = tagged("boolean", alias);
            if let Some(just) = just {
                map.insert("just".to_string(), json!(just));
            }
            Value::Object(map)
        }
        Schema::Number {
            alias,
            min,
            max,
            whole,
        } => {
            let mut map = tagged(if *whole { "integer" } else { "real" }, alias);
            map.insert("min".to_string(), endpoint_json(*min));
            map.insert("max".to_string(), endpoint_json(*max));
            Value::Object(map)
        }
        Schema::String {
            alias,
            charset,
            fewest,
            most,
        } => {
            let mut map = tagged("string", alias);
            map.insert("charset".to_string(), json!(charset.name()));
            map.insert("fewest".to_string(), endpoint_json(*fewest));
            map.insert("most".to_string(), endpoint_json(*most));
            Value::Object(map)
        }
        Schema::Collection {
            alias,
            items,
            fewest,
            most,
            ordered,
            ..
        } => {
            let mut map = tagged("collection", alias);
            map.insert("items".to_string(), to_json(items));
            map.insert("fewest".to_string(), endpoint_json(*fewest));
            map.insert("most".to_string(), endpoint_json(*most));
            map.insert("ordered".to_string(), json!(ordered));
            Value::Object(map)
        }
        Schema::Record { alias, fields } => {
            let mut map = tagged("record", alias);
            let fields: Map<String, Value> = fields
                .iter()
                .map(|(name, field)| (name.clone(), to_json(field)))
                .collect();
            map.insert("fields".to_string(), Value::Object(fields));
            Value::Object(map)
        }
        Schema::Union { possibilities } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("union"));
            map.insert(
                "possibilities".to_string(),
                Value::Array(possibilities.iter().map(to_json).collect()),
            );
            Value::Object(map)
        }
        Schema::Alias(name) => json!({ "alias": name }),
        Schema::Ref(r) => json!({ "alias": r.name() }),
    }
}

pub fn to_json_string(schema: &Schema) -> String {
    to_json(schema).to_string()
}

/// Parse and resolve a schema from its JSON form.
pub fn from_json(value: &Value) -> FemtoResult<Schema> {
    let parsed = parse(value, "$")?;
    let mut resolved = resolve(&[parsed])?;
    Ok(resolved.pop().unwrap_or_else(Schema::impossible))
}

pub fn from_json_str(text: &str) -> FemtoResult<Schema> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| FemtocodeError::json(e.to_string(), "$"))?;
    from_json(&value)
}

fn tagged(name: &str, alias: &Option<String>) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(name));
    if let Some(alias) = alias {
        map.insert("alias".to_string(), json!(alias));
    }
    map
}

fn endpoint_json(e: Endpoint) -> Value {
    match e {
        Endpoint::Closed(v) => raw_number(v),
        Endpoint::Open(v) => json!({ "almost": raw_number(v) }),
    }
}

fn raw_number(v: f64) -> Value {
    if v == f64::INFINITY {
        json!("inf")
    } else if v == f64::NEG_INFINITY {
        json!("-inf")
    } else {
        json!(v)
    }
}

fn parse(value: &Value, path: &str) -> FemtoResult<Schema> {
    match value {
        Value::String(name) => named(name, path),
        Value::Object(map) => parse_object(map, path),
        _ => Err(FemtocodeError::json(
            "expected a schema name or object",
            path,
        )),
    }
}

fn named(name: &str, path: &str) -> FemtoResult<Schema> {
    match name {
        "impossible" => Ok(Schema::impossible()),
        "null" => Ok(Schema::null()),
        "boolean" => Ok(Schema::boolean()),
        "integer" => Ok(Schema::integer()),
        "real" => Ok(Schema::real()),
        "extended" => Ok(Schema::extended()),
        "string" => Ok(Schema::string()),
        "empty" => Ok(Schema::empty()),
        other => Err(FemtocodeError::json(
            format!("\"{}\" is not a schema name", other),
            path,
        )),
    }
}

fn parse_object(map: &Map<String, Value>, path: &str) -> FemtoResult<Schema> {
    if !map.contains_key("type") {
        // a one-key {"alias": name} object is a reference
        if let Some(Value::String(name)) = map.get("alias") {
            if map.len() == 1 {
                return Ok(Schema::Alias(name.clone()));
            }
            return Err(FemtocodeError::json(
                "an alias reference may have no other keys",
                path,
            ));
        }
        return Err(FemtocodeError::json("missing \"type\"", path));
    }
    let tag = match &map["type"] {
        Value::String(tag) => tag.as_str(),
        _ => return Err(FemtocodeError::json("\"type\" must be a string", path)),
    };

    let schema = match tag {
        "impossible" => {
            check_keys(map, &["type", "alias", "reason"], path)?;
            match map.get("reason") {
                None => Schema::impossible(),
                Some(Value::String(reason)) => Schema::impossible_because(reason.clone()),
                Some(_) => {
                    return Err(FemtocodeError::json(
                        "\"reason\" must be a string",
                        &key_path(path, "reason"),
                    ))
                }
            }
        }
        "null" => {
            check_keys(map, &["type", "alias"], path)?;
            Schema::null()
        }
        "boolean" => {
            check_keys(map, &["type", "alias", "just"], path)?;
            match map.get("just") {
                None => Schema::boolean(),
                Some(Value::Bool(b)) => Schema::boolean_just(*b),
                Some(_) => {
                    return Err(FemtocodeError::json(
                        "\"just\" must be a boolean",
                        &key_path(path, "just"),
                    ))
                }
            }
        }
        "integer" | "real" => {
            check_keys(map, &["type", "alias", "min", "max"], path)?;
            let min = optional_endpoint(map, "min", Endpoint::ALMOST_NEG_INF, path)?;
            let max = optional_endpoint(map, "max", Endpoint::ALMOST_INF, path)?;
            Schema::number(min, max, tag == "integer").map_err(|e| at(e, path))?
        }
        "string" => {
            check_keys(map, &["type", "alias", "charset", "fewest", "most"], path)?;
            let charset = match map.get("charset") {
                None => Charset::Unicode,
                Some(Value::String(name)) if name == "unicode" => Charset::Unicode,
                Some(Value::String(name)) if name == "bytes" => Charset::Bytes,
                Some(_) => {
                    return Err(FemtocodeError::json(
                        "\"charset\" must be \"bytes\" or \"unicode\"",
                        &key_path(path, "charset"),
                    ))
                }
            };
            let fewest = optional_endpoint(map, "fewest", Endpoint::Closed(0.0), path)?;
            let most = optional_endpoint(map, "most", Endpoint::ALMOST_INF, path)?;
            Schema::string_sized(charset, fewest, most).map_err(|e| at(e, path))?
        }
        "collection" => {
            check_keys(
                map,
                &["type", "alias", "items", "fewest", "most", "ordered"],
                path,
            )?;
            let items = match map.get("items") {
                Some(value) => parse(value, &key_path(path, "items"))?,
                None => return Err(FemtocodeError::json("missing \"items\"", path)),
            };
            let fewest = optional_endpoint(map, "fewest", Endpoint::Closed(0.0), path)?;
            let most = optional_endpoint(map, "most", Endpoint::ALMOST_INF, path)?;
            let ordered = match map.get("ordered") {
                None => false,
                Some(Value::Bool(b)) => *b,
                Some(_) => {
                    return Err(FemtocodeError::json(
                        "\"ordered\" must be a boolean",
                        &key_path(path, "ordered"),
                    ))
                }
            };
            Schema::collection(items, fewest, most, ordered).map_err(|e| at(e, path))?
        }
        "record" => {
            check_keys(map, &["type", "alias", "fields"], path)?;
            let fields = match map.get("fields") {
                Some(Value::Object(fields)) => fields,
                Some(_) => {
                    return Err(FemtocodeError::json(
                        "\"fields\" must be an object",
                        &key_path(path, "fields"),
                    ))
                }
                None => return Err(FemtocodeError::json("missing \"fields\"", path)),
            };
            let mut parsed = BTreeMap::new();
            for (name, field) in fields {
                let field_path = key_path(&key_path(path, "fields"), name);
                parsed.insert(name.clone(), parse(field, &field_path)?);
            }
            Schema::record(parsed).map_err(|e| at(e, path))?
        }
        "union" => {
            check_keys(map, &["type", "possibilities"], path)?;
            let possibilities = match map.get("possibilities") {
                Some(Value::Array(items)) if !items.is_empty() => items,
                Some(_) => {
                    return Err(FemtocodeError::json(
                        "\"possibilities\" must be a non-empty array",
                        &key_path(path, "possibilities"),
                    ))
                }
                None => {
                    return Err(FemtocodeError::json("missing \"possibilities\"", path))
                }
            };
            let mut parsed = Vec::with_capacity(possibilities.len());
            for (i, possibility) in possibilities.iter().enumerate() {
                let item_path = format!("{}.possibilities[{}]", path, i);
                parsed.push(parse(possibility, &item_path)?);
            }
            return Ok(union_list(parsed));
        }
        other => {
            return Err(FemtocodeError::json(
                format!("\"{}\" is not a schema type", other),
                &key_path(path, "type"),
            ))
        }
    };

    match map.get("alias") {
        None => Ok(schema),
        Some(Value::String(name)) => schema.with_alias(name.clone()).map_err(|e| at(e, path)),
        Some(_) => Err(FemtocodeError::json(
            "\"alias\" must be a string",
            &key_path(path, "alias"),
        )),
    }
}

fn key_path(path: &str, key: &str) -> String {
    format!("{}.{}", path, key)
}

/// Rewrap a constructor rejection as a JSON error carrying the path.
fn at(e: FemtocodeError, path: &str) -> FemtocodeError {
    match e {
        FemtocodeError::Declaration(message) => FemtocodeError::json(message, path),
        other => other,
    }
}

fn check_keys(map: &Map<String, Value>, allowed: &[&str], path: &str) -> FemtoResult<()> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(FemtocodeError::json(
                format!("unrecognized key \"{}\"", key),
                path,
            ));
        }
    }
    Ok(())
}

fn optional_endpoint(
    map: &Map<String, Value>,
    key: &str,
    default: Endpoint,
    path: &str,
) -> FemtoResult<Endpoint> {
    match map.get(key) {
        None => Ok(default),
        Some(value) => parse_endpoint(value, &key_path(path, key)),
    }
}

fn parse_endpoint(value: &Value, path: &str) -> FemtoResult<Endpoint> {
    match value {
        Value::Object(map) => match (map.len(), map.get("almost")) {
            (1, Some(inner)) => Ok(Endpoint::Open(parse_raw_number(inner, path)?)),
            _ => Err(FemtocodeError::json(
                "an endpoint object must be exactly {\"almost\": ...}",
                path,
            )),
        },
        other => Ok(Endpoint::Closed(parse_raw_number(other, path)?)),
    }
}

fn parse_raw_number(value: &Value, path: &str) -> FemtoResult<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            FemtocodeError::json("number is out of range for an endpoint", path)
        }),
        Value::String(s) if s == "inf" => Ok(f64::INFINITY),
        Value::String(s) if s == "-inf" => Ok(f64::NEG_INFINITY),
        _ => Err(FemtocodeError::json(
            "expected a number, \"inf\", or \"-inf\"",
            path,
        )),
    }
}
