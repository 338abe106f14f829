//! Indented schema rendering and the side-by-side diff used in error
//! messages.

use crate::schema::Schema;
use std::fmt;

const INDENT: &str = "  ";

/// Render a schema as an indented, multi-line description. Unparameterized
/// primitives print as their bare names; references print as the alias
/// name, so cyclic schemas render in finite space.
pub fn pretty(schema: &Schema) -> String {
    let mut lines = Vec::new();
    render(schema, 0, &mut lines);
    lines.join("\n")
}

/// Diff two schemas line by line. Differing lines are flagged with `>` in
/// the left margin; this is what construction and resolution errors embed
/// when two schemas disagree.
pub fn compare(one: &Schema, two: &Schema) -> String {
    let mut left = Vec::new();
    let mut right = Vec::new();
    render(one, 0, &mut left);
    render(two, 0, &mut right);

    let rows = left.len().max(right.len());
    let width = left.iter().map(|l| l.len()).max().unwrap_or(0);
    let mut out = Vec::with_capacity(rows);
    for i in 0..rows {
        let l = left.get(i).map(String::as_str).unwrap_or("");
        let r = right.get(i).map(String::as_str).unwrap_or("");
        let marker = if l == r { " " } else { ">" };
        out.push(format!("{} {:<width$} | {}", marker, l, r, width = width));
    }
    out.join("\n")
}

/// The bare name of an unparameterized, unaliased primitive, shared with
/// the JSON form.
pub(crate) fn named_form(schema: &Schema) -> Option<&'static str> {
    if schema.alias().is_some() {
        return None;
    }
    if *schema == Schema::impossible() {
        Some("impossible")
    } else if *schema == Schema::null() {
        Some("null")
    } else if *schema == Schema::boolean() {
        Some("boolean")
    } else if *schema == Schema::integer() {
        Some("integer")
    } else if *schema == Schema::real() {
        Some("real")
    } else if *schema == Schema::extended() {
        Some("extended")
    } else if *schema == Schema::string() {
        Some("string")
    } else if *schema == Schema::empty() {
        Some("empty")
    } else {
        None
    }
}

fn alias_prefix(schema: &Schema) -> String {
    match schema.alias() {
        Some(name) => format!("alias={}, ", name),
        None => String::new(),
    }
}

fn render(schema: &Schema, depth: usize, out: &mut Vec<String>) {
    let pad = INDENT.repeat(depth);
    if let Some(name) = named_form(schema) {
        out.push(format!("{}{}", pad, name));
        return;
    }
    match schema {
        Schema::Impossible { reason, .. } => match reason {
            Some(r) => out.push(format!("{}impossible({}{:?})", pad, alias_prefix(schema), r)),
            None => out.push(format!("{}impossible({})", pad, alias_prefix(schema).trim_end_matches(", "))),
        },
        Schema::Null { .. } => {
            out.push(format!("{}null({})", pad, alias_prefix(schema).trim_end_matches(", ")))
        }
        Schema::Boolean { just, .. } => match just {
            Some(b) => out.push(format!("{}boolean({}just={})", pad, alias_prefix(schema), b)),
            None => out.push(format!(
                "{}boolean({})",
                pad,
                alias_prefix(schema).trim_end_matches(", ")
            )),
        },
        Schema::Number {
            min, max, whole, ..
        } => {
            let head = if *whole { "integer" } else { "real" };
            out.push(format!(
                "{}{}({}min={}, max={})",
                pad,
                head,
                alias_prefix(schema),
                min,
                max
            ));
        }
        Schema::String {
            charset,
            fewest,
            most,
            ..
        } => out.push(format!(
            "{}string({}charset={}, fewest={}, most={})",
            pad,
            alias_prefix(schema),
            charset.name(),
            fewest,
            most
        )),
        Schema::Collection {
            items,
            fewest,
            most,
            ordered,
            ..
        } => {
            match schema.alias() {
                Some(name) => out.push(format!("{}collection(alias={},", pad, name)),
                None => out.push(format!("{}collection(", pad)),
            }
            let mut inner = Vec::new();
            render(items, depth + 1, &mut inner);
            prefix_first(&mut inner, &format!("{}{}items=", pad, INDENT));
            append_comma(&mut inner);
            out.extend(inner);
            out.push(format!("{}{}fewest={},", pad, INDENT, fewest));
            out.push(format!("{}{}most={},", pad, INDENT, most));
            out.push(format!("{}{}ordered={})", pad, INDENT, ordered));
        }
        Schema::Record { fields, .. } => {
            match schema.alias() {
                Some(name) => out.push(format!("{}record(alias={},", pad, name)),
                None => out.push(format!("{}record(", pad)),
            }
            let count = fields.len();
            for (i, (name, field)) in fields.iter().enumerate() {
                let mut inner = Vec::new();
                render(field, depth + 1, &mut inner);
                prefix_first(&mut inner, &format!("{}{}{}=", pad, INDENT, name));
                if i + 1 < count {
                    append_comma(&mut inner);
                } else {
                    append_close(&mut inner);
                }
                out.extend(inner);
            }
        }
        Schema::Union { possibilities } => {
            out.push(format!("{}union(", pad));
            let count = possibilities.len();
            for (i, possibility) in possibilities.iter().enumerate() {
                let mut inner = Vec::new();
                render(possibility, depth + 1, &mut inner);
                if i + 1 < count {
                    append_comma(&mut inner);
                } else {
                    append_close(&mut inner);
                }
                out.extend(inner);
            }
        }
        Schema::Alias(name) => out.push(format!("{}{}", pad, name)),
        Schema::Ref(r) => out.push(format!("{}{}", pad, r.name())),
    }
}

/// Replace the indentation of the first rendered line with a `key=` label
fn prefix_first(lines: &mut [String], label: &str) {
    if let Some(first) = lines.first_mut() {
        let stripped = first.trim_start().to_string();
        *first = format!("{}{}", label, stripped);
    }
}

fn append_comma(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        last.push(',');
    }
}

fn append_close(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        last.push(')');
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pretty(self))
    }
}
