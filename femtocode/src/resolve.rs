//! Alias resolution: tying named schema trees into cyclic references.
//!
//! Declarations arrive as finite trees in which a node may carry an alias
//! and an [`Schema::Alias`] leaf names one. Resolution binds every name
//! to a shared write-once cell, substitutes each alias leaf with a
//! [`Schema::Ref`] over that cell, and then fills the cells — after which
//! a reference inside a definition can point back at the definition
//! itself. Resolving an already-resolved schema is a no-op.

use crate::error::FemtocodeError;
use crate::pretty;
use crate::schema::{Schema, SchemaRef};
use crate::setops::union_list;
use crate::FemtoResult;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::sync::Arc;

type Cells = BTreeMap<String, Arc<OnceCell<Schema>>>;

/// Resolve a group of schema declarations together. Definitions in one
/// root are visible to alias leaves in every other; a top-level alias
/// root is replaced by its referent.
pub fn resolve(schemas: &[Schema]) -> FemtoResult<Vec<Schema>> {
    let mut definitions = BTreeMap::new();
    for schema in schemas {
        collect(schema, &mut definitions)?;
    }

    let cells: Cells = definitions
        .keys()
        .map(|name| (name.clone(), Arc::new(OnceCell::new())))
        .collect();
    for (name, definition) in &definitions {
        let tied = substitute(definition, &cells)?;
        // fresh cells, so the only writer is this loop
        let _ = cells[name].set(tied);
    }

    let mut out = Vec::with_capacity(schemas.len());
    for schema in schemas {
        match schema {
            Schema::Alias(name) => match cells.get(name).and_then(|cell| cell.get()) {
                Some(target) => out.push(target.clone()),
                None => return Err(undefined(name)),
            },
            other => out.push(substitute(other, &cells)?),
        }
    }
    Ok(out)
}

fn undefined(name: &str) -> FemtocodeError {
    FemtocodeError::resolution(format!("alias \"{}\" is not defined", name))
}

/// Gather every aliased node in the tree. Binding one name to two
/// different definitions is an error, reported as a side-by-side diff.
fn collect(schema: &Schema, definitions: &mut BTreeMap<String, Schema>) -> FemtoResult<()> {
    if let Some(name) = schema.alias() {
        if let Some(existing) = definitions.get(name) {
            if existing != schema {
                return Err(FemtocodeError::resolution(format!(
                    "alias \"{}\" is bound to two different schemas:\n{}",
                    name,
                    pretty::compare(existing, schema)
                )));
            }
        } else {
            definitions.insert(name.to_string(), schema.clone());
        }
    }
    match schema {
        Schema::Collection {
            items, absorbed, ..
        } => {
            collect(items, definitions)?;
            for schema in absorbed {
                collect(schema, definitions)?;
            }
            Ok(())
        }
        Schema::Record { fields, .. } => {
            for field in fields.values() {
                collect(field, definitions)?;
            }
            Ok(())
        }
        Schema::Union { possibilities } => {
            for possibility in possibilities {
                collect(possibility, definitions)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Clone a tree, turning alias leaves into references. Union members are
/// re-unioned afterward, since resolved alternatives may now simplify.
fn substitute(schema: &Schema, cells: &Cells) -> FemtoResult<Schema> {
    match schema {
        Schema::Alias(name) => match cells.get(name) {
            Some(cell) => Ok(Schema::Ref(SchemaRef::new(name.clone(), cell.clone()))),
            None => Err(undefined(name)),
        },
        Schema::Collection {
            alias,
            items,
            fewest,
            most,
            ordered,
            absorbed,
        } => Ok(Schema::Collection {
            alias: alias.clone(),
            items: Box::new(substitute(items, cells)?),
            fewest: *fewest,
            most: *most,
            ordered: *ordered,
            absorbed: absorbed
                .iter()
                .map(|schema| substitute(schema, cells))
                .collect::<FemtoResult<Vec<_>>>()?,
        }),
        Schema::Record { alias, fields } => Ok(Schema::Record {
            alias: alias.clone(),
            fields: fields
                .iter()
                .map(|(name, field)| Ok((name.clone(), substitute(field, cells)?)))
                .collect::<FemtoResult<BTreeMap<_, _>>>()?,
        }),
        Schema::Union { possibilities } => {
            let resolved = possibilities
                .iter()
                .map(|possibility| substitute(possibility, cells))
                .collect::<FemtoResult<Vec<_>>>()?;
            Ok(union_list(resolved))
        }
        other => Ok(other.clone()),
    }
}
