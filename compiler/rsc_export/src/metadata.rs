//! Native-side export tables.
//!
//! The native runtime finds exported symbols by slot through a handful of
//! named tables emitted next to the compiled kernel. [`ExportMetadata`]
//! collects them for one unit; rendering is one line per table:
//!
//! ```text
//! #rs_export_var = {"count", "gain"}
//! #rs_export_foreach = {"root":0, "blur":3}
//! %Point = {"x":float, "y":float}
//! ```

use std::fmt;

use rsc_types::{ExportKind, TypeId, TypePool};
use rustc_hash::FxHashSet;

use crate::context::{Context, ScriptUnit, UnitId};

/// Field table of one exported record.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct RecordMetadata {
    pub name: String,
    /// Field names and canonical type names, in declaration order.
    pub fields: Vec<(String, String)>,
}

/// Export tables of one unit, each in slot order.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ExportMetadata {
    pub vars: Vec<String>,
    pub funcs: Vec<String>,
    /// Name and signature encoding; slot 0 may be the placeholder.
    pub foreach: Vec<(String, u32)>,
    pub reduce: Vec<String>,
    /// Non-artificial records reachable from the unit's exportables.
    pub types: Vec<RecordMetadata>,
}

impl ExportMetadata {
    /// Collect the tables for `id`.
    pub fn collect(ctx: &Context, id: UnitId) -> Self {
        let unit = ctx.unit(id);
        let pool = ctx.types();
        let metadata = ExportMetadata {
            vars: unit.vars().iter().map(|v| v.name.clone()).collect(),
            funcs: unit.funcs().iter().map(|f| f.name.clone()).collect(),
            foreach: unit
                .foreach()
                .iter()
                .map(|k| (k.name.clone(), k.signature.encoding()))
                .collect(),
            reduce: unit.reduce().iter().map(|r| r.name.clone()).collect(),
            types: reachable_records(pool, unit)
                .into_iter()
                .map(|ty| record_metadata(pool, ty))
                .collect(),
        };
        tracing::trace!(
            file = unit.file_name(),
            types = metadata.types.len(),
            "collected export metadata"
        );
        metadata
    }
}

fn record_metadata(pool: &TypePool, ty: TypeId) -> RecordMetadata {
    let fields = pool
        .get(ty)
        .as_record()
        .map(|record| {
            record
                .fields
                .iter()
                .map(|f| (f.name.clone(), pool.name(f.ty).to_owned()))
                .collect()
        })
        .unwrap_or_default();
    RecordMetadata {
        name: pool.name(ty).to_owned(),
        fields,
    }
}

/// Records used by the unit, in first-use order. Artificial packets are
/// walked through but not listed.
fn reachable_records(pool: &TypePool, unit: &ScriptUnit) -> Vec<TypeId> {
    let roots = unit
        .vars()
        .iter()
        .map(|v| Some(v.ty))
        .chain(unit.funcs().iter().map(|f| f.packet))
        .chain(
            unit.foreach()
                .iter()
                .flat_map(|k| [k.input, k.output, k.packet]),
        )
        .chain(unit.reduce().iter().map(|r| Some(r.ty)))
        .chain(unit.forced_types().iter().copied().map(Some))
        .flatten();

    let mut seen = FxHashSet::default();
    let mut records = Vec::new();
    for root in roots {
        visit(pool, root, &mut seen, &mut records);
    }
    records
}

fn visit(pool: &TypePool, ty: TypeId, seen: &mut FxHashSet<TypeId>, out: &mut Vec<TypeId>) {
    if !seen.insert(ty) {
        return;
    }
    match pool.get(ty).kind() {
        ExportKind::Pointer(p) => visit(pool, p.pointee, seen, out),
        ExportKind::ConstantArray(a) => visit(pool, a.element, seen, out),
        ExportKind::Record(r) => {
            if !r.artificial {
                out.push(ty);
            }
            for field in &r.fields {
                visit(pool, field.ty, seen, out);
            }
        }
        ExportKind::Primitive(_) | ExportKind::Vector(_) | ExportKind::Matrix(_) => {}
    }
}

struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

fn write_table<T>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    items: &[T],
    mut item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    write!(f, "{name} = {{")?;
    for (i, it) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item(f, it)?;
    }
    writeln!(f, "}}")
}

impl fmt::Display for ExportMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_table(f, "#rs_export_var", &self.vars, |f, v| write!(f, "{}", Quoted(v)))?;
        write_table(f, "#rs_export_func", &self.funcs, |f, v| write!(f, "{}", Quoted(v)))?;
        write_table(f, "#rs_export_foreach", &self.foreach, |f, (name, bits)| {
            write!(f, "{}:{bits}", Quoted(name))
        })?;
        write_table(f, "#rs_export_reduce", &self.reduce, |f, v| write!(f, "{}", Quoted(v)))?;
        write_table(f, "#rs_export_type", &self.types, |f, r| {
            write!(f, "{}", Quoted(&r.name))
        })?;
        for record in &self.types {
            write_table(f, &format!("%{}", record.name), &record.fields, |f, (name, ty)| {
                write!(f, "{}:{ty}", Quoted(name))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
