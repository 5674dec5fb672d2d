//! Runtime element descriptions of records.
//!
//! The host describes a record to the runtime as a flat list of named
//! sub-elements. Alignment gaps and tail padding become `#padding_N`
//! entries so the element's size matches the native alloc size, and every
//! entry (padding included) takes one sub-element index.
//!
//! Runtimes from ICS on size 3-component vector elements like 4-component
//! ones; older targets need the vector's tail padding spelled out.

use rsc_export::TargetApi;
use rsc_types::{ExportKind, TypeId, TypePool};

use crate::names::element_expr;
use crate::writer::JavaWriter;

/// One `eb.add(...)` call.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ElementEntry {
    pub name: String,
    /// Java expression creating the sub-element.
    pub expr: String,
    /// Element count for array fields.
    pub array_size: Option<u32>,
}

/// Sub-elements of one record, in builder order.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ElementLayout {
    entries: Vec<ElementEntry>,
    /// Entry index of each record field, in field order.
    field_entries: Vec<u32>,
}

impl ElementLayout {
    /// Lay out the sub-elements of record `ty`, drawing padding names from
    /// `w` and creating elements against the `RenderScript` variable `rs`.
    pub fn new(
        pool: &TypePool,
        ty: TypeId,
        api: TargetApi,
        rs: &str,
        w: &mut JavaWriter,
    ) -> Self {
        let pad_fields = api.number() < TargetApi::ICS;
        let export = pool.get(ty);
        let mut layout = ElementLayout {
            entries: Vec::new(),
            field_entries: Vec::new(),
        };
        let Some(record) = export.as_record() else {
            return layout;
        };

        let mut pos = 0;
        for field in &record.fields {
            let field_ty = pool.get(field.ty);
            layout.padding(field.offset.saturating_sub(pos), rs, w);
            layout.field_entries.push(next_index(&layout.entries));
            layout.entries.push(ElementEntry {
                name: field.name.clone(),
                expr: element_expr(pool, field.ty, rs),
                array_size: flat_array_size(pool, field.ty),
            });
            if pad_fields {
                layout.padding(field_ty.alloc_size() - field_ty.store_size(), rs, w);
            }
            pos = field.offset + field_ty.alloc_size();
        }
        layout.padding(export.alloc_size().saturating_sub(pos), rs, w);
        layout
    }

    pub fn entries(&self) -> &[ElementEntry] {
        &self.entries
    }

    /// Sub-element index of field `i`.
    pub fn field_entry(&self, i: usize) -> Option<u32> {
        self.field_entries.get(i).copied()
    }

    /// Emit the builder calls on `eb`.
    pub fn render(&self, w: &mut JavaWriter, eb: &str) {
        for entry in &self.entries {
            match entry.array_size {
                Some(n) => w.line(format!("{eb}.add({}, \"{}\", {n});", entry.expr, entry.name)),
                None => w.line(format!("{eb}.add({}, \"{}\");", entry.expr, entry.name)),
            }
        }
    }

    fn padding(&mut self, mut size: u32, rs: &str, w: &mut JavaWriter) {
        while size > 0 {
            let (chunk, element) = match size {
                4.. => (4, "U32"),
                2 | 3 => (2, "U16"),
                _ => (1, "U8"),
            };
            self.entries.push(ElementEntry {
                name: w.next_padding(),
                expr: format!("Element.{element}({rs})"),
                array_size: None,
            });
            size -= chunk;
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "element count is bounded by the record's field count"
)]
fn next_index(entries: &[ElementEntry]) -> u32 {
    entries.len() as u32
}

/// Total element count of a (possibly nested) constant array.
fn flat_array_size(pool: &TypePool, ty: TypeId) -> Option<u32> {
    match pool.get(ty).kind() {
        ExportKind::ConstantArray(a) => Some(
            flat_array_size(pool, a.element).map_or(a.size, |inner| a.size.saturating_mul(inner)),
        ),
        _ => None,
    }
}
