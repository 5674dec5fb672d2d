//! `ScriptField_<Record>` classes.
//!
//! One class per record type defined by a script. It mirrors an
//! allocation of records on the host: an `Item` per element, a packer
//! holding the serialized allocation, per-field accessors that can push a
//! single field to the runtime, and the runtime element describing the
//! record.

use rsc_export::TargetApi;
use rsc_types::{ExportKind, Field, TypeId, TypePool};

use crate::element::ElementLayout;
use crate::names::{java_default_value, java_type_name, ITEM_CLASS, TYPE_CLASS_PREFIX};
use crate::pack::PackPlan;
use crate::writer::{Access, JavaWriter};

const SUPER_CLASS: &str = "android.renderscript.Script.FieldBase";
const ITEM_ARRAY: &str = "mItemArray";
const IO_BUFFER: &str = "mIOBuffer";

pub fn class_name(pool: &TypePool, ty: TypeId) -> String {
    format!("{TYPE_CLASS_PREFIX}{}", pool.name(ty))
}

/// Emit the class for record `ty` after the file prologue.
pub fn write_type_class(pool: &TypePool, ty: TypeId, api: TargetApi, w: &mut JavaWriter) {
    let Some(record) = pool.get(ty).as_record() else {
        return;
    };
    let name = class_name(pool, ty);
    tracing::debug!(class = %name, fields = record.fields.len(), "writing type class");

    w.open(format!("public class {name} extends {SUPER_CLASS}"));
    write_item_class(pool, ty, &record.fields, w);

    w.line(format!("private {ITEM_CLASS} {ITEM_ARRAY}[];"));
    w.line(format!("private FieldPacker {IO_BUFFER};"));

    let layout = ElementLayout::new(pool, ty, api, "rs", w);
    w.open("public static Element createElement(RenderScript rs)");
    w.line("Element.Builder eb = new Element.Builder(rs);");
    layout.render(w, "eb");
    w.line("return eb.create();");
    w.close();

    write_constructors(&name, w);
    write_copy_to_array(pool, ty, w);
    write_set_get(w);
    for (i, field) in record.fields.iter().enumerate() {
        write_field_accessors(pool, field, layout.field_entry(i).unwrap_or_default(), w);
    }
    write_copy_all(w);
    write_resize(w);
    w.close();
}

fn write_item_class(pool: &TypePool, ty: TypeId, fields: &[Field], w: &mut JavaWriter) {
    w.open(format!("static public class {ITEM_CLASS}"));
    w.line(format!(
        "public static final int sizeof = {};",
        pool.get(ty).alloc_size()
    ));
    w.blank();
    for field in fields {
        w.line(format!("public {} {};", java_type_name(pool, field.ty), field.name));
    }
    w.blank();
    w.open_method(Access::Public, None, ITEM_CLASS, &[]);
    for field in fields {
        if let Some(init) = new_value(pool, field.ty) {
            w.line(format!("{} = {init};", field.name));
        }
    }
    w.close();
    w.close();
}

/// Constructor expression for fields that hold a Java object by default.
fn new_value(pool: &TypePool, ty: TypeId) -> Option<String> {
    match pool.get(ty).kind() {
        ExportKind::Vector(_) | ExportKind::Record(_) => {
            Some(format!("new {}()", java_type_name(pool, ty)))
        }
        ExportKind::ConstantArray(_) => {
            let mut dims = String::new();
            let mut element = ty;
            while let Some(array) = pool.get(element).as_array() {
                dims.push_str(&format!("[{}]", array.size));
                element = array.element;
            }
            Some(format!("new {}{dims}", java_type_name(pool, element)))
        }
        ExportKind::Primitive(_) | ExportKind::Pointer(_) | ExportKind::Matrix(_) => None,
    }
}

fn write_constructors(name: &str, w: &mut JavaWriter) {
    let rs = ("RenderScript".to_owned(), "rs".to_owned());
    let count = ("int".to_owned(), "count".to_owned());
    let usages = ("int".to_owned(), "usages".to_owned());

    w.open_method(Access::Public, None, name, &[rs.clone(), count.clone()]);
    w.line(format!("{ITEM_ARRAY} = null;"));
    w.line(format!("{IO_BUFFER} = null;"));
    w.line("mElement = createElement(rs);");
    w.line("init(rs, count);");
    w.close();

    w.open_method(Access::Public, None, name, &[rs, count, usages]);
    w.line(format!("{ITEM_ARRAY} = null;"));
    w.line(format!("{IO_BUFFER} = null;"));
    w.line("mElement = createElement(rs);");
    w.line("init(rs, count, usages);");
    w.close();
}

fn ensure_buffer(w: &mut JavaWriter) {
    w.line(format!(
        "if ({IO_BUFFER} == null) {IO_BUFFER} = new FieldPacker({ITEM_CLASS}.sizeof * getType().getX());"
    ));
}

fn ensure_items(w: &mut JavaWriter) {
    w.line(format!(
        "if ({ITEM_ARRAY} == null) {ITEM_ARRAY} = new {ITEM_CLASS}[getType().getX()];"
    ));
}

fn write_copy_to_array(pool: &TypePool, ty: TypeId, w: &mut JavaWriter) {
    let item = (ITEM_CLASS.to_owned(), "i".to_owned());
    w.open_method(
        Access::Private,
        Some("void"),
        "copyToArrayLocal",
        &[item.clone(), ("FieldPacker".to_owned(), "fp".to_owned())],
    );
    PackPlan::new(pool, ty, Some("i")).render(w, "fp");
    w.close();

    w.open_method(
        Access::Private,
        Some("void"),
        "copyToArray",
        &[item, ("int".to_owned(), "index".to_owned())],
    );
    ensure_buffer(w);
    w.line(format!("{IO_BUFFER}.reset(index * {ITEM_CLASS}.sizeof);"));
    w.line(format!("copyToArrayLocal(i, {IO_BUFFER});"));
    w.close();
}

fn write_set_get(w: &mut JavaWriter) {
    w.open_method(
        Access::Public,
        Some("synchronized void"),
        "set",
        &[
            (ITEM_CLASS.to_owned(), "i".to_owned()),
            ("int".to_owned(), "index".to_owned()),
            ("boolean".to_owned(), "copyNow".to_owned()),
        ],
    );
    ensure_items(w);
    w.line(format!("{ITEM_ARRAY}[index] = i;"));
    w.open("if (copyNow)");
    w.line("copyToArray(i, index);");
    w.line(format!("FieldPacker fp = new FieldPacker({ITEM_CLASS}.sizeof);"));
    w.line("copyToArrayLocal(i, fp);");
    w.line("mAllocation.setFromFieldPacker(index, fp);");
    w.close_tight();
    w.close();

    w.open_method(
        Access::Public,
        Some(&format!("synchronized {ITEM_CLASS}")),
        "get",
        &[("int".to_owned(), "index".to_owned())],
    );
    w.line(format!("if ({ITEM_ARRAY} == null) return null;"));
    w.line(format!("return {ITEM_ARRAY}[index];"));
    w.close();
}

fn write_field_accessors(pool: &TypePool, field: &Field, entry: u32, w: &mut JavaWriter) {
    let ty = java_type_name(pool, field.ty);
    let name = &field.name;

    w.open_method(
        Access::Public,
        Some("synchronized void"),
        &format!("set_{name}"),
        &[
            ("int".to_owned(), "index".to_owned()),
            (ty.clone(), "v".to_owned()),
            ("boolean".to_owned(), "copyNow".to_owned()),
        ],
    );
    ensure_buffer(w);
    ensure_items(w);
    w.line(format!(
        "if ({ITEM_ARRAY}[index] == null) {ITEM_ARRAY}[index] = new {ITEM_CLASS}();"
    ));
    w.line(format!("{ITEM_ARRAY}[index].{name} = v;"));
    w.open("if (copyNow)");
    w.line(format!(
        "{IO_BUFFER}.reset(index * {ITEM_CLASS}.sizeof + {});",
        field.offset
    ));
    let plan = PackPlan::new(pool, field.ty, Some("v"));
    plan.render(w, IO_BUFFER);
    w.line(format!(
        "FieldPacker fp = new FieldPacker({});",
        pool.get(field.ty).alloc_size()
    ));
    plan.render(w, "fp");
    w.line(format!("mAllocation.subElementData(index, {entry}, fp);"));
    w.close_tight();
    w.close();

    w.open_method(
        Access::Public,
        Some(&format!("synchronized {ty}")),
        &format!("get_{name}"),
        &[("int".to_owned(), "index".to_owned())],
    );
    w.line(format!(
        "if ({ITEM_ARRAY} == null) return {};",
        java_default_value(pool, field.ty)
    ));
    w.line(format!("return {ITEM_ARRAY}[index].{name};"));
    w.close();
}

fn write_copy_all(w: &mut JavaWriter) {
    w.open_method(Access::Public, Some("synchronized void"), "copyAll", &[]);
    w.line(format!(
        "for (int ct = 0; ct < {ITEM_ARRAY}.length; ct++) copyToArray({ITEM_ARRAY}[ct], ct);"
    ));
    w.line(format!("mAllocation.setFromFieldPacker(0, {IO_BUFFER});"));
    w.close();
}

fn write_resize(w: &mut JavaWriter) {
    w.open_method(
        Access::Public,
        Some("synchronized void"),
        "resize",
        &[("int".to_owned(), "newSize".to_owned())],
    );
    w.open(format!("if ({ITEM_ARRAY} != null)"));
    w.line(format!("int oldSize = {ITEM_ARRAY}.length;"));
    w.line("int copySize = Math.min(oldSize, newSize);");
    w.line("if (newSize == oldSize) return;");
    w.line(format!("{ITEM_CLASS} ni[] = new {ITEM_CLASS}[newSize];"));
    w.line(format!("System.arraycopy({ITEM_ARRAY}, 0, ni, 0, copySize);"));
    w.line(format!("{ITEM_ARRAY} = ni;"));
    w.close();
    w.line("mAllocation.resize(newSize);");
    w.blank();
    w.line(format!(
        "if ({IO_BUFFER} != null) {IO_BUFFER} = new FieldPacker({ITEM_CLASS}.sizeof * getType().getX());"
    ));
    w.close();
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
