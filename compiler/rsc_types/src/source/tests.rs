use pretty_assertions::assert_eq;

use super::*;

// ── Hash-consing ───────────────────────────────────────────────

#[test]
fn structural_types_are_deduplicated() {
    let mut types = SourceTypes::new();
    let int = types.builtin(BuiltinKind::Int);
    let a = types.pointer(int);
    let b = types.pointer(int);
    assert_eq!(a, b);
    assert_eq!(types.len(), 2);
}

#[test]
fn records_are_nominal() {
    let mut types = SourceTypes::new();
    let a = types.record("S", vec![]);
    let b = types.record("S", vec![]);
    assert_ne!(a, b);
}

#[test]
fn forward_declared_record_can_point_to_itself() {
    let mut types = SourceTypes::new();
    let node = types.declare_record("Node");
    let next = types.pointer(node);
    types.define_record(node, vec![SourceField::new("next", next)], false);

    let decl = types.record_decl_of(node).unwrap();
    assert!(decl.defined);
    assert_eq!(decl.fields[0].ty, next);
    assert_eq!(types.pointee(next), Some(node));
}

// ── Sugar ──────────────────────────────────────────────────────

#[test]
fn canonical_strips_typedefs_and_const() {
    let mut types = SourceTypes::new();
    let uchar = types.builtin(BuiltinKind::UChar);
    let vec4 = types.ext_vector(uchar, 4);
    let uchar4 = types.typedef("uchar4", vec4);
    let const_uchar4 = types.constant(uchar4);
    let pixel = types.typedef("rs_pixel_rgba", const_uchar4);

    assert_eq!(types.canonical(pixel), vec4);
    assert!(types.is_const(pixel));
    assert!(!types.is_const(uchar4));
    assert_eq!(types.typedef_names(pixel), vec!["rs_pixel_rgba", "uchar4"]);
}

#[test]
fn pointer_queries_see_through_typedefs() {
    let mut types = SourceTypes::new();
    let float = types.builtin(BuiltinKind::Float);
    let ptr = types.pointer(float);
    let alias = types.typedef("float_ptr", ptr);
    assert!(types.is_pointer(alias));
    assert_eq!(types.pointee(alias), Some(float));
    assert_eq!(types.builtin_kind(float), Some(BuiltinKind::Float));
    assert_eq!(types.builtin_kind(alias), None);
}

// ── Spelling ───────────────────────────────────────────────────

#[test]
fn spelling_reads_like_c() {
    let mut types = SourceTypes::new();
    let int = types.builtin(BuiltinKind::Int);
    let const_int = types.constant(int);
    let ptr = types.pointer(const_int);
    let arr = types.constant_array(int, 3);
    let flex = types.incomplete_array(int);
    let s = types.record("Point", vec![]);

    assert_eq!(types.spelling(ptr), "const int *");
    assert_eq!(types.spelling(arr), "int[3]");
    assert_eq!(types.spelling(flex), "int[]");
    assert_eq!(types.display(s).to_string(), "struct Point");
}

#[test]
fn unnamed_union_spelling() {
    let mut types = SourceTypes::new();
    let u = types.record_decl(RecordDecl {
        name: None,
        fields: vec![],
        packed: false,
        is_union: true,
        defined: true,
    });
    assert_eq!(types.spelling(u), "union <anonymous>");
    assert_eq!(types.kind(u).class_name(), "record");
}
