use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

use super::*;
use crate::source::{BuiltinKind, RecordDecl, SourceField};

fn norm(src: &SourceTypes, ty: SourceTypeId) -> Result<String, Unexportable> {
    normalize(src, ty, &mut FxHashSet::default())
}

fn reason(src: &SourceTypes, ty: SourceTypeId) -> UnsupportedReason {
    norm(src, ty).unwrap_err().reason
}

// ── Names ──────────────────────────────────────────────────────

#[test]
fn builtin_names() {
    let mut src = SourceTypes::new();
    let cases = [
        (BuiltinKind::Bool, "bool"),
        (BuiltinKind::Char, "char"),
        (BuiltinKind::UChar, "uchar"),
        (BuiltinKind::UShort, "ushort"),
        (BuiltinKind::UInt, "uint"),
        (BuiltinKind::Long, "long"),
        (BuiltinKind::ULong, "ulong"),
        (BuiltinKind::Double, "double"),
    ];
    for (kind, expected) in cases {
        let ty = src.builtin(kind);
        assert_eq!(norm(&src, ty).unwrap(), expected);
    }
}

#[test]
fn typedef_and_const_are_transparent() {
    let mut src = SourceTypes::new();
    let int = src.builtin(BuiltinKind::Int);
    let c = src.constant(int);
    let alias = src.typedef("int32_t", c);
    assert_eq!(norm(&src, alias).unwrap(), "int");
}

#[test]
fn compound_names() {
    let mut src = SourceTypes::new();
    let float = src.builtin(BuiltinKind::Float);
    let bool_ty = src.builtin(BuiltinKind::Bool);
    let float4 = src.ext_vector(float, 4);
    let bool3 = src.ext_vector(bool_ty, 3);
    let ptr = src.pointer(float);
    let arr = src.constant_array(float, 10);
    let vec_arr = src.constant_array(float4, 2);

    assert_eq!(norm(&src, float4).unwrap(), "float4");
    assert_eq!(norm(&src, bool3).unwrap(), "char3");
    assert_eq!(norm(&src, ptr).unwrap(), "*float");
    assert_eq!(norm(&src, arr).unwrap(), "float[10]");
    assert_eq!(norm(&src, vec_arr).unwrap(), "float4[2]");
}

#[test]
fn records_use_their_declared_name() {
    let mut src = SourceTypes::new();
    let int = src.builtin(BuiltinKind::Int);
    let s = src.record("Point", vec![SourceField::new("x", int), SourceField::new("y", int)]);
    assert_eq!(norm(&src, s).unwrap(), "Point");
}

#[test]
fn pointer_to_pointer_is_accepted() {
    let mut src = SourceTypes::new();
    let int = src.builtin(BuiltinKind::Int);
    let p = src.pointer(int);
    let pp = src.pointer(p);
    assert_eq!(norm(&src, pp).unwrap(), "**int");
}

#[test]
fn object_and_matrix_records_are_accepted() {
    let mut src = SourceTypes::new();
    let alloc = src.record("rs_allocation", vec![]);
    let m = src.declare_record("rs_matrix4x4");
    assert_eq!(norm(&src, alloc).unwrap(), "rs_allocation");
    assert_eq!(norm(&src, m).unwrap(), "rs_matrix4x4");
}

#[test]
fn recursive_record_terminates() {
    let mut src = SourceTypes::new();
    let node = src.declare_record("Node");
    let next = src.pointer(node);
    let int = src.builtin(BuiltinKind::Int);
    src.define_record(
        node,
        vec![SourceField::new("value", int), SourceField::new("next", next)],
        false,
    );
    let mut visited = FxHashSet::default();
    assert_eq!(normalize(&src, node, &mut visited).unwrap(), "Node");
    assert!(visited.contains(&node));
}

// ── Rejections ─────────────────────────────────────────────────

#[test]
fn unsupported_builtins_are_rejected() {
    let mut src = SourceTypes::new();
    let half = src.builtin(BuiltinKind::Half);
    let err = norm(&src, half).unwrap_err();
    assert_eq!(err.reason, UnsupportedReason::Builtin(BuiltinKind::Half));
    assert_eq!(err.type_name, "half");
    assert!(err.path.is_empty());
}

#[test]
fn void_pointer_is_rejected() {
    let mut src = SourceTypes::new();
    let void = src.builtin(BuiltinKind::Void);
    let p = src.pointer(void);
    let err = norm(&src, p).unwrap_err();
    assert_eq!(err.reason, UnsupportedReason::Builtin(BuiltinKind::Void));
    assert_eq!(err.path, "<pointee>");
}

#[test]
fn bitfield_member_reports_its_path() {
    let mut src = SourceTypes::new();
    let int = src.builtin(BuiltinKind::Int);
    let inner = src.record("Flags", vec![SourceField::bit_field("ready", int, 1)]);
    let outer = src.record("Outer", vec![SourceField::new("flags", inner)]);
    let err = norm(&src, outer).unwrap_err();
    assert_eq!(err.reason, UnsupportedReason::Bitfield);
    assert_eq!(err.path, "flags.ready");
    assert_eq!(err.type_name, "struct Outer");
}

#[test]
fn flexible_array_member_is_rejected() {
    let mut src = SourceTypes::new();
    let int = src.builtin(BuiltinKind::Int);
    let flex = src.incomplete_array(int);
    let s = src.record("Buf", vec![SourceField::new("len", int), SourceField::new("data", flex)]);
    assert_eq!(reason(&src, s), UnsupportedReason::FlexibleArray);
}

#[test]
fn array_of_arrays_is_rejected() {
    let mut src = SourceTypes::new();
    let int = src.builtin(BuiltinKind::Int);
    let row = src.constant_array(int, 4);
    let grid = src.constant_array(row, 4);
    assert_eq!(reason(&src, grid), UnsupportedReason::ArrayOfArrays);
}

#[test]
fn vector_size_out_of_range_is_rejected() {
    let mut src = SourceTypes::new();
    let float = src.builtin(BuiltinKind::Float);
    let v8 = src.ext_vector(float, 8);
    let v1 = src.ext_vector(float, 1);
    assert_eq!(reason(&src, v8), UnsupportedReason::VectorSize(8));
    assert_eq!(reason(&src, v1), UnsupportedReason::VectorSize(1));
}

#[test]
fn object_member_is_rejected() {
    let mut src = SourceTypes::new();
    let alloc = src.record("rs_allocation", vec![]);
    let s = src.record("Holder", vec![SourceField::new("a", alloc)]);
    assert_eq!(reason(&src, s), UnsupportedReason::ObjectMember);
}

#[test]
fn unions_and_unnamed_records_are_rejected() {
    let mut src = SourceTypes::new();
    let union = src.record_decl(RecordDecl {
        name: Some("U".into()),
        fields: vec![],
        packed: false,
        is_union: true,
        defined: true,
    });
    let anon = src.record_decl(RecordDecl {
        name: None,
        fields: vec![],
        packed: false,
        is_union: false,
        defined: true,
    });
    assert_eq!(reason(&src, union), UnsupportedReason::Union);
    assert_eq!(reason(&src, anon), UnsupportedReason::Unnamed);
}

#[test]
fn undefined_record_is_rejected() {
    let mut src = SourceTypes::new();
    let s = src.declare_record("Opaque");
    assert_eq!(reason(&src, s), UnsupportedReason::Incomplete);
}

#[test]
fn enums_are_rejected() {
    let mut src = SourceTypes::new();
    let e = src.enumeration("Mode");
    assert_eq!(reason(&src, e), UnsupportedReason::Class("enum"));
}
