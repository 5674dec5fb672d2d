use pretty_assertions::assert_eq;
use rsc_diagnostic::{DiagnosticConfig, DiagnosticQueue};
use rsc_types::{BuiltinKind, SourceField};

use super::*;
use crate::decl::{FuncDecl, KernelAttr, ParamDecl, TranslationUnit, VarDecl};

fn sample() -> TranslationUnit {
    let mut tu = TranslationUnit::new("blur.rs");
    let src = &mut tu.types;
    let void = src.builtin(BuiltinKind::Void);
    let float = src.builtin(BuiltinKind::Float);
    let int = src.builtin(BuiltinKind::Int);
    let uchar = src.builtin(BuiltinKind::UChar);
    let vec4 = src.ext_vector(uchar, 4);
    let uchar4 = src.typedef("uchar4", vec4);
    let const_uchar4 = src.constant(uchar4);
    let in_ptr = src.pointer(const_uchar4);
    let out_ptr = src.pointer(uchar4);
    let point = src.record(
        "Point",
        vec![SourceField::new("x", float), SourceField::new("y", float)],
    );
    let segment = src.record(
        "Segment",
        vec![SourceField::new("a", point), SourceField::new("b", point)],
    );
    let const_segment = src.constant(segment);
    let segment_ptr = src.pointer(const_segment);

    tu.vars.push(VarDecl::new("radius", float));
    tu.vars.push(VarDecl::new("origin", point));
    tu.funcs.push(FuncDecl::new("reset", vec![ParamDecl::new("n", int)], void));
    tu.funcs.push(
        FuncDecl::new(
            "blur",
            vec![
                ParamDecl::new("in", in_ptr),
                ParamDecl::new("out", out_ptr),
                ParamDecl::new("seg", segment_ptr),
            ],
            void,
        )
        .with_kernel(KernelAttr::ForEach),
    );
    tu
}

fn collect(tu: &TranslationUnit) -> ExportMetadata {
    let mut ctx = Context::default();
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let id = ctx.process_unit(tu, &mut queue).unwrap();
    assert_eq!(queue.error_count(), 0);
    ExportMetadata::collect(&ctx, id)
}

#[test]
fn tables_follow_slot_order() {
    let metadata = collect(&sample());
    assert_eq!(metadata.vars, vec!["radius", "origin"]);
    assert_eq!(metadata.funcs, vec!["reset"]);
    assert_eq!(
        metadata.foreach,
        vec![("root".to_owned(), 0), ("blur".to_owned(), 0b00111)]
    );
    assert!(metadata.reduce.is_empty());
}

#[test]
fn types_are_reachable_records_only() {
    let metadata = collect(&sample());
    let names: Vec<_> = metadata.types.iter().map(|r| r.name.as_str()).collect();
    // Segment is only reachable through the user data packet.
    assert_eq!(names, vec!["Point", "Segment"]);
    assert_eq!(
        metadata.types[1].fields,
        vec![
            ("a".to_owned(), "Point".to_owned()),
            ("b".to_owned(), "Point".to_owned()),
        ]
    );
}

#[test]
fn renders_one_line_per_table() {
    let rendered = collect(&sample()).to_string();
    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"#rs_export_var = {"radius", "origin"}"#,
            r#"#rs_export_func = {"reset"}"#,
            r#"#rs_export_foreach = {"root":0, "blur":7}"#,
            r#"#rs_export_type = {"Point", "Segment"}"#,
            r#"%Point = {"x":float, "y":float}"#,
            r#"%Segment = {"a":Point, "b":Point}"#,
        ]
    );
}

#[test]
fn empty_unit_renders_nothing() {
    let metadata = collect(&TranslationUnit::new("empty.rs"));
    assert_eq!(metadata, ExportMetadata::default());
    assert_eq!(metadata.to_string(), "");
}
