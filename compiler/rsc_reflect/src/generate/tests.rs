use pretty_assertions::assert_eq;
use rsc_diagnostic::{DiagnosticConfig, DiagnosticQueue, ErrorCode};
use rsc_export::{TranslationUnit, VarDecl};
use rsc_types::{BuiltinKind, SourceField};

use super::*;

fn unit(file: &str, package: Option<&str>) -> TranslationUnit {
    let mut tu = TranslationUnit::new(file);
    let float = tu.types.builtin(BuiltinKind::Float);
    let point = tu.types.record(
        "Point",
        vec![SourceField::new("x", float), SourceField::new("y", float)],
    );
    tu.vars.push(VarDecl::new("origin", point));
    tu.pragmas.java_package_name = package.map(str::to_owned);
    tu
}

fn context(units: &[TranslationUnit]) -> (Context, Vec<UnitId>) {
    let mut ctx = Context::default();
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let ids = units
        .iter()
        .map(|tu| ctx.process_unit(tu, &mut queue).unwrap())
        .collect();
    assert_eq!(queue.error_count(), 0);
    (ctx, ids)
}

#[test]
fn script_and_type_classes() {
    let (ctx, ids) = context(&[unit("shapes/geo.rs", Some("com.example.geo"))]);
    let files = reflect(&ctx, ids[0], &ReflectOptions::default()).unwrap();
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["ScriptC_geo.java", "ScriptField_Point.java"]);
    assert_eq!(files[0].relative_path(), "com/example/geo/ScriptC_geo.java");

    let script = &files[0];
    assert!(script.lines.contains(&" * The source Renderscript file: geo.rs".to_owned()));
    assert!(script.lines.contains(&"package com.example.geo;".to_owned()));
    assert!(script.lines.contains(&"public class ScriptC_geo extends ScriptC {".to_owned()));
    assert!(script.contents().ends_with("}\n"));
    assert!(files[1]
        .lines
        .iter()
        .any(|l| l.starts_with("public class ScriptField_Point")));
}

#[test]
fn records_belong_to_the_first_defining_unit() {
    let (ctx, ids) = context(&[
        unit("a.rs", Some("pkg")),
        unit("b.rs", Some("pkg")),
    ]);
    let a = reflect(&ctx, ids[0], &ReflectOptions::default()).unwrap();
    let b = reflect(&ctx, ids[1], &ReflectOptions::default()).unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].name, "ScriptC_b.java");
}

#[test]
fn options_override_pragmas() {
    let mut tu = unit("a.rs", Some("from.pragma"));
    tu.pragmas.license = Some("Pragma license".to_owned());
    let (ctx, ids) = context(&[tu]);

    let files = reflect(&ctx, ids[0], &ReflectOptions::default()).unwrap();
    assert_eq!(files[0].package, "from.pragma");
    assert_eq!(files[0].lines[1], " * Pragma license");

    let options = ReflectOptions::default()
        .with_package_name("from.options")
        .with_license_note("Options license")
        .with_rs_package_name("android.support.v8.renderscript");
    let files = reflect(&ctx, ids[0], &options).unwrap();
    assert_eq!(files[0].package, "from.options");
    assert_eq!(files[0].lines[1], " * Options license");
    assert!(files[0]
        .lines
        .contains(&"import android.support.v8.renderscript.*;".to_owned()));
}

#[test]
fn default_license_without_note() {
    let (ctx, ids) = context(&[unit("a.rs", Some("pkg"))]);
    let files = reflect(&ctx, ids[0], &ReflectOptions::default()).unwrap();
    assert_eq!(
        files[0].lines[1],
        " * Copyright (C) 2011-2014 The Android Open Source Project"
    );
}

#[test]
fn invalid_names_are_rejected() {
    let (ctx, ids) = context(&[
        unit("my-script.rs", Some("pkg")),
        unit("ok.rs", None),
        unit("bad.rs", Some("com.1bad")),
    ]);
    let options = ReflectOptions::default();

    let err = reflect(&ctx, ids[0], &options).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5001);

    let err = reflect(&ctx, ids[1], &options).unwrap_err();
    assert_eq!(
        err,
        ReflectError::MissingPackage {
            file: "ok.rs".to_owned()
        }
    );

    let err = reflect(&ctx, ids[2], &options).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5002);
}
