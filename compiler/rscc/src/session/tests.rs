use pretty_assertions::assert_eq;
use rsc_export::VarDecl;
use rsc_types::{BuiltinKind, SourceField};

use super::*;

/// A unit exporting one `Point` variable, with fields in the given order.
fn unit(file: &str, fields: [&str; 2]) -> TranslationUnit {
    let mut tu = TranslationUnit::new(file);
    let float = tu.types.builtin(BuiltinKind::Float);
    let point = tu.types.record(
        "Point",
        fields.iter().map(|f| SourceField::new(*f, float)).collect(),
    );
    tu.vars.push(VarDecl::new("p", point));
    tu.pragmas.java_package_name = Some("com.example".to_owned());
    tu
}

#[test]
fn units_are_processed_in_order() {
    let mut session = Session::new(ReflectConfig::default());
    let a = session.add(&unit("a.rs", ["x", "y"])).unwrap();
    let b = session.add(&unit("b.rs", ["x", "y"])).unwrap();
    assert_eq!((a.index(), b.index()), (0, 1));

    let output = session.finish().unwrap();
    let names: Vec<_> = output.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["ScriptC_a.java", "ScriptField_Point.java", "ScriptC_b.java"]
    );
    assert!(output.warnings.is_empty());
    assert_eq!(output.metadata.len(), 2);
    assert_eq!(output.metadata[1].vars, vec!["p".to_owned()]);
    assert_eq!(output.metadata[0].types[0].name, "Point");
}

#[test]
fn odr_violation_stops_the_session() {
    let mut session = Session::new(ReflectConfig::default());
    session.add(&unit("a.rs", ["x", "y"]));
    assert_eq!(session.add(&unit("b.rs", ["y", "x"])), None);
    assert!(session.is_aborted());
    assert_eq!(session.add(&unit("c.rs", ["x", "y"])), None);
    assert_eq!(session.context().units().len(), 1);

    let failure = session.finish().unwrap_err();
    assert_eq!(failure.error_count(), 1);
    assert_eq!(failure.diagnostics[0].code, ErrorCode::E2001);
}

#[test]
fn generator_errors_fail_the_run() {
    let mut tu = unit("a.rs", ["x", "y"]);
    tu.pragmas.java_package_name = None;
    let mut session = Session::new(ReflectConfig::default());
    session.add(&tu);

    let failure = session.finish().unwrap_err();
    assert_eq!(failure.diagnostics.len(), 1);
    assert_eq!(failure.diagnostics[0].code, ErrorCode::E5002);
    assert_eq!(failure.to_string(), "reflection failed with 1 error(s)");
}

#[test]
fn config_package_overrides_missing_pragma() {
    let mut tu = unit("a.rs", ["x", "y"]);
    tu.pragmas.java_package_name = None;
    let mut session = Session::new(ReflectConfig::new().with_package_name("org.demo"));
    session.add(&tu);

    let output = session.finish().unwrap();
    assert_eq!(output.files[0].relative_path(), "org/demo/ScriptC_a.java");
}
