use pretty_assertions::assert_eq;

use super::*;

#[test]
fn first_registration_wins() {
    let mut odr = OdrRegistry::new();
    assert!(odr.register("S", TypeId::from_raw(3), "a.rs"));
    assert!(!odr.register("S", TypeId::from_raw(7), "b.rs"));
    let entry = odr.get("S").unwrap();
    assert_eq!(entry.ty, TypeId::from_raw(3));
    assert_eq!(entry.origin, "a.rs");
}

#[test]
fn entries_keep_registration_order() {
    let mut odr = OdrRegistry::new();
    odr.register("B", TypeId::from_raw(0), "a.rs");
    odr.register("A", TypeId::from_raw(1), "b.rs");
    odr.register("C", TypeId::from_raw(2), "a.rs");
    let names: Vec<&str> = odr.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A", "C"]);
    let from_a: Vec<&str> = odr.defined_in("a.rs").map(|e| e.name.as_str()).collect();
    assert_eq!(from_a, vec!["B", "C"]);
}

#[test]
fn forget_from_drops_later_registrations() {
    let mut odr = OdrRegistry::new();
    odr.register("A", TypeId::from_raw(0), "a.rs");
    odr.register("B", TypeId::from_raw(4), "a.rs");
    odr.register("C", TypeId::from_raw(2), "a.rs");
    odr.forget_from(2);
    assert!(odr.get("B").is_none());
    assert!(odr.get("C").is_none());
    assert_eq!(odr.get("A").unwrap().ty, TypeId::from_raw(0));
    assert_eq!(odr.entries().len(), 1);
    assert!(odr.register("C", TypeId::from_raw(5), "b.rs"));
    assert_eq!(odr.get("C").unwrap().origin, "b.rs");
}

#[test]
fn confirmation_is_per_origin() {
    let mut odr = OdrRegistry::new();
    odr.register("S", TypeId::from_raw(0), "a.rs");
    assert!(odr.is_confirmed("S", "a.rs"));
    assert!(!odr.is_confirmed("S", "b.rs"));
    odr.confirm("S", "b.rs");
    assert!(odr.is_confirmed("S", "b.rs"));
    assert!(!odr.is_confirmed("S", "c.rs"));
}

#[test]
fn mismatch_messages() {
    assert_eq!(
        OdrMismatch::FieldCount { first: 2, second: 3 }.to_string(),
        "field count differs (2 vs 3)"
    );
    assert_eq!(
        OdrMismatch::FieldType { field: "pos".into() }.to_string(),
        "field 'pos' has a different type"
    );
}
