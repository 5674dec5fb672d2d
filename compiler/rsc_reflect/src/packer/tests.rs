use pretty_assertions::assert_eq;
use rsc_types::{BuiltinKind, SourceField, SourceTypes, TypePool};

use super::*;

#[test]
fn writes_little_endian() {
    let mut fp = FieldPacker::new(8);
    fp.add_bits(2, 0x1234).unwrap();
    fp.skip(2).unwrap();
    fp.add_bits(4, 0xdead_beef).unwrap();
    assert_eq!(fp.data(), &[0x34, 0x12, 0, 0, 0xef, 0xbe, 0xad, 0xde]);
    assert_eq!(fp.read_bits(4, 4), Some(0xdead_beef));
    assert_eq!(fp.read_bits(6, 4), None);
    fp.reset();
    assert_eq!(fp.position(), 0);
}

#[test]
fn overflow_is_an_error() {
    let mut fp = FieldPacker::new(3);
    let err = fp.add_bits(4, 1).unwrap_err();
    assert_eq!(
        err,
        PackOverflow {
            position: 0,
            needed: 4,
            capacity: 3
        }
    );
    assert_eq!(fp.position(), 0);
}

#[test]
fn loop_counters_are_substituted() {
    let mut src = SourceTypes::new();
    let short = src.builtin(BuiltinKind::Short);
    let arr = src.constant_array(short, 3);
    let s = src.record("S", vec![SourceField::new("xs", arr)]);
    let mut pool = TypePool::default();
    let s = pool.intern(&src, s).unwrap();

    let plan = PackPlan::new(&pool, s, Some("v"));
    let mut fp = FieldPacker::new(6);
    let mut seen = Vec::new();
    execute(&plan, &mut fp, &mut |expr, lane| {
        seen.push((expr.to_owned(), lane));
        seen.len() as u64
    })
    .unwrap();
    assert_eq!(
        seen,
        vec![
            ("v.xs[0]".to_owned(), 0),
            ("v.xs[1]".to_owned(), 0),
            ("v.xs[2]".to_owned(), 0),
        ]
    );
    assert_eq!(fp.data(), &[1, 0, 2, 0, 3, 0]);
}
