use pretty_assertions::assert_eq;

use super::*;

#[test]
fn bit_positions_are_fixed() {
    assert_eq!(ForEachSignature::IN.bits(), 1);
    assert_eq!(ForEachSignature::OUT.bits(), 2);
    assert_eq!(ForEachSignature::USR_DATA.bits(), 4);
    assert_eq!(ForEachSignature::X.bits(), 8);
    assert_eq!(ForEachSignature::Y.bits(), 16);
}

#[test]
fn in_out_encodes_as_three() {
    let sig = ForEachSignature::IN | ForEachSignature::OUT;
    assert_eq!(sig.encoding(), 0b00011);
    assert!(sig.has_in() && sig.has_out());
    assert!(!sig.has_usr_data() && !sig.has_x() && !sig.has_y());
}

#[test]
fn legacy_accepts_only_strict_prefixes() {
    let prefixes = [
        ForEachSignature::IN,
        ForEachSignature::IN | ForEachSignature::OUT,
        ForEachSignature::IN | ForEachSignature::OUT | ForEachSignature::USR_DATA,
        ForEachSignature::all().difference(ForEachSignature::Y),
        ForEachSignature::all(),
    ];
    for sig in prefixes {
        assert!(sig.is_legacy_compatible(), "{sig:?}");
    }

    let gaps = [
        ForEachSignature::OUT,
        ForEachSignature::IN | ForEachSignature::X,
        ForEachSignature::OUT | ForEachSignature::X | ForEachSignature::Y,
        ForEachSignature::empty(),
    ];
    for sig in gaps {
        assert!(!sig.is_legacy_compatible(), "{sig:?}");
    }
}
