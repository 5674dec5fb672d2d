use pretty_assertions::assert_eq;

use super::*;

#[test]
fn display_matches_as_str() {
    for code in ErrorCode::ALL {
        assert_eq!(code.to_string(), code.as_str());
    }
}

#[test]
fn from_str_round_trips_every_code() {
    for code in ErrorCode::ALL {
        let parsed: ErrorCode = code.as_str().parse().unwrap();
        assert_eq!(parsed, *code);
    }
}

#[test]
fn from_str_rejects_unknown_code() {
    assert!("E0000".parse::<ErrorCode>().is_err());
    assert!("".parse::<ErrorCode>().is_err());
}

#[test]
fn every_code_belongs_to_exactly_one_phase() {
    for code in ErrorCode::ALL {
        let phases = [
            code.is_type_error(),
            code.is_odr_error(),
            code.is_kernel_error(),
            code.is_export_error(),
            code.is_reflect_error(),
            code.is_internal_error(),
        ];
        assert_eq!(
            phases.iter().filter(|p| **p).count(),
            1,
            "{code} should be classified into one phase"
        );
    }
}

#[test]
fn warnings_are_export_codes() {
    let warnings: Vec<_> = ErrorCode::ALL.iter().filter(|c| c.is_warning()).collect();
    assert_eq!(warnings, vec![&ErrorCode::E4001, &ErrorCode::E4004]);
}
