use pretty_assertions::assert_eq;

use super::*;

#[test]
fn levels_below_minimum_are_rejected() {
    assert_eq!(TargetApi::level(10), Err(UnsupportedTargetApi(10)));
    assert_eq!(TargetApi::level(11), Ok(TargetApi::Level(11)));
    assert_eq!(
        UnsupportedTargetApi(9).to_string(),
        "target API 9 is not supported (minimum is 11)"
    );
}

#[test]
fn development_is_newest() {
    assert!(TargetApi::Development > TargetApi::Level(23));
    assert!(TargetApi::Level(14) < TargetApi::Level(16));
    assert_eq!(TargetApi::default(), TargetApi::Development);
}

#[test]
fn feature_gates() {
    assert!(TargetApi::Level(14).is_legacy_foreach());
    assert!(!TargetApi::Level(16).is_legacy_foreach());
    assert!(TargetApi::Level(16).infers_foreach());
    assert!(!TargetApi::Level(23).supports_reduce());
    assert!(TargetApi::Development.supports_reduce());
}

#[test]
fn display() {
    assert_eq!(TargetApi::Level(21).to_string(), "21");
    assert_eq!(TargetApi::Development.to_string(), "development");
}
