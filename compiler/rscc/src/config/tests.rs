use pretty_assertions::assert_eq;

use super::*;

#[test]
fn defaults() {
    let config = ReflectConfig::default();
    assert_eq!(config.target_api, TargetApi::Development);
    assert_eq!(config.rs_package_name, "android.renderscript");
    assert_eq!(config.abi, Abi::TARGET_32);
    assert_eq!(config.error_limit, 20);
    assert_eq!(config.reflect_options(), ReflectOptions::default());
}

#[test]
fn target_level_below_minimum_is_rejected() {
    assert_eq!(
        ReflectConfig::new().with_target_level(10).unwrap_err(),
        UnsupportedTargetApi(10)
    );
    let config = ReflectConfig::new().with_target_level(16).unwrap();
    assert_eq!(config.target_api, TargetApi::Level(16));
}

#[test]
fn overrides_reach_the_generator() {
    let config = ReflectConfig::new()
        .with_package_name("com.example")
        .with_license_note("MIT")
        .with_rs_package_name("android.support.v8.renderscript");
    let options = config.reflect_options();
    assert_eq!(options.package_name.as_deref(), Some("com.example"));
    assert_eq!(options.license_note.as_deref(), Some("MIT"));
    assert_eq!(options.rs_package_name, "android.support.v8.renderscript");
}

#[test]
fn error_limit_flows_into_the_queue() {
    let config = ReflectConfig::new().with_error_limit(0);
    assert_eq!(config.diagnostic_config().error_limit, 0);
    assert!(config.diagnostic_config().deduplicate);
}
