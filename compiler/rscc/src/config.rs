//! Run configuration.

use rsc_diagnostic::DiagnosticConfig;
use rsc_export::{TargetApi, UnsupportedTargetApi};
use rsc_reflect::{ReflectOptions, DEFAULT_RS_PACKAGE};
use rsc_types::Abi;

/// Settings shared by every file of one reflection run.
///
/// Per-file settings (package, license, export lists) come from the pragmas
/// of each translation unit; the overrides here take precedence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReflectConfig {
    pub target_api: TargetApi,
    /// Package for every generated class, overriding `java_package_name`.
    pub package_name: Option<String>,
    /// License text for every generated file, overriding `#pragma rs license`.
    pub license_note: Option<String>,
    /// Package of the runtime classes the generated code imports.
    pub rs_package_name: String,
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    pub abi: Abi,
}

impl Default for ReflectConfig {
    fn default() -> Self {
        ReflectConfig {
            target_api: TargetApi::Development,
            package_name: None,
            license_note: None,
            rs_package_name: DEFAULT_RS_PACKAGE.to_owned(),
            error_limit: DiagnosticConfig::default().error_limit,
            abi: Abi::default(),
        }
    }
}

impl ReflectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a numbered API level. Levels before the first supported
    /// release are rejected.
    pub fn with_target_level(mut self, level: u32) -> Result<Self, UnsupportedTargetApi> {
        self.target_api = TargetApi::level(level)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_target_api(mut self, api: TargetApi) -> Self {
        self.target_api = api;
        self
    }

    #[must_use]
    pub fn with_package_name(mut self, package: impl Into<String>) -> Self {
        self.package_name = Some(package.into());
        self
    }

    #[must_use]
    pub fn with_license_note(mut self, license: impl Into<String>) -> Self {
        self.license_note = Some(license.into());
        self
    }

    #[must_use]
    pub fn with_rs_package_name(mut self, package: impl Into<String>) -> Self {
        self.rs_package_name = package.into();
        self
    }

    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }

    #[must_use]
    pub fn with_abi(mut self, abi: Abi) -> Self {
        self.abi = abi;
        self
    }

    pub(crate) fn diagnostic_config(&self) -> DiagnosticConfig {
        DiagnosticConfig {
            error_limit: self.error_limit,
            ..DiagnosticConfig::default()
        }
    }

    /// The subset the generator reads.
    pub(crate) fn reflect_options(&self) -> ReflectOptions {
        let mut options =
            ReflectOptions::default().with_rs_package_name(self.rs_package_name.as_str());
        if let Some(package) = &self.package_name {
            options = options.with_package_name(package.as_str());
        }
        if let Some(license) = &self.license_note {
            options = options.with_license_note(license.as_str());
        }
        options
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
