//! Generator settings.

/// Runtime package imported by generated classes unless overridden.
pub const DEFAULT_RS_PACKAGE: &str = "android.renderscript";

/// Settings for one reflection run.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ReflectOptions {
    /// Java package for every generated class; wins over the
    /// `java_package_name` pragma.
    pub package_name: Option<String>,
    /// License text put at the top of every file; wins over the `license`
    /// pragma.
    pub license_note: Option<String>,
    /// Package the runtime classes are imported from.
    pub rs_package_name: String,
}

impl Default for ReflectOptions {
    fn default() -> Self {
        ReflectOptions {
            package_name: None,
            license_note: None,
            rs_package_name: DEFAULT_RS_PACKAGE.to_owned(),
        }
    }
}

impl ReflectOptions {
    #[must_use]
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_license_note(mut self, note: impl Into<String>) -> Self {
        self.license_note = Some(note.into());
        self
    }

    #[must_use]
    pub fn with_rs_package_name(mut self, name: impl Into<String>) -> Self {
        self.rs_package_name = name.into();
        self
    }
}
