//! Reflection errors.

use rsc_diagnostic::{Diagnostic, ErrorCode, Location};

/// Host bindings could not be generated for a unit.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ReflectError {
    #[error("script name '{name}' of '{file}' is not a valid Java class name")]
    ClassName { file: String, name: String },
    #[error("'{package}' is not a valid Java package name")]
    PackageName { file: String, package: String },
    #[error("no Java package name for '{file}': add #pragma rs java_package_name(...) or pass one")]
    MissingPackage { file: String },
}

impl ReflectError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ReflectError::ClassName { .. } => ErrorCode::E5001,
            ReflectError::PackageName { .. } | ReflectError::MissingPackage { .. } => {
                ErrorCode::E5002
            }
        }
    }

    pub fn file(&self) -> &str {
        match self {
            ReflectError::ClassName { file, .. }
            | ReflectError::PackageName { file, .. }
            | ReflectError::MissingPackage { file } => file,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::for_code(self.code())
            .with_message(self.to_string())
            .with_location(Location::file(self.file()))
    }
}
