//! Error codes for all reflection diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the pass that reported it.

use std::fmt;

/// Error codes for all reflection diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Type export errors (classification, construction)
/// - E2xxx: Cross-file one-definition-rule errors
/// - E3xxx: Kernel signature errors
/// - E4xxx: Exported variable/function/pragma errors
/// - E5xxx: Host binding generation errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Type Export Errors (E1xxx)
    /// Type uses an unsupported shape
    E1001,
    /// Bit-field member in an exported record
    E1002,
    /// Matrix record does not wrap a single float array of the right size
    E1003,
    /// Constant array size is zero or does not fit 32 bits
    E1004,
    /// Record has no name
    E1005,
    /// Record is declared but never defined
    E1006,

    // ODR Errors (E2xxx)
    /// Two files define the same record name with different shapes
    E2001,

    // Kernel Signature Errors (E3xxx)
    /// Graphics `root` must return int
    E3001,
    /// ForEach kernel must return void
    E3002,
    /// Pointer parameter after a coordinate parameter
    E3003,
    /// Unexpected non-const pointer parameter
    E3004,
    /// Coordinate parameter is not uint32
    E3005,
    /// Too many ForEach parameters
    E3006,
    /// Duplicate or out-of-order `x`/`y` coordinate
    E3007,
    /// Parameter combination not accepted by the legacy target API
    E3008,
    /// ForEach kernel has neither input nor output
    E3009,
    /// ForEach user data type cannot be exported
    E3010,
    /// `init`/destructor takes parameters
    E3011,
    /// `init`/destructor does not return void
    E3012,
    /// Reduce kernel unsupported by the target API
    E3013,
    /// Reduce kernel does not take two parameters
    E3014,
    /// Reduce kernel returns void
    E3015,
    /// Reduce kernel returns a pointer
    E3016,
    /// Reduce kernel has a pointer parameter
    E3017,
    /// Reduce kernel return type differs from a parameter type
    E3018,
    /// Reduce kernel parameter types differ
    E3019,

    // Exportable Errors (E4xxx)
    /// Pragma names a symbol that does not exist (warning)
    E4001,
    /// Exported variable uses an unsupported type
    E4002,
    /// Invokable parameter uses an unsupported type
    E4003,
    /// Exported function is declared but never defined (warning)
    E4004,

    // Reflection Errors (E5xxx)
    /// Script name is not a valid host identifier
    E5001,
    /// Package name is not valid
    E5002,

    // Internal Errors (E9xxx)
    /// Internal error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// Kept in sync with `as_str()` which is exhaustive.
    pub const ALL: &[ErrorCode] = &[
        // Type export
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        // ODR
        ErrorCode::E2001,
        // Kernel signatures
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E3006,
        ErrorCode::E3007,
        ErrorCode::E3008,
        ErrorCode::E3009,
        ErrorCode::E3010,
        ErrorCode::E3011,
        ErrorCode::E3012,
        ErrorCode::E3013,
        ErrorCode::E3014,
        ErrorCode::E3015,
        ErrorCode::E3016,
        ErrorCode::E3017,
        ErrorCode::E3018,
        ErrorCode::E3019,
        // Exportables
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E4003,
        ErrorCode::E4004,
        // Reflection
        ErrorCode::E5001,
        ErrorCode::E5002,
        // Internal
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E3011 => "E3011",
            ErrorCode::E3012 => "E3012",
            ErrorCode::E3013 => "E3013",
            ErrorCode::E3014 => "E3014",
            ErrorCode::E3015 => "E3015",
            ErrorCode::E3016 => "E3016",
            ErrorCode::E3017 => "E3017",
            ErrorCode::E3018 => "E3018",
            ErrorCode::E3019 => "E3019",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this is a type export error (E1xxx).
    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a one-definition-rule error (E2xxx).
    pub fn is_odr_error(&self) -> bool {
        matches!(self, ErrorCode::E2001)
    }

    /// Check if this is a kernel signature error (E3xxx).
    pub fn is_kernel_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    /// Check if this is an exportable error (E4xxx).
    pub fn is_export_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }

    /// Check if this is a reflection error (E5xxx).
    pub fn is_reflect_error(&self) -> bool {
        self.as_str().starts_with("E5")
    }

    /// Check if this is an internal error (E9xxx).
    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// Check if this code is reported as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::E4001 | ErrorCode::E4004)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
