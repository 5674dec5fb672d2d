//! ForEach kernel signature metadata.
//!
//! The bit positions are read by the native runtime and must not change.

use bitflags::bitflags;

bitflags! {
    /// Optional parameters present on a ForEach kernel.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ForEachSignature: u32 {
        /// Input allocation element (`const T *in`).
        const IN = 1 << 0;
        /// Output allocation element (`T *out`).
        const OUT = 1 << 1;
        /// User data pointer (`const U *usrData`).
        const USR_DATA = 1 << 2;
        /// `uint32_t x` coordinate.
        const X = 1 << 3;
        /// `uint32_t y` coordinate.
        const Y = 1 << 4;
    }
}

/// Signatures accepted below API 16: each slot requires all earlier ones.
const LEGACY_SIGNATURES: [u32; 5] = [0b00001, 0b00011, 0b00111, 0b01111, 0b11111];

impl ForEachSignature {
    #[inline]
    pub const fn has_in(self) -> bool {
        self.contains(Self::IN)
    }

    #[inline]
    pub const fn has_out(self) -> bool {
        self.contains(Self::OUT)
    }

    #[inline]
    pub const fn has_usr_data(self) -> bool {
        self.contains(Self::USR_DATA)
    }

    #[inline]
    pub const fn has_x(self) -> bool {
        self.contains(Self::X)
    }

    #[inline]
    pub const fn has_y(self) -> bool {
        self.contains(Self::Y)
    }

    /// Metadata encoding emitted for the runtime.
    #[inline]
    pub const fn encoding(self) -> u32 {
        self.bits()
    }

    /// True if the legacy runtime can launch a kernel with this signature.
    pub fn is_legacy_compatible(self) -> bool {
        LEGACY_SIGNATURES.contains(&self.bits())
    }
}

#[cfg(test)]
mod tests;
