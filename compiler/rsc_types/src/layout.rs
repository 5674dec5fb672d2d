//! Target ABI layout.
//!
//! Generated host serialization code and the native kernel must agree on
//! every byte offset, so this module mirrors the target data layout exactly:
//! a 32-bit target by default, natural alignment, and `alloc size` rounded
//! up to alignment.
//!
//! All arithmetic is checked; an overflowing layout is reported as `None`
//! and surfaces to the caller as a malformed type.

use crate::data_type::DataType;

/// Target ABI parameters.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Abi {
    /// Pointer size and alignment in bytes.
    pub pointer_size: u32,
    /// Alignment of 64-bit scalars in bytes.
    pub align_64: u32,
}

impl Abi {
    /// The 32-bit target the kernels are compiled for.
    pub const TARGET_32: Abi = Abi {
        pointer_size: 4,
        align_64: 8,
    };
}

impl Default for Abi {
    fn default() -> Self {
        Abi::TARGET_32
    }
}

/// Size and alignment of one export type.
///
/// `store_size` is the number of bytes a value occupies; `alloc_size` is the
/// stride between consecutive values (store size rounded up to `align`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Layout {
    pub store_size: u32,
    pub alloc_size: u32,
    pub align: u32,
}

/// Round `value` up to a multiple of `align` (`align` must be non-zero).
#[inline]
pub const fn align_to(value: u32, align: u32) -> Option<u32> {
    match value.checked_add(align - 1) {
        Some(v) => Some(v / align * align),
        None => None,
    }
}

impl Layout {
    /// Layout with `alloc_size` derived from `store_size` and `align`.
    pub const fn new(store_size: u32, align: u32) -> Option<Layout> {
        match align_to(store_size, align) {
            Some(alloc_size) => Some(Layout {
                store_size,
                alloc_size,
                align,
            }),
            None => None,
        }
    }

    /// Trailing bytes between the end of the stored value and the next value.
    pub const fn tail_padding(self) -> u32 {
        self.alloc_size - self.store_size
    }

    /// Layout of a scalar, object handle or matrix.
    pub const fn primitive(data_type: DataType, abi: Abi) -> Layout {
        let (size, align) = match data_type.size_in_bits() {
            1 | 8 => (1, 1),
            16 => (2, 2),
            64 => (8, abi.align_64),
            bits if data_type.is_matrix() => (bits / 8, 4),
            _ => (4, 4),
        };
        Layout {
            store_size: size,
            alloc_size: size,
            align,
        }
    }

    /// Layout of a data pointer.
    pub const fn pointer(abi: Abi) -> Layout {
        Layout {
            store_size: abi.pointer_size,
            alloc_size: abi.pointer_size,
            align: abi.pointer_size,
        }
    }

    /// Layout of an ext-vector of `count` elements.
    ///
    /// Alignment is the store size rounded up to a power of two, so a
    /// `float3` stores 12 bytes but strides 16.
    pub fn vector(element: DataType, count: u32, abi: Abi) -> Option<Layout> {
        let store = Layout::primitive(element, abi)
            .store_size
            .checked_mul(count)?;
        let align = store.checked_next_power_of_two()?;
        Layout::new(store, align)
    }

    /// Layout of `size` consecutive elements.
    pub fn array(element: Layout, size: u32) -> Option<Layout> {
        let total = element.alloc_size.checked_mul(size)?;
        Some(Layout {
            store_size: total,
            alloc_size: total,
            align: element.align,
        })
    }
}

/// Field offsets plus the enclosing record layout.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct RecordLayout {
    pub offsets: Vec<u32>,
    pub layout: Layout,
}

/// Lay out record members in declaration order.
///
/// Natural alignment inserts padding before each member and at the tail.
/// A packed record has alignment 1 and no padding.
pub fn layout_record(fields: &[Layout], packed: bool) -> Option<RecordLayout> {
    let mut offsets = Vec::with_capacity(fields.len());
    let mut offset = 0u32;
    let mut align = 1u32;
    for field in fields {
        if !packed {
            offset = align_to(offset, field.align)?;
            align = align.max(field.align);
        }
        offsets.push(offset);
        offset = offset.checked_add(field.alloc_size)?;
    }
    let size = align_to(offset, align)?;
    Some(RecordLayout {
        offsets,
        layout: Layout {
            store_size: size,
            alloc_size: size,
            align,
        },
    })
}
