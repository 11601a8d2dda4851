//! The operand handle model.
//!
//! Every operand the encoder sees is one of the closed set of handles below.
//! Handles are immutable values produced by the frontend or by the assembly
//! parser and carry the operand byte size used for both encoding-table
//! matching and REX/operand-size-prefix decisions.

use crate::size::Size;

/// Relocation flavor requested by a data-section reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSectionModifier {
    #[default]
    None,
    SectionRelative,
}

/// An instruction operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Handle {
    /// Standard or media register. `media` distinguishes xmm registers.
    Register { id: u8, size: Size, media: bool },

    /// Integer literal. `bits` is the declared width of the literal, which
    /// decides which constant encodings may carry it.
    Constant { value: i64, bits: u8 },

    /// `[base+offset]` or, with no base, an absolute `[offset]`.
    Memory { base: Option<u8>, offset: i32, size: Size },

    /// `[base+index*scale+offset]` with an optional base.
    ComplexMemory { base: Option<u8>, index: u8, scale: u8, offset: i32, size: Size },

    /// Symbolic reference into a data section. `address` marks an
    /// address-of reference (jump/call targets and bare symbols); without it
    /// the operand loads through the symbol (`[rip+disp32]` addressing).
    DataSection {
        symbol: String,
        offset: i64,
        address: bool,
        modifier: DataSectionModifier,
        size: Size,
    },
}

/// Returns the declared width in bits of a parsed integer literal, judged by
/// its signed magnitude.
pub fn bits_of_literal(value: i64) -> u8 {
    if value < i32::MIN as i64 || value > i32::MAX as i64 {
        64
    } else if value < i16::MIN as i64 || value > i16::MAX as i64 {
        32
    } else if value < i8::MIN as i64 || value > i8::MAX as i64 {
        16
    } else {
        8
    }
}

/// Returns how many bits are required to encode the integer, ignoring sign.
pub fn bits_for_encoding(value: i64) -> u8 {
    if value == i64::MIN {
        return 64;
    }

    let magnitude = value.unsigned_abs();

    if magnitude > u32::MAX as u64 {
        64
    } else if magnitude > u16::MAX as u64 {
        32
    } else if magnitude > u8::MAX as u64 {
        16
    } else {
        8
    }
}

impl Handle {
    pub fn register(id: u8, size: Size) -> Handle {
        Handle::Register { id, size, media: false }
    }

    pub fn media_register(id: u8) -> Handle {
        Handle::Register { id, size: Size::Qword, media: true }
    }

    /// A literal whose width is judged from its value.
    pub fn constant(value: i64) -> Handle {
        Handle::Constant { value, bits: bits_of_literal(value) }
    }

    /// A literal with an explicit declared width.
    pub fn sized_constant(value: i64, bits: u8) -> Handle {
        Handle::Constant { value, bits }
    }

    pub fn memory(base: u8, offset: i32) -> Handle {
        Handle::Memory { base: Some(base), offset, size: Size::Qword }
    }

    pub fn absolute(offset: i32) -> Handle {
        Handle::Memory { base: None, offset, size: Size::Qword }
    }

    pub fn complex_memory(base: Option<u8>, index: u8, scale: u8, offset: i32) -> Handle {
        Handle::ComplexMemory { base, index, scale, offset, size: Size::Qword }
    }

    pub fn data_section(symbol: impl Into<String>, address: bool) -> Handle {
        Handle::DataSection {
            symbol: symbol.into(),
            offset: 0,
            address,
            modifier: DataSectionModifier::None,
            size: Size::Qword,
        }
    }

    /// Operand byte size. Constants report their declared width.
    pub fn size(&self) -> u8 {
        match self {
            Handle::Register { size, .. } => size.bytes(),
            Handle::Constant { bits, .. } => bits / 8,
            Handle::Memory { size, .. } => size.bytes(),
            Handle::ComplexMemory { size, .. } => size.bytes(),
            Handle::DataSection { size, .. } => size.bytes(),
        }
    }

    /// Overrides the operand size; used by the `byte`/`word`/... keywords.
    pub fn with_size(mut self, new: Size) -> Handle {
        match &mut self {
            Handle::Register { size, .. }
            | Handle::Memory { size, .. }
            | Handle::ComplexMemory { size, .. }
            | Handle::DataSection { size, .. } => *size = new,
            // A constant holds at most 64 bits, whatever the keyword says
            Handle::Constant { bits, .. } => *bits = new.bytes().min(8) * 8,
        }
        self
    }

    pub fn is_memory_address(&self) -> bool {
        matches!(
            self,
            Handle::Memory { .. } | Handle::ComplexMemory { .. } | Handle::DataSection { .. }
        )
    }

    pub fn is_register(&self) -> bool {
        matches!(self, Handle::Register { .. })
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Handle::Constant { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_widths_follow_signed_thresholds() {
        assert_eq!(bits_of_literal(0), 8);
        assert_eq!(bits_of_literal(-128), 8);
        assert_eq!(bits_of_literal(-129), 16);
        assert_eq!(bits_of_literal(40000), 32);
        assert_eq!(bits_of_literal(i64::from(i32::MAX) + 1), 64);
    }

    #[test]
    fn constant_widths_cap_at_64_bits() {
        use crate::size::Size;

        let handle = Handle::constant(0).with_size(Size::Yword);
        assert_eq!(handle, Handle::Constant { value: 0, bits: 64 });
    }

    #[test]
    fn encoding_widths_ignore_sign() {
        assert_eq!(bits_for_encoding(-1), 8);
        assert_eq!(bits_for_encoding(255), 8);
        assert_eq!(bits_for_encoding(256), 16);
        assert_eq!(bits_for_encoding(i64::MIN), 64);
        assert_eq!(bits_for_encoding(u32::MAX as i64 + 1), 64);
    }
}
