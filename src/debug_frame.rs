//! Streaming encoder of the call frame information section.
//!
//! One shared CIE describes the System V entry state: the canonical frame
//! address is rsp+8 and the return address lives at cfa-8. Every function
//! gets an FDE whose start address is resolved through a relocation against
//! the function symbol, followed by advance-location and def-cfa-offset
//! instructions replayed from the recorded frame events.

use crate::binary::{
    BinaryRelocation, BinaryRelocationKind, BinarySection, BinarySectionKind,
};
use crate::buffer::DataBuffer;

pub const DEBUG_FRAME_SECTION: &str = ".eh_frame";

const CIE_VERSION: u8 = 1;
const CODE_ALIGNMENT: u64 = 1;
const DATA_ALIGNMENT: i64 = -8;
const RETURN_ADDRESS_REGISTER: u64 = 16;

// DW_EH_PE_pcrel | DW_EH_PE_sdata4
const POINTER_ENCODING: u8 = 0x1B;

const ADVANCE_LOCATION_1: u8 = 0x02;
const ADVANCE_LOCATION_2: u8 = 0x03;
const ADVANCE_LOCATION_4: u8 = 0x04;
const DEFINE_FRAME_OFFSET: u8 = 0x0E;

// def_cfa rsp, 8 and offset r16, cfa-8, padded with nops
const INITIAL_INSTRUCTIONS: [u8; 7] = [0x0C, 0x07, 0x08, 0x90, 0x01, 0x00, 0x00];

pub struct DebugFrameEncoder {
    buffer: DataBuffer,
    relocations: Vec<BinaryRelocation>,
    entry_length_position: usize,
    entry_extent_position: usize,
    entry_start_offset: usize,
    location: usize,
}

impl Default for DebugFrameEncoder {
    fn default() -> DebugFrameEncoder {
        DebugFrameEncoder::new()
    }
}

impl DebugFrameEncoder {
    pub fn new() -> DebugFrameEncoder {
        let mut buffer = DataBuffer::new();

        // CIE
        let length_position = buffer.position();
        buffer.write_u32(0);
        buffer.write_u32(0); // a zero id marks the CIE
        buffer.write(CIE_VERSION);
        buffer.write_string("zR");
        buffer.write_uleb128(CODE_ALIGNMENT);
        buffer.write_sleb128(DATA_ALIGNMENT);
        buffer.write_uleb128(RETURN_ADDRESS_REGISTER);
        buffer.write_uleb128(1); // augmentation data length
        buffer.write(POINTER_ENCODING);
        buffer.write_bytes(&INITIAL_INSTRUCTIONS);

        let length = buffer.position() - length_position - 4;
        buffer.write_u32_at(length_position, length as u32);

        DebugFrameEncoder {
            buffer,
            relocations: Vec::new(),
            entry_length_position: 0,
            entry_extent_position: 0,
            entry_start_offset: 0,
            location: 0,
        }
    }

    /// Opens the FDE of the function starting at `offset`.
    pub fn start(&mut self, symbol: &str, offset: usize) {
        self.entry_length_position = self.buffer.position();
        self.buffer.write_u32(0);

        // CIE pointer, measured from this field back to the section start
        let field = self.buffer.position();
        self.buffer.write_u32(field as u32);

        self.relocations.push(BinaryRelocation::new(
            symbol,
            self.buffer.position(),
            0,
            BinaryRelocationKind::ProgramCounterRelative,
        ));
        self.buffer.write_u32(0); // pc begin

        self.entry_extent_position = self.buffer.position();
        self.buffer.write_u32(0); // pc extent, patched at end

        self.buffer.write_uleb128(0); // augmentation data length

        self.entry_start_offset = offset;
        self.location = offset;
    }

    /// Advances the current location with the smallest fitting form.
    pub fn move_to(&mut self, location: usize) {
        let delta = location - self.location;

        if delta == 0 {
            return;
        }

        if let Ok(delta) = u8::try_from(delta) {
            self.buffer.write(ADVANCE_LOCATION_1);
            self.buffer.write(delta);
        } else if let Ok(delta) = u16::try_from(delta) {
            self.buffer.write(ADVANCE_LOCATION_2);
            self.buffer.write_u16(delta);
        } else {
            self.buffer.write(ADVANCE_LOCATION_4);
            self.buffer.write_u32(delta as u32);
        }

        self.location = location;
    }

    /// Sets the offset of the canonical frame address from rsp.
    pub fn set_frame_offset(&mut self, offset: i32) {
        self.buffer.write(DEFINE_FRAME_OFFSET);
        self.buffer.write_uleb128(offset.max(0) as u64);
    }

    /// Closes the FDE of the function ending at `offset`.
    pub fn end(&mut self, offset: usize) {
        self.buffer
            .write_u32_at(self.entry_extent_position, (offset - self.entry_start_offset) as u32);

        self.buffer.align(8);

        let length = self.buffer.position() - self.entry_length_position - 4;
        self.buffer.write_u32_at(self.entry_length_position, length as u32);
    }

    pub fn export(self) -> BinarySection {
        let mut section = BinarySection::new(
            DEBUG_FRAME_SECTION,
            BinarySectionKind::DebugFrame,
            self.buffer.into_bytes(),
        );
        section.relocations = self.relocations;
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cie_layout() {
        let encoder = DebugFrameEncoder::new();
        let data = encoder.buffer.as_bytes();

        // Length excludes the length field and the entry is 8-aligned
        let length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        assert_eq!(length + 4, data.len());
        assert_eq!(data.len() % 8, 0);

        // Zero id, version, augmentation string
        assert_eq!(&data[4..8], &[0, 0, 0, 0]);
        assert_eq!(data[8], CIE_VERSION);
        assert_eq!(&data[9..12], b"zR\0");
    }

    #[test]
    fn fde_references_its_function_symbol() {
        let mut encoder = DebugFrameEncoder::new();
        let cie_size = encoder.buffer.position();

        encoder.start("main", 0);
        encoder.move_to(4);
        encoder.set_frame_offset(16);
        encoder.end(32);

        let section = encoder.export();
        assert_eq!(section.relocations.len(), 1);

        let relocation = &section.relocations[0];
        assert_eq!(relocation.symbol, "main");
        assert_eq!(relocation.kind, BinaryRelocationKind::ProgramCounterRelative);
        // pc begin follows the length field and the CIE pointer
        assert_eq!(relocation.offset, cie_size + 8);

        // The CIE pointer points back over itself to the section start
        let pointer_position = cie_size + 4;
        let data = &section.data;
        let pointer = u32::from_le_bytes([
            data[pointer_position],
            data[pointer_position + 1],
            data[pointer_position + 2],
            data[pointer_position + 3],
        ]);
        assert_eq!(pointer as usize, pointer_position);

        // pc extent spans the function
        let extent_position = cie_size + 12;
        let extent = u32::from_le_bytes([
            data[extent_position],
            data[extent_position + 1],
            data[extent_position + 2],
            data[extent_position + 3],
        ]);
        assert_eq!(extent, 32);
    }

    #[test]
    fn advance_location_picks_the_smallest_form() {
        let mut encoder = DebugFrameEncoder::new();
        encoder.start("f", 0);

        let before = encoder.buffer.position();
        encoder.move_to(200);
        assert_eq!(&encoder.buffer.as_bytes()[before..], &[ADVANCE_LOCATION_1, 200]);

        let before = encoder.buffer.position();
        encoder.move_to(200 + 70000);
        let bytes = &encoder.buffer.as_bytes()[before..];
        assert_eq!(bytes[0], ADVANCE_LOCATION_4);
        assert_eq!(u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]), 70000);
    }
}
