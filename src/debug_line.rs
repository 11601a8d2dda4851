//! Streaming encoder of the debug line section.
//!
//! Produces one DWARF 4 line number program with a single file entry. The
//! machine offsets arrive in ascending order, so every event after the first
//! becomes an advance-pc/advance-line pair followed by a copy. The first
//! event sets the absolute address through a relocation against the text
//! section, which keeps the program position independent.

use crate::binary::{
    BinaryRelocation, BinaryRelocationKind, BinarySection, BinarySectionKind,
};
use crate::buffer::DataBuffer;
use crate::encoder::TEXT_SECTION;

pub const DEBUG_LINE_SECTION: &str = ".debug_line";

const VERSION: u16 = 4;
const OPCODE_BASE: u8 = 13;

// Standard opcode argument counts, one per opcode below the base
const OPERATION_ARGUMENT_COUNTS: [u8; 12] = [0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1];

mod operation {
    pub const COPY: u8 = 1;
    pub const ADVANCE_PROGRAM_COUNTER: u8 = 2;
    pub const ADVANCE_LINE: u8 = 3;
    pub const SET_COLUMN: u8 = 5;
    pub const SET_PROLOGUE_END: u8 = 10;
}

mod extended {
    pub const END_OF_SEQUENCE: u8 = 1;
    pub const SET_ADDRESS: u8 = 2;
}

pub struct DebugLineEncoder {
    buffer: DataBuffer,
    relocations: Vec<BinaryRelocation>,
    unit_length_position: usize,
    header_length_position: usize,
    header_end: usize,
    previous_offset: usize,
    previous_line: i32,
    started: bool,
}

impl DebugLineEncoder {
    pub fn new(file: &str) -> DebugLineEncoder {
        let mut buffer = DataBuffer::new();

        let unit_length_position = buffer.position();
        buffer.write_u32(0);
        buffer.write_u16(VERSION);

        let header_length_position = buffer.position();
        buffer.write_u32(0);

        buffer.write(1); // minimum instruction length
        buffer.write(1); // maximum operations per instruction
        buffer.write(1); // default is_stmt
        buffer.write(1); // line base
        buffer.write(1); // line range
        buffer.write(OPCODE_BASE);
        buffer.write_bytes(&OPERATION_ARGUMENT_COUNTS);

        // Include directories, empty
        buffer.write(0);

        // File table with the single source file
        buffer.write_string(file);
        buffer.write_uleb128(0); // directory index
        buffer.write_uleb128(0); // modification time
        buffer.write_uleb128(0); // size
        buffer.write(0);

        let header_end = buffer.position();

        DebugLineEncoder {
            buffer,
            relocations: Vec::new(),
            unit_length_position,
            header_length_position,
            header_end,
            previous_offset: 0,
            previous_line: 1,
            started: false,
        }
    }

    /// Associates the machine code at `offset` with the source location.
    pub fn add(&mut self, offset: usize, line: i32, column: i32) {
        if self.started {
            self.buffer.write(operation::ADVANCE_PROGRAM_COUNTER);
            self.buffer.write_sleb128((offset - self.previous_offset) as i64);
        } else {
            // Extended set-address, patched by the linker to the section start
            self.buffer.write(0);
            self.buffer.write_uleb128(9);
            self.buffer.write(extended::SET_ADDRESS);

            self.relocations.push(BinaryRelocation {
                symbol: TEXT_SECTION.to_string(),
                offset: self.buffer.position(),
                addend: offset as i64,
                bytes: 8,
                kind: BinaryRelocationKind::Absolute64,
            });

            self.buffer.write_u64(0);
        }

        self.buffer.write(operation::ADVANCE_LINE);
        self.buffer.write_sleb128(i64::from(line - self.previous_line));
        self.buffer.write(operation::SET_COLUMN);
        self.buffer.write_uleb128(column.max(0) as u64);

        if !self.started {
            self.buffer.write(operation::SET_PROLOGUE_END);
        }

        self.buffer.write(operation::COPY);

        self.previous_offset = offset;
        self.previous_line = line;
        self.started = true;
    }

    /// Closes the line number program at the end of the machine code.
    pub fn end(&mut self, offset: usize) {
        if self.started {
            self.buffer.write(operation::ADVANCE_PROGRAM_COUNTER);
            self.buffer.write_sleb128((offset - self.previous_offset) as i64);
        }

        self.buffer.write(0);
        self.buffer.write_uleb128(1);
        self.buffer.write(extended::END_OF_SEQUENCE);
    }

    pub fn export(mut self) -> BinarySection {
        let end = self.buffer.position();

        self.buffer
            .write_u32_at(self.unit_length_position, (end - self.unit_length_position - 4) as u32);
        self.buffer.write_u32_at(
            self.header_length_position,
            (self.header_end - self.header_length_position - 4) as u32,
        );

        let mut section = BinarySection::new(
            DEBUG_LINE_SECTION,
            BinarySectionKind::DebugLine,
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
    fn header_fields_are_patched() {
        let mut encoder = DebugLineEncoder::new("main.c");
        encoder.add(0, 3, 5);
        encoder.add(7, 4, 1);
        encoder.end(12);

        let section = encoder.export();
        let data = &section.data;

        let unit_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        assert_eq!(unit_length, data.len() - 4);

        assert_eq!(u16::from_le_bytes([data[4], data[5]]), 4);

        let header_length = u32::from_le_bytes([data[6], data[7], data[8], data[9]]) as usize;
        // The line number program itself starts right after the header
        let program = 10 + header_length;
        assert!(program < data.len());

        // First event is the extended set-address
        assert_eq!(&data[program..program + 3], &[0x00, 0x09, 0x02]);
    }

    #[test]
    fn first_event_relocates_against_the_text_section() {
        let mut encoder = DebugLineEncoder::new("main.c");
        encoder.add(16, 1, 1);
        encoder.end(20);

        let section = encoder.export();
        assert_eq!(section.relocations.len(), 1);

        let relocation = &section.relocations[0];
        assert_eq!(relocation.symbol, TEXT_SECTION);
        assert_eq!(relocation.addend, 16);
        assert_eq!(relocation.bytes, 8);
        assert_eq!(relocation.kind, BinaryRelocationKind::Absolute64);
    }

    #[test]
    fn later_events_advance_relative_to_the_previous_one() {
        let mut encoder = DebugLineEncoder::new("main.c");
        encoder.add(0, 1, 1);
        let before = encoder.buffer.position();
        encoder.add(5, 2, 3);

        let bytes = &encoder.buffer.as_bytes()[before..];
        assert_eq!(
            bytes,
            &[
                operation::ADVANCE_PROGRAM_COUNTER,
                5,
                operation::ADVANCE_LINE,
                1,
                operation::SET_COLUMN,
                3,
                operation::COPY,
            ]
        );
    }
}
