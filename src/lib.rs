//! An x86-64 instruction encoder.
//!
//! Instruction records, either built programmatically or parsed from
//! assembly text, are turned into a relocatable text section together with
//! its symbols, relocations and optional debug line and call frame sections.
//!
//! Label jumps start out in their 32-bit form and the pipeline shrinks them
//! to 8 bits where the final distance allows it, so the produced machine
//! code matches what a conventional assembler would emit:
//!
//! ```
//! let output = x64_encoder::assemble("start:\nadd rax, 1\njmp start", None).unwrap();
//! assert_eq!(output.text().data, [0x48, 0x83, 0xC0, 0x01, 0xEB, 0xFA]);
//! ```

pub mod binary;
pub mod buffer;
pub mod debug_frame;
pub mod debug_line;
pub mod encoder;
pub mod error;
pub mod handle;
pub mod instruction;
pub mod parser;
pub mod register;
pub mod size;
pub mod tables;

pub use binary::{
    BinaryRelocation, BinaryRelocationKind, BinarySection, BinarySectionKind, BinarySymbol,
};
pub use encoder::EncoderOutput;
pub use error::EncodeError;
pub use handle::Handle;
pub use instruction::{Instruction, InstructionKind, InstructionParameter};
pub use parser::AssemblyParser;
pub use size::Size;

/// Encodes the instructions into a text section. `debug_file` names the
/// source file of the emitted debug line section; without it no line
/// information is produced.
pub fn encode(
    instructions: Vec<Instruction>,
    debug_file: Option<&str>,
) -> Result<EncoderOutput, EncodeError> {
    let mut modules = encoder::create_modules(instructions);
    encoder::encode_modules(&mut modules)?;

    let labels = encoder::load_labels(&modules)?;
    encoder::complete_modules(&mut modules, &labels);
    encoder::compute_module_positions(&mut modules);
    encoder::write_offsets(&mut modules, &labels);

    Ok(encoder::export(&modules, &labels, debug_file))
}

/// Parses assembly text and encodes it.
pub fn assemble(assembly: &str, debug_file: Option<&str>) -> Result<EncoderOutput, EncodeError> {
    let mut parser = AssemblyParser::new();
    parser.parse(assembly)?;

    let instructions = std::mem::take(&mut parser.instructions);
    encode(instructions, debug_file)
}

/// Renders bytes the way a hex dump tool would, 16 per row.
pub fn hex_dump(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    for (row, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(output, "{:08x}:", row * 16);

        for byte in chunk {
            let _ = write!(output, " {byte:02x}");
        }

        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::BinaryRelocationKind;
    use crate::register::{RAX, RBX};
    use pretty_assertions::assert_eq;

    fn text(assembly: &str) -> Vec<u8> {
        assemble(assembly, None).unwrap().sections.remove(0).data
    }

    #[test]
    fn immediate_with_a_declared_64_bit_width_uses_the_movabs_form() {
        let instruction = Instruction::new(
            "mov",
            vec![Handle::register(RAX, Size::Qword), Handle::sized_constant(5, 64)],
        );

        let output = encode(vec![instruction], None).unwrap();
        assert_eq!(output.text().data, [0x48, 0xB8, 5, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn parsed_small_immediate_uses_the_sign_extended_form() {
        assert_eq!(text("mov rax, 5"), [0x48, 0xC7, 0xC0, 5, 0, 0, 0]);
    }

    #[test]
    fn forward_jump_in_range_shrinks_to_eight_bits() {
        assert_eq!(text("jmp done\nnop\ndone:\nret"), [0xEB, 0x01, 0x90, 0xC3]);
    }

    #[test]
    fn backward_jump_in_range_shrinks_to_eight_bits() {
        assert_eq!(text("start:\nnop\njmp start"), [0x90, 0xEB, 0xFD]);
    }

    #[test]
    fn conditional_jump_shrinks_by_rewriting_the_opcode() {
        // 0F 84 rel32 becomes 74 rel8
        assert_eq!(text("je done\nnop\ndone:\nret"), [0x74, 0x01, 0x90, 0xC3]);
    }

    #[test]
    fn far_jump_keeps_the_32_bit_form() {
        let mut assembly = String::from("jmp far\n");

        for _ in 0..200 {
            assembly.push_str("nop\n");
        }

        assembly.push_str("far:\nret");

        let data = text(&assembly);
        assert_eq!(data.len(), 5 + 200 + 1);
        assert_eq!(data[0], 0xE9);
        assert_eq!(&data[1..5], &200i32.to_le_bytes());
    }

    #[test]
    fn external_jump_becomes_a_relocation() {
        let output = assemble("jmp elsewhere", None).unwrap();
        let section = output.text();

        assert_eq!(section.data, [0xE9, 0, 0, 0, 0]);
        assert_eq!(section.relocations.len(), 1);

        let relocation = &section.relocations[0];
        assert_eq!(relocation.symbol, "elsewhere");
        assert_eq!(relocation.offset, 1);
        assert_eq!(relocation.addend, -4);
        assert_eq!(relocation.kind, BinaryRelocationKind::ProgramCounterRelative);
    }

    #[test]
    fn external_call_becomes_a_relocation() {
        let output = assemble("nop\ncall printf", None).unwrap();
        let section = output.text();

        assert_eq!(section.data, [0x90, 0xE8, 0, 0, 0, 0]);

        let relocation = &section.relocations[0];
        assert_eq!(relocation.symbol, "printf");
        assert_eq!(relocation.offset, 2);
        assert_eq!(relocation.addend, -4);
        assert_eq!(relocation.kind, BinaryRelocationKind::ProgramCounterRelative);
    }

    #[test]
    fn local_call_is_patched_directly() {
        let output = assemble("call target\nnop\ntarget:\nret", None).unwrap();
        let section = output.text();

        // Offset from the end of the call to the label at 6
        assert_eq!(section.data, [0xE8, 0x01, 0, 0, 0, 0x90, 0xC3]);
        assert!(section.relocations.is_empty());

        assert_eq!(output.symbols["target"].offset, 6);
    }

    #[test]
    fn base_index_scale_offset_address() {
        assert_eq!(text("mov rax, [rax+rbx*4-8]"), [0x48, 0x8B, 0x44, 0x98, 0xF8]);
    }

    #[test]
    fn frame_pointer_base_always_carries_a_displacement() {
        assert_eq!(text("mov rax, [rbp]"), [0x48, 0x8B, 0x45, 0x00]);
        assert_eq!(text("mov rax, [r13]"), [0x49, 0x8B, 0x45, 0x00]);
    }

    #[test]
    fn stack_pointer_base_selects_a_neutral_sib() {
        assert_eq!(text("mov rax, [rsp]"), [0x48, 0x8B, 0x04, 0x24]);
        assert_eq!(text("mov rax, [r12]"), [0x49, 0x8B, 0x04, 0x24]);
    }

    #[test]
    fn absolute_address() {
        assert_eq!(text("mov rax, [1000]"), [0x48, 0x8B, 0x04, 0x25, 0xE8, 0x03, 0x00, 0x00]);
    }

    #[test]
    fn indexed_address_without_a_base() {
        assert_eq!(
            text("mov rax, [rbx*8+16]"),
            [0x48, 0x8B, 0x04, 0xDD, 0x10, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn symbol_load_is_rip_relative() {
        let output = assemble("mov rax, [counter]", None).unwrap();
        let section = output.text();

        assert_eq!(section.data, [0x48, 0x8B, 0x05, 0, 0, 0, 0]);

        let relocation = &section.relocations[0];
        assert_eq!(relocation.symbol, "counter");
        assert_eq!(relocation.offset, 3);
        assert_eq!(relocation.addend, -4);
        assert_eq!(relocation.kind, BinaryRelocationKind::ProgramCounterRelative);
    }

    #[test]
    fn symbol_load_addend_accounts_for_a_trailing_immediate() {
        let output = assemble("mov dword [counter], 7", None).unwrap();
        let section = output.text();

        // C7 05 disp32 imm32: the displacement is 8 bytes before the end
        assert_eq!(section.data, [0xC7, 0x05, 0, 0, 0, 0, 7, 0, 0, 0]);
        assert_eq!(section.relocations[0].offset, 2);
        assert_eq!(section.relocations[0].addend, -8);
    }

    #[test]
    fn one_byte_registers_of_the_old_quartet_force_an_empty_rex() {
        assert_eq!(text("mov dil, al"), [0x40, 0x8A, 0xF8]);
        assert_eq!(text("mov bl, al"), [0x8A, 0xD8]);
    }

    #[test]
    fn opcode_embedded_registers() {
        assert_eq!(text("push r9"), [0x41, 0x51]);
        assert_eq!(text("pop rbx"), [0x5B]);
        assert_eq!(text("xchg rax, rbx"), [0x48, 0x93]);
    }

    #[test]
    fn shifts() {
        assert_eq!(text("sal rax, 1"), [0x48, 0xD1, 0xE0]);
        assert_eq!(text("sal rax, 3"), [0x48, 0xC1, 0xE0, 0x03]);
        assert_eq!(text("sal rax, cl"), [0x48, 0xD3, 0xE0]);
    }

    #[test]
    fn multi_byte_opcodes_are_written_low_byte_first() {
        assert_eq!(text("syscall"), [0x0F, 0x05]);
        assert_eq!(text("cqo"), [0x48, 0x99]);
        assert_eq!(text("imul rax, rbx"), [0x48, 0x0F, 0xAF, 0xC3]);
    }

    #[test]
    fn media_register_moves() {
        assert_eq!(text("movsd xmm0, [rbp-8]"), [0xF2, 0x0F, 0x10, 0x45, 0xF8]);
        assert_eq!(text("movq xmm1, rax"), [0x66, 0x48, 0x0F, 0x6E, 0xC8]);
        assert_eq!(text("cvtsi2sd xmm0, rax"), [0xF2, 0x48, 0x0F, 0x2A, 0xC0]);
    }

    #[test]
    fn triple_operand_multiply() {
        assert_eq!(text("imul rax, rbx, 7"), [0x48, 0x6B, 0xC3, 0x07]);
    }

    #[test]
    fn lock_prefix_comes_first() {
        assert_eq!(
            text("lock add qword [rbp-8], 1"),
            [0xF0, 0x48, 0x81, 0x45, 0xF8, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn only_the_lock_prefix_marks_a_prefixed_operation() {
        let instruction = Instruction::new(
            "rep add",
            vec![Handle::register(RAX, Size::Qword), Handle::constant(1)],
        );

        let result = encode(vec![instruction], None);
        assert_eq!(result.unwrap_err(), EncodeError::UnknownInstruction("rep add".into()));
    }

    #[test]
    fn labels_become_symbols() {
        let output = assemble("first:\nnop\nsecond:\nret", None).unwrap();

        assert_eq!(output.symbols["first"].offset, 0);
        assert_eq!(output.symbols["second"].offset, 1);
        assert!(!output.symbols["first"].external);
    }

    #[test]
    fn external_targets_become_undefined_symbols() {
        let output = assemble("call printf\njmp elsewhere\nmov rax, [counter]", None).unwrap();

        assert_eq!(output.symbols["printf"], BinarySymbol::new("printf", 0, true));
        assert!(output.symbols["elsewhere"].external);
        assert!(output.symbols["counter"].external);
    }

    #[test]
    fn local_labels_are_never_marked_external() {
        let output = assemble("target:\nnop\ncall target", None).unwrap();

        assert!(!output.symbols["target"].external);
        assert_eq!(output.symbols["target"].offset, 0);
    }

    #[test]
    fn duplicate_labels_are_fatal() {
        let result = assemble("again:\nnop\nagain:\nret", None);
        assert_eq!(result.unwrap_err(), EncodeError::DuplicateLabel("again".into()));
    }

    #[test]
    fn unknown_instructions_are_fatal() {
        let result = assemble("frobnicate rax", None);
        assert_eq!(result.unwrap_err(), EncodeError::UnknownInstruction("frobnicate".into()));
    }

    #[test]
    fn operand_shape_without_an_encoding_is_fatal() {
        let result = assemble("lea rax, rbx", None);
        assert_eq!(result.unwrap_err(), EncodeError::MissingEncoding("lea".into()));
    }

    #[test]
    fn debug_sections_are_produced_on_request() {
        let instructions = vec![
            Instruction::debug_start("main"),
            Instruction::append_position(1, 1),
            Instruction::new(
                "sub",
                vec![Handle::register(crate::register::RSP, Size::Qword), Handle::constant(8)],
            ),
            Instruction::debug_frame_offset(16),
            Instruction::append_position(2, 5),
            Instruction::new(
                "add",
                vec![Handle::register(crate::register::RSP, Size::Qword), Handle::constant(8)],
            ),
            Instruction::new("ret", Vec::new()),
            Instruction::debug_end(),
        ];

        let output = encode(instructions, Some("main.c")).unwrap();
        assert_eq!(output.sections.len(), 3);
        assert_eq!(output.sections[1].name, ".debug_line");
        assert_eq!(output.sections[2].name, ".eh_frame");

        // The line program addresses the text section, the frame entry the
        // function symbol
        assert_eq!(output.sections[1].relocations[0].symbol, ".text");
        assert_eq!(output.sections[2].relocations[0].symbol, "main");
    }

    #[test]
    fn module_positions_are_stable_across_a_second_encode() {
        let assembly = "start:\nmov rax, 1\nje middle\nadd rax, 2\nmiddle:\njmp start\nret";

        let first = assemble(assembly, None).unwrap();
        let second = assemble(assembly, None).unwrap();
        assert_eq!(first.text().data, second.text().data);
    }

    #[test]
    fn hex_dump_rows() {
        let dump = hex_dump(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(dump, "00000000: de ad be ef\n");
    }

    #[test]
    fn register_parameter_of_a_division() {
        // rdx:rax operands are hidden and never reach the tables
        let mut instruction =
            Instruction::new("idiv", vec![Handle::register(RBX, Size::Qword)]);
        instruction
            .parameters
            .push(InstructionParameter::hidden(Handle::register(RAX, Size::Qword)));

        let output = encode(vec![instruction], None).unwrap();
        assert_eq!(output.text().data, [0x48, 0xF7, 0xFB]);
    }
}
