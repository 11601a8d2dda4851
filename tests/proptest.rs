//! Property tests for the addressing forms: whatever combination of base,
//! index, scale and displacement goes in, the emitted ModR/M, SIB and
//! displacement bytes must decode back to the same effective address.

use proptest::prelude::*;

use x64_encoder::handle::Handle;
use x64_encoder::instruction::Instruction;
use x64_encoder::parser::AssemblyParser;
use x64_encoder::register::STANDARD_PARTITIONS;
use x64_encoder::size::Size;

/// Decodes a `mov rax, [...]` load back into base, index with scale and
/// displacement.
fn decode_load(bytes: &[u8]) -> (Option<u8>, Option<(u8, u8)>, i32) {
    let mut position = 0;
    let mut rex = 0u8;

    if bytes[position] & 0xF0 == 0x40 {
        rex = bytes[position];
        position += 1;
    }

    assert_eq!(bytes[position], 0x8B);
    position += 1;

    let modrm = bytes[position];
    position += 1;

    let mode = modrm >> 6;
    let rm = modrm & 7;
    assert_eq!((modrm >> 3) & 7, 0, "destination must be rax");
    assert_ne!(mode, 3, "expected a memory operand");

    let mut base = None;
    let mut index = None;
    let mut baseless_sib = false;

    if rm == 4 {
        let sib = bytes[position];
        position += 1;

        let scale = 1u8 << (sib >> 6);
        let index_bits = (rex & 2) << 2 | (sib >> 3) & 7;
        let base_bits = (rex & 1) << 3 | (sib & 7);

        // Index slot 4 with a clear X bit means no index
        if (sib >> 3) & 7 != 4 || rex & 2 != 0 {
            index = Some((index_bits, scale));
        }

        // Base slot 5 under mode 0 means no base, displacement only
        if sib & 7 == 5 && mode == 0 {
            baseless_sib = true;
        } else {
            base = Some(base_bits);
        }
    } else {
        base = Some((rex & 1) << 3 | rm);
    }

    let offset = match mode {
        1 => i32::from(bytes[position] as i8),
        2 => i32::from_le_bytes([
            bytes[position],
            bytes[position + 1],
            bytes[position + 2],
            bytes[position + 3],
        ]),
        _ if baseless_sib => i32::from_le_bytes([
            bytes[position],
            bytes[position + 1],
            bytes[position + 2],
            bytes[position + 3],
        ]),
        _ => 0,
    };

    (base, index, offset)
}

fn load(second: Handle) -> Vec<u8> {
    let instruction = Instruction::new("mov", vec![Handle::register(0, Size::Qword), second]);
    x64_encoder::encode(vec![instruction], None).unwrap().text().data.clone()
}

/// Any register except those whose 3-bit name selects the SIB slot, which
/// the hardware can not encode as an index.
fn index_register() -> impl Strategy<Value = u8> {
    (0u8..16).prop_filter("rsp and r12 can not be index registers", |id| id & 7 != 4)
}

proptest! {
    #[test]
    fn base_with_offset_roundtrips(base in 0u8..16, offset in any::<i32>()) {
        let bytes = load(Handle::memory(base, offset));
        let (decoded_base, decoded_index, decoded_offset) = decode_load(&bytes);

        prop_assert_eq!(decoded_base, Some(base));
        prop_assert_eq!(decoded_index, None);
        prop_assert_eq!(decoded_offset, offset);
    }

    #[test]
    fn base_index_scale_offset_roundtrips(
        base in 0u8..16,
        index in index_register(),
        power in 1u32..4,
        offset in any::<i32>(),
    ) {
        let scale = 1u8 << power;
        let bytes = load(Handle::complex_memory(Some(base), index, scale, offset));
        let (decoded_base, decoded_index, decoded_offset) = decode_load(&bytes);

        prop_assert_eq!(decoded_base, Some(base));
        prop_assert_eq!(decoded_index, Some((index, scale)));
        prop_assert_eq!(decoded_offset, offset);
    }

    #[test]
    fn baseless_index_scale_roundtrips(
        index in index_register(),
        power in 1u32..4,
        offset in any::<i32>(),
    ) {
        let scale = 1u8 << power;
        let bytes = load(Handle::complex_memory(None, index, scale, offset));
        let (decoded_base, decoded_index, decoded_offset) = decode_load(&bytes);

        prop_assert_eq!(decoded_base, None);
        prop_assert_eq!(decoded_index, Some((index, scale)));
        prop_assert_eq!(decoded_offset, offset);
    }

    #[test]
    fn wide_immediates_are_little_endian(value in any::<i64>()) {
        let instruction = Instruction::new(
            "mov",
            vec![Handle::register(0, Size::Qword), Handle::sized_constant(value, 64)],
        );

        let output = x64_encoder::encode(vec![instruction], None).unwrap();
        let data = &output.text().data;

        prop_assert_eq!(&data[..2], &[0x48, 0xB8]);
        prop_assert_eq!(&data[2..], &value.to_le_bytes());
    }

    #[test]
    fn parsed_addresses_match_programmatic_handles(
        base in 0u8..16,
        index in index_register(),
        power in 1u32..4,
        offset in -1_000_000i32..1_000_000,
    ) {
        let scale = 1u8 << power;
        let assembly = format!(
            "mov rax, [{}+{}*{}{:+}]",
            STANDARD_PARTITIONS[base as usize][0],
            STANDARD_PARTITIONS[index as usize][0],
            scale,
            offset,
        );

        let mut parser = AssemblyParser::new();
        parser.parse(&assembly).unwrap();

        prop_assert_eq!(
            &parser.instructions[0].parameters[1].handle,
            &Handle::complex_memory(Some(base), index, scale, offset)
        );
    }
}
