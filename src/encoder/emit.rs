//! Byte emission for a single instruction.
//!
//! An instruction is matched against its encoding table and then written out
//! as: lock prefix, legacy prefix, REX, opcode, ModR/M, SIB, displacement
//! and immediate. Label references leave a zeroed placeholder behind and
//! record where it is, so the pipeline can patch it once layout is final.

use super::{EncoderModule, LabelUsage};
use crate::binary::{BinaryRelocation, BinaryRelocationKind};
use crate::error::EncodeError;
use crate::handle::{bits_for_encoding, DataSectionModifier, Handle};
use crate::instruction::{Instruction, InstructionKind};
use crate::register::{is_extension_register, is_overridable_register, name, RBP, RSP};
use crate::tables::{
    instruction_index, Encoding, FilterType, OperandFilter, Route, DUAL_PARAMETER_ENCODINGS,
    LOCK_PREFIX, PARAMETERLESS_ENCODINGS, SINGLE_PARAMETER_ENCODINGS, TRIPLE_PARAMETER_ENCODINGS,
};

/// Canonical shape of a memory operand. Degenerate complex forms fold here:
/// a zero scale drops the index and a 1-scale index without a base is a
/// plain base address.
enum AddressForm<'a> {
    Base { base: u8, offset: i32 },
    BaseIndex { base: u8, index: u8, scale: u8, offset: i32 },
    Index { index: u8, scale: u8, offset: i32 },
    Absolute { offset: i32 },
    Symbol { symbol: &'a str, offset: i64, modifier: DataSectionModifier },
}

fn address_form(handle: &Handle) -> Option<AddressForm<'_>> {
    match handle {
        Handle::Memory { base: Some(base), offset, .. } => {
            Some(AddressForm::Base { base: *base, offset: *offset })
        }

        Handle::Memory { base: None, offset, .. } => {
            Some(AddressForm::Absolute { offset: *offset })
        }

        Handle::ComplexMemory { base, index, scale, offset, .. } => Some(match (base, *scale) {
            (Some(base), 0) => AddressForm::Base { base: *base, offset: *offset },
            (None, 0) => AddressForm::Absolute { offset: *offset },
            (None, 1) => AddressForm::Base { base: *index, offset: *offset },
            (Some(base), scale) => {
                AddressForm::BaseIndex { base: *base, index: *index, scale, offset: *offset }
            }
            (None, scale) => AddressForm::Index { index: *index, scale, offset: *offset },
        }),

        Handle::DataSection { symbol, offset, modifier, .. } => {
            Some(AddressForm::Symbol { symbol: symbol.as_str(), offset: *offset, modifier: *modifier })
        }

        _ => None,
    }
}

/// REX index and base extension bits of the address.
fn address_extensions(form: &AddressForm<'_>) -> (bool, bool) {
    match form {
        AddressForm::Base { base, .. } => (false, is_extension_register(*base)),
        AddressForm::BaseIndex { base, index, .. } => {
            (is_extension_register(*index), is_extension_register(*base))
        }
        AddressForm::Index { index, .. } => (is_extension_register(*index), false),
        AddressForm::Absolute { .. } | AddressForm::Symbol { .. } => (false, false),
    }
}

fn register_of(handle: &Handle) -> Option<(u8, u8)> {
    match handle {
        Handle::Register { id, size, .. } => Some((*id, size.bytes())),
        _ => None,
    }
}

fn constant_of(handle: &Handle) -> Option<i64> {
    match handle {
        Handle::Constant { value, .. } => Some(*value),
        _ => None,
    }
}

fn write_prefix(module: &mut EncoderModule, encoding: &Encoding) {
    if encoding.prefix != 0 {
        module.write(encoding.prefix);
    }
}

/// Writes the REX prefix when any of its bits is set or a 1-byte register
/// demands an empty one to reach spl/bpl/sil/dil.
fn try_write_rex(module: &mut EncoderModule, w: bool, r: bool, x: bool, b: bool, force: bool) {
    let mut rex = 0x40u8;

    if w {
        rex |= 8;
    }
    if r {
        rex |= 4;
    }
    if x {
        rex |= 2;
    }
    if b {
        rex |= 1;
    }

    if rex != 0x40 || force {
        module.write(rex);
    }
}

/// Writes a possibly multi-byte opcode, first byte in the low bits.
fn write_operation(module: &mut EncoderModule, mut operation: u32) {
    loop {
        module.write((operation & 0xFF) as u8);
        operation >>= 8;

        if operation == 0 {
            break;
        }
    }
}

fn write_constant(module: &mut EncoderModule, value: i64, size: u8) -> Result<(), EncodeError> {
    match size {
        1 => module.write(value as u8),
        2 => module.write_u16(value as u16),
        4 => module.write_u32(value as u32),
        8 => module.write_u64(value as u64),
        other => return Err(EncodeError::InvalidConstantSize(other)),
    }

    Ok(())
}

/// Writes ModR/M, SIB and displacement for `form` with `registry` already
/// reduced to its 3-bit name.
fn write_memory_operand(module: &mut EncoderModule, registry: u8, form: &AddressForm<'_>) {
    match form {
        AddressForm::Base { base, offset } => {
            // [rbp] and [r13] can not be encoded without a displacement
            let modifier = if *offset == 0 && name(*base) != RBP {
                0x00
            } else if i8::try_from(*offset).is_ok() {
                0x40
            } else {
                0x80
            };

            module.write(modifier | registry << 3 | name(*base));

            // [rsp] and [r12] select the SIB byte and need a neutral one
            if name(*base) == RSP {
                module.write(RSP << 3 | RSP);
            }

            if modifier == 0x40 {
                module.write(*offset as u8);
            } else if modifier == 0x80 {
                module.write_u32(*offset as u32);
            }
        }

        AddressForm::BaseIndex { base, index, scale, offset } => {
            let modifier = if *offset == 0 && name(*base) != RBP {
                0x00
            } else if i8::try_from(*offset).is_ok() {
                0x40
            } else {
                0x80
            };

            module.write(modifier | registry << 3 | RSP);
            module.write((scale.trailing_zeros() as u8) << 6 | name(*index) << 3 | name(*base));

            if modifier == 0x40 {
                module.write(*offset as u8);
            } else if modifier == 0x80 {
                module.write_u32(*offset as u32);
            }
        }

        AddressForm::Index { index, scale, offset } => {
            // No base: rm selects SIB and the RBP base slot means none
            module.write(registry << 3 | RSP);
            module.write((scale.trailing_zeros() as u8) << 6 | name(*index) << 3 | RBP);
            module.write_u32(*offset as u32);
        }

        AddressForm::Absolute { offset } => {
            module.write(registry << 3 | RSP);
            module.write(RSP << 3 | RBP);
            module.write_u32(*offset as u32);
        }

        AddressForm::Symbol { symbol, offset, modifier } => {
            // [rip+disp32]
            module.write(registry << 3 | RBP);

            let kind = match modifier {
                DataSectionModifier::None => BinaryRelocationKind::ProgramCounterRelative,
                DataSectionModifier::SectionRelative => BinaryRelocationKind::SectionRelative,
            };

            module.memory_relocations.push(BinaryRelocation::new(
                symbol.to_string(),
                module.position,
                *offset,
                kind,
            ));

            module.write_u32(0);
        }
    }
}

fn write_register_and_register(
    module: &mut EncoderModule,
    encoding: &Encoding,
    first: (u8, u8),
    second: (u8, u8),
) {
    write_prefix(module, encoding);
    try_write_rex(
        module,
        encoding.is_64_bit,
        is_extension_register(first.0),
        false,
        is_extension_register(second.0),
        is_overridable_register(first.0, first.1) || is_overridable_register(second.0, second.1),
    );
    write_operation(module, encoding.operation);
    module.write(0xC0 | name(first.0) << 3 | name(second.0));
}

fn write_single_register(
    module: &mut EncoderModule,
    encoding: &Encoding,
    register: (u8, u8),
) {
    write_prefix(module, encoding);
    try_write_rex(
        module,
        encoding.is_64_bit,
        false,
        false,
        is_extension_register(register.0),
        is_overridable_register(register.0, register.1),
    );
    write_operation(module, encoding.operation);
    module.write(0xC0 | encoding.modifier << 3 | name(register.0));
}

fn write_register_and_memory(
    module: &mut EncoderModule,
    encoding: &Encoding,
    register: Option<(u8, u8)>,
    address: &Handle,
    operation: &str,
) -> Result<(), EncodeError> {
    let Some(form) = address_form(address) else {
        return Err(EncodeError::UnsupportedRoute(operation.to_string()));
    };

    let (x, b) = address_extensions(&form);

    // Without a register operand the ModR/M register field holds the opcode
    // extension from the table
    let (registry, r, force) = match register {
        Some((id, size)) => {
            (name(id), is_extension_register(id), is_overridable_register(id, size))
        }
        None => (encoding.modifier, false, false),
    };

    write_prefix(module, encoding);
    try_write_rex(module, encoding.is_64_bit, r, x, b, force);
    write_operation(module, encoding.operation);
    write_memory_operand(module, registry, &form);
    Ok(())
}

fn passes_filter(filter: &OperandFilter, handle: &Handle) -> bool {
    match filter.filter {
        FilterType::Unused => false,

        FilterType::Register => handle.is_register(),

        FilterType::StandardRegister => {
            matches!(handle, Handle::Register { media: false, .. })
        }

        FilterType::MediaRegister => matches!(handle, Handle::Register { media: true, .. }),

        FilterType::SpecificRegister => {
            matches!(handle, Handle::Register { id, .. } if *id as i16 == filter.value)
        }

        FilterType::MemoryAddress => handle.is_memory_address(),

        FilterType::Constant | FilterType::SignlessConstant => handle.is_constant(),

        FilterType::SpecificConstant => {
            matches!(handle, Handle::Constant { value, .. } if *value == i64::from(filter.value))
        }

        FilterType::Label => matches!(handle, Handle::DataSection { address: true, .. }),
    }
}

fn passes_size(filter: &OperandFilter, handle: &Handle) -> bool {
    match handle {
        // A constant fits any encoding at least as wide as it. The declared
        // width counts for plain constant slots, the magnitude elsewhere.
        Handle::Constant { value, .. } => {
            let bytes = match filter.filter {
                FilterType::Constant => handle.size(),
                _ => bits_for_encoding(*value) / 8,
            };

            bytes <= filter.size
        }

        _ => handle.size() == filter.size,
    }
}

fn find_encoding<'a>(
    encodings: &'a [Encoding],
    operands: &[&Handle],
    operation: &str,
) -> Result<&'a Encoding, EncodeError> {
    'candidates: for encoding in encodings {
        for (index, handle) in operands.iter().enumerate() {
            let filter = &encoding.operands[index];

            if !passes_filter(filter, handle) || !passes_size(filter, handle) {
                continue 'candidates;
            }
        }

        return Ok(encoding);
    }

    Err(EncodeError::MissingEncoding(operation.to_string()))
}

/// Encodes one normal, jump or call instruction into the module output.
pub(super) fn write_instruction(
    module: &mut EncoderModule,
    instruction: &Instruction,
    is_terminator: bool,
) -> Result<(), EncodeError> {
    let operation = instruction.operation.as_str();

    if operation.is_empty() {
        return Ok(());
    }

    let primary = match operation.strip_prefix("lock ") {
        Some(primary) => {
            module.write(LOCK_PREFIX);
            primary
        }
        None => operation,
    };

    let Some(index) = instruction_index(primary) else {
        return Err(EncodeError::UnknownInstruction(operation.to_string()));
    };

    let operands: Vec<&Handle> = instruction.visible_parameters().collect();

    let tables = match operands.len() {
        0 => &PARAMETERLESS_ENCODINGS,
        1 => &SINGLE_PARAMETER_ENCODINGS,
        2 => &DUAL_PARAMETER_ENCODINGS,
        3 => &TRIPLE_PARAMETER_ENCODINGS,
        _ => return Err(EncodeError::MissingEncoding(operation.to_string())),
    };

    let encodings = tables
        .get(index)
        .filter(|encodings| !encodings.is_empty())
        .ok_or_else(|| EncodeError::MissingEncoding(operation.to_string()))?;

    let encoding = find_encoding(encodings, &operands, operation)?;
    let relocation_watermark = module.memory_relocations.len();
    let unsupported = || EncodeError::UnsupportedRoute(operation.to_string());

    match encoding.route {
        Route::Rr => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            let second = register_of(operands[1]).ok_or_else(unsupported)?;
            write_register_and_register(module, encoding, first, second);
        }

        Route::Rm => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            write_register_and_memory(module, encoding, Some(first), operands[1], operation)?;
        }

        Route::Mr => {
            let second = register_of(operands[1]).ok_or_else(unsupported)?;
            write_register_and_memory(module, encoding, Some(second), operands[0], operation)?;
        }

        Route::Rc => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            let value = constant_of(operands[1]).ok_or_else(unsupported)?;
            write_single_register(module, encoding, first);
            write_constant(module, value, encoding.operands[1].size)?;
        }

        Route::Mc => {
            let value = constant_of(operands[1]).ok_or_else(unsupported)?;
            write_register_and_memory(module, encoding, None, operands[0], operation)?;
            write_constant(module, value, encoding.operands[1].size)?;
        }

        Route::Rmc => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            let value = constant_of(operands[2]).ok_or_else(unsupported)?;
            write_register_and_memory(module, encoding, Some(first), operands[1], operation)?;
            write_constant(module, value, encoding.operands[2].size)?;
        }

        Route::Rrc => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            let second = register_of(operands[1]).ok_or_else(unsupported)?;
            let value = constant_of(operands[2]).ok_or_else(unsupported)?;
            write_register_and_register(module, encoding, first, second);
            write_constant(module, value, encoding.operands[2].size)?;
        }

        Route::Drc => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            let value = constant_of(operands[1]).ok_or_else(unsupported)?;
            write_register_and_register(module, encoding, first, first);
            write_constant(module, value, encoding.operands[1].size)?;
        }

        Route::R => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            write_single_register(module, encoding, first);
        }

        Route::M => {
            write_register_and_memory(module, encoding, None, operands[0], operation)?;
        }

        Route::O => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            write_prefix(module, encoding);
            try_write_rex(
                module,
                encoding.is_64_bit,
                false,
                false,
                is_extension_register(first.0),
                is_overridable_register(first.0, first.1),
            );
            write_operation(module, encoding.operation + u32::from(name(first.0)));
        }

        Route::Oc => {
            let first = register_of(operands[0]).ok_or_else(unsupported)?;
            let value = constant_of(operands[1]).ok_or_else(unsupported)?;
            write_prefix(module, encoding);
            try_write_rex(
                module,
                encoding.is_64_bit,
                false,
                false,
                is_extension_register(first.0),
                is_overridable_register(first.0, first.1),
            );
            write_operation(module, encoding.operation + u32::from(name(first.0)));
            write_constant(module, value, encoding.operands[0].size)?;
        }

        Route::Sc => {
            let value = constant_of(operands[1]).ok_or_else(unsupported)?;
            write_prefix(module, encoding);
            try_write_rex(module, encoding.is_64_bit, false, false, false, false);
            write_operation(module, encoding.operation);
            write_constant(module, value, encoding.operands[1].size)?;
        }

        Route::So => {
            let second = register_of(operands[1]).ok_or_else(unsupported)?;
            write_prefix(module, encoding);
            try_write_rex(
                module,
                encoding.is_64_bit,
                false,
                false,
                is_extension_register(second.0),
                false,
            );
            write_operation(module, encoding.operation + u32::from(name(second.0)));
        }

        Route::D => {
            let Handle::DataSection { symbol, .. } = operands[0] else {
                return Err(EncodeError::UnsupportedRoute(operation.to_string()));
            };

            write_operation(module, encoding.operation);

            let placeholder = module.position;
            module.write_u32(0);

            let terminates = is_terminator
                && instruction.kind == InstructionKind::Jump
                && module.jump.as_ref().is_some_and(|jump| jump.label == *symbol);

            if terminates {
                if let Some(jump) = module.jump.as_mut() {
                    jump.position = module.position;
                }
            } else {
                // Calls and stray label jumps get their 32-bit offset patched
                // in once the module layout is final
                module.calls.push(LabelUsage { label: symbol.clone(), position: placeholder });
            }
        }

        Route::L => {}

        Route::None => {
            write_prefix(module, encoding);
            try_write_rex(module, encoding.is_64_bit, false, false, false, false);
            write_operation(module, encoding.operation);
        }
    }

    // A [rip+disp32] placeholder is relative to the end of the instruction,
    // which is only known after trailing immediates are written
    for relocation in &mut module.memory_relocations[relocation_watermark..] {
        if relocation.kind == BinaryRelocationKind::ProgramCounterRelative {
            relocation.addend -= (module.position - relocation.offset) as i64;
        }
    }

    Ok(())
}
