//! Static x86-64 encoding tables.
//!
//! Each operation maps to a list of candidate `Encoding` descriptors sized by
//! operand count. Candidates are scanned in declaration order and the first
//! whose filters and sizes all pass is used, so the order of the rows below
//! encodes selection priority.
//!
//! Multi-byte opcodes are stored with the first byte in the low bits, the way
//! they are written out.

use std::sync::LazyLock;

use crate::register::{RAX, RCX};

pub const LOCK_PREFIX: u8 = 0xF0;
pub const OPERAND_SIZE_OVERRIDE: u8 = 0x66;

/// Operand predicate attached to one slot of an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// Slot is unused.
    Unused,
    /// Any register, standard or media.
    Register,
    StandardRegister,
    MediaRegister,
    /// A register with the exact identifier in the filter value.
    SpecificRegister,
    /// Any memory operand, including data-section references.
    MemoryAddress,
    /// A constant whose declared width fits the slot size.
    Constant,
    /// A constant with the exact value in the filter value.
    SpecificConstant,
    /// A constant whose magnitude fits the slot size, ignoring sign.
    SignlessConstant,
    /// An address-of data-section reference (jump and call targets).
    Label,
}

use FilterType as F;

/// Operand layout of an encoding: which bytes follow the opcode and where
/// each operand is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Register, memory, constant.
    Rmc,
    /// Register, register, constant.
    Rrc,
    /// Register, constant, encoded as if the register appeared twice.
    Drc,
    /// Register, register.
    Rr,
    /// Register, constant.
    Rc,
    /// Register, memory.
    Rm,
    /// Memory, register.
    Mr,
    /// Register added into the opcode, then a constant.
    Oc,
    /// Memory, constant.
    Mc,
    /// Single register through ModR/M.
    R,
    /// Single memory operand through ModR/M.
    M,
    /// Register added into the opcode.
    O,
    /// Label offset: opcode plus a 32-bit placeholder.
    D,
    /// Label declaration, writes nothing.
    L,
    /// First operand is implied by the opcode, then a constant.
    Sc,
    /// First operand is implied, second register added into the opcode.
    So,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct OperandFilter {
    pub filter: FilterType,
    pub value: i16,
    pub size: u8,
}

const UNUSED: OperandFilter = OperandFilter { filter: F::Unused, value: 0, size: 0 };

/// One candidate byte encoding of an operation.
#[derive(Debug, Clone, Copy)]
pub struct Encoding {
    pub prefix: u8,
    pub is_64_bit: bool,
    pub operation: u32,
    pub modifier: u8,
    pub route: Route,
    pub operands: [OperandFilter; 3],
}

fn bare(operation: u32, route: Route, rex: bool) -> Encoding {
    Encoding {
        prefix: 0,
        is_64_bit: rex,
        operation,
        modifier: 0,
        route,
        operands: [UNUSED; 3],
    }
}

#[allow(clippy::too_many_arguments)]
fn single(
    operation: u32,
    modifier: u8,
    route: Route,
    rex: bool,
    first: (FilterType, i16, u8),
    prefix: u8,
) -> Encoding {
    Encoding {
        prefix,
        is_64_bit: rex,
        operation,
        modifier,
        route,
        operands: [
            OperandFilter { filter: first.0, value: first.1, size: first.2 },
            UNUSED,
            UNUSED,
        ],
    }
}

#[allow(clippy::too_many_arguments)]
fn dual(
    operation: u32,
    modifier: u8,
    route: Route,
    rex: bool,
    first: (FilterType, i16, u8),
    second: (FilterType, i16, u8),
    prefix: u8,
) -> Encoding {
    Encoding {
        prefix,
        is_64_bit: rex,
        operation,
        modifier,
        route,
        operands: [
            OperandFilter { filter: first.0, value: first.1, size: first.2 },
            OperandFilter { filter: second.0, value: second.1, size: second.2 },
            UNUSED,
        ],
    }
}

#[allow(clippy::too_many_arguments)]
fn triple(
    operation: u32,
    modifier: u8,
    route: Route,
    rex: bool,
    first: (FilterType, i16, u8),
    second: (FilterType, i16, u8),
    third: (FilterType, i16, u8),
    prefix: u8,
) -> Encoding {
    Encoding {
        prefix,
        is_64_bit: rex,
        operation,
        modifier,
        route,
        operands: [
            OperandFilter { filter: first.0, value: first.1, size: first.2 },
            OperandFilter { filter: second.0, value: second.1, size: second.2 },
            OperandFilter { filter: third.0, value: third.1, size: third.2 },
        ],
    }
}

// Parameterless operation indices
pub const OP_RET: usize = 0;
pub const OP_LABEL: usize = 1;
pub const OP_CQO: usize = 2;
pub const OP_SYSCALL: usize = 3;
pub const OP_FLD1: usize = 4;
pub const OP_FYL2X: usize = 5;
pub const OP_F2XM1: usize = 6;
pub const OP_FADDP: usize = 7;
pub const OP_FCOS: usize = 8;
pub const OP_FSIN: usize = 9;
pub const OP_NOP: usize = 10;
const PARAMETERLESS_OPERATIONS: usize = 11;

// Single parameter operation indices
pub const OP_PUSH: usize = 0;
pub const OP_POP: usize = 1;
pub const OP_JA: usize = 2;
// 3 is imul, shared with the dual and triple tables
pub const OP_MUL: usize = 4;
pub const OP_IDIV: usize = 5;
pub const OP_DIV: usize = 6;
pub const OP_JAE: usize = 7;
pub const OP_JB: usize = 8;
pub const OP_JBE: usize = 9;
pub const OP_JE: usize = 10;
pub const OP_JG: usize = 11;
pub const OP_JGE: usize = 12;
pub const OP_JL: usize = 13;
pub const OP_JLE: usize = 14;
pub const OP_JMP: usize = 15;
pub const OP_JNE: usize = 16;
pub const OP_JNZ: usize = 17;
pub const OP_JZ: usize = 18;
pub const OP_CALL: usize = 19;
pub const OP_FILD: usize = 20;
pub const OP_FLD: usize = 21;
pub const OP_FISTP: usize = 22;
pub const OP_FSTP: usize = 23;
pub const OP_NEG: usize = 24;
pub const OP_NOT: usize = 25;
pub const OP_SETA: usize = 26;
pub const OP_SETAE: usize = 27;
pub const OP_SETB: usize = 28;
pub const OP_SETBE: usize = 29;
pub const OP_SETE: usize = 30;
pub const OP_SETG: usize = 31;
pub const OP_SETGE: usize = 32;
pub const OP_SETL: usize = 33;
pub const OP_SETLE: usize = 34;
pub const OP_SETNE: usize = 35;
pub const OP_SETNZ: usize = 36;
pub const OP_SETZ: usize = 37;
const SINGLE_PARAMETER_OPERATIONS: usize = 38;

// Dual parameter operation indices
pub const OP_MOV: usize = 0;
pub const OP_ADD: usize = 1;
pub const OP_SUB: usize = 2;
pub const OP_IMUL: usize = 3;
pub const OP_SAL: usize = 4;
pub const OP_SAR: usize = 5;
pub const OP_MOVZX: usize = 6;
pub const OP_MOVSX: usize = 7;
pub const OP_MOVSXD: usize = 8;
pub const OP_LEA: usize = 9;
pub const OP_CMP: usize = 10;
pub const OP_ADDSD: usize = 11;
pub const OP_SUBSD: usize = 12;
pub const OP_MULSD: usize = 13;
pub const OP_DIVSD: usize = 14;
pub const OP_MOVSD: usize = 15;
pub const OP_MOVQ: usize = 16;
pub const OP_CVTSI2SD: usize = 17;
pub const OP_CVTTSD2SI: usize = 18;
pub const OP_AND: usize = 19;
pub const OP_XOR: usize = 20;
pub const OP_OR: usize = 21;
pub const OP_COMISD: usize = 22;
pub const OP_TEST: usize = 23;
pub const OP_MOVUPS: usize = 24;
pub const OP_SQRTSD: usize = 25;
pub const OP_XCHG: usize = 26;
pub const OP_PXOR: usize = 27;
pub const OP_SHR: usize = 28;
pub const OP_CMOVA: usize = 29;
pub const OP_CMOVAE: usize = 30;
pub const OP_CMOVB: usize = 31;
pub const OP_CMOVBE: usize = 32;
pub const OP_CMOVE: usize = 33;
pub const OP_CMOVG: usize = 34;
pub const OP_CMOVGE: usize = 35;
pub const OP_CMOVL: usize = 36;
pub const OP_CMOVLE: usize = 37;
pub const OP_CMOVNE: usize = 38;
pub const OP_CMOVNZ: usize = 39;
pub const OP_CMOVZ: usize = 40;
pub const OP_XORPD: usize = 41;
const DUAL_PARAMETER_OPERATIONS: usize = 42;

const TRIPLE_PARAMETER_OPERATIONS: usize = 4;

/// Resolves a mnemonic to its operation index. The operand count of the
/// instruction selects which table the index is applied to.
pub fn instruction_index(operation: &str) -> Option<usize> {
    let index = match operation {
        // Parameterless
        "ret" => OP_RET,
        "cqo" => OP_CQO,
        "syscall" => OP_SYSCALL,
        "fld1" => OP_FLD1,
        "fyl2x" => OP_FYL2X,
        "f2xm1" => OP_F2XM1,
        "faddp" => OP_FADDP,
        "fcos" => OP_FCOS,
        "fsin" => OP_FSIN,
        "nop" => OP_NOP,

        // Single parameter
        "push" => OP_PUSH,
        "pop" => OP_POP,
        "ja" => OP_JA,
        "jae" => OP_JAE,
        "jb" => OP_JB,
        "jbe" => OP_JBE,
        "je" => OP_JE,
        "jg" => OP_JG,
        "jge" => OP_JGE,
        "jl" => OP_JL,
        "jle" => OP_JLE,
        "jmp" => OP_JMP,
        "jne" => OP_JNE,
        "jnz" => OP_JNZ,
        "jz" => OP_JZ,
        "call" => OP_CALL,
        "fild" => OP_FILD,
        "fld" => OP_FLD,
        "fistp" => OP_FISTP,
        "fstp" => OP_FSTP,
        "neg" => OP_NEG,
        "not" => OP_NOT,
        "seta" => OP_SETA,
        "setae" => OP_SETAE,
        "setb" => OP_SETB,
        "setbe" => OP_SETBE,
        "sete" => OP_SETE,
        "setg" => OP_SETG,
        "setge" => OP_SETGE,
        "setl" => OP_SETL,
        "setle" => OP_SETLE,
        "setne" => OP_SETNE,
        "setnz" => OP_SETNZ,
        "setz" => OP_SETZ,
        "mul" => OP_MUL,
        "idiv" => OP_IDIV,
        "div" => OP_DIV,

        // Dual parameter (imul also serves the single and triple tables)
        "mov" => OP_MOV,
        "add" => OP_ADD,
        "sub" => OP_SUB,
        "imul" => OP_IMUL,
        "sal" => OP_SAL,
        "sar" => OP_SAR,
        "movzx" => OP_MOVZX,
        "movsx" => OP_MOVSX,
        "movsxd" => OP_MOVSXD,
        "lea" => OP_LEA,
        "cmp" => OP_CMP,
        "addsd" => OP_ADDSD,
        "subsd" => OP_SUBSD,
        "mulsd" => OP_MULSD,
        "divsd" => OP_DIVSD,
        "movsd" => OP_MOVSD,
        "movq" => OP_MOVQ,
        "cvtsi2sd" => OP_CVTSI2SD,
        "cvttsd2si" => OP_CVTTSD2SI,
        "and" => OP_AND,
        "xor" => OP_XOR,
        "or" => OP_OR,
        "comisd" => OP_COMISD,
        "test" => OP_TEST,
        "movups" => OP_MOVUPS,
        "sqrtsd" => OP_SQRTSD,
        "xchg" => OP_XCHG,
        "pxor" => OP_PXOR,
        "shr" => OP_SHR,
        "cmova" => OP_CMOVA,
        "cmovae" => OP_CMOVAE,
        "cmovb" => OP_CMOVB,
        "cmovbe" => OP_CMOVBE,
        "cmove" => OP_CMOVE,
        "cmovg" => OP_CMOVG,
        "cmovge" => OP_CMOVGE,
        "cmovl" => OP_CMOVL,
        "cmovle" => OP_CMOVLE,
        "cmovne" => OP_CMOVNE,
        "cmovnz" => OP_CMOVNZ,
        "cmovz" => OP_CMOVZ,
        "xorpd" => OP_XORPD,

        _ => return None,
    };

    Some(index)
}

/// Whether the mnemonic is an unconditional or conditional jump.
pub fn is_jump(operation: &str) -> bool {
    matches!(
        operation,
        "jmp" | "ja" | "jae" | "jb" | "jbe" | "je" | "jg" | "jge" | "jl" | "jle" | "jne" | "jnz"
            | "jz"
    )
}

fn conditional_move_encodings(operation: u32) -> Vec<Encoding> {
    vec![
        // cmov** r16/r32/r64, r16/r32/r64
        dual(operation, 0, Route::Rr, false, (F::StandardRegister, 0, 2), (F::StandardRegister, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(operation, 0, Route::Rr, false, (F::StandardRegister, 0, 4), (F::StandardRegister, 0, 4), 0),
        dual(operation, 0, Route::Rr, true, (F::StandardRegister, 0, 8), (F::StandardRegister, 0, 8), 0),

        // cmov** r16/r32/r64, m16/m32/m64
        dual(operation, 0, Route::Rm, false, (F::StandardRegister, 0, 2), (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(operation, 0, Route::Rm, false, (F::StandardRegister, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(operation, 0, Route::Rm, true, (F::StandardRegister, 0, 8), (F::MemoryAddress, 0, 8), 0),
    ]
}

fn conditional_set_encodings(operation: u32) -> Vec<Encoding> {
    vec![
        // set** r16/r32/r64
        single(operation, 0, Route::R, false, (F::StandardRegister, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(operation, 0, Route::R, false, (F::StandardRegister, 0, 4), 0),
        single(operation, 0, Route::R, true, (F::StandardRegister, 0, 8), 0),

        // set** m16/m32/m64
        single(operation, 0, Route::M, false, (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(operation, 0, Route::M, false, (F::MemoryAddress, 0, 4), 0),
        single(operation, 0, Route::M, true, (F::MemoryAddress, 0, 8), 0),
    ]
}

pub static PARAMETERLESS_ENCODINGS: LazyLock<Vec<Vec<Encoding>>> = LazyLock::new(|| {
    let mut tables = vec![Vec::new(); PARAMETERLESS_OPERATIONS];

    tables[OP_RET] = vec![bare(0xC3, Route::None, false)];
    tables[OP_LABEL] = vec![bare(0x00, Route::L, false)];
    tables[OP_CQO] = vec![bare(0x99, Route::None, true)];
    tables[OP_SYSCALL] = vec![bare(0x050F, Route::None, false)];
    tables[OP_FLD1] = vec![bare(0xE8D9, Route::None, false)];
    tables[OP_FYL2X] = vec![bare(0xF1D9, Route::None, false)];
    tables[OP_F2XM1] = vec![bare(0xF0D9, Route::None, false)];
    tables[OP_FADDP] = vec![bare(0xC1DE, Route::None, false)];
    tables[OP_FCOS] = vec![bare(0xFFD9, Route::None, false)];
    tables[OP_FSIN] = vec![bare(0xFED9, Route::None, false)];
    tables[OP_NOP] = vec![bare(0x90, Route::None, false)];

    tables
});

pub static SINGLE_PARAMETER_ENCODINGS: LazyLock<Vec<Vec<Encoding>>> = LazyLock::new(|| {
    let mut tables = vec![Vec::new(); SINGLE_PARAMETER_OPERATIONS];

    tables[OP_PUSH] = vec![
        // push r16 | push r64
        single(0x50, 0, Route::O, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0x50, 0, Route::O, false, (F::Register, 0, 8), 0),
    ];

    tables[OP_POP] = vec![
        // pop r16 | pop r64
        single(0x58, 0, Route::O, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0x58, 0, Route::O, false, (F::Register, 0, 8), 0),
    ];

    tables[OP_IMUL] = vec![
        // imul r8 | imul r16 | imul r32 | imul r64
        single(0xF6, 5, Route::R, false, (F::Register, 0, 1), 0),
        single(0xF7, 5, Route::R, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 5, Route::R, false, (F::Register, 0, 4), 0),
        single(0xF7, 5, Route::R, true, (F::Register, 0, 8), 0),
    ];

    tables[OP_MUL] = vec![
        // mul r8 | mul r16 | mul r32 | mul r64
        single(0xF6, 4, Route::R, false, (F::Register, 0, 1), 0),
        single(0xF7, 4, Route::R, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 4, Route::R, false, (F::Register, 0, 4), 0),
        single(0xF7, 4, Route::R, true, (F::Register, 0, 8), 0),

        // mul m8 | mul m16 | mul m32 | mul m64
        single(0xF6, 4, Route::M, false, (F::MemoryAddress, 0, 1), 0),
        single(0xF7, 4, Route::M, false, (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 4, Route::M, false, (F::MemoryAddress, 0, 4), 0),
        single(0xF7, 4, Route::M, true, (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_IDIV] = vec![
        // idiv r8 | idiv r16 | idiv r32 | idiv r64
        single(0xF6, 7, Route::R, false, (F::Register, 0, 1), 0),
        single(0xF7, 7, Route::R, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 7, Route::R, false, (F::Register, 0, 4), 0),
        single(0xF7, 7, Route::R, true, (F::Register, 0, 8), 0),

        // idiv m8 | idiv m16 | idiv m32 | idiv m64
        single(0xF6, 7, Route::M, false, (F::MemoryAddress, 0, 1), 0),
        single(0xF7, 7, Route::M, false, (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 7, Route::M, false, (F::MemoryAddress, 0, 4), 0),
        single(0xF7, 7, Route::M, true, (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_DIV] = vec![
        // div r8 | div r16 | div r32 | div r64
        single(0xF6, 6, Route::R, false, (F::Register, 0, 1), 0),
        single(0xF7, 6, Route::R, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 6, Route::R, false, (F::Register, 0, 4), 0),
        single(0xF7, 6, Route::R, true, (F::Register, 0, 8), 0),

        // div m8 | div m16 | div m32 | div m64
        single(0xF6, 6, Route::M, false, (F::MemoryAddress, 0, 1), 0),
        single(0xF7, 6, Route::M, false, (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 6, Route::M, false, (F::MemoryAddress, 0, 4), 0),
        single(0xF7, 6, Route::M, true, (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_JA] = vec![single(0x870F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JAE] = vec![single(0x830F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JB] = vec![single(0x820F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JBE] = vec![single(0x860F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JE] = vec![single(0x840F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JG] = vec![single(0x8F0F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JGE] = vec![single(0x8D0F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JL] = vec![single(0x8C0F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JLE] = vec![single(0x8E0F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JNE] = vec![single(0x850F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JNZ] = vec![single(0x850F, 0, Route::D, false, (F::Label, 0, 8), 0)];
    tables[OP_JZ] = vec![single(0x840F, 0, Route::D, false, (F::Label, 0, 8), 0)];

    tables[OP_JMP] = vec![
        single(0xE9, 0, Route::D, false, (F::Label, 0, 8), 0),
        single(0xFF, 4, Route::R, false, (F::Register, 0, 8), 0),
        single(0xFF, 4, Route::M, false, (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_CALL] = vec![
        // call label | call r64 | call m64
        single(0xE8, 0, Route::D, false, (F::Label, 0, 8), 0),
        single(0xFF, 2, Route::R, false, (F::Register, 0, 8), 0),
        single(0xFF, 2, Route::M, false, (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_FILD] = vec![single(0xDF, 5, Route::M, false, (F::MemoryAddress, 0, 8), 0)];
    tables[OP_FLD] = vec![single(0xDD, 0, Route::M, false, (F::MemoryAddress, 0, 8), 0)];
    tables[OP_FISTP] = vec![single(0xDF, 7, Route::M, false, (F::MemoryAddress, 0, 8), 0)];
    tables[OP_FSTP] = vec![single(0xDD, 3, Route::M, false, (F::MemoryAddress, 0, 8), 0)];

    tables[OP_NEG] = vec![
        // neg r8 | neg r16 | neg r32 | neg r64
        single(0xF6, 3, Route::R, false, (F::Register, 0, 1), 0),
        single(0xF7, 3, Route::R, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 3, Route::R, false, (F::Register, 0, 4), 0),
        single(0xF7, 3, Route::R, true, (F::Register, 0, 8), 0),

        // neg m8 | neg m16 | neg m32 | neg m64
        single(0xF6, 3, Route::M, false, (F::MemoryAddress, 0, 1), 0),
        single(0xF7, 3, Route::M, false, (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 3, Route::M, false, (F::MemoryAddress, 0, 4), 0),
        single(0xF7, 3, Route::M, true, (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_NOT] = vec![
        // not r8 | not r16 | not r32 | not r64
        single(0xF6, 2, Route::R, false, (F::Register, 0, 1), 0),
        single(0xF7, 2, Route::R, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 2, Route::R, false, (F::Register, 0, 4), 0),
        single(0xF7, 2, Route::R, true, (F::Register, 0, 8), 0),

        // not m8 | not m16 | not m32 | not m64
        single(0xF6, 2, Route::M, false, (F::MemoryAddress, 0, 1), 0),
        single(0xF7, 2, Route::M, false, (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 2, Route::M, false, (F::MemoryAddress, 0, 4), 0),
        single(0xF7, 2, Route::M, true, (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_SETA] = conditional_set_encodings(0x970F);
    tables[OP_SETAE] = conditional_set_encodings(0x930F);
    tables[OP_SETB] = conditional_set_encodings(0x920F);
    tables[OP_SETBE] = conditional_set_encodings(0x960F);
    tables[OP_SETE] = conditional_set_encodings(0x940F);
    tables[OP_SETG] = conditional_set_encodings(0x9F0F);
    tables[OP_SETGE] = conditional_set_encodings(0x9D0F);
    tables[OP_SETL] = conditional_set_encodings(0x9C0F);
    tables[OP_SETLE] = conditional_set_encodings(0x9E0F);
    tables[OP_SETNE] = conditional_set_encodings(0x950F);
    tables[OP_SETNZ] = conditional_set_encodings(0x950F);
    tables[OP_SETZ] = conditional_set_encodings(0x940F);

    tables
});

pub static DUAL_PARAMETER_ENCODINGS: LazyLock<Vec<Vec<Encoding>>> = LazyLock::new(|| {
    let mut tables = vec![Vec::new(); DUAL_PARAMETER_OPERATIONS];

    tables[OP_MOV] = vec![
        // mov r8, r8 | mov r16, r16 | mov r32, r32 | mov r64, r64
        dual(0x8A, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x8B, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x8B, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x8B, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // mov m8, r8 | mov m16, r16 | mov m32, r32 | mov m64, r64
        dual(0x88, 0, Route::Mr, false, (F::MemoryAddress, 0, 1), (F::Register, 0, 1), 0),
        dual(0x89, 0, Route::Mr, false, (F::MemoryAddress, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x89, 0, Route::Mr, false, (F::MemoryAddress, 0, 4), (F::Register, 0, 4), 0),
        dual(0x89, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0),

        // mov r8, m8 | mov r16, m16 | mov r32, m32 | mov r64, m64
        dual(0x8A, 0, Route::Rm, false, (F::Register, 0, 1), (F::MemoryAddress, 0, 1), 0),
        dual(0x8B, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x8B, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0x8B, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),

        // mov r64, c32 (sign extended)
        dual(0xC7, 0, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 4), 0),

        // mov r8, c8 | mov r16, c16 | mov r32, c32 | mov r64, c64
        dual(0xB0, 0, Route::Oc, false, (F::Register, 0, 1), (F::SignlessConstant, 0, 1), 0),
        dual(0xB8, 0, Route::Oc, false, (F::Register, 0, 2), (F::SignlessConstant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xB8, 0, Route::Oc, false, (F::Register, 0, 4), (F::SignlessConstant, 0, 4), 0),
        dual(0xB8, 0, Route::Oc, true, (F::Register, 0, 8), (F::SignlessConstant, 0, 8), 0),

        // mov m8, c8 | mov m16, c16 | mov m32, c32 | mov m64, c32
        dual(0xC6, 0, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::SignlessConstant, 0, 1), 0),
        dual(0xC7, 0, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::SignlessConstant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xC7, 0, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::SignlessConstant, 0, 4), 0),
        dual(0xC7, 0, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::SignlessConstant, 0, 4), 0),
    ];

    tables[OP_ADD] = vec![
        // add r16, c8 | add r32, c8 | add r64, c8
        dual(0x83, 0, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0x83, 0, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x83, 0, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // add al, c8 | add ax, c16 | add eax, c32 | add rax, c32
        dual(0x04, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 1), (F::Constant, 0, 1), 0),
        dual(0x05, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x05, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 4), (F::Constant, 0, 4), 0),
        dual(0x05, 0, Route::Sc, true, (F::SpecificRegister, RAX as i16, 8), (F::Constant, 0, 4), 0),

        // add r8, c8 | add r16, c16 | add r32, c32 | add r64, c32
        dual(0x80, 0, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 0, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x81, 0, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 0, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 4), 0),

        // add m8, c8 | add m16, c16 | add m32, c32 | add m64, c32
        dual(0x80, 0, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 0, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x81, 0, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 0, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 4), 0),

        // add r8, r8 | add r16, r16 | add r32, r32 | add r64, r64
        dual(0x02, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x03, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x03, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x03, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // add m8, r8 | add m16, r16 | add m32, r32 | add m64, r64
        dual(0x00, 0, Route::Mr, false, (F::MemoryAddress, 0, 1), (F::Register, 0, 1), 0),
        dual(0x01, 0, Route::Mr, false, (F::MemoryAddress, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x01, 0, Route::Mr, false, (F::MemoryAddress, 0, 4), (F::Register, 0, 4), 0),
        dual(0x01, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0),

        // add r8, m8 | add r16, m16 | add r32, m32 | add r64, m64
        dual(0x02, 0, Route::Rm, false, (F::Register, 0, 1), (F::MemoryAddress, 0, 1), 0),
        dual(0x03, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x03, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0x03, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_SUB] = vec![
        // sub r16, c8 | sub r32, c8 | sub r64, c8
        dual(0x83, 5, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0x83, 5, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x83, 5, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // sub al, c8 | sub ax, c16 | sub eax, c32 | sub rax, c32
        dual(0x2C, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 1), (F::Constant, 0, 1), 0),
        dual(0x2D, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x2D, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 4), (F::Constant, 0, 4), 0),
        dual(0x2D, 0, Route::Sc, true, (F::SpecificRegister, RAX as i16, 8), (F::Constant, 0, 4), 0),

        // sub r8, c8 | sub r16, c16 | sub r32, c32 | sub r64, c32
        dual(0x80, 5, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 5, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x81, 5, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 5, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 4), 0),

        // sub m8, c8 | sub m16, c16 | sub m32, c32 | sub m64, c32
        dual(0x80, 5, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 5, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x81, 5, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 5, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 4), 0),

        // sub r8, r8 | sub r16, r16 | sub r32, r32 | sub r64, r64
        dual(0x2A, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x2B, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x2B, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x2B, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // sub m8, r8 | sub m16, r16 | sub m32, r32 | sub m64, r64
        dual(0x28, 0, Route::Mr, false, (F::MemoryAddress, 0, 1), (F::Register, 0, 1), 0),
        dual(0x29, 0, Route::Mr, false, (F::MemoryAddress, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x29, 0, Route::Mr, false, (F::MemoryAddress, 0, 4), (F::Register, 0, 4), 0),
        dual(0x29, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0),

        // sub r8, m8 | sub r16, m16 | sub r32, m32 | sub r64, m64
        dual(0x2A, 0, Route::Rm, false, (F::Register, 0, 1), (F::MemoryAddress, 0, 1), 0),
        dual(0x2B, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x2B, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0x2B, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_IMUL] = vec![
        // imul r8 | imul r16 | imul r32 | imul r64
        single(0xF6, 5, Route::R, false, (F::Register, 0, 1), 0),
        single(0xF7, 5, Route::R, false, (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 5, Route::R, false, (F::Register, 0, 4), 0),
        single(0xF7, 5, Route::R, true, (F::Register, 0, 8), 0),

        // imul m8 | imul m16 | imul m32 | imul m64
        single(0xF6, 5, Route::M, false, (F::MemoryAddress, 0, 1), 0),
        single(0xF7, 5, Route::M, false, (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        single(0xF7, 5, Route::M, false, (F::MemoryAddress, 0, 4), 0),
        single(0xF7, 5, Route::M, true, (F::MemoryAddress, 0, 8), 0),

        // imul r16, r16 | imul r32, r32 | imul r64, r64
        dual(0xAF0F, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xAF0F, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0xAF0F, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // imul r16, m16 | imul r32, m32 | imul r64, m64
        dual(0xAF0F, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xAF0F, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0xAF0F, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),

        // imul r16, c8 | imul r32, c8 | imul r64, c8
        dual(0x6B, 0, Route::Drc, false, (F::Register, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0x6B, 0, Route::Drc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x6B, 0, Route::Drc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // imul r16, c16 | imul r32, c32 | imul r64, c32
        dual(0x69, 0, Route::Drc, false, (F::Register, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x69, 0, Route::Drc, false, (F::Register, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x69, 0, Route::Drc, true, (F::Register, 0, 8), (F::Constant, 0, 4), 0),
    ];

    tables[OP_SAL] = vec![
        // sal r8, 1 | sal r16, 1 | sal r32, 1 | sal r64, 1
        dual(0xD0, 4, Route::R, false, (F::Register, 0, 1), (F::SpecificConstant, 1, 1), 0),
        dual(0xD1, 4, Route::R, false, (F::Register, 0, 2), (F::SpecificConstant, 1, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xD1, 4, Route::R, false, (F::Register, 0, 4), (F::SpecificConstant, 1, 4), 0),
        dual(0xD1, 4, Route::R, true, (F::Register, 0, 8), (F::SpecificConstant, 1, 8), 0),

        // sal m8, 1 | sal m16, 1 | sal m32, 1 | sal m64, 1
        dual(0xD0, 4, Route::M, false, (F::MemoryAddress, 0, 1), (F::SpecificConstant, 1, 1), 0),
        dual(0xD1, 4, Route::M, false, (F::MemoryAddress, 0, 2), (F::SpecificConstant, 1, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xD1, 4, Route::M, false, (F::MemoryAddress, 0, 4), (F::SpecificConstant, 1, 4), 0),
        dual(0xD1, 4, Route::M, true, (F::MemoryAddress, 0, 8), (F::SpecificConstant, 1, 8), 0),

        // sal r8, c8 | sal r16, c8 | sal r32, c8 | sal r64, c8
        dual(0xC0, 4, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0xC1, 4, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xC1, 4, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0xC1, 4, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // sal m8, c8 | sal m16, c8 | sal m32, c8 | sal m64, c8
        dual(0xC0, 4, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0xC1, 4, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xC1, 4, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 1), 0),
        dual(0xC1, 4, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 1), 0),

        // sal r8, cl | sal r16, cl | sal r32, cl | sal r64, cl
        dual(0xD2, 4, Route::R, false, (F::Register, 0, 1), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 4, Route::R, false, (F::Register, 0, 2), (F::SpecificRegister, RCX as i16, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xD3, 4, Route::R, false, (F::Register, 0, 4), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 4, Route::R, true, (F::Register, 0, 8), (F::SpecificRegister, RCX as i16, 1), 0),

        // sal m8, cl | sal m16, cl | sal m32, cl | sal m64, cl
        dual(0xD2, 4, Route::M, false, (F::MemoryAddress, 0, 1), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 4, Route::M, false, (F::MemoryAddress, 0, 2), (F::SpecificRegister, RCX as i16, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xD3, 4, Route::M, false, (F::MemoryAddress, 0, 4), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 4, Route::M, true, (F::MemoryAddress, 0, 8), (F::SpecificRegister, RCX as i16, 1), 0),
    ];

    tables[OP_SAR] = vec![
        // sar r8, 1 | sar r16, 1 | sar r32, 1 | sar r64, 1
        dual(0xD0, 7, Route::R, false, (F::Register, 0, 1), (F::SpecificConstant, 1, 1), 0),
        dual(0xD1, 7, Route::R, false, (F::Register, 0, 2), (F::SpecificConstant, 1, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xD1, 7, Route::R, false, (F::Register, 0, 4), (F::SpecificConstant, 1, 4), 0),
        dual(0xD1, 7, Route::R, true, (F::Register, 0, 8), (F::SpecificConstant, 1, 8), 0),

        // sar m8, 1 | sar m16, 1 | sar m32, 1 | sar m64, 1
        dual(0xD0, 7, Route::M, false, (F::MemoryAddress, 0, 1), (F::SpecificConstant, 1, 1), 0),
        dual(0xD1, 7, Route::M, false, (F::MemoryAddress, 0, 2), (F::SpecificConstant, 1, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xD1, 7, Route::M, false, (F::MemoryAddress, 0, 4), (F::SpecificConstant, 1, 4), 0),
        dual(0xD1, 7, Route::M, true, (F::MemoryAddress, 0, 8), (F::SpecificConstant, 1, 8), 0),

        // sar r8, c8 | sar r16, c8 | sar r32, c8 | sar r64, c8
        dual(0xC0, 7, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0xC1, 7, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xC1, 7, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0xC1, 7, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // sar m8, c8 | sar m16, c8 | sar m32, c8 | sar m64, c8
        dual(0xC0, 7, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0xC1, 7, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xC1, 7, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 1), 0),
        dual(0xC1, 7, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 1), 0),

        // sar r8, cl | sar r16, cl | sar r32, cl | sar r64, cl
        dual(0xD2, 7, Route::R, false, (F::Register, 0, 1), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 7, Route::R, false, (F::Register, 0, 2), (F::SpecificRegister, RCX as i16, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xD3, 7, Route::R, false, (F::Register, 0, 4), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 7, Route::R, true, (F::Register, 0, 8), (F::SpecificRegister, RCX as i16, 1), 0),

        // sar m8, cl | sar m16, cl | sar m32, cl | sar m64, cl
        dual(0xD2, 7, Route::M, false, (F::MemoryAddress, 0, 1), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 7, Route::M, false, (F::MemoryAddress, 0, 2), (F::SpecificRegister, RCX as i16, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xD3, 7, Route::M, false, (F::MemoryAddress, 0, 4), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 7, Route::M, true, (F::MemoryAddress, 0, 8), (F::SpecificRegister, RCX as i16, 1), 0),
    ];

    tables[OP_SHR] = vec![
        // shr r8, 1 | shr r16, 1 | shr r32, 1 | shr r64, 1
        dual(0xD0, 5, Route::R, false, (F::Register, 0, 1), (F::SpecificConstant, 1, 1), 0),
        dual(0xD1, 5, Route::R, false, (F::Register, 0, 2), (F::SpecificConstant, 1, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xD1, 5, Route::R, false, (F::Register, 0, 4), (F::SpecificConstant, 1, 4), 0),
        dual(0xD1, 5, Route::R, true, (F::Register, 0, 8), (F::SpecificConstant, 1, 8), 0),

        // shr m8, 1 | shr m16, 1 | shr m32, 1 | shr m64, 1
        dual(0xD0, 5, Route::M, false, (F::MemoryAddress, 0, 1), (F::SpecificConstant, 1, 1), 0),
        dual(0xD1, 5, Route::M, false, (F::MemoryAddress, 0, 2), (F::SpecificConstant, 1, 2), OPERAND_SIZE_OVERRIDE),
        dual(0xD1, 5, Route::M, false, (F::MemoryAddress, 0, 4), (F::SpecificConstant, 1, 4), 0),
        dual(0xD1, 5, Route::M, true, (F::MemoryAddress, 0, 8), (F::SpecificConstant, 1, 8), 0),

        // shr r8, c8 | shr r16, c8 | shr r32, c8 | shr r64, c8
        dual(0xC0, 5, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0xC1, 5, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xC1, 5, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0xC1, 5, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // shr m8, c8 | shr m16, c8 | shr m32, c8 | shr m64, c8
        dual(0xC0, 5, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0xC1, 5, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xC1, 5, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 1), 0),
        dual(0xC1, 5, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 1), 0),

        // shr r8, cl | shr r16, cl | shr r32, cl | shr r64, cl
        dual(0xD2, 5, Route::R, false, (F::Register, 0, 1), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 5, Route::R, false, (F::Register, 0, 2), (F::SpecificRegister, RCX as i16, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xD3, 5, Route::R, false, (F::Register, 0, 4), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 5, Route::R, true, (F::Register, 0, 8), (F::SpecificRegister, RCX as i16, 1), 0),

        // shr m8, cl | shr m16, cl | shr m32, cl | shr m64, cl
        dual(0xD2, 5, Route::M, false, (F::MemoryAddress, 0, 1), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 5, Route::M, false, (F::MemoryAddress, 0, 2), (F::SpecificRegister, RCX as i16, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xD3, 5, Route::M, false, (F::MemoryAddress, 0, 4), (F::SpecificRegister, RCX as i16, 1), 0),
        dual(0xD3, 5, Route::M, true, (F::MemoryAddress, 0, 8), (F::SpecificRegister, RCX as i16, 1), 0),
    ];

    tables[OP_MOVZX] = vec![
        // movzx r16, r8/m8
        dual(0xB60F, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xB60F, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 1), OPERAND_SIZE_OVERRIDE),

        // movzx r32, r8/m8
        dual(0xB60F, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 1), 0),
        dual(0xB60F, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 1), 0),

        // movzx r64, r8/m8
        dual(0xB60F, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 1), 0),
        dual(0xB60F, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 1), 0),

        // movzx r32, r16/m16
        dual(0xB70F, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 2), 0),
        dual(0xB70F, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 2), 0),

        // movzx r64, r16/m16
        dual(0xB70F, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 2), 0),
        dual(0xB70F, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 2), 0),
    ];

    tables[OP_MOVSX] = vec![
        // movsx r16, r8/m8
        dual(0xBE0F, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 1), OPERAND_SIZE_OVERRIDE),
        dual(0xBE0F, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 1), OPERAND_SIZE_OVERRIDE),

        // movsx r32, r8/m8
        dual(0xBE0F, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 1), 0),
        dual(0xBE0F, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 1), 0),

        // movsx r64, r8/m8
        dual(0xBE0F, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 1), 0),
        dual(0xBE0F, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 1), 0),

        // movsx r32, r16/m16
        dual(0xBF0F, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 2), 0),
        dual(0xBF0F, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 2), 0),

        // movsx r64, r16/m16
        dual(0xBF0F, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 2), 0),
        dual(0xBF0F, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 2), 0),
    ];

    tables[OP_MOVSXD] = vec![
        // movsxd r64, r32/m32
        dual(0x63, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 4), 0),
        dual(0x63, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 4), 0),
    ];

    tables[OP_LEA] = vec![
        // lea r16, m | lea r32, m | lea r64, m
        dual(0x8D, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 8), OPERAND_SIZE_OVERRIDE),
        dual(0x8D, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 8), 0),
        dual(0x8D, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_CMP] = vec![
        // cmp al, c8 | cmp ax, c16 | cmp eax, c32 | cmp rax, c32
        dual(0x3C, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 1), (F::Constant, 0, 1), 0),
        dual(0x3D, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x3D, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 4), (F::Constant, 0, 4), 0),
        dual(0x3D, 0, Route::Sc, true, (F::SpecificRegister, RAX as i16, 8), (F::Constant, 0, 4), 0),

        // cmp r8, c8 | cmp r16, c16 | cmp r32, c32 | cmp r64, c32
        dual(0x80, 7, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 7, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x81, 7, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 7, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 4), 0),

        // cmp m8, c8 | cmp m16, c16 | cmp m32, c32 | cmp m64, c32
        dual(0x80, 7, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 7, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x81, 7, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 7, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 4), 0),

        // cmp r8, r8 | cmp r16, r16 | cmp r32, r32 | cmp r64, r64
        dual(0x3A, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x3B, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x3B, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x3B, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // cmp m8, r8 | cmp m16, r16 | cmp m32, r32 | cmp m64, r64
        dual(0x38, 0, Route::Mr, false, (F::MemoryAddress, 0, 1), (F::Register, 0, 1), 0),
        dual(0x39, 0, Route::Mr, false, (F::MemoryAddress, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x39, 0, Route::Mr, false, (F::MemoryAddress, 0, 4), (F::Register, 0, 4), 0),
        dual(0x39, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0),

        // cmp r8, m8 | cmp r16, m16 | cmp r32, m32 | cmp r64, m64
        dual(0x3A, 0, Route::Rm, false, (F::Register, 0, 1), (F::MemoryAddress, 0, 1), 0),
        dual(0x3B, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x3B, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0x3B, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_ADDSD] = vec![
        // addsd x, x | addsd x, m64
        dual(0x580F, 0, Route::Rr, false, (F::Register, 0, 8), (F::Register, 0, 8), 0xF2),
        dual(0x580F, 0, Route::Rm, false, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0xF2),
    ];

    tables[OP_SUBSD] = vec![
        // subsd x, x | subsd x, m64
        dual(0x5C0F, 0, Route::Rr, false, (F::Register, 0, 8), (F::Register, 0, 8), 0xF2),
        dual(0x5C0F, 0, Route::Rm, false, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0xF2),
    ];

    tables[OP_MULSD] = vec![
        // mulsd x, x | mulsd x, m64
        dual(0x590F, 0, Route::Rr, false, (F::Register, 0, 8), (F::Register, 0, 8), 0xF2),
        dual(0x590F, 0, Route::Rm, false, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0xF2),
    ];

    tables[OP_DIVSD] = vec![
        // divsd x, x | divsd x, m64
        dual(0x5E0F, 0, Route::Rr, false, (F::Register, 0, 8), (F::Register, 0, 8), 0xF2),
        dual(0x5E0F, 0, Route::Rm, false, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0xF2),
    ];

    tables[OP_MOVSD] = vec![
        // movsd x, x | movsd x, m64 | movsd m64, x
        dual(0x100F, 0, Route::Rr, false, (F::Register, 0, 8), (F::Register, 0, 8), 0xF2),
        dual(0x100F, 0, Route::Rm, false, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0xF2),
        dual(0x110F, 0, Route::Mr, false, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0xF2),
    ];

    tables[OP_MOVUPS] = vec![
        // movups x, m128 | movups m128, x
        dual(0x100F, 0, Route::Rm, false, (F::Register, 0, 8), (F::MemoryAddress, 0, 16), 0),
        dual(0x110F, 0, Route::Mr, false, (F::MemoryAddress, 0, 16), (F::Register, 0, 8), 0),
    ];

    tables[OP_MOVQ] = vec![
        // movq x, r64 | movq x, m64
        dual(0x6E0F, 0, Route::Rr, true, (F::MediaRegister, 0, 8), (F::Register, 0, 8), 0x66),
        dual(0x6E0F, 0, Route::Rm, true, (F::MediaRegister, 0, 8), (F::MemoryAddress, 0, 8), 0x66),

        // movq r64, x | movq m64, x
        dual(0x7E0F, 0, Route::Rr, true, (F::Register, 0, 8), (F::MediaRegister, 0, 8), 0x66),
        dual(0x7E0F, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::MediaRegister, 0, 8), 0x66),
    ];

    tables[OP_CVTSI2SD] = vec![
        // cvtsi2sd x, r64 | cvtsi2sd x, m64
        dual(0x2A0F, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0xF2),
        dual(0x2A0F, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0xF2),
    ];

    tables[OP_CVTTSD2SI] = vec![
        // cvttsd2si r64, x | cvttsd2si r64, m64
        dual(0x2C0F, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0xF2),
        dual(0x2C0F, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0xF2),
    ];

    tables[OP_AND] = vec![
        // and al, c8 | and ax, c16 | and eax, c32 | and rax, c32
        dual(0x24, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 1), (F::Constant, 0, 1), 0),
        dual(0x25, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 2), (F::Constant, 0, 2), 0),
        dual(0x25, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 4), (F::Constant, 0, 4), 0),
        dual(0x25, 0, Route::Sc, true, (F::SpecificRegister, RAX as i16, 8), (F::Constant, 0, 4), 0),

        // and r16, c8 | and r32, c8 | and r64, c8
        dual(0x83, 4, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 1), 0),
        dual(0x83, 4, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x83, 4, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // and m16, c8 | and m32, c8 | and m64, c8
        dual(0x83, 4, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 1), 0),
        dual(0x83, 4, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x83, 4, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 1), 0),

        // and r8, c8 | and r16, c16 | and r32, c32 | and r64, c32
        dual(0x80, 4, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 4, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 2), 0),
        dual(0x81, 4, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 4, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 4), 0),

        // and m8, c8 | and m16, c16 | and m32, c32 | and m64, c32
        dual(0x80, 4, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 4, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 2), 0),
        dual(0x81, 4, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 4, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 4), 0),

        // and r8, r8 | and r16, r16 | and r32, r32 | and r64, r64
        dual(0x22, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x23, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), 0),
        dual(0x23, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x23, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // and m8, r8 | and m16, r16 | and m32, r32 | and m64, r64
        dual(0x20, 0, Route::Mr, false, (F::MemoryAddress, 0, 1), (F::Register, 0, 1), 0),
        dual(0x21, 0, Route::Mr, false, (F::MemoryAddress, 0, 2), (F::Register, 0, 2), 0),
        dual(0x21, 0, Route::Mr, false, (F::MemoryAddress, 0, 4), (F::Register, 0, 4), 0),
        dual(0x21, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0),

        // and r8, m8 | and r16, m16 | and r32, m32 | and r64, m64
        dual(0x22, 0, Route::Rm, false, (F::Register, 0, 1), (F::MemoryAddress, 0, 1), 0),
        dual(0x23, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), 0),
        dual(0x23, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0x23, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_XOR] = vec![
        // xor al, c8 | xor ax, c16 | xor eax, c32 | xor rax, c32
        dual(0x34, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 1), (F::Constant, 0, 1), 0),
        dual(0x35, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 2), (F::Constant, 0, 2), 0),
        dual(0x35, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 4), (F::Constant, 0, 4), 0),
        dual(0x35, 0, Route::Sc, true, (F::SpecificRegister, RAX as i16, 8), (F::Constant, 0, 4), 0),

        // xor r16, c8 | xor r32, c8 | xor r64, c8
        dual(0x83, 6, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 1), 0),
        dual(0x83, 6, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x83, 6, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // xor m16, c8 | xor m32, c8 | xor m64, c8
        dual(0x83, 6, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 1), 0),
        dual(0x83, 6, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x83, 6, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 1), 0),

        // xor r8, c8 | xor r16, c16 | xor r32, c32 | xor r64, c32
        dual(0x80, 6, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 6, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 2), 0),
        dual(0x81, 6, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 6, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 4), 0),

        // xor m8, c8 | xor m16, c16 | xor m32, c32 | xor m64, c32
        dual(0x80, 6, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 6, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 2), 0),
        dual(0x81, 6, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 6, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 4), 0),

        // xor r8, r8 | xor r16, r16 | xor r32, r32 | xor r64, r64
        dual(0x32, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x33, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), 0),
        dual(0x33, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x33, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // xor m8, r8 | xor m16, r16 | xor m32, r32 | xor m64, r64
        dual(0x30, 0, Route::Mr, false, (F::MemoryAddress, 0, 1), (F::Register, 0, 1), 0),
        dual(0x31, 0, Route::Mr, false, (F::MemoryAddress, 0, 2), (F::Register, 0, 2), 0),
        dual(0x31, 0, Route::Mr, false, (F::MemoryAddress, 0, 4), (F::Register, 0, 4), 0),
        dual(0x31, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0),

        // xor r8, m8 | xor r16, m16 | xor r32, m32 | xor r64, m64
        dual(0x32, 0, Route::Rm, false, (F::Register, 0, 1), (F::MemoryAddress, 0, 1), 0),
        dual(0x33, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), 0),
        dual(0x33, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0x33, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_OR] = vec![
        // or al, c8 | or ax, c16 | or eax, c32 | or rax, c32
        dual(0x0C, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 1), (F::Constant, 0, 1), 0),
        dual(0x0D, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 2), (F::Constant, 0, 2), 0),
        dual(0x0D, 0, Route::Sc, false, (F::SpecificRegister, RAX as i16, 4), (F::Constant, 0, 4), 0),
        dual(0x0D, 0, Route::Sc, true, (F::SpecificRegister, RAX as i16, 8), (F::Constant, 0, 4), 0),

        // or r16, c8 | or r32, c8 | or r64, c8
        dual(0x83, 1, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 1), 0),
        dual(0x83, 1, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x83, 1, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // or m16, c8 | or m32, c8 | or m64, c8
        dual(0x83, 1, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 1), 0),
        dual(0x83, 1, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 1), 0),
        dual(0x83, 1, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 1), 0),

        // or r8, c8 | or r16, c16 | or r32, c32 | or r64, c32
        dual(0x80, 1, Route::Rc, false, (F::Register, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 1, Route::Rc, false, (F::Register, 0, 2), (F::Constant, 0, 2), 0),
        dual(0x81, 1, Route::Rc, false, (F::Register, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 1, Route::Rc, true, (F::Register, 0, 8), (F::Constant, 0, 4), 0),

        // or m8, c8 | or m16, c16 | or m32, c32 | or m64, c32
        dual(0x80, 1, Route::Mc, false, (F::MemoryAddress, 0, 1), (F::Constant, 0, 1), 0),
        dual(0x81, 1, Route::Mc, false, (F::MemoryAddress, 0, 2), (F::Constant, 0, 2), 0),
        dual(0x81, 1, Route::Mc, false, (F::MemoryAddress, 0, 4), (F::Constant, 0, 4), 0),
        dual(0x81, 1, Route::Mc, true, (F::MemoryAddress, 0, 8), (F::Constant, 0, 4), 0),

        // or r8, r8 | or r16, r16 | or r32, r32 | or r64, r64
        dual(0x0A, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x0B, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), 0),
        dual(0x0B, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x0B, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // or m8, r8 | or m16, r16 | or m32, r32 | or m64, r64
        dual(0x08, 0, Route::Mr, false, (F::MemoryAddress, 0, 1), (F::Register, 0, 1), 0),
        dual(0x09, 0, Route::Mr, false, (F::MemoryAddress, 0, 2), (F::Register, 0, 2), 0),
        dual(0x09, 0, Route::Mr, false, (F::MemoryAddress, 0, 4), (F::Register, 0, 4), 0),
        dual(0x09, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0),

        // or r8, m8 | or r16, m16 | or r32, m32 | or r64, m64
        dual(0x0A, 0, Route::Rm, false, (F::Register, 0, 1), (F::MemoryAddress, 0, 1), 0),
        dual(0x0B, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), 0),
        dual(0x0B, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0x0B, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),
    ];

    tables[OP_COMISD] = vec![
        // comisd x, x | comisd x, m64
        dual(0x2F0F, 0, Route::Rr, false, (F::MediaRegister, 0, 8), (F::MediaRegister, 0, 8), 0x66),
        dual(0x2F0F, 0, Route::Rm, false, (F::MediaRegister, 0, 8), (F::MemoryAddress, 0, 8), 0x66),
    ];

    tables[OP_TEST] = vec![
        // test r8, r8 | test r16, r16 | test r32, r32 | test r64, r64
        dual(0x84, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x85, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x85, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x85, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),
    ];

    tables[OP_SQRTSD] = vec![
        // sqrtsd x, x
        dual(0x510F, 0, Route::Rr, false, (F::Register, 0, 8), (F::Register, 0, 8), 0xF2),
    ];

    tables[OP_XCHG] = vec![
        // xchg ax, r16 | xchg eax, r32 | xchg rax, r64
        dual(0x90, 0, Route::So, false, (F::SpecificRegister, RAX as i16, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x90, 0, Route::So, false, (F::SpecificRegister, RAX as i16, 4), (F::Register, 0, 4), 0),
        dual(0x90, 0, Route::So, true, (F::SpecificRegister, RAX as i16, 8), (F::Register, 0, 8), 0),

        // xchg r16, ax | xchg r32, eax | xchg r64, rax
        dual(0x90, 0, Route::O, false, (F::Register, 0, 2), (F::SpecificRegister, RAX as i16, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x90, 0, Route::O, false, (F::Register, 0, 4), (F::SpecificRegister, RAX as i16, 4), 0),
        dual(0x90, 0, Route::O, true, (F::Register, 0, 8), (F::SpecificRegister, RAX as i16, 8), 0),

        // xchg r8, r8 | xchg r16, r16 | xchg r32, r32 | xchg r64, r64
        dual(0x86, 0, Route::Rr, false, (F::Register, 0, 1), (F::Register, 0, 1), 0),
        dual(0x87, 0, Route::Rr, false, (F::Register, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x87, 0, Route::Rr, false, (F::Register, 0, 4), (F::Register, 0, 4), 0),
        dual(0x87, 0, Route::Rr, true, (F::Register, 0, 8), (F::Register, 0, 8), 0),

        // xchg r8, m8 | xchg r16, m16 | xchg r32, m32 | xchg r64, m64
        dual(0x86, 0, Route::Rm, false, (F::Register, 0, 1), (F::MemoryAddress, 0, 1), 0),
        dual(0x87, 0, Route::Rm, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x87, 0, Route::Rm, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), 0),
        dual(0x87, 0, Route::Rm, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), 0),

        // xchg m8, r8 | xchg m16, r16 | xchg m32, r32 | xchg m64, r64
        dual(0x86, 0, Route::Mr, false, (F::MemoryAddress, 0, 1), (F::Register, 0, 1), 0),
        dual(0x87, 0, Route::Mr, false, (F::MemoryAddress, 0, 2), (F::Register, 0, 2), OPERAND_SIZE_OVERRIDE),
        dual(0x87, 0, Route::Mr, false, (F::MemoryAddress, 0, 4), (F::Register, 0, 4), 0),
        dual(0x87, 0, Route::Mr, true, (F::MemoryAddress, 0, 8), (F::Register, 0, 8), 0),
    ];

    tables[OP_PXOR] = vec![
        // pxor x, x
        dual(0xEF0F, 0, Route::Rr, false, (F::Register, 0, 8), (F::Register, 0, 8), 0x66),
    ];

    tables[OP_CMOVA] = conditional_move_encodings(0x470F);
    tables[OP_CMOVAE] = conditional_move_encodings(0x430F);
    tables[OP_CMOVB] = conditional_move_encodings(0x420F);
    tables[OP_CMOVBE] = conditional_move_encodings(0x460F);
    tables[OP_CMOVE] = conditional_move_encodings(0x440F);
    tables[OP_CMOVG] = conditional_move_encodings(0x4F0F);
    tables[OP_CMOVGE] = conditional_move_encodings(0x4D0F);
    tables[OP_CMOVL] = conditional_move_encodings(0x4C0F);
    tables[OP_CMOVLE] = conditional_move_encodings(0x4E0F);
    tables[OP_CMOVNE] = conditional_move_encodings(0x450F);
    tables[OP_CMOVNZ] = conditional_move_encodings(0x450F);
    tables[OP_CMOVZ] = conditional_move_encodings(0x440F);

    tables[OP_XORPD] = vec![
        // xorpd x, x | xorpd x, m128
        dual(0x570F, 0, Route::Rr, false, (F::MediaRegister, 0, 8), (F::MediaRegister, 0, 8), 0x66),
        dual(0x570F, 0, Route::Rm, false, (F::MediaRegister, 0, 8), (F::MemoryAddress, 0, 16), 0x66),
    ];

    tables
});

pub static TRIPLE_PARAMETER_ENCODINGS: LazyLock<Vec<Vec<Encoding>>> = LazyLock::new(|| {
    let mut tables = vec![Vec::new(); TRIPLE_PARAMETER_OPERATIONS];

    tables[OP_IMUL] = vec![
        // imul r16, r16, c8 | imul r32, r32, c8 | imul r64, r64, c8
        triple(0x6B, 0, Route::Rrc, false, (F::Register, 0, 2), (F::Register, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        triple(0x6B, 0, Route::Rrc, false, (F::Register, 0, 4), (F::Register, 0, 4), (F::Constant, 0, 1), 0),
        triple(0x6B, 0, Route::Rrc, true, (F::Register, 0, 8), (F::Register, 0, 8), (F::Constant, 0, 1), 0),

        // imul r16, m16, c8 | imul r32, m32, c8 | imul r64, m64, c8
        triple(0x6B, 0, Route::Rmc, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), (F::Constant, 0, 1), OPERAND_SIZE_OVERRIDE),
        triple(0x6B, 0, Route::Rmc, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), (F::Constant, 0, 1), 0),
        triple(0x6B, 0, Route::Rmc, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), (F::Constant, 0, 1), 0),

        // imul r16, r16, c16 | imul r32, r32, c32 | imul r64, r64, c32
        triple(0x69, 0, Route::Rrc, false, (F::Register, 0, 2), (F::Register, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        triple(0x69, 0, Route::Rrc, false, (F::Register, 0, 4), (F::Register, 0, 4), (F::Constant, 0, 4), 0),
        triple(0x69, 0, Route::Rrc, true, (F::Register, 0, 8), (F::Register, 0, 8), (F::Constant, 0, 4), 0),

        // imul r16, m16, c16 | imul r32, m32, c32 | imul r64, m64, c32
        triple(0x69, 0, Route::Rmc, false, (F::Register, 0, 2), (F::MemoryAddress, 0, 2), (F::Constant, 0, 2), OPERAND_SIZE_OVERRIDE),
        triple(0x69, 0, Route::Rmc, false, (F::Register, 0, 4), (F::MemoryAddress, 0, 4), (F::Constant, 0, 4), 0),
        triple(0x69, 0, Route::Rmc, true, (F::Register, 0, 8), (F::MemoryAddress, 0, 8), (F::Constant, 0, 4), 0),
    ];

    tables
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_cover_every_operation_index() {
        assert_eq!(PARAMETERLESS_ENCODINGS.len(), PARAMETERLESS_OPERATIONS);
        assert_eq!(SINGLE_PARAMETER_ENCODINGS.len(), SINGLE_PARAMETER_OPERATIONS);
        assert_eq!(DUAL_PARAMETER_ENCODINGS.len(), DUAL_PARAMETER_OPERATIONS);
        assert_eq!(TRIPLE_PARAMETER_ENCODINGS.len(), TRIPLE_PARAMETER_OPERATIONS);

        for (index, encodings) in SINGLE_PARAMETER_ENCODINGS.iter().enumerate() {
            assert!(!encodings.is_empty(), "single parameter table {index} is empty");
        }
        for (index, encodings) in DUAL_PARAMETER_ENCODINGS.iter().enumerate() {
            assert!(!encodings.is_empty(), "dual parameter table {index} is empty");
        }
    }

    #[test]
    fn mnemonics_resolve_to_their_slots() {
        assert_eq!(instruction_index("mov"), Some(OP_MOV));
        assert_eq!(instruction_index("imul"), Some(OP_IMUL));
        assert_eq!(instruction_index("setz"), Some(OP_SETZ));
        assert_eq!(instruction_index("cmovnz"), Some(OP_CMOVNZ));
        assert_eq!(instruction_index("bogus"), None);
    }

    #[test]
    fn jump_classification() {
        assert!(is_jump("jmp"));
        assert!(is_jump("jne"));
        assert!(!is_jump("call"));
        assert!(!is_jump("ja_label"));
    }
}
