//! Register identifiers and the name partitions used by the assembly parser.
//!
//! Identifiers follow the hardware numbering: the low three bits are the
//! ModR/M register name and identifiers 8..=15 require a REX extension bit.

pub const RAX: u8 = 0;
pub const RCX: u8 = 1;
pub const RDX: u8 = 2;
pub const RBX: u8 = 3;
pub const RSP: u8 = 4;
pub const RBP: u8 = 5;
pub const RSI: u8 = 6;
pub const RDI: u8 = 7;
pub const R8: u8 = 8;
pub const R9: u8 = 9;
pub const R10: u8 = 10;
pub const R11: u8 = 11;
pub const R12: u8 = 12;
pub const R13: u8 = 13;
pub const R14: u8 = 14;
pub const R15: u8 = 15;

/// The 3-bit register name encoded into ModR/M and SIB bytes.
pub fn name(identifier: u8) -> u8 {
    identifier & 7
}

/// Whether the register requires the REX extension bit (r8..r15).
pub fn is_extension_register(identifier: u8) -> bool {
    identifier >= R8
}

/// Whether a register aliases ah/ch/dh/bh when used as a 1-byte operand and
/// therefore needs an empty REX prefix to select spl/bpl/sil/dil instead.
pub fn is_overridable_register(identifier: u8, size: u8) -> bool {
    size == 1 && (RSP..=RDI).contains(&identifier)
}

/// Name partitions of the standard registers, widest first (8/4/2/1 bytes).
pub const STANDARD_PARTITIONS: [[&str; 4]; 16] = [
    ["rax", "eax", "ax", "al"],
    ["rcx", "ecx", "cx", "cl"],
    ["rdx", "edx", "dx", "dl"],
    ["rbx", "ebx", "bx", "bl"],
    ["rsp", "esp", "sp", "spl"],
    ["rbp", "ebp", "bp", "bpl"],
    ["rsi", "esi", "si", "sil"],
    ["rdi", "edi", "di", "dil"],
    ["r8", "r8d", "r8w", "r8b"],
    ["r9", "r9d", "r9w", "r9b"],
    ["r10", "r10d", "r10w", "r10b"],
    ["r11", "r11d", "r11w", "r11b"],
    ["r12", "r12d", "r12w", "r12b"],
    ["r13", "r13d", "r13w", "r13b"],
    ["r14", "r14d", "r14w", "r14b"],
    ["r15", "r15d", "r15w", "r15b"],
];

pub const MEDIA_REGISTERS: [&str; 16] = [
    "xmm0", "xmm1", "xmm2", "xmm3", "xmm4", "xmm5", "xmm6", "xmm7", "xmm8", "xmm9", "xmm10",
    "xmm11", "xmm12", "xmm13", "xmm14", "xmm15",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rex_predicates() {
        assert!(is_extension_register(R8));
        assert!(is_extension_register(R15));
        assert!(!is_extension_register(RDI));

        // rsp..rdi alias the high byte registers only at 1-byte size
        assert!(is_overridable_register(RSP, 1));
        assert!(is_overridable_register(RDI, 1));
        assert!(!is_overridable_register(RDI, 4));
        assert!(!is_overridable_register(RAX, 1));
        assert!(!is_overridable_register(R8, 1));
    }

    #[test]
    fn names_wrap_at_eight() {
        assert_eq!(name(RBP), 5);
        assert_eq!(name(R13), 5);
        assert_eq!(name(R8), 0);
    }
}
