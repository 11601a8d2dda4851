//! Output model handed to the object-file writer: sections, symbols and
//! relocations.

/// Section classification used by the object writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinarySectionKind {
    Text,
    Data,
    DebugLine,
    DebugFrame,
}

// Section flags are a plain bitmask, matching what the ELF writer expects.
pub const SECTION_FLAG_WRITE: u32 = 1 << 0;
pub const SECTION_FLAG_ALLOCATE: u32 = 1 << 1;
pub const SECTION_FLAG_EXECUTE: u32 = 1 << 2;

#[derive(Debug, Clone)]
pub struct BinarySection {
    pub name: String,
    pub kind: BinarySectionKind,
    pub flags: u32,
    pub data: Vec<u8>,
    pub relocations: Vec<BinaryRelocation>,
}

impl BinarySection {
    pub fn new(name: impl Into<String>, kind: BinarySectionKind, data: Vec<u8>) -> BinarySection {
        BinarySection { name: name.into(), kind, flags: 0, data, relocations: Vec::new() }
    }
}

/// A symbol is external until a local definition has been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySymbol {
    pub name: String,
    pub offset: usize,
    pub external: bool,
}

impl BinarySymbol {
    pub fn new(name: impl Into<String>, offset: usize, external: bool) -> BinarySymbol {
        BinarySymbol { name: name.into(), offset, external }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryRelocationKind {
    Absolute32,
    Absolute64,
    ProgramCounterRelative,
    SectionRelative,
}

/// Instruction to the linker to patch `bytes` bytes at `offset` with the
/// resolved address of `symbol` plus `addend`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRelocation {
    pub symbol: String,
    pub offset: usize,
    pub addend: i64,
    pub bytes: u8,
    pub kind: BinaryRelocationKind,
}

impl BinaryRelocation {
    pub fn new(
        symbol: impl Into<String>,
        offset: usize,
        addend: i64,
        kind: BinaryRelocationKind,
    ) -> BinaryRelocation {
        BinaryRelocation { symbol: symbol.into(), offset, addend, bytes: 4, kind }
    }
}
