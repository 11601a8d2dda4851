//! Instruction records consumed by the encoder.

use crate::handle::Handle;

/// One operand slot. Hidden parameters document implicit operands (such as
/// the rdx:rax pair of a division) and are skipped during encoding.
#[derive(Debug, Clone)]
pub struct InstructionParameter {
    pub handle: Handle,
    pub hidden: bool,
}

impl InstructionParameter {
    pub fn new(handle: Handle) -> InstructionParameter {
        InstructionParameter { handle, hidden: false }
    }

    pub fn hidden(handle: Handle) -> InstructionParameter {
        InstructionParameter { handle, hidden: true }
    }
}

/// Classification of an instruction record. Jumps and calls also carry their
/// mnemonic in `operation`; the debug kinds write no machine code and only
/// append offset-tagged events to their module.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionKind {
    Normal,
    Jump,
    Call,
    Label(String),
    AppendPosition { line: i32, column: i32 },
    DebugStart(String),
    DebugFrameOffset(i32),
    DebugEnd,
}

#[derive(Debug, Clone)]
pub struct Instruction {
    /// Mnemonic, possibly prefixed with `lock `. For manual instructions this
    /// holds the raw assembly text instead.
    pub operation: String,
    pub parameters: Vec<InstructionParameter>,
    pub kind: InstructionKind,
    /// Raw assembly text that must be parsed before encoding.
    pub is_manual: bool,
}

impl Instruction {
    pub fn new(operation: impl Into<String>, handles: Vec<Handle>) -> Instruction {
        Instruction {
            operation: operation.into(),
            parameters: handles.into_iter().map(InstructionParameter::new).collect(),
            kind: InstructionKind::Normal,
            is_manual: false,
        }
    }

    pub fn jump(operation: impl Into<String>, target: Handle) -> Instruction {
        Instruction {
            operation: operation.into(),
            parameters: vec![InstructionParameter::new(target)],
            kind: InstructionKind::Jump,
            is_manual: false,
        }
    }

    pub fn call(target: Handle) -> Instruction {
        Instruction {
            operation: "call".into(),
            parameters: vec![InstructionParameter::new(target)],
            kind: InstructionKind::Call,
            is_manual: false,
        }
    }

    pub fn label(name: impl Into<String>) -> Instruction {
        Instruction {
            operation: String::new(),
            parameters: Vec::new(),
            kind: InstructionKind::Label(name.into()),
            is_manual: false,
        }
    }

    /// A block of raw assembly text, parsed by the encode worker that owns
    /// the module the block lands in.
    pub fn manual(assembly: impl Into<String>) -> Instruction {
        Instruction {
            operation: assembly.into(),
            parameters: Vec::new(),
            kind: InstructionKind::Normal,
            is_manual: true,
        }
    }

    pub fn append_position(line: i32, column: i32) -> Instruction {
        Instruction {
            operation: String::new(),
            parameters: Vec::new(),
            kind: InstructionKind::AppendPosition { line, column },
            is_manual: false,
        }
    }

    pub fn debug_start(symbol: impl Into<String>) -> Instruction {
        Instruction {
            operation: String::new(),
            parameters: Vec::new(),
            kind: InstructionKind::DebugStart(symbol.into()),
            is_manual: false,
        }
    }

    pub fn debug_frame_offset(offset: i32) -> Instruction {
        Instruction {
            operation: String::new(),
            parameters: Vec::new(),
            kind: InstructionKind::DebugFrameOffset(offset),
            is_manual: false,
        }
    }

    pub fn debug_end() -> Instruction {
        Instruction {
            operation: String::new(),
            parameters: Vec::new(),
            kind: InstructionKind::DebugEnd,
            is_manual: false,
        }
    }

    /// Visible operands in order.
    pub fn visible_parameters(&self) -> impl Iterator<Item = &Handle> {
        self.parameters.iter().filter(|parameter| !parameter.hidden).map(|parameter| &parameter.handle)
    }
}
