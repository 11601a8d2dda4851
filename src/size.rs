//! Operand byte sizes and the assembly size keywords that select them.

/// Byte width of an operand. The two widest sizes only appear on memory
/// operands of the SSE move forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    Byte,
    Word,
    Dword,
    Qword,
    Xword,
    Yword,
}

impl Size {
    pub fn bytes(self) -> u8 {
        match self {
            Size::Byte => 1,
            Size::Word => 2,
            Size::Dword => 4,
            Size::Qword => 8,
            Size::Xword => 16,
            Size::Yword => 32,
        }
    }

    pub fn from_bytes(bytes: u8) -> Option<Size> {
        match bytes {
            1 => Some(Size::Byte),
            2 => Some(Size::Word),
            4 => Some(Size::Dword),
            8 => Some(Size::Qword),
            16 => Some(Size::Xword),
            32 => Some(Size::Yword),
            _ => None,
        }
    }

    /// Maps an assembly size keyword such as `qword` to its size.
    pub fn from_keyword(keyword: &str) -> Option<Size> {
        match keyword {
            "byte" => Some(Size::Byte),
            "word" => Some(Size::Word),
            "dword" => Some(Size::Dword),
            "qword" => Some(Size::Qword),
            "xword" => Some(Size::Xword),
            "yword" => Some(Size::Yword),
            _ => None,
        }
    }
}
