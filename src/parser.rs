//! Textual assembly parser.
//!
//! Turns manual assembly blocks into instruction records. The grammar is the
//! usual Intel-flavored one: `mnemonic operand, operand`, labels terminated
//! with a colon, size keywords in front of operands and bracketed memory
//! addresses of the forms `[base]`, `[base+offset]`, `[index*scale+offset]`
//! and `[base+index*scale+offset]`.

use std::collections::HashMap;

use crate::error::{EncodeError, SourcePosition};
use crate::handle::Handle;
use crate::instruction::{Instruction, InstructionKind};
use crate::register::{MEDIA_REGISTERS, STANDARD_PARTITIONS};
use crate::size::Size;
use crate::tables::is_jump;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Identifier,
    Number,
    Operator,
    Comma,
    OpenBracket,
    CloseBracket,
    Colon,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    text: String,
    position: SourcePosition,
}

/// One component of a bracketed address expression.
#[derive(Debug, Clone)]
enum Component {
    Register(u8),
    Number(i64),
    Symbol(String),
}

#[derive(Debug, Clone, Copy)]
struct RegisterEntry {
    identifier: u8,
    size: Size,
    media: bool,
}

/// Parses assembly text into instruction records. The register table is
/// built once, so workers reuse one parser for all of their manual blocks.
pub struct AssemblyParser {
    registers: HashMap<&'static str, RegisterEntry>,
    pub instructions: Vec<Instruction>,
}

impl Default for AssemblyParser {
    fn default() -> AssemblyParser {
        AssemblyParser::new()
    }
}

impl AssemblyParser {
    pub fn new() -> AssemblyParser {
        let mut registers = HashMap::new();

        for (identifier, partition) in STANDARD_PARTITIONS.iter().enumerate() {
            for (rank, name) in partition.iter().enumerate() {
                let size = match rank {
                    0 => Size::Qword,
                    1 => Size::Dword,
                    2 => Size::Word,
                    _ => Size::Byte,
                };

                registers.insert(
                    *name,
                    RegisterEntry { identifier: identifier as u8, size, media: false },
                );
            }
        }

        for (identifier, name) in MEDIA_REGISTERS.iter().enumerate() {
            registers.insert(
                *name,
                RegisterEntry { identifier: identifier as u8, size: Size::Qword, media: true },
            );
        }

        AssemblyParser { registers, instructions: Vec::new() }
    }

    /// Parses all of `assembly`, appending to `instructions`.
    pub fn parse(&mut self, assembly: &str) -> Result<(), EncodeError> {
        for (index, line) in assembly.lines().enumerate() {
            self.parse_line(index + 1, line)?;
        }

        Ok(())
    }

    /// Clears the parsed instructions so the parser can be reused.
    pub fn reset(&mut self) {
        self.instructions.clear();
    }

    fn parse_line(&mut self, line: usize, text: &str) -> Result<(), EncodeError> {
        let text = match text.find('#') {
            Some(comment) => &text[..comment],
            None => text,
        };

        let tokens = tokenize(line, text)?;

        if tokens.is_empty() {
            return Ok(());
        }

        // Label declaration: identifier followed by a colon
        if tokens.len() == 2
            && tokens[0].kind == TokenKind::Identifier
            && tokens[1].kind == TokenKind::Colon
        {
            self.instructions.push(Instruction::label(tokens[0].text.clone()));
            return Ok(());
        }

        // Assembler directives do not produce instructions
        if tokens[0].text.starts_with('.') {
            return Ok(());
        }

        if tokens[0].kind != TokenKind::Identifier {
            return Err(EncodeError::syntax(tokens[0].position, "expected an instruction"));
        }

        let mut cursor = 1;
        let mut operation = tokens[0].text.clone();

        if operation == "lock" {
            let prefixed = tokens.get(1).filter(|token| token.kind == TokenKind::Identifier);

            match prefixed {
                Some(token) => {
                    operation.push(' ');
                    operation.push_str(&token.text);
                    cursor = 2;
                }
                None => {
                    return Err(EncodeError::syntax(
                        tokens[0].position,
                        "expected an instruction after the lock prefix",
                    ))
                }
            }
        }

        let mut parameters = Vec::new();

        for operand in tokens[cursor..].split(|token| token.kind == TokenKind::Comma) {
            if operand.is_empty() {
                if parameters.is_empty() && cursor == tokens.len() {
                    break;
                }

                return Err(EncodeError::syntax(tokens[0].position, "expected an operand"));
            }

            parameters.push(self.parse_operand(operand)?);
        }

        let primary = operation.rsplit(' ').next().unwrap_or(&operation).to_string();

        let kind = if is_jump(&primary) {
            InstructionKind::Jump
        } else if primary == "call" {
            InstructionKind::Call
        } else {
            InstructionKind::Normal
        };

        let mut instruction = Instruction::new(operation, parameters);
        instruction.kind = kind;
        self.instructions.push(instruction);
        Ok(())
    }

    fn parse_operand(&self, tokens: &[Token]) -> Result<Handle, EncodeError> {
        let mut size = None;
        let mut tokens = tokens;

        if tokens[0].kind == TokenKind::Identifier {
            if let Some(keyword) = Size::from_keyword(&tokens[0].text) {
                if tokens.len() > 1 {
                    size = Some(keyword);
                    tokens = &tokens[1..];
                }
            }
        }

        let first = &tokens[0];

        let handle = match first.kind {
            TokenKind::OpenBracket => {
                let last = tokens
                    .last()
                    .filter(|token| token.kind == TokenKind::CloseBracket)
                    .ok_or_else(|| {
                        EncodeError::syntax(first.position, "expected a closing bracket")
                    })?;

                if tokens.len() < 3 {
                    return Err(EncodeError::syntax(last.position, "expected an address"));
                }

                self.parse_address(&tokens[1..tokens.len() - 1])?
            }

            TokenKind::Identifier if tokens.len() == 1 => match self.registers.get(first.text.as_str()) {
                Some(entry) if entry.media => Handle::media_register(entry.identifier),
                Some(entry) => Handle::register(entry.identifier, entry.size),
                None => Handle::data_section(first.text.clone(), true),
            },

            TokenKind::Number if tokens.len() == 1 => {
                Handle::constant(parse_number(first)?)
            }

            TokenKind::Operator if first.text == "-" && tokens.len() == 2 => {
                let value = parse_number(&tokens[1])?;
                Handle::constant(value.checked_neg().unwrap_or(value))
            }

            _ => return Err(EncodeError::syntax(first.position, "could not understand the operand")),
        };

        match size {
            Some(size) if handle.is_constant() && size.bytes() > 8 => Err(EncodeError::syntax(
                first.position,
                "constants can not be wider than a qword",
            )),
            Some(size) => Ok(handle.with_size(size)),
            None => Ok(handle),
        }
    }

    /// Parses the inside of a bracketed address expression. The shape is
    /// decided by the token count: `v`, `-n`, `a?b`, `a?b?c` and
    /// `a?b?c?d` with `?` one of `+`, `-` and `*`.
    fn parse_address(&self, tokens: &[Token]) -> Result<Handle, EncodeError> {
        let position = tokens[0].position;

        match tokens.len() {
            1 => match self.component(&tokens[0])? {
                Component::Register(base) => Ok(Handle::memory(base, 0)),
                Component::Number(offset) => Ok(Handle::absolute(offset_of(offset, position)?)),
                Component::Symbol(symbol) => Ok(Handle::data_section(symbol, false)),
            },

            2 => {
                expect_operator(&tokens[0], "-")?;
                let offset = parse_number(&tokens[1])?;
                Ok(Handle::absolute(offset_of(-offset, position)?))
            }

            3 => {
                let left = self.component(&tokens[0])?;
                let right = self.component(&tokens[2])?;

                match (left, tokens[1].text.as_str(), right) {
                    (Component::Register(base), "+", Component::Register(index)) => {
                        Ok(Handle::complex_memory(Some(base), index, 1, 0))
                    }
                    (Component::Register(base), "+", Component::Number(offset)) => {
                        Ok(Handle::memory(base, offset_of(offset, position)?))
                    }
                    (Component::Register(base), "-", Component::Number(offset)) => {
                        Ok(Handle::memory(base, offset_of(-offset, position)?))
                    }
                    (Component::Symbol(symbol), "+", Component::Number(offset)) => {
                        Ok(symbol_with_offset(symbol, offset))
                    }
                    (Component::Symbol(symbol), "-", Component::Number(offset)) => {
                        Ok(symbol_with_offset(symbol, -offset))
                    }
                    (Component::Register(index), "*", Component::Number(scale)) => {
                        Ok(Handle::complex_memory(None, index, scale_of(scale, position)?, 0))
                    }
                    _ => Err(EncodeError::syntax(position, "could not understand the address")),
                }
            }

            5 => {
                let first = self.component(&tokens[0])?;
                let second = self.component(&tokens[2])?;
                let third = self.component(&tokens[4])?;
                let operators = (tokens[1].text.as_str(), tokens[3].text.as_str());

                match (first, operators, second, third) {
                    // base + index +- offset
                    (
                        Component::Register(base),
                        ("+", sign @ ("+" | "-")),
                        Component::Register(index),
                        Component::Number(offset),
                    ) => {
                        let offset = if sign == "-" { -offset } else { offset };
                        Ok(Handle::complex_memory(Some(base), index, 1, offset_of(offset, position)?))
                    }

                    // index * scale +- offset
                    (
                        Component::Register(index),
                        ("*", sign @ ("+" | "-")),
                        Component::Number(scale),
                        Component::Number(offset),
                    ) => {
                        let offset = if sign == "-" { -offset } else { offset };
                        Ok(Handle::complex_memory(
                            None,
                            index,
                            scale_of(scale, position)?,
                            offset_of(offset, position)?,
                        ))
                    }

                    // index * scale + base
                    (
                        Component::Register(index),
                        ("*", "+"),
                        Component::Number(scale),
                        Component::Register(base),
                    ) => Ok(Handle::complex_memory(
                        Some(base),
                        index,
                        scale_of(scale, position)?,
                        0,
                    )),

                    _ => Err(EncodeError::syntax(position, "could not understand the address")),
                }
            }

            7 => {
                let sign = expect_sign(&tokens[5])?;
                let offset = parse_number(&tokens[6])?;
                let offset = if sign == "-" { -offset } else { offset };
                let offset = offset_of(offset, position)?;

                // base + index * scale +- offset
                if tokens[1].text == "+" && tokens[3].text == "*" {
                    let base = self.register_component(&tokens[0])?;
                    let index = self.register_component(&tokens[2])?;
                    let scale = scale_of(parse_number(&tokens[4])?, position)?;
                    return Ok(Handle::complex_memory(Some(base), index, scale, offset));
                }

                // index * scale + base +- offset
                if tokens[1].text == "*" && tokens[3].text == "+" {
                    let index = self.register_component(&tokens[0])?;
                    let scale = scale_of(parse_number(&tokens[2])?, position)?;
                    let base = self.register_component(&tokens[4])?;
                    return Ok(Handle::complex_memory(Some(base), index, scale, offset));
                }

                Err(EncodeError::syntax(position, "could not understand the address"))
            }

            _ => Err(EncodeError::syntax(position, "could not understand the address")),
        }
    }

    fn component(&self, token: &Token) -> Result<Component, EncodeError> {
        match token.kind {
            TokenKind::Number => Ok(Component::Number(parse_number(token)?)),
            TokenKind::Identifier => match self.registers.get(token.text.as_str()) {
                Some(entry) if !entry.media => Ok(Component::Register(entry.identifier)),
                Some(_) => Err(EncodeError::syntax(
                    token.position,
                    "media registers can not be used in addresses",
                )),
                None => Ok(Component::Symbol(token.text.clone())),
            },
            _ => Err(EncodeError::syntax(token.position, "could not understand the address")),
        }
    }

    fn register_component(&self, token: &Token) -> Result<u8, EncodeError> {
        match self.component(token)? {
            Component::Register(identifier) => Ok(identifier),
            _ => Err(EncodeError::syntax(token.position, "expected a register")),
        }
    }
}

fn symbol_with_offset(symbol: String, offset: i64) -> Handle {
    match Handle::data_section(symbol, false) {
        Handle::DataSection { symbol, address, modifier, size, .. } => {
            Handle::DataSection { symbol, offset, address, modifier, size }
        }
        other => other,
    }
}

fn expect_operator(token: &Token, operator: &str) -> Result<(), EncodeError> {
    if token.kind == TokenKind::Operator && token.text == operator {
        return Ok(());
    }

    Err(EncodeError::syntax(token.position, format!("expected '{operator}'")))
}

fn expect_sign(token: &Token) -> Result<&str, EncodeError> {
    if token.kind == TokenKind::Operator && (token.text == "+" || token.text == "-") {
        return Ok(token.text.as_str());
    }

    Err(EncodeError::syntax(token.position, "expected '+' or '-'"))
}

fn parse_number(token: &Token) -> Result<i64, EncodeError> {
    if token.kind != TokenKind::Number {
        return Err(EncodeError::syntax(token.position, "expected a number"));
    }

    let result = match token.text.strip_prefix("0x") {
        Some(digits) => i64::from_str_radix(digits, 16),
        None => token.text.parse(),
    };

    result.map_err(|_| EncodeError::syntax(token.position, "could not parse the number"))
}

fn offset_of(value: i64, position: SourcePosition) -> Result<i32, EncodeError> {
    i32::try_from(value)
        .map_err(|_| EncodeError::syntax(position, "address offset does not fit into 32 bits"))
}

fn scale_of(value: i64, position: SourcePosition) -> Result<u8, EncodeError> {
    match value {
        1 | 2 | 4 | 8 => Ok(value as u8),
        _ => Err(EncodeError::syntax(position, "address scale must be 1, 2, 4 or 8")),
    }
}

fn tokenize(line: usize, text: &str) -> Result<Vec<Token>, EncodeError> {
    let mut tokens = Vec::new();
    let mut characters = text.char_indices().peekable();

    while let Some((index, character)) = characters.next() {
        let position = SourcePosition { line, column: index + 1 };

        if character.is_whitespace() {
            continue;
        }

        let (kind, text) = match character {
            ',' => (TokenKind::Comma, character.to_string()),
            ':' => (TokenKind::Colon, character.to_string()),
            '[' => (TokenKind::OpenBracket, character.to_string()),
            ']' => (TokenKind::CloseBracket, character.to_string()),
            '+' | '-' | '*' => (TokenKind::Operator, character.to_string()),

            _ if character.is_ascii_digit() => {
                let mut text = character.to_string();
                while let Some((_, next)) = characters.peek() {
                    if next.is_ascii_alphanumeric() {
                        text.push(*next);
                        characters.next();
                    } else {
                        break;
                    }
                }
                (TokenKind::Number, text)
            }

            _ if character.is_ascii_alphabetic() || character == '_' || character == '.' => {
                let mut text = character.to_string();
                while let Some((_, next)) = characters.peek() {
                    if next.is_ascii_alphanumeric() || *next == '_' || *next == '.' {
                        text.push(*next);
                        characters.next();
                    } else {
                        break;
                    }
                }
                (TokenKind::Identifier, text)
            }

            _ => return Err(EncodeError::syntax(position, "unexpected character")),
        };

        tokens.push(Token { kind, text, position });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::{RAX, RBP, RBX, RSP};
    use pretty_assertions::assert_eq;

    fn parse_single(assembly: &str) -> Instruction {
        let mut parser = AssemblyParser::new();
        parser.parse(assembly).unwrap();
        assert_eq!(parser.instructions.len(), 1);
        parser.instructions.remove(0)
    }

    #[test]
    fn registers_carry_their_partition_size() {
        let instruction = parse_single("push rax");
        assert_eq!(instruction.parameters[0].handle, Handle::register(RAX, Size::Qword));

        let instruction = parse_single("push ax");
        assert_eq!(instruction.parameters[0].handle, Handle::register(RAX, Size::Word));
    }

    #[test]
    fn base_offset_address() {
        let instruction = parse_single("mov rax, [rbp-8]");
        assert_eq!(instruction.operation, "mov");
        assert_eq!(instruction.parameters[1].handle, Handle::memory(RBP, -8));
    }

    #[test]
    fn base_index_scale_offset_address() {
        let instruction = parse_single("mov rax, [rax+rbx*4-8]");
        assert_eq!(
            instruction.parameters[1].handle,
            Handle::complex_memory(Some(RAX), RBX, 4, -8)
        );
    }

    #[test]
    fn index_scale_with_offset_keeps_the_offset() {
        let instruction = parse_single("mov rax, [rbx*8+16]");
        assert_eq!(instruction.parameters[1].handle, Handle::complex_memory(None, RBX, 8, 16));
    }

    #[test]
    fn index_scale_with_base() {
        let instruction = parse_single("mov rax, [rbx*4+rsp]");
        assert_eq!(instruction.parameters[1].handle, Handle::complex_memory(Some(RSP), RBX, 4, 0));
    }

    #[test]
    fn size_keyword_overrides_the_operand_size() {
        let instruction = parse_single("mov byte [rbp-1], 0");
        assert_eq!(
            instruction.parameters[0].handle,
            Handle::memory(RBP, -1).with_size(Size::Byte)
        );
    }

    #[test]
    fn symbols_inside_brackets_load_through_the_symbol() {
        let instruction = parse_single("mov rax, [counter+4]");

        match &instruction.parameters[1].handle {
            Handle::DataSection { symbol, offset, address, .. } => {
                assert_eq!(symbol, "counter");
                assert_eq!(*offset, 4);
                assert!(!address);
            }
            other => panic!("expected a data section handle, got {other:?}"),
        }
    }

    #[test]
    fn bare_symbols_are_address_references() {
        let instruction = parse_single("call printf");
        assert_eq!(instruction.kind, InstructionKind::Call);

        match &instruction.parameters[0].handle {
            Handle::DataSection { symbol, address, .. } => {
                assert_eq!(symbol, "printf");
                assert!(address);
            }
            other => panic!("expected a data section handle, got {other:?}"),
        }
    }

    #[test]
    fn labels_comments_and_directives() {
        let mut parser = AssemblyParser::new();
        parser
            .parse(".intel_syntax noprefix\nstart:\n.L2:\nret # done\n")
            .unwrap();

        assert_eq!(parser.instructions.len(), 3);
        assert_eq!(parser.instructions[0].kind, InstructionKind::Label("start".into()));
        assert_eq!(parser.instructions[1].kind, InstructionKind::Label(".L2".into()));
        assert_eq!(parser.instructions[2].operation, "ret");
    }

    #[test]
    fn jumps_are_classified() {
        let instruction = parse_single("jne .L2");
        assert_eq!(instruction.kind, InstructionKind::Jump);
    }

    #[test]
    fn lock_prefix_is_folded_into_the_operation() {
        let instruction = parse_single("lock add [rbp-8], 1");
        assert_eq!(instruction.operation, "lock add");
    }

    #[test]
    fn negative_constants() {
        let instruction = parse_single("mov rax, -129");
        assert_eq!(instruction.parameters[0].handle, Handle::register(RAX, Size::Qword));
        assert_eq!(instruction.parameters[1].handle, Handle::constant(-129));
    }

    #[test]
    fn oversized_constant_widths_are_rejected() {
        let mut parser = AssemblyParser::new();
        assert!(parser.parse("mov rax, yword 0").is_err());
        assert!(parser.parse("mov rax, xword 0").is_err());
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        let mut parser = AssemblyParser::new();
        assert!(parser.parse("mov rax, [rbx*3]").is_err());
        assert!(parser.parse("mov rax, [+]").is_err());
    }
}
