//! The machine code pipeline.
//!
//! Instructions are partitioned into modules so that they can be encoded in
//! parallel. A module ends right after a jump whose target is a label, which
//! is the only place where the size of the emitted code is not yet known:
//! every such jump is first encoded in its 32-bit offset form and later
//! shrunk to the 8-bit form when the final distance allows it. Once all
//! module sizes are settled, label offsets are patched in and the modules are
//! concatenated into one text section.

mod emit;

use std::collections::{BTreeMap, HashMap};

use crate::binary::{
    BinaryRelocation, BinaryRelocationKind, BinarySection, BinarySectionKind, BinarySymbol,
    SECTION_FLAG_ALLOCATE, SECTION_FLAG_EXECUTE,
};
use crate::debug_frame::DebugFrameEncoder;
use crate::debug_line::DebugLineEncoder;
use crate::error::EncodeError;
use crate::handle::Handle;
use crate::instruction::{Instruction, InstructionKind};
use crate::parser::AssemblyParser;

pub const TEXT_SECTION: &str = ".text";

/// The longest legal x86-64 instruction. Module outputs are sized with this
/// so that encoding almost never reallocates.
const MAX_INSTRUCTION_LENGTH: usize = 15;

/// The label jump that terminates a module.
#[derive(Debug, Clone)]
pub struct ModuleJump {
    pub label: String,
    pub conditional: bool,
    /// Position right after the jump instruction inside the module output.
    pub position: usize,
    pub short: bool,
}

/// A 32-bit self-relative reference to a label, patched once module layout
/// is final. Calls produce these, as do label jumps inside manual blocks.
#[derive(Debug, Clone)]
pub struct LabelUsage {
    pub label: String,
    /// Position of the 32-bit placeholder inside the module output.
    pub position: usize,
}

/// Where a label was declared.
#[derive(Debug, Clone, Copy)]
pub struct LabelDescriptor {
    pub module: usize,
    pub position: usize,
}

#[derive(Debug, Clone)]
pub struct DebugLineEvent {
    pub offset: usize,
    pub line: i32,
    pub column: i32,
}

#[derive(Debug, Clone)]
pub enum DebugFrameEvent {
    Start { symbol: String, offset: usize },
    FrameOffset { offset: usize, value: i32 },
    End { offset: usize },
}

#[derive(Debug)]
pub struct EncoderModule {
    pub index: usize,
    pub jump: Option<ModuleJump>,
    pub instructions: Vec<Instruction>,
    /// Declared labels with their module-relative positions.
    pub labels: Vec<(String, usize)>,
    pub calls: Vec<LabelUsage>,
    pub memory_relocations: Vec<BinaryRelocation>,
    pub line_events: Vec<DebugLineEvent>,
    pub frame_events: Vec<DebugFrameEvent>,
    pub output: Vec<u8>,
    /// Write cursor and, after encoding, the size of the module.
    pub position: usize,
    /// Offset of this module inside the final text section.
    pub start: usize,
}

impl EncoderModule {
    fn new(index: usize, instructions: Vec<Instruction>, jump: Option<ModuleJump>) -> EncoderModule {
        let emitting = instructions
            .iter()
            .filter(|instruction| !instruction.operation.is_empty())
            .count();

        EncoderModule {
            index,
            jump,
            instructions,
            labels: Vec::new(),
            calls: Vec::new(),
            memory_relocations: Vec::new(),
            line_events: Vec::new(),
            frame_events: Vec::new(),
            output: Vec::with_capacity(emitting * MAX_INSTRUCTION_LENGTH),
            position: 0,
            start: 0,
        }
    }

    fn grow(&mut self, bytes: usize) {
        if self.output.len() < self.position + bytes {
            self.output.resize(self.position + bytes, 0);
        }
    }

    pub(crate) fn write(&mut self, value: u8) {
        self.grow(1);
        self.output[self.position] = value;
        self.position += 1;
    }

    pub(crate) fn write_u16(&mut self, value: u16) {
        self.grow(2);
        self.output[self.position..self.position + 2].copy_from_slice(&value.to_le_bytes());
        self.position += 2;
    }

    pub(crate) fn write_u32(&mut self, value: u32) {
        self.grow(4);
        self.output[self.position..self.position + 4].copy_from_slice(&value.to_le_bytes());
        self.position += 4;
    }

    pub(crate) fn write_u64(&mut self, value: u64) {
        self.grow(8);
        self.output[self.position..self.position + 8].copy_from_slice(&value.to_le_bytes());
        self.position += 8;
    }

    pub(crate) fn write_at(&mut self, position: usize, value: u8) {
        self.output[position] = value;
    }

    pub(crate) fn write_i32_at(&mut self, position: usize, value: i32) {
        self.output[position..position + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// Splits the instructions into modules at label jumps. The jump stays as
/// the last instruction of its module.
pub fn create_modules(instructions: Vec<Instruction>) -> Vec<EncoderModule> {
    let mut modules = Vec::new();
    let mut current = Vec::new();

    for instruction in instructions {
        let target = instruction
            .parameters
            .first()
            .and_then(|parameter| match &parameter.handle {
                Handle::DataSection { symbol, .. } => Some(symbol.clone()),
                _ => None,
            });

        match (&instruction.kind, target) {
            (InstructionKind::Jump, Some(label)) => {
                let jump = ModuleJump {
                    label,
                    conditional: instruction.operation != "jmp",
                    position: 0,
                    short: false,
                };

                current.push(instruction);
                let instructions = std::mem::take(&mut current);
                modules.push(EncoderModule::new(modules.len(), instructions, Some(jump)));
            }
            _ => current.push(instruction),
        }
    }

    if !current.is_empty() {
        modules.push(EncoderModule::new(modules.len(), current, None));
    }

    modules
}

fn encode_instruction(
    module: &mut EncoderModule,
    instruction: &Instruction,
    parser: &mut AssemblyParser,
    is_terminator: bool,
) -> Result<(), EncodeError> {
    match &instruction.kind {
        InstructionKind::Label(name) => {
            module.labels.push((name.clone(), module.position));
            Ok(())
        }

        InstructionKind::AppendPosition { line, column } => {
            module.line_events.push(DebugLineEvent {
                offset: module.position,
                line: *line,
                column: *column,
            });
            Ok(())
        }

        InstructionKind::DebugStart(symbol) => {
            module.frame_events.push(DebugFrameEvent::Start {
                symbol: symbol.clone(),
                offset: module.position,
            });
            Ok(())
        }

        InstructionKind::DebugFrameOffset(value) => {
            module.frame_events.push(DebugFrameEvent::FrameOffset {
                offset: module.position,
                value: *value,
            });
            Ok(())
        }

        InstructionKind::DebugEnd => {
            module.frame_events.push(DebugFrameEvent::End { offset: module.position });
            Ok(())
        }

        _ if instruction.is_manual => {
            parser.reset();
            parser.parse(&instruction.operation)?;
            let parsed = std::mem::take(&mut parser.instructions);

            for inner in &parsed {
                encode_instruction(module, inner, parser, false)?;
            }

            Ok(())
        }

        _ => emit::write_instruction(module, instruction, is_terminator),
    }
}

fn encode_module(module: &mut EncoderModule, parser: &mut AssemblyParser) -> Result<(), EncodeError> {
    let instructions = std::mem::take(&mut module.instructions);
    let last = instructions.len().saturating_sub(1);

    for (index, instruction) in instructions.iter().enumerate() {
        encode_instruction(module, instruction, parser, index == last)?;
    }

    module.instructions = instructions;
    module.output.truncate(module.position);
    Ok(())
}

/// Encodes all modules, spreading them over the available cores. Each worker
/// owns its parser, so manual assembly blocks parse without locking.
pub fn encode_modules(modules: &mut [EncoderModule]) -> Result<(), EncodeError> {
    if modules.is_empty() {
        return Ok(());
    }

    let workers = std::thread::available_parallelism().map(|count| count.get()).unwrap_or(1);
    let chunk = modules.len().div_ceil(workers).max(1);

    std::thread::scope(|scope| {
        let mut handles = Vec::new();

        for chunk in modules.chunks_mut(chunk) {
            handles.push(scope.spawn(move || {
                let mut parser = AssemblyParser::new();

                for module in chunk {
                    encode_module(module, &mut parser)?;
                }

                Ok(())
            }));
        }

        for handle in handles {
            match handle.join() {
                Ok(result) => result?,
                Err(_) => return Err(EncodeError::WorkerFailure),
            }
        }

        Ok(())
    })
}

/// Collects all label declarations. Declaring the same label twice is fatal,
/// since both jump resolution and the exported symbols would be ambiguous.
pub fn load_labels(
    modules: &[EncoderModule],
) -> Result<HashMap<String, LabelDescriptor>, EncodeError> {
    let mut labels = HashMap::new();

    for module in modules {
        for (label, position) in &module.labels {
            let descriptor = LabelDescriptor { module: module.index, position: *position };

            if labels.insert(label.clone(), descriptor).is_some() {
                return Err(EncodeError::DuplicateLabel(label.clone()));
            }
        }
    }

    Ok(labels)
}

/// Whether the jump at `position` inside module `from` can not reach its
/// label with an 8-bit offset. Labels without a local declaration are
/// external and always need the 32-bit form.
fn is_long_jump_needed(
    modules: &[EncoderModule],
    labels: &HashMap<String, LabelDescriptor>,
    from: usize,
    position: usize,
    label: &str,
) -> bool {
    let Some(descriptor) = labels.get(label) else {
        return true;
    };

    let distance: i64 = if descriptor.module == from {
        descriptor.position as i64 - position as i64
    } else if descriptor.module > from {
        let between: usize =
            modules[from + 1..descriptor.module].iter().map(|module| module.position).sum();

        (between + descriptor.position) as i64
    } else {
        let between: usize =
            modules[descriptor.module + 1..from].iter().map(|module| module.position).sum();
        let remainder = modules[descriptor.module].position - descriptor.position;

        -((remainder + between + position) as i64)
    };

    !(-128..=127).contains(&distance)
}

/// Shrinks module jumps to their 8-bit form where the distance allows it.
/// Jumps are visited nearest target first, so that shrinking them can bring
/// farther jumps into 8-bit range as well. Jumps start in the 32-bit form,
/// so leaving one unshrunk is always sound.
pub fn complete_modules(
    modules: &mut [EncoderModule],
    labels: &HashMap<String, LabelDescriptor>,
) {
    let mut order: Vec<usize> = (0..modules.len())
        .filter(|index| modules[*index].jump.is_some())
        .collect();

    order.sort_by_key(|index| {
        let distance = modules[*index]
            .jump
            .as_ref()
            .and_then(|jump| labels.get(&jump.label))
            .map(|descriptor| (descriptor.module as i64 - *index as i64).unsigned_abs());

        distance.unwrap_or(u64::MAX)
    });

    for index in order {
        let Some(jump) = modules[index].jump.clone() else {
            continue;
        };

        // As if the jump were already in its 2-byte form
        let shrink = if jump.conditional { 4 } else { 3 };
        let candidate = jump.position - shrink;

        if is_long_jump_needed(modules, labels, index, candidate, &jump.label) {
            continue;
        }

        let module = &mut modules[index];

        if jump.conditional {
            // 0F 8x rel32 becomes 7x rel8
            let opcode = module.output[candidate - 1];
            module.output[candidate - 2] = opcode - 0x10;
        } else {
            // E9 rel32 becomes EB rel8
            module.output[candidate - 2] = 0xEB;
        }

        module.position = candidate;
        module.output.truncate(candidate);

        if let Some(jump) = module.jump.as_mut() {
            jump.position = candidate;
            jump.short = true;
        }
    }
}

/// Assigns every module its start offset inside the text section.
pub fn compute_module_positions(modules: &mut [EncoderModule]) {
    let mut position = 0;

    for module in modules {
        module.start = position;
        position += module.position;
    }
}

/// Patches jump offsets and local call offsets now that the layout is final.
/// Calls to labels without a local declaration stay behind as relocations.
pub fn write_offsets(modules: &mut [EncoderModule], labels: &HashMap<String, LabelDescriptor>) {
    let starts: Vec<usize> = modules.iter().map(|module| module.start).collect();

    for index in 0..modules.len() {
        if let Some(jump) = modules[index].jump.clone() {
            if let Some(descriptor) = labels.get(&jump.label) {
                let target = starts[descriptor.module] + descriptor.position;
                let from = modules[index].start + jump.position;
                let offset = target as i64 - from as i64;

                if jump.short {
                    modules[index].write_at(jump.position - 1, offset as u8);
                } else {
                    modules[index].write_i32_at(jump.position - 4, offset as i32);
                }
            }
        }

        let calls = std::mem::take(&mut modules[index].calls);
        let start = modules[index].start;
        let mut external = Vec::new();

        for call in calls {
            match labels.get(&call.label) {
                Some(descriptor) => {
                    let target = starts[descriptor.module] + descriptor.position;
                    let from = start + call.position + 4;
                    modules[index].write_i32_at(call.position, (target as i64 - from as i64) as i32);
                }
                None => external.push(call),
            }
        }

        modules[index].calls = external;
    }
}

#[derive(Debug)]
pub struct EncoderOutput {
    /// The text section first, then the debug sections when requested.
    pub sections: Vec<BinarySection>,
    pub symbols: BTreeMap<String, BinarySymbol>,
}

impl EncoderOutput {
    pub fn text(&self) -> &BinarySection {
        &self.sections[0]
    }
}

/// Concatenates the modules into the final text section, turning unresolved
/// label references into relocations and replaying the recorded debug events
/// into the debug sections.
pub fn export(
    modules: &[EncoderModule],
    labels: &HashMap<String, LabelDescriptor>,
    debug_file: Option<&str>,
) -> EncoderOutput {
    let total: usize = modules.iter().map(|module| module.position).sum();
    let mut data = Vec::with_capacity(total);
    let mut relocations = Vec::new();

    for module in modules {
        data.extend_from_slice(&module.output[..module.position]);

        if let Some(jump) = &module.jump {
            if !labels.contains_key(&jump.label) {
                relocations.push(BinaryRelocation::new(
                    jump.label.clone(),
                    module.start + jump.position - 4,
                    -4,
                    BinaryRelocationKind::ProgramCounterRelative,
                ));
            }
        }

        for call in &module.calls {
            relocations.push(BinaryRelocation::new(
                call.label.clone(),
                module.start + call.position,
                -4,
                BinaryRelocationKind::ProgramCounterRelative,
            ));
        }

        for relocation in &module.memory_relocations {
            let mut relocation = relocation.clone();
            relocation.offset += module.start;
            relocations.push(relocation);
        }
    }

    let mut symbols = BTreeMap::new();

    for (name, descriptor) in labels {
        let offset = modules[descriptor.module].start + descriptor.position;
        symbols.insert(name.clone(), BinarySymbol::new(name.clone(), offset, false));
    }

    // Targets without a local definition surface as undefined symbols, so
    // the object writer can emit references for the linker to resolve.
    for module in modules {
        let unresolved = module
            .jump
            .iter()
            .map(|jump| &jump.label)
            .chain(module.calls.iter().map(|call| &call.label))
            .chain(module.memory_relocations.iter().map(|relocation| &relocation.symbol));

        for name in unresolved {
            if !symbols.contains_key(name) {
                symbols.insert(name.clone(), BinarySymbol::new(name.clone(), 0, true));
            }
        }
    }

    let mut text = BinarySection::new(TEXT_SECTION, BinarySectionKind::Text, data);
    text.flags = SECTION_FLAG_ALLOCATE | SECTION_FLAG_EXECUTE;
    text.relocations = relocations;

    let mut sections = vec![text];

    if let Some(file) = debug_file {
        let mut lines = DebugLineEncoder::new(file);

        for module in modules {
            for event in &module.line_events {
                lines.add(module.start + event.offset, event.line, event.column);
            }
        }

        lines.end(total);
        sections.push(lines.export());
    }

    let has_frames = modules.iter().any(|module| !module.frame_events.is_empty());

    if has_frames {
        let mut frames = DebugFrameEncoder::new();

        for module in modules {
            for event in &module.frame_events {
                match event {
                    DebugFrameEvent::Start { symbol, offset } => {
                        frames.start(symbol, module.start + offset);
                    }
                    DebugFrameEvent::FrameOffset { offset, value } => {
                        frames.move_to(module.start + offset);
                        frames.set_frame_offset(*value);
                    }
                    DebugFrameEvent::End { offset } => {
                        frames.end(module.start + offset);
                    }
                }
            }
        }

        sections.push(frames.export());
    }

    EncoderOutput { sections, symbols }
}
