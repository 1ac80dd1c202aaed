//! Everything needed to turn the raw bytes in memory into members of
//! the closed instruction set of the machine.

use std::fmt;

use crate::error::DecodeError;

/// A single instruction word. The machine stores opcodes big endian,
/// so the high nibble of the first byte selects the family.
pub type Opcode = u16;

/// Reads the two bytes at the given pointer and assembles them into an
/// [`Opcode`].
pub(crate) fn fetch(memory: &[u8], pointer: usize) -> Result<Opcode, DecodeError> {
    if pointer + 1 >= memory.len() {
        return Err(DecodeError::OutOfBounds {
            pointer,
            len: memory.len(),
        });
    }
    Ok(Opcode::from_be_bytes([memory[pointer], memory[pointer + 1]]))
}

/// Access to the operand fields packed into an [`Opcode`].
///
/// ```
/// use ocho::opcode::{Opcode, Operands};
///
/// let opcode: Opcode = 0xD4B6;
/// assert_eq!(opcode.x(), 0x4);
/// assert_eq!(opcode.y(), 0xB);
/// assert_eq!(opcode.n(), 0x6);
/// assert_eq!(opcode.nnn(), 0x4B6);
/// assert_eq!(opcode.kk(), 0xB6);
/// ```
pub trait Operands {
    /// The low 12 bits, used as an address operand.
    fn nnn(&self) -> u16;
    /// The low byte, used as an immediate operand.
    fn kk(&self) -> u8;
    /// The low nibble, used as a sub-op selector or a sprite height.
    fn n(&self) -> usize;
    /// The register index in the second nibble.
    fn x(&self) -> usize;
    /// The register index in the third nibble.
    fn y(&self) -> usize;
}

impl Operands for Opcode {
    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn n(&self) -> usize {
        (self & 0x000F) as usize
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> 8) as usize
    }

    fn y(&self) -> usize {
        ((self & 0x00F0) >> 4) as usize
    }
}

/// The sub-operations of the register ALU family, keyed by the low
/// nibble of the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Assign,     // 8XY0
    Or,         // 8XY1
    And,        // 8XY2
    Xor,        // 8XY3
    AddCarry,   // 8XY4
    SubBorrow,  // 8XY5
    ShiftRight, // 8XY6
    SubReverse, // 8XY7
    ShiftLeft,  // 8XYE
}

/// The closed set of instructions the machine understands, with all
/// operand fields already extracted. Any bit pattern outside of this
/// set is a [`DecodeError`], never a silent no-op.
///
/// ```
/// use ocho::opcode::{AluOp, Instruction};
///
/// let instruction = Instruction::try_from(0x8124).unwrap();
/// assert_eq!(instruction, Instruction::Alu { op: AluOp::AddCarry, x: 1, y: 2 });
/// assert!(Instruction::try_from(0x8128).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,                             // 00E0
    Return,                                  // 00EE
    Jump { nnn: u16 },                       // 1NNN
    Call { nnn: u16 },                       // 2NNN
    SkipEqImm { x: usize, kk: u8 },          // 3XKK
    SkipNeImm { x: usize, kk: u8 },          // 4XKK
    SkipEqReg { x: usize, y: usize },        // 5XY0
    LoadImm { x: usize, kk: u8 },            // 6XKK
    AddImm { x: usize, kk: u8 },             // 7XKK
    Alu { op: AluOp, x: usize, y: usize },   // 8XYn
    SkipNeReg { x: usize, y: usize },        // 9XY0
    SetIndex { nnn: u16 },                   // ANNN
    JumpOffset { nnn: u16 },                 // BNNN
    Random { x: usize, kk: u8 },             // CXKK
    Draw { x: usize, y: usize, n: usize },   // DXYN
    SkipKeyPressed { x: usize },             // EX9E
    SkipKeyNotPressed { x: usize },          // EXA1
    ReadDelay { x: usize },                  // FX07
    WaitKey { x: usize },                    // FX0A
    SetDelay { x: usize },                   // FX15
    SetSound { x: usize },                   // FX18
    AddIndex { x: usize },                   // FX1E
    GlyphAddress { x: usize },               // FX29
    StoreBcd { x: usize },                   // FX33
    StoreRegisters { x: usize },             // FX55
    LoadRegisters { x: usize },              // FX65
}

impl TryFrom<Opcode> for Instruction {
    type Error = DecodeError;

    fn try_from(opcode: Opcode) -> Result<Self, Self::Error> {
        let instruction = match opcode & 0xF000 {
            0x0000 => match opcode {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::Return,
                // The machine-call family of the original hardware is
                // not part of the set.
                _ => return Err(DecodeError::Unknown(opcode)),
            },
            0x1000 => Self::Jump { nnn: opcode.nnn() },
            0x2000 => Self::Call { nnn: opcode.nnn() },
            0x3000 => Self::SkipEqImm {
                x: opcode.x(),
                kk: opcode.kk(),
            },
            0x4000 => Self::SkipNeImm {
                x: opcode.x(),
                kk: opcode.kk(),
            },
            0x5000 if opcode.n() == 0 => Self::SkipEqReg {
                x: opcode.x(),
                y: opcode.y(),
            },
            0x6000 => Self::LoadImm {
                x: opcode.x(),
                kk: opcode.kk(),
            },
            0x7000 => Self::AddImm {
                x: opcode.x(),
                kk: opcode.kk(),
            },
            0x8000 => {
                let op = match opcode.n() {
                    0x0 => AluOp::Assign,
                    0x1 => AluOp::Or,
                    0x2 => AluOp::And,
                    0x3 => AluOp::Xor,
                    0x4 => AluOp::AddCarry,
                    0x5 => AluOp::SubBorrow,
                    0x6 => AluOp::ShiftRight,
                    0x7 => AluOp::SubReverse,
                    0xE => AluOp::ShiftLeft,
                    _ => return Err(DecodeError::Unknown(opcode)),
                };
                Self::Alu {
                    op,
                    x: opcode.x(),
                    y: opcode.y(),
                }
            }
            0x9000 if opcode.n() == 0 => Self::SkipNeReg {
                x: opcode.x(),
                y: opcode.y(),
            },
            0xA000 => Self::SetIndex { nnn: opcode.nnn() },
            0xB000 => Self::JumpOffset { nnn: opcode.nnn() },
            0xC000 => Self::Random {
                x: opcode.x(),
                kk: opcode.kk(),
            },
            0xD000 => Self::Draw {
                x: opcode.x(),
                y: opcode.y(),
                n: opcode.n(),
            },
            0xE000 => match opcode.kk() {
                0x9E => Self::SkipKeyPressed { x: opcode.x() },
                0xA1 => Self::SkipKeyNotPressed { x: opcode.x() },
                _ => return Err(DecodeError::Unknown(opcode)),
            },
            0xF000 => match opcode.kk() {
                0x07 => Self::ReadDelay { x: opcode.x() },
                0x0A => Self::WaitKey { x: opcode.x() },
                0x15 => Self::SetDelay { x: opcode.x() },
                0x18 => Self::SetSound { x: opcode.x() },
                0x1E => Self::AddIndex { x: opcode.x() },
                0x29 => Self::GlyphAddress { x: opcode.x() },
                0x33 => Self::StoreBcd { x: opcode.x() },
                0x55 => Self::StoreRegisters { x: opcode.x() },
                0x65 => Self::LoadRegisters { x: opcode.x() },
                _ => return Err(DecodeError::Unknown(opcode)),
            },
            _ => return Err(DecodeError::Unknown(opcode)),
        };
        Ok(instruction)
    }
}

impl fmt::Display for Instruction {
    /// Writes the instruction in classic assembler syntax, which is
    /// what the per-step trace log shows.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { nnn } => write!(f, "JP {nnn:#05X}"),
            Call { nnn } => write!(f, "CALL {nnn:#05X}"),
            SkipEqImm { x, kk } => write!(f, "SE V{x:X}, {kk:#04X}"),
            SkipNeImm { x, kk } => write!(f, "SNE V{x:X}, {kk:#04X}"),
            SkipEqReg { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            LoadImm { x, kk } => write!(f, "LD V{x:X}, {kk:#04X}"),
            AddImm { x, kk } => write!(f, "ADD V{x:X}, {kk:#04X}"),
            Alu { op, x, y } => match op {
                AluOp::Assign => write!(f, "LD V{x:X}, V{y:X}"),
                AluOp::Or => write!(f, "OR V{x:X}, V{y:X}"),
                AluOp::And => write!(f, "AND V{x:X}, V{y:X}"),
                AluOp::Xor => write!(f, "XOR V{x:X}, V{y:X}"),
                AluOp::AddCarry => write!(f, "ADD V{x:X}, V{y:X}"),
                AluOp::SubBorrow => write!(f, "SUB V{x:X}, V{y:X}"),
                AluOp::ShiftRight => write!(f, "SHR V{x:X}"),
                AluOp::SubReverse => write!(f, "SUBN V{x:X}, V{y:X}"),
                AluOp::ShiftLeft => write!(f, "SHL V{x:X}"),
            },
            SkipNeReg { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            SetIndex { nnn } => write!(f, "LD I, {nnn:#05X}"),
            JumpOffset { nnn } => write!(f, "JP V0, {nnn:#05X}"),
            Random { x, kk } => write!(f, "RND V{x:X}, {kk:#04X}"),
            Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n:#X}"),
            SkipKeyPressed { x } => write!(f, "SKP V{x:X}"),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{x:X}"),
            ReadDelay { x } => write!(f, "LD V{x:X}, DT"),
            WaitKey { x } => write!(f, "LD V{x:X}, K"),
            SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            SetSound { x } => write!(f, "LD ST, V{x:X}"),
            AddIndex { x } => write!(f, "ADD I, V{x:X}"),
            GlyphAddress { x } => write!(f, "LD F, V{x:X}"),
            StoreBcd { x } => write!(f, "LD B, V{x:X}"),
            StoreRegisters { x } => write!(f, "LD [I], V{x:X}"),
            LoadRegisters { x } => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

/// The different ways an instruction moves the program counter.
///
/// Even the read-key instruction advances normally; its suspension is
/// the awaiting-key latch, not a counter hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramCounterStep {
    /// Move to the next instruction.
    Next,
    /// Move past the next instruction.
    Skip,
    /// Move to the given address.
    Jump(u16),
}

impl ProgramCounterStep {
    /// Skips exactly when the condition holds.
    pub fn cond(cond: bool) -> Self {
        if cond {
            Self::Skip
        } else {
            Self::Next
        }
    }
}
