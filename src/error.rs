use thiserror::Error;

use crate::opcode::Opcode;

/// Raised while turning two raw bytes into an instruction.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum DecodeError {
    /// No instruction family matches the given bit pattern.
    #[error("No instruction matches the opcode {0:#06X}.")]
    Unknown(Opcode),
    /// The fetch would read past the end of memory.
    #[error("An opcode fetch at {pointer:#06X} lies outside of the {len} bytes of memory.")]
    OutOfBounds { pointer: usize, len: usize },
}

/// Raised by the bounded return stack.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum StackError {
    /// A call was made while all nesting entries were in use.
    #[error("The call stack is full, all {limit} entries are in use.")]
    Overflow { limit: usize },
    /// A return was made without a matching call.
    #[error("The call stack is empty, there is nothing to return to.")]
    Underflow,
}

/// What a step reports when the running program breaks an execution
/// invariant. Every variant names the program counter of the faulting
/// instruction; the machine state is left untouched by the fault.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum StepError {
    #[error("At {pc:#06X}: {source}")]
    Decode { pc: u16, source: DecodeError },
    #[error("At {pc:#06X}: {source}")]
    Stack { pc: u16, source: StackError },
    /// A memory access through the index register would run past the
    /// end of memory.
    #[error("At {pc:#06X}: an access of {len} bytes at {addr:#06X} lies outside of memory.")]
    Address { pc: u16, addr: usize, len: usize },
}

/// Raised while loading a program image, before any machine exists.
#[derive(Error, Debug)]
pub enum RomError {
    /// The program does not fit into the ram left over above the
    /// reserved region.
    #[error("The program is {len} bytes long, but only {max} fit into memory.")]
    TooLarge { len: usize, max: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),
}
