//! The machine aggregate, owning every piece of state a loaded
//! program can observe.

mod execute;
mod print;

use rand::{
    rngs::{OsRng, StdRng},
    RngCore, SeedableRng,
};
use tinyvec::ArrayVec;

use crate::{
    definitions::{cpu, display::glyphs, memory},
    devices::Keypad,
    error::{StackError, StepError},
    opcode::{self, Instruction, ProgramCounterStep},
    resources::Rom,
    screen::Screen,
    timer::Timers,
};

/// A complete machine with one program installed.
///
/// The host drives it through [`step`](Self::step) at the instruction
/// rate, [`tick_timers`](Self::tick_timers) at the fixed timer rate
/// and [`keydown`](Self::keydown) / [`keyup`](Self::keyup) as key
/// events arrive. All calls expect exclusive access; there is no
/// hidden global state anywhere.
pub struct Machine {
    /// The name of the loaded program.
    name: String,
    /// The flat ram, `[0x000, 0x200)` holds the glyph table and is
    /// reserved, the program and its data live from `0x200` up.
    memory: Vec<u8>,
    /// The sixteen data registers, the last one doubles as the
    /// carry / borrow / collision flag.
    registers: [u8; cpu::register::COUNT],
    /// The address register, wraps at 16 bit, checked on access.
    index: u16,
    /// Points at the next instruction inside memory.
    program_counter: u16,
    /// The bounded return stack, calls beyond its capacity fault.
    stack: ArrayVec<[u16; cpu::stack::DEPTH]>,
    /// The delay and sound countdown pair.
    timers: Timers,
    /// The framebuffer.
    screen: Screen,
    /// The key states as last reported by the host.
    keypad: Keypad,
    /// While `Some`, execution is suspended and the next keydown
    /// writes its key index into the given register.
    awaiting_key: Option<usize>,
    /// The randomness source of the random-and instruction.
    rng: Box<dyn RngCore + Send>,
}

impl Machine {
    /// Builds a machine around the given program, drawing randomness
    /// from the operating system.
    pub fn new(rom: &Rom) -> Self {
        Self::with_rng(rom, Box::new(OsRng))
    }

    /// Builds a machine whose random-and instruction is fully
    /// reproducible from the seed.
    pub fn with_seed(rom: &Rom, seed: u64) -> Self {
        Self::with_rng(rom, Box::new(StdRng::seed_from_u64(seed)))
    }

    fn with_rng(rom: &Rom, rng: Box<dyn RngCore + Send>) -> Self {
        let data = rom.data();
        // The rom type already refuses oversized programs.
        debug_assert!(data.len() <= memory::PROGRAM_CAPACITY);

        let mut memory = vec![0; memory::SIZE];
        memory[glyphs::ADDRESS..glyphs::ADDRESS + glyphs::TABLE.len()]
            .copy_from_slice(&glyphs::TABLE);
        memory[memory::PROGRAM_START..memory::PROGRAM_START + data.len()].copy_from_slice(data);

        Self {
            name: rom.name().to_string(),
            memory,
            registers: [0; cpu::register::COUNT],
            index: 0,
            program_counter: memory::PROGRAM_START as u16,
            stack: ArrayVec::new(),
            timers: Timers::default(),
            screen: Screen::default(),
            keypad: Keypad::default(),
            awaiting_key: None,
            rng,
        }
    }

    /// Runs a single fetch / decode / execute cycle.
    ///
    /// Returns whether the display changed, which only the draw
    /// instruction causes. While the machine waits for a key this is
    /// a no-op returning `Ok(false)`. On a fault the program counter
    /// stays at the faulting instruction and the rest of the state is
    /// untouched; whether to halt on that is the host's call.
    pub fn step(&mut self) -> Result<bool, StepError> {
        if self.awaiting_key.is_some() {
            return Ok(false);
        }

        let pc = self.program_counter;
        let opcode = opcode::fetch(&self.memory, pc as usize)
            .map_err(|source| StepError::Decode { pc, source })?;
        let instruction =
            Instruction::try_from(opcode).map_err(|source| StepError::Decode { pc, source })?;
        log::trace!("{pc:#06X}: {instruction}");

        let (step, drawn) = self.execute(instruction)?;
        self.advance(step);
        Ok(drawn)
    }

    /// Advances the delay and sound counters by one tick each.
    ///
    /// Driven by the host at the fixed timer rate, independent of the
    /// instruction rate and unaffected by the awaiting-key latch.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    /// Reports a key as pressed.
    ///
    /// While the machine waits on a read-key instruction this also
    /// writes the key index into the target register and resumes
    /// execution.
    pub fn keydown(&mut self, key: usize) {
        self.keypad.press(key);
        if let Some(x) = self.awaiting_key.take() {
            self.registers[x] = key as u8;
        }
    }

    /// Reports a key as released.
    pub fn keyup(&mut self, key: usize) {
        self.keypad.release(key);
    }

    /// The name of the loaded program.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The framebuffer, for presentation layers.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The key states as currently latched.
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// The two countdown counters.
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// True while the sound counter runs; gates the host tone.
    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    /// True while a read-key instruction suspends execution.
    pub fn waiting_for_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    /// The current program counter.
    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    /// The sixteen data registers.
    pub fn registers(&self) -> &[u8; cpu::register::COUNT] {
        &self.registers
    }

    /// Moves the program counter. Out of range jump targets are not
    /// validated here, they surface at the next fetch.
    fn advance(&mut self, step: ProgramCounterStep) {
        const OPCODE: u16 = memory::opcodes::SIZE as u16;
        self.program_counter = match step {
            ProgramCounterStep::Next => self.program_counter.wrapping_add(OPCODE),
            ProgramCounterStep::Skip => self.program_counter.wrapping_add(2 * OPCODE),
            ProgramCounterStep::Jump(address) => address,
        };
    }

    fn push_return(&mut self, address: u16) -> Result<(), StepError> {
        if self.stack.try_push(address).is_some() {
            return Err(StepError::Stack {
                pc: self.program_counter,
                source: StackError::Overflow {
                    limit: cpu::stack::DEPTH,
                },
            });
        }
        Ok(())
    }

    fn pop_return(&mut self) -> Result<u16, StepError> {
        self.stack.pop().ok_or(StepError::Stack {
            pc: self.program_counter,
            source: StackError::Underflow,
        })
    }
}
