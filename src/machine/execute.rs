//! The execution half of the engine, a single exhaustive dispatch
//! over the decoded instruction set.

use std::ops::Range;

use crate::{
    definitions::{cpu::register, display::glyphs, memory},
    error::StepError,
    opcode::{AluOp, Instruction, ProgramCounterStep},
};

use super::Machine;

impl Machine {
    /// Applies one decoded instruction to the machine state.
    ///
    /// Returns the program counter movement together with whether the
    /// display changed; only the draw instruction reports a change, a
    /// cleared screen does not count.
    pub(super) fn execute(
        &mut self,
        instruction: Instruction,
    ) -> Result<(ProgramCounterStep, bool), StepError> {
        use Instruction::*;

        let mut drawn = false;
        let step = match instruction {
            ClearScreen => {
                self.screen.clear();
                ProgramCounterStep::Next
            }
            Return => ProgramCounterStep::Jump(self.pop_return()?),
            Jump { nnn } => ProgramCounterStep::Jump(nnn),
            Call { nnn } => {
                self.push_return(self.program_counter + memory::opcodes::SIZE as u16)?;
                ProgramCounterStep::Jump(nnn)
            }
            SkipEqImm { x, kk } => ProgramCounterStep::cond(self.registers[x] == kk),
            SkipNeImm { x, kk } => ProgramCounterStep::cond(self.registers[x] != kk),
            SkipEqReg { x, y } => {
                ProgramCounterStep::cond(self.registers[x] == self.registers[y])
            }
            LoadImm { x, kk } => {
                self.registers[x] = kk;
                ProgramCounterStep::Next
            }
            AddImm { x, kk } => {
                // The immediate add never touches the flag.
                self.registers[x] = self.registers[x].wrapping_add(kk);
                ProgramCounterStep::Next
            }
            Alu { op, x, y } => {
                self.alu(op, x, y);
                ProgramCounterStep::Next
            }
            SkipNeReg { x, y } => {
                ProgramCounterStep::cond(self.registers[x] != self.registers[y])
            }
            SetIndex { nnn } => {
                self.index = nnn;
                ProgramCounterStep::Next
            }
            JumpOffset { nnn } => ProgramCounterStep::Jump(nnn + self.registers[0] as u16),
            Random { x, kk } => {
                let mut byte = [0_u8; 1];
                self.rng.fill_bytes(&mut byte);
                self.registers[x] = byte[0] & kk;
                ProgramCounterStep::Next
            }
            Draw { x, y, n } => {
                drawn = true;
                self.draw(x, y, n)?;
                ProgramCounterStep::Next
            }
            SkipKeyPressed { x } => {
                ProgramCounterStep::cond(self.keypad.is_pressed(self.key_of(x)))
            }
            SkipKeyNotPressed { x } => {
                ProgramCounterStep::cond(!self.keypad.is_pressed(self.key_of(x)))
            }
            ReadDelay { x } => {
                self.registers[x] = self.timers.delay();
                ProgramCounterStep::Next
            }
            WaitKey { x } => {
                // The program counter moves past the instruction now;
                // the latch then holds every following step until a
                // keydown resolves it.
                self.awaiting_key = Some(x);
                ProgramCounterStep::Next
            }
            SetDelay { x } => {
                self.timers.set_delay(self.registers[x]);
                ProgramCounterStep::Next
            }
            SetSound { x } => {
                self.timers.set_sound(self.registers[x]);
                ProgramCounterStep::Next
            }
            AddIndex { x } => {
                self.index = self.index.wrapping_add(self.registers[x] as u16);
                ProgramCounterStep::Next
            }
            GlyphAddress { x } => {
                let glyph = self.registers[x] as usize;
                self.index = (glyphs::ADDRESS + glyph * glyphs::STRIDE) as u16;
                ProgramCounterStep::Next
            }
            StoreBcd { x } => {
                self.store_bcd(x)?;
                ProgramCounterStep::Next
            }
            StoreRegisters { x } => {
                let span = self.checked_span(x + 1)?;
                self.memory[span].copy_from_slice(&self.registers[..=x]);
                ProgramCounterStep::Next
            }
            LoadRegisters { x } => {
                let span = self.checked_span(x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[span]);
                ProgramCounterStep::Next
            }
        };
        Ok((step, drawn))
    }

    /// The eight way register ALU. Result first, flag last, so an
    /// instruction targeting the flag register keeps the flag value.
    fn alu(&mut self, op: AluOp, x: usize, y: usize) {
        match op {
            AluOp::Assign => self.registers[x] = self.registers[y],
            AluOp::Or => self.registers[x] |= self.registers[y],
            AluOp::And => self.registers[x] &= self.registers[y],
            AluOp::Xor => self.registers[x] ^= self.registers[y],
            AluOp::AddCarry => {
                let (sum, carried) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[x] = sum;
                self.registers[register::FLAG] = carried as u8;
            }
            AluOp::SubBorrow => {
                let (difference, borrowed) = self.registers[x].overflowing_sub(self.registers[y]);
                self.registers[x] = difference;
                self.registers[register::FLAG] = (!borrowed) as u8;
            }
            AluOp::ShiftRight => {
                let evicted = self.registers[x] & 0x01;
                self.registers[x] >>= 1;
                self.registers[register::FLAG] = evicted;
            }
            AluOp::SubReverse => {
                let (difference, borrowed) = self.registers[y].overflowing_sub(self.registers[x]);
                self.registers[x] = difference;
                self.registers[register::FLAG] = (!borrowed) as u8;
            }
            AluOp::ShiftLeft => {
                let evicted = self.registers[x] >> 7;
                self.registers[x] <<= 1;
                self.registers[register::FLAG] = evicted;
            }
        }
    }

    /// XOR-blits the sprite rows at the index register onto the
    /// screen and latches the collision bit into the flag register.
    fn draw(&mut self, x: usize, y: usize, n: usize) -> Result<(), StepError> {
        let span = self.checked_span(n)?;
        let origin = (self.registers[x], self.registers[y]);
        let sprite = &self.memory[span];
        let collision = self.screen.blit(origin.0, origin.1, sprite);
        self.registers[register::FLAG] = collision as u8;
        Ok(())
    }

    /// Writes the three decimal digits of a register value at the
    /// index register.
    fn store_bcd(&mut self, x: usize) -> Result<(), StepError> {
        let span = self.checked_span(3)?;
        let value = self.registers[x];
        let digits = [value / 100, value / 10 % 10, value % 10];
        self.memory[span].copy_from_slice(&digits);
        Ok(())
    }

    /// The key index named by a register, masked to the low nibble
    /// since only sixteen keys exist.
    fn key_of(&self, x: usize) -> usize {
        (self.registers[x] & 0x0F) as usize
    }

    /// The range `[index, index + len)` inside memory, or the
    /// addressing fault naming the access.
    fn checked_span(&self, len: usize) -> Result<Range<usize>, StepError> {
        let addr = self.index as usize;
        let end = addr + len;
        if end > self.memory.len() {
            return Err(StepError::Address {
                pc: self.program_counter,
                addr,
                len,
            });
        }
        Ok(addr..end)
    }
}
