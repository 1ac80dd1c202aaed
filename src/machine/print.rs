//! Pretty printing of the whole machine state, used by fault dumps
//! and debugging hosts.

use std::fmt;

use num_traits::Unsigned;

use crate::definitions::display;

use super::Machine;

/// How many values a single hex row shows.
const ROW_WIDTH: usize = 8;
/// Stands in for the all zero rows the memory dump folds away.
const FOLDED: &str = "...";

/// Writes one row of hex values prefixed with its starting offset.
fn hex_row<T: fmt::UpperHex + Unsigned + Copy>(
    f: &mut fmt::Formatter<'_>,
    offset: usize,
    width: usize,
    values: &[T],
) -> fmt::Result {
    write!(f, "{offset:#06X} :")?;
    for value in values {
        write!(f, " {:#0w$X}", value, w = width)?;
    }
    writeln!(f)
}

/// Writes memory as opcode wide words, folding runs of zero rows.
fn memory_rows(f: &mut fmt::Formatter<'_>, memory: &[u8]) -> fmt::Result {
    let mut folded = false;
    for (row, bytes) in memory.chunks_exact(2 * ROW_WIDTH).enumerate() {
        if bytes.iter().all(|&byte| byte == 0) {
            if !folded {
                writeln!(f, "{FOLDED}")?;
                folded = true;
            }
            continue;
        }
        folded = false;

        let mut words = [0_u16; ROW_WIDTH];
        for (word, pair) in words.iter_mut().zip(bytes.chunks_exact(2)) {
            *word = u16::from_be_bytes([pair[0], pair[1]]);
        }
        hex_row(f, row * 2 * ROW_WIDTH, 6, &words)?;
    }
    Ok(())
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Machine '{}'", self.name)?;
        writeln!(f, "Program counter : {:#06X}", self.program_counter)?;
        writeln!(f, "Index register  : {:#06X}", self.index)?;
        writeln!(
            f,
            "Delay / sound   : {:#04X} / {:#04X}",
            self.timers.delay(),
            self.timers.sound()
        )?;

        writeln!(f, "Registers :")?;
        for (row, values) in self.registers.chunks_exact(ROW_WIDTH).enumerate() {
            hex_row(f, row * ROW_WIDTH, 4, values)?;
        }

        write!(f, "Stack :")?;
        if self.stack.is_empty() {
            writeln!(f, " (empty)")?;
        } else {
            for address in &self.stack {
                write!(f, " {address:#06X}")?;
            }
            writeln!(f)?;
        }

        write!(f, "Keypad :")?;
        for &key in self.keypad.keys() {
            write!(f, " {}", key as u8)?;
        }
        writeln!(f)?;

        writeln!(f, "Memory :")?;
        memory_rows(f, &self.memory)?;

        writeln!(
            f,
            "Screen : {} of {} pixels lit",
            self.screen.as_slice().iter().filter(|&&p| p).count(),
            display::RESOLUTION
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::resources::Rom;

    use super::{super::Machine, FOLDED};

    #[test]
    fn dumps_the_whole_state() {
        let rom = Rom::new("DUMP", vec![0x00, 0xE0, 0x12, 0x00]).unwrap();
        let machine = Machine::new(&rom);
        let text = machine.to_string();

        assert!(text.contains("Machine 'DUMP'"));
        assert!(text.contains("Program counter : 0x0200"));
        assert!(text.contains("Index register  : 0x0000"));
        assert!(text.contains("Stack : (empty)"));
        // The first glyph table row.
        assert!(text.contains("0x0000 : 0xF090"));
        // The program row.
        assert!(text.contains("0x0200 : 0x00E0 0x1200"));
        // Everything between is folded away.
        assert!(text.contains(FOLDED));
        assert!(text.contains("Screen : 0 of 2048 pixels lit"));
    }

    #[test]
    fn folds_zero_rows_only_once_per_run() {
        let rom = Rom::new("FOLD", vec![0x12, 0x00]).unwrap();
        let machine = Machine::new(&rom);
        let text = machine.to_string();

        // One run between glyphs and program, one after the program.
        let folds = text.lines().filter(|line| *line == FOLDED).count();
        assert_eq!(folds, 2);
    }
}
