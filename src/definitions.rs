//! The shared constants of the virtual machine.

/// The memory definitions
pub mod memory {
    /// The size of the machine ram
    pub const SIZE: usize = 0x1000; // 4096

    /// The address at which a loaded program starts
    pub const PROGRAM_START: usize = 0x0200;

    /// The amount of ram left over for a program and its data
    pub const PROGRAM_CAPACITY: usize = SIZE - PROGRAM_START; // 3584

    /// opcode information
    pub mod opcodes {
        /// The width of a single opcode, and so the step size
        /// of the program counter
        pub const SIZE: usize = 2;
    }
}

/// The cpu definitions
pub mod cpu {
    /// The amount of hertz the emulation shall run at
    pub const HERTZ: u64 = 500;
    /// The duration of a single cpu cycle in milliseconds
    pub const INTERVAL: u64 = 1000 / HERTZ;

    /// The register definitions
    pub mod register {
        /// The amount of data registers
        pub const COUNT: usize = 16;
        /// The register doubling as the carry / borrow / collision flag
        pub const FLAG: usize = COUNT - 1;
    }

    /// The stack definitions
    pub mod stack {
        /// The count of nesting entries
        pub const DEPTH: usize = 16;
    }
}

/// The timer definitions
pub mod timer {
    /// The amount of hertz the two counters run at
    pub const HERTZ: u64 = 60;
    /// The duration of a single timer tick in milliseconds
    pub const INTERVAL: u64 = 1000 / HERTZ;
}

/// The display definitions
pub mod display {
    /// The amount of pixels per row
    pub const WIDTH: usize = 64;
    /// The amount of rows
    pub const HEIGHT: usize = 32;
    /// The amount of pixels the display has
    pub const RESOLUTION: usize = WIDTH * HEIGHT;

    /// The built in glyph sprites
    pub mod glyphs {
        /// The location of the glyph table in memory
        pub const ADDRESS: usize = 0x0;
        /// The amount of bytes a single glyph occupies
        pub const STRIDE: usize = 5;
        /// The bitmaps of the sixteen hexadecimal digits
        pub const TABLE: [u8; 80] = [
            0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
            0x20, 0x60, 0x20, 0x20, 0x70, // 1
            0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
            0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
            0x90, 0x90, 0xF0, 0x10, 0x10, // 4
            0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
            0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
            0xF0, 0x10, 0x20, 0x40, 0x40, // 7
            0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
            0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
            0xF0, 0x90, 0xF0, 0x90, 0x90, // A
            0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
            0xF0, 0x80, 0x80, 0x80, 0xF0, // C
            0xE0, 0x90, 0x90, 0x90, 0xE0, // D
            0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
            0xF0, 0x80, 0xF0, 0x80, 0x80, // F
        ];
    }
}

/// The keypad definitions
pub mod keypad {
    /// The amount of keys the machine can observe
    pub const COUNT: usize = 16;
}
