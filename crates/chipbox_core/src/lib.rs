pub mod cpu;
pub mod display;
pub mod driver;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod quirks;
pub mod stack;
pub mod timer;

pub use cpu::{Cpu, Step};
pub use display::Display;
pub use driver::{CycleDriver, DriverConfig};
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use memory::Memory;
pub use quirks::Quirks;
pub use timer::{TimerClock, TimerRegisters, Timers};

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: usize = 64;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 32;
/// Default integer scaling factor for the SDL frontend.
pub const SCREEN_SCALE: u32 = 10;

pub const RAM_SIZE: usize = 4096;
pub const NUM_REGS: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const NUM_KEYS: usize = chipbox_common::KEYPAD_SIZE;
/// Programs are loaded and start executing here.
pub const START_ADDRESS: u16 = 0x200;
/// Where the hex-digit font lives in memory.
pub const FONT_ADDRESS: u16 = 0x50;
/// Bytes per font glyph.
pub const FONT_GLYPH_SIZE: usize = 5;
pub const FONTSET_SIZE: usize = 80;

pub const FONTSET: [u8; FONTSET_SIZE] = [
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
