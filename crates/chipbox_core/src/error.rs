use thiserror::Error;

/// Errors raised by the CHIP-8 machine.
///
/// Everything except `UnrecognizedInstruction` is fatal for the running
/// program. Unknown opcodes are reported by the decoder and swallowed by
/// `Cpu::step`, which logs them and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), at most {capacity} bytes fit")]
    RomTooLarge { size: usize, capacity: usize },

    #[error("memory access out of range at address {addr:#06X}")]
    AddressOutOfRange { addr: usize },

    #[error("stack overflow: cannot push return address {addr:#05X}")]
    StackOverflow { addr: u16 },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unrecognized instruction {opcode:#06X}")]
    UnrecognizedInstruction { opcode: u16 },
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
