use std::fmt;

use crate::error::{Chip8Error, Result};

/// One decoded CHIP-8 instruction.
///
/// `x`/`y` are register indices (nibbles 2 and 3), `n` the low nibble,
/// `nn` the low byte and `nnn` the low 12 bits of the instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN - call a native routine; ignored by interpreters.
    Sys { nnn: u16 },
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipEqImm { x: usize, nn: u8 },
    /// 4XNN
    SkipNeImm { x: usize, nn: u8 },
    /// 5XY0
    SkipEqReg { x: usize, y: usize },
    /// 6XNN
    LoadImm { x: usize, nn: u8 },
    /// 7XNN
    AddImm { x: usize, nn: u8 },
    /// 8XY0
    Move { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4
    Add { x: usize, y: usize },
    /// 8XY5
    Sub { x: usize, y: usize },
    /// 8XY6
    ShiftRight { x: usize, y: usize },
    /// 8XY7
    SubReverse { x: usize, y: usize },
    /// 8XYE
    ShiftLeft { x: usize, y: usize },
    /// 9XY0
    SkipNeReg { x: usize, y: usize },
    /// ANNN
    LoadIndex { nnn: u16 },
    /// BNNN
    JumpOffset { nnn: u16 },
    /// CXNN
    Random { x: usize, nn: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E
    SkipKeyPressed { x: usize },
    /// EXA1
    SkipKeyReleased { x: usize },
    /// FX07
    LoadDelay { x: usize },
    /// FX0A
    WaitKey { x: usize },
    /// FX15
    SetDelay { x: usize },
    /// FX18
    SetSound { x: usize },
    /// FX1E
    AddIndex { x: usize },
    /// FX29
    LoadFont { x: usize },
    /// FX33
    StoreBcd { x: usize },
    /// FX55
    StoreRegs { x: usize },
    /// FX65
    LoadRegs { x: usize },
}

impl Instruction {
    /// Decode a big-endian instruction word.
    pub fn decode(op: u16) -> Result<Self> {
        let digit1 = (op & 0xF000) >> 12;
        let x = ((op & 0x0F00) >> 8) as usize;
        let y = ((op & 0x00F0) >> 4) as usize;
        let n = (op & 0x000F) as u8;
        let nn = (op & 0x00FF) as u8;
        let nnn = op & 0x0FFF;

        let instruction = match (digit1, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Cls,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Ret,
            (0x0, _, _, _) => Instruction::Sys { nnn },
            (0x1, _, _, _) => Instruction::Jump { nnn },
            (0x2, _, _, _) => Instruction::Call { nnn },
            (0x3, _, _, _) => Instruction::SkipEqImm { x, nn },
            (0x4, _, _, _) => Instruction::SkipNeImm { x, nn },
            (0x5, _, _, 0x0) => Instruction::SkipEqReg { x, y },
            (0x6, _, _, _) => Instruction::LoadImm { x, nn },
            (0x7, _, _, _) => Instruction::AddImm { x, nn },
            (0x8, _, _, 0x0) => Instruction::Move { x, y },
            (0x8, _, _, 0x1) => Instruction::Or { x, y },
            (0x8, _, _, 0x2) => Instruction::And { x, y },
            (0x8, _, _, 0x3) => Instruction::Xor { x, y },
            (0x8, _, _, 0x4) => Instruction::Add { x, y },
            (0x8, _, _, 0x5) => Instruction::Sub { x, y },
            (0x8, _, _, 0x6) => Instruction::ShiftRight { x, y },
            (0x8, _, _, 0x7) => Instruction::SubReverse { x, y },
            (0x8, _, _, 0xE) => Instruction::ShiftLeft { x, y },
            (0x9, _, _, 0x0) => Instruction::SkipNeReg { x, y },
            (0xA, _, _, _) => Instruction::LoadIndex { nnn },
            (0xB, _, _, _) => Instruction::JumpOffset { nnn },
            (0xC, _, _, _) => Instruction::Random { x, nn },
            (0xD, _, _, _) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipKeyPressed { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipKeyReleased { x },
            (0xF, _, 0x0, 0x7) => Instruction::LoadDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Instruction::LoadFont { x },
            (0xF, _, 0x3, 0x3) => Instruction::StoreBcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::StoreRegs { x },
            (0xF, _, 0x6, 0x5) => Instruction::LoadRegs { x },
            _ => return Err(Chip8Error::UnrecognizedInstruction { opcode: op }),
        };
        Ok(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys { nnn } => write!(f, "SYS {nnn:#05X}"),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump { nnn } => write!(f, "JP {nnn:#05X}"),
            Call { nnn } => write!(f, "CALL {nnn:#05X}"),
            SkipEqImm { x, nn } => write!(f, "SE V{x:X}, {nn:#04X}"),
            SkipNeImm { x, nn } => write!(f, "SNE V{x:X}, {nn:#04X}"),
            SkipEqReg { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            LoadImm { x, nn } => write!(f, "LD V{x:X}, {nn:#04X}"),
            AddImm { x, nn } => write!(f, "ADD V{x:X}, {nn:#04X}"),
            Move { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            Add { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Sub { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            ShiftRight { x, y } => write!(f, "SHR V{x:X}, V{y:X}"),
            SubReverse { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            ShiftLeft { x, y } => write!(f, "SHL V{x:X}, V{y:X}"),
            SkipNeReg { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            LoadIndex { nnn } => write!(f, "LD I, {nnn:#05X}"),
            JumpOffset { nnn } => write!(f, "JP V0, {nnn:#05X}"),
            Random { x, nn } => write!(f, "RND V{x:X}, {nn:#04X}"),
            Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            SkipKeyPressed { x } => write!(f, "SKP V{x:X}"),
            SkipKeyReleased { x } => write!(f, "SKNP V{x:X}"),
            LoadDelay { x } => write!(f, "LD V{x:X}, DT"),
            WaitKey { x } => write!(f, "LD V{x:X}, K"),
            SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            SetSound { x } => write!(f, "LD ST, V{x:X}"),
            AddIndex { x } => write!(f, "ADD I, V{x:X}"),
            LoadFont { x } => write!(f, "LD F, V{x:X}"),
            StoreBcd { x } => write!(f, "LD B, V{x:X}"),
            StoreRegs { x } => write!(f, "LD [I], V{x:X}"),
            LoadRegs { x } => write!(f, "LD V{x:X}, [I]"),
        }
    }
}
