use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::display::Display;
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::quirks::Quirks;
use crate::stack::Stack;
use crate::timer::Timers;
use crate::{NUM_KEYS, NUM_REGS, START_ADDRESS};

mod exec;

#[cfg(test)]
mod tests;

/// What a single `Cpu::step` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed(Instruction),
    /// FX0A is holding the machine; PC was rewound to re-run it next step.
    WaitingForKey,
    /// The word at PC decoded to nothing. Machine state is untouched apart
    /// from PC having moved past it.
    Unrecognized(u16),
}

/// Progress of an FX0A key wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyWait {
    Idle,
    /// A key was latched into the target register; waiting for it to go up.
    AwaitingRelease(usize),
}

/// The CHIP-8 execution engine and all state it owns.
///
/// Everything here belongs to the thread driving `step`. The only state
/// shared with another thread is the timer pair, reached through `timers`.
pub struct Cpu {
    /// program counter
    pc: u16,
    /// index register
    i_reg: u16,
    /// V0..VF
    v_reg: [u8; NUM_REGS],
    memory: Memory,
    stack: Stack,
    display: Display,
    keys: [bool; NUM_KEYS],
    timers: Timers,
    quirks: Quirks,
    rng: StdRng,
    key_wait: KeyWait,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(Quirks::default(), Timers::default())
    }
}

impl Cpu {
    pub fn new(quirks: Quirks, timers: Timers) -> Self {
        Self {
            pc: START_ADDRESS,
            i_reg: 0,
            v_reg: [0; NUM_REGS],
            memory: Memory::new(),
            stack: Stack::default(),
            display: Display::default(),
            keys: [false; NUM_KEYS],
            timers,
            quirks,
            rng: StdRng::from_entropy(),
            key_wait: KeyWait::Idle,
        }
    }

    /// Replace the random source with a deterministic one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.memory.load(rom, START_ADDRESS)?;
        log::info!("Loaded {} byte ROM at {:#05X}", rom.len(), START_ADDRESS);
        Ok(())
    }

    /// Fetch, decode and execute one instruction.
    ///
    /// Unknown opcodes are logged and skipped. Any other error leaves the
    /// machine stopped at the faulting instruction's successor and should be
    /// treated as fatal by the caller.
    pub fn step(&mut self) -> Result<Step> {
        let pc = self.pc;
        let opcode = self.fetch_opcode()?;
        let instruction = match Instruction::decode(opcode) {
            Ok(instruction) => instruction,
            Err(Chip8Error::UnrecognizedInstruction { opcode }) => {
                log::warn!("Unrecognized opcode {:04X} at {:#05X}", opcode, pc);
                return Ok(Step::Unrecognized(opcode));
            }
            Err(e) => return Err(e),
        };
        log::trace!("{:03X}: {:04X}  {}", pc, opcode, instruction);

        self.execute(instruction)?;

        if matches!(instruction, Instruction::WaitKey { .. }) && self.pc == pc {
            Ok(Step::WaitingForKey)
        } else {
            Ok(Step::Executed(instruction))
        }
    }

    fn fetch_opcode(&mut self) -> Result<u16> {
        let opcode = self.memory.read_word(self.pc as usize)?;
        self.pc += 2;
        Ok(opcode)
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.i_reg
    }

    pub fn v(&self, idx: usize) -> u8 {
        self.v_reg[idx]
    }

    pub fn registers(&self) -> &[u8; NUM_REGS] {
        &self.v_reg
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display {
        &mut self.display
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn set_key(&mut self, idx: usize, pressed: bool) {
        if let Some(key) = self.keys.get_mut(idx) {
            *key = pressed;
        } else {
            log::warn!("Ignoring invalid key index {}", idx);
        }
    }

    pub fn set_keys(&mut self, keys: &[bool; NUM_KEYS]) {
        self.keys = *keys;
    }

    pub fn is_key_pressed(&self, key: usize) -> bool {
        self.keys[key & 0xF]
    }

    /// Whether an FX0A wait is in progress.
    pub fn is_waiting_for_key(&self) -> bool {
        matches!(self.key_wait, KeyWait::AwaitingRelease(_))
    }

    /// Human-readable snapshot of registers, stack, timers and keypad.
    pub fn dump(&self) -> StateDump<'_> {
        StateDump(self)
    }
}

pub struct StateDump<'a>(&'a Cpu);

impl fmt::Display for StateDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cpu = self.0;
        write!(f, "PC: {:#05X}  I: {:#05X}", cpu.pc, cpu.i_reg)?;
        match cpu
            .memory
            .read_word(cpu.pc as usize)
            .map(|op| (op, Instruction::decode(op)))
        {
            Ok((op, Ok(ins))) => writeln!(f, "  next: {:04X} {}", op, ins)?,
            Ok((op, Err(_))) => writeln!(f, "  next: {:04X} ???", op)?,
            Err(_) => writeln!(f)?,
        }
        for (i, v) in cpu.v_reg.iter().enumerate() {
            write!(f, "V{:X}: {:#04X}", i, v)?;
            if i % 4 == 3 {
                writeln!(f)?;
            } else {
                write!(f, " ")?;
            }
        }
        writeln!(f, "Stack ({}/{}):", cpu.stack.depth(), crate::STACK_SIZE)?;
        for (i, addr) in cpu.stack.entries().iter().enumerate() {
            writeln!(f, "  {:2}: {:#05X}", i, addr)?;
        }
        let timers = cpu.timers.snapshot();
        writeln!(f, "DT: {}  ST: {}", timers.delay, timers.sound)?;
        write!(f, "Keys:")?;
        for (i, pressed) in cpu.keys.iter().enumerate() {
            if *pressed {
                write!(f, " {:X}", i)?;
            }
        }
        Ok(())
    }
}
