use crate::error::{Chip8Error, Result};
use crate::STACK_SIZE;

/// Fixed-depth return address stack.
#[derive(Default)]
pub struct Stack {
    entries: [u16; STACK_SIZE],
    /// Number of live entries; also the index of the next free slot.
    sp: usize,
}

impl Stack {
    pub fn push(&mut self, addr: u16) -> Result<()> {
        if self.sp == STACK_SIZE {
            return Err(Chip8Error::StackOverflow { addr });
        }
        self.entries[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.entries[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    /// Live entries, oldest first.
    pub fn entries(&self) -> &[u16] {
        &self.entries[..self.sp]
    }
}
