use crate::cpu::{Cpu, KeyWait};
use crate::error::Result;
use crate::NUM_KEYS;

impl Cpu {
    pub(super) fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc += 2;
        }
    }

    /// 2NNN: the pushed address is the instruction after the call.
    pub(super) fn exec_call(&mut self, nnn: u16) -> Result<()> {
        self.stack.push(self.pc)?;
        self.pc = nnn;
        Ok(())
    }

    pub(super) fn exec_ret(&mut self) -> Result<()> {
        self.pc = self.stack.pop()?;
        Ok(())
    }

    /// FX0A, in two phases.
    ///
    /// First the keypad is scanned; the lowest pressed key is latched into
    /// Vx. Then the instruction keeps re-running until that key is released.
    /// Either phase rewinds PC so the same instruction is fetched again next
    /// step, which stalls the program without blocking the host loop.
    pub(super) fn exec_wait_key(&mut self, x: usize) {
        match self.key_wait {
            KeyWait::Idle => {
                if let Some(key) = (0..NUM_KEYS).find(|k| self.keys[*k]) {
                    log::debug!("FX0A latched key {:X} into V{:X}", key, x);
                    self.v_reg[x] = key as u8;
                    self.key_wait = KeyWait::AwaitingRelease(key);
                }
                self.pc -= 2;
            }
            KeyWait::AwaitingRelease(key) => {
                if self.keys[key] {
                    self.pc -= 2;
                } else {
                    self.key_wait = KeyWait::Idle;
                }
            }
        }
    }
}
