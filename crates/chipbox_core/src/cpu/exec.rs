mod alu;
mod control;
mod io;
mod ld;

use super::Cpu;
use crate::error::Result;
use crate::instruction::Instruction;

impl Cpu {
    /// Execute one decoded instruction. PC already points past it.
    ///
    /// Errors abort the instruction; nothing it would have written to
    /// memory has been written.
    pub(super) fn execute(&mut self, instruction: Instruction) -> Result<()> {
        use Instruction::*;
        match instruction {
            Sys { nnn } => {
                log::debug!("Ignoring SYS {:#05X}", nnn);
            }
            Cls => self.display.clear(),
            Ret => self.exec_ret()?,
            Jump { nnn } => self.pc = nnn,
            Call { nnn } => self.exec_call(nnn)?,
            SkipEqImm { x, nn } => self.skip_if(self.v_reg[x] == nn),
            SkipNeImm { x, nn } => self.skip_if(self.v_reg[x] != nn),
            SkipEqReg { x, y } => self.skip_if(self.v_reg[x] == self.v_reg[y]),
            SkipNeReg { x, y } => self.skip_if(self.v_reg[x] != self.v_reg[y]),
            JumpOffset { nnn } => self.pc = nnn + self.v_reg[0] as u16,

            LoadImm { x, nn } => self.v_reg[x] = nn,
            // No carry flag for the immediate form.
            AddImm { x, nn } => self.v_reg[x] = self.v_reg[x].wrapping_add(nn),
            Move { x, y } => self.v_reg[x] = self.v_reg[y],
            Or { x, y } => self.alu_logic(x, y, |a, b| a | b),
            And { x, y } => self.alu_logic(x, y, |a, b| a & b),
            Xor { x, y } => self.alu_logic(x, y, |a, b| a ^ b),
            Add { x, y } => self.alu_add(x, y),
            Sub { x, y } => self.alu_sub(x, self.v_reg[x], self.v_reg[y]),
            SubReverse { x, y } => self.alu_sub(x, self.v_reg[y], self.v_reg[x]),
            ShiftRight { x, y } => self.alu_shr(x, y),
            ShiftLeft { x, y } => self.alu_shl(x, y),

            LoadIndex { nnn } => self.i_reg = nnn,
            AddIndex { x } => self.exec_add_index(x),
            LoadFont { x } => self.exec_load_font(x),
            StoreBcd { x } => self.exec_store_bcd(x)?,
            StoreRegs { x } => self.exec_store_regs(x)?,
            LoadRegs { x } => self.exec_load_regs(x)?,

            Random { x, nn } => self.exec_random(x, nn),
            Draw { x, y, n } => self.exec_draw(x, y, n)?,
            SkipKeyPressed { x } => self.skip_if(self.is_key_pressed(self.v_reg[x] as usize)),
            SkipKeyReleased { x } => self.skip_if(!self.is_key_pressed(self.v_reg[x] as usize)),
            WaitKey { x } => self.exec_wait_key(x),
            LoadDelay { x } => self.v_reg[x] = self.timers.delay(),
            SetDelay { x } => self.timers.set_delay(self.v_reg[x]),
            SetSound { x } => self.timers.set_sound(self.v_reg[x]),
        }
        Ok(())
    }
}
