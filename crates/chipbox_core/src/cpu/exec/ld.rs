use crate::cpu::Cpu;
use crate::error::Result;
use crate::{FONT_ADDRESS, FONT_GLYPH_SIZE, RAM_SIZE};

impl Cpu {
    /// FX1E. With `index_overflow_sets_vf`, VF reports whether I left the
    /// 12-bit address space.
    pub(super) fn exec_add_index(&mut self, x: usize) {
        self.i_reg = self.i_reg.wrapping_add(self.v_reg[x] as u16);
        if self.quirks.index_overflow_sets_vf {
            self.v_reg[0xF] = (self.i_reg as usize >= RAM_SIZE) as u8;
        }
    }

    /// FX29: I = address of the glyph for the low nibble of Vx.
    pub(super) fn exec_load_font(&mut self, x: usize) {
        let digit = (self.v_reg[x] & 0x0F) as u16;
        self.i_reg = FONT_ADDRESS + digit * FONT_GLYPH_SIZE as u16;
    }

    /// FX33: hundreds, tens and ones of Vx at I, I+1, I+2.
    pub(super) fn exec_store_bcd(&mut self, x: usize) -> Result<()> {
        let val = self.v_reg[x];
        let dst = self.memory.slice_mut(self.i_reg as usize, 3)?;
        dst[0] = val / 100;
        dst[1] = (val / 10) % 10;
        dst[2] = val % 10;
        Ok(())
    }

    /// FX55: store V0..=Vx starting at I.
    pub(super) fn exec_store_regs(&mut self, x: usize) -> Result<()> {
        let count = x + 1;
        let dst = self.memory.slice_mut(self.i_reg as usize, count)?;
        dst.copy_from_slice(&self.v_reg[..count]);
        self.advance_index_after_transfer(count);
        Ok(())
    }

    /// FX65: load V0..=Vx from memory starting at I.
    pub(super) fn exec_load_regs(&mut self, x: usize) -> Result<()> {
        let count = x + 1;
        let src = self.memory.slice(self.i_reg as usize, count)?;
        self.v_reg[..count].copy_from_slice(src);
        self.advance_index_after_transfer(count);
        Ok(())
    }

    fn advance_index_after_transfer(&mut self, count: usize) {
        if self.quirks.load_store_increments_index {
            self.i_reg = self.i_reg.wrapping_add(count as u16);
        }
    }
}
