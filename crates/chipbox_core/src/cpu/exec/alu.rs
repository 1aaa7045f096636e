use crate::cpu::Cpu;

const VF: usize = 0xF;

impl Cpu {
    /// 8XY1/8XY2/8XY3.
    pub(super) fn alu_logic(&mut self, x: usize, y: usize, op: impl Fn(u8, u8) -> u8) {
        self.v_reg[x] = op(self.v_reg[x], self.v_reg[y]);
        if self.quirks.logic_resets_vf {
            self.v_reg[VF] = 0;
        }
    }

    /// 8XY4: VF is the carry out of bit 7.
    pub(super) fn alu_add(&mut self, x: usize, y: usize) {
        let (val, carry) = self.v_reg[x].overflowing_add(self.v_reg[y]);
        self.v_reg[x] = val;
        // Flag last, so it wins when x is VF.
        self.v_reg[VF] = carry as u8;
    }

    /// 8XY5 / 8XY7: `Vx = a - b`, VF = 1 when there was no borrow (a >= b).
    pub(super) fn alu_sub(&mut self, x: usize, a: u8, b: u8) {
        let (val, borrow) = a.overflowing_sub(b);
        self.v_reg[x] = val;
        self.v_reg[VF] = !borrow as u8;
    }

    fn shift_source(&self, x: usize, y: usize) -> u8 {
        if self.quirks.shift_uses_vy {
            self.v_reg[y]
        } else {
            self.v_reg[x]
        }
    }

    /// 8XY6: VF = bit shifted out of the bottom.
    pub(super) fn alu_shr(&mut self, x: usize, y: usize) {
        let src = self.shift_source(x, y);
        self.v_reg[x] = src >> 1;
        self.v_reg[VF] = src & 0x1;
    }

    /// 8XYE: VF = bit shifted out of the top.
    pub(super) fn alu_shl(&mut self, x: usize, y: usize) {
        let src = self.shift_source(x, y);
        self.v_reg[x] = src << 1;
        self.v_reg[VF] = (src & 0x80) >> 7;
    }
}
