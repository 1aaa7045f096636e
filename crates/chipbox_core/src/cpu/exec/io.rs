use rand::Rng;

use crate::cpu::Cpu;
use crate::error::Result;

impl Cpu {
    /// CXNN: uniform random byte masked with NN.
    pub(super) fn exec_random(&mut self, x: usize, nn: u8) {
        let rand: u8 = self.rng.gen();
        self.v_reg[x] = rand & nn;
    }

    /// DXYN: XOR an N-row sprite from memory at I onto the screen at
    /// (Vx, Vy). VF ends up 1 if any lit pixel was turned off, else 0.
    pub(super) fn exec_draw(&mut self, x: usize, y: usize, n: u8) -> Result<()> {
        let height = if self.quirks.inclusive_sprite_height {
            n as usize + 1
        } else {
            n as usize
        };
        let x_coord = self.v_reg[x] as usize;
        let y_coord = self.v_reg[y] as usize;
        let sprite = self.memory.slice(self.i_reg as usize, height)?;
        let collision = self
            .display
            .draw_sprite(x_coord, y_coord, sprite, self.quirks.wrap_sprites);
        self.v_reg[0xF] = collision as u8;
        Ok(())
    }
}
