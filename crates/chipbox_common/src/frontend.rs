//! Collaborator contracts between the emulator core and a host frontend.
//!
//! The core never touches windows, keyboards or audio devices. A frontend
//! implements these three traits and hands them to the cycle driver, which
//! calls them once per frame.

use anyhow::Result;

use crate::key::Key;
use crate::KEYPAD_SIZE;

/// Host input as seen by the cycle driver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Pressed state of CHIP-8 keys 0x0..=0xF.
    pub keys: [bool; KEYPAD_SIZE],
    /// Execution is suspended while set. Rendering and polling continue.
    pub paused: bool,
    /// The host asked the machine to stop.
    pub quit: bool,
    /// One-shot request for a machine state dump; the driver clears it.
    pub dump_requested: bool,
}

impl InputState {
    /// Apply a physical key transition. Keys outside the keypad are ignored.
    pub fn set_key(&mut self, key: Key, is_down: bool) {
        if let Some(idx) = key.keypad_index() {
            log::debug!("key {:?} -> 0x{:X} pressed={}", key, idx, is_down);
            self.keys[idx] = is_down;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!(
            "{}",
            if self.paused {
                "Emulator paused"
            } else {
                "Emulator resumed"
            }
        );
    }
}

/// Rectangle of the framebuffer that changed since the last present.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Borrowed view of a monochrome framebuffer, row-major.
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    pub pixels: &'a [bool],
    pub width: usize,
    pub height: usize,
}

impl Frame<'_> {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x]
    }
}

pub trait Input {
    /// Drain pending host events into `state`.
    fn poll(&mut self, state: &mut InputState);
}

pub trait Render {
    /// Present the framebuffer. `regions` lists what changed since the
    /// previous call; implementations may ignore it and redraw everything.
    fn present(&mut self, frame: Frame<'_>, regions: &[Region]) -> Result<()>;
}

pub trait Audio {
    /// Open or close the tone gate.
    fn set_tone(&mut self, active: bool);
}
