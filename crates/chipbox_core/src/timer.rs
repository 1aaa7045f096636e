//! Delay and sound timers.
//!
//! The two timer bytes and the sound gate are the only state shared between
//! the CPU thread and the 60 Hz timer thread. All of it sits behind one
//! mutex inside `Timers`; both sides go through that handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Timer decrement rate.
pub const TIMER_HZ: u32 = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimerRegisters {
    pub delay: u8,
    pub sound: u8,
    /// Mirrors `sound > 0`; kept explicitly so the audio side can poll it.
    pub sound_active: bool,
}

impl TimerRegisters {
    /// One 60 Hz tick. Neither timer goes below zero.
    pub fn tick(&mut self) {
        if self.delay > 0 {
            self.delay -= 1;
        }
        if self.sound > 0 {
            self.sound -= 1;
        }
        self.sound_active = self.sound > 0;
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
        self.sound_active = value > 0;
    }
}

/// Cloneable handle to the shared timer state.
#[derive(Clone, Default)]
pub struct Timers {
    inner: Arc<Mutex<TimerRegisters>>,
}

impl Timers {
    fn lock(&self) -> MutexGuard<'_, TimerRegisters> {
        // A panic on the other side leaves two plain bytes behind; they are
        // still consistent, so keep going with them.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> TimerRegisters {
        *self.lock()
    }

    pub fn delay(&self) -> u8 {
        self.lock().delay
    }

    pub fn set_delay(&self, value: u8) {
        self.lock().delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.lock().sound
    }

    pub fn set_sound(&self, value: u8) {
        self.lock().set_sound(value);
    }

    pub fn sound_active(&self) -> bool {
        self.lock().sound_active
    }

    pub fn tick(&self) {
        self.lock().tick();
    }
}

/// Background thread decrementing `Timers` at a fixed rate, independent of
/// how fast (or whether) instructions execute.
///
/// Ticks are scheduled against absolute deadlines, so a late wake-up is
/// followed by catch-up ticks rather than drift. The thread stops and is
/// joined when the clock is dropped.
pub struct TimerClock {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TimerClock {
    pub fn start(timers: Timers) -> std::io::Result<Self> {
        Self::with_rate(timers, TIMER_HZ)
    }

    pub fn with_rate(timers: Timers, hz: u32) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let period = Duration::from_secs(1) / hz.max(1);
        let flag = Arc::clone(&running);
        let handle = std::thread::Builder::new()
            .name("chip8-timers".to_string())
            .spawn(move || {
                log::debug!("timer thread started ({} Hz)", hz);
                let mut deadline = Instant::now() + period;
                while flag.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now < deadline {
                        std::thread::sleep(deadline - now);
                        continue;
                    }
                    timers.tick();
                    deadline += period;
                }
                log::debug!("timer thread stopped");
            })?;
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("timer thread panicked");
            }
        }
    }
}

impl Drop for TimerClock {
    fn drop(&mut self) {
        self.stop();
    }
}
