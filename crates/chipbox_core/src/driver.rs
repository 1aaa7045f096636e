use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chipbox_common::{Audio, Input, InputState, Render};
use typed_builder::TypedBuilder;

use crate::cpu::{Cpu, Step};
use crate::timer::TimerClock;

#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct DriverConfig {
    /// CPU instructions executed per displayed frame.
    #[builder(default = 10)]
    pub instructions_per_frame: u32,
    /// Target frames per second.
    #[builder(default = 60)]
    pub frame_rate: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Frame-paced main loop.
///
/// Each frame polls the input collaborator, runs a fixed instruction budget
/// on the CPU, presents the display if it changed and forwards the sound
/// gate to the audio collaborator. Timers are not ticked here; `run` keeps a
/// `TimerClock` alive on its own thread for as long as the loop runs.
pub struct CycleDriver {
    cpu: Cpu,
    config: DriverConfig,
    input: InputState,
    tone: bool,
    frames: u64,
}

impl CycleDriver {
    pub fn new(cpu: Cpu, config: DriverConfig) -> Self {
        Self {
            cpu,
            config,
            input: InputState::default(),
            tone: false,
            frames: 0,
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run until the input collaborator asks to quit or the CPU faults.
    pub fn run(
        &mut self,
        input: &mut impl Input,
        render: &mut impl Render,
        audio: &mut impl Audio,
    ) -> Result<()> {
        let _clock =
            TimerClock::start(self.cpu.timers().clone()).context("failed to start timer thread")?;
        let frame_time = Duration::from_secs(1) / self.config.frame_rate.max(1);
        log::info!(
            "Running at {} fps, {} instructions per frame",
            self.config.frame_rate,
            self.config.instructions_per_frame
        );

        loop {
            let start = Instant::now();
            if !self.run_frame(input, render, audio)? {
                break;
            }
            let elapsed = start.elapsed();
            if elapsed < frame_time {
                std::thread::sleep(frame_time - elapsed);
            }
        }

        audio.set_tone(false);
        log::info!("Stopped after {} frames", self.frames);
        Ok(())
    }

    /// Advance one frame. Returns `false` once the host asked to quit.
    pub fn run_frame(
        &mut self,
        input: &mut impl Input,
        render: &mut impl Render,
        audio: &mut impl Audio,
    ) -> Result<bool> {
        let was_paused = self.input.paused;
        input.poll(&mut self.input);
        if self.input.quit {
            log::info!("Quit requested");
            return Ok(false);
        }
        self.cpu.set_keys(&self.input.keys);

        if std::mem::take(&mut self.input.dump_requested)
            || (self.input.paused && !was_paused)
        {
            log::info!("Machine state:\n{}", self.cpu.dump());
        }

        if !self.input.paused {
            for _ in 0..self.config.instructions_per_frame {
                let pc = self.cpu.pc();
                let step = self
                    .cpu
                    .step()
                    .with_context(|| format!("CPU fault at {:#05X}", pc))?;
                // Nothing else can happen until the host delivers a key.
                if step == Step::WaitingForKey {
                    break;
                }
            }
        }

        if self.cpu.display().has_changes() {
            let regions = self.cpu.display_mut().take_changes();
            render
                .present(self.cpu.display().frame(), &regions)
                .context("failed to present frame")?;
        }

        let tone = self.cpu.timers().sound_active();
        if tone != self.tone {
            audio.set_tone(tone);
            self.tone = tone;
        }

        self.frames += 1;
        Ok(true)
    }
}
