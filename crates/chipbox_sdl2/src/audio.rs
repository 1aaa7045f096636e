use std::f32::consts::TAU;

use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use chipbox_common::Audio;

const SAMPLE_RATE: i32 = 44_100;
const FREQUENCY: f32 = 440.0;
const AMPLITUDE: f32 = 0.25;

/// Sine tone generator run on SDL's audio thread.
struct SineWave {
    /// Phase advance per sample, in cycles.
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SineWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.volume * (TAU * self.phase).sin();
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// Beeper driven by the sound gate. Stays silent if no output device could
/// be opened.
pub struct SdlAudio {
    device: Option<AudioDevice<SineWave>>,
    playing: bool,
}

impl SdlAudio {
    pub(crate) fn open(sdl_context: &sdl2::Sdl) -> Self {
        let device = sdl_context.audio().and_then(|subsystem| {
            let desired = AudioSpecDesired {
                freq: Some(SAMPLE_RATE),
                channels: Some(1),
                samples: None,
            };
            subsystem.open_playback(None, &desired, |spec| SineWave {
                phase_inc: FREQUENCY / spec.freq as f32,
                phase: 0.0,
                volume: AMPLITUDE,
            })
        });
        match device {
            Ok(device) => Self {
                device: Some(device),
                playing: false,
            },
            Err(e) => {
                log::warn!("Failed to open audio device, sound disabled: {e}");
                Self {
                    device: None,
                    playing: false,
                }
            }
        }
    }
}

impl Audio for SdlAudio {
    fn set_tone(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        self.playing = active;
        if let Some(device) = &self.device {
            if active {
                device.resume();
            } else {
                device.pause();
            }
        }
    }
}
