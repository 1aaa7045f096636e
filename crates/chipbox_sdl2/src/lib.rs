use anyhow::{anyhow, Context, Result};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;
use typed_builder::TypedBuilder;

use chipbox_common::{Color, Frame, Input, InputState, Key, Region, Render};

mod audio;

pub use audio::SdlAudio;
pub use sdl2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGB24,
}

#[derive(TypedBuilder)]
pub struct SdlInitInfo {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub title: String,
    #[builder(default = PixelFormat::RGB24)]
    pub pixel_format: PixelFormat,
    #[builder(default = Color::WHITE)]
    pub foreground: Color,
    #[builder(default = Color::BLACK)]
    pub background: Color,
}

/// Window, keyboard and audio collaborators sharing one SDL context.
pub struct SdlFrontend {
    pub input: SdlInput,
    pub renderer: SdlRenderer,
    pub audio: SdlAudio,
    _sdl_context: sdl2::Sdl,
}

impl SdlFrontend {
    pub fn new(sdl_init_info: SdlInitInfo) -> Result<Self> {
        let SdlInitInfo {
            width,
            height,
            scale,
            title,
            pixel_format,
            foreground,
            background,
        } = sdl_init_info;

        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window = video_subsystem
            .window(&title, width * scale, height * scale)
            .position_centered()
            .build()
            .context("failed to create window")?;
        let canvas = window
            .into_canvas()
            .present_vsync()
            .build()
            .context("failed to create canvas")?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        let audio = SdlAudio::open(&sdl_context);

        log::info!("SDL frontend ready: {}x{} x{}", width, height, scale);
        Ok(Self {
            input: SdlInput { event_pump },
            renderer: SdlRenderer {
                canvas,
                texture_creator,
                width,
                height,
                pixel_format,
                foreground,
                background,
                screen_state: vec![0u8; (width * map_pixel_format_size(pixel_format) * height) as usize],
            },
            audio,
            _sdl_context: sdl_context,
        })
    }
}

pub struct SdlInput {
    event_pump: sdl2::EventPump,
}

impl Input for SdlInput {
    fn poll(&mut self, state: &mut InputState) {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => state.quit = true,
                Event::KeyDown {
                    keycode: Some(Keycode::Space),
                    repeat: false,
                    ..
                } => state.toggle_pause(),
                Event::KeyDown {
                    keycode: Some(Keycode::F1),
                    repeat: false,
                    ..
                } => state.dump_requested = true,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => state.set_key(map_keycode(keycode), true),
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => state.set_key(map_keycode(keycode), false),
                _ => {}
            }
        }
    }
}

/// Scales the framebuffer up through a streaming texture.
///
/// The whole frame is uploaded on every present: with a double-buffered
/// vsync canvas the back buffer contents are undefined, so dirty regions
/// cannot be patched in place.
pub struct SdlRenderer {
    canvas: WindowCanvas,
    texture_creator: TextureCreator<WindowContext>,
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    foreground: Color,
    background: Color,
    screen_state: Vec<u8>,
}

impl Render for SdlRenderer {
    fn present(&mut self, frame: Frame<'_>, regions: &[Region]) -> Result<()> {
        log::trace!("present: {} dirty region(s)", regions.len());
        let color_size = map_pixel_format_size(self.pixel_format) as usize;
        for (i, pixel) in frame.pixels.iter().enumerate() {
            let color = if *pixel {
                self.foreground
            } else {
                self.background
            };
            let (r, g, b) = color.rgb();
            let index = i * color_size;
            self.screen_state[index] = r;
            self.screen_state[index + 1] = g;
            self.screen_state[index + 2] = b;
        }

        let mut texture = self
            .texture_creator
            .create_texture_streaming(
                map_pixel_format(self.pixel_format),
                self.width,
                self.height,
            )
            .context("failed to create texture")?;
        texture
            .update(
                None,
                &self.screen_state,
                self.width as usize * color_size,
            )
            .context("failed to upload frame")?;
        self.canvas.clear();
        self.canvas
            .copy(&texture, None, None)
            .map_err(|e| anyhow!(e))?;
        self.canvas.present();
        Ok(())
    }
}

pub fn map_pixel_format(pixel_format: PixelFormat) -> PixelFormatEnum {
    match pixel_format {
        PixelFormat::RGB24 => PixelFormatEnum::RGB24,
    }
}

pub fn map_pixel_format_size(pixel_format: PixelFormat) -> u32 {
    match pixel_format {
        PixelFormat::RGB24 => 3,
    }
}

pub fn map_keycode(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Num1 | Keycode::Kp1 => Key::Num1,
        Keycode::Num2 | Keycode::Kp2 => Key::Num2,
        Keycode::Num3 | Keycode::Kp3 => Key::Num3,
        Keycode::Num4 | Keycode::Kp4 => Key::Num4,
        Keycode::Q => Key::Q,
        Keycode::W => Key::W,
        Keycode::E => Key::E,
        Keycode::R => Key::R,
        Keycode::A => Key::A,
        Keycode::S => Key::S,
        Keycode::D => Key::D,
        Keycode::F => Key::F,
        Keycode::Z => Key::Z,
        Keycode::X => Key::X,
        Keycode::C => Key::C,
        Keycode::V => Key::V,
        _ => Key::None,
    }
}
