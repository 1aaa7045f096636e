use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use chipbox_core::{Cpu, CycleDriver, DriverConfig, Quirks, Timers, SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};
use chipbox_sdl2::{SdlFrontend, SdlInitInfo};

#[derive(Parser, Debug)]
#[command(version, about = "A CHIP-8 emulator", long_about = None)]
pub struct Cli {
    /// ROM file to run. Prompted for on stdin when omitted.
    pub rom: Option<PathBuf>,

    /// Interpreter behaviour preset: "modern" or "vip".
    #[arg(long, default_value = "modern", value_parser = parse_quirks)]
    pub quirks: Quirks,

    /// Wrap sprites around the screen edges instead of clipping them.
    #[arg(long)]
    pub wrap: bool,

    /// Draw N + 1 sprite rows for DXYN.
    #[arg(long)]
    pub inclusive_height: bool,

    /// Set VF when FX1E pushes I past 0xFFF.
    #[arg(long)]
    pub index_overflow: bool,

    /// Instructions executed per frame.
    #[arg(long, default_value_t = 10)]
    pub ipf: u32,

    /// Seed for CXNN, for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Window scale factor.
    #[arg(long, default_value_t = SCREEN_SCALE)]
    pub scale: u32,
}

impl Cli {
    /// Preset with the individual overrides applied on top.
    pub fn effective_quirks(&self) -> Quirks {
        let mut quirks = self.quirks;
        quirks.wrap_sprites |= self.wrap;
        quirks.inclusive_sprite_height |= self.inclusive_height;
        quirks.index_overflow_sets_vf |= self.index_overflow;
        quirks
    }
}

fn parse_quirks(name: &str) -> Result<Quirks, String> {
    Quirks::preset(name).ok_or_else(|| format!("unknown quirks preset '{name}' (expected modern or vip)"))
}

/// Ask for a ROM path on `input`. `None` when the answer is empty.
pub fn prompt_rom_path(input: &mut impl BufRead, output: &mut impl Write) -> Result<Option<PathBuf>> {
    write!(output, "ROM path: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read ROM path")?;
    let path = line.trim();
    if path.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(path)))
    }
}

pub fn run_chip8(rom_data: &[u8], cli: &Cli) -> Result<()> {
    let quirks = cli.effective_quirks();
    log::info!("Quirks: {:?}", quirks);

    let mut cpu = Cpu::new(quirks, Timers::default());
    if let Some(seed) = cli.seed {
        cpu = cpu.with_seed(seed);
    }
    cpu.load_rom(rom_data).context("failed to load ROM")?;

    let config = DriverConfig::builder()
        .instructions_per_frame(cli.ipf)
        .build();
    let mut driver = CycleDriver::new(cpu, config);

    let init_info = SdlInitInfo::builder()
        .width(SCREEN_WIDTH as u32)
        .height(SCREEN_HEIGHT as u32)
        .scale(cli.scale)
        .title("chipbox CHIP-8".to_string())
        .build();
    let mut frontend = SdlFrontend::new(init_info)?;
    driver.run(&mut frontend.input, &mut frontend.renderer, &mut frontend.audio)
}
