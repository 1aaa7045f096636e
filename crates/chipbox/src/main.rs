use clap::Parser;

use chipbox::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let rom_path = match cli.rom.clone() {
        Some(path) => path,
        None => {
            let stdin = std::io::stdin();
            match chipbox::prompt_rom_path(&mut stdin.lock(), &mut std::io::stdout()) {
                Ok(Some(path)) => path,
                Ok(None) => {
                    eprintln!("No ROM selected.\nUsage: chipbox path/to/game.ch8");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("{e:#}");
                    std::process::exit(1);
                }
            }
        }
    };

    log::info!("Playing ROM path: '{}'", rom_path.display());
    let rom = match std::fs::read(&rom_path) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("Failed to read ROM file '{}': {e}", rom_path.display());
            std::process::exit(1);
        }
    };

    if let Err(e) = chipbox::run_chip8(&rom, &cli) {
        log::error!("{e:#}");
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
