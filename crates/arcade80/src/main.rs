use anyhow::{bail, Context, Result};
use arcade80::{RunInfo, DEFAULT_FRAMES};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(rom_path) = args.next() else {
        bail!("usage: arcade80 <romfile> [frames]");
    };
    let frames = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid frame count '{arg}'"))?,
        None => DEFAULT_FRAMES,
    };

    log::info!("Playing ROM path: '{}'", rom_path);
    let rom = std::fs::read(&rom_path).with_context(|| format!("failed to read {rom_path}"))?;

    let info = RunInfo::builder().frames(frames).build();
    arcade80::run(info, &rom)?;
    Ok(())
}
