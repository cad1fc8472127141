use anyhow::Result;
use arcade80_core::{FrameStats, Machine, MachineConfig};
use typed_builder::TypedBuilder;

pub const DEFAULT_FRAMES: u64 = 60;

/// Options for a headless run.
#[derive(Clone, Debug, TypedBuilder)]
pub struct RunInfo {
    #[builder(default = DEFAULT_FRAMES)]
    pub frames: u64,
    #[builder(default)]
    pub machine: MachineConfig,
}

/// Totals gathered over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub cycles: u64,
    pub instructions: u64,
    pub interrupts: u64,
    pub lit_pixels: usize,
}

impl RunSummary {
    fn add_frame(&mut self, stats: FrameStats) {
        self.frames += 1;
        self.cycles += stats.cycles;
        self.instructions += stats.instructions;
        self.interrupts += stats.interrupts as u64;
    }
}

/// Run `rom` for the requested number of frames without a display.
pub fn run(info: RunInfo, rom: &[u8]) -> Result<RunSummary> {
    let mut machine = Machine::with_config(info.machine);
    machine.load_rom(rom)?;

    let mut summary = RunSummary::default();
    for frame in 0..info.frames {
        let stats = machine.step_frame();
        log::debug!(
            "frame {frame}: {} cycles, {} instructions, {} interrupts",
            stats.cycles,
            stats.instructions,
            stats.interrupts
        );
        summary.add_frame(stats);
    }
    summary.lit_pixels = lit_pixels(machine.video_ram());

    log::info!(
        "ran {} frames: {} cycles, {} instructions, {} interrupts, PC=0x{:04X} SP=0x{:04X}",
        summary.frames,
        summary.cycles,
        summary.instructions,
        summary.interrupts,
        machine.cpu().pc(),
        machine.cpu().sp()
    );
    log::info!("{} lit pixels in video RAM", summary.lit_pixels);
    Ok(summary)
}

/// Number of set bits in a 1bpp frame buffer.
pub fn lit_pixels(vram: &[u8]) -> usize {
    vram.iter().map(|byte| byte.count_ones() as usize).sum()
}
