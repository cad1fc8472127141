//! Cycle-counted Intel 8080 core and the arcade board around it.

pub mod config;
pub mod cpu;
pub mod machine;

pub use config::{CpuConfig, DipConfig, MachineConfig};
pub use cpu::Cpu;
pub use machine::{Button, FrameStats, Machine};

/// Video RAM window: one bit per pixel, 32 bytes per column of the
/// unrotated 256x224 raster.
pub const VRAM_START: u16 = 0x2400;
pub const VRAM_SIZE: usize = 0x1c00;
