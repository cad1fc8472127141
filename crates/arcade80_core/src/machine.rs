use anyhow::Result;

use crate::config::MachineConfig;
use crate::cpu::Cpu;
use crate::{VRAM_SIZE, VRAM_START};

/// Bit positions for input port 1 (IN 1).
const IN1_BIT_COIN: u8 = 0;
const IN1_BIT_P2_START: u8 = 1;
const IN1_BIT_P1_START: u8 = 2;
const IN1_BIT_ALWAYS_ONE: u8 = 3;
const IN1_BIT_P1_SHOOT: u8 = 4;
const IN1_BIT_P1_LEFT: u8 = 5;
const IN1_BIT_P1_RIGHT: u8 = 6;

/// Bit positions for input port 2 (IN 2).
const IN2_BIT_TILT: u8 = 2;
const IN2_BIT_P2_SHOOT: u8 = 4;
const IN2_BIT_P2_LEFT: u8 = 5;
const IN2_BIT_P2_RIGHT: u8 = 6;

/// Cabinet inputs wired to the two input ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Coin,
    P1Start,
    P2Start,
    P1Shoot,
    P1Left,
    P1Right,
    P2Shoot,
    P2Left,
    P2Right,
    Tilt,
}

impl Button {
    /// Input port and bit index the button drives.
    pub fn port_bit(self) -> (u8, u8) {
        match self {
            Button::Coin => (1, IN1_BIT_COIN),
            Button::P2Start => (1, IN1_BIT_P2_START),
            Button::P1Start => (1, IN1_BIT_P1_START),
            Button::P1Shoot => (1, IN1_BIT_P1_SHOOT),
            Button::P1Left => (1, IN1_BIT_P1_LEFT),
            Button::P1Right => (1, IN1_BIT_P1_RIGHT),
            Button::Tilt => (2, IN2_BIT_TILT),
            Button::P2Shoot => (2, IN2_BIT_P2_SHOOT),
            Button::P2Left => (2, IN2_BIT_P2_LEFT),
            Button::P2Right => (2, IN2_BIT_P2_RIGHT),
        }
    }
}

/// Cycle and instruction counts for one emulated frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub cycles: u64,
    pub instructions: u64,
    /// Interrupts accepted by the CPU (0–2).
    pub interrupts: u8,
}

/// Arcade board: the 8080 core plus the host-side frame schedule.
///
/// Each frame runs half a frame of cycles, raises interrupt 1 (mid-screen),
/// runs the second half, then raises interrupt 2 (vertical blank).
pub struct Machine {
    cpu: Cpu,
    config: MachineConfig,
    frames: u64,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Construct a new machine instance in a powered-up but reset state.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        let mut machine = Self {
            cpu: Cpu::with_config(config.cpu),
            config,
            frames: 0,
        };
        machine.reset_inputs();
        machine
    }

    /// Reset the machine, preserving ROM contents.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.frames = 0;
        self.reset_inputs();
        log::info!("machine reset");
    }

    fn reset_inputs(&mut self) {
        let io = self.cpu.io_mut();
        io.in1 = 1 << IN1_BIT_ALWAYS_ONE;
        io.in2 = 0;
        self.config.dip.apply_to_port2(&mut io.in2);
    }

    /// Load a combined ROM image at 0x0000.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.cpu.load_rom(rom)
    }

    /// Run one video frame worth of cycles.
    pub fn step_frame(&mut self) -> FrameStats {
        let half_frame = self.config.cycles_per_frame / 2;
        let mut stats = FrameStats::default();

        self.run_cycles(half_frame, &mut stats);
        if self.cpu.raise_interrupt(1) {
            stats.interrupts += 1;
        }

        self.run_cycles(self.config.cycles_per_frame - half_frame, &mut stats);
        if self.cpu.raise_interrupt(2) {
            stats.interrupts += 1;
        }

        self.frames += 1;
        stats
    }

    fn run_cycles(&mut self, budget: u32, stats: &mut FrameStats) {
        let mut cycles: u32 = 0;
        while cycles < budget {
            let c = self.cpu.step();
            cycles = cycles.saturating_add(c);
            stats.instructions += 1;
        }
        stats.cycles += cycles as u64;
    }

    /// Press or release a cabinet button.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        let (port, bit) = button.port_bit();
        let io = self.cpu.io_mut();
        let register = if port == 1 { &mut io.in1 } else { &mut io.in2 };
        set_input_bit(register, bit, pressed);
    }

    /// Raw video RAM: 0x1C00 bytes at 0x2400, one bit per pixel, each byte
    /// holding 8 vertically stacked pixels.
    pub fn video_ram(&self) -> &[u8] {
        self.cpu.memory().region(VRAM_START, VRAM_SIZE)
    }

    /// Values last written to the sound ports (OUT 3 and OUT 5).
    pub fn sound_outputs(&self) -> (u8, u8) {
        let io = self.cpu.io();
        (io.last_output(3), io.last_output(5))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }
}

fn set_input_bit(port: &mut u8, bit: u8, pressed: bool) {
    let mask = 1 << bit;
    if pressed {
        *port |= mask;
    } else {
        *port &= !mask;
    }
}
