use typed_builder::TypedBuilder;

use crate::cpu::StackPolicy;

/// 8080 clock and frame timing of the arcade board.
pub const CPU_CLOCK_HZ: u32 = 2_000_000;
pub const FRAME_RATE_HZ: u32 = 60;
pub const CYCLES_PER_FRAME: u32 = CPU_CLOCK_HZ / FRAME_RATE_HZ;

/// CPU core options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TypedBuilder)]
pub struct CpuConfig {
    #[builder(default)]
    pub stack_policy: StackPolicy,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Bit positions of the DIP switches on input port 2.
pub(crate) const IN2_MASK_SHIPS_PER_CREDIT: u8 = 0x03;
pub(crate) const IN2_BIT_COIN_INFO: u8 = 7;

/// DIP switch settings read by the game through input port 2.
///
/// - `ships_per_credit`: number of ships per game (3–6), encoded in bits
///   0–1 of port 2 as `value - 3`.
/// - `show_coin_info`: whether the attract mode shows the coin line. The ROM
///   treats bit 7 = 1 as "hide".
#[derive(Clone, Copy, Debug, PartialEq, Eq, TypedBuilder)]
pub struct DipConfig {
    #[builder(default = 3)]
    pub ships_per_credit: u8,
    #[builder(default = true)]
    pub show_coin_info: bool,
}

impl Default for DipConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DipConfig {
    pub(crate) fn apply_to_port2(&self, in_port2: &mut u8) {
        *in_port2 &= !IN2_MASK_SHIPS_PER_CREDIT;
        *in_port2 &= !(1 << IN2_BIT_COIN_INFO);

        let ships = self.ships_per_credit.clamp(3, 6);
        *in_port2 |= (ships - 3) & IN2_MASK_SHIPS_PER_CREDIT;

        if !self.show_coin_info {
            *in_port2 |= 1 << IN2_BIT_COIN_INFO;
        }
    }
}

/// Options for the whole machine: CPU, switches and frame timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TypedBuilder)]
pub struct MachineConfig {
    #[builder(default)]
    pub cpu: CpuConfig,
    #[builder(default)]
    pub dip: DipConfig,
    #[builder(default = CYCLES_PER_FRAME)]
    pub cycles_per_frame: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
