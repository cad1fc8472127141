use super::Cpu;

impl Cpu {
    /// Deliver an external interrupt request.
    ///
    /// Behaves like `RST n`: when interrupts are enabled, they are disabled,
    /// the current PC is pushed and execution continues at `n * 8`. Returns
    /// whether the interrupt was accepted; a request while interrupts are
    /// disabled is dropped without touching any state.
    ///
    /// Hosts call this between [`Cpu::step`] calls, so delivery always lands
    /// on an instruction boundary.
    pub fn raise_interrupt(&mut self, vector: u8) -> bool {
        if !self.interrupts_enabled {
            log::trace!("interrupt {vector} ignored, interrupts disabled");
            return false;
        }
        self.interrupts_enabled = false;
        let addr = ((vector & 0x07) as u16) << 3;
        log::trace!(
            "interrupt {vector}: PC 0x{:04X} -> 0x{addr:04X}",
            self.regs.pc
        );
        self.push_word(self.regs.pc);
        self.regs.pc = addr;
        true
    }

    #[inline]
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }
}
