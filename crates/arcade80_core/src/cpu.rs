mod alu;
mod exec;
pub mod flags;
mod interrupts;
pub mod io;
pub mod memory;
pub mod regs;
pub mod stack;
pub mod table;


use anyhow::Result;

use crate::config::CpuConfig;

pub use flags::{Condition, Flags};
pub use io::{IoPorts, ShiftRegister};
pub use memory::{Memory, MEMORY_SIZE};
pub use regs::{Register, Registers};
pub use stack::{Stack, StackPolicy};
pub use table::{implemented_opcodes, opcode_entry, AluOp, Instruction, OpcodeEntry, Operand};

/// Cycles charged for a byte the core does not implement.
pub const UNKNOWN_OPCODE_CYCLES: u32 = 1;

/// Intel 8080 CPU core.
///
/// Owns the full 64 KiB address space together with the register file,
/// flags, stack and I/O ports. A host drives it by calling [`Cpu::step`]
/// repeatedly and [`Cpu::raise_interrupt`] at video timing boundaries.
pub struct Cpu {
    regs: Registers,
    flags: Flags,
    stack: Stack,
    memory: Memory,
    io: IoPorts,
    interrupts_enabled: bool,
    config: CpuConfig,
    /// Opcode bytes already reported as unknown, so each one warns once.
    reported_unknown: [bool; 256],
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Create a CPU in reset state with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    pub fn with_config(config: CpuConfig) -> Self {
        Self {
            regs: Registers::default(),
            flags: Flags::empty(),
            stack: Stack::new(config.stack_policy),
            memory: Memory::new(),
            io: IoPorts::default(),
            interrupts_enabled: false,
            config,
            reported_unknown: [false; 256],
        }
    }

    /// Reset registers, flags, stack, ports and interrupt state.
    ///
    /// Memory is preserved so a loaded ROM survives the reset.
    pub fn reset(&mut self) {
        let memory = std::mem::take(&mut self.memory);
        *self = Self::with_config(self.config);
        self.memory = memory;
    }

    /// Copy a ROM image to address 0 and point PC at it.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.memory.load(0x0000, rom)?;
        self.regs.pc = 0x0000;
        log::info!("loaded {} byte image at 0x0000", rom.len());
        Ok(())
    }

    /// Fetch the byte at PC and advance PC.
    ///
    /// At PC = 0xFFFF the fetch would leave the address space, so it returns
    /// 0 and PC stays put.
    pub(crate) fn fetch_byte(&mut self) -> u8 {
        let pc = self.regs.pc;
        if pc as usize + 1 >= MEMORY_SIZE {
            return 0;
        }
        self.regs.pc = pc + 1;
        self.memory.read(pc)
    }

    /// Fetch a little-endian word at PC.
    pub(crate) fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte();
        let hi = self.fetch_byte();
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn push_word(&mut self, value: u16) {
        self.stack.push_word(&mut self.memory, value);
    }

    pub(crate) fn pop_word(&mut self) -> u16 {
        self.stack.pop_word(&self.memory)
    }

    /// Execute a single instruction and return the number of cycles consumed.
    ///
    /// Unknown opcodes are reported through the log and otherwise behave as
    /// a one-cycle no-op; the core never stops on bad input.
    pub fn step(&mut self) -> u32 {
        let pc = self.regs.pc;
        let opcode = self.fetch_byte();

        let Some(entry) = opcode_entry(opcode) else {
            self.report_unknown(opcode, pc);
            return UNKNOWN_OPCODE_CYCLES;
        };

        log::trace!("{pc:04X}: {:02X} {}", opcode, entry.instruction);
        let taken = self.execute(entry.instruction);
        let mut cycles = entry.cycles as u32;
        if taken {
            cycles += entry.taken_extra as u32;
        }
        cycles
    }

    fn report_unknown(&mut self, opcode: u8, pc: u16) {
        let seen = &mut self.reported_unknown[opcode as usize];
        if !*seen {
            *seen = true;
            log::warn!(
                "unimplemented opcode 0x{opcode:02X} at PC=0x{pc:04X} (SP=0x{sp:04X} PSW=0x{psw:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X}), treating as NOP",
                sp = self.stack.pointer(),
                psw = self.read(Register::PSW),
                bc = self.regs.bc(),
                de = self.regs.de(),
                hl = self.regs.hl(),
            );
        } else {
            log::debug!("unimplemented opcode 0x{opcode:02X} at PC=0x{pc:04X}");
        }
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.regs.pc = pc;
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.stack.pointer()
    }

    pub fn regs(&self) -> &Registers {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Writable view of memory, meant for loaders before execution starts.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn io(&self) -> &IoPorts {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IoPorts {
        &mut self.io
    }
}
