use super::flags::Flags;
use super::Cpu;

/// General registers and the program counter.
///
/// The stack pointer lives in [`Stack`](super::stack::Stack) and the flags in
/// [`Flags`]; both are reachable through [`Cpu::read`] / [`Cpu::write`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }
}

/// Operand names accepted by [`Cpu::read`] and [`Cpu::write`].
///
/// `M` is the byte in memory at `HL`, which lets every register-operand
/// instruction treat memory like any other register. `PSW` is `A` in the
/// high byte and the flags byte in the low byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
    M,
    BC,
    DE,
    HL,
    SP,
    PSW,
    PC,
}

impl Register {
    /// Decode the 3-bit register field used by MOV/ALU/INR/DCR/MVI.
    pub fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => Register::B,
            1 => Register::C,
            2 => Register::D,
            3 => Register::E,
            4 => Register::H,
            5 => Register::L,
            6 => Register::M,
            _ => Register::A,
        }
    }

    /// Decode the 2-bit pair field used by LXI/INX/DCX/DAD (`11` = SP).
    pub fn pair_from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Register::BC,
            1 => Register::DE,
            2 => Register::HL,
            _ => Register::SP,
        }
    }

    /// Decode the 2-bit pair field used by PUSH/POP (`11` = PSW).
    pub fn stack_pair_from_index(index: u8) -> Self {
        match index & 0x03 {
            3 => Register::PSW,
            other => Register::pair_from_index(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::B => "B",
            Register::C => "C",
            Register::D => "D",
            Register::E => "E",
            Register::H => "H",
            Register::L => "L",
            Register::M => "M",
            Register::BC => "B",
            Register::DE => "D",
            Register::HL => "H",
            Register::SP => "SP",
            Register::PSW => "PSW",
            Register::PC => "PC",
        }
    }
}

impl Cpu {
    /// Read a register, pair view or the byte at `HL`.
    pub fn read(&self, reg: Register) -> u16 {
        match reg {
            Register::A => self.regs.a as u16,
            Register::B => self.regs.b as u16,
            Register::C => self.regs.c as u16,
            Register::D => self.regs.d as u16,
            Register::E => self.regs.e as u16,
            Register::H => self.regs.h as u16,
            Register::L => self.regs.l as u16,
            Register::M => self.memory.read(self.regs.hl()) as u16,
            Register::BC => self.regs.bc(),
            Register::DE => self.regs.de(),
            Register::HL => self.regs.hl(),
            Register::SP => self.stack.pointer(),
            Register::PSW => u16::from_be_bytes([self.regs.a, self.flags.to_u8()]),
            Register::PC => self.regs.pc,
        }
    }

    /// Write a register. 8-bit targets keep the low byte of `value`; pairs are
    /// split high/low into their two halves.
    pub fn write(&mut self, reg: Register, value: u16) {
        let byte = value as u8;
        match reg {
            Register::A => self.regs.a = byte,
            Register::B => self.regs.b = byte,
            Register::C => self.regs.c = byte,
            Register::D => self.regs.d = byte,
            Register::E => self.regs.e = byte,
            Register::H => self.regs.h = byte,
            Register::L => self.regs.l = byte,
            Register::M => {
                let addr = self.regs.hl();
                self.memory.write(addr, byte);
            }
            Register::BC => self.regs.set_bc(value),
            Register::DE => self.regs.set_de(value),
            Register::HL => self.regs.set_hl(value),
            Register::SP => self.stack.set_pointer(value),
            Register::PSW => {
                let [a, f] = value.to_be_bytes();
                self.regs.a = a;
                self.flags = Flags::from_u8(f);
            }
            Register::PC => self.regs.pc = value,
        }
    }

    #[inline]
    pub(super) fn read8(&self, reg: Register) -> u8 {
        self.read(reg) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_big_endian_views() {
        let mut regs = Registers::default();
        regs.set_bc(0x1234);
        assert_eq!((regs.b, regs.c), (0x12, 0x34));
        regs.set_de(0xabcd);
        assert_eq!((regs.d, regs.e), (0xab, 0xcd));
        regs.h = 0x20;
        regs.l = 0x01;
        assert_eq!(regs.hl(), 0x2001);
    }

    #[test]
    fn register_fields_decode() {
        assert_eq!(Register::from_index(0), Register::B);
        assert_eq!(Register::from_index(6), Register::M);
        assert_eq!(Register::from_index(7), Register::A);
        assert_eq!(Register::pair_from_index(3), Register::SP);
        assert_eq!(Register::stack_pair_from_index(3), Register::PSW);
        assert_eq!(Register::stack_pair_from_index(1), Register::DE);
    }

    #[test]
    fn m_reads_and_writes_through_hl() {
        let mut cpu = Cpu::new();
        cpu.write(Register::HL, 0x2400);
        cpu.write(Register::M, 0x1ff);
        assert_eq!(cpu.memory()[0x2400], 0xff);
        assert_eq!(cpu.read(Register::M), 0xff);
    }

    #[test]
    fn psw_combines_accumulator_and_flags() {
        let mut cpu = Cpu::new();
        cpu.write(Register::PSW, 0x42c5);
        assert_eq!(cpu.read(Register::A), 0x42);
        assert!(cpu.flags().carry());
        assert!(cpu.flags().aux_carry());
        assert!(cpu.flags().sign());
        assert!(cpu.flags().zero());
        assert_eq!(cpu.read(Register::PSW), 0x42c5);
    }

    #[test]
    fn writing_sp_goes_through_the_stack() {
        let mut cpu = Cpu::new();
        cpu.write(Register::SP, 0x2400);
        assert_eq!(cpu.sp(), 0x2400);
        assert_eq!(cpu.stack().window(), (0x2301, 0x2400));
    }
}
