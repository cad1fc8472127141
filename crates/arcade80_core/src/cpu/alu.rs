use super::table::AluOp;
use super::Cpu;

// All 8-bit arithmetic is carried out on a widened intermediate so that one
// flag update can detect both carry-out (> 0xFF) and borrow (< 0).
//
// Carry and auxiliary carry are written together everywhere except DAA,
// which tracks the low-nibble carry on its own.

impl Cpu {
    /// Apply an accumulator operation with `value` as the second operand.
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        let a = self.regs.a as i32;
        let value = value as i32;
        let carry_in = self.flags.carry() as i32;
        let result = match op {
            AluOp::Add => a + value,
            AluOp::Adc => a + value + carry_in,
            AluOp::Sub | AluOp::Cmp => a - value,
            AluOp::Sbb => a - value - carry_in,
            AluOp::Ana => a & value,
            AluOp::Xra => a ^ value,
            AluOp::Ora => a | value,
        };
        self.flags.update(result);
        if op != AluOp::Cmp {
            self.regs.a = result as u8;
        }
    }

    /// `INR`: carry is forced on wraparound from 0xFF to 0x00.
    pub(super) fn inr(&mut self, value: u8) -> u8 {
        self.flags.update(value as i32 + 1);
        value.wrapping_add(1)
    }

    /// `DCR`: carry is forced on wraparound from 0x00 to 0xFF.
    pub(super) fn dcr(&mut self, value: u8) -> u8 {
        self.flags.update(value as i32 - 1);
        value.wrapping_sub(1)
    }

    /// `INX`: Z/S/P follow the low byte, carry marks 0xFFFF -> 0x0000.
    pub(super) fn inx(&mut self, value: u16) -> u16 {
        let result = value.wrapping_add(1);
        self.flags.set_szp(result as u8);
        self.flags.set_carry(value == 0xffff);
        result
    }

    /// `DCX`: Z/S/P follow the low byte, carry marks 0x0000 -> 0xFFFF.
    pub(super) fn dcx(&mut self, value: u16) -> u16 {
        let result = value.wrapping_sub(1);
        self.flags.set_szp(result as u8);
        self.flags.set_carry(value == 0);
        result
    }

    /// `DAD`: HL += value on a 32-bit intermediate.
    pub(super) fn dad(&mut self, value: u16) {
        let result = self.regs.hl() as u32 + value as u32;
        self.regs.set_hl(result as u16);
        self.flags.set_szp(result as u8);
        self.flags.set_carry(result > 0xffff);
    }

    /// `DAA`: decimal-adjust the accumulator after BCD addition.
    pub(super) fn daa(&mut self) {
        let carry_in = self.flags.carry();
        let low = self.regs.a & 0x0f;
        let mut value = self.regs.a as u16;
        let mut aux = self.flags.aux_carry();

        if low > 9 || aux {
            value += 0x06;
            aux = low + 0x06 > 0x0f;
        }
        if (value >> 4) > 9 || carry_in {
            value += 0x60;
        }

        self.regs.a = value as u8;
        self.flags.update(value as i32);
        if carry_in {
            self.flags.set_carry(true);
        }
        self.flags.set_aux_carry(aux);
    }

    pub(super) fn rlc(&mut self) {
        let out = self.regs.a >> 7;
        self.regs.a = (self.regs.a << 1) | out;
        self.flags.set_carry(out == 1);
    }

    pub(super) fn rrc(&mut self) {
        let out = self.regs.a & 0x01;
        self.regs.a = (self.regs.a >> 1) | (out << 7);
        self.flags.set_carry(out == 1);
    }

    pub(super) fn ral(&mut self) {
        let out = self.regs.a >> 7;
        let carry = self.flags.carry() as u8;
        self.regs.a = (self.regs.a << 1) | carry;
        self.flags.set_carry(out == 1);
    }

    pub(super) fn rar(&mut self) {
        let out = self.regs.a & 0x01;
        let carry = self.flags.carry() as u8;
        self.regs.a = (self.regs.a >> 1) | (carry << 7);
        self.flags.set_carry(out == 1);
    }
}
