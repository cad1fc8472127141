use super::regs::Register;
use super::table::{Instruction, Operand};
use super::Cpu;

impl Cpu {
    /// Execute one decoded instruction whose opcode byte has already been
    /// fetched. Operand bytes are fetched here.
    ///
    /// Returns `true` when a conditional CALL/RET took its branch, which
    /// costs extra cycles.
    pub(super) fn execute(&mut self, instruction: Instruction) -> bool {
        match instruction {
            Instruction::Nop | Instruction::Hlt => {}

            Instruction::Mov { dst, src } => {
                let value = self.read(src);
                self.write(dst, value);
            }
            Instruction::Mvi(reg) => {
                let value = self.fetch_byte();
                self.write(reg, value as u16);
            }
            Instruction::Lxi(pair) => {
                let value = self.fetch_word();
                self.write(pair, value);
            }
            Instruction::Lda => {
                let addr = self.fetch_word();
                self.regs.a = self.memory.read(addr);
            }
            Instruction::Sta => {
                let addr = self.fetch_word();
                self.memory.write(addr, self.regs.a);
            }
            Instruction::Lhld => {
                let addr = self.fetch_word();
                let value = self.memory.read_word(addr);
                self.regs.set_hl(value);
            }
            Instruction::Shld => {
                let addr = self.fetch_word();
                self.memory.write_word(addr, self.regs.hl());
            }
            Instruction::Ldax(pair) => {
                let addr = self.read(pair);
                self.regs.a = self.memory.read(addr);
            }
            Instruction::Stax(pair) => {
                let addr = self.read(pair);
                self.memory.write(addr, self.regs.a);
            }
            Instruction::Xchg => {
                core::mem::swap(&mut self.regs.d, &mut self.regs.h);
                core::mem::swap(&mut self.regs.e, &mut self.regs.l);
            }

            Instruction::Alu(op, operand) => {
                let value = match operand {
                    Operand::Reg(reg) => self.read8(reg),
                    Operand::Immediate => self.fetch_byte(),
                };
                self.alu(op, value);
            }
            Instruction::Inr(reg) => {
                let value = self.read8(reg);
                let result = self.inr(value);
                self.write(reg, result as u16);
            }
            Instruction::Dcr(reg) => {
                let value = self.read8(reg);
                let result = self.dcr(value);
                self.write(reg, result as u16);
            }
            Instruction::Inx(pair) => {
                let value = self.read(pair);
                let result = self.inx(value);
                self.write(pair, result);
            }
            Instruction::Dcx(pair) => {
                let value = self.read(pair);
                let result = self.dcx(value);
                self.write(pair, result);
            }
            Instruction::Dad(pair) => {
                let value = self.read(pair);
                self.dad(value);
            }
            Instruction::Daa => self.daa(),
            Instruction::Rlc => self.rlc(),
            Instruction::Rrc => self.rrc(),
            Instruction::Ral => self.ral(),
            Instruction::Rar => self.rar(),
            Instruction::Cma => self.regs.a = !self.regs.a,
            Instruction::Stc => self.flags.set_carry(true),
            Instruction::Cmc => {
                let carry = self.flags.carry();
                self.flags.set_carry(!carry);
            }

            Instruction::Jmp => {
                self.regs.pc = self.fetch_word();
            }
            Instruction::Jcc(cond) => {
                let addr = self.fetch_word();
                if cond.holds(self.flags) {
                    self.regs.pc = addr;
                }
            }
            Instruction::Call => {
                let addr = self.fetch_word();
                self.call(addr);
            }
            Instruction::Ccc(cond) => {
                let addr = self.fetch_word();
                if cond.holds(self.flags) {
                    self.call(addr);
                    return true;
                }
            }
            Instruction::Ret => self.ret(),
            Instruction::Rcc(cond) => {
                if cond.holds(self.flags) {
                    self.ret();
                    return true;
                }
            }
            Instruction::Rst(n) => self.call((n as u16) << 3),
            Instruction::Pchl => self.regs.pc = self.regs.hl(),

            Instruction::Push(pair) => {
                let value = self.read(pair);
                self.push_word(value);
            }
            Instruction::Pop(pair) => {
                let value = self.pop_word();
                self.write(pair, value);
            }
            Instruction::Xthl => {
                let sp = self.stack.pointer();
                let top = self.memory.read_word(sp);
                self.memory.write_word(sp, self.regs.hl());
                self.regs.set_hl(top);
            }
            Instruction::Sphl => {
                let hl = self.regs.hl();
                self.write(Register::SP, hl);
            }

            Instruction::In => {
                let port = self.fetch_byte();
                match self.io.input(port) {
                    Some(value) => self.regs.a = value,
                    None => log::debug!("IN from unmapped port {port}, A unchanged"),
                }
            }
            Instruction::Out => {
                let port = self.fetch_byte();
                self.io.output(port, self.regs.a);
            }
            Instruction::Ei => self.interrupts_enabled = true,
            Instruction::Di => self.interrupts_enabled = false,
        }
        false
    }

    fn call(&mut self, addr: u16) {
        self.push_word(self.regs.pc);
        self.regs.pc = addr;
    }

    fn ret(&mut self) {
        self.regs.pc = self.pop_word();
    }
}
