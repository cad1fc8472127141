use bitflags::bitflags;

bitflags! {
    /// Condition flags byte.
    ///
    /// Layout (bit index in the byte):
    /// - bit 7: S (sign, bit 7 of the result)
    /// - bit 6: Z (zero)
    /// - bit 5: P (parity, set when the result has an even number of ones)
    /// - bit 2: AC (auxiliary carry, mirrors carry outside of DAA)
    /// - bit 0: CY (carry)
    ///
    /// The remaining bits carry no meaning but are kept verbatim so that
    /// `PUSH PSW` / `POP PSW` round-trip the raw byte.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const CARRY = 1 << 0;
        const AUX_CARRY = 1 << 2;
        const PARITY = 1 << 5;
        const ZERO = 1 << 6;
        const SIGN = 1 << 7;
    }
}

impl Flags {
    #[inline]
    pub fn carry(self) -> bool {
        self.contains(Flags::CARRY)
    }

    #[inline]
    pub fn aux_carry(self) -> bool {
        self.contains(Flags::AUX_CARRY)
    }

    #[inline]
    pub fn parity(self) -> bool {
        self.contains(Flags::PARITY)
    }

    #[inline]
    pub fn zero(self) -> bool {
        self.contains(Flags::ZERO)
    }

    #[inline]
    pub fn sign(self) -> bool {
        self.contains(Flags::SIGN)
    }

    /// Set carry and auxiliary carry together.
    #[inline]
    pub fn set_carry(&mut self, value: bool) {
        self.set(Flags::CARRY | Flags::AUX_CARRY, value);
    }

    #[inline]
    pub fn set_aux_carry(&mut self, value: bool) {
        self.set(Flags::AUX_CARRY, value);
    }

    /// Recompute Z, S and P from the low byte of `result`.
    pub fn set_szp(&mut self, result: u8) {
        self.set(Flags::ZERO, result == 0);
        self.set(Flags::SIGN, result > 0x7f);
        self.set(Flags::PARITY, result.count_ones() % 2 == 0);
    }

    /// Recompute Z, S, P and Carry from a widened arithmetic result.
    ///
    /// Carry is set when the intermediate left the 0..=0xFF range, either by
    /// overflowing an addition or by borrowing in a subtraction. AuxCarry is
    /// not computed from nibbles; it is written as a copy of Carry.
    pub fn update(&mut self, intermediate: i32) {
        self.set_szp(intermediate as u8);
        self.set_carry(!(0..=0xff).contains(&intermediate));
    }

    pub fn to_u8(self) -> u8 {
        self.bits()
    }

    pub fn from_u8(value: u8) -> Self {
        Flags::from_bits_retain(value)
    }
}

/// Branch predicates shared by the conditional jump, call and return forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    /// Decode the condition encoded in bits 3..=5 of a conditional opcode.
    pub fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x07 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }

    pub fn holds(self, flags: Flags) -> bool {
        match self {
            Condition::NotZero => !flags.zero(),
            Condition::Zero => flags.zero(),
            Condition::NoCarry => !flags.carry(),
            Condition::Carry => flags.carry(),
            Condition::ParityOdd => !flags.parity(),
            Condition::ParityEven => flags.parity(),
            Condition::Plus => !flags.sign(),
            Condition::Minus => flags.sign(),
        }
    }

    /// Mnemonic suffix, e.g. `NZ` in `JNZ`.
    pub fn suffix(self) -> &'static str {
        match self {
            Condition::NotZero => "NZ",
            Condition::Zero => "Z",
            Condition::NoCarry => "NC",
            Condition::Carry => "C",
            Condition::ParityOdd => "PO",
            Condition::ParityEven => "PE",
            Condition::Plus => "P",
            Condition::Minus => "M",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_positions_are_fixed() {
        assert_eq!(Flags::CARRY.bits(), 0x01);
        assert_eq!(Flags::AUX_CARRY.bits(), 0x04);
        assert_eq!(Flags::PARITY.bits(), 0x20);
        assert_eq!(Flags::ZERO.bits(), 0x40);
        assert_eq!(Flags::SIGN.bits(), 0x80);
    }

    #[test]
    fn raw_byte_round_trips_including_reserved_bits() {
        for raw in 0..=0xffu8 {
            assert_eq!(Flags::from_u8(raw).to_u8(), raw);
        }
    }

    #[test]
    fn update_detects_overflow_and_borrow() {
        let mut f = Flags::empty();
        f.update(0x100);
        assert!(f.zero() && f.carry() && f.aux_carry());
        assert!(f.parity());

        f.update(-1);
        assert!(f.carry());
        assert!(f.sign());
        assert!(!f.zero());

        f.update(0x01);
        assert!(!f.carry() && !f.aux_carry());
        assert!(!f.parity());
    }

    #[test]
    fn conditions_decode_from_opcode_bits() {
        assert_eq!(Condition::from_opcode(0xc2), Condition::NotZero);
        assert_eq!(Condition::from_opcode(0xca), Condition::Zero);
        assert_eq!(Condition::from_opcode(0xd4), Condition::NoCarry);
        assert_eq!(Condition::from_opcode(0xdc), Condition::Carry);
        assert_eq!(Condition::from_opcode(0xe0), Condition::ParityOdd);
        assert_eq!(Condition::from_opcode(0xe8), Condition::ParityEven);
        assert_eq!(Condition::from_opcode(0xf2), Condition::Plus);
        assert_eq!(Condition::from_opcode(0xfa), Condition::Minus);
    }

    #[test]
    fn conditions_read_flags() {
        let flags = Flags::ZERO | Flags::PARITY;
        assert!(Condition::Zero.holds(flags));
        assert!(!Condition::NotZero.holds(flags));
        assert!(Condition::ParityEven.holds(flags));
        assert!(Condition::NoCarry.holds(flags));
        assert!(Condition::Plus.holds(flags));
        assert!(!Condition::Minus.holds(flags));
    }
}
