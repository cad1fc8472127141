/// Input port wired to player 1 buttons, coin and start switches.
pub const PORT_INPUT_1: u8 = 1;
/// Input port wired to player 2 buttons, tilt and DIP switches.
pub const PORT_INPUT_2: u8 = 2;
/// Input port returning the shifted window of the shift register.
pub const PORT_SHIFT_RESULT: u8 = 3;
/// Output port selecting the shift offset (low 3 bits).
pub const PORT_SHIFT_OFFSET: u8 = 2;
/// Output port feeding a new byte into the shift register.
pub const PORT_SHIFT_DATA: u8 = 4;

/// External 16-bit barrel shifter used by the game for sprite shifting.
///
/// Each write pushes a byte into the high half and moves the previous high
/// byte into the low half. Reads return the 8 bits starting `offset` bits
/// below the top of the register.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShiftRegister {
    value: u16,
    offset: u8,
}

impl ShiftRegister {
    pub fn set_offset(&mut self, offset: u8) {
        self.offset = offset & 0x07;
    }

    pub fn push(&mut self, value: u8) {
        self.value = ((value as u16) << 8) | (self.value >> 8);
    }

    pub fn result(&self) -> u8 {
        (self.value >> (8 - self.offset)) as u8
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }
}

/// I/O port state seen by `IN` and `OUT`.
///
/// Ports 1 and 2 are plain registers set by the host input layer. The shift
/// register sits behind output ports 2/4 and input port 3. Every `OUT` value
/// is also latched per port so a host can observe sound and watchdog writes.
#[derive(Clone, Debug)]
pub struct IoPorts {
    pub in1: u8,
    pub in2: u8,
    shift: ShiftRegister,
    latches: [u8; 256],
}

impl Default for IoPorts {
    fn default() -> Self {
        Self {
            in1: 0,
            in2: 0,
            shift: ShiftRegister::default(),
            latches: [0; 256],
        }
    }
}

impl IoPorts {
    /// Value returned by `IN port`, or `None` when the port is not wired.
    pub fn input(&self, port: u8) -> Option<u8> {
        match port {
            PORT_INPUT_1 => Some(self.in1),
            PORT_INPUT_2 => Some(self.in2),
            PORT_SHIFT_RESULT => Some(self.shift.result()),
            _ => None,
        }
    }

    /// Handle `OUT port` with the accumulator value.
    pub fn output(&mut self, port: u8, value: u8) {
        self.latches[port as usize] = value;
        match port {
            PORT_SHIFT_OFFSET => self.shift.set_offset(value),
            PORT_SHIFT_DATA => self.shift.push(value),
            _ => {}
        }
    }

    /// Last value written to `port` with `OUT`.
    pub fn last_output(&self, port: u8) -> u8 {
        self.latches[port as usize]
    }

    pub fn shift_register(&self) -> &ShiftRegister {
        &self.shift
    }
}
