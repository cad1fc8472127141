use super::memory::Memory;

/// Size of the legal window pinned by [`Stack::set_pointer`] under the
/// windowed policy, minus one.
const WINDOW_SPAN: u16 = 0xff;

/// How the stack pointer reacts when it runs out of its legal range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StackPolicy {
    /// The pointer wraps through the whole 64 KiB address space.
    Unbounded,
    /// Every `set_pointer` pins a 256-byte window below the new pointer.
    /// Pushes below the window snap back to its top, pops above it snap back
    /// to its bottom, so a runaway stack can only clobber its own window.
    #[default]
    Windowed,
}

/// Stack pointer plus its current legal window.
///
/// The stack does not own memory; the CPU lends it for the duration of each
/// push or pop.
#[derive(Clone, Copy, Debug)]
pub struct Stack {
    pointer: u16,
    min_address: u16,
    max_address: u16,
    policy: StackPolicy,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new(StackPolicy::default())
    }
}

impl Stack {
    pub fn new(policy: StackPolicy) -> Self {
        Self {
            pointer: 0,
            min_address: 0x0000,
            max_address: 0xffff,
            policy,
        }
    }

    #[inline]
    pub fn pointer(&self) -> u16 {
        self.pointer
    }

    /// Current legal window as `(min_address, max_address)`.
    pub fn window(&self) -> (u16, u16) {
        (self.min_address, self.max_address)
    }

    /// Move the stack pointer. Under the windowed policy this also pins the
    /// legal window to `[pointer - 255, pointer]`.
    pub fn set_pointer(&mut self, pointer: u16) {
        self.pointer = pointer;
        if self.policy == StackPolicy::Windowed {
            self.max_address = pointer;
            self.min_address = pointer.saturating_sub(WINDOW_SPAN);
        }
    }

    /// Decrement the pointer and write `value` there.
    ///
    /// The escape check looks at the pointer before it moves, so a window
    /// touching 0x0000 never lets the pointer wrap to 0xFFFF.
    pub fn push_byte(&mut self, memory: &mut Memory, value: u8) {
        if self.policy == StackPolicy::Windowed && self.pointer <= self.min_address {
            log::debug!(
                "stack overflow below 0x{:04X}, pointer snapped to 0x{:04X}",
                self.min_address,
                self.max_address
            );
            self.pointer = self.max_address;
        } else {
            self.pointer = self.pointer.wrapping_sub(1);
        }
        memory.write(self.pointer, value);
    }

    /// Read the byte at the pointer, then increment it.
    pub fn pop_byte(&mut self, memory: &Memory) -> u8 {
        let value = memory.read(self.pointer);
        if self.policy == StackPolicy::Windowed && self.pointer >= self.max_address {
            log::debug!(
                "stack underflow above 0x{:04X}, pointer snapped to 0x{:04X}",
                self.max_address,
                self.min_address
            );
            self.pointer = self.min_address;
        } else {
            self.pointer = self.pointer.wrapping_add(1);
        }
        value
    }

    /// Push a word, high byte first, so the low byte ends up at the lower
    /// address.
    pub fn push_word(&mut self, memory: &mut Memory, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.push_byte(memory, hi);
        self.push_byte(memory, lo);
    }

    /// Pop a word, low byte first.
    pub fn pop_word(&mut self, memory: &Memory) -> u16 {
        let lo = self.pop_byte(memory);
        let hi = self.pop_byte(memory);
        u16::from_be_bytes([hi, lo])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_restores_value_and_pointer() {
        let mut mem = Memory::new();
        let mut stack = Stack::new(StackPolicy::Windowed);
        stack.set_pointer(0x2400);

        stack.push_word(&mut mem, 0x1234);
        assert_eq!(stack.pointer(), 0x23fe);
        assert_eq!(mem[0x23fe], 0x34);
        assert_eq!(mem[0x23ff], 0x12);

        assert_eq!(stack.pop_word(&mem), 0x1234);
        assert_eq!(stack.pointer(), 0x2400);
    }

    #[test]
    fn windowed_push_snaps_back_into_window() {
        let mut mem = Memory::new();
        let mut stack = Stack::new(StackPolicy::Windowed);
        stack.set_pointer(0x2000);
        assert_eq!(stack.window(), (0x1f01, 0x2000));

        for i in 0..129u16 {
            stack.push_word(&mut mem, i);
            let sp = stack.pointer();
            assert!(
                (0x1f01..=0x2000).contains(&sp),
                "pointer escaped window: 0x{sp:04X}"
            );
        }
        // Nothing below the window was touched.
        assert!(mem.region(0x0000, 0x1f01).iter().all(|&b| b == 0));
        assert!(mem.region(0x2001, 0x100).iter().all(|&b| b == 0));
    }

    #[test]
    fn windowed_pop_snaps_back_to_window_bottom() {
        let mut mem = Memory::new();
        let mut stack = Stack::new(StackPolicy::Windowed);
        stack.set_pointer(0x2000);
        stack.pop_byte(&mem);
        assert_eq!(stack.pointer(), 0x1f01);
        mem[0x1f01] = 0x77;
        assert_eq!(stack.pop_byte(&mem), 0x77);
        assert_eq!(stack.pointer(), 0x1f02);
    }

    #[test]
    fn window_near_bottom_of_memory_is_clamped() {
        let mut stack = Stack::new(StackPolicy::Windowed);
        stack.set_pointer(0x0010);
        assert_eq!(stack.window(), (0x0000, 0x0010));
    }

    #[test]
    fn window_at_bottom_of_memory_never_wraps_to_top() {
        let mut mem = Memory::new();
        let mut stack = Stack::new(StackPolicy::Windowed);
        stack.set_pointer(0x0010);

        for i in 0..20u8 {
            stack.push_byte(&mut mem, i + 1);
            let sp = stack.pointer();
            assert!(sp <= 0x0010, "push {i}: pointer escaped window: 0x{sp:04X}");
        }
        assert_eq!(mem[0xffff], 0);
        // The 17th push found the pointer at 0x0000 and snapped to the top.
        assert_eq!(mem[0x0010], 17);
    }

    #[test]
    fn window_at_top_of_memory_never_wraps_to_bottom() {
        let mut mem = Memory::new();
        let mut stack = Stack::new(StackPolicy::Windowed);
        stack.set_pointer(0xffff);
        assert_eq!(stack.window(), (0xff00, 0xffff));

        mem[0xffff] = 0x5a;
        assert_eq!(stack.pop_byte(&mem), 0x5a);
        assert_eq!(stack.pointer(), 0xff00);
    }

    #[test]
    fn unbounded_policy_wraps_through_address_space() {
        let mut mem = Memory::new();
        let mut stack = Stack::new(StackPolicy::Unbounded);
        stack.set_pointer(0x0001);
        stack.push_word(&mut mem, 0xabcd);
        assert_eq!(stack.pointer(), 0xffff);
        assert_eq!(mem[0x0000], 0xab);
        assert_eq!(mem[0xffff], 0xcd);
        assert_eq!(stack.pop_word(&mem), 0xabcd);
        assert_eq!(stack.pointer(), 0x0001);
    }

    #[test]
    fn unpinned_window_covers_whole_memory() {
        let mut mem = Memory::new();
        let mut stack = Stack::new(StackPolicy::Windowed);
        // Pointer starts at zero; the first push wraps to the top of memory.
        stack.push_byte(&mut mem, 0x42);
        assert_eq!(stack.pointer(), 0xffff);
        assert_eq!(mem[0xffff], 0x42);
    }
}
