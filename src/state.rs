use crate::constants::PROGRAM_START;
use crate::frame_buffer::FrameBuffer;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::stack::CallStack;
use crate::timers::Timers;

/// A snapshot of the Chip-8 machine
///
/// ## CPU
/// Registers
/// - (v) 16 8-bit registers (V0..VF)
///     - VF doubles as the flag output of arithmetic, shifts and DRW
/// - (i) a 16-bit index register used as a base address
///
/// Counter
/// - (pc) a 16-bit program counter, always the next instruction to fetch
///
/// Stack
/// - 16 return addresses with an explicit pointer
///
/// Timers
/// - 2 8-bit timers (delay & sound), ticked by the owner not by instructions
///
/// ## Memory
/// - 4096 bytes, glyphs at 0x050, program at 0x200
/// - 64x32 frame buffer
///     - `draw_flag` is set whenever CLS or DRW touches it
///
/// ## Input
/// - the keypad latch as last written by the driver
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: CallStack,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub timers: Timers,
    pub keypad: Keypad,
    pub draw_flag: bool,
}

impl State {
    /// Power-on state: everything zeroed except the glyphs and the PC.
    pub fn new() -> Self {
        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: CallStack::new(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            timers: Timers::new(),
            keypad: Keypad::default(),
            draw_flag: false,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GLYPH_SHEET;

    #[test]
    fn test_power_on() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.v, [0; 16]);
        assert_eq!(state.i, 0);
        assert!(state.stack.is_empty());
        assert_eq!(state.timers, Timers::new());
        assert_eq!(state.frame_buffer.lit(), 0);
        assert!(!state.draw_flag);
        assert_eq!(state.memory.slice(0x50, 80).unwrap(), &GLYPH_SHEET[..]);
    }
}
