use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::Fault;
use crate::frame_buffer::FrameBuffer;
use crate::instruction::decode;
use crate::keypad::Keypad;
use crate::operations::Context;
use crate::quirks::Quirks;
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `quirks` in effect
///  - the random source for RND
///
/// Supplies interfaces for:
/// - resetting and loading roms
/// - writing the keypad latch
/// - stepping the CPU and its timers
/// - inspecting its frame buffer for rendering by some display
///
/// A driver calls `step` at `TIMER_HZ`, writing the keypad before and reading
/// the frame after. Nothing here blocks or spawns.
pub struct Chip8 {
    state: State,
    quirks: Quirks,
    rng: StdRng,
}

impl Chip8 {
    pub fn new(quirks: Quirks) -> Self {
        Chip8::with_rng(quirks, StdRng::from_entropy())
    }

    /// A Chip8 whose RND sequence is fixed by `seed`.
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        Chip8::with_rng(quirks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(quirks: Quirks, rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            quirks,
            rng,
        }
    }

    /// Back to the power-on state: memory, registers, stack, timers, frame
    /// buffer and keypad all cleared, glyphs reloaded.
    pub fn reset(&mut self) {
        debug!("reset");
        self.state = State::new();
    }

    /// Reset, then copy a ROM in at 0x200.
    ///
    /// An oversized ROM is rejected before anything is touched.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Fault> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Fault::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.reset();
        self.state.memory.load_rom(rom)?;
        debug!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Overwrite the keypad latch; `keys[k]` is true while key `k` is held.
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.state.keypad = Keypad::new(keys);
    }

    /// Runs `instructions` instructions then ticks both timers once.
    ///
    /// Stops at the first fault and returns it; the faulting instruction has
    /// no effect, PC still points at it, and the timers are not ticked.
    pub fn step(&mut self, instructions: usize) -> Result<(), Fault> {
        for _ in 0..instructions {
            if let Err(fault) = self.execute_next() {
                warn!("halted: {}", fault);
                return Err(fault);
            }
        }
        self.state.timers.tick();
        Ok(())
    }

    /// Fetches, decodes and executes a single instruction. Timers are not ticked.
    ///
    /// PC must address a whole word inside the program area; anything else
    /// is an `Address` fault naming PC.
    pub fn execute_next(&mut self) -> Result<(), Fault> {
        let pc = self.state.pc;
        if pc < PROGRAM_START || pc as usize > MEMORY_SIZE - 2 {
            return Err(Fault::Address { address: pc as usize });
        }
        let op = self.state.memory.word(pc as usize)?;
        let instruction = decode(op).ok_or(Fault::Decode { opcode: op, pc })?;
        trace!(
            "{:04X} {:04X} {:<14} v{:02X?} i{:04X}",
            pc,
            op,
            instruction.mnemonic,
            self.state.v,
            self.state.i
        );

        let fetched = State {
            pc: pc + 0x2,
            ..self.state
        };
        let mut ctx = Context {
            quirks: self.quirks,
            rng: &mut self.rng,
        };
        self.state = (instruction.execute)(op, &fetched, &mut ctx)?;
        Ok(())
    }

    /// Returns the FrameBuffer if it changed since the last call, and
    /// clears the draw flag.
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// The current frame whether or not it changed.
    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether the buzzer should be sounding; sample once per step.
    pub fn sound_active(&self) -> bool {
        self.state.timers.sound_active()
    }

    /// Read-only view of the whole machine.
    pub fn state(&self) -> &State {
        &self.state
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(Quirks::default())
    }
}
