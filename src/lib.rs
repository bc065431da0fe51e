pub use chip8::Chip8;
pub use constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, INSTRUCTIONS_PER_TICK, KEY_COUNT, TIMER_HZ};
pub use error::Fault;
pub use frame_buffer::FrameBuffer;
pub use quirks::Quirks;

mod chip8;
pub mod constants;
mod error;
mod frame_buffer;
pub mod instruction;
pub mod keypad;
pub mod memory;
pub mod opcode;
pub mod operations;
mod quirks;
pub mod stack;
pub mod state;
pub mod timers;
