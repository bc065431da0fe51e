use thiserror::Error;

/// Everything that can stop the VM.
///
/// Faults are reported at the instruction boundary where they occur. The VM
/// never retries or clamps; the driver decides whether to reset or halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// `0x0000`, or an opcode with no handler in its family.
    #[error("cannot decode opcode {opcode:#06X} at {pc:#06X}")]
    Decode { opcode: u16, pc: u16 },

    #[error("stack overflow: CALL at {pc:#06X} with every stack slot in use")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: RET at {pc:#06X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    /// A read or write, direct or through I or PC, outside 0x000..=0xFFF.
    #[error("memory access out of bounds at address {address:#06X}")]
    Address { address: usize },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },
}
