use crate::error::Fault;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// Executes one instruction against the post-fetch state.
pub type Handler = fn(op: u16, state: &State, ctx: &mut Context) -> Result<State, Fault>;

/// A named entry in the dispatch table.
pub struct Instruction {
    pub mnemonic: &'static str,
    /// Encoding with operand nibbles in lower case, e.g. `8xy4`.
    pub pattern: &'static str,
    pub execute: Handler,
}

/// How a family picks its instruction once the high nibble is known.
#[derive(Clone, Copy)]
enum Selector {
    /// The family is a single instruction.
    Only,
    /// `[_nnn]` must match exactly.
    Addr,
    /// `[__kk]`
    LowByte,
    /// `[___n]`
    LowNibble,
}

impl Selector {
    fn key(self, op: u16) -> u16 {
        match self {
            Selector::Only => 0,
            Selector::Addr => op.addr(),
            Selector::LowByte => u16::from(op.kk()),
            Selector::LowNibble => u16::from(op.n()),
        }
    }
}

struct Family {
    selector: Selector,
    entries: &'static [(u16, Instruction)],
}

macro_rules! ins {
    ($mnemonic:expr, $pattern:expr, $execute:expr) => {
        Instruction {
            mnemonic: $mnemonic,
            pattern: $pattern,
            execute: $execute,
        }
    };
}

macro_rules! only {
    ($instruction:expr) => {
        Family {
            selector: Selector::Only,
            entries: &[(0, $instruction)],
        }
    };
}

/// Indexed by the opcode's high nibble.
static FAMILIES: [Family; 16] = [
    Family {
        selector: Selector::Addr,
        entries: &[
            (0x0E0, ins!("CLS", "00E0", cls)),
            (0x0EE, ins!("RET", "00EE", ret)),
        ],
    },
    only!(ins!("JP addr", "1nnn", jump)),
    only!(ins!("CALL addr", "2nnn", call)),
    only!(ins!("SE Vx, kk", "3xkk", ske)),
    only!(ins!("SNE Vx, kk", "4xkk", skne)),
    Family {
        selector: Selector::LowNibble,
        entries: &[(0x0, ins!("SE Vx, Vy", "5xy0", skre))],
    },
    only!(ins!("LD Vx, kk", "6xkk", load)),
    only!(ins!("ADD Vx, kk", "7xkk", add)),
    Family {
        selector: Selector::LowNibble,
        entries: &[
            (0x0, ins!("LD Vx, Vy", "8xy0", mv)),
            (0x1, ins!("OR Vx, Vy", "8xy1", or)),
            (0x2, ins!("AND Vx, Vy", "8xy2", and)),
            (0x3, ins!("XOR Vx, Vy", "8xy3", xor)),
            (0x4, ins!("ADD Vx, Vy", "8xy4", addr)),
            (0x5, ins!("SUB Vx, Vy", "8xy5", sub)),
            (0x6, ins!("SHR Vx, Vy", "8xy6", shr)),
            (0x7, ins!("SUBN Vx, Vy", "8xy7", subn)),
            (0xE, ins!("SHL Vx, Vy", "8xyE", shl)),
        ],
    },
    Family {
        selector: Selector::LowNibble,
        entries: &[(0x0, ins!("SNE Vx, Vy", "9xy0", skrne))],
    },
    only!(ins!("LD I, addr", "Annn", loadi)),
    only!(ins!("JP V0, addr", "Bnnn", jumpi)),
    only!(ins!("RND Vx, kk", "Cxkk", rnd)),
    only!(ins!("DRW Vx, Vy, n", "Dxyn", draw)),
    Family {
        selector: Selector::LowByte,
        entries: &[
            (0x9E, ins!("SKP Vx", "Ex9E", skpr)),
            (0xA1, ins!("SKNP Vx", "ExA1", skup)),
        ],
    },
    Family {
        selector: Selector::LowByte,
        entries: &[
            (0x07, ins!("LD Vx, DT", "Fx07", moved)),
            (0x0A, ins!("LD Vx, K", "Fx0A", keyd)),
            (0x15, ins!("LD DT, Vx", "Fx15", loadd)),
            (0x18, ins!("LD ST, Vx", "Fx18", loads)),
            (0x1E, ins!("ADD I, Vx", "Fx1E", addi)),
            (0x29, ins!("LD F, Vx", "Fx29", ldspr)),
            (0x33, ins!("LD B, Vx", "Fx33", bcd)),
            (0x55, ins!("LD [I], Vx", "Fx55", stor)),
            (0x65, ins!("LD Vx, [I]", "Fx65", read)),
        ],
    },
];

/// Selects the Instruction for an opcode, if it names one.
/// `0x0000` never does.
pub fn decode(op: u16) -> Option<&'static Instruction> {
    let family = &FAMILIES[op.family() as usize];
    let key = family.selector.key(op);
    family
        .entries
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, instruction)| instruction)
}

/// Every instruction in the table, in opcode order.
pub fn all() -> impl Iterator<Item = &'static Instruction> {
    FAMILIES
        .iter()
        .flat_map(|family| family.entries.iter().map(|(_, instruction)| instruction))
}
