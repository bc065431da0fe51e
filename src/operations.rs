use log::trace;
use rand::{Rng, RngCore};

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, GLYPH_HEIGHT, GLYPH_START};
use crate::error::Fault;
use crate::opcode::Opcode;
use crate::quirks::Quirks;
use crate::state::State;

/// What a handler needs beyond the machine state.
pub struct Context<'a> {
    pub quirks: Quirks,
    pub rng: &'a mut dyn RngCore,
}

// Every handler receives the state as it is after the fetch, so `state.pc`
// already points past the instruction being executed. Handlers that jump,
// call, return, skip or wait overwrite it; the rest leave it alone.

/// Address of the instruction being executed, for fault reports.
fn current(state: &State) -> u16 {
    state.pc.wrapping_sub(0x2)
}

/// PC past the next instruction if `cond` holds.
fn skip_if(cond: bool, state: &State) -> u16 {
    if cond {
        state.pc + 0x2
    } else {
        state.pc
    }
}

/// clear
pub fn cls(_op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    Ok(State {
        frame_buffer,
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop()
pub fn ret(_op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let (pc, stack) = state
        .stack
        .pop()
        .ok_or(Fault::StackUnderflow { pc: current(state) })?;
    Ok(State { pc, stack, ..*state })
}

/// PC = addr
pub fn jump(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    Ok(State {
        pc: op.addr(),
        ..*state
    })
}

/// STACK.push(PC); PC = addr
pub fn call(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let stack = state
        .stack
        .push(state.pc)
        .ok_or(Fault::StackOverflow { pc: current(state) })?;
    Ok(State {
        pc: op.addr(),
        stack,
        ..*state
    })
}

/// if Vx == kk then skip
pub fn ske(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let pc = skip_if(state.v[op.x()] == op.kk(), state);
    Ok(State { pc, ..*state })
}

/// if Vx != kk then skip
pub fn skne(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let pc = skip_if(state.v[op.x()] != op.kk(), state);
    Ok(State { pc, ..*state })
}

/// if Vx == Vy then skip
pub fn skre(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let pc = skip_if(state.v[op.x()] == state.v[op.y()], state);
    Ok(State { pc, ..*state })
}

/// if Vx != Vy then skip
pub fn skrne(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let pc = skip_if(state.v[op.x()] != state.v[op.y()], state);
    Ok(State { pc, ..*state })
}

/// Vx = kk
pub fn load(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut v = state.v;
    v[op.x()] = op.kk();
    Ok(State { v, ..*state })
}

/// Vx += kk
/// Wraps; VF is untouched
pub fn add(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut v = state.v;
    v[op.x()] = v[op.x()].wrapping_add(op.kk());
    Ok(State { v, ..*state })
}

/// Vx = Vy
pub fn mv(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut v = state.v;
    v[op.x()] = v[op.y()];
    Ok(State { v, ..*state })
}

/// Vx |= Vy
pub fn or(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut v = state.v;
    v[op.x()] |= v[op.y()];
    Ok(State { v, ..*state })
}

/// Vx &= Vy
pub fn and(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut v = state.v;
    v[op.x()] &= v[op.y()];
    Ok(State { v, ..*state })
}

/// Vx ^= Vy
pub fn xor(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut v = state.v;
    v[op.x()] ^= v[op.y()];
    Ok(State { v, ..*state })
}

// The flag-setting handlers below read both operands into locals before
// writing anything, and write VF last. With x == 0xF the flag wins.

/// Vx += Vy; VF = carry
pub fn addr(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    let sum = u16::from(vx) + u16::from(vy);
    let mut v = state.v;
    v[op.x()] = (sum & 0xFF) as u8;
    v[0xF] = (sum > 0xFF) as u8;
    Ok(State { v, ..*state })
}

/// Vx -= Vy; VF = !borrow
pub fn sub(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    let mut v = state.v;
    v[op.x()] = vx.wrapping_sub(vy);
    v[0xF] = (vx >= vy) as u8;
    Ok(State { v, ..*state })
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    let mut v = state.v;
    v[op.x()] = vy.wrapping_sub(vx);
    v[0xF] = (vy >= vx) as u8;
    Ok(State { v, ..*state })
}

/// The value a shift operates on.
fn shift_source(op: u16, state: &State, quirks: Quirks) -> u8 {
    if quirks.shift_copies_vy {
        state.v[op.y()]
    } else {
        state.v[op.x()]
    }
}

/// Vx = Vy >> 1; VF = shifted out bit
pub fn shr(op: u16, state: &State, ctx: &mut Context) -> Result<State, Fault> {
    let source = shift_source(op, state, ctx.quirks);
    let mut v = state.v;
    v[op.x()] = source >> 1;
    v[0xF] = source & 0x1;
    Ok(State { v, ..*state })
}

/// Vx = Vy << 1; VF = shifted out bit
pub fn shl(op: u16, state: &State, ctx: &mut Context) -> Result<State, Fault> {
    let source = shift_source(op, state, ctx.quirks);
    let mut v = state.v;
    v[op.x()] = source << 1;
    v[0xF] = source >> 7;
    Ok(State { v, ..*state })
}

/// I = addr
pub fn loadi(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    Ok(State {
        i: op.addr(),
        ..*state
    })
}

/// PC = V0 + addr
pub fn jumpi(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    Ok(State {
        pc: op.addr() + u16::from(state.v[0x0]),
        ..*state
    })
}

/// Vx = random & kk
pub fn rnd(op: u16, state: &State, ctx: &mut Context) -> Result<State, Fault> {
    let byte: u8 = ctx.rng.gen();
    let mut v = state.v;
    v[op.x()] = byte & op.kk();
    Ok(State { v, ..*state })
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the n-byte sprite at I onto the FrameBuffer at (Vx, Vy), wrapping
/// each axis independently. VF = 1 if any lit pixel was turned off.
pub fn draw(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let origin_x = state.v[op.x()] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[op.y()] as usize % DISPLAY_HEIGHT;
    let sprite = state.memory.slice(state.i as usize, op.n() as usize)?;

    let mut frame_buffer = state.frame_buffer;
    let mut collided = false;
    for (row, byte) in sprite.iter().enumerate() {
        for col in 0..8 {
            if byte & (0x80u8 >> col) != 0 {
                collided |= frame_buffer.toggle(origin_x + col, origin_y + row);
            }
        }
    }

    let mut v = state.v;
    v[0xF] = collided as u8;
    Ok(State {
        v,
        frame_buffer,
        draw_flag: true,
        ..*state
    })
}

/// if Vx.pressed then skip
pub fn skpr(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let pc = skip_if(state.keypad.is_down(state.v[op.x()]), state);
    Ok(State { pc, ..*state })
}

/// if !Vx.pressed then skip
pub fn skup(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let pc = skip_if(state.keypad.is_up(state.v[op.x()]), state);
    Ok(State { pc, ..*state })
}

/// Vx = DT
pub fn moved(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut v = state.v;
    v[op.x()] = state.timers.delay;
    Ok(State { v, ..*state })
}

/// Vx = lowest pressed key
/// With nothing pressed PC is rewound so this instruction runs again next time.
pub fn keyd(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    match state.keypad.first_down() {
        Some(key) => {
            let mut v = state.v;
            v[op.x()] = key;
            Ok(State { v, ..*state })
        }
        None => {
            trace!("waiting for a key into V{:X}", op.x());
            Ok(State {
                pc: current(state),
                ..*state
            })
        }
    }
}

/// DT = Vx
pub fn loadd(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut timers = state.timers;
    timers.delay = state.v[op.x()];
    Ok(State { timers, ..*state })
}

/// ST = Vx
pub fn loads(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut timers = state.timers;
    timers.sound = state.v[op.x()];
    Ok(State { timers, ..*state })
}

/// I += Vx
pub fn addi(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    Ok(State {
        i: state.i.wrapping_add(u16::from(state.v[op.x()])),
        ..*state
    })
}

/// I = address of the glyph for the low nibble of Vx
pub fn ldspr(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    Ok(State {
        i: GLYPH_START + GLYPH_HEIGHT * u16::from(state.v[op.x()] & 0xF),
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let value = state.v[op.x()];
    let mut memory = state.memory;
    memory
        .slice_mut(state.i as usize, 3)?
        .copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
    Ok(State { memory, ..*state })
}

/// mem[I..=I+x] = V0..=Vx
/// I is left as it was
pub fn stor(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let mut memory = state.memory;
    memory
        .slice_mut(state.i as usize, op.x() + 1)?
        .copy_from_slice(&state.v[..=op.x()]);
    Ok(State { memory, ..*state })
}

/// V0..=Vx = mem[I..=I+x]
/// I is left as it was
pub fn read(op: u16, state: &State, _ctx: &mut Context) -> Result<State, Fault> {
    let bytes = state.memory.slice(state.i as usize, op.x() + 1)?;
    let mut v = state.v;
    v[..=op.x()].copy_from_slice(bytes);
    Ok(State { v, ..*state })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Handler = fn(u16, &State, &mut Context) -> Result<State, Fault>;

    fn exec(handler: Handler, op: u16, state: &State, quirks: Quirks) -> State {
        let mut rng = StdRng::seed_from_u64(8);
        let mut ctx = Context {
            quirks,
            rng: &mut rng,
        };
        handler(op, state, &mut ctx).unwrap()
    }

    /// Runs `handler` as `op` with V1 = a and V2 = b for every pair.
    fn every_pair(handler: Handler, op: u16, check: impl Fn(u8, u8, &State)) {
        let mut state = State::new();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                state.v[0x1] = a;
                state.v[0x2] = b;
                check(a, b, &exec(handler, op, &state, Quirks::default()));
            }
        }
    }

    #[test]
    fn test_8xy4_every_pair() {
        every_pair(addr, 0x8124, |a, b, s| {
            let sum = a as u16 + b as u16;
            assert_eq!(s.v[0x1], (sum & 0xFF) as u8, "{} + {}", a, b);
            assert_eq!(s.v[0xF], (sum > 255) as u8, "{} + {}", a, b);
            assert_eq!(s.v[0x2], b);
        });
    }

    #[test]
    fn test_8xy5_every_pair() {
        every_pair(sub, 0x8125, |a, b, s| {
            assert_eq!(s.v[0x1], a.wrapping_sub(b), "{} - {}", a, b);
            assert_eq!(s.v[0xF], (a >= b) as u8, "{} - {}", a, b);
        });
    }

    #[test]
    fn test_8xy7_every_pair() {
        every_pair(subn, 0x8127, |a, b, s| {
            assert_eq!(s.v[0x1], b.wrapping_sub(a), "{} - {}", b, a);
            assert_eq!(s.v[0xF], (b >= a) as u8, "{} - {}", b, a);
        });
    }

    #[test]
    fn test_8xy6_every_value_legacy() {
        every_pair(shr, 0x8126, |_, b, s| {
            assert_eq!(s.v[0x1], b >> 1);
            assert_eq!(s.v[0xF], b & 1);
        });
    }

    #[test]
    fn test_8xye_every_value_legacy() {
        every_pair(shl, 0x812E, |_, b, s| {
            assert_eq!(s.v[0x1], b << 1);
            assert_eq!(s.v[0xF], (b & 0x80) >> 7);
        });
    }

    #[test]
    fn test_shifts_every_value_modern() {
        let mut state = State::new();
        state.v[0x2] = 0xAA;
        for a in 0..=255u8 {
            state.v[0x1] = a;
            let right = exec(shr, 0x8126, &state, Quirks::modern());
            assert_eq!((right.v[0x1], right.v[0xF]), (a >> 1, a & 1));
            let left = exec(shl, 0x812E, &state, Quirks::modern());
            assert_eq!((left.v[0x1], left.v[0xF]), (a << 1, a >> 7));
        }
    }

    #[test]
    fn test_flag_register_as_operand() {
        // ADD VF, V1: the sum uses the old VF, then the carry replaces it
        let mut state = State::new();
        state.v[0xF] = 0xFF;
        state.v[0x1] = 0x02;
        assert_eq!(exec(addr, 0x8F14, &state, Quirks::default()).v[0xF], 1);

        // ADD VF, VF with no carry
        state.v[0xF] = 0x10;
        assert_eq!(exec(addr, 0x8FF4, &state, Quirks::default()).v[0xF], 0);

        // SUB V1, VF: borrow is computed from the old VF
        state.v[0x1] = 0x05;
        state.v[0xF] = 0x06;
        let s = exec(sub, 0x81F5, &state, Quirks::default());
        assert_eq!((s.v[0x1], s.v[0xF]), (0xFF, 0));

        // SHR VF: the shifted out bit wins over the result
        state.v[0xF] = 0x02;
        let s = exec(shr, 0x8FF6, &state, Quirks::default());
        assert_eq!(s.v[0xF], 0);
    }

    #[test]
    fn test_rnd_masks_with_kk() {
        let state = State::new();
        let s = exec(rnd, 0xC10F, &state, Quirks::default());
        assert_eq!(s.v[0x1] & 0xF0, 0);
        assert_eq!(exec(rnd, 0xC100, &state, Quirks::default()).v[0x1], 0);
    }

    #[test]
    fn test_rnd_is_seeded() {
        let state = State::new();
        let a = exec(rnd, 0xC1FF, &state, Quirks::default());
        let b = exec(rnd, 0xC1FF, &state, Quirks::default());
        assert_eq!(a.v[0x1], b.v[0x1]);
    }

    #[test]
    fn test_fx55_fx65_round_trip() {
        for x in 0..16u16 {
            let mut state = State::new();
            state.i = 0x300;
            for r in 0..16 {
                state.v[r] = (r as u8 + 1) * 7;
            }
            let original = state.v;

            let mut state = exec(stor, 0xF055 | x << 8, &state, Quirks::default());
            assert_eq!(state.i, 0x300);
            state.v = [0; 16];
            let state = exec(read, 0xF065 | x << 8, &state, Quirks::default());
            assert_eq!(state.i, 0x300);

            let x = x as usize;
            assert_eq!(state.v[..=x], original[..=x]);
            assert!(state.v[x + 1..].iter().all(|&r| r == 0));
        }
    }

    #[test]
    fn test_bcd_past_end_of_memory_faults() {
        let mut state = State::new();
        state.i = 0xFFE;
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = Context {
            quirks: Quirks::default(),
            rng: &mut rng,
        };
        assert_eq!(
            bcd(0xF033, &state, &mut ctx).err(),
            Some(Fault::Address { address: 0x1000 })
        );
    }

    #[test]
    fn test_stores_into_glyphs_fault() {
        let mut state = State::new();
        state.i = 0x50;
        state.v[0x0] = 0xAA;
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = Context {
            quirks: Quirks::default(),
            rng: &mut rng,
        };
        let fault = Some(Fault::Address { address: 0x50 });
        assert_eq!(stor(0xF055, &state, &mut ctx).err(), fault);
        assert_eq!(bcd(0xF033, &state, &mut ctx).err(), fault);
        // reading the glyphs is still fine
        let state = read(0xF065, &state, &mut ctx).unwrap();
        assert_eq!(state.v[0x0], 0xF0);
    }
}
