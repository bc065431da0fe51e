//! Runs a ROM in an SDL2 window.
//!
//! ```text
//! chip8 roms/pong.ch8 --ipt 12 --scale 12
//! ```
//!
//! Keys `1234/QWER/ASDF/ZXCV` are the keypad, `Space` fast-forwards,
//! `F5` reloads the ROM and `Escape` quits. Set `RUST_LOG=vip8=trace` to
//! see every instruction.

use std::path::PathBuf;

use clap::Parser;

use vip8::{Quirks, INSTRUCTIONS_PER_TICK};

mod audio;
mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions executed per 60 Hz tick
    #[arg(
        long = "ipt",
        visible_alias = "instructions-per-tick",
        default_value_t = INSTRUCTIONS_PER_TICK
    )]
    instructions_per_tick: usize,

    /// Size of each Chip-8 pixel in screen pixels
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Shift Vx in place for 8xy6/8xyE instead of copying Vy first
    #[arg(long)]
    modern_shift: bool,

    /// Never play the buzzer
    #[arg(long)]
    mute: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let quirks = if args.modern_shift {
        Quirks::modern()
    } else {
        Quirks::legacy()
    };

    run::run(run::Settings {
        rom: args.rom,
        instructions_per_tick: args.instructions_per_tick,
        scale: args.scale,
        quirks,
        mute: args.mute,
    })
}
