use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use display::Display;
use vip8::{Chip8, Quirks, KEY_COUNT, TIMER_HZ};

use crate::audio::Beeper;
use crate::keymap::keymap;

/// Everything the driver needs from the command line.
pub struct Settings {
    pub rom: PathBuf,
    pub instructions_per_tick: usize,
    pub scale: u32,
    pub quirks: Quirks,
    pub mute: bool,
}

pub fn run(settings: Settings) -> Result<()> {
    let rom = std::fs::read(&settings.rom)
        .with_context(|| format!("unable to read ROM {}", settings.rom.display()))?;
    let mut chip8 = Chip8::new(settings.quirks);
    chip8.load_rom(&rom)?;
    info!("loaded {} ({} bytes)", settings.rom.display(), rom.len());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, "vip8", settings.scale)?;
    display.render(chip8.frame())?;
    let mut beeper = if settings.mute {
        None
    } else {
        Some(Beeper::new(&sdl)?)
    };
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let frame_time = Duration::from_secs(1) / TIMER_HZ;
    // The keypad latch, written to the Chip-8 wholesale before every step
    let mut keys = [false; KEY_COUNT];
    // Whether or not the frame rate should be respected
    let mut fast_forward = false;
    // Set once the Chip-8 faults; cleared by a reload
    let mut halted = false;

    'event: loop {
        let frame_start = Instant::now();

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => keys[kc as usize] = true,
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => break 'event,
                    (Keycode::F5, _) => {
                        chip8.load_rom(&rom)?;
                        keys = [false; KEY_COUNT];
                        halted = false;
                        display.render(chip8.frame())?;
                        info!("reloaded {}", settings.rom.display());
                    }
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => keys[kc as usize] = false,
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        if !halted {
            chip8.set_keys(keys);
            if let Err(fault) = chip8.step(settings.instructions_per_tick) {
                error!("{}; press F5 to reload", fault);
                halted = true;
            }
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(&frame)?;
        }
        if let Some(beeper) = beeper.as_mut() {
            beeper.set(!halted && chip8.sound_active());
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if !fast_forward && frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}
