/// # Timers
/// Delay and sound counters. Each `tick` takes at most one off each, stopping at 0.
/// Instruction execution never ticks them; the owner does once per step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Timers { delay: 0, sound: 0 }
    }

    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Whether the buzzer should be sounding.
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_decrements_both() {
        let mut timers = Timers { delay: 3, sound: 1 };
        timers.tick();
        assert_eq!(timers, Timers { delay: 2, sound: 0 });
    }

    #[test]
    fn test_tick_floors_at_zero() {
        let mut timers = Timers::new();
        timers.tick();
        assert_eq!(timers, Timers::new());
    }

    #[test]
    fn test_sound_active() {
        let mut timers = Timers { delay: 0, sound: 1 };
        assert!(timers.sound_active());
        timers.tick();
        assert!(!timers.sound_active());
    }
}
