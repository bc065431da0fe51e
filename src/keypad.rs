use crate::constants::KEY_COUNT;

/// # Keypad
/// Down/up latch for the 16 hexadecimal keys.
///
/// The driver replaces it wholesale between steps; instructions only read it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new(keys: [bool; KEY_COUNT]) -> Self {
        Keypad { keys }
    }

    /// Only the low nibble of `key` is significant.
    pub fn is_down(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn is_up(&self, key: u8) -> bool {
        !self.is_down(key)
    }

    /// The lowest key code currently held, if any.
    pub fn first_down(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|key| key as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_all_up() {
        let keypad = Keypad::default();
        assert!((0..16).all(|key| keypad.is_up(key)));
        assert_eq!(keypad.first_down(), None);
    }

    #[test]
    fn test_masks_high_nibble() {
        let mut keys = [false; KEY_COUNT];
        keys[0x3] = true;
        let keypad = Keypad::new(keys);
        assert!(keypad.is_down(0x3));
        assert!(keypad.is_down(0xF3));
        assert!(keypad.is_up(0x4));
    }

    #[test]
    fn test_first_down_prefers_lowest() {
        let mut keys = [false; KEY_COUNT];
        keys[0xE] = true;
        keys[0x7] = true;
        keys[0xA] = true;
        assert_eq!(Keypad::new(keys).first_down(), Some(0x7));
    }
}
