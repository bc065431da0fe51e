/// Points where historical interpreters disagree on instruction semantics.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quirks {
    /// 8xy6/8xyE: copy Vy into Vx before shifting (COSMAC VIP).
    /// When false Vx is shifted in place and Vy is ignored (Chip-48).
    pub shift_copies_vy: bool,
}

impl Quirks {
    /// The original COSMAC VIP interpreter.
    pub fn legacy() -> Self {
        Quirks {
            shift_copies_vy: true,
        }
    }

    /// Chip-48 and its descendants.
    pub fn modern() -> Self {
        Quirks {
            shift_copies_vy: false,
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks::legacy()
    }
}
