/// # Opcodes
///
/// Instructions are 16 bits, stored big-endian. The high nibble names the
/// opcode family; the rest of the word carries operands and, for some
/// families, a secondary selector.
/// - `(f, _, _, _)` the family; every opcode has one
/// - `(_, n, n, n)` a 12-bit address (`addr`), also the selector for family 0x0
/// - `(_, _, n, n)` an immediate byte (`kk`), also the selector for families 0xE and 0xF
/// - `(_, _, _, n)` a nibble (`n`), also the selector for families 0x5, 0x8 and 0x9
/// - `(_, n, _, _)` the register Vx, or the upper bound of the range V0..=Vx
/// - `(_, _, n, _)` the register Vy
pub trait Opcode {
    /// `[f___]`
    fn family(&self) -> u8;

    /// `[_x__]` as a register index.
    fn x(&self) -> usize;

    /// `[__y_]` as a register index.
    fn y(&self) -> usize;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn family(&self) -> u8 {
        ((self & 0xF000) >> 12) as u8
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> 8) as usize
    }

    fn y(&self) -> usize {
        ((self & 0x00F0) >> 4) as usize
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family() {
        assert_eq!(0xABCDu16.family(), 0xA);
        assert_eq!(0x00E0u16.family(), 0x0);
    }

    #[test]
    fn test_registers() {
        let op: u16 = 0x8AF4;
        assert_eq!(op.x(), 0xA);
        assert_eq!(op.y(), 0xF);
    }

    #[test]
    fn test_n() {
        assert_eq!(0xD12Fu16.n(), 0xF);
    }

    #[test]
    fn test_kk() {
        assert_eq!(0xABCDu16.kk(), 0xCD);
    }

    #[test]
    fn test_addr() {
        assert_eq!(0xABCDu16.addr(), 0x0BCD);
    }
}
