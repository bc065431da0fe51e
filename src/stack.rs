use crate::constants::STACK_DEPTH;

/// # Call Stack
/// Return addresses for CALL/RET with an explicit pointer.
///
/// `sp` is the number of addresses held, so `stack[sp - 1]` is the top.
/// Overflow and underflow are reported, never ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CallStack {
    slots: [u16; STACK_DEPTH],
    sp: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            slots: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    /// Returns `None` when every slot is in use.
    pub fn push(&self, addr: u16) -> Option<CallStack> {
        if self.sp == STACK_DEPTH {
            return None;
        }
        let mut slots = self.slots;
        slots[self.sp] = addr;
        Some(CallStack {
            slots,
            sp: self.sp + 1,
        })
    }

    /// Returns `None` when the stack is empty.
    pub fn pop(&self) -> Option<(u16, CallStack)> {
        let sp = self.sp.checked_sub(1)?;
        Some((self.slots[sp], CallStack { sp, ..*self }))
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    /// The live return addresses, oldest first.
    pub fn frames(&self) -> &[u16] {
        &self.slots[..self.sp]
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
