//! Register context of the faulting execution state.
//!
//! Engines see registers through `RegisterFile`, so a platform can back it
//! with whatever it captures at exception entry — a saved trap frame, or
//! live system-register moves. `SavedRegs` is the plain trap-frame form.

/// Selects one 64-bit half of a 128-bit vector register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VecHalf {
    /// Bits 63:0.
    Lo,
    /// Bits 127:64.
    Hi,
}

/// Mutable view of the faulting context's register state.
///
/// General registers follow A64 operand conventions: index 31 is the zero
/// register (reads 0, writes discarded). The stack pointer has dedicated
/// accessors because index 31 means SP only in base-register positions;
/// the engine decides which rule applies where.
pub trait RegisterFile {
    /// Read general register `n` (0-30). `n == 31` reads as zero.
    fn gpr(&self, n: u8) -> u64;

    /// Write general register `n` (0-30). `n == 31` is discarded.
    fn set_gpr(&mut self, n: u8, value: u64);

    /// Read the stack pointer.
    fn sp(&self) -> u64;

    /// Write the stack pointer.
    fn set_sp(&mut self, value: u64);

    /// Read the faulting program counter. Engines never advance it.
    fn pc(&self) -> u64;

    /// True when the fault was taken from unprivileged code.
    fn user_mode(&self) -> bool;

    /// Read one half of vector register `n` (0-31).
    fn vreg(&self, n: u8, half: VecHalf) -> u64;

    /// Write one half of vector register `n` (0-31).
    fn set_vreg(&mut self, n: u8, half: VecHalf, value: u64);
}

/// Register block captured at exception entry.
///
/// The usual trap-frame save layout: 31 general registers, the faulting
/// context's SP and PC (exception link register), the saved processor
/// state, and the 32 vector registers as pairs of 64-bit halves. Platform
/// entry code fills this from its trap frame; tests fill it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct SavedRegs {
    /// x0-x30.
    pub gpr: [u64; 31],
    /// Stack pointer of the faulting context.
    pub sp: u64,
    /// Faulting program counter.
    pub pc: u64,
    /// Saved processor state. The mode field's low nibble is 0 for a
    /// fault taken from unprivileged code.
    pub spsr: u64,
    /// v0-v31, each as [low half, high half].
    pub vreg: [[u64; 2]; 32],
}

impl SavedRegs {
    /// All-zero context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gpr: [0; 31],
            sp: 0,
            pc: 0,
            spsr: 0,
            vreg: [[0; 2]; 32],
        }
    }
}

impl Default for SavedRegs {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile for SavedRegs {
    fn gpr(&self, n: u8) -> u64 {
        if n < 31 { self.gpr[n as usize] } else { 0 }
    }

    fn set_gpr(&mut self, n: u8, value: u64) {
        if n < 31 {
            self.gpr[n as usize] = value;
        }
    }

    fn sp(&self) -> u64 {
        self.sp
    }

    fn set_sp(&mut self, value: u64) {
        self.sp = value;
    }

    fn pc(&self) -> u64 {
        self.pc
    }

    fn user_mode(&self) -> bool {
        self.spsr & 0xf == 0
    }

    fn vreg(&self, n: u8, half: VecHalf) -> u64 {
        let r = self.vreg[(n & 31) as usize];
        match half {
            VecHalf::Lo => r[0],
            VecHalf::Hi => r[1],
        }
    }

    fn set_vreg(&mut self, n: u8, half: VecHalf, value: u64) {
        let r = &mut self.vreg[(n & 31) as usize];
        match half {
            VecHalf::Lo => r[0] = value,
            VecHalf::Hi => r[1] = value,
        }
    }
}
