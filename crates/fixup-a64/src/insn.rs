//! Raw instruction word with named field extraction.
//!
//! Field names and positions follow the architecture's encoding diagrams
//! so each decoder can be checked line-by-line against the reference.

/// A fetched 32-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Insn(pub u32);

impl Insn {
    /// Bits `hi:lo` inclusive, right-aligned.
    pub(crate) const fn bits(self, hi: u32, lo: u32) -> u32 {
        (self.0 >> lo) & ((1 << (hi - lo + 1)) - 1)
    }

    /// Single bit as a flag.
    pub(crate) const fn bit(self, n: u32) -> bool {
        self.0 >> n & 1 != 0
    }

    /// Rt, bits 4:0.
    pub(crate) const fn rt(self) -> u8 {
        (self.0 & 0x1f) as u8
    }

    /// Rn, bits 9:5.
    pub(crate) const fn rn(self) -> u8 {
        (self.0 >> 5 & 0x1f) as u8
    }

    /// Rt2, bits 14:10.
    pub(crate) const fn rt2(self) -> u8 {
        (self.0 >> 10 & 0x1f) as u8
    }

    /// Rm, bits 20:16.
    pub(crate) const fn rm(self) -> u8 {
        (self.0 >> 16 & 0x1f) as u8
    }

    /// opc, bits 23:22.
    pub(crate) const fn opc(self) -> u32 {
        self.0 >> 22 & 3
    }

    /// option, bits 15:13 (register-offset extend kind).
    pub(crate) const fn option(self) -> u32 {
        self.0 >> 13 & 7
    }

    /// imm7 at bits 21:15, sign-extended. Pair offsets, before scaling.
    pub(crate) const fn imm7(self) -> i64 {
        ((self.0 >> 15 & 0x7f) as i64) << 57 >> 57
    }

    /// imm9 at bits 20:12, sign-extended. Unscaled and indexed forms.
    pub(crate) const fn imm9(self) -> i64 {
        ((self.0 >> 12 & 0x1ff) as i64) << 55 >> 55
    }

    /// imm12 at bits 21:10, zero-extended. Unsigned offset form.
    pub(crate) const fn imm12(self) -> u32 {
        self.0 >> 10 & 0xfff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_extraction() {
        // ldp x2, x3, [x1, #16]
        let insn = Insn(0xa941_0c22);
        assert_eq!(insn.rt(), 2);
        assert_eq!(insn.rt2(), 3);
        assert_eq!(insn.rn(), 1);
        assert_eq!(insn.imm7(), 2);
        assert_eq!(insn.bits(31, 30), 0b10);
        assert!(insn.bit(22), "load bit");
    }

    #[test]
    fn negative_immediates_sign_extend() {
        // ldur x0, [x1, #-8]: imm9 = 0x1f8
        assert_eq!(Insn(0xf85f_8020).imm9(), -8);
        // stp x0, x1, [sp, #-16]!: imm7 = 0x7e (scaled later)
        assert_eq!(Insn(0xa9bf_07e0).imm7(), -2);
    }
}
