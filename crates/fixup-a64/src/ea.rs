//! Effective-address arithmetic.

use align_core::RegisterFile;

use crate::op::{Extend, IndexMode};

/// Base register read: number 31 names the stack pointer here, not zero.
pub(crate) fn base<R: RegisterFile>(regs: &R, rn: u8) -> u64 {
    if rn == 31 { regs.sp() } else { regs.gpr(rn) }
}

pub(crate) fn write_base<R: RegisterFile>(regs: &mut R, rn: u8, value: u64) {
    if rn == 31 {
        regs.set_sp(value);
    } else {
        regs.set_gpr(rn, value);
    }
}

/// Transfer address and pending write-back value.
///
/// Offset addressing displaces the transfer address and leaves the base
/// alone; post-index transfers at the raw base and queues base+offset;
/// pre-index uses base+offset for both. The write-back value is only
/// committed by the caller once the whole transfer has succeeded.
pub(crate) fn resolve(base: u64, offset: i64, index: IndexMode) -> (u64, Option<u64>) {
    let displaced = base.wrapping_add_signed(offset);
    match index {
        IndexMode::Offset => (displaced, None),
        IndexMode::PreIndex => (displaced, Some(displaced)),
        IndexMode::PostIndex => (base, Some(displaced)),
    }
}

/// Register-offset displacement: extend first, then shift.
pub(crate) fn extend_offset(value: u64, extend: Extend, shift: u8) -> u64 {
    let extended = match extend {
        Extend::Uxtw => u64::from(value as u32),
        Extend::Lsl | Extend::Sxtx => value,
        Extend::Sxtw => i64::from(value as u32 as i32) as u64,
    };
    extended << shift
}

#[cfg(test)]
mod tests {
    use align_core::{RegisterFile, SavedRegs};

    use super::*;

    #[test]
    fn index_modes_split_transfer_and_writeback() {
        assert_eq!(resolve(0x1000, 16, IndexMode::Offset), (0x1010, None));
        assert_eq!(resolve(0x1000, 16, IndexMode::PreIndex), (0x1010, Some(0x1010)));
        assert_eq!(resolve(0x1000, 16, IndexMode::PostIndex), (0x1000, Some(0x1010)));
    }

    #[test]
    fn negative_offsets_wrap() {
        assert_eq!(resolve(0x1000, -8, IndexMode::Offset), (0xff8, None));
        assert_eq!(resolve(0, -1, IndexMode::PostIndex), (0, Some(u64::MAX)));
    }

    #[test]
    fn extends_apply_before_the_shift() {
        // A negative w-register offset subtracts after sign extension.
        assert_eq!(extend_offset(0xffff_fff8, Extend::Sxtw, 0), (-8i64) as u64);
        assert_eq!(extend_offset(0xffff_fff8, Extend::Uxtw, 0), 0xffff_fff8);
        // The upper half of an x register only survives the 64-bit forms.
        assert_eq!(extend_offset(0x1_0000_0004, Extend::Uxtw, 0), 4);
        assert_eq!(extend_offset(0x1_0000_0004, Extend::Sxtx, 0), 0x1_0000_0004);
        assert_eq!(extend_offset(0x1_0000_0004, Extend::Lsl, 0), 0x1_0000_0004);
        // Scaling shifts the extended value.
        assert_eq!(extend_offset(3, Extend::Lsl, 3), 24);
        assert_eq!(extend_offset((-2i64) as u64, Extend::Sxtw, 2), (-8i64) as u64);
    }

    #[test]
    fn register_31_is_the_stack_pointer_for_bases() {
        let mut regs = SavedRegs::new();
        regs.set_sp(0x8000);
        regs.set_gpr(31, 0xdead);
        assert_eq!(base(&regs, 31), 0x8000);
        assert_eq!(base(&regs, 0), 0);

        write_base(&mut regs, 31, 0x7ff0);
        assert_eq!(regs.sp(), 0x7ff0);
        write_base(&mut regs, 3, 0x1234);
        assert_eq!(regs.gpr(3), 0x1234);
    }
}
