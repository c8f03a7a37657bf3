//! The fixup entry point.
//!
//! One call emulates one faulting instruction: fetch the word at the
//! saved program counter, decode it, run the transfer against the bus,
//! and report a verdict. State is only modified on the success paths;
//! an unsupported word leaves registers and memory exactly as found.

use align_core::{AccessError, FixupBus, Privilege, RegisterFile, Verdict};

use crate::decode;
use crate::mem;
use crate::op::Op;
use crate::scalar;
use crate::vector;

/// Emulate the faulting load/store the saved context points at.
///
/// `_far` and `_esr` arrive with the trap frame but are not consulted:
/// the transfer address is recomputed from the registers, which also
/// covers the sub-accesses the fault report never names.
pub fn fixup<R: RegisterFile, B: FixupBus>(
    _far: u64,
    _esr: u64,
    regs: &mut R,
    bus: &mut B,
) -> Verdict {
    let privilege = if regs.user_mode() { Privilege::User } else { Privilege::Kernel };
    let word = match bus.fetch_insn(regs.pc(), privilege) {
        Ok(word) => word,
        Err(err) => return Verdict::AccessFailed(err),
    };
    let op = match decode::decode(word) {
        Ok(op) => op,
        Err(_) => return Verdict::Unsupported,
    };
    let result = match &op {
        Op::Pair(op) => scalar::exec_pair(regs, bus, op),
        Op::Imm(op) => scalar::exec_imm(regs, bus, op),
        Op::RegOffset(op) => scalar::exec_reg_offset(regs, bus, op),
        Op::VecPair(op) => vector::exec_vec_pair(regs, bus, op),
        Op::VecImm(op) => vector::exec_vec_imm(regs, bus, op),
        Op::VecRegOffset(op) => vector::exec_vec_reg_offset(regs, bus, op),
        Op::VecMulti(op) => vector::exec_vec_multi(regs, bus, op),
        Op::VecSingle(op) => vector::exec_vec_single(regs, bus, op),
        Op::Zva { rt } => exec_zva(regs, bus, *rt),
        Op::Prefetch => Ok(()),
    };
    match result {
        Ok(()) => Verdict::Emulated,
        Err(err) => Verdict::AccessFailed(err),
    }
}

/// Zero one cache-writeback block. The block size comes from the bus's
/// DCZID value and the address is aligned down to it; the transfer
/// register is read even when it names the zero register.
fn exec_zva<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    rt: u8,
) -> Result<(), AccessError> {
    let block = 4usize << (bus.dczid() & 0xf);
    let addr = regs.gpr(rt) & !(block as u64 - 1);
    mem::zero_fill(bus, addr, block)
}

#[cfg(test)]
mod tests {
    use align_core::SavedRegs;

    use super::*;
    use crate::testbus::{DEV_BASE, RAM_BASE, TestBus};

    fn setup(insn: u32) -> (SavedRegs, TestBus) {
        let mut regs = SavedRegs::new();
        regs.pc = 0x4000_0000;
        let mut bus = TestBus::new();
        bus.insn = insn;
        (regs, bus)
    }

    #[test]
    fn store_runs_end_to_end() {
        // str w1, [x0, #32]
        let (mut regs, mut bus) = setup(0xb900_2001);
        regs.set_gpr(0, RAM_BASE);
        regs.set_gpr(1, 0xdead_beef);
        assert_eq!(fixup(RAM_BASE + 32, 0, &mut regs, &mut bus), Verdict::Emulated);
        assert_eq!(bus.ram[32..36], [0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(bus.fetches, 1);
    }

    #[test]
    fn fetch_privilege_follows_saved_mode() {
        let (mut regs, mut bus) = setup(0xb900_2001);
        regs.set_gpr(0, RAM_BASE);
        regs.spsr = 0; // EL0
        fixup(0, 0, &mut regs, &mut bus);
        assert_eq!(bus.fetched_as, Some(Privilege::User));

        regs.spsr = 0b0101; // EL1h
        fixup(0, 0, &mut regs, &mut bus);
        assert_eq!(bus.fetched_as, Some(Privilege::Kernel));
    }

    #[test]
    fn fetch_failure_reports_the_program_counter() {
        let (mut regs, mut bus) = setup(0);
        bus.fail_fetch = true;
        assert_eq!(
            fixup(0, 0, &mut regs, &mut bus),
            Verdict::AccessFailed(AccessError::at(0x4000_0000))
        );
    }

    #[test]
    fn unsupported_words_change_nothing() {
        for insn in [
            0xc85f_7c20u32, // ldxr x0, [x1]
            0xa8c1_0822,    // ldp x2, x2, [x1], #16 aliases its destinations
            0xd503_201f,    // nop
        ] {
            let (mut regs, mut bus) = setup(insn);
            regs.set_gpr(1, RAM_BASE);
            let before = regs.clone();
            assert_eq!(fixup(0, 0, &mut regs, &mut bus), Verdict::Unsupported, "{insn:#010x}");
            assert_eq!(regs, before);
        }
    }

    #[test]
    fn access_failure_carries_the_failing_subaccess() {
        // ldr x0, [x1]: the base points at unmapped memory.
        let (mut regs, mut bus) = setup(0xf940_0020);
        regs.set_gpr(1, 0x6000);
        assert_eq!(
            fixup(0x6000, 0, &mut regs, &mut bus),
            Verdict::AccessFailed(AccessError::at(0x6000))
        );
        assert_eq!(regs.gpr(0), 0);
    }

    #[test]
    fn prefetch_is_emulated_without_touching_memory() {
        // prfm pldl1keep, [x0]
        let (mut regs, mut bus) = setup(0xf980_0000);
        assert_eq!(fixup(0, 0, &mut regs, &mut bus), Verdict::Emulated);
        assert_eq!(bus.touches, 0);
        assert_eq!(bus.ram, [0; 256]);
    }

    #[test]
    fn cache_zero_aligns_down_and_clears_a_block() {
        // dc zva, x5
        let (mut regs, mut bus) = setup(0xd50b_7425);
        bus.ram = [0xff; 256];
        regs.set_gpr(5, RAM_BASE + 64 + 6);
        assert_eq!(fixup(0, 0, &mut regs, &mut bus), Verdict::Emulated);
        assert_eq!(bus.ram[63], 0xff);
        assert_eq!(bus.ram[64..128], [0; 64]);
        assert_eq!(bus.ram[128], 0xff);
    }

    #[test]
    fn cache_zero_block_size_comes_from_dczid() {
        let (mut regs, mut bus) = setup(0xd50b_7425);
        bus.ram = [0xff; 256];
        bus.dczid = 0; // four-byte blocks
        regs.set_gpr(5, RAM_BASE + 9);
        assert_eq!(fixup(0, 0, &mut regs, &mut bus), Verdict::Emulated);
        assert_eq!(bus.ram[7], 0xff);
        assert_eq!(bus.ram[8..12], [0; 4]);
        assert_eq!(bus.ram[12], 0xff);
    }

    #[test]
    fn cache_zero_walks_device_memory_bytewise() {
        let (mut regs, mut bus) = setup(0xd50b_7425);
        bus.dev = [0xff; 32];
        bus.dczid = 3; // 32-byte blocks
        regs.set_gpr(5, DEV_BASE + 5);
        assert_eq!(fixup(0, 0, &mut regs, &mut bus), Verdict::Emulated);
        assert_eq!(bus.dev, [0; 32]);
        assert_eq!(bus.touches, 32);
        assert_eq!(bus.touched[0], DEV_BASE);
        assert_eq!(bus.touched[31], DEV_BASE + 31);
    }

    #[test]
    fn zero_register_address_aligns_to_zero() {
        // dc zva, xzr reads address zero, which is unmapped here.
        let (mut regs, mut bus) = setup(0xd50b_743f);
        assert_eq!(
            fixup(0, 0, &mut regs, &mut bus),
            Verdict::AccessFailed(AccessError::at(0))
        );
    }
}
