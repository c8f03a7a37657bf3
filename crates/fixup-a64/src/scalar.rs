//! Integer load/store execution.
//!
//! The executors reproduce the architecture's commit order. Pair loads
//! read both halves before writing either destination, so a fault in the
//! second half leaves the registers untouched; pair stores run first half
//! then second, so a fault in the second half can leave the first half
//! written. Base write-back is always the final step and is skipped
//! entirely on a faulted transfer.

use align_core::{AccessError, FixupBus, RegisterFile};

use crate::ea;
use crate::mem;
use crate::op::{ImmOp, PairOp, RegOffsetOp, RegWidth, Size};

/// Sign-extend the low `bits` of `value` to 64 bits.
pub(crate) fn sign_extend(value: u64, bits: u32) -> u64 {
    let shift = 64 - bits;
    (((value << shift) as i64) >> shift) as u64
}

fn extend_loaded(value: u64, size: Size, signed: bool, width: RegWidth) -> u64 {
    let value = if signed { sign_extend(value, size.bits()) } else { value };
    width.mask(value)
}

fn transfer<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    addr: u64,
    load: bool,
    size: Size,
    signed: bool,
    width: RegWidth,
    rt: u8,
) -> Result<(), AccessError> {
    if load {
        let raw = mem::load_int(bus, addr, size)?;
        regs.set_gpr(rt, extend_loaded(raw, size, signed, width));
    } else {
        // Register 31 reads as zero here, so `str xzr` stores zeros.
        mem::store_int(bus, addr, size, regs.gpr(rt))?;
    }
    Ok(())
}

pub(crate) fn exec_pair<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    op: &PairOp,
) -> Result<(), AccessError> {
    let base = ea::base(regs, op.rn);
    let (addr, wback) = ea::resolve(base, op.offset, op.index);
    let second = addr.wrapping_add(op.size.bytes() as u64);
    let width = if op.signed || op.size == Size::Double { RegWidth::X64 } else { RegWidth::W32 };

    if op.load {
        let lo = mem::load_int(bus, addr, op.size)?;
        let hi = mem::load_int(bus, second, op.size)?;
        regs.set_gpr(op.rt, extend_loaded(lo, op.size, op.signed, width));
        regs.set_gpr(op.rt2, extend_loaded(hi, op.size, op.signed, width));
    } else {
        mem::store_int(bus, addr, op.size, regs.gpr(op.rt))?;
        mem::store_int(bus, second, op.size, regs.gpr(op.rt2))?;
    }
    if let Some(value) = wback {
        ea::write_base(regs, op.rn, value);
    }
    Ok(())
}

pub(crate) fn exec_imm<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    op: &ImmOp,
) -> Result<(), AccessError> {
    let base = ea::base(regs, op.rn);
    let (addr, wback) = ea::resolve(base, op.offset, op.index);
    transfer(regs, bus, addr, op.load, op.size, op.signed, op.width, op.rt)?;
    if let Some(value) = wback {
        ea::write_base(regs, op.rn, value);
    }
    Ok(())
}

pub(crate) fn exec_reg_offset<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    op: &RegOffsetOp,
) -> Result<(), AccessError> {
    let offset = ea::extend_offset(regs.gpr(op.rm), op.extend, op.shift);
    let addr = ea::base(regs, op.rn).wrapping_add(offset);
    transfer(regs, bus, addr, op.load, op.size, op.signed, op.width, op.rt)
}
