//! Vector load/store execution, whole-register and structured.
//!
//! Structured transfers commit element by element, exactly as the
//! architecture sequences them: a fault part-way through leaves every
//! earlier element already in its destination register or in memory.
//! Whole-register loads narrower than 128 bits clear the rest of the
//! register; single-lane loads preserve it.

use align_core::{AccessError, FixupBus, RegisterFile, VecHalf};

use crate::ea;
use crate::mem;
use crate::op::{Size, VecImmOp, VecMultiOp, VecPairOp, VecRegOffsetOp, VecSingleOp};
use crate::vecreg;

fn read_vreg<R: RegisterFile>(regs: &R, n: u8) -> [u64; 2] {
    [regs.vreg(n, VecHalf::Lo), regs.vreg(n, VecHalf::Hi)]
}

fn write_vreg<R: RegisterFile>(regs: &mut R, n: u8, value: [u64; 2]) {
    regs.set_vreg(n, VecHalf::Lo, value[0]);
    regs.set_vreg(n, VecHalf::Hi, value[1]);
}

fn insert_lane<R: RegisterFile>(
    regs: &mut R,
    vt: u8,
    esize: Size,
    lane: u8,
    value: u64,
    clear_hi: bool,
) {
    let mut v = read_vreg(regs, vt);
    vecreg::set_element(&mut v, esize.bits(), lane, value);
    if clear_hi {
        v[1] = 0;
    }
    write_vreg(regs, vt, v);
}

/// Sixteen-byte transfers are two doubleword sub-accesses, low half first.
fn load_vec<B: FixupBus>(bus: &mut B, addr: u64, size: Size) -> Result<[u64; 2], AccessError> {
    if size == Size::Quad {
        let lo = mem::load_int(bus, addr, Size::Double)?;
        let hi = mem::load_int(bus, addr.wrapping_add(8), Size::Double)?;
        Ok([lo, hi])
    } else {
        Ok([mem::load_int(bus, addr, size)?, 0])
    }
}

fn store_vec<B: FixupBus>(
    bus: &mut B,
    addr: u64,
    size: Size,
    value: [u64; 2],
) -> Result<(), AccessError> {
    if size == Size::Quad {
        mem::store_int(bus, addr, Size::Double, value[0])?;
        mem::store_int(bus, addr.wrapping_add(8), Size::Double, value[1])
    } else {
        mem::store_int(bus, addr, size, value[0])
    }
}

pub(crate) fn exec_vec_pair<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    op: &VecPairOp,
) -> Result<(), AccessError> {
    let base = ea::base(regs, op.rn);
    let (addr, wback) = ea::resolve(base, op.offset, op.index);
    let second = addr.wrapping_add(op.size.bytes() as u64);

    if op.load {
        let lo = load_vec(bus, addr, op.size)?;
        let hi = load_vec(bus, second, op.size)?;
        write_vreg(regs, op.rt, lo);
        write_vreg(regs, op.rt2, hi);
    } else {
        store_vec(bus, addr, op.size, read_vreg(regs, op.rt))?;
        store_vec(bus, second, op.size, read_vreg(regs, op.rt2))?;
    }
    if let Some(value) = wback {
        ea::write_base(regs, op.rn, value);
    }
    Ok(())
}

pub(crate) fn exec_vec_imm<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    op: &VecImmOp,
) -> Result<(), AccessError> {
    let base = ea::base(regs, op.rn);
    let (addr, wback) = ea::resolve(base, op.offset, op.index);
    if op.load {
        let value = load_vec(bus, addr, op.size)?;
        write_vreg(regs, op.rt, value);
    } else {
        store_vec(bus, addr, op.size, read_vreg(regs, op.rt))?;
    }
    if let Some(value) = wback {
        ea::write_base(regs, op.rn, value);
    }
    Ok(())
}

pub(crate) fn exec_vec_reg_offset<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    op: &VecRegOffsetOp,
) -> Result<(), AccessError> {
    let offset = ea::extend_offset(regs.gpr(op.rm), op.extend, op.shift);
    let addr = ea::base(regs, op.rn).wrapping_add(offset);
    if op.load {
        let value = load_vec(bus, addr, op.size)?;
        write_vreg(regs, op.rt, value);
    } else {
        store_vec(bus, addr, op.size, read_vreg(regs, op.rt))?;
    }
    Ok(())
}

/// De-/interleaving register lists.
///
/// For each lane, `selem` consecutive elements pair off with `selem`
/// consecutive registers starting at `rt + r`, wrapping at 32. Loads of
/// the 64-bit arrangements clear the upper half on every element commit.
pub(crate) fn exec_vec_multi<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    op: &VecMultiOp,
) -> Result<(), AccessError> {
    let ebytes = op.esize.bytes() as u64;
    let regbytes: u64 = if op.q { 16 } else { 8 };
    let lanes = (regbytes / ebytes) as u8;
    let base = ea::base(regs, op.rn);
    let mut addr = base;

    for r in 0..op.rpt {
        for lane in 0..lanes {
            let mut vt = op.rt.wrapping_add(r) & 31;
            for _ in 0..op.selem {
                if op.load {
                    let elem = mem::load_int(bus, addr, op.esize)?;
                    insert_lane(regs, vt, op.esize, lane, elem, !op.q);
                } else {
                    let v = read_vreg(regs, vt);
                    mem::store_int(bus, addr, op.esize, vecreg::element(v, op.esize.bits(), lane))?;
                }
                addr = addr.wrapping_add(ebytes);
                vt = (vt + 1) & 31;
            }
        }
    }
    if op.wback {
        let advance = if op.rm == 31 {
            u64::from(op.rpt) * u64::from(op.selem) * regbytes
        } else {
            regs.gpr(op.rm)
        };
        ea::write_base(regs, op.rn, base.wrapping_add(advance));
    }
    Ok(())
}

/// One lane of each listed register, or a broadcast to every lane.
pub(crate) fn exec_vec_single<R: RegisterFile, B: FixupBus>(
    regs: &mut R,
    bus: &mut B,
    op: &VecSingleOp,
) -> Result<(), AccessError> {
    let ebytes = op.esize.bytes() as u64;
    let base = ea::base(regs, op.rn);
    let mut addr = base;
    let mut vt = op.rt;

    for _ in 0..op.selem {
        if op.replicate {
            let elem = mem::load_int(bus, addr, op.esize)?;
            let spread = vecreg::replicate(elem, op.esize.bits());
            write_vreg(regs, vt, [spread, if op.q { spread } else { 0 }]);
        } else if op.load {
            let elem = mem::load_int(bus, addr, op.esize)?;
            insert_lane(regs, vt, op.esize, op.lane, elem, false);
        } else {
            let v = read_vreg(regs, vt);
            mem::store_int(bus, addr, op.esize, vecreg::element(v, op.esize.bits(), op.lane))?;
        }
        addr = addr.wrapping_add(ebytes);
        vt = (vt + 1) & 31;
    }
    if op.wback {
        let advance = if op.rm == 31 { u64::from(op.selem) * ebytes } else { regs.gpr(op.rm) };
        ea::write_base(regs, op.rn, base.wrapping_add(advance));
    }
    Ok(())
}
